const TAB: &str = "\t";

pub(crate) fn indent(level: usize) -> String {
    TAB.repeat(level)
}

pub(crate) fn line(level: usize, text: &str) -> String {
    format!("{}{}\n", indent(level), text)
}

#[cfg(test)]
mod emit_tests {
    use super::*;

    #[test]
    fn line_prefixes_tabs_and_appends_newline() {
        assert_eq!(line(0, "章節:{"), "章節:{\n");
        assert_eq!(line(3, "旁白:[[x]]"), "\t\t\t旁白:[[x]]\n");
    }

    #[test]
    fn indent_is_tab_based() {
        assert_eq!(indent(2), "\t\t");
    }
}
