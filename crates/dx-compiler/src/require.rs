use dx_core::{CompileError, RequireClause};

use crate::emit::line;
use crate::symbols::SymbolRegistry;

// Condition lines for the 發生條件 block, implicitly conjunctive. Absent
// fields emit nothing; an absent clause emits an empty block interior.
pub fn compile_require(
    file: &str,
    clause: Option<&RequireClause>,
    registry: &SymbolRegistry,
    language: &str,
    level: usize,
) -> Result<String, CompileError> {
    let Some(clause) = clause else {
        return Ok(String::new());
    };

    let mut output = String::new();

    if let Some(before) = clause.before {
        // The target has no compound date comparison: before(Y, M) becomes
        // (year < Y) OR (year == Y AND month < M), both spelled out.
        output.push_str(&line(level, "或者:{"));
        output.push_str(&line(level + 1, &format!("條件:(年份<{})", before.year)));
        output.push_str(&line(level + 1, "並且:{"));
        output.push_str(&line(level + 2, &format!("條件:(年份=={})", before.year)));
        output.push_str(&line(level + 2, &format!("條件:(月份<{})", before.month)));
        output.push_str(&line(level + 1, "}"));
        output.push_str(&line(level, "}"));
    }

    if let Some(gender) = &clause.gender {
        let resolved = registry
            .resolve("gender", gender, language)
            .map_err(|kind| CompileError::new(file, "require.gender", kind))?;
        output.push_str(&line(level, &format!("條件:(主角性別=={})", resolved)));
    }

    if clause.no_task {
        output.push_str(&line(level, "條件:(主角狀態==無任務)"));
    }

    if let Some(faction_type) = &clause.faction_type {
        let resolved = registry
            .resolve("faction_types", faction_type, language)
            .map_err(|kind| CompileError::new(file, "require.faction_type", kind))?;
        output.push_str(&line(level, &format!("條件:(主角勢力型態=={})", resolved)));
    }

    if let Some(money) = clause.money_gt {
        output.push_str(&line(level, &format!("條件:(主角持有金錢>{})", money)));
    }

    Ok(output)
}

#[cfg(test)]
mod require_tests {
    use super::*;
    use dx_core::{BeforeDate, CompileErrorKind};
    use std::collections::BTreeMap;

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn registry() -> SymbolRegistry {
        SymbolRegistry::from_json_maps(
            &map(&[
                ("enums/gender.json", r#"{"Male": "男", "Female": "女"}"#),
                ("enums/faction_types.json", r#"{"Ronin": "浪人", "Daimyo": "大名"}"#),
            ]),
            &BTreeMap::new(),
        )
        .expect("registry")
    }

    #[test]
    fn absent_clause_emits_nothing() {
        let output = compile_require("e.json", None, &registry(), "zh-tw", 3).expect("output");
        assert!(output.is_empty());
    }

    #[test]
    fn before_decomposes_into_disjunction_with_nested_conjunction() {
        let clause = RequireClause {
            before: Some(BeforeDate { year: 1560, month: 6 }),
            ..RequireClause::default()
        };
        let output =
            compile_require("e.json", Some(&clause), &registry(), "zh-tw", 3).expect("output");
        assert_eq!(
            output,
            "\t\t\t或者:{\n\
             \t\t\t\t條件:(年份<1560)\n\
             \t\t\t\t並且:{\n\
             \t\t\t\t\t條件:(年份==1560)\n\
             \t\t\t\t\t條件:(月份<6)\n\
             \t\t\t\t}\n\
             \t\t\t}\n"
        );
    }

    #[test]
    fn symbolic_fields_resolve_through_their_categories() {
        let clause = RequireClause {
            gender: Some("Male".to_string()),
            faction_type: Some("Ronin".to_string()),
            ..RequireClause::default()
        };
        let output =
            compile_require("e.json", Some(&clause), &registry(), "zh-tw", 3).expect("output");
        assert_eq!(
            output,
            "\t\t\t條件:(主角性別==男)\n\t\t\t條件:(主角勢力型態==浪人)\n"
        );
    }

    #[test]
    fn fixed_fields_emit_sentinel_lines_in_declaration_order() {
        let clause = RequireClause {
            no_task: true,
            money_gt: Some(500),
            ..RequireClause::default()
        };
        let output =
            compile_require("e.json", Some(&clause), &registry(), "zh-tw", 3).expect("output");
        assert_eq!(
            output,
            "\t\t\t條件:(主角狀態==無任務)\n\t\t\t條件:(主角持有金錢>500)\n"
        );
    }

    #[test]
    fn unknown_gender_key_fails_at_require_path() {
        let clause = RequireClause {
            gender: Some("Maale".to_string()),
            ..RequireClause::default()
        };
        let error =
            compile_require("e.json", Some(&clause), &registry(), "zh-tw", 3).expect_err("error");
        assert_eq!(error.path, "require.gender");
        let CompileErrorKind::UnknownKey { suggestions, .. } = error.kind else {
            panic!("expected unknown key");
        };
        assert_eq!(suggestions, vec!["Male".to_string()]);
    }
}
