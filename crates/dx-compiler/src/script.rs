use dx_core::{AudioKind, CompileError, ScriptNode};

use crate::emit::line;
use crate::symbols::SymbolRegistry;

// Structural recursion over the script body. The path and indent level are
// explicit parameters: choice branches recurse with path
// "<node>.choice.options[<j>].do" one level deeper.
pub fn compile_script(
    file: &str,
    nodes: &[ScriptNode],
    registry: &SymbolRegistry,
    language: &str,
    path: &str,
    level: usize,
) -> Result<String, CompileError> {
    let mut output = String::new();

    for (index, node) in nodes.iter().enumerate() {
        let node_path = format!("{}[{}]", path, index);

        match node {
            ScriptNode::Narration { text } => {
                output.push_str(&line(level, &format!("旁白:[[{}]]", text)));
            }
            ScriptNode::InnerThought { text } => {
                output.push_str(&line(level, &format!("自言自語:[[{}]]", text)));
            }
            ScriptNode::Dialogue {
                speaker,
                listener,
                text,
            } => {
                let speaker = resolve_character(file, registry, language, &node_path, "say", "speaker", speaker)?;
                let listener = resolve_character(file, registry, language, &node_path, "say", "listener", listener)?;
                output.push_str(&line(
                    level,
                    &format!("對話:({},{})[[{}]]", speaker, listener, text),
                ));
            }
            ScriptNode::RenamedDialogue {
                speaker,
                listener,
                surname,
                name,
                text,
            } => {
                let speaker =
                    resolve_character(file, registry, language, &node_path, "rename_say", "speaker", speaker)?;
                let listener =
                    resolve_character(file, registry, language, &node_path, "rename_say", "listener", listener)?;
                output.push_str(&line(
                    level,
                    &format!(
                        "變名對話:({},{},[[{}]],[[{}]])[[{}]]",
                        speaker, listener, surname, name, text
                    ),
                ));
            }
            ScriptNode::AudioCue { kind, key } => {
                let category = kind.category();
                let resolved = registry
                    .resolve(category, key, language)
                    .map_err(|k| CompileError::new(file, format!("{}.{}", node_path, category), k))?;
                let tag = match kind {
                    AudioKind::Bgm => "音樂",
                    AudioKind::Sfx => "音效",
                };
                output.push_str(&line(level, &format!("{}:({})", tag, resolved)));
            }
            ScriptNode::Choice { options } => {
                // Option labels are literal, never resolved.
                let labels = options
                    .iter()
                    .map(|option| format!("[[{}]]", option.label))
                    .collect::<Vec<_>>()
                    .join(",");
                output.push_str(&line(level, &format!("選擇:({})", labels)));

                for (option_index, option) in options.iter().enumerate() {
                    let body_path =
                        format!("{}.choice.options[{}].do", node_path, option_index);
                    output.push_str(&line(level, "選項:{"));
                    output.push_str(&compile_script(
                        file,
                        &option.body,
                        registry,
                        language,
                        &body_path,
                        level + 1,
                    )?);
                    output.push_str(&line(level, "}"));
                }
            }
        }
    }

    Ok(output)
}

fn resolve_character(
    file: &str,
    registry: &SymbolRegistry,
    language: &str,
    node_path: &str,
    command: &str,
    role: &str,
    key: &str,
) -> Result<String, CompileError> {
    registry
        .resolve("characters", key, language)
        .map_err(|kind| CompileError::new(file, format!("{}.{}.{}", node_path, command, role), kind))
}
