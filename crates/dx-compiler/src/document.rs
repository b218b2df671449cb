use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use dx_core::{
    AudioKind, BeforeDate, ChoiceOption, CompileError, CompileErrorKind, EventDocument,
    RequireClause, ScriptNode, Trigger,
};

pub const ACCEPTED_COMMANDS: [&str; 7] = [
    "narration",
    "hero_think",
    "say",
    "rename_say",
    "bgm",
    "sfx",
    "choice",
];

const REQUIRE_FIELDS: [&str; 5] = [
    "before_year_month",
    "gender",
    "no_task",
    "faction_type",
    "money_gt",
];

pub fn parse_event_document(file: &str, root: &Value) -> Result<EventDocument, CompileError> {
    let root = as_object(file, "", root, "event document object")?;

    let event_name = required_str(file, "", root, "event_name")?;
    if !event_name_regex().is_match(&event_name) {
        return Err(CompileError::new(
            file,
            "event_name",
            CompileErrorKind::Structural {
                expected: "event name without braces or line breaks".to_string(),
                found: format!("\"{}\"", event_name),
            },
        ));
    }

    let once = optional_bool(file, "", root, "once")?.unwrap_or(true);
    let trigger = parse_trigger(file, root)?;
    let require = match root.get("require") {
        Some(value) => Some(parse_require(file, value)?),
        None => None,
    };
    let script = match root.get("script") {
        Some(value) => parse_script_nodes(file, "script", value)?,
        None => Vec::new(),
    };

    Ok(EventDocument {
        event_name,
        once,
        trigger,
        require,
        script,
    })
}

fn parse_trigger(file: &str, root: &Map<String, Value>) -> Result<Trigger, CompileError> {
    let Some(value) = root.get("trigger") else {
        return Err(missing_field(file, "trigger", "trigger"));
    };
    let trigger = as_object(file, "trigger", value, "trigger object")?;

    // "location" is the current spelling; "town" is kept for older documents
    // and loses when both are present.
    let location = match optional_str(file, "trigger", trigger, "location")? {
        Some(location) => location,
        None => match optional_str(file, "trigger", trigger, "town")? {
            Some(town) => town,
            None => return Err(missing_field(file, "trigger.location", "location")),
        },
    };

    let facility = match optional_str(file, "trigger", trigger, "facility")? {
        Some(facility) => facility,
        None => return Err(missing_field(file, "trigger.facility", "facility")),
    };

    Ok(Trigger { location, facility })
}

fn parse_require(file: &str, value: &Value) -> Result<RequireClause, CompileError> {
    let require = as_object(file, "require", value, "require object")?;

    for field in require.keys() {
        if !REQUIRE_FIELDS.contains(&field.as_str()) {
            return Err(CompileError::new(
                file,
                format!("require.{}", field),
                CompileErrorKind::Structural {
                    expected: format!("one of: {}", REQUIRE_FIELDS.join(", ")),
                    found: format!("\"{}\"", field),
                },
            ));
        }
    }

    let before = match require.get("before_year_month") {
        Some(value) => {
            let path = "require.before_year_month";
            let clause = as_object(file, path, value, "year/month object")?;
            for field in clause.keys() {
                if field != "year" && field != "month" {
                    return Err(CompileError::new(
                        file,
                        format!("{}.{}", path, field),
                        CompileErrorKind::Structural {
                            expected: "only \"year\" and \"month\"".to_string(),
                            found: format!("\"{}\"", field),
                        },
                    ));
                }
            }
            Some(BeforeDate {
                year: required_int(file, path, clause, "year")?,
                month: required_int(file, path, clause, "month")?,
            })
        }
        None => None,
    };

    Ok(RequireClause {
        before,
        gender: optional_str(file, "require", require, "gender")?,
        no_task: optional_bool(file, "require", require, "no_task")?.unwrap_or(false),
        faction_type: optional_str(file, "require", require, "faction_type")?,
        money_gt: optional_int(file, "require", require, "money_gt")?,
    })
}

fn parse_script_nodes(file: &str, path: &str, value: &Value) -> Result<Vec<ScriptNode>, CompileError> {
    let Some(entries) = value.as_array() else {
        return Err(shape_error(file, path, "command sequence", value));
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_script_node(file, &format!("{}[{}]", path, index), entry))
        .collect()
}

fn parse_script_node(file: &str, path: &str, value: &Value) -> Result<ScriptNode, CompileError> {
    let node = as_object(file, path, value, "single-command object")?;

    let mut entries = node.iter();
    let (Some((command, body)), None) = (entries.next(), entries.next()) else {
        return Err(shape_error(file, path, "object with exactly one command", value));
    };

    let command_path = format!("{}.{}", path, command);

    match command.as_str() {
        "narration" => Ok(ScriptNode::Narration {
            text: as_str(file, &command_path, body, "narration text")?,
        }),
        "hero_think" => Ok(ScriptNode::InnerThought {
            text: as_str(file, &command_path, body, "inner-thought text")?,
        }),
        "say" => {
            let say = as_object(file, &command_path, body, "say object")?;
            Ok(ScriptNode::Dialogue {
                speaker: required_str(file, &command_path, say, "speaker")?,
                listener: required_str(file, &command_path, say, "listener")?,
                text: required_str(file, &command_path, say, "text")?,
            })
        }
        "rename_say" => {
            let say = as_object(file, &command_path, body, "rename_say object")?;
            Ok(ScriptNode::RenamedDialogue {
                speaker: required_str(file, &command_path, say, "speaker")?,
                listener: required_str(file, &command_path, say, "listener")?,
                surname: required_str(file, &command_path, say, "surname")?,
                name: required_str(file, &command_path, say, "name")?,
                text: required_str(file, &command_path, say, "text")?,
            })
        }
        "bgm" => Ok(ScriptNode::AudioCue {
            kind: AudioKind::Bgm,
            key: as_str(file, &command_path, body, "audio cue key")?,
        }),
        "sfx" => Ok(ScriptNode::AudioCue {
            kind: AudioKind::Sfx,
            key: as_str(file, &command_path, body, "audio cue key")?,
        }),
        "choice" => parse_choice(file, &command_path, body),
        _ => Err(CompileError::new(
            file,
            path,
            CompileErrorKind::UnknownCommand {
                command: command.clone(),
                accepted: ACCEPTED_COMMANDS.iter().map(|tag| tag.to_string()).collect(),
            },
        )),
    }
}

fn parse_choice(file: &str, path: &str, value: &Value) -> Result<ScriptNode, CompileError> {
    let choice = as_object(file, path, value, "choice object")?;

    let Some(options_value) = choice.get("options") else {
        return Err(missing_field(file, &format!("{}.options", path), "options"));
    };
    let options_path = format!("{}.options", path);
    let Some(entries) = options_value.as_array() else {
        return Err(shape_error(file, &options_path, "option sequence", options_value));
    };
    if entries.is_empty() {
        return Err(CompileError::new(
            file,
            options_path,
            CompileErrorKind::Structural {
                expected: "at least one option".to_string(),
                found: "empty sequence".to_string(),
            },
        ));
    }

    let mut options = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let option_path = format!("{}[{}]", options_path, index);
        let option = as_object(file, &option_path, entry, "option object")?;

        let label = required_str(file, &option_path, option, "label")?;
        let body = match option.get("do") {
            Some(body) => parse_script_nodes(file, &format!("{}.do", option_path), body)?,
            None => Vec::new(),
        };

        options.push(ChoiceOption { label, body });
    }

    Ok(ScriptNode::Choice { options })
}

fn as_object<'a>(
    file: &str,
    path: &str,
    value: &'a Value,
    expected: &str,
) -> Result<&'a Map<String, Value>, CompileError> {
    value
        .as_object()
        .ok_or_else(|| shape_error(file, path, expected, value))
}

fn as_str(file: &str, path: &str, value: &Value, expected: &str) -> Result<String, CompileError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| shape_error(file, path, expected, value))
}

fn required_str(
    file: &str,
    path: &str,
    object: &Map<String, Value>,
    field: &str,
) -> Result<String, CompileError> {
    let field_path = join_path(path, field);
    match object.get(field) {
        Some(value) => as_str(file, &field_path, value, "string"),
        None => Err(missing_field(file, &field_path, field)),
    }
}

fn optional_str(
    file: &str,
    path: &str,
    object: &Map<String, Value>,
    field: &str,
) -> Result<Option<String>, CompileError> {
    match object.get(field) {
        Some(value) => as_str(file, &join_path(path, field), value, "string").map(Some),
        None => Ok(None),
    }
}

fn optional_bool(
    file: &str,
    path: &str,
    object: &Map<String, Value>,
    field: &str,
) -> Result<Option<bool>, CompileError> {
    match object.get(field) {
        Some(value) => match value.as_bool() {
            Some(flag) => Ok(Some(flag)),
            None => Err(shape_error(file, &join_path(path, field), "boolean", value)),
        },
        None => Ok(None),
    }
}

fn required_int(
    file: &str,
    path: &str,
    object: &Map<String, Value>,
    field: &str,
) -> Result<i64, CompileError> {
    let field_path = join_path(path, field);
    match object.get(field) {
        Some(value) => value
            .as_i64()
            .ok_or_else(|| shape_error(file, &field_path, "integer", value)),
        None => Err(missing_field(file, &field_path, field)),
    }
}

fn optional_int(
    file: &str,
    path: &str,
    object: &Map<String, Value>,
    field: &str,
) -> Result<Option<i64>, CompileError> {
    match object.get(field) {
        Some(value) => value
            .as_i64()
            .map(Some)
            .ok_or_else(|| shape_error(file, &join_path(path, field), "integer", value)),
        None => Ok(None),
    }
}

// Brace or newline characters in the name would corrupt the generated
// block nesting.
fn event_name_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[^{}\r\n]+$").expect("event name regex must compile"))
}

fn join_path(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", path, field)
    }
}

fn missing_field(file: &str, path: &str, field: &str) -> CompileError {
    CompileError::new(
        file,
        path,
        CompileErrorKind::MissingField {
            field: field.to_string(),
        },
    )
}

fn shape_error(file: &str, path: &str, expected: &str, found: &Value) -> CompileError {
    CompileError::new(
        file,
        path,
        CompileErrorKind::Structural {
            expected: expected.to_string(),
            found: describe_value(found),
        },
    )
}

fn describe_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Array(_) => "sequence".to_string(),
        Value::Object(_) => "mapping".to_string(),
    }
}
