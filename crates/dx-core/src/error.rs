use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{file}: {path}: {kind}")]
pub struct CompileError {
    pub file: String,
    pub path: String,
    pub kind: CompileErrorKind,
}

impl CompileError {
    pub fn new(file: impl Into<String>, path: impl Into<String>, kind: CompileErrorKind) -> Self {
        Self {
            file: file.into(),
            path: path.into(),
            kind,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompileErrorKind {
    #[error("expected {expected}, found {found}")]
    Structural { expected: String, found: String },

    #[error("missing required field \"{field}\"")]
    MissingField { field: String },

    #[error("unknown script command \"{command}\" (accepted: {})", .accepted.join(", "))]
    UnknownCommand {
        command: String,
        accepted: Vec<String>,
    },

    #[error("unknown category \"{category}\" (available: {})", .available.join(", "))]
    UnknownCategory {
        category: String,
        available: Vec<String>,
    },

    #[error("unknown key \"{key}\" in category \"{category}\"{}", suggestion_note(.suggestions))]
    UnknownKey {
        category: String,
        key: String,
        suggestions: Vec<String>,
    },

    #[error("key \"{key}\" in category \"{category}\" has no \"{language}\" or base-language value")]
    MissingLocalization {
        category: String,
        key: String,
        language: String,
    },
}

fn suggestion_note(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(". Did you mean: {}", suggestions.join(", "))
    }
}
