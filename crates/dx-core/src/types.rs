use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq)]
pub struct EventDocument {
    pub event_name: String,
    pub once: bool,
    pub trigger: Trigger,
    pub require: Option<RequireClause>,
    pub script: Vec<ScriptNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    pub location: String,
    pub facility: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequireClause {
    pub before: Option<BeforeDate>,
    pub gender: Option<String>,
    pub no_task: bool,
    pub faction_type: Option<String>,
    pub money_gt: Option<i64>,
}

impl RequireClause {
    pub fn is_empty(&self) -> bool {
        self.before.is_none()
            && self.gender.is_none()
            && !self.no_task
            && self.faction_type.is_none()
            && self.money_gt.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeforeDate {
    pub year: i64,
    pub month: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioKind {
    Bgm,
    Sfx,
}

impl AudioKind {
    pub fn category(self) -> &'static str {
        match self {
            AudioKind::Bgm => "bgm",
            AudioKind::Sfx => "sfx",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptNode {
    Narration {
        text: String,
    },
    InnerThought {
        text: String,
    },
    Dialogue {
        speaker: String,
        listener: String,
        text: String,
    },
    RenamedDialogue {
        speaker: String,
        listener: String,
        surname: String,
        name: String,
        text: String,
    },
    AudioCue {
        kind: AudioKind,
        key: String,
    },
    Choice {
        options: Vec<ChoiceOption>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceOption {
    pub label: String,
    pub body: Vec<ScriptNode>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LocalizedEntry {
    Plain(String),
    Localized {
        #[serde(default)]
        comment: Option<String>,
        #[serde(flatten)]
        values: BTreeMap<String, String>,
    },
}

impl LocalizedEntry {
    // Requested language first, then the base language; empty strings count
    // as absent.
    pub fn value(&self, language: &str, base_language: &str) -> Option<&str> {
        match self {
            LocalizedEntry::Plain(value) => Some(value.as_str()).filter(|v| !v.is_empty()),
            LocalizedEntry::Localized { values, .. } => values
                .get(language)
                .map(String::as_str)
                .filter(|v| !v.is_empty())
                .or_else(|| {
                    values
                        .get(base_language)
                        .map(String::as_str)
                        .filter(|v| !v.is_empty())
                }),
        }
    }
}
