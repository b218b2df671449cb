use std::collections::BTreeMap;
use std::path::Path;

use dx_core::{CompileError, CompileErrorKind, LocalizedEntry};

use crate::similarity::suggest;

pub const BASE_LANGUAGE: &str = "zh-tw";

type CategoryTable = BTreeMap<String, LocalizedEntry>;

#[derive(Debug, Clone, Default)]
pub struct SymbolRegistry {
    categories: BTreeMap<String, CategoryTable>,
}

impl SymbolRegistry {
    // Both maps are keyed by source file path; the category name is the file
    // stem. A non-empty primary table supersedes the legacy table of the same
    // name entirely; an empty or missing primary table falls back to legacy.
    pub fn from_json_maps(
        primary: &BTreeMap<String, String>,
        legacy: &BTreeMap<String, String>,
    ) -> Result<Self, CompileError> {
        let mut categories = parse_source_map(legacy)?;

        for (name, table) in parse_source_map(primary)? {
            if !table.is_empty() || !categories.contains_key(&name) {
                categories.insert(name, table);
            }
        }

        Ok(Self { categories })
    }

    pub fn contains_category(&self, name: &str) -> bool {
        self.categories.contains_key(name)
    }

    pub fn resolve(
        &self,
        category: &str,
        key: &str,
        language: &str,
    ) -> Result<String, CompileErrorKind> {
        let Some(table) = self.categories.get(category) else {
            return Err(CompileErrorKind::UnknownCategory {
                category: category.to_string(),
                available: self.categories.keys().cloned().collect(),
            });
        };

        let Some(entry) = table.get(key) else {
            return Err(CompileErrorKind::UnknownKey {
                category: category.to_string(),
                key: key.to_string(),
                suggestions: suggest(key, table.keys()),
            });
        };

        match entry.value(language, BASE_LANGUAGE) {
            Some(value) => Ok(value.to_string()),
            None => Err(CompileErrorKind::MissingLocalization {
                category: category.to_string(),
                key: key.to_string(),
                language: language.to_string(),
            }),
        }
    }
}

fn parse_source_map(
    sources: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, CategoryTable>, CompileError> {
    let mut categories = BTreeMap::new();

    for (file_path, source_text) in sources {
        let name = category_name(file_path)?;
        if categories.contains_key(&name) {
            return Err(CompileError::new(
                file_path.clone(),
                "",
                CompileErrorKind::Structural {
                    expected: "one table file per category".to_string(),
                    found: format!("duplicate category \"{}\"", name),
                },
            ));
        }

        let table = serde_json::from_str::<CategoryTable>(source_text).map_err(|error| {
            CompileError::new(
                file_path.clone(),
                "",
                CompileErrorKind::Structural {
                    expected: "JSON mapping of key to string or localized entry".to_string(),
                    found: error.to_string(),
                },
            )
        })?;

        categories.insert(name, table);
    }

    Ok(categories)
}

fn category_name(file_path: &str) -> Result<String, CompileError> {
    match Path::new(file_path).file_stem().and_then(|stem| stem.to_str()) {
        Some(stem) if !stem.is_empty() => Ok(stem.to_string()),
        _ => Err(CompileError::new(
            file_path,
            "",
            CompileErrorKind::Structural {
                expected: "category file with a usable name".to_string(),
                found: format!("\"{}\"", file_path),
            },
        )),
    }
}
