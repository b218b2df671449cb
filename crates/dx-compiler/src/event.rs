use serde_json::Value;

use dx_core::{CompileError, CompileErrorKind, EventDocument};

use crate::document::parse_event_document;
use crate::emit::line;
use crate::require::compile_require;
use crate::script::compile_script;
use crate::symbols::SymbolRegistry;

pub const SOURCE_HEADER: &str = "太閣立志傳５事件原始碼";

// Parse, validate, and compile one event document given as JSON text.
pub fn compile_source(
    file: &str,
    source: &str,
    registry: &SymbolRegistry,
    language: &str,
) -> Result<String, CompileError> {
    let value = serde_json::from_str::<Value>(source).map_err(|error| {
        CompileError::new(
            file,
            "",
            CompileErrorKind::Structural {
                expected: "JSON event document".to_string(),
                found: error.to_string(),
            },
        )
    })?;

    let document = parse_event_document(file, &value)?;
    compile_event(file, &document, registry, language)
}

pub fn compile_event(
    file: &str,
    document: &EventDocument,
    registry: &SymbolRegistry,
    language: &str,
) -> Result<String, CompileError> {
    // Current table name first; "towns" is the legacy category spelling.
    let location_category = if registry.contains_category("locations") {
        "locations"
    } else {
        "towns"
    };
    let location = registry
        .resolve(location_category, &document.trigger.location, language)
        .map_err(|kind| CompileError::new(file, "trigger.location", kind))?;
    let facility = registry
        .resolve("facilities", &document.trigger.facility, language)
        .map_err(|kind| CompileError::new(file, "trigger.facility", kind))?;

    let conditions = compile_require(file, document.require.as_ref(), registry, language, 3)?;
    let body = compile_script(file, &document.script, registry, language, "script", 3)?;

    let mut output = String::new();
    output.push_str(SOURCE_HEADER);
    output.push('\n');
    output.push_str("章節:{\n");
    output.push_str(&line(1, &format!("事件:{}{{", document.event_name)));

    if document.once {
        output.push_str(&line(2, "屬性:僅限一次"));
    }

    output.push_str(&line(
        2,
        &format!("發生時機:室內畫面顯示後({},{})", location, facility),
    ));
    output.push_str(&line(2, "發生條件:{"));
    output.push_str(&conditions);
    output.push_str(&line(2, "}"));
    output.push_str(&line(2, "腳本:{"));
    output.push_str(&body);
    output.push_str(&line(2, "}"));
    output.push_str(&line(1, "}"));
    output.push_str("}\n");

    Ok(output)
}
