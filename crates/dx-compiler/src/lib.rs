pub mod document;
mod emit;
pub mod event;
pub mod require;
pub mod script;
pub mod similarity;
pub mod symbols;

pub use document::parse_event_document;
pub use event::{compile_event, compile_source, SOURCE_HEADER};
pub use symbols::{SymbolRegistry, BASE_LANGUAGE};
