pub mod error;
pub mod types;

pub use error::{CompileError, CompileErrorKind};
pub use types::*;
