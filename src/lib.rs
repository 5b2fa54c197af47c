pub mod accumulate;
pub mod binding;
pub mod cli;
pub mod config;
pub mod error;
pub mod parser;
pub mod range;
pub mod scan;
pub mod value;

// Re-export main types
pub use error::{FlowError, FlowResult, ResourceError, UsageError};
pub use value::Val;
