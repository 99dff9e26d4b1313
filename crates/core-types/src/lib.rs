pub mod enums;
pub mod error;
pub mod params;

// Re-export the core types to provide a clean public API.
pub use enums::SignMode;
pub use error::CoreError;
pub use params::{OrderParams, ParamValue};
