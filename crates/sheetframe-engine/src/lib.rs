//! sheetframe_engine - cell primitives shared by the read and write pipelines.

pub mod engine;
pub mod error;

pub use error::EscapingError;
