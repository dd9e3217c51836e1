//! Compiler configuration and step-file loading.

pub mod parser;
pub mod types;
