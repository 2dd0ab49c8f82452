//! Helpers shared across layers.
//!
//! - [`code_generator`] - Short code generation
//! - [`jwe`] - Compact JWE sealing for session tokens

pub mod code_generator;
pub mod jwe;
