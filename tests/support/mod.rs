//! Shared step parameter types for the behaviour-driven suites.
//!
//! Gherkin steps quote their values; the wrappers here strip the quotes and
//! split locale lists so step definitions receive plain Rust values.

pub mod locale;
pub mod value;
