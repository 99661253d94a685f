//! Shared test support utilities for behaviour-driven suites.
//!
//! Exposes `StepText`, which strips the quotes Gherkin steps wrap around keys
//! and templates so step definitions receive the raw value.
pub mod step_text;
