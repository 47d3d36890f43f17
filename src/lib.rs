//! promptvars - Extract and render variables embedded in prompt text
//!
//! Prompt text parameterizes values with `${name}`, `${name:default}`, or
//! `{{name}}` placeholders. This crate extracts those variables, renders
//! previews with defaults or user-supplied bindings, and detects
//! placeholder-like text written in unsupported syntaxes so it can be
//! converted to the supported form.

pub mod cli;
pub mod config;
pub mod detect;
pub mod render;
pub mod variables;
