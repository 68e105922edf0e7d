//! `PolicyEngine` implementation backed by a CEL interpreter.
//!
//! Expressions see `object`, `oldObject`, `params`, `namespaceObject`,
//! `request`, and `variables`. Parse errors in individual expressions do not
//! fail compilation; they surface as `error` decisions when the rule runs.

#![forbid(unsafe_code)]

mod convert;
mod engine;

pub use engine::CelEngine;
