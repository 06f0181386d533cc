//! schemata - declarative validation and coercion of untrusted input
//!
//! Composable property descriptors turn loosely typed JSON-like input into
//! validated, coerced, default-filled values or reject it with a precise,
//! path-carrying error.

pub mod cli;
pub mod config;
pub mod observability;
pub mod rules;
pub mod schema;
