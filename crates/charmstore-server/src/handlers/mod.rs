//! Request handlers.

pub mod meta;
