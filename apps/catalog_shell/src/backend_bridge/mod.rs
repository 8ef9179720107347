//! Bridge between the single UI loop and background I/O.

pub mod commands;
pub mod runtime;
