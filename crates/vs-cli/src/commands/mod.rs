//! Command implementations

pub mod common;
pub mod new;
pub mod status;
pub mod sync;
pub mod upgrade;
