//! Utilities shared by the Hiroba relay binaries and server library.

pub mod logger;
pub mod time;
