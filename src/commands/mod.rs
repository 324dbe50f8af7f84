//! CLI command handlers
//!
//! Each handler drives a [`crate::console::TeleopConsole`] the way an
//! interactive host would, then reports the result on stdout.

pub mod drive;
pub mod robot;
