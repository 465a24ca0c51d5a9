//! CLI command implementations.

pub mod apply;
pub mod common;
pub mod cost;
pub mod init;
pub mod inspect;
pub mod remove;
pub mod simulate;
