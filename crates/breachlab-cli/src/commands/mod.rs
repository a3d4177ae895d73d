//! CLI command implementations for the lab binary.

pub mod init_db;
pub mod serve;
pub mod verify;
