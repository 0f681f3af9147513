//! CLI subcommand implementations.

pub mod delete;
pub mod init;
pub mod list;
pub mod publish;
pub mod take;
pub mod validate;
