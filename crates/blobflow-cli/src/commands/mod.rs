pub mod config;
pub mod init;
pub mod nodes;
pub mod send;
