//! Command implementations that do more than print.

pub mod init;
pub mod inspect;
