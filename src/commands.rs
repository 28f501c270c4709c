//! Subcommands of the `jpull` binary.
pub mod generate;
