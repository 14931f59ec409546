//! One module per CLI command. A command gets a [`termtext::Ui`] to print
//! through and the actor(s) it needs; it never touches stdout, the network or
//! the config file directly.

pub mod api;

/// How the command line names the binary in help and tips.
pub const CF_NAME: &str = "cf";
