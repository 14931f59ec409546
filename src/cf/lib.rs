//! # cf Architecture
//!
//! The `cf` binary is a thin shell around two layers: commands that decide
//! what to say, and [`termtext`], which decides how it looks and in which
//! language.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  main.rs + args.rs                                          │
//! │  - Parses arguments, loads and saves config, exit codes     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Commands (commands/*.rs)                                   │
//! │  - Talk to the user only through termtext::Ui               │
//! │  - Reach the outside world only through actor traits        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Actors (actors.rs)                                         │
//! │  - Own the Config, call the Cloud Controller                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  cloudcontroller.rs                                         │
//! │  - CloudControllerClient trait, reqwest implementation      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure reporting
//!
//! A command that fails in a way the user should hear about prints its own
//! message and returns [`error::CfError::Failed`]. `main` then prints the
//! translated `FAILED` line and exits with status 1. Any other error is
//! unexpected and is reported as `Error: ...` on stderr.
//!
//! ## Testing Strategy
//!
//! Commands are tested against fake actors and a [`termtext::Ui`] writing to
//! byte buffers. The binary is tested end to end in `tests/` with `CF_HOME`
//! pointing at a temporary directory.
//!
//! ## Module Overview
//!
//! - [`commands`]: One module per command
//! - [`actors`]: Config and network side effects
//! - [`cloudcontroller`]: The `/v2/info` client
//! - [`config`]: `config.json` handling, implements [`termtext::UiConfig`]
//! - [`error`]: Error types

pub mod actors;
pub mod cloudcontroller;
pub mod commands;
pub mod config;
pub mod error;
