//! Nekotool is a terminal dashboard for the Neko API key tool backend.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns token classification, the server registry, the
//!   multi-server validation fan-out, CSV export, and configuration.
//! - [`api`] defines the backend's request/response payloads and the HTTP
//!   client that issues them.
//! - [`cli`] parses arguments and renders each subcommand's output.
//!
//! The binary entrypoint (`src/main.rs`) routes through [`cli::main`], which
//! builds the runtime, loads the configuration once, and dispatches.

pub mod api;
pub mod cli;
pub mod core;
pub mod utils;
