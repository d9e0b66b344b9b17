//! Parley is a terminal-first chat client for a model-routing chat proxy.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns runtime state, the model and prompt catalogs, the
//!   submission pipeline, and the prompt reveal timer.
//! - [`ui`] renders the terminal interface and runs the interactive event loop
//!   that drives user input and display updates.
//! - [`api`] defines the `/api/chat` request and response payloads.
//! - [`cli`] parses arguments and dispatches into the chat loop or one-shot
//!   commands.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
