//! Terminal UI layer for interactive chat sessions.
//!
//! Key submodules:
//! - [`chat_loop`]: terminal setup, the event loop, and key routing.
//! - [`renderer`] and [`layout`]: frame composition and transcript wrapping.
//! - [`markdown`]: assistant replies rendered to styled lines.
//! - [`theme`] and [`builtin_themes`]: light and dark palettes.
//! - [`picker`]: the model selection overlay.
//!
//! This layer presents and captures interaction state, while [`crate::core`]
//! owns the conversation and request handling.

pub mod builtin_themes;
pub mod chat_loop;
pub mod layout;
pub mod markdown;
pub mod picker;
pub mod renderer;
pub mod theme;
