//! Interactive chat session: terminal setup, the event loop, and key routing.
//!
//! The shared [`App`] sits behind an [`AppHandle`]. Key events become
//! [`AppAction`](crate::core::app::AppAction)s, actions may yield commands,
//! and commands run as Tokio tasks that report back through the action
//! dispatcher.

mod event_loop;
mod keybindings;
mod lifecycle;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::core::app::App;

pub use event_loop::run_chat;

/// Cloneable handle to the app state shared by the loop and its tasks.
#[derive(Clone)]
pub struct AppHandle {
    inner: Arc<Mutex<App>>,
}

impl AppHandle {
    pub fn new(inner: Arc<Mutex<App>>) -> Self {
        Self { inner }
    }

    pub async fn read<R>(&self, f: impl FnOnce(&App) -> R) -> R {
        let guard = self.inner.lock().await;
        f(&guard)
    }

    pub async fn update<R>(&self, f: impl FnOnce(&mut App) -> R) -> R {
        let mut guard = self.inner.lock().await;
        f(&mut guard)
    }
}
