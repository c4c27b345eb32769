//! State containers over the procedure client, one per entity.
//!
//! Every operation clears the error and raises `loading` on entry; the flag
//! drops once no call of that store is still in flight. Mutations re-fetch on
//! success and record the message on failure, leaving the previous list
//! untouched. Nothing is applied optimistically.

mod categories;
mod lock;
mod posts;

pub use categories::{CategoriesState, CategoriesStore};
pub use posts::{PostsState, PostsStore};

use crate::client::error::ClientError;

/// Message recorded for a failed call; `fallback` covers empty messages.
pub(crate) fn error_message(err: &ClientError, fallback: &str) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

/// Shared loading and error bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Activity {
    pending: usize,
    error: Option<String>,
}

impl Activity {
    pub(crate) fn begin(&mut self) {
        self.pending += 1;
        self.error = None;
    }

    pub(crate) fn finish(&mut self) {
        self.pending = self.pending.saturating_sub(1);
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub(crate) fn loading(&self) -> bool {
        self.pending > 0
    }

    /// Errors stay hidden while a call is in flight.
    pub(crate) fn visible_error(&self) -> Option<String> {
        if self.loading() {
            None
        } else {
            self.error.clone()
        }
    }
}
