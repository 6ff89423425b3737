//! Fetch-then-render view state.
//!
//! Views never surface errors to the reader. A failed fetch is logged and
//! the view falls back to a generic message.

use std::fmt::Display;
use tracing::error;

/// Message shown while a view is loading
pub const LOADING_MESSAGE: &str = "Loading...";

/// Message shown when a view could not be loaded
pub const FAILED_MESSAGE: &str = "Failed to load";

/// State of a view's data.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState<T> {
    #[default]
    Loading,
    Loaded(T),
    Failed,
}

impl<T> ViewState<T> {
    /// Converts a fetch result, logging and swallowing the error.
    ///
    /// `context` names the view in the log line.
    pub fn from_result<E: Display>(context: &str, result: Result<T, E>) -> Self {
        match result {
            Ok(value) => ViewState::Loaded(value),
            Err(e) => {
                error!(view = context, error = %e, "failed to load view");
                ViewState::Failed
            }
        }
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            ViewState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_loaded(self) -> Option<T> {
        match self {
            ViewState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    /// Static placeholder text for states without data.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            ViewState::Loading => Some(LOADING_MESSAGE),
            ViewState::Failed => Some(FAILED_MESSAGE),
            ViewState::Loaded(_) => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ViewState<U> {
        match self {
            ViewState::Loading => ViewState::Loading,
            ViewState::Loaded(value) => ViewState::Loaded(f(value)),
            ViewState::Failed => ViewState::Failed,
        }
    }
}

/// Unwraps a result for data a view can live without.
///
/// Errors are logged and replaced by `T::default()`.
pub fn or_default_logged<T: Default, E: Display>(context: &str, result: Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            error!(view = context, error = %e, "continuing without optional data");
            T::default()
        }
    }
}
