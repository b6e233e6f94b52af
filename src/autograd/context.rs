//! Gradient recording mode
//!
//! Recording is on by default. Inside a [`no_grad`] scope, functions still
//! compute their outputs but do not attach creators, so results are leaves
//! and nothing is retained for backpropagation.

use std::cell::Cell;

thread_local! {
    static GRAD_ENABLED: Cell<bool> = const { Cell::new(true) };
}

/// Whether function calls currently record creator edges
pub fn is_grad_enabled() -> bool {
    GRAD_ENABLED.with(Cell::get)
}

/// Set the recording mode, returning the previous one
pub fn set_grad_enabled(enabled: bool) -> bool {
    GRAD_ENABLED.with(|flag| flag.replace(enabled))
}

/// Restores the previous recording mode when dropped
#[must_use = "recording is re-enabled as soon as the guard is dropped"]
#[derive(Debug)]
pub struct NoGradGuard {
    previous: bool,
}

impl Drop for NoGradGuard {
    fn drop(&mut self) {
        set_grad_enabled(self.previous);
    }
}

/// Disable recording until the returned guard is dropped
pub fn no_grad() -> NoGradGuard {
    NoGradGuard {
        previous: set_grad_enabled(false),
    }
}
