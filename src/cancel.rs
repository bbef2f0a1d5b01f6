//! Cooperative cancellation of a run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A flag shared between a signal handler and the [`Shredder`](crate::shred::Shredder), which
/// checks it between entries and between rounds.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Cancels `token` on SIGINT, SIGTERM or SIGHUP. `reset` runs right after, for restoring whatever
/// terminal or output state the caller needs; it must not touch the run itself.
pub fn install_handler<F>(token: CancelToken, reset: F) -> Result<(), ctrlc::Error>
where
    F: Fn() + Send + 'static,
{
    ctrlc::set_handler(move || {
        token.cancel();
        reset();
    })
}
