//! Per-call request context.
//!
//! A [`RequestContext`] travels with every call through the transport and the
//! pagination engine. It carries an optional deadline, an optional cancel
//! signal and an optional caller name that is folded into the GraphQL
//! operation name.

use std::future::{Future, pending};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Instant;

/// Reason a context stopped a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    /// The cancel signal fired.
    #[error("context canceled")]
    Cancelled,

    /// The deadline passed.
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Cancellation, deadline and caller metadata for one logical call.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
    caller: Option<String>,
}

impl RequestContext {
    /// Context with no deadline, no cancel signal and no caller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the whole call (including every page and retry) by `deadline`.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Bound the whole call by `timeout` from now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Abort the call once the watched value becomes `true`.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Tag requests made under this context with a caller name.
    #[must_use]
    pub fn with_caller(mut self, caller: impl Into<String>) -> Self {
        self.caller = Some(caller.into());
        self
    }

    /// Caller name, if any.
    pub fn caller(&self) -> Option<&str> {
        self.caller.as_deref()
    }

    /// Deadline, if any.
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` once the cancel signal has fired.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|cancel| *cancel.borrow())
    }

    /// Fail fast if the context is already done.
    pub fn check(&self) -> Result<(), ContextError> {
        if self.is_cancelled() {
            return Err(ContextError::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(ContextError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Resolves when the context is cancelled or its deadline passes.
    ///
    /// Never resolves for a context with neither.
    pub async fn done(&self) -> ContextError {
        let cancelled = async {
            match self.cancel.clone() {
                // A dropped sender can never cancel.
                Some(mut cancel) => {
                    let fired = cancel.wait_for(|value| *value).await.is_ok();
                    if fired {
                        ContextError::Cancelled
                    } else {
                        pending().await
                    }
                }
                None => pending().await,
            }
        };
        let expired = async {
            match self.deadline {
                Some(deadline) => {
                    tokio::time::sleep_until(deadline).await;
                    ContextError::DeadlineExceeded
                }
                None => pending().await,
            }
        };

        tokio::select! {
            err = cancelled => err,
            err = expired => err,
        }
    }

    /// Drive `future` to completion unless the context finishes first.
    ///
    /// The in-flight future is dropped on cancellation, which aborts any
    /// request it owns.
    pub async fn run<F: Future>(&self, future: F) -> Result<F::Output, ContextError> {
        self.check()?;
        tokio::select! {
            biased;
            err = self.done() => Err(err),
            output = future => Ok(output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send<T: Send>(_: &T) {}

    #[test]
    fn cancellable_futures_are_send() {
        let (_tx, rx) = watch::channel(false);
        let ctx = RequestContext::new()
            .with_cancellation(rx)
            .with_timeout(Duration::from_secs(1));
        assert_send(&ctx.done());
        assert_send(&ctx.run(async { 7 }));
    }

    #[tokio::test]
    async fn empty_context_never_finishes() {
        let ctx = RequestContext::new();
        assert!(ctx.check().is_ok());
        let output = ctx.run(async { 7 }).await;
        assert_eq!(output, Ok(7));
    }

    #[tokio::test]
    async fn cancel_signal_interrupts_pending_future() {
        let (tx, rx) = watch::channel(false);
        let ctx = RequestContext::new().with_cancellation(rx);

        let handle = tokio::spawn({
            let ctx = ctx.clone();
            async move { ctx.run(pending::<()>()).await }
        });
        tx.send(true).expect("receiver alive");

        let result = handle.await.expect("task");
        assert_eq!(result, Err(ContextError::Cancelled));
        assert_eq!(ctx.check(), Err(ContextError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_interrupts_pending_future() {
        let ctx = RequestContext::new().with_timeout(Duration::from_secs(5));
        let result = ctx.run(pending::<()>()).await;
        assert_eq!(result, Err(ContextError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn dropped_sender_does_not_cancel() {
        let (tx, rx) = watch::channel(false);
        drop(tx);
        let ctx = RequestContext::new().with_cancellation(rx);
        assert!(ctx.check().is_ok());
        assert_eq!(ctx.run(async { "done" }).await, Ok("done"));
    }

    #[test]
    fn caller_is_recorded() {
        let ctx = RequestContext::new().with_caller("resourceRead");
        assert_eq!(ctx.caller(), Some("resourceRead"));
    }
}
