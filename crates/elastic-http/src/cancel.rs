//! Caller-facing cancellation handles.

use tokio_util::sync::CancellationToken;

/// Handle returned by the listener-based dispatch path.
///
/// Cancelling aborts the in-flight transport call, or — if the call has not
/// been issued yet — makes its eventual issuance fail as cancelled instead of
/// proceeding. The outcome is always reported through the call's listener,
/// never silently dropped. Cancelling twice, or cancelling after the call
/// completed, is a no-op.
#[derive(Debug, Clone)]
pub struct Cancellable {
    token: Option<CancellationToken>,
}

impl Cancellable {
    /// Handle wired to a dispatched call.
    pub(crate) fn armed(token: CancellationToken) -> Self {
        Self { token: Some(token) }
    }

    /// Handle for a call that never started (validation or conversion failed
    /// before dispatch). Cancelling it has no effect.
    pub fn no_op() -> Self {
        Self { token: None }
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        if let Some(token) = &self.token {
            token.cancel();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token
            .as_ref()
            .map(CancellationToken::is_cancelled)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_op_handles_ignore_cancel() {
        let cancellable = Cancellable::no_op();
        cancellable.cancel();
        assert!(!cancellable.is_cancelled());
    }

    #[test]
    fn armed_handles_report_cancellation() {
        let token = CancellationToken::new();
        let cancellable = Cancellable::armed(token.clone());
        assert!(!cancellable.is_cancelled());

        cancellable.cancel();
        assert!(cancellable.is_cancelled());
        assert!(token.is_cancelled());
    }

    #[test]
    fn cancel_is_idempotent() {
        let cancellable = Cancellable::armed(CancellationToken::new());
        cancellable.cancel();
        cancellable.cancel();
        assert!(cancellable.is_cancelled());
    }

    #[test]
    fn clones_share_the_same_call() {
        let cancellable = Cancellable::armed(CancellationToken::new());
        let other = cancellable.clone();
        other.cancel();
        assert!(cancellable.is_cancelled());
    }
}
