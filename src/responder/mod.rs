//! Answer generation for queries that are not built-in commands
//!
//! A [`Responder`] is a zero-argument capability: every call produces one
//! payload or fails. One responder is shared by every session on a server,
//! so implementations must tolerate concurrent calls without help from the
//! caller.

mod command;
mod fortune;

pub use command::{CommandResponder, DEFAULT_MAX_OUTPUT};
pub use fortune::FortuneResponder;

use crate::Result;
use bytes::Bytes;
use futures::future::{self, BoxFuture, FutureExt};

/// Produces the payload for a non-built-in query
pub trait Responder: Send + Sync {
    /// Generate one answer
    ///
    /// A failure is fatal to the connection that asked.
    fn respond(&self) -> BoxFuture<'_, Result<Bytes>>;
}

/// Always answers with the same payload
#[derive(Debug, Clone)]
pub struct StaticResponder {
    payload: Bytes,
}

impl StaticResponder {
    /// Create a responder returning `payload` on every call
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

impl Responder for StaticResponder {
    fn respond(&self) -> BoxFuture<'_, Result<Bytes>> {
        future::ready(Ok(self.payload.clone())).boxed()
    }
}

/// Responder backed by a synchronous closure, see [`responder_fn`]
#[derive(Clone)]
pub struct FnResponder<F> {
    f: F,
}

impl<F> std::fmt::Debug for FnResponder<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnResponder")
    }
}

/// Wrap a closure as a [`Responder`]
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use pg_fortune::responder::{responder_fn, Responder};
///
/// let responder = responder_fn(|| Ok(Bytes::from_static(b"42")));
/// # tokio_test::block_on(async {
/// assert_eq!(responder.respond().await.unwrap(), "42");
/// # });
/// ```
pub fn responder_fn<F>(f: F) -> FnResponder<F>
where
    F: Fn() -> Result<Bytes> + Send + Sync,
{
    FnResponder { f }
}

impl<F> Responder for FnResponder<F>
where
    F: Fn() -> Result<Bytes> + Send + Sync,
{
    fn respond(&self) -> BoxFuture<'_, Result<Bytes>> {
        future::ready((self.f)()).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_static_responder() {
        let responder = StaticResponder::new("hello");
        assert_eq!(responder.respond().await.unwrap(), "hello");
        assert_eq!(responder.respond().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_fn_responder_calls_closure_each_time() {
        let calls = AtomicUsize::new(0);
        let responder = responder_fn(|| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            Ok(Bytes::from(n.to_string()))
        });

        assert_eq!(responder.respond().await.unwrap(), "0");
        assert_eq!(responder.respond().await.unwrap(), "1");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fn_responder_error() {
        let responder = responder_fn(|| Err(Error::responder("out of fortunes")));
        let err = responder.respond().await.unwrap_err();
        assert!(matches!(err, Error::Responder(_)));
    }

    #[test]
    fn test_responders_are_object_safe() {
        let responders: Vec<Box<dyn Responder>> = vec![
            Box::new(StaticResponder::new("a")),
            Box::new(responder_fn(|| Ok(Bytes::new()))),
        ];
        assert_eq!(responders.len(), 2);
    }
}
