//! Parent-resolution capabilities supplied by the host data layer.

use async_trait::async_trait;

use crate::record::PathRecord;

/// Looks up a record's immediate parent.
///
/// Returns `Ok(None)` for roots. Implementations backed by a real store may
/// suspend on I/O; the builder awaits one call per ancestor level, in order.
#[async_trait]
pub trait ParentResolver<R>: Send + Sync
where
    R: PathRecord + Send + Sync,
{
    type Error: Send;

    async fn resolve_parent(&self, record: &R) -> Result<Option<R>, Self::Error>;
}

/// Synchronous twin of [`ParentResolver`] for hosts without an async runtime.
///
/// Closures `FnMut(&R) -> Result<Option<R>, E>` implement it directly.
pub trait BlockingResolver<R> {
    type Error;

    fn resolve_parent(&mut self, record: &R) -> Result<Option<R>, Self::Error>;
}

impl<R, E, F> BlockingResolver<R> for F
where
    F: FnMut(&R) -> Result<Option<R>, E>,
{
    type Error = E;

    fn resolve_parent(&mut self, record: &R) -> Result<Option<R>, E> {
        self(record)
    }
}
