//! Derives permalink paths by walking a record's ancestor chain.

use std::collections::{HashSet, VecDeque};

use tokio_util::sync::CancellationToken;

use crate::error::PathError;
use crate::options::PathOptions;
use crate::record::{PathRecord, RecordId};
use crate::resolver::{BlockingResolver, ParentResolver};
use crate::segment::normalize_segment;

/// Builds permalinks with a fixed set of options.
///
/// Holds no state between calls; concurrent builds for different records
/// are independent.
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    options: PathOptions,
}

impl PathBuilder {
    pub fn new(options: PathOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PathOptions {
        &self.options
    }

    pub async fn build<R, P>(&self, record: &R, resolver: &P) -> Result<String, PathError<P::Error>>
    where
        R: PathRecord + Send + Sync,
        P: ParentResolver<R> + ?Sized,
    {
        build_path(record, resolver, &self.options).await
    }

    pub async fn build_with_cancel<R, P>(
        &self,
        record: &R,
        resolver: &P,
        cancel: &CancellationToken,
    ) -> Result<String, PathError<P::Error>>
    where
        R: PathRecord + Send + Sync,
        P: ParentResolver<R> + ?Sized,
    {
        build_path_with_cancel(record, resolver, &self.options, cancel).await
    }

    pub fn build_blocking<R, B>(
        &self,
        record: &R,
        resolver: &mut B,
    ) -> Result<String, PathError<B::Error>>
    where
        R: PathRecord,
        B: BlockingResolver<R> + ?Sized,
    {
        build_path_blocking(record, resolver, &self.options)
    }
}

/// Build the permalink for `record`, resolving ancestors through `resolver`.
pub async fn build_path<R, P>(
    record: &R,
    resolver: &P,
    options: &PathOptions,
) -> Result<String, PathError<P::Error>>
where
    R: PathRecord + Send + Sync,
    P: ParentResolver<R> + ?Sized,
{
    walk_async(record, resolver, options, None).await
}

/// Like [`build_path`], but stops with [`PathError::Cancelled`] once `cancel`
/// fires. The token is checked before every resolver call.
pub async fn build_path_with_cancel<R, P>(
    record: &R,
    resolver: &P,
    options: &PathOptions,
    cancel: &CancellationToken,
) -> Result<String, PathError<P::Error>>
where
    R: PathRecord + Send + Sync,
    P: ParentResolver<R> + ?Sized,
{
    walk_async(record, resolver, options, Some(cancel)).await
}

/// Synchronous [`build_path`].
pub fn build_path_blocking<R, B>(
    record: &R,
    resolver: &mut B,
    options: &PathOptions,
) -> Result<String, PathError<B::Error>>
where
    R: PathRecord,
    B: BlockingResolver<R> + ?Sized,
{
    let mut walk = Walk::new(options);
    walk.visit(record)?;
    let mut parent = resolver
        .resolve_parent(record)
        .map_err(PathError::Resolution)?;
    while let Some(current) = parent {
        walk.visit(&current)?;
        parent = resolver
            .resolve_parent(&current)
            .map_err(PathError::Resolution)?;
    }
    Ok(walk.finish())
}

async fn walk_async<R, P>(
    record: &R,
    resolver: &P,
    options: &PathOptions,
    cancel: Option<&CancellationToken>,
) -> Result<String, PathError<P::Error>>
where
    R: PathRecord + Send + Sync,
    P: ParentResolver<R> + ?Sized,
{
    let mut walk = Walk::new(options);
    walk.visit(record)?;
    let mut parent = next_parent(record, resolver, cancel).await?;
    while let Some(current) = parent {
        walk.visit(&current)?;
        parent = next_parent(&current, resolver, cancel).await?;
    }
    Ok(walk.finish())
}

async fn next_parent<R, P>(
    record: &R,
    resolver: &P,
    cancel: Option<&CancellationToken>,
) -> Result<Option<R>, PathError<P::Error>>
where
    R: PathRecord + Send + Sync,
    P: ParentResolver<R> + ?Sized,
{
    if cancel.is_some_and(CancellationToken::is_cancelled) {
        tracing::debug!(record = %record.record_id(), "permalink build cancelled");
        return Err(PathError::Cancelled);
    }
    resolver
        .resolve_parent(record)
        .await
        .map_err(PathError::Resolution)
}

/// Traversal state for one build: segments root-first plus the ids seen so far.
struct Walk<'o> {
    options: &'o PathOptions,
    segments: VecDeque<String>,
    visited: HashSet<RecordId>,
    chain: Vec<RecordId>,
}

impl<'o> Walk<'o> {
    fn new(options: &'o PathOptions) -> Self {
        Self {
            options,
            segments: VecDeque::new(),
            visited: HashSet::new(),
            chain: Vec::new(),
        }
    }

    fn visit<R, E>(&mut self, record: &R) -> Result<(), PathError<E>>
    where
        R: PathRecord + ?Sized,
    {
        let id = record.record_id();
        // Stores treat `3` and `"3"` as one record, so a repeat may come back
        // in the other representation.
        let seen = self.visited.contains(&id)
            || id
                .alternate()
                .is_some_and(|alternate| self.visited.contains(&alternate));
        if seen {
            tracing::warn!(record = %id, depth = self.chain.len(), "cycle in ancestor chain");
            return Err(PathError::CycleDetected {
                id,
                chain: std::mem::take(&mut self.chain),
            });
        }
        self.visited.insert(id.clone());

        let segment = record
            .title(&self.options.title_field)
            .map(|title| normalize_segment(&title))
            .unwrap_or_default();
        tracing::debug!(record = %id, segment = %segment, "visited ancestor");
        self.chain.push(id);
        self.segments.push_front(segment);
        Ok(())
    }

    fn finish(self) -> String {
        let segments: Vec<String> = self
            .segments
            .into_iter()
            .filter(|segment| !segment.is_empty())
            .collect();
        if segments.is_empty() {
            return self.options.placeholder.clone();
        }
        format!("{}{}", self.options.url_prefix.as_str(), segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use std::convert::Infallible;

    fn root_only(_: &Record) -> Result<Option<Record>, Infallible> {
        Ok(None)
    }

    #[test]
    fn test_walk_elides_empty_segments() {
        let options = PathOptions::default();
        let mut walk = Walk::new(&options);
        walk.visit::<_, Infallible>(&Record::new(3).with_field("title", "Team"))
            .unwrap();
        walk.visit::<_, Infallible>(&Record::new(2).with_field("title", ""))
            .unwrap();
        walk.visit::<_, Infallible>(&Record::new(1).with_field("title", "Home"))
            .unwrap();
        assert_eq!(walk.finish(), "/home/team");
    }

    #[test]
    fn test_walk_rejects_repeat() {
        let options = PathOptions::default();
        let mut walk = Walk::new(&options);
        walk.visit::<_, Infallible>(&Record::new(1)).unwrap();
        walk.visit::<_, Infallible>(&Record::new(2)).unwrap();
        let err = walk.visit::<_, Infallible>(&Record::new(1)).unwrap_err();
        match err {
            PathError::CycleDetected { id, chain } => {
                assert_eq!(id, RecordId::Int(1));
                assert_eq!(chain, vec![RecordId::Int(1), RecordId::Int(2)]);
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_walk_rejects_repeat_in_other_representation() {
        let options = PathOptions::default();
        let mut walk = Walk::new(&options);
        walk.visit::<_, Infallible>(&Record::new("7")).unwrap();
        let err = walk.visit::<_, Infallible>(&Record::new(7)).unwrap_err();
        assert!(err.is_cycle());

        let mut walk = Walk::new(&options);
        walk.visit::<_, Infallible>(&Record::new("07")).unwrap();
        walk.visit::<_, Infallible>(&Record::new(7)).unwrap();
    }

    #[test]
    fn test_placeholder_ignores_prefix() {
        let options = PathOptions::default()
            .with_url_prefix("/site/")
            .with_placeholder("pending");
        let record = Record::new(1);
        let mut resolver = root_only;
        assert_eq!(
            build_path_blocking(&record, &mut resolver, &options).unwrap(),
            "pending"
        );
    }

    #[test]
    fn test_custom_title_field() {
        let options = PathOptions::default().with_title_field("name");
        let record = Record::new(1)
            .with_field("title", "Ignored")
            .with_field("name", "Products");
        let mut resolver = root_only;
        assert_eq!(
            build_path_blocking(&record, &mut resolver, &options).unwrap(),
            "/products"
        );
    }

    #[test]
    fn test_no_trailing_slash() {
        let options = PathOptions::default();
        let record = Record::new(1).with_field("title", "Docs /");
        let mut resolver = root_only;
        assert_eq!(
            build_path_blocking(&record, &mut resolver, &options).unwrap(),
            "/docs"
        );
    }

    #[test]
    fn test_builder_keeps_options() {
        let builder = PathBuilder::new(PathOptions::default().with_url_prefix(false));
        let record = Record::new(1).with_field("title", "Blog");
        let mut resolver = root_only;
        assert_eq!(builder.build_blocking(&record, &mut resolver).unwrap(), "blog");
        assert_eq!(builder.options().url_prefix.as_str(), "");
    }
}
