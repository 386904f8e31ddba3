//! Hierarchy-derived permalinks for content records.
//!
//! A permalink is the normalized title of every record from the forest root
//! down to the target, joined by `/` and prefixed with the configured URL
//! prefix. Ancestors are fetched through a host-supplied [`ParentResolver`].

mod error;
/// Permalink options, defaults and legacy aliases.
pub mod options;
mod path_builder;
/// Record identifiers, the [`PathRecord`] trait and the JSON-backed [`Record`].
pub mod record;
mod resolver;
/// Title-to-segment normalization.
pub mod segment;
mod store;

pub use error::{PathError, StoreError};
pub use options::{PathOptions, PathOptionsPatch, UrlPrefix};
pub use path_builder::{build_path, build_path_blocking, build_path_with_cancel, PathBuilder};
pub use record::{PathRecord, Record, RecordId};
pub use resolver::{BlockingResolver, ParentResolver};
pub use segment::normalize_segment;
pub use store::MemoryStore;

// Token accepted by `build_path_with_cancel`.
pub use tokio_util::sync::CancellationToken;
