//! Cache-or-refresh resolution of per-owner resource snapshots.
//!
//! Reads of upstream resources (videos, comment threads, playlists) go through
//! a [`Resolver`], which decides between serving the last persisted snapshot
//! and fetching fresh data from upstream.
//!
//! # Architecture
//! - **Requests** are validated up front ([`Request`]): owner identity first,
//!   then resource id and limit. Invalid input never reaches I/O.
//! - **Snapshots** are keyed by owner, resource kind and resource id. The
//!   [`SnapshotStore`] keeps at most one per key and overwrites it whole.
//! - **Upstream** is anything implementing [`Upstream`] for a [`Resource`]
//!   kind. Its failures are surfaced, never papered over with stale data.

pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod request;
mod resolve;
mod resource;
mod snapshot;
pub mod store;
pub mod upstream;

pub use crate::request::{DEFAULT_LIMIT, Limit, Limits, MAX_LIMIT, MIN_LIMIT, OwnerId, Request, ResourceId};
pub use crate::resolve::{Resolved, Resolver, Source};
pub use crate::resource::{Payload, Resource};
pub use crate::snapshot::{Snapshot, SnapshotKey, StoredSnapshot};
pub use crate::store::{SnapshotStore, StoreHandle};
pub use crate::upstream::{Fetched, Upstream, UpstreamHandle};
