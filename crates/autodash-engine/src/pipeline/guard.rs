//! Generation ids for discarding stale remote responses.
//!
//! Every local regeneration and every remote request advances a shared
//! counter. A remote request carries the id it was issued with as a
//! [`RemoteTicket`]; when the response arrives it may only be applied if no
//! newer generation has started since.
//!
//! # Example
//!
//! ```rust,ignore
//! use autodash_engine::pipeline::GenerationGuard;
//!
//! let guard = GenerationGuard::new();
//! let ticket = guard.issue();
//!
//! // user changes a filter while the request is in flight
//! guard.advance();
//!
//! assert!(!guard.is_current(&ticket));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared monotonically increasing generation counter.
///
/// Clones share the same counter, so a clone can be moved into the task
/// awaiting the remote response.
#[derive(Debug, Clone, Default)]
pub struct GenerationGuard {
    latest: Arc<AtomicU64>,
}

/// Id of the generation a remote request was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RemoteTicket {
    generation: u64,
}

static_assertions::assert_impl_all!(GenerationGuard: Send, Sync);
static_assertions::assert_impl_all!(RemoteTicket: Send, Sync);

impl GenerationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation and return its id.
    pub fn advance(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Start a new generation on behalf of a remote request.
    pub fn issue(&self) -> RemoteTicket {
        RemoteTicket {
            generation: self.advance(),
        }
    }

    /// Id of the most recent generation.
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Whether nothing has superseded `ticket`.
    pub fn is_current(&self, ticket: &RemoteTicket) -> bool {
        self.latest() == ticket.generation
    }
}

impl RemoteTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
