//! Annotation sync
//!
//! Keeps a reading session's annotations consistent with a remote store.
//!
//! # Protocol
//!
//! 1. On start, one pull subscription per document, keyed by
//!    (lesson key, document id)
//! 2. Every set the store emits replaces that document's slot and emits the
//!    document's position on the update channel
//! 3. On save, the live document is extracted and the full page list is
//!    pushed; the store replaces whatever it held for that key
//!
//! Pushes always carry the complete list, never a delta, so repeating a
//! push is harmless.
//!
//! # Failure handling
//!
//! - A failing document pull is retried, then abandoned, without touching
//!   other documents
//! - Push failures are logged and otherwise ignored
//! - Media and download failures degrade to "unavailable" / fewer files

mod coordinator;
mod memory;
mod traits;

pub use coordinator::{Collaborators, ReadingSession, SessionUpdates};
pub use memory::InMemoryAnnotationStore;
pub use traits::{PullStream, RemoteAnnotationStore};
