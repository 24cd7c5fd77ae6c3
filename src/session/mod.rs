//! Document session state
//!
//! The fixed set of documents opened together, and what is currently
//! known about each of them: synced annotations, local copies, and the
//! lesson's media flags.

mod state;

pub use state::{is_path_component, DocumentRef, DocumentSession, LessonDocument};
