//! Media catalog and sequential playback dispatch for voxplay.

pub mod catalog;
pub mod dispatcher;

pub use catalog::{load_from_dir, CatalogStore};
pub use dispatcher::{AppliedAction, Dispatcher, PlaybackUpdate, Provenance};
