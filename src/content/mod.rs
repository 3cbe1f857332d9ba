//! Content Module
//!
//! Static quest seeds and hint tables, loaded from TOML.

pub mod definition;
pub mod registry;

pub use definition::{QuestSeed, RawContentFile, RawQuest};
pub use registry::{CONTENT_FILE, ContentRegistry};
