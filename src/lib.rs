//! Library storage for a manga/anime reading and tracking client.
//!
//! The core is the library view: favorite items with their unread/read
//! (unseen/seen) counts, one row per category link. See
//! [`storage::queries::get_library`].

pub mod config;
pub mod error;
pub mod logging;
pub mod storage;

pub use config::Config;
pub use error::{Result, TrackerError};
pub use storage::{Database, LibraryEntry, MediaKind};
