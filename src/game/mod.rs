//! Game Module
//!
//! Game-level systems built on the engine: configuration, photo capture, the
//! journal panel and the desk scene.

pub mod capture;
pub mod config;
pub mod desk_scene;
pub mod journal;

pub use capture::{
    CAPTURE_FILE_FORMAT, CaptureError, CaptureRequest, CapturedPhoto, capture_file_name,
};
pub use config::{ConfigError, GameConfig, JournalTuning, SceneConfig, ZoneConfig};
pub use desk_scene::{DeskScene, SceneFrame};
pub use journal::{
    InboxEntry, JournalAction, JournalDrop, JournalError, JournalKey, JournalLayout, PageBook,
    PlayerJournal,
};
