//! SkillAPI Editor
//!
//! The editor session over the domain model, the ports it is wired
//! through, their concrete adapters, and a headless host that converts a
//! plugin data directory into the editor's save format.

pub mod adapters;
pub mod config;
pub mod editor;
pub mod error;
pub mod host;
pub mod ports;
pub mod telemetry;

pub use config::EditorConfig;
pub use editor::{Editor, EditorPorts, LoadReport, Pane};
pub use error::EditorError;
pub use ports::{DocumentParser, EntityListView, MaterialCatalog, SaveSink};
