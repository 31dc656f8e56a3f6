//! Export MongoDB collections as cleansed, column-oriented record sets.
//!
//! A single [`ConnectionManager`] owns the process-shared client; any number of
//! [`CollectionExporter`]s read through it.

pub mod config;
pub mod connection;
pub mod error;
pub mod export;

pub use config::{ConnectionSettings, ExportSettings, SettingsStore};
pub use connection::ConnectionManager;
pub use error::{Error, QueryFailure, Result};
pub use export::{CollectionExporter, RecordSet, Row};
