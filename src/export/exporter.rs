//! CollectionExporter: full-collection read into a cleansed `RecordSet`.

use std::sync::Arc;

use crate::config::ExportSettings;
use crate::connection::ConnectionManager;
use crate::error::{Error, Result};
use crate::export::RecordSet;

/// Exports whole collections as record sets through a shared `ConnectionManager`
#[derive(Clone)]
pub struct CollectionExporter {
    manager: Arc<ConnectionManager>,
    database: String,
}

impl CollectionExporter {
    /// Exporter reading from `database` unless a call overrides it.
    /// The connection is only established by the first export.
    pub fn new(manager: Arc<ConnectionManager>, database: impl Into<String>) -> Self {
        Self { manager, database: database.into() }
    }

    /// Build a fresh manager from `settings` and an exporter on top of it.
    pub fn from_settings(settings: &ExportSettings) -> Result<Self> {
        let manager = ConnectionManager::new(settings.connection.clone())?;
        Ok(Self::new(Arc::new(manager), settings.database.clone()))
    }

    pub fn manager(&self) -> &Arc<ConnectionManager> {
        &self.manager
    }

    pub fn default_database(&self) -> &str {
        &self.database
    }

    /// Read every document of `collection` and return the cleansed record set.
    ///
    /// `database` overrides the exporter's default database for this call.
    /// The source collection is never modified. On any failure no partial
    /// result is returned.
    pub fn export(&self, collection: &str, database: Option<&str>) -> Result<RecordSet> {
        if collection.is_empty() {
            return Err(Error::InvalidArgument("collection name must not be empty".into()));
        }

        let client = self.manager.handle()?;
        let database = database.unwrap_or(&self.database);
        let coll = ConnectionManager::resolve_collection(client, database, collection);

        log::info!("Fetching data from MongoDB collection {database}.{collection}");
        let docs = self.manager.find_all(&coll)?;
        log::info!("Data fetched with len: {}", docs.len());

        Ok(RecordSet::from_documents(docs))
    }
}
