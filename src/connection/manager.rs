//! ConnectionManager: the process-shared MongoDB client and name resolution.

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::OnceLock;

use mongodb::bson::{Document, doc};
use mongodb::options::{ClientOptions, Tls};
use mongodb::{Client, Collection, Database};
use parking_lot::Mutex;
use tokio::runtime::Runtime;

use crate::config::ConnectionSettings;
use crate::error::{Error, Result, ResultExt};

/// Consulted for a CA bundle when the settings do not name one
const CA_BUNDLE_ENV: &str = "SSL_CERT_FILE";

const APP_NAME: &str = "mongoframe";

/// Owns the single MongoDB client shared by every exporter in the process.
///
/// Build one at startup and hand it around behind an `Arc`. The client is
/// created on the first `handle()` call and lives as long as the manager.
pub struct ConnectionManager {
    /// Tokio runtime for MongoDB async operations
    pub(crate) runtime: Runtime,
    settings: ConnectionSettings,
    client: OnceLock<Client>,
    /// Serializes first-time connection attempts
    init: Mutex<()>,
}

impl ConnectionManager {
    /// Create a manager; no connection is attempted until `handle()`.
    pub fn new(settings: ConnectionSettings) -> Result<Self> {
        let runtime = Runtime::new()?;
        Ok(Self { runtime, settings, client: OnceLock::new(), init: Mutex::new(()) })
    }

    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    /// Whether the shared client has been established yet
    pub fn is_connected(&self) -> bool {
        self.client.get().is_some()
    }

    /// Return the shared client, establishing it on first use.
    ///
    /// Concurrent first callers serialize on the init lock: exactly one of them
    /// connects and all of them receive the same instance. A failed attempt
    /// caches nothing, so the next call tries again from scratch. Once a client
    /// exists it is returned as-is, without re-validation.
    pub fn handle(&self) -> Result<&Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }

        let _guard = self.init.lock();
        if let Some(client) = self.client.get() {
            return Ok(client);
        }

        let client = self.establish()?;
        Ok(self.client.get_or_init(|| client))
    }

    /// Named database reached through `client`. Pure lookup; the database need not exist.
    pub fn resolve_database(client: &Client, name: &str) -> Database {
        client.database(name)
    }

    /// Named collection within `database`. Same semantics as `resolve_database`.
    pub fn resolve_collection(
        client: &Client,
        database: &str,
        collection: &str,
    ) -> Collection<Document> {
        Self::resolve_database(client, database).collection::<Document>(collection)
    }

    fn connection_url(&self) -> Result<String> {
        if let Some(url) = self.settings.url.as_deref().filter(|url| !url.trim().is_empty()) {
            return Ok(url.to_string());
        }

        let key = &self.settings.url_env;
        match std::env::var(key) {
            Ok(url) if !url.trim().is_empty() => Ok(url),
            Ok(_) => Err(Error::configuration(format!("Environment variable '{key}' is empty"))),
            Err(_) => Err(Error::configuration(format!("Environment variable '{key}' is not set"))),
        }
    }

    fn establish(&self) -> Result<Client> {
        let url = self.connection_url()?;
        let ca_bundle = trusted_ca_bundle(&self.settings, std::env::var_os(CA_BUNDLE_ENV));
        let connect_timeout = self.settings.connect_timeout();
        let verify = self.settings.verify_connection;

        self.runtime.block_on(async move {
            let mut options = ClientOptions::parse(&url).await.or_connection()?;
            options.app_name = Some(APP_NAME.to_string());
            if let Some(timeout) = connect_timeout {
                options.connect_timeout = Some(timeout);
                options.server_selection_timeout = Some(timeout);
            }
            if let Some(path) = ca_bundle {
                apply_ca_bundle(&mut options, path);
            }

            let client = Client::with_options(options).or_connection()?;

            if verify {
                client.database("admin").run_command(doc! { "ping": 1 }).await.or_connection()?;
                log::info!("MongoDB connection successful");
            } else {
                log::info!("MongoDB client created without verification");
            }

            Ok(client)
        })
    }
}

/// CA bundle from the settings, else the `SSL_CERT_FILE` value when it names a file.
/// `None` leaves the driver on its bundled root store.
fn trusted_ca_bundle(
    settings: &ConnectionSettings,
    env_bundle: Option<OsString>,
) -> Option<PathBuf> {
    let bundle = settings
        .tls_ca_file
        .clone()
        .or_else(|| env_bundle.map(PathBuf::from).filter(|path| path.is_file()));
    if let Some(path) = &bundle {
        log::debug!("Using CA bundle {}", path.display());
    }
    bundle
}

/// Attach the CA bundle when TLS is enabled (SRV URLs enable it while parsing).
/// A `tlsCAFile` already in the URL wins.
fn apply_ca_bundle(options: &mut ClientOptions, path: PathBuf) {
    if let Some(Tls::Enabled(tls)) = options.tls.as_mut()
        && tls.ca_file_path.is_none()
    {
        tls.ca_file_path = Some(path);
    }
}
