//! Common test utilities for integration tests using Testcontainers.
//!
//! A single MongoDB 7.0 container is shared per test binary. Per-test isolation
//! comes from namespacing every database name with a short UUID suffix.
//!
//! The exporter blocks on its own runtime, so these helpers are synchronous:
//! the container lives on a dedicated background thread, and seeding runs on
//! a throwaway current-thread runtime.
//!
//! An `atexit` hook ensures the container is removed when the process exits.

#![allow(dead_code)]

pub mod fixtures;

use std::sync::OnceLock;

use mongodb::bson::Document;
use mongodb::{Client, options::ClientOptions};
use testcontainers::ImageExt;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::mongo::Mongo;

static CONNECTION_STRING: OnceLock<String> = OnceLock::new();

/// Docker container ID, stored globally so the `atexit` handler can remove it.
static CONTAINER_ID: OnceLock<String> = OnceLock::new();

unsafe extern "C" {
    fn atexit(f: extern "C" fn()) -> i32;
}

/// Called by the C runtime on process exit. Forcibly removes the shared container.
extern "C" fn remove_container() {
    if let Some(id) = CONTAINER_ID.get() {
        let _ = std::process::Command::new("docker")
            .args(["rm", "-f", id])
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status();
    }
}

/// Start the shared container once per test binary and return its URL.
fn shared_connection_string() -> &'static str {
    CONNECTION_STRING.get_or_init(|| {
        let (tx, rx) = std::sync::mpsc::sync_channel(1);

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to create container runtime");

            rt.block_on(async {
                let container = Mongo::default()
                    .with_tag("7.0")
                    .start()
                    .await
                    .expect("Failed to start MongoDB container");

                let _ = CONTAINER_ID.set(container.id().to_string());
                unsafe {
                    atexit(remove_container);
                }

                let host = container.get_host().await.expect("Failed to get host");
                let port = container.get_host_port_ipv4(27017).await.expect("Failed to get port");
                let connection_string = format!("mongodb://{}:{}", host, port);

                // Readiness probe
                let opts = ClientOptions::parse(&connection_string).await.expect("Failed to parse");
                let probe = Client::with_options(opts).expect("Failed to create probe client");
                for _ in 0..30 {
                    if probe.list_database_names().await.is_ok() {
                        break;
                    }
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                }
                drop(probe);

                tx.send(connection_string).expect("Failed to send connection string");

                // Park forever so the container outlives every test.
                std::future::pending::<()>().await;
            });
        });

        rx.recv().expect("Failed to receive connection string")
    })
}

/// Handle to the shared container with a per-test database namespace.
pub struct MongoTestContainer {
    pub connection_string: String,
    test_id: String,
}

impl MongoTestContainer {
    pub fn start() -> Self {
        let connection_string = shared_connection_string().to_string();
        let test_id = uuid::Uuid::new_v4().to_string()[..8].to_string();
        Self { connection_string, test_id }
    }

    /// Namespaced database name for this test.
    pub fn db_name(&self, name: &str) -> String {
        format!("{}_{}", name, self.test_id)
    }

    /// Insert `docs` into `db.collection` (namespaced), preserving order.
    pub fn seed(&self, db: &str, collection: &str, docs: Vec<Document>) {
        let db_name = self.db_name(db);
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to create seed runtime");

        rt.block_on(async {
            let client = Client::with_uri_str(&self.connection_string)
                .await
                .expect("Failed to create seed client");
            let coll = client.database(&db_name).collection::<Document>(collection);
            if docs.is_empty() {
                client
                    .database(&db_name)
                    .create_collection(collection)
                    .await
                    .expect("Failed to create collection");
            } else {
                coll.insert_many(docs).await.expect("Failed to seed documents");
            }
        });
    }

    /// Count documents in `db.collection` (namespaced).
    pub fn count(&self, db: &str, collection: &str) -> u64 {
        let db_name = self.db_name(db);
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to create count runtime");

        rt.block_on(async {
            let client = Client::with_uri_str(&self.connection_string)
                .await
                .expect("Failed to create count client");
            client
                .database(&db_name)
                .collection::<Document>(collection)
                .count_documents(mongodb::bson::doc! {})
                .await
                .expect("Failed to count")
        })
    }
}
