//! Read operations against the shared client.

use futures::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::{Document, doc};

use crate::connection::ConnectionManager;
use crate::error::{Error, Result, ResultExt};

impl ConnectionManager {
    /// Read every document of a collection in server order (runs in Tokio runtime).
    ///
    /// Unfiltered and unprojected. The whole result set is materialized; a failure
    /// part-way through the cursor discards what was read so far. An elapsed
    /// query timeout is reported as a `Query` error like any other read failure.
    pub fn find_all(&self, collection: &Collection<Document>) -> Result<Vec<Document>> {
        let namespace = collection.namespace().to_string();
        let query_timeout = self.settings().query_timeout();

        self.runtime.block_on(async move {
            let fetch = async {
                let cursor = collection.find(doc! {}).await?;
                cursor.try_collect::<Vec<Document>>().await
            };

            match query_timeout {
                Some(timeout) => match tokio::time::timeout(timeout, fetch).await {
                    Ok(result) => result.or_query(&namespace),
                    Err(_) => Err(Error::query_timeout(&namespace, timeout)),
                },
                None => fetch.await.or_query(&namespace),
            }
        })
    }
}
