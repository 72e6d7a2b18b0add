//! Record store: durable collection of student records
//!
//! Every operation works on the whole collection. Backends are swappable
//! behind [`RecordStore`]; the reconciler and HTTP layer only see the trait.

use alumni_common::config::{ServiceConfig, StoreBackend};
use alumni_common::{uuid_utils, Coordinates, Result, StudentFields, StudentRecord};
use async_trait::async_trait;
use std::sync::Arc;

mod csv_file;
mod memory;

pub use csv_file::{CsvFileStore, CSV_HEADER};
pub use memory::InMemoryStore;

/// Whole-collection record store
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Backend identifier for logging
    fn backend_name(&self) -> &'static str;

    /// Load every record, initializing empty persisted state if none exists
    async fn load_all(&self) -> Result<Vec<StudentRecord>>;

    /// Append records after the existing ones; an empty batch is a no-op
    async fn append(&self, records: Vec<StudentRecord>) -> Result<()>;

    /// Overwrite all mutable fields of the record with `id`
    ///
    /// Fails with `Error::NotFound` when no such record exists.
    async fn update_by_id(
        &self,
        id: &str,
        fields: &StudentFields,
        coordinates: Coordinates,
    ) -> Result<StudentRecord>;

    /// Remove the record with `id`
    ///
    /// Returns `false` (not an error) when the id is unknown.
    async fn delete_by_id(&self, id: &str) -> Result<bool>;

    async fn find_by_id(&self, id: &str) -> Result<Option<StudentRecord>> {
        Ok(self.load_all().await?.into_iter().find(|r| r.id == id))
    }

    /// Fresh opaque identifier for a new record
    fn generate_id(&self) -> String {
        uuid_utils::generate_id()
    }
}

/// Build the store selected by configuration
pub fn open_store(config: &ServiceConfig) -> Arc<dyn RecordStore> {
    match config.store.backend {
        StoreBackend::Csv => Arc::new(CsvFileStore::new(&config.data_file)),
        StoreBackend::Memory => Arc::new(InMemoryStore::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_store_backend_selection() {
        let mut config = ServiceConfig::default();
        assert_eq!(open_store(&config).backend_name(), "csv");

        config.store.backend = StoreBackend::Memory;
        assert_eq!(open_store(&config).backend_name(), "memory");
    }
}
