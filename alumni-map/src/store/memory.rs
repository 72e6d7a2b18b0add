//! Process-local record store

use alumni_common::{Coordinates, Error, Result, StudentFields, StudentRecord};
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::RecordStore;

/// Record store kept in memory; contents are lost on restart
#[derive(Default)]
pub struct InMemoryStore {
    records: RwLock<Vec<StudentRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `records`
    pub fn with_records(records: Vec<StudentRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn load_all(&self) -> Result<Vec<StudentRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn append(&self, records: Vec<StudentRecord>) -> Result<()> {
        self.records.write().await.extend(records);
        Ok(())
    }

    async fn update_by_id(
        &self,
        id: &str,
        fields: &StudentFields,
        coordinates: Coordinates,
    ) -> Result<StudentRecord> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::NotFound(format!("Student {}", id)))?;
        record.apply(fields, coordinates);
        Ok(record.clone())
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str) -> StudentRecord {
        StudentRecord::new(id, StudentFields::new(name, "Paris"), Coordinates::new(48.8, 2.3))
    }

    #[tokio::test]
    async fn test_append_preserves_order() {
        let store = InMemoryStore::new();
        store.append(vec![record("1", "A"), record("2", "B")]).await.unwrap();
        store.append(vec![record("3", "C")]).await.unwrap();

        let ids: Vec<String> = store.load_all().await.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_update_unknown_id_not_found() {
        let store = InMemoryStore::with_records(vec![record("1", "A")]);
        let err = store
            .update_by_id("missing", &StudentFields::new("X", "Y"), Coordinates::UNRESOLVED)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_noop() {
        let store = InMemoryStore::with_records(vec![record("1", "A")]);
        assert!(!store.delete_by_id("missing").await.unwrap());
        assert_eq!(store.load_all().await.unwrap().len(), 1);

        assert!(store.delete_by_id("1").await.unwrap());
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let store = InMemoryStore::with_records(vec![record("1", "A"), record("2", "B")]);
        assert_eq!(store.find_by_id("2").await.unwrap().unwrap().name, "B");
        assert!(store.find_by_id("3").await.unwrap().is_none());
    }
}
