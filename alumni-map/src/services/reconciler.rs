//! Import reconciler
//!
//! Merges normalized rows with geocoded coordinates into new student records
//! and commits them to the record store in one batch. Also hosts the
//! single-record create/update paths, which share the same geocoding policy.

use alumni_common::{Coordinates, Result, StudentFields, StudentRecord};
use std::sync::Arc;
use tracing::{debug, info};

use super::geocoder::{resolve_or_sentinel, Geocoder};
use super::normalizer::{normalize, RawImportRow, REQUIRED_COLUMNS};
use super::ImportError;
use crate::store::RecordStore;

/// Output of the row filtering stage
#[derive(Debug, Default)]
pub struct RowPartition {
    /// Rows with non-blank name and location, in input order
    pub accepted: Vec<StudentFields>,
    /// Rows dropped for a blank or absent name/location
    pub skipped: usize,
}

/// Split rows into importable fields and a skipped count
///
/// Cell values are trimmed; absent optional columns become empty strings.
pub fn partition_rows(rows: Vec<RawImportRow>) -> RowPartition {
    let mut partition = RowPartition::default();

    for row in rows {
        let cell = |column: &str| row.get(column).map(str::trim).unwrap_or_default().to_string();

        let name = cell("name");
        let location = cell("location");
        if name.is_empty() || location.is_empty() {
            partition.skipped += 1;
            continue;
        }

        partition.accepted.push(StudentFields {
            name,
            location,
            job_title: cell("job_title"),
            linkedin_url: cell("linkedin_url"),
            image_url: cell("image_url"),
        });
    }

    partition
}

/// Orchestrates geocoding and record store writes
pub struct Reconciler {
    geocoder: Arc<dyn Geocoder>,
    store: Arc<dyn RecordStore>,
}

impl Reconciler {
    pub fn new(geocoder: Arc<dyn Geocoder>, store: Arc<dyn RecordStore>) -> Self {
        Self { geocoder, store }
    }

    async fn coordinates_for(&self, location: &str) -> Coordinates {
        resolve_or_sentinel(self.geocoder.as_ref(), location).await
    }

    /// Import CSV bytes: normalize, then [`Self::import_rows`]
    ///
    /// Format and schema failures abort before anything is written.
    pub async fn import_csv(&self, raw: &[u8]) -> std::result::Result<usize, ImportError> {
        let rows = normalize(raw, &REQUIRED_COLUMNS)?;
        Ok(self.import_rows(rows).await?)
    }

    /// Create one record per valid row and append them in a single call
    ///
    /// Returns the number of records created. Rows are geocoded sequentially
    /// in input order; an empty batch leaves the store untouched.
    pub async fn import_rows(&self, rows: Vec<RawImportRow>) -> Result<usize> {
        let total = rows.len();
        let RowPartition { accepted, skipped } = partition_rows(rows);

        let mut batch = Vec::with_capacity(accepted.len());
        for fields in accepted {
            let coordinates = self.coordinates_for(&fields.location).await;
            let record = StudentRecord::new(self.store.generate_id(), fields, coordinates);
            debug!(id = %record.id, name = %record.name, "Prepared imported record");
            batch.push(record);
        }

        let imported = batch.len();
        if !batch.is_empty() {
            self.store.append(batch).await?;
        }

        info!(total, imported, skipped, "Import finished");
        Ok(imported)
    }

    /// Create a single record from request fields
    pub async fn create_student(&self, fields: StudentFields) -> Result<StudentRecord> {
        fields.validate()?;

        let coordinates = self.coordinates_for(&fields.location).await;
        let record = StudentRecord::new(self.store.generate_id(), fields, coordinates);
        self.store.append(vec![record.clone()]).await?;

        info!(id = %record.id, name = %record.name, "Student created");
        Ok(record)
    }

    /// Overwrite a record, re-geocoding its location unconditionally
    ///
    /// Unknown ids fail with `Error::NotFound` before any geocoding call.
    pub async fn update_student(&self, id: &str, fields: StudentFields) -> Result<StudentRecord> {
        fields.validate()?;

        if self.store.find_by_id(id).await?.is_none() {
            return Err(alumni_common::Error::NotFound(format!("Student {}", id)));
        }

        let coordinates = self.coordinates_for(&fields.location).await;
        let record = self.store.update_by_id(id, &fields, coordinates).await?;

        info!(id = %record.id, "Student updated");
        Ok(record)
    }
}
