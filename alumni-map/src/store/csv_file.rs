//! Flat-file record store
//!
//! All records live in one CSV file with header [`CSV_HEADER`]. Each mutation
//! reads the whole file, modifies it in memory and rewrites it through a
//! sibling temp file plus rename.
//!
//! The internal mutex serializes read-modify-write cycles within one process
//! only. Two processes sharing the same file can still lose each other's writes.

use alumni_common::{Coordinates, Error, Result, StudentFields, StudentRecord};
use async_trait::async_trait;
use serde::Deserialize;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::RecordStore;

/// Column order of the persisted file
pub const CSV_HEADER: [&str; 8] = [
    "id",
    "name",
    "location",
    "job_title",
    "linkedin_url",
    "image_url",
    "latitude",
    "longitude",
];

/// Row as found on disk; blank cells are tolerated
#[derive(Debug, Deserialize)]
struct StoredRow {
    id: String,
    name: String,
    location: String,
    #[serde(default)]
    job_title: String,
    #[serde(default)]
    linkedin_url: String,
    #[serde(default)]
    image_url: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    latitude: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    longitude: Option<f64>,
}

impl From<StoredRow> for StudentRecord {
    fn from(row: StoredRow) -> Self {
        StudentRecord {
            id: row.id,
            name: row.name,
            location: row.location,
            job_title: row.job_title,
            linkedin_url: row.linkedin_url,
            image_url: row.image_url,
            latitude: row.latitude.unwrap_or(Coordinates::UNRESOLVED.latitude),
            longitude: row.longitude.unwrap_or(Coordinates::UNRESOLVED.longitude),
        }
    }
}

/// Record store backed by a single CSV file
pub struct CsvFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file, creating it with only a header when absent
    ///
    /// Caller must hold `self.lock`.
    async fn read_records(&self) -> Result<Vec<StudentRecord>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => decode_records(&bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "Record file missing, initializing empty store");
                self.write_records(&[]).await?;
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the file contents with `records`
    ///
    /// Caller must hold `self.lock`.
    async fn write_records(&self, records: &[StudentRecord]) -> Result<()> {
        let bytes = encode_records(records)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp_path = temp_path(&self.path);
        tokio::fs::write(&tmp_path, bytes).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        debug!(path = %self.path.display(), count = records.len(), "Record file written");
        Ok(())
    }
}

#[async_trait]
impl RecordStore for CsvFileStore {
    fn backend_name(&self) -> &'static str {
        "csv"
    }

    async fn load_all(&self) -> Result<Vec<StudentRecord>> {
        let _guard = self.lock.lock().await;
        self.read_records().await
    }

    async fn append(&self, records: Vec<StudentRecord>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let _guard = self.lock.lock().await;
        let mut all = self.read_records().await?;
        all.extend(records);
        self.write_records(&all).await
    }

    async fn update_by_id(
        &self,
        id: &str,
        fields: &StudentFields,
        coordinates: Coordinates,
    ) -> Result<StudentRecord> {
        let _guard = self.lock.lock().await;
        let mut all = self.read_records().await?;

        let record = all
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::NotFound(format!("Student {}", id)))?;
        record.apply(fields, coordinates);
        let updated = record.clone();

        self.write_records(&all).await?;
        Ok(updated)
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut all = self.read_records().await?;

        let before = all.len();
        all.retain(|r| r.id != id);
        if all.len() == before {
            return Ok(false);
        }

        self.write_records(&all).await?;
        Ok(true)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("students.csv"));
    name.push(".tmp");
    path.with_file_name(name)
}

fn decode_records(bytes: &[u8]) -> Result<Vec<StudentRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let mut records = Vec::new();
    for row in reader.deserialize::<StoredRow>() {
        records.push(row?.into());
    }
    Ok(records)
}

fn encode_records(records: &[StudentRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }

    writer
        .into_inner()
        .map_err(|e| Error::Internal(format!("Failed to flush record file buffer: {}", e)))
}
