//! Student record models
//!
//! A [`StudentRecord`] is the only persisted entity. [`StudentFields`] is the
//! caller-supplied subset used by create/update requests, and [`Coordinates`]
//! carries the geocoded position (or the unresolved sentinel).

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Geographic position of a record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Sentinel stored when a location could not be geocoded
    pub const UNRESOLVED: Coordinates = Coordinates {
        latitude: 0.0,
        longitude: 0.0,
    };

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True for the `(0.0, 0.0)` sentinel
    pub fn is_unresolved(&self) -> bool {
        *self == Self::UNRESOLVED
    }
}

/// Caller-supplied student fields (create and update request body)
///
/// `name` and `location` must be present; the remaining fields default to an
/// empty string when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentFields {
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub linkedin_url: String,
    #[serde(default)]
    pub image_url: String,
}

impl StudentFields {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            job_title: String::new(),
            linkedin_url: String::new(),
            image_url: String::new(),
        }
    }

    /// Reject blank `name` or `location`
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.location.trim().is_empty() {
            missing.push("location");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidInput(format!(
                "Required field(s) must not be empty: {}",
                missing.join(", ")
            )))
        }
    }
}

/// Persisted student record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: String,
    pub name: String,
    pub location: String,
    pub job_title: String,
    pub linkedin_url: String,
    pub image_url: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl StudentRecord {
    /// Build a record from caller fields and resolved coordinates
    pub fn new(id: impl Into<String>, fields: StudentFields, coordinates: Coordinates) -> Self {
        Self {
            id: id.into(),
            name: fields.name,
            location: fields.location,
            job_title: fields.job_title,
            linkedin_url: fields.linkedin_url,
            image_url: fields.image_url,
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
        }
    }

    /// Overwrite every mutable field; `id` is left untouched
    pub fn apply(&mut self, fields: &StudentFields, coordinates: Coordinates) {
        self.name = fields.name.clone();
        self.location = fields.location.clone();
        self.job_title = fields.job_title.clone();
        self.linkedin_url = fields.linkedin_url.clone();
        self.image_url = fields.image_url.clone();
        self.latitude = coordinates.latitude;
        self.longitude = coordinates.longitude;
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}
