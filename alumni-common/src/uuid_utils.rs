//! UUID utilities

use uuid::Uuid;

/// Generate a new UUIDv4
pub fn generate() -> Uuid {
    Uuid::new_v4()
}

/// Generate a new record identifier (hyphenated UUIDv4 string)
pub fn generate_id() -> String {
    generate().to_string()
}
