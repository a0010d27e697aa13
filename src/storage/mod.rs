//! Session persistence
//!
//! [`CsvSerializer`] turns a finished buffer into a CSV document and back;
//! [`SessionStore`] keeps those documents as files in one directory and
//! answers list/delete/export queries against it.

pub mod serializer;
pub mod store;

pub use serializer::{CsvSerializer, LoadedSession, CSV_HEADER};
pub use store::{sanitize_label, SessionFile, SessionStore, SESSION_FILE_EXTENSION};
