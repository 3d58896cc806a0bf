//! Decoders that turn external encodings into record payloads.
//!
//! Adapters in `nexus-core` call into this crate before the stage chain
//! runs: object-encoded text becomes a structured mapping, delimited text
//! becomes a list of row mappings, and the stream sentinel expands to a
//! fixed sample sequence.

pub mod csv_table;
pub mod error;
pub mod json;
pub mod stream;

pub use csv_table::{CsvRows, read_csv_text};
pub use error::{IngestError, Result};
pub use json::decode_json_text;
pub use stream::{SAMPLE_READINGS, sample_stream};
