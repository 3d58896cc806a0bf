//! Input adapters, one per external encoding.
//!
//! | Adapter | Accepts | Canonical record |
//! |---------|---------|------------------|
//! | [`JsonAdapter`] | object-encoded text or a mapping | the mapping, `final` and `meta.safe_mode` set |
//! | [`CsvAdapter`] | delimited text with a header row | `{type: "csv", rows, analysis: {actions}, final, meta}` |
//! | [`StreamAdapter`] | a sequence, or any text as the sample sentinel | the sequence |

mod csv;
mod json;
mod stream;

pub use csv::CsvAdapter;
pub use json::JsonAdapter;
pub use stream::StreamAdapter;
