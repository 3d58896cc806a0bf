//! Library side of the `nexus` CLI: logging setup, the demo walkthrough and
//! table rendering.

pub mod demo;
pub mod logging;
pub mod summary;
