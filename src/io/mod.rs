//! File formats and object store clients.

pub mod cloud;
pub mod csv;
pub mod json;
pub mod parquet;
