//! paperback-ingest library interface
//!
//! One-shot CSV dataset ingestion for the paperback catalog. Stages run
//! strictly forward:
//!
//! source -> validate -> (resolve + extract, per row) -> assemble
//!        -> integrity -> load
//!
//! No stage reads from a later stage. All resolver state is run-scoped and
//! passed explicitly; nothing survives between invocations.

pub mod assemble;
pub mod dates;
pub mod error;
pub mod extract;
pub mod integrity;
pub mod isbn;
pub mod load;
pub mod pipeline;
pub mod resolve;
pub mod source;
pub mod validate;

pub use crate::error::{IngestError, Result};
pub use crate::pipeline::{IngestPipeline, IngestReport, PipelineConfig};
