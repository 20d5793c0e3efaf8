//! xref core - in-memory cross-reference graph for quality-tracking records.
//!
//! Two delimited sources are folded into one [`Environment`]:
//!
//! - **FP** rows link a *function* to a *failure* under a root/serial.
//! - **AC** rows link an *article* to a *cause* under a root/serial.
//!
//! Entities are deduplicated by code in global registries. Serials record
//! which canonical entities were observed for them, and entity pairs seen on
//! the same row are linked in both directions.
//!
//! # Usage
//!
//! ```rust
//! use xref_core::{Environment, FpRow, MalformedPolicy, RowReader};
//!
//! let mut env = Environment::new();
//! let row = FpRow::from_fields(&["R1", "S1", "FN1", "Braking", "FL1", "Leak"][..]).unwrap();
//! env.ingest_fp(&row);
//!
//! let data = "R1;S2;FN2;Steering;FL1;Leak\n";
//! let report = env
//!     .load_fp(RowReader::new(data.as_bytes()), MalformedPolicy::Stop)
//!     .unwrap();
//! assert_eq!(report.rows_ingested, 1);
//! assert_eq!(env.failures().by_code("FL1").unwrap().functions().len(), 2);
//! ```

pub mod env;
pub mod error;
pub mod index;
pub mod ingest;
pub mod load;
pub mod reader;
pub mod registry;
pub mod types;

pub use env::{Environment, GraphStats, Root, RootSummary, Serial, SerialSummary};
pub use error::{DelimiterError, LoadError, ReadError, Result, RowShapeError};
pub use index::CodeIndex;
pub use ingest::{AcRow, FpRow, RowKind, ROW_WIDTH};
pub use load::{LoadReport, MalformedPolicy, StopPoint};
pub use reader::{Record, RowReader, DEFAULT_DELIMITER};
pub use registry::{Handle, Registry};
pub use types::{
    Article, ArticleId, Cause, CauseId, CodeLabel, Entity, Failure, FailureId, Function, FunctionId,
};
