//! Types and traits for recording metrics of environment interaction.
//!
//! * [`Record`] - A container of key-value pairs, used as the metrics of an
//!   [`EnvState`](crate::EnvState)
//! * [`RecordValue`] - Values that can be stored in a [`Record`]
//! * [`Recorder`] - Receives a record at every step
//! * [`AggregateRecorder`] - Stores records and writes aggregated values on flush
//! * [`RecordStorage`] - Aggregation of stored records
//!
//! ```rust
//! use posehold_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("reward/pose", RecordValue::Scalar(0.5));
//! record.insert("qpos", RecordValue::Array1(vec![0.0, 0.0, 0.3]));
//! assert_eq!(record.get_scalar("reward/pose").unwrap(), 0.5);
//! ```
mod base;
mod buffered_recorder;
mod log_recorder;
mod null_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use log_recorder::LogRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::{AggregateRecorder, Recorder};
pub use storage::RecordStorage;
