//! Types and traits for recording metrics of training runs.
//!
//! A [`Record`] is a set of named values produced at some point of a run,
//! for example the score of an episode or the exploration rate after an
//! optimization step. Records are handed to a [`Recorder`], which decides
//! where they go.
//!
//! ```rust
//! use lander_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("episode", RecordValue::Scalar(3.0));
//! record.insert("score", RecordValue::Scalar(-12.5));
//! assert_eq!(record.get_scalar("score").unwrap(), -12.5);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
