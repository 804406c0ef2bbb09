//! Review Batch Common Library
//!
//! CLIとデスクトップで共有される型と状態管理

pub mod types;
pub mod error;
pub mod ingest;
pub mod board;
pub mod snapshot;
pub mod format;
pub mod photo;

pub use types::{Partition, ReviewItem, Stats};
pub use error::{Error, Result};
pub use ingest::{build_items, split_paragraphs, BarrierStatus, PhotoBarrier};
pub use board::{BatchProgress, BatchStart, ReviewBoard};
pub use snapshot::{parse_snapshot, to_snapshot_string, SnapshotRecord};
pub use format::{clipboard_text, COPY_FAILURE_MESSAGE, COPY_SUCCESS_MESSAGE, INVALID_DATA_MESSAGE};
pub use photo::{fit_within, NormalizeOptions};
