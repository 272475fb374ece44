//! Task Record model: validated in-memory representation of work items.

mod record;

pub use record::{parse_batch, TaskRecord};
