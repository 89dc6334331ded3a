//! Task list core: the task record, the store that owns the collection and
//! derives the filtered views, and the persistence port behind it.

pub mod config;
pub mod error;
pub mod storage;
pub mod task;
pub mod task_store;

pub use error::{Error, Result};
pub use storage::{JsonFileStore, Persistence};
pub use task::{Priority, Task};
pub use task_store::{FilterOption, TaskStore};
