//! Task list core: an ordered list of short text tasks, the view state a
//! rendering layer needs around it, durable storage and a JSON
//! import/export format.

pub mod celebrate;
pub mod clock;
pub mod codec;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod ids;
pub mod model;
pub mod storage;
pub mod store;

pub use controller::Controller;
pub use error::AppError;
pub use filter::Filter;
pub use model::{Counts, Task, TaskId};
