mod task;

pub use task::{Counts, Task, TaskId};
