pub mod task;
pub mod user;

pub use task::{NewTask, SortField, SortOrder, Task, TaskListQuery, TaskPriority, TaskStatus, TaskUpdate};
pub use user::{User, UserResponse};
