/// Data models for TaskList
///
/// Plain data structs with no persistence logic of their own. Storage goes
/// through the traits in [`crate::store`].
///
/// # Models
///
/// - `user`: Accounts created at signup
/// - `task`: User-owned task records and the form input that creates them
/// - `page`: Pagination for list views

pub mod page;
pub mod task;
pub mod user;
