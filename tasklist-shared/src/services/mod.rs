/// Business logic shared by the HTTP handlers
///
/// - `tasks`: Ownership-checked task operations

pub mod tasks;
