//! CLI command implementations.

mod add;
mod list;

pub(crate) use add::AddArgs;
pub(crate) use list::ListArgs;
