//! Application services for board views.

mod change;
mod error;
mod view;

pub use change::{ChangeOperation, RecordChange, RecordKind};
pub use error::{BoardError, BoardResult};
pub use view::BoardService;
