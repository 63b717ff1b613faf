pub mod change;
pub mod field;
pub mod track;

pub use change::{ChangeEvent, ChangeKind};
pub use field::{Field, FieldKind, FieldValue};
pub use track::Track;
