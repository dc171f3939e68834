//! Pure data structures: the editable [`OrderDraft`], the immutable [`OrderRecord`]
//! and the persisted [`OrderRow`] shape the datastore works with.

pub mod draft;
pub mod record;
pub mod row;

pub use draft::*;
pub use record::*;
pub use row::*;
