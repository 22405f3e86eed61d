//! Row change events.
//!
//! - [`Action`] is the kind of mutation
//! - [`RowEvent`] carries the snapshots and answers column-level questions

pub mod action;
pub mod row_event;

pub use action::{Action, ParseActionError};
pub use row_event::RowEvent;
