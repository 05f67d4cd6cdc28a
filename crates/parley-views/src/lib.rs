//! HTML views over `ChatState` snapshots.
//!
//! Every function here is pure: state in, markup out. Interpolated text and
//! attribute values are escaped; message bodies go through
//! `parley_core::markdown::format`.

pub mod input_bar;
pub mod message_list;
pub mod page;
pub mod rename_dialog;
pub mod sidebar;
pub mod typing_indicator;

pub use rename_dialog::RenameDialog;
