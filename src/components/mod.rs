//! UI Components
//!
//! Leptos views of the pages and the sticky notes.

mod access_page;
mod board_page;
mod checklist;
mod color_picker;
mod delete_confirm_button;
mod info_dialog;
mod list_picker;
mod note_card;

pub use access_page::AccessPage;
pub use board_page::BoardPage;
pub use checklist::Checklist;
pub use color_picker::ColorPicker;
pub use delete_confirm_button::DeleteConfirmButton;
pub use info_dialog::InfoDialog;
pub use list_picker::ListPicker;
pub use note_card::NoteCard;
