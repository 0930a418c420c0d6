//! UI Components
//!
//! Reusable Leptos components.

mod search_bar;
mod item_table;
mod pagination;
mod item_form_modal;
mod delete_confirm_button;
mod toaster;

pub use search_bar::SearchBar;
pub use item_table::ItemTable;
pub use pagination::Pagination;
pub use item_form_modal::ItemFormModal;
pub use delete_confirm_button::DeleteConfirmButton;
pub use toaster::Toaster;
