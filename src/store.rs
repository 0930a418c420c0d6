//! Dashboard Display Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. Mirrors the list
//! controller's snapshots so each component only re-renders on the fields it reads.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::controller::{Editor, ListSnapshot};
use crate::filter::FilterState;
use crate::models::{Item, PaginatedMeta};

/// Display state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct DashboardState {
    /// Items on the current page
    pub items: Vec<Item>,
    /// Pagination reported with `items`
    pub meta: Option<PaginatedMeta>,
    /// Effective filter (post-debounce)
    pub filter: FilterState,
    pub loading: bool,
    pub busy: bool,
    pub editor: Editor,
    pub pending_delete: Option<Item>,
}

/// Type alias for the store
pub type DashboardStore = Store<DashboardState>;

/// Get the dashboard store from context
pub fn use_dashboard_store() -> DashboardStore {
    expect_context::<DashboardStore>()
}

/// Write a store field only when the value differs, so subscribers of
/// unchanged fields are not re-run
macro_rules! sync_field {
    ($store:expr, $field:ident, $value:expr) => {
        if $store.$field().with_untracked(|current| current != &$value) {
            *$store.$field().write() = $value.clone();
        }
    };
}

/// Copy a controller snapshot into the store
///
/// Items and meta are written in the same synchronous pass, so effects
/// never observe one without the other.
pub fn store_apply_snapshot(store: &DashboardStore, snapshot: &ListSnapshot) {
    sync_field!(store, items, snapshot.items);
    sync_field!(store, meta, snapshot.meta);
    sync_field!(store, filter, snapshot.filter);
    sync_field!(store, loading, snapshot.loading);
    sync_field!(store, busy, snapshot.busy);
    sync_field!(store, editor, snapshot.editor);
    sync_field!(store, pending_delete, snapshot.pending_delete);
}
