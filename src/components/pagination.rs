//! Pagination Component
//!
//! Previous/Next controls driven by the server-reported page metadata.

use leptos::prelude::*;

use crate::context::use_dashboard;
use crate::models::PaginatedMeta;
use crate::store::{use_dashboard_store, DashboardStateStoreFields};

/// Which page buttons are usable for a given meta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageControls {
    pub page: u32,
    pub total_pages: u32,
    pub total: u64,
}

impl PageControls {
    pub fn from_meta(meta: &PaginatedMeta) -> Self {
        Self {
            page: meta.page,
            total_pages: meta.total_pages,
            total: meta.total,
        }
    }

    pub fn prev_page(&self) -> Option<u32> {
        (self.page > 1).then(|| self.page - 1)
    }

    pub fn next_page(&self) -> Option<u32> {
        (self.page < self.total_pages).then(|| self.page + 1)
    }

    pub fn summary(&self) -> String {
        format!("Showing page {} of {} • {} items total", self.page, self.total_pages, self.total)
    }
}

#[component]
pub fn Pagination() -> impl IntoView {
    let ctx = use_dashboard();
    let store = use_dashboard_store();

    let controls = Memo::new(move |_| store.meta().get().map(|meta| PageControls::from_meta(&meta)));
    let loading = move || store.loading().get();

    let go_to = move |target: Option<u32>| {
        if let Some(page) = target {
            ctx.run(move |c| async move { c.set_page(page).await });
        }
    };
    let go_prev = {
        let go_to = go_to.clone();
        move |_: web_sys::MouseEvent| go_to(controls.get_untracked().and_then(|c| c.prev_page()))
    };
    let go_next = move |_: web_sys::MouseEvent| go_to(controls.get_untracked().and_then(|c| c.next_page()));

    view! {
        <Show when=move || controls.get().is_some()>
            <div class="pagination">
                <div>{move || controls.get().map(|c| c.summary()).unwrap_or_default()}</div>
                <div class="pagination__controls">
                    <button
                        type="button"
                        disabled=move || loading() || controls.get().and_then(|c| c.prev_page()).is_none()
                        on:click=go_prev.clone()
                    >
                        "Previous"
                    </button>
                    <button
                        type="button"
                        disabled=move || loading() || controls.get().and_then(|c| c.next_page()).is_none()
                        on:click=go_next.clone()
                    >
                        "Next"
                    </button>
                </div>
            </div>
        </Show>
    }
}
