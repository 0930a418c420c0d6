//! Search Bar Component
//!
//! Free-text search (debounced), status filter, page size and the add button.

use leptos::prelude::*;
use leptos_debounce::{make_on_debounced_input, Debouncer};

use crate::config::{PAGE_SIZES, SEARCH_DEBOUNCE_MS};
use crate::context::use_dashboard;
use crate::filter::StatusFilter;
use crate::store::{use_dashboard_store, DashboardStateStoreFields};

#[component]
pub fn SearchBar() -> impl IntoView {
    let ctx = use_dashboard();
    let store = use_dashboard_store();

    // Echo of the input box; the store only sees the settled value
    let (search_text, set_search_text) = signal(store.filter().get_untracked().search);

    let on_search_input = make_on_debounced_input(
        Debouncer::new(SEARCH_DEBOUNCE_MS),
        move |value| set_search_text.set(value),
        {
            let ctx = ctx.clone();
            move |value: String| ctx.run(move |c| async move { c.set_search(&value).await })
        },
    );

    let on_status_change = {
        let ctx = ctx.clone();
        move |ev: web_sys::Event| {
            if let Some(status) = StatusFilter::parse(&event_target_value(&ev)) {
                ctx.run(move |c| async move { c.set_status(status).await });
            }
        }
    };

    let on_limit_change = {
        let ctx = ctx.clone();
        move |ev: web_sys::Event| {
            if let Ok(limit) = event_target_value(&ev).parse::<u32>() {
                ctx.run(move |c| async move { c.set_limit(limit).await });
            }
        }
    };

    let on_create = move |_: web_sys::MouseEvent| ctx.controller().open_create();

    view! {
        <section class="toolbar">
            <div class="toolbar__filters">
                <input
                    type="search"
                    placeholder="Search title, description, tags..."
                    prop:value=move || search_text.get()
                    on:input=on_search_input
                />
                <select
                    prop:value=move || store.filter().get().status.as_str()
                    on:change=on_status_change
                >
                    {StatusFilter::OPTIONS.iter().map(|option| view! {
                        <option value=option.as_str()>{option.label()}</option>
                    }).collect_view()}
                </select>
                <select
                    prop:value=move || store.filter().get().limit.to_string()
                    on:change=on_limit_change
                >
                    {PAGE_SIZES.iter().map(|size| view! {
                        <option value=size.to_string()>{format!("Show {}", size)}</option>
                    }).collect_view()}
                </select>
            </div>
            <button
                class="primary"
                type="button"
                disabled=move || store.loading().get()
                on:click=on_create
            >
                "+ Add Item"
            </button>
        </section>
    }
}
