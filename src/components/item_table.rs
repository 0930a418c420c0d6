//! Item Table Component
//!
//! Renders the current page of items with edit/delete actions.

use chrono::{DateTime, Utc};
use leptos::prelude::*;

use crate::components::DeleteConfirmButton;
use crate::context::use_dashboard;
use crate::models::Item;
use crate::store::{use_dashboard_store, DashboardStateStoreFields};

pub fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

#[component]
pub fn ItemTable() -> impl IntoView {
    let store = use_dashboard_store();

    let body = move || {
        if store.loading().get() {
            return view! {
                <tr><td colspan="8" class="empty-state">"Loading items..."</td></tr>
            }
            .into_any();
        }
        let items = store.items().get();
        if items.is_empty() {
            return view! {
                <tr>
                    <td colspan="8" class="empty-state">
                        "No items found. Try adjusting filters or add a new item."
                    </td>
                </tr>
            }
            .into_any();
        }
        items
            .into_iter()
            .map(|item| view! { <ItemRow item=item /> })
            .collect_view()
            .into_any()
    };

    view! {
        <div class="table-wrapper">
            <table>
                <thead>
                    <tr>
                        <th>"Title"</th>
                        <th>"Category"</th>
                        <th>"Price"</th>
                        <th>"Qty"</th>
                        <th>"Status"</th>
                        <th>"Tags"</th>
                        <th>"Updated"</th>
                        <th aria-label="actions"></th>
                    </tr>
                </thead>
                <tbody>{body}</tbody>
            </table>
        </div>
    }
}

#[component]
fn ItemRow(item: Item) -> impl IntoView {
    let ctx = use_dashboard();

    let tags = if item.tags.is_empty() {
        view! { <span>"—"</span> }.into_any()
    } else {
        view! {
            <div class="tag-group">
                {item.tags.iter().map(|tag| view! { <span class="tag">{tag.clone()}</span> }).collect_view()}
            </div>
        }
        .into_any()
    };

    let for_edit = item.clone();
    let on_edit = move |_: web_sys::MouseEvent| ctx.controller().open_edit(for_edit.clone());

    view! {
        <tr>
            <td>
                <div class="cell-stack">
                    <span class="cell-title">{item.title.clone()}</span>
                    {item.description.clone().map(|d| view! { <small>{d}</small> })}
                </div>
            </td>
            <td>{item.category.clone().unwrap_or_else(|| "—".to_string())}</td>
            <td>{format_price(item.price)}</td>
            <td>{item.quantity}</td>
            <td>
                <span class=format!("status-chip status-{}", item.status.as_str())>
                    {item.status.as_str()}
                </span>
            </td>
            <td>{tags}</td>
            <td>{format_date(&item.updated_at)}</td>
            <td>
                <div class="action-group">
                    <button type="button" class="ghost" on:click=on_edit>"Edit"</button>
                    <DeleteConfirmButton item=item.clone() />
                </div>
            </td>
        </tr>
    }
}
