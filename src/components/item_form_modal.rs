//! Item Form Modal Component
//!
//! Create/edit dialog. Validation runs locally on submit; only a valid
//! payload is handed to the controller.

use leptos::prelude::*;

use crate::context::use_dashboard;
use crate::controller::Editor;
use crate::models::ItemStatus;
use crate::store::{use_dashboard_store, DashboardStateStoreFields};
use crate::validation::{FormField, ItemForm, ValidationErrors};

#[component]
pub fn ItemFormModal() -> impl IntoView {
    let ctx = use_dashboard();
    let store = use_dashboard_store();

    let form = RwSignal::new(ItemForm::default());
    let errors = RwSignal::new(ValidationErrors::default());

    // Reset the fields whenever a different editor opens
    Effect::new(move |_| {
        let initial = match store.editor().get() {
            Editor::Editing(item) => ItemForm::from_item(&item),
            Editor::Creating | Editor::Closed => ItemForm::default(),
        };
        form.set(initial);
        errors.set(ValidationErrors::default());
    });

    let is_open = move || store.editor().get().is_open();
    let is_editing = move || store.editor().get().item().is_some();
    let busy = move || store.busy().get();

    let on_submit = {
        let ctx = ctx.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            match form.get_untracked().validate() {
                Ok(payload) => {
                    errors.set(ValidationErrors::default());
                    ctx.run(move |c| async move {
                        c.save(payload).await;
                    });
                }
                Err(found) => {
                    log::debug!("[FORM] rejected: {}", found);
                    errors.set(found);
                }
            }
        }
    };
    let on_close = move |_: web_sys::MouseEvent| ctx.controller().close_editor();

    view! {
        <Show when=is_open>
            <div class="modal-overlay" role="dialog" aria-modal="true">
                <div class="modal">
                    <header class="modal__header">
                        <h2>{move || if is_editing() { "Edit item" } else { "Create item" }}</h2>
                        <button type="button" aria-label="Close" on:click=on_close.clone()>"×"</button>
                    </header>
                    <form class="modal__content" on:submit=on_submit.clone()>
                        <div class="form-grid">
                            <label>
                                <span>"Title *"</span>
                                <input
                                    type="text"
                                    prop:value=move || form.with(|f| f.title.clone())
                                    on:input=move |ev| form.update(|f| f.title = event_target_value(&ev))
                                />
                                <FieldError errors=errors field=FormField::Title />
                            </label>
                            <label>
                                <span>"Category"</span>
                                <input
                                    type="text"
                                    prop:value=move || form.with(|f| f.category.clone())
                                    on:input=move |ev| form.update(|f| f.category = event_target_value(&ev))
                                />
                                <FieldError errors=errors field=FormField::Category />
                            </label>
                            <label>
                                <span>"Price *"</span>
                                <input
                                    type="number"
                                    step="0.01"
                                    prop:value=move || form.with(|f| f.price.clone())
                                    on:input=move |ev| form.update(|f| f.price = event_target_value(&ev))
                                />
                                <FieldError errors=errors field=FormField::Price />
                            </label>
                            <label>
                                <span>"Quantity *"</span>
                                <input
                                    type="number"
                                    prop:value=move || form.with(|f| f.quantity.clone())
                                    on:input=move |ev| form.update(|f| f.quantity = event_target_value(&ev))
                                />
                                <FieldError errors=errors field=FormField::Quantity />
                            </label>
                            <label>
                                <span>"Status *"</span>
                                <select
                                    prop:value=move || form.with(|f| f.status.clone())
                                    on:change=move |ev| form.update(|f| f.status = event_target_value(&ev))
                                >
                                    {ItemStatus::ALL.iter().map(|status| view! {
                                        <option value=status.as_str()>{status.label()}</option>
                                    }).collect_view()}
                                </select>
                                <FieldError errors=errors field=FormField::Status />
                            </label>
                            <label class="full-row">
                                <span>"Description"</span>
                                <textarea
                                    rows="3"
                                    prop:value=move || form.with(|f| f.description.clone())
                                    on:input=move |ev| form.update(|f| f.description = event_target_value(&ev))
                                ></textarea>
                                <FieldError errors=errors field=FormField::Description />
                            </label>
                            <label class="full-row">
                                <span>"Tags (comma separated)"</span>
                                <input
                                    type="text"
                                    prop:value=move || form.with(|f| f.tags.clone())
                                    on:input=move |ev| form.update(|f| f.tags = event_target_value(&ev))
                                />
                                <FieldError errors=errors field=FormField::Tags />
                            </label>
                        </div>
                        <footer class="modal__footer">
                            <button type="button" class="ghost" disabled=busy on:click=on_close.clone()>
                                "Cancel"
                            </button>
                            <button type="submit" class="primary" disabled=busy>
                                {move || match (busy(), is_editing()) {
                                    (true, _) => "Saving...",
                                    (false, true) => "Update",
                                    (false, false) => "Create",
                                }}
                            </button>
                        </footer>
                    </form>
                </div>
            </div>
        </Show>
    }
}

/// Inline message under a form field, if it failed validation
#[component]
fn FieldError(errors: RwSignal<ValidationErrors>, field: FormField) -> impl IntoView {
    move || {
        errors
            .with(|e| e.get(field).map(str::to_string))
            .map(|message| view! { <small class="error">{message}</small> })
    }
}
