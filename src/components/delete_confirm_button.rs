//! Delete Confirm Button Component
//!
//! Two-step delete: a trash button, then an inline "Supprimer ?" prompt.

use leptos::prelude::*;

/// Inline delete confirmation button
///
/// # Arguments
/// * `button_class` - CSS class for the initial delete button
/// * `on_confirm` - Callback to execute when user confirms deletion
#[component]
pub fn DeleteConfirmButton(
    #[prop(into)] button_class: String,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let (confirming, set_confirming) = signal(false);

    view! {
        <Show
            when=move || confirming.get()
            fallback=move || {
                let class = button_class.clone();
                view! {
                    <button
                        class=class
                        title="Supprimer"
                        on:click=move |ev| {
                            ev.stop_propagation();
                            set_confirming.set(true);
                        }
                    >
                        "🗑"
                    </button>
                }
            }
        >
            <span class="delete-confirm">
                <span class="delete-confirm-text">"Supprimer ?"</span>
                <button
                    class="confirm-btn"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_confirming.set(false);
                        on_confirm.run(());
                    }
                >
                    "Oui"
                </button>
                <button
                    class="cancel-btn"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_confirming.set(false);
                    }
                >
                    "Non"
                </button>
            </span>
        </Show>
    }
}
