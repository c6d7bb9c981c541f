//! Color Picker Component

use leptos::prelude::*;

use crate::models::PALETTE;

/// Row of palette swatches; the selected one is outlined
#[component]
pub fn ColorPicker(
    #[prop(into)] selected: Signal<String>,
    #[prop(into)] on_select: Callback<String>,
) -> impl IntoView {
    view! {
        <div class="color-picker">
            {PALETTE
                .iter()
                .map(|&(value, label)| {
                    let is_selected = move || selected.get().eq_ignore_ascii_case(value);
                    view! {
                        <button
                            class="color-swatch"
                            class:selected=is_selected
                            style=format!("background-color: {}", value)
                            title=label
                            on:click=move |ev| {
                                ev.stop_propagation();
                                on_select.run(value.to_string());
                            }
                        ></button>
                    }
                })
                .collect_view()}
        </div>
    }
}
