//! Checklist Component
//!
//! To-do lines of one note. Ticking is available once the note is saved;
//! adding and removing lines only while it is an editable draft.

use leptos::prelude::*;

use crate::editor::NoteEditor;

#[component]
pub fn Checklist(
    editor: RwSignal<NoteEditor>,
    /// Tick or untick the line at this index for the session user
    #[prop(into)]
    on_toggle: Callback<usize>,
) -> impl IntoView {
    let (new_item, set_new_item) = signal(String::new());
    let editing = move || editor.with(NoteEditor::can_edit_content);

    let add_item = move || {
        let text = new_item.get_untracked();
        match editor.try_update(|ed| ed.add_item(&text)) {
            Some(Ok(())) => set_new_item.set(String::new()),
            Some(Err(e)) => log::debug!("[NOTE] item not added: {}", e),
            None => {}
        }
    };

    let lines = move || {
        let (options, is_editing, unsaved) =
            editor.with(|ed| (ed.buffer().options.clone(), ed.can_edit_content(), ed.is_unsaved()));
        options
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let checked = editor.with_untracked(|ed| ed.is_item_checked(index));
                let attribution = (!item.checked_users.is_empty())
                    .then(|| format!("✓ par {}", item.checked_users.join(", ")));
                view! {
                    <li class="checklist-item" class:checked=checked>
                        <label>
                            <input
                                type="checkbox"
                                disabled=unsaved
                                prop:checked=checked
                                on:change=move |ev| {
                                    ev.stop_propagation();
                                    on_toggle.run(index);
                                }
                            />
                            <span class="checklist-text">{item.text}</span>
                        </label>
                        {attribution.map(|by| view! { <span class="checklist-by">{by}</span> })}
                        {is_editing.then(|| view! {
                            <button
                                class="checklist-remove"
                                title="Retirer"
                                on:click=move |ev| {
                                    ev.stop_propagation();
                                    editor.update(|ed| {
                                        if let Err(e) = ed.remove_item(index) {
                                            log::warn!("[NOTE] {}", e);
                                        }
                                    });
                                }
                            >
                                "×"
                            </button>
                        })}
                    </li>
                }
            })
            .collect_view()
    };

    view! {
        <ul class="checklist">{lines}</ul>
        <Show when=editing>
            <div class="checklist-add">
                <input
                    type="text"
                    placeholder="Nouvel élément"
                    prop:value=move || new_item.get()
                    on:input=move |ev| set_new_item.set(event_target_value(&ev))
                    on:keydown=move |ev| {
                        if ev.key() == "Enter" {
                            ev.prevent_default();
                            add_item();
                        }
                    }
                />
                <button
                    on:click=move |ev| {
                        ev.stop_propagation();
                        add_item();
                    }
                >
                    "+"
                </button>
            </div>
        </Show>
    }
}
