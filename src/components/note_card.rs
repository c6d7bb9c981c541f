//! Note Card Component
//!
//! One sticky note on the board. Local edits live in a `NoteEditor`; every
//! committed change leaves through the controller callbacks.

use leptos::html;
use leptos::prelude::*;
use leptos_gesture::{create_gesture_signals, is_interactive_target, Bounds, GestureKind, GestureSlot, PointerSample};

use crate::components::{Checklist, ColorPicker, DeleteConfirmButton};
use crate::editor::{EditorMode, NoteEditor};
use crate::layout::Viewport;
use crate::models::{Note, NoteId};
use crate::store::{use_board_store, BoardStateStoreFields};

#[component]
pub fn NoteCard(
    note_id: NoteId,
    /// Session user, used for checklist ticks
    user_name: Option<String>,
    #[prop(into)] on_update: Callback<Note>,
    /// Pinned snapshot plus the completion to report the outcome to
    #[prop(into)]
    on_pin: Callback<(Note, Callback<bool>)>,
    #[prop(into)] on_delete: Callback<NoteId>,
) -> impl IntoView {
    let store = use_board_store();
    let note = Memo::new(move |_| store.notes().read().get(note_id).cloned());
    let Some(initial) = note.get_untracked() else {
        return ().into_any();
    };

    let editor = RwSignal::new(NoteEditor::new(initial, user_name));
    let gestures = create_gesture_signals();
    let slot = StoredValue::new_local(GestureSlot::new());
    let card_ref = NodeRef::<html::Div>::new();

    // Follow the authoritative note (placement is held while a gesture is live)
    Effect::new(move |_| {
        if let Some(current) = note.get() {
            editor.update(|ed| ed.sync_from(&current));
        }
    });

    on_cleanup(move || {
        slot.try_with_value(GestureSlot::clear);
    });

    let mode = move || store.mode().get();
    let is_editing = move || editor.with(NoteEditor::is_editing);
    let is_pending = move || editor.with(|ed| ed.is_unsaved() || ed.is_pin_pending());

    // ========================
    // Gestures
    // ========================

    let start_gesture = move |kind: GestureKind| {
        let Some(card) = card_ref.get_untracked() else {
            return false;
        };
        let Some(canvas) = Bounds::of_parent(&card) else {
            return false;
        };
        let tier = Viewport::current().tier();
        slot.with_value(|slot| {
            slot.begin(
                kind,
                gestures,
                move |pointer| editor.update(|ed| ed.pointer_moved(pointer, canvas, tier)),
                move || {
                    if let Some(Some(snapshot)) = editor.try_update(|ed| ed.end_gesture()) {
                        on_update.run(snapshot);
                    }
                },
            )
        });
        true
    };

    let on_card_mousedown = move |ev: web_sys::MouseEvent| {
        let Some(card) = card_ref.get_untracked() else {
            return;
        };
        let rect = card.get_bounding_client_rect();
        let pointer = PointerSample::from(&ev);
        let from_control = is_interactive_target(&ev);
        let layout = store.mode().get_untracked();
        let began = editor
            .try_update(|ed| ed.begin_drag(layout, pointer, (rect.left(), rect.top()), from_control))
            .unwrap_or(false);
        if !began {
            return;
        }
        ev.prevent_default();
        if !start_gesture(GestureKind::Drag) {
            editor.update(|ed| ed.cancel_gesture());
        }
    };

    let on_resize_mousedown = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        if !editor.try_update(|ed| ed.begin_resize()).unwrap_or(false) {
            return;
        }
        ev.prevent_default();
        if !start_gesture(GestureKind::Resize) {
            editor.update(|ed| ed.cancel_gesture());
        }
    };

    // ========================
    // Committed changes
    // ========================

    let toggle_item = Callback::new(move |index: usize| match editor.try_update(|ed| ed.toggle_item(index)) {
        Some(Ok(snapshot)) => on_update.run(snapshot),
        Some(Err(e)) => log::warn!("[NOTE] toggle refused: {}", e),
        None => {}
    });

    let pin = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        match editor.try_update(|ed| ed.pin()) {
            Some(Ok(snapshot)) => {
                let settled = Callback::new(move |succeeded: bool| {
                    editor.update(|ed| {
                        if let Err(e) = ed.pin_settled(succeeded) {
                            log::warn!("[NOTE] pin outcome ignored: {}", e);
                        }
                    });
                });
                on_pin.run((snapshot, settled));
            }
            Some(Err(e)) => log::warn!("[NOTE] pin refused: {}", e),
            None => {}
        }
    };

    let edit = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        match editor.try_update(|ed| ed.edit()) {
            Some(Ok(snapshot)) => on_update.run(snapshot),
            Some(Err(e)) => log::warn!("[NOTE] edit refused: {}", e),
            None => {}
        }
    };

    let delete = Callback::new(move |_: ()| {
        if let Some(id) = editor.with_untracked(NoteEditor::delete_target) {
            on_delete.run(id);
        }
    });

    let select_color = Callback::new(move |color: String| {
        editor.update(|ed| {
            if let Err(e) = ed.set_color(&color) {
                log::warn!("[NOTE] {}", e);
            }
        });
    });

    // ========================
    // View
    // ========================

    let card_style = move || {
        editor.with(|ed| {
            let buffer = ed.buffer();
            format!(
                "left: {}px; top: {}px; width: {}px; height: {}px; background-color: {};",
                buffer.position.x, buffer.position.y, buffer.size.width, buffer.size.height, buffer.color
            )
        })
    };
    let draggable = move || editor.with(|ed| ed.can_drag(mode()));
    let title = move || editor.with(|ed| ed.buffer().title.clone());
    let description = move || editor.with(|ed| ed.buffer().description.clone());
    let color = Signal::derive(move || editor.with(|ed| ed.buffer().color.clone()));

    view! {
        <div
            node_ref=card_ref
            class="note-card"
            class:pinned=move || editor.with(|ed| ed.mode() == EditorMode::Pinned)
            class:draggable=draggable
            class:pending=is_pending
            class:active=move || editor.with(|ed| ed.gesture().is_some())
            style=card_style
            on:mousedown=on_card_mousedown
        >
            <Show
                when=is_editing
                fallback=move || view! {
                    <h3 class="note-title">{title}</h3>
                    <p class="note-description">{move || editor.with(NoteEditor::description_preview)}</p>
                    <Checklist editor=editor on_toggle=toggle_item />
                    <div class="note-actions">
                        <button class="edit-btn" on:click=edit>"Modifier"</button>
                    </div>
                }
            >
                <input
                    class="note-title-input"
                    type="text"
                    disabled=is_pending
                    prop:value=title
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        editor.update(|ed| {
                            let _ = ed.set_title(&value);
                        });
                    }
                />
                <textarea
                    class="note-description-input"
                    placeholder="Description"
                    disabled=is_pending
                    prop:value=description
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        editor.update(|ed| {
                            let _ = ed.set_description(&value);
                        });
                    }
                ></textarea>
                <Checklist editor=editor on_toggle=toggle_item />
                <ColorPicker selected=color on_select=select_color />
                <div class="note-actions">
                    <button class="pin-btn" disabled=is_pending on:click=pin>"Épingler"</button>
                    <Show when=move || !is_pending()>
                        <DeleteConfirmButton button_class="delete-btn" on_confirm=delete />
                    </Show>
                </div>
                <div class="resize-handle" on:mousedown=on_resize_mousedown></div>
            </Show>
            <Show when=move || !is_editing()>
                <span class="pin-mark">"📌"</span>
            </Show>
        </div>
    }
    .into_any()
}
