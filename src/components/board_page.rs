//! Board Page Component
//!
//! Board controller: validates the session, loads the list and its notes,
//! and owns every mutation of the note collection.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::board::{
    blank_note, board_failed, open_board, settle_add_mode, toggle_layout, token_checked, BoardPhase, BoardStep,
    LayoutRefresh,
};
use crate::components::{InfoDialog, NoteCard};
use crate::context::{use_app_context, AppContext};
use crate::error::ApiError;
use crate::layout::Viewport;
use crate::models::{format_date, Note, NoteId, TARGET_LIST_NAME};
use crate::routes::{use_navigator, Navigator, LISTS_PATH};
use crate::store::{
    store_confirm_created, store_discard_placeholder, store_insert_placeholder, store_rearrange,
    store_remove_note, store_replace_note, store_set_list, store_set_mode, store_set_notes, store_set_phase,
    store_set_show_info, BoardState, BoardStateStoreFields, BoardStore,
};

// ========================
// Remote flow
// ========================

/// Validate the token, then fetch the list and its notes
async fn load_board(ctx: AppContext, store: BoardStore, navigator: Navigator, list_id: i64) {
    let valid = ctx.api.validate_token(list_id).await;
    let (phase, step) = token_checked(list_id, valid);
    store_set_phase(&store, phase);
    if let BoardStep::Redirect(path) = step {
        log::info!("[BOARD] token rejected for list {}", list_id);
        navigator.go(&path);
        return;
    }

    let loaded = async {
        let list = ctx.api.fetch_list(list_id).await?;
        let notes = ctx.api.fetch_notes(list_id).await?;
        Ok::<_, ApiError>((list, notes))
    }
    .await;

    match loaded {
        Ok((list, notes)) => {
            log::info!("[BOARD] list {} loaded with {} notes", list.id, notes.len());
            store_set_list(&store, list);
            store_set_notes(&store, notes);
            store_set_phase(&store, BoardPhase::Loaded);
        }
        Err(e) => fail(store, navigator, list_id, e),
    }
}

/// Replace the collection with the server's notes
async fn refresh_notes(ctx: AppContext, store: BoardStore, navigator: Navigator, list_id: i64) {
    match ctx.api.fetch_notes(list_id).await {
        Ok(notes) => store_set_notes(&store, notes),
        Err(e) if e.requires_access() => fail(store, navigator, list_id, e),
        Err(e) => log::warn!("[BOARD] refresh failed: {}", e),
    }
}

fn fail(store: BoardStore, navigator: Navigator, list_id: i64, error: ApiError) {
    log::error!("[BOARD] list {}: {}", list_id, error);
    let (phase, step) = board_failed(list_id, &error);
    store_set_phase(&store, phase);
    if let BoardStep::Redirect(path) = step {
        navigator.go(&path);
    }
}

// ========================
// Component
// ========================

#[component]
pub fn BoardPage(list_id: i64) -> impl IntoView {
    let ctx = use_app_context();
    let navigator = use_navigator();
    let session = ctx.session.clone();

    let (phase, step) = open_board(list_id, &session);
    let mode = session.layout_mode_or_default(list_id);
    let store = Store::new(BoardState::new(list_id, mode, phase));
    provide_context(store);

    let user_name = session.token_for_list(list_id).map(|token| token.user_name);
    let (show_info_button, set_show_info_button) = signal(!session.info_dismissed());

    match step {
        BoardStep::CheckToken | BoardStep::Load => spawn_local(load_board(ctx.clone(), store, navigator, list_id)),
        BoardStep::Redirect(path) => {
            log::info!("[BOARD] no token for list {}", list_id);
            spawn_local(async move { navigator.go(&path) });
        }
        BoardStep::Stay => {}
    }

    // ========================
    // Note callbacks
    // ========================

    let add_note = {
        let ctx = ctx.clone();
        let user_name = user_name.clone();
        Callback::new(move |target: Option<&'static str>| {
            if store.list().with_untracked(Option::is_none) {
                return;
            }
            let viewport = Viewport::current();
            let current = store.mode().get_untracked();
            let mode = settle_add_mode(current, viewport, list_id, &ctx.session);
            if mode != current {
                store_set_mode(&store, mode);
            }

            let note = blank_note(
                list_id,
                user_name.as_deref(),
                target,
                chrono::Utc::now().to_rfc3339(),
                store.notes().read_untracked().as_slice(),
                mode,
                viewport,
            );
            let Some(temp_id) = store_insert_placeholder(&store, note.clone()) else {
                return;
            };
            log::debug!("[BOARD] placeholder {} added", temp_id);

            let ctx = ctx.clone();
            spawn_local(async move {
                match ctx.api.create_note(list_id, &note).await {
                    Ok(created) => {
                        if !store_confirm_created(&store, temp_id, created) {
                            log::debug!("[BOARD] placeholder {} gone, creation dropped", temp_id);
                        }
                    }
                    Err(e) => {
                        log::warn!("[BOARD] create failed, removing placeholder {}: {}", temp_id, e);
                        store_discard_placeholder(&store, temp_id);
                        if e.requires_access() {
                            fail(store, navigator, list_id, e);
                        }
                    }
                }
            });
        })
    };

    let update_note = {
        let ctx = ctx.clone();
        Callback::new(move |note: Note| {
            let Some(previous) = store_replace_note(&store, note.clone()) else {
                log::debug!("[BOARD] update for unknown note dropped");
                return;
            };
            if note.is_placeholder() {
                return;
            }
            let ctx = ctx.clone();
            spawn_local(async move {
                match ctx.api.update_note(list_id, &note).await {
                    Ok(saved) => {
                        store_replace_note(&store, saved);
                    }
                    Err(e) => {
                        log::warn!("[BOARD] update of note {:?} failed, rolling back: {}", note.id, e);
                        store_replace_note(&store, previous);
                        if e.requires_access() {
                            fail(store, navigator, list_id, e);
                        }
                    }
                }
            });
        })
    };

    let pin_note = {
        let ctx = ctx.clone();
        Callback::new(move |(note, settled): (Note, Callback<bool>)| {
            let previous = store_replace_note(&store, note.clone());
            let ctx = ctx.clone();
            spawn_local(async move {
                match ctx.api.update_note(list_id, &note).await {
                    Ok(_) => {
                        log::info!("[BOARD] note {:?} pinned", note.id);
                        settled.run(true);
                        refresh_notes(ctx, store, navigator, list_id).await;
                    }
                    Err(e) => {
                        log::warn!("[BOARD] pin of note {:?} failed: {}", note.id, e);
                        if let Some(previous) = previous {
                            store_replace_note(&store, previous);
                        }
                        settled.run(false);
                        if e.requires_access() {
                            fail(store, navigator, list_id, e);
                        }
                    }
                }
            });
        })
    };

    let delete_note = {
        let ctx = ctx.clone();
        Callback::new(move |note_id: NoteId| {
            if store_remove_note(&store, note_id).is_none() || note_id < 0 {
                return;
            }
            let ctx = ctx.clone();
            spawn_local(async move {
                if let Err(e) = ctx.api.delete_note(list_id, note_id).await {
                    log::warn!("[BOARD] delete of note {} failed, reloading: {}", note_id, e);
                    refresh_notes(ctx, store, navigator, list_id).await;
                }
            });
        })
    };

    let toggle_mode = {
        let ctx = ctx.clone();
        move |_: web_sys::MouseEvent| {
            let (next, refresh) = toggle_layout(store.mode().get_untracked(), list_id, &ctx.session);
            store_set_mode(&store, next);
            log::info!("[BOARD] layout mode {}", next.as_str());
            match refresh {
                LayoutRefresh::Repack => store_rearrange(&store),
                LayoutRefresh::Refetch => spawn_local(refresh_notes(ctx.clone(), store, navigator, list_id)),
            }
        }
    };

    let close_info = {
        let session = session.clone();
        Callback::new(move |do_not_remind: bool| {
            if do_not_remind {
                session.dismiss_info();
                set_show_info_button.set(false);
            }
            store_set_show_info(&store, false);
        })
    };

    // ========================
    // View
    // ========================

    let back = move |_: web_sys::MouseEvent| navigator.go(LISTS_PATH);
    let note_ids = move || {
        store
            .notes()
            .read()
            .as_slice()
            .iter()
            .filter_map(|note| note.id)
            .collect::<Vec<_>>()
    };
    let narrow = Viewport::current().tier().is_narrow();
    let display_name = user_name.clone().unwrap_or_else(|| crate::editor::FALLBACK_USER.to_string());

    view! {
        {move || match store.phase().get() {
            BoardPhase::Validating | BoardPhase::Unauthenticated => view! {
                <div class="board-loading"><div class="spinner"></div></div>
            }
            .into_any(),
            BoardPhase::Error(message) => {
                view! {
                    <div class="board-error">
                        <div class="alert" role="alert">
                            <strong>"Erreur ! "</strong>
                            <span>{message}</span>
                        </div>
                        <button class="btn" on:click=back>"Retour aux listes"</button>
                    </div>
                }
                .into_any()
            }
            BoardPhase::Loaded => {
                let toggle_mode = toggle_mode.clone();
                let user_name = user_name.clone();
                let display_name = display_name.clone();
                let list = store.list().get();
                let name = list.as_ref().map(|l| l.name.clone()).unwrap_or_default();
                let description = list
                    .as_ref()
                    .and_then(|l| l.description.clone())
                    .unwrap_or_else(|| "Aucune description".to_string());
                let created = list.as_ref().map(|l| format_date(&l.created_at)).unwrap_or_default();
                view! {
                    <div class="board">
                        <header class="board-header">
                            <button class="back-btn" on:click=back>"← Retour"</button>
                            <h1
                                class="board-title"
                                title="Ajouter un pense-bête pour le nom de la liste"
                                on:click=move |_| add_note.run(Some(TARGET_LIST_NAME))
                            >
                                {name}
                            </h1>
                            <span class="board-user">"Connecté: " <strong>{display_name}</strong></span>
                        </header>

                        <div class="board-actions">
                            <button class="fab" title="Ajouter un pense-bête" on:click=move |_| add_note.run(None)>
                                "+"
                            </button>
                            {(!narrow).then(|| view! {
                                <button
                                    class="fab"
                                    title=move || format!("Mode actuel: {}", store.mode().get().label())
                                    on:click=toggle_mode
                                >
                                    "▦"
                                </button>
                            })}
                        </div>

                        <Show when=move || show_info_button.get()>
                            <button
                                class="fab info-fab"
                                title="Informations"
                                on:click=move |_| store_set_show_info(&store, true)
                            >
                                "i"
                            </button>
                        </Show>
                        <Show when=move || store.show_info().get()>
                            <InfoDialog on_close=close_info />
                        </Show>

                        <div class="board-canvas">
                            <div class="board-meta">
                                <p>{description}</p>
                                <p class="board-created">"Créée le " {created}</p>
                            </div>
                            <Show
                                when=move || !store.notes().read().is_empty()
                                fallback=move || view! {
                                    <div class="board-empty">
                                        <p>"Cette liste est actuellement vide."</p>
                                        <div class="board-empty-icon">"📝"</div>
                                        <button class="btn" on:click=move |_| add_note.run(None)>
                                            "Ajouter un pense-bête"
                                        </button>
                                    </div>
                                }
                            >
                                <For
                                    each=note_ids
                                    key=|id| *id
                                    children={
                                        let user_name = user_name.clone();
                                        move |id| view! {
                                            <NoteCard
                                                note_id=id
                                                user_name=user_name.clone()
                                                on_update=update_note
                                                on_pin=pin_note
                                                on_delete=delete_note
                                            />
                                        }
                                    }
                                />
                            </Show>
                        </div>
                    </div>
                }
                .into_any()
            }
        }}
    }
}
