//! Board State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The note
//! collection is only ever mutated through the helpers below.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::board::{BoardPhase, NoteCollection};
use crate::layout::Viewport;
use crate::models::{LayoutMode, List, Note, NoteId};

/// State of the board page with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct BoardState {
    pub list_id: i64,
    /// Loaded list metadata
    pub list: Option<List>,
    pub notes: NoteCollection,
    pub phase: BoardPhase,
    pub mode: LayoutMode,
    /// Info dialog open
    pub show_info: bool,
}

impl BoardState {
    pub fn new(list_id: i64, mode: LayoutMode, phase: BoardPhase) -> Self {
        Self {
            list_id,
            mode,
            phase,
            ..Default::default()
        }
    }
}

/// Type alias for the store
pub type BoardStore = Store<BoardState>;

/// Get the board store from context
pub fn use_board_store() -> BoardStore {
    expect_context::<BoardStore>()
}

// ========================
// Store Helper Functions
// ========================
//
// Responses can land after the board page is gone; every helper is a no-op
// on a disposed store.

fn current_mode(store: &BoardStore) -> Option<LayoutMode> {
    store.mode().try_get_untracked()
}

pub fn store_set_phase(store: &BoardStore, phase: BoardPhase) {
    let field = store.phase();
    if let Some(mut current) = field.try_write() {
        *current = phase;
    };
}

pub fn store_set_list(store: &BoardStore, list: List) {
    let field = store.list();
    if let Some(mut current) = field.try_write() {
        *current = Some(list);
    };
}

pub fn store_set_mode(store: &BoardStore, mode: LayoutMode) {
    let field = store.mode();
    if let Some(mut current) = field.try_write() {
        *current = mode;
    };
}

pub fn store_set_show_info(store: &BoardStore, open: bool) {
    let field = store.show_info();
    if let Some(mut current) = field.try_write() {
        *current = open;
    };
}

/// Replace all notes, laid out for the current mode
pub fn store_set_notes(store: &BoardStore, notes: Vec<Note>) {
    let Some(mode) = current_mode(store) else { return };
    let field = store.notes();
    if let Some(mut current) = field.try_write() {
        *current = NoteCollection::arranged(notes, mode, Viewport::current());
    };
}

/// Re-run the layout for the current mode
pub fn store_rearrange(store: &BoardStore) {
    let Some(mode) = current_mode(store) else { return };
    let field = store.notes();
    if let Some(mut notes) = field.try_write() {
        notes.rearrange(mode, Viewport::current());
    };
}

/// Show `note` right away; returns its placeholder id
pub fn store_insert_placeholder(store: &BoardStore, note: Note) -> Option<NoteId> {
    let now_ms = chrono::Utc::now().timestamp_millis();
    let field = store.notes();
    let mut notes = field.try_write()?;
    let temp_id = notes.next_temp_id(now_ms);
    notes.insert_placeholder(note, temp_id);
    Some(temp_id)
}

pub fn store_confirm_created(store: &BoardStore, temp_id: NoteId, created: Note) -> bool {
    let Some(mode) = current_mode(store) else { return false };
    let field = store.notes();
    let Some(mut notes) = field.try_write() else { return false };
    notes.confirm_created(temp_id, created, mode, Viewport::current())
}

pub fn store_discard_placeholder(store: &BoardStore, temp_id: NoteId) -> bool {
    let Some(mode) = current_mode(store) else { return false };
    let field = store.notes();
    let Some(mut notes) = field.try_write() else { return false };
    notes.discard_placeholder(temp_id, mode, Viewport::current())
}

/// Update a note in the store by ID; returns the version it replaced
pub fn store_replace_note(store: &BoardStore, note: Note) -> Option<Note> {
    let mode = current_mode(store)?;
    let field = store.notes();
    let mut notes = field.try_write()?;
    notes.replace(note, mode, Viewport::current())
}

/// Remove a note from the store by ID
pub fn store_remove_note(store: &BoardStore, note_id: NoteId) -> Option<Note> {
    let mode = current_mode(store)?;
    let field = store.notes();
    let mut notes = field.try_write()?;
    notes.remove(note_id, mode, Viewport::current())
}
