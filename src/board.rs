//! Board Controller State
//!
//! The session phase of a board page and the in-memory note collection with
//! its optimistic bookkeeping. Every confirmation or rollback is keyed by
//! note id; one that targets a note no longer present is dropped.

use crate::error::ApiError;
use crate::layout::{pack, probe_position, ColumnMetrics, Viewport, NARROW_LEFT_INSET, PROBE_ID};
use crate::models::{LayoutMode, Note, NoteId, Position, DEFAULT_COLOR, TARGET_LIST_NAME};
use crate::routes::access_path;
use crate::session::SessionContext;

pub const NEW_NOTE_TITLE: &str = "Nouveau pense-bête";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BoardPhase {
    /// No usable token: the access flow takes over
    Unauthenticated,
    /// Token present, being checked and data being fetched
    #[default]
    Validating,
    Loaded,
    /// Terminal; only "back" is offered
    Error(String),
}

impl BoardPhase {
    pub fn initial(has_token: bool) -> Self {
        if has_token {
            BoardPhase::Validating
        } else {
            BoardPhase::Unauthenticated
        }
    }

    pub fn after_validation(valid: bool) -> Self {
        Self::initial(valid)
    }

    pub fn from_error(error: &ApiError) -> Self {
        if error.requires_access() {
            BoardPhase::Unauthenticated
        } else {
            BoardPhase::Error(error.to_string())
        }
    }
}

/// What the board page does after a phase change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardStep {
    /// Ask the server whether the stored token still holds
    CheckToken,
    /// Fetch the list and its notes
    Load,
    /// Leave for this path
    Redirect(String),
    /// Nothing further
    Stay,
}

/// Phase and first step when the board of `list_id` is opened
pub fn open_board(list_id: i64, session: &SessionContext) -> (BoardPhase, BoardStep) {
    let phase = BoardPhase::initial(session.has_access_to_list(list_id));
    let step = match phase {
        BoardPhase::Validating => BoardStep::CheckToken,
        _ => BoardStep::Redirect(access_path(list_id)),
    };
    (phase, step)
}

/// Phase and step once the server has answered the token check
pub fn token_checked(list_id: i64, valid: bool) -> (BoardPhase, BoardStep) {
    let phase = BoardPhase::after_validation(valid);
    let step = if valid {
        BoardStep::Load
    } else {
        BoardStep::Redirect(access_path(list_id))
    };
    (phase, step)
}

/// Phase and step after a remote call failed
pub fn board_failed(list_id: i64, error: &ApiError) -> (BoardPhase, BoardStep) {
    let phase = BoardPhase::from_error(error);
    let step = match phase {
        BoardPhase::Unauthenticated => BoardStep::Redirect(access_path(list_id)),
        _ => BoardStep::Stay,
    };
    (phase, step)
}

/// How the collection is refreshed after a layout switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutRefresh {
    /// Re-pack the notes already held
    Repack,
    /// Fetch the server's stored positions again
    Refetch,
}

/// Flip the layout of `list_id` and remember the choice
pub fn toggle_layout(current: LayoutMode, list_id: i64, session: &SessionContext) -> (LayoutMode, LayoutRefresh) {
    let next = current.toggled();
    session.set_layout_mode(list_id, next);
    let refresh = match next {
        LayoutMode::Column => LayoutRefresh::Repack,
        LayoutMode::Absolute => LayoutRefresh::Refetch,
    };
    (next, refresh)
}

/// Notes shown on the board, in display order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteCollection {
    notes: Vec<Note>,
}

impl NoteCollection {
    /// Collection laid out for `mode`
    pub fn arranged(notes: Vec<Note>, mode: LayoutMode, viewport: Viewport) -> Self {
        Self {
            notes: pack(&notes, mode, viewport),
        }
    }

    pub fn as_slice(&self) -> &[Note] {
        &self.notes
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == Some(id))
    }

    pub fn contains(&self, id: NoteId) -> bool {
        self.get(id).is_some()
    }

    pub fn rearrange(&mut self, mode: LayoutMode, viewport: Viewport) {
        if mode == LayoutMode::Column {
            self.notes = pack(&self.notes, mode, viewport);
        }
    }

    /// Fresh placeholder id: negative, derived from `now_ms`, unused locally
    pub fn next_temp_id(&self, now_ms: i64) -> NoteId {
        let mut id = -now_ms.max(1);
        while id == PROBE_ID || self.contains(id) {
            id -= 1;
        }
        id
    }

    /// Show `note` immediately under a placeholder id
    pub fn insert_placeholder(&mut self, note: Note, temp_id: NoteId) {
        self.notes.push(Note {
            id: Some(temp_id),
            ..note
        });
    }

    /// Swap the placeholder for the server's note. Returns false when the
    /// placeholder is already gone (the response is dropped).
    pub fn confirm_created(&mut self, temp_id: NoteId, created: Note, mode: LayoutMode, viewport: Viewport) -> bool {
        let Some(index) = self.notes.iter().position(|note| note.id == Some(temp_id)) else {
            return false;
        };
        let already_listed = created.id.is_some() && self.notes.iter().any(|note| note.id == created.id);
        if already_listed {
            self.notes.remove(index);
        } else {
            self.notes[index] = created;
        }
        self.rearrange(mode, viewport);
        true
    }

    /// Remove a placeholder whose creation failed
    pub fn discard_placeholder(&mut self, temp_id: NoteId, mode: LayoutMode, viewport: Viewport) -> bool {
        let before = self.notes.len();
        self.notes.retain(|note| note.id != Some(temp_id));
        let removed = self.notes.len() != before;
        if removed {
            self.rearrange(mode, viewport);
        }
        removed
    }

    /// Replace the note with the same id; returns the previous version
    pub fn replace(&mut self, note: Note, mode: LayoutMode, viewport: Viewport) -> Option<Note> {
        let slot = self.notes.iter_mut().find(|current| current.id.is_some() && current.id == note.id)?;
        let previous = std::mem::replace(slot, note);
        self.rearrange(mode, viewport);
        Some(previous)
    }

    pub fn remove(&mut self, id: NoteId, mode: LayoutMode, viewport: Viewport) -> Option<Note> {
        let index = self.notes.iter().position(|note| note.id == Some(id))?;
        let removed = self.notes.remove(index);
        self.rearrange(mode, viewport);
        Some(removed)
    }
}

/// Mode to use when adding a note: narrow screens always go columnar
pub fn mode_for_add(mode: LayoutMode, viewport: Viewport) -> LayoutMode {
    if viewport.tier().is_narrow() {
        LayoutMode::Column
    } else {
        mode
    }
}

/// Mode a new note is added under; a forced switch is remembered for the list
pub fn settle_add_mode(current: LayoutMode, viewport: Viewport, list_id: i64, session: &SessionContext) -> LayoutMode {
    let mode = mode_for_add(current, viewport);
    if mode != current {
        session.set_layout_mode(list_id, mode);
    }
    mode
}

/// Where a fresh note starts before any layout
fn initial_position(target: Option<&str>, viewport: Viewport) -> Position {
    let x = if viewport.tier().is_narrow() { NARROW_LEFT_INSET } else { 50.0 };
    let y = match target {
        Some(TARGET_LIST_NAME) => 50.0,
        Some(_) => 150.0,
        None => 50.0,
    };
    Position::new(x, y)
}

/// New draft note for the board, already placed for `mode`
pub fn blank_note(
    list_id: i64,
    user_name: Option<&str>,
    target: Option<&str>,
    created_at: String,
    existing: &[Note],
    mode: LayoutMode,
    viewport: Viewport,
) -> Note {
    let mut note = Note {
        id: None,
        list_id,
        title: NEW_NOTE_TITLE.to_string(),
        description: None,
        options: Vec::new(),
        position: initial_position(target, viewport),
        size: ColumnMetrics::for_viewport(viewport).note_size,
        color: DEFAULT_COLOR.to_string(),
        pinned: false,
        created_at: Some(created_at),
        created_by: user_name.map(str::to_string),
        target_element: target.map(str::to_string),
        user_name: user_name.map(str::to_string),
    };
    if mode == LayoutMode::Column {
        if let Some(position) = probe_position(existing, &note, viewport) {
            note.position = position;
        }
    }
    note
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::NoteEditor;
    use crate::models::{AuthToken, ChecklistItem, Size};

    const WIDE: Viewport = Viewport { width: 1400.0, height: 1000.0 };
    const NARROW: Viewport = Viewport { width: 400.0, height: 800.0 };

    fn make_note(id: i64, minute: u32) -> Note {
        Note {
            id: Some(id),
            list_id: 7,
            title: format!("Note {}", id),
            description: None,
            options: vec![],
            position: Position::new(0.0, 0.0),
            size: Size::new(350.0, 350.0),
            color: DEFAULT_COLOR.into(),
            pinned: false,
            created_at: Some(format!("2025-03-01T10:{:02}:00Z", minute)),
            created_by: None,
            target_element: None,
            user_name: None,
        }
    }

    fn collection(ids: &[i64]) -> NoteCollection {
        let notes = ids.iter().map(|&id| make_note(id, id as u32)).collect();
        NoteCollection::arranged(notes, LayoutMode::Column, WIDE)
    }

    #[test]
    fn test_phases() {
        assert_eq!(BoardPhase::initial(false), BoardPhase::Unauthenticated);
        assert_eq!(BoardPhase::initial(true), BoardPhase::Validating);
        assert_eq!(BoardPhase::after_validation(false), BoardPhase::Unauthenticated);
        assert_eq!(BoardPhase::from_error(&ApiError::Unauthorized), BoardPhase::Unauthenticated);
        assert_eq!(
            BoardPhase::from_error(&ApiError::NotFound),
            BoardPhase::Error("Liste non trouvée".into())
        );
    }

    fn session_with_token(list_id: i64) -> SessionContext {
        let session = SessionContext::in_memory();
        session.save_token(&AuthToken {
            token: "abc".into(),
            expires_at: "2999-01-01T00:00:00Z".into(),
            user_name: "Alice".into(),
            list_id,
        });
        session
    }

    #[test]
    fn test_open_without_token_redirects_to_access() {
        let session = SessionContext::in_memory();
        assert_eq!(
            open_board(7, &session),
            (BoardPhase::Unauthenticated, BoardStep::Redirect("/access/7".into()))
        );

        let elsewhere = session_with_token(3);
        assert_eq!(
            open_board(7, &elsewhere),
            (BoardPhase::Unauthenticated, BoardStep::Redirect("/access/7".into()))
        );
    }

    #[test]
    fn test_open_with_token_checks_it_first() {
        let session = session_with_token(7);
        assert_eq!(open_board(7, &session), (BoardPhase::Validating, BoardStep::CheckToken));
        assert_eq!(token_checked(7, true), (BoardPhase::Validating, BoardStep::Load));
        assert_eq!(
            token_checked(7, false),
            (BoardPhase::Unauthenticated, BoardStep::Redirect("/access/7".into()))
        );
    }

    #[test]
    fn test_failures_redirect_only_when_unauthorized() {
        assert_eq!(
            board_failed(7, &ApiError::Unauthorized),
            (BoardPhase::Unauthenticated, BoardStep::Redirect("/access/7".into()))
        );
        assert_eq!(
            board_failed(7, &ApiError::NotFound),
            (BoardPhase::Error("Liste non trouvée".into()), BoardStep::Stay)
        );
        assert_eq!(
            board_failed(7, &ApiError::NetworkUnreachable),
            (BoardPhase::Error("Serveur injoignable".into()), BoardStep::Stay)
        );
    }

    #[test]
    fn test_toggle_layout_repacks_or_refetches_and_persists() {
        let session = SessionContext::in_memory();
        assert_eq!(
            toggle_layout(LayoutMode::Absolute, 7, &session),
            (LayoutMode::Column, LayoutRefresh::Repack)
        );
        assert_eq!(session.layout_mode(7), Some(LayoutMode::Column));

        assert_eq!(
            toggle_layout(LayoutMode::Column, 7, &session),
            (LayoutMode::Absolute, LayoutRefresh::Refetch)
        );
        assert_eq!(session.layout_mode(7), Some(LayoutMode::Absolute));
        assert_eq!(session.layout_mode(8), None);
    }

    #[test]
    fn test_narrow_add_persists_column_mode() {
        let session = SessionContext::in_memory();
        session.set_layout_mode(7, LayoutMode::Absolute);

        assert_eq!(settle_add_mode(LayoutMode::Absolute, WIDE, 7, &session), LayoutMode::Absolute);
        assert_eq!(session.layout_mode(7), Some(LayoutMode::Absolute));

        assert_eq!(settle_add_mode(LayoutMode::Absolute, NARROW, 7, &session), LayoutMode::Column);
        assert_eq!(session.layout_mode(7), Some(LayoutMode::Column));
    }

    #[test]
    fn test_failed_tick_rolls_back_on_draft_card() {
        let mut note = make_note(3, 3);
        note.options = vec![ChecklistItem::new("Pain")];
        let mut notes = NoteCollection::arranged(vec![note.clone()], LayoutMode::Absolute, WIDE);
        let mut ed = NoteEditor::new(note, Some("Alice".into()));

        let optimistic = ed.toggle_item(0).unwrap();
        let previous = notes.replace(optimistic, LayoutMode::Absolute, WIDE).unwrap();
        ed.sync_from(notes.get(3).unwrap());
        assert!(ed.is_item_checked(0));

        notes.replace(previous, LayoutMode::Absolute, WIDE);
        ed.sync_from(notes.get(3).unwrap());
        assert!(notes.get(3).unwrap().options[0].checked_users.is_empty());
        assert!(!ed.is_item_checked(0));
    }

    #[test]
    fn test_placeholder_card_is_locked_until_confirmed() {
        let mut notes = collection(&[1]);
        let temp = notes.next_temp_id(1_000);
        notes.insert_placeholder(make_note(0, 30), temp);

        let mut ed = NoteEditor::new(notes.get(temp).unwrap().clone(), Some("Alice".into()));
        assert!(ed.set_title("lost").is_err());
        assert!(!ed.can_edit_content());

        assert!(notes.confirm_created(temp, make_note(42, 30), LayoutMode::Column, WIDE));
        let mut confirmed = NoteEditor::new(notes.get(42).unwrap().clone(), Some("Alice".into()));
        assert!(confirmed.set_title("kept").is_ok());
    }

    #[test]
    fn test_temp_ids_never_collide() {
        let mut notes = collection(&[1, 2]);
        let first = notes.next_temp_id(1_700_000_000_000);
        assert!(first < 0);
        notes.insert_placeholder(make_note(0, 30), first);
        let second = notes.next_temp_id(1_700_000_000_000);
        assert_ne!(first, second);
        assert!(second < 0);
        assert_ne!(notes.next_temp_id(9999), PROBE_ID);
    }

    #[test]
    fn test_optimistic_create_success_replaces_one_to_one() {
        let mut notes = collection(&[1, 2]);
        let temp = notes.next_temp_id(1_000);
        notes.insert_placeholder(make_note(0, 30), temp);
        assert_eq!(notes.as_slice().len(), 3);
        assert!(notes.get(temp).unwrap().is_placeholder());

        assert!(notes.confirm_created(temp, make_note(42, 30), LayoutMode::Column, WIDE));
        assert_eq!(notes.as_slice().len(), 3);
        assert!(!notes.contains(temp));
        assert_eq!(notes.as_slice().iter().filter(|n| n.id == Some(42)).count(), 1);
        assert!(notes.as_slice().iter().all(|n| !n.is_placeholder()));
    }

    #[test]
    fn test_optimistic_create_failure_removes_placeholder() {
        let mut notes = collection(&[1, 2]);
        let before = notes.clone();
        let temp = notes.next_temp_id(1_000);
        notes.insert_placeholder(make_note(0, 30), temp);
        assert!(notes.discard_placeholder(temp, LayoutMode::Column, WIDE));
        assert_eq!(notes, before);
        assert!(!notes.discard_placeholder(temp, LayoutMode::Column, WIDE));
    }

    #[test]
    fn test_late_confirmation_for_vanished_placeholder_is_dropped() {
        let mut notes = collection(&[1]);
        assert!(!notes.confirm_created(-5, make_note(9, 9), LayoutMode::Column, WIDE));
        assert!(!notes.contains(9));
    }

    #[test]
    fn test_confirmation_for_already_listed_note_does_not_duplicate() {
        let mut notes = collection(&[1, 42]);
        notes.insert_placeholder(make_note(0, 50), -7);
        assert!(notes.confirm_created(-7, make_note(42, 42), LayoutMode::Column, WIDE));
        assert_eq!(notes.as_slice().len(), 2);
    }

    #[test]
    fn test_replace_keyed_by_id_and_rollback() {
        let mut notes = collection(&[1, 2, 3]);
        let edited = Note { title: "changed".into(), ..notes.get(2).unwrap().clone() };
        let previous = notes.replace(edited, LayoutMode::Absolute, WIDE).unwrap();
        assert_eq!(notes.get(2).unwrap().title, "changed");
        assert_eq!(notes.get(1).unwrap().title, "Note 1");

        notes.replace(previous, LayoutMode::Absolute, WIDE);
        assert_eq!(notes.get(2).unwrap().title, "Note 2");
        assert!(notes.replace(make_note(99, 1), LayoutMode::Absolute, WIDE).is_none());
    }

    #[test]
    fn test_remove_repacks_in_column_mode() {
        let mut notes = collection(&[1, 2, 3, 4]);
        assert_eq!(notes.get(4).unwrap().position, Position::new(400.0, 0.0));
        notes.remove(1, LayoutMode::Column, WIDE).unwrap();
        assert_eq!(notes.get(2).unwrap().position, Position::new(0.0, 0.0));
        assert_eq!(notes.get(4).unwrap().position, Position::new(0.0, 720.0));
        assert!(notes.remove(1, LayoutMode::Column, WIDE).is_none());
    }

    #[test]
    fn test_blank_note_in_column_mode_lands_in_next_slot() {
        let existing = collection(&[1, 2, 3]);
        let note = blank_note(
            7,
            Some("Alice"),
            None,
            "2025-03-01T11:00:00Z".into(),
            existing.as_slice(),
            LayoutMode::Column,
            WIDE,
        );
        assert_eq!(note.position, Position::new(400.0, 0.0));
        assert_eq!(note.title, NEW_NOTE_TITLE);
        assert_eq!(note.created_by.as_deref(), Some("Alice"));
        assert_eq!(note.size, Size::new(350.0, 350.0));
        assert!(note.id.is_none());
    }

    #[test]
    fn test_blank_note_absolute_positions() {
        let free = blank_note(7, None, None, String::new(), &[], LayoutMode::Absolute, WIDE);
        assert_eq!(free.position, Position::new(50.0, 50.0));
        let anchored = blank_note(7, None, Some(TARGET_LIST_NAME), String::new(), &[], LayoutMode::Absolute, WIDE);
        assert_eq!(anchored.position, Position::new(50.0, 50.0));
        assert_eq!(anchored.target_element.as_deref(), Some(TARGET_LIST_NAME));
        let other = blank_note(7, None, Some("created-at"), String::new(), &[], LayoutMode::Absolute, WIDE);
        assert_eq!(other.position, Position::new(50.0, 150.0));
    }

    #[test]
    fn test_narrow_add_forces_column() {
        assert_eq!(mode_for_add(LayoutMode::Absolute, NARROW), LayoutMode::Column);
        assert_eq!(mode_for_add(LayoutMode::Absolute, WIDE), LayoutMode::Absolute);
    }

    #[test]
    fn test_scenario_five_notes_narrow_single_column() {
        let notes: Vec<Note> = [5, 3, 1, 4, 2].iter().map(|&i| make_note(i, i as u32)).collect();
        let arranged = NoteCollection::arranged(notes, LayoutMode::Column, NARROW);
        let order: Vec<_> = arranged.as_slice().iter().map(|n| n.id.unwrap()).collect();
        assert_eq!(order, vec![1, 2, 3, 4, 5]);
        for pair in arranged.as_slice().windows(2) {
            assert_eq!(pair[0].position.x, pair[1].position.x);
            assert!(pair[0].position.y + pair[0].size.height <= pair[1].position.y);
        }
    }
}
