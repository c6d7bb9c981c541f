//! Note Editor
//!
//! Local editable state of one note: a buffered copy of its content and
//! placement, the Draft/Pinned mode, and the pointer gesture in progress.
//! Every committed change is returned as a full note snapshot for the
//! board to persist; the editor never touches the board's collection.

use leptos_gesture::{clamp_origin, resize_extent, Bounds, PointerSample};

use crate::error::EditorError;
use crate::layout::DeviceTier;
use crate::models::{is_palette_color, ChecklistItem, LayoutMode, Note, NoteId, Position, Size};

/// Longest description shown on a pinned note before truncation
pub const DESCRIPTION_PREVIEW_CHARS: usize = 700;

/// Name used for checklist ticks when the session has none
pub const FALLBACK_USER: &str = "Utilisateur";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    /// Text, checklist, color, size and position are editable
    Draft,
    /// Text is frozen; only checklist ticks and "edit" are available
    Pinned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    PinConfirmed,
    PinFailed,
    Unpin,
}

impl EditorMode {
    pub fn of(note: &Note) -> Self {
        if note.pinned {
            EditorMode::Pinned
        } else {
            EditorMode::Draft
        }
    }

    /// Transition table
    pub fn next(self, event: EditorEvent) -> Result<EditorMode, EditorError> {
        match (self, event) {
            (EditorMode::Draft, EditorEvent::PinConfirmed) => Ok(EditorMode::Pinned),
            (EditorMode::Draft, EditorEvent::PinFailed) => Ok(EditorMode::Draft),
            (EditorMode::Draft, EditorEvent::Unpin) => Err(EditorError::NotPinned),
            (EditorMode::Pinned, EditorEvent::Unpin) => Ok(EditorMode::Draft),
            (EditorMode::Pinned, _) => Err(EditorError::AlreadyPinned),
        }
    }
}

/// Locally buffered copy of the editable fields
#[derive(Debug, Clone, PartialEq)]
pub struct NoteBuffer {
    pub title: String,
    pub description: String,
    pub options: Vec<ChecklistItem>,
    pub position: Position,
    pub size: Size,
    pub color: String,
}

impl NoteBuffer {
    fn from_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            description: note.description.clone().unwrap_or_default(),
            options: note.options.clone(),
            position: note.position,
            size: note.size,
            color: note.color.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActiveGesture {
    /// Pointer offset from the note's top-left corner when grabbed
    Drag { grab_offset: (f64, f64) },
    Resize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoteEditor {
    note: Note,
    buffer: NoteBuffer,
    mode: EditorMode,
    pin_pending: bool,
    gesture: Option<ActiveGesture>,
    user_name: String,
}

impl NoteEditor {
    pub fn new(note: Note, user_name: Option<String>) -> Self {
        Self {
            buffer: NoteBuffer::from_note(&note),
            mode: EditorMode::of(&note),
            pin_pending: false,
            gesture: None,
            user_name: user_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| FALLBACK_USER.to_string()),
            note,
        }
    }

    pub fn buffer(&self) -> &NoteBuffer {
        &self.buffer
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == EditorMode::Draft
    }

    pub fn is_pin_pending(&self) -> bool {
        self.pin_pending
    }

    /// Still waiting for the server id; every edit is refused until then
    pub fn is_unsaved(&self) -> bool {
        self.note.is_placeholder()
    }

    /// Text, checklist lines and color can be changed right now
    pub fn can_edit_content(&self) -> bool {
        self.is_editing() && !self.is_unsaved() && !self.pin_pending
    }

    pub fn gesture(&self) -> Option<ActiveGesture> {
        self.gesture
    }

    /// Adopt a new authoritative note.
    ///
    /// Placement is left alone while a gesture is live. Pinned notes mirror
    /// the authoritative content; drafts keep the text being typed but take
    /// the authoritative ticks of every checklist line they still hold.
    pub fn sync_from(&mut self, note: &Note) {
        if &self.note == note {
            return;
        }
        self.note = note.clone();

        if !self.pin_pending && EditorMode::of(note) != self.mode {
            self.mode = EditorMode::of(note);
            self.buffer = NoteBuffer::from_note(note);
        } else if self.mode == EditorMode::Pinned {
            self.buffer = NoteBuffer::from_note(note);
        } else {
            self.adopt_ticks(&note.options);
        }

        if self.gesture.is_none() {
            self.buffer.position = note.position;
            self.buffer.size = note.size;
        }
    }

    /// Lines are matched by text, each authoritative line used once; lines
    /// added locally keep their ticks.
    fn adopt_ticks(&mut self, options: &[ChecklistItem]) {
        let mut taken = vec![false; options.len()];
        for item in &mut self.buffer.options {
            let found = options
                .iter()
                .enumerate()
                .position(|(index, other)| !taken[index] && other.text == item.text);
            if let Some(index) = found {
                taken[index] = true;
                item.checked_users = options[index].checked_users.clone();
            }
        }
    }

    // ========================
    // Gestures
    // ========================

    pub fn can_drag(&self, layout: LayoutMode) -> bool {
        layout == LayoutMode::Absolute && !self.is_unsaved() && (!self.note.pinned || self.is_editing())
    }

    pub fn can_resize(&self) -> bool {
        !self.is_unsaved() && (self.is_editing() || !self.note.pinned)
    }

    /// Start dragging. `note_origin` is the note's top-left in client coordinates.
    pub fn begin_drag(
        &mut self,
        layout: LayoutMode,
        pointer: PointerSample,
        note_origin: (f64, f64),
        from_control: bool,
    ) -> bool {
        if from_control || self.gesture.is_some() || !self.can_drag(layout) {
            return false;
        }
        self.gesture = Some(ActiveGesture::Drag {
            grab_offset: (pointer.client_x - note_origin.0, pointer.client_y - note_origin.1),
        });
        true
    }

    pub fn begin_resize(&mut self) -> bool {
        if self.gesture.is_some() || !self.can_resize() {
            return false;
        }
        self.gesture = Some(ActiveGesture::Resize);
        true
    }

    /// Follow the pointer inside `canvas` (the parent's client rectangle)
    pub fn pointer_moved(&mut self, pointer: PointerSample, canvas: Bounds, tier: DeviceTier) {
        match self.gesture {
            Some(ActiveGesture::Drag { grab_offset }) => {
                let footprint = (self.buffer.size.width, self.buffer.size.height);
                let (x, y) = clamp_origin(pointer, grab_offset, canvas, footprint);
                self.buffer.position = Position::new(x, y);
            }
            Some(ActiveGesture::Resize) => {
                let origin = (self.buffer.position.x, self.buffer.position.y);
                let (width, height) =
                    resize_extent(pointer, origin, canvas, tier.width_range(), tier.height_range());
                self.buffer.size = Size::new(width, height);
            }
            None => {}
        }
    }

    /// Finish the gesture; the snapshot carries the new position and size
    pub fn end_gesture(&mut self) -> Option<Note> {
        self.gesture.take()?;
        Some(Note {
            position: self.buffer.position,
            size: self.buffer.size,
            ..self.note.clone()
        })
    }

    /// Drop the gesture and snap back to the authoritative placement
    pub fn cancel_gesture(&mut self) {
        if self.gesture.take().is_some() {
            self.buffer.position = self.note.position;
            self.buffer.size = self.note.size;
        }
    }

    // ========================
    // Draft editing (local only until pinned, closed while unsaved)
    // ========================

    fn ensure_editing(&self) -> Result<(), EditorError> {
        if self.is_unsaved() {
            Err(EditorError::NotSaved)
        } else if self.is_editing() {
            Ok(())
        } else {
            Err(EditorError::Pinned)
        }
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), EditorError> {
        self.ensure_editing()?;
        self.buffer.title = title.to_string();
        Ok(())
    }

    pub fn set_description(&mut self, description: &str) -> Result<(), EditorError> {
        self.ensure_editing()?;
        self.buffer.description = description.to_string();
        Ok(())
    }

    pub fn set_color(&mut self, color: &str) -> Result<(), EditorError> {
        self.ensure_editing()?;
        if !is_palette_color(color) {
            return Err(EditorError::UnknownColor(color.to_string()));
        }
        self.buffer.color = color.to_string();
        Ok(())
    }

    pub fn add_item(&mut self, text: &str) -> Result<(), EditorError> {
        self.ensure_editing()?;
        let text = text.trim();
        if text.is_empty() {
            return Err(EditorError::EmptyItem);
        }
        self.buffer.options.push(ChecklistItem::new(text));
        Ok(())
    }

    pub fn remove_item(&mut self, index: usize) -> Result<(), EditorError> {
        self.ensure_editing()?;
        if index >= self.buffer.options.len() {
            return Err(EditorError::NoSuchItem(index));
        }
        self.buffer.options.remove(index);
        Ok(())
    }

    // ========================
    // Committed changes
    // ========================

    /// Flip the session user's tick on one item. Open in both modes.
    pub fn toggle_item(&mut self, index: usize) -> Result<Note, EditorError> {
        if self.is_unsaved() {
            return Err(EditorError::NotSaved);
        }
        let item = self
            .buffer
            .options
            .get_mut(index)
            .ok_or(EditorError::NoSuchItem(index))?;
        item.toggle(&self.user_name);
        Ok(Note {
            options: self.buffer.options.clone(),
            ..self.note.clone()
        })
    }

    pub fn is_item_checked(&self, index: usize) -> bool {
        self.buffer
            .options
            .get(index)
            .map(|item| item.is_checked_by(&self.user_name))
            .unwrap_or(false)
    }

    /// Freeze the buffer into a pinned snapshot; the mode changes once
    /// [`NoteEditor::pin_settled`] reports the outcome.
    pub fn pin(&mut self) -> Result<Note, EditorError> {
        if self.mode == EditorMode::Pinned {
            return Err(EditorError::AlreadyPinned);
        }
        if self.pin_pending {
            return Err(EditorError::PinPending);
        }
        if self.is_unsaved() {
            return Err(EditorError::NotSaved);
        }
        self.pin_pending = true;
        let description = self.buffer.description.clone();
        Ok(Note {
            title: self.buffer.title.clone(),
            description: if description.is_empty() { None } else { Some(description) },
            options: self.buffer.options.clone(),
            position: self.buffer.position,
            size: self.buffer.size,
            color: self.buffer.color.clone(),
            pinned: true,
            ..self.note.clone()
        })
    }

    pub fn pin_settled(&mut self, succeeded: bool) -> Result<EditorMode, EditorError> {
        if !self.pin_pending {
            return Err(EditorError::NotPinned);
        }
        self.pin_pending = false;
        let event = if succeeded { EditorEvent::PinConfirmed } else { EditorEvent::PinFailed };
        self.mode = self.mode.next(event)?;
        Ok(self.mode)
    }

    /// Unpin a pinned note and re-enter editing
    pub fn edit(&mut self) -> Result<Note, EditorError> {
        if !self.note.pinned {
            return Err(EditorError::NotPinned);
        }
        self.mode = self.mode.next(EditorEvent::Unpin)?;
        self.buffer = NoteBuffer::from_note(&self.note);
        Ok(Note {
            pinned: false,
            ..self.note.clone()
        })
    }

    /// Id to delete; only saved drafts offer deletion
    pub fn delete_target(&self) -> Option<NoteId> {
        if self.note.pinned || self.is_unsaved() {
            None
        } else {
            self.note.id
        }
    }

    /// Description as displayed on a pinned note
    pub fn description_preview(&self) -> String {
        let text = &self.buffer.description;
        if text.chars().count() > DESCRIPTION_PREVIEW_CHARS {
            let cut: String = text.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
            format!("{}...", cut)
        } else {
            text.clone()
        }
    }
}
