//! Note Calls
//!
//! CRUD on the notes of one list. All of these need a token.

use crate::error::{ApiError, Result};
use crate::models::{Note, NoteId};

use super::{ApiClient, Endpoint};

impl ApiClient {
    pub async fn fetch_notes(&self, list_id: i64) -> Result<Vec<Note>> {
        let notes: Vec<Note> = self.get_json(Endpoint::Notes(list_id)).await?;
        log::debug!("[API] loaded {} notes for list {}", notes.len(), list_id);
        Ok(notes)
    }

    /// Persist a new note; the placeholder id (if any) is not sent
    pub async fn create_note(&self, list_id: i64, note: &Note) -> Result<Note> {
        self.send_json(Endpoint::CreateNote(list_id), &note.for_create()).await
    }

    pub async fn update_note(&self, list_id: i64, note: &Note) -> Result<Note> {
        let endpoint = Endpoint::UpdateNote(list_id, persisted_id(note, Endpoint::UpdateNote(list_id, 0))?);
        self.send_json(endpoint, note).await
    }

    pub async fn delete_note(&self, list_id: i64, note_id: NoteId) -> Result<()> {
        self.send_empty(Endpoint::DeleteNote(list_id, note_id)).await
    }
}

/// Server id of `note`; placeholders have none yet
fn persisted_id(note: &Note, endpoint: Endpoint) -> Result<NoteId> {
    match note.id {
        Some(id) if id >= 0 => Ok(id),
        _ => {
            log::warn!("[API] {} refused for unsaved note", endpoint.operation());
            Err(ApiError::ValidationFailed {
                operation: endpoint.operation(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Position, Size, DEFAULT_COLOR};

    fn note(id: Option<NoteId>) -> Note {
        Note {
            id,
            list_id: 7,
            title: "t".into(),
            description: None,
            options: vec![],
            position: Position::default(),
            size: Size::new(350.0, 350.0),
            color: DEFAULT_COLOR.into(),
            pinned: false,
            created_at: None,
            created_by: None,
            target_element: None,
            user_name: None,
        }
    }

    #[test]
    fn test_placeholders_cannot_be_updated() {
        let endpoint = Endpoint::UpdateNote(7, 0);
        assert_eq!(persisted_id(&note(Some(12)), endpoint), Ok(12));
        assert_eq!(
            persisted_id(&note(Some(-3)), endpoint),
            Err(ApiError::ValidationFailed { operation: "mise à jour du pense-bête" })
        );
        assert!(persisted_id(&note(None), endpoint).is_err());
    }
}
