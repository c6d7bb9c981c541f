//! Frontend Models
//!
//! Data structures matching the board API's JSON entities.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Note id as assigned by the server. Negative values are local placeholders.
pub type NoteId = i64;

/// Board identity and metadata (read-only here)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
}

/// Proof of access-code verification for one list and one user name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthToken {
    pub token: String,
    /// ISO-8601 expiry
    pub expires_at: String,
    pub user_name: String,
    pub list_id: i64,
}

/// Body of `POST /lists/verify`
#[derive(Debug, Clone, Serialize)]
pub struct AccessCodeVerification<'a> {
    pub id: i64,
    pub access_code: &'a str,
}

/// Body of `POST /lists/verify-with-user`
#[derive(Debug, Clone, Serialize)]
pub struct AccessCodeVerificationWithUser<'a> {
    pub id: i64,
    pub access_code: &'a str,
    pub user_name: &'a str,
}

/// Body of `POST /lists`
#[derive(Debug, Clone, Serialize)]
pub struct NewList<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub access_code: &'a str,
}

/// One to-do line of a note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub text: String,
    /// Distinct names of users who ticked this item, in ticking order
    #[serde(rename = "checkedUsers", default)]
    pub checked_users: Vec<String>,
}

impl ChecklistItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            checked_users: Vec::new(),
        }
    }

    pub fn is_checked_by(&self, user: &str) -> bool {
        self.checked_users.iter().any(|u| u == user)
    }

    /// Flip `user`'s tick; returns the new state
    pub fn toggle(&mut self, user: &str) -> bool {
        if self.is_checked_by(user) {
            self.checked_users.retain(|u| u != user);
            false
        } else {
            self.checked_users.push(user.to_string());
            true
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Semantic anchor for notes created from the list title
pub const TARGET_LIST_NAME: &str = "list-name";

/// Sticky note ("pense-bête")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NoteId>,
    pub list_id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub options: Vec<ChecklistItem>,
    pub position: Position,
    pub size: Size,
    pub color: String,
    pub pinned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_element: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

impl Note {
    /// Not yet confirmed by the server
    pub fn is_placeholder(&self) -> bool {
        matches!(self.id, Some(id) if id < 0)
    }

    /// Copy suitable for `POST`: no id, no server timestamp
    pub fn for_create(&self) -> Note {
        Note {
            id: None,
            created_at: None,
            ..self.clone()
        }
    }
}

/// How notes are placed on the canvas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Packed into height-balanced columns
    #[default]
    Column,
    /// User-chosen free positions
    Absolute,
}

impl LayoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::Column => "column",
            LayoutMode::Absolute => "absolute",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "column" => Some(LayoutMode::Column),
            "absolute" => Some(LayoutMode::Absolute),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            LayoutMode::Column => LayoutMode::Absolute,
            LayoutMode::Absolute => LayoutMode::Column,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LayoutMode::Column => "Colonnes",
            LayoutMode::Absolute => "Absolu",
        }
    }
}

/// Note colors (value, label)
pub const PALETTE: &[(&str, &str)] = &[
    ("#FFEB3B", "Jaune"),
    ("#FFC107", "Ambre"),
    ("#FF9800", "Orange"),
    ("#FF5722", "Orange foncé"),
    ("#E91E63", "Rose"),
    ("#9C27B0", "Violet"),
    ("#673AB7", "Violet foncé"),
    ("#3F51B5", "Indigo"),
    ("#2196F3", "Bleu"),
    ("#03A9F4", "Bleu clair"),
    ("#00BCD4", "Cyan"),
    ("#009688", "Teal"),
    ("#4CAF50", "Vert"),
    ("#8BC34A", "Vert clair"),
    ("#CDDC39", "Lime"),
];

pub const DEFAULT_COLOR: &str = "#FFEB3B";

pub fn is_palette_color(color: &str) -> bool {
    PALETTE.iter().any(|(value, _)| value.eq_ignore_ascii_case(color))
}

/// Parse a server timestamp. Accepts RFC 3339 and zone-less ISO forms (read as UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// `dd/mm/yyyy` rendering of a server timestamp, or the raw text if unparsable
pub fn format_date(value: &str) -> String {
    parse_timestamp(value)
        .map(|dt| dt.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_from_server_json() {
        let json = r##"{
            "id": 12,
            "list_id": 7,
            "title": "Courses",
            "description": null,
            "options": [{"text": "Pain", "checkedUsers": ["Alice"]}, {"text": "Lait"}],
            "position": {"x": 10, "y": 20.5},
            "size": {"width": 350, "height": 350},
            "color": "#FFEB3B",
            "pinned": true,
            "created_at": "2025-03-01T10:00:00Z",
            "created_by": "Alice"
        }"##;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.id, Some(12));
        assert_eq!(note.options.len(), 2);
        assert!(note.options[0].is_checked_by("Alice"));
        assert!(note.options[1].checked_users.is_empty());
        assert_eq!(note.position, Position::new(10.0, 20.5));
        assert!(note.target_element.is_none());
    }

    #[test]
    fn test_create_payload_omits_id_and_timestamp() {
        let note = Note {
            id: Some(-5),
            list_id: 7,
            title: "t".into(),
            description: None,
            options: vec![ChecklistItem::new("a")],
            position: Position::default(),
            size: Size::new(350.0, 350.0),
            color: DEFAULT_COLOR.into(),
            pinned: false,
            created_at: Some("2025-03-01T10:00:00Z".into()),
            created_by: Some("Alice".into()),
            target_element: None,
            user_name: Some("Alice".into()),
        };
        let value = serde_json::to_value(note.for_create()).unwrap();
        assert!(value.get("id").is_none());
        assert!(value.get("created_at").is_none());
        assert!(value.get("target_element").is_none());
        assert_eq!(value["options"][0]["checkedUsers"], serde_json::json!([]));
    }

    #[test]
    fn test_checklist_toggle_twice_restores() {
        let mut item = ChecklistItem::new("Pain");
        item.checked_users.push("Bob".into());
        let before = item.clone();
        assert!(item.toggle("Alice"));
        assert_eq!(item.checked_users, vec!["Bob".to_string(), "Alice".to_string()]);
        assert!(!item.toggle("Alice"));
        assert_eq!(item, before);
    }

    #[test]
    fn test_layout_mode_strings() {
        assert_eq!(LayoutMode::parse("column"), Some(LayoutMode::Column));
        assert_eq!(LayoutMode::parse("absolute"), Some(LayoutMode::Absolute));
        assert_eq!(LayoutMode::parse("grid"), None);
        assert_eq!(LayoutMode::Column.toggled().as_str(), "absolute");
    }

    #[test]
    fn test_parse_timestamp_forms() {
        let a = parse_timestamp("2025-03-01T10:00:00Z").unwrap();
        let b = parse_timestamp("2025-03-01T11:00:00+01:00").unwrap();
        let c = parse_timestamp("2025-03-01T10:00:00.000").unwrap();
        let d = parse_timestamp("2025-03-01 10:00:00").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a, d);
        assert!(parse_timestamp("yesterday").is_none());
        assert_eq!(format_date("2025-03-01T10:00:00Z"), "01/03/2025");
    }

    #[test]
    fn test_palette() {
        assert_eq!(PALETTE.len(), 15);
        assert!(is_palette_color("#ffeb3b"));
        assert!(!is_palette_color("#000000"));
    }
}
