//! Board Layout Engine
//!
//! Places notes on the canvas. In columnar mode notes are sorted by creation
//! time and poured into columns in a single forward pass: a column is closed
//! once its running height passes the viewport's usable height, and notes
//! never move back to an earlier, shorter column.

use leptos_gesture::ExtentRange;

use crate::models::{parse_timestamp, LayoutMode, Note, NoteId, Position, Size};

/// Viewports narrower than this use the narrow tier
pub const NARROW_BREAKPOINT: f64 = 650.0;
/// Space below each note in a column
pub const VERTICAL_GAP: f64 = 10.0;
/// Reserved height at the bottom of the viewport
pub const BOTTOM_MARGIN: f64 = 200.0;
/// Left inset of the single narrow column
pub const NARROW_LEFT_INSET: f64 = 5.0;

const WIDE_COLUMN_WIDTH: f64 = 380.0;
const WIDE_COLUMN_GAP: f64 = 20.0;
const NARROW_COLUMN_GAP: f64 = 10.0;
const WIDE_NOTE_WIDTH: f64 = 350.0;
const NOTE_HEIGHT: f64 = 350.0;

/// Id given to the probe note when computing where a new note will land
pub const PROBE_ID: NoteId = -9999;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Current browser window size (a wide default off-browser)
    pub fn current() -> Self {
        let size = web_sys::window().and_then(|win| {
            let width = win.inner_width().ok()?.as_f64()?;
            let height = win.inner_height().ok()?.as_f64()?;
            Some(Self::new(width, height))
        });
        size.unwrap_or(Self::new(1280.0, 800.0))
    }

    pub fn tier(&self) -> DeviceTier {
        DeviceTier::for_width(self.width)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceTier {
    Narrow,
    Wide,
}

impl DeviceTier {
    pub fn for_width(width: f64) -> Self {
        if width < NARROW_BREAKPOINT {
            DeviceTier::Narrow
        } else {
            DeviceTier::Wide
        }
    }

    pub fn is_narrow(&self) -> bool {
        matches!(self, DeviceTier::Narrow)
    }

    pub fn width_range(&self) -> ExtentRange {
        match self {
            DeviceTier::Narrow => ExtentRange::new(200.0, 290.0),
            DeviceTier::Wide => ExtentRange::new(250.0, 380.0),
        }
    }

    pub fn height_range(&self) -> ExtentRange {
        match self {
            DeviceTier::Narrow => ExtentRange::new(250.0, 500.0),
            DeviceTier::Wide => ExtentRange::new(300.0, 500.0),
        }
    }
}

/// Column geometry for one viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnMetrics {
    pub column_width: f64,
    pub column_gap: f64,
    pub note_size: Size,
}

impl ColumnMetrics {
    pub fn for_viewport(viewport: Viewport) -> Self {
        match viewport.tier() {
            DeviceTier::Narrow => Self {
                column_width: viewport.width,
                column_gap: NARROW_COLUMN_GAP,
                note_size: Size::new(viewport.width, NOTE_HEIGHT),
            },
            DeviceTier::Wide => Self {
                column_width: WIDE_COLUMN_WIDTH,
                column_gap: WIDE_COLUMN_GAP,
                note_size: Size::new(WIDE_NOTE_WIDTH, NOTE_HEIGHT),
            },
        }
    }

    pub fn column_x(&self, column: usize) -> f64 {
        column as f64 * (self.column_width + self.column_gap)
    }
}

/// Creation time in ms; missing or unreadable timestamps count as 0
fn creation_millis(note: &Note) -> i64 {
    note.created_at
        .as_deref()
        .and_then(parse_timestamp)
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(0)
}

/// Lay out `notes` for `mode`.
///
/// Absolute mode returns the notes untouched. Columnar mode returns them
/// sorted by creation time (stable) with fresh positions.
pub fn pack(notes: &[Note], mode: LayoutMode, viewport: Viewport) -> Vec<Note> {
    match mode {
        LayoutMode::Absolute => notes.to_vec(),
        LayoutMode::Column => pack_columns(notes, viewport),
    }
}

fn pack_columns(notes: &[Note], viewport: Viewport) -> Vec<Note> {
    let metrics = ColumnMetrics::for_viewport(viewport);
    let narrow = viewport.tier().is_narrow();
    let limit = viewport.height - BOTTOM_MARGIN;

    let mut sorted = notes.to_vec();
    sorted.sort_by_key(creation_millis);

    let mut column = 0usize;
    let mut heights = vec![0.0_f64];

    for note in sorted.iter_mut() {
        let x = if narrow { NARROW_LEFT_INSET } else { metrics.column_x(column) };
        note.position = Position::new(x, heights[column]);
        heights[column] += note.size.height + VERTICAL_GAP;

        if !narrow && heights[column] > limit {
            column += 1;
            if heights.len() <= column {
                heights.push(0.0);
            }
        }
    }

    sorted
}

/// Where `candidate` would land if it were added to `existing` in columnar mode
pub fn probe_position(existing: &[Note], candidate: &Note, viewport: Viewport) -> Option<Position> {
    let mut simulated = existing.to_vec();
    simulated.push(Note {
        id: Some(PROBE_ID),
        ..candidate.clone()
    });
    pack_columns(&simulated, viewport)
        .into_iter()
        .find(|note| note.id == Some(PROBE_ID))
        .map(|note| note.position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_COLOR;
    use std::collections::HashSet;

    const WIDE: Viewport = Viewport { width: 1400.0, height: 1000.0 };
    const NARROW: Viewport = Viewport { width: 400.0, height: 800.0 };

    fn make_note(id: i64, minute: Option<u32>, height: f64) -> Note {
        Note {
            id: Some(id),
            list_id: 7,
            title: format!("Note {}", id),
            description: None,
            options: vec![],
            position: Position::new(999.0, 999.0),
            size: Size::new(350.0, height),
            color: DEFAULT_COLOR.into(),
            pinned: false,
            created_at: minute.map(|m| format!("2025-03-01T10:{:02}:00Z", m)),
            created_by: None,
            target_element: None,
            user_name: None,
        }
    }

    #[test]
    fn test_absolute_is_identity() {
        let notes = vec![make_note(2, Some(5), 350.0), make_note(1, Some(1), 350.0)];
        assert_eq!(pack(&notes, LayoutMode::Absolute, WIDE), notes);
    }

    #[test]
    fn test_wide_columns_overflow_forward() {
        // usable height 800: after two 350 notes a column holds 720, the third pushes it to 1080
        let notes: Vec<Note> = (1..=5).map(|i| make_note(i, Some(i as u32), 350.0)).collect();
        let packed = pack(&notes, LayoutMode::Column, WIDE);
        let positions: Vec<_> = packed.iter().map(|n| (n.id.unwrap(), n.position)).collect();
        assert_eq!(
            positions,
            vec![
                (1, Position::new(0.0, 0.0)),
                (2, Position::new(0.0, 360.0)),
                (3, Position::new(0.0, 720.0)),
                (4, Position::new(400.0, 0.0)),
                (5, Position::new(400.0, 360.0)),
            ]
        );
    }

    #[test]
    fn test_never_returns_to_shorter_column() {
        let notes = vec![
            make_note(1, Some(1), 500.0),
            make_note(2, Some(2), 500.0), // column 0 reaches 1020 and closes
            make_note(3, Some(3), 300.0),
            make_note(4, Some(4), 300.0),
        ];
        let packed = pack(&notes, LayoutMode::Column, WIDE);
        assert_eq!(packed[2].position, Position::new(400.0, 0.0));
        assert_eq!(packed[3].position, Position::new(400.0, 310.0));
    }

    #[test]
    fn test_sorted_by_creation_with_missing_first_and_stable_ties() {
        let notes = vec![
            make_note(1, Some(30), 350.0),
            make_note(2, None, 350.0),
            make_note(3, Some(10), 350.0),
            make_note(4, Some(10), 350.0),
        ];
        let packed = pack(&notes, LayoutMode::Column, WIDE);
        let order: Vec<_> = packed.iter().map(|n| n.id.unwrap()).collect();
        assert_eq!(order, vec![2, 3, 4, 1]);
    }

    #[test]
    fn test_narrow_single_column_no_overlap() {
        let notes: Vec<Note> = (1..=5).rev().map(|i| make_note(i, Some(i as u32), 350.0)).collect();
        let packed = pack(&notes, LayoutMode::Column, NARROW);
        let order: Vec<_> = packed.iter().map(|n| n.id.unwrap()).collect();
        assert_eq!(order, vec![1, 2, 3, 4, 5]);
        for pair in packed.windows(2) {
            assert_eq!(pair[0].position.x, NARROW_LEFT_INSET);
            assert_eq!(pair[1].position.x, NARROW_LEFT_INSET);
            assert!(pair[0].position.y + pair[0].size.height <= pair[1].position.y);
        }
    }

    #[test]
    fn test_origins_unique_and_deterministic() {
        let notes: Vec<Note> = (1..=12)
            .map(|i| make_note(i, Some(i as u32), 250.0 + (i as f64 * 37.0) % 250.0))
            .collect();
        let first = pack(&notes, LayoutMode::Column, WIDE);
        let second = pack(&notes, LayoutMode::Column, WIDE);
        assert_eq!(first, second);

        let origins: HashSet<(i64, i64)> = first
            .iter()
            .map(|n| (n.position.x as i64, n.position.y as i64))
            .collect();
        assert_eq!(origins.len(), first.len());
    }

    #[test]
    fn test_tiny_viewport_gives_each_note_its_own_column() {
        let notes: Vec<Note> = (1..=3).map(|i| make_note(i, Some(i as u32), 300.0)).collect();
        let packed = pack(&notes, LayoutMode::Column, Viewport::new(1000.0, 300.0));
        let xs: Vec<_> = packed.iter().map(|n| n.position.x).collect();
        assert_eq!(xs, vec![0.0, 400.0, 800.0]);
        assert!(packed.iter().all(|n| n.position.y == 0.0));
    }

    #[test]
    fn test_probe_position_lands_after_existing() {
        let existing: Vec<Note> = (1..=3).map(|i| make_note(i, Some(i as u32), 350.0)).collect();
        let candidate = make_note(0, Some(59), 350.0);
        assert_eq!(
            probe_position(&existing, &candidate, WIDE),
            Some(Position::new(400.0, 0.0))
        );
        assert_eq!(
            probe_position(&[], &candidate, WIDE),
            Some(Position::new(0.0, 0.0))
        );
    }

    #[test]
    fn test_tiers() {
        assert_eq!(DeviceTier::for_width(649.0), DeviceTier::Narrow);
        assert_eq!(DeviceTier::for_width(650.0), DeviceTier::Wide);
        assert_eq!(ColumnMetrics::for_viewport(NARROW).note_size, Size::new(400.0, 350.0));
        assert_eq!(ColumnMetrics::for_viewport(WIDE).note_size, Size::new(350.0, 350.0));
    }
}
