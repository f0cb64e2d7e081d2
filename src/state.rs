use std::path::PathBuf;

use crate::data::model::Series;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering. The series is loaded before
/// the event loop starts and is read-only afterwards; only the hover state
/// and status message change per frame.
pub struct AppState {
    /// Path of the currently displayed document.
    pub source_path: PathBuf,

    /// The normalized, time-sorted dataset driving rendering and hover.
    pub series: Series,

    /// Current hover annotation state, overwritten every frame.
    pub hover: HoverState,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(source_path: PathBuf, series: Series) -> Self {
        Self {
            source_path,
            series,
            hover: HoverState::default(),
            status_message: None,
        }
    }

    /// Swap in a newly loaded document (File → Open…).
    pub fn replace_series(&mut self, source_path: PathBuf, series: Series) {
        self.source_path = source_path;
        self.series = series;
        self.hover = HoverState::default();
        self.status_message = None;
    }
}

// ---------------------------------------------------------------------------
// Hover state
// ---------------------------------------------------------------------------

/// The currently displayed annotation, if any. Transient: reset on every
/// pointer-motion event, no persistence across renders.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HoverState {
    pub visible: bool,
    pub anchor_index: Option<usize>,
}

impl HoverState {
    /// Record the hit-test result for this event. Returns `true` when the
    /// displayed annotation changed and a redraw is needed; repeated events
    /// over the same point return `false`.
    pub fn set_hit(&mut self, hit: Option<usize>) -> bool {
        let next = HoverState {
            visible: hit.is_some(),
            anchor_index: hit,
        };
        let changed = *self != next;
        *self = next;
        changed
    }
}
