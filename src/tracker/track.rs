//! Single object track for re-identification based tracking.

use std::sync::atomic::{AtomicU64, Ordering};

use ndarray::Array1;

use crate::tracker::embedding::smooth_embedding;
use crate::tracker::matching::Detection;
use crate::tracker::rect::Rect;

/// Global track ID counter for unique ID generation.
static TRACK_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Reset the global track ID counter (useful for testing).
pub fn reset_track_id_counter() {
    TRACK_ID_COUNTER.store(0, Ordering::SeqCst);
}

/// Get the next unique track ID.
fn next_track_id() -> u64 {
    TRACK_ID_COUNTER.fetch_add(1, Ordering::SeqCst) + 1
}

/// Single tracked object.
///
/// Created from an unmatched detection, updated in place while matched,
/// and marked for deletion after going unmatched for one step.
#[derive(Debug, Clone)]
pub struct Track {
    /// Unique track identifier
    pub track_id: u64,
    /// Current bounding box
    pub bbox: Rect,
    /// Class label, fixed at creation
    pub label: usize,
    /// Exponentially smoothed appearance embedding
    pub embedding: Array1<f32>,
    /// Current frame ID
    pub frame_id: u32,
    /// Frame ID when track was started
    pub start_frame: u32,
    /// Number of successful re-identifications
    pub hits: u32,
    /// Whether the track is live
    pub active: bool,
    /// Set when the track went unmatched; purged at the end of the step
    pub to_delete: bool,
}

impl Track {
    /// Create a new track from an unmatched detection.
    pub fn new(detection: &Detection, frame_id: u32) -> Self {
        Self {
            track_id: next_track_id(),
            bbox: detection.bbox,
            label: detection.label,
            embedding: detection.embedding.clone(),
            frame_id,
            start_frame: frame_id,
            hits: 0,
            active: true,
            to_delete: false,
        }
    }

    /// Update the track with a matched detection.
    ///
    /// The bounding box is replaced; the appearance embedding is smoothed
    /// towards the detection's embedding with `smoothing_factor`.
    pub fn update(&mut self, detection: &Detection, smoothing_factor: f32, frame_id: u32) {
        self.bbox = detection.bbox;
        smooth_embedding(&mut self.embedding, &detection.embedding, smoothing_factor);
        self.frame_id = frame_id;
        self.hits += 1;
        self.to_delete = false;
    }

    /// Mark the track for deletion at the end of the current step.
    pub fn mark_for_deletion(&mut self) {
        self.active = false;
        self.to_delete = true;
    }

    /// Number of frames this track has been alive.
    pub fn age(&self) -> u32 {
        self.frame_id - self.start_frame
    }
}
