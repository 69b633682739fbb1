//! Online multi-object tracker driven by re-identification embeddings.

use log::debug;
use ndarray::Array1;

use crate::tracker::embedding::cosine_distance_matrix;
use crate::tracker::matching::{self, AssignmentResult, Detection, MatchingError};
use crate::tracker::track::Track;

/// Configuration for the re-identification tracker.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Detections scoring below this threshold are ignored
    pub detection_threshold: f32,
    /// Cosine distance above which an assignment is rejected
    pub match_threshold: f32,
    /// Exponential smoothing factor for track embeddings
    pub embedding_smoothing: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            detection_threshold: 0.1,
            match_threshold: 0.7,
            embedding_smoothing: 0.5,
        }
    }
}

/// Online tracker associating per-frame detections to live tracks by
/// appearance.
///
/// Each call to [`step`](ReidTracker::step) consumes one frame worth of
/// detections: they are matched against the current track list with a
/// cosine-distance cost matrix and optimal bipartite assignment. Matched
/// tracks are updated in place, unmatched detections open new tracks, and
/// tracks that went unmatched are deleted.
pub struct ReidTracker {
    tracks: Vec<Track>,
    frame_id: u32,
    config: TrackerConfig,
}

impl ReidTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            tracks: Vec::new(),
            frame_id: 0,
            config,
        }
    }

    /// Current live tracks.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Index of the last processed frame.
    pub fn frame_id(&self) -> u32 {
        self.frame_id
    }

    /// Process one frame of detections and return a snapshot of the live
    /// tracks.
    pub fn step(&mut self, detections: Vec<Detection>) -> Result<Vec<Track>, MatchingError> {
        self.frame_id += 1;

        let detections: Vec<Detection> = detections
            .into_iter()
            .filter(|d| d.score >= self.config.detection_threshold)
            .collect();

        let det_embeddings: Vec<Array1<f32>> =
            detections.iter().map(|d| d.embedding.clone()).collect();
        let track_embeddings: Vec<Array1<f32>> =
            self.tracks.iter().map(|t| t.embedding.clone()).collect();

        let dists = cosine_distance_matrix(&det_embeddings, &track_embeddings)?;

        let AssignmentResult {
            matches,
            unmatched_detections,
            unmatched_tracks,
        } = matching::linear_assignment(&dists, self.config.match_threshold)?;

        debug!(
            "frame {}: {} detections, {} matched, {} new, {} dropped tracks",
            self.frame_id,
            detections.len(),
            matches.len(),
            unmatched_detections.len(),
            unmatched_tracks.len(),
        );

        for (idet, itrack) in matches {
            self.tracks[itrack].update(
                &detections[idet],
                self.config.embedding_smoothing,
                self.frame_id,
            );
        }

        for idet in unmatched_detections {
            self.tracks.push(Track::new(&detections[idet], self.frame_id));
        }

        for itrack in unmatched_tracks {
            self.tracks[itrack].mark_for_deletion();
        }
        self.tracks.retain(|t| !t.to_delete);

        Ok(self.tracks.clone())
    }
}
