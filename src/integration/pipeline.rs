//! TrackerPipeline for combining detection with tracking.

use thiserror::Error;

use crate::tracker::{MatchingError, ReidTracker, Track, TrackerConfig};

use super::DetectionSource;

/// Error from an end-to-end tracking step.
#[derive(Debug, Error)]
pub enum PipelineError<E> {
    /// The detection backend failed.
    #[error("detection failed: {0}")]
    Detector(E),
    /// Measurement-to-track association failed.
    #[error(transparent)]
    Tracker(#[from] MatchingError),
}

/// A combined tracker that bundles detection inference with the
/// re-identification tracker.
///
/// This struct provides a convenient way to run end-to-end tracking by
/// combining any `DetectionSource` with a `ReidTracker`.
pub struct TrackerPipeline<D: DetectionSource> {
    detector: D,
    tracker: ReidTracker,
}

impl<D: DetectionSource> TrackerPipeline<D> {
    /// Create a new tracking pipeline with the given detector and tracker config.
    pub fn new(detector: D, config: TrackerConfig) -> Self {
        Self {
            detector,
            tracker: ReidTracker::new(config),
        }
    }

    /// Create a new tracking pipeline with default tracker config.
    pub fn with_default_config(detector: D) -> Self {
        Self::new(detector, TrackerConfig::default())
    }

    /// Process a single frame and return the live tracks.
    ///
    /// This method runs detection on the input image and then steps the
    /// tracker with the detected objects.
    ///
    /// # Arguments
    /// * `input` - Raw image bytes
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    pub fn process_frame(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<Track>, PipelineError<D::Error>> {
        let detections = self
            .detector
            .detect(input, width, height)
            .map_err(PipelineError::Detector)?;
        Ok(self.tracker.step(detections)?)
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &ReidTracker {
        &self.tracker
    }

    /// Get a mutable reference to the underlying tracker.
    pub fn tracker_mut(&mut self) -> &mut ReidTracker {
        &mut self.tracker
    }
}
