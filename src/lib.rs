//! CenterNet-style tracking-by-detection.
//!
//! The crate is split into four parts:
//! - [`tracker`]: the online multi-object tracker. Detections carrying
//!   appearance embeddings are associated to live tracks with a
//!   cosine-distance cost matrix and optimal bipartite assignment.
//! - [`decode`]: turns raw detector outputs (class heatmap, box map,
//!   embedding map) into per-frame [`Detection`]s.
//! - [`targets`]: Gaussian heatmap target rendering for training CenterNet
//!   heads (TTFNet and CornerNet styles).
//! - [`integration`]: traits and helpers for plugging detection backends
//!   into the tracker.

pub mod decode;
pub mod integration;
pub mod targets;
pub mod tracker;

pub use decode::{DecodeError, DecoderConfig, decode_detections};
pub use integration::{DetectionBuilder, DetectionSource, IntoDetections, TrackerPipeline};
pub use tracker::{Detection, MatchingError, Rect, ReidTracker, Track, TrackerConfig};
