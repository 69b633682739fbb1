mod embedding;
mod matching;
mod rect;
mod reid_tracker;
mod track;

pub use embedding::{cosine_distance, cosine_distance_matrix, smooth_embedding};
pub use matching::{AssignmentResult, Detection, MatchingError, linear_assignment};
pub use rect::{Rect, iou_batch};
pub use reid_tracker::{ReidTracker, TrackerConfig};
pub use track::{Track, reset_track_id_counter};
