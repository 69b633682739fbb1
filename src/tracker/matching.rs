//! Detections and bipartite assignment for multi-object tracking.

use ndarray::{Array1, Array2};
use thiserror::Error;

use crate::tracker::rect::Rect;

/// Detection input for the tracker.
///
/// Produced fresh each frame by the detector (or by [`crate::decode`]);
/// nothing is retained across frames.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Bounding box
    pub bbox: Rect,
    /// Class label (heatmap channel index)
    pub label: usize,
    /// Detection confidence score
    pub score: f32,
    /// Appearance embedding for re-identification
    pub embedding: Array1<f32>,
}

impl Detection {
    pub fn new(bbox: Rect, label: usize, score: f32, embedding: Array1<f32>) -> Self {
        Self {
            bbox,
            label,
            score,
            embedding,
        }
    }
}

/// Errors from measurement-to-track association.
#[derive(Debug, Error)]
pub enum MatchingError {
    /// Embeddings with different dimensions cannot be compared.
    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    /// The assignment solver rejected the cost matrix.
    #[error("assignment solver failed: {0}")]
    Solver(String),
}

/// Result of solving an assignment between detections (rows) and
/// tracks (columns).
#[derive(Debug, Clone)]
pub struct AssignmentResult {
    /// Matched (detection index, track index) pairs
    pub matches: Vec<(usize, usize)>,
    /// Detection indices left without a track
    pub unmatched_detections: Vec<usize>,
    /// Track indices left without a detection
    pub unmatched_tracks: Vec<usize>,
}

/// Cost charged to padding cells so the solver never prefers them.
const PAD_COST: f64 = 1e6;

/// Solve minimum-cost bipartite assignment over a cost matrix with
/// detections as rows and tracks as columns.
///
/// The matrix is padded to square and solved with the Jonker-Volgenant
/// algorithm. Assignments whose cost exceeds `thresh` are discarded and
/// both sides are reported unmatched.
pub fn linear_assignment(
    cost_matrix: &Array2<f32>,
    thresh: f32,
) -> Result<AssignmentResult, MatchingError> {
    let (num_rows, num_cols) = cost_matrix.dim();

    if num_rows == 0 {
        return Ok(AssignmentResult {
            matches: vec![],
            unmatched_detections: vec![],
            unmatched_tracks: (0..num_cols).collect(),
        });
    }

    if num_cols == 0 {
        return Ok(AssignmentResult {
            matches: vec![],
            unmatched_detections: (0..num_rows).collect(),
            unmatched_tracks: vec![],
        });
    }

    let size = num_rows.max(num_cols);
    let mut padded = Array2::<f64>::from_elem((size, size), PAD_COST);

    for i in 0..num_rows {
        for j in 0..num_cols {
            padded[[i, j]] = cost_matrix[[i, j]] as f64;
        }
    }

    let (row_to_col, _) =
        lapjv::lapjv(&padded).map_err(|e| MatchingError::Solver(e.to_string()))?;

    let mut matches = vec![];
    let mut unmatched_detections = vec![];
    let mut unmatched_tracks_mask: Vec<bool> = vec![true; num_cols];

    for (row_idx, &col_idx) in row_to_col.iter().enumerate() {
        if row_idx >= num_rows {
            continue;
        }
        if col_idx >= num_cols {
            unmatched_detections.push(row_idx);
        } else if cost_matrix[[row_idx, col_idx]] <= thresh {
            matches.push((row_idx, col_idx));
            unmatched_tracks_mask[col_idx] = false;
        } else {
            unmatched_detections.push(row_idx);
        }
    }

    let unmatched_tracks: Vec<usize> = unmatched_tracks_mask
        .iter()
        .enumerate()
        .filter_map(|(j, &u)| if u { Some(j) } else { None })
        .collect();

    Ok(AssignmentResult {
        matches,
        unmatched_detections,
        unmatched_tracks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_assignment_square() {
        // Optimal assignment is the anti-diagonal.
        let cost = array![[0.9_f32, 0.1], [0.1, 0.9]];
        let result = linear_assignment(&cost, 2.0).unwrap();

        assert_eq!(result.matches.len(), 2);
        assert!(result.matches.contains(&(0, 1)));
        assert!(result.matches.contains(&(1, 0)));
        assert!(result.unmatched_detections.is_empty());
        assert!(result.unmatched_tracks.is_empty());
    }

    #[test]
    fn test_assignment_more_detections_than_tracks() {
        let cost = array![[0.1_f32], [0.8]];
        let result = linear_assignment(&cost, 2.0).unwrap();

        assert_eq!(result.matches, vec![(0, 0)]);
        assert_eq!(result.unmatched_detections, vec![1]);
        assert!(result.unmatched_tracks.is_empty());
    }

    #[test]
    fn test_assignment_more_tracks_than_detections() {
        let cost = array![[0.8_f32, 0.1]];
        let result = linear_assignment(&cost, 2.0).unwrap();

        assert_eq!(result.matches, vec![(0, 1)]);
        assert!(result.unmatched_detections.is_empty());
        assert_eq!(result.unmatched_tracks, vec![0]);
    }

    #[test]
    fn test_assignment_threshold() {
        let cost = array![[0.95_f32]];
        let result = linear_assignment(&cost, 0.5).unwrap();

        assert!(result.matches.is_empty());
        assert_eq!(result.unmatched_detections, vec![0]);
        assert_eq!(result.unmatched_tracks, vec![0]);
    }

    #[test]
    fn test_assignment_empty() {
        let no_dets = Array2::<f32>::zeros((0, 3));
        let result = linear_assignment(&no_dets, 0.5).unwrap();
        assert!(result.matches.is_empty());
        assert_eq!(result.unmatched_tracks, vec![0, 1, 2]);

        let no_tracks = Array2::<f32>::zeros((2, 0));
        let result = linear_assignment(&no_tracks, 0.5).unwrap();
        assert!(result.matches.is_empty());
        assert_eq!(result.unmatched_detections, vec![0, 1]);
    }
}
