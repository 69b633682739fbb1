//! Appearance embedding distances for re-identification.

use ndarray::{Array1, Array2};

use crate::tracker::matching::MatchingError;

/// Numerical floor to avoid dividing by a zero norm.
const NORM_EPS: f32 = 1e-12;

/// Cosine distance between two embeddings: `1 - cos(a, b)`.
///
/// Identical directions give 0, orthogonal vectors give 1, opposite
/// directions give 2. Zero-norm inputs are treated as maximally distant.
pub fn cosine_distance(a: &Array1<f32>, b: &Array1<f32>) -> f32 {
    let dot = a.dot(b);
    let norm_a = a.dot(a).sqrt();
    let norm_b = b.dot(b).sqrt();
    1.0 - dot / (norm_a * norm_b).max(NORM_EPS)
}

/// Compute the cosine distance matrix between detection embeddings (rows)
/// and track embeddings (columns).
///
/// Returns a matrix of shape (M, N) where M is the number of detections
/// and N is the number of tracks. All embeddings must share the same
/// dimension.
pub fn cosine_distance_matrix(
    detections: &[Array1<f32>],
    tracks: &[Array1<f32>],
) -> Result<Array2<f32>, MatchingError> {
    // Track embeddings define the established dimension.
    if let Some(first) = tracks.first().or_else(|| detections.first()) {
        let dim = first.len();
        for e in detections.iter().chain(tracks.iter()) {
            if e.len() != dim {
                return Err(MatchingError::DimensionMismatch {
                    expected: dim,
                    got: e.len(),
                });
            }
        }
    }

    let mut dists = Array2::zeros((detections.len(), tracks.len()));
    for (i, d) in detections.iter().enumerate() {
        for (j, t) in tracks.iter().enumerate() {
            dists[[i, j]] = cosine_distance(d, t);
        }
    }
    Ok(dists)
}

/// Exponentially smooth a track embedding towards a new observation:
/// `e <- (1 - factor) * e + factor * new`.
pub fn smooth_embedding(embedding: &mut Array1<f32>, new: &Array1<f32>, factor: f32) {
    embedding.zip_mut_with(new, |e, &n| {
        *e = (1.0 - factor) * *e + factor * n;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_cosine_distance() {
        let a = array![1.0_f32, 0.0, 0.0];
        let b = array![0.0_f32, 1.0, 0.0];
        let c = array![-1.0_f32, 0.0, 0.0];

        assert!(cosine_distance(&a, &a).abs() < 1e-6);
        assert!((cosine_distance(&a, &b) - 1.0).abs() < 1e-6);
        assert!((cosine_distance(&a, &c) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_distance_scale_invariant() {
        let a = array![0.3_f32, 0.4, 0.5];
        let scaled = &a * 7.5;
        assert!(cosine_distance(&a, &scaled).abs() < 1e-5);
    }

    #[test]
    fn test_distance_matrix_shape() {
        let dets = vec![array![1.0_f32, 0.0], array![0.0_f32, 1.0]];
        let tracks = vec![array![1.0_f32, 0.0]];

        let dists = cosine_distance_matrix(&dets, &tracks).unwrap();
        assert_eq!(dists.dim(), (2, 1));
        assert!(dists[[0, 0]].abs() < 1e-6);
        assert!((dists[[1, 0]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_dimension_mismatch() {
        let dets = vec![array![1.0_f32, 0.0, 0.0]];
        let tracks = vec![array![1.0_f32, 0.0]];

        let err = cosine_distance_matrix(&dets, &tracks).unwrap_err();
        assert!(matches!(
            err,
            MatchingError::DimensionMismatch {
                expected: 2,
                got: 3
            }
        ));
    }

    #[test]
    fn test_smooth_embedding() {
        let mut e = array![1.0_f32, 0.0];
        let new = array![0.0_f32, 1.0];
        smooth_embedding(&mut e, &new, 0.5);
        assert!((e[0] - 0.5).abs() < 1e-6);
        assert!((e[1] - 0.5).abs() < 1e-6);
    }
}
