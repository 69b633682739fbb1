use centertrack_rs::tracker::reset_track_id_counter;
use centertrack_rs::{Detection, MatchingError, Rect, ReidTracker, TrackerConfig};
use ndarray::{Array1, array};

fn det(x: f32, y: f32, score: f32, embedding: Array1<f32>) -> Detection {
    Detection::new(Rect::new(x, y, 0.1, 0.2), 0, score, embedding)
}

#[test]
fn test_basic_tracking() {
    reset_track_id_counter();
    let mut tracker = ReidTracker::new(TrackerConfig::default());

    // Frame 1: one detection opens one track
    let tracks1 = tracker
        .step(vec![det(0.1, 0.1, 0.9, array![1.0_f32, 0.0, 0.0])])
        .unwrap();
    assert_eq!(tracks1.len(), 1);
    let id1 = tracks1[0].track_id;

    // Frame 2: same object moved slightly, near-identical embedding
    let tracks2 = tracker
        .step(vec![det(0.12, 0.11, 0.9, array![0.98_f32, 0.05, 0.0])])
        .unwrap();
    assert_eq!(tracks2.len(), 1);
    assert_eq!(tracks2[0].track_id, id1); // ID persists
    assert!((tracks2[0].bbox.x - 0.12).abs() < 1e-6);

    // Frame 3: a second object appears
    let tracks3 = tracker
        .step(vec![
            det(0.14, 0.12, 0.9, array![0.97_f32, 0.06, 0.0]),
            det(0.7, 0.7, 0.8, array![0.0_f32, 0.0, 1.0]),
        ])
        .unwrap();
    assert_eq!(tracks3.len(), 2);
    assert!(tracks3.iter().any(|t| t.track_id == id1));
    let id2 = tracks3
        .iter()
        .find(|t| t.track_id != id1)
        .unwrap()
        .track_id;

    // Frame 4: first object disappears; its track is deleted after
    // one unmatched step
    let tracks4 = tracker
        .step(vec![det(0.7, 0.71, 0.8, array![0.0_f32, 0.02, 1.0])])
        .unwrap();
    assert_eq!(tracks4.len(), 1);
    assert_eq!(tracks4[0].track_id, id2);

    // Frame 5: first object reappears; deletion is final, so it comes
    // back under a new identity
    let tracks5 = tracker
        .step(vec![
            det(0.2, 0.15, 0.9, array![1.0_f32, 0.0, 0.0]),
            det(0.72, 0.72, 0.8, array![0.0_f32, 0.0, 1.0]),
        ])
        .unwrap();
    assert_eq!(tracks5.len(), 2);
    assert!(tracks5.iter().all(|t| t.track_id != id1));
    assert!(tracks5.iter().any(|t| t.track_id == id2));
}

#[test]
fn test_embedding_smoothing_over_time() {
    let config = TrackerConfig {
        embedding_smoothing: 0.5,
        ..TrackerConfig::default()
    };
    let mut tracker = ReidTracker::new(config);

    tracker
        .step(vec![det(0.1, 0.1, 0.9, array![1.0_f32, 0.0])])
        .unwrap();
    let tracks = tracker
        .step(vec![det(0.1, 0.1, 0.9, array![0.0_f32, 1.0])])
        .unwrap();

    // e = 0.5 * [1, 0] + 0.5 * [0, 1]
    assert!((tracks[0].embedding[0] - 0.5).abs() < 1e-6);
    assert!((tracks[0].embedding[1] - 0.5).abs() < 1e-6);
}

#[test]
fn test_mismatched_embedding_dimension_surfaces_error() {
    let mut tracker = ReidTracker::new(TrackerConfig::default());

    let tracks = tracker
        .step(vec![det(0.1, 0.1, 0.9, array![1.0_f32, 0.0, 0.0])])
        .unwrap();
    let id = tracks[0].track_id;

    // A detection with a different embedding dimension cannot be compared
    // against the live tracks.
    let err = tracker
        .step(vec![det(0.1, 0.1, 0.9, array![1.0_f32, 0.0])])
        .unwrap_err();
    assert!(matches!(
        err,
        MatchingError::DimensionMismatch {
            expected: 3,
            got: 2
        }
    ));

    // The failed step must not have touched the track list.
    assert_eq!(tracker.tracks().len(), 1);
    assert_eq!(tracker.tracks()[0].track_id, id);

    // A well-formed frame afterwards still re-identifies the track.
    let tracks = tracker
        .step(vec![det(0.12, 0.1, 0.9, array![1.0_f32, 0.0, 0.0])])
        .unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].track_id, id);
}

#[test]
fn test_detection_threshold_filtering() {
    let config = TrackerConfig {
        detection_threshold: 0.3,
        ..TrackerConfig::default()
    };
    let mut tracker = ReidTracker::new(config);

    let tracks = tracker
        .step(vec![
            det(0.1, 0.1, 0.9, array![1.0_f32, 0.0]),
            det(0.5, 0.5, 0.2, array![0.0_f32, 1.0]), // below threshold
        ])
        .unwrap();
    assert_eq!(tracks.len(), 1);
}
