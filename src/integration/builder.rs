//! Builder for creating Detection objects from various input formats.

use ndarray::Array1;

use crate::tracker::{Detection, Rect};

/// Builder for creating `Detection` objects from various input formats.
#[derive(Debug, Clone, Default)]
pub struct DetectionBuilder {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    label: usize,
    score: f32,
    embedding: Vec<f32>,
}

impl DetectionBuilder {
    /// Create a new detection builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.x1 = x1;
        self.y1 = y1;
        self.x2 = x2;
        self.y2 = y2;
        self
    }

    /// Set bounding box in CxCyWH format (center_x, center_y, width, height).
    pub fn cxcywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.x1 = cx - w / 2.0;
        self.y1 = cy - h / 2.0;
        self.x2 = cx + w / 2.0;
        self.y2 = cy + h / 2.0;
        self
    }

    /// Set bounding box in TLWH format (top-left x, top-left y, width, height).
    pub fn tlwh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.x1 = x;
        self.y1 = y;
        self.x2 = x + w;
        self.y2 = y + h;
        self
    }

    /// Set the class label.
    pub fn label(mut self, label: usize) -> Self {
        self.label = label;
        self
    }

    /// Set the confidence score.
    pub fn score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    /// Set the appearance embedding.
    pub fn embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }

    /// Build the final `Detection`.
    pub fn build(self) -> Detection {
        Detection::new(
            Rect::from_tlbr(self.x1, self.y1, self.x2, self.y2),
            self.label,
            self.score,
            Array1::from_vec(self.embedding),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_builder() {
        let det = DetectionBuilder::new()
            .tlbr(10.0, 20.0, 50.0, 80.0)
            .label(2)
            .score(0.95)
            .embedding(vec![1.0, 0.0, 0.0])
            .build();

        assert_eq!(det.score, 0.95);
        assert_eq!(det.label, 2);
        assert_eq!(det.embedding.len(), 3);
        assert_eq!(det.bbox.to_tlwh(), [10.0, 20.0, 40.0, 60.0]);
    }

    #[test]
    fn test_detection_builder_cxcywh() {
        let det = DetectionBuilder::new()
            .cxcywh(30.0, 50.0, 40.0, 60.0)
            .score(0.5)
            .build();

        assert_eq!(det.bbox.to_tlbr(), [10.0, 20.0, 50.0, 80.0]);
    }
}
