//! Gaussian heatmap target rendering for CenterNet-style heads.
//!
//! Given ground-truth boxes on the output grid, these functions splat one
//! Gaussian per box onto the class channel of a `[C, H, W]` heatmap,
//! combining overlapping kernels with an element-wise max. Two renderings
//! are provided: the TTFNet elliptical kernel and the CornerNet circular
//! kernel with an IoU-derived radius.

use ndarray::Array3;
use thiserror::Error;

use crate::tracker::Rect;

const EPS: f32 = 1e-8;

/// Errors from inconsistent ground-truth inputs.
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("boxes and labels differ in length: {boxes} vs {labels}")]
    LengthMismatch { boxes: usize, labels: usize },
    #[error("label {label} out of range for {num_classes} classes")]
    LabelOutOfRange { label: usize, num_classes: usize },
}

/// Gaussian radius such that a corner displaced by it still keeps at least
/// `min_overlap` IoU with the ground-truth box.
///
/// This is the bug-fixed CornerNet formulation taking the minimum over the
/// three displacement cases.
pub fn gaussian_radius(width: f32, height: f32, min_overlap: f32) -> f32 {
    let b1 = height + width;
    let c1 = width * height * (1.0 - min_overlap) / (1.0 + min_overlap);
    let sq1 = (b1 * b1 - 4.0 * c1).sqrt();
    let r1 = (b1 - sq1) / 2.0;

    let a2 = 4.0;
    let b2 = 2.0 * (height + width);
    let c2 = (1.0 - min_overlap) * width * height;
    let sq2 = (b2 * b2 - 4.0 * a2 * c2).sqrt();
    let r2 = (b2 - sq2) / (2.0 * a2);

    let a3 = 4.0 * min_overlap;
    let b3 = -2.0 * min_overlap * (height + width);
    let c3 = (min_overlap - 1.0) * width * height;
    let sq3 = (b3 * b3 - 4.0 * a3 * c3).sqrt();
    let r3 = (b3 + sq3) / (2.0 * a3);

    r1.min(r2).min(r3)
}

fn check_inputs(
    num_classes: usize,
    boxes: &[Rect],
    labels: &[usize],
) -> Result<(), TargetError> {
    if boxes.len() != labels.len() {
        return Err(TargetError::LengthMismatch {
            boxes: boxes.len(),
            labels: labels.len(),
        });
    }
    if let Some(&label) = labels.iter().find(|&&l| l >= num_classes) {
        return Err(TargetError::LabelOutOfRange { label, num_classes });
    }
    Ok(())
}

/// Render a target heatmap with the TTFNet elliptical Gaussian.
///
/// Each box contributes a full-grid kernel with per-axis variance
/// `(alpha * size / 6)^2`; `alpha` is conventionally 0.54. Boxes are in
/// output-grid coordinates.
pub fn render_ttfnet(
    num_classes: usize,
    height: usize,
    width: usize,
    boxes: &[Rect],
    labels: &[usize],
    alpha: f32,
) -> Result<Array3<f32>, TargetError> {
    check_inputs(num_classes, boxes, labels)?;

    let mut heatmap = Array3::zeros((num_classes, height, width));

    for (bbox, &label) in boxes.iter().zip(labels) {
        let (cx, cy) = bbox.center();
        let cx = cx.floor();
        let cy = cy.floor();
        let var_w = (alpha * bbox.width / 6.0).powi(2);
        let var_h = (alpha * bbox.height / 6.0).powi(2);

        for y in 0..height {
            for x in 0..width {
                let dx = cx - x as f32;
                let dy = cy - y as f32;
                let radius_sq = dx * dx / (2.0 * var_w + EPS) + dy * dy / (2.0 * var_h + EPS);
                let value = (-radius_sq).exp();

                let cell: &mut f32 = &mut heatmap[[label, y, x]];
                *cell = cell.max(value);
            }
        }
    }

    Ok(heatmap)
}

/// Render a target heatmap with the CornerNet circular Gaussian.
///
/// The kernel radius comes from [`gaussian_radius`] with the given
/// `min_overlap` and the splat is clipped to the map bounds.
pub fn render_cornernet(
    num_classes: usize,
    height: usize,
    width: usize,
    boxes: &[Rect],
    labels: &[usize],
    min_overlap: f32,
) -> Result<Array3<f32>, TargetError> {
    check_inputs(num_classes, boxes, labels)?;

    let mut heatmap = Array3::zeros((num_classes, height, width));

    for (bbox, &label) in boxes.iter().zip(labels) {
        let radius = gaussian_radius(bbox.width, bbox.height, min_overlap).max(0.0);
        let diameter = 2.0 * radius + 1.0;
        let variance = (diameter / 6.0).powi(2);
        let r = radius as i64;

        let (cx, cy) = bbox.center();
        let cx = cx.floor() as i64;
        let cy = cy.floor() as i64;

        for dy in -r..=r {
            for dx in -r..=r {
                let x = cx + dx;
                let y = cy + dy;
                if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
                    continue;
                }
                let dist_sq = (dx * dx + dy * dy) as f32;
                let value = (-dist_sq / (2.0 * variance + EPS)).exp();

                let cell: &mut f32 = &mut heatmap[[label, y as usize, x as usize]];
                *cell = cell.max(value);
            }
        }
    }

    Ok(heatmap)
}
