//! Decoding of raw CenterNet-style detector outputs into detections.
//!
//! The detector is treated as an opaque function producing three maps per
//! frame: a per-class center heatmap `[C, H, W]`, a box map `[4, H, W]`
//! holding left/top/right/bottom distances from each cell center, and an
//! embedding map `[D, H, W]`. Decoding selects heatmap peaks with a
//! max-pool style pseudo-NMS, keeps the top-scoring peaks, and gathers the
//! box and embedding at each peak.

use ndarray::{ArrayView3, s};
use thiserror::Error;

use crate::tracker::{Detection, Rect};

/// Errors from malformed detector outputs.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("box map must have 4 channels, got {0}")]
    BadBoxChannels(usize),
    #[error("spatial dims disagree: heatmap {heatmap:?}, boxes {boxes:?}, embeddings {embeddings:?}")]
    SpatialMismatch {
        heatmap: (usize, usize),
        boxes: (usize, usize),
        embeddings: (usize, usize),
    },
    #[error("nms kernel must be odd and non-zero, got {0}")]
    BadNmsKernel(usize),
}

/// Configuration for detection decoding.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Window size for the max-pool pseudo-NMS (odd)
    pub nms_kernel: usize,
    /// Maximum number of peaks kept per frame
    pub max_detections: usize,
    /// Divide box coordinates by the map size, yielding [0, 1] boxes
    pub normalize_boxes: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            nms_kernel: 3,
            max_detections: 100,
            normalize_boxes: true,
        }
    }
}

/// Decode detector output maps into detections, sorted by descending score.
///
/// A cell survives NMS iff its heatmap value equals the maximum over the
/// `nms_kernel` window centred on it. Score filtering is left to the
/// tracker's detection threshold.
pub fn decode_detections(
    heatmap: ArrayView3<f32>,
    boxes: ArrayView3<f32>,
    embeddings: ArrayView3<f32>,
    config: &DecoderConfig,
) -> Result<Vec<Detection>, DecodeError> {
    let (_, hm_h, hm_w) = heatmap.dim();
    let (box_c, box_h, box_w) = boxes.dim();
    let (_, emb_h, emb_w) = embeddings.dim();

    if box_c != 4 {
        return Err(DecodeError::BadBoxChannels(box_c));
    }
    if (hm_h, hm_w) != (box_h, box_w) || (hm_h, hm_w) != (emb_h, emb_w) {
        return Err(DecodeError::SpatialMismatch {
            heatmap: (hm_h, hm_w),
            boxes: (box_h, box_w),
            embeddings: (emb_h, emb_w),
        });
    }
    if config.nms_kernel == 0 || config.nms_kernel % 2 == 0 {
        return Err(DecodeError::BadNmsKernel(config.nms_kernel));
    }

    let mut peaks = collect_peaks(heatmap, config.nms_kernel);
    peaks.sort_by(|a, b| b.score.total_cmp(&a.score));
    peaks.truncate(config.max_detections);

    let detections = peaks
        .into_iter()
        .map(|p| {
            // Box channels are distances from the cell center.
            let cx = p.x as f32 + 0.5;
            let cy = p.y as f32 + 0.5;
            let left = boxes[[0, p.y, p.x]];
            let top = boxes[[1, p.y, p.x]];
            let right = boxes[[2, p.y, p.x]];
            let bottom = boxes[[3, p.y, p.x]];

            let mut bbox = Rect::from_tlbr(cx - left, cy - top, cx + right, cy + bottom);
            if config.normalize_boxes {
                bbox.x /= hm_w as f32;
                bbox.width /= hm_w as f32;
                bbox.y /= hm_h as f32;
                bbox.height /= hm_h as f32;
            }

            let embedding = embeddings.slice(s![.., p.y, p.x]).to_owned();
            Detection::new(bbox, p.label, p.score, embedding)
        })
        .collect();

    Ok(detections)
}

struct Peak {
    score: f32,
    label: usize,
    y: usize,
    x: usize,
}

/// Max-pool pseudo-NMS: keep cells that dominate their neighbourhood.
fn collect_peaks(heatmap: ArrayView3<f32>, kernel: usize) -> Vec<Peak> {
    let (num_classes, height, width) = heatmap.dim();
    let pad = kernel / 2;
    let mut peaks = Vec::new();

    for c in 0..num_classes {
        for y in 0..height {
            for x in 0..width {
                let score = heatmap[[c, y, x]];
                if score <= 0.0 {
                    continue;
                }

                let y0 = y.saturating_sub(pad);
                let y1 = (y + pad + 1).min(height);
                let x0 = x.saturating_sub(pad);
                let x1 = (x + pad + 1).min(width);

                let window_max = heatmap
                    .slice(s![c, y0..y1, x0..x1])
                    .iter()
                    .fold(f32::NEG_INFINITY, |m, &v| m.max(v));

                if score >= window_max {
                    peaks.push(Peak {
                        score,
                        label: c,
                        y,
                        x,
                    });
                }
            }
        }
    }

    peaks
}
