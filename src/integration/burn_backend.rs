//! Burn inference backend for CenterNet-style tracking models.
//!
//! This module provides a `BurnDetector` that implements `DetectionSource`
//! for models built with the Burn framework. The model's forward pass
//! yields the three raw output maps (heatmap, box map, embedding map);
//! decoding into detections is handled by [`crate::decode`].
//!
//! # Example
//!
//! ```ignore
//! use centertrack_rs::integration::{BurnDetector, BurnModel, TrackingOutput};
//! use burn::backend::NdArray;
//!
//! // Implement BurnModel for your detection model
//! struct MyCenterNet { /* ... */ }
//!
//! impl BurnModel<NdArray> for MyCenterNet {
//!     fn forward(&self, input: burn::tensor::Tensor<NdArray, 4>) -> TrackingOutput<NdArray> {
//!         // Run inference
//!     }
//! }
//!
//! let model = MyCenterNet::load("model.bin");
//! let detector = BurnDetector::new(model, device);
//! ```

use burn::prelude::*;
use burn::tensor::Tensor;
use ndarray::Array3;
use thiserror::Error;

use super::DetectionSource;
use crate::decode::{self, DecodeError, DecoderConfig};
use crate::tracker::Detection;

/// Error type for Burn detection failures.
#[derive(Debug, Error)]
pub enum BurnDetectorError {
    /// Input buffer does not match the claimed dimensions.
    #[error(
        "input buffer of {got_bytes} bytes does not match {channels}x{height}x{width} \
         ({expected_bytes} bytes)"
    )]
    InvalidInputDimensions {
        channels: u32,
        height: u32,
        width: u32,
        expected_bytes: usize,
        got_bytes: usize,
    },
    /// Preprocessing failed.
    #[error("preprocessing error: {0}")]
    Preprocessing(String),
    /// Reading model outputs back from the backend failed.
    #[error("inference error: {0}")]
    Inference(String),
    /// Decoding the output maps failed.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Raw output maps of a tracking model, shape `[1, C, H, W]` each.
pub struct TrackingOutput<B: Backend> {
    /// Per-class center heatmap, C = number of classes
    pub heatmap: Tensor<B, 4>,
    /// Box map, C = 4 (left/top/right/bottom distances)
    pub boxes: Tensor<B, 4>,
    /// Re-identification embedding map, C = embedding dimension
    pub embeddings: Tensor<B, 4>,
}

/// Trait for Burn-based tracking models.
///
/// Implement this trait for your specific model architecture.
pub trait BurnModel<B: Backend>: Send + Sync {
    /// Run forward pass on the input tensor.
    ///
    /// # Arguments
    /// * `input` - Input tensor of shape [batch, channels, height, width]
    fn forward(&self, input: Tensor<B, 4>) -> TrackingOutput<B>;

    /// Get the expected input size (channels, height, width).
    fn input_size(&self) -> (u32, u32, u32) {
        (3, 512, 512) // Default CenterNet input size
    }
}

/// Burn-based object detector implementing `DetectionSource`.
pub struct BurnDetector<B: Backend, M: BurnModel<B>> {
    model: M,
    device: B::Device,
    decoder: DecoderConfig,
}

impl<B: Backend, M: BurnModel<B>> BurnDetector<B, M> {
    /// Create a new Burn detector with the given model and device.
    pub fn new(model: M, device: B::Device) -> Self {
        Self {
            model,
            device,
            decoder: DecoderConfig::default(),
        }
    }

    /// Override the decoder configuration.
    pub fn with_decoder_config(mut self, decoder: DecoderConfig) -> Self {
        self.decoder = decoder;
        self
    }

    /// Preprocess raw image bytes to a Burn tensor.
    ///
    /// Override this method for custom preprocessing.
    pub fn preprocess(
        &self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Tensor<B, 4>, BurnDetectorError> {
        let (channels, target_h, target_w) = self.model.input_size();
        let expected_len = (width * height * channels) as usize;

        if input.len() != expected_len {
            return Err(BurnDetectorError::InvalidInputDimensions {
                channels,
                height,
                width,
                expected_bytes: expected_len,
                got_bytes: input.len(),
            });
        }

        // Convert u8 to f32 and normalize to [0, 1]
        let data: Vec<f32> = input.iter().map(|&x| x as f32 / 255.0).collect();

        let tensor = Tensor::<B, 1>::from_floats(data.as_slice(), &self.device).reshape([
            1,
            channels as usize,
            height as usize,
            width as usize,
        ]);

        if height != target_h || width != target_w {
            // Input must match the model size; resizing belongs upstream.
            return Err(BurnDetectorError::Preprocessing(format!(
                "Input size {}x{} doesn't match model size {}x{}. Resize not implemented.",
                width, height, target_w, target_h
            )));
        }

        Ok(tensor)
    }

    /// Read a `[1, C, H, W]` tensor back into a `[C, H, W]` ndarray.
    fn to_array3(tensor: Tensor<B, 4>) -> Result<Array3<f32>, BurnDetectorError> {
        let [_, c, h, w] = tensor.dims();
        let data: Vec<f32> = tensor
            .into_data()
            .to_vec()
            .map_err(|e| BurnDetectorError::Inference(format!("{:?}", e)))?;
        Array3::from_shape_vec((c, h, w), data)
            .map_err(|e| BurnDetectorError::Inference(e.to_string()))
    }
}


impl<B: Backend, M: BurnModel<B>> DetectionSource for BurnDetector<B, M> {
    type Error = BurnDetectorError;

    fn detect(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<Detection>, Self::Error> {
        let tensor = self.preprocess(input, width, height)?;
        let output = self.model.forward(tensor);

        let heatmap = Self::to_array3(output.heatmap)?;
        let boxes = Self::to_array3(output.boxes)?;
        let embeddings = Self::to_array3(output.embeddings)?;

        let detections = decode::decode_detections(
            heatmap.view(),
            boxes.view(),
            embeddings.view(),
            &self.decoder,
        )?;
        Ok(detections)
    }
}
