use image::DynamicImage;
use image::imageops::FilterType;

use crate::error::AnalysisError;

/// NHWC float tensor with values in [0, 1], batch size 1.
#[derive(Debug, Clone)]
pub struct ChartTensor {
    shape: [usize; 4],
    data: Vec<f32>,
}

impl ChartTensor {
    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f32>() / self.data.len() as f32
    }
}

pub fn decode_chart(bytes: &[u8]) -> Result<DynamicImage, AnalysisError> {
    Ok(image::load_from_memory(bytes)?)
}

/// Nearest-neighbour resize to `size`x`size`, RGB, scaled to [0, 1].
pub fn preprocess(image: &DynamicImage, size: u32) -> ChartTensor {
    let resized = image.resize_exact(size, size, FilterType::Nearest).to_rgb8();
    let data = resized
        .as_raw()
        .iter()
        .map(|&channel| f32::from(channel) / 255.0)
        .collect();
    ChartTensor {
        shape: [1, size as usize, size as usize, 3],
        data,
    }
}

/// Decodes and preprocesses in one scope so the full-size decoded image is
/// freed before the tensor is returned.
pub fn tensor_from_bytes(bytes: &[u8], size: u32) -> Result<ChartTensor, AnalysisError> {
    let decoded = decode_chart(bytes)?;
    let tensor = preprocess(&decoded, size);
    drop(decoded);
    Ok(tensor)
}
