use crate::error::DetectorError;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};
use image::RgbImage;
use ndarray::{Array, IxDyn};

const LETTERBOX_COLOR: u8 = 114;

/// Model-ready tensor plus the letterbox transform needed to map network
/// output back into target-frame pixel coordinates.
pub struct ModelInput {
    /// NCHW float tensor, values scaled to [0, 1].
    pub tensor: Array<f32, IxDyn>,
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

/// Decode an encoded image buffer (JPEG/PNG) into RGB pixels.
pub fn decode_frame(data: &[u8]) -> Result<RgbImage, DetectorError> {
    let decoded = image::load_from_memory(data)
        .map_err(|e| DetectorError::InvalidImage(e.to_string()))?;
    Ok(decoded.to_rgb8())
}

/// Decode and stretch-resize an uploaded image to the target frame.
///
/// Detections and the coordinate mapping both operate in this frame, so the
/// resize must happen before inference, not after.
pub fn prepare_frame(data: &[u8], width: u32, height: u32) -> Result<RgbImage, DetectorError> {
    let decoded = decode_frame(data)?;
    resize_to_frame(&decoded, width, height)
}

/// Plain bilinear stretch to exactly `width x height`, no aspect preservation.
pub fn resize_to_frame(
    frame: &RgbImage,
    width: u32,
    height: u32,
) -> Result<RgbImage, DetectorError> {
    if frame.dimensions() == (width, height) {
        return Ok(frame.clone());
    }

    let (src_w, src_h) = frame.dimensions();
    let src = Image::from_vec_u8(src_w, src_h, frame.as_raw().clone(), PixelType::U8x3)
        .map_err(|e| DetectorError::InvalidImage(e.to_string()))?;

    let mut dst = Image::new(width, height, PixelType::U8x3);
    Resizer::new()
        .resize(
            &src,
            &mut dst,
            &ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear)),
        )
        .map_err(|e| DetectorError::InferenceError(e.to_string()))?;

    RgbImage::from_raw(width, height, dst.buffer().to_vec())
        .ok_or_else(|| DetectorError::InferenceError("resized buffer size mismatch".to_string()))
}

/// Letterbox a target-frame image into the network input size and normalize
/// it to an NCHW tensor.
pub fn letterbox_to_input(
    frame: &RgbImage,
    input_size: (u32, u32),
) -> Result<ModelInput, DetectorError> {
    let _s = common::span!("letterbox_to_input");

    let (width, height) = frame.dimensions();
    let (input_w, input_h) = input_size;

    let scale = (input_w as f32 / width as f32).min(input_h as f32 / height as f32);
    let new_width = (width as f32 * scale) as u32;
    let new_height = (height as f32 * scale) as u32;

    let offset_x = (input_w - new_width) / 2;
    let offset_y = (input_h - new_height) / 2;

    let src = Image::from_vec_u8(width, height, frame.as_raw().clone(), PixelType::U8x3)
        .map_err(|e| DetectorError::InvalidImage(e.to_string()))?;

    let mut resized = Image::new(new_width, new_height, PixelType::U8x3);
    Resizer::new()
        .resize(
            &src,
            &mut resized,
            &ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear)),
        )
        .map_err(|e| DetectorError::InferenceError(e.to_string()))?;

    let mut letterboxed = vec![LETTERBOX_COLOR; (input_w * input_h * 3) as usize];
    let resized_data = resized.buffer();
    let stride = input_w * 3;

    for y in 0..new_height {
        let src_row = (y * new_width * 3) as usize;
        let dst_row = ((y + offset_y) * stride + offset_x * 3) as usize;
        letterboxed[dst_row..dst_row + (new_width * 3) as usize]
            .copy_from_slice(&resized_data[src_row..src_row + (new_width * 3) as usize]);
    }

    let tensor = normalize(&letterboxed, input_w, input_h)?;

    Ok(ModelInput {
        tensor,
        scale,
        offset_x: offset_x as f32,
        offset_y: offset_y as f32,
    })
}

/// Scale u8 RGB to [0, 1] floats in channel-first layout.
fn normalize(pixels: &[u8], width: u32, height: u32) -> Result<Array<f32, IxDyn>, DetectorError> {
    let spatial = (width * height) as usize;
    let mut output = vec![0.0f32; 3 * spatial];

    for (i, px) in pixels.chunks_exact(3).enumerate() {
        output[i] = px[0] as f32 / 255.0;
        output[i + spatial] = px[1] as f32 / 255.0;
        output[i + 2 * spatial] = px[2] as f32 / 255.0;
    }

    Array::from_shape_vec(IxDyn(&[1, 3, height as usize, width as usize]), output)
        .map_err(|e| DetectorError::InferenceError(e.to_string()))
}
