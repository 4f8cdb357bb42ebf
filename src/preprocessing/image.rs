use crate::error::InferenceError;
use image::{imageops::FilterType, DynamicImage, ImageReader};
use ndarray::{Array, Array4, Axis};
use std::path::Path;

/// Decodes the image stored at `path` and turns it into a classifier input.
///
/// The format is sniffed from the file contents, so a misleading extension
/// does not prevent decoding.
pub fn load_and_preprocess(
    path: impl AsRef<Path>,
    size: u32,
) -> Result<Array4<f32>, InferenceError> {
    let img = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(image::ImageError::IoError)?
        .decode()?;
    preprocess(&img, size)
}

/// Returns a tensor of shape `[1, size, size, 3]` with values in `[0, 1]`.
///
/// The image is stretched to `size`x`size` (aspect ratio is not kept), any
/// alpha channel is dropped and each channel is divided by 255. Layout stays
/// channels-last.
pub fn preprocess(img: &DynamicImage, size: u32) -> Result<Array4<f32>, InferenceError> {
    let resized = img.resize_exact(size, size, FilterType::CatmullRom);

    let side = size as usize;
    let data: Vec<f32> = resized
        .to_rgb8()
        .into_raw()
        .into_iter()
        .map(|v| v as f32 / 255.0)
        .collect();

    // [H, W, C] -> add batch [1, H, W, C]
    let array = Array::from_shape_vec((side, side, 3), data)
        .map_err(|e| InferenceError::PreprocessingError(e.to_string()))?;

    Ok(array.insert_axis(Axis(0)))
}
