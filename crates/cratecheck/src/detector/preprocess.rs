use image::{imageops::FilterType, DynamicImage, GrayImage, RgbImage};

use crate::config::ImageSize;

/// Resize an arbitrary decoded image to the working size, as RGB.
pub(crate) fn to_working_rgb(image: &DynamicImage, size: ImageSize) -> RgbImage {
    let rgb = image.to_rgb8();
    if rgb.dimensions() == (size.width, size.height) {
        return rgb;
    }
    image::imageops::resize(&rgb, size.width, size.height, FilterType::Triangle)
}

/// Single-channel intensity of a color image, same dimensions.
pub fn preprocess(image: &RgbImage) -> GrayImage {
    image::imageops::grayscale(image)
}
