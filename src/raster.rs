use crate::enums::BitsAllocated;
use crate::rescaler::Rescaler;

use image::{DynamicImage, GrayImage, ImageBuffer, RgbaImage};
use ndarray::{Array2, Zip};

/// One decoded DICOM image plane with its observed intensity range.
#[derive(Debug, Clone)]
pub struct RasterFrame {
    samples: Array2<u16>,
    bits_allocated: BitsAllocated,
    rescaler: Rescaler,
}

impl RasterFrame {
    /// `samples` is indexed `[row, column]`
    pub fn new(samples: Array2<u16>, bits_allocated: BitsAllocated) -> Self {
        let rescaler = Rescaler::from_samples(&samples.view());
        Self {
            samples,
            bits_allocated,
            rescaler,
        }
    }

    pub fn rows(&self) -> usize {
        self.samples.nrows()
    }

    pub fn columns(&self) -> usize {
        self.samples.ncols()
    }

    pub fn bits_allocated(&self) -> BitsAllocated {
        self.bits_allocated
    }

    pub fn samples(&self) -> &Array2<u16> {
        &self.samples
    }

    pub fn min_value(&self) -> u16 {
        self.rescaler.min()
    }

    pub fn max_value(&self) -> u16 {
        self.rescaler.max()
    }

    /// Rescaled luminance, same shape as the samples
    pub fn luminance(&self) -> Array2<u8> {
        let rescaler = self.rescaler;
        Zip::from(&self.samples).par_map_collect(|&v| rescaler.scale(v))
    }

    pub fn to_luma_image(&self) -> Option<GrayImage> {
        let width = u32::try_from(self.columns()).ok()?;
        let height = u32::try_from(self.rows()).ok()?;
        // Logical iteration order is row-major regardless of memory layout
        let pixel_data: Vec<u8> = self.luminance().iter().copied().collect();
        ImageBuffer::from_raw(width, height, pixel_data)
    }

    /// Grayscale broadcast into R, G and B with opaque alpha
    pub fn to_rgba_image(&self) -> Option<RgbaImage> {
        self.to_luma_image()
            .map(|luma| DynamicImage::ImageLuma8(luma).into_rgba8())
    }
}
