use crate::{
    enums::{BitsAllocated, ConversionErrorKind},
    raster::RasterFrame,
};

use dicom::object::{FileDicomObject, InMemDicomObject, from_reader};
use dicom_dictionary_std::{tags, uids};
use image::ImageFormat;
use log::debug;
use ndarray::Array2;
use std::io::Cursor;
use thiserror::Error;

const PREAMBLE_LEN: usize = 128;
const MAGIC: &[u8] = b"DICM";

/// Transfer syntaxes whose pixel data is stored as plain samples
const NATIVE_TRANSFER_SYNTAXES: [&str; 3] = [
    uids::IMPLICIT_VR_LITTLE_ENDIAN,
    uids::EXPLICIT_VR_LITTLE_ENDIAN,
    uids::EXPLICIT_VR_BIG_ENDIAN,
];

#[derive(Debug, Error)]
pub enum DicomRasterizerError {
    #[error("Not a DICOM stream (missing DICM magic code)")]
    NotDicom,

    #[error("DICOM error: {0}")]
    Dicom(#[from] dicom::object::ReadError),

    #[error("No pixel data element found")]
    MissingPixelData,

    #[error("Unsupported transfer syntax {0}")]
    UnsupportedTransferSyntax(String),

    #[error("Unsupported bits allocated: {0}")]
    UnsupportedBitsAllocated(u16),

    #[error("Pixel data is not stored as native samples: {0}")]
    UnsupportedPixelData(String),

    #[error("Invalid image dimensions {rows}x{columns}")]
    InvalidDimensions { rows: u32, columns: u32 },

    #[error("Pixel data holds {actual} samples, expected {expected}")]
    TruncatedPixelData { expected: usize, actual: usize },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl DicomRasterizerError {
    pub fn kind(&self) -> ConversionErrorKind {
        match self {
            Self::MissingPixelData => ConversionErrorKind::MissingPixelData,
            Self::UnsupportedTransferSyntax(_)
            | Self::UnsupportedBitsAllocated(_)
            | Self::UnsupportedPixelData(_) => ConversionErrorKind::UnsupportedEncoding,
            Self::NotDicom
            | Self::Dicom(_)
            | Self::InvalidDimensions { .. }
            | Self::TruncatedPixelData { .. }
            | Self::Image(_) => ConversionErrorKind::Format,
        }
    }
}

/// Fallbacks for image geometry attributes missing from a data set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterOptions {
    pub default_rows: u32,
    pub default_columns: u32,
    pub default_bits_allocated: BitsAllocated,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            default_rows: 512,
            default_columns: 512,
            default_bits_allocated: BitsAllocated::default(),
        }
    }
}

pub struct DicomRasterizer;

impl DicomRasterizer {
    /// Convert a DICOM file buffer into an RGBA PNG with default options
    pub fn convert(bytes: &[u8]) -> Result<Vec<u8>, DicomRasterizerError> {
        Self::convert_with_options(bytes, &RasterOptions::default())
    }

    /// Convert a DICOM file buffer into an RGBA PNG
    ///
    /// # Arguments
    ///
    /// * `bytes` - DICOM Part 10 stream, with or without the 128-byte preamble
    /// * `options` - Geometry fallbacks for absent attributes
    ///
    /// # Errors
    ///
    /// Returns error if the stream is not DICOM, has no pixel data, uses a
    /// compressed transfer syntax or holds fewer samples than its geometry
    pub fn convert_with_options(
        bytes: &[u8],
        options: &RasterOptions,
    ) -> Result<Vec<u8>, DicomRasterizerError> {
        let frame = Self::decode_frame(bytes, options)?;
        Self::encode_png(&frame)
    }

    pub fn decode_frame(
        bytes: &[u8],
        options: &RasterOptions,
    ) -> Result<RasterFrame, DicomRasterizerError> {
        let stream = Self::strip_preamble(bytes).ok_or(DicomRasterizerError::NotDicom)?;
        let dicom_object = from_reader(stream)?;
        Self::frame_from_object(&dicom_object, options)
    }

    /// Build a frame from an already parsed DICOM object
    pub fn frame_from_object(
        dicom_object: &FileDicomObject<InMemDicomObject>,
        options: &RasterOptions,
    ) -> Result<RasterFrame, DicomRasterizerError> {
        Self::check_transfer_syntax(dicom_object.meta().transfer_syntax())?;

        let pixel_data = dicom_object
            .element(tags::PIXEL_DATA)
            .map_err(|_| DicomRasterizerError::MissingPixelData)?;

        let rows = Self::read_dimension(dicom_object, tags::ROWS).unwrap_or(options.default_rows);
        let columns =
            Self::read_dimension(dicom_object, tags::COLUMNS).unwrap_or(options.default_columns);
        let bits_allocated = match Self::read_dimension(dicom_object, tags::BITS_ALLOCATED) {
            Some(bits) => {
                let bits = u16::try_from(bits).unwrap_or(u16::MAX);
                BitsAllocated::from_bits(bits)
                    .ok_or(DicomRasterizerError::UnsupportedBitsAllocated(bits))?
            }
            None => options.default_bits_allocated,
        };

        let invalid = DicomRasterizerError::InvalidDimensions { rows, columns };
        let (height, width) = (rows as usize, columns as usize);
        if height == 0 || width == 0 {
            return Err(invalid);
        }
        let count = height.checked_mul(width).ok_or(invalid)?;

        let bytes = pixel_data
            .to_bytes()
            .map_err(|e| DicomRasterizerError::UnsupportedPixelData(e.to_string()))?;
        let samples = Self::reinterpret_samples(&bytes, bits_allocated, count)?;
        debug!(
            "Decoded {columns}x{rows} frame with {} bits allocated",
            bits_allocated.bits()
        );

        let samples = Array2::from_shape_vec((height, width), samples)
            .map_err(|_| DicomRasterizerError::InvalidDimensions { rows, columns })?;
        Ok(RasterFrame::new(samples, bits_allocated))
    }

    /// Encode the rescaled frame as RGBA8 PNG
    pub fn encode_png(frame: &RasterFrame) -> Result<Vec<u8>, DicomRasterizerError> {
        let image = frame
            .to_rgba_image()
            .ok_or(DicomRasterizerError::InvalidDimensions {
                rows: u32::try_from(frame.rows()).unwrap_or(u32::MAX),
                columns: u32::try_from(frame.columns()).unwrap_or(u32::MAX),
            })?;
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }

    fn strip_preamble(bytes: &[u8]) -> Option<&[u8]> {
        if bytes.get(PREAMBLE_LEN..PREAMBLE_LEN + MAGIC.len()) == Some(MAGIC) {
            Some(&bytes[PREAMBLE_LEN..])
        } else if bytes.starts_with(MAGIC) {
            Some(bytes)
        } else {
            None
        }
    }

    fn check_transfer_syntax(uid: &str) -> Result<(), DicomRasterizerError> {
        let uid = uid.trim_end_matches(['\0', ' ']);
        if NATIVE_TRANSFER_SYNTAXES.contains(&uid) {
            Ok(())
        } else {
            Err(DicomRasterizerError::UnsupportedTransferSyntax(
                uid.to_string(),
            ))
        }
    }

    fn read_dimension(
        dicom_object: &FileDicomObject<InMemDicomObject>,
        tag: dicom::core::Tag,
    ) -> Option<u32> {
        dicom_object.element(tag).ok()?.to_int::<u32>().ok()
    }

    /// Reads exactly `count` samples, ignoring any surplus
    fn reinterpret_samples(
        bytes: &[u8],
        bits_allocated: BitsAllocated,
        count: usize,
    ) -> Result<Vec<u16>, DicomRasterizerError> {
        let available = bytes.len() / bits_allocated.bytes_per_sample();
        if available < count {
            return Err(DicomRasterizerError::TruncatedPixelData {
                expected: count,
                actual: available,
            });
        }
        if available > count {
            debug!("Ignoring {} surplus pixel samples", available - count);
        }

        let samples = match bits_allocated {
            BitsAllocated::Eight => bytes[..count].iter().map(|&b| u16::from(b)).collect(),
            // The parser holds OW values in native byte order
            BitsAllocated::Sixteen => bytes[..count * 2]
                .chunks_exact(2)
                .map(|pair| u16::from_ne_bytes([pair[0], pair[1]]))
                .collect(),
        };
        Ok(samples)
    }
}
