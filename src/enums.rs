use std::path::Path;

/// Sample word width of the pixel data element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitsAllocated {
    Eight,
    #[default]
    Sixteen,
}

impl BitsAllocated {
    pub fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            8 => Some(Self::Eight),
            16 => Some(Self::Sixteen),
            _ => None,
        }
    }

    pub fn bits(self) -> u16 {
        match self {
            Self::Eight => 8,
            Self::Sixteen => 16,
        }
    }

    pub fn bytes_per_sample(self) -> usize {
        match self {
            Self::Eight => 1,
            Self::Sixteen => 2,
        }
    }
}

/// Coarse classification of every conversion failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionErrorKind {
    /// The buffer cannot be decoded under the expected binary layout
    Format,
    /// A DICOM data set without a pixel data element
    MissingPixelData,
    /// Compressed transfer syntax or unexpected sample width
    UnsupportedEncoding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// Binary STL, converted to OBJ
    Mesh,
    /// Already an OBJ, staged unchanged
    PassThroughMesh,
    /// Single DICOM file, converted to PNG
    DicomImage,
}

impl AssetKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension().and_then(|s| s.to_str())?;
        if ext.eq_ignore_ascii_case("stl") {
            Some(Self::Mesh)
        } else if ext.eq_ignore_ascii_case("obj") {
            Some(Self::PassThroughMesh)
        } else if ext.eq_ignore_ascii_case("dcm") {
            Some(Self::DicomImage)
        } else {
            None
        }
    }

    /// Extension of the converted sibling file, if this kind is converted at all
    pub fn output_extension(self) -> Option<&'static str> {
        match self {
            Self::Mesh => Some("obj"),
            Self::DicomImage => Some("png"),
            Self::PassThroughMesh => None,
        }
    }
}
