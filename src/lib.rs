//! # asset-convert library
//!
//! This crate converts the asset files a user picks for a Unity HoloLens
//! project into formats Unity imports directly:
//!  - Binary STL meshes are re-emitted as Wavefront OBJ text
//!  - DICOM images are rasterized into 8-bit grayscale RGBA PNG
//!
//! Both converters are pure functions over byte buffers. The [`importer`]
//! module wraps them for files and folders: converted files are written
//! next to their source with the extension swapped (`.stl` to `.obj`,
//! `.dcm` to `.png`) and the original is never touched. DICOM folders are
//! converted in parallel using rayon; a file that fails is skipped and the
//! rest of the folder is still converted. An STL file that fails to convert
//! is passed through unchanged.
//!
//! DICOM files are assumed to have the following attributes:
//!  - Native (uncompressed) transfer syntax
//!  - 8 or 16 bits allocated, grayscale
//!  - No multiframe (only the first frame is used)
//!
//! Pixel Representation and Rescale Slope/Intercept are not applied: the
//! raw unsigned samples are windowed between their observed minimum and
//! maximum.
//!
//! # Examples
//!
//! ## Converting a single STL buffer
//!
//! ```no_run
//! # use asset_convert::mesh_converter::MeshConverter;
//! let stl = std::fs::read("heart.stl").expect("should have read file");
//! let obj = MeshConverter::convert(&stl).expect("should have converted mesh");
//! std::fs::write("heart.obj", obj).expect("should have written file");
//! ```
//!
//! ## Converting a folder of DICOM files
//!
//! ```no_run
//! # use asset_convert::importer::{ImportOptions, Importer, LogSink};
//! let report = Importer::new(ImportOptions::default(), LogSink)
//!     .convert_dicom_directory("dicom")
//!     .expect("should have found DICOM files");
//! for (source, error) in &report.failed {
//!     eprintln!("{}: {error}", source.display());
//! }
//! ```

pub mod dicom_rasterizer;
pub mod enums;
pub mod importer;
pub mod mesh;
pub mod mesh_converter;
pub mod raster;
mod rescaler;

pub use dicom_rasterizer::{DicomRasterizer, DicomRasterizerError, RasterOptions};
pub use importer::{ConversionSink, ImportError, ImportOptions, Importer, LogSink};
pub use mesh_converter::{MeshConverter, MeshConverterError};
