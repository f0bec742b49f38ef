use crate::{
    dicom_rasterizer::{DicomRasterizer, DicomRasterizerError, RasterOptions},
    enums::AssetKind,
    mesh_converter::{MeshConverter, MeshConverterError},
};

use log::{error, info, warn};
use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("No DICOM files found in {0}")]
    NoDicomFiles(PathBuf),

    #[error("Unsupported file type: {0}")]
    UnsupportedFile(PathBuf),

    #[error("Mesh conversion failed: {0}")]
    Mesh(#[from] MeshConverterError),

    #[error("DICOM conversion failed: {0}")]
    Dicom(#[from] DicomRasterizerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Receives the outcome of every file handled by an [`Importer`]
pub trait ConversionSink: Send + Sync {
    fn converted(&self, source: &Path, output: &Path);

    /// `reason` is set when the file was kept because its conversion failed
    fn passed_through(&self, source: &Path, reason: Option<&ImportError>);

    fn failed(&self, source: &Path, error: &ImportError);
}

/// Forwards outcomes to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ConversionSink for LogSink {
    fn converted(&self, source: &Path, output: &Path) {
        info!("Converted {} -> {}", source.display(), output.display());
    }

    fn passed_through(&self, source: &Path, reason: Option<&ImportError>) {
        match reason {
            Some(reason) => warn!(
                "Conversion of {} failed ({reason}), keeping original file",
                source.display()
            ),
            None => info!("Keeping {} unchanged", source.display()),
        }
    }

    fn failed(&self, source: &Path, error: &ImportError) {
        error!("Failed to convert {}: {error}", source.display());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Convert the files of a DICOM folder on the rayon pool
    pub parallel: bool,
    pub raster: RasterOptions,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            raster: RasterOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportedAsset {
    Converted { source: PathBuf, output: PathBuf },
    /// The original file is staged as it is
    PassThrough { source: PathBuf },
}

impl ImportedAsset {
    /// The file that should end up in the asset tree
    pub fn staged_path(&self) -> &Path {
        match self {
            Self::Converted { output, .. } => output,
            Self::PassThrough { source } => source,
        }
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    /// (source, output) pairs in path order
    pub converted: Vec<(PathBuf, PathBuf)>,
    pub failed: Vec<(PathBuf, ImportError)>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug)]
pub enum ImportOutcome {
    Asset(ImportedAsset),
    Batch(BatchReport),
}

/// Sibling path with the converted extension, `None` for files that are not converted
pub fn output_path_for(path: &Path) -> Option<PathBuf> {
    let extension = AssetKind::from_path(path)?.output_extension()?;
    Some(path.with_extension(extension))
}

pub struct Importer<S: ConversionSink = LogSink> {
    options: ImportOptions,
    sink: S,
}

impl Default for Importer {
    fn default() -> Self {
        Self::new(ImportOptions::default(), LogSink)
    }
}

impl<S: ConversionSink> Importer<S> {
    pub fn new(options: ImportOptions, sink: S) -> Self {
        Self { options, sink }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Import a single file or a DICOM folder
    ///
    /// # Errors
    ///
    /// Returns error for unknown file types, I/O failures, DICOM folders
    /// without `.dcm` files and single DICOM files that fail to convert
    pub fn import_path(&self, path: impl AsRef<Path>) -> Result<ImportOutcome, ImportError> {
        let path = path.as_ref();
        let result = if path.is_dir() {
            self.convert_dicom_directory(path).map(ImportOutcome::Batch)
        } else {
            match AssetKind::from_path(path) {
                Some(AssetKind::Mesh | AssetKind::PassThroughMesh) => {
                    self.convert_mesh_file(path).map(ImportOutcome::Asset)
                }
                Some(AssetKind::DicomImage) => self.convert_dicom_file(path).map(|output| {
                    ImportOutcome::Asset(ImportedAsset::Converted {
                        source: path.to_path_buf(),
                        output,
                    })
                }),
                None => Err(ImportError::UnsupportedFile(path.to_path_buf())),
            }
        };

        result.inspect_err(|e| self.sink.failed(path, e))
    }

    /// Convert an STL file to a sibling OBJ
    ///
    /// A file that cannot be converted is kept as it is and reported as a
    /// pass-through. OBJ files are always passed through.
    pub fn convert_mesh_file(&self, path: impl AsRef<Path>) -> Result<ImportedAsset, ImportError> {
        let path = path.as_ref();
        let source = path.to_path_buf();

        let output = match (AssetKind::from_path(path), output_path_for(path)) {
            (Some(AssetKind::Mesh), Some(output)) => output,
            (Some(AssetKind::PassThroughMesh), _) => {
                self.sink.passed_through(path, None);
                return Ok(ImportedAsset::PassThrough { source });
            }
            _ => return Err(ImportError::UnsupportedFile(source)),
        };

        let bytes = fs::read(path)?;
        match MeshConverter::convert(&bytes) {
            Ok(obj) => {
                fs::write(&output, obj)?;
                self.sink.converted(path, &output);
                Ok(ImportedAsset::Converted { source, output })
            }
            Err(e) => {
                self.sink.passed_through(path, Some(&ImportError::Mesh(e)));
                Ok(ImportedAsset::PassThrough { source })
            }
        }
    }

    /// Convert one DICOM file to a sibling PNG and return the PNG path
    pub fn convert_dicom_file(&self, path: impl AsRef<Path>) -> Result<PathBuf, ImportError> {
        let path = path.as_ref();
        let output = match AssetKind::from_path(path) {
            Some(AssetKind::DicomImage) => path.with_extension("png"),
            _ => return Err(ImportError::UnsupportedFile(path.to_path_buf())),
        };

        let bytes = fs::read(path)?;
        let png = DicomRasterizer::convert_with_options(&bytes, &self.options.raster)?;
        fs::write(&output, png)?;
        self.sink.converted(path, &output);
        Ok(output)
    }

    /// Convert every `.dcm` file of a folder, skipping the ones that fail
    pub fn convert_dicom_directory(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<BatchReport, ImportError> {
        let dir = path.as_ref();
        let mut paths: Vec<_> = fs::read_dir(dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && AssetKind::from_path(path) == Some(AssetKind::DicomImage)
            })
            .collect();

        if paths.is_empty() {
            return Err(ImportError::NoDicomFiles(dir.to_path_buf()));
        }
        paths.sort();

        let convert = |path: PathBuf| {
            let result = self.convert_dicom_file(&path);
            if let Err(e) = &result {
                self.sink.failed(&path, e);
            }
            (path, result)
        };

        let results: Vec<_> = if self.options.parallel {
            paths.into_par_iter().map(convert).collect()
        } else {
            paths.into_iter().map(convert).collect()
        };

        let mut report = BatchReport::default();
        for (source, result) in results {
            match result {
                Ok(output) => report.converted.push((source, output)),
                Err(e) => report.failed.push((source, e)),
            }
        }
        info!(
            "Converted {} of {} DICOM files in {}",
            report.converted.len(),
            report.converted.len() + report.failed.len(),
            dir.display()
        );
        Ok(report)
    }
}
