use std::{path::PathBuf, process::ExitCode};

use asset_convert::importer::{ImportOutcome, Importer};

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        eprintln!("Usage: asset-convert <FILE.stl|FILE.obj|FILE.dcm|DICOM_DIR>...");
        return ExitCode::from(2);
    }

    let importer: Importer = Importer::default();
    let mut failed = false;
    for path in &paths {
        match importer.import_path(path) {
            Ok(ImportOutcome::Batch(report)) => {
                for (_, output) in &report.converted {
                    println!("{}", output.display());
                }
                failed |= !report.is_complete();
            }
            Ok(ImportOutcome::Asset(asset)) => {
                println!("{}", asset.staged_path().display());
            }
            // Already reported through the sink
            Err(_) => failed = true,
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
