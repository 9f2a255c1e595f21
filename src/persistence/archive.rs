//! Input replication and zip packaging of augmented ontologies

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::core::{unique_file_name, ResysError, ResysResult};

/// Ontologies an OCEAN document imports, expected next to it in the output directory
pub const COMPANION_ONTOLOGIES: [&str; 4] = [
    "metrics.owl",
    "codesmells.owl",
    "repositories.owl",
    "osore.owl",
];

/// Copies `<input_dir>/<name>` to `<output_dir>/ocean_<uid>.owl`.
///
/// Returns the new file name; the input file is left untouched.
pub fn replicate(input_dir: &Path, output_dir: &Path, name: &str) -> ResysResult<String> {
    let source = input_dir.join(name);
    if !source.is_file() {
        return Err(ResysError::ontology_access(
            source.display().to_string(),
            "input ontology not found",
        ));
    }

    let replica = unique_file_name("ocean", "owl");
    let target = output_dir.join(&replica);
    fs::copy(&source, &target).map_err(|e| {
        ResysError::persistence(format!(
            "cannot replicate {} to {}: {}",
            source.display(),
            target.display(),
            e
        ))
    })?;

    info!("Replicated {} as {}", source.display(), target.display());
    Ok(replica)
}

/// Removes a replica left behind by a run that failed before writing to it.
pub fn discard(output_dir: &Path, replica: &str) {
    let path = output_dir.join(replica);
    match fs::remove_file(&path) {
        Ok(()) => info!("Discarded replica {}", path.display()),
        Err(e) => warn!("Cannot discard replica {}: {}", path.display(), e),
    }
}

/// Bundles the companion ontologies and `ontology_file` from `output_dir`
/// into `<output_dir>/ocean_<uid>.zip`. Returns the archive file name.
///
/// Missing companions are skipped with a warning; a missing `ontology_file`
/// is an error.
pub fn package(output_dir: &Path, ontology_file: &str) -> ResysResult<String> {
    let main = output_dir.join(ontology_file);
    if !main.is_file() {
        return Err(ResysError::persistence(format!(
            "cannot package missing ontology {}",
            main.display()
        )));
    }

    let archive_name = unique_file_name("ocean", "zip");
    let archive_path = output_dir.join(&archive_name);
    let file = File::create(&archive_path).map_err(|e| {
        ResysError::persistence(format!("cannot create {}: {}", archive_path.display(), e))
    })?;

    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries: Vec<PathBuf> = COMPANION_ONTOLOGIES
        .iter()
        .map(|name| output_dir.join(name))
        .filter(|path| {
            let present = path.is_file();
            if !present {
                warn!("Companion ontology {} not found, not packaged", path.display());
            }
            present
        })
        .collect();
    entries.push(main);

    for path in &entries {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bytes = fs::read(path)
            .map_err(|e| ResysError::persistence(format!("cannot read {}: {}", path.display(), e)))?;

        zip.start_file(name, options).map_err(ResysError::persistence)?;
        zip.write_all(&bytes).map_err(ResysError::persistence)?;
    }
    zip.finish().map_err(ResysError::persistence)?;

    info!("Packaged {} files into {}", entries.len(), archive_path.display());
    Ok(archive_name)
}
