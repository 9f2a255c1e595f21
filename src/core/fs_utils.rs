//! File system utility helpers (BOM-aware readers, unique artifact names)
use std::fs;
use std::path::Path;

/// Read a text file as UTF-8, stripping UTF-8 BOM if present.
pub fn read_text_file(path: &Path) -> std::io::Result<String> {
    let mut content = fs::read_to_string(path)?;
    if content.starts_with('\u{FEFF}') {
        content = content.trim_start_matches('\u{FEFF}').to_string();
    }
    Ok(content)
}

/// Fresh random identifier used for individuals and artifact names.
pub fn generate_uid() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// `<prefix>_<uid>.<extension>`, e.g. `ocean_3f2a...c1.owl`
pub fn unique_file_name(prefix: &str, extension: &str) -> String {
    format!("{}_{}.{}", prefix, generate_uid(), extension)
}
