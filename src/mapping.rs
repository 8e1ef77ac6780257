use crate::error::{Result, SqueezeError};
use crate::scanner::normalize_path;
use std::path::{Path, PathBuf};

/// Returns the directory a converted `source` belongs in: `source`'s parent with the
/// `src_root` prefix swapped for `target_root`.
pub fn output_dir(source: &Path, src_root: &Path, target_root: &Path) -> Result<PathBuf> {
    let source = normalize_path(source);
    let src_root = normalize_path(src_root);

    let relative = source
        .strip_prefix(&src_root)
        .map_err(|_| SqueezeError::OutsideRoot {
            path: source.clone(),
            root: src_root.clone(),
        })?;
    let relative_dir = relative.parent().unwrap_or_else(|| Path::new(""));

    Ok(normalize_path(&target_root.join(relative_dir)))
}

/// File name of the converted output: the source stem plus `extension`.
pub fn output_file_name(source: &Path, extension: &str) -> Result<String> {
    let stem = source
        .file_stem()
        .ok_or_else(|| SqueezeError::InvalidFileName(source.to_path_buf()))?;

    Ok(format!("{}.{}", stem.to_string_lossy(), extension))
}
