use crate::error::{Result, SqueezeError};
use std::path::{Component, Path, PathBuf};

/// Rejects empty folder options. `name` is the option as the user knows it.
pub fn require_path(path: &Path, name: &'static str) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(SqueezeError::MissingOption(name));
    }
    Ok(())
}

/// The active path must stay inside both roots: relative, with no `..` segments.
pub fn validate_active_path(path: &Path) -> Result<()> {
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => {
                return Err(SqueezeError::InvalidConfig(format!(
                    "active path {} must not contain '..'",
                    path.display()
                )));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(SqueezeError::InvalidConfig(format!(
                    "active path {} must be relative to the source folder",
                    path.display()
                )));
            }
        }
    }
    Ok(())
}

/// Canonical form of an existing source directory.
pub fn resolve_source_dir(path: &Path) -> Result<PathBuf> {
    let canonical = path
        .canonicalize()
        .map_err(|e| SqueezeError::filesystem(path, e))?;
    if !canonical.is_dir() {
        return Err(SqueezeError::filesystem(
            path,
            std::io::Error::other("source folder is not a directory"),
        ));
    }
    Ok(canonical)
}

/// Absolute form of an output directory that may not exist yet.
///
/// `..` is applied after the existing prefix has been canonicalized, so the
/// result names the directory the OS would actually reach and can be compared
/// against a canonical source path.
pub fn resolve_output_dir(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| SqueezeError::filesystem(path, e))?
            .join(path)
    };

    let mut resolved = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(name) => {
                resolved.push(name);
                // Follow symlinks while the path still exists.
                if let Ok(canonical) = resolved.canonicalize() {
                    resolved = canonical;
                }
            }
        }
    }
    Ok(resolved)
}

/// Resetting `target` recursively deletes it, so it must not be (or contain) `source`.
pub fn ensure_disjoint(source: &Path, target: &Path) -> Result<()> {
    if source.starts_with(target) {
        return Err(SqueezeError::InvalidConfig(format!(
            "target {} would overwrite source {}",
            target.display(),
            source.display()
        )));
    }
    Ok(())
}
