use std::path::{Component, Path, PathBuf};

use crate::foundation::error::{CutError, CutResult};

/// Normalize an absolute media path without touching the filesystem.
///
/// `.` segments are dropped and `..` pops the previous segment (never above the root). Relative
/// paths are rejected.
pub fn normalize_abs_path(path: &Path) -> CutResult<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(CutError::invalid_input("media path must be non-empty"));
    }
    if !path.is_absolute() {
        return Err(CutError::invalid_input(format!(
            "media path must be absolute: '{}'",
            path.display()
        )));
    }

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(p) => out.push(p.as_os_str()),
            Component::RootDir => out.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    Ok(out)
}

/// File name including extension (`clip.mov`).
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// File name without its extension (`clip`).
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `file://` URL for an absolute path, with spaces encoded.
///
/// With `windows_paths`, WSL mounts (`/mnt/d/...`) become drive paths
/// (`file://localhost/D:/...`) so Windows editors can relink the media.
pub fn file_url(abs_path: &Path, windows_paths: bool) -> String {
    let s = abs_path.to_string_lossy();
    if windows_paths && let Some(drive_path) = wsl_to_drive_path(&s) {
        return format!("file://localhost/{}", drive_path.replace(' ', "%20"));
    }
    format!("file://{}", s.replace(' ', "%20"))
}

fn wsl_to_drive_path(path: &str) -> Option<String> {
    let rest = path.strip_prefix("/mnt/")?;
    let mut chars = rest.chars();
    let drive = chars.next().filter(char::is_ascii_alphabetic)?;
    let tail = chars.as_str();
    if !tail.is_empty() && !tail.starts_with('/') {
        return None;
    }
    Some(format!("{}:{tail}", drive.to_ascii_uppercase()))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/paths.rs"]
mod tests;
