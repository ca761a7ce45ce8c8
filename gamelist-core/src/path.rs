//! Conversion between filesystem paths and collection-relative file ids.
//!
//! A file id is the path of a file relative to its collection root, written
//! with forward slashes (`sub/b.nes`). Files outside the root keep their
//! absolute path. [`file_id`] and [`resolve`] are inverses for any path that
//! lies under the root.

use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding component. Does not touch the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is still `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Render a path with `/` separators.
pub fn generic_string(path: &Path) -> String {
    let s = path.to_string_lossy();
    if cfg!(windows) {
        s.replace('\\', "/")
    } else {
        s.into_owned()
    }
}

/// File id for `path` within the collection rooted at `root`.
///
/// Relative input paths are taken as relative to `root`. The root itself
/// maps to `"."`.
pub fn file_id(path: &Path, root: &Path) -> String {
    let root = normalize(root);
    let path = if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&root.join(path))
    };

    match path.strip_prefix(&root) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => generic_string(&path),
    }
}

/// Absolute path for a file id (or any stored path string) in the
/// collection rooted at `root`.
///
/// Absolute ids are returned as-is, `~/` expands to the home directory and
/// a leading `./` is accepted for ids written by older tools.
pub fn resolve(file_id: &str, root: &Path) -> PathBuf {
    if let Some(rest) = file_id.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return normalize(&home.join(rest));
        }
    }

    let path = Path::new(file_id);
    if path.is_absolute() {
        return normalize(path);
    }

    let rel = file_id.strip_prefix("./").unwrap_or(file_id);
    normalize(&root.join(rel))
}

/// Express `path` relative to `root`, walking up with `..` when it lies
/// outside. Falls back to the absolute form when no relative path exists
/// (e.g. a different drive on Windows).
pub fn relative_to_root(path: &Path, root: &Path) -> String {
    let path = normalize(path);
    match pathdiff::diff_paths(&path, normalize(root)) {
        Some(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Some(rel) => generic_string(&rel),
        None => generic_string(&path),
    }
}

/// Re-anchor a stored path reference (such as an image field) so it is
/// relative to `root`. Empty values stay empty.
pub fn rebase_reference(value: &str, root: &Path) -> String {
    if value.trim().is_empty() {
        return String::new();
    }
    relative_to_root(&resolve(value, root), root)
}

#[cfg(test)]
#[path = "tests/path_tests.rs"]
mod tests;
