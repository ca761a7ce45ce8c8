use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A group of files sharing a root directory and extension allowlist.
///
/// Collections are owned by the calling application; the store only keeps
/// the collection name on each record.
pub trait Collection {
    /// Identifier stored on every record of this collection.
    fn name(&self) -> &str;

    /// Directory that file ids are relative to.
    fn root_path(&self) -> &Path;

    /// Allowed file extensions. A leading dot is optional.
    fn extensions(&self) -> &[String];

    /// True if `path` has an allowed extension.
    ///
    /// The comparison is exact, so on case-sensitive filesystems `.NES`
    /// and `.nes` are different extensions.
    fn matches_extension(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions()
            .iter()
            .any(|allowed| allowed.strip_prefix('.').unwrap_or(allowed) == ext)
    }
}

/// A collection described in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Gamelist file to import from / export to. Defaults to
    /// `<path>/gamelist.xml`.
    #[serde(default)]
    pub gamelist: Option<PathBuf>,
}

impl SystemConfig {
    pub fn new(name: &str, path: impl Into<PathBuf>, extensions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            path: path.into(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            gamelist: None,
        }
    }

    pub fn gamelist_path(&self) -> PathBuf {
        self.gamelist
            .clone()
            .unwrap_or_else(|| self.path.join("gamelist.xml"))
    }
}

impl Collection for SystemConfig {
    fn name(&self) -> &str {
        &self.name
    }

    fn root_path(&self) -> &Path {
        &self.path
    }

    fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_matching_accepts_dotted_and_bare() {
        let system = SystemConfig::new("nes", "/roms/nes", &[".nes", "zip"]);
        assert!(system.matches_extension(Path::new("/roms/nes/a.nes")));
        assert!(system.matches_extension(Path::new("/roms/nes/b.zip")));
        assert!(!system.matches_extension(Path::new("/roms/nes/c.txt")));
        assert!(!system.matches_extension(Path::new("/roms/nes/noext")));
    }

    #[test]
    fn extension_matching_is_case_sensitive() {
        let system = SystemConfig::new("nes", "/roms/nes", &[".nes"]);
        assert!(!system.matches_extension(Path::new("/roms/nes/A.NES")));
    }

    #[test]
    fn default_gamelist_lives_in_root() {
        let system = SystemConfig::new("nes", "/roms/nes", &[".nes"]);
        assert_eq!(
            system.gamelist_path(),
            PathBuf::from("/roms/nes/gamelist.xml")
        );
    }
}
