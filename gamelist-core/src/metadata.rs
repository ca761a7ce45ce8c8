use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::FieldCatalog;

/// Which catalog a record follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Game,
    Folder,
}

impl FileKind {
    /// Both kinds, in import order.
    pub const ALL: [FileKind; 2] = [FileKind::Game, FileKind::Folder];

    /// Element name used in gamelist files.
    pub fn tag(&self) -> &'static str {
        match self {
            FileKind::Game => "game",
            FileKind::Folder => "folder",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "game" => Some(FileKind::Game),
            "folder" => Some(FileKind::Folder),
            _ => None,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Metadata values for one file, keyed by catalog field key.
///
/// All values are text. A key that is absent has no stored value (NULL in
/// the database), which is different from an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataMap {
    kind: FileKind,
    values: BTreeMap<String, String>,
}

impl MetadataMap {
    /// An empty map of the given kind.
    pub fn new(kind: FileKind) -> Self {
        Self {
            kind,
            values: BTreeMap::new(),
        }
    }

    /// A map with every field of `kind` set to its catalog default.
    pub fn with_defaults(kind: FileKind, catalog: &FieldCatalog) -> Self {
        let values = catalog
            .fields(kind)
            .iter()
            .map(|d| (d.key.clone(), d.default_value().to_string()))
            .collect();
        Self { kind, values }
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    /// The `name` field, or `""` when unset.
    pub fn name(&self) -> &str {
        self.get("name").unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One stored file: identity, existence flag and metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Path relative to the collection root (see [`crate::path::file_id`]).
    pub file_id: String,
    pub collection_id: String,
    /// Whether the file was on disk as of the last refresh.
    pub exists: bool,
    pub metadata: MetadataMap,
}

impl Record {
    pub fn kind(&self) -> FileKind {
        self.metadata.kind()
    }
}
