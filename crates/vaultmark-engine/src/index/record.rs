use relative_path::{RelativePath, RelativePathBuf};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityType {
    Document,
    Image,
    Task,
}

/// An entity known to the storage layer, as seen by the converter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filepath: Option<RelativePathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_uri: Option<String>,
}

impl EntityRecord {
    pub fn new(id: impl Into<String>, entity_type: EntityType) -> Self {
        Self {
            id: id.into(),
            entity_type,
            filepath: None,
            title: None,
            remote_uri: None,
        }
    }

    /// A document stored at `path`, titled after its file stem.
    pub fn document(id: impl Into<String>, path: impl AsRef<RelativePath>) -> Self {
        let path = path.as_ref();
        let title = path.file_stem().map(str::to_string);
        Self {
            title,
            ..Self::new(id, EntityType::Document).with_path(path)
        }
    }

    pub fn image(id: impl Into<String>, path: impl AsRef<RelativePath>) -> Self {
        Self::new(id, EntityType::Image).with_path(path)
    }

    pub fn task(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(id, EntityType::Task).with_title(title)
    }

    pub fn with_path(mut self, path: impl AsRef<RelativePath>) -> Self {
        self.filepath = Some(path.as_ref().normalize());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_remote_uri(mut self, uri: impl Into<String>) -> Self {
        self.remote_uri = Some(uri.into());
        self
    }

    /// Directory segments of the stored path, root first.
    pub fn dir_segments(&self) -> Vec<&str> {
        self.filepath
            .as_deref()
            .and_then(RelativePath::parent)
            .map(segments)
            .unwrap_or_default()
    }

    /// Path if present, else id; used as the stable tie-break key.
    pub fn sort_key(&self) -> &str {
        self.filepath
            .as_deref()
            .map(RelativePath::as_str)
            .unwrap_or(&self.id)
    }
}

/// File extensions treated as images, lowercase.
pub const IMAGE_EXTENSIONS: [&str; 9] = ["png", "jpg", "jpeg", "gif", "webp", "svg", "bmp", "avif", "heic"];

/// Whether `path` names an image file, judged by extension only.
pub fn is_image_path(path: &str) -> bool {
    RelativePath::new(path)
        .extension()
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Normal components of `path`, dropping `.` and `..`.
pub fn segments(path: &RelativePath) -> Vec<&str> {
    path.components()
        .filter_map(|c| match c {
            relative_path::Component::Normal(s) => Some(s),
            _ => None,
        })
        .collect()
}
