use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use vaultmark_engine::index::is_image_path;
use vaultmark_engine::{EntityRecord, Platform, ReferenceIndex};

#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid vault directory: {0}")]
    InvalidVaultDir(String),
    #[error("Path is outside the vault: {0}")]
    OutsideVault(PathBuf),
}

/// A vault on disk and the reference index built from its files.
#[derive(Debug)]
pub struct Vault {
    pub id: String,
    pub root: PathBuf,
    pub documents: Vec<RelativePathBuf>,
    pub index: ReferenceIndex,
}

impl Vault {
    /// Scans `root` for notes and images and indexes them.
    pub fn open(root: &Path) -> Result<Self, VaultError> {
        validate_vault_dir(root)?;

        let id = root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "vault".to_string());
        let platform = Platform::native(root.to_string_lossy());

        let mut files = Vec::new();
        scan_directory_recursive(root, &mut files)?;
        files.sort();

        let mut index = ReferenceIndex::new();
        let mut documents = Vec::new();
        for file in files {
            let relative = platform
                .vault_relative(&file.to_string_lossy())
                .ok_or_else(|| VaultError::OutsideVault(file.clone()))?;
            let entity_id = entity_id(&id, &relative);
            if is_image_path(relative.as_str()) {
                index.insert(&id, EntityRecord::image(entity_id, &relative));
            } else {
                index.insert(&id, EntityRecord::document(entity_id, &relative));
                documents.push(relative);
            }
        }
        log::debug!(
            "indexed vault `{id}`: {} documents, {} records",
            documents.len(),
            index.vault(&id).map_or(0, |v| v.len())
        );

        Ok(Self {
            id,
            root: root.to_path_buf(),
            documents,
            index,
        })
    }

    pub fn read(&self, relative_path: &RelativePath) -> Result<String, VaultError> {
        let absolute_path = relative_path.to_path(&self.root);
        if !absolute_path.exists() {
            return Err(VaultError::NotFound(absolute_path));
        }
        Ok(fs::read_to_string(&absolute_path)?)
    }

    /// Vault-relative form of a path given on the command line.
    pub fn relative(&self, path: &Path) -> Result<RelativePathBuf, VaultError> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        Platform::native(self.root.to_string_lossy())
            .vault_relative(&absolute.to_string_lossy())
            .ok_or_else(|| VaultError::OutsideVault(path.to_path_buf()))
    }
}

/// Stable entity id for a vault file, so repeated scans agree.
pub fn entity_id(vault_id: &str, path: &RelativePath) -> String {
    let name = format!("vaultmark-entity://{vault_id}/{path}");
    Uuid::new_v5(&Uuid::NAMESPACE_URL, name.as_bytes()).to_string()
}

pub fn validate_vault_dir(path: &Path) -> Result<(), VaultError> {
    if !path.is_dir() {
        return Err(VaultError::InvalidVaultDir(format!(
            "{} is not a directory",
            path.display()
        )));
    }
    Ok(())
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), VaultError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        // .git, .obsidian and friends
        if path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with('.'))
        {
            continue;
        }

        // Symlinks are not followed, so a link back up the tree cannot loop.
        let file_type = entry.file_type()?;
        if file_type.is_symlink() {
            log::debug!("skipping symlink {}", path.display());
            continue;
        }

        if file_type.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension()
            && (ext == "md" || is_image_path(&path.to_string_lossy()))
        {
            files.push(path);
        }
    }
    Ok(())
}
