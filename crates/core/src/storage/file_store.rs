use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Flat file store rooted at a single base directory.
///
/// Every dataset operation resolves filenames through this store. Names that
/// would leave the base directory never resolve.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Open a store, creating the base directory if it does not exist
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path).with_context(|| {
            format!("Failed to create data directory {}", base_path.display())
        })?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Join a filename onto the base directory without any checks
    pub fn resolve(&self, filename: &str) -> PathBuf {
        self.base_path.join(filename)
    }

    /// Resolve a filename that names exactly one entry directly inside the base directory
    pub fn locate(&self, filename: &str) -> Option<PathBuf> {
        let mut components = Path::new(filename).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Some(self.resolve(filename)),
            _ => None,
        }
    }

    /// Whether `filename` is a regular file inside the base directory
    pub fn exists(&self, filename: &str) -> bool {
        match self.locate(filename) {
            Some(path) => path.is_file() && self.is_confined(&path),
            None => false,
        }
    }

    /// Names of regular files in the base directory, sorted by name
    pub fn list_files(&self) -> Result<Vec<String>> {
        let walker = WalkDir::new(&self.base_path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        let mut names = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(e).context("Failed to read data directory");
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if entry.file_type().is_file() && self.is_confined(entry.path()) {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        Ok(names)
    }

    /// Symlinks must not point outside the base directory
    fn is_confined(&self, path: &Path) -> bool {
        match (path.canonicalize(), self.base_path.canonicalize()) {
            (Ok(canonical), Ok(base)) => canonical.starts_with(base),
            _ => false,
        }
    }
}
