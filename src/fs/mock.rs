use super::{FileMetadata, FileSystem, FileType};
use anyhow::{anyhow, bail, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone)]
pub struct MockEntry {
    pub content: Option<String>,
    pub file_type: FileType,
}

/// In-memory file system. Relative paths resolve against the mock root (`/mock`).
pub struct MockFileSystem {
    files: RwLock<HashMap<PathBuf, MockEntry>>,
    root: PathBuf,
    read_only: bool,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::with_root(PathBuf::from("/mock"))
    }

    pub fn with_root(root: PathBuf) -> Self {
        let fs = Self {
            files: RwLock::new(HashMap::new()),
            root: root.clone(),
            read_only: false,
        };
        fs.add_dir(&root);
        fs
    }

    /// A file system whose mutating operations all fail, for exercising write errors
    pub fn read_only(self) -> Self {
        Self {
            read_only: true,
            ..self
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        let path = self.normalize_path(path.as_ref());
        let mut files = self.write_lock();

        if let Some(parent) = path.parent() {
            Self::ensure_parents(&mut files, parent);
        }

        files.insert(
            path,
            MockEntry {
                content: Some(content.to_string()),
                file_type: FileType::File,
            },
        );
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        let mut files = self.write_lock();
        Self::ensure_parents(&mut files, &path);
    }

    fn normalize_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn read_lock(&self) -> RwLockReadGuard<'_, HashMap<PathBuf, MockEntry>> {
        self.files.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, HashMap<PathBuf, MockEntry>> {
        self.files.write().unwrap_or_else(|e| e.into_inner())
    }

    fn ensure_parents(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            files.entry(current.clone()).or_insert(MockEntry {
                content: None,
                file_type: FileType::Directory,
            });
        }
    }

    fn check_writable(&self, path: &Path) -> Result<()> {
        if self.read_only {
            bail!("Read-only file system: {:?}", path);
        }
        Ok(())
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        let path = self.normalize_path(path);
        self.read_lock().contains_key(&path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let path = self.normalize_path(path);
        self.read_lock()
            .get(&path)
            .is_some_and(|e| e.file_type == FileType::Directory)
    }

    fn is_file(&self, path: &Path) -> bool {
        let path = self.normalize_path(path);
        self.read_lock()
            .get(&path)
            .is_some_and(|e| e.file_type == FileType::File)
    }

    fn metadata(&self, path: &Path) -> Result<FileMetadata> {
        let path = self.normalize_path(path);
        let files = self.read_lock();
        let entry = files
            .get(&path)
            .ok_or_else(|| anyhow!("Path not found: {:?}", path))?;

        Ok(FileMetadata {
            size: entry.content.as_ref().map(|c| c.len() as u64).unwrap_or(0),
            file_type: entry.file_type,
        })
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let path = self.normalize_path(path);
        let files = self.read_lock();
        let entry = files
            .get(&path)
            .ok_or_else(|| anyhow!("File not found: {:?}", path))?;

        entry
            .content
            .clone()
            .ok_or_else(|| anyhow!("Not a file: {:?}", path))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.check_writable(path)?;
        self.add_dir(path);
        Ok(())
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        self.check_writable(path)?;
        let normalized = self.normalize_path(path);
        let parent_exists = normalized
            .parent()
            .map(|p| self.is_dir(p))
            .unwrap_or(false);
        if !parent_exists {
            bail!("Parent directory does not exist: {:?}", path);
        }
        self.add_file(normalized, contents);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<bool> {
        self.check_writable(path)?;
        let path = self.normalize_path(path);
        let mut files = self.write_lock();
        match files.get(&path) {
            Some(entry) if entry.file_type == FileType::File => {
                files.remove(&path);
                Ok(true)
            }
            Some(_) => Err(anyhow!("Not a file: {:?}", path)),
            None => Ok(false),
        }
    }

    fn remove_dir_if_empty(&self, path: &Path) -> Result<bool> {
        self.check_writable(path)?;
        let path = self.normalize_path(path);
        let mut files = self.write_lock();
        let is_dir = files
            .get(&path)
            .is_some_and(|e| e.file_type == FileType::Directory);
        let has_children = files.keys().any(|p| p.parent() == Some(path.as_path()));
        if !is_dir || has_children {
            return Ok(false);
        }
        files.remove(&path);
        Ok(true)
    }
}
