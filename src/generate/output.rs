//! Writing and removing generated files

use super::GenerateError;
use crate::fs::FileSystem;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const DOCKERFILE: &str = "Dockerfile";
pub const COMPOSE_FILE: &str = "docker-compose.yml";
/// Proxy configuration directory, relative to the output directory
pub const PROXY_CONFIG_DIR: &str = "docker/nginx/conf.d";
pub const PROXY_CONFIG_FILE: &str = "default.conf";

/// Removes a written file when dropped unless [`PendingFile::commit`] was called
struct PendingFile<'a> {
    fs: &'a dyn FileSystem,
    path: &'a Path,
    committed: bool,
}

impl<'a> PendingFile<'a> {
    fn new(fs: &'a dyn FileSystem, path: &'a Path) -> Self {
        Self {
            fs,
            path,
            committed: false,
        }
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for PendingFile<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        match self.fs.remove_file(self.path) {
            Ok(true) => debug!("Removed partial output {}", self.path.display()),
            Ok(false) => {}
            Err(e) => warn!(
                "Failed to remove partial output {}: {:#}",
                self.path.display(),
                e
            ),
        }
    }
}

fn write_error(path: &Path, source: anyhow::Error) -> GenerateError {
    GenerateError::OutputWrite {
        path: path.to_path_buf(),
        source,
    }
}

pub fn ensure_dir(fs: &dyn FileSystem, dir: &Path) -> Result<(), GenerateError> {
    if fs.is_dir(dir) {
        return Ok(());
    }
    fs.create_dir_all(dir).map_err(|e| write_error(dir, e))
}

/// Writes `contents` to `path` and checks the file is non-empty; on any failure the file
/// is removed.
pub fn write_verified(
    fs: &dyn FileSystem,
    path: &Path,
    contents: &str,
) -> Result<(), GenerateError> {
    let pending = PendingFile::new(fs, path);

    fs.write(path, contents).map_err(|e| write_error(path, e))?;

    let size = fs.metadata(path).map_err(|e| write_error(path, e))?.len();
    if size == 0 {
        return Err(GenerateError::EmptyRenderOutput {
            path: path.to_path_buf(),
        });
    }

    pending.commit();
    debug!("Wrote {} ({} bytes)", path.display(), size);
    Ok(())
}

#[derive(Debug, Default, Serialize)]
pub struct CleanReport {
    pub removed: Vec<PathBuf>,
}

impl CleanReport {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }
}

/// Removes every file the generators can produce, then prunes the proxy directories when
/// they are left empty. Files that do not exist are skipped.
pub fn clean(fs: &dyn FileSystem, output_dir: &Path) -> Result<CleanReport, GenerateError> {
    let proxy_dir = output_dir.join(PROXY_CONFIG_DIR);
    let files = [
        output_dir.join(DOCKERFILE),
        output_dir.join(COMPOSE_FILE),
        proxy_dir.join(PROXY_CONFIG_FILE),
    ];

    let mut report = CleanReport::default();
    for file in files {
        if fs.remove_file(&file).map_err(|e| write_error(&file, e))? {
            info!("Removed {}", file.display());
            report.removed.push(file);
        }
    }

    // docker/nginx/conf.d, then docker/nginx, then docker
    let mut dir = proxy_dir;
    while dir != output_dir && dir.starts_with(output_dir) {
        if !fs.remove_dir_if_empty(&dir).map_err(|e| write_error(&dir, e))? {
            break;
        }
        debug!("Removed empty directory {}", dir.display());
        report.removed.push(dir.clone());
        if !dir.pop() {
            break;
        }
    }

    Ok(report)
}
