use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    asset::{File, FileFetcher},
    Error, Result,
};

/// Fetches files from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    /// Create a fetcher rooted at root
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileFetcher for DirFetcher {
    fn fetch_by_name(&self, name: &str) -> io::Result<File> {
        let data = fs::read(self.root.join(name))?;
        Ok(File::new(name, data))
    }

    fn fetch_dir(&self, dir: &str) -> io::Result<Vec<File>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.root.join(dir))? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(format!("{dir}/{name}"));
            }
        }
        names.sort();
        names
            .iter()
            .map(|name| self.fetch_by_name(name))
            .collect()
    }
}

/// Write files below root, creating any missing parent directories.
pub fn write_files(root: &Path, files: &[File]) -> Result<()> {
    for file in files {
        let path = root.join(&file.filename);
        let io_err = |source| Error::Io {
            filename: file.filename.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(&path, &file.data).map_err(io_err)?;
        debug!(path = %path.display(), bytes = file.data.len(), "wrote file");
    }
    Ok(())
}
