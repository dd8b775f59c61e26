use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Local directory where a request stages its audio while it runs.
///
/// Every file written here is owned by a [`StagedFile`] guard and removed
/// when the guard is released or dropped, so an early return on any
/// pipeline stage cannot leak files.
#[derive(Debug, Clone)]
pub struct ScratchSpace {
    root: PathBuf,
}

impl ScratchSpace {
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` to a fresh file named after `label`, on the blocking pool
    pub async fn stage(&self, label: &str, bytes: Vec<u8>) -> io::Result<StagedFile> {
        let root = self.root.clone();
        let prefix = format!("{}_", label);

        tokio::task::spawn_blocking(move || Self::write_file(&root, &prefix, &bytes))
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
    }

    fn write_file(root: &Path, prefix: &str, bytes: &[u8]) -> io::Result<StagedFile> {
        let mut file = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(".mp3")
            .tempfile_in(root)?;
        file.write_all(bytes)?;
        file.flush()?;

        tracing::debug!(
            path = %file.path().display(),
            size_bytes = bytes.len(),
            "Staged scratch file"
        );

        Ok(StagedFile { file })
    }
}

/// A scratch file that exists exactly as long as this guard
#[derive(Debug)]
pub struct StagedFile {
    file: NamedTempFile,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub async fn read(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.file.path()).await
    }

    /// Delete the file now and report failures, rather than silently on drop
    pub fn release(self) -> io::Result<()> {
        let path = self.file.path().to_path_buf();
        self.file.close().map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove scratch file");
            e
        })
    }
}
