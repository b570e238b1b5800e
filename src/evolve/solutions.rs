//! Persistence of candidate sources as artifact files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Writes each candidate's source to a uniquely named file.
#[derive(Debug, Clone)]
pub struct SolutionStore {
    output_dir: PathBuf,
}

impl SolutionStore {
    /// Create a store rooted at `output_dir`.
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Persist one candidate source, returning the artifact path.
    pub fn save(&self, source: &str) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(format!("{}.py", Uuid::new_v4()));
        fs::write(&path, source)?;
        Ok(path)
    }
}
