use anyhow::{Context, Result};
use glob::glob;
use std::fs;
use std::path::{Path, PathBuf};

use crate::comment_helper::CodeLanguage;

/// Finds the documents a run works on and writes results back.
pub struct FileHandler {
    backup_enabled: bool,
}

impl FileHandler {
    pub fn new(backup_enabled: bool) -> Self {
        Self { backup_enabled }
    }

    /// Expands files, directories and glob patterns into the supported source
    /// files they name. Directories are walked recursively.
    pub fn find_source_files(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for path in paths {
            if path.is_file() {
                if self.is_supported_file(path) {
                    files.push(path.clone());
                }
            } else if path.is_dir() {
                self.collect_dir(path, &mut files)?;
            } else {
                let pattern = path.to_str().context("Invalid path")?;
                for entry in glob(pattern).context("Failed to read glob pattern")? {
                    let file = entry.context("Failed to process glob entry")?;
                    if self.is_supported_file(&file) {
                        files.push(file);
                    }
                }
            }
        }

        files.sort();
        files.dedup();
        Ok(files)
    }

    fn collect_dir(&self, dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
        let entries = fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))?;
        for entry in entries {
            let path = entry.context("Failed to read directory entry")?.path();

            if path.is_dir() {
                let skipped = path
                    .file_name()
                    .map(|name| name.to_string_lossy())
                    .is_some_and(|name| name == "node_modules" || name.starts_with('.'));
                if !skipped {
                    self.collect_dir(&path, files)?;
                }
            } else if self.is_supported_file(&path) {
                files.push(path);
            }
        }
        Ok(())
    }

    fn is_supported_file(&self, path: &Path) -> bool {
        matches!(
            CodeLanguage::from_path(path),
            CodeLanguage::TypeScript | CodeLanguage::JavaScript
        )
    }

    pub fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        if self.backup_enabled {
            self.create_backup(path)?;
        }

        fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
    }

    /// `file.ts` is backed up as `file.ts.bak`.
    fn create_backup(&self, path: &Path) -> Result<()> {
        let mut backup_path = path.as_os_str().to_owned();
        backup_path.push(".bak");
        let backup_path = PathBuf::from(backup_path);

        fs::copy(path, &backup_path)
            .with_context(|| format!("Failed to create backup: {}", backup_path.display()))?;

        Ok(())
    }
}
