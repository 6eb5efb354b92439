//! Filesystem access for manifest generation
//!
//! The generator only ever asks four questions of the filesystem: does a path
//! exist, is it a directory, what does a file contain, and which directories
//! match a non-recursive glob. [`FileSystem`] captures exactly those, plus a
//! whole-file write for the CLI. [`DiskFS`] talks to the real disk and
//! [`MemoryFS`] keeps everything in memory for tests and dry runs.

use crate::error::{Error, Result};
use glob::{MatchOptions, Pattern};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Glob options shared by both implementations: `*` never crosses a path
/// separator, so `dir/*` only yields immediate children, and never matches
/// hidden entries.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// The filesystem operations manifest generation depends on.
pub trait FileSystem {
    /// Whether a file or directory exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Read a whole file as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns `Error::Filesystem` when the file is missing or unreadable.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Directories under `base` matching `pattern`, sorted.
    ///
    /// `base` is matched literally; only `pattern` is interpreted as a glob.
    fn glob_dirs(&self, base: &Path, pattern: &str) -> Result<Vec<PathBuf>>;

    /// Write a whole file, creating parent directories as needed.
    fn write(&mut self, path: &Path, content: &str) -> Result<()>;
}

fn glob_expression(base: &Path, pattern: &str) -> String {
    let base = base.to_string_lossy();
    let base = base.trim_end_matches('/');
    format!("{}/{}", Pattern::escape(base), pattern)
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFS;

impl DiskFS {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for DiskFS {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| Error::filesystem(path, e))
    }

    fn glob_dirs(&self, base: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
        let expression = glob_expression(base, pattern);
        let mut dirs = Vec::new();

        for entry in glob::glob_with(&expression, MATCH_OPTIONS)? {
            let path = entry.map_err(|e| Error::filesystem(e.path(), e.error()))?;
            if path.is_dir() {
                dirs.push(path);
            }
        }

        dirs.sort();
        Ok(dirs)
    }

    fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| Error::filesystem(parent, e))?;
            }
        }
        fs::write(path, content).map_err(|e| Error::filesystem(path, e))
    }
}

/// In-memory filesystem
///
/// Directories are implicit: every ancestor of a stored file exists. Empty
/// directories can be added explicitly with [`MemoryFS::add_dir`].
#[derive(Debug, Clone, Default)]
pub struct MemoryFS {
    /// Files stored as path -> raw content
    files: HashMap<PathBuf, Vec<u8>>,
    /// Explicitly created directories
    dirs: BTreeSet<PathBuf>,
}

impl MemoryFS {
    /// Create a new empty filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file with raw content
    pub fn add_file_content<P: AsRef<Path>>(&mut self, path: P, content: Vec<u8>) {
        self.files.insert(path.as_ref().to_path_buf(), content);
    }

    /// Add or replace a file with string content
    pub fn add_file_string<P: AsRef<Path>>(&mut self, path: P, content: &str) {
        self.add_file_content(path, content.as_bytes().to_vec());
    }

    /// Add an (empty) directory
    pub fn add_dir<P: AsRef<Path>>(&mut self, path: P) {
        self.dirs.insert(path.as_ref().to_path_buf());
    }

    fn directories(&self) -> BTreeSet<&Path> {
        let mut dirs: BTreeSet<&Path> = self.dirs.iter().map(PathBuf::as_path).collect();
        for path in self.files.keys().chain(self.dirs.iter()) {
            for ancestor in path.ancestors().skip(1) {
                if ancestor.as_os_str().is_empty() {
                    break;
                }
                dirs.insert(ancestor);
            }
        }
        dirs
    }
}

impl FileSystem for MemoryFS {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.directories().contains(path)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let content = self
            .files
            .get(path)
            .ok_or_else(|| Error::filesystem(path, "File not found"))?;
        String::from_utf8(content.clone()).map_err(|e| Error::filesystem(path, e))
    }

    fn glob_dirs(&self, base: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
        let pattern = Pattern::new(&glob_expression(base, pattern))?;
        // BTreeSet iteration is already sorted
        Ok(self
            .directories()
            .into_iter()
            .filter(|dir| pattern.matches_path_with(dir, MATCH_OPTIONS))
            .map(Path::to_path_buf)
            .collect())
    }

    fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        self.add_file_string(path, content);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_memory_fs() -> MemoryFS {
        let mut fs = MemoryFS::new();
        fs.add_file_string("/app/ce/app/code/Magento/Catalog/composer.json", "{}");
        fs.add_file_string("/app/ce/app/code/Magento/Store/composer.json", "{}");
        fs.add_file_string("/app/ce/app/code/Magento/Store/etc/module.xml", "");
        fs.add_dir("/app/ce/app/code/Magento/Empty");
        fs
    }

    #[test]
    fn test_memory_fs_implicit_directories() {
        let fs = sample_memory_fs();
        assert!(fs.is_dir(Path::new("/app/ce/app/code/Magento")));
        assert!(fs.is_dir(Path::new("/app")));
        assert!(!fs.is_dir(Path::new("/app/ce/app/code/Magento/Catalog/composer.json")));
        assert!(fs.exists(Path::new("/app/ce/app/code/Magento/Catalog/composer.json")));
        assert!(!fs.exists(Path::new("/app/ee")));
    }

    #[test]
    fn test_memory_fs_glob_is_not_recursive() {
        let fs = sample_memory_fs();
        let dirs = fs
            .glob_dirs(Path::new("/app/ce"), "app/code/Magento/*")
            .unwrap();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/app/ce/app/code/Magento/Catalog"),
                PathBuf::from("/app/ce/app/code/Magento/Empty"),
                PathBuf::from("/app/ce/app/code/Magento/Store"),
            ]
        );
    }

    #[test]
    fn test_memory_fs_glob_skips_files() {
        let mut fs = MemoryFS::new();
        fs.add_file_string("/app/flat/README.md", "");
        fs.add_file_string("/app/flat/ModuleA/composer.json", "{}");
        let dirs = fs.glob_dirs(Path::new("/app/flat"), "*").unwrap();
        assert_eq!(dirs, vec![PathBuf::from("/app/flat/ModuleA")]);
    }

    #[test]
    fn test_memory_fs_glob_skips_hidden_dirs() {
        let mut fs = MemoryFS::new();
        fs.add_file_string("/app/flat/.git/HEAD", "");
        fs.add_file_string("/app/flat/.github/workflows/ci.yml", "");
        fs.add_file_string("/app/flat/ModuleA/composer.json", "{}");
        let dirs = fs.glob_dirs(Path::new("/app/flat"), "*").unwrap();
        assert_eq!(dirs, vec![PathBuf::from("/app/flat/ModuleA")]);
    }

    #[test]
    fn test_memory_fs_base_is_matched_literally() {
        let mut fs = MemoryFS::new();
        fs.add_file_string("/app/repo[1]/Module/composer.json", "{}");
        fs.add_file_string("/app/.hidden/Module/composer.json", "{}");
        let dirs = fs.glob_dirs(Path::new("/app/repo[1]"), "*").unwrap();
        assert_eq!(dirs, vec![PathBuf::from("/app/repo[1]/Module")]);
        let dirs = fs.glob_dirs(Path::new("/app/.hidden"), "*").unwrap();
        assert_eq!(dirs, vec![PathBuf::from("/app/.hidden/Module")]);
    }

    #[test]
    fn test_memory_fs_read_errors() {
        let mut fs = MemoryFS::new();
        fs.add_file_content("/app/binary.json", vec![0xff, 0xfe]);
        assert!(matches!(
            fs.read_to_string(Path::new("/app/binary.json")),
            Err(Error::Filesystem { .. })
        ));
        assert!(matches!(
            fs.read_to_string(Path::new("/app/missing.json")),
            Err(Error::Filesystem { .. })
        ));
    }

    #[test]
    fn test_memory_fs_write() {
        let mut fs = MemoryFS::new();
        fs.write(Path::new("/app/composer.json"), "{}").unwrap();
        assert_eq!(fs.read_to_string(Path::new("/app/composer.json")).unwrap(), "{}");
        assert!(fs.is_dir(Path::new("/app")));
    }

    #[test]
    fn test_disk_fs_glob_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::create_dir_all(root.join("repo/ModuleA")).unwrap();
        std::fs::create_dir_all(root.join("repo/ModuleB/nested")).unwrap();
        std::fs::create_dir_all(root.join("repo/.git")).unwrap();
        std::fs::write(root.join("repo/file.txt"), "text").unwrap();

        let fs = DiskFS::new();
        let dirs = fs.glob_dirs(&root.join("repo"), "*").unwrap();
        assert_eq!(dirs, vec![root.join("repo/ModuleA"), root.join("repo/ModuleB")]);
        assert_eq!(fs.read_to_string(&root.join("repo/file.txt")).unwrap(), "text");
        assert!(fs.is_dir(&root.join("repo")));
        assert!(!fs.exists(&root.join("missing")));
    }

    #[test]
    fn test_disk_fs_write_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("nested/dir/composer.json");

        let mut fs = DiskFS::new();
        fs.write(&target, "{}").unwrap();
        assert_eq!(std::fs::read_to_string(target).unwrap(), "{}");
    }
}
