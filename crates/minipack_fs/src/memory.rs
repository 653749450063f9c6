use std::{
  io::{self, Write},
  path::Path,
};

use vfs::{MemoryFS, VfsPath};

use crate::FileSystem;

/// In-memory file system used by tests and embedders that never touch the disk.
#[derive(Debug, Clone)]
pub struct MemoryFileSystem {
  root: VfsPath,
}

impl Default for MemoryFileSystem {
  fn default() -> Self {
    Self { root: VfsPath::new(MemoryFS::new()) }
  }
}

impl MemoryFileSystem {
  pub fn new(files: &[(&str, &str)]) -> Self {
    let fs = Self::default();
    for (path, content) in files {
      fs.add_file(Path::new(path), content);
    }
    fs
  }

  /// Creates `path` and all its parent directories.
  ///
  /// # Panics
  ///
  /// Panics if `path` can't be represented in the in-memory file system.
  pub fn add_file(&self, path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
      self.create_dir_all(parent).expect("Failed to create parent directories");
    }
    self.write(path, content.as_bytes()).expect("Failed to write file");
  }

  fn vfs_path(&self, path: &Path) -> io::Result<VfsPath> {
    let path = path.to_str().ok_or_else(|| {
      io::Error::new(io::ErrorKind::InvalidInput, format!("{} is not valid utf8", path.display()))
    })?;
    let path = path.replace('\\', "/");
    let path = path.trim_start_matches('/').trim_end_matches('/');
    if path.is_empty() {
      return Ok(self.root.clone());
    }
    self.root.join(path).map_err(io::Error::other)
  }
}

impl FileSystem for MemoryFileSystem {
  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    let file = self.vfs_path(path)?;
    if !file.is_file().unwrap_or(false) {
      return Err(io::Error::new(io::ErrorKind::NotFound, "No such file or directory"));
    }
    file.read_to_string().map_err(io::Error::other)
  }

  fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = self.vfs_path(path)?.create_file().map_err(io::Error::other)?;
    file.write_all(content)?;
    file.flush()
  }

  fn create_dir_all(&self, path: &Path) -> io::Result<()> {
    self.vfs_path(path)?.create_dir_all().map_err(io::Error::other)
  }

  fn is_file(&self, path: &Path) -> bool {
    self.vfs_path(path).is_ok_and(|path| path.is_file().unwrap_or(false))
  }

  fn is_dir(&self, path: &Path) -> bool {
    self.vfs_path(path).is_ok_and(|path| path.is_dir().unwrap_or(false))
  }
}

#[test]
fn test_memory_file_system() {
  let fs = MemoryFileSystem::new(&[("/project/src/index.js", "export default 1;")]);

  assert!(fs.is_file(Path::new("/project/src/index.js")));
  assert!(fs.is_dir(Path::new("/project/src")));
  assert!(!fs.is_file(Path::new("/project/src")));
  assert_eq!(fs.read_to_string(Path::new("/project/src/index.js")).unwrap(), "export default 1;");

  let err = fs.read_to_string(Path::new("/project/src/missing.js")).unwrap_err();
  assert_eq!(err.kind(), io::ErrorKind::NotFound);

  fs.create_dir_all(Path::new("/project/dist")).unwrap();
  fs.write(Path::new("/project/dist/bundle.js"), b"(function(){})").unwrap();
  assert_eq!(fs.read_to_string(Path::new("/project/dist/bundle.js")).unwrap(), "(function(){})");
}
