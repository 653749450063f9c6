use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use sugar_path::SugarPath;

use minipack_common::ModuleId;
use minipack_error::{BuildDiagnostic, BuildResult};
use minipack_fs::FileSystem;

pub struct Resolver {
  cwd: PathBuf,
  extensions: Vec<String>,
  fs: Arc<dyn FileSystem>,
}

impl std::fmt::Debug for Resolver {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Resolver")
      .field("cwd", &self.cwd)
      .field("extensions", &self.extensions)
      .finish_non_exhaustive()
  }
}

impl Resolver {
  pub fn new(cwd: PathBuf, extensions: Vec<String>, fs: Arc<dyn FileSystem>) -> Self {
    Self { cwd, extensions, fs }
  }

  /// Resolves the user supplied entry relative to the project root.
  ///
  /// `{ input: 'main' }` is treated like `./main` since an entry can never be a package.
  pub fn resolve_entry(&self, input: &str) -> ModuleId {
    let path = self.probe(&self.cwd, input);
    ModuleId::canonicalize(&self.cwd, &path)
  }

  /// Resolves `specifier`, written inside `importer`, relative to the directory of `importer`.
  pub fn resolve(&self, importer: &ModuleId, specifier: &str) -> BuildResult<ModuleId> {
    let base = if specifier.starts_with('/') {
      // Root-absolute specifiers point into the project root, as they do for a dev server.
      self.cwd.clone()
    } else if is_relative_specifier(specifier) {
      importer.dir(&self.cwd)
    } else {
      return Err(BuildDiagnostic::unresolved_dependency(importer.as_str(), specifier, None).into());
    };

    let path = self.probe(&base, specifier.trim_start_matches('/'));
    let resolved = ModuleId::canonicalize(&self.cwd, &path);
    tracing::trace!(importer = %importer, specifier, resolved = %resolved, "resolved import");
    Ok(resolved)
  }

  /// Returns the first existing candidate. When nothing exists the plain joined path is
  /// returned so reading it reports the missing file.
  fn probe(&self, base: &Path, specifier: &str) -> PathBuf {
    let joined = base.join(specifier).normalize();
    if self.fs.is_file(&joined) {
      return joined;
    }

    for ext in &self.extensions {
      let mut with_ext = joined.clone().into_os_string();
      with_ext.push(ext);
      let with_ext = PathBuf::from(with_ext);
      if self.fs.is_file(&with_ext) {
        return with_ext;
      }
    }

    if self.fs.is_dir(&joined) {
      for ext in &self.extensions {
        let index = joined.join(format!("index{ext}"));
        if self.fs.is_file(&index) {
          return index;
        }
      }
    }

    joined
  }
}

fn is_relative_specifier(specifier: &str) -> bool {
  specifier == "." || specifier == ".." || specifier.starts_with("./") || specifier.starts_with("../")
}
