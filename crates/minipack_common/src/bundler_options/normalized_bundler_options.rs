use std::path::{Path, PathBuf};

use sugar_path::SugarPath;

use crate::{CodeEmbedding, ESTarget};

#[derive(Debug)]
pub struct NormalizedBundlerOptions {
  // --- Input
  pub input: String,
  pub cwd: PathBuf,
  pub extensions: Vec<String>,

  // --- Transform
  pub target: ESTarget,

  // --- Output
  pub file: String,
  pub module_cache: bool,
  pub code_embedding: CodeEmbedding,
  pub minify: bool,
}

impl NormalizedBundlerOptions {
  /// Absolute path of the emitted bundle.
  pub fn output_path(&self) -> PathBuf {
    let file = Path::new(&self.file);
    if file.is_absolute() {
      file.normalize()
    } else {
      self.cwd.join(file).normalize()
    }
  }
}
