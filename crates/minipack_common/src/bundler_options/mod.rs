pub mod code_embedding;
pub mod es_target;
pub mod normalized_bundler_options;

use std::path::PathBuf;

use crate::{CodeEmbedding, ESTarget};

#[derive(Default, Debug, Clone)]
pub struct BundlerOptions {
  // --- Input
  pub input: Option<String>,
  pub cwd: Option<PathBuf>,
  pub extensions: Option<Vec<String>>,

  // --- Transform
  pub target: Option<ESTarget>,

  // --- Output
  pub file: Option<String>,
  pub module_cache: Option<bool>,
  pub code_embedding: Option<CodeEmbedding>,
  pub minify: Option<bool>,
}
