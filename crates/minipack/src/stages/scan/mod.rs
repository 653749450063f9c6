use std::sync::Arc;

use minipack_error::BuildResult;

use crate::{
  module_loader::{ModuleExtractor, ModuleLoader, ModuleLoaderOutput},
  types::{SharedFileSystem, SharedOptions, SharedResolver, SharedTransformer},
};

pub type ScanStageOutput = ModuleLoaderOutput;

pub struct ScanStage {
  fs: SharedFileSystem,
  options: SharedOptions,
  resolver: SharedResolver,
  transformer: SharedTransformer,
}

impl ScanStage {
  pub fn new(
    fs: SharedFileSystem,
    options: SharedOptions,
    resolver: SharedResolver,
    transformer: SharedTransformer,
  ) -> Self {
    Self { fs, options, resolver, transformer }
  }

  pub async fn scan(&self) -> BuildResult<ScanStageOutput> {
    let entry = self.resolver.resolve_entry(&self.options.input);

    let extractor = ModuleExtractor::new(
      Arc::clone(&self.fs),
      Arc::clone(&self.resolver),
      Arc::clone(&self.transformer),
      self.options.cwd.clone(),
    );

    ModuleLoader::new(extractor).fetch_all_modules(entry).await
  }
}
