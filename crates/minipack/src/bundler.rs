use std::sync::Arc;

use minipack_common::{BundlerOptions, DependencyGraph, NormalizedBundlerOptions};
use minipack_error::{BuildDiagnostic, BuildResult};
use minipack_fs::{FileSystem, OsFileSystem};
use minipack_resolver::Resolver;

use crate::{
  module_loader::loaders::ecmascript::EcmaTransformer,
  stages::{generate::GenerateStage, link::LinkStage, scan::ScanStage},
  types::{
    SharedFileSystem, SharedOptions, SharedResolver, SharedTransformer,
    bundle_output::BundleOutput, module_transformer::ModuleTransformer,
  },
  utils::normalize_options::normalize_options,
};

pub struct Bundler {
  pub(crate) fs: SharedFileSystem,
  pub(crate) options: SharedOptions,
  pub(crate) resolver: SharedResolver,
  pub(crate) transformer: SharedTransformer,
}

impl Bundler {
  pub fn new(options: BundlerOptions) -> BuildResult<Self> {
    Self::with_file_system(options, OsFileSystem)
  }

  /// Reads sources from and writes the bundle to `fs` instead of the disk.
  pub fn with_file_system(
    options: BundlerOptions,
    fs: impl FileSystem + 'static,
  ) -> BuildResult<Self> {
    let options = normalize_options(options)?;

    let fs: SharedFileSystem = Arc::new(fs);
    let resolver: SharedResolver =
      Resolver::new(options.cwd.clone(), options.extensions.clone(), Arc::clone(&fs)).into();
    let transformer: SharedTransformer = Arc::new(EcmaTransformer::new(options.target));

    Ok(Self { fs, options: Arc::new(options), resolver, transformer })
  }

  /// Replaces the default oxc based transformer.
  #[must_use]
  pub fn with_transformer(mut self, transformer: impl ModuleTransformer + 'static) -> Self {
    self.transformer = Arc::new(transformer);
    self
  }

  pub fn options(&self) -> &NormalizedBundlerOptions {
    &self.options
  }

  /// Extracts every module reachable from the entry into a flat, acyclic graph.
  pub async fn build_graph(&self) -> BuildResult<DependencyGraph> {
    let scan_stage_output = ScanStage::new(
      Arc::clone(&self.fs),
      Arc::clone(&self.options),
      Arc::clone(&self.resolver),
      Arc::clone(&self.transformer),
    )
    .scan()
    .await?;

    let graph = LinkStage::new(scan_stage_output).link()?;
    tracing::info!(entry = %graph.entry(), modules = graph.modules().len(), "built module graph");
    Ok(graph)
  }

  /// Renders `graph` into the self-invoking bundle source.
  pub fn emit(&self, graph: &DependencyGraph) -> BuildResult<String> {
    GenerateStage::new(graph, &self.options).render()
  }

  pub async fn generate(&self) -> BuildResult<BundleOutput> {
    let graph = self.build_graph().await?;
    GenerateStage::new(&graph, &self.options).generate()
  }

  pub async fn write(&self) -> BuildResult<BundleOutput> {
    let output = self.generate().await?;

    let path = self.options.output_path();
    let write_error = |source| BuildDiagnostic::Write { path: path.clone(), source };
    for asset in &output.assets {
      if let Some(dir) = path.parent() {
        self.fs.create_dir_all(dir).map_err(write_error)?;
      }
      self.fs.write(&path, asset.content_as_bytes()).map_err(write_error)?;
      tracing::info!(file = %path.display(), size = asset.content.len(), "wrote bundle");
    }

    Ok(output)
  }
}
