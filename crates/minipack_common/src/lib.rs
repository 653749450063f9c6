mod bundler_options;
mod module_loader;
mod types;

pub use bundler_options::{
  code_embedding::CodeEmbedding, es_target::ESTarget,
  normalized_bundler_options::NormalizedBundlerOptions, BundlerOptions,
};

pub use crate::{
  module_loader::ModuleLoaderMsg,
  types::{
    dependency_graph::DependencyGraph, module_id::ModuleId, module_info::ModuleInfo,
    output_asset::OutputAsset, source::Source, source_joiner::SourceJoiner,
  },
};
