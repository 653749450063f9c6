mod bundler;
mod module_loader;
mod stages;
mod types;
mod utils;

pub use crate::{
  bundler::Bundler,
  module_loader::loaders::ecmascript::EcmaTransformer,
  types::{
    bundle_output::BundleOutput,
    module_transformer::{ModuleTransformer, TransformedModule},
  },
};
pub use minipack_common::*;
pub use minipack_error::{BuildDiagnostic, BuildError, BuildResult};
