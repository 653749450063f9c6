pub mod bundle_output;
pub mod module_transformer;

use std::sync::Arc;

use minipack_common::NormalizedBundlerOptions;
use minipack_fs::FileSystem;
use minipack_resolver::Resolver;

use self::module_transformer::ModuleTransformer;

pub type SharedOptions = Arc<NormalizedBundlerOptions>;
pub type SharedResolver = Arc<Resolver>;
pub type SharedFileSystem = Arc<dyn FileSystem>;
pub type SharedTransformer = Arc<dyn ModuleTransformer>;
