use minipack_common::ModuleLoaderMsg;

use super::ModuleExtractor;

/// Used to store common data shared between all tasks.
pub struct TaskContext {
  pub extractor: ModuleExtractor,
  pub tx: tokio::sync::mpsc::Sender<ModuleLoaderMsg>,
}
