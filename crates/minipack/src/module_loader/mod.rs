pub mod loaders;
mod module_extractor;
mod module_task;
mod task_context;

use std::sync::Arc;

use minipack_common::{ModuleId, ModuleInfo, ModuleLoaderMsg};
use minipack_error::BuildResult;
use module_task::{ModuleTask, ModuleTaskOwner};
use rustc_hash::{FxHashMap, FxHashSet};
use task_context::TaskContext;
use tokio::sync::mpsc::Receiver;

pub use self::module_extractor::ModuleExtractor;

/// Drives extraction of every module reachable from the entry.
///
/// Tasks run concurrently but only report back through the channel. The visited-set, the module
/// table and the collected errors are touched by `fetch_all_modules` alone.
pub struct ModuleLoader {
  rx: Receiver<ModuleLoaderMsg>,
  remaining: u32,
  shared_context: Arc<TaskContext>,
  visited: FxHashSet<ModuleId>,
}

pub struct ModuleLoaderOutput {
  pub entry: ModuleId,
  pub modules: FxHashMap<ModuleId, ModuleInfo>,
}

impl ModuleLoader {
  pub fn new(extractor: ModuleExtractor) -> Self {
    // 1024 should be enough for most cases
    // over 1024 pending tasks are insane
    let (tx, rx) = tokio::sync::mpsc::channel(1024);

    let shared_context = Arc::new(TaskContext { extractor, tx });

    Self { rx, remaining: 0, shared_context, visited: FxHashSet::default() }
  }

  fn try_spawn_new_task(&mut self, id: &ModuleId, owner: Option<ModuleTaskOwner>) {
    if !self.visited.insert(id.clone()) {
      return;
    }

    self.remaining += 1;
    let task = ModuleTask::new(Arc::clone(&self.shared_context), id.clone(), owner);
    tokio::spawn(task.run());
  }

  pub async fn fetch_all_modules(mut self, entry: ModuleId) -> BuildResult<ModuleLoaderOutput> {
    self.try_spawn_new_task(&entry, None);

    let mut modules = FxHashMap::default();
    let mut errors = vec![];

    while self.remaining > 0 {
      // `shared_context` holds a sender, so the channel stays open and `None` is unreachable.
      let Some(msg) = self.rx.recv().await else {
        break;
      };

      match msg {
        ModuleLoaderMsg::ModuleDone(module) => {
          for dependency in module.dependencies() {
            self.try_spawn_new_task(dependency, Some(ModuleTaskOwner::new(module.id.clone())));
          }
          modules.insert(module.id.clone(), *module);
        }
        ModuleLoaderMsg::BuildErrors(errs) => {
          errors.extend(errs);
        }
      }
      self.remaining -= 1;
    }

    if !errors.is_empty() {
      Err(errors)?;
    }

    tracing::debug!(modules = modules.len(), "fetched all modules");
    Ok(ModuleLoaderOutput { entry, modules })
  }
}
