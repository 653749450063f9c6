use std::sync::Arc;

use minipack_common::{ModuleId, ModuleInfo, ModuleLoaderMsg};
use minipack_error::{BuildDiagnostic, BuildResult};

use super::task_context::TaskContext;

pub struct ModuleTaskOwner {
  importer_id: ModuleId,
}

impl ModuleTaskOwner {
  pub fn new(importer_id: ModuleId) -> Self {
    ModuleTaskOwner { importer_id }
  }
}

pub struct ModuleTask {
  ctx: Arc<TaskContext>,
  id: ModuleId,
  owner: Option<ModuleTaskOwner>,
}

impl ModuleTask {
  pub fn new(ctx: Arc<TaskContext>, id: ModuleId, owner: Option<ModuleTaskOwner>) -> Self {
    Self { ctx, id, owner }
  }

  pub async fn run(self) {
    let msg = match self.run_inner().await {
      Ok(module) => ModuleLoaderMsg::ModuleDone(Box::new(module)),
      Err(errs) => ModuleLoaderMsg::BuildErrors(errs.into_vec()),
    };
    // The loader holds its own sender and keeps receiving until every task reported back.
    let _ = self.ctx.tx.send(msg).await;
  }

  async fn run_inner(&self) -> BuildResult<ModuleInfo> {
    let ctx = Arc::clone(&self.ctx);
    let id = self.id.clone();
    let importer = self.owner.as_ref().map(|owner| owner.importer_id.clone());

    // Reading and transforming are blocking, keep them off the async workers.
    tokio::task::spawn_blocking(move || ctx.extractor.extract(&id, importer.as_ref()))
      .await
      .map_err(|err| BuildDiagnostic::unhandleable(err.into()))?
  }
}
