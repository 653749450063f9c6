use std::iter;

use minipack_common::ModuleId;
use minipack_error::{BuildDiagnostic, BuildResult};
use minipack_utils::indexmap::FxIndexSet;
use rustc_hash::{FxHashMap, FxHashSet};

use super::LinkStage;

#[derive(PartialEq, Eq, Hash, Debug)]
enum Status<'a> {
  ToBeExecuted(&'a ModuleId),
  WaitForExit(&'a ModuleId),
}

impl LinkStage {
  /// Orders modules the way the runtime executes them, dependencies first. Any import chain
  /// leading back to a module that is still executing is reported as a cycle.
  pub(super) fn sort_modules(&self) -> BuildResult<Vec<ModuleId>> {
    let mut execution_stack = vec![Status::ToBeExecuted(&self.entry)];

    let mut executed_ids = FxHashSet::default();
    let mut stack_indexes_of_executing_id = FxHashMap::default();

    let mut circular_dependencies = FxIndexSet::default();
    let mut sorted_modules = Vec::with_capacity(self.modules.len());

    while let Some(status) = execution_stack.pop() {
      match status {
        Status::ToBeExecuted(id) => {
          if executed_ids.contains(id) {
            if let Some(index) = stack_indexes_of_executing_id.get(id).copied() {
              // Still executing, every module waiting above it is on the cycle
              let cycle = execution_stack[index..]
                .iter()
                .filter_map(|status| match status {
                  Status::ToBeExecuted(_) => None,
                  Status::WaitForExit(id) => Some((*id).clone()),
                })
                .chain(iter::once(id.clone()))
                .collect::<Vec<_>>();
              circular_dependencies.insert(cycle);
            }
          } else {
            executed_ids.insert(id);
            execution_stack.push(Status::WaitForExit(id));
            stack_indexes_of_executing_id.insert(id, execution_stack.len() - 1);

            if let Some(module) = self.modules.get(id) {
              execution_stack.extend(module.dependency_map.values().rev().map(Status::ToBeExecuted));
            }
          }
        }
        Status::WaitForExit(id) => {
          sorted_modules.push(id.clone());
          stack_indexes_of_executing_id.remove(id);
        }
      }
    }

    if !circular_dependencies.is_empty() {
      Err(
        circular_dependencies
          .into_iter()
          .map(|cycle| {
            BuildDiagnostic::cyclic_import(cycle.iter().map(ToString::to_string).collect())
          })
          .collect::<Vec<_>>(),
      )?;
    }

    Ok(sorted_modules)
  }
}
