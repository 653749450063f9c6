mod sort_modules;

use itertools::Itertools;
use minipack_common::{DependencyGraph, ModuleId, ModuleInfo};
use minipack_error::{BuildDiagnostic, BuildResult};
use minipack_utils::indexmap::FxIndexMap;
use rustc_hash::FxHashMap;

use super::scan::ScanStageOutput;

/// Checks the extracted modules form a closed, acyclic graph and flattens them into a
/// [`DependencyGraph`] in execution order.
#[derive(Debug)]
pub struct LinkStage {
  entry: ModuleId,
  modules: FxHashMap<ModuleId, ModuleInfo>,
}

impl LinkStage {
  pub fn new(scan_stage_output: ScanStageOutput) -> Self {
    Self { entry: scan_stage_output.entry, modules: scan_stage_output.modules }
  }

  pub fn link(mut self) -> BuildResult<DependencyGraph> {
    self.validate_dependencies()?;

    let sorted_modules = self.sort_modules()?;
    let modules = sorted_modules
      .into_iter()
      .filter_map(|id| self.modules.remove(&id).map(|module| (id, module)))
      .collect::<FxIndexMap<_, _>>();

    Ok(DependencyGraph::new(self.entry, modules))
  }

  /// Every dependency must point at a module of the graph.
  fn validate_dependencies(&self) -> BuildResult<()> {
    let errors = self
      .modules
      .values()
      .sorted_by(|a, b| a.id.cmp(&b.id))
      .flat_map(|module| {
        module
          .dependency_map
          .iter()
          .filter(|(_, resolved)| !self.modules.contains_key(*resolved))
          .map(|(specifier, resolved)| {
            BuildDiagnostic::unresolved_dependency(
              module.id.as_str(),
              specifier.as_str(),
              Some(resolved.to_string()),
            )
          })
      })
      .collect_vec();

    if !errors.is_empty() {
      Err(errors)?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn module(id: &str, deps: &[(&str, &str)]) -> (ModuleId, ModuleInfo) {
    let id = ModuleId::new(id.to_string());
    let dependency_map = deps
      .iter()
      .map(|(specifier, resolved)| ((*specifier).to_string(), ModuleId::new((*resolved).to_string())))
      .collect();
    (id.clone(), ModuleInfo { id, dependency_map, code: String::new() })
  }

  fn link(entry: &str, modules: Vec<(ModuleId, ModuleInfo)>) -> BuildResult<DependencyGraph> {
    LinkStage::new(ScanStageOutput {
      entry: ModuleId::new(entry.to_string()),
      modules: modules.into_iter().collect(),
    })
    .link()
  }

  #[test]
  fn sorts_dependencies_before_importers() {
    let graph = link(
      "./index.js",
      vec![
        module("./index.js", &[("./a.js", "./a.js"), ("./b.js", "./b.js")]),
        module("./a.js", &[("./c.js", "./c.js")]),
        module("./b.js", &[("./c.js", "./c.js")]),
        module("./c.js", &[]),
      ],
    )
    .unwrap();

    assert_eq!(graph.entry().as_str(), "./index.js");
    assert_eq!(
      graph.module_ids().map(ModuleId::as_str).collect_vec(),
      ["./c.js", "./a.js", "./b.js", "./index.js"]
    );
  }

  #[test]
  fn detects_cycles() {
    let err = link(
      "./index.js",
      vec![
        module("./index.js", &[("./a.js", "./a.js")]),
        module("./a.js", &[("./b.js", "./b.js")]),
        module("./b.js", &[("./a.js", "./a.js")]),
      ],
    )
    .unwrap_err();

    assert_eq!(err.len(), 1);
    assert_eq!(err[0].to_string(), "Circular import detected: ./a.js -> ./b.js -> ./a.js");
  }

  #[test]
  fn detects_self_imports() {
    let err =
      link("./index.js", vec![module("./index.js", &[("./index.js", "./index.js")])]).unwrap_err();

    assert_eq!(err[0].kind(), "CyclicImportError");
    assert_eq!(err[0].to_string(), "Circular import detected: ./index.js -> ./index.js");
  }

  #[test]
  fn rejects_dangling_dependencies() {
    let err =
      link("./index.js", vec![module("./index.js", &[("./gone.js", "./gone.js")])]).unwrap_err();

    assert_eq!(err[0].kind(), "UnresolvedDependencyError");
  }
}
