use minipack_utils::indexmap::FxIndexMap;
use serde::{Serialize, Serializer};

use crate::{ModuleId, ModuleInfo};

/// The flat closure of every module reachable from the entry, keyed by canonical path.
///
/// Serializing it yields the registry literal embedded in the bundle:
/// `{ "<canonical path>": { "deps": { "<specifier>": "<canonical path>" }, "code": "..." } }`.
#[derive(Debug)]
pub struct DependencyGraph {
  entry: ModuleId,
  modules: FxIndexMap<ModuleId, ModuleInfo>,
}

impl DependencyGraph {
  /// `modules` is expected in execution order, dependencies before their importers.
  pub fn new(entry: ModuleId, modules: FxIndexMap<ModuleId, ModuleInfo>) -> Self {
    Self { entry, modules }
  }

  pub fn entry(&self) -> &ModuleId {
    &self.entry
  }

  pub fn get(&self, id: &ModuleId) -> Option<&ModuleInfo> {
    self.modules.get(id)
  }

  pub fn module_ids(&self) -> impl ExactSizeIterator<Item = &ModuleId> {
    self.modules.keys()
  }

  pub fn modules(&self) -> impl ExactSizeIterator<Item = &ModuleInfo> {
    self.modules.values()
  }
}

impl Serialize for DependencyGraph {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(self.modules.iter())
  }
}

#[test]
fn test_serialize_wire_format() {
  let entry = ModuleId::new("./src/index.js");
  let add = ModuleId::new("./src/add.js");

  let mut modules = FxIndexMap::default();
  modules.insert(
    entry.clone(),
    ModuleInfo {
      id: entry.clone(),
      dependency_map: FxIndexMap::from_iter([("./add.js".to_string(), add.clone())]),
      code: "var _add = require(\"./add.js\");".to_string(),
    },
  );
  modules.insert(
    add.clone(),
    ModuleInfo { id: add, dependency_map: FxIndexMap::default(), code: String::new() },
  );

  let graph = DependencyGraph::new(entry, modules);
  assert_eq!(
    serde_json::to_string(&graph).unwrap(),
    r#"{"./src/index.js":{"deps":{"./add.js":"./src/add.js"},"code":"var _add = require(\"./add.js\");"},"./src/add.js":{"deps":{},"code":""}}"#
  );
}
