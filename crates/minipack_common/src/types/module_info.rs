use minipack_utils::indexmap::FxIndexMap;
use serde::Serialize;

use crate::ModuleId;

/// Everything the bundle needs to know about one source file.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleInfo {
  #[serde(skip)]
  pub id: ModuleId,
  /// Specifier as written in the source -> canonical path it resolves to, in source order.
  #[serde(rename = "deps")]
  pub dependency_map: FxIndexMap<String, ModuleId>,
  /// Transformed module body, executed with `require`, `exports` and `module` in scope.
  pub code: String,
}

impl ModuleInfo {
  pub fn dependencies(&self) -> impl Iterator<Item = &ModuleId> {
    self.dependency_map.values()
  }
}
