use minipack_error::BuildDiagnostic;

use crate::ModuleInfo;

pub enum ModuleLoaderMsg {
  ModuleDone(Box<ModuleInfo>),
  BuildErrors(Vec<BuildDiagnostic>),
}
