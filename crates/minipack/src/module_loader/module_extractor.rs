use std::path::PathBuf;

use minipack_common::{ModuleId, ModuleInfo};
use minipack_error::{BuildDiagnostic, BuildResult};
use minipack_utils::indexmap::FxIndexMap;

use crate::types::{
  SharedFileSystem, SharedResolver, SharedTransformer, module_transformer::TransformedModule,
};

/// Turns one file into a [`ModuleInfo`]: read, transform, resolve every specifier.
pub struct ModuleExtractor {
  fs: SharedFileSystem,
  resolver: SharedResolver,
  transformer: SharedTransformer,
  cwd: PathBuf,
}

impl ModuleExtractor {
  pub fn new(
    fs: SharedFileSystem,
    resolver: SharedResolver,
    transformer: SharedTransformer,
    cwd: PathBuf,
  ) -> Self {
    Self { fs, resolver, transformer, cwd }
  }

  pub fn extract(&self, id: &ModuleId, importer: Option<&ModuleId>) -> BuildResult<ModuleInfo> {
    let path = id.to_absolute(&self.cwd);
    let source = self.fs.read_to_string(&path).map_err(|err| {
      BuildDiagnostic::io(id.as_str(), importer.map(ToString::to_string), err)
    })?;

    let TransformedModule { specifiers, code } = self.transformer.transform(id, &source)?;

    let mut dependency_map = FxIndexMap::default();
    let mut errors = vec![];
    for specifier in specifiers {
      if dependency_map.contains_key(&specifier) {
        continue;
      }
      match self.resolver.resolve(id, &specifier) {
        Ok(resolved) => {
          dependency_map.insert(specifier, resolved);
        }
        Err(errs) => errors.extend(errs.into_vec()),
      }
    }

    if !errors.is_empty() {
      Err(errors)?;
    }

    tracing::debug!(module = %id, dependencies = dependency_map.len(), "extracted module");
    Ok(ModuleInfo { id: id.clone(), dependency_map, code })
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use minipack_fs::MemoryFileSystem;
  use minipack_resolver::{DEFAULT_EXTENSIONS, Resolver};

  use super::*;
  use crate::{EcmaTransformer, ESTarget};

  fn extractor(files: &[(&str, &str)]) -> ModuleExtractor {
    let fs: SharedFileSystem = Arc::new(MemoryFileSystem::new(files));
    let cwd = PathBuf::from("/project");
    let resolver = Arc::new(Resolver::new(
      cwd.clone(),
      DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
      Arc::clone(&fs),
    ));
    ModuleExtractor::new(fs, resolver, Arc::new(EcmaTransformer::new(ESTarget::EsNext)), cwd)
  }

  #[test]
  fn maps_specifiers_to_canonical_paths() {
    let extractor = extractor(&[
      ("/project/src/index.js", "import { add } from './add.js';\nimport './add';\nexport * from './lib';"),
      ("/project/src/add.js", "export const add = (a, b) => a + b;"),
      ("/project/src/lib/index.js", ""),
    ]);

    let module = extractor.extract(&ModuleId::new("./src/index.js"), None).unwrap();

    assert_eq!(module.id.as_str(), "./src/index.js");
    assert_eq!(
      module.dependency_map.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect::<Vec<_>>(),
      [("./add.js", "./src/add.js"), ("./add", "./src/add.js"), ("./lib", "./src/lib/index.js")]
    );
    assert!(module.code.contains("require(\"./add.js\")"));
  }

  #[test]
  fn module_without_imports_has_empty_map() {
    let extractor = extractor(&[("/project/main.js", "console.log('hi');")]);

    let module = extractor.extract(&ModuleId::new("./main.js"), None).unwrap();

    assert!(module.dependency_map.is_empty());
    assert!(module.code.contains("console.log('hi');"));
  }

  #[test]
  fn missing_file_names_importer() {
    let extractor = extractor(&[]);

    let importer = ModuleId::new("./src/index.js");
    let err = extractor.extract(&ModuleId::new("./src/missing.js"), Some(&importer)).unwrap_err();

    assert_eq!(err[0].kind(), "IOError");
    assert!(err[0].to_string().contains("(imported by ./src/index.js)"));
  }

  #[test]
  fn reports_every_unresolvable_specifier() {
    let extractor =
      extractor(&[("/project/index.js", "import a from 'lodash';\nimport b from 'react';")]);

    let err = extractor.extract(&ModuleId::new("./index.js"), None).unwrap_err();

    assert_eq!(err.len(), 2);
    assert!(err.iter().all(|diagnostic| diagnostic.kind() == "UnresolvedDependencyError"));
  }
}
