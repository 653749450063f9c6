mod format;
mod import_scanner;

use itertools::Itertools;
use minipack_common::{ESTarget, ModuleId};
use minipack_ecmascript::EcmaCompiler;
use minipack_error::{BuildDiagnostic, BuildResult};
use oxc::span::SourceType;

use self::{format::cjs::render_cjs, import_scanner::ImportScanner};
use crate::types::module_transformer::{ModuleTransformer, TransformedModule};

/// The default [`ModuleTransformer`], built on oxc.
///
/// Every module is parsed as an ES module, lowered to `target` and finally rewritten to
/// CommonJS so the bundle runtime can execute it.
#[derive(Debug, Default, Clone, Copy)]
pub struct EcmaTransformer {
  target: ESTarget,
}

impl EcmaTransformer {
  pub fn new(target: ESTarget) -> Self {
    Self { target }
  }
}

impl ModuleTransformer for EcmaTransformer {
  fn transform(&self, id: &ModuleId, source: &str) -> BuildResult<TransformedModule> {
    let path = id.as_str();
    let mut ast = EcmaCompiler::parse(path, source, SourceType::mjs())?;

    let scanned = ImportScanner::scan(ast.program());
    if scanned.dynamic_imports > 0 {
      tracing::warn!(
        module = %id,
        count = scanned.dynamic_imports,
        "Dynamic imports are left as they are and their targets are not bundled"
      );
    }

    if !matches!(self.target, ESTarget::EsNext) {
      EcmaCompiler::lower(&mut ast, path, self.target.into())?;
      ast = EcmaCompiler::parse(path, EcmaCompiler::print(&ast), SourceType::mjs())?;

      // The runtime only knows the specifiers written by the author, lowering must not add any.
      let added = ImportScanner::scan(ast.program())
        .specifiers
        .into_iter()
        .filter(|specifier| !scanned.specifiers.contains(specifier))
        .unique()
        .collect_vec();
      if !added.is_empty() {
        Err(BuildDiagnostic::transform(
          path,
          added
            .into_iter()
            .map(|specifier| {
              format!(
                "Lowering to {} needs the helper module {specifier:?}, which can't be bundled. \
                 Use a newer target.",
                self.target
              )
            })
            .collect(),
        ))?;
      }
    }

    let code = render_cjs(ast.program(), ast.source());
    Ok(TransformedModule { specifiers: scanned.specifiers, code })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn transform(source: &str) -> TransformedModule {
    EcmaTransformer::new(ESTarget::EsNext).transform(&ModuleId::new("./src/index.js"), source).unwrap()
  }

  #[test]
  fn reports_specifiers_in_source_order() {
    let module = transform(
      "import a from './a.js';\nexport { b } from './b.js';\nexport * from './c.js';\nimport './a.js';",
    );

    assert_eq!(module.specifiers, ["./a.js", "./b.js", "./c.js", "./a.js"]);
  }

  #[test]
  fn ignores_dynamic_imports() {
    let module = transform("export const load = () => import('./lazy.js');");

    assert!(module.specifiers.is_empty());
    assert!(module.code.contains("import('./lazy.js')"));
  }

  #[test]
  fn lowers_to_older_targets() {
    let module = EcmaTransformer::new(ESTarget::Es2015)
      .transform(&ModuleId::new("./src/math.js"), "export const square = (a) => a ** 2;")
      .unwrap();

    assert!(module.code.contains("Math.pow"), "{}", module.code);
    assert!(!module.code.contains("export "), "{}", module.code);
  }

  #[test]
  fn rejects_syntax_errors() {
    let err = EcmaTransformer::default()
      .transform(&ModuleId::new("./src/broken.js"), "import { from './a.js';")
      .unwrap_err();

    assert_eq!(err[0].kind(), "SyntaxError");
    assert!(err[0].to_string().contains("./src/broken.js"));
  }
}
