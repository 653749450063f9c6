use std::path::Path;

use arcstr::ArcStr;
use minipack_error::{BuildDiagnostic, BuildResult};
use oxc::{
  allocator::Allocator,
  codegen::{Codegen, CodegenOptions},
  diagnostics::{OxcDiagnostic, Severity},
  minifier::{CompressOptions, CompressOptionsKeepNames, MangleOptions, Minifier, MinifierOptions},
  parser::Parser,
  semantic::SemanticBuilder,
  span::SourceType,
  transformer::{ESTarget, TransformOptions, Transformer},
};

use crate::ecma_ast::{
  EcmaAst,
  program_cell::{ProgramCell, ProgramCellDependent, ProgramCellOwner},
};

pub struct EcmaCompiler;

impl EcmaCompiler {
  /// Parses `source` and runs the semantic checks the parser alone skips (redeclarations,
  /// duplicate exports...). Any error fails with a syntax diagnostic naming `path`.
  pub fn parse(
    path: &str,
    source: impl Into<ArcStr>,
    source_type: SourceType,
  ) -> BuildResult<EcmaAst> {
    let allocator = Allocator::default();
    let owner = ProgramCellOwner { source: source.into(), allocator };
    let program = ProgramCell::try_new(owner, |owner| {
      let ret = Parser::new(&owner.allocator, &owner.source, source_type).parse();
      if ret.panicked || !ret.errors.is_empty() {
        Err(error_messages(&ret.errors, "Unexpected end of input"))
      } else {
        Ok(ProgramCellDependent { program: ret.program })
      }
    })
    .map_err(|messages| BuildDiagnostic::syntax(path, messages))?;

    let ast = EcmaAst { program, source_type };

    let semantic_errors =
      SemanticBuilder::new().with_check_syntax_error(true).build(ast.program()).errors;
    if !semantic_errors.is_empty() {
      Err(BuildDiagnostic::syntax(path, error_messages(&semantic_errors, "Invalid program")))?;
    }

    Ok(ast)
  }

  /// Rewrites syntax newer than `target` in place. Nothing to do for `ESNext`.
  pub fn lower(ast: &mut EcmaAst, path: &str, target: ESTarget) -> BuildResult<()> {
    if matches!(target, ESTarget::ESNext) {
      return Ok(());
    }

    let ret = ast.program.with_mut(|fields| {
      let scoping = SemanticBuilder::new().build(fields.program).semantic.into_scoping();
      let options = TransformOptions::from(target);
      Transformer::new(fields.allocator, Path::new(path), &options)
        .build_with_scoping(scoping, fields.program)
    });

    let errors =
      ret.errors.into_iter().filter(|error| matches!(error.severity, Severity::Error)).collect::<Vec<_>>();
    if !errors.is_empty() {
      Err(BuildDiagnostic::transform(path, error_messages(&errors, "Transform failed")))?;
    }

    Ok(())
  }

  pub fn print(ast: &EcmaAst) -> String {
    Codegen::new().build(ast.program()).code
  }

  /// Minifies a whole script. The input is bundler output, so a parse failure means a bug
  /// upstream; the text is then returned untouched.
  pub fn minify(source_text: &str, target: ESTarget) -> String {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source_text, SourceType::default()).parse();
    if ret.panicked || !ret.errors.is_empty() {
      tracing::warn!("Skipped minification, the bundle does not parse");
      return source_text.to_string();
    }
    let program = allocator.alloc(ret.program);

    let ret = Minifier::new(MinifierOptions {
      mangle: Some(MangleOptions::default()),
      compress: Some(CompressOptions {
        target,
        drop_debugger: false,
        drop_console: false,
        keep_names: CompressOptionsKeepNames { function: true, class: true },
        ..CompressOptions::default()
      }),
    })
    .build(&allocator, program);

    Codegen::new()
      .with_options(CodegenOptions { minify: true, ..CodegenOptions::default() })
      .with_scoping(ret.scoping)
      .build(program)
      .code
  }
}

fn error_messages(errors: &[OxcDiagnostic], fallback: &str) -> Vec<String> {
  if errors.is_empty() {
    return vec![fallback.to_string()];
  }
  errors.iter().map(ToString::to_string).collect()
}

#[test]
fn prints_parsed_program() {
  let ast = EcmaCompiler::parse("a.js", "const a = 1;", SourceType::mjs()).unwrap();
  assert_eq!(EcmaCompiler::print(&ast), "const a = 1;\n");
}

#[test]
fn reports_syntax_errors_with_path() {
  let err = EcmaCompiler::parse("./src/broken.js", "const = ;", SourceType::mjs()).unwrap_err();
  assert_eq!(err.len(), 1);
  assert_eq!(err[0].kind(), "SyntaxError");
  assert!(err[0].to_string().starts_with("Failed to parse ./src/broken.js"));
}

#[test]
fn reports_semantic_errors() {
  let err =
    EcmaCompiler::parse("./src/dup.js", "let a = 1;\nlet a = 2;", SourceType::mjs()).unwrap_err();
  assert_eq!(err[0].kind(), "SyntaxError");
}

#[test]
fn lowers_to_target() {
  let mut ast = EcmaCompiler::parse("a.js", "const f = (a) => a ** 2;", SourceType::mjs()).unwrap();
  EcmaCompiler::lower(&mut ast, "a.js", ESTarget::ES2015).unwrap();
  let code = EcmaCompiler::print(&ast);
  assert!(code.contains("Math.pow"), "{code}");
}

#[test]
fn minifies_script() {
  let code = EcmaCompiler::minify("var value = 1 + 2;\nconsole.log(value);\n", ESTarget::ESNext);
  assert!(code.len() < "var value = 1 + 2;\nconsole.log(value);\n".len(), "{code}");
}
