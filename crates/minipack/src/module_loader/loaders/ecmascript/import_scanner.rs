use oxc::{
  ast::ast::{ImportExpression, Program, Statement},
  ast_visit::{Visit, walk},
};

/// Static dependencies of a module plus the number of `import()` calls, which are not followed.
#[derive(Debug, Default)]
pub struct ImportScanner {
  /// Sources of top-level `import` and `export ... from` statements, in source order.
  pub specifiers: Vec<String>,
  pub dynamic_imports: usize,
}

impl ImportScanner {
  pub fn scan(program: &Program<'_>) -> Self {
    let mut scanner = Self::default();

    for stmt in &program.body {
      let source = match stmt {
        Statement::ImportDeclaration(decl) => Some(&decl.source),
        Statement::ExportNamedDeclaration(decl) => decl.source.as_ref(),
        Statement::ExportAllDeclaration(decl) => Some(&decl.source),
        _ => None,
      };
      if let Some(source) = source {
        scanner.specifiers.push(source.value.to_string());
      }
    }

    scanner.visit_program(program);
    scanner
  }
}

impl<'a> Visit<'a> for ImportScanner {
  fn visit_import_expression(&mut self, it: &ImportExpression<'a>) {
    self.dynamic_imports += 1;
    walk::walk_import_expression(self, it);
  }
}
