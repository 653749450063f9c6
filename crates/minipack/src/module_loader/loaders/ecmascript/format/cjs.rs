use std::path::Path;

use minipack_utils::{
  concat_string,
  ecmascript::{legitimize_identifier_name, property_access_str, to_string_literal},
  path_ext::PathExt,
};
use oxc::{
  ast::ast::{
    BindingPattern, BindingPatternKind, CallExpression, Declaration, ExportAllDeclaration,
    ExportDefaultDeclarationKind, ExportNamedDeclaration, Expression, IdentifierReference,
    ImportDeclaration, ImportDeclarationSpecifier, ObjectProperty, Program, Statement,
    TaggedTemplateExpression,
  },
  ast_visit::{Visit, walk},
  semantic::{Scoping, SemanticBuilder, SymbolId},
  span::{GetSpan, Span},
};
use rustc_hash::{FxHashMap, FxHashSet};
use string_wizard::MagicString;

const ES_MODULE_MARKER: &str = "Object.defineProperty(exports, \"__esModule\", { value: true });";

/// Rewrites the module syntax of `program` into CommonJS and leaves every other statement as
/// written.
///
/// The emitted header holds, in order: the `__esModule` marker, a getter for every local export
/// and the `require` calls of imports and re-exports in source order. Getters keep exports live
/// and make exported functions visible before the body runs. Every use of an imported binding is
/// rewritten to a property read on the required module, so imports stay live too.
pub fn render_cjs<'a>(program: &'a Program<'a>, source: &str) -> String {
  let scoping = SemanticBuilder::new().build(program).semantic.into_scoping();
  let mut renderer = CjsRenderer::new(source, &scoping);

  if let Some(hashbang) = &program.hashbang {
    renderer.remove(hashbang.span);
  }

  // Module requests first, so local exports can point at imported bindings declared later.
  for stmt in &program.body {
    renderer.render_module_request(stmt);
  }
  for stmt in &program.body {
    renderer.render_local_export(stmt);
  }

  let mut rewriter = ImportReferenceRewriter {
    scoping: &scoping,
    imports: &renderer.imports,
    magic_string: &mut renderer.magic_string,
  };
  rewriter.visit_program(program);

  renderer.finish()
}

struct CjsRenderer<'s> {
  source: &'s str,
  magic_string: MagicString<'s>,
  export_getters: String,
  hoisted_requires: String,
  /// Specifier -> name of the variable holding its `require` result.
  require_bindings: FxHashMap<String, String>,
  /// Imported binding -> expression reading it from the required module.
  imports: FxHashMap<SymbolId, String>,
  imported_names: FxHashMap<String, String>,
  /// Every name declared or referenced as a global anywhere in the module.
  used_names: FxHashSet<String>,
}

impl<'s> CjsRenderer<'s> {
  fn new(source: &'s str, scoping: &Scoping) -> Self {
    let used_names = scoping
      .symbol_names()
      .map(ToString::to_string)
      .chain(scoping.root_unresolved_references().keys().map(ToString::to_string))
      .collect();

    Self {
      source,
      magic_string: MagicString::new(source),
      export_getters: String::new(),
      hoisted_requires: String::new(),
      require_bindings: FxHashMap::default(),
      imports: FxHashMap::default(),
      imported_names: FxHashMap::default(),
      used_names,
    }
  }

  /// Hoists `import` and `export ... from` statements into `require` calls.
  fn render_module_request(&mut self, stmt: &Statement<'_>) {
    match stmt {
      Statement::ImportDeclaration(decl) => {
        self.render_import(decl);
        self.replace_with_empty_statement(decl.span);
      }
      Statement::ExportNamedDeclaration(decl) => {
        if let Some(source) = &decl.source {
          let binding = self.require_binding(source.value.as_str());
          for specifier in &decl.specifiers {
            let value = property_access_str(&binding, specifier.local.name().as_str());
            self.hoisted_requires.push_str(&render_getter(specifier.exported.name().as_str(), &value));
          }
          self.replace_with_empty_statement(decl.span);
        }
      }
      Statement::ExportAllDeclaration(decl) => {
        let binding = self.require_binding(decl.source.value.as_str());
        let code = match &decl.exported {
          Some(exported) => render_getter(exported.name().as_str(), &binding),
          None => render_star_reexport(&binding),
        };
        self.hoisted_requires.push_str(&code);
        self.replace_with_empty_statement(decl.span);
      }
      _ => {}
    }
  }

  fn render_local_export(&mut self, stmt: &Statement<'_>) {
    match stmt {
      Statement::ExportNamedDeclaration(decl) if decl.source.is_none() => {
        if let Some(declaration) = &decl.declaration {
          let mut names = vec![];
          collect_declared_names(declaration, &mut names);
          for name in names {
            self.export_getters.push_str(&render_getter(name, name));
          }
          self.magic_string.remove(decl.span.start as usize, declaration.span().start as usize);
        } else {
          for specifier in &decl.specifiers {
            let local = specifier.local.name();
            let value = self.imported_names.get(local.as_str()).map_or(local.as_str(), String::as_str);
            self.export_getters.push_str(&render_getter(specifier.exported.name().as_str(), value));
          }
          self.replace_with_empty_statement(decl.span);
        }
      }
      Statement::ExportDefaultDeclaration(decl) => {
        let named = match &decl.declaration {
          ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
            func.id.as_ref().map(|id| (id.name.as_str(), func.span.start))
          }
          ExportDefaultDeclarationKind::ClassDeclaration(class) => {
            class.id.as_ref().map(|id| (id.name.as_str(), class.span.start))
          }
          _ => None,
        };

        if let Some((name, start)) = named {
          self.export_getters.push_str(&render_getter("default", name));
          self.magic_string.remove(decl.span.start as usize, start as usize);
        } else {
          let end = decl.span.end as usize;
          self.magic_string.update(
            decl.span.start as usize,
            decl.declaration.span().start as usize,
            "exports.default = ",
          );
          if !self.source[..end].ends_with(';') {
            self.magic_string.append_left(end, ";");
          }
        }
      }
      _ => {}
    }
  }

  fn render_import(&mut self, decl: &ImportDeclaration<'_>) {
    let specifier = decl.source.value.as_str();

    let Some(specifiers) = decl.specifiers.as_ref().filter(|specifiers| !specifiers.is_empty())
    else {
      // `import './side-effect.js'`
      if !self.require_bindings.contains_key(specifier) {
        self
          .hoisted_requires
          .push_str(&concat_string!("require(", to_string_literal(specifier), ");\n"));
      }
      return;
    };

    let binding = self.require_binding(specifier);
    for specifier in specifiers {
      let (local, value) = match specifier {
        ImportDeclarationSpecifier::ImportSpecifier(spec) => {
          (&spec.local, property_access_str(&binding, spec.imported.name().as_str()))
        }
        ImportDeclarationSpecifier::ImportDefaultSpecifier(spec) => {
          (&spec.local, concat_string!(binding, ".default"))
        }
        ImportDeclarationSpecifier::ImportNamespaceSpecifier(spec) => {
          (&spec.local, binding.clone())
        }
      };
      if let Some(symbol_id) = local.symbol_id.get() {
        self.imports.insert(symbol_id, value.clone());
      }
      self.imported_names.insert(local.name.to_string(), value);
    }
  }

  /// Returns the variable holding `require(specifier)`, declaring it on first use.
  fn require_binding(&mut self, specifier: &str) -> String {
    if let Some(binding) = self.require_bindings.get(specifier) {
      return binding.clone();
    }

    let base = concat_string!(
      "_",
      legitimize_identifier_name(&Path::new(specifier).representative_file_name())
    );
    let mut binding = base.clone();
    let mut suffix = 1u32;
    // Rewritten references live in every scope, so no scope may declare the same name.
    while self.used_names.contains(&binding) {
      binding = format!("{base}${suffix}");
      suffix += 1;
    }

    self.hoisted_requires.push_str(&concat_string!(
      "var ",
      binding,
      " = require(",
      to_string_literal(specifier),
      ");\n"
    ));
    self.used_names.insert(binding.clone());
    self.require_bindings.insert(specifier.to_string(), binding.clone());
    binding
  }

  fn remove(&mut self, span: Span) {
    self.magic_string.remove(span.start as usize, span.end as usize);
  }

  /// Keeps a `;` in place of a module declaration so the statements around it stay apart
  /// in code relying on automatic semicolon insertion.
  fn replace_with_empty_statement(&mut self, span: Span) {
    self.magic_string.update(span.start as usize, span.end as usize, ";");
  }

  fn finish(mut self) -> String {
    let header = concat_string!(
      "\"use strict\";\n",
      ES_MODULE_MARKER,
      "\n",
      self.export_getters,
      self.hoisted_requires
    );
    self.magic_string.prepend(header);
    self.magic_string.to_string()
  }
}

/// Points every reference to an imported binding at the required module.
struct ImportReferenceRewriter<'r, 's> {
  scoping: &'r Scoping,
  imports: &'r FxHashMap<SymbolId, String>,
  magic_string: &'r mut MagicString<'s>,
}

impl ImportReferenceRewriter<'_, '_> {
  fn import_access(&self, ident: &IdentifierReference<'_>) -> Option<&str> {
    let reference_id = ident.reference_id.get()?;
    let symbol_id = self.scoping.get_reference(reference_id).symbol_id()?;
    self.imports.get(&symbol_id).map(String::as_str)
  }

  fn update(&mut self, span: Span, content: String) {
    self.magic_string.update(span.start as usize, span.end as usize, content);
  }

  /// `foo()` must not receive the module as `this`, so callees become `(0, _foo.foo)`.
  fn rewrite_callee(&mut self, callee: &Expression<'_>) -> bool {
    let Expression::Identifier(ident) = callee else {
      return false;
    };
    let Some(access) = self.import_access(ident) else {
      return false;
    };
    let content = concat_string!("(0, ", access, ")");
    self.update(ident.span, content);
    true
  }
}

impl<'a> Visit<'a> for ImportReferenceRewriter<'_, '_> {
  fn visit_import_declaration(&mut self, _it: &ImportDeclaration<'a>) {}

  fn visit_export_all_declaration(&mut self, _it: &ExportAllDeclaration<'a>) {}

  fn visit_export_named_declaration(&mut self, it: &ExportNamedDeclaration<'a>) {
    // Specifier lists are already gone, only a declaration is left in the output.
    if let Some(declaration) = &it.declaration {
      self.visit_declaration(declaration);
    }
  }

  fn visit_identifier_reference(&mut self, it: &IdentifierReference<'a>) {
    if let Some(access) = self.import_access(it) {
      let content = access.to_string();
      self.update(it.span, content);
    }
  }

  fn visit_call_expression(&mut self, it: &CallExpression<'a>) {
    if self.rewrite_callee(&it.callee) {
      for argument in &it.arguments {
        self.visit_argument(argument);
      }
    } else {
      walk::walk_call_expression(self, it);
    }
  }

  fn visit_tagged_template_expression(&mut self, it: &TaggedTemplateExpression<'a>) {
    if self.rewrite_callee(&it.tag) {
      self.visit_template_literal(&it.quasi);
    } else {
      walk::walk_tagged_template_expression(self, it);
    }
  }

  fn visit_object_property(&mut self, it: &ObjectProperty<'a>) {
    // `{ a }` becomes `{ a: _a.a }` rather than `{ _a.a }`.
    if it.shorthand {
      if let Expression::Identifier(ident) = &it.value {
        if let Some(access) = self.import_access(ident) {
          let content = concat_string!(ident.name, ": ", access);
          self.update(ident.span, content);
          return;
        }
      }
    }
    walk::walk_object_property(self, it);
  }
}

fn render_getter(exported: &str, value: &str) -> String {
  concat_string!(
    "Object.defineProperty(exports, ",
    to_string_literal(exported),
    ", { enumerable: true, get: function () { return ",
    value,
    "; } });\n"
  )
}

fn render_star_reexport(binding: &str) -> String {
  concat_string!(
    "Object.keys(",
    binding,
    ").forEach(function (key) {\n",
    "  if (key === \"default\" || Object.prototype.hasOwnProperty.call(exports, key)) return;\n",
    "  Object.defineProperty(exports, key, { enumerable: true, get: function () { return ",
    binding,
    "[key]; } });\n",
    "});\n"
  )
}

fn collect_declared_names<'a>(declaration: &'a Declaration<'_>, names: &mut Vec<&'a str>) {
  match declaration {
    Declaration::VariableDeclaration(decl) => {
      for declarator in &decl.declarations {
        collect_binding_names(&declarator.id, names);
      }
    }
    Declaration::FunctionDeclaration(func) => {
      names.extend(func.id.as_ref().map(|id| id.name.as_str()));
    }
    Declaration::ClassDeclaration(class) => {
      names.extend(class.id.as_ref().map(|id| id.name.as_str()));
    }
    _ => {}
  }
}

fn collect_binding_names<'a>(pattern: &'a BindingPattern<'_>, names: &mut Vec<&'a str>) {
  match &pattern.kind {
    BindingPatternKind::BindingIdentifier(id) => names.push(id.name.as_str()),
    BindingPatternKind::ObjectPattern(object) => {
      for property in &object.properties {
        collect_binding_names(&property.value, names);
      }
      if let Some(rest) = &object.rest {
        collect_binding_names(&rest.argument, names);
      }
    }
    BindingPatternKind::ArrayPattern(array) => {
      for element in array.elements.iter().flatten() {
        collect_binding_names(element, names);
      }
      if let Some(rest) = &array.rest {
        collect_binding_names(&rest.argument, names);
      }
    }
    BindingPatternKind::AssignmentPattern(assignment) => {
      collect_binding_names(&assignment.left, names);
    }
  }
}
