use minipack_common::{
  CodeEmbedding, DependencyGraph, NormalizedBundlerOptions, OutputAsset, SourceJoiner,
};
use minipack_ecmascript::EcmaCompiler;
use minipack_error::{BuildDiagnostic, BuildResult};
use minipack_utils::{concat_string, ecmascript::to_string_literal};

use crate::types::bundle_output::BundleOutput;

/// `(function (modules, entry, useCache) { ... })`, called with the module registry.
const RUNTIME: &str = include_str!("../../runtime/runtime.js");

pub struct GenerateStage<'a> {
  graph: &'a DependencyGraph,
  options: &'a NormalizedBundlerOptions,
}

impl<'a> GenerateStage<'a> {
  pub fn new(graph: &'a DependencyGraph, options: &'a NormalizedBundlerOptions) -> Self {
    Self { graph, options }
  }

  pub fn generate(&self) -> BuildResult<BundleOutput> {
    let mut content = self.render()?;
    if self.options.minify {
      content = EcmaCompiler::minify(&content, self.options.target.into());
    }

    Ok(BundleOutput { assets: vec![OutputAsset { filename: self.options.file.clone(), content }] })
  }

  /// Renders the self-invoking bundle that runs the entry module.
  pub fn render(&self) -> BuildResult<String> {
    let registry = match self.options.code_embedding {
      CodeEmbedding::Function => render_function_registry(self.graph)?,
      CodeEmbedding::String => serde_json::to_string(self.graph)
        .map_err(|err| BuildDiagnostic::unhandleable(err.into()))?,
    };

    let mut source_joiner = SourceJoiner::default();
    source_joiner.append_source(render_banner(self.graph));
    source_joiner.append_source(concat_string!(
      RUNTIME.trim_end(),
      "(",
      registry,
      ", ",
      to_string_literal(self.graph.entry()),
      ", ",
      if self.options.module_cache { "true" } else { "false" },
      ");\n"
    ));

    Ok(source_joiner.join())
  }
}

fn render_banner(graph: &DependencyGraph) -> String {
  let count = graph.modules().len();
  let modules = if count == 1 { "module" } else { "modules" };
  // Keep the comment closed whatever the entry path contains.
  let entry = graph.entry().replace("*/", "*\\/");
  format!("/* minipack: entry {entry}, {count} {modules} */")
}

/// Same shape as the serialized graph, with `code` emitted as a function instead of a string.
fn render_function_registry(graph: &DependencyGraph) -> BuildResult<String> {
  let mut registry = String::from("{\n");
  for (idx, module) in graph.modules().enumerate() {
    if idx > 0 {
      registry.push_str(",\n");
    }
    let deps = serde_json::to_string(&module.dependency_map)
      .map_err(|err| BuildDiagnostic::unhandleable(err.into()))?;
    registry.push_str(&concat_string!(
      "  ",
      to_string_literal(&module.id),
      ": {\n    \"deps\": ",
      deps,
      ",\n    \"code\": function (require, exports, module) {\n",
      module.code.trim_end(),
      "\n    }\n  }"
    ));
  }
  registry.push_str("\n}");
  Ok(registry)
}
