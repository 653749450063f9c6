use std::{
  path::Path,
  sync::{Arc, Mutex},
};

use minipack::{
  BuildResult, Bundler, BundlerOptions, CodeEmbedding, EcmaTransformer, ModuleId,
  ModuleTransformer, TransformedModule,
};
use minipack_ecmascript::EcmaCompiler;
use minipack_fs::{FileSystem, MemoryFileSystem};
use oxc::span::SourceType;

fn options() -> BundlerOptions {
  BundlerOptions {
    input: Some("./src/index.js".to_string()),
    cwd: Some("/project".into()),
    ..Default::default()
  }
}

fn bundler(files: &[(&str, &str)], options: BundlerOptions) -> (Bundler, MemoryFileSystem) {
  let fs = MemoryFileSystem::new(files);
  let bundler = Bundler::with_file_system(options, fs.clone()).unwrap();
  (bundler, fs)
}

fn assert_valid_script(code: &str) {
  EcmaCompiler::parse("bundle.js", code.to_string(), SourceType::cjs()).unwrap();
}

/// Records every module it is asked to transform.
struct RecordingTransformer {
  inner: EcmaTransformer,
  seen: Arc<Mutex<Vec<String>>>,
}

impl ModuleTransformer for RecordingTransformer {
  fn transform(&self, id: &ModuleId, source: &str) -> BuildResult<TransformedModule> {
    self.seen.lock().unwrap().push(id.to_string());
    self.inner.transform(id, source)
  }
}

#[tokio::test]
async fn bundles_named_import() {
  let (bundler, fs) = bundler(
    &[
      ("/project/src/index.js", "import { add } from './add.js';\nconsole.log(add(1, 2));\n"),
      ("/project/src/add.js", "export function add(a, b) {\n  return a + b;\n}\n"),
    ],
    options(),
  );

  let graph = bundler.build_graph().await.unwrap();
  assert_eq!(graph.entry().as_str(), "./src/index.js");
  assert_eq!(graph.modules().len(), 2);
  let entry = graph.get(graph.entry()).unwrap();
  assert_eq!(entry.dependency_map["./add.js"].as_str(), "./src/add.js");
  assert!(entry.code.contains("require(\"./add.js\")"));
  assert!(graph.get(&ModuleId::new("./src/add.js")).unwrap().dependency_map.is_empty());

  let output = bundler.write().await.unwrap();
  let written = fs.read_to_string(Path::new("/project/dist/bundle.js")).unwrap();
  assert_eq!(written, output.assets[0].content);
  assert!(written.starts_with("/* minipack: entry ./src/index.js, 2 modules */"));
  assert!(written.contains("\"./src/add.js\": {\n    \"deps\": {},"));
  assert!(written.ends_with("\"./src/index.js\", true);\n"));
  assert_valid_script(&written);
}

#[tokio::test]
async fn bundles_entry_without_imports() {
  let (bundler, _) = bundler(&[("/project/src/index.js", "console.log('alone');")], options());

  let graph = bundler.build_graph().await.unwrap();
  assert_eq!(graph.modules().len(), 1);
  assert!(graph.modules().all(|module| module.dependency_map.is_empty()));

  let code = bundler.emit(&graph).unwrap();
  assert!(code.starts_with("/* minipack: entry ./src/index.js, 1 module */"));
  assert_valid_script(&code);
}

#[tokio::test]
async fn extracts_shared_dependency_once() {
  let files = [
    ("/project/src/index.js", "import './a.js';\nimport './b.js';"),
    ("/project/src/a.js", "import { c } from './c.js';\nexport const a = c;"),
    ("/project/src/b.js", "import { c } from './c';\nexport const b = c;"),
    ("/project/src/c.js", "export const c = 'c';"),
  ];
  let seen = Arc::new(Mutex::new(vec![]));
  let (bundler, _) = bundler(&files, options());
  let bundler = bundler.with_transformer(RecordingTransformer {
    inner: EcmaTransformer::default(),
    seen: Arc::clone(&seen),
  });

  let graph = bundler.build_graph().await.unwrap();

  assert_eq!(graph.modules().len(), 4);
  let mut seen = seen.lock().unwrap().clone();
  seen.sort();
  assert_eq!(seen, ["./src/a.js", "./src/b.js", "./src/c.js", "./src/index.js"]);
  // Dependencies come before their importers.
  assert_eq!(graph.module_ids().next().unwrap().as_str(), "./src/c.js");
  assert_eq!(graph.module_ids().last().unwrap().as_str(), "./src/index.js");
}

#[tokio::test]
async fn reports_import_cycles() {
  let (bundler, _) = bundler(
    &[
      ("/project/src/index.js", "import { a } from './a.js';\nexport const main = a;"),
      ("/project/src/a.js", "import { main } from './index.js';\nexport const a = 1;"),
    ],
    options(),
  );

  let err = bundler.build_graph().await.unwrap_err();

  assert_eq!(err.len(), 1);
  assert_eq!(err[0].kind(), "CyclicImportError");
  assert_eq!(
    err[0].to_string(),
    "Circular import detected: ./src/index.js -> ./src/a.js -> ./src/index.js"
  );
}

#[tokio::test]
async fn reports_self_import() {
  let (bundler, _) =
    bundler(&[("/project/src/index.js", "import './index.js';\nconsole.log(1);")], options());

  let err = bundler.write().await.unwrap_err();

  assert_eq!(err[0].kind(), "CyclicImportError");
}

#[tokio::test]
async fn reports_every_missing_module() {
  let (bundler, fs) = bundler(
    &[("/project/src/index.js", "import './missing-a.js';\nimport './missing-b.js';")],
    options(),
  );

  let err = bundler.write().await.unwrap_err();

  assert_eq!(err.len(), 2);
  assert!(err.iter().all(|diagnostic| diagnostic.kind() == "IOError"));
  let mut messages = err.iter().map(ToString::to_string).collect::<Vec<_>>();
  messages.sort();
  assert!(messages[0].starts_with("Could not load ./src/missing-a.js (imported by ./src/index.js)"));
  assert!(!fs.is_file(Path::new("/project/dist/bundle.js")));
}

#[tokio::test]
async fn reports_missing_entry() {
  let (bundler, _) = bundler(&[], options());

  let err = bundler.build_graph().await.unwrap_err();

  assert_eq!(err[0].kind(), "IOError");
  assert!(err[0].to_string().starts_with("Could not load ./src/index.js - "));
}

#[tokio::test]
async fn reports_syntax_errors() {
  let (bundler, _) = bundler(
    &[
      ("/project/src/index.js", "import './broken.js';"),
      ("/project/src/broken.js", "export const = 1;"),
    ],
    options(),
  );

  let err = bundler.build_graph().await.unwrap_err();

  assert_eq!(err[0].kind(), "SyntaxError");
  assert!(err[0].to_string().contains("./src/broken.js"));
}

#[tokio::test]
async fn rejects_bare_specifiers() {
  let (bundler, _) =
    bundler(&[("/project/src/index.js", "import React from 'react';")], options());

  let err = bundler.build_graph().await.unwrap_err();

  assert_eq!(err[0].kind(), "UnresolvedDependencyError");
  assert!(err[0].to_string().contains("\"react\""));
}

#[tokio::test]
async fn embeds_code_as_strings() {
  let (bundler, _) = bundler(
    &[
      ("/project/src/index.js", "import { add } from './add.js';\nconsole.log(add(1, 2));"),
      ("/project/src/add.js", "export const add = (a, b) => a + b;"),
    ],
    BundlerOptions {
      code_embedding: Some(CodeEmbedding::String),
      module_cache: Some(false),
      ..options()
    },
  );

  let graph = bundler.build_graph().await.unwrap();
  let code = bundler.emit(&graph).unwrap();

  let registry = serde_json::to_string(&graph).unwrap();
  assert!(registry.starts_with("{\"./src/add.js\":{\"deps\":{},\"code\":\""));
  assert!(code.contains(&format!("({registry}, \"./src/index.js\", false);")));
  assert_valid_script(&code);
}

#[tokio::test]
async fn writes_minified_bundle_to_custom_file() {
  let (bundler, fs) = bundler(
    &[("/project/src/index.js", "const message = 'hello';\nconsole.log(message);")],
    BundlerOptions { file: Some("out/app.js".to_string()), minify: Some(true), ..options() },
  );

  bundler.write().await.unwrap();

  let written = fs.read_to_string(Path::new("/project/out/app.js")).unwrap();
  assert!(written.contains("console.log"));
  assert_valid_script(&written);
}

#[test]
fn requires_input() {
  let Err(err) = Bundler::with_file_system(BundlerOptions::default(), MemoryFileSystem::default())
  else {
    panic!("missing input must be rejected");
  };

  assert_eq!(err[0].kind(), "InvalidOptionError");
}
