use std::{
  io::{ErrorKind, Write},
  process::{Command, Output, Stdio},
};

use minipack::{
  Bundler, BundlerOptions, CodeEmbedding, DependencyGraph, ModuleId, ModuleInfo,
};
use minipack_fs::MemoryFileSystem;

fn options() -> BundlerOptions {
  BundlerOptions {
    input: Some("./src/index.js".to_string()),
    cwd: Some("/project".into()),
    ..Default::default()
  }
}

/// Runs `code` with node, or returns `None` when node is not installed.
fn run_with_node(code: &str) -> Option<Output> {
  let mut child = match Command::new("node")
    .arg("-")
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .spawn()
  {
    Ok(child) => child,
    Err(err) if err.kind() == ErrorKind::NotFound => {
      eprintln!("node is not installed, skipping");
      return None;
    }
    Err(err) => panic!("failed to spawn node: {err}"),
  };

  child.stdin.take().unwrap().write_all(code.as_bytes()).unwrap();
  Some(child.wait_with_output().expect("failed to wait on node"))
}

/// Bundles `files` and returns what the bundle prints, or `None` without node.
async fn execute(files: &[(&str, &str)], options: BundlerOptions) -> Option<String> {
  let bundler = Bundler::with_file_system(options, MemoryFileSystem::new(files)).unwrap();
  let output = bundler.generate().await.unwrap();

  let output = run_with_node(&output.assets[0].content)?;
  assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
  Some(String::from_utf8(output.stdout).unwrap())
}

const DIAMOND: [(&str, &str); 4] = [
  ("/project/src/index.js", "import { a } from './a.js';\nimport { b } from './b.js';\nconsole.log('runs', globalThis.runs, a === b);"),
  ("/project/src/a.js", "import { shared } from './shared.js';\nexport const a = shared;"),
  ("/project/src/b.js", "import { shared } from './shared.js';\nexport const b = shared;"),
  ("/project/src/shared.js", "globalThis.runs = (globalThis.runs || 0) + 1;\nexport const shared = {};"),
];

#[tokio::test]
async fn runs_entry_with_named_import() {
  let Some(stdout) = execute(
    &[
      ("/project/src/index.js", "import { add } from './add.js';\nconsole.log(add(1, 2));"),
      ("/project/src/add.js", "export function add(a, b) {\n  return a + b;\n}"),
    ],
    options(),
  )
  .await
  else {
    return;
  };

  assert_eq!(stdout, "3\n");
}

#[tokio::test]
async fn cached_modules_run_once() {
  let Some(stdout) = execute(&DIAMOND, options()).await else {
    return;
  };

  assert_eq!(stdout, "runs 1 true\n");
}

#[tokio::test]
async fn uncached_modules_run_per_require() {
  let Some(stdout) =
    execute(&DIAMOND, BundlerOptions { module_cache: Some(false), ..options() }).await
  else {
    return;
  };

  assert_eq!(stdout, "runs 2 false\n");
}

#[tokio::test]
async fn string_embedded_modules_run() {
  let Some(stdout) = execute(
    &DIAMOND,
    BundlerOptions { code_embedding: Some(CodeEmbedding::String), ..options() },
  )
  .await
  else {
    return;
  };

  assert_eq!(stdout, "runs 1 true\n");
}

#[tokio::test]
async fn specifiers_resolve_through_own_module() {
  let Some(stdout) = execute(
    &[
      (
        "/project/src/index.js",
        "import { name } from './util.js';\nimport { nested } from './lib/index.js';\nconsole.log(name, nested);",
      ),
      ("/project/src/util.js", "export const name = 'top';"),
      ("/project/src/lib/index.js", "import { name } from './util.js';\nexport const nested = name;"),
      ("/project/src/lib/util.js", "export const name = 'nested';"),
    ],
    options(),
  )
  .await
  else {
    return;
  };

  assert_eq!(stdout, "top nested\n");
}

#[tokio::test]
async fn honors_module_exports_reassignment() {
  let Some(stdout) = execute(
    &[
      ("/project/src/index.js", "import * as data from './data.js';\nconsole.log(data.answer);"),
      ("/project/src/data.js", "module.exports = { answer: 42 };"),
    ],
    options(),
  )
  .await
  else {
    return;
  };

  assert_eq!(stdout, "42\n");
}

#[tokio::test]
async fn imported_bindings_are_live() {
  let Some(stdout) = execute(
    &[
      (
        "/project/src/index.js",
        "import { n, inc } from './counter.js';\ninc();\nconsole.log('live', n);",
      ),
      ("/project/src/counter.js", "export let n = 0;\nexport function inc() {\n  n++;\n}"),
    ],
    options(),
  )
  .await
  else {
    return;
  };

  assert_eq!(stdout, "live 1\n");
}

#[tokio::test]
async fn runs_modules_without_semicolons() {
  let Some(stdout) = execute(
    &[
      (
        "/project/src/index.js",
        "const a = 1\nimport { b } from './b.js'\n[a, b].forEach((v) => console.log('asi', v))",
      ),
      ("/project/src/b.js", "export const b = 2"),
    ],
    options(),
  )
  .await
  else {
    return;
  };

  assert_eq!(stdout, "asi 1\nasi 2\n");
}

#[tokio::test]
async fn module_body_has_no_this() {
  let Some(stdout) =
    execute(&[("/project/src/index.js", "console.log(typeof this);")], options()).await
  else {
    return;
  };

  assert_eq!(stdout, "undefined\n");
}

#[tokio::test]
async fn unknown_specifier_throws() {
  let Some(stdout) = execute(
    &[(
      "/project/src/index.js",
      "try {\n  require('./nope.js');\n} catch (err) {\n  console.log(err.message);\n}",
    )],
    options(),
  )
  .await
  else {
    return;
  };

  assert_eq!(stdout, "Cannot find module './nope.js' from './src/index.js'\n");
}

#[test]
fn module_missing_from_bundle_throws() {
  let bundler = Bundler::with_file_system(options(), MemoryFileSystem::default()).unwrap();
  let entry = ModuleId::new("./src/index.js");
  let module = ModuleInfo {
    id: entry.clone(),
    dependency_map: [("./gone.js".to_string(), ModuleId::new("./src/gone.js"))].into_iter().collect(),
    code: "require(\"./gone.js\");".to_string(),
  };
  let graph = DependencyGraph::new(entry.clone(), [(entry, module)].into_iter().collect());

  let code = bundler.emit(&graph).unwrap();
  let Some(output) = run_with_node(&code) else {
    return;
  };

  assert!(!output.status.success());
  assert!(
    String::from_utf8_lossy(&output.stderr).contains("Module './src/gone.js' is not in the bundle")
  );
}
