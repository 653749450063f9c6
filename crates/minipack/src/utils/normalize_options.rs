use minipack_common::{BundlerOptions, NormalizedBundlerOptions};
use minipack_error::{BuildDiagnostic, BuildResult};
use minipack_resolver::DEFAULT_EXTENSIONS;

pub fn normalize_options(raw_options: BundlerOptions) -> BuildResult<NormalizedBundlerOptions> {
  let input = match raw_options.input {
    Some(input) if !input.trim().is_empty() => input,
    _ => Err(BuildDiagnostic::invalid_option("You must supply options.input to minipack"))?,
  };

  let cwd = match raw_options.cwd {
    Some(cwd) => cwd,
    None => std::env::current_dir().map_err(|err| {
      BuildDiagnostic::invalid_option(format!("Failed to get the current directory: {err}"))
    })?,
  };

  let extensions = raw_options
    .extensions
    .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect());
  if let Some(ext) = extensions.iter().find(|ext| !ext.starts_with('.')) {
    Err(BuildDiagnostic::invalid_option(format!("Extension {ext:?} must start with a dot")))?;
  }

  Ok(NormalizedBundlerOptions {
    input,
    cwd,
    extensions,
    target: raw_options.target.unwrap_or_default(),
    file: raw_options.file.unwrap_or_else(|| "dist/bundle.js".to_string()),
    module_cache: raw_options.module_cache.unwrap_or(true),
    code_embedding: raw_options.code_embedding.unwrap_or_default(),
    minify: raw_options.minify.unwrap_or(false),
  })
}

#[test]
fn fills_in_defaults() {
  use minipack_common::{CodeEmbedding, ESTarget};

  let options = normalize_options(BundlerOptions {
    input: Some("./src/index.js".to_string()),
    cwd: Some("/project".into()),
    ..Default::default()
  })
  .unwrap();

  assert_eq!(options.file, "dist/bundle.js");
  assert_eq!(options.output_path(), std::path::Path::new("/project/dist/bundle.js"));
  assert_eq!(options.extensions, [".js", ".mjs", ".cjs"]);
  assert_eq!(options.target, ESTarget::EsNext);
  assert_eq!(options.code_embedding, CodeEmbedding::Function);
  assert!(options.module_cache);
  assert!(!options.minify);
}

#[test]
fn requires_input() {
  let err = normalize_options(BundlerOptions::default()).unwrap_err();
  assert_eq!(err[0].kind(), "InvalidOptionError");

  let err = normalize_options(BundlerOptions {
    input: Some("./index.js".to_string()),
    extensions: Some(vec!["js".to_string()]),
    ..Default::default()
  })
  .unwrap_err();
  assert_eq!(err[0].to_string(), "Invalid option: Extension \"js\" must start with a dot");
}
