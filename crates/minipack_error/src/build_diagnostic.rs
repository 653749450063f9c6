use std::{io, path::PathBuf};

use itertools::Itertools;

/// Every way a build can fail. All of them abort the build, there is no partial output.
#[derive(Debug, thiserror::Error)]
pub enum BuildDiagnostic {
  #[error("Could not load {path}{} - {source}.", importer_hint(.importer.as_deref()))]
  Io {
    path: String,
    importer: Option<String>,
    #[source]
    source: io::Error,
  },

  #[error("Failed to write {}: {source}", .path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Failed to parse {path}:\n{}", .messages.join("\n"))]
  Syntax { path: String, messages: Vec<String> },

  #[error("Failed to transform {path}:\n{}", .messages.join("\n"))]
  Transform { path: String, messages: Vec<String> },

  #[error("Could not resolve {specifier:?} from {importer}{}", resolved_hint(.resolved.as_deref()))]
  UnresolvedDependency { importer: String, specifier: String, resolved: Option<String> },

  #[error("Circular import detected: {}", .cycle.iter().join(" -> "))]
  CyclicImport { cycle: Vec<String> },

  #[error("Invalid option: {0}")]
  InvalidOption(String),

  #[error(transparent)]
  Unhandleable(anyhow::Error),
}

impl BuildDiagnostic {
  pub fn io(path: impl Into<String>, importer: Option<String>, source: io::Error) -> Self {
    Self::Io { path: path.into(), importer, source }
  }

  pub fn syntax(path: impl Into<String>, messages: Vec<String>) -> Self {
    Self::Syntax { path: path.into(), messages }
  }

  pub fn transform(path: impl Into<String>, messages: Vec<String>) -> Self {
    Self::Transform { path: path.into(), messages }
  }

  pub fn unresolved_dependency(
    importer: impl Into<String>,
    specifier: impl Into<String>,
    resolved: Option<String>,
  ) -> Self {
    Self::UnresolvedDependency { importer: importer.into(), specifier: specifier.into(), resolved }
  }

  pub fn cyclic_import(cycle: Vec<String>) -> Self {
    Self::CyclicImport { cycle }
  }

  pub fn invalid_option(message: impl Into<String>) -> Self {
    Self::InvalidOption(message.into())
  }

  pub fn unhandleable(error: anyhow::Error) -> Self {
    Self::Unhandleable(error)
  }

  pub fn kind(&self) -> &'static str {
    match self {
      Self::Io { .. } | Self::Write { .. } => "IOError",
      Self::Syntax { .. } => "SyntaxError",
      Self::Transform { .. } => "TransformError",
      Self::UnresolvedDependency { .. } => "UnresolvedDependencyError",
      Self::CyclicImport { .. } => "CyclicImportError",
      Self::InvalidOption(_) => "InvalidOptionError",
      Self::Unhandleable(_) => "UnhandleableError",
    }
  }
}

fn importer_hint(importer: Option<&str>) -> String {
  importer.map(|importer| format!(" (imported by {importer})")).unwrap_or_default()
}

fn resolved_hint(resolved: Option<&str>) -> String {
  resolved.map(|resolved| format!(" ({resolved} is not part of the module graph)")).unwrap_or_default()
}

#[test]
fn io_message_names_importer() {
  let diagnostic = BuildDiagnostic::io(
    "./src/missing.js",
    Some("./src/index.js".to_string()),
    io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
  );
  assert_eq!(diagnostic.kind(), "IOError");
  assert_eq!(
    diagnostic.to_string(),
    "Could not load ./src/missing.js (imported by ./src/index.js) - No such file or directory."
  );
}
