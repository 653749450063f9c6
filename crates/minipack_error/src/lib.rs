mod build_diagnostic;

use std::ops::{Deref, DerefMut};

pub use crate::build_diagnostic::BuildDiagnostic;

#[derive(Debug)]
pub struct BuildError(pub Vec<BuildDiagnostic>);

impl BuildError {
  pub fn into_vec(self) -> Vec<BuildDiagnostic> {
    self.0
  }
}

impl Deref for BuildError {
  type Target = Vec<BuildDiagnostic>;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl DerefMut for BuildError {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.0
  }
}

impl From<BuildDiagnostic> for BuildError {
  fn from(diagnostic: BuildDiagnostic) -> Self {
    Self(vec![diagnostic])
  }
}

impl From<Vec<BuildDiagnostic>> for BuildError {
  fn from(diagnostics: Vec<BuildDiagnostic>) -> Self {
    Self(diagnostics)
  }
}

impl From<anyhow::Error> for BuildError {
  fn from(error: anyhow::Error) -> Self {
    Self(vec![BuildDiagnostic::unhandleable(error)])
  }
}

impl std::fmt::Display for BuildError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for (idx, diagnostic) in self.0.iter().enumerate() {
      if idx > 0 {
        writeln!(f)?;
      }
      write!(f, "{diagnostic}")?;
    }
    Ok(())
  }
}

impl std::error::Error for BuildError {}

pub type BuildResult<T> = Result<T, BuildError>;

#[test]
fn collects_diagnostics() {
  let mut error = BuildError::from(BuildDiagnostic::invalid_option("`input` is required"));
  error.push(BuildDiagnostic::cyclic_import(vec!["./a.js".into(), "./b.js".into(), "./a.js".into()]));

  assert_eq!(error.len(), 2);
  assert_eq!(
    error.to_string(),
    "Invalid option: `input` is required\nCircular import detected: ./a.js -> ./b.js -> ./a.js"
  );
}
