use std::{fmt::Display, str::FromStr};

/// How a module body is stored in the emitted module registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CodeEmbedding {
  /// `"code": function (require, exports, module) { ... }`
  #[default]
  Function,
  /// `"code": "..."`, turned into a function by the runtime when the module is first required.
  String,
}

impl FromStr for CodeEmbedding {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "function" => Ok(Self::Function),
      "string" => Ok(Self::String),
      _ => Err(format!("Invalid code embedding \"{s}\".")),
    }
  }
}

impl Display for CodeEmbedding {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Function => write!(f, "function"),
      Self::String => write!(f, "string"),
    }
  }
}
