use std::path::PathBuf;

use clap::Args;

use crate::types::es_target::ESTarget;

#[derive(Args)]
pub struct InputArgs {
  /// Project root, canonical module paths are relative to it.
  #[clap(long)]
  pub cwd: Option<PathBuf>,

  /// Entry module, relative to the project root.
  #[clap(long, short = 'i')]
  pub input: Option<String>,

  /// Extensions tried when an import has none, in order.
  #[clap(long = "extension", action = clap::ArgAction::Append)]
  pub extensions: Option<Vec<String>>,
}

#[derive(Args)]
pub struct OutputArgs {
  /// Bundle path, relative to the project root.
  #[clap(long, short = 'o')]
  pub file: Option<String>,

  /// Run a module body on every `require` instead of once.
  #[clap(long)]
  pub no_module_cache: bool,

  /// Embed module bodies as strings evaluated at runtime.
  #[clap(long)]
  pub embed_code_as_string: bool,
}

#[derive(Args)]
pub struct EnhanceArgs {
  #[clap(long, short = 'm')]
  pub minify: bool,

  #[clap(long)]
  pub target: Option<ESTarget>,

  #[clap(long, short = 's')]
  pub silent: bool,
}
