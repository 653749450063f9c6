use minipack_common::ModuleId;
use minipack_error::BuildResult;

#[derive(Debug, Default, Clone)]
pub struct TransformedModule {
  /// Import specifiers of the module's top-level import and re-export statements, verbatim and
  /// in source order.
  pub specifiers: Vec<String>,
  /// Module body that loads its dependencies with `require(specifier)` and publishes its
  /// bindings on `exports`.
  pub code: String,
}

/// Turns the source text of one module into something the runtime can execute.
///
/// Implementations must keep every specifier they report reachable through `require` with the
/// exact same string, since the runtime looks specifiers up verbatim.
pub trait ModuleTransformer: Send + Sync {
  fn transform(&self, id: &ModuleId, source: &str) -> BuildResult<TransformedModule>;
}
