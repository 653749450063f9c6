// Maps import specifiers to canonical module ids on top of `minipack_fs`.

mod resolver;

pub use crate::resolver::Resolver;

pub const DEFAULT_EXTENSIONS: [&str; 3] = [".js", ".mjs", ".cjs"];
