use std::{
  fmt::Display,
  path::{Path, PathBuf},
};

use arcstr::ArcStr;
use minipack_utils::concat_string;
use serde::{Serialize, Serializer};
use sugar_path::SugarPath;

/// `ModuleId` is the canonical path of a module: `./` followed by the slash separated path of the
/// file relative to the project root, e.g. `./src/add.js`.
/// - It is the unique key of a module in the dependency graph and in the emitted bundle.
/// - It must only be produced by [`ModuleId::canonicalize`] so build time and runtime agree.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct ModuleId(ArcStr);

impl ModuleId {
  pub fn new(value: impl Into<ArcStr>) -> Self {
    Self(value.into())
  }

  /// Normalizes `path`, joining it to `cwd` when relative, and makes it relative to `cwd`.
  pub fn canonicalize(cwd: &Path, path: &Path) -> Self {
    let absolute = if path.is_absolute() { path.normalize() } else { cwd.join(path).normalize() };
    let relative = absolute.relative(cwd);

    // Different roots (e.g. another drive on Windows), keep the absolute path.
    if relative.is_absolute() {
      return Self::new(relative.to_slash_lossy().into_owned());
    }

    let relative = relative.to_slash_lossy();
    if relative.starts_with("../") || relative == ".." {
      Self::new(relative.into_owned())
    } else {
      Self::new(concat_string!("./", relative))
    }
  }

  /// Location of the module on disk.
  pub fn to_absolute(&self, cwd: &Path) -> PathBuf {
    let path = Path::new(self.as_str());
    if path.is_absolute() {
      path.normalize()
    } else {
      cwd.join(path).normalize()
    }
  }

  /// Directory that specifiers written inside this module are relative to.
  pub fn dir(&self, cwd: &Path) -> PathBuf {
    let absolute = self.to_absolute(cwd);
    absolute.parent().map_or_else(|| cwd.to_path_buf(), Path::to_path_buf)
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl std::ops::Deref for ModuleId {
  type Target = str;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl AsRef<str> for ModuleId {
  fn as_ref(&self) -> &str {
    self
  }
}

impl From<ArcStr> for ModuleId {
  fn from(value: ArcStr) -> Self {
    Self::new(value)
  }
}

impl Display for ModuleId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl Serialize for ModuleId {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.0)
  }
}

#[test]
fn test_canonicalize() {
  let cwd = Path::new("/project");

  assert_eq!(ModuleId::canonicalize(cwd, Path::new("src/index.js")).as_str(), "./src/index.js");
  assert_eq!(ModuleId::canonicalize(cwd, Path::new("./src/../src/add.js")).as_str(), "./src/add.js");
  assert_eq!(ModuleId::canonicalize(cwd, Path::new("/project/src/add.js")).as_str(), "./src/add.js");
  assert_eq!(ModuleId::canonicalize(cwd, Path::new("/shared/math.js")).as_str(), "../shared/math.js");
}

#[test]
fn test_round_trip_to_absolute() {
  let cwd = Path::new("/project");
  let id = ModuleId::canonicalize(cwd, Path::new("src/lib/add.js"));

  assert_eq!(id.to_absolute(cwd), Path::new("/project/src/lib/add.js"));
  assert_eq!(id.dir(cwd), Path::new("/project/src/lib"));
  assert_eq!(ModuleId::canonicalize(cwd, &id.to_absolute(cwd)), id);
}
