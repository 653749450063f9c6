use std::{borrow::Cow, ffi::OsStr, path::Path};

pub trait PathExt {
  fn representative_file_name(&self) -> Cow<str>;
}

impl PathExt for Path {
  /// It doesn't ensure the file name is a valid identifier in JS.
  fn representative_file_name(&self) -> Cow<str> {
    let file_name =
      self.file_stem().map_or_else(|| self.to_string_lossy(), |stem| stem.to_string_lossy());

    match &*file_name {
      // "index": Node.js use `index` as a special name for directory import.
      // "mod": https://docs.deno.com/runtime/manual/references/contributing/style_guide#do-not-use-the-filename-indextsindexjs.
      "index" | "mod" => self
        .parent()
        .and_then(Path::file_stem)
        .map(OsStr::to_string_lossy)
        .map_or(file_name, |parent_dir_name| parent_dir_name),
      _ => file_name,
    }
  }
}

#[test]
fn test_representative_file_name() {
  let cwd = Path::new(".").join("project");
  let path = cwd.join("src").join("add.js");
  assert_eq!(path.representative_file_name(), "add");

  let path = cwd.join("math").join("index.js");
  assert_eq!(path.representative_file_name(), "math");

  let path = Path::new("./utils/mod.mjs");
  assert_eq!(path.representative_file_name(), "utils");
}
