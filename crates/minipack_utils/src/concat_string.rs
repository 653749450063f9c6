/// Concatenates string-like expressions into a `String`, evaluating each of them once.
#[macro_export]
macro_rules! concat_string {
  () => { String::new() };
  ($($s:expr),+ $(,)?) => {{
    let mut buf = String::new();
    $(buf.push_str(AsRef::<str>::as_ref(&$s));)+
    buf
  }};
}

#[test]
fn test_concat_string() {
  let name = String::from("add");
  assert_eq!(concat_string!("exports.", name, " = ", &name, ";"), "exports.add = add;");
  assert_eq!(concat_string!(), "");
}
