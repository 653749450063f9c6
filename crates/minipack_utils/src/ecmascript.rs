use std::borrow::Cow;

use oxc::syntax::identifier;

use crate::concat_string;

pub fn is_validate_identifier_name(name: &str) -> bool {
  identifier::is_identifier_name(name)
}

/// `exports.foo` when `prop` is a valid identifier, `exports["foo-bar"]` otherwise.
pub fn property_access_str(obj: &str, prop: &str) -> String {
  if is_validate_identifier_name(prop) {
    concat_string!(obj, ".", prop)
  } else {
    concat_string!(obj, "[", to_string_literal(prop), "]")
  }
}

/// Quotes `value` as a JavaScript string literal.
pub fn to_string_literal(value: &str) -> String {
  // A JSON string is always a valid JavaScript string literal.
  serde_json::Value::String(value.to_string()).to_string()
}

/// Turns an arbitrary name, such as a file stem, into a valid JavaScript identifier.
pub fn legitimize_identifier_name(name: &str) -> Cow<str> {
  let mut legitimized = String::new();
  let mut chars_indices = name.char_indices();

  let mut first_invalid_char_index = None;

  if let Some((idx, first_char)) = chars_indices.next() {
    if !identifier::is_identifier_start(first_char) {
      first_invalid_char_index = Some(idx);
    }
  }

  if first_invalid_char_index.is_none() {
    first_invalid_char_index =
      chars_indices.find(|(_idx, char)| !identifier::is_identifier_part(*char)).map(|(idx, _)| idx);
  }

  let Some(first_invalid_char_index) = first_invalid_char_index else {
    return Cow::Borrowed(name);
  };

  let (valid_prefix, rest_part) = name.split_at(first_invalid_char_index);
  legitimized.push_str(valid_prefix);
  for char in rest_part.chars() {
    if identifier::is_identifier_part(char) {
      legitimized.push(char);
    } else {
      legitimized.push('_');
    }
  }

  if legitimized.starts_with(|c: char| c.is_ascii_digit()) {
    legitimized.insert(0, '_');
  }

  Cow::Owned(legitimized)
}

#[test]
fn test_is_validate_identifier_name() {
  assert!(is_validate_identifier_name("foo"));
  assert!(!is_validate_identifier_name("1aaaa"));
  assert!(!is_validate_identifier_name("😈"));
}

#[test]
fn test_property_access_str() {
  assert_eq!(property_access_str("exports", "add"), "exports.add");
  assert_eq!(property_access_str("exports", "my-add"), "exports[\"my-add\"]");
}

#[test]
fn test_legitimize_identifier_name() {
  assert_eq!(legitimize_identifier_name("add"), "add");
  assert_eq!(legitimize_identifier_name("my-add"), "my_add");
  assert_eq!(legitimize_identifier_name("1st"), "_1st");
  assert_eq!(legitimize_identifier_name("a b.c"), "a_b_c");
}
