use crate::options::{OptionValue, Options};

#[test]
fn test_options_defaults() {
  let options = Options::new();
  assert_eq!(options.chunk_size_or(1024), 1024);
  assert_eq!(options.chunk_size_or(4096), 4096);
  assert!(!options.direct());
  assert!(options.append());
  assert_eq!(options.encoding().unwrap(), encoding_rs::UTF_8);
}

#[test]
fn test_options_builder_chain() {
  let options = Options::new()
    .with_chunk_size(8192)
    .with_direct(true)
    .with_append(false)
    .with_encoding("windows-1252");

  assert_eq!(options.chunk_size_or(1024), 8192);
  assert!(options.direct());
  assert!(!options.append());
  assert_eq!(options.encoding().unwrap(), encoding_rs::WINDOWS_1252);
}

#[test]
fn test_options_unknown_keys_are_ignored() {
  let options = Options::new()
    .set("no-such-option", OptionValue::Bool(true))
    .set("another", OptionValue::Str("whatever".to_string()));

  assert_eq!(options.chunk_size_or(1024), 1024);
  assert!(!options.direct());
  assert!(options.append());
  assert_eq!(
    options.get("no-such-option"),
    Some(&OptionValue::Bool(true))
  );
}

#[test]
fn test_options_zero_chunk_size_falls_back() {
  let options = Options::new().with_chunk_size(0);
  assert_eq!(options.chunk_size_or(1024), 1024);
}

#[test]
fn test_options_encoding_labels_are_loose() {
  // Charset labels resolve the way platforms resolve them: case-insensitive,
  // with aliases.
  let options = Options::new().with_encoding("UTF-8");
  assert_eq!(options.encoding().unwrap(), encoding_rs::UTF_8);
  let options = Options::new().with_encoding("latin1");
  assert_eq!(options.encoding().unwrap(), encoding_rs::WINDOWS_1252);
}

#[test]
fn test_options_unknown_encoding_is_an_error() {
  let options = Options::new().with_encoding("no-such-charset");
  let err = options.encoding().unwrap_err();
  assert!(err.to_string().contains("no-such-charset"));
}
