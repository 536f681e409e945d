use std::{fs, path::Path};

use saphyr::{LoadableYamlNode, YamlOwned};

use crate::core::parsers::ParserError;

/// First document of a YAML text. A text without documents is an error.
pub fn first_document(text: &str) -> Result<YamlOwned, ParserError> {
  YamlOwned::load_from_str(text)?
    .into_iter()
    .next()
    .ok_or(ParserError::YamlEmpty)
}

pub fn read_document(path: &Path) -> Result<YamlOwned, ParserError> {
  first_document(&fs::read_to_string(path)?)
}

/// Value under the string key `key`, when `node` is a mapping.
pub fn field<'a>(node: &'a YamlOwned, key: &str) -> Option<&'a YamlOwned> {
  match node {
    YamlOwned::Mapping(map) => map
      .iter()
      .find(|(k, _)| k.as_str() == Some(key))
      .map(|(_, value)| value),
    _ => None,
  }
}

pub fn string_field(node: &YamlOwned, key: &str) -> Result<Option<String>, ParserError> {
  match field(node, key) {
    None => Ok(None),
    Some(value) => value
      .as_str()
      .map(|s| Some(s.to_string()))
      .ok_or_else(|| ParserError::WrongType(key.to_string(), "string".to_string())),
  }
}

pub fn required_string(node: &YamlOwned, key: &str) -> Result<String, ParserError> {
  string_field(node, key)?.ok_or_else(|| ParserError::MissingKey(key.to_string()))
}

/// Entries of the sequence under `key`.
pub fn sequence_field<'a>(node: &'a YamlOwned, key: &str) -> Result<&'a [YamlOwned], ParserError> {
  match field(node, key) {
    Some(YamlOwned::Sequence(entries)) => Ok(entries.as_slice()),
    Some(_) => Err(ParserError::WrongType(key.to_string(), "sequence".to_string())),
    None => Err(ParserError::MissingKey(key.to_string())),
  }
}
