//! File creation helper
//!
//! Builds a [`FileRecord`] from bytes, encoded text or a structured value and
//! stores it in a collection.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{PluginError, Result},
    options::OptionMap,
    types::{FileCollection, FileRecord, DEFAULT_MODE},
};

/// Payload of a new file
#[derive(Debug, Clone, PartialEq)]
pub enum FileContent {
    /// Raw bytes, stored as is
    Bytes(Vec<u8>),

    /// Text decoded with [`CreateOptions::encoding`]
    Text(String),

    /// Value serialized as JSON
    Structured(serde_json::Value),
}

impl From<Vec<u8>> for FileContent {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for FileContent {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<&str> for FileContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for FileContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<serde_json::Value> for FileContent {
    fn from(value: serde_json::Value) -> Self {
        Self::Structured(value)
    }
}

/// Options for [`create_file`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateOptions {
    /// Encoding of [`FileContent::Text`] payloads
    pub encoding: String,

    /// Permission mode of the new record, as an octal string
    pub mode: String,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            encoding: "utf8".to_string(),
            mode: DEFAULT_MODE.to_string(),
        }
    }
}

/// Create a file record and store it under `name`
///
/// Overwrites any existing entry with the same name.
///
/// # Examples
///
/// ```ignore
/// create_file(&files, "robots.txt", "User-agent: *".into(), &CreateOptions::default())?;
/// create_file(&files, "logo.bin", "iVBORw0K".into(), &CreateOptions {
///     encoding: "base64".into(),
///     ..Default::default()
/// })?;
/// ```
pub fn create_file(
    files: &FileCollection,
    name: impl Into<String>,
    content: FileContent,
    options: &CreateOptions,
) -> Result<()> {
    let name = name.into();
    let file = build_record(content, options)?;
    debug!(
        file = %name,
        size = file.contents.len(),
        mode = %file.mode,
        "Creating file"
    );
    files.insert(name, file);
    Ok(())
}

/// Build a record without storing it
pub fn build_record(content: FileContent, options: &CreateOptions) -> Result<FileRecord> {
    validate_mode(&options.mode)?;
    let contents = match content {
        FileContent::Bytes(bytes) => bytes,
        FileContent::Text(text) => decode(&text, &options.encoding)?,
        FileContent::Structured(value) => serde_json::to_vec(&value)?,
    };
    Ok(FileRecord {
        contents,
        mode: options.mode.clone(),
        metadata: OptionMap::new(),
    })
}

fn validate_mode(mode: &str) -> Result<()> {
    let octal = !mode.is_empty() && mode.len() <= 4 && mode.chars().all(|c| ('0'..='7').contains(&c));
    if octal {
        Ok(())
    } else {
        Err(PluginError::invalid_option(
            "mode",
            format!("'{}' is not an octal permission string", mode),
        ))
    }
}

/// Turn text into bytes according to a named encoding
fn decode(text: &str, encoding: &str) -> Result<Vec<u8>> {
    match encoding.to_ascii_lowercase().as_str() {
        "utf8" | "utf-8" => Ok(text.as_bytes().to_vec()),
        // One byte per character, keeping the low byte of the code point
        "ascii" | "latin1" | "binary" => Ok(text.chars().map(|c| c as u32 as u8).collect()),
        "base64" => STANDARD
            .decode(text.trim())
            .map_err(|e| PluginError::Decode(e.to_string())),
        "hex" => hex::decode(text.trim()).map_err(|e| PluginError::Decode(e.to_string())),
        _ => Err(PluginError::UnknownEncoding(encoding.to_string())),
    }
}
