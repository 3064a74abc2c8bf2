//! JSON import/export of the vocabulary collection.
//! The file holds one array of items in the same flat shape the web client
//! keeps in session storage, so collections move between the two unchanged.

use crate::error::Result;
use crate::models::VocabularyItem;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

pub fn to_json_string(items: &[VocabularyItem]) -> Result<String> {
    Ok(serde_json::to_string_pretty(items)?)
}

/// Parses a collection. Fails on the first item that lacks or breaks its
/// review fields instead of defaulting them.
pub fn from_json_str(json: &str) -> Result<Vec<VocabularyItem>> {
    Ok(serde_json::from_str(json)?)
}

/// Exports a collection to a JSON file at the specified path.
pub fn export_json_to_path(items: &[VocabularyItem], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json_string = to_json_string(items)?;
    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;
    info!(count = items.len(), path = %path.display(), "vocabulary exported");
    Ok(())
}

/// Imports a collection from a JSON file.
pub fn import_json(path: impl AsRef<Path>) -> Result<Vec<VocabularyItem>> {
    let path = path.as_ref();
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let items = from_json_str(&contents)?;
    info!(count = items.len(), path = %path.display(), "vocabulary imported");
    Ok(items)
}
