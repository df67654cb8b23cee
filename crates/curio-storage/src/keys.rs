//! Shared key generation for media backends.
//!
//! Key format: `{folder}/{uuid}{extension}`, or `{uuid}{extension}` when the folder is empty.

use crate::{StorageError, StorageResult};
use uuid::Uuid;

/// Normalise a folder name, rejecting anything that could escape the media root.
pub fn sanitize_folder(folder: &str) -> StorageResult<String> {
    let trimmed = folder.trim().trim_matches('/');

    if trimmed
        .split('/')
        .any(|segment| segment == ".." || segment == "." || segment.contains('\\'))
    {
        return Err(StorageError::InvalidKey(format!(
            "Folder contains invalid segments: {}",
            folder
        )));
    }

    Ok(trimmed
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/"))
}

/// Random file name keeping the client's extension, if any.
pub fn unique_filename(extension: Option<&str>) -> String {
    format!("{}{}", Uuid::new_v4(), extension.unwrap_or(""))
}

/// Generate a storage key for a file in the given (sanitised) folder.
pub fn object_key(folder: &str, filename: &str) -> String {
    if folder.is_empty() {
        filename.to_string()
    } else {
        format!("{}/{}", folder, filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_folder() {
        assert_eq!(sanitize_folder("items").unwrap(), "items");
        assert_eq!(sanitize_folder("/items/").unwrap(), "items");
        assert_eq!(sanitize_folder("items//2024").unwrap(), "items/2024");
        assert_eq!(sanitize_folder("").unwrap(), "");
        assert!(sanitize_folder("../etc").is_err());
        assert!(sanitize_folder("items/../../etc").is_err());
        assert!(sanitize_folder("items\\..\\etc").is_err());
    }

    #[test]
    fn test_unique_filename_keeps_extension() {
        let a = unique_filename(Some(".jpg"));
        let b = unique_filename(Some(".jpg"));
        assert!(a.ends_with(".jpg"));
        assert_ne!(a, b);
        assert_eq!(unique_filename(None).len(), 36);
    }

    #[test]
    fn test_object_key() {
        assert_eq!(object_key("items", "a.png"), "items/a.png");
        assert_eq!(object_key("", "a.png"), "a.png");
    }
}
