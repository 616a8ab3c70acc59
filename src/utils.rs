// SPDX-License-Identifier: MIT OR Apache-2.0

//! Utility functions for askbase

use std::path::{Path, PathBuf};

/// The name of the data directory
pub const DATA_DIR: &str = ".askbase";

/// Result of finding a data root
#[derive(Debug)]
pub struct DataRoot {
    /// The directory containing the .askbase folder
    pub root: PathBuf,
    /// The full path to the .askbase folder
    pub data_path: PathBuf,
    /// Whether this is the current directory or a parent
    pub is_parent: bool,
}

/// Find the nearest .askbase directory by walking up from the given path.
/// Returns None if no .askbase directory is found.
pub fn find_data_root(start: impl AsRef<Path>) -> Option<DataRoot> {
    let mut current = start.as_ref().to_path_buf();

    if let Ok(canonical) = current.canonicalize() {
        current = canonical;
    }

    let original = current.clone();

    loop {
        let data_path = current.join(DATA_DIR);
        if data_path.is_dir() {
            return Some(DataRoot {
                root: current.clone(),
                data_path,
                is_parent: current != original,
            });
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Get the root directory that holds the data directory.
/// Falls back to the given path if none is found.
pub fn get_root_with_data(path: impl AsRef<Path>) -> PathBuf {
    match find_data_root(&path) {
        Some(root) => root.root,
        None => path.as_ref().to_path_buf(),
    }
}
