//! Common test utilities

use std::fs;
use std::path::{Path, PathBuf};

use xlink::dictionary::EntityDictionary;
use xlink::models::Source;

/// Write `content` to `dir/name` and return the path
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Read a file into lines
#[allow(dead_code)]
pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Build a dictionary from in-memory dictionary file content
#[allow(dead_code)]
pub fn dictionary(source: Source, content: &str) -> EntityDictionary {
    EntityDictionary::from_reader(source, content.as_bytes()).unwrap()
}
