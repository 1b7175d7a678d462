//! Persisted record types
//!
//! Three record shapes live in the store: the singleton head, one
//! directory record per canonical path, and raw blocks. File metadata is
//! not a standalone record; it is embedded in the owning directory's
//! child list.

use serde::{Deserialize, Serialize};

/// The singleton head record
///
/// Created by initialization, destroyed by a full reset. `next_block_id`
/// only ever grows; freed block identifiers are never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadRecord {
    /// Canonical path the directory tree is rooted at
    pub root: String,
    /// Next block identifier to hand out
    pub next_block_id: u64,
}

impl HeadRecord {
    /// Head record for a freshly initialized filesystem
    pub fn new() -> Self {
        Self {
            root: "/".to_string(),
            next_block_id: 1,
        }
    }

    /// Take the next block identifier, advancing the counter
    pub fn take_block_id(&mut self) -> u64 {
        let id = self.next_block_id;
        self.next_block_id += 1;
        id
    }
}

impl Default for HeadRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// File metadata, embedded in the parent directory record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// File name within the parent directory
    pub name: String,
    /// Canonical path of the parent directory
    pub path: String,
    /// Content size in bytes
    pub size: u64,
    /// Last-modified time, epoch milliseconds
    pub utc: u64,
    /// Identifier of the block holding the content
    pub block: u64,
}

impl FileRecord {
    /// Full canonical path of this file
    pub fn full_path(&self) -> String {
        fs_path::join(&self.path, &self.name)
    }
}

/// One child of a directory
///
/// Directories and files share a single child list, so a name can never
/// belong to both at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChildEntry {
    /// Child directory, stored as its own record under the joined path
    Dir {
        /// Directory name
        name: String,
    },
    /// File owned directly by this directory
    File(FileRecord),
}

impl ChildEntry {
    /// Name of this child
    pub fn name(&self) -> &str {
        match self {
            ChildEntry::Dir { name } => name,
            ChildEntry::File(file) => &file.name,
        }
    }
}

/// A directory record, keyed in the store by its own canonical path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirRecord {
    /// Canonical absolute path; no trailing slash except on the root
    pub path: String,
    children: Vec<ChildEntry>,
}

impl DirRecord {
    /// Create an empty directory record
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            children: Vec::new(),
        }
    }

    /// Whether any child (directory or file) has this name
    pub fn has_child(&self, name: &str) -> bool {
        self.children.iter().any(|c| c.name() == name)
    }

    /// Add a child directory name
    ///
    /// Returns false without modifying anything if the name is taken.
    pub fn add_dir(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.has_child(&name) {
            return false;
        }
        self.children.push(ChildEntry::Dir { name });
        true
    }

    /// Add a file entry
    ///
    /// Returns false without modifying anything if the name is taken.
    pub fn add_file(&mut self, file: FileRecord) -> bool {
        if self.has_child(&file.name) {
            return false;
        }
        self.children.push(ChildEntry::File(file));
        true
    }

    /// Look up a file entry by name
    pub fn file(&self, name: &str) -> Option<&FileRecord> {
        self.children.iter().find_map(|c| match c {
            ChildEntry::File(file) if file.name == name => Some(file),
            _ => None,
        })
    }

    /// Remove a file entry by name, returning it
    pub fn remove_file(&mut self, name: &str) -> Option<FileRecord> {
        let idx = self
            .children
            .iter()
            .position(|c| matches!(c, ChildEntry::File(f) if f.name == name))?;
        match self.children.remove(idx) {
            ChildEntry::File(file) => Some(file),
            ChildEntry::Dir { .. } => unreachable!("position matched a file entry"),
        }
    }

    /// Replace the file entry with the same name
    ///
    /// Returns false if no entry matches.
    pub fn update_file(&mut self, updated: &FileRecord) -> bool {
        for child in &mut self.children {
            if let ChildEntry::File(file) = child {
                if file.name == updated.name {
                    *file = updated.clone();
                    return true;
                }
            }
        }
        false
    }

    /// Child directory names, in insertion order
    pub fn dir_names(&self) -> Vec<&str> {
        self.children
            .iter()
            .filter_map(|c| match c {
                ChildEntry::Dir { name } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// File entries, in insertion order
    pub fn files(&self) -> impl Iterator<Item = &FileRecord> {
        self.children.iter().filter_map(|c| match c {
            ChildEntry::File(file) => Some(file),
            _ => None,
        })
    }

    /// All child names: directories first, then files, insertion order
    /// within each
    pub fn list_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.dir_names().iter().map(|n| n.to_string()).collect();
        names.extend(self.files().map(|f| f.name.clone()));
        names
    }

    /// Number of children
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the directory has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, path: &str, block: u64) -> FileRecord {
        FileRecord {
            name: name.to_string(),
            path: path.to_string(),
            size: 0,
            utc: 0,
            block,
        }
    }

    #[test]
    fn test_head_counter_never_goes_back() {
        let mut head = HeadRecord::new();
        assert_eq!(head.take_block_id(), 1);
        assert_eq!(head.take_block_id(), 2);
        assert_eq!(head.next_block_id, 3);
    }

    #[test]
    fn test_add_dir_rejects_duplicate() {
        let mut dir = DirRecord::new("/data");
        assert!(dir.add_dir("sub"));
        assert!(!dir.add_dir("sub"));
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn test_one_namespace_for_dirs_and_files() {
        let mut dir = DirRecord::new("/data");
        assert!(dir.add_dir("taken"));
        assert!(!dir.add_file(file("taken", "/data", 1)));
        assert!(dir.add_file(file("free", "/data", 1)));
        assert!(!dir.add_dir("free"));
    }

    #[test]
    fn test_remove_file_returns_entry() {
        let mut dir = DirRecord::new("/data");
        dir.add_file(file("a.txt", "/data", 7));
        let removed = dir.remove_file("a.txt").unwrap();
        assert_eq!(removed.block, 7);
        assert!(dir.is_empty());
        assert!(dir.remove_file("a.txt").is_none());
    }

    #[test]
    fn test_update_file_replaces_in_place() {
        let mut dir = DirRecord::new("/data");
        dir.add_file(file("a.txt", "/data", 7));
        let mut updated = file("a.txt", "/data", 7);
        updated.size = 42;
        assert!(dir.update_file(&updated));
        assert_eq!(dir.file("a.txt").unwrap().size, 42);
        assert!(!dir.update_file(&file("missing", "/data", 1)));
    }

    #[test]
    fn test_list_names_dirs_before_files() {
        let mut dir = DirRecord::new("/data");
        dir.add_file(file("z.txt", "/data", 1));
        dir.add_dir("beta");
        dir.add_file(file("a.txt", "/data", 2));
        dir.add_dir("alpha");
        assert_eq!(dir.list_names(), vec!["beta", "alpha", "z.txt", "a.txt"]);
    }

    #[test]
    fn test_dir_record_json_round_trip() {
        let mut dir = DirRecord::new("/data");
        dir.add_dir("sub");
        dir.add_file(file("a.txt", "/data", 3));
        let json = serde_json::to_string(&dir).unwrap();
        let back: DirRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dir);
    }

    #[test]
    fn test_child_entry_tagging() {
        let json = serde_json::to_string(&ChildEntry::Dir {
            name: "sub".to_string(),
        })
        .unwrap();
        assert!(json.contains("\"kind\":\"dir\""));
        let json = serde_json::to_string(&ChildEntry::File(file("a", "/data", 1))).unwrap();
        assert!(json.contains("\"kind\":\"file\""));
    }

    #[test]
    fn test_full_path() {
        assert_eq!(file("a.txt", "/data", 1).full_path(), "/data/a.txt");
        assert_eq!(file("a.txt", "/", 1).full_path(), "/a.txt");
    }
}
