//! # Virtual Path Utility
//!
//! POSIX-like path manipulation for the virtual filesystem.
//!
//! ## Design
//!
//! - Paths are plain strings with `/` separators; the host platform's
//!   path rules never apply
//! - `normalize` resolves `.`/`..`, collapses repeated separators, and
//!   strips the trailing separator, so its output is already canonical
//! - `..` never climbs above the root of an absolute path
//! - No I/O: these functions know nothing about what exists

/// The filesystem root
pub const ROOT: &str = "/";

/// Split of a path into directory, base name and root
///
/// `parse("/data/notes/todo.txt")` yields `dir = "/data/notes"`,
/// `base = "todo.txt"`, `root = "/"`. A relative path has an empty root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    /// Directory portion (everything before the last component)
    pub dir: String,
    /// Final component
    pub base: String,
    /// `/` for absolute paths, empty otherwise
    pub root: String,
}

/// Strip one trailing separator, except on the root itself
pub fn canonical(path: &str) -> String {
    if path.len() > 1 && path.ends_with('/') {
        path[..path.len() - 1].to_string()
    } else {
        path.to_string()
    }
}

/// Normalize a path
///
/// Collapses repeated separators, resolves `.` and `..` components, and
/// strips the trailing separator. The result of normalizing an absolute
/// path is a canonical absolute path.
pub fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut stack: Vec<&str> = Vec::new();
    for component in path.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                if stack.last().is_some_and(|c| *c != "..") {
                    stack.pop();
                } else if !absolute {
                    // Relative paths keep leading ".." components
                    stack.push("..");
                }
                // Absolute paths clamp ".." at the root
            }
            other => stack.push(other),
        }
    }
    let joined = stack.join("/");
    if absolute {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Join two path segments and normalize the result
///
/// An absolute `tail` does not restart at the root; segments are simply
/// concatenated with a separator (`join("/data", "/notes")` is
/// `/data/notes`).
pub fn join(base: &str, tail: &str) -> String {
    if base.is_empty() {
        return normalize(tail);
    }
    if tail.is_empty() {
        return normalize(base);
    }
    normalize(&format!("{base}/{tail}"))
}

/// Parse a path into directory, base and root
///
/// The input is normalized first, so the parts of `parse(p)` describe the
/// canonical form of `p`.
pub fn parse(path: &str) -> ParsedPath {
    let normalized = normalize(path);
    let root = if normalized.starts_with('/') { "/" } else { "" };
    if normalized == "/" {
        return ParsedPath {
            dir: "/".to_string(),
            base: String::new(),
            root: root.to_string(),
        };
    }
    match normalized.rfind('/') {
        Some(0) => ParsedPath {
            dir: "/".to_string(),
            base: normalized[1..].to_string(),
            root: root.to_string(),
        },
        Some(idx) => ParsedPath {
            dir: normalized[..idx].to_string(),
            base: normalized[idx + 1..].to_string(),
            root: root.to_string(),
        },
        None => ParsedPath {
            dir: String::new(),
            base: normalized,
            root: root.to_string(),
        },
    }
}
