//! Directory equality by recursive content hashing.
//!
//! Equality only gates the overwrite prompt during reconciliation, so a fast
//! non-cryptographic digest is sufficient. The check fails closed: anything
//! that is not a readable directory pair compares unequal.

use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Noise entries skipped at every nesting level.
static IGNORE_ENTRIES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [".DS_Store", ".git", "node_modules", "Thumbs.db", ".gitignore"]
        .into_iter()
        .collect()
});

pub fn is_ignored_entry(name: &str) -> bool {
    IGNORE_ENTRIES.contains(name)
}

/// MD5 hex digest of a file's content. Unreadable files hash to an empty
/// string so that one bad file cannot abort a whole comparison; two
/// unreadable files at the same relative path therefore compare equal.
fn hash_file(path: &Path) -> String {
    match fs::read(path) {
        Ok(content) => {
            let mut context = md5::Context::new();
            context.consume(&content);
            format!("{:x}", context.compute())
        }
        Err(_) => String::new(),
    }
}

/// Map of path-relative-to-root -> content hash for every non-ignored file
/// under `root`. Symlinks are hashed as opaque files via their readable
/// target content. Walk errors are skipped, not raised.
fn collect_file_hashes(root: &Path) -> BTreeMap<String, String> {
    let mut files = BTreeMap::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            entry
                .file_name()
                .to_str()
                .is_none_or(|name| !is_ignored_entry(name))
        });

    for entry in walker.filter_map(|entry| entry.ok()) {
        if entry.file_type().is_dir() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let rel = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.insert(rel, hash_file(entry.path()));
    }
    files
}

/// Report whether two directory trees hold identical content.
///
/// Returns false, never an error, when either path is missing or not a
/// directory. Equality requires the same count of non-ignored files and an
/// identical hash for every relative path.
pub fn are_directories_equal(a: &Path, b: &Path) -> bool {
    if !a.is_dir() || !b.is_dir() {
        return false;
    }

    let files_a = collect_file_hashes(a);
    let files_b = collect_file_hashes(b);

    if files_a.len() != files_b.len() {
        return false;
    }

    files_a
        .iter()
        .all(|(path, hash)| files_b.get(path) == Some(hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_tree(root: &Path, files: &[(&str, &str)]) {
        for (rel, content) in files {
            let path = root.join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("create parent");
            }
            fs::write(path, content).expect("write file");
        }
    }

    #[test]
    fn test_reflexive_for_any_directory() {
        let temp = TempDir::new().expect("temp dir");
        let dir = temp.path().join("skill");
        write_tree(&dir, &[("SKILL.md", "hello"), ("nested/data.txt", "abc")]);
        assert!(are_directories_equal(&dir, &dir));
    }

    #[test]
    fn test_reflexive_for_empty_directory() {
        let temp = TempDir::new().expect("temp dir");
        let dir = temp.path().join("empty");
        fs::create_dir_all(&dir).expect("create dir");
        assert!(are_directories_equal(&dir, &dir));
    }

    #[test]
    fn test_missing_or_non_directory_fails_closed() {
        let temp = TempDir::new().expect("temp dir");
        let dir = temp.path().join("exists");
        fs::create_dir_all(&dir).expect("create dir");
        let file = temp.path().join("file.txt");
        fs::write(&file, "x").expect("write file");

        assert!(!are_directories_equal(&dir, &temp.path().join("missing")));
        assert!(!are_directories_equal(&temp.path().join("missing"), &dir));
        assert!(!are_directories_equal(&dir, &file));
    }

    #[test]
    fn test_identical_copies_are_equal() {
        let temp = TempDir::new().expect("temp dir");
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        let files = [("SKILL.md", "hello"), ("sub/extra.txt", "more")];
        write_tree(&a, &files);
        write_tree(&b, &files);
        assert!(are_directories_equal(&a, &b));
    }

    #[test]
    fn test_single_byte_change_detected() {
        let temp = TempDir::new().expect("temp dir");
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        write_tree(&a, &[("SKILL.md", "hello")]);
        write_tree(&b, &[("SKILL.md", "hellp")]);
        assert!(!are_directories_equal(&a, &b));
    }

    #[test]
    fn test_added_and_removed_files_detected() {
        let temp = TempDir::new().expect("temp dir");
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        write_tree(&a, &[("SKILL.md", "hello")]);
        write_tree(&b, &[("SKILL.md", "hello"), ("extra.txt", "x")]);
        assert!(!are_directories_equal(&a, &b));
        assert!(!are_directories_equal(&b, &a));
    }

    #[test]
    fn test_same_content_different_relative_path() {
        let temp = TempDir::new().expect("temp dir");
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        write_tree(&a, &[("one.txt", "same")]);
        write_tree(&b, &[("two.txt", "same")]);
        assert!(!are_directories_equal(&a, &b));
    }

    #[test]
    fn test_ignored_entries_do_not_affect_equality() {
        let temp = TempDir::new().expect("temp dir");
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        write_tree(&a, &[("SKILL.md", "hello")]);
        write_tree(
            &b,
            &[
                ("SKILL.md", "hello"),
                (".DS_Store", "junk"),
                (".gitignore", "target"),
                (".git/HEAD", "ref: refs/heads/main"),
                ("node_modules/pkg/index.js", "code"),
            ],
        );
        assert!(are_directories_equal(&a, &b));
    }

    #[test]
    fn test_directories_with_only_ignored_entries_are_equal() {
        let temp = TempDir::new().expect("temp dir");
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        write_tree(&a, &[(".DS_Store", "junk")]);
        fs::create_dir_all(&b).expect("create dir");
        assert!(are_directories_equal(&a, &b));
        assert!(are_directories_equal(&a, &a));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_entries_hash_to_sentinel() {
        use std::os::unix::fs as unix_fs;

        let temp = TempDir::new().expect("temp dir");
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        fs::create_dir_all(&a).expect("create a");
        fs::create_dir_all(&b).expect("create b");
        // Broken symlinks at the same relative path both read as the empty
        // sentinel, a documented false positive.
        unix_fs::symlink("/nonexistent/one", a.join("link")).expect("symlink a");
        unix_fs::symlink("/nonexistent/two", b.join("link")).expect("symlink b");
        assert!(are_directories_equal(&a, &b));
    }
}
