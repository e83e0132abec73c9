//! Path expansion, collapsing and the built-in target table

use std::path::{Path, PathBuf};

/// Validates that a path string is not empty or just whitespace
pub fn validate_path_str(path_str: &str) -> Result<(), String> {
    if path_str.trim().is_empty() {
        return Err("Path cannot be empty or contain only whitespace".to_string());
    }
    Ok(())
}

/// Expand a leading `~/` to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

/// Collapse the home directory prefix back to `~` for display
pub fn collapse_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(rest) = path.strip_prefix(&home)
    {
        if rest.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~/{}", rest.display());
    }
    path.display().to_string()
}

/// Well-known tool skill directories, used when `target add` is given a bare
/// name without a path.
pub fn known_targets() -> Vec<(&'static str, PathBuf)> {
    let home = dirs::home_dir().unwrap_or_default();
    vec![
        ("cursor", home.join(".cursor").join("skills")),
        ("claude", home.join(".claude").join("skills")),
        ("codex", home.join(".codex").join("skills")),
        (
            "antigravity",
            home.join(".gemini").join("antigravity").join("skills"),
        ),
        ("gemini", home.join(".gemini").join("skills")),
        ("copilot", home.join(".copilot").join("skills")),
        ("windsurf", home.join(".windsurf").join("skills")),
        ("openclaw", home.join(".openclaw")),
    ]
}

pub fn known_target_path(name: &str) -> Option<PathBuf> {
    known_targets()
        .into_iter()
        .find(|(known, _)| *known == name)
        .map(|(_, path)| path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestProcess;

    #[test]
    fn test_validate_path_str() {
        assert!(validate_path_str("").is_err());
        assert!(validate_path_str("   ").is_err());
        assert!(validate_path_str("\t").is_err());
        assert!(validate_path_str("valid/path").is_ok());
    }

    #[test]
    fn test_expand_and_collapse_roundtrip() {
        let mut proc = TestProcess::new();
        proc.set_var("HOME", "/home/sync-user");

        let expanded = expand_path("~/skills/demo");
        assert_eq!(expanded, PathBuf::from("/home/sync-user/skills/demo"));
        assert_eq!(collapse_path(&expanded), "~/skills/demo");
    }

    #[test]
    fn test_expand_leaves_plain_paths() {
        assert_eq!(expand_path("/opt/skills"), PathBuf::from("/opt/skills"));
        assert_eq!(expand_path("./skills"), PathBuf::from("./skills"));
    }

    #[test]
    fn test_collapse_outside_home() {
        let mut proc = TestProcess::new();
        proc.set_var("HOME", "/home/sync-user");
        assert_eq!(collapse_path(Path::new("/opt/skills")), "/opt/skills");
    }

    #[test]
    fn test_known_target_path() {
        let mut proc = TestProcess::new();
        proc.set_var("HOME", "/home/sync-user");

        let cursor = known_target_path("cursor").expect("cursor target");
        assert_eq!(cursor, PathBuf::from("/home/sync-user/.cursor/skills"));
        assert!(known_target_path("not-a-tool").is_none());
    }
}
