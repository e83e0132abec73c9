use crate::error::SkillsyncError;
use crate::path_utils::expand_path;
use anyhow::Result;
use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    Remote,
    Local,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedGitUrl {
    /// `owner/repo`, used as the source name and mirror entry
    pub name: String,
    pub url: String,
    pub subdir: Option<String>,
}

/// Check if input looks like a local filesystem path
pub fn is_local_path(input: &str) -> bool {
    if input.starts_with('/')
        || input.starts_with("~/")
        || input.starts_with("./")
        || input.starts_with("../")
    {
        return true;
    }
    // Windows drive-letter absolute paths (X:\ or X:/)
    let bytes = input.as_bytes();
    if bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'\\' || bytes[2] == b'/')
    {
        return true;
    }
    false
}

/// Classify a `source add` argument as a remote repository or a local path.
/// Unrecognized input defaults to local.
pub fn detect_source_kind(input: &str) -> SourceKind {
    if input.starts_with("http://") || input.starts_with("https://") {
        return SourceKind::Remote;
    }
    if is_local_path(input) {
        return SourceKind::Local;
    }
    // owner/repo shorthand
    if input.contains('/') {
        return SourceKind::Remote;
    }
    SourceKind::Local
}

/// Parse a GitHub URL or `owner/repo` shorthand. Tree URLs
/// (`github.com/owner/repo/tree/<branch>/<path>`) carry the path as a
/// subdirectory restriction.
pub fn parse_git_url(input: &str) -> Result<ParsedGitUrl> {
    if let Some(rest) = input
        .find("github.com/")
        .map(|idx| &input[idx + "github.com/".len()..])
    {
        let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
        if segments.len() >= 2 {
            let name = format!(
                "{}/{}",
                segments[0],
                segments[1].trim_end_matches(".git")
            );
            let subdir = if segments.len() > 4 && segments[2] == "tree" {
                Some(segments[4..].join("/"))
            } else {
                None
            };
            return Ok(ParsedGitUrl {
                url: format!("https://github.com/{name}"),
                name,
                subdir,
            });
        }
        return Err(SkillsyncError::InvalidGitUrl {
            input: input.to_string(),
        }
        .into());
    }

    if input.contains('/') && !input.starts_with("http") {
        return Ok(ParsedGitUrl {
            name: input.to_string(),
            url: format!("https://github.com/{input}"),
            subdir: None,
        });
    }

    Err(SkillsyncError::InvalidGitUrl {
        input: input.to_string(),
    }
    .into())
}

/// Canonical name for a local source: `~` expanded, relative paths resolved
/// against the current directory.
pub fn local_source_name(input: &str) -> Result<PathBuf> {
    let expanded = expand_path(input);
    if expanded.is_absolute() {
        return Ok(expanded);
    }
    Ok(env::current_dir()?.join(expanded))
}

/// Shallow clone into `dest`. The clone is an opaque external command; on
/// failure the first stderr line is kept for display.
pub fn clone_shallow(url: &str, dest: &Path) -> Result<()> {
    let output = Command::new("git")
        .arg("clone")
        .arg("--depth")
        .arg("1")
        .arg(url)
        .arg(dest)
        .output()
        .map_err(SkillsyncError::Io)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = stderr.lines().next().unwrap_or("git clone failed").to_string();
        return Err(SkillsyncError::CloneFailed { message }.into());
    }
    Ok(())
}
