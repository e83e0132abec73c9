use anyhow::Result as _Result;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SkillsyncError {
    #[error("Source \"{name}\" already exists")]
    SourceExists { name: String },

    #[error("Source \"{name}\" not found")]
    SourceNotFound { name: String },

    #[error("Target \"{name}\" already exists")]
    TargetExists { name: String },

    #[error("Target \"{name}\" not found")]
    TargetNotFound { name: String },

    #[error("Unknown target \"{name}\". Please provide a path.")]
    UnknownTarget { name: String },

    #[error("Invalid Git URL format: {input}")]
    InvalidGitUrl { input: String },

    #[error("Path does not exist: {path}")]
    PathNotFound { path: String },

    #[error("Path is not a directory: {path}")]
    NotADirectory { path: String },

    #[error("Subdir \"{subdir}\" not found")]
    SubdirNotFound { subdir: String },

    #[error("git clone failed: {message}")]
    CloneFailed { message: String },

    #[error("Source has no URL")]
    MissingUrl,

    #[error("Could not determine home directory")]
    NoHomeDir,

    #[error("Custom Error: {0}")]
    Custom(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Inquire Error: {0}")]
    Inquire(#[from] inquire::InquireError),

    #[error("JSON Parse Error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SkillsyncError {
    pub fn display_localized(&self) -> String {
        match self {
            SkillsyncError::SourceExists { name } => {
                t!("errors.source_exists", name = name).to_string()
            }
            SkillsyncError::SourceNotFound { name } => {
                t!("errors.source_not_found", name = name).to_string()
            }
            SkillsyncError::TargetExists { name } => {
                t!("errors.target_exists", name = name).to_string()
            }
            SkillsyncError::TargetNotFound { name } => {
                t!("errors.target_not_found", name = name).to_string()
            }
            SkillsyncError::UnknownTarget { name } => {
                t!("errors.unknown_target", name = name).to_string()
            }
            SkillsyncError::InvalidGitUrl { input } => {
                t!("errors.invalid_git_url", input = input).to_string()
            }
            SkillsyncError::PathNotFound { path } => {
                t!("errors.path_not_found", path = path).to_string()
            }
            SkillsyncError::NotADirectory { path } => {
                t!("errors.not_a_directory", path = path).to_string()
            }
            SkillsyncError::SubdirNotFound { subdir } => {
                t!("errors.subdir_not_found", subdir = subdir).to_string()
            }
            SkillsyncError::CloneFailed { message } => {
                t!("errors.clone_failed", message = message).to_string()
            }
            SkillsyncError::MissingUrl => t!("errors.missing_url").to_string(),
            SkillsyncError::NoHomeDir => t!("errors.no_home_dir").to_string(),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = _Result<T, SkillsyncError>;
