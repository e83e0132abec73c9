//! Fetch engine: wholesale remote refresh and hash-based local reconciliation.

use crate::compare::are_directories_equal;
use crate::config::SyncPaths;
use crate::error::SkillsyncError;
use crate::git::clone_shallow;
use crate::interactive::{ConflictResolution, ConflictResolver};
use crate::store::{ConfigStore, Source};
use anyhow::Result;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Run-scoped conflict policy. Once a `*-all` answer settles it, later
/// conflicts in the same reconciliation run are resolved without prompting;
/// there is no transition back to `Unset`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum StickyDecision {
    #[default]
    Unset,
    OverwriteAll,
    SkipAll,
}

impl StickyDecision {
    fn settle(&mut self, resolution: ConflictResolution) {
        if *self != StickyDecision::Unset {
            return;
        }
        match resolution {
            ConflictResolution::YesAll => *self = StickyDecision::OverwriteAll,
            ConflictResolution::NoAll => *self = StickyDecision::SkipAll,
            ConflictResolution::Yes | ConflictResolution::No => {}
        }
    }

    /// `Some(overwrite)` when no prompt is needed anymore.
    fn decided(self) -> Option<bool> {
        match self {
            StickyDecision::Unset => None,
            StickyDecision::OverwriteAll => Some(true),
            StickyDecision::SkipAll => Some(false),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Candidate skill directories found in the source
    pub discovered: usize,
    pub copied: usize,
    pub skipped: usize,
    /// Per-skill copy failures that did not abort the run
    pub failed: usize,
}

/// Recursive directory copy. Symlinked files are materialized as their target
/// content, matching how the equality checker hashes them.
pub(crate) fn copy_dir(source: &Path, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest)?;
    for entry in WalkDir::new(source).follow_links(false) {
        let entry = entry.map_err(|e| SkillsyncError::Custom(e.to_string()))?;
        let rel = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| SkillsyncError::Custom(e.to_string()))?;
        if rel.as_os_str().is_empty() {
            continue;
        }
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// All-or-nothing skill copy: a failed copy removes the partial destination.
fn copy_skill(source: &Path, dest: &Path) -> Result<()> {
    if let Err(e) = copy_dir(source, dest) {
        let _ = fs::remove_dir_all(dest);
        return Err(e);
    }
    Ok(())
}

fn remove_existing(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)?;
    }
    Ok(())
}

/// Immediate subdirectories of `dir`, sorted by name. Anything that is not a
/// directory is not a skill candidate.
fn candidate_skills(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            candidates.push(entry.path());
        }
    }
    candidates.sort();
    Ok(candidates)
}

/// Reconcile one local source directory against the shared local mirror.
///
/// New skills are copied, identical skills are skipped silently, and
/// conflicting skills go through the resolver, honoring a sticky `*-all`
/// answer for the rest of the run. Per-skill copy failures are reported and
/// counted without aborting the remaining candidates.
pub fn reconcile_local_source(
    source_dir: &Path,
    mirror_dir: &Path,
    resolver: &mut dyn ConflictResolver,
) -> Result<ReconcileSummary> {
    if !source_dir.exists() {
        return Err(SkillsyncError::PathNotFound {
            path: source_dir.display().to_string(),
        }
        .into());
    }
    if !source_dir.is_dir() {
        return Err(SkillsyncError::NotADirectory {
            path: source_dir.display().to_string(),
        }
        .into());
    }
    fs::create_dir_all(mirror_dir)?;

    let candidates = candidate_skills(source_dir)?;
    let mut summary = ReconcileSummary {
        discovered: candidates.len(),
        ..ReconcileSummary::default()
    };
    let mut sticky = StickyDecision::default();

    for candidate in &candidates {
        let Some(skill_name) = candidate.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        let mirror_entry = mirror_dir.join(skill_name);

        if !mirror_entry.exists() {
            match copy_skill(candidate, &mirror_entry) {
                Ok(()) => summary.copied += 1,
                Err(e) => {
                    report_skill_failure(skill_name, &e);
                    summary.failed += 1;
                }
            }
            continue;
        }

        if are_directories_equal(candidate, &mirror_entry) {
            summary.skipped += 1;
            continue;
        }

        let overwrite = match sticky.decided() {
            Some(overwrite) => overwrite,
            None => {
                let resolution = resolver.resolve(skill_name)?;
                sticky.settle(resolution);
                matches!(
                    resolution,
                    ConflictResolution::Yes | ConflictResolution::YesAll
                )
            }
        };

        if !overwrite {
            summary.skipped += 1;
            continue;
        }

        let replaced = remove_existing(&mirror_entry).and_then(|()| copy_skill(candidate, &mirror_entry));
        match replaced {
            Ok(()) => summary.copied += 1,
            Err(e) => {
                report_skill_failure(skill_name, &e);
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

fn report_skill_failure(skill_name: &str, error: &anyhow::Error) {
    eprintln!(
        "{}",
        t!(
            "fetch.skill_failed",
            skill = skill_name,
            error = first_line(&error_message(error))
        )
        .red()
    );
}

/// Move a finished clone into the mirror. The declared subdir is validated
/// inside the clone before the existing mirror entry is deleted, so a failed
/// fetch leaves the previous content untouched.
pub fn promote_clone(clone_dir: &Path, mirror_dir: &Path, subdir: Option<&str>) -> Result<()> {
    if let Some(subdir) = subdir {
        let subdir_path = clone_dir.join(subdir);
        if !subdir_path.is_dir() {
            let _ = fs::remove_dir_all(clone_dir);
            return Err(SkillsyncError::SubdirNotFound {
                subdir: subdir.to_string(),
            }
            .into());
        }
        remove_existing(mirror_dir)?;
        copy_dir(&subdir_path, mirror_dir)?;
        fs::remove_dir_all(clone_dir)?;
        return Ok(());
    }

    remove_existing(mirror_dir)?;
    fs::rename(clone_dir, mirror_dir)?;
    let git_dir = mirror_dir.join(".git");
    if git_dir.exists() {
        fs::remove_dir_all(&git_dir)?;
    }
    Ok(())
}

/// Destructive remote refresh: clone fresh into a temp directory beside the
/// mirror entry, then promote it. No reconciliation applies to remote
/// sources; their content is authoritative.
pub fn fetch_remote_source(name: &str, source: &Source, paths: &SyncPaths) -> Result<()> {
    let url = source.url.as_ref().ok_or(SkillsyncError::MissingUrl)?;

    let mirror_dir = paths.source_store_dir(name);
    if let Some(parent) = mirror_dir.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_dir = paths.store_dir.join(format!("{name}_tmp"));
    let _ = fs::remove_dir_all(&temp_dir);

    clone_shallow(url, &temp_dir)?;
    promote_clone(&temp_dir, &mirror_dir, source.subdir.as_deref())
}

fn fetch_local_source(
    name: &str,
    source: &Source,
    paths: &SyncPaths,
    resolver: &mut dyn ConflictResolver,
) {
    let Some(local_path) = source.local_path.as_ref() else {
        print_row(name, &"○".dimmed(), &t!("fetch.no_local_path").dimmed());
        return;
    };

    match reconcile_local_source(local_path, &paths.local_store_dir(), resolver) {
        Ok(summary) if summary.discovered == 0 => {
            print_row(name, &"⚠".yellow(), &t!("fetch.no_skills_found").yellow());
        }
        Ok(summary) => {
            print_row(name, &"✓".green(), &summary_label(&summary).green());
        }
        Err(e) => {
            print_row(name, &"✗".red(), &first_line(&error_message(&e)).red());
        }
    }
}

fn summary_label(summary: &ReconcileSummary) -> String {
    let mut parts = Vec::new();
    if summary.copied > 0 {
        parts.push(t!("fetch.copied", count = summary.copied).to_string());
    }
    if summary.skipped > 0 {
        parts.push(t!("fetch.skipped", count = summary.skipped).to_string());
    }
    if summary.failed > 0 {
        parts.push(t!("fetch.failed", count = summary.failed).to_string());
    }
    if parts.is_empty() {
        return t!("fetch.up_to_date").to_string();
    }
    parts.join(", ")
}

fn error_message(error: &anyhow::Error) -> String {
    error
        .downcast_ref::<SkillsyncError>()
        .map(SkillsyncError::display_localized)
        .unwrap_or_else(|| error.to_string())
}

fn first_line(message: &str) -> String {
    message.lines().next().unwrap_or_default().to_string()
}

fn print_row(name: &str, symbol: &impl std::fmt::Display, status: &impl std::fmt::Display) {
    println!("  {} {:<30} {}", symbol, name, status);
}

/// `fetch [SOURCE]`: refresh every enabled source (or just the named one)
/// into the mirror. Per-source failures are reported and do not stop the run.
pub fn run(
    store: &ConfigStore,
    source_name: Option<&str>,
    resolver: &mut dyn ConflictResolver,
) -> Result<()> {
    let config = store.load()?;
    let paths = store.paths();

    if let Some(name) = source_name
        && !config.sources.contains_key(name)
    {
        return Err(SkillsyncError::SourceNotFound {
            name: name.to_string(),
        }
        .into());
    }

    println!("\n{}\n", t!("fetch.header").bold());

    for (name, source) in &config.sources {
        if let Some(filter) = source_name
            && filter != name
        {
            continue;
        }
        if !source.enabled {
            print_row(name, &"○".dimmed(), &t!("fetch.disabled").dimmed());
            continue;
        }
        if source.is_local() {
            fetch_local_source(name, source, paths, resolver);
        } else {
            match fetch_remote_source(name, source, paths) {
                Ok(()) => print_row(name, &"✓".green(), &t!("fetch.fetched").green()),
                Err(e) => match e.downcast_ref::<SkillsyncError>() {
                    Some(SkillsyncError::MissingUrl) => {
                        print_row(name, &"○".dimmed(), &t!("fetch.no_url").dimmed());
                    }
                    _ => print_row(name, &"✗".red(), &first_line(&error_message(&e)).red()),
                },
            }
        }
    }

    println!(
        "\n{}\n",
        t!("fetch.stored_at", path = paths.store_dir.display()).dimmed()
    );
    Ok(())
}
