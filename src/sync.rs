//! Sync distributor: wipe each enabled target and recopy every mirrored skill.

use crate::config::SyncPaths;
use crate::error::SkillsyncError;
use crate::store::{Config, ConfigStore};
use anyhow::Result;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Every skill directory currently in the mirror: enabled remote sources in
/// config order, then the flat local area. Name collisions across sources are
/// resolved later by copy order (last write wins) and are not detected here.
pub fn collect_skill_dirs(config: &Config, paths: &SyncPaths) -> Vec<PathBuf> {
    let mut skills = Vec::new();

    for (name, source) in &config.sources {
        if !source.enabled || source.is_local() {
            continue;
        }
        push_subdirs(&paths.source_store_dir(name), &mut skills);
    }

    push_subdirs(&paths.local_store_dir(), &mut skills);
    skills
}

fn push_subdirs(dir: &Path, skills: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    let mut found: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|ft| ft.is_dir()))
        .map(|entry| entry.path())
        .collect();
    found.sort();
    skills.append(&mut found);
}

/// Copy one skill into a target by directory name, replacing whatever is
/// already there.
fn copy_skill_to_target(skill_dir: &Path, target_dir: &Path) -> Result<()> {
    let Some(name) = skill_dir.file_name() else {
        return Ok(());
    };
    let dest = target_dir.join(name);
    if dest.exists() {
        fs::remove_dir_all(&dest)?;
    }
    crate::fetch::copy_dir(skill_dir, &dest)
}

/// Wipe the target's immediate contents, then copy every mirrored skill in.
fn sync_one_target(target_path: &Path, skills: &[PathBuf]) -> Result<()> {
    fs::create_dir_all(target_path)?;

    for entry in fs::read_dir(target_path)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }

    for skill in skills {
        copy_skill_to_target(skill, target_path)?;
    }
    Ok(())
}

/// `sync`: distribute the mirror into every enabled target. Per-target
/// failures are reported and do not stop the remaining targets.
pub fn run(store: &ConfigStore) -> Result<()> {
    let config = store.load()?;
    let paths = store.paths();

    println!("\n{}\n", t!("sync.header").bold());

    let skills = collect_skill_dirs(&config, paths);
    if skills.is_empty() {
        println!("{}\n", t!("sync.no_skills").dimmed());
        return Ok(());
    }

    let enabled_sources = config.sources.values().filter(|s| s.enabled).count();
    println!(
        "{}\n",
        t!(
            "sync.summary",
            skills = skills.len(),
            sources = enabled_sources
        )
        .dimmed()
    );

    for (name, target) in &config.targets {
        if !target.enabled {
            println!(
                "  {} {:<15} {}",
                "○".dimmed(),
                name,
                t!("sync.disabled").dimmed()
            );
            continue;
        }
        match sync_one_target(&target.path, &skills) {
            Ok(()) => println!(
                "  {} {:<15} {}",
                "✓".green(),
                name,
                t!("sync.synced").green()
            ),
            Err(e) => {
                let message = e
                    .downcast_ref::<SkillsyncError>()
                    .map(SkillsyncError::display_localized)
                    .unwrap_or_else(|| e.to_string());
                println!("  {} {:<15} {}", "✗".red(), name, message.red());
            }
        }
    }

    println!("\n{}\n", t!("sync.done").bold());
    Ok(())
}
