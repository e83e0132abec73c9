//! Read-only commands: `init`, `status`, `list`, `config`.

use crate::path_utils::collapse_path;
use crate::store::ConfigStore;
use anyhow::Result;
use colored::Colorize;
use std::fs;
use std::path::Path;

fn subdir_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|ft| ft.is_dir()))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();
    names
}

pub fn init(store: &ConfigStore) -> Result<()> {
    let paths = store.paths();

    if paths.config_file.exists() {
        println!(
            "\n{}\n",
            t!("init.already_exists", path = paths.config_file.display()).dimmed()
        );
        return Ok(());
    }

    // First load writes the default document
    let config = store.load()?;

    println!("\n{}\n", t!("init.done").bold());
    println!(
        "{}",
        t!("init.config_path", path = paths.config_file.display()).dimmed()
    );
    println!(
        "{}\n",
        t!("init.store_path", path = paths.store_dir.display()).dimmed()
    );

    println!("{}", t!("init.default_sources"));
    for name in config.sources.keys() {
        println!("{}", format!("  • {name}").dimmed());
    }
    println!();

    println!("{}", t!("init.default_targets"));
    let target_names: Vec<&str> = config.targets.keys().map(String::as_str).collect();
    println!("{}\n", format!("  • {}", target_names.join(", ")).dimmed());

    println!("{}", t!("init.next_steps").bold());
    println!("{}", t!("init.next_fetch").dimmed());
    println!("{}", t!("init.next_sync").dimmed());
    println!("{}\n", t!("init.next_status").dimmed());
    Ok(())
}

pub fn status(store: &ConfigStore) -> Result<()> {
    let config = store.load()?;
    let paths = store.paths();

    println!("\n{}\n", t!("status.sources_header").bold());
    for (name, source) in &config.sources {
        let symbol = if source.enabled {
            "✓".green()
        } else {
            "○".dimmed()
        };
        let mirror_dir = if source.is_local() {
            paths.local_store_dir()
        } else {
            paths.source_store_dir(name)
        };
        let skills = subdir_names(&mirror_dir);
        let state = if skills.is_empty() {
            t!("status.not_fetched").dimmed()
        } else {
            t!("status.fetched", count = skills.len()).green()
        };
        println!("  {} {:<30} {}", symbol, name, state);
    }

    println!("\n{}\n", t!("status.targets_header").bold());
    if config.targets.is_empty() {
        println!("{}", t!("status.no_targets").dimmed());
    }
    for (name, target) in &config.targets {
        let symbol = if target.enabled {
            "✓".green()
        } else {
            "○".dimmed()
        };
        let count = subdir_names(&target.path).len();
        println!(
            "  {} {:<15} {} {}",
            symbol,
            name,
            collapse_path(&target.path).dimmed(),
            t!("status.target_skills", count = count).dimmed()
        );
    }
    println!();
    Ok(())
}

pub fn list(store: &ConfigStore) -> Result<()> {
    let config = store.load()?;
    let paths = store.paths();
    let mut found_any = false;

    println!("\n{}\n", t!("list.header").bold());

    for (name, source) in &config.sources {
        if !source.enabled || source.is_local() {
            continue;
        }
        let skills = subdir_names(&paths.source_store_dir(name));
        if skills.is_empty() {
            continue;
        }
        found_any = true;
        println!("{}", name.bold());
        for skill in skills {
            println!("  {skill}");
        }
        println!();
    }

    let local_skills = subdir_names(&paths.local_store_dir());
    if !local_skills.is_empty() {
        found_any = true;
        println!("{}", t!("list.local_section").bold());
        for skill in local_skills {
            println!("  {skill}");
        }
        println!();
    }

    if !found_any {
        println!("{}\n", t!("list.empty").dimmed());
    }
    Ok(())
}

pub fn show_config(store: &ConfigStore) -> Result<()> {
    let config = store.load()?;
    println!(
        "\n{}",
        t!("config.path", path = store.paths().config_file.display()).dimmed()
    );
    println!("{}\n", serde_json::to_string_pretty(&config)?);
    Ok(())
}
