use anyhow::anyhow;
use skillsync::config::SyncPaths;
use skillsync::fetch;
use skillsync::interactive::{ConflictResolution, ConflictResolver};
use skillsync::store::{Config, ConfigStore, Source, Target};
use skillsync::sync;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct NeverResolver;

impl ConflictResolver for NeverResolver {
    fn resolve(&mut self, skill_name: &str) -> anyhow::Result<ConflictResolution> {
        Err(anyhow!("unexpected prompt for {skill_name}"))
    }
}

struct AlwaysOverwrite;

impl ConflictResolver for AlwaysOverwrite {
    fn resolve(&mut self, _skill_name: &str) -> anyhow::Result<ConflictResolution> {
        Ok(ConflictResolution::YesAll)
    }
}

fn write_skill(root: &Path, skill: &str, content: &str) {
    let dir = root.join(skill);
    fs::create_dir_all(&dir).expect("skill dir");
    fs::write(dir.join("SKILL.md"), content).expect("skill file");
}

fn store_in(temp: &TempDir) -> ConfigStore {
    ConfigStore::new(SyncPaths::from_config_dir(temp.path().join("config")))
}

#[test]
fn test_fetch_then_sync_distributes_local_skills() {
    let temp = TempDir::new().expect("temp dir");
    let store = store_in(&temp);

    let source_dir = temp.path().join("my-skills");
    write_skill(&source_dir, "alpha", "alpha v1");
    write_skill(&source_dir, "beta", "beta v1");

    let target_dir = temp.path().join("tool-skills");
    let off_target_dir = temp.path().join("off-tool-skills");

    let mut config = Config::default();
    config.sources.insert(
        source_dir.to_string_lossy().to_string(),
        Source::local(&source_dir),
    );
    config.targets.insert(
        "tool".to_string(),
        Target {
            path: target_dir.clone(),
            enabled: true,
        },
    );
    config.targets.insert(
        "off-tool".to_string(),
        Target {
            path: off_target_dir.clone(),
            enabled: false,
        },
    );
    store.save(&config).expect("save config");

    fetch::run(&store, None, &mut NeverResolver).expect("fetch");
    let local_mirror = store.paths().local_store_dir();
    assert!(local_mirror.join("alpha").join("SKILL.md").exists());
    assert!(local_mirror.join("beta").join("SKILL.md").exists());

    sync::run(&store).expect("sync");
    assert_eq!(
        fs::read_to_string(target_dir.join("alpha").join("SKILL.md")).expect("read"),
        "alpha v1"
    );
    assert!(target_dir.join("beta").exists());
    assert!(!off_target_dir.exists());
}

#[test]
fn test_second_fetch_skips_identical_without_prompting() {
    let temp = TempDir::new().expect("temp dir");
    let store = store_in(&temp);

    let source_dir = temp.path().join("my-skills");
    write_skill(&source_dir, "alpha", "stable");

    let mut config = Config::default();
    config.sources.insert(
        source_dir.to_string_lossy().to_string(),
        Source::local(&source_dir),
    );
    store.save(&config).expect("save config");

    // NeverResolver fails the test if any run prompts
    fetch::run(&store, None, &mut NeverResolver).expect("first fetch");
    fetch::run(&store, None, &mut NeverResolver).expect("second fetch");

    let mirrored = store
        .paths()
        .local_store_dir()
        .join("alpha")
        .join("SKILL.md");
    assert_eq!(fs::read_to_string(mirrored).expect("read"), "stable");
}

#[test]
fn test_changed_local_skill_overwritten_on_yes_all() {
    let temp = TempDir::new().expect("temp dir");
    let store = store_in(&temp);

    let source_dir = temp.path().join("my-skills");
    write_skill(&source_dir, "alpha", "v1");

    let mut config = Config::default();
    config.sources.insert(
        source_dir.to_string_lossy().to_string(),
        Source::local(&source_dir),
    );
    store.save(&config).expect("save config");

    fetch::run(&store, None, &mut NeverResolver).expect("first fetch");
    fs::write(source_dir.join("alpha").join("SKILL.md"), "v2").expect("edit source");
    fetch::run(&store, None, &mut AlwaysOverwrite).expect("second fetch");

    let mirrored = store
        .paths()
        .local_store_dir()
        .join("alpha")
        .join("SKILL.md");
    assert_eq!(fs::read_to_string(mirrored).expect("read"), "v2");
}

#[test]
fn test_fetch_unknown_source_name_is_an_error() {
    let temp = TempDir::new().expect("temp dir");
    let store = store_in(&temp);
    store.save(&Config::default()).expect("save config");

    let result = fetch::run(&store, Some("owner/nope"), &mut NeverResolver);
    assert!(result.is_err());
}

#[test]
fn test_disabled_source_is_not_fetched() {
    let temp = TempDir::new().expect("temp dir");
    let store = store_in(&temp);

    let source_dir = temp.path().join("my-skills");
    write_skill(&source_dir, "alpha", "content");

    let mut source = Source::local(&source_dir);
    source.enabled = false;
    let mut config = Config::default();
    config
        .sources
        .insert(source_dir.to_string_lossy().to_string(), source);
    store.save(&config).expect("save config");

    fetch::run(&store, None, &mut NeverResolver).expect("fetch");
    assert!(!store.paths().local_store_dir().join("alpha").exists());
}

#[test]
fn test_sync_collision_local_wins_over_remote() {
    let temp = TempDir::new().expect("temp dir");
    let store = store_in(&temp);

    // Simulate an already-fetched remote mirror entry plus a local mirror
    // entry with the same skill name.
    write_skill(
        &store.paths().source_store_dir("owner/repo"),
        "shared",
        "from remote",
    );
    write_skill(&store.paths().local_store_dir(), "shared", "from local");

    let target_dir = temp.path().join("tool-skills");
    let mut config = Config::default();
    config.sources.insert(
        "owner/repo".to_string(),
        Source::remote("https://github.com/owner/repo", None),
    );
    config.sources.insert(
        "/somewhere/skills".to_string(),
        Source::local("/somewhere/skills"),
    );
    config.targets.insert(
        "tool".to_string(),
        Target {
            path: target_dir.clone(),
            enabled: true,
        },
    );
    store.save(&config).expect("save config");

    sync::run(&store).expect("sync");
    assert_eq!(
        fs::read_to_string(target_dir.join("shared").join("SKILL.md")).expect("read"),
        "from local"
    );
}

#[test]
fn test_sync_wipes_stale_target_entries() {
    let temp = TempDir::new().expect("temp dir");
    let store = store_in(&temp);

    write_skill(&store.paths().local_store_dir(), "fresh", "new");

    let target_dir = temp.path().join("tool-skills");
    write_skill(&target_dir, "stale", "gone after sync");

    let mut config = Config::default();
    config.sources.insert(
        "/somewhere/skills".to_string(),
        Source::local("/somewhere/skills"),
    );
    config.targets.insert(
        "tool".to_string(),
        Target {
            path: target_dir.clone(),
            enabled: true,
        },
    );
    store.save(&config).expect("save config");

    sync::run(&store).expect("sync");
    assert!(target_dir.join("fresh").exists());
    assert!(!target_dir.join("stale").exists());
}
