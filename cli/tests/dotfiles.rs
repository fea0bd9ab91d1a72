#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
//! Integration tests for configuration loading, package name translation
//! and dotfile linking against a temporary repository.

mod common;

use brainbash_cli::config::Config;
use brainbash_cli::platform::Distro;
use brainbash_cli::resources::symlink::{DotfileLinker, LinkOutcome};
use common::{TestRepo, links_to};

fn linker(repo: &TestRepo) -> DotfileLinker {
    DotfileLinker::new(&repo.root().join("config"), &repo.home()).with_clock(|| 1_700_000_000)
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn standard_repo_loads_in_declaration_order() {
    let repo = TestRepo::standard();
    let config = repo.load_config();
    let base: Vec<&str> = config.groups.base.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(base, vec!["git", "zsh", "python-dev"]);
    assert_eq!(config.groups.base[0].description.as_deref(), Some("Version control"));
    assert_eq!(config.dotfiles[1].destination, ".config/kitty/kitty.conf");
    assert_eq!(config.model("qwen").map(|m| m.tag.as_str()), Some("qwen3:0.6b"));
    assert!(config.validate().is_empty());
}

#[test]
fn missing_files_yield_empty_config() {
    let config = TestRepo::new().load_config();
    assert!(config.groups.base.is_empty());
    assert!(config.dotfiles.is_empty());
    assert!(config.models.is_empty());
}

#[test]
fn malformed_file_is_an_error() {
    let repo = TestRepo::new().with_config_file("models.toml", "[[models]\nid = ");
    let err = Config::load(&repo.root()).unwrap_err();
    assert!(err.to_string().contains("models.toml"));
}

#[test]
fn generic_names_translate_per_distro() {
    let config = TestRepo::standard().load_config();
    let names: Vec<&str> = [Distro::Debian, Distro::Alpine, Distro::Fedora]
        .into_iter()
        .map(|d| config.aliases.resolve("python-dev", d.id()))
        .collect();
    assert_eq!(names, vec!["python3-dev", "python3-dev", "python3-devel"]);
    assert_eq!(config.aliases.resolve("git", "alpine"), "git");
}

#[test]
fn validation_reports_missing_source_and_absolute_destination() {
    let repo = TestRepo::new().with_config_file(
        "dotfiles.toml",
        "[[links]]\nsource = \"ghost\"\ndestination = \"/etc/ghost\"\n",
    );
    let warnings = repo.load_config().validate();
    assert_eq!(warnings.len(), 2);
    assert!(warnings.iter().all(|w| w.source == "dotfiles.toml"));
}

// ---------------------------------------------------------------------------
// Linking
// ---------------------------------------------------------------------------

#[test]
fn link_twice_is_idempotent() {
    let repo = TestRepo::standard();
    let linker = linker(&repo);
    assert_eq!(linker.link("zshrc", ".zshrc"), LinkOutcome::Created);
    assert_eq!(linker.link("zshrc", ".zshrc"), LinkOutcome::AlreadyCorrect);
    assert!(links_to(&repo.home().join(".zshrc"), &repo.root().join("config/zshrc")));
}

#[test]
fn existing_file_is_backed_up_byte_for_byte() {
    let repo = TestRepo::standard();
    let original = b"export EDITOR=vim\n\x00binary tail";
    std::fs::write(repo.home().join(".zshrc"), original).unwrap();

    let backup = repo.home().join(".zshrc.bak.1700000000");
    assert_eq!(
        linker(&repo).link("zshrc", ".zshrc"),
        LinkOutcome::BackedUpAndCreated {
            backup: backup.clone()
        }
    );
    assert_eq!(std::fs::read(&backup).unwrap(), original);
    assert!(links_to(&repo.home().join(".zshrc"), &repo.root().join("config/zshrc")));
}

#[test]
fn stale_link_is_repointed() {
    let repo = TestRepo::standard();
    let dest = repo.home().join(".zshrc");
    std::os::unix::fs::symlink(repo.root().join("config/kitty.conf"), &dest).unwrap();

    assert_eq!(linker(&repo).link("zshrc", ".zshrc"), LinkOutcome::Updated);
    assert!(links_to(&dest, &repo.root().join("config/zshrc")));
}

#[test]
fn missing_source_leaves_destination_alone() {
    let repo = TestRepo::standard();
    std::fs::write(repo.home().join(".zshrc"), "mine").unwrap();

    assert_eq!(linker(&repo).link("nope", ".zshrc"), LinkOutcome::SourceMissing);
    assert_eq!(
        std::fs::read_to_string(repo.home().join(".zshrc")).unwrap(),
        "mine"
    );
}

#[test]
fn nested_destination_parents_are_created() {
    let repo = TestRepo::standard();
    let outcome = linker(&repo).link("kitty.conf", ".config/kitty/kitty.conf");
    assert_eq!(outcome, LinkOutcome::Created);
    assert!(repo.home().join(".config/kitty").is_dir());
}
