//! End-to-end tests for the `gitmodel` binary.
//!
//! These tests exercise the full CLI against real repositories.

mod support;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use support::{symbolic_chain, TestRepo};

/// A `gitmodel` command isolated from the user's configuration.
fn gitmodel(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gitmodel").unwrap();
    cmd.env("GITMODEL_CONFIG", config_home.path().join("absent.toml"))
        .env("XDG_CONFIG_HOME", config_home.path())
        .env("HOME", config_home.path())
        .env_remove("RUST_LOG");
    cmd
}

/// Run `gitmodel` inside `repo`.
fn in_repo(repo: &TestRepo, config_home: &TempDir) -> Command {
    let mut cmd = gitmodel(config_home);
    cmd.arg("--cwd").arg(repo.path());
    cmd
}

#[test]
fn help_flag_works() {
    let home = TempDir::new().unwrap();
    gitmodel(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("typed object model"));
}

#[test]
fn version_flag_works() {
    let home = TempDir::new().unwrap();
    gitmodel(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gitmodel"));
}

#[test]
fn outside_a_repository_fails() {
    let home = TempDir::new().unwrap();
    let empty = TempDir::new().unwrap();
    gitmodel(&home)
        .arg("--cwd")
        .arg(empty.path())
        .args(["rev-parse", "HEAD"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a git repository"));
}

mod revisions {
    use super::*;

    #[test]
    fn rev_parse_prints_full_id() {
        let home = TempDir::new().unwrap();
        let (repo, commit) = TestRepo::with_initial_commit();
        in_repo(&repo, &home)
            .args(["rev-parse", "HEAD"])
            .assert()
            .success()
            .stdout(format!("{}\n", commit.to_hex()));
    }

    #[test]
    fn rev_parse_json() {
        let home = TempDir::new().unwrap();
        let (repo, commit) = TestRepo::with_initial_commit();
        let output = in_repo(&repo, &home)
            .args(["rev-parse", "main", "--json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(value["rev"], "main");
        assert_eq!(value["id"], commit.to_hex());
    }

    #[test]
    fn unknown_revision_fails() {
        let home = TempDir::new().unwrap();
        let (repo, _) = TestRepo::with_initial_commit();
        in_repo(&repo, &home)
            .args(["rev-parse", "no-such-thing"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("revision not found"));
    }

    #[test]
    fn resolve_follows_shorthand() {
        let home = TempDir::new().unwrap();
        let (repo, commit) = TestRepo::with_initial_commit();
        repo.write_direct("refs/remotes/origin/main", &commit);
        repo.write_symbolic("refs/remotes/origin/HEAD", "refs/remotes/origin/main");

        in_repo(&repo, &home)
            .args(["resolve", "origin"])
            .assert()
            .success()
            .stdout(predicate::str::contains(commit.to_hex()));
    }

    #[test]
    fn resolve_honors_repository_depth() {
        let home = TempDir::new().unwrap();
        let (repo, commit) = TestRepo::with_initial_commit();
        let start = symbolic_chain(&repo, 2, &commit);

        in_repo(&repo, &home)
            .args(["resolve", &start])
            .assert()
            .success();

        let config = repo.git_dir().join("gitmodel/config.toml");
        std::fs::create_dir_all(config.parent().unwrap()).unwrap();
        std::fs::write(&config, "[resolve]\nmax_symbolic_depth = 1\n").unwrap();

        in_repo(&repo, &home)
            .args(["resolve", &start])
            .assert()
            .failure()
            .stderr(predicate::str::contains("exceeded 1 symbolic hops"));
    }

    #[test]
    fn debug_reports_loaded_config() {
        let home = TempDir::new().unwrap();
        let (repo, _) = TestRepo::with_initial_commit();
        let config = repo.git_dir().join("gitmodel/config.toml");
        std::fs::create_dir_all(config.parent().unwrap()).unwrap();
        std::fs::write(&config, "[resolve]\nmax_symbolic_depth = 3\n").unwrap();

        in_repo(&repo, &home)
            .args(["--debug", "rev-parse", "HEAD"])
            .assert()
            .success()
            .stderr(predicate::str::contains("loaded configuration"))
            .stderr(predicate::str::contains("config.toml"));
    }
}

mod objects {
    use super::*;

    #[test]
    fn show_commit() {
        let home = TempDir::new().unwrap();
        let (repo, commit) = TestRepo::with_initial_commit();
        in_repo(&repo, &home)
            .args(["show", "HEAD"])
            .assert()
            .success()
            .stdout(predicate::str::contains(format!("commit {}", commit.to_hex())))
            .stdout(predicate::str::contains(
                "author Test User <test@example.com> 1700000000 +0100",
            ))
            .stdout(predicate::str::contains("    Initial commit"));
    }

    #[test]
    fn show_tree_lists_entries() {
        let home = TempDir::new().unwrap();
        let (repo, _) = TestRepo::with_initial_commit();
        in_repo(&repo, &home)
            .args(["show", "HEAD^{tree}"])
            .assert()
            .success()
            .stdout(predicate::str::contains("blob"))
            .stdout(predicate::str::contains("\tREADME.md"));
    }

    #[test]
    fn show_blob_prints_content() {
        let home = TempDir::new().unwrap();
        let (repo, _) = TestRepo::with_initial_commit();
        in_repo(&repo, &home)
            .args(["show", "HEAD:README.md"])
            .assert()
            .success()
            .stdout("# Test Repo\n");
    }

    #[test]
    fn log_limits_count() {
        let home = TempDir::new().unwrap();
        let (repo, _) = TestRepo::with_initial_commit();
        repo.commit_files("refs/heads/main", &[("a", b"a")], "Second");
        repo.commit_files("refs/heads/main", &[("b", b"b")], "Third");

        let output = in_repo(&repo, &home)
            .args(["log", "-n", "2"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let stdout = String::from_utf8(output.stdout).unwrap();
        let summaries: Vec<_> = stdout
            .lines()
            .map(|line| line.split_once(' ').unwrap().1)
            .collect();
        assert_eq!(summaries, ["Third", "Second"]);
    }

    #[test]
    fn quiet_suppresses_output() {
        let home = TempDir::new().unwrap();
        let (repo, _) = TestRepo::with_initial_commit();
        in_repo(&repo, &home)
            .args(["log", "-q"])
            .assert()
            .success()
            .stdout("");
    }
}

mod references {
    use super::*;

    #[test]
    fn refs_json_lists_sorted_references() {
        let home = TempDir::new().unwrap();
        let (repo, commit) = TestRepo::with_initial_commit();
        repo.write_direct("refs/heads/feature", &commit);
        repo.lightweight_tag("v1", &commit);

        let output = in_repo(&repo, &home)
            .args(["--json", "refs", "--prefix", "refs/heads/"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let rows: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
        let names: Vec<_> = rows.iter().map(|row| row["name"].as_str().unwrap()).collect();
        assert_eq!(names, ["refs/heads/feature", "refs/heads/main"]);
        assert_eq!(rows[0]["id"], commit.to_hex());
    }

    #[test]
    fn branches_mark_current() {
        let home = TempDir::new().unwrap();
        let (repo, commit) = TestRepo::with_initial_commit();
        repo.write_direct("refs/heads/feature", &commit);

        in_repo(&repo, &home)
            .arg("branches")
            .assert()
            .success()
            .stdout(predicate::str::contains("* main"))
            .stdout(predicate::str::contains("  feature"));
    }

    #[test]
    fn tags_are_listed() {
        let home = TempDir::new().unwrap();
        let (repo, commit) = TestRepo::with_initial_commit();
        repo.annotated_tag("v2", &commit, "two");
        repo.lightweight_tag("v1", &commit);

        in_repo(&repo, &home)
            .arg("tags")
            .assert()
            .success()
            .stdout(predicate::str::contains("v1"))
            .stdout(predicate::str::contains("v2"));
    }
}

mod remotes {
    use super::*;

    #[test]
    fn add_then_list() {
        let home = TempDir::new().unwrap();
        let repo = TestRepo::new();

        in_repo(&repo, &home)
            .args(["remote", "add", "origin", "https://example.com/r.git"])
            .assert()
            .success();

        in_repo(&repo, &home)
            .args(["remote", "list", "-v"])
            .assert()
            .success()
            .stdout("origin\thttps://example.com/r.git\n");
    }

    #[test]
    fn duplicate_add_fails() {
        let home = TempDir::new().unwrap();
        let repo = TestRepo::new();
        in_repo(&repo, &home)
            .args(["remote", "add", "origin", "https://example.com/r.git"])
            .assert()
            .success();

        in_repo(&repo, &home)
            .args(["remote", "add", "origin", "https://example.com/other.git"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("remote already exists: origin"));
    }

    #[test]
    fn set_url_and_show() {
        let home = TempDir::new().unwrap();
        let repo = TestRepo::new();
        in_repo(&repo, &home)
            .args(["remote", "add", "origin", "https://example.com/r.git"])
            .assert()
            .success();
        in_repo(&repo, &home)
            .args(["remote", "set-url", "--push", "origin", "ssh://example.com/r.git"])
            .assert()
            .success();

        in_repo(&repo, &home)
            .args(["remote", "show", "origin"])
            .assert()
            .success()
            .stdout(predicate::str::contains("fetch url: https://example.com/r.git"))
            .stdout(predicate::str::contains("push url:  ssh://example.com/r.git"));
    }

    #[test]
    fn rename_and_remove() {
        let home = TempDir::new().unwrap();
        let repo = TestRepo::new();
        in_repo(&repo, &home)
            .args(["remote", "add", "origin", "https://example.com/r.git"])
            .assert()
            .success();
        in_repo(&repo, &home)
            .args(["remote", "rename", "origin", "upstream"])
            .assert()
            .success();
        in_repo(&repo, &home)
            .args(["remote", "remove", "upstream"])
            .assert()
            .success();

        in_repo(&repo, &home)
            .args(["remote", "list"])
            .assert()
            .success()
            .stdout("");
    }
}
