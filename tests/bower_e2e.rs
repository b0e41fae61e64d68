//! End-to-end runs against a scripted stand-in for the `bower` executable
//!
//! The script answers `info` and `install` the way Bower does in `--json`
//! mode: log entries on stderr, the result on stdout.

#![cfg(unix)]


use assert_cmd::Command;
use pkgscout::{BowerCli, Error, Installer, PackageId, TwoPassResolver};
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use tempfile::TempDir;
use test_utils::{sorted, TestWorkspace};

const FAKE_BOWER: &str = r#"#!/bin/sh
offline=no
for arg in "$@"; do
  [ "$arg" = "--offline" ] && offline=yes
done

cached() {
  cat >&2 <<JSON
[{"level":"info","id":"cached","message":"$3#$2","data":{"pkgMeta":{"name":"$1","_resolution":{"type":"version","tag":"$2"}},"resolver":{"name":"$1","source":"$3"}}}]
JSON
}

case "$1:$2" in
  info:acme/app#1.0.0)
    cached app v1.0.0 git://github.com/acme/app.git
    echo '{"name":"app","dependencies":{"lib":"^2.0.0"},"devDependencies":{"tester":"acme/tester#0.3.0"}}'
    ;;
  info:lib#^2.0.0)
    [ "$offline" = yes ] && cached lib v2.4.1 git://github.com/acme/lib.git
    echo '{"name":"lib","dependencies":{"missing":"acme/missing#1.0.0"}}'
    ;;
  info:acme/tester#0.3.0)
    cached tester 0.3.0 git://github.com/acme/tester.git
    echo '{"name":"tester"}'
    ;;
  install:acme/app#1.0.0)
    mkdir -p bower_components/app bower_components/lib
    echo '<link>' > bower_components/app/app.html
    cat <<JSON
{
  "lib": {"endpoint":{"name":"lib","source":"acme/lib","target":"^2.0.0"},"canonicalDir":"$PWD/bower_components/lib","pkgMeta":{"name":"lib","main":"lib.html"}},
  "app": {"endpoint":{"name":"app","source":"acme/app","target":"1.0.0"},"canonicalDir":"$PWD/bower_components/app","pkgMeta":{"name":"app","main":["app.html","extra.html"]}}
}
JSON
    ;;
  install:acme/bare#1.0.0)
    echo '{"bare":{"endpoint":{"name":"bare","source":"acme/bare","target":"1.0.0"},"canonicalDir":"/tmp/bare","pkgMeta":{"name":"bare"}}}'
    ;;
  *)
    echo '[{"level":"error","id":"ENOTFOUND","message":"Package '"$2"' not found"}]' >&2
    exit 1
    ;;
esac
"#;

/// Written once per test binary, before any test spawns a process, so no
/// child can inherit the script's open write handle (ETXTBSY).
static FAKE_BOWER_DIR: OnceLock<TempDir> = OnceLock::new();

fn fake_bower() -> PathBuf {
    let dir = FAKE_BOWER_DIR.get_or_init(|| {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = dir.path().join("fake-bower");
        fs::write(&path, FAKE_BOWER).expect("Failed to write fake bower");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake bower executable");
        dir
    });
    dir.path().join("fake-bower")
}

fn bower(workspace: &TestWorkspace) -> BowerCli {
    BowerCli::new(fake_bower().display().to_string(), &workspace.work_dir)
}

#[tokio::test]
async fn test_two_pass_resolution_through_bower() {
    let workspace = TestWorkspace::new();
    let resolver = TwoPassResolver::new(Arc::new(bower(&workspace)));

    let list = resolver.resolve_all("acme", "app", "1.0.0").await.unwrap();

    let summary: Vec<_> = sorted(list)
        .into_iter()
        .map(|d| format!("{} {}/{}#{}", d.name, d.owner, d.repo, d.version))
        .collect();
    assert_eq!(
        summary,
        vec![
            "app acme/app#v1.0.0",
            "lib acme/lib#v2.4.1",
            "tester acme/tester#0.3.0",
        ]
    );
}

#[tokio::test]
async fn test_install_finds_entry_points() {
    let workspace = TestWorkspace::new();
    let installer = Installer::new(bower(&workspace), workspace.components_dir());

    let package: PackageId = "acme/app#1.0.0".parse().unwrap();
    let entries = installer.install(&package).await.unwrap();

    assert_eq!(entries.len(), 2);
    assert!(entries[0].ends_with("bower_components/app/app.html"));
    assert!(entries[0].exists());
    assert!(entries[1].ends_with("bower_components/app/extra.html"));

    installer.prune().await.unwrap();
    assert!(!workspace.components_dir().exists());
}

#[tokio::test]
async fn test_install_without_main() {
    let workspace = TestWorkspace::new();
    let installer = Installer::new(bower(&workspace), workspace.components_dir());

    let package: PackageId = "acme/bare#1.0.0".parse().unwrap();
    assert!(matches!(
        installer.install(&package).await,
        Err(Error::MissingEntryPoint(_))
    ));
}

#[tokio::test]
async fn test_install_failure_carries_bower_message() {
    let workspace = TestWorkspace::new();
    let installer = Installer::new(bower(&workspace), workspace.components_dir());

    let package: PackageId = "acme/unknown#1.0.0".parse().unwrap();
    let err = installer.install(&package).await.unwrap_err();
    assert!(matches!(err, Error::Install(_)));
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_analyze_command_reports_everything() {
    let workspace = TestWorkspace::new();
    workspace.configure(&fake_bower().display().to_string());

    Command::new(env!("CARGO_BIN_EXE_pkgscout"))
        .env("PKGSCOUT_CONFIG_DIR", &workspace.config_dir)
        .env_remove("PKGSCOUT_BOWER")
        .env_remove("RUST_LOG")
        .args(["analyze", "acme/app#1.0.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"entry_points\""))
        .stdout(predicate::str::contains("app.html"))
        .stdout(predicate::str::contains("\"version\": \"v2.4.1\""))
        .stdout(predicate::str::contains("\"resolved_at\""));

    assert!(!workspace.components_dir().exists());
}
