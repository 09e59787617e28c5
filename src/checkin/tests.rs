// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{CheckInViewModel, PendingChangesObserver, RepositoryEntry, reconcile};
use crate::config::types::BuildDefinition;
use crate::error::{CiError, CiResult, ScmError};
use crate::scm::{Change, ChangeType, SourceControl};

/// In-memory source control recording every delegated call.
#[derive(Default)]
struct FakeSourceControl {
    changes: Mutex<Vec<Change>>,
    calls: Mutex<Vec<String>>,
    polls: AtomicUsize,
    fail: AtomicBool,
}

impl FakeSourceControl {
    fn with_changes(paths: &[&str]) -> Arc<Self> {
        let sc = Arc::new(Self::default());
        sc.set_changes(paths);
        sc
    }

    fn set_changes(&self, paths: &[&str]) {
        *self.changes.lock().unwrap() = paths
            .iter()
            .map(|p| Change::new(*p, ChangeType::Modified))
            .collect();
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl SourceControl for FakeSourceControl {
    async fn pending_changes(&self, _root: &Path) -> CiResult<Vec<Change>> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(ScmError::CommandFailed {
                command: "status".to_string(),
                message: "index locked".to_string(),
            }
            .into());
        }
        Ok(self.changes.lock().unwrap().clone())
    }

    fn revert(&self, _root: &Path, file: &str) -> CiResult<()> {
        self.calls.lock().unwrap().push(format!("revert {file}"));
        Ok(())
    }

    fn ignore(&self, _root: &Path, pattern: &str) -> CiResult<()> {
        self.calls.lock().unwrap().push(format!("ignore {pattern}"));
        Ok(())
    }

    fn diff_to_previous(&self, _root: &Path, file: &str, diff_tool: &Path) -> CiResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("diff {file} {}", diff_tool.display()));
        Ok(())
    }
}

fn entry(path: &str, checked: bool) -> RepositoryEntry {
    RepositoryEntry::new(Change::new(path, ChangeType::Modified), checked)
}

fn modified(paths: &[&str]) -> Vec<Change> {
    paths
        .iter()
        .map(|p| Change::new(*p, ChangeType::Modified))
        .collect()
}

fn summary(files: &[RepositoryEntry]) -> Vec<(String, bool)> {
    files
        .iter()
        .map(|e| (e.file().to_string(), e.is_checked()))
        .collect()
}

fn definition_for(root: &Path) -> BuildDefinition {
    BuildDefinition {
        repository_root: Some(root.to_path_buf()),
        ..Default::default()
    }
}

/// A view model over a temp repository root, not yet observing.
fn view_model(sc: &Arc<FakeSourceControl>, root: &Path) -> CheckInViewModel<FakeSourceControl> {
    CheckInViewModel::new(Arc::clone(sc), Duration::from_secs(3600))
        .with_definition(&definition_for(root))
}

#[test]
fn test_reconcile_preserves_selection() {
    let current = [entry("a", true), entry("b", false)];
    let result = reconcile(&current, modified(&["c", "b", "a"]));

    insta::assert_debug_snapshot!(summary(&result), @r#"
    [
        (
            "a",
            true,
        ),
        (
            "b",
            false,
        ),
        (
            "c",
            true,
        ),
    ]
    "#);
}

#[test]
fn test_reconcile_drops_vanished_paths() {
    let current = [entry("gone.txt", false), entry("kept.txt", false)];
    let result = reconcile(&current, modified(&["kept.txt"]));
    assert_eq!(summary(&result), [("kept.txt".to_string(), false)]);

    // An unchecked path that disappeared comes back checked.
    let result = reconcile(&result, modified(&["gone.txt", "kept.txt"]));
    assert_eq!(
        summary(&result),
        [("gone.txt".to_string(), true), ("kept.txt".to_string(), false)]
    );
}

#[test]
fn test_reconcile_sorts_ordinally() {
    let result = reconcile(&[], modified(&["b.txt", "B.txt", "a/z.txt", "a.txt"]));
    let files: Vec<_> = result.iter().map(RepositoryEntry::file).collect();
    assert_eq!(files, ["B.txt", "a.txt", "a/z.txt", "b.txt"]);
}

#[tokio::test]
async fn test_refresh_is_idempotent() {
    let temp = tempfile::tempdir().unwrap();
    let sc = FakeSourceControl::with_changes(&["src/b.rs", "src/a.rs"]);
    let vm = view_model(&sc, temp.path());

    vm.refresh_pending_changes().await.unwrap();
    assert!(vm.set_checked("src/b.rs", false));
    let first = vm.files();
    vm.refresh_pending_changes().await.unwrap();
    assert_eq!(vm.files(), first);
    assert_eq!(vm.checked_files(), ["src/a.rs"]);
}

#[tokio::test]
async fn test_refresh_without_valid_root_is_noop() {
    let sc = FakeSourceControl::with_changes(&["a"]);
    let vm = CheckInViewModel::new(Arc::clone(&sc), Duration::from_secs(3600));
    vm.refresh_pending_changes().await.unwrap();

    let vm = vm.with_definition(&definition_for(Path::new("/nonexistent/plainci/root")));
    vm.refresh_pending_changes().await.unwrap();

    assert!(vm.files().is_empty());
    assert_eq!(sc.polls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_refresh_propagates_errors() {
    let temp = tempfile::tempdir().unwrap();
    let sc = FakeSourceControl::with_changes(&["a"]);
    sc.fail.store(true, Ordering::SeqCst);
    let vm = view_model(&sc, temp.path());

    let err = vm.refresh_pending_changes().await.unwrap_err();
    assert!(matches!(err, CiError::Scm(_)));
}

#[test]
fn test_set_checked_unknown_path() {
    let sc = FakeSourceControl::with_changes(&[]);
    let vm = CheckInViewModel::new(sc, Duration::from_secs(1));
    assert!(!vm.set_checked("missing", false));
}

#[test]
fn test_listeners_see_every_replacement() {
    let temp = tempfile::tempdir().unwrap();
    let sc = FakeSourceControl::with_changes(&[]);
    let vm = view_model(&sc, temp.path());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    vm.subscribe(move |files| sink.lock().unwrap().push(files.len()));

    vm.apply_pending_changes(modified(&["a"]));
    vm.apply_pending_changes(modified(&["a", "b"]));
    assert_eq!(*seen.lock().unwrap(), [1, 2]);
}

#[test]
fn test_operations_delegate_patterns() {
    let temp = tempfile::tempdir().unwrap();
    let sc = FakeSourceControl::with_changes(&[]);
    let vm = view_model(&sc, temp.path());

    vm.revert("src/a.txt").unwrap();
    vm.ignore_file("src/a.txt").unwrap();
    vm.ignore_extension("src/a.txt").unwrap();
    vm.ignore_directory("src/a.txt").unwrap();

    insta::assert_debug_snapshot!(sc.calls(), @r#"
    [
        "revert src/a.txt",
        "ignore /src/a.txt",
        "ignore *.txt",
        "ignore /src",
    ]
    "#);
}

#[test]
fn test_operations_reject_empty_path() {
    let temp = tempfile::tempdir().unwrap();
    let sc = FakeSourceControl::with_changes(&[]);
    let vm = view_model(&sc, temp.path());

    assert!(vm.revert("").is_err());
    assert!(vm.ignore_file("").is_err());
    assert!(vm.ignore_extension("").is_err());
    assert!(vm.ignore_directory(" ").is_err());
    assert!(sc.calls().is_empty());
}

#[test]
fn test_operations_require_valid_root() {
    let sc = FakeSourceControl::with_changes(&[]);
    let vm = CheckInViewModel::new(Arc::clone(&sc), Duration::from_secs(1));

    let err = vm.revert("a.txt").unwrap_err();
    assert!(matches!(err, CiError::Config(_)));
    assert!(sc.calls().is_empty());
}

#[test]
fn test_diff_to_previous() {
    let temp = tempfile::tempdir().unwrap();
    let sc = FakeSourceControl::with_changes(&[]);
    let mut vm = view_model(&sc, temp.path());

    assert!(!vm.can_diff_to_previous());
    vm.set_selected_file(Some("src/a.txt".to_string()));
    let err = vm.diff_to_previous().unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"source control error: no diff tool configured");

    let mut definition = definition_for(temp.path());
    definition.diff_tool = Some(PathBuf::from("meld"));
    let mut vm = vm.with_definition(&definition);
    assert!(vm.can_diff_to_previous());
    vm.set_selected_file(None);
    assert!(vm.diff_to_previous().is_err());

    vm.set_selected_file(Some("src/a.txt".to_string()));
    vm.diff_to_previous().unwrap();
    assert_eq!(sc.calls(), ["diff src/a.txt meld"]);
}

#[test]
fn test_check_in_comment() {
    let sc = FakeSourceControl::with_changes(&[]);
    let mut vm = CheckInViewModel::new(sc, Duration::from_secs(1));
    assert_eq!(vm.check_in_comment(), "");
    vm.set_check_in_comment("fix build");
    assert_eq!(vm.check_in_comment(), "fix build");
}

#[tokio::test]
async fn test_activation_follows_repository_root() {
    let temp = tempfile::tempdir().unwrap();
    let sc = FakeSourceControl::with_changes(&[]);
    let mut vm = CheckInViewModel::new(Arc::clone(&sc), Duration::from_secs(3600));

    vm.set_build_definition(&BuildDefinition::default());
    assert!(!vm.is_observing());

    vm.set_build_definition(&definition_for(&temp.path().join("missing")));
    assert!(!vm.is_observing());

    vm.set_build_definition(&definition_for(temp.path()));
    assert!(vm.is_observing());

    vm.set_build_definition(&BuildDefinition::default());
    assert!(!vm.is_observing());
}

#[tokio::test]
async fn test_activate_requires_valid_root() {
    let temp = tempfile::tempdir().unwrap();
    let sc = FakeSourceControl::with_changes(&[]);

    let mut inactive = CheckInViewModel::new(Arc::clone(&sc), Duration::from_secs(3600));
    assert!(!inactive.activate());

    let mut vm = view_model(&sc, temp.path());
    assert!(!vm.is_observing());
    assert!(vm.activate());
    assert!(vm.activate());
    vm.deactivate();
    assert!(!vm.is_observing());
}

#[tokio::test]
async fn test_diff_tool_change_keeps_observer() {
    let temp = tempfile::tempdir().unwrap();
    let sc = FakeSourceControl::with_changes(&[]);
    let mut vm = CheckInViewModel::new(Arc::clone(&sc), Duration::from_secs(3600));

    let mut definition = definition_for(temp.path());
    vm.set_build_definition(&definition);
    let first = vm.observer.as_ref().map(|o| o.cancel.clone()).unwrap();

    definition.diff_tool = Some(PathBuf::from("meld"));
    vm.set_build_definition(&definition);
    assert!(vm.is_observing());
    assert!(!first.is_cancelled());
    assert!(vm.can_diff_to_previous());
}

#[tokio::test]
async fn test_observer_feeds_view_model() {
    let temp = tempfile::tempdir().unwrap();
    let sc = FakeSourceControl::with_changes(&["b", "a"]);
    let mut vm = CheckInViewModel::new(Arc::clone(&sc), Duration::from_millis(10));
    let (tx, rx) = flume::unbounded();
    vm.subscribe(move |files| {
        let _ = tx.send(summary(files));
    });

    vm.set_build_definition(&definition_for(temp.path()));
    let first = tokio::time::timeout(Duration::from_secs(5), rx.recv_async())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        first,
        [("a".to_string(), true), ("b".to_string(), true)]
    );

    vm.set_checked("a", false);
    sc.set_changes(&["a", "b", "c"]);
    let second = tokio::time::timeout(Duration::from_secs(5), rx.recv_async())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        second,
        [
            ("a".to_string(), false),
            ("b".to_string(), true),
            ("c".to_string(), true)
        ]
    );

    vm.deactivate();
    assert!(!vm.is_observing());
}

#[tokio::test]
async fn test_observer_reports_only_differences() {
    let temp = tempfile::tempdir().unwrap();
    let sc = FakeSourceControl::with_changes(&["a"]);
    let notified = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&notified);

    let observer = PendingChangesObserver::start(
        Arc::clone(&sc),
        temp.path().to_path_buf(),
        Duration::from_millis(5),
        move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        },
    );
    assert_eq!(observer.root(), temp.path());

    while sc.polls.load(Ordering::SeqCst) < 5 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(notified.load(Ordering::SeqCst), 1);

    observer.stop();
    assert!(!observer.is_running());
}

#[tokio::test]
async fn test_observer_survives_errors() {
    let temp = tempfile::tempdir().unwrap();
    let sc = FakeSourceControl::with_changes(&["a"]);
    sc.fail.store(true, Ordering::SeqCst);
    let (tx, rx) = flume::unbounded();

    let _observer = PendingChangesObserver::start(
        Arc::clone(&sc),
        temp.path().to_path_buf(),
        Duration::from_millis(5),
        move |changes| {
            let _ = tx.send(changes);
        },
    );

    while sc.polls.load(Ordering::SeqCst) < 3 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(rx.is_empty());

    sc.fail.store(false, Ordering::SeqCst);
    let changes = tokio::time::timeout(Duration::from_secs(5), rx.recv_async())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(changes, modified(&["a"]));
}
