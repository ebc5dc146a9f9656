// tests/watcher_lifecycle.rs

mod common;
use crate::common::{log_len, log_mentions, wait_for, RecordingHandler};

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use pollwatch::errors::PollwatchError;
use pollwatch::fs::{FileSystem, RealFileSystem};
use pollwatch::watch::{spawn_watcher, ChangeKind, PathResolver, WatchOptions};
use pollwatch_test_utils::{init_tracing, tree::TempTree};

type TestResult = Result<(), Box<dyn Error>>;

fn resolver(tree: &TempTree, watch: &[&str], exclude: &[&str]) -> PathResolver {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    PathResolver::new(
        fs,
        tree.root(),
        &watch.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
        &exclude.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
    )
    .expect("compiling patterns")
}

fn fast_options() -> WatchOptions {
    WatchOptions {
        interval: Duration::from_millis(50),
        immediate: false,
    }
}

/// Interval long enough that no poll fires during the test; everything
/// observable must come from command handling and the drain pass.
fn slow_options() -> WatchOptions {
    WatchOptions {
        interval: Duration::from_secs(30),
        immediate: false,
    }
}

#[tokio::test]
async fn create_update_delete_are_notified() -> TestResult {
    init_tracing();

    let tree = TempTree::new();
    tree.write_file("seed.rs", -10);

    let (handler, log) = RecordingHandler::new();
    let (handle, join) = spawn_watcher(
        Arc::new(RealFileSystem),
        resolver(&tree, &["**/*"], &[]),
        fast_options(),
        handler,
    );

    // Baseline exists once the query returns.
    let watched = handle.watched_paths().await?;
    assert_eq!(watched.len(), 1);

    tree.write_file("b.rs", 0);
    assert!(
        wait_for(
            || common::last_kind_for(&log, "b.rs") == Some(ChangeKind::Created),
            Duration::from_secs(5),
        )
        .await
    );

    tree.touch("b.rs", 100);
    assert!(
        wait_for(
            || common::last_kind_for(&log, "b.rs") == Some(ChangeKind::Updated),
            Duration::from_secs(5),
        )
        .await
    );

    tree.remove("b.rs");
    assert!(
        wait_for(
            || common::last_kind_for(&log, "b.rs") == Some(ChangeKind::Deleted),
            Duration::from_secs(5),
        )
        .await
    );

    handle.stop().await?;
    timeout(Duration::from_secs(5), join).await???;
    Ok(())
}

#[tokio::test]
async fn immediate_mode_fires_one_empty_notification_first() -> TestResult {
    init_tracing();

    let tree = TempTree::new();
    tree.write_file("a.rs", -10);

    let (handler, log) = RecordingHandler::new();
    let options = WatchOptions {
        immediate: true,
        ..slow_options()
    };
    let (handle, join) = spawn_watcher(
        Arc::new(RealFileSystem),
        resolver(&tree, &["**/*"], &[]),
        options,
        handler,
    );

    handle.watched_paths().await?;
    {
        let log = log.lock().unwrap();
        assert_eq!(log.len(), 1);
        assert!(log[0].is_empty());
    }

    handle.stop().await?;
    timeout(Duration::from_secs(5), join).await???;

    // Nothing changed, so the drain adds nothing after the immediate one.
    assert_eq!(log_len(&log), 1);
    Ok(())
}

#[tokio::test]
async fn stop_drains_changes_pending_before_the_next_poll() -> TestResult {
    init_tracing();

    let tree = TempTree::new();
    tree.write_file("a.rs", -10);

    let (handler, log) = RecordingHandler::new();
    let (handle, join) = spawn_watcher(
        Arc::new(RealFileSystem),
        resolver(&tree, &["**/*"], &[]),
        slow_options(),
        handler,
    );

    handle.watched_paths().await?;

    // Mutate and stop before the 30s poll ever fires: the drain pass must
    // still deliver both changes.
    tree.write_file("pending.rs", 0);
    tree.touch("a.rs", 50);
    handle.stop().await?;
    timeout(Duration::from_secs(5), join).await???;

    assert_eq!(common::last_kind_for(&log, "pending.rs"), Some(ChangeKind::Created));
    assert_eq!(common::last_kind_for(&log, "a.rs"), Some(ChangeKind::Updated));
    Ok(())
}

#[tokio::test]
async fn watched_paths_reports_the_last_snapshot_keys() -> TestResult {
    init_tracing();

    let tree = TempTree::new();
    tree.write_file("one.rs", -10);
    tree.write_file("sub/two.rs", -10);

    let (handler, _log) = RecordingHandler::new();
    let (handle, join) = spawn_watcher(
        Arc::new(RealFileSystem),
        resolver(&tree, &["**/*.rs"], &[]),
        fast_options(),
        handler,
    );

    let watched = handle.watched_paths().await?;
    assert_eq!(watched.len(), 2);
    assert!(watched.iter().any(|p| p.ends_with("one.rs")));
    assert!(watched.iter().any(|p| p.ends_with("sub/two.rs")));
    // Ordered output, straight from the snapshot's key order.
    let mut sorted = watched.clone();
    sorted.sort();
    assert_eq!(watched, sorted);

    handle.stop().await?;
    timeout(Duration::from_secs(5), join).await???;
    Ok(())
}

#[tokio::test]
async fn resume_without_pause_is_an_error() -> TestResult {
    init_tracing();

    let tree = TempTree::new();
    tree.write_file("a.rs", -10);

    let (handler, _log) = RecordingHandler::new();
    let (handle, join) = spawn_watcher(
        Arc::new(RealFileSystem),
        resolver(&tree, &["**/*"], &[]),
        fast_options(),
        handler,
    );

    let err = handle.resume().await.unwrap_err();
    assert!(matches!(err, PollwatchError::NotPaused));

    handle.stop().await?;
    timeout(Duration::from_secs(5), join).await???;

    // Once the loop is gone, every control call reports it.
    let err = handle.pause().await.unwrap_err();
    assert!(matches!(err, PollwatchError::WatchStopped));
    Ok(())
}

#[tokio::test]
async fn dropping_every_handle_stops_the_watch() -> TestResult {
    init_tracing();

    let tree = TempTree::new();
    tree.write_file("a.rs", -10);

    let (handler, log) = RecordingHandler::new();
    let (handle, join) = spawn_watcher(
        Arc::new(RealFileSystem),
        resolver(&tree, &["**/*"], &[]),
        slow_options(),
        handler,
    );

    handle.watched_paths().await?;
    tree.write_file("pending.rs", 0);
    drop(handle);

    timeout(Duration::from_secs(5), join).await???;
    assert!(log_mentions(&log, "pending.rs"));
    Ok(())
}
