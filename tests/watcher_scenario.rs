// tests/watcher_scenario.rs

//! End-to-end scenario: watch `dir/**/*` excluding `dir/**/*.txt`, then walk
//! a file through create → modify → delete.

mod common;
use crate::common::{last_kind_for, log_len, log_mentions, wait_for, RecordingHandler};

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use pollwatch::fs::{FileSystem, RealFileSystem};
use pollwatch::watch::{spawn_watcher, ChangeKind, PathResolver, WatchOptions};
use pollwatch_test_utils::{init_tracing, tree::TempTree};

type TestResult = Result<(), Box<dyn Error>>;

const INTERVAL: Duration = Duration::from_millis(50);

#[tokio::test]
async fn excluded_files_never_surface_watched_files_do() -> TestResult {
    init_tracing();

    let tree = TempTree::new();
    tree.mkdir("dir");

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let resolver = PathResolver::new(
        Arc::clone(&fs),
        tree.root(),
        &["dir/**/*".to_string()],
        &["dir/**/*.txt".to_string()],
    )?;

    let (handler, log) = RecordingHandler::new();
    let options = WatchOptions {
        interval: INTERVAL,
        immediate: false,
    };
    let (handle, join) = spawn_watcher(fs, resolver, options, handler);
    handle.watched_paths().await?;

    // An excluded file is mutated freely without a single notification.
    tree.write_file("dir/a.txt", 0);
    tokio::time::sleep(INTERVAL * 6).await;
    assert_eq!(log_len(&log), 0);

    // A watched file walks through the full lifecycle.
    tree.write_file("dir/b.log", 0);
    assert!(
        wait_for(
            || last_kind_for(&log, "b.log") == Some(ChangeKind::Created),
            Duration::from_secs(5),
        )
        .await
    );

    tree.touch("dir/b.log", 100);
    assert!(
        wait_for(
            || last_kind_for(&log, "b.log") == Some(ChangeKind::Updated),
            Duration::from_secs(5),
        )
        .await
    );

    tree.touch("dir/a.txt", 200);
    tree.remove("dir/b.log");
    assert!(
        wait_for(
            || last_kind_for(&log, "b.log") == Some(ChangeKind::Deleted),
            Duration::from_secs(5),
        )
        .await
    );

    handle.stop().await?;
    timeout(Duration::from_secs(5), join).await???;

    // The excluded path never appeared in any change set.
    assert!(!log_mentions(&log, "a.txt"));
    Ok(())
}

#[tokio::test]
async fn files_in_new_subdirectories_are_picked_up() -> TestResult {
    init_tracing();

    let tree = TempTree::new();
    tree.mkdir("dir");

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let resolver = PathResolver::new(
        Arc::clone(&fs),
        tree.root(),
        &["dir/**/*".to_string()],
        &[],
    )?;

    let (handler, log) = RecordingHandler::new();
    let options = WatchOptions {
        interval: INTERVAL,
        immediate: false,
    };
    let (handle, join) = spawn_watcher(fs, resolver, options, handler);
    handle.watched_paths().await?;

    // The directory itself is not a change subject; the file inside it is
    // found because the pattern set is re-expanded on every poll.
    tree.write_file("dir/sub/deep.rs", 0);
    assert!(
        wait_for(
            || last_kind_for(&log, "deep.rs") == Some(ChangeKind::Created),
            Duration::from_secs(5),
        )
        .await
    );

    handle.stop().await?;
    timeout(Duration::from_secs(5), join).await???;
    Ok(())
}
