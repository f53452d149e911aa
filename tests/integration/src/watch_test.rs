//! Sync watcher scenarios over real project directories.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;

use sbx_core::{Action, Session, SyncWatcher, TickOutcome, WatchRunner};
use sbx_test_utils::TestProject;

/// Explode a fresh project from an archive fixture and return a watcher on
/// it with seeded fingerprints.
fn seeded_watcher(fixture: &TestProject, name: &str) -> SyncWatcher {
    let archive = fixture.write_archive(
        &format!("{name}.sb3"),
        &TestProject::sample_document(),
        &[("cat.png", b"png".as_slice())],
    );
    let dest = fixture.path(name);
    sbx_archive::unpack(&archive, &dest).unwrap();

    let session = Session::shared();
    session.write().unwrap().switch_project(&dest);
    let watcher = SyncWatcher::new(session);
    assert_eq!(watcher.tick(), TickOutcome::Unchanged);
    watcher
}

#[test]
fn one_tree_edit_causes_exactly_one_repack() {
    let fixture = TestProject::new();
    let watcher = seeded_watcher(&fixture, "demo");

    let before = fs::metadata(fixture.path("demo.sb3")).unwrap().modified().unwrap();
    fixture.write_file("demo/src/index.json", r#"{"monitors": [], "extensions": []}"#);

    assert_eq!(watcher.tick(), TickOutcome::RepackedArchive);
    for _ in 0..5 {
        assert_eq!(watcher.tick(), TickOutcome::Unchanged);
    }

    let after = fs::metadata(fixture.path("demo.sb3")).unwrap().modified().unwrap();
    assert_ne!(before, after, "archive was not rewritten");

    let mut session = watcher.session().write().unwrap();
    assert_eq!(session.take_action(), Some(Action::Reload));
    assert_eq!(session.take_action(), None, "exactly one reload expected");
}

#[test]
fn external_archive_replacement_rebuilds_the_tree() {
    let fixture = TestProject::new();
    let watcher = seeded_watcher(&fixture, "demo");

    // Build a different project state and drop its archive over ours.
    sbx_codec::decompose(
        &json!({"targets": [], "flag": "external edit"}),
        &fixture.path("other/src"),
    )
    .unwrap();
    let bytes = sbx_archive::pack_bytes(&fixture.path("other")).unwrap();
    fixture.write_file("demo.sb3", &bytes);

    assert_eq!(watcher.tick(), TickOutcome::RebuiltTree);
    let rebuilt = sbx_codec::recompose(&fixture.path("demo/src")).unwrap();
    assert_eq!(rebuilt["flag"], json!("external edit"));
    // The previous tree's assets are gone along with the old document.
    fixture.assert_not_exists("demo/assets/raster/cat.png");

    assert_eq!(watcher.tick(), TickOutcome::Unchanged);
}

#[test]
fn switching_projects_resets_the_watch_state() {
    let fixture = TestProject::new();
    let watcher = seeded_watcher(&fixture, "one");

    // Activate a second project; its initial state must not read as a change.
    let archive = fixture.write_archive("two.sb3", &TestProject::sample_document(), &[]);
    sbx_archive::unpack(&archive, &fixture.path("two")).unwrap();
    watcher
        .session()
        .write()
        .unwrap()
        .switch_project(fixture.path("two"));

    assert_eq!(watcher.tick(), TickOutcome::Unchanged);
    let status = watcher.session().read().unwrap().status();
    assert_eq!(status.project.as_deref(), Some("two"));
    assert_eq!(status.pending_actions, 0);
}

#[test]
fn background_runner_propagates_tree_edits() {
    let fixture = TestProject::new();
    let archive = fixture.write_archive("demo.sb3", &TestProject::sample_document(), &[]);
    sbx_archive::unpack(&archive, &fixture.path("demo")).unwrap();

    let session = Session::shared();
    session.write().unwrap().switch_project(fixture.path("demo"));
    let runner = WatchRunner::spawn(
        SyncWatcher::new(Arc::clone(&session)),
        Duration::from_millis(20),
    )
    .unwrap();

    // Let the loop seed, then edit the tree and give it a few intervals.
    std::thread::sleep(Duration::from_millis(100));
    fixture.write_file("demo/src/index.json", r#"{"monitors": [], "edited": true}"#);
    std::thread::sleep(Duration::from_millis(300));
    runner.stop();

    let mut guard = session.write().unwrap();
    assert_eq!(guard.take_action(), Some(Action::Reload));
    assert_eq!(guard.take_action(), None);

    let unpacked = fixture.path("check");
    sbx_archive::unpack(&fixture.path("demo.sb3"), &unpacked).unwrap();
    let document = sbx_codec::recompose(&unpacked.join("src")).unwrap();
    assert_eq!(document["edited"], json!(true));
}
