//! End-to-end archive ⇄ tree conversion scenarios.

use pretty_assertions::assert_eq;
use serde_json::json;
use sbx_test_utils::TestProject;

#[test]
fn break_explodes_classifies_and_rebuilds() {
    let fixture = TestProject::new();
    let document = TestProject::sample_document();
    let archive = fixture.write_archive(
        "demo.sb3",
        &document,
        &[
            ("cat.png", b"png bytes".as_slice()),
            ("shape.svg", b"<svg/>".as_slice()),
            ("pop.wav", &TestProject::wav_bytes(8000, 4000)),
            ("theme.wav", &TestProject::wav_bytes(8000, 160_000)),
            ("label.ttf", b"font bytes".as_slice()),
            ("notes.txt", b"loose file".as_slice()),
        ],
    );

    let dest = fixture.path("demo");
    let report = sbx_archive::unpack(&archive, &dest).unwrap();
    assert_eq!(report.extracted, 7);

    // Assets land in their typed subdirectories; the 20-second wav is music.
    fixture.assert_exists("demo/assets/raster/cat.png");
    fixture.assert_exists("demo/assets/vector/shape.svg");
    fixture.assert_exists("demo/assets/audio/pop.wav");
    fixture.assert_exists("demo/assets/bgm/theme.wav");
    fixture.assert_exists("demo/assets/font/label.ttf");
    fixture.assert_exists("demo/assets/other/notes.txt");

    // The document entry is exploded and then removed.
    fixture.assert_exists("demo/src/index.json");
    fixture.assert_not_exists("demo/project.json");

    // The rebuilt archive carries the same document and all assets.
    let rebuilt = sbx_archive::pack(&dest).unwrap();
    let second = fixture.path("second");
    sbx_archive::unpack(&rebuilt, &second).unwrap();
    let recovered = sbx_codec::recompose(&second.join("src")).unwrap();
    assert_eq!(recovered, document);
    fixture.assert_exists("second/assets/bgm/theme.wav");
}

#[test]
fn classification_is_idempotent_across_rebuilds() {
    let fixture = TestProject::new();
    let archive = fixture.write_archive(
        "demo.sb3",
        &TestProject::sample_document(),
        &[("cat.png", b"png".as_slice())],
    );
    let dest = fixture.path("demo");
    sbx_archive::unpack(&archive, &dest).unwrap();

    let layout = sbx_fs::ProjectLayout::new(&dest);
    let report =
        sbx_archive::sort_assets(&layout, &sbx_archive::WavProbe, 5.0).unwrap();
    assert!(report.moved.is_empty(), "re-classification moved files");
}

#[test]
fn document_values_survive_explosion_byte_for_byte() {
    let fixture = TestProject::new();
    let document = json!({
        "a": 1,
        "b": [10, 20],
        "c": {"d": "x/y"},
        "a/b": "escaped key"
    });
    let archive = fixture.write_archive("demo.sb3", &document, &[]);
    let dest = fixture.path("demo");
    sbx_archive::unpack(&archive, &dest).unwrap();

    // The unsafe key is escaped on disk but recovered exactly.
    let recovered = sbx_codec::recompose(&dest.join("src")).unwrap();
    assert_eq!(recovered["a"], json!(1));
    assert_eq!(recovered["b"][0], json!(10));
    assert_eq!(recovered["b"][1], json!(20));
    assert_eq!(recovered["c"]["d"], json!("x/y"));
    assert_eq!(recovered["a/b"], json!("escaped key"));
    assert_eq!(recovered, document);
}

#[test]
fn pack_unpack_pack_yields_identical_archives() {
    let fixture = TestProject::new();
    let archive = fixture.write_archive(
        "demo.sb3",
        &TestProject::sample_document(),
        &[("cat.png", b"png bytes".as_slice())],
    );

    let first_dir = fixture.path("first");
    sbx_archive::unpack(&archive, &first_dir).unwrap();
    let first_bytes = sbx_archive::pack_bytes(&first_dir).unwrap();

    let second_dir = fixture.path("second");
    let repacked = fixture.write_file("first.sb3", &first_bytes);
    sbx_archive::unpack(&repacked, &second_dir).unwrap();
    let second_bytes = sbx_archive::pack_bytes(&second_dir).unwrap();

    assert_eq!(first_bytes, second_bytes);
}

#[test]
fn broken_projects_can_become_git_repositories() {
    let fixture = TestProject::new();
    let archive = fixture.write_archive("demo.sb3", &TestProject::sample_document(), &[]);
    let dest = fixture.path("demo");
    sbx_archive::unpack(&archive, &dest).unwrap();

    assert!(sbx_git::init_project(&dest).unwrap());
    assert_eq!(sbx_git::branches(&dest), vec!["main".to_string()]);
    // Everything was committed, including the exploded tree.
    assert!(sbx_git::status_short(&dest).is_empty());
}
