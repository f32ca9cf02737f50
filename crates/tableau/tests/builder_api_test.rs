//! Integration tests for the SceneRenderer API
//!
//! These tests drive the public API the way the CLI does: build a scene from
//! the catalog, play it, and look at the frames.

use std::fs;

use tableau::{
    SceneRenderer, TableauError,
    config::AppConfig,
    export::FrameCollector,
    identifier::Id,
    scenes::SceneKind,
    timeline::TimelinePlayer,
};

#[test]
fn test_every_scene_builds_and_plays() {
    let renderer = SceneRenderer::new(AppConfig::default().with_fps(2));
    for kind in SceneKind::all() {
        let scene = renderer
            .build(*kind)
            .unwrap_or_else(|err| panic!("{kind} failed to build: {err}"));
        let mut collector = FrameCollector::new();
        let frames = TimelinePlayer::new(2)
            .play(&scene, &mut collector)
            .unwrap_or_else(|err| panic!("{kind} failed to play: {err}"));

        assert_eq!(frames, scene.frame_count(2), "{kind}");
        assert_eq!(collector.frames(), frames, "{kind}");
        assert!(collector.finished(), "{kind}");
    }
}

#[test]
fn test_render_frames_writes_numbered_files() {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let renderer = SceneRenderer::new(AppConfig::default().with_fps(4));
    let scene = renderer.build(SceneKind::Credits).unwrap();

    let summary = renderer.render_frames(&scene, dir.path().join("credits")).unwrap();
    assert_eq!(summary.scene(), "credits");
    assert_eq!(summary.frames(), scene.frame_count(4));
    let last = summary
        .directory()
        .join(format!("frame_{:05}.svg", summary.frames() - 1));
    assert!(last.exists());
    assert!(!summary.directory().join(format!("frame_{:05}.svg", summary.frames())).exists());
}

#[test]
fn test_render_svg_at_shows_text() {
    let renderer = SceneRenderer::default();
    let scene = renderer.build(SceneKind::Quote).unwrap();
    let svg = renderer.render_svg_at(&scene, 2.0).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("prepared mind"));
    assert!(renderer.render_svg_at(&scene, -1.0).is_err());
}

#[test]
fn test_seed_changes_only_stochastic_scenes() {
    let first = SceneRenderer::new(AppConfig::default().with_seed(1));
    let second = SceneRenderer::new(AppConfig::default().with_seed(2));
    assert_ne!(first.build(SceneKind::Dld).unwrap(), second.build(SceneKind::Dld).unwrap());
    assert_eq!(
        first.build(SceneKind::FlowLanes).unwrap(),
        second.build(SceneKind::FlowLanes).unwrap()
    );
}

#[test]
fn test_missing_assets_fall_back() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = SceneRenderer::new(AppConfig::default().with_asset_directory(dir.path()));
    let scene = renderer.build(SceneKind::BloodCells).unwrap();
    for name in ["rbc", "wbc", "ctc", "platelet"] {
        assert!(scene.initial().contains_key(&Id::new(name)));
    }
}

#[test]
fn test_strict_assets_reject_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("rbc.svg"), "definitely not svg").unwrap();

    let lenient = SceneRenderer::new(AppConfig::default().with_asset_directory(dir.path()));
    assert!(lenient.build(SceneKind::CellPulse).is_ok());

    let strict = SceneRenderer::new(
        AppConfig::default()
            .with_asset_directory(dir.path())
            .with_strict_assets(true),
    );
    let err = strict.build(SceneKind::CellPulse).unwrap_err();
    assert!(matches!(err, TableauError::Asset { ref name, .. } if name == "rbc"));
}

#[test]
fn test_invalid_config_is_rejected_before_building() {
    let renderer = SceneRenderer::new(AppConfig::default().with_fps(0));
    assert!(matches!(
        renderer.build(SceneKind::Quote),
        Err(TableauError::Configuration(_))
    ));
}
