//! Frame-by-frame playback of a scene.

use log::{debug, info, trace};

use tableau_core::{color::Color, draw::Viewport};

use super::{
    Animation, Scene, SceneState, Step,
    animation::{Exit, Track},
    scene::frames_for,
};
use crate::{
    TableauError,
    export::{FrameSink, SceneMeta},
};

/// Plays scenes at a fixed frame rate.
///
/// Frames are sampled at the end of each frame interval, so the last frame
/// of an animation shows its final state and a scene of `n` frames never
/// repeats its opening state.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelinePlayer {
    fps: u32,
    viewport: Viewport,
    background: Color,
}

impl TimelinePlayer {
    pub fn new(fps: u32) -> Self {
        Self {
            fps,
            viewport: Viewport::default(),
            background: Color::from_rgb8(0, 0, 0),
        }
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn meta(&self, scene: &Scene) -> SceneMeta {
        SceneMeta::new(scene.name(), self.fps, scene.frame_count(self.fps), self.viewport)
            .with_duration(scene.duration())
            .with_background(self.background)
    }

    /// Plays every step of `scene`, handing each frame to `sink`.
    ///
    /// Returns the number of frames emitted.
    ///
    /// # Errors
    ///
    /// Returns [`TableauError::Timeline`] for steps that cannot run (unknown
    /// figures, non-positive run times) and [`TableauError::Export`] when the
    /// sink fails.
    pub fn play(&self, scene: &Scene, sink: &mut dyn FrameSink) -> Result<usize, TableauError> {
        self.check_fps()?;
        let meta = self.meta(scene);
        info!(scene = scene.name(), frames = meta.frame_count(), fps = self.fps; "Playing scene");
        sink.begin(&meta)?;

        let mut state = SceneState::new(scene.initial().clone());
        state.resolve_anchors()?;
        let mut index = 0;

        for (position, step) in scene.steps().iter().enumerate() {
            trace!(step = position; "Starting step");
            match step {
                Step::Apply(changes) => {
                    for change in changes {
                        state.apply(change)?;
                    }
                    state.resolve_anchors()?;
                }
                Step::Wait(seconds) => {
                    check_duration("wait", *seconds)?;
                    for _ in 0..frames_for(*seconds, self.fps) {
                        sink.frame(index, &state)?;
                        index += 1;
                    }
                }
                Step::Play {
                    animations,
                    run_time,
                    easing,
                } => {
                    check_duration("run time", *run_time)?;
                    let tracks = start_tracks(&mut state, animations)?;
                    let frames = frames_for(*run_time, self.fps);
                    for frame in 1..=frames {
                        let progress = easing.apply(frame as f32 / frames as f32);
                        sample_tracks(&mut state, &tracks, progress)?;
                        sink.frame(index, &state)?;
                        index += 1;
                    }
                    finish_tracks(&mut state, &tracks)?;
                }
            }
        }

        sink.finish()?;
        debug!(scene = scene.name(), frames = index; "Scene finished");
        Ok(index)
    }

    /// State of `scene` at `seconds` into playback, without emitting frames.
    /// Times past the end give the final state.
    ///
    /// # Errors
    ///
    /// Returns [`TableauError::Timeline`] for a negative time or a step that
    /// cannot run.
    pub fn snapshot_at(&self, scene: &Scene, seconds: f32) -> Result<SceneState, TableauError> {
        if seconds.is_nan() || seconds < 0.0 {
            return Err(TableauError::timeline(format!(
                "snapshot time must not be negative, got {seconds}"
            )));
        }

        let mut state = SceneState::new(scene.initial().clone());
        state.resolve_anchors()?;
        let mut elapsed = 0.0;

        for step in scene.steps() {
            match step {
                Step::Apply(changes) => {
                    for change in changes {
                        state.apply(change)?;
                    }
                    state.resolve_anchors()?;
                }
                Step::Wait(wait) => {
                    check_duration("wait", *wait)?;
                    if seconds < elapsed + wait {
                        return Ok(state);
                    }
                    elapsed += wait;
                }
                Step::Play {
                    animations,
                    run_time,
                    easing,
                } => {
                    check_duration("run time", *run_time)?;
                    let tracks = start_tracks(&mut state, animations)?;
                    if seconds < elapsed + run_time {
                        let progress = easing.apply((seconds - elapsed) / run_time);
                        sample_tracks(&mut state, &tracks, progress)?;
                        return Ok(state);
                    }
                    sample_tracks(&mut state, &tracks, 1.0)?;
                    finish_tracks(&mut state, &tracks)?;
                    elapsed += run_time;
                }
            }
        }
        Ok(state)
    }

    fn check_fps(&self) -> Result<(), TableauError> {
        if self.fps == 0 {
            return Err(TableauError::configuration("fps must be positive"));
        }
        Ok(())
    }
}

fn check_duration(what: &str, seconds: f32) -> Result<(), TableauError> {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(TableauError::timeline(format!(
            "{what} must be a positive number of seconds, got {seconds}"
        )));
    }
    Ok(())
}

/// Expands the animations of a step and puts every track's start figure on
/// stage, so figures entering in this step can already serve as anchors.
fn start_tracks(state: &mut SceneState, animations: &[Animation]) -> Result<Vec<Track>, TableauError> {
    if animations.is_empty() {
        return Err(TableauError::timeline("a play step needs at least one animation"));
    }
    let mut tracks = Vec::new();
    for animation in animations {
        tracks.extend(animation.tracks(state)?);
    }
    sample_tracks(state, &tracks, 0.0)?;
    Ok(tracks)
}

fn sample_tracks(state: &mut SceneState, tracks: &[Track], progress: f32) -> Result<(), TableauError> {
    for track in tracks {
        state.insert(track.id(), track.at(progress));
    }
    state.resolve_anchors()
}

fn finish_tracks(state: &mut SceneState, tracks: &[Track]) -> Result<(), TableauError> {
    for track in tracks {
        match track.exit() {
            Exit::Stay => {}
            Exit::Leave => {
                state.remove(track.id());
            }
            Exit::Become(successor) => {
                state.remove(track.id());
                state.insert(successor, track.end().clone());
            }
        }
    }
    state.resolve_anchors()
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use tableau_core::{
        draw::{Figure, Shape},
        geometry::Point,
        identifier::Id,
    };

    use super::*;
    use crate::{
        export::FrameCollector,
        timeline::{Anchor, Easing},
    };

    fn dot() -> Figure {
        Figure::new(Shape::circle(0.2))
    }

    #[test]
    fn test_play_emits_every_frame() {
        let mut scene = Scene::new("count");
        scene
            .play_with(vec![Animation::fade_in(Id::new("a"), dot())], 0.5, Easing::Linear)
            .wait(1.0)
            .play(vec![Animation::fade_out(Id::new("a"))]);

        let mut sink = FrameCollector::new();
        let frames = TimelinePlayer::new(10).play(&scene, &mut sink).unwrap();
        assert_eq!(frames, 25);
        assert_eq!(sink.frames(), 25);
        assert!(sink.finished());

        // The last frame shows the finished fade; removal takes effect after it.
        let last = sink.last_state().unwrap();
        assert_approx_eq!(f32, last.figure(Id::new("a")).unwrap().opacity(), 0.0, epsilon = 1e-6);
        let after = TimelinePlayer::new(10).snapshot_at(&scene, 2.5).unwrap();
        assert!(after.is_empty());
    }

    #[test]
    fn test_rejects_non_positive_run_time() {
        let mut scene = Scene::new("bad");
        scene.play_with(vec![Animation::fade_in(Id::new("a"), dot())], 0.0, Easing::Linear);
        let err = TimelinePlayer::new(30)
            .play(&scene, &mut FrameCollector::new())
            .unwrap_err();
        assert!(matches!(err, TableauError::Timeline(_)));
    }

    #[test]
    fn test_rejects_unknown_figure() {
        let mut scene = Scene::new("bad");
        scene.play(vec![Animation::move_to(Id::new("ghost"), Point::default())]);
        let err = TimelinePlayer::new(30)
            .play(&scene, &mut FrameCollector::new())
            .unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_rejects_zero_fps() {
        let scene = Scene::new("empty");
        assert!(TimelinePlayer::new(0).play(&scene, &mut FrameCollector::new()).is_err());
    }

    #[test]
    fn test_snapshot_mid_animation() {
        let mut scene = Scene::new("move");
        scene
            .add(Id::new("a"), dot())
            .play_with(
                vec![Animation::move_to(Id::new("a"), Point::new(4.0, 0.0))],
                2.0,
                Easing::Linear,
            )
            .wait(1.0);

        let player = TimelinePlayer::new(30);
        let mid = player.snapshot_at(&scene, 0.5).unwrap();
        assert_approx_eq!(f32, mid.figure(Id::new("a")).unwrap().position().x(), 1.0);

        let end = player.snapshot_at(&scene, 100.0).unwrap();
        assert_eq!(end.figure(Id::new("a")).unwrap().position(), Point::new(4.0, 0.0));

        assert!(player.snapshot_at(&scene, -1.0).is_err());
    }

    #[test]
    fn test_anchors_follow_every_tick() {
        let left = Id::new("anchor_left");
        let right = Id::new("anchor_right");
        let label = Id::new("anchor_label");

        let mut scene = Scene::new("anchored");
        scene
            .add(left, dot().with_position(Point::new(-1.0, 0.0)))
            .add(right, dot().with_position(Point::new(1.0, 0.0)))
            .add(label, dot())
            .attach(label, Anchor::span(left, right, Point::new(0.0, -0.5)))
            .play_with(
                vec![Animation::move_to(right, Point::new(3.0, 0.0))],
                1.0,
                Easing::Linear,
            );

        let player = TimelinePlayer::new(30);
        let mid = player.snapshot_at(&scene, 0.5).unwrap();
        assert_eq!(mid.figure(label).unwrap().position(), Point::new(0.5, -0.5));

        let mut sink = FrameCollector::new();
        player.play(&scene, &mut sink).unwrap();
        assert_eq!(
            sink.last_state().unwrap().figure(label).unwrap().position(),
            Point::new(1.0, -0.5)
        );
    }

    #[test]
    fn test_replacement_transform_swaps_ids() {
        let old = Id::new("swap_old");
        let new = Id::new("swap_new");
        let mut scene = Scene::new("swap");
        scene.add(old, dot()).play(vec![Animation::replacement_transform(
            vec![old],
            vec![(new, Figure::new(Shape::circle(0.4)))],
        )]);

        let end = TimelinePlayer::new(30).snapshot_at(&scene, 5.0).unwrap();
        assert!(!end.contains(old));
        assert_eq!(end.figure(new).unwrap().shape(), &Shape::circle(0.4));
    }
}
