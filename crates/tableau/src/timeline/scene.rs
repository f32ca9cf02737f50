//! Scene scripts and the figure state they act on.

use indexmap::IndexMap;
use log::trace;

use tableau_core::{
    color::Color,
    draw::{Drawable, Figure},
    geometry::{Bounds, Point},
    identifier::Id,
};

use super::{Animation, Anchor, Easing};
use crate::TableauError;

/// Instant edit applied between animations.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// Puts a figure on stage, replacing any figure with the same id.
    Add(Id, Figure),
    /// Takes a figure off stage together with its anchor.
    Remove(Id),
    Recolor(Id, Color),
    /// Makes the first figure follow the anchor from now on.
    Attach(Id, Anchor),
    Detach(Id),
}

/// One entry of a scene script.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Runs the animations concurrently over `run_time` seconds.
    Play {
        animations: Vec<Animation>,
        run_time: f32,
        easing: Easing,
    },
    /// Holds the current state.
    Wait(f32),
    Apply(Vec<Change>),
}

impl Step {
    /// Seconds of scene time the step takes.
    pub fn duration(&self) -> f32 {
        match self {
            Self::Play { run_time, .. } => *run_time,
            Self::Wait(seconds) => *seconds,
            Self::Apply(_) => 0.0,
        }
    }

    /// Frames the step emits at `fps`. Timed steps always emit at least one.
    pub fn frame_count(&self, fps: u32) -> usize {
        match self {
            Self::Apply(_) => 0,
            _ => frames_for(self.duration(), fps),
        }
    }
}

pub(crate) fn frames_for(seconds: f32, fps: u32) -> usize {
    ((seconds * fps as f32).round() as usize).max(1)
}

/// A named, ordered script of steps.
///
/// Builder calls append to the script in order, so a scene reads like the
/// sequence of events it produces.
///
/// ```
/// # use tableau::timeline::{Animation, Scene};
/// # use tableau_core::{draw::{Figure, Shape}, identifier::Id};
/// let mut scene = Scene::new("demo");
/// scene
///     .play(vec![Animation::fade_in(Id::new("dot"), Figure::new(Shape::circle(0.1)))])
///     .wait(2.0);
/// assert_eq!(scene.duration(), 3.0);
/// assert_eq!(scene.frame_count(30), 90);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    name: String,
    initial: IndexMap<Id, Figure>,
    steps: Vec<Step>,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Figures on stage before the first step.
    pub fn initial(&self) -> &IndexMap<Id, Figure> {
        &self.initial
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Puts a figure on stage without animation. Before the first step it
    /// becomes part of the opening frame.
    pub fn add(&mut self, id: Id, figure: Figure) -> &mut Self {
        if self.steps.is_empty() {
            self.initial.insert(id, figure);
            self
        } else {
            self.apply(vec![Change::Add(id, figure)])
        }
    }

    pub fn remove(&mut self, id: Id) -> &mut Self {
        self.apply(vec![Change::Remove(id)])
    }

    /// Plays animations together for one second with smooth easing.
    pub fn play(&mut self, animations: Vec<Animation>) -> &mut Self {
        self.play_with(animations, 1.0, Easing::default())
    }

    pub fn play_with(&mut self, animations: Vec<Animation>, run_time: f32, easing: Easing) -> &mut Self {
        self.steps.push(Step::Play {
            animations,
            run_time,
            easing,
        });
        self
    }

    pub fn wait(&mut self, seconds: f32) -> &mut Self {
        self.steps.push(Step::Wait(seconds));
        self
    }

    /// Applies instant changes. Consecutive calls merge into one step.
    pub fn apply(&mut self, changes: Vec<Change>) -> &mut Self {
        if let Some(Step::Apply(pending)) = self.steps.last_mut() {
            pending.extend(changes);
        } else {
            self.steps.push(Step::Apply(changes));
        }
        self
    }

    pub fn attach(&mut self, id: Id, anchor: Anchor) -> &mut Self {
        self.apply(vec![Change::Attach(id, anchor)])
    }

    pub fn detach(&mut self, id: Id) -> &mut Self {
        self.apply(vec![Change::Detach(id)])
    }

    /// Total scene time in seconds.
    pub fn duration(&self) -> f32 {
        self.steps.iter().map(Step::duration).sum()
    }

    /// Number of frames the scene renders at `fps`.
    pub fn frame_count(&self, fps: u32) -> usize {
        self.steps.iter().map(|step| step.frame_count(fps)).sum()
    }
}

/// Figures on stage at one instant plus the anchors binding decorations to
/// them.
///
/// Figures keep the order they were added in; drawing order between layers
/// is decided by each figure's render layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneState {
    figures: IndexMap<Id, Figure>,
    anchors: IndexMap<Id, Anchor>,
}

impl SceneState {
    pub fn new(figures: IndexMap<Id, Figure>) -> Self {
        Self {
            figures,
            anchors: IndexMap::new(),
        }
    }

    pub fn figures(&self) -> impl Iterator<Item = (Id, &Figure)> {
        self.figures.iter().map(|(id, figure)| (*id, figure))
    }

    pub fn figure(&self, id: Id) -> Option<&Figure> {
        self.figures.get(&id)
    }

    pub fn contains(&self, id: Id) -> bool {
        self.figures.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.figures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }

    pub fn anchor(&self, id: Id) -> Option<&Anchor> {
        self.anchors.get(&id)
    }

    /// Looks up a figure an animation or change refers to.
    ///
    /// # Errors
    ///
    /// Returns [`TableauError::Timeline`] naming the missing id.
    pub fn require(&self, id: Id) -> Result<&Figure, TableauError> {
        self.figures
            .get(&id)
            .ok_or_else(|| TableauError::timeline(format!("figure `{id}` is not in the scene")))
    }

    /// Union of the bounds of the given figures.
    pub fn group_bounds(&self, ids: &[Id]) -> Result<Bounds, TableauError> {
        let mut merged: Option<Bounds> = None;
        for id in ids {
            let bounds = self.require(*id)?.bounds();
            merged = Some(merged.map_or(bounds, |acc| acc.merge(&bounds)));
        }
        merged.ok_or_else(|| TableauError::timeline("cannot frame an empty group"))
    }

    pub fn insert(&mut self, id: Id, figure: Figure) {
        self.figures.insert(id, figure);
    }

    /// Removes a figure and the anchor attached to it.
    pub fn remove(&mut self, id: Id) -> Option<Figure> {
        self.anchors.shift_remove(&id);
        self.figures.shift_remove(&id)
    }

    /// Applies an instant change.
    ///
    /// # Errors
    ///
    /// Returns [`TableauError::Timeline`] when the change refers to a figure
    /// that is not on stage.
    pub fn apply(&mut self, change: &Change) -> Result<(), TableauError> {
        match change {
            Change::Add(id, figure) => self.insert(*id, figure.clone()),
            Change::Remove(id) => {
                self.remove(*id)
                    .ok_or_else(|| TableauError::timeline(format!("cannot remove unknown figure `{id}`")))?;
            }
            Change::Recolor(id, color) => {
                self.require(*id)?;
                if let Some(figure) = self.figures.get_mut(id) {
                    figure.recolor(*color);
                }
            }
            Change::Attach(id, anchor) => {
                self.require(*id)?;
                for target in anchor.targets() {
                    if target == *id {
                        return Err(TableauError::timeline(format!("figure `{id}` cannot anchor to itself")));
                    }
                    self.require(target)?;
                }
                self.anchors.insert(*id, anchor.clone());
            }
            Change::Detach(id) => {
                self.anchors.shift_remove(id);
            }
        }
        trace!(change:?; "Applied change");
        Ok(())
    }

    /// Re-derives every anchored decoration from its anchor figures.
    ///
    /// Anchors are resolved in attachment order, so a decoration may anchor
    /// to another decoration attached earlier.
    ///
    /// # Errors
    ///
    /// Returns [`TableauError::Timeline`] when an anchor figure has left the
    /// stage.
    pub fn resolve_anchors(&mut self) -> Result<(), TableauError> {
        for (id, anchor) in &self.anchors {
            let figures = &self.figures;
            let resolved = anchor.resolve(|target| figures.get(&target).map(Figure::position))?;
            if let Some(decoration) = self.figures.get_mut(id) {
                resolved.apply(decoration);
            }
        }
        Ok(())
    }

    /// Center of the union of the given figures' bounds.
    pub(crate) fn group_center(&self, ids: &[Id]) -> Result<Point, TableauError> {
        self.group_bounds(ids).map(Bounds::center)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use tableau_core::{
        color::palette,
        draw::{Shape, Style},
    };

    use super::*;

    fn dot(x: f32) -> Figure {
        Figure::new(Shape::circle(0.5)).with_position(Point::new(x, 0.0))
    }

    #[test]
    fn test_add_before_steps_goes_to_initial() {
        let mut scene = Scene::new("s");
        scene.add(Id::new("a"), dot(0.0)).wait(1.0).add(Id::new("b"), dot(1.0));
        assert_eq!(scene.initial().len(), 1);
        assert!(matches!(scene.steps()[1], Step::Apply(_)));
    }

    #[test]
    fn test_apply_steps_merge() {
        let mut scene = Scene::new("s");
        scene
            .wait(1.0)
            .remove(Id::new("a"))
            .detach(Id::new("b"))
            .attach(Id::new("c"), Anchor::follow(Id::new("d"), Point::default()));
        assert_eq!(scene.steps().len(), 2);
        let Step::Apply(changes) = &scene.steps()[1] else {
            panic!("expected apply step");
        };
        assert_eq!(changes.len(), 3);
    }

    #[test]
    fn test_frame_count_rounds_and_skips_apply() {
        let mut scene = Scene::new("s");
        scene
            .play_with(vec![], 0.7, Easing::Linear)
            .apply(vec![])
            .wait(0.01);
        assert_eq!(scene.frame_count(30), 21 + 1);
        assert_approx_eq!(f32, scene.duration(), 0.71, epsilon = 1e-6);
    }

    #[test]
    fn test_state_change_errors() {
        let mut state = SceneState::default();
        assert!(state.apply(&Change::Remove(Id::new("nope"))).is_err());
        assert!(state.apply(&Change::Recolor(Id::new("nope"), palette::red())).is_err());

        state.insert(Id::new("deco"), dot(0.0));
        let err = state
            .apply(&Change::Attach(
                Id::new("deco"),
                Anchor::follow(Id::new("nope"), Point::default()),
            ))
            .unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_recolor() {
        let mut state = SceneState::default();
        state.insert(Id::new("a"), dot(0.0).with_style(Style::filled(palette::blue())));
        state.apply(&Change::Recolor(Id::new("a"), palette::yellow())).unwrap();
        assert_eq!(
            state.figure(Id::new("a")).unwrap().style().fill(),
            Some(palette::yellow())
        );
    }

    #[test]
    fn test_resolve_anchors_moves_decoration() {
        let mut state = SceneState::default();
        state.insert(Id::new("pillar"), dot(2.0));
        state.insert(Id::new("label"), dot(0.0));
        state
            .apply(&Change::Attach(
                Id::new("label"),
                Anchor::follow(Id::new("pillar"), Point::new(0.0, -1.0)),
            ))
            .unwrap();
        state.resolve_anchors().unwrap();
        assert_eq!(
            state.figure(Id::new("label")).unwrap().position(),
            Point::new(2.0, -1.0)
        );

        state.remove(Id::new("pillar"));
        assert!(state.resolve_anchors().is_err());
    }

    #[test]
    fn test_remove_drops_anchor() {
        let mut state = SceneState::default();
        state.insert(Id::new("a"), dot(0.0));
        state.insert(Id::new("b"), dot(1.0));
        state
            .apply(&Change::Attach(Id::new("b"), Anchor::follow(Id::new("a"), Point::default())))
            .unwrap();
        state.remove(Id::new("b"));
        assert!(state.anchor(Id::new("b")).is_none());
        assert!(state.resolve_anchors().is_ok());
    }

    #[test]
    fn test_group_bounds() {
        let mut state = SceneState::default();
        state.insert(Id::new("a"), dot(-2.0));
        state.insert(Id::new("b"), dot(2.0));
        let bounds = state.group_bounds(&[Id::new("a"), Id::new("b")]).unwrap();
        assert_approx_eq!(f32, bounds.width(), 5.0);
        assert!(state.group_bounds(&[]).is_err());
        assert!(state.group_bounds(&[Id::new("c")]).is_err());
    }
}
