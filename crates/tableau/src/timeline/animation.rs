//! Animations and the per-figure tracks they expand into.
//!
//! An [`Animation`] describes intent ("fade this in", "move these up by
//! two"). When its step starts, the player expands it against the current
//! [`SceneState`] into [`Track`]s: one start figure and one end figure per
//! affected id. Every frame then samples each track at the eased progress.

use tableau_core::{curve::SmoothCurve, draw::Figure, geometry::Point, identifier::Id};

use super::SceneState;
use crate::TableauError;

#[derive(Debug, Clone, PartialEq)]
pub enum Animation {
    /// Draws a new figure's outline progressively.
    Create { id: Id, figure: Figure },
    FadeIn { id: Id, figure: Figure },
    /// Fades a figure out and takes it off stage.
    FadeOut { id: Id },
    MoveTo { id: Id, position: Point },
    Shift { ids: Vec<Id>, offset: Point },
    /// Scales a figure about its own position.
    Scale { id: Id, factor: f32 },
    /// Rotates a figure about its own position by `angle` radians.
    Rotate { id: Id, angle: f32 },
    /// Carries a figure along a curve, start to end, by arc length.
    MoveAlongPath { id: Id, path: SmoothCurve },
    /// Morphs a figure into `into`, keeping its id.
    Transform { id: Id, into: Figure },
    /// Morphs a group of figures into another group. Figures are paired by
    /// position in the two lists; unpaired sources fade out and unpaired
    /// targets fade in. The source ids leave the stage at the end.
    ReplacementTransform {
        from: Vec<Id>,
        into: Vec<(Id, Figure)>,
    },
    /// Grows a new figure out of a point.
    GrowFrom { id: Id, figure: Figure, origin: Point },
    /// Scales a group about its common center by `factor` and moves that
    /// center to `center`.
    Reframe {
        ids: Vec<Id>,
        factor: f32,
        center: Point,
    },
}

impl Animation {
    pub fn create(id: Id, figure: Figure) -> Self {
        Self::Create { id, figure }
    }

    pub fn fade_in(id: Id, figure: Figure) -> Self {
        Self::FadeIn { id, figure }
    }

    pub fn fade_out(id: Id) -> Self {
        Self::FadeOut { id }
    }

    pub fn move_to(id: Id, position: Point) -> Self {
        Self::MoveTo { id, position }
    }

    pub fn shift(ids: Vec<Id>, offset: Point) -> Self {
        Self::Shift { ids, offset }
    }

    pub fn scale(id: Id, factor: f32) -> Self {
        Self::Scale { id, factor }
    }

    pub fn rotate(id: Id, angle: f32) -> Self {
        Self::Rotate { id, angle }
    }

    pub fn move_along_path(id: Id, path: SmoothCurve) -> Self {
        Self::MoveAlongPath { id, path }
    }

    pub fn transform(id: Id, into: Figure) -> Self {
        Self::Transform { id, into }
    }

    pub fn replacement_transform(from: Vec<Id>, into: Vec<(Id, Figure)>) -> Self {
        Self::ReplacementTransform { from, into }
    }

    pub fn grow_from(id: Id, figure: Figure, origin: Point) -> Self {
        Self::GrowFrom { id, figure, origin }
    }

    pub fn reframe(ids: Vec<Id>, factor: f32, center: Point) -> Self {
        Self::Reframe { ids, factor, center }
    }

    /// Expands the animation against the state at the start of its step.
    ///
    /// # Errors
    ///
    /// Returns [`TableauError::Timeline`] when the animation refers to a
    /// figure that is not on stage.
    pub(crate) fn tracks(&self, state: &SceneState) -> Result<Vec<Track>, TableauError> {
        let tracks = match self {
            Self::Create { id, figure } => {
                vec![Track::blend(*id, figure.clone().with_reveal(0.0), figure.clone())]
            }
            Self::FadeIn { id, figure } => {
                vec![Track::blend(*id, figure.clone().with_opacity(0.0), figure.clone())]
            }
            Self::FadeOut { id } => {
                let current = state.require(*id)?;
                vec![Track::blend(*id, current.clone(), current.clone().with_opacity(0.0))
                    .leaving()]
            }
            Self::MoveTo { id, position } => {
                let current = state.require(*id)?;
                vec![Track::blend(*id, current.clone(), current.clone().with_position(*position))]
            }
            Self::Shift { ids, offset } => ids
                .iter()
                .map(|id| {
                    let current = state.require(*id)?;
                    let mut target = current.clone();
                    target.shift(*offset);
                    Ok(Track::blend(*id, current.clone(), target))
                })
                .collect::<Result<Vec<_>, TableauError>>()?,
            Self::Scale { id, factor } => {
                let current = state.require(*id)?;
                let scale = current.placement().scale() * factor;
                vec![Track::blend(*id, current.clone(), current.clone().with_scale(scale))]
            }
            Self::Rotate { id, angle } => {
                let current = state.require(*id)?;
                let rotation = current.placement().rotation() + angle;
                vec![Track::blend(*id, current.clone(), current.clone().with_rotation(rotation))]
            }
            Self::MoveAlongPath { id, path } => {
                let current = state.require(*id)?;
                vec![Track {
                    id: *id,
                    from: current.clone(),
                    to: current.clone().with_position(path.end()),
                    motion: Motion::Path(path.clone()),
                    exit: Exit::Stay,
                }]
            }
            Self::Transform { id, into } => {
                let current = state.require(*id)?;
                vec![Track::blend(*id, current.clone(), into.clone())]
            }
            Self::ReplacementTransform { from, into } => replacement_tracks(state, from, into)?,
            Self::GrowFrom { id, figure, origin } => {
                let seed = figure.clone().with_position(*origin).with_scale(0.0);
                vec![Track::blend(*id, seed, figure.clone())]
            }
            Self::Reframe { ids, factor, center } => {
                let pivot = state.group_center(ids)?;
                ids.iter()
                    .map(|id| {
                        let current = state.require(*id)?;
                        let offset = current.position().sub_point(pivot).scale(*factor);
                        let target = current
                            .clone()
                            .with_position(center.add_point(offset))
                            .with_scale(current.placement().scale() * factor);
                        Ok(Track::blend(*id, current.clone(), target))
                    })
                    .collect::<Result<Vec<_>, TableauError>>()?
            }
        };
        Ok(tracks)
    }
}

fn replacement_tracks(
    state: &SceneState,
    from: &[Id],
    into: &[(Id, Figure)],
) -> Result<Vec<Track>, TableauError> {
    let mut tracks = Vec::with_capacity(from.len().max(into.len()));
    for (index, source) in from.iter().enumerate() {
        let current = state.require(*source)?.clone();
        match into.get(index) {
            Some((target, figure)) if target == source => {
                tracks.push(Track::blend(*source, current, figure.clone()));
            }
            Some((target, figure)) => {
                tracks.push(Track::blend(*source, current, figure.clone()).becoming(*target));
            }
            None => {
                let faded = current.clone().with_opacity(0.0);
                tracks.push(Track::blend(*source, current, faded).leaving());
            }
        }
    }
    for (target, figure) in into.iter().skip(from.len()) {
        tracks.push(Track::blend(*target, figure.clone().with_opacity(0.0), figure.clone()));
    }
    Ok(tracks)
}

#[derive(Debug, Clone, PartialEq)]
enum Motion {
    Blend,
    Path(SmoothCurve),
}

/// What happens to a track's id when its step ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Exit {
    Stay,
    Leave,
    /// The end figure moves to another id.
    Become(Id),
}

/// Start and end figure of one id during one step.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Track {
    id: Id,
    from: Figure,
    to: Figure,
    motion: Motion,
    exit: Exit,
}

impl Track {
    fn blend(id: Id, from: Figure, to: Figure) -> Self {
        Self {
            id,
            from,
            to,
            motion: Motion::Blend,
            exit: Exit::Stay,
        }
    }

    fn leaving(mut self) -> Self {
        self.exit = Exit::Leave;
        self
    }

    fn becoming(mut self, successor: Id) -> Self {
        self.exit = Exit::Become(successor);
        self
    }

    pub(crate) fn id(&self) -> Id {
        self.id
    }

    pub(crate) fn exit(&self) -> Exit {
        self.exit
    }

    pub(crate) fn end(&self) -> &Figure {
        &self.to
    }

    /// Figure at eased progress `t`.
    pub(crate) fn at(&self, t: f32) -> Figure {
        match &self.motion {
            Motion::Blend => self.from.interpolate(&self.to, t),
            Motion::Path(path) => {
                let mut figure = self.from.clone();
                figure.set_position(path.point_at(t));
                figure
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use indexmap::IndexMap;

    use tableau_core::draw::Shape;

    use super::*;

    fn state() -> SceneState {
        let mut figures = IndexMap::new();
        figures.insert(Id::new("left"), Figure::new(Shape::circle(0.5)).with_position(Point::new(-1.0, 0.0)));
        figures.insert(Id::new("right"), Figure::new(Shape::circle(0.5)).with_position(Point::new(1.0, 0.0)));
        SceneState::new(figures)
    }

    #[test]
    fn test_unknown_target_is_an_error() {
        let err = Animation::fade_out(Id::new("missing")).tracks(&state()).unwrap_err();
        assert!(matches!(err, TableauError::Timeline(_)));
    }

    #[test]
    fn test_create_reveals() {
        let figure = Figure::new(Shape::circle(1.0));
        let tracks = Animation::create(Id::new("c"), figure).tracks(&state()).unwrap();
        assert_approx_eq!(f32, tracks[0].at(0.0).reveal(), 0.0);
        assert_approx_eq!(f32, tracks[0].at(0.5).reveal(), 0.5);
    }

    #[test]
    fn test_shift_moves_every_id() {
        let ids = vec![Id::new("left"), Id::new("right")];
        let tracks = Animation::shift(ids, Point::new(0.0, 2.0)).tracks(&state()).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[1].at(1.0).position(), Point::new(1.0, 2.0));
    }

    #[test]
    fn test_reframe_scales_about_group_center() {
        let ids = vec![Id::new("left"), Id::new("right")];
        let tracks = Animation::reframe(ids, 0.5, Point::new(-5.0, 2.0))
            .tracks(&state())
            .unwrap();
        let left = tracks[0].at(1.0);
        assert_eq!(left.position(), Point::new(-5.5, 2.0));
        assert_approx_eq!(f32, left.placement().scale(), 0.5);
    }

    #[test]
    fn test_move_along_path_follows_curve() {
        let curve = SmoothCurve::new(vec![Point::new(0.0, 2.0), Point::new(0.0, -2.0)]).unwrap();
        let tracks = Animation::move_along_path(Id::new("left"), curve)
            .tracks(&state())
            .unwrap();
        let mid = tracks[0].at(0.5).position();
        assert_approx_eq!(f32, mid.y(), 0.0, epsilon = 1e-4);
        assert_eq!(tracks[0].at(1.0).position(), Point::new(0.0, -2.0));
    }

    #[test]
    fn test_replacement_pairs_by_position() {
        let into = vec![
            (Id::new("new_a"), Figure::new(Shape::circle(0.2))),
            (Id::new("new_b"), Figure::new(Shape::circle(0.3))),
            (Id::new("new_c"), Figure::new(Shape::circle(0.4))),
        ];
        let tracks = Animation::replacement_transform(vec![Id::new("left"), Id::new("right")], into)
            .tracks(&state())
            .unwrap();
        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks[0].id(), Id::new("left"));
        assert_eq!(tracks[0].exit(), Exit::Become(Id::new("new_a")));
        assert_eq!(tracks[2].id(), Id::new("new_c"));
        assert_eq!(tracks[2].exit(), Exit::Stay);
        assert_approx_eq!(f32, tracks[2].at(0.0).opacity(), 0.0);
    }

    #[test]
    fn test_rotate_accumulates() {
        let tracks = Animation::rotate(Id::new("left"), 1.0).tracks(&state()).unwrap();
        assert_approx_eq!(f32, tracks[0].at(1.0).placement().rotation(), 1.0);
    }
}
