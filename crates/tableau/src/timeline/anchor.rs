//! Decorations that follow other figures.
//!
//! An [`Anchor`] records which figure(s) a decoration depends on and how it
//! sits relative to them. The player re-derives every anchored decoration
//! from its anchors once per tick, after animations have moved the anchor
//! figures, so a measurement arrow between two pillars stretches as the row
//! expands without the arrow itself being animated.

use tableau_core::{draw::Figure, geometry::Point, identifier::Id};

use crate::TableauError;

#[derive(Debug, Clone, PartialEq)]
pub enum Anchor {
    /// Keeps the decoration at `offset` from the target's position.
    Follow { target: Id, offset: Point },
    /// Stretches a line or arrow between two figures, both ends displaced by
    /// `offset`. Any other shape sits at the displaced midpoint.
    Span { from: Id, to: Id, offset: Point },
    /// A short line through the target's center, `half_length` to either
    /// side, vertical or horizontal.
    Tick {
        target: Id,
        half_length: f32,
        vertical: bool,
    },
}

/// Where an anchor wants its decoration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Resolved {
    At(Point),
    Between(Point, Point),
}

impl Anchor {
    pub fn follow(target: Id, offset: Point) -> Self {
        Self::Follow { target, offset }
    }

    pub fn span(from: Id, to: Id, offset: Point) -> Self {
        Self::Span { from, to, offset }
    }

    pub fn tick(target: Id, half_length: f32, vertical: bool) -> Self {
        Self::Tick {
            target,
            half_length,
            vertical,
        }
    }

    /// Figures this anchor depends on.
    pub fn targets(&self) -> Vec<Id> {
        match self {
            Self::Follow { target, .. } | Self::Tick { target, .. } => vec![*target],
            Self::Span { from, to, .. } => vec![*from, *to],
        }
    }

    /// Computes the decoration's geometry from the current target positions.
    pub(crate) fn resolve(
        &self,
        position_of: impl Fn(Id) -> Option<Point>,
    ) -> Result<Resolved, TableauError> {
        let lookup = |id: Id| {
            position_of(id)
                .ok_or_else(|| TableauError::timeline(format!("anchor target `{id}` is not in the scene")))
        };
        Ok(match self {
            Self::Follow { target, offset } => Resolved::At(lookup(*target)?.add_point(*offset)),
            Self::Span { from, to, offset } => Resolved::Between(
                lookup(*from)?.add_point(*offset),
                lookup(*to)?.add_point(*offset),
            ),
            Self::Tick {
                target,
                half_length,
                vertical,
            } => {
                let center = lookup(*target)?;
                let reach = if *vertical {
                    Point::new(0.0, *half_length)
                } else {
                    Point::new(*half_length, 0.0)
                };
                Resolved::Between(center.sub_point(reach), center.add_point(reach))
            }
        })
    }
}

impl Resolved {
    pub(crate) fn apply(self, decoration: &mut Figure) {
        match self {
            Self::At(position) => decoration.set_position(position),
            Self::Between(start, end) => decoration.span(start, end),
        }
    }
}
