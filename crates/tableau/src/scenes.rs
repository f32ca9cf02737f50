//! The built-in scene catalog.
//!
//! Every [`SceneKind`] builds a [`Scene`] from the run configuration. Scenes
//! are pure data; nothing is drawn until a [`TimelinePlayer`] plays them.
//!
//! | Name               | Content                                              |
//! |--------------------|------------------------------------------------------|
//! | `dld`              | Deterministic lateral displacement, from one row to ε |
//! | `flow-lanes`       | Zigzag and bounce lanes through a shifted array       |
//! | `blood-cells`      | Four labelled cell types rotating in place            |
//! | `cell-pulse`       | A red blood cell growing and shrinking                |
//! | `pagerank`         | Link graph, adjacency and transition matrices         |
//! | `pagerank-formula` | The PageRank formula and the computed ranks           |
//! | `quote`            | Closing quote                                         |
//! | `credits`          | References                                            |
//!
//! [`TimelinePlayer`]: crate::timeline::TimelinePlayer

mod cells;
mod credits;
mod dld;
mod flow_lanes;
pub mod pagerank;

use std::{fmt, str::FromStr};

use tableau_core::{
    color::{Color, palette},
    draw::{
        ArrowHeads, ArrowShape, Drawable, Figure, RenderLayer, Shape, StrokeDefinition, Style,
        Text, TextDefinition,
    },
    geometry::{Bounds, Point},
};

use crate::{TableauError, assets::AssetLoader, config::AppConfig, timeline::Scene};

/// Font sizes below are given in points of a 720p frame.
const POINTS_PER_UNIT: f32 = 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKind {
    Dld,
    FlowLanes,
    BloodCells,
    CellPulse,
    PageRank,
    PageRankFormula,
    Quote,
    Credits,
}

impl SceneKind {
    /// Every scene, in presentation order.
    pub fn all() -> &'static [SceneKind] {
        &[
            Self::Dld,
            Self::FlowLanes,
            Self::BloodCells,
            Self::CellPulse,
            Self::PageRank,
            Self::PageRankFormula,
            Self::Quote,
            Self::Credits,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dld => "dld",
            Self::FlowLanes => "flow-lanes",
            Self::BloodCells => "blood-cells",
            Self::CellPulse => "cell-pulse",
            Self::PageRank => "pagerank",
            Self::PageRankFormula => "pagerank-formula",
            Self::Quote => "quote",
            Self::Credits => "credits",
        }
    }

    /// One-line summary shown by `tableau --list`.
    pub fn description(self) -> &'static str {
        match self {
            Self::Dld => "Deterministic lateral displacement: pillar rows, streamlines and row shift",
            Self::FlowLanes => "Zigzag and bounce flow lanes through a row-shifted pillar array",
            Self::BloodCells => "Red, white and tumor cells and platelets rotating in place",
            Self::CellPulse => "A red blood cell pulsing in size",
            Self::PageRank => "A link graph turned into adjacency and transition matrices",
            Self::PageRankFormula => "The PageRank formula with the ranks of the example graph",
            Self::Quote => "Closing quote",
            Self::Credits => "References and thanks",
        }
    }

    /// Builds the scene's timeline.
    ///
    /// # Errors
    ///
    /// Returns [`TableauError::Configuration`] when the configuration yields
    /// an unusable layout, and [`TableauError::Asset`] for a malformed asset
    /// under a strict loader.
    pub fn build(self, config: &AppConfig, assets: &AssetLoader) -> Result<Scene, TableauError> {
        match self {
            Self::Dld => dld::build(config),
            Self::FlowLanes => flow_lanes::build(config),
            Self::BloodCells => cells::blood_cells(config, assets),
            Self::CellPulse => cells::pulse(assets),
            Self::PageRank => pagerank::build(config),
            Self::PageRankFormula => pagerank::formula(config),
            Self::Quote => Ok(credits::quote()),
            Self::Credits => Ok(credits::credits(config)),
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SceneKind {
    type Err = TableauError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| {
                let known = Self::all()
                    .iter()
                    .map(|kind| kind.name())
                    .collect::<Vec<_>>()
                    .join(", ");
                TableauError::configuration(format!("unknown scene `{s}`, expected one of: {known}"))
            })
    }
}

fn text(content: &str, points: f32, color: Color) -> Figure {
    let definition = TextDefinition::new()
        .with_font_size(points / POINTS_PER_UNIT)
        .with_color(color);
    Figure::new(Shape::Label(Text::new(definition, content))).with_layer(RenderLayer::Text)
}

/// Italic serif text for symbols and formulas.
fn math(content: &str, points: f32) -> Figure {
    let definition = TextDefinition::new()
        .with_font_size(points / POINTS_PER_UNIT)
        .with_color(palette::white())
        .with_font_family("serif")
        .with_italic(true);
    Figure::new(Shape::Label(Text::new(definition, content))).with_layer(RenderLayer::Text)
}

fn pillar(center: Point, radius: f32) -> Figure {
    Figure::new(Shape::circle(radius))
        .with_style(
            Style::stroked(StrokeDefinition::new(palette::blue(), 2.0))
                .with_fill(palette::blue().with_alpha(0.8)),
        )
        .with_position(center)
}

fn dot(center: Point, radius: f32, color: Color) -> Figure {
    Figure::new(Shape::circle(radius))
        .with_style(Style::filled(color))
        .with_position(center)
        .with_layer(RenderLayer::Particle)
}

fn arrow(shape: ArrowShape, color: Color) -> Figure {
    Figure::new(Shape::arrow(shape))
        .with_style(Style::stroked(StrokeDefinition::new(color, 2.0)))
        .with_layer(RenderLayer::Annotation)
}

/// White measurement arrow with tips at both ends.
fn measure(start: Point, end: Point) -> Figure {
    arrow(
        ArrowShape::new(start, end)
            .with_heads(ArrowHeads::Both)
            .with_tip_length(0.2),
        palette::white(),
    )
}

/// Short white marker line through `center`.
fn tick(center: Point, half_length: f32, vertical: bool) -> Figure {
    let reach = if vertical {
        Point::new(0.0, half_length)
    } else {
        Point::new(half_length, 0.0)
    };
    Figure::new(Shape::line(center.sub_point(reach), center.add_point(reach)))
        .with_style(Style::stroked(StrokeDefinition::new(palette::white(), 2.0)))
        .with_layer(RenderLayer::Annotation)
}

/// `figure` moved so its bounds' center sits at `center`.
fn centered_at(figure: Figure, center: Point) -> Figure {
    let offset = center.sub_point(figure.bounds().center());
    let mut figure = figure;
    figure.shift(offset);
    figure
}

/// Merged bounds of several figures.
fn union(figures: &[&Figure]) -> Bounds {
    figures
        .iter()
        .map(|figure| figure.bounds())
        .reduce(|acc, bounds| acc.merge(&bounds))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in SceneKind::all() {
            assert_eq!(kind.name().parse::<SceneKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn test_unknown_scene_lists_choices() {
        let err = "nope".parse::<SceneKind>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("nope"));
        assert!(message.contains("flow-lanes"));
    }

    #[test]
    fn test_centered_at_uses_bounds() {
        let figure = centered_at(dot(Point::new(3.0, 3.0), 0.5, palette::red()), Point::default());
        assert_eq!(figure.bounds().center(), Point::default());
    }
}
