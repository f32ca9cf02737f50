//! Flow lanes through a row-shifted pillar array.
//!
//! Two lanes enter through the same gap. The zigzag lane falls back one gap
//! in the last row while the bounce lane keeps following the shifted rows.
//! A particle too large for either lane alone is carried onto the bounce lane
//! once it reaches the second row.

use tableau_core::{
    color::{Color, palette},
    draw::{Drawable, Figure, RenderLayer, Shape, StrokeDefinition, Style},
    geometry::{Bounds, Point, Size},
    identifier::Id,
};

use super::{centered_at, dot, pillar, text};
use crate::{
    TableauError,
    config::AppConfig,
    layout::{ArraySpec, Direction, PillarArray, next_to, to_corner, to_edge},
    path::{FlowPath, PathPolicy, PathSampler},
    timeline::{Animation, Easing, Scene},
};

const COLUMNS: usize = 4;
const ROWS: usize = 3;
const RADIUS: f32 = 0.525;
const PITCH: f32 = 5.0 * RADIUS;
const ROW_SHIFT: f32 = 0.25;
const PARTICLE_RADIUS: f32 = 0.08;
const LARGE_PARTICLE_RADIUS: f32 = 0.25;

struct Lane {
    name: &'static str,
    legend: &'static str,
    color: fn() -> Color,
    gates: &'static [usize],
    lateral_offset: f32,
}

const LANES: [Lane; 2] = [
    Lane {
        name: "L1",
        legend: "Lane 1: Zigzag",
        color: palette::pink,
        gates: &[1, 1, 0],
        lateral_offset: -0.4,
    },
    Lane {
        name: "L2",
        legend: "Lane 2: Bounce",
        color: palette::yellow,
        gates: &[1, 1, 1],
        lateral_offset: 0.0,
    },
];

fn device() -> Result<PillarArray, TableauError> {
    PillarArray::new(ArraySpec::new(COLUMNS, ROWS, PITCH, RADIUS).with_row_shift(ROW_SHIFT))
}

/// Lane paths in [`LANES`] order.
fn lanes(array: &PillarArray) -> Result<Vec<FlowPath>, TableauError> {
    LANES
        .iter()
        .map(|lane| {
            PathSampler::new(array)
                .with_lateral_offset(lane.lateral_offset)
                .sample(lane.gates, &mut PathPolicy::Deterministic)
        })
        .collect()
}

/// Straight drop onto the second row, then the bounce lane's remaining
/// course.
fn large_particle_path(paths: &[FlowPath], array: &PillarArray) -> Result<FlowPath, TableauError> {
    let start_x = paths.iter().map(|path| path.start().x()).sum::<f32>() / paths.len() as f32;
    let top = array.bounds().top() + PathSampler::new(array).margin();
    let second_row = array.row_y(1).unwrap_or_default();

    let mut points = vec![Point::new(start_x, top), Point::new(start_x, second_row)];
    if let Some(bounce) = paths.get(1) {
        points.extend(bounce.tail_below(second_row));
    }
    FlowPath::new(points)
}

pub(super) fn build(config: &AppConfig) -> Result<Scene, TableauError> {
    let frame = config.render().viewport().frame_bounds();
    let array = device()?;
    let paths = lanes(&array)?;
    let mut scene = Scene::new("flow-lanes");

    for (row, centers) in array.rows().iter().enumerate() {
        scene.play_with(
            centers
                .iter()
                .enumerate()
                .map(|(column, center)| {
                    Animation::create(Id::indexed("pillar", &[row, column]), pillar(*center, RADIUS))
                })
                .collect(),
            0.7,
            Easing::Smooth,
        );
    }
    scene.wait(1.0);

    let lane_ids: Vec<Id> = (0..LANES.len()).map(|index| Id::indexed("lane", &[index])).collect();
    scene.play_with(
        lane_ids
            .iter()
            .zip(LANES.iter().zip(&paths))
            .map(|(id, (lane, path))| {
                let figure = Figure::new(Shape::Curve(path.smooth().clone()))
                    .with_style(Style::stroked(StrokeDefinition::new((lane.color)(), 3.0)))
                    .with_layer(RenderLayer::Flow);
                Animation::create(*id, figure)
            })
            .collect(),
        1.5,
        Easing::Smooth,
    );

    let mut lane_labels = Vec::new();
    let mut entrances = Vec::new();
    for (index, (lane, path)) in LANES.iter().zip(&paths).enumerate() {
        let id = Id::indexed("lane_label", &[index]);
        let label = text(lane.name, 18.0, (lane.color)());
        let at = next_to(point_bounds(path.start()), label.bounds().to_size(), Direction::Up, 0.2);
        entrances.push(Animation::fade_in(id, centered_at(label, at)));
        lane_labels.push(id);
    }
    scene.play(entrances).wait(1.0);

    let first_wave = ride_lanes(&mut scene, &paths, "particle");

    let explanation_id = Id::new("explanation");
    let explanation = text("Particles follow different flow paths", 24.0, palette::white());
    let bounds = explanation.bounds();
    let at = Point::new(
        to_edge(frame, bounds, Direction::Left, 0.3).x(),
        to_edge(frame, bounds, Direction::Down, 2.5).y(),
    );
    scene.play(vec![Animation::fade_in(explanation_id, centered_at(explanation, at))]);

    let mut end_labels = Vec::new();
    let mut numbers = Vec::new();
    for (index, (lane, path)) in LANES.iter().zip(&paths).enumerate() {
        let id = Id::indexed("lane_number", &[index]);
        let label = text(&(index + 1).to_string(), 18.0, (lane.color)());
        let at = next_to(point_bounds(path.end()), label.bounds().to_size(), Direction::Down, 0.2);
        numbers.push(Animation::fade_in(id, centered_at(label, at)));
        end_labels.push(id);
    }
    scene.play(numbers);

    let legend = legend(frame);
    scene
        .play(
            legend
                .iter()
                .map(|(id, figure)| Animation::fade_in(*id, figure.clone()))
                .collect(),
        )
        .wait(2.0);

    let second_wave = ride_lanes(&mut scene, &paths, "second_particle");
    scene.wait(1.0);

    // One large particle spanning both lanes.
    let large_id = Id::new("large_particle");
    let large_path = large_particle_path(&paths, &array)?;
    let large = Figure::new(Shape::circle(LARGE_PARTICLE_RADIUS))
        .with_style(
            Style::stroked(StrokeDefinition::new(palette::green(), 2.0))
                .with_fill(palette::green_a().with_alpha(0.8)),
        )
        .with_position(large_path.start())
        .with_layer(RenderLayer::Particle);
    scene
        .play(vec![Animation::fade_in(large_id, large)])
        .wait(5.0)
        .play_with(
            vec![Animation::move_along_path(large_id, large_path.smooth().clone())],
            3.0,
            Easing::Smooth,
        )
        .wait(1.0);

    let ends = LANES
        .iter()
        .zip(&paths)
        .map(|(lane, path)| ((lane.color)(), path.end()))
        .chain(std::iter::once((palette::green(), large_path.end())));
    scene
        .play(
            ends.enumerate()
                .map(|(index, (color, end))| {
                    Animation::fade_in(Id::indexed("end_dot", &[index]), dot(end, 0.1, color))
                })
                .collect(),
        )
        .wait(1.0);

    let leaving = first_wave
        .into_iter()
        .chain(second_wave)
        .chain(std::iter::once(explanation_id))
        .chain(legend.iter().map(|(id, _)| *id))
        .chain(lane_labels)
        .chain(end_labels);
    scene
        .play(leaving.map(Animation::fade_out).collect())
        .wait(2.0);
    Ok(scene)
}

/// A particle per lane, faded in at the lane start and carried to its end.
/// Returns the particle ids.
fn ride_lanes(scene: &mut Scene, paths: &[FlowPath], prefix: &str) -> Vec<Id> {
    let ids: Vec<Id> = (0..paths.len()).map(|index| Id::indexed(prefix, &[index])).collect();
    let mut entrances = Vec::with_capacity(paths.len());
    let mut journeys = Vec::with_capacity(paths.len());
    for ((id, lane), path) in ids.iter().zip(&LANES).zip(paths) {
        entrances.push(Animation::fade_in(*id, dot(path.start(), PARTICLE_RADIUS, (lane.color)())));
        journeys.push(Animation::move_along_path(*id, path.smooth().clone()));
    }
    scene
        .play(entrances)
        .play_with(journeys, 4.0, Easing::Smooth);
    ids
}

/// "Flow Lanes" in the upper right corner with a colored entry per lane.
fn legend(frame: Bounds) -> Vec<(Id, Figure)> {
    let title = text("Flow Lanes", 20.0, palette::white());
    let title_at = to_corner(
        frame,
        title.bounds().to_size(),
        Direction::Up,
        Direction::Right,
        0.75,
    );
    let title = centered_at(title, title_at);
    let left = title.bounds().left();
    let mut cursor = title.bounds().bottom() - 0.2;

    let mut parts = vec![(Id::new("legend"), title)];
    for (index, lane) in LANES.iter().enumerate() {
        let entry = text(lane.legend, 14.0, palette::white());
        let size = entry.bounds().to_size();
        let row_height = size.height().max(0.2);
        let middle = cursor - row_height / 2.0;

        let marker = dot(Point::new(left + 0.1, middle), 0.1, (lane.color)()).with_layer(RenderLayer::Text);
        let entry = centered_at(entry, Point::new(left + 0.4 + size.width() / 2.0, middle));
        let root = Id::indexed("legend", &[index]);
        parts.push((root.child("marker"), marker));
        parts.push((root.child("text"), entry));
        cursor -= row_height + 0.2;
    }
    parts
}

fn point_bounds(point: Point) -> Bounds {
    Bounds::new_from_center(point, Size::default())
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::timeline::TimelinePlayer;

    #[test]
    fn test_lanes_share_their_entry_gap() {
        let array = device().unwrap();
        let paths = lanes(&array).unwrap();
        let gap = array.gap_center(0, 1).unwrap();
        assert_approx_eq!(f32, paths[1].points()[1].x(), gap.x(), epsilon = 1e-5);
        assert_approx_eq!(f32, paths[0].points()[1].x(), gap.x() - 0.4, epsilon = 1e-5);
    }

    #[test]
    fn test_zigzag_falls_back_and_bounce_follows_shift() {
        let array = device().unwrap();
        let paths = lanes(&array).unwrap();
        let drift = |path: &FlowPath| path.points()[3].x() - path.points()[2].x();
        assert!(drift(&paths[0]) < 0.0);
        assert!(drift(&paths[1]) > 0.0);
    }

    #[test]
    fn test_large_particle_joins_bounce_lane() {
        let array = device().unwrap();
        let paths = lanes(&array).unwrap();
        let large = large_particle_path(&paths, &array).unwrap();
        assert_eq!(large.end(), paths[1].end());
        assert_approx_eq!(
            f32,
            large.start().x(),
            (paths[0].start().x() + paths[1].start().x()) / 2.0,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_scene_ends_with_large_particle_on_stage() {
        let scene = build(&AppConfig::default()).unwrap();
        let state = TimelinePlayer::new(10)
            .snapshot_at(&scene, scene.duration())
            .unwrap();
        let array = device().unwrap();
        let end = large_particle_path(&lanes(&array).unwrap(), &array).unwrap().end();
        assert!(state.figure(Id::new("large_particle")).unwrap().position().distance(end) < 1e-4);
        assert!(!state.contains(Id::new("explanation")));
        assert!(!state.contains(Id::indexed("particle", &[0])));
    }
}
