//! Deterministic lateral displacement, built up from a single pillar row.
//!
//! The row's pitch λ is measured with an indicator anchored to the first two
//! pillars, so it stretches with the row while the pillars spread out and
//! close up again. The row then becomes the top of a five-row array,
//! streamlines carry particles through it, and the rows are shifted by
//! multiples of Δλ = λ/5 to introduce the row shift fraction ε = Δλ/λ.

use rand::{SeedableRng, rngs::StdRng};

use tableau_core::{
    color::palette,
    draw::{ArrowShape, Drawable, Figure, RenderLayer, Shape, StrokeDefinition, Style},
    geometry::{Bounds, Point},
    identifier::Id,
};

use super::{arrow, centered_at, math, measure, pillar, text, tick};
use crate::{
    TableauError,
    config::AppConfig,
    layout::{ArraySpec, Direction, PillarArray, generate_grid, next_to, to_edge},
    path::{Jitter, PathPolicy, PathSampler, seed_particles},
    timeline::{Anchor, Animation, Easing, Scene},
};

const PILLARS: usize = 10;
const _: () = assert!(PILLARS >= 2, "the pitch indicator spans two pillars");
const ROWS: usize = 5;
const RADIUS: f32 = 0.3;
const PITCH: f32 = 2.5 * RADIUS;
const STRETCH: f32 = 1.75;
/// Height the first row climbs to before the array is built below it.
const RAISE: f32 = 2.0;
const TICK: f32 = 1.5 * RADIUS;
const LABEL_DROP: f32 = 0.5;
/// Streamlines start and end this far outside the array.
const FLOW_MARGIN: f32 = 1.5;
const SHIFT_STEPS: f32 = 5.0;
const RECENTER: f32 = 0.5;

pub(super) fn build(config: &AppConfig) -> Result<Scene, TableauError> {
    let frame = config.render().viewport().frame_bounds();
    let mut scene = Scene::new("dld");

    let title = text("Deterministic Lateral Displacement (DLD)", 36.0, palette::white());
    let title_at = to_edge(frame, title.bounds(), Direction::Up, 0.5);
    scene.play(vec![Animation::create(Id::new("title"), centered_at(title, title_at))]);

    // Opening row at its natural pitch.
    let row = generate_grid(PILLARS, PITCH, RADIUS)?;
    let row_ids: Vec<Id> = (0..PILLARS).map(|column| Id::indexed("pillar", &[0, column])).collect();
    scene
        .play(
            row_ids
                .iter()
                .zip(&row)
                .map(|(id, center)| Animation::create(*id, pillar(*center, RADIUS)))
                .collect(),
        )
        .wait(1.0);

    let annotation_id = Id::new("annotation");
    let row_bounds = Bounds::from_points(&row).unwrap_or_default().expand(RADIUS);
    let annotation = text("Single Row of Micropillars", 24.0, palette::white());
    let annotation_at = next_to(row_bounds, annotation.bounds().to_size(), Direction::Down, 0.5);
    scene.play(vec![Animation::fade_in(annotation_id, centered_at(annotation, annotation_at))]);

    // λ between the first two pillars, following them from here on.
    let ([first_at, second_at, ..], [first, second, ..]) = (row.as_slice(), row_ids.as_slice()) else {
        return Err(TableauError::configuration("measuring λ needs at least two pillars"));
    };
    let (first_at, second_at, first, second) = (*first_at, *second_at, *first, *second);
    let lambda = LambdaIds::new("lambda");
    let label_offset = Point::new(0.0, -LABEL_DROP);
    scene
        .play(vec![
            Animation::create(lambda.arrow, measure(first_at, second_at)),
            Animation::create(lambda.left, tick(first_at, TICK, true)),
            Animation::create(lambda.right, tick(second_at, TICK, true)),
            Animation::create(
                lambda.label,
                math("λ", 36.0).with_position(first_at.midpoint(second_at).add_point(label_offset)),
            ),
        ])
        .attach(lambda.arrow, Anchor::span(first, second, Point::default()))
        .attach(lambda.left, Anchor::tick(first, TICK, true))
        .attach(lambda.right, Anchor::tick(second, TICK, true))
        .attach(lambda.label, Anchor::span(first, second, label_offset))
        .wait(1.0);

    let stretched = generate_grid(PILLARS, PITCH * STRETCH, RADIUS)?;
    let spread = |targets: &[Point]| -> Vec<Animation> {
        row_ids
            .iter()
            .zip(targets)
            .map(|(id, target)| Animation::move_to(*id, *target))
            .collect()
    };
    scene
        .play_with(spread(&stretched), 2.0, Easing::Smooth)
        .wait(1.0)
        .play_with(spread(&row), 2.0, Easing::Smooth)
        .play_with(spread(&stretched), 2.0, Easing::Smooth)
        .wait(0.5)
        .play(vec![Animation::fade_out(annotation_id)])
        .wait(1.0);

    // Lift the row with its indicator, then hang four more rows below it.
    let pitch = PITCH * STRETCH;
    let centered = PillarArray::new(ArraySpec::new(PILLARS, ROWS, pitch, RADIUS))?;
    let top = centered.row_y(0).unwrap_or_default();
    let array = centered.translated(Point::new(0.0, RAISE - top));

    let mut lifted = row_ids.clone();
    lifted.extend(lambda.all());
    for id in lambda.all() {
        scene.detach(id);
    }
    scene
        .play_with(vec![Animation::shift(lifted, Point::new(0.0, RAISE))], 1.5, Easing::Smooth)
        .wait(1.0);

    let mut rows: Vec<Vec<Id>> = vec![row_ids];
    for (index, centers) in array.rows().iter().enumerate().skip(1) {
        let ids: Vec<Id> = (0..centers.len()).map(|column| Id::indexed("pillar", &[index, column])).collect();
        scene.play_with(
            ids.iter()
                .zip(centers)
                .map(|(id, center)| Animation::create(*id, pillar(*center, RADIUS)))
                .collect(),
            0.7,
            Easing::Smooth,
        );
        rows.push(ids);
    }
    scene.wait(2.0);

    // Vertical λ between the first pillars of the top two rows.
    let upper = array.pillar(0, 0).unwrap_or_default();
    let lower = array.pillar(1, 0).unwrap_or_default();
    let rail = upper.x() - 2.0 * RADIUS;
    scene
        .play(vec![
            Animation::create(
                Id::new("v_lambda/arrow"),
                measure(Point::new(rail, upper.y()), Point::new(rail, lower.y())),
            ),
            Animation::create(Id::new("v_lambda/upper"), tick(upper, TICK, false)),
            Animation::create(Id::new("v_lambda/lower"), tick(lower, TICK, false)),
            Animation::create(
                Id::new("v_lambda/label"),
                math("λ", 36.0).with_position(Point::new(rail - 0.3, upper.midpoint(lower).y())),
            ),
        ])
        .wait(1.0);

    play_streamlines(&mut scene, config, &array)?;

    // Shift row i right by i·Δλ, then recenter the whole array.
    let delta = pitch / SHIFT_STEPS;
    scene.play_with(
        rows.iter()
            .enumerate()
            .skip(1)
            .map(|(index, ids)| Animation::shift(ids.clone(), Point::new(index as f32 * delta, 0.0)))
            .collect(),
        2.0,
        Easing::Smooth,
    );
    let mut everything: Vec<Id> = rows.iter().flatten().copied().collect();
    everything.extend(lambda.all());
    scene
        .play_with(vec![Animation::shift(everything, Point::new(-RECENTER, 0.0))], 1.5, Easing::Smooth)
        .wait(2.0);

    // Δλ on the second row: where its first pillar was against where it is.
    let shifted = array.pillar(1, 0).unwrap_or_default().add_point(Point::new(delta - RECENTER, 0.0));
    let unshifted = shifted.sub_point(Point::new(delta, 0.0));
    let delta_ids = LambdaIds::new("delta_lambda");
    scene
        .play(vec![
            Animation::create(delta_ids.arrow, measure(unshifted, shifted)),
            Animation::create(delta_ids.left, tick(unshifted, TICK, true)),
            Animation::create(delta_ids.right, tick(shifted, TICK, true)),
            Animation::create(
                delta_ids.label,
                math("Δλ", 36.0).with_position(unshifted.midpoint(shifted).add_point(label_offset)),
            ),
        ])
        .wait(2.0);

    play_epsilon(&mut scene, frame);
    scene.wait(7.0);
    Ok(scene)
}

/// Ids of the four parts of a measurement indicator.
#[derive(Clone, Copy)]
struct LambdaIds {
    arrow: Id,
    left: Id,
    right: Id,
    label: Id,
}

impl LambdaIds {
    fn new(prefix: &str) -> Self {
        let root = Id::new(prefix);
        Self {
            arrow: root.child("arrow"),
            left: root.child("left"),
            right: root.child("right"),
            label: root.child("label"),
        }
    }

    fn all(self) -> [Id; 4] {
        [self.arrow, self.left, self.right, self.label]
    }
}

/// Seeded streamlines through the array, particles riding them, then both
/// cleared away.
fn play_streamlines(scene: &mut Scene, config: &AppConfig, array: &PillarArray) -> Result<(), TableauError> {
    let flow = config.flow();
    let mut policy = PathPolicy::Stochastic(Jitter::seeded(
        flow.seed(),
        flow.jitter(),
        flow.sway(),
        flow.control_points(),
    )?);
    let lines = PathSampler::new(array)
        .with_margin(FLOW_MARGIN)
        .streamlines(flow.streamlines(), &mut policy)?;

    let line_ids: Vec<Id> = (0..lines.len()).map(|index| Id::indexed("streamline", &[index])).collect();
    scene.play_with(
        line_ids
            .iter()
            .zip(&lines)
            .map(|(id, line)| {
                let figure = Figure::new(Shape::Curve(line.smooth().clone()))
                    .with_style(Style::stroked(StrokeDefinition::new(palette::teal(), 1.5)))
                    .with_opacity(0.8)
                    .with_layer(RenderLayer::Flow);
                Animation::fade_in(*id, figure)
            })
            .collect(),
        1.5,
        Easing::Smooth,
    );

    let particles = seed_particles(&lines, &mut StdRng::seed_from_u64(flow.seed()));
    let particle_ids: Vec<Id> = (0..particles.len()).map(|index| Id::indexed("particle", &[index])).collect();
    let mut entrances = Vec::with_capacity(particles.len());
    let mut journeys = Vec::with_capacity(particles.len());
    for (id, particle) in particle_ids.iter().zip(&particles) {
        let line = &lines[particle.path()];
        entrances.push(Animation::fade_in(*id, particle.figure(line)));
        journeys.push(Animation::move_along_path(*id, line.smooth().clone()));
    }
    scene
        .play_with(entrances, 0.5, Easing::Smooth)
        .play_with(journeys, 4.0, Easing::Smooth)
        .wait(1.0)
        .play(
            line_ids
                .iter()
                .chain(&particle_ids)
                .map(|id| Animation::fade_out(*id))
                .collect(),
        );
    Ok(())
}

/// ε = Δλ/λ in the lower right corner, named by a label and an arrow.
fn play_epsilon(scene: &mut Scene, frame: Bounds) {
    let equation = math("ε = Δλ/λ", 40.0);
    let bounds = equation.bounds();
    let at = Point::new(
        to_edge(frame, bounds, Direction::Right, 0.5).x(),
        to_edge(frame, bounds, Direction::Down, 1.0).y(),
    );
    let equation = centered_at(equation, at);
    let placed = equation.bounds();
    let epsilon = Point::new(placed.left() + 0.15, placed.center().y());

    let label = centered_at(
        text("row shift fraction", 20.0, palette::white()),
        epsilon.add_point(Point::new(-1.0, 1.2)),
    );
    let label_bottom = Point::new(label.bounds().center().x(), label.bounds().bottom());
    let pointer = arrow(
        ArrowShape::new(
            label_bottom.add_point(Point::new(0.0, -0.2)),
            epsilon.add_point(Point::new(0.0, 0.35)),
        ),
        palette::white(),
    );

    scene.play_with(
        vec![
            Animation::fade_in(Id::new("epsilon"), equation),
            Animation::create(Id::new("epsilon/pointer"), pointer),
            Animation::fade_in(Id::new("epsilon/label"), label),
        ],
        2.0,
        Easing::Smooth,
    );
}
