//! Blood cell illustrations.

use tableau_core::{
    color::palette,
    draw::{Drawable, Figure, RenderLayer},
    geometry::{Point, Size},
    identifier::Id,
};

use super::{centered_at, text};
use crate::{
    TableauError,
    assets::AssetLoader,
    config::AppConfig,
    layout::{Direction, arrange, to_edge},
    timeline::{Animation, Easing, Scene},
};

/// Asset name, caption, artwork scale and spin in radians per 60 fps frame.
const CELLS: [(&str, &str, f32, f32); 4] = [
    ("rbc", "Red Blood Cell", 1.0, 0.05),
    ("wbc", "White Blood Cell", 1.9, 0.007),
    ("ctc", "Circulating Tumor Cell", 1.2, 0.013),
    ("platelet", "Platelet", 0.7, 0.009),
];
const ARTWORK_SCALE: f32 = 0.8;
const SPIN_FRAMES: f32 = 900.0;
const SPIN_FPS: f32 = 60.0;

/// Loads a cell; fallback shapes are already drawn at their intended size.
fn cell(assets: &AssetLoader, name: &str, scale: f32) -> Result<Figure, TableauError> {
    let (figure, outcome) = assets.figure_or_fallback(name, scale)?;
    let figure = if outcome.is_fallback() {
        figure.with_scale(1.0)
    } else {
        figure
    };
    Ok(figure.with_layer(RenderLayer::Particle))
}

pub(super) fn blood_cells(config: &AppConfig, assets: &AssetLoader) -> Result<Scene, TableauError> {
    let frame = config.render().viewport().frame_bounds();
    let mut scene = Scene::new("blood-cells");

    let mut shapes = Vec::with_capacity(CELLS.len());
    let mut captions = Vec::with_capacity(CELLS.len());
    for (name, caption, scale, _) in CELLS {
        shapes.push(cell(assets, name, scale * ARTWORK_SCALE)?);
        captions.push(text(caption, 24.0, palette::white()));
    }

    // Each shape sits above its caption; the pairs line up left to right.
    let stacks: Vec<(Vec<Point>, Size)> = shapes
        .iter()
        .zip(&captions)
        .map(|(shape, caption)| {
            let sizes = [shape.bounds().to_size(), caption.bounds().to_size()];
            let offsets = arrange(&sizes, Direction::Down, 0.3);
            let size = Size::new(
                sizes[0].width().max(sizes[1].width()),
                sizes[0].height() + sizes[1].height() + 0.3,
            );
            (offsets, size)
        })
        .collect();
    let sizes: Vec<Size> = stacks.iter().map(|(_, size)| *size).collect();
    let columns = arrange(&sizes, Direction::Right, 1.2);

    let mut everything = Vec::new();
    for (index, (shape, caption)) in shapes.into_iter().zip(captions).enumerate() {
        let (offsets, _) = &stacks[index];
        let column = columns[index];
        let id = Id::new(CELLS[index].0);
        let caption_id = id.child("caption");
        scene
            .add(id, centered_at(shape, column.add_point(offsets[0])))
            .add(caption_id, centered_at(caption, column.add_point(offsets[1])));
        everything.push(id);
        everything.push(caption_id);
    }

    let note_id = Id::new("not_to_scale");
    let note = text("*NOT TO SCALE", 22.0, palette::white());
    let at = to_edge(frame, note.bounds(), Direction::Down, 0.85).with_x(0.0);
    scene.add(note_id, centered_at(note, at));
    everything.push(note_id);

    let spin_time = SPIN_FRAMES / SPIN_FPS;
    scene
        .wait(1.0)
        .play_with(
            CELLS
                .iter()
                .map(|(name, _, _, speed)| Animation::rotate(Id::new(name), speed * SPIN_FRAMES))
                .collect(),
            spin_time,
            Easing::Linear,
        )
        .play(everything.into_iter().map(Animation::fade_out).collect());
    Ok(scene)
}

pub(super) fn pulse(assets: &AssetLoader) -> Result<Scene, TableauError> {
    let mut scene = Scene::new("cell-pulse");
    let id = Id::new("rbc");
    let rbc = cell(assets, "rbc", 1.0)?;
    let rbc = rbc
        .clone()
        .with_scale(rbc.placement().scale() * 0.75)
        .with_position(Point::new(-3.0, 0.0));

    scene.play(vec![Animation::fade_in(id, rbc)]).wait(3.0);
    for _ in 0..2 {
        scene
            .play(vec![Animation::scale(id, 3.0)])
            .wait(1.0)
            .play(vec![Animation::scale(id, 1.0 / 3.0)])
            .wait(1.0);
    }
    scene.wait(4.0).play(vec![Animation::fade_out(id)]);
    Ok(scene)
}
