//! Text-only closing scenes.

use tableau_core::{color::palette, draw::Drawable, geometry::Point, identifier::Id};

use super::{centered_at, text};
use crate::{
    config::AppConfig,
    layout::{Direction, arrange, next_to, to_edge},
    timeline::{Animation, Easing, Scene},
};

const QUOTE: [&str; 2] = ["\"A discovery is said to be an accident", "meeting a prepared mind\""];
const AUTHOR: &str = "- Albert Szent-Györgyi";

/// Reference lines; an empty line adds a paragraph gap.
const REFERENCES: [&str; 12] = [
    "Huang, L. R., Cox, E. C., Austin, R. H., & Sturm, J. C. (2004). Continuous particle separation",
    "through deterministic lateral displacement. Science (New York, N.Y.), 304(5673), 987–990.",
    "https://doi.org/10.1126/science.1094567",
    "",
    "Hochstetter, A., Vernekar, R., Austin, R. H., Becker, H., Beech, J. P., Fedosov, D. A., ... & Inglis, D. W. (2020).",
    "Deterministic lateral displacement: Challenges and perspectives. ACS nano, 14(9), 10784-10795.",
    "",
    "Timm Krüger – Lattice Boltzmann Computational Fluid Dynamics (CFD) Model, YouTube (2015)",
    "",
    "Lotto Maniac – Stake Plinko, YouTube (2024)",
    "",
    "NIH Bioart",
];
const LINE_STEP: f32 = 0.35;
const PARAGRAPH_GAP: f32 = 0.3;

pub(super) fn quote() -> Scene {
    let mut scene = Scene::new("quote");
    let lines: Vec<_> = QUOTE.iter().map(|line| text(line, 36.0, palette::gold_b())).collect();
    let sizes: Vec<_> = lines.iter().map(|line| line.bounds().to_size()).collect();
    let offsets = arrange(&sizes, Direction::Down, 0.3);

    let mut figures: Vec<(Id, _)> = lines
        .into_iter()
        .zip(offsets)
        .enumerate()
        .map(|(index, (line, at))| (Id::indexed("quote", &[index]), centered_at(line, at)))
        .collect();
    let block = figures
        .iter()
        .map(|(_, figure)| figure.bounds())
        .reduce(|acc, bounds| acc.merge(&bounds))
        .unwrap_or_default();
    let author = text(AUTHOR, 20.0, palette::gold_a());
    let author_at = next_to(block, author.bounds().to_size(), Direction::Down, 0.7);
    figures.push((Id::new("author"), centered_at(author, author_at)));

    let ids: Vec<Id> = figures.iter().map(|(id, _)| *id).collect();
    scene
        .play(
            figures
                .into_iter()
                .map(|(id, figure)| Animation::fade_in(id, figure))
                .collect(),
        )
        .wait(3.0)
        .play(ids.into_iter().map(Animation::fade_out).collect())
        .wait(1.0);
    scene
}

pub(super) fn credits(config: &AppConfig) -> Scene {
    let frame = config.render().viewport().frame_bounds();
    let mut scene = Scene::new("credits");

    let title_id = Id::new("title");
    let title = text("Special Thanks!", 36.0, palette::white());
    let title = centered_at(title.clone(), to_edge(frame, title.bounds(), Direction::Up, 1.0).with_x(0.0));

    let mut cursor = title.bounds().bottom() - 0.7;
    let mut references = Vec::new();
    for line in REFERENCES {
        if line.is_empty() {
            cursor -= PARAGRAPH_GAP;
            continue;
        }
        let id = Id::indexed("reference", &[references.len()]);
        references.push((id, centered_at(text(line, 18.0, palette::grey()), Point::new(0.0, cursor))));
        cursor -= LINE_STEP;
    }

    let leaving: Vec<Animation> = std::iter::once(title_id)
        .chain(references.iter().map(|(id, _)| *id))
        .map(Animation::fade_out)
        .collect();
    scene
        .play(vec![Animation::fade_in(title_id, title)])
        .play_with(
            references
                .into_iter()
                .map(|(id, figure)| Animation::fade_in(id, figure))
                .collect(),
            1.5,
            Easing::Smooth,
        )
        .wait(2.0)
        .play_with(leaving, 2.0, Easing::Smooth)
        .wait(1.0);
    scene
}
