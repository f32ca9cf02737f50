use log::debug;
use rand::Rng;

use tableau_core::{
    color::{Color, palette},
    draw::{Figure, RenderLayer, Shape, Style},
};

use super::FlowPath;

/// Particle looks, in the order particles are added to a streamline.
const PARTICLE_LOOKS: [(fn() -> Color, f32); 3] = [
    (palette::red, 0.08),
    (palette::yellow, 0.06),
    (palette::green, 0.04),
];

/// A small dot riding exactly one flow path.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    path: usize,
    color: Color,
    radius: f32,
}

impl Particle {
    pub fn new(path: usize, color: Color, radius: f32) -> Self {
        Self {
            path,
            color,
            radius,
        }
    }

    /// Index of the path this particle rides.
    pub fn path(&self) -> usize {
        self.path
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Filled dot waiting at the start of `path`.
    pub fn figure(&self, path: &FlowPath) -> Figure {
        Figure::new(Shape::circle(self.radius))
            .with_style(Style::filled(self.color))
            .with_position(path.start())
            .with_layer(RenderLayer::Particle)
    }
}

/// Seeds one to three particles on every streamline.
///
/// The count per streamline is drawn from `rng`; looks follow a fixed
/// table, so the first particle on a line is always the largest.
pub fn seed_particles<R: Rng>(streamlines: &[FlowPath], rng: &mut R) -> Vec<Particle> {
    let particles: Vec<Particle> = (0..streamlines.len())
        .flat_map(|path| {
            let count = rng.random_range(1..=PARTICLE_LOOKS.len());
            PARTICLE_LOOKS[..count]
                .iter()
                .map(move |(color, radius)| Particle::new(path, color(), *radius))
                .collect::<Vec<_>>()
        })
        .collect();
    debug!(streamlines = streamlines.len(), particles = particles.len(); "Seeded particles");
    particles
}
