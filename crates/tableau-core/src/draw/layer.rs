//! Z-ordered collection of rendered SVG nodes.
//!
//! Figures push their nodes onto a [`RenderLayer`]; the frame writer emits
//! one `<g data-layer="...">` per non-empty layer, bottom to top. Within a
//! layer nodes keep their insertion order, which is the order figures were
//! added to the scene.
//!
//! ```
//! # use tableau_core::draw::{LayeredOutput, RenderLayer};
//! # use svg::node::element::Circle;
//! let mut output = LayeredOutput::new();
//! output.add_to_layer(RenderLayer::Particle, Box::new(Circle::new()));
//! output.add_to_layer(RenderLayer::Structure, Box::new(Circle::new()));
//!
//! // Pillars (structure) render underneath the particles.
//! assert_eq!(output.render().len(), 2);
//! ```

use svg::node::element as svg_element;

pub type SvgNode = Box<dyn svg::Node>;

/// Rendering layers, bottom first. `Ord` follows declaration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    Background,
    /// Static device geometry: pillars, walls, graph nodes
    #[default]
    Structure,
    /// Streamlines and lanes
    Flow,
    /// Moving particles and cells
    Particle,
    /// Indicators, arrows, brackets and highlight boxes
    Annotation,
    Text,
}

impl RenderLayer {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Structure => "structure",
            Self::Flow => "flow",
            Self::Particle => "particle",
            Self::Annotation => "annotation",
            Self::Text => "text",
        }
    }
}

#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, SvgNode)>,
}

impl LayeredOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.items.push((layer, node));
    }

    /// Appends every node of `other`, keeping its order.
    pub fn merge(&mut self, other: LayeredOutput) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Consumes the output and groups nodes per layer in z-order. Empty
    /// layers produce no group.
    pub fn render(mut self) -> Vec<SvgNode> {
        // Stable, so insertion order survives inside each layer.
        self.items.sort_by_key(|(layer, _)| *layer);

        let mut result = Vec::new();
        let mut current: Option<(RenderLayer, svg_element::Group)> = None;
        for (layer, node) in self.items {
            current = match current {
                Some((open, group)) if open == layer => Some((open, group.add(node))),
                previous => {
                    if let Some((_, group)) = previous {
                        result.push(Box::new(group) as SvgNode);
                    }
                    let group = svg_element::Group::new()
                        .set("data-layer", layer.name())
                        .add(node);
                    Some((layer, group))
                }
            };
        }
        if let Some((_, group)) = current {
            result.push(Box::new(group) as SvgNode);
        }

        result
    }
}
