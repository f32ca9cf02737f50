//! Placed, styled shapes.
//!
//! A [`Figure`] is what a scene owns: a [`Shape`] in local coordinates plus
//! its [`Placement`], paint, opacity, draw progress and render layer.
//! Animations produce new figure states through [`Figure::interpolate`].

use svg::node::element as svg_element;

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, Shape, StrokeDefinition, Style, Viewport},
    geometry::{Bounds, Placement, Point},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    shape: Shape,
    placement: Placement,
    style: Style,
    opacity: f32,
    reveal: f32,
    layer: RenderLayer,
    /// Incoming figure while crossfading between shapes that cannot morph.
    blend: Option<Box<Figure>>,
}

impl Figure {
    /// A figure at the origin with a white outline.
    ///
    /// ```
    /// # use tableau_core::{draw::{Drawable, Figure, Shape}, geometry::Point};
    /// let pillar = Figure::new(Shape::circle(0.3)).with_position(Point::new(1.0, 2.0));
    /// assert_eq!(pillar.position(), Point::new(1.0, 2.0));
    /// assert!((pillar.bounds().width() - 0.6).abs() < 1e-6);
    /// ```
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            placement: Placement::default(),
            style: Style::stroked(StrokeDefinition::default()),
            opacity: 1.0,
            reveal: 1.0,
            layer: RenderLayer::default(),
            blend: None,
        }
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.placement.set_position(position);
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.placement.set_scale(scale);
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.placement.set_rotation(rotation);
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_reveal(mut self, reveal: f32) -> Self {
        self.reveal = reveal;
        self
    }

    pub fn with_layer(mut self, layer: RenderLayer) -> Self {
        self.layer = layer;
        self
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn position(&self) -> Point {
        self.placement.position()
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn reveal(&self) -> f32 {
        self.reveal
    }

    pub fn layer(&self) -> RenderLayer {
        self.layer
    }

    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
    }

    pub fn set_placement(&mut self, placement: Placement) {
        self.placement = placement;
    }

    pub fn set_position(&mut self, position: Point) {
        self.placement.set_position(position);
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn set_reveal(&mut self, reveal: f32) {
        self.reveal = reveal.clamp(0.0, 1.0);
    }

    pub fn shift(&mut self, offset: Point) {
        let position = self.position().add_point(offset);
        self.placement.set_position(position);
    }

    /// Paints stroke, fill and label text with `color`.
    pub fn recolor(&mut self, color: Color) {
        self.style = self.style.recolored(color);
        if let Shape::Label(text) = &mut self.shape {
            text.definition_mut().set_color(color);
        }
    }

    /// Local point mapped into the scene.
    pub fn to_world(&self, local: Point) -> Point {
        self.placement.apply(local)
    }

    /// Scene-space endpoints of a line or arrow.
    pub fn world_endpoints(&self) -> Option<(Point, Point)> {
        self.shape
            .endpoints()
            .map(|(start, end)| (self.to_world(start), self.to_world(end)))
    }

    /// Stretches a line or arrow between two scene points. The placement is
    /// reset to sit at their midpoint. Other shapes are centred on the
    /// midpoint instead.
    pub fn span(&mut self, start: Point, end: Point) {
        let middle = start.midpoint(end);
        if self.shape.endpoints().is_some() {
            self.placement = Placement::new(middle);
            self.shape
                .set_endpoints(start.sub_point(middle), end.sub_point(middle));
        } else {
            self.placement.set_position(middle);
        }
    }

    /// Figure part way to `other`.
    ///
    /// Placement, paint, opacity and draw progress blend linearly. Shapes that
    /// can morph are interpolated; otherwise `self` fades out while `other`
    /// fades in on top of it.
    pub fn interpolate(&self, other: &Figure, t: f32) -> Figure {
        if t <= 0.0 {
            return self.clone();
        }
        if t >= 1.0 {
            return other.clone();
        }

        let placement = self.placement.lerp(&other.placement, t);
        let mix = |a: f32, b: f32| t.mul_add(b - a, a);
        let layer = if t < 0.5 { self.layer } else { other.layer };

        match self.shape.interpolate(&other.shape, t) {
            Some(shape) => Figure {
                shape,
                placement,
                style: self.style.lerp(&other.style, t),
                opacity: mix(self.opacity, other.opacity),
                reveal: mix(self.reveal, other.reveal),
                layer,
                blend: None,
            },
            None => {
                let mut incoming = other.clone();
                incoming.placement = placement;
                incoming.opacity = other.opacity * t;
                incoming.blend = None;

                let mut outgoing = self.clone();
                outgoing.placement = placement;
                outgoing.opacity = self.opacity * (1.0 - t);
                outgoing.layer = layer;
                outgoing.blend = Some(Box::new(incoming));
                outgoing
            }
        }
    }

    fn transform(&self, viewport: &Viewport) -> String {
        let (x, y) = viewport.to_pixels(self.placement.position());
        let degrees = -self.placement.rotation().to_degrees() + 0.0;
        let scale = self.placement.scale();
        format!("translate({x} {y}) rotate({degrees}) scale({scale})")
    }
}

impl Drawable for Figure {
    fn render_to_layers(&self, viewport: &Viewport) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        if self.opacity > 0.0 && self.reveal > 0.0 {
            let node = self
                .shape
                .render_local(viewport, &self.style, self.opacity, self.reveal);
            let group = svg_element::Group::new()
                .set("transform", self.transform(viewport))
                .add(node);
            output.add_to_layer(self.layer, Box::new(group));
        }
        if let Some(blend) = &self.blend {
            output.merge(blend.render_to_layers(viewport));
        }
        output
    }

    /// Scene-space bounds of the transformed local bounds.
    fn bounds(&self) -> Bounds {
        let local = self.shape.local_bounds();
        let corners = [
            Point::new(local.min_x(), local.min_y()),
            Point::new(local.max_x(), local.min_y()),
            Point::new(local.max_x(), local.max_y()),
            Point::new(local.min_x(), local.max_y()),
        ]
        .map(|corner| self.placement.apply(corner));
        Bounds::from_points(&corners).unwrap_or_default()
    }
}
