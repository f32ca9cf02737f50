//! Shape geometry in local coordinates.
//!
//! Every [`Shape`] is described around its own origin in scene units; a
//! [`Figure`](crate::draw::Figure) places it in the scene. Shapes render to
//! SVG in local pixel coordinates (y flipped) and the figure wraps them in a
//! transform group.
//!
//! Draw progress ("reveal") is rendered with `pathLength="1"` and a dash
//! array, so a circle at reveal `0.25` shows a quarter of its outline.

use svg::node::element::{self as svg_element, path::Data};

use crate::{
    apply_stroke,
    curve::SmoothCurve,
    draw::{Graphic, SvgNode, Text, Viewport, stroke::Style},
    geometry::{Bounds, Point, Size},
};

/// Fill and stroke for a shape element, including draw progress.
macro_rules! apply_paint {
    ($element:expr, $style:expr, $opacity:expr, $reveal:expr) => {{
        let style: &Style = $style;
        let reveal: f32 = $reveal;
        let mut elem = match style.fill() {
            Some(fill) => $element
                .set("fill", fill.to_svg_value())
                .set("fill-opacity", fill.alpha() * $opacity * reveal),
            None => $element.set("fill", "none"),
        };
        if let Some(stroke) = style.stroke() {
            elem = apply_stroke!(elem, stroke, $opacity);
            if reveal < 1.0 {
                elem = elem
                    .set("pathLength", 1)
                    .set("stroke-dasharray", format!("{} 1", reveal.max(0.0)));
            }
        }
        elem
    }};
}

/// Which ends of an arrow carry a tip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArrowHeads {
    #[default]
    End,
    Both,
}

/// A straight or bent arrow between two local points.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowShape {
    start: Point,
    end: Point,
    /// Sideways bend as a fraction of the chord length; positive bends to the
    /// left of the travel direction.
    curvature: f32,
    heads: ArrowHeads,
    tip_length: f32,
}

impl ArrowShape {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            curvature: 0.0,
            heads: ArrowHeads::End,
            tip_length: 0.25,
        }
    }

    pub fn with_curvature(mut self, curvature: f32) -> Self {
        self.curvature = curvature;
        self
    }

    pub fn with_heads(mut self, heads: ArrowHeads) -> Self {
        self.heads = heads;
        self
    }

    pub fn with_tip_length(mut self, tip_length: f32) -> Self {
        self.tip_length = tip_length;
        self
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn curvature(&self) -> f32 {
        self.curvature
    }

    pub fn heads(&self) -> ArrowHeads {
        self.heads
    }

    /// Control point of the quadratic Bézier body.
    pub fn control(&self) -> Point {
        let chord = self.end.sub_point(self.start);
        self.start
            .midpoint(self.end)
            .add_point(chord.perpendicular().scale(self.curvature))
    }

    /// Point on the body at parameter `t`.
    pub fn point_at(&self, t: f32) -> Point {
        let a = self.start.lerp(self.control(), t);
        let b = self.control().lerp(self.end, t);
        a.lerp(b, t)
    }

    fn tip(&self, tip: Point, from: Point) -> [Point; 3] {
        let direction = tip.sub_point(from).normalize();
        let base = tip.sub_point(direction.scale(self.tip_length));
        let half_width = direction.perpendicular().scale(self.tip_length * 0.5);
        [tip, base.add_point(half_width), base.sub_point(half_width)]
    }

    /// Triangles of every tip, in local coordinates.
    pub fn tips(&self) -> Vec<[Point; 3]> {
        let control = self.control();
        let mut tips = vec![self.tip(self.end, control)];
        if self.heads == ArrowHeads::Both {
            tips.push(self.tip(self.start, control));
        }
        tips
    }

    fn lerp(&self, other: &ArrowShape, t: f32) -> Self {
        Self {
            start: self.start.lerp(other.start, t),
            end: self.end.lerp(other.end, t),
            curvature: t.mul_add(other.curvature - self.curvature, self.curvature),
            heads: if t < 0.5 { self.heads } else { other.heads },
            tip_length: t.mul_add(other.tip_length - self.tip_length, self.tip_length),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    Ellipse { width: f32, height: f32 },
    Polygon { vertices: Vec<Point> },
    Line { start: Point, end: Point },
    Arrow(ArrowShape),
    Curve(SmoothCurve),
    Label(Text),
    Graphic(Graphic),
}

impl Shape {
    pub fn circle(radius: f32) -> Self {
        Self::Circle { radius }
    }

    pub fn ellipse(width: f32, height: f32) -> Self {
        Self::Ellipse { width, height }
    }

    pub fn polygon(vertices: Vec<Point>) -> Self {
        Self::Polygon { vertices }
    }

    /// Axis-aligned rectangle centred on the origin.
    pub fn rectangle(width: f32, height: f32) -> Self {
        let (w, h) = (width / 2.0, height / 2.0);
        Self::polygon(vec![
            Point::new(-w, h),
            Point::new(w, h),
            Point::new(w, -h),
            Point::new(-w, -h),
        ])
    }

    /// Rectangle whose top edge is pushed right and bottom edge left by
    /// `skew` units.
    pub fn parallelogram(width: f32, height: f32, skew: f32) -> Self {
        let (w, h) = (width / 2.0, height / 2.0);
        Self::polygon(vec![
            Point::new(-w + skew, h),
            Point::new(w + skew, h),
            Point::new(w - skew, -h),
            Point::new(-w - skew, -h),
        ])
    }

    pub fn line(start: Point, end: Point) -> Self {
        Self::Line { start, end }
    }

    pub fn arrow(arrow: ArrowShape) -> Self {
        Self::Arrow(arrow)
    }

    /// Local bounding box.
    pub fn local_bounds(&self) -> Bounds {
        match self {
            Self::Circle { radius } => {
                Bounds::new_from_center(Point::default(), Size::new(radius * 2.0, radius * 2.0))
            }
            Self::Ellipse { width, height } => {
                Bounds::new_from_center(Point::default(), Size::new(*width, *height))
            }
            Self::Polygon { vertices } => Bounds::from_points(vertices).unwrap_or_default(),
            Self::Line { start, end } => Bounds::from_points(&[*start, *end]).unwrap_or_default(),
            Self::Arrow(arrow) => {
                let mut points = vec![arrow.start, arrow.end, arrow.point_at(0.5)];
                points.extend(arrow.tips().into_iter().flatten());
                Bounds::from_points(&points).unwrap_or_default()
            }
            Self::Curve(curve) => curve.bounds(),
            Self::Label(text) => Bounds::new_from_center(Point::default(), text.size()),
            Self::Graphic(graphic) => Bounds::new_from_center(Point::default(), graphic.size()),
        }
    }

    /// Endpoints of line-like shapes.
    pub fn endpoints(&self) -> Option<(Point, Point)> {
        match self {
            Self::Line { start, end } => Some((*start, *end)),
            Self::Arrow(arrow) => Some((arrow.start, arrow.end)),
            _ => None,
        }
    }

    /// Moves the endpoints of line-like shapes; other shapes are unchanged
    /// and `false` is returned.
    pub fn set_endpoints(&mut self, new_start: Point, new_end: Point) -> bool {
        match self {
            Self::Line { start, end } => {
                *start = new_start;
                *end = new_end;
                true
            }
            Self::Arrow(arrow) => {
                arrow.start = new_start;
                arrow.end = new_end;
                true
            }
            _ => false,
        }
    }

    /// Shape part way between `self` and `other`, or `None` when the two
    /// cannot be morphed point by point (different kinds, vertex counts or
    /// label contents).
    pub fn interpolate(&self, other: &Shape, t: f32) -> Option<Shape> {
        let mix = |a: f32, b: f32| t.mul_add(b - a, a);
        match (self, other) {
            (Self::Circle { radius: a }, Self::Circle { radius: b }) => {
                Some(Self::circle(mix(*a, *b)))
            }
            (Self::Circle { .. } | Self::Ellipse { .. }, Self::Circle { .. } | Self::Ellipse { .. }) => {
                let from = self.local_bounds();
                let to = other.local_bounds();
                Some(Self::ellipse(
                    mix(from.width(), to.width()),
                    mix(from.height(), to.height()),
                ))
            }
            (Self::Polygon { vertices: a }, Self::Polygon { vertices: b }) if a.len() == b.len() => {
                Some(Self::polygon(
                    a.iter().zip(b).map(|(p, q)| p.lerp(*q, t)).collect(),
                ))
            }
            (Self::Line { start: s1, end: e1 }, Self::Line { start: s2, end: e2 }) => {
                Some(Self::line(s1.lerp(*s2, t), e1.lerp(*e2, t)))
            }
            (Self::Arrow(a), Self::Arrow(b)) => Some(Self::Arrow(a.lerp(b, t))),
            (Self::Curve(a), Self::Curve(b)) if a.points().len() == b.points().len() => {
                let points = a
                    .points()
                    .iter()
                    .zip(b.points())
                    .map(|(p, q)| p.lerp(*q, t))
                    .collect();
                SmoothCurve::new(points).ok().map(Self::Curve)
            }
            (Self::Label(a), Self::Label(b)) => a.interpolate(b, t).map(Self::Label),
            (Self::Graphic(a), Self::Graphic(b)) if a.clone().with_height(b.height()) == *b => {
                Some(Self::Graphic(a.clone().with_height(mix(a.height(), b.height()))))
            }
            _ => None,
        }
    }

    /// Renders the shape around the local origin.
    pub(crate) fn render_local(
        &self,
        viewport: &Viewport,
        style: &Style,
        opacity: f32,
        reveal: f32,
    ) -> SvgNode {
        let px = |p: Point| viewport.to_local_pixels(p);
        match self {
            Self::Circle { radius } => {
                let circle = svg_element::Circle::new()
                    .set("cx", 0)
                    .set("cy", 0)
                    .set("r", viewport.scale_length(*radius));
                Box::new(apply_paint!(circle, style, opacity, reveal))
            }
            Self::Ellipse { width, height } => {
                let ellipse = svg_element::Ellipse::new()
                    .set("cx", 0)
                    .set("cy", 0)
                    .set("rx", viewport.scale_length(width / 2.0))
                    .set("ry", viewport.scale_length(height / 2.0));
                Box::new(apply_paint!(ellipse, style, opacity, reveal))
            }
            Self::Polygon { vertices } => {
                let points = vertices
                    .iter()
                    .map(|&v| {
                        let (x, y) = px(v);
                        format!("{x},{y}")
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                let polygon = svg_element::Polygon::new().set("points", points);
                Box::new(apply_paint!(polygon, style, opacity, reveal))
            }
            Self::Line { start, end } => {
                let (x1, y1) = px(*start);
                let (x2, y2) = px(*end);
                let line = svg_element::Line::new()
                    .set("x1", x1)
                    .set("y1", y1)
                    .set("x2", x2)
                    .set("y2", y2);
                Box::new(apply_paint!(line, &style.clone().without_fill(), opacity, reveal))
            }
            Self::Arrow(arrow) => render_arrow(arrow, viewport, style, opacity, reveal),
            Self::Curve(curve) => {
                let (sx, sy) = px(curve.start());
                let mut data = Data::new().move_to(vec![sx, sy]);
                for segment in curve.segments() {
                    let (c1x, c1y) = px(segment.control1);
                    let (c2x, c2y) = px(segment.control2);
                    let (ex, ey) = px(segment.end);
                    data = data.cubic_curve_to(vec![c1x, c1y, c2x, c2y, ex, ey]);
                }
                let path = svg_element::Path::new().set("d", data);
                Box::new(apply_paint!(path, &style.clone().without_fill(), opacity, reveal))
            }
            Self::Label(text) => Box::new(text.render_local(viewport, opacity, reveal)),
            Self::Graphic(graphic) => Box::new(graphic.render_local(viewport, opacity * reveal)),
        }
    }
}

fn render_arrow(
    arrow: &ArrowShape,
    viewport: &Viewport,
    style: &Style,
    opacity: f32,
    reveal: f32,
) -> SvgNode {
    let px = |p: Point| viewport.to_local_pixels(p);
    let (cx, cy) = px(arrow.control());
    let (ex, ey) = px(arrow.end);
    let (sx, sy) = px(arrow.start);
    let data = Data::new()
        .move_to(vec![sx, sy])
        .quadratic_curve_to(vec![cx, cy, ex, ey]);
    let body = svg_element::Path::new().set("d", data);
    let body = apply_paint!(body, &style.clone().without_fill(), opacity, reveal);

    let tip_color = style
        .stroke()
        .map(|stroke| stroke.color())
        .or(style.fill())
        .unwrap_or_default();
    let mut group = svg_element::Group::new().add(body);
    for tip in arrow.tips() {
        let points = tip
            .iter()
            .map(|&p| {
                let (x, y) = px(p);
                format!("{x},{y}")
            })
            .collect::<Vec<_>>()
            .join(" ");
        let triangle = svg_element::Polygon::new()
            .set("points", points)
            .set("fill", tip_color.to_svg_value())
            .set("fill-opacity", tip_color.alpha() * opacity * reveal);
        group = group.add(triangle);
    }
    Box::new(group)
}


#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::{
        color::palette,
        draw::{StrokeDefinition, TextDefinition},
    };

    #[test]
    fn test_parallelogram_bounds_include_skew() {
        let shape = Shape::parallelogram(1.2, 0.6, 0.2);
        let bounds = shape.local_bounds();
        assert_approx_eq!(f32, bounds.width(), 1.6);
        assert_approx_eq!(f32, bounds.height(), 0.6);
    }

    #[test]
    fn test_arrow_control_bends_left() {
        let arrow = ArrowShape::new(Point::new(0.0, 0.0), Point::new(2.0, 0.0)).with_curvature(0.5);
        let control = arrow.control();
        assert_approx_eq!(f32, control.x(), 1.0);
        assert_approx_eq!(f32, control.y(), 1.0);
        assert_eq!(arrow.tips().len(), 1);
        assert_eq!(arrow.with_heads(ArrowHeads::Both).tips().len(), 2);
    }

    #[test]
    fn test_arrow_tip_points_along_travel() {
        let arrow = ArrowShape::new(Point::new(0.0, 0.0), Point::new(0.0, -2.0)).with_tip_length(0.2);
        let [tip, left, right] = arrow.tips()[0];
        assert_eq!(tip, Point::new(0.0, -2.0));
        assert_approx_eq!(f32, left.y(), -1.8, epsilon = 1e-5);
        assert_approx_eq!(f32, right.y(), -1.8, epsilon = 1e-5);
    }

    #[test]
    fn test_interpolate_circle_to_ellipse() {
        let from = Shape::circle(0.5);
        let to = Shape::ellipse(2.0, 1.0);
        let Some(Shape::Ellipse { width, height }) = from.interpolate(&to, 0.5) else {
            panic!("expected an ellipse");
        };
        assert_approx_eq!(f32, width, 1.5);
        assert_approx_eq!(f32, height, 1.0);
    }

    #[test]
    fn test_interpolate_incompatible_shapes() {
        let triangle = Shape::polygon(vec![
            Point::new(0.0, 1.0),
            Point::new(1.0, 0.0),
            Point::new(-1.0, 0.0),
        ]);
        assert!(triangle.interpolate(&Shape::rectangle(1.0, 1.0), 0.5).is_none());
        assert!(triangle.interpolate(&Shape::circle(1.0), 0.5).is_none());

        let a = Shape::Label(Text::new(TextDefinition::new(), "A"));
        let b = Shape::Label(Text::new(TextDefinition::new(), "B"));
        assert!(a.interpolate(&b, 0.3).is_none());
    }

    #[test]
    fn test_set_endpoints() {
        let mut line = Shape::line(Point::default(), Point::new(1.0, 0.0));
        assert!(line.set_endpoints(Point::new(-1.0, 0.0), Point::new(2.0, 0.0)));
        assert_eq!(
            line.endpoints(),
            Some((Point::new(-1.0, 0.0), Point::new(2.0, 0.0)))
        );
        assert!(!Shape::circle(1.0).set_endpoints(Point::default(), Point::default()));
    }

    #[test]
    fn test_render_reveal_uses_path_length() {
        let style = Style::stroked(StrokeDefinition::new(palette::blue(), 2.0));
        let viewport = Viewport::default();
        let partial = svg::Document::new()
            .add(Shape::circle(1.0).render_local(&viewport, &style, 1.0, 0.25))
            .to_string();
        assert!(partial.contains("pathLength=\"1\""));
        assert!(partial.contains("stroke-dasharray=\"0.25 1\""));

        let full = svg::Document::new()
            .add(Shape::circle(1.0).render_local(&viewport, &style, 1.0, 1.0))
            .to_string();
        assert!(!full.contains("pathLength"));
        assert!(full.contains("r=\"90\""));
    }

    #[test]
    fn test_render_polygon_flips_y() {
        let style = Style::filled(palette::grey());
        let shape = Shape::polygon(vec![
            Point::new(0.0, 1.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 0.0),
        ]);
        let markup = svg::Document::new()
            .add(shape.render_local(&Viewport::default(), &style, 1.0, 1.0))
            .to_string();
        assert!(markup.contains("points=\"0,-90 90,0 0,0\""));
        assert!(markup.contains("fill=\"#888888\""));
    }
}
