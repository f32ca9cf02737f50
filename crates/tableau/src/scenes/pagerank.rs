//! PageRank on a five-page link graph.
//!
//! The numeric side ([`link_graph`], [`adjacency_matrix`],
//! [`transition_matrix`], [`stationary_distribution`]) is public so the
//! matrices shown on screen can be checked independently of any drawing.
//! Matrices are column-oriented: entry `[i][j]` describes a move from page
//! `j` to page `i`.

use std::f32::consts::TAU;

use log::debug;
use petgraph::{
    Direction as EdgeDirection,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use tableau_core::{
    color::palette,
    draw::{ArrowShape, Drawable, Figure, RenderLayer, Shape, StrokeDefinition, Style},
    geometry::{Bounds, Point},
    identifier::Id,
};

use super::{arrow, centered_at, math, text, union};
use crate::{
    TableauError,
    config::AppConfig,
    layout::{Direction, matrix_cells, next_to, regular_polygon, to_edge},
    timeline::{Animation, Change, Easing, Scene},
};

/// Links of the example graph as `(from, to)` page indices.
pub const LINKS: [(usize, usize); 9] = [
    (0, 1),
    (0, 3),
    (1, 0),
    (1, 4),
    (2, 3),
    (3, 2),
    (3, 4),
    (4, 0),
    (4, 3),
];
pub const PAGES: usize = 5;
/// Probability that the random surfer jumps to a random page.
pub const TELEPORT: f64 = 0.25;

const RING_RADIUS: f32 = 2.4;
const NODE_RADIUS: f32 = 0.5;
/// Links bow like a quarter-circle arc.
const LINK_ARC: f32 = TAU / 4.0;
const DEMO_LINKS: [(usize, usize); 3] = [(0, 1), (1, 0), (3, 2)];
const GRAPH_CORNER: Point = Point::new(-5.0, 2.0);

/// The example graph; node weights are page indices.
pub fn link_graph() -> DiGraph<usize, ()> {
    let mut graph = DiGraph::new();
    let nodes: Vec<NodeIndex> = (0..PAGES).map(|page| graph.add_node(page)).collect();
    for (from, to) in LINKS {
        graph.add_edge(nodes[from], nodes[to], ());
    }
    graph
}

/// `1` at `[to][from]` for every link.
pub fn adjacency_matrix<N, E>(graph: &DiGraph<N, E>) -> Vec<Vec<u8>> {
    let n = graph.node_count();
    let mut matrix = vec![vec![0; n]; n];
    for edge in graph.edge_references() {
        matrix[edge.target().index()][edge.source().index()] = 1;
    }
    matrix
}

/// Column-stochastic transition matrix of a random surfer who follows an
/// outgoing link with probability `1 - teleport` and otherwise jumps to any
/// page. Pages without outgoing links always jump.
///
/// # Errors
///
/// Returns [`TableauError::Configuration`] for an empty graph or a teleport
/// probability outside `[0, 1]`.
///
/// ```
/// # use tableau::scenes::pagerank::{TELEPORT, link_graph, transition_matrix};
/// let matrix = transition_matrix(&link_graph(), TELEPORT).unwrap();
/// // Page 1 links to pages 2 and 4.
/// assert!((matrix[1][0] - (0.375 + 0.05)).abs() < 1e-12);
/// assert!((matrix[2][0] - 0.05).abs() < 1e-12);
/// ```
pub fn transition_matrix<N, E>(graph: &DiGraph<N, E>, teleport: f64) -> Result<Vec<Vec<f64>>, TableauError> {
    let n = graph.node_count();
    if n == 0 {
        return Err(TableauError::configuration("the link graph has no pages"));
    }
    if !(0.0..=1.0).contains(&teleport) {
        return Err(TableauError::configuration(format!(
            "teleport probability must lie in [0, 1], got {teleport}"
        )));
    }

    let uniform = 1.0 / n as f64;
    let mut matrix = vec![vec![teleport * uniform; n]; n];
    for node in graph.node_indices() {
        let from = node.index();
        let outgoing = graph.edges_directed(node, EdgeDirection::Outgoing).count();
        if outgoing == 0 {
            for row in &mut matrix {
                row[from] = uniform;
            }
            continue;
        }
        let follow = (1.0 - teleport) / outgoing as f64;
        for edge in graph.edges_directed(node, EdgeDirection::Outgoing) {
            matrix[edge.target().index()][from] += follow;
        }
    }
    Ok(matrix)
}

/// Stationary vector of a column-stochastic matrix by power iteration from
/// the uniform distribution. Iteration stops once successive vectors differ
/// by less than `tolerance` in L1 norm.
///
/// # Errors
///
/// Returns [`TableauError::Configuration`] for a non-square matrix and when
/// the iteration has not converged after `max_iterations` steps.
pub fn stationary_distribution(
    matrix: &[Vec<f64>],
    tolerance: f64,
    max_iterations: usize,
) -> Result<Vec<f64>, TableauError> {
    let n = matrix.len();
    if n == 0 || matrix.iter().any(|row| row.len() != n) {
        return Err(TableauError::configuration("transition matrix must be square and non-empty"));
    }

    let mut ranks = vec![1.0 / n as f64; n];
    for iteration in 1..=max_iterations {
        let next: Vec<f64> = matrix
            .iter()
            .map(|row| row.iter().zip(&ranks).map(|(p, r)| p * r).sum())
            .collect();
        let change: f64 = next.iter().zip(&ranks).map(|(a, b)| (a - b).abs()).sum();
        ranks = next;
        if change < tolerance {
            debug!(iterations = iteration, change; "Power iteration converged");
            return Ok(ranks);
        }
    }
    Err(TableauError::configuration(format!(
        "power iteration did not converge within {max_iterations} steps"
    )))
}

/// Nodes with their labels, then links.
struct GraphFigures {
    links: Vec<Id>,
    figures: Vec<(Id, Figure)>,
}

impl GraphFigures {
    fn new(graph: &DiGraph<usize, ()>) -> Self {
        let centers = regular_polygon(graph.node_count(), RING_RADIUS, 0.0);
        let mut figures = Vec::new();
        for node in graph.node_indices() {
            let center = centers[node.index()];
            let id = Id::indexed("node", &[node.index()]);
            let circle = Figure::new(Shape::circle(NODE_RADIUS))
                .with_style(Style::stroked(StrokeDefinition::new(palette::blue(), 3.0)))
                .with_position(center);
            let label = centered_at(text(&(graph[node] + 1).to_string(), 34.0, palette::white()), center);
            figures.push((id, circle));
            figures.push((id.child("label"), label));
        }

        // Quadratic bow matching a circular arc: control offset tan(θ/4) of
        // the chord, bending right of the travel direction.
        let curvature = -(LINK_ARC / 4.0).tan();
        let mut links = Vec::new();
        for edge in graph.edge_references() {
            let start = centers[edge.source().index()];
            let end = centers[edge.target().index()];
            let direction = end.sub_point(start).normalize();
            let shape = ArrowShape::new(
                start.add_point(direction.scale(NODE_RADIUS)),
                end.sub_point(direction.scale(NODE_RADIUS)),
            )
            .with_curvature(curvature);
            let id = Id::indexed("link", &[edge.source().index(), edge.target().index()]);
            figures.push((id, arrow(shape, palette::white())));
            links.push(id);
        }

        Self { links, figures }
    }

    fn ids(&self) -> Vec<Id> {
        self.figures.iter().map(|(id, _)| *id).collect()
    }

    /// Figures as they look after [`Animation::reframe`] by `factor` onto
    /// `center`.
    fn reframed(&self, factor: f32, center: Point) -> Vec<(Id, Figure)> {
        let refs: Vec<&Figure> = self.figures.iter().map(|(_, figure)| figure).collect();
        let pivot = union(&refs).center();
        self.figures
            .iter()
            .map(|(id, figure)| {
                let offset = figure.position().sub_point(pivot).scale(factor);
                let placed = figure
                    .clone()
                    .with_position(center.add_point(offset))
                    .with_scale(figure.placement().scale() * factor);
                (*id, placed)
            })
            .collect()
    }
}

/// Entry texts and brackets of a matrix display centered on the origin.
/// Entry ids are `<prefix>/entry_<row>_<column>`.
fn matrix_display(prefix: Id, entries: &[Vec<String>], points: f32, scale: f32) -> Vec<(Id, Figure)> {
    let columns = entries.first().map_or(0, Vec::len);
    let cells = matrix_cells(entries.len(), columns, 1.5 * scale, 1.0 * scale);
    let mut figures = Vec::new();
    for (row, (values, centers)) in entries.iter().zip(&cells).enumerate() {
        for (column, (value, center)) in values.iter().zip(centers).enumerate() {
            figures.push((
                prefix.child(&format!("entry_{row}_{column}")),
                centered_at(text(value, points, palette::white()), *center),
            ));
        }
    }

    let refs: Vec<&Figure> = figures.iter().map(|(_, figure)| figure).collect();
    let block = union(&refs).expand(0.2);
    let serif = 0.15;
    let (top, bottom) = (block.top(), block.bottom());
    for (side, (x, inward)) in [(block.left(), serif), (block.right(), -serif)].into_iter().enumerate() {
        let pieces = [
            (Point::new(x, top), Point::new(x, bottom)),
            (Point::new(x, top), Point::new(x + inward, top)),
            (Point::new(x, bottom), Point::new(x + inward, bottom)),
        ];
        for (piece, (start, end)) in pieces.into_iter().enumerate() {
            let line = Figure::new(Shape::line(start, end))
                .with_style(Style::stroked(StrokeDefinition::new(palette::white(), 2.0)))
                .with_layer(RenderLayer::Annotation);
            figures.push((prefix.child(&format!("bracket_{side}_{piece}")), line));
        }
    }
    figures
}

fn find(figures: &[(Id, Figure)], id: Id) -> Option<&Figure> {
    figures.iter().find(|(candidate, _)| *candidate == id).map(|(_, figure)| figure)
}

fn shift_all(figures: &mut [(Id, Figure)], offset: Point) {
    for (_, figure) in figures {
        figure.shift(offset);
    }
}

fn bounds_of(figures: &[(Id, Figure)]) -> Bounds {
    let refs: Vec<&Figure> = figures.iter().map(|(_, figure)| figure).collect();
    union(&refs)
}

fn entrances(figures: &[(Id, Figure)]) -> Vec<Animation> {
    figures
        .iter()
        .map(|(id, figure)| Animation::create(*id, figure.clone()))
        .collect()
}

/// The graph, its adjacency matrix with highlighted links, and the
/// transition matrix with teleport probability.
pub(super) fn build(config: &AppConfig) -> Result<Scene, TableauError> {
    let frame = config.render().viewport().frame_bounds();
    let graph = link_graph();
    let drawn = GraphFigures::new(&graph);
    let mut scene = Scene::new("pagerank");

    let (ring, links): (Vec<_>, Vec<_>) = drawn
        .figures
        .iter()
        .cloned()
        .partition(|(id, _)| !drawn.links.contains(id));
    scene
        .play(entrances(&ring))
        .wait(1.0)
        .play(entrances(&links))
        .wait(4.0)
        .play(vec![Animation::reframe(drawn.ids(), 0.5, GRAPH_CORNER)])
        .wait(1.0);

    // A copy drawn over the shrunken graph turns into the adjacency matrix.
    let copy: Vec<(Id, Figure)> = drawn
        .reframed(0.5, GRAPH_CORNER)
        .into_iter()
        .map(|(id, figure)| (id.child("copy"), figure))
        .collect();
    scene.play(entrances(&copy)).wait(2.0);

    let adjacency = adjacency_matrix(&graph);
    let values: Vec<Vec<String>> = adjacency
        .iter()
        .map(|row| row.iter().map(u8::to_string).collect())
        .collect();
    let matrix_id = Id::new("adjacency");
    let mut matrix = matrix_display(matrix_id, &values, 36.0, 0.75);
    let mut headers = matrix_headers(matrix_id, &matrix);
    let mut group = matrix.clone();
    group.extend(headers.iter().cloned());
    let offset = Point::new(-0.2, -0.3).sub_point(bounds_of(&group).center());
    shift_all(&mut matrix, offset);
    shift_all(&mut headers, offset);

    let title_id = Id::new("adjacency_title");
    let title = text("Adjacency Matrix", 38.0, palette::white());
    let title = centered_at(title.clone(), to_edge(frame, title.bounds(), Direction::Up, 0.5));
    scene
        .play(vec![
            Animation::fade_in(title_id, title),
            Animation::replacement_transform(
                copy.iter().map(|(id, _)| *id).collect(),
                matrix.clone(),
            ),
        ])
        .play(entrances(&headers))
        .wait(4.0);

    play_highlights(&mut scene, frame, &drawn, &matrix)?;

    let explanation_id = Id::new("adjacency_explanation");
    let explanation = centered_at(
        math("Aᵢⱼ = 1 if there is a link from node j to node i, 0 otherwise", 24.0),
        Point::new(0.0, -3.3),
    );
    scene
        .play(vec![Animation::create(explanation_id, explanation)])
        .wait(2.0);

    // Transition matrix grows out of the shrunken graph.
    let transition = transition_matrix(&graph, TELEPORT)?;
    let values: Vec<Vec<String>> = transition
        .iter()
        .map(|row| row.iter().map(|p| format!("{p:.2}")).collect())
        .collect();
    let transition_figures = matrix_display(Id::new("transition"), &values, 29.0, 0.6);
    let heading_id = Id::new("transition_title");
    let heading = text("Transition Matrix with Teleport Probability", 34.0, palette::white());
    let heading = centered_at(heading.clone(), to_edge(frame, heading.bounds(), Direction::Up, 0.5));

    let mut swap: Vec<Animation> = [title_id, explanation_id]
        .into_iter()
        .chain(matrix.iter().map(|(id, _)| *id))
        .chain(headers.iter().map(|(id, _)| *id))
        .map(Animation::fade_out)
        .collect();
    swap.push(Animation::fade_in(heading_id, heading));
    swap.extend(
        transition_figures
            .iter()
            .map(|(id, figure)| Animation::grow_from(*id, figure.clone(), GRAPH_CORNER)),
    );
    let rule = text(
        "P(j|i) = 0.75 × (1/outlinks_from_i) + 0.25 × (1/N)",
        24.0,
        palette::white(),
    );
    let rule = centered_at(rule.clone(), to_edge(frame, rule.bounds(), Direction::Down, 1.0));
    scene
        .play(swap)
        .play(vec![Animation::create(Id::new("transition_rule"), rule)])
        .wait(2.0);
    Ok(scene)
}

/// Row and column numbers plus the "To" and "From" headings.
fn matrix_headers(prefix: Id, matrix: &[(Id, Figure)]) -> Vec<(Id, Figure)> {
    let mut headers = Vec::new();
    let entry = |row: usize, column: usize| {
        find(matrix, prefix.child(&format!("entry_{row}_{column}")))
            .map(Drawable::bounds)
            .unwrap_or_default()
    };
    let block = bounds_of(matrix);

    for index in 0..PAGES {
        let label = text(&(index + 1).to_string(), 20.0, palette::white());
        let size = label.bounds().to_size();
        let row = entry(index, 0);
        let row_at = Point::new(block.left() - 0.5 - size.width() / 2.0, row.center().y());
        headers.push((prefix.child(&format!("row_{index}")), centered_at(label.clone(), row_at)));

        let column = entry(0, index);
        let column_at = Point::new(column.center().x(), block.top() + 0.5 + size.height() / 2.0);
        headers.push((prefix.child(&format!("column_{index}")), centered_at(label, column_at)));
    }

    let labels = bounds_of(&headers);
    let to = text("To", 24.0, palette::white());
    let to_at = next_to(labels, to.bounds().to_size(), Direction::Left, 0.5).with_y(block.center().y());
    let from = text("From", 24.0, palette::white());
    let from_at = next_to(labels, from.bounds().to_size(), Direction::Up, 0.5).with_x(block.center().x());
    headers.push((prefix.child("to"), centered_at(to, to_at)));
    headers.push((prefix.child("from"), centered_at(from, from_at)));
    headers
}

/// Walks through a few links: the arrow turns yellow while its matrix entry
/// is circled and spelled out.
fn play_highlights(
    scene: &mut Scene,
    frame: Bounds,
    drawn: &GraphFigures,
    matrix: &[(Id, Figure)],
) -> Result<(), TableauError> {
    let matrix_id = Id::new("adjacency");
    let mut shown: Option<(Id, Id)> = None;

    for (index, (from, to)) in DEMO_LINKS.into_iter().enumerate() {
        let link = Id::indexed("link", &[from, to]);
        if !drawn.links.contains(&link) {
            return Err(TableauError::configuration(format!(
                "highlighted link {from} -> {to} is not in the graph"
            )));
        }
        let mut changes: Vec<Change> = drawn
            .links
            .iter()
            .map(|id| Change::Recolor(*id, palette::white()))
            .collect();
        changes.push(Change::Recolor(link, palette::yellow()));
        scene.apply(changes);

        let entry = find(matrix, matrix_id.child(&format!("entry_{to}_{from}")))
            .map(|figure| figure.bounds().center())
            .unwrap_or_default();
        let ring = Figure::new(Shape::circle(0.3))
            .with_style(Style::stroked(StrokeDefinition::new(palette::yellow(), 3.0)))
            .with_position(entry)
            .with_layer(RenderLayer::Annotation);
        let caption = text(
            &format!("Node {} ← Node {} = 1", to + 1, from + 1),
            20.0,
            palette::yellow(),
        );
        let caption = centered_at(
            caption.clone(),
            to_edge(frame, caption.bounds(), Direction::Down, 0.5).with_x(0.0),
        );

        let ring_id = Id::indexed("highlight", &[index]);
        let caption_id = ring_id.child("caption");
        match shown {
            None => scene.play(vec![
                Animation::create(ring_id, ring),
                Animation::create(caption_id, caption),
            ]),
            Some((previous_ring, previous_caption)) => scene.play(vec![Animation::replacement_transform(
                vec![previous_ring, previous_caption],
                vec![(ring_id, ring), (caption_id, caption)],
            )]),
        };
        scene.wait(2.0);
        shown = Some((ring_id, caption_id));
    }

    if let Some((ring_id, caption_id)) = shown {
        scene.play(vec![Animation::fade_out(ring_id), Animation::fade_out(caption_id)]);
    }
    Ok(())
}

/// The PageRank formula explained line by line, with the ranks of the
/// example graph alongside.
pub(super) fn formula(config: &AppConfig) -> Result<Scene, TableauError> {
    let frame = config.render().viewport().frame_bounds();
    let mut scene = Scene::new("pagerank-formula");

    let title = text("PageRank Computation", 38.0, palette::blue());
    let title = centered_at(title.clone(), to_edge(frame, title.bounds(), Direction::Up, 0.5));
    let left = frame.left() + 1.0;

    let (surfer, bottom) = column(
        &[
            "PageRank models a random surfer who:",
            "• Follows links with probability 0.75",
            "• Randomly teleports with probability 0.25",
        ],
        26.0,
        Point::new(left, title.bounds().bottom() - 0.3),
        0.05,
    );
    let (heading, bottom) = column(&["PageRank Formula:"], 26.0, Point::new(left, bottom - 0.3), 0.05);
    let equation = math("PR(pᵢ) = (1 − d)/N + d · Σ PR(pⱼ)/L(pⱼ) over pⱼ ∈ M(pᵢ)", 32.0);
    let equation_at = Point::new(
        left + equation.bounds().width() / 2.0,
        bottom - 0.25 - equation.bounds().height() / 2.0,
    );
    let equation = centered_at(equation, equation_at);
    let (legend, bottom) = column(
        &[
            "Where:",
            "• PR(pi) is the PageRank of page i",
            "• d is the damping factor (0.75 in our case)",
            "• N is the total number of pages (5 in our example)",
            "• M(pi) is the set of pages that link to page i",
            "• L(pj) is the number of outbound links from page j",
        ],
        15.0,
        Point::new(left, equation.bounds().bottom() - 0.25),
        0.05,
    );
    let closing = text(
        "The PageRank vector is the steady-state probability\nof the random surfer being at each node.",
        20.0,
        palette::white(),
    );
    let closing_at = Point::new(0.0, bottom - 0.3 - closing.bounds().height() / 2.0);
    let closing = centered_at(closing, closing_at);

    // Ranks of the example graph down the right edge.
    let ranks = stationary_distribution(&transition_matrix(&link_graph(), TELEPORT)?, 1e-10, 1000)?;
    let rank_lines: Vec<String> = ranks
        .iter()
        .enumerate()
        .map(|(page, rank)| format!("PR({}) = {rank:.3}", page + 1))
        .collect();
    let rank_refs: Vec<&str> = rank_lines.iter().map(String::as_str).collect();
    let (mut rank_figures, _) = column(&rank_refs, 24.0, Point::default(), 0.15);
    let block = bounds_of(&rank_figures);
    let target = to_edge(frame, block, Direction::Right, 0.6).with_y(0.0);
    shift_all(&mut rank_figures, target.sub_point(block.center()));

    let with_prefix = |prefix: &str, figures: Vec<(Id, Figure)>| -> Vec<(Id, Figure)> {
        let root = Id::new(prefix);
        figures
            .into_iter()
            .map(|(id, figure)| (root.child(&id.to_string()), figure))
            .collect()
    };
    let surfer = with_prefix("surfer", surfer);
    let heading = with_prefix("formula_heading", heading);
    let legend = with_prefix("legend", legend);
    let rank_figures = with_prefix("ranks", rank_figures);

    scene
        .play(vec![Animation::create(Id::new("title"), title)])
        .play_with(entrances(&surfer), 2.0, Easing::Smooth)
        .play(entrances(&heading))
        .play(vec![Animation::create(Id::new("formula"), equation)])
        .play_with(entrances(&legend), 3.0, Easing::Smooth)
        .play(vec![Animation::create(Id::new("closing"), closing)])
        .play(
            rank_figures
                .iter()
                .map(|(id, figure)| Animation::fade_in(*id, figure.clone()))
                .collect(),
        )
        .wait(2.0);
    Ok(scene)
}

/// Left-aligned lines stacked downward from `top_left`. Figures are keyed
/// `line_<n>`; also returns the bottom of the last line.
fn column(lines: &[&str], points: f32, top_left: Point, buff: f32) -> (Vec<(Id, Figure)>, f32) {
    let mut cursor = top_left.y();
    let mut figures = Vec::with_capacity(lines.len());
    for (index, line) in lines.iter().enumerate() {
        let figure = text(line, points, palette::white());
        let size = figure.bounds().to_size();
        let center = Point::new(top_left.x() + size.width() / 2.0, cursor - size.height() / 2.0);
        figures.push((Id::indexed("line", &[index]), centered_at(figure, center)));
        cursor -= size.height() + buff;
    }
    (figures, cursor + buff)
}
