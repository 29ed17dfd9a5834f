// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-MermaidCanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-canvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::model::flow_ast::{FlowDirection, FlowchartAst, NodeShape};
use crate::model::ids::NodeId;

/// Node input for a [`GraphLayoutEngine`]: an id and a box size.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    id: NodeId,
    width: f64,
    height: f64,
}

impl LayoutNode {
    pub fn new(id: NodeId, width: f64, height: f64) -> Self {
        Self { id, width, height }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutEdge {
    source: NodeId,
    target: NodeId,
}

impl LayoutEdge {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target }
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }
}

/// Center point of a node as returned by a [`GraphLayoutEngine`].
#[derive(Debug, Clone, PartialEq)]
pub struct NodePosition {
    id: NodeId,
    x: f64,
    y: f64,
}

impl NodePosition {
    pub fn new(id: NodeId, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }
}

/// Spacing knobs handed to the layout engine.
///
/// `edge_sep` is passed through for engines that route edges; [`LayeredLayout`] does not.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub direction: FlowDirection,
    pub node_sep: f64,
    pub rank_sep: f64,
    pub edge_sep: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self { direction: FlowDirection::TB, node_sep: 50.0, rank_sep: 80.0, edge_sep: 20.0 }
    }
}

impl LayoutOptions {
    pub fn for_direction(direction: FlowDirection) -> Self {
        Self { direction, ..Self::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphLayoutError {
    UnknownNode { edge_index: usize, node_id: NodeId },
}

impl std::fmt::Display for GraphLayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownNode { edge_index, node_id } => {
                write!(f, "edge #{edge_index} references unknown node {node_id}")
            }
        }
    }
}

impl std::error::Error for GraphLayoutError {}

/// Contract for automatic node placement: sized nodes and edges in, node centers out.
///
/// Implementations must return exactly one position per input node.
pub trait GraphLayoutEngine {
    fn layout(
        &self,
        nodes: &[LayoutNode],
        edges: &[LayoutEdge],
        options: &LayoutOptions,
    ) -> Result<Vec<NodePosition>, GraphLayoutError>;
}

/// Deterministic layered (Sugiyama-style) placement.
///
/// - Back edges found by a depth-first walk in input order are ignored, so cycles never fail.
/// - Layers are assigned by longest path over a topological order.
/// - Nodes within a layer start in input order and get one downward barycenter sweep.
/// - Layers are centered on the widest one along the cross axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayeredLayout;

/// Adjacency by input index, self-loops and back edges removed.
fn acyclic_successors(node_count: usize, edges: &[(usize, usize)]) -> Vec<Vec<usize>> {
    let mut adjacency = vec![Vec::<usize>::new(); node_count];
    for &(from, to) in edges {
        if from != to {
            adjacency[from].push(to);
        }
    }
    for tos in adjacency.iter_mut() {
        tos.sort_unstable();
        tos.dedup();
    }

    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        New,
        OnStack,
        Done,
    }

    let mut marks = vec![Mark::New; node_count];
    let mut kept = vec![Vec::<usize>::new(); node_count];
    for root in 0..node_count {
        if marks[root] != Mark::New {
            continue;
        }
        // Iterative DFS: (node, next child offset).
        let mut stack = vec![(root, 0usize)];
        marks[root] = Mark::OnStack;
        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            let Some(&child) = adjacency[node].get(frame.1) else {
                marks[node] = Mark::Done;
                stack.pop();
                continue;
            };
            frame.1 += 1;
            match marks[child] {
                Mark::OnStack => {}
                Mark::Done => kept[node].push(child),
                Mark::New => {
                    kept[node].push(child);
                    marks[child] = Mark::OnStack;
                    stack.push((child, 0));
                }
            }
        }
    }
    kept
}

fn topo_sort(successors: &[Vec<usize>]) -> Vec<usize> {
    let mut indegree = vec![0usize; successors.len()];
    for tos in successors {
        for &to in tos {
            indegree[to] += 1;
        }
    }

    let mut ready = indegree
        .iter()
        .enumerate()
        .filter_map(|(idx, degree)| (*degree == 0).then_some(idx))
        .collect::<BTreeSet<_>>();

    let mut topo = Vec::with_capacity(successors.len());
    while let Some(next) = ready.pop_first() {
        topo.push(next);
        for &to in &successors[next] {
            indegree[to] -= 1;
            if indegree[to] == 0 {
                ready.insert(to);
            }
        }
    }
    topo
}

fn assign_layers(topo: &[usize], successors: &[Vec<usize>]) -> Vec<usize> {
    let mut layers = vec![0usize; successors.len()];
    for &from in topo {
        let from_layer = layers[from];
        for &to in &successors[from] {
            layers[to] = layers[to].max(from_layer + 1);
        }
    }
    layers
}

fn sort_layer_by_barycenter(
    layer_nodes: &mut [usize],
    prev_positions: &HashMap<usize, usize>,
    predecessors: &[Vec<usize>],
) {
    let barycenter = |node: usize| {
        let (sum, count) = predecessors[node]
            .iter()
            .filter_map(|p| prev_positions.get(p).copied())
            .fold((0usize, 0usize), |(sum, count), pos| (sum + pos, count + 1));
        (count > 0).then_some((sum, count))
    };

    layer_nodes.sort_by(|&a, &b| match (barycenter(a), barycenter(b)) {
        (None, None) => a.cmp(&b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (Some((sum_a, count_a)), Some((sum_b, count_b))) => {
            // sum_a/count_a vs sum_b/count_b without floats.
            let left = (sum_a as u128) * (count_b as u128);
            let right = (sum_b as u128) * (count_a as u128);
            left.cmp(&right).then_with(|| a.cmp(&b))
        }
    });
}

impl GraphLayoutEngine for LayeredLayout {
    fn layout(
        &self,
        nodes: &[LayoutNode],
        edges: &[LayoutEdge],
        options: &LayoutOptions,
    ) -> Result<Vec<NodePosition>, GraphLayoutError> {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.id(), idx))
            .collect::<HashMap<_, _>>();
        let resolve = |edge_index: usize, node_id: &NodeId| {
            index.get(node_id).copied().ok_or_else(|| GraphLayoutError::UnknownNode {
                edge_index,
                node_id: node_id.clone(),
            })
        };
        let pairs = edges
            .iter()
            .enumerate()
            .map(|(edge_index, edge)| {
                Ok((resolve(edge_index, edge.source())?, resolve(edge_index, edge.target())?))
            })
            .collect::<Result<Vec<_>, GraphLayoutError>>()?;

        let successors = acyclic_successors(nodes.len(), &pairs);
        let mut predecessors = vec![Vec::<usize>::new(); nodes.len()];
        for (from, tos) in successors.iter().enumerate() {
            for &to in tos {
                predecessors[to].push(from);
            }
        }

        let topo = topo_sort(&successors);
        let node_layers = assign_layers(&topo, &successors);

        let layer_count = node_layers.iter().copied().max().map_or(0, |max| max + 1);
        let mut layers = vec![Vec::<usize>::new(); layer_count];
        for (node, &layer) in node_layers.iter().enumerate() {
            layers[layer].push(node);
        }

        for layer_idx in 1..layers.len() {
            let prev_positions = layers[layer_idx - 1]
                .iter()
                .enumerate()
                .map(|(pos, &node)| (node, pos))
                .collect::<HashMap<_, _>>();
            sort_layer_by_barycenter(&mut layers[layer_idx], &prev_positions, &predecessors);
        }

        let horizontal = options.direction.is_horizontal();
        // (rank-axis size, cross-axis size)
        let extent = |node: usize| {
            let node = &nodes[node];
            if horizontal {
                (node.width(), node.height())
            } else {
                (node.height(), node.width())
            }
        };

        let layer_cross = layers
            .iter()
            .map(|layer| {
                let sizes = layer.iter().map(|&node| extent(node).1).sum::<f64>();
                sizes + options.node_sep * layer.len().saturating_sub(1) as f64
            })
            .collect::<Vec<_>>();
        let widest = layer_cross.iter().copied().fold(0.0, f64::max);

        let reversed = matches!(options.direction, FlowDirection::BT | FlowDirection::RL);
        let rank_order = if reversed {
            (0..layers.len()).rev().collect::<Vec<_>>()
        } else {
            (0..layers.len()).collect::<Vec<_>>()
        };

        let mut centers = BTreeMap::<usize, (f64, f64)>::new();
        let mut rank_cursor = 0.0;
        for layer_idx in rank_order {
            let layer = &layers[layer_idx];
            let thickness = layer.iter().map(|&node| extent(node).0).fold(0.0, f64::max);
            let rank_center = rank_cursor + thickness / 2.0;

            let mut cross_cursor = (widest - layer_cross[layer_idx]) / 2.0;
            for &node in layer {
                let cross_size = extent(node).1;
                let cross_center = cross_cursor + cross_size / 2.0;
                let point = if horizontal {
                    (rank_center, cross_center)
                } else {
                    (cross_center, rank_center)
                };
                centers.insert(node, point);
                cross_cursor += cross_size + options.node_sep;
            }
            rank_cursor += thickness + options.rank_sep;
        }

        Ok(nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| {
                let (x, y) = centers.get(&idx).copied().unwrap_or((0.0, 0.0));
                NodePosition::new(node.id().clone(), x, y)
            })
            .collect())
    }
}

/// Box size used for auto-layout, by shape.
pub fn node_size(shape: NodeShape) -> (f64, f64) {
    match shape {
        NodeShape::Diamond => (120.0, 120.0),
        NodeShape::Circle => (150.0, 80.0),
        NodeShape::Rectangle | NodeShape::Rounded | NodeShape::Stadium | NodeShape::Hexagon => {
            (150.0, 60.0)
        }
    }
}

/// Top-left position of a flowchart node on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowNodePosition {
    node_id: NodeId,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl FlowNodePosition {
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

/// Sizes every node by shape, runs `engine`, and converts centers to top-left corners.
///
/// Positions come back in node list order.
pub fn auto_layout<E: GraphLayoutEngine + ?Sized>(
    ast: &FlowchartAst,
    engine: &E,
    options: &LayoutOptions,
) -> Result<Vec<FlowNodePosition>, GraphLayoutError> {
    let nodes = ast
        .nodes()
        .iter()
        .map(|node| {
            let (width, height) = node_size(node.shape());
            LayoutNode::new(node.id().clone(), width, height)
        })
        .collect::<Vec<_>>();
    let edges = ast
        .edges()
        .iter()
        .map(|edge| LayoutEdge::new(edge.source().clone(), edge.target().clone()))
        .collect::<Vec<_>>();

    let centers = engine
        .layout(&nodes, &edges, options)?
        .into_iter()
        .map(|position| (position.id.clone(), position))
        .collect::<HashMap<_, _>>();

    let positions = nodes
        .iter()
        .map(|node| {
            let (cx, cy) = centers
                .get(node.id())
                .map_or((node.width() / 2.0, node.height() / 2.0), |p| (p.x(), p.y()));
            FlowNodePosition {
                node_id: node.id().clone(),
                x: cx - node.width() / 2.0,
                y: cy - node.height() / 2.0,
                width: node.width(),
                height: node.height(),
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        nodes = positions.len(),
        edges = edges.len(),
        direction = options.direction.as_str(),
        "flowchart auto-layout computed"
    );
    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::{
        auto_layout, node_size, FlowNodePosition, GraphLayoutEngine, GraphLayoutError,
        LayeredLayout, LayoutEdge, LayoutNode, LayoutOptions, NodePosition,
    };
    use crate::format::mermaid::parse_flowchart;
    use crate::model::fixtures::{flowchart_small_dag, flowchart_with_cycle};
    use crate::model::flow_ast::{FlowDirection, NodeShape};
    use crate::model::ids::NodeId;

    fn position_of<'a>(positions: &'a [FlowNodePosition], id: &str) -> &'a FlowNodePosition {
        positions
            .iter()
            .find(|p| p.node_id().as_str() == id)
            .expect("node position")
    }

    #[test]
    fn node_sizes_follow_shape() {
        assert_eq!(node_size(NodeShape::Diamond), (120.0, 120.0));
        assert_eq!(node_size(NodeShape::Circle), (150.0, 80.0));
        assert_eq!(node_size(NodeShape::Rectangle), (150.0, 60.0));
        assert_eq!(node_size(NodeShape::Hexagon), (150.0, 60.0));
    }

    #[test]
    fn top_to_bottom_chain_stacks_vertically() {
        let ast = parse_flowchart("flowchart TB\nA --> B\nB --> C\n").expect("parse");
        let positions =
            auto_layout(&ast, &LayeredLayout, &LayoutOptions::default()).expect("layout");

        let (a, b, c) = (
            position_of(&positions, "A"),
            position_of(&positions, "B"),
            position_of(&positions, "C"),
        );
        assert_eq!(a.x(), b.x());
        assert_eq!(b.x(), c.x());
        assert_eq!(b.y() - a.y(), 60.0 + 80.0);
        assert!(c.y() > b.y());
    }

    #[test]
    fn left_to_right_chain_advances_horizontally() {
        let ast = parse_flowchart("flowchart LR\nA --> B\n").expect("parse");
        let options = LayoutOptions::for_direction(FlowDirection::LR);
        let positions = auto_layout(&ast, &LayeredLayout, &options).expect("layout");

        let (a, b) = (position_of(&positions, "A"), position_of(&positions, "B"));
        assert_eq!(a.y(), b.y());
        assert_eq!(b.x() - a.x(), 150.0 + 80.0);
    }

    #[test]
    fn bottom_to_top_reverses_rank_order() {
        let ast = parse_flowchart("flowchart BT\nA --> B\n").expect("parse");
        let options = LayoutOptions::for_direction(FlowDirection::BT);
        let positions = auto_layout(&ast, &LayeredLayout, &options).expect("layout");
        assert!(position_of(&positions, "A").y() > position_of(&positions, "B").y());
    }

    #[test]
    fn siblings_share_a_layer_and_are_separated() {
        let ast = flowchart_small_dag();
        let positions =
            auto_layout(&ast, &LayeredLayout, &LayoutOptions::default()).expect("layout");

        assert_eq!(positions.len(), ast.nodes().len());
        let b = position_of(&positions, "B");
        let c = position_of(&positions, "C");
        assert_eq!(b.y() + b.height() / 2.0, c.y() + c.height() / 2.0);
        let (left, right) = if b.x() < c.x() { (b, c) } else { (c, b) };
        assert!(right.x() >= left.x() + left.width() + 50.0);
    }

    #[test]
    fn cycles_are_laid_out_without_error() {
        let ast = flowchart_with_cycle();
        let options = LayoutOptions::for_direction(ast.direction());
        let positions = auto_layout(&ast, &LayeredLayout, &options).expect("layout");
        assert_eq!(positions.len(), 4);

        let a = position_of(&positions, "A");
        let b = position_of(&positions, "B");
        let c = position_of(&positions, "C");
        assert!(a.x() < b.x());
        assert!(b.x() < c.x());
    }

    #[test]
    fn layout_is_deterministic() {
        let ast = flowchart_small_dag();
        let first = auto_layout(&ast, &LayeredLayout, &LayoutOptions::default()).expect("first");
        let second = auto_layout(&ast, &LayeredLayout, &LayoutOptions::default()).expect("second");
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_edge_endpoint_is_reported() {
        let nodes = vec![LayoutNode::new(NodeId::new("A"), 10.0, 10.0)];
        let edges = vec![LayoutEdge::new(NodeId::new("A"), NodeId::new("missing"))];
        assert_eq!(
            LayeredLayout.layout(&nodes, &edges, &LayoutOptions::default()),
            Err(GraphLayoutError::UnknownNode { edge_index: 0, node_id: NodeId::new("missing") })
        );
    }

    struct FixedEngine;

    impl GraphLayoutEngine for FixedEngine {
        fn layout(
            &self,
            nodes: &[LayoutNode],
            _edges: &[LayoutEdge],
            _options: &LayoutOptions,
        ) -> Result<Vec<NodePosition>, GraphLayoutError> {
            Ok(nodes
                .iter()
                .map(|node| NodePosition::new(node.id().clone(), 100.0, 100.0))
                .collect())
        }
    }

    #[test]
    fn engine_centers_are_converted_to_top_left() {
        let ast = parse_flowchart("flowchart TB\nA{Choice}\n").expect("parse");
        let positions =
            auto_layout(&ast, &FixedEngine, &LayoutOptions::default()).expect("layout");
        assert_eq!(positions[0].x(), 100.0 - 60.0);
        assert_eq!(positions[0].y(), 100.0 - 60.0);
    }
}
