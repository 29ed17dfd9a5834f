// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-MermaidCanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-canvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ids::{EdgeId, NodeId};

/// Flowchart layout direction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
pub enum FlowDirection {
    #[default]
    TB,
    LR,
    BT,
    RL,
}

impl FlowDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TB => "TB",
            Self::LR => "LR",
            Self::BT => "BT",
            Self::RL => "RL",
        }
    }

    /// Parses a header direction keyword; `TD` is an alias for `TB`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "TB" | "TD" => Some(Self::TB),
            "LR" => Some(Self::LR),
            "BT" => Some(Self::BT),
            "RL" => Some(Self::RL),
            _ => None,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LR | Self::RL)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    #[default]
    Rectangle,
    Rounded,
    Diamond,
    Circle,
    Stadium,
    Hexagon,
}

impl NodeShape {
    /// Shapes in delimiter-matching order: longer delimiters first, so `((x))` is a circle and
    /// not a rounded node labelled `(x)`.
    pub const MATCH_ORDER: [NodeShape; 6] = [
        NodeShape::Circle,
        NodeShape::Stadium,
        NodeShape::Hexagon,
        NodeShape::Diamond,
        NodeShape::Rounded,
        NodeShape::Rectangle,
    ];

    pub fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            Self::Rectangle => ("[", "]"),
            Self::Rounded => ("(", ")"),
            Self::Diamond => ("{", "}"),
            Self::Circle => ("((", "))"),
            Self::Stadium => ("([", "])"),
            Self::Hexagon => ("{{", "}}"),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    #[default]
    Solid,
    Dotted,
    Thick,
}

impl EdgeStyle {
    /// The unlabelled connector, e.g. `-->`.
    pub fn arrow(self) -> &'static str {
        match self {
            Self::Solid => "-->",
            Self::Dotted => "-.->",
            Self::Thick => "==>",
        }
    }

    /// Opening and closing halves of the connector around a quoted label, e.g. `--"x"-->`.
    pub fn label_delimiters(self) -> (&'static str, &'static str) {
        match self {
            Self::Solid => ("--", "-->"),
            Self::Dotted => ("-.", ".->"),
            Self::Thick => ("==", "==>"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlowchartAst {
    direction: FlowDirection,
    nodes: Vec<FlowNode>,
    edges: Vec<FlowEdge>,
}

impl FlowchartAst {
    pub fn new(direction: FlowDirection) -> Self {
        Self {
            direction,
            ..Self::default()
        }
    }

    pub fn direction(&self) -> FlowDirection {
        self.direction
    }

    pub fn set_direction(&mut self, direction: FlowDirection) {
        self.direction = direction;
    }

    pub fn nodes(&self) -> &[FlowNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut Vec<FlowNode> {
        &mut self.nodes
    }

    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut Vec<FlowEdge> {
        &mut self.edges
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&FlowNode> {
        self.nodes.iter().find(|node| node.id() == node_id)
    }

    pub fn node_mut(&mut self, node_id: &NodeId) -> Option<&mut FlowNode> {
        self.nodes.iter_mut().find(|node| node.id() == node_id)
    }

    pub fn edge(&self, edge_id: &EdgeId) -> Option<&FlowEdge> {
        self.edges.iter().find(|edge| edge.id() == edge_id)
    }

    pub fn edge_mut(&mut self, edge_id: &EdgeId) -> Option<&mut FlowEdge> {
        self.edges.iter_mut().find(|edge| edge.id() == edge_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlowNode {
    id: NodeId,
    label: String,
    shape: NodeShape,
}

impl FlowNode {
    pub fn new(id: NodeId, label: impl Into<String>) -> Self {
        Self::new_with(id, label, NodeShape::Rectangle)
    }

    pub fn new_with(id: NodeId, label: impl Into<String>, shape: NodeShape) -> Self {
        Self {
            id,
            label: label.into(),
            shape,
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn shape(&self) -> NodeShape {
        self.shape
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn set_shape(&mut self, shape: NodeShape) {
        self.shape = shape;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlowEdge {
    id: EdgeId,
    source: NodeId,
    target: NodeId,
    style: EdgeStyle,
    #[serde(default)]
    label: String,
}

impl FlowEdge {
    pub fn new(id: EdgeId, source: NodeId, target: NodeId) -> Self {
        Self::new_with(id, source, target, EdgeStyle::Solid, "")
    }

    pub fn new_with(
        id: EdgeId,
        source: NodeId,
        target: NodeId,
        style: EdgeStyle,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id,
            source,
            target,
            style,
            label: label.into(),
        }
    }

    pub fn id(&self) -> &EdgeId {
        &self.id
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn style(&self) -> EdgeStyle {
        self.style
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Labels that are empty after trimming are treated as absent when writing markup.
    pub fn has_label(&self) -> bool {
        !self.label.trim().is_empty()
    }

    pub fn set_source(&mut self, source: NodeId) {
        self.source = source;
    }

    pub fn set_target(&mut self, target: NodeId) {
        self.target = target;
    }

    pub fn set_style(&mut self, style: EdgeStyle) {
        self.style = style;
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn touches(&self, node_id: &NodeId) -> bool {
        &self.source == node_id || &self.target == node_id
    }
}

#[cfg(test)]
mod tests {
    use super::{EdgeStyle, FlowDirection, FlowEdge, FlowNode, FlowchartAst, NodeShape};
    use crate::model::ids::{EdgeId, NodeId};

    #[test]
    fn flow_node_can_be_constructed_and_updated() {
        let mut node = FlowNode::new(NodeId::new("A"), "Hello");
        assert_eq!(node.id().as_str(), "A");
        assert_eq!(node.label(), "Hello");
        assert_eq!(node.shape(), NodeShape::Rectangle);

        node.set_label("World");
        node.set_shape(NodeShape::Circle);
        assert_eq!(node.label(), "World");
        assert_eq!(node.shape(), NodeShape::Circle);
    }

    #[test]
    fn flow_edge_label_presence_ignores_whitespace() {
        let mut edge = FlowEdge::new(EdgeId::new("edge_1"), NodeId::new("A"), NodeId::new("B"));
        assert_eq!(edge.style(), EdgeStyle::Solid);
        assert!(!edge.has_label());

        edge.set_label("   ");
        assert!(!edge.has_label());

        edge.set_label("yes");
        assert!(edge.has_label());
        assert!(edge.touches(&NodeId::new("B")));
        assert!(!edge.touches(&NodeId::new("C")));
    }

    #[test]
    fn direction_keywords_accept_td_alias() {
        assert_eq!(FlowDirection::from_keyword("TD"), Some(FlowDirection::TB));
        assert_eq!(FlowDirection::from_keyword("lr"), Some(FlowDirection::LR));
        assert_eq!(FlowDirection::from_keyword("XY"), None);
        assert_eq!(FlowchartAst::default().direction(), FlowDirection::TB);
    }

    #[test]
    fn model_serializes_with_lowercase_enums() {
        let mut ast = FlowchartAst::new(FlowDirection::LR);
        ast.nodes_mut()
            .push(FlowNode::new_with(NodeId::new("A"), "Start", NodeShape::Stadium));
        let json = serde_json::to_value(&ast).expect("serialize");
        assert_eq!(json["direction"], "LR");
        assert_eq!(json["nodes"][0]["shape"], "stadium");
    }
}
