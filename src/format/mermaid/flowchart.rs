// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-MermaidCanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-canvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::label::{decode_label, encode_label};
use super::ParseOptions;
use crate::model::flow_ast::{EdgeStyle, FlowDirection, FlowEdge, FlowNode, FlowchartAst, NodeShape};
use crate::model::ids::{IdAllocator, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MermaidFlowchartParseError {
    /// The built-in grammar failed to compile.
    Grammar { message: String },
    /// Strict mode only: a line matched neither an edge nor a node definition.
    UnrecognizedLine { line_no: usize, line: String },
}

impl fmt::Display for MermaidFlowchartParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grammar { message } => write!(f, "invalid flowchart grammar: {message}"),
            Self::UnrecognizedLine { line_no, line } => {
                write!(f, "unrecognized flowchart syntax on line {line_no}: {line}")
            }
        }
    }
}

impl std::error::Error for MermaidFlowchartParseError {}

struct EdgePattern {
    regex: Regex,
    style: EdgeStyle,
}

struct FlowchartGrammar {
    header: Regex,
    edges: Vec<EdgePattern>,
}

impl FlowchartGrammar {
    /// Connector patterns in precedence order: labelled forms before bare arrows.
    const EDGE_PATTERNS: [(&'static str, EdgeStyle); 9] = [
        (r"==>\|([^|]*)\|", EdgeStyle::Thick),
        (r"-\.->\|([^|]*)\|", EdgeStyle::Dotted),
        (r"-->\|([^|]*)\|", EdgeStyle::Solid),
        (r#"==\s*"([^"]+)"\s*==>"#, EdgeStyle::Thick),
        (r#"-\.\s*"([^"]+)"\s*\.->"#, EdgeStyle::Dotted),
        (r#"--\s*"([^"]+)"\s*-->"#, EdgeStyle::Solid),
        (r"==>", EdgeStyle::Thick),
        (r"-\.->", EdgeStyle::Dotted),
        (r"-->", EdgeStyle::Solid),
    ];

    fn compile() -> Result<Self, regex::Error> {
        let header = Regex::new(r"(?i)^(?:flowchart|graph)(?:\s+(\S+))?\s*$")?;
        let edges = Self::EDGE_PATTERNS
            .iter()
            .map(|(pattern, style)| {
                Regex::new(pattern).map(|regex| EdgePattern {
                    regex,
                    style: *style,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { header, edges })
    }
}

fn grammar() -> Result<&'static FlowchartGrammar, MermaidFlowchartParseError> {
    static GRAMMAR: OnceLock<Result<FlowchartGrammar, regex::Error>> = OnceLock::new();
    GRAMMAR
        .get_or_init(FlowchartGrammar::compile)
        .as_ref()
        .map_err(|err| MermaidFlowchartParseError::Grammar {
            message: err.to_string(),
        })
}

fn is_comment_line(trimmed: &str) -> bool {
    trimmed.starts_with("%%")
}

fn is_ignorable_line(trimmed: &str) -> bool {
    trimmed.starts_with("subgraph ")
        || trimmed == "end"
        || trimmed.starts_with("style ")
        || trimmed.starts_with("class ")
        || trimmed.starts_with("classDef ")
        || trimmed.starts_with("click ")
        || trimmed.starts_with("linkStyle ")
}

/// Marks bytes inside brackets or double quotes, where a connector cannot start.
fn shielded_bytes(line: &str) -> Vec<bool> {
    let mut shielded = vec![false; line.len()];
    let mut depth = 0usize;
    let mut in_quote = false;
    for (idx, ch) in line.char_indices() {
        match ch {
            '"' => in_quote = !in_quote,
            '[' | '(' | '{' if !in_quote => depth += 1,
            ']' | ')' | '}' if !in_quote => depth = depth.saturating_sub(1),
            _ => {}
        }
        if in_quote || depth > 0 || ch == '"' {
            shielded[idx..idx + ch.len_utf8()].fill(true);
        }
    }
    shielded
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct EdgeMatch {
    start: usize,
    end: usize,
    style: EdgeStyle,
    label: String,
}

/// Finds the leftmost connector outside node labels; on a tie the earlier pattern wins.
fn find_edge(grammar: &FlowchartGrammar, text: &str) -> Option<EdgeMatch> {
    let shielded = shielded_bytes(text);
    let mut best: Option<EdgeMatch> = None;
    for pattern in &grammar.edges {
        let Some(caps) = pattern
            .regex
            .captures_iter(text)
            .find(|caps| caps.get(0).is_some_and(|m| !shielded[m.start()]))
        else {
            continue;
        };
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if best.as_ref().is_some_and(|found| found.start <= whole.start()) {
            continue;
        }
        let label = caps
            .get(1)
            .map(|label| decode_label(label.as_str()))
            .unwrap_or_default();
        best = Some(EdgeMatch {
            start: whole.start(),
            end: whole.end(),
            style: pattern.style,
            label,
        });
    }
    best
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeDef {
    id: String,
    label: String,
    shape: NodeShape,
}

/// Reads `<id><open>label<close>` using the shape delimiters in [`NodeShape::MATCH_ORDER`].
fn parse_node_def(token: &str) -> Option<NodeDef> {
    let bracket = token.find(['[', '(', '{'])?;
    let id = token[..bracket].trim();
    if id.is_empty() {
        return None;
    }
    let shape_text = &token[bracket..];

    NodeShape::MATCH_ORDER.into_iter().find_map(|shape| {
        let (open, close) = shape.delimiters();
        let inner = shape_text.strip_prefix(open)?.strip_suffix(close)?;
        if inner.is_empty() {
            return None;
        }
        let unquoted = inner.strip_prefix('"').unwrap_or(inner);
        let unquoted = unquoted.strip_suffix('"').unwrap_or(unquoted);
        Some(NodeDef {
            id: id.to_owned(),
            label: decode_label(unquoted),
            shape,
        })
    })
}

/// Nodes in first-mention order. Redefinitions update label and shape in place.
#[derive(Default)]
struct NodeTable {
    nodes: Vec<FlowNode>,
    index: HashMap<String, usize>,
}

impl NodeTable {
    fn define(&mut self, def: NodeDef) -> NodeId {
        if let Some(&slot) = self.index.get(&def.id) {
            let node = &mut self.nodes[slot];
            node.set_label(def.label);
            node.set_shape(def.shape);
            return node.id().clone();
        }
        let node_id = NodeId::new(def.id.clone());
        self.index.insert(def.id, self.nodes.len());
        self.nodes
            .push(FlowNode::new_with(node_id.clone(), def.label, def.shape));
        node_id
    }

    fn ensure(&mut self, id: &str) -> NodeId {
        if let Some(&slot) = self.index.get(id) {
            return self.nodes[slot].id().clone();
        }
        self.define(NodeDef {
            id: id.to_owned(),
            label: id.to_owned(),
            shape: NodeShape::Rectangle,
        })
    }

    fn resolve_endpoint(&mut self, token: &str) -> NodeId {
        match parse_node_def(token) {
            Some(def) => self.define(def),
            None => self.ensure(token),
        }
    }
}

struct EdgeSegment<'a> {
    source: &'a str,
    target: &'a str,
    style: EdgeStyle,
    label: String,
}

/// Splits `a --> b -.-> c` into `(a, b)` and `(b, c)`. Returns `None` when any endpoint is empty.
fn split_edge_chain<'a>(
    grammar: &FlowchartGrammar,
    line: &'a str,
    first: EdgeMatch,
) -> Option<Vec<EdgeSegment<'a>>> {
    let mut segments = Vec::new();
    let mut source = line[..first.start].trim();
    let mut connector = first;
    let mut rest = &line[connector.end..];

    loop {
        let next = find_edge(grammar, rest);
        let target = match &next {
            Some(next) => rest[..next.start].trim(),
            None => rest.trim(),
        };
        if source.is_empty() || target.is_empty() {
            return None;
        }
        segments.push(EdgeSegment {
            source,
            target,
            style: connector.style,
            label: std::mem::take(&mut connector.label),
        });

        let Some(next) = next else {
            break;
        };
        source = target;
        rest = &rest[next.end..];
        connector = next;
    }

    Some(segments)
}

/// Parse flowchart markup with a fresh id allocator in lenient mode.
pub fn parse_flowchart(input: &str) -> Result<FlowchartAst, MermaidFlowchartParseError> {
    parse_flowchart_with(input, &mut IdAllocator::new(), ParseOptions::default())
}

/// Parse flowchart markup.
///
/// Supported:
/// - `flowchart`/`graph` header with optional direction (`TB`, `TD`, `LR`, `BT`, `RL`); a missing
///   or unknown direction falls back to `TB`
/// - comment lines starting with `%%`
/// - node definitions: `id[..]`, `id(..)`, `id{..}`, `id((..))`, `id([..])`, `id{{..}}`, with
///   optionally quoted labels
/// - edges: `-->`, `-.->`, `==>`, each with an optional `|label|` or `--"label"-->` style label
/// - chains: `a --> b --> c`
/// - endpoints that were never defined become rectangle nodes labelled with their id
///
/// Lines matching nothing are skipped, or rejected in strict mode. Edge ids come from `ids`.
pub fn parse_flowchart_with(
    input: &str,
    ids: &mut IdAllocator,
    options: ParseOptions,
) -> Result<FlowchartAst, MermaidFlowchartParseError> {
    let grammar = grammar()?;
    let mut direction = FlowDirection::TB;
    let mut table = NodeTable::default();
    let mut edges = Vec::<FlowEdge>::new();
    let mut saw_first_line = false;

    for (idx, raw_line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || is_comment_line(trimmed) {
            continue;
        }

        if !saw_first_line {
            saw_first_line = true;
            if let Some(caps) = grammar.header.captures(trimmed) {
                direction = caps
                    .get(1)
                    .and_then(|keyword| FlowDirection::from_keyword(keyword.as_str()))
                    .unwrap_or_default();
                continue;
            }
        }

        if is_ignorable_line(trimmed) {
            tracing::trace!(line_no, line = trimmed, "ignoring flowchart statement");
            continue;
        }

        if let Some(first) = find_edge(grammar, trimmed) {
            if let Some(segments) = split_edge_chain(grammar, trimmed, first) {
                for segment in segments {
                    let source = table.resolve_endpoint(segment.source);
                    let target = table.resolve_endpoint(segment.target);
                    edges.push(FlowEdge::new_with(
                        ids.next_edge_id(),
                        source,
                        target,
                        segment.style,
                        segment.label,
                    ));
                }
                continue;
            }
        } else if let Some(def) = parse_node_def(trimmed) {
            table.define(def);
            continue;
        }

        if options.is_strict() {
            return Err(MermaidFlowchartParseError::UnrecognizedLine {
                line_no,
                line: trimmed.to_owned(),
            });
        }
        tracing::trace!(line_no, line = trimmed, "skipping unrecognized flowchart line");
    }

    let mut ast = FlowchartAst::new(direction);
    *ast.nodes_mut() = table.nodes;
    *ast.edges_mut() = edges;
    tracing::debug!(
        direction = direction.as_str(),
        nodes = ast.nodes().len(),
        edges = ast.edges().len(),
        "parsed flowchart"
    );
    Ok(ast)
}

/// Write a flowchart as canonical markup.
///
/// Output is deterministic:
/// - header `flowchart <DIR>`
/// - one line per node in model order, label always quoted and sanitized
/// - if there are edges, a blank line and one line per edge in model order
///
/// An empty flowchart is just the header line.
pub fn generate_flowchart(ast: &FlowchartAst) -> String {
    let mut out = String::new();
    out.push_str("flowchart ");
    out.push_str(ast.direction().as_str());
    out.push('\n');

    if ast.nodes().is_empty() {
        return out;
    }

    for node in ast.nodes() {
        let (open, close) = node.shape().delimiters();
        out.push_str("    ");
        out.push_str(node.id().as_str());
        out.push_str(open);
        out.push('"');
        out.push_str(&encode_label(node.label()));
        out.push('"');
        out.push_str(close);
        out.push('\n');
    }

    if !ast.edges().is_empty() {
        out.push('\n');
    }

    for edge in ast.edges() {
        out.push_str("    ");
        out.push_str(edge.source().as_str());
        out.push(' ');
        if edge.has_label() {
            let (open, close) = edge.style().label_delimiters();
            out.push_str(open);
            out.push('"');
            out.push_str(&encode_label(edge.label()));
            out.push('"');
            out.push_str(close);
        } else {
            out.push_str(edge.style().arrow());
        }
        out.push(' ');
        out.push_str(edge.target().as_str());
        out.push('\n');
    }

    out
}
