// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-MermaidCanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-canvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::{Borrow, Cow};
use std::fmt;
use std::marker::PhantomData;

use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::diagram::DiagramAst;
use super::flow_ast::FlowchartAst;
use super::seq_ast::{SeqEventBody, SequenceAst};

/// A markup-stable identifier, tagged with the kind of entity it names.
///
/// The tag keeps node ids, participant ids, event ids, ... from being mixed up at compile time;
/// on the wire every id is a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T> Borrow<str> for Id<T> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<T> From<&str> for Id<T> {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<T> From<String> for Id<T> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

impl<T> JsonSchema for Id<T> {
    fn inline_schema() -> bool {
        true
    }

    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("Id")
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        String::json_schema(generator)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeIdTag {}
pub type NodeId = Id<NodeIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeIdTag {}
pub type EdgeId = Id<EdgeIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParticipantIdTag {}
pub type ParticipantId = Id<ParticipantIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventIdTag {}
pub type EventId = Id<EventIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActivationIdTag {}
pub type ActivationId = Id<ActivationIdTag>;

/// The entity kinds that get allocator-generated ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    Node,
    Edge,
    Participant,
    Event,
    Activation,
}

impl IdKind {
    pub const ALL: [IdKind; 5] = [
        IdKind::Node,
        IdKind::Edge,
        IdKind::Participant,
        IdKind::Event,
        IdKind::Activation,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Edge => "edge",
            Self::Participant => "participant",
            Self::Event => "seq_event",
            Self::Activation => "activation",
        }
    }

    fn slot(self) -> usize {
        match self {
            Self::Node => 0,
            Self::Edge => 1,
            Self::Participant => 2,
            Self::Event => 3,
            Self::Activation => 4,
        }
    }
}

/// Returns the numeric suffix of an id of the form `<prefix>_<n>`.
///
/// Ids that do not carry the prefix, or whose suffix is not a number, contribute `0`.
pub fn numeric_suffix(id: &str, kind: IdKind) -> u64 {
    id.strip_prefix(kind.prefix())
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|digits| digits.parse::<u64>().ok())
        .unwrap_or(0)
}

/// Five independent monotonic counters, one per [`IdKind`], producing `"{prefix}_{n}"`.
///
/// After a model is bulk-replaced (import, undo/redo) call one of the `resync*` methods so
/// freshly generated ids never collide with ids that survived in the model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdAllocator {
    counters: [u64; 5],
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&self, kind: IdKind) -> u64 {
        self.counters[kind.slot()]
    }

    fn next_raw(&mut self, kind: IdKind) -> String {
        let counter = &mut self.counters[kind.slot()];
        *counter += 1;
        format!("{}_{}", kind.prefix(), counter)
    }

    pub fn next_node_id(&mut self) -> NodeId {
        NodeId::new(self.next_raw(IdKind::Node))
    }

    pub fn next_edge_id(&mut self) -> EdgeId {
        EdgeId::new(self.next_raw(IdKind::Edge))
    }

    pub fn next_participant_id(&mut self) -> ParticipantId {
        ParticipantId::new(self.next_raw(IdKind::Participant))
    }

    pub fn next_event_id(&mut self) -> EventId {
        EventId::new(self.next_raw(IdKind::Event))
    }

    pub fn next_activation_id(&mut self) -> ActivationId {
        ActivationId::new(self.next_raw(IdKind::Activation))
    }

    fn set_from_ids<'a>(&mut self, kind: IdKind, ids: impl IntoIterator<Item = &'a str>) {
        let max = ids
            .into_iter()
            .map(|id| numeric_suffix(id, kind))
            .max()
            .unwrap_or(0);
        self.counters[kind.slot()] = max;
    }

    /// Resets the node and edge counters from a flowchart model.
    pub fn resync_flowchart(&mut self, ast: &FlowchartAst) {
        self.set_from_ids(IdKind::Node, ast.nodes().iter().map(|node| node.id().as_str()));
        self.set_from_ids(IdKind::Edge, ast.edges().iter().map(|edge| edge.id().as_str()));
    }

    /// Resets the participant, event and activation counters from a sequence model.
    ///
    /// Event ids referenced only from fragment sections are scanned as well.
    pub fn resync_sequence(&mut self, ast: &SequenceAst) {
        self.set_from_ids(
            IdKind::Participant,
            ast.participants().iter().map(|p| p.id().as_str()),
        );

        let mut event_ids = Vec::<&str>::new();
        for event in ast.events() {
            event_ids.push(event.id().as_str());
            if let SeqEventBody::Fragment(fragment) = event.body() {
                for section in fragment.sections() {
                    event_ids.extend(section.event_ids().iter().map(|id| id.as_str()));
                }
            }
        }
        self.set_from_ids(IdKind::Event, event_ids);

        self.set_from_ids(
            IdKind::Activation,
            ast.activations().iter().map(|a| a.id().as_str()),
        );
    }

    /// Resets all five counters from whichever model the document currently holds.
    ///
    /// Kinds the model does not carry are reset to `0`.
    pub fn resync(&mut self, diagram: &DiagramAst) {
        match diagram {
            DiagramAst::Flowchart(ast) => {
                self.resync_flowchart(ast);
                self.resync_sequence(&SequenceAst::default());
            }
            DiagramAst::Sequence(ast) => {
                self.resync_flowchart(&FlowchartAst::default());
                self.resync_sequence(ast);
            }
        }
    }
}
