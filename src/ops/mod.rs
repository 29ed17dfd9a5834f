// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-MermaidCanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-canvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Edit operations for flowcharts and sequence diagrams.
//!
//! A batch of ops is applied to a copy of the model and committed only if every op succeeds.
//! The result carries a coarse delta of added/removed/updated objects.

use std::collections::HashSet;
use std::fmt;

use crate::model::ids::{ActivationId, EdgeId, EventId, IdAllocator, IdKind, NodeId, ParticipantId};
use crate::model::{
    Activation, ArrowKind, DiagramAst, DiagramKind, EdgeStyle, FlowDirection, FlowEdge, FlowNode,
    FlowchartAst, Fragment, FragmentKind, Message, NodeShape, Note, NotePosition, Participant,
    ParticipantKind, Section, SeqEvent, SeqEventBody, SequenceAst,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Flow(FlowOp),
    Seq(SeqOp),
}

/// Flowchart edits. `None` ids on add ops are allocated from the document's [`IdAllocator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOp {
    AddNode {
        node_id: Option<NodeId>,
        label: String,
        shape: NodeShape,
    },
    UpdateNode {
        node_id: NodeId,
        patch: FlowNodePatch,
    },
    /// Also removes every edge touching the node.
    RemoveNode {
        node_id: NodeId,
    },
    AddEdge {
        edge_id: Option<EdgeId>,
        source: NodeId,
        target: NodeId,
        style: EdgeStyle,
        label: String,
    },
    UpdateEdge {
        edge_id: EdgeId,
        patch: FlowEdgePatch,
    },
    RemoveEdge {
        edge_id: EdgeId,
    },
    SetDirection {
        direction: FlowDirection,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowNodePatch {
    pub label: Option<String>,
    pub shape: Option<NodeShape>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowEdgePatch {
    pub source: Option<NodeId>,
    pub target: Option<NodeId>,
    pub style: Option<EdgeStyle>,
    pub label: Option<String>,
}

/// Sequence edits. New events are appended at top level; use
/// [`SeqOp::MoveEventToFragment`] to nest them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeqOp {
    AddParticipant {
        participant_id: Option<ParticipantId>,
        alias: String,
        kind: ParticipantKind,
    },
    UpdateParticipant {
        participant_id: ParticipantId,
        patch: SeqParticipantPatch,
    },
    /// Also removes messages, notes and activations that reference the participant.
    RemoveParticipant {
        participant_id: ParticipantId,
    },
    ReorderParticipants {
        from_index: usize,
        to_index: usize,
    },
    AddMessage {
        event_id: Option<EventId>,
        from: ParticipantId,
        to: ParticipantId,
        arrow: ArrowKind,
        label: String,
    },
    UpdateMessage {
        event_id: EventId,
        patch: SeqMessagePatch,
    },
    AddNote {
        event_id: Option<EventId>,
        position: NotePosition,
        participants: Vec<ParticipantId>,
        text: String,
    },
    UpdateNote {
        event_id: EventId,
        patch: SeqNotePatch,
    },
    /// Adds a fragment with one empty section.
    AddFragment {
        event_id: Option<EventId>,
        kind: FragmentKind,
        label: String,
    },
    UpdateFragment {
        event_id: EventId,
        patch: SeqFragmentPatch,
    },
    /// Removes one event and drops its id from every section. Events nested in a removed
    /// fragment stay in the model at top level.
    RemoveEvent {
        event_id: EventId,
    },
    ReorderEvents {
        from_index: usize,
        to_index: usize,
    },
    AddFragmentSection {
        fragment_id: EventId,
        label: String,
    },
    /// Events of the removed section fall back to top level. The last section cannot be removed.
    RemoveFragmentSection {
        fragment_id: EventId,
        section_index: usize,
    },
    /// Appends the event to the section, detaching it from any other section first.
    MoveEventToFragment {
        event_id: EventId,
        fragment_id: EventId,
        section_index: usize,
    },
    MoveEventOutOfFragment {
        event_id: EventId,
        fragment_id: EventId,
        section_index: usize,
    },
    AddActivation {
        activation_id: Option<ActivationId>,
        participant_id: ParticipantId,
        start_event_index: i64,
        end_event_index: i64,
    },
    UpdateActivation {
        activation_id: ActivationId,
        patch: SeqActivationPatch,
    },
    RemoveActivation {
        activation_id: ActivationId,
    },
    SetAutoNumber {
        enabled: bool,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeqParticipantPatch {
    pub alias: Option<String>,
    pub kind: Option<ParticipantKind>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeqMessagePatch {
    pub from: Option<ParticipantId>,
    pub to: Option<ParticipantId>,
    pub arrow: Option<ArrowKind>,
    pub label: Option<String>,
    pub activate_target: Option<bool>,
    pub deactivate_source: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeqNotePatch {
    pub position: Option<NotePosition>,
    pub participants: Option<Vec<ParticipantId>>,
    pub text: Option<String>,
}

/// `color: Some(None)` clears the color.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeqFragmentPatch {
    pub kind: Option<FragmentKind>,
    pub label: Option<String>,
    pub color: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeqActivationPatch {
    pub participant_id: Option<ParticipantId>,
    pub start_event_index: Option<i64>,
    pub end_event_index: Option<i64>,
}

/// A model object touched by an op.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectRef {
    Node(NodeId),
    Edge(EdgeId),
    Participant(ParticipantId),
    Event(EventId),
    Activation(ActivationId),
}

impl ObjectRef {
    pub fn kind(&self) -> IdKind {
        match self {
            Self::Node(_) => IdKind::Node,
            Self::Edge(_) => IdKind::Edge,
            Self::Participant(_) => IdKind::Participant,
            Self::Event(_) => IdKind::Event,
            Self::Activation(_) => IdKind::Activation,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Node(id) => id.as_str(),
            Self::Edge(id) => id.as_str(),
            Self::Participant(id) => id.as_str(),
            Self::Event(id) => id.as_str(),
            Self::Activation(id) => id.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub applied: usize,
    pub delta: Delta,
}

/// Objects changed by a batch, each list sorted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<ObjectRef>,
    pub removed: Vec<ObjectRef>,
    pub updated: Vec<ObjectRef>,
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: HashSet<ObjectRef>,
    removed: HashSet<ObjectRef>,
    updated: HashSet<ObjectRef>,
}

impl DeltaBuilder {
    fn record_added(&mut self, object_ref: ObjectRef) {
        self.removed.remove(&object_ref);
        self.updated.remove(&object_ref);
        self.added.insert(object_ref);
    }

    fn record_removed(&mut self, object_ref: ObjectRef) {
        // Added and removed within one batch: nothing to report.
        if self.added.remove(&object_ref) {
            return;
        }
        self.updated.remove(&object_ref);
        self.removed.insert(object_ref);
    }

    fn record_updated(&mut self, object_ref: ObjectRef) {
        if self.added.contains(&object_ref) || self.removed.contains(&object_ref) {
            return;
        }
        self.updated.insert(object_ref);
    }

    fn finish(self) -> Delta {
        let sorted = |set: HashSet<ObjectRef>| {
            let mut refs = set.into_iter().collect::<Vec<_>>();
            refs.sort();
            refs
        };
        Delta {
            added: sorted(self.added),
            removed: sorted(self.removed),
            updated: sorted(self.updated),
        }
    }
}

/// Applies `ops` in order. On error neither the model nor the allocator is changed.
pub fn apply_ops(
    diagram: &mut DiagramAst,
    ids: &mut IdAllocator,
    ops: &[Op],
) -> Result<ApplyResult, ApplyError> {
    if ops.is_empty() {
        return Ok(ApplyResult { applied: 0, delta: Delta::default() });
    }

    let mut new_ast = diagram.clone();
    let mut new_ids = ids.clone();
    let mut delta = DeltaBuilder::default();

    for op in ops {
        match op {
            Op::Flow(flow_op) => {
                let DiagramAst::Flowchart(ast) = &mut new_ast else {
                    return Err(ApplyError::KindMismatch {
                        diagram_kind: diagram.kind(),
                        op_kind: OpKind::Flow,
                    });
                };
                apply_flow_op(ast, &mut new_ids, flow_op, &mut delta)?;
            }
            Op::Seq(seq_op) => {
                let DiagramAst::Sequence(ast) = &mut new_ast else {
                    return Err(ApplyError::KindMismatch {
                        diagram_kind: diagram.kind(),
                        op_kind: OpKind::Seq,
                    });
                };
                apply_seq_op(ast, &mut new_ids, seq_op, &mut delta)?;
            }
        }
    }

    *diagram = new_ast;
    *ids = new_ids;
    tracing::debug!(applied = ops.len(), "ops applied");
    Ok(ApplyResult { applied: ops.len(), delta: delta.finish() })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Flow,
    Seq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Message,
    Note,
    Fragment,
}

impl EventKind {
    fn of(body: &SeqEventBody) -> Self {
        match body {
            SeqEventBody::Message(_) => Self::Message,
            SeqEventBody::Note(_) => Self::Note,
            SeqEventBody::Fragment(_) => Self::Fragment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    KindMismatch { diagram_kind: DiagramKind, op_kind: OpKind },
    AlreadyExists { kind: IdKind, id: String },
    NotFound { kind: IdKind, id: String },
    WrongEventKind { event_id: EventId, expected: EventKind, found: EventKind },
    InvalidSection { fragment_id: EventId, section_index: usize, section_count: usize },
    IndexOutOfRange { index: usize, len: usize },
    WouldNestIntoItself { event_id: EventId, fragment_id: EventId },
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KindMismatch { diagram_kind, op_kind } => {
                write!(f, "op kind mismatch (diagram_kind={diagram_kind}, op_kind={op_kind:?})")
            }
            Self::AlreadyExists { kind, id } => {
                write!(f, "object already exists ({kind:?}, id={id})")
            }
            Self::NotFound { kind, id } => write!(f, "object not found ({kind:?}, id={id})"),
            Self::WrongEventKind { event_id, expected, found } => {
                write!(f, "event {event_id} is a {found:?}, expected a {expected:?}")
            }
            Self::InvalidSection { fragment_id, section_index, section_count } => write!(
                f,
                "invalid section {section_index} for fragment {fragment_id} ({section_count} sections)"
            ),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range (len={len})")
            }
            Self::WouldNestIntoItself { event_id, fragment_id } => {
                write!(f, "moving {event_id} into {fragment_id} would nest it into itself")
            }
        }
    }
}

impl std::error::Error for ApplyError {}

// Extracted op-application implementation for flowchart/sequence mutations.
include!("ops_impl.rs");
