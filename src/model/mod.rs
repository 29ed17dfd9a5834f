// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-MermaidCanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-canvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model and AST types.
//!
//! A diagram is either a flowchart (nodes + edges) or a sequence diagram (participants, a flat
//! event list with fragment sections referencing events by id, and activations).

pub mod diagram;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod flow_ast;
pub mod ids;
pub mod seq_ast;

pub use diagram::{DiagramAst, DiagramKind};
pub use flow_ast::{EdgeStyle, FlowDirection, FlowEdge, FlowNode, FlowchartAst, NodeShape};
pub use ids::{
    ActivationId, EdgeId, EventId, Id, IdAllocator, IdKind, NodeId, ParticipantId,
};
pub use seq_ast::{
    Activation, ArrowKind, Fragment, FragmentKind, Message, Note, NotePosition, Participant,
    ParticipantKind, Section, SeqEvent, SeqEventBody, SequenceAst, DEFAULT_RECT_COLOR,
};
