// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-MermaidCanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-canvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::flow_ast::{EdgeStyle, FlowDirection, FlowEdge, FlowNode, FlowchartAst, NodeShape};
use super::ids::{ActivationId, EdgeId, EventId, NodeId, ParticipantId};
use super::seq_ast::{
    Activation, ArrowKind, Fragment, FragmentKind, Message, Note, NotePosition, Participant,
    ParticipantKind, Section, SeqEvent, SequenceAst,
};

fn nid(value: &str) -> NodeId {
    NodeId::new(value)
}

fn pid(value: &str) -> ParticipantId {
    ParticipantId::new(value)
}

fn eid(value: &str) -> EventId {
    EventId::new(value)
}

/// `A -> B, A -> C, B -> D, C -> D`.
pub(crate) fn flowchart_small_dag() -> FlowchartAst {
    let mut ast = FlowchartAst::new(FlowDirection::TB);

    ast.nodes_mut()
        .push(FlowNode::new_with(nid("A"), "Start", NodeShape::Stadium));
    ast.nodes_mut().push(FlowNode::new(nid("B"), "Left"));
    ast.nodes_mut()
        .push(FlowNode::new_with(nid("C"), "Check", NodeShape::Diamond));
    ast.nodes_mut()
        .push(FlowNode::new_with(nid("D"), "Done", NodeShape::Circle));

    ast.edges_mut()
        .push(FlowEdge::new(EdgeId::new("edge_1"), nid("A"), nid("B")));
    ast.edges_mut().push(FlowEdge::new_with(
        EdgeId::new("edge_2"),
        nid("A"),
        nid("C"),
        EdgeStyle::Dotted,
        "maybe",
    ));
    ast.edges_mut()
        .push(FlowEdge::new(EdgeId::new("edge_3"), nid("B"), nid("D")));
    ast.edges_mut().push(FlowEdge::new_with(
        EdgeId::new("edge_4"),
        nid("C"),
        nid("D"),
        EdgeStyle::Thick,
        "",
    ));

    ast
}

/// `A -> B -> C -> A` plus a tail `C -> D`.
pub(crate) fn flowchart_with_cycle() -> FlowchartAst {
    let mut ast = FlowchartAst::new(FlowDirection::LR);
    for id in ["A", "B", "C", "D"] {
        ast.nodes_mut().push(FlowNode::new(nid(id), id));
    }
    for (index, (source, target)) in [("A", "B"), ("B", "C"), ("C", "A"), ("C", "D")]
        .into_iter()
        .enumerate()
    {
        ast.edges_mut().push(FlowEdge::new(
            EdgeId::new(format!("edge_{}", index + 1)),
            nid(source),
            nid(target),
        ));
    }
    ast
}

/// Alice and Bob with a request, a note, a loop fragment holding a retry, and one activation.
pub(crate) fn sequence_login() -> SequenceAst {
    let mut ast = SequenceAst::default();
    ast.participants_mut().push(Participant::new_with(
        pid("participant_1"),
        "Alice",
        ParticipantKind::Actor,
    ));
    ast.participants_mut()
        .push(Participant::new(pid("participant_2"), "Bob"));

    ast.events_mut().push(SeqEvent::message(
        eid("seq_event_1"),
        Message::new(
            pid("participant_1"),
            pid("participant_2"),
            ArrowKind::Solid,
            "login",
        ),
    ));
    ast.events_mut().push(SeqEvent::note(
        eid("seq_event_2"),
        Note::new(
            NotePosition::Over,
            vec![pid("participant_1"), pid("participant_2")],
            "handshake",
        ),
    ));
    ast.events_mut().push(SeqEvent::fragment(
        eid("seq_event_3"),
        Fragment::new(
            FragmentKind::Loop,
            "retry",
            vec![Section::new_with("retry", vec![eid("seq_event_4")])],
        ),
    ));
    ast.events_mut().push(SeqEvent::message(
        eid("seq_event_4"),
        Message::new(
            pid("participant_2"),
            pid("participant_1"),
            ArrowKind::Dotted,
            "token",
        ),
    ));

    ast.activations_mut().push(Activation::new(
        ActivationId::new("activation_1"),
        pid("participant_2"),
        0,
        2,
    ));
    ast
}
