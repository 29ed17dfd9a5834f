// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-MermaidCanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-canvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Flowchart/sequence mutation helpers used by `apply_ops`.
/// Keeps `ops::mod` focused on public op types and orchestration.
fn not_found<T>(kind: IdKind, id: &crate::model::Id<T>) -> ApplyError {
    ApplyError::NotFound { kind, id: id.as_str().to_owned() }
}

fn already_exists<T>(kind: IdKind, id: &crate::model::Id<T>) -> ApplyError {
    ApplyError::AlreadyExists { kind, id: id.as_str().to_owned() }
}

fn ensure_flow_node(ast: &FlowchartAst, node_id: &NodeId) -> Result<(), ApplyError> {
    match ast.node(node_id) {
        Some(_) => Ok(()),
        None => Err(not_found(IdKind::Node, node_id)),
    }
}

fn move_within<T>(items: &mut Vec<T>, from_index: usize, to_index: usize) -> Result<(), ApplyError> {
    let len = items.len();
    if from_index >= len {
        return Err(ApplyError::IndexOutOfRange { index: from_index, len });
    }
    if to_index >= len {
        return Err(ApplyError::IndexOutOfRange { index: to_index, len });
    }
    let item = items.remove(from_index);
    items.insert(to_index, item);
    Ok(())
}

fn apply_flow_op(
    ast: &mut FlowchartAst,
    ids: &mut IdAllocator,
    op: &FlowOp,
    delta: &mut DeltaBuilder,
) -> Result<(), ApplyError> {
    match op {
        FlowOp::AddNode { node_id, label, shape } => {
            let node_id = match node_id {
                Some(node_id) if ast.node(node_id).is_some() => {
                    return Err(already_exists(IdKind::Node, node_id));
                }
                Some(node_id) => node_id.clone(),
                None => ids.next_node_id(),
            };
            ast.nodes_mut()
                .push(FlowNode::new_with(node_id.clone(), label.clone(), *shape));
            delta.record_added(ObjectRef::Node(node_id));
            Ok(())
        }
        FlowOp::UpdateNode { node_id, patch } => {
            let Some(node) = ast.node_mut(node_id) else {
                return Err(not_found(IdKind::Node, node_id));
            };
            if let Some(label) = &patch.label {
                node.set_label(label.clone());
            }
            if let Some(shape) = patch.shape {
                node.set_shape(shape);
            }
            delta.record_updated(ObjectRef::Node(node_id.clone()));
            Ok(())
        }
        FlowOp::RemoveNode { node_id } => {
            ensure_flow_node(ast, node_id)?;
            ast.nodes_mut().retain(|node| node.id() != node_id);

            let removed_edge_ids = ast
                .edges()
                .iter()
                .filter(|edge| edge.touches(node_id))
                .map(|edge| edge.id().clone())
                .collect::<Vec<_>>();
            ast.edges_mut().retain(|edge| !edge.touches(node_id));
            for edge_id in removed_edge_ids {
                delta.record_removed(ObjectRef::Edge(edge_id));
            }
            delta.record_removed(ObjectRef::Node(node_id.clone()));
            Ok(())
        }
        FlowOp::AddEdge { edge_id, source, target, style, label } => {
            ensure_flow_node(ast, source)?;
            ensure_flow_node(ast, target)?;
            let edge_id = match edge_id {
                Some(edge_id) if ast.edge(edge_id).is_some() => {
                    return Err(already_exists(IdKind::Edge, edge_id));
                }
                Some(edge_id) => edge_id.clone(),
                None => ids.next_edge_id(),
            };
            ast.edges_mut().push(FlowEdge::new_with(
                edge_id.clone(),
                source.clone(),
                target.clone(),
                *style,
                label.clone(),
            ));
            delta.record_added(ObjectRef::Edge(edge_id));
            Ok(())
        }
        FlowOp::UpdateEdge { edge_id, patch } => {
            if ast.edge(edge_id).is_none() {
                return Err(not_found(IdKind::Edge, edge_id));
            }
            for endpoint in [&patch.source, &patch.target].into_iter().flatten() {
                ensure_flow_node(ast, endpoint)?;
            }

            let Some(edge) = ast.edge_mut(edge_id) else {
                return Err(not_found(IdKind::Edge, edge_id));
            };
            if let Some(source) = &patch.source {
                edge.set_source(source.clone());
            }
            if let Some(target) = &patch.target {
                edge.set_target(target.clone());
            }
            if let Some(style) = patch.style {
                edge.set_style(style);
            }
            if let Some(label) = &patch.label {
                edge.set_label(label.clone());
            }
            delta.record_updated(ObjectRef::Edge(edge_id.clone()));
            Ok(())
        }
        FlowOp::RemoveEdge { edge_id } => {
            let before_len = ast.edges().len();
            ast.edges_mut().retain(|edge| edge.id() != edge_id);
            if ast.edges().len() == before_len {
                return Err(not_found(IdKind::Edge, edge_id));
            }
            delta.record_removed(ObjectRef::Edge(edge_id.clone()));
            Ok(())
        }
        FlowOp::SetDirection { direction } => {
            ast.set_direction(*direction);
            Ok(())
        }
    }
}

fn ensure_participants<'a>(
    ast: &SequenceAst,
    participant_ids: impl IntoIterator<Item = &'a ParticipantId>,
) -> Result<(), ApplyError> {
    for participant_id in participant_ids {
        if ast.participant(participant_id).is_none() {
            return Err(not_found(IdKind::Participant, participant_id));
        }
    }
    Ok(())
}

fn allocate_event_id(
    ast: &SequenceAst,
    ids: &mut IdAllocator,
    event_id: &Option<EventId>,
) -> Result<EventId, ApplyError> {
    match event_id {
        Some(event_id) if ast.event(event_id).is_some() => {
            Err(already_exists(IdKind::Event, event_id))
        }
        Some(event_id) => Ok(event_id.clone()),
        None => Ok(ids.next_event_id()),
    }
}

/// The event body for `event_id`, checked to be of kind `expected`.
fn event_body_mut<'a>(
    ast: &'a mut SequenceAst,
    event_id: &EventId,
    expected: EventKind,
) -> Result<&'a mut SeqEventBody, ApplyError> {
    let Some(event) = ast.event_mut(event_id) else {
        return Err(not_found(IdKind::Event, event_id));
    };
    let found = EventKind::of(event.body());
    if found != expected {
        return Err(ApplyError::WrongEventKind { event_id: event_id.clone(), expected, found });
    }
    Ok(event.body_mut())
}

fn fragment_mut<'a>(
    ast: &'a mut SequenceAst,
    fragment_id: &EventId,
) -> Result<&'a mut Fragment, ApplyError> {
    match event_body_mut(ast, fragment_id, EventKind::Fragment)? {
        SeqEventBody::Fragment(fragment) => Ok(fragment),
        SeqEventBody::Message(_) | SeqEventBody::Note(_) => {
            Err(not_found(IdKind::Event, fragment_id))
        }
    }
}

fn section_mut<'a>(
    ast: &'a mut SequenceAst,
    fragment_id: &EventId,
    section_index: usize,
) -> Result<&'a mut Section, ApplyError> {
    let fragment = fragment_mut(ast, fragment_id)?;
    let section_count = fragment.sections().len();
    fragment
        .sections_mut()
        .get_mut(section_index)
        .ok_or_else(|| ApplyError::InvalidSection {
            fragment_id: fragment_id.clone(),
            section_index,
            section_count,
        })
}

fn remove_events_where(
    ast: &mut SequenceAst,
    delta: &mut DeltaBuilder,
    mut doomed: impl FnMut(&SeqEvent) -> bool,
) {
    let removed = ast
        .events()
        .iter()
        .filter(|event| doomed(event))
        .map(|event| event.id().clone())
        .collect::<Vec<_>>();
    ast.events_mut().retain(|event| !removed.contains(event.id()));
    for event_id in removed {
        ast.detach_from_sections(&event_id);
        delta.record_removed(ObjectRef::Event(event_id));
    }
}

fn apply_seq_op(
    ast: &mut SequenceAst,
    ids: &mut IdAllocator,
    op: &SeqOp,
    delta: &mut DeltaBuilder,
) -> Result<(), ApplyError> {
    match op {
        SeqOp::AddParticipant { participant_id, alias, kind } => {
            let participant_id = match participant_id {
                Some(participant_id) if ast.participant(participant_id).is_some() => {
                    return Err(already_exists(IdKind::Participant, participant_id));
                }
                Some(participant_id) => participant_id.clone(),
                None => ids.next_participant_id(),
            };
            ast.participants_mut().push(Participant::new_with(
                participant_id.clone(),
                alias.clone(),
                *kind,
            ));
            delta.record_added(ObjectRef::Participant(participant_id));
            Ok(())
        }
        SeqOp::UpdateParticipant { participant_id, patch } => {
            let Some(participant) = ast.participant_mut(participant_id) else {
                return Err(not_found(IdKind::Participant, participant_id));
            };
            if let Some(alias) = &patch.alias {
                participant.set_alias(alias.clone());
            }
            if let Some(kind) = patch.kind {
                participant.set_kind(kind);
            }
            delta.record_updated(ObjectRef::Participant(participant_id.clone()));
            Ok(())
        }
        SeqOp::RemoveParticipant { participant_id } => {
            ensure_participants(ast, [participant_id])?;
            ast.participants_mut().retain(|p| p.id() != participant_id);

            remove_events_where(ast, delta, |event| event.references_participant(participant_id));

            let removed_activation_ids = ast
                .activations()
                .iter()
                .filter(|a| a.participant_id() == participant_id)
                .map(|a| a.id().clone())
                .collect::<Vec<_>>();
            ast.activations_mut().retain(|a| a.participant_id() != participant_id);
            for activation_id in removed_activation_ids {
                delta.record_removed(ObjectRef::Activation(activation_id));
            }

            delta.record_removed(ObjectRef::Participant(participant_id.clone()));
            Ok(())
        }
        SeqOp::ReorderParticipants { from_index, to_index } => {
            move_within(ast.participants_mut(), *from_index, *to_index)?;
            if let Some(participant) = ast.participants().get(*to_index) {
                delta.record_updated(ObjectRef::Participant(participant.id().clone()));
            }
            Ok(())
        }
        SeqOp::AddMessage { event_id, from, to, arrow, label } => {
            ensure_participants(ast, [from, to])?;
            let event_id = allocate_event_id(ast, ids, event_id)?;
            ast.events_mut().push(SeqEvent::message(
                event_id.clone(),
                Message::new(from.clone(), to.clone(), *arrow, label.clone()),
            ));
            delta.record_added(ObjectRef::Event(event_id));
            Ok(())
        }
        SeqOp::UpdateMessage { event_id, patch } => {
            ensure_participants(ast, [&patch.from, &patch.to].into_iter().flatten())?;
            let SeqEventBody::Message(message) = event_body_mut(ast, event_id, EventKind::Message)?
            else {
                return Err(not_found(IdKind::Event, event_id));
            };
            if let Some(from) = &patch.from {
                message.set_from(from.clone());
            }
            if let Some(to) = &patch.to {
                message.set_to(to.clone());
            }
            if let Some(arrow) = patch.arrow {
                message.set_arrow(arrow);
            }
            if let Some(label) = &patch.label {
                message.set_label(label.clone());
            }
            if let Some(activate_target) = patch.activate_target {
                message.set_activate_target(activate_target);
            }
            if let Some(deactivate_source) = patch.deactivate_source {
                message.set_deactivate_source(deactivate_source);
            }
            delta.record_updated(ObjectRef::Event(event_id.clone()));
            Ok(())
        }
        SeqOp::AddNote { event_id, position, participants, text } => {
            ensure_participants(ast, participants)?;
            let event_id = allocate_event_id(ast, ids, event_id)?;
            ast.events_mut().push(SeqEvent::note(
                event_id.clone(),
                Note::new(*position, participants.clone(), text.clone()),
            ));
            delta.record_added(ObjectRef::Event(event_id));
            Ok(())
        }
        SeqOp::UpdateNote { event_id, patch } => {
            if let Some(participants) = &patch.participants {
                ensure_participants(ast, participants)?;
            }
            let SeqEventBody::Note(note) = event_body_mut(ast, event_id, EventKind::Note)? else {
                return Err(not_found(IdKind::Event, event_id));
            };
            if let Some(position) = patch.position {
                note.set_position(position);
            }
            if let Some(participants) = &patch.participants {
                note.set_participants(participants.clone());
            }
            if let Some(text) = &patch.text {
                note.set_text(text.clone());
            }
            delta.record_updated(ObjectRef::Event(event_id.clone()));
            Ok(())
        }
        SeqOp::AddFragment { event_id, kind, label } => {
            let event_id = allocate_event_id(ast, ids, event_id)?;
            ast.events_mut().push(SeqEvent::fragment(
                event_id.clone(),
                Fragment::new(*kind, label.clone(), vec![Section::new("")]),
            ));
            delta.record_added(ObjectRef::Event(event_id));
            Ok(())
        }
        SeqOp::UpdateFragment { event_id, patch } => {
            let fragment = fragment_mut(ast, event_id)?;
            if let Some(kind) = patch.kind {
                fragment.set_kind(kind);
            }
            if let Some(label) = &patch.label {
                fragment.set_label(label.clone());
            }
            if let Some(color) = &patch.color {
                fragment.set_color(color.clone());
            }
            delta.record_updated(ObjectRef::Event(event_id.clone()));
            Ok(())
        }
        SeqOp::RemoveEvent { event_id } => {
            if ast.event(event_id).is_none() {
                return Err(not_found(IdKind::Event, event_id));
            }
            remove_events_where(ast, delta, |event| event.id() == event_id);
            Ok(())
        }
        SeqOp::ReorderEvents { from_index, to_index } => {
            move_within(ast.events_mut(), *from_index, *to_index)?;
            if let Some(event) = ast.events().get(*to_index) {
                delta.record_updated(ObjectRef::Event(event.id().clone()));
            }
            Ok(())
        }
        SeqOp::AddFragmentSection { fragment_id, label } => {
            fragment_mut(ast, fragment_id)?
                .sections_mut()
                .push(Section::new(label.clone()));
            delta.record_updated(ObjectRef::Event(fragment_id.clone()));
            Ok(())
        }
        SeqOp::RemoveFragmentSection { fragment_id, section_index } => {
            let fragment = fragment_mut(ast, fragment_id)?;
            let section_count = fragment.sections().len();
            if *section_index >= section_count || section_count == 1 {
                return Err(ApplyError::InvalidSection {
                    fragment_id: fragment_id.clone(),
                    section_index: *section_index,
                    section_count,
                });
            }
            fragment.sections_mut().remove(*section_index);
            delta.record_updated(ObjectRef::Event(fragment_id.clone()));
            Ok(())
        }
        SeqOp::MoveEventToFragment { event_id, fragment_id, section_index } => {
            if ast.event(event_id).is_none() {
                return Err(not_found(IdKind::Event, event_id));
            }
            if ast.fragment_contains(event_id, fragment_id) {
                return Err(ApplyError::WouldNestIntoItself {
                    event_id: event_id.clone(),
                    fragment_id: fragment_id.clone(),
                });
            }
            // Validate the target before detaching.
            section_mut(ast, fragment_id, *section_index)?;

            let previous = ast
                .containing_section(event_id)
                .map(|(owner, _)| owner.clone());
            ast.detach_from_sections(event_id);
            section_mut(ast, fragment_id, *section_index)?
                .event_ids_mut()
                .push(event_id.clone());

            if let Some(previous) = previous {
                delta.record_updated(ObjectRef::Event(previous));
            }
            delta.record_updated(ObjectRef::Event(fragment_id.clone()));
            Ok(())
        }
        SeqOp::MoveEventOutOfFragment { event_id, fragment_id, section_index } => {
            let section = section_mut(ast, fragment_id, *section_index)?;
            if !section.contains(event_id) {
                return Err(not_found(IdKind::Event, event_id));
            }
            section.event_ids_mut().retain(|id| id != event_id);
            delta.record_updated(ObjectRef::Event(fragment_id.clone()));
            Ok(())
        }
        SeqOp::AddActivation {
            activation_id,
            participant_id,
            start_event_index,
            end_event_index,
        } => {
            ensure_participants(ast, [participant_id])?;
            let activation_id = match activation_id {
                Some(activation_id) if ast.activation(activation_id).is_some() => {
                    return Err(already_exists(IdKind::Activation, activation_id));
                }
                Some(activation_id) => activation_id.clone(),
                None => ids.next_activation_id(),
            };
            ast.activations_mut().push(Activation::new(
                activation_id.clone(),
                participant_id.clone(),
                *start_event_index,
                *end_event_index,
            ));
            delta.record_added(ObjectRef::Activation(activation_id));
            Ok(())
        }
        SeqOp::UpdateActivation { activation_id, patch } => {
            if let Some(participant_id) = &patch.participant_id {
                ensure_participants(ast, [participant_id])?;
            }
            let Some(activation) = ast.activation_mut(activation_id) else {
                return Err(not_found(IdKind::Activation, activation_id));
            };
            if let Some(participant_id) = &patch.participant_id {
                activation.set_participant_id(participant_id.clone());
            }
            if let Some(start_event_index) = patch.start_event_index {
                activation.set_start_event_index(start_event_index);
            }
            if let Some(end_event_index) = patch.end_event_index {
                activation.set_end_event_index(end_event_index);
            }
            delta.record_updated(ObjectRef::Activation(activation_id.clone()));
            Ok(())
        }
        SeqOp::RemoveActivation { activation_id } => {
            let before_len = ast.activations().len();
            ast.activations_mut().retain(|a| a.id() != activation_id);
            if ast.activations().len() == before_len {
                return Err(not_found(IdKind::Activation, activation_id));
            }
            delta.record_removed(ObjectRef::Activation(activation_id.clone()));
            Ok(())
        }
        SeqOp::SetAutoNumber { enabled } => {
            ast.set_auto_number(*enabled);
            Ok(())
        }
    }
}
