// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-MermaidCanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-canvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::model::ids::{ActivationId, EventId, ParticipantId};
use crate::model::seq_ast::{
    ArrowKind, Fragment, FragmentKind, Message, Note, NotePosition, ParticipantKind, SeqEvent,
    SeqEventBody, SequenceAst,
};

/// Pixel constants used by [`compute_layout_with`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceLayoutConfig {
    pub participant_width: f64,
    pub participant_height: f64,
    pub participant_gap: f64,
    pub row_height: f64,
    pub activation_width: f64,
    pub note_width: f64,
    pub note_line_height: f64,
    pub note_padding: f64,
    pub fragment_padding: f64,
    pub fragment_header_height: f64,
    pub fragment_section_gap: f64,
    pub margin_top: f64,
    pub margin_left: f64,
    pub margin_bottom: f64,
    pub self_message_width: f64,
    pub self_message_height: f64,
    /// Vertical gap after each note and fragment.
    pub block_gap: f64,
    /// Gap between the top participant row and the first event.
    pub lifeline_start_gap: f64,
}

impl Default for SequenceLayoutConfig {
    fn default() -> Self {
        Self {
            participant_width: 120.0,
            participant_height: 40.0,
            participant_gap: 60.0,
            row_height: 50.0,
            activation_width: 12.0,
            note_width: 140.0,
            note_line_height: 18.0,
            note_padding: 8.0,
            fragment_padding: 16.0,
            fragment_header_height: 24.0,
            fragment_section_gap: 8.0,
            margin_top: 20.0,
            margin_left: 40.0,
            margin_bottom: 40.0,
            self_message_width: 40.0,
            self_message_height: 30.0,
            block_gap: 10.0,
            lifeline_start_gap: 20.0,
        }
    }
}

/// Absolute geometry for one sequence diagram.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceLayout {
    width: f64,
    height: f64,
    participants: Vec<ParticipantLayout>,
    lifelines: Vec<LifelineLayout>,
    messages: Vec<MessageLayout>,
    notes: Vec<NoteLayout>,
    fragments: Vec<FragmentLayout>,
    activations: Vec<ActivationLayout>,
}

impl SequenceLayout {
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn participants(&self) -> &[ParticipantLayout] {
        &self.participants
    }

    pub fn lifelines(&self) -> &[LifelineLayout] {
        &self.lifelines
    }

    pub fn messages(&self) -> &[MessageLayout] {
        &self.messages
    }

    pub fn notes(&self) -> &[NoteLayout] {
        &self.notes
    }

    pub fn fragments(&self) -> &[FragmentLayout] {
        &self.fragments
    }

    pub fn activations(&self) -> &[ActivationLayout] {
        &self.activations
    }

    pub fn participant(&self, participant_id: &ParticipantId) -> Option<&ParticipantLayout> {
        self.participants.iter().find(|p| p.participant_id == *participant_id)
    }

    pub fn message(&self, event_id: &EventId) -> Option<&MessageLayout> {
        self.messages.iter().find(|m| m.event_id == *event_id)
    }

    pub fn note(&self, event_id: &EventId) -> Option<&NoteLayout> {
        self.notes.iter().find(|n| n.event_id == *event_id)
    }

    pub fn fragment(&self, event_id: &EventId) -> Option<&FragmentLayout> {
        self.fragments.iter().find(|f| f.event_id == *event_id)
    }
}

/// A participant box. The same `x` is used for the top and the bottom row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantLayout {
    participant_id: ParticipantId,
    alias: String,
    kind: ParticipantKind,
    x: f64,
    top_y: f64,
    bottom_y: f64,
    width: f64,
    height: f64,
}

impl ParticipantLayout {
    pub fn participant_id(&self) -> &ParticipantId {
        &self.participant_id
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn kind(&self) -> ParticipantKind {
        self.kind
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn top_y(&self) -> f64 {
        self.top_y
    }

    pub fn bottom_y(&self) -> f64 {
        self.bottom_y
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifelineLayout {
    participant_id: ParticipantId,
    x: f64,
    y1: f64,
    y2: f64,
}

impl LifelineLayout {
    pub fn participant_id(&self) -> &ParticipantId {
        &self.participant_id
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y1(&self) -> f64 {
        self.y1
    }

    pub fn y2(&self) -> f64 {
        self.y2
    }
}

/// A message arrow at height `y` from `from_x` to `to_x` (lifeline centers).
///
/// Self-messages loop out to the right by the configured width and come back
/// `self_loop_height` lower.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageLayout {
    event_id: EventId,
    from_x: f64,
    to_x: f64,
    y: f64,
    label: String,
    arrow: ArrowKind,
    self_loop_height: Option<f64>,
    number: Option<usize>,
    depth: usize,
}

impl MessageLayout {
    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }

    pub fn from_x(&self) -> f64 {
        self.from_x
    }

    pub fn to_x(&self) -> f64 {
        self.to_x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn arrow(&self) -> ArrowKind {
        self.arrow
    }

    pub fn is_self_message(&self) -> bool {
        self.self_loop_height.is_some()
    }

    pub fn self_loop_height(&self) -> Option<f64> {
        self.self_loop_height
    }

    /// 1-based message number when autonumbering is on.
    pub fn number(&self) -> Option<usize> {
        self.number
    }

    /// Fragment nesting depth; `0` for top-level messages.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteLayout {
    event_id: EventId,
    position: NotePosition,
    text: String,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    depth: usize,
}

impl NoteLayout {
    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }

    pub fn position(&self) -> NotePosition {
        self.position
    }

    pub fn text(&self) -> &str {
        &self.text
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

    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Fragment box. `section_divider_ys` holds one y per section boundary (sections - 1 entries).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentLayout {
    event_id: EventId,
    kind: FragmentKind,
    label: String,
    color: Option<String>,
    section_labels: Vec<String>,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    section_divider_ys: Vec<f64>,
    depth: usize,
}

impl FragmentLayout {
    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }

    pub fn kind(&self) -> FragmentKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn section_labels(&self) -> &[String] {
        &self.section_labels
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

    pub fn section_divider_ys(&self) -> &[f64] {
        &self.section_divider_ys
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Activation bar. `level` counts earlier bars on the same lifeline that overlap this one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationLayout {
    activation_id: ActivationId,
    participant_id: ParticipantId,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    level: usize,
}

impl ActivationLayout {
    pub fn activation_id(&self) -> &ActivationId {
        &self.activation_id
    }

    pub fn participant_id(&self) -> &ParticipantId {
        &self.participant_id
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

    pub fn level(&self) -> usize {
        self.level
    }
}

struct LayoutPass<'a> {
    ast: &'a SequenceAst,
    config: &'a SequenceLayoutConfig,
    by_id: HashMap<&'a EventId, &'a SeqEvent>,
    centers: HashMap<&'a ParticipantId, f64>,
    visited: BTreeSet<&'a EventId>,
    cursor: f64,
    message_count: usize,
    indexed_ys: Vec<f64>,
    messages: Vec<MessageLayout>,
    notes: Vec<NoteLayout>,
    fragments: Vec<FragmentLayout>,
}

impl<'a> LayoutPass<'a> {
    fn column_left(&self, index: usize) -> f64 {
        let config = self.config;
        config.margin_left + index as f64 * (config.participant_width + config.participant_gap)
    }

    fn center_of(&self, participant_id: &ParticipantId) -> Option<f64> {
        self.centers.get(participant_id).copied()
    }

    fn place_event(&mut self, event: &'a SeqEvent, depth: usize) {
        if !self.visited.insert(event.id()) {
            return;
        }
        match event.body() {
            SeqEventBody::Message(message) => self.place_message(event.id(), message, depth),
            SeqEventBody::Note(note) => self.place_note(event.id(), note, depth),
            SeqEventBody::Fragment(fragment) => self.place_fragment(event.id(), fragment, depth),
        }
    }

    fn place_message(&mut self, event_id: &EventId, message: &Message, depth: usize) {
        let config = self.config;
        let y = self.cursor + config.row_height / 2.0;
        self.indexed_ys.push(y);
        self.message_count += 1;

        self.cursor += config.row_height;
        let self_loop_height = message.is_self_message().then_some(config.self_message_height);
        if let Some(extra) = self_loop_height {
            self.cursor += extra;
        }

        let (Some(from_x), Some(to_x)) = (self.center_of(message.from()), self.center_of(message.to()))
        else {
            debug!(event_id = %event_id, "message references unknown participant; not laid out");
            return;
        };
        self.messages.push(MessageLayout {
            event_id: event_id.clone(),
            from_x,
            to_x,
            y,
            label: message.label().to_owned(),
            arrow: message.arrow(),
            self_loop_height,
            number: self.ast.auto_number().then_some(self.message_count),
            depth,
        });
    }

    fn note_span(&self, note: &Note) -> (f64, f64) {
        let config = self.config;
        let centers = note
            .participants()
            .iter()
            .filter_map(|id| self.center_of(id))
            .collect::<Vec<_>>();
        let Some(&first) = centers.first() else {
            return (config.margin_left, config.note_width);
        };

        match note.position() {
            NotePosition::LeftOf => (
                first - config.activation_width / 2.0 - config.note_width,
                config.note_width,
            ),
            NotePosition::RightOf => (first + config.activation_width / 2.0, config.note_width),
            NotePosition::Over => {
                let lo = centers.iter().copied().fold(first, f64::min);
                let hi = centers.iter().copied().fold(first, f64::max);
                (lo - config.note_width / 2.0, hi - lo + config.note_width)
            }
        }
    }

    fn place_note(&mut self, event_id: &EventId, note: &Note, depth: usize) {
        let config = self.config;
        let y = self.cursor;
        self.indexed_ys.push(y);

        let lines = note.text().lines().count().max(1);
        let height = lines as f64 * config.note_line_height + 2.0 * config.note_padding;
        let (x, width) = self.note_span(note);
        self.notes.push(NoteLayout {
            event_id: event_id.clone(),
            position: note.position(),
            text: note.text().to_owned(),
            x,
            y,
            width,
            height,
            depth,
        });
        self.cursor += height + config.block_gap;
    }

    /// Participants mentioned by any message or note anywhere inside `fragment`.
    fn fragment_participants(
        &self,
        fragment: &'a Fragment,
        seen: &mut BTreeSet<&'a EventId>,
        out: &mut Vec<&'a ParticipantId>,
    ) {
        for section in fragment.sections() {
            for child_id in section.event_ids() {
                let Some(&child) = self.by_id.get(child_id) else {
                    continue;
                };
                if !seen.insert(child.id()) {
                    continue;
                }
                match child.body() {
                    SeqEventBody::Message(message) => {
                        out.push(message.from());
                        out.push(message.to());
                    }
                    SeqEventBody::Note(note) => out.extend(note.participants()),
                    SeqEventBody::Fragment(inner) => self.fragment_participants(inner, seen, out),
                }
            }
        }
    }

    fn fragment_span(&self, fragment: &'a Fragment) -> (f64, f64) {
        let config = self.config;
        let mut referenced = Vec::new();
        self.fragment_participants(fragment, &mut BTreeSet::new(), &mut referenced);

        let mut indices = referenced
            .into_iter()
            .filter_map(|id| self.ast.participant_index(id))
            .collect::<Vec<_>>();
        if indices.is_empty() {
            indices = (0..self.ast.participants().len()).collect();
        }

        let (Some(&lo), Some(&hi)) = (indices.iter().min(), indices.iter().max()) else {
            return (
                config.margin_left - config.fragment_padding,
                2.0 * config.fragment_padding,
            );
        };
        let left = self.column_left(lo) - config.fragment_padding;
        let right = self.column_left(hi) + config.participant_width + config.fragment_padding;
        (left, right - left)
    }

    /// Header, then each section's nested rows (one row when empty). Later sections are
    /// preceded by a gap and their own header; the divider sits after the gap.
    fn place_fragment(&mut self, event_id: &EventId, fragment: &'a Fragment, depth: usize) {
        let config = self.config;
        let slot = self.fragments.len();
        let (x, width) = self.fragment_span(fragment);
        let y = self.cursor;
        self.cursor += config.fragment_header_height;

        let mut section_divider_ys = Vec::new();
        for (section_index, section) in fragment.sections().iter().enumerate() {
            if section_index > 0 {
                self.cursor += config.fragment_section_gap;
                section_divider_ys.push(self.cursor);
                self.cursor += config.fragment_header_height;
            }
            let section_start = self.cursor;
            for child_id in section.event_ids() {
                if let Some(&child) = self.by_id.get(child_id) {
                    self.place_event(child, depth + 1);
                }
            }
            if self.cursor == section_start {
                self.cursor += config.row_height;
            }
        }

        self.fragments.insert(
            slot,
            FragmentLayout {
                event_id: event_id.clone(),
                kind: fragment.kind(),
                label: fragment.label().to_owned(),
                color: fragment.color().map(str::to_owned),
                section_labels: fragment.sections().iter().map(|s| s.label().to_owned()).collect(),
                x,
                y,
                width,
                height: self.cursor - y,
                section_divider_ys,
                depth,
            },
        );
        self.cursor += config.block_gap;
    }

    fn activations(&self) -> Vec<ActivationLayout> {
        let config = self.config;
        let resolve = |index: i64| usize::try_from(index).ok().and_then(|i| self.indexed_ys.get(i));

        let mut placed = Vec::<(&ParticipantId, f64, f64)>::new();
        let mut out = Vec::new();
        for activation in self.ast.activations() {
            let (Some(&y1), Some(&y2), Some(center)) = (
                resolve(activation.start_event_index()),
                resolve(activation.end_event_index()),
                self.center_of(activation.participant_id()),
            ) else {
                debug!(activation_id = %activation.id(), "activation not resolvable; omitted");
                continue;
            };
            if y2 < y1 {
                debug!(activation_id = %activation.id(), "activation ends before it starts; omitted");
                continue;
            }

            let participant_id = activation.participant_id();
            let level = placed
                .iter()
                .filter(|(id, start, end)| *id == participant_id && *start <= y2 && y1 <= *end)
                .count();
            placed.push((participant_id, y1, y2));

            out.push(ActivationLayout {
                activation_id: activation.id().clone(),
                participant_id: participant_id.clone(),
                x: center - config.activation_width / 2.0
                    + level as f64 * config.activation_width / 2.0,
                y: y1,
                width: config.activation_width,
                height: y2 - y1,
                level,
            });
        }
        out
    }
}

/// [`compute_layout_with`] using [`SequenceLayoutConfig::default`].
pub fn compute_layout(ast: &SequenceAst) -> SequenceLayout {
    compute_layout_with(ast, &SequenceLayoutConfig::default())
}

/// Deterministic pixel layout for a sequence diagram.
///
/// - Participants are placed left to right in declaration order.
/// - A vertical cursor walks top-level events in list order and descends into fragment
///   sections where they appear; nested events get their own geometry.
/// - Activation indices count messages and notes in that same order.
///
/// Activations whose start, end or participant cannot be resolved are left out.
pub fn compute_layout_with(ast: &SequenceAst, config: &SequenceLayoutConfig) -> SequenceLayout {
    let mut pass = LayoutPass {
        ast,
        config,
        by_id: ast.event_map(),
        centers: HashMap::new(),
        visited: BTreeSet::new(),
        cursor: config.margin_top + config.participant_height + config.lifeline_start_gap,
        message_count: 0,
        indexed_ys: Vec::new(),
        messages: Vec::new(),
        notes: Vec::new(),
        fragments: Vec::new(),
    };

    for (index, participant) in ast.participants().iter().enumerate() {
        let center = pass.column_left(index) + config.participant_width / 2.0;
        pass.centers.entry(participant.id()).or_insert(center);
    }

    for event in ast.top_level_events() {
        pass.place_event(event, 0);
    }

    let activations = pass.activations();
    let bottom_y = pass.cursor;
    let lifeline_top = config.margin_top + config.participant_height;

    let participants = ast
        .participants()
        .iter()
        .enumerate()
        .map(|(index, participant)| ParticipantLayout {
            participant_id: participant.id().clone(),
            alias: participant.alias().to_owned(),
            kind: participant.kind(),
            x: pass.column_left(index),
            top_y: config.margin_top,
            bottom_y,
            width: config.participant_width,
            height: config.participant_height,
        })
        .collect::<Vec<_>>();

    let lifelines = participants
        .iter()
        .map(|p| LifelineLayout {
            participant_id: p.participant_id.clone(),
            x: p.center_x(),
            y1: lifeline_top,
            y2: bottom_y,
        })
        .collect::<Vec<_>>();

    let columns_right = match participants.last() {
        Some(last) => last.x + last.width + config.margin_left,
        None => 2.0 * config.margin_left,
    };
    let width = pass
        .messages
        .iter()
        .filter(|m| m.is_self_message())
        .map(|m| m.from_x + config.self_message_width + config.margin_left)
        .fold(columns_right, f64::max);
    let height = bottom_y + config.participant_height + config.margin_bottom;

    debug!(
        participants = participants.len(),
        messages = pass.messages.len(),
        notes = pass.notes.len(),
        fragments = pass.fragments.len(),
        activations = activations.len(),
        "sequence layout computed"
    );

    SequenceLayout {
        width,
        height,
        participants,
        lifelines,
        messages: pass.messages,
        notes: pass.notes,
        fragments: pass.fragments,
        activations,
    }
}
