// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-MermaidCanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-canvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeSet, HashMap};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ids::{ActivationId, EventId, ParticipantId};

/// A sequence diagram.
///
/// `events` is flat: every message, note and fragment lives here exactly once. Fragments refer
/// to their contents by id through their sections, so an event id listed in some section is
/// *nested* and everything else is *top level*.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SequenceAst {
    participants: Vec<Participant>,
    events: Vec<SeqEvent>,
    activations: Vec<Activation>,
    #[serde(default)]
    auto_number: bool,
}

impl SequenceAst {
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participants_mut(&mut self) -> &mut Vec<Participant> {
        &mut self.participants
    }

    pub fn events(&self) -> &[SeqEvent] {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut Vec<SeqEvent> {
        &mut self.events
    }

    pub fn activations(&self) -> &[Activation] {
        &self.activations
    }

    pub fn activations_mut(&mut self) -> &mut Vec<Activation> {
        &mut self.activations
    }

    pub fn auto_number(&self) -> bool {
        self.auto_number
    }

    pub fn set_auto_number(&mut self, auto_number: bool) {
        self.auto_number = auto_number;
    }

    pub fn participant(&self, participant_id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id() == participant_id)
    }

    pub fn participant_mut(&mut self, participant_id: &ParticipantId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id() == participant_id)
    }

    pub fn participant_index(&self, participant_id: &ParticipantId) -> Option<usize> {
        self.participants.iter().position(|p| p.id() == participant_id)
    }

    pub fn event(&self, event_id: &EventId) -> Option<&SeqEvent> {
        self.events.iter().find(|event| event.id() == event_id)
    }

    pub fn event_mut(&mut self, event_id: &EventId) -> Option<&mut SeqEvent> {
        self.events.iter_mut().find(|event| event.id() == event_id)
    }

    pub fn event_index(&self, event_id: &EventId) -> Option<usize> {
        self.events.iter().position(|event| event.id() == event_id)
    }

    pub fn activation(&self, activation_id: &ActivationId) -> Option<&Activation> {
        self.activations.iter().find(|a| a.id() == activation_id)
    }

    pub fn activation_mut(&mut self, activation_id: &ActivationId) -> Option<&mut Activation> {
        self.activations.iter_mut().find(|a| a.id() == activation_id)
    }

    /// Lookup table from event id to event.
    pub fn event_map(&self) -> HashMap<&EventId, &SeqEvent> {
        self.events.iter().map(|event| (event.id(), event)).collect()
    }

    /// Every event id referenced from any fragment section.
    ///
    /// Each fragment lives in the flat list, so the union over all fragments already covers
    /// transitively nested ids.
    pub fn nested_event_ids(&self) -> BTreeSet<&EventId> {
        self.events
            .iter()
            .filter_map(|event| event.as_fragment())
            .flat_map(|fragment| fragment.sections())
            .flat_map(|section| section.event_ids())
            .collect()
    }

    /// Events that no fragment section references, in list order.
    pub fn top_level_events(&self) -> Vec<&SeqEvent> {
        let nested = self.nested_event_ids();
        self.events
            .iter()
            .filter(|event| !nested.contains(event.id()))
            .collect()
    }

    /// Events in rendered order: top level first-to-last, descending into fragment sections
    /// where they appear. Each event is yielded at most once, even for cyclic references.
    pub fn events_in_document_order(&self) -> Vec<&SeqEvent> {
        fn visit<'a>(
            event: &'a SeqEvent,
            by_id: &HashMap<&'a EventId, &'a SeqEvent>,
            seen: &mut BTreeSet<&'a EventId>,
            out: &mut Vec<&'a SeqEvent>,
        ) {
            if !seen.insert(event.id()) {
                return;
            }
            out.push(event);
            if let Some(fragment) = event.as_fragment() {
                for section in fragment.sections() {
                    for child_id in section.event_ids() {
                        if let Some(&child) = by_id.get(child_id) {
                            visit(child, by_id, seen, out);
                        }
                    }
                }
            }
        }

        let by_id = self.event_map();
        let mut seen = BTreeSet::new();
        let mut out = Vec::with_capacity(self.events.len());
        for event in self.top_level_events() {
            visit(event, &by_id, &mut seen, &mut out);
        }
        out
    }

    /// Returns the fragment and section index that list `event_id`, if any.
    pub fn containing_section(&self, event_id: &EventId) -> Option<(&EventId, usize)> {
        self.events.iter().find_map(|event| {
            let fragment = event.as_fragment()?;
            fragment
                .sections()
                .iter()
                .position(|section| section.contains(event_id))
                .map(|section_index| (event.id(), section_index))
        })
    }

    /// True when `event_id` is `fragment_id` itself or sits anywhere inside it.
    pub fn fragment_contains(&self, fragment_id: &EventId, event_id: &EventId) -> bool {
        let by_id = self.event_map();
        let mut stack = vec![fragment_id];
        let mut seen = BTreeSet::new();
        while let Some(current) = stack.pop() {
            if current == event_id {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(fragment) = by_id.get(current).and_then(|event| event.as_fragment()) {
                for section in fragment.sections() {
                    stack.extend(section.event_ids());
                }
            }
        }
        false
    }

    /// Drops `event_id` from every fragment section.
    pub fn detach_from_sections(&mut self, event_id: &EventId) {
        for event in &mut self.events {
            if let SeqEventBody::Fragment(fragment) = event.body_mut() {
                for section in fragment.sections_mut() {
                    section.event_ids_mut().retain(|id| id != event_id);
                }
            }
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantKind {
    #[default]
    Participant,
    Actor,
}

impl ParticipantKind {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Participant => "participant",
            Self::Actor => "actor",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "participant" => Some(Self::Participant),
            "actor" => Some(Self::Actor),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    id: ParticipantId,
    alias: String,
    #[serde(rename = "type")]
    kind: ParticipantKind,
}

impl Participant {
    pub fn new(id: ParticipantId, alias: impl Into<String>) -> Self {
        Self::new_with(id, alias, ParticipantKind::Participant)
    }

    pub fn new_with(id: ParticipantId, alias: impl Into<String>, kind: ParticipantKind) -> Self {
        Self {
            id,
            alias: alias.into(),
            kind,
        }
    }

    pub fn id(&self) -> &ParticipantId {
        &self.id
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn kind(&self) -> ParticipantKind {
        self.kind
    }

    pub fn set_alias(&mut self, alias: impl Into<String>) {
        self.alias = alias.into();
    }

    pub fn set_kind(&mut self, kind: ParticipantKind) {
        self.kind = kind;
    }
}

/// Message arrow kinds. The markup token of each is given by [`ArrowKind::syntax`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum ArrowKind {
    #[default]
    Solid,
    SolidOpen,
    SolidCross,
    SolidAsync,
    Dotted,
    DottedOpen,
    DottedCross,
    DottedAsync,
    BidirectionalSolid,
    BidirectionalDotted,
}

impl ArrowKind {
    pub const ALL: [ArrowKind; 10] = [
        ArrowKind::Solid,
        ArrowKind::SolidOpen,
        ArrowKind::SolidCross,
        ArrowKind::SolidAsync,
        ArrowKind::Dotted,
        ArrowKind::DottedOpen,
        ArrowKind::DottedCross,
        ArrowKind::DottedAsync,
        ArrowKind::BidirectionalSolid,
        ArrowKind::BidirectionalDotted,
    ];

    pub fn syntax(self) -> &'static str {
        match self {
            Self::Solid => "->>",
            Self::SolidOpen => "->",
            Self::SolidCross => "-x",
            Self::SolidAsync => "-)",
            Self::Dotted => "-->>",
            Self::DottedOpen => "-->",
            Self::DottedCross => "--x",
            Self::DottedAsync => "--)",
            Self::BidirectionalSolid => "<<->>",
            Self::BidirectionalDotted => "<<-->>",
        }
    }

    pub fn from_syntax(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.syntax() == token)
    }

    /// All kinds ordered by descending token length, so a tokenizer tries `-->>` before `->>`
    /// and `->`.
    pub fn longest_first() -> [ArrowKind; 10] {
        let mut kinds = Self::ALL;
        kinds.sort_by(|a, b| b.syntax().len().cmp(&a.syntax().len()));
        kinds
    }

    pub fn is_dotted(self) -> bool {
        matches!(
            self,
            Self::Dotted
                | Self::DottedOpen
                | Self::DottedCross
                | Self::DottedAsync
                | Self::BidirectionalDotted
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    from: ParticipantId,
    to: ParticipantId,
    #[serde(rename = "arrowType")]
    arrow: ArrowKind,
    #[serde(default)]
    label: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    activate_target: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    deactivate_source: bool,
}

impl Message {
    pub fn new(
        from: ParticipantId,
        to: ParticipantId,
        arrow: ArrowKind,
        label: impl Into<String>,
    ) -> Self {
        Self {
            from,
            to,
            arrow,
            label: label.into(),
            activate_target: false,
            deactivate_source: false,
        }
    }

    pub fn from(&self) -> &ParticipantId {
        &self.from
    }

    pub fn to(&self) -> &ParticipantId {
        &self.to
    }

    pub fn arrow(&self) -> ArrowKind {
        self.arrow
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn activate_target(&self) -> bool {
        self.activate_target
    }

    pub fn deactivate_source(&self) -> bool {
        self.deactivate_source
    }

    pub fn is_self_message(&self) -> bool {
        self.from == self.to
    }

    pub fn set_from(&mut self, from: ParticipantId) {
        self.from = from;
    }

    pub fn set_to(&mut self, to: ParticipantId) {
        self.to = to;
    }

    pub fn set_arrow(&mut self, arrow: ArrowKind) {
        self.arrow = arrow;
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn set_activate_target(&mut self, activate_target: bool) {
        self.activate_target = activate_target;
    }

    pub fn set_deactivate_source(&mut self, deactivate_source: bool) {
        self.deactivate_source = deactivate_source;
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
pub enum NotePosition {
    #[serde(rename = "left of")]
    LeftOf,
    #[serde(rename = "right of")]
    #[default]
    RightOf,
    #[serde(rename = "over")]
    Over,
}

impl NotePosition {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::LeftOf => "left of",
            Self::RightOf => "right of",
            Self::Over => "over",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "left of" => Some(Self::LeftOf),
            "right of" => Some(Self::RightOf),
            "over" => Some(Self::Over),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    position: NotePosition,
    participants: Vec<ParticipantId>,
    text: String,
}

impl Note {
    pub fn new(
        position: NotePosition,
        participants: Vec<ParticipantId>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            position,
            participants,
            text: text.into(),
        }
    }

    pub fn position(&self) -> NotePosition {
        self.position
    }

    pub fn participants(&self) -> &[ParticipantId] {
        &self.participants
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_position(&mut self, position: NotePosition) {
        self.position = position;
    }

    pub fn set_participants(&mut self, participants: Vec<ParticipantId>) {
        self.participants = participants;
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn participants_mut(&mut self) -> &mut Vec<ParticipantId> {
        &mut self.participants
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum FragmentKind {
    #[default]
    Loop,
    Alt,
    Opt,
    Par,
    Critical,
    Break,
    Rect,
}

impl FragmentKind {
    pub const ALL: [FragmentKind; 7] = [
        FragmentKind::Loop,
        FragmentKind::Alt,
        FragmentKind::Opt,
        FragmentKind::Par,
        FragmentKind::Critical,
        FragmentKind::Break,
        FragmentKind::Rect,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Loop => "loop",
            Self::Alt => "alt",
            Self::Opt => "opt",
            Self::Par => "par",
            Self::Critical => "critical",
            Self::Break => "break",
            Self::Rect => "rect",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }

    /// Keyword that opens the second and later sections.
    pub fn section_divider(self) -> &'static str {
        match self {
            Self::Par => "and",
            Self::Critical => "option",
            _ => "else",
        }
    }
}

/// Background used for `rect` fragments that carry no explicit color.
pub const DEFAULT_RECT_COLOR: &str = "rgb(200, 220, 255)";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default)]
    label: String,
    event_ids: Vec<EventId>,
}

impl Section {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            event_ids: Vec::new(),
        }
    }

    pub fn new_with(label: impl Into<String>, event_ids: Vec<EventId>) -> Self {
        Self {
            label: label.into(),
            event_ids,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn event_ids(&self) -> &[EventId] {
        &self.event_ids
    }

    pub fn event_ids_mut(&mut self) -> &mut Vec<EventId> {
        &mut self.event_ids
    }

    pub fn contains(&self, event_id: &EventId) -> bool {
        self.event_ids.iter().any(|id| id == event_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    kind: FragmentKind,
    #[serde(default)]
    label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    sections: Vec<Section>,
}

impl Fragment {
    pub fn new(kind: FragmentKind, label: impl Into<String>, sections: Vec<Section>) -> Self {
        Self {
            kind,
            label: label.into(),
            color: None,
            sections,
        }
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

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn sections_mut(&mut self) -> &mut Vec<Section> {
        &mut self.sections
    }

    pub fn set_kind(&mut self, kind: FragmentKind) {
        self.kind = kind;
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn set_color<T: Into<String>>(&mut self, color: Option<T>) {
        self.color = color.map(Into::into);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SeqEventBody {
    Message(Message),
    Note(Note),
    Fragment(Fragment),
}

/// One entry of the flat event list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SeqEvent {
    id: EventId,
    #[serde(flatten)]
    body: SeqEventBody,
}

impl SeqEvent {
    pub fn new(id: EventId, body: SeqEventBody) -> Self {
        Self { id, body }
    }

    pub fn message(id: EventId, message: Message) -> Self {
        Self::new(id, SeqEventBody::Message(message))
    }

    pub fn note(id: EventId, note: Note) -> Self {
        Self::new(id, SeqEventBody::Note(note))
    }

    pub fn fragment(id: EventId, fragment: Fragment) -> Self {
        Self::new(id, SeqEventBody::Fragment(fragment))
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn body(&self) -> &SeqEventBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut SeqEventBody {
        &mut self.body
    }

    pub fn as_message(&self) -> Option<&Message> {
        match &self.body {
            SeqEventBody::Message(message) => Some(message),
            _ => None,
        }
    }

    pub fn as_note(&self) -> Option<&Note> {
        match &self.body {
            SeqEventBody::Note(note) => Some(note),
            _ => None,
        }
    }

    pub fn as_fragment(&self) -> Option<&Fragment> {
        match &self.body {
            SeqEventBody::Fragment(fragment) => Some(fragment),
            _ => None,
        }
    }

    pub fn as_fragment_mut(&mut self) -> Option<&mut Fragment> {
        match &mut self.body {
            SeqEventBody::Fragment(fragment) => Some(fragment),
            _ => None,
        }
    }

    /// Messages and notes advance the activation event index; fragments do not.
    pub fn is_indexed(&self) -> bool {
        !matches!(self.body, SeqEventBody::Fragment(_))
    }

    /// Whether a message or note of this event mentions `participant_id`.
    pub fn references_participant(&self, participant_id: &ParticipantId) -> bool {
        match &self.body {
            SeqEventBody::Message(message) => {
                message.from() == participant_id || message.to() == participant_id
            }
            SeqEventBody::Note(note) => note.participants().contains(participant_id),
            SeqEventBody::Fragment(_) => false,
        }
    }
}

/// A lifeline activation bar spanning message/note indices `start..=end`.
///
/// Indices count only messages and notes in parse order; `end` may be `-1` when an activation
/// closes before any indexed event was seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Activation {
    id: ActivationId,
    participant_id: ParticipantId,
    start_event_index: i64,
    end_event_index: i64,
}

impl Activation {
    pub fn new(
        id: ActivationId,
        participant_id: ParticipantId,
        start_event_index: i64,
        end_event_index: i64,
    ) -> Self {
        Self {
            id,
            participant_id,
            start_event_index,
            end_event_index,
        }
    }

    pub fn id(&self) -> &ActivationId {
        &self.id
    }

    pub fn participant_id(&self) -> &ParticipantId {
        &self.participant_id
    }

    pub fn start_event_index(&self) -> i64 {
        self.start_event_index
    }

    pub fn end_event_index(&self) -> i64 {
        self.end_event_index
    }

    pub fn set_participant_id(&mut self, participant_id: ParticipantId) {
        self.participant_id = participant_id;
    }

    pub fn set_start_event_index(&mut self, start_event_index: i64) {
        self.start_event_index = start_event_index;
    }

    pub fn set_end_event_index(&mut self, end_event_index: i64) {
        self.end_event_index = end_event_index;
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ArrowKind, Fragment, FragmentKind, Message, Participant, Section, SeqEvent, SequenceAst,
    };
    use crate::model::ids::{EventId, ParticipantId};

    fn message(id: &str) -> SeqEvent {
        SeqEvent::message(
            EventId::new(id),
            Message::new(
                ParticipantId::new("participant_1"),
                ParticipantId::new("participant_2"),
                ArrowKind::Solid,
                id,
            ),
        )
    }

    fn nested_ast() -> SequenceAst {
        let mut ast = SequenceAst::default();
        ast.participants_mut()
            .push(Participant::new(ParticipantId::new("participant_1"), "A"));
        ast.participants_mut()
            .push(Participant::new(ParticipantId::new("participant_2"), "B"));

        let inner = Fragment::new(
            FragmentKind::Opt,
            "inner",
            vec![Section::new_with("inner", vec![EventId::new("m2")])],
        );
        let outer = Fragment::new(
            FragmentKind::Loop,
            "outer",
            vec![Section::new_with(
                "outer",
                vec![EventId::new("m1"), EventId::new("f_inner")],
            )],
        );

        ast.events_mut().push(message("m1"));
        ast.events_mut().push(message("m2"));
        ast.events_mut()
            .push(SeqEvent::fragment(EventId::new("f_inner"), inner));
        ast.events_mut()
            .push(SeqEvent::fragment(EventId::new("f_outer"), outer));
        ast.events_mut().push(message("m3"));
        ast
    }

    #[test]
    fn top_level_events_skip_everything_referenced_by_sections() {
        let ast = nested_ast();
        let top = ast
            .top_level_events()
            .into_iter()
            .map(|event| event.id().as_str())
            .collect::<Vec<_>>();
        assert_eq!(top, vec!["f_outer", "m3"]);
    }

    #[test]
    fn document_order_descends_into_sections() {
        let ast = nested_ast();
        let order = ast
            .events_in_document_order()
            .into_iter()
            .map(|event| event.id().as_str())
            .collect::<Vec<_>>();
        assert_eq!(order, vec!["f_outer", "m1", "f_inner", "m2", "m3"]);
    }

    #[test]
    fn fragment_contains_is_transitive() {
        let ast = nested_ast();
        assert!(ast.fragment_contains(&EventId::new("f_outer"), &EventId::new("m2")));
        assert!(ast.fragment_contains(&EventId::new("f_outer"), &EventId::new("f_outer")));
        assert!(!ast.fragment_contains(&EventId::new("f_inner"), &EventId::new("m1")));
        assert_eq!(
            ast.containing_section(&EventId::new("m2")),
            Some((&EventId::new("f_inner"), 0))
        );
    }

    #[test]
    fn arrow_kinds_sort_longest_token_first() {
        let order = ArrowKind::longest_first();
        assert_eq!(order[0], ArrowKind::BidirectionalDotted);
        assert_eq!(order[1], ArrowKind::BidirectionalSolid);
        let dotted = order
            .iter()
            .position(|kind| *kind == ArrowKind::Dotted)
            .expect("dotted");
        let solid = order
            .iter()
            .position(|kind| *kind == ArrowKind::Solid)
            .expect("solid");
        assert!(dotted < solid);
        assert_eq!(ArrowKind::from_syntax("--)"), Some(ArrowKind::DottedAsync));
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_value(message("m1")).expect("serialize");
        assert_eq!(json["id"], "m1");
        assert_eq!(json["type"], "message");
        assert_eq!(json["arrowType"], "solid");
        assert!(json.get("activateTarget").is_none());
    }
}
