// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-MermaidCanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-canvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::label::{decode_label, encode_label};
use super::ParseOptions;
use crate::model::ids::{ActivationId, EventId, IdAllocator, ParticipantId};
use crate::model::seq_ast::{
    Activation, ArrowKind, Fragment, FragmentKind, Message, Note, NotePosition, Participant,
    ParticipantKind, Section, SeqEvent, SeqEventBody, SequenceAst, DEFAULT_RECT_COLOR,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MermaidSequenceParseError {
    /// The built-in grammar failed to compile.
    Grammar { message: String },
    /// Strict mode only: a line matched no statement.
    UnrecognizedLine { line_no: usize, line: String },
    /// Strict mode only: `end` without an open fragment.
    UnmatchedEnd { line_no: usize },
}

impl fmt::Display for MermaidSequenceParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grammar { message } => write!(f, "invalid sequence grammar: {message}"),
            Self::UnrecognizedLine { line_no, line } => {
                write!(f, "unrecognized sequence syntax on line {line_no}: {line}")
            }
            Self::UnmatchedEnd { line_no } => {
                write!(f, "unmatched 'end' on line {line_no} (no open fragment)")
            }
        }
    }
}

impl std::error::Error for MermaidSequenceParseError {}

struct SequenceGrammar {
    header: Regex,
    participant: Regex,
    activate: Regex,
    deactivate: Regex,
    divider: Regex,
    fragment: Regex,
    note: Regex,
    message: Regex,
}

impl SequenceGrammar {
    fn compile() -> Result<Self, regex::Error> {
        let arrows = ArrowKind::longest_first()
            .iter()
            .map(|kind| regex::escape(kind.syntax()))
            .collect::<Vec<_>>()
            .join("|");

        Ok(Self {
            header: Regex::new(r"(?i)^sequenceDiagram$")?,
            participant: Regex::new(r"^(participant|actor)\s+(\S+)(?:\s+as\s+(.+))?$")?,
            activate: Regex::new(r"^activate\s+(\S+)$")?,
            deactivate: Regex::new(r"^deactivate\s+(\S+)$")?,
            divider: Regex::new(r"^(else|and|option)(?:\s+(.*))?$")?,
            fragment: Regex::new(r"^(loop|alt|opt|par|critical|break|rect)(?:\s+(.*))?$")?,
            note: Regex::new(r"(?i)^note\s+(left\s+of|right\s+of|over)\s+([^:]+):\s*(.*)$")?,
            message: Regex::new(&format!(
                r"^(\S+?)\s*({arrows})([+-]?)\s*(\S+?)\s*:\s*(.*)$"
            ))?,
        })
    }
}

fn grammar() -> Result<&'static SequenceGrammar, MermaidSequenceParseError> {
    static GRAMMAR: OnceLock<Result<SequenceGrammar, regex::Error>> = OnceLock::new();
    GRAMMAR
        .get_or_init(SequenceGrammar::compile)
        .as_ref()
        .map_err(|err| MermaidSequenceParseError::Grammar {
            message: err.to_string(),
        })
}

fn is_comment_line(trimmed: &str) -> bool {
    trimmed.starts_with("%%")
}

fn note_position(keyword: &str) -> NotePosition {
    match keyword.as_bytes().first().map(u8::to_ascii_lowercase) {
        Some(b'l') => NotePosition::LeftOf,
        Some(b'r') => NotePosition::RightOf,
        _ => NotePosition::Over,
    }
}

/// A fragment whose `end` has not been seen yet.
struct OpenFrame {
    event_id: EventId,
    kind: FragmentKind,
    label: String,
    color: Option<String>,
    sections: Vec<Section>,
    current_section_index: usize,
    opened_on_line_no: usize,
}

impl OpenFrame {
    fn new(
        event_id: EventId,
        kind: FragmentKind,
        text: &str,
        opened_on_line_no: usize,
    ) -> Self {
        let (label, color) = match kind {
            FragmentKind::Rect if text.is_empty() => {
                (String::new(), Some(DEFAULT_RECT_COLOR.to_owned()))
            }
            FragmentKind::Rect => (String::new(), Some(text.to_owned())),
            _ => (decode_label(text), None),
        };
        Self {
            event_id,
            kind,
            label,
            color,
            sections: vec![Section::new("")],
            current_section_index: 0,
            opened_on_line_no,
        }
    }

    fn push_event_id(&mut self, event_id: EventId) {
        if let Some(section) = self.sections.get_mut(self.current_section_index) {
            section.event_ids_mut().push(event_id);
        }
    }

    fn start_section(&mut self, label: String) {
        self.current_section_index = self.sections.len();
        self.sections.push(Section::new(label));
    }

    fn into_event(self) -> SeqEvent {
        let mut fragment = Fragment::new(self.kind, self.label, self.sections);
        fragment.set_color(self.color);
        SeqEvent::fragment(self.event_id, fragment)
    }
}

struct OpenActivation {
    activation_id: ActivationId,
    participant_id: ParticipantId,
    start_event_index: i64,
}

/// Line-by-line sequence builder state.
struct SequenceBuilder<'a> {
    ids: &'a mut IdAllocator,
    names: HashMap<String, ParticipantId>,
    participants: Vec<Participant>,
    events: Vec<SeqEvent>,
    activations: Vec<Activation>,
    open_activations: Vec<OpenActivation>,
    frames: Vec<OpenFrame>,
    event_index: i64,
    auto_number: bool,
}

impl<'a> SequenceBuilder<'a> {
    fn new(ids: &'a mut IdAllocator) -> Self {
        Self {
            ids,
            names: HashMap::new(),
            participants: Vec::new(),
            events: Vec::new(),
            activations: Vec::new(),
            open_activations: Vec::new(),
            frames: Vec::new(),
            event_index: 0,
            auto_number: false,
        }
    }

    fn resolve_participant(&mut self, name: &str) -> ParticipantId {
        if let Some(participant_id) = self.names.get(name) {
            return participant_id.clone();
        }
        let participant_id = self.ids.next_participant_id();
        self.participants
            .push(Participant::new(participant_id.clone(), name));
        self.names.insert(name.to_owned(), participant_id.clone());
        participant_id
    }

    /// Explicit declaration. A name seen earlier (declared or auto-created) keeps its id and
    /// position; alias and kind are updated.
    fn declare_participant(&mut self, kind: ParticipantKind, name: &str, alias: Option<&str>) {
        let alias = alias.map(decode_label).unwrap_or_else(|| name.to_owned());
        let participant_id = self.resolve_participant(name);
        if let Some(participant) = self
            .participants
            .iter_mut()
            .find(|participant| participant.id() == &participant_id)
        {
            participant.set_alias(alias);
            participant.set_kind(kind);
        }
    }

    /// At most one activation is open per participant; activating again restarts it.
    fn activate(&mut self, name: &str, line_no: usize) {
        let participant_id = self.resolve_participant(name);
        let open = OpenActivation {
            activation_id: self.ids.next_activation_id(),
            participant_id,
            start_event_index: self.event_index,
        };
        match self
            .open_activations
            .iter_mut()
            .find(|slot| slot.participant_id == open.participant_id)
        {
            Some(slot) => {
                tracing::debug!(line_no, participant = name, "activate replaces open activation");
                *slot = open;
            }
            None => self.open_activations.push(open),
        }
    }

    fn deactivate(&mut self, name: &str, line_no: usize) {
        let participant_id = self.resolve_participant(name);
        let Some(slot) = self
            .open_activations
            .iter()
            .position(|open| open.participant_id == participant_id)
        else {
            tracing::debug!(line_no, participant = name, "deactivate without open activation");
            return;
        };
        let open = self.open_activations.remove(slot);
        self.activations.push(Activation::new(
            open.activation_id,
            open.participant_id,
            open.start_event_index,
            self.event_index - 1,
        ));
    }

    fn push_event(&mut self, event: SeqEvent) {
        if let Some(frame) = self.frames.last_mut() {
            frame.push_event_id(event.id().clone());
        }
        self.events.push(event);
    }

    fn open_fragment(&mut self, kind: FragmentKind, text: &str, line_no: usize) {
        let event_id = self.ids.next_event_id();
        self.frames
            .push(OpenFrame::new(event_id, kind, text, line_no));
    }

    /// Pops the innermost frame into its parent scope. Returns false when nothing was open.
    fn close_fragment(&mut self) -> bool {
        let Some(frame) = self.frames.pop() else {
            return false;
        };
        self.push_event(frame.into_event());
        true
    }

    fn push_note(&mut self, position: NotePosition, names: &str, text: &str) {
        let keep = match position {
            NotePosition::Over => 2,
            NotePosition::LeftOf | NotePosition::RightOf => 1,
        };
        let participants = names
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .take(keep)
            .map(|name| self.resolve_participant(name))
            .collect::<Vec<_>>();
        let event_id = self.ids.next_event_id();
        self.push_event(SeqEvent::note(
            event_id,
            Note::new(position, participants, decode_label(text.trim())),
        ));
        self.event_index += 1;
    }

    fn push_message(&mut self, from: &str, arrow: ArrowKind, suffix: &str, to: &str, label: &str) {
        let from = self.resolve_participant(from);
        let to = self.resolve_participant(to);
        let mut message = Message::new(from, to, arrow, decode_label(label.trim()));
        message.set_activate_target(suffix == "+");
        message.set_deactivate_source(suffix == "-");
        let event_id = self.ids.next_event_id();
        self.push_event(SeqEvent::message(event_id, message));
        self.event_index += 1;
    }

    fn finish(mut self) -> SequenceAst {
        while let Some(opened_on_line_no) = self.frames.last().map(|frame| frame.opened_on_line_no) {
            tracing::debug!(opened_on_line_no, "closing fragment left open at end of input");
            self.close_fragment();
        }

        let end_event_index = (self.event_index - 1).max(0);
        for open in std::mem::take(&mut self.open_activations) {
            tracing::debug!(
                participant = open.participant_id.as_str(),
                end_event_index,
                "closing activation left open at end of input"
            );
            self.activations.push(Activation::new(
                open.activation_id,
                open.participant_id,
                open.start_event_index,
                end_event_index,
            ));
        }

        let mut ast = SequenceAst::default();
        *ast.participants_mut() = self.participants;
        *ast.events_mut() = self.events;
        *ast.activations_mut() = self.activations;
        ast.set_auto_number(self.auto_number);
        ast
    }
}

/// Parse sequence markup with a fresh id allocator in lenient mode.
pub fn parse_sequence(input: &str) -> Result<SequenceAst, MermaidSequenceParseError> {
    parse_sequence_with(input, &mut IdAllocator::new(), ParseOptions::default())
}

/// Parse sequence markup.
///
/// Supported:
/// - `sequenceDiagram` header and `autonumber`
/// - comment lines starting with `%%`
/// - `participant <name> [as <alias>]` and `actor <name> [as <alias>]`
/// - `activate <name>` / `deactivate <name>`
/// - fragments: `loop|alt|opt|par|critical|break|rect [text] ... end`, with `else`, `and` and
///   `option` section dividers; `rect` takes a color instead of a label
/// - notes: `Note left of|right of|over <a>[,<b>]: <text>`
/// - messages: `<from><arrow><to>: <label>` for the ten arrow tokens of [`ArrowKind`], with an
///   optional `+`/`-` activation shorthand after the arrow
///
/// Participants referenced before any declaration are created on first mention. Fragments and
/// activations still open at the end of input are closed. Lines matching nothing are skipped,
/// or rejected in strict mode. All generated ids come from `ids`.
pub fn parse_sequence_with(
    input: &str,
    ids: &mut IdAllocator,
    options: ParseOptions,
) -> Result<SequenceAst, MermaidSequenceParseError> {
    let grammar = grammar()?;
    let mut builder = SequenceBuilder::new(ids);

    for (idx, raw_line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || is_comment_line(trimmed) {
            continue;
        }

        if grammar.header.is_match(trimmed) {
            continue;
        }

        if trimmed.eq_ignore_ascii_case("autonumber") {
            builder.auto_number = true;
            continue;
        }

        if let Some(caps) = grammar.participant.captures(trimmed) {
            let kind = ParticipantKind::from_keyword(&caps[1]).unwrap_or_default();
            let alias = caps.get(3).map(|alias| alias.as_str().trim());
            builder.declare_participant(kind, &caps[2], alias);
            continue;
        }

        if let Some(caps) = grammar.activate.captures(trimmed) {
            builder.activate(&caps[1], line_no);
            continue;
        }

        if let Some(caps) = grammar.deactivate.captures(trimmed) {
            builder.deactivate(&caps[1], line_no);
            continue;
        }

        if trimmed == "end" {
            if !builder.close_fragment() {
                if options.is_strict() {
                    return Err(MermaidSequenceParseError::UnmatchedEnd { line_no });
                }
                tracing::debug!(line_no, "ignoring 'end' without open fragment");
            }
            continue;
        }

        if !builder.frames.is_empty() {
            if let Some(caps) = grammar.divider.captures(trimmed) {
                let label = caps
                    .get(2)
                    .map(|label| decode_label(label.as_str().trim()))
                    .unwrap_or_default();
                if let Some(frame) = builder.frames.last_mut() {
                    frame.start_section(label);
                }
                continue;
            }
        }

        if let Some(caps) = grammar.fragment.captures(trimmed) {
            let kind = FragmentKind::from_keyword(&caps[1]).unwrap_or_default();
            let text = caps.get(2).map(|text| text.as_str().trim()).unwrap_or("");
            builder.open_fragment(kind, text, line_no);
            continue;
        }

        if let Some(caps) = grammar.note.captures(trimmed) {
            builder.push_note(note_position(&caps[1]), &caps[2], &caps[3]);
            continue;
        }

        if let Some(caps) = grammar.message.captures(trimmed) {
            if let Some(arrow) = ArrowKind::from_syntax(&caps[2]) {
                builder.push_message(&caps[1], arrow, &caps[3], &caps[4], &caps[5]);
                continue;
            }
        }

        if options.is_strict() {
            return Err(MermaidSequenceParseError::UnrecognizedLine {
                line_no,
                line: trimmed.to_owned(),
            });
        }
        tracing::trace!(line_no, line = trimmed, "skipping unrecognized sequence line");
    }

    let ast = builder.finish();
    tracing::debug!(
        participants = ast.participants().len(),
        events = ast.events().len(),
        activations = ast.activations().len(),
        auto_number = ast.auto_number(),
        "parsed sequence diagram"
    );
    Ok(ast)
}

const INDENT: &str = "    ";

struct SequenceWriter<'a> {
    ast: &'a SequenceAst,
    by_id: HashMap<&'a EventId, &'a SeqEvent>,
    written: BTreeSet<&'a EventId>,
    indexed_events: i64,
    out: String,
}

impl<'a> SequenceWriter<'a> {
    fn new(ast: &'a SequenceAst) -> Self {
        Self {
            ast,
            by_id: ast.event_map(),
            written: BTreeSet::new(),
            indexed_events: 0,
            out: String::new(),
        }
    }

    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Writes the `activate`/`deactivate` lines that belong between indexed event
    /// `indexed_events - 1` and `indexed_events`.
    fn activation_slot(&mut self, depth: usize) {
        let slot = self.indexed_events;
        let ast = self.ast;
        for activation in ast.activations() {
            if ast.participant(activation.participant_id()).is_none() {
                continue;
            }
            let start = activation.start_event_index();
            let end = activation.end_event_index();
            if end == slot - 1 && start <= end {
                self.line(depth, &format!("deactivate {}", activation.participant_id()));
            }
        }
        for activation in ast.activations() {
            if ast.participant(activation.participant_id()).is_none() {
                continue;
            }
            if activation.start_event_index() == slot {
                self.line(depth, &format!("activate {}", activation.participant_id()));
                if activation.end_event_index() < slot {
                    self.line(depth, &format!("deactivate {}", activation.participant_id()));
                }
            }
        }
    }

    fn event(&mut self, event: &'a SeqEvent, depth: usize) {
        if !self.written.insert(event.id()) {
            return;
        }

        match event.body() {
            SeqEventBody::Message(message) => {
                self.activation_slot(depth);
                self.line(
                    depth,
                    &format!(
                        "{}{}{}: {}",
                        message.from(),
                        message.arrow().syntax(),
                        message.to(),
                        encode_label(message.label())
                    ),
                );
                if message.activate_target() {
                    self.line(depth, &format!("activate {}", message.to()));
                }
                if message.deactivate_source() {
                    self.line(depth, &format!("deactivate {}", message.from()));
                }
                self.indexed_events += 1;
            }
            SeqEventBody::Note(note) => {
                self.activation_slot(depth);
                let participants = match (note.position(), note.participants()) {
                    (NotePosition::Over, [first, second, ..]) => format!("{first},{second}"),
                    (_, [first, ..]) => first.to_string(),
                    (_, []) => {
                        tracing::warn!(event_id = %event.id(), "skipping note without participants");
                        self.indexed_events += 1;
                        return;
                    }
                };
                self.line(
                    depth,
                    &format!(
                        "Note {} {}: {}",
                        note.position().keyword(),
                        participants,
                        encode_label(note.text())
                    ),
                );
                self.indexed_events += 1;
            }
            SeqEventBody::Fragment(fragment) => {
                let opener = match fragment.kind() {
                    FragmentKind::Rect => format!(
                        "rect {}",
                        fragment.color().filter(|c| !c.trim().is_empty()).unwrap_or(DEFAULT_RECT_COLOR)
                    ),
                    kind => keyword_line(kind.keyword(), fragment.label()),
                };
                self.line(depth, &opener);

                for (section_index, section) in fragment.sections().iter().enumerate() {
                    if section_index > 0 {
                        let divider = keyword_line(fragment.kind().section_divider(), section.label());
                        self.line(depth, &divider);
                    }
                    for child_id in section.event_ids() {
                        if let Some(&child) = self.by_id.get(child_id) {
                            self.event(child, depth + 1);
                        }
                    }
                }

                self.line(depth, "end");
            }
        }
    }
}

fn keyword_line(keyword: &str, label: &str) -> String {
    if label.is_empty() {
        keyword.to_owned()
    } else {
        format!("{keyword} {}", encode_label(label))
    }
}

/// Write a sequence diagram as canonical markup.
///
/// Layout of the output:
/// - `sequenceDiagram`, then `autonumber` when set
/// - one declaration per participant, `participant|actor <id> as <alias>`
/// - a blank line when there are both participants and events
/// - top-level events in list order, fragments expanded recursively with four spaces per level
///
/// Message activation flags become `activate`/`deactivate` lines right after the message, and
/// activation records are written as `activate`/`deactivate` lines at their event indices.
pub fn generate_sequence(ast: &SequenceAst) -> String {
    let mut writer = SequenceWriter::new(ast);
    writer.out.push_str("sequenceDiagram\n");
    if ast.auto_number() {
        writer.line(1, "autonumber");
    }

    for participant in ast.participants() {
        writer.line(
            1,
            &format!(
                "{} {} as {}",
                participant.kind().keyword(),
                participant.id(),
                encode_label(participant.alias())
            ),
        );
    }

    if !ast.participants().is_empty() && !ast.events().is_empty() {
        writer.out.push('\n');
    }

    for event in ast.top_level_events() {
        writer.event(event, 1);
    }
    writer.activation_slot(1);

    writer.out
}
