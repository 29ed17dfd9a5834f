// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-MermaidCanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-canvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mermaid-style parsing and generation for flowcharts and sequence diagrams.

use std::fmt;

use crate::model::diagram::DiagramAst;
use crate::model::ids::IdAllocator;

pub mod flowchart;
mod label;
pub mod sequence;

pub use flowchart::{
    generate_flowchart, parse_flowchart, parse_flowchart_with, MermaidFlowchartParseError,
};
pub use label::{desanitize_label, sanitize_label};
pub use sequence::{
    generate_sequence, parse_sequence, parse_sequence_with, MermaidSequenceParseError,
};

/// Codec-level parse switches.
///
/// The default is lenient: lines no grammar recognizes are skipped. Strict mode reports the
/// first such line instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    strict: bool,
}

impl ParseOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(self) -> bool {
        self.strict
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecKind {
    Flowchart,
    Sequence,
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flowchart => f.write_str("Flowchart"),
            Self::Sequence => f.write_str("Sequence"),
        }
    }
}

/// Failure of [`parse_markup`]. `Display` yields the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    EmptyInput,
    UnrecognizedDiagram,
    Codec { codec: CodecKind, message: String },
}

impl fmt::Display for MarkupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => f.write_str("Empty input"),
            Self::UnrecognizedDiagram => f.write_str(
                "Unrecognized diagram type. Expected \"flowchart <direction>\" or \"sequenceDiagram\".",
            ),
            Self::Codec { codec, message } => write!(f, "{codec} parse error: {message}"),
        }
    }
}

impl std::error::Error for MarkupError {}

impl From<MermaidFlowchartParseError> for MarkupError {
    fn from(err: MermaidFlowchartParseError) -> Self {
        Self::Codec {
            codec: CodecKind::Flowchart,
            message: err.to_string(),
        }
    }
}

impl From<MermaidSequenceParseError> for MarkupError {
    fn from(err: MermaidSequenceParseError) -> Self {
        Self::Codec {
            codec: CodecKind::Sequence,
            message: err.to_string(),
        }
    }
}

/// Which codec the first non-blank line selects, if any.
pub fn detect_codec(input: &str) -> Result<CodecKind, MarkupError> {
    let Some(first) = input.lines().map(str::trim).find(|line| !line.is_empty()) else {
        return Err(MarkupError::EmptyInput);
    };

    let lower = first.to_ascii_lowercase();
    let is_flowchart = ["flowchart", "graph"].iter().any(|keyword| {
        lower
            .strip_prefix(keyword)
            .and_then(|rest| rest.chars().next())
            .is_some_and(char::is_whitespace)
    });
    if is_flowchart {
        return Ok(CodecKind::Flowchart);
    }
    if lower == "sequencediagram" {
        return Ok(CodecKind::Sequence);
    }
    Err(MarkupError::UnrecognizedDiagram)
}

/// Parse markup of either kind with a fresh id allocator.
pub fn parse_markup(input: &str) -> Result<DiagramAst, MarkupError> {
    parse_markup_with(input, &mut IdAllocator::new(), ParseOptions::default())
}

/// Detect the diagram kind from the first non-blank line and run the matching codec.
///
/// Detection (case-insensitive):
/// - `flowchart <...>` or `graph <...>` selects the flowchart codec
/// - exactly `sequenceDiagram` selects the sequence codec
///
/// Codec failures are wrapped as [`MarkupError::Codec`].
pub fn parse_markup_with(
    input: &str,
    ids: &mut IdAllocator,
    options: ParseOptions,
) -> Result<DiagramAst, MarkupError> {
    let input = input.trim();
    match detect_codec(input)? {
        CodecKind::Flowchart => Ok(DiagramAst::Flowchart(parse_flowchart_with(
            input, ids, options,
        )?)),
        CodecKind::Sequence => Ok(DiagramAst::Sequence(parse_sequence_with(
            input, ids, options,
        )?)),
    }
}

/// Write either model as canonical markup.
pub fn generate_markup(diagram: &DiagramAst) -> String {
    match diagram {
        DiagramAst::Flowchart(ast) => generate_flowchart(ast),
        DiagramAst::Sequence(ast) => generate_sequence(ast),
    }
}
