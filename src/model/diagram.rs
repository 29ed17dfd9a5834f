// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-MermaidCanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-canvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::flow_ast::FlowchartAst;
use super::seq_ast::SequenceAst;

/// The type of diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DiagramKind {
    Flowchart,
    Sequence,
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flowchart => f.write_str("flowchart"),
            Self::Sequence => f.write_str("sequence"),
        }
    }
}

/// Either model, tagged by kind. Serializes as `{ "type": ..., "data": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum DiagramAst {
    Flowchart(FlowchartAst),
    Sequence(SequenceAst),
}

impl DiagramAst {
    pub fn kind(&self) -> DiagramKind {
        match self {
            Self::Flowchart(_) => DiagramKind::Flowchart,
            Self::Sequence(_) => DiagramKind::Sequence,
        }
    }

    pub fn empty(kind: DiagramKind) -> Self {
        match kind {
            DiagramKind::Flowchart => Self::Flowchart(FlowchartAst::default()),
            DiagramKind::Sequence => Self::Sequence(SequenceAst::default()),
        }
    }

    pub fn as_flowchart(&self) -> Option<&FlowchartAst> {
        match self {
            Self::Flowchart(ast) => Some(ast),
            Self::Sequence(_) => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&SequenceAst> {
        match self {
            Self::Sequence(ast) => Some(ast),
            Self::Flowchart(_) => None,
        }
    }
}
