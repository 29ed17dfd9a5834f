// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-MermaidCanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-canvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! An editable diagram: the model, its id allocator and a bounded snapshot history.

use std::collections::VecDeque;
use std::fmt;

use tracing::debug;

use crate::format::mermaid::{generate_markup, parse_markup_with, MarkupError, ParseOptions};
use crate::layout::{
    auto_layout, compute_layout, FlowNodePosition, GraphLayoutError, LayeredLayout, LayoutOptions,
    SequenceLayout,
};
use crate::model::{DiagramAst, DiagramKind, IdAllocator};
use crate::ops::{apply_ops, ApplyError, ApplyResult, Op};

/// Maximum number of undo snapshots kept; the oldest is dropped first.
pub const HISTORY_LIMIT: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    Markup(MarkupError),
    Layout(GraphLayoutError),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markup(err) => write!(f, "{err}"),
            Self::Layout(err) => write!(f, "auto-layout failed: {err}"),
        }
    }
}

impl std::error::Error for ImportError {}

impl From<MarkupError> for ImportError {
    fn from(value: MarkupError) -> Self {
        Self::Markup(value)
    }
}

impl From<GraphLayoutError> for ImportError {
    fn from(value: GraphLayoutError) -> Self {
        Self::Layout(value)
    }
}

/// What a successful import produced besides the new model.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    kind: DiagramKind,
    node_positions: Vec<FlowNodePosition>,
}

impl ImportOutcome {
    pub fn kind(&self) -> DiagramKind {
        self.kind
    }

    /// Auto-layout positions for flowchart nodes; empty for sequence diagrams.
    pub fn node_positions(&self) -> &[FlowNodePosition] {
        &self.node_positions
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    diagram: DiagramAst,
    ids: IdAllocator,
    past: VecDeque<DiagramAst>,
    future: Vec<DiagramAst>,
}

impl Document {
    pub fn new(kind: DiagramKind) -> Self {
        Self::from_diagram(DiagramAst::empty(kind))
    }

    /// Wraps an existing model; counters are resynced so new ids never collide with it.
    pub fn from_diagram(diagram: DiagramAst) -> Self {
        let mut ids = IdAllocator::new();
        ids.resync(&diagram);
        Self { diagram, ids, past: VecDeque::new(), future: Vec::new() }
    }

    pub fn diagram(&self) -> &DiagramAst {
        &self.diagram
    }

    pub fn kind(&self) -> DiagramKind {
        self.diagram.kind()
    }

    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    pub fn import(&mut self, text: &str) -> Result<ImportOutcome, ImportError> {
        self.import_with(text, ParseOptions::default())
    }

    /// Replaces the model with parsed `text`.
    ///
    /// Nothing changes on failure. On success every generated id is renumbered from one,
    /// flowcharts are auto-laid out, counters are resynced and history is cleared.
    pub fn import_with(
        &mut self,
        text: &str,
        options: ParseOptions,
    ) -> Result<ImportOutcome, ImportError> {
        let mut ids = IdAllocator::new();
        let diagram = parse_markup_with(text, &mut ids, options)?;

        let node_positions = match &diagram {
            DiagramAst::Flowchart(ast) => {
                auto_layout(ast, &LayeredLayout, &LayoutOptions::for_direction(ast.direction()))?
            }
            DiagramAst::Sequence(_) => Vec::new(),
        };

        ids.resync(&diagram);
        let kind = diagram.kind();
        self.diagram = diagram;
        self.ids = ids;
        self.past.clear();
        self.future.clear();
        debug!(%kind, positions = node_positions.len(), "imported markup");

        Ok(ImportOutcome { kind, node_positions })
    }

    pub fn export(&self) -> String {
        generate_markup(&self.diagram)
    }

    /// Geometry for sequence diagrams; `None` for flowcharts.
    pub fn layout_sequence(&self) -> Option<SequenceLayout> {
        self.diagram.as_sequence().map(compute_layout)
    }

    /// Applies `ops` as one undoable step. A failed batch leaves the document untouched.
    pub fn apply(&mut self, ops: &[Op]) -> Result<ApplyResult, ApplyError> {
        let before = self.diagram.clone();
        let result = apply_ops(&mut self.diagram, &mut self.ids, ops)?;
        if result.applied > 0 {
            self.record(before);
        }
        Ok(result)
    }

    /// Snapshots the current model so the next change can be undone.
    pub fn push_history(&mut self) {
        self.record(self.diagram.clone());
    }

    fn record(&mut self, snapshot: DiagramAst) {
        self.past.push_back(snapshot);
        while self.past.len() > HISTORY_LIMIT {
            self.past.pop_front();
        }
        self.future.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.diagram, previous);
        self.future.push(current);
        self.ids.resync(&self.diagram);
        debug!(past = self.past.len(), future = self.future.len(), "undo");
        true
    }

    /// Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.diagram, next);
        self.past.push_back(current);
        self.ids.resync(&self.diagram);
        debug!(past = self.past.len(), future = self.future.len(), "redo");
        true
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DiagramKind::Flowchart)
    }
}
