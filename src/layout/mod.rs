// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-MermaidCanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-canvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Layout algorithms for diagrams.
//!
//! Sequence diagrams get full pixel geometry. Flowcharts only get node positions, computed
//! through a pluggable [`GraphLayoutEngine`].

pub mod flowchart;
pub mod sequence;

pub use flowchart::{
    auto_layout, node_size, FlowNodePosition, GraphLayoutEngine, GraphLayoutError, LayeredLayout,
    LayoutEdge, LayoutNode, LayoutOptions, NodePosition,
};
pub use sequence::{
    compute_layout, compute_layout_with, ActivationLayout, FragmentLayout, LifelineLayout,
    MessageLayout, NoteLayout, ParticipantLayout, SequenceLayout, SequenceLayoutConfig,
};
