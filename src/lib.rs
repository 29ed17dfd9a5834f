// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-MermaidCanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-canvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Bidirectional Mermaid-style markup engine for a visual diagram editor.
//!
//! - [`model`]: flowchart and sequence diagram models plus id allocation.
//! - [`format::mermaid`]: lenient parsers and canonical generators for both diagram kinds.
//! - [`layout`]: sequence diagram geometry and flowchart auto-layout.
//! - [`ops`] and [`document`]: transactional edits with undo/redo.

pub mod document;
pub mod format;
pub mod layout;
pub mod model;
pub mod ops;
