// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-MermaidCanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-canvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Diagram markup parsing and generation.
//!
//! A Mermaid-style syntax for flowcharts and sequence diagrams, plus a dispatcher that picks
//! the codec from the header line.

pub mod mermaid;
