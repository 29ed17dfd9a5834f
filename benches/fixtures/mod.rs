// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-MermaidCanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-canvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use mermaid_canvas::model::{FlowchartAst, SequenceAst};

fn padded_label(prefix: &str, target_len: usize) -> String {
    let mut out = prefix.to_owned();
    while out.len() < target_len {
        out.push('x');
    }
    out
}

pub fn checksum_flowchart(ast: &FlowchartAst) -> u64 {
    let mut acc = 0u64;
    for node in ast.nodes() {
        acc = acc.wrapping_mul(131).wrapping_add(node.label().len() as u64);
    }
    for edge in ast.edges() {
        acc = acc.wrapping_mul(131).wrapping_add(edge.id().as_str().len() as u64);
    }
    acc
}

pub fn checksum_sequence(ast: &SequenceAst) -> u64 {
    let mut acc = ast.participants().len() as u64;
    for event in ast.events() {
        acc = acc.wrapping_mul(131).wrapping_add(event.id().as_str().len() as u64);
    }
    acc.wrapping_add(ast.activations().len() as u64)
}

pub mod flow {
    use mermaid_canvas::model::{EdgeStyle, FlowDirection, NodeShape};

    use super::padded_label;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Params {
        pub layers: usize,
        pub width: usize,
        pub fanout: usize,
        pub long_labels: bool,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Case {
        Small,
        MediumDense,
        LargeLongLabels,
    }

    impl Case {
        pub const ALL: [Case; 3] = [Case::Small, Case::MediumDense, Case::LargeLongLabels];

        pub const fn id(self) -> &'static str {
            match self {
                Self::Small => "small",
                Self::MediumDense => "medium_dense",
                Self::LargeLongLabels => "large_long_labels",
            }
        }

        pub const fn params(self) -> Params {
            match self {
                Self::Small => Params { layers: 4, width: 3, fanout: 1, long_labels: false },
                Self::MediumDense => Params { layers: 10, width: 8, fanout: 3, long_labels: false },
                Self::LargeLongLabels => {
                    Params { layers: 25, width: 16, fanout: 2, long_labels: true }
                }
            }
        }
    }

    const SHAPES: [NodeShape; 4] =
        [NodeShape::Rectangle, NodeShape::Rounded, NodeShape::Diamond, NodeShape::Stadium];
    const STYLES: [EdgeStyle; 3] = [EdgeStyle::Solid, EdgeStyle::Dotted, EdgeStyle::Thick];

    /// A layered DAG written as markup, so parse benches include the tokenizer.
    pub fn markup(params: Params) -> String {
        let mut out = format!("flowchart {}\n", FlowDirection::TB.as_str());
        for layer in 0..params.layers {
            for col in 0..params.width {
                let index = layer * params.width + col;
                let shape = SHAPES[index % SHAPES.len()];
                let (open, close) = shape.delimiters();
                let label = if params.long_labels {
                    padded_label(&format!("node {index} "), 64)
                } else {
                    format!("n{index}")
                };
                out.push_str(&format!("    N{index}{open}{label}{close}\n"));
            }
        }
        for layer in 1..params.layers {
            for col in 0..params.width {
                let target = layer * params.width + col;
                for k in 0..params.fanout {
                    let source = (layer - 1) * params.width + (col + k) % params.width;
                    let style = STYLES[(target + k) % STYLES.len()];
                    if (target + k) % 4 == 0 {
                        let (open, close) = style.label_delimiters();
                        out.push_str(&format!("    N{source} {open}\"e{target}\"{close} N{target}\n"));
                    } else {
                        out.push_str(&format!("    N{source} {} N{target}\n", style.arrow()));
                    }
                }
            }
        }
        out
    }

    pub fn fixture(case: Case) -> String {
        markup(case.params())
    }
}

pub mod seq {
    use super::padded_label;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Params {
        pub participants: usize,
        pub messages: usize,
        pub long_text: bool,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Case {
        Small,
        Medium,
        LargeLongText,
    }

    impl Case {
        pub const ALL: [Case; 3] = [Case::Small, Case::Medium, Case::LargeLongText];

        pub const fn id(self) -> &'static str {
            match self {
                Self::Small => "small",
                Self::Medium => "medium",
                Self::LargeLongText => "large_long_text",
            }
        }

        pub const fn params(self) -> Params {
            match self {
                Self::Small => Params { participants: 4, messages: 40, long_text: false },
                Self::Medium => Params { participants: 12, messages: 200, long_text: false },
                Self::LargeLongText => Params { participants: 30, messages: 800, long_text: true },
            }
        }
    }

    const ARROWS: [&str; 4] = ["->>", "-->>", "-)", "-x"];

    /// Messages in rotating loop/alt fragments with periodic notes and activations.
    pub fn markup(params: Params) -> String {
        let mut out = String::from("sequenceDiagram\n    autonumber\n");
        for index in 0..params.participants {
            let keyword = if index % 5 == 0 { "actor" } else { "participant" };
            out.push_str(&format!("    {keyword} P{index} as Participant {index}\n"));
        }

        for index in 0..params.messages {
            let from = index % params.participants;
            let to = (index + 1) % params.participants;
            let text = if params.long_text {
                padded_label(&format!("message {index} "), 120)
            } else {
                format!("m{index}")
            };
            let arrow = ARROWS[index % ARROWS.len()];

            match index % 20 {
                0 => out.push_str("    loop every tick\n"),
                10 => out.push_str("    alt fast path\n"),
                15 => out.push_str("    else slow path\n"),
                _ => {}
            }
            out.push_str(&format!("        P{from}{arrow}P{to}: {text}\n"));
            if index % 7 == 0 {
                out.push_str(&format!("        activate P{to}\n"));
            }
            if index % 7 == 3 {
                let target = (index - 2) % params.participants;
                out.push_str(&format!("        deactivate P{target}\n"));
            }
            if index % 9 == 4 {
                out.push_str(&format!("        Note over P{from},P{to}: checkpoint {index}\n"));
            }
            if matches!(index % 20, 9 | 19) {
                out.push_str("    end\n");
            }
        }
        out
    }

    pub fn fixture(case: Case) -> String {
        markup(case.params())
    }
}
