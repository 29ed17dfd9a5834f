// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-MermaidCanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-canvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use mermaid_canvas::document::Document;
use mermaid_canvas::format::mermaid::{
    generate_markup, parse_markup, parse_markup_with, MarkupError, ParseOptions,
};
use mermaid_canvas::layout::{auto_layout, compute_layout, LayeredLayout, LayoutOptions};
use mermaid_canvas::model::{
    DiagramAst, DiagramKind, EdgeStyle, EventId, FragmentKind, IdAllocator, NodeId, NodeShape,
    ParticipantKind, SeqEventBody,
};
use rstest::rstest;

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn read_fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    fs::read_to_string(&path).unwrap_or_else(|err| panic!("failed to read {path:?}: {err}"))
}

#[rstest]
#[case("checkout_flow.mmd", DiagramKind::Flowchart)]
#[case("auth_sequence.mmd", DiagramKind::Sequence)]
#[case("unclosed_fragments.mmd", DiagramKind::Sequence)]
fn generated_markup_is_a_fixed_point(#[case] name: &str, #[case] kind: DiagramKind) {
    let source = read_fixture(name);
    let first = parse_markup(&source).unwrap_or_else(|err| panic!("{name}: {err}"));
    assert_eq!(first.kind(), kind);

    let canonical = generate_markup(&first);
    let second = parse_markup(&canonical).unwrap_or_else(|err| panic!("{name} (canonical): {err}"));
    assert_eq!(generate_markup(&second), canonical, "{name}");
}

#[test]
fn checkout_flow_parses_shapes_and_labels() {
    let diagram = parse_markup(&read_fixture("checkout_flow.mmd")).expect("parse");
    let ast = diagram.as_flowchart().expect("flowchart");

    let ids = ast.nodes().iter().map(|node| node.id().as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["cart", "pay", "gateway", "ledger", "done", "retry"]);
    assert_eq!(ast.edges().len(), 7);

    assert_eq!(ast.node(&NodeId::new("cart")).map(|n| n.shape()), Some(NodeShape::Stadium));
    assert_eq!(ast.node(&NodeId::new("pay")).map(|n| n.shape()), Some(NodeShape::Diamond));
    assert_eq!(ast.node(&NodeId::new("retry")).map(|n| n.shape()), Some(NodeShape::Hexagon));
    assert_eq!(ast.node(&NodeId::new("done")).map(|n| n.shape()), Some(NodeShape::Circle));

    let labels = ast.edges().iter().filter(|e| e.has_label()).map(|e| e.label()).collect::<Vec<_>>();
    assert_eq!(labels, vec!["card", "invoice", "declined"]);
    assert!(ast.edges().iter().any(|e| e.style() == EdgeStyle::Dotted));
    assert!(ast.edges().iter().any(|e| e.style() == EdgeStyle::Thick));
}

#[test]
fn flowchart_model_survives_a_round_trip() {
    let first = parse_markup(&read_fixture("checkout_flow.mmd")).expect("parse");
    let second = parse_markup(&generate_markup(&first)).expect("reparse");
    assert_eq!(second, first);
}

#[test]
fn checkout_flow_auto_layout_handles_the_retry_cycle() {
    let diagram = parse_markup(&read_fixture("checkout_flow.mmd")).expect("parse");
    let ast = diagram.as_flowchart().expect("flowchart");
    let positions =
        auto_layout(ast, &LayeredLayout, &LayoutOptions::for_direction(ast.direction()))
            .expect("layout");

    assert_eq!(positions.len(), ast.nodes().len());
    let x_of = |id: &str| {
        positions
            .iter()
            .find(|p| p.node_id().as_str() == id)
            .map(|p| p.x())
            .expect("position")
    };
    assert!(x_of("cart") < x_of("pay"));
    assert!(x_of("pay") < x_of("done"));
}

#[test]
fn auth_sequence_parses_every_construct() {
    let diagram = parse_markup(&read_fixture("auth_sequence.mmd")).expect("parse");
    let ast = diagram.as_sequence().expect("sequence");

    assert!(ast.auto_number());
    let aliases = ast.participants().iter().map(|p| p.alias()).collect::<Vec<_>>();
    assert_eq!(aliases, vec!["User", "Web App", "Auth"]);
    assert_eq!(ast.participants()[0].kind(), ParticipantKind::Actor);
    assert_eq!(ast.events().len(), 13);

    let fragments = ast
        .events()
        .iter()
        .filter_map(|event| event.as_fragment())
        .map(|fragment| fragment.kind())
        .collect::<Vec<_>>();
    // Fragments are stored when they close, so the inner loop precedes its alt.
    assert_eq!(
        fragments,
        vec![FragmentKind::Loop, FragmentKind::Alt, FragmentKind::Opt, FragmentKind::Rect]
    );

    let note = ast
        .events()
        .iter()
        .find_map(|event| event.as_note())
        .expect("note");
    assert_eq!(note.text(), "TLS\nmutual auth");

    let verify = ast.events()[1].as_message().expect("message");
    assert!(verify.activate_target());
    assert_eq!(ast.activations().len(), 1);

    let auth = &ast.participants()[2];
    assert_eq!(ast.activations()[0].participant_id(), auth.id());

    // The retry loop sits in the `else` section of the alt.
    let alt_id = ast
        .events()
        .iter()
        .find(|event| event.as_fragment().is_some_and(|f| f.kind() == FragmentKind::Alt))
        .map(|event| event.id().clone())
        .expect("alt fragment");
    let retry = ast
        .events()
        .iter()
        .find(|event| matches!(event.body(), SeqEventBody::Message(m) if m.label() == "retry"))
        .expect("retry message");
    assert!(ast.fragment_contains(&alt_id, retry.id()));
}

#[test]
fn auth_sequence_layout_numbers_messages() {
    let diagram = parse_markup(&read_fixture("auth_sequence.mmd")).expect("parse");
    let layout = compute_layout(diagram.as_sequence().expect("sequence"));

    assert_eq!(layout.participants().len(), 3);
    assert_eq!(layout.messages().len(), 8);
    assert_eq!(layout.notes().len(), 2);
    assert_eq!(layout.fragments().len(), 4);
    assert_eq!(layout.activations().len(), 1);

    let numbers = layout.messages().iter().filter_map(|m| m.number()).collect::<Vec<_>>();
    assert_eq!(numbers, (1..=8).collect::<Vec<_>>());

    let self_messages = layout.messages().iter().filter(|m| m.is_self_message()).count();
    assert_eq!(self_messages, 1);

    let mut last_y = f64::MIN;
    for message in layout.messages() {
        assert!(message.y() > last_y, "messages must move down the canvas");
        last_y = message.y();
    }
    assert!(layout.height() > last_y);
}

#[test]
fn unclosed_fragments_and_activations_are_closed_at_end() {
    let diagram = parse_markup(&read_fixture("unclosed_fragments.mmd")).expect("parse");
    let ast = diagram.as_sequence().expect("sequence");

    assert_eq!(ast.events().len(), 5);
    assert_eq!(ast.activations().len(), 1);
    assert!(ast.fragment_contains(&EventId::new("seq_event_2"), &EventId::new("seq_event_5")));

    let ends = generate_markup(&diagram).lines().filter(|line| line.trim() == "end").count();
    assert_eq!(ends, 2);
}

#[rstest]
#[case("auth_sequence.mmd")]
#[case("unclosed_fragments.mmd")]
fn events_belong_to_at_most_one_section(#[case] name: &str) {
    let diagram = parse_markup(&read_fixture(name)).expect("parse");
    let ast = diagram.as_sequence().expect("sequence");

    let mut seen = HashSet::new();
    for fragment in ast.events().iter().filter_map(|event| event.as_fragment()) {
        for section in fragment.sections() {
            for event_id in section.event_ids() {
                assert!(seen.insert(event_id.clone()), "{name}: {event_id} is in two sections");
                assert!(ast.event(event_id).is_some(), "{name}: {event_id} is dangling");
            }
        }
    }
    assert!(!seen.is_empty(), "{name}: fixture has no nested events");
}

#[test]
fn strict_mode_reports_the_first_unknown_line() {
    let source = "sequenceDiagram\n    Alice->>Bob: hi\n    title Login\n";
    assert!(parse_markup(source).is_ok());

    let err = parse_markup_with(source, &mut IdAllocator::new(), ParseOptions::strict())
        .expect_err("strict");
    assert_eq!(
        err.to_string(),
        "Sequence parse error: unrecognized sequence syntax on line 3: title Login"
    );
}

#[rstest]
#[case("", MarkupError::EmptyInput)]
#[case("  \n\t\n", MarkupError::EmptyInput)]
#[case("pie title Pets\n  \"Dogs\" : 3", MarkupError::UnrecognizedDiagram)]
fn dispatcher_rejects_unknown_input(#[case] source: &str, #[case] expected: MarkupError) {
    assert_eq!(parse_markup(source), Err(expected));
}

#[test]
fn model_json_round_trips() {
    for name in ["checkout_flow.mmd", "auth_sequence.mmd"] {
        let diagram = parse_markup(&read_fixture(name)).expect("parse");
        let json = serde_json::to_string(&diagram).expect("serialize");
        let back: DiagramAst = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, diagram, "{name}");
    }
}

#[test]
fn document_import_export_matches_the_codec() {
    let source = read_fixture("auth_sequence.mmd");
    let mut doc = Document::default();
    let outcome = doc.import(&source).expect("import");

    assert_eq!(outcome.kind(), DiagramKind::Sequence);
    assert!(outcome.node_positions().is_empty());
    assert_eq!(doc.export(), generate_markup(&parse_markup(&source).expect("parse")));
}
