use serde_json::json;
use strum::IntoEnumIterator;

use super::*;

fn parse(value: serde_json::Value) -> Element {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_kind_tags_round_trip() {
    for kind in NodeKind::iter() {
        assert_eq!(NodeKind::from_tag(kind.tag()), Ok(kind));
        assert_eq!(kind.to_string(), kind.tag());
    }
}

#[test]
fn test_leaf_and_run_like_kinds() {
    let leaves: Vec<_> = NodeKind::iter().filter(|kind| kind.is_leaf()).collect();
    assert_eq!(
        leaves,
        [
            NodeKind::TextRun,
            NodeKind::Tab,
            NodeKind::ImageRun,
            NodeKind::PageBreak,
            NodeKind::SymbolRun,
            NodeKind::Break,
        ]
    );
    assert!(NodeKind::ImageRun.is_run_like());
    assert!(!NodeKind::Tab.is_run_like());
}

#[test]
fn test_element_from_json() {
    let element = parse(json!({
        "type": "Paragraph",
        "key": 7,
        "props": { "alignment": "center" },
        "children": ["Hi", null, false, 42, [{ "type": "Tab" }]]
    }));

    let Element::Host(host) = element else {
        panic!("expected a host element");
    };
    assert_eq!(host.tag.as_str(), "Paragraph");
    assert_eq!(host.key.as_deref(), Some("7"));
    assert_eq!(host.props.get("alignment"), Some(&json!("center")));
    assert_eq!(
        host.children,
        [
            Element::text("Hi"),
            Element::Empty,
            Element::Empty,
            Element::text("42"),
            Element::fragment([Element::host("Tab", Props::new(), vec![])]),
        ]
    );
}

#[test]
fn test_element_from_json_rejects_untyped_objects() {
    let result = serde_json::from_value::<Element>(json!({ "props": {} }));
    assert!(result.is_err());
}

#[test]
fn test_build_tree_from_json() {
    let root = build_tree(parse(json!({
        "type": "Document",
        "props": { "title": "Doc" },
        "children": [{
            "type": "Section",
            "children": [{
                "type": "Paragraph",
                "children": [{ "type": "TextRun", "props": { "text": "Hello", "bold": true } }]
            }]
        }]
    })))
    .unwrap()
    .unwrap();

    assert_eq!(root.kind, NodeKind::Document);
    assert_eq!(root.prop_str("title"), Some("Doc"));
    let run = &root.children[0].children[0].children[0];
    assert_eq!(run.kind, NodeKind::TextRun);
    assert_eq!(run.prop("bold"), Some(&json!(true)));
    assert_eq!(run.text_content(), Some("Hello"));
}
