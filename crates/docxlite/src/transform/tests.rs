use docx_tree::Props;
use serde_json::json;

use super::*;
use crate::ErrorKind;
use crate::model::{HeadingLevel, Orientation, PageSize};

fn node(kind: NodeKind, props: Value) -> Node {
    match props {
        Value::Object(map) => Node::with_properties(kind, map),
        _ => Node::new(kind),
    }
}

fn doc(blocks: Vec<Node>) -> Node {
    let section = blocks
        .into_iter()
        .fold(Node::new(NodeKind::Section), Node::child);
    Node::new(NodeKind::Document).child(section)
}

fn transform(root: &Node) -> Result<Document> {
    Transformer::default().transform_root(Some(root))
}

fn first_block(doc: &Document) -> &Block {
    &doc.sections[0].children[0]
}

#[test]
fn test_hello_document() {
    let root = doc(vec![
        Node::new(NodeKind::Paragraph).child(Node::text("Hello")),
    ]);

    let expected = Document {
        properties: DocumentOptions::default(),
        sections: vec![Section {
            properties: SectionOptions::default(),
            children: vec![Block::Paragraph(Paragraph {
                options: ParagraphOptions::default(),
                children: vec![Inline::Run(RunOptions::text("Hello"))],
            })],
        }],
    };
    assert_eq!(transform(&root).unwrap(), expected);
}

#[test]
fn test_missing_root() {
    let err = Transformer::default().transform_root(None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert_eq!(err.to_string(), "No Document element found at root");

    let err = transform(&Node::new(NodeKind::Paragraph)).unwrap_err();
    assert_eq!(err.to_string(), "No Document element found at root");
}

#[test]
fn test_document_child_must_be_section() {
    let root = Node::new(NodeKind::Document).child(Node::new(NodeKind::Paragraph));

    let err = transform(&root).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert_eq!(
        err.to_string(),
        "Document children must be Section nodes, got: Paragraph"
    );
}

#[test]
fn test_document_and_section_properties() {
    let mut root = node(
        NodeKind::Document,
        json!({ "title": "Report", "creator": "Ada", "lastModifiedBy": "Bob" }),
    );
    root.children.push(node(
        NodeKind::Section,
        json!({
            "properties": {
                "page": {
                    "size": { "width": 16838, "height": 11906, "orientation": "landscape" },
                    "margin": { "top": 720, "left": 1440 }
                }
            }
        }),
    ));

    let document = transform(&root).unwrap();
    assert_eq!(document.properties.title.as_deref(), Some("Report"));
    assert_eq!(document.properties.last_modified_by.as_deref(), Some("Bob"));

    let page = &document.sections[0].properties.properties.page;
    assert_eq!(
        page.size,
        Some(PageSize {
            width: Some(16838),
            height: Some(11906),
            orientation: Some(Orientation::Landscape),
        })
    );
    let margin = page.margin.as_ref().unwrap();
    assert_eq!((margin.top, margin.left, margin.bottom), (Some(720), Some(1440), None));
}

#[test]
fn test_table_nesting() {
    let table = Node::new(NodeKind::Table).child(
        Node::new(NodeKind::TableRow).child(
            Node::new(NodeKind::TableCell)
                .child(Node::new(NodeKind::Paragraph).child(Node::text("cell"))),
        ),
    );

    let document = transform(&doc(vec![table])).unwrap();
    let Block::Table(table) = first_block(&document) else {
        panic!("expected a table");
    };
    let cell = &table.rows[0].children[0];
    assert_eq!(
        cell.children,
        [Block::Paragraph(Paragraph {
            options: ParagraphOptions::default(),
            children: vec![Inline::Run(RunOptions::text("cell"))],
        })]
    );
}

#[test]
fn test_break_between_runs() {
    let para = Node::new(NodeKind::Paragraph)
        .child(Node::text("First line"))
        .child(node(NodeKind::Break, json!({ "text": "ignored" })))
        .child(Node::text("Second line"));

    let document = transform(&doc(vec![para])).unwrap();
    let Block::Paragraph(para) = first_block(&document) else {
        panic!("expected a paragraph");
    };
    assert_eq!(
        para.children,
        [
            Inline::Run(RunOptions::text("First line")),
            Inline::Run(RunOptions {
                break_count: Some(1),
                ..RunOptions::default()
            }),
            Inline::Run(RunOptions::text("Second line")),
        ]
    );
}

#[test]
fn test_run_options() {
    let run = node(
        NodeKind::TextRun,
        json!({
            "text": "styled",
            "bold": true,
            "italics": true,
            "underline": { "type": "double", "color": "FF0000" },
            "color": "2E74B5",
            "size": 28,
            "font": "Arial",
            "allCaps": true
        }),
    );

    let Ok(DocxObject::Inline(Inline::Run(options))) = Transformer::default().transform_node(&run)
    else {
        panic!("expected a run");
    };
    assert!(options.bold && options.italics && options.all_caps);
    assert_eq!(options.size, Some(28));
    assert_eq!(options.font.as_deref(), Some("Arial"));
    let underline = options.underline.unwrap();
    assert_eq!(underline.kind(), Some("double"));
    assert_eq!(underline.color(), Some("FF0000"));
}

#[test]
fn test_paragraph_options() {
    let para = node(
        NodeKind::Paragraph,
        json!({
            "heading": "Heading2",
            "alignment": "center",
            "spacing": { "before": 240, "after": 120 },
            "indent": { "left": 720, "firstLine": 360 }
        }),
    );

    let Ok(DocxObject::Paragraph(para)) = Transformer::default().transform_node(&para) else {
        panic!("expected a paragraph");
    };
    assert_eq!(para.options.heading, Some(HeadingLevel::Heading2));
    assert_eq!(para.options.spacing.unwrap().before, Some(240));
    assert_eq!(para.options.indent.unwrap().first_line, Some(360));
}

#[test]
fn test_invalid_property_type() {
    let para = Node::new(NodeKind::Paragraph)
        .child(node(NodeKind::TextRun, json!({ "text": "x", "bold": "yes" })));

    let err = transform(&doc(vec![para])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidProperties);
    assert!(err.to_string().starts_with("Invalid properties for TextRun: "));
}

#[test]
fn test_misplaced_children() {
    let row_in_section = doc(vec![Node::new(NodeKind::TableRow)]);
    let err = transform(&row_in_section).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert_eq!(err.to_string(), "TableRow cannot be placed inside Section");

    let para_in_para =
        doc(vec![Node::new(NodeKind::Paragraph).child(Node::new(NodeKind::Paragraph))]);
    let err = transform(&para_in_para).unwrap_err();
    assert_eq!(err.to_string(), "Paragraph cannot be placed inside Paragraph");

    let run_in_table = doc(vec![Node::new(NodeKind::Table).child(Node::text("x"))]);
    let err = transform(&run_in_table).unwrap_err();
    assert_eq!(err.to_string(), "TextRun cannot be placed inside Table");
}

#[test]
fn test_page_breaks_fit_blocks_and_inlines() {
    let root = doc(vec![
        Node::new(NodeKind::PageBreak),
        Node::new(NodeKind::Paragraph).child(Node::new(NodeKind::PageBreak)),
    ]);

    let document = transform(&root).unwrap();
    assert_eq!(document.sections[0].children[0], Block::PageBreak);
    let Block::Paragraph(para) = &document.sections[0].children[1] else {
        panic!("expected a paragraph");
    };
    assert_eq!(para.children, [Inline::PageBreak]);
}

#[test]
fn test_leaf_children_are_dropped() {
    let page_break = Node::new(NodeKind::PageBreak).child(Node::text("child"));
    let object = Transformer::default().transform_node(&page_break).unwrap();
    assert_eq!(object, DocxObject::PageBreak);

    let line_break = Node::new(NodeKind::Break).child(Node::new(NodeKind::Tab));
    let object = Transformer::default().transform_node(&line_break).unwrap();
    assert_eq!(
        object,
        DocxObject::Inline(Inline::Run(RunOptions::line_break()))
    );
}

#[test]
fn test_leaf_children_in_strict_mode() {
    let tab = Node::new(NodeKind::Tab).child(Node::text("child"));
    let transformer = Transformer::new(TransformFeat {
        strict_leaf_children: true,
        ..TransformFeat::default()
    });

    let err = transformer.transform_node(&tab).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert_eq!(err.to_string(), "Tab cannot have children");
}

#[test]
fn test_links_bookmarks_and_math() {
    let para = Node::new(NodeKind::Paragraph)
        .child(
            node(NodeKind::Bookmark, json!({ "id": "intro" }))
                .child(Node::text("Intro")),
        )
        .child(
            node(NodeKind::ExternalHyperlink, json!({ "link": "https://example.org" }))
                .child(Node::text("site")),
        )
        .child(
            node(NodeKind::InternalHyperlink, json!({ "anchor": "intro" }))
                .child(Node::text("back")),
        )
        .child(node(NodeKind::Math, json!({ "text": "x^2" })));

    let document = transform(&doc(vec![para])).unwrap();
    let Block::Paragraph(para) = first_block(&document) else {
        panic!("expected a paragraph");
    };
    assert_eq!(
        para.children,
        [
            Inline::Bookmark {
                id: "intro".into(),
                children: vec![Inline::Run(RunOptions::text("Intro"))],
            },
            Inline::ExternalHyperlink {
                link: "https://example.org".into(),
                children: vec![Inline::Run(RunOptions::text("site"))],
            },
            Inline::InternalHyperlink {
                anchor: "intro".into(),
                children: vec![Inline::Run(RunOptions::text("back"))],
            },
            Inline::Math {
                text: "x^2".into(),
                children: vec![],
            },
        ]
    );
}

#[test]
fn test_symbol_run() {
    let symbol = node(NodeKind::SymbolRun, json!({ "char": "F071", "bold": true }));
    let Ok(DocxObject::Inline(Inline::Symbol(options))) =
        Transformer::default().transform_node(&symbol)
    else {
        panic!("expected a symbol");
    };
    assert_eq!(options.character(), Some('\u{F071}'));
    assert_eq!(options.font(), "Wingdings");
    assert!(options.run.bold);

    let bad = node(NodeKind::SymbolRun, json!({ "char": "zz" }));
    let err = Transformer::default().transform_node(&bad).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidProperties);
}

#[test]
fn test_run_keeps_text_children() {
    let run = node(NodeKind::TextRun, json!({ "bold": true })).child(Node::text("Hello"));
    let expected = RunOptions {
        text: Some("Hello".into()),
        bold: true,
        ..RunOptions::default()
    };
    assert_eq!(
        Transformer::default().transform_node(&run).unwrap(),
        DocxObject::Inline(Inline::Run(expected))
    );

    let run = node(NodeKind::TextRun, json!({ "text": "Hello" }))
        .child(Node::text(", "))
        .child(Node::text("world"));
    assert_eq!(
        Transformer::default().transform_node(&run).unwrap(),
        DocxObject::Inline(Inline::Run(RunOptions::text("Hello, world")))
    );
}

#[test]
fn test_run_children_property() {
    let mut props = Props::new();
    props.insert("text".into(), json!("kept"));
    props.insert("children".into(), json!([" and ", 3, "more"]));
    let run = Node::with_properties(NodeKind::TextRun, props);
    assert_eq!(
        Transformer::default().transform_node(&run).unwrap(),
        DocxObject::Inline(Inline::Run(RunOptions::text("kept and more")))
    );

    let run = node(NodeKind::TextRun, json!({ "children": "only" }));
    assert_eq!(
        Transformer::default().transform_node(&run).unwrap(),
        DocxObject::Inline(Inline::Run(RunOptions::text("only")))
    );
}

#[test]
fn test_run_drops_structural_children() {
    let run = node(NodeKind::TextRun, json!({}))
        .child(Node::text("kept"))
        .child(Node::new(NodeKind::Tab));
    assert_eq!(
        Transformer::default().transform_node(&run).unwrap(),
        DocxObject::Inline(Inline::Run(RunOptions::text("kept")))
    );

    let strict = Transformer::new(TransformFeat {
        strict_leaf_children: true,
        ..TransformFeat::default()
    });
    let err = strict.transform_node(&run).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert_eq!(err.to_string(), "TextRun cannot have children");

    let text_only = node(NodeKind::TextRun, json!({})).child(Node::text("fine"));
    assert_eq!(
        strict.transform_node(&text_only).unwrap(),
        DocxObject::Inline(Inline::Run(RunOptions::text("fine")))
    );
}
