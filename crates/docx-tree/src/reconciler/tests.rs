use serde_json::{Value, json};

use super::*;
use crate::components::{component, document, paragraph, section, text_run};
use crate::host::{DocxHost, build_tree};
use crate::node::{Node, NodeKind};
use crate::{Container, TreeError};

#[derive(Debug, Default)]
struct RecordingHost {
    next: u32,
    ops: Vec<String>,
    suspending: Vec<&'static str>,
}

impl RecordingHost {
    fn alloc(&mut self) -> u32 {
        self.next += 1;
        self.next
    }
}

impl HostConfig for RecordingHost {
    type Instance = u32;
    type Container = Vec<u32>;
    type HostContext = ();
    type Error = String;

    fn create_instance(&mut self, tag: &str, _props: &Props, _ctx: &()) -> Result<u32, String> {
        if tag == "Fail" {
            return Err(format!("cannot create {tag}"));
        }
        let id = self.alloc();
        self.ops.push(format!("create {tag} #{id}"));
        Ok(id)
    }

    fn create_text_instance(&mut self, text: &str, _ctx: &()) -> Result<u32, String> {
        let id = self.alloc();
        self.ops.push(format!("text #{id} {text}"));
        Ok(id)
    }

    fn append_initial_child(&mut self, parent: &u32, child: &u32) {
        self.ops.push(format!("initial {parent} <- {child}"));
    }

    fn finalize_initial_children(&mut self, _instance: &u32, _tag: &str, _props: &Props) -> bool {
        false
    }

    fn append_child(&mut self, parent: &u32, child: &u32) {
        self.ops.push(format!("append {parent} <- {child}"));
    }

    fn insert_before(&mut self, parent: &u32, child: &u32, before: &u32) {
        self.ops.push(format!("insert {parent}: {child} before {before}"));
    }

    fn remove_child(&mut self, parent: &u32, child: &u32) {
        self.ops.push(format!("remove {parent}: {child}"));
    }

    fn append_child_to_container(&mut self, container: &mut Vec<u32>, child: &u32) {
        container.push(*child);
        self.ops.push(format!("container append {child}"));
    }

    fn insert_in_container_before(&mut self, container: &mut Vec<u32>, child: &u32, before: &u32) {
        let index = container
            .iter()
            .position(|id| id == before)
            .unwrap_or(container.len());
        container.insert(index, *child);
        self.ops.push(format!("container insert {child} before {before}"));
    }

    fn remove_child_from_container(&mut self, container: &mut Vec<u32>, child: &u32) {
        container.retain(|id| id != child);
        self.ops.push(format!("container remove {child}"));
    }

    fn prepare_update(&mut self, _instance: &u32, _tag: &str, _old: &Props, _new: &Props) -> bool {
        true
    }

    fn commit_update(&mut self, instance: &u32, tag: &str, _old: &Props, new: &Props) {
        self.ops
            .push(format!("update {tag} #{instance} {}", Value::Object(new.clone())));
    }

    fn commit_text_update(&mut self, instance: &u32, old_text: &str, new_text: &str) {
        self.ops
            .push(format!("text update #{instance}: {old_text} -> {new_text}"));
    }

    fn should_set_text_content(&self, _tag: &str, _props: &Props) -> bool {
        false
    }

    fn get_root_host_context(&self, _container: &Vec<u32>) {}

    fn get_child_host_context(&self, _parent: &(), _tag: &str) {}

    fn prepare_for_commit(&mut self, _container: &mut Vec<u32>) {
        self.ops.push("prepare".into());
    }

    fn reset_after_commit(&mut self, _container: &mut Vec<u32>) {
        self.ops.push("reset".into());
    }

    fn clear_container(&mut self, container: &mut Vec<u32>) {
        container.clear();
        self.ops.push("clear".into());
    }

    fn detach_deleted_instance(&mut self, instance: &u32) {
        self.ops.push(format!("detach #{instance}"));
    }

    fn schedule_timeout(&mut self, _delay: Duration) -> Option<TimeoutId> {
        None
    }

    fn cancel_timeout(&mut self, _id: TimeoutId) {}

    fn current_update_priority(&self) -> u32 {
        DEFAULT_UPDATE_PRIORITY
    }

    fn may_suspend_commit(&self, tag: &str, _props: &Props) -> bool {
        tag == "ImageRun"
    }

    fn preload_instance(&mut self, tag: &str, _props: &Props) -> bool {
        self.suspending.push("preload");
        tag != "ImageRun"
    }

    fn start_suspending_commit(&mut self) {
        self.ops.push("start suspending".into());
    }

    fn suspend_instance(&mut self, tag: &str, _props: &Props) {
        self.ops.push(format!("suspend {tag}"));
    }

    fn wait_for_commit_to_be_ready(&mut self) -> bool {
        self.ops.push("wait".into());
        true
    }
}

fn recording() -> Reconciler<RecordingHost> {
    Reconciler::create_container(RecordingHost::default(), Vec::new())
}

fn update(rec: &mut Reconciler<RecordingHost>, element: impl Into<Element>) -> Vec<String> {
    let mark = rec.host().ops.len();
    rec.update_container(element.into()).unwrap();
    rec.host().ops[mark..].to_vec()
}

fn keyed_runs(keys: &[&str]) -> Element {
    paragraph()
        .children(keys.iter().map(|key| text_run(*key).key(*key)))
        .build()
}

#[test]
fn test_mount_builds_bottom_up() {
    let mut rec = recording();
    let ops = update(
        &mut rec,
        document().child(section().child(paragraph().text("Hello"))),
    );

    assert_eq!(
        ops,
        [
            "prepare",
            "clear",
            "create Document #1",
            "create Section #2",
            "create Paragraph #3",
            "text #4 Hello",
            "initial 3 <- 4",
            "initial 2 <- 3",
            "initial 1 <- 2",
            "container append 1",
            "reset",
        ]
    );
    assert_eq!(rec.container(), &[1]);
}

#[test]
fn test_keyed_reorder_moves_minimal_set() {
    let mut rec = recording();
    update(&mut rec, keyed_runs(&["a", "b", "c"]));

    let ops = update(&mut rec, keyed_runs(&["c", "a", "b"]));
    assert_eq!(
        ops,
        ["prepare", "append 1 <- 3", "insert 1: 2 before 3", "reset"]
    );
}

#[test]
fn test_keyed_remove_then_insert() {
    let mut rec = recording();
    update(&mut rec, keyed_runs(&["A", "B", "C"]));

    let ops = update(&mut rec, keyed_runs(&["A", "C"]));
    assert_eq!(ops, ["prepare", "detach #3", "remove 1: 3", "reset"]);

    let ops = update(&mut rec, keyed_runs(&["A", "D", "C"]));
    assert_eq!(
        ops,
        [
            "prepare",
            "create TextRun #5",
            "insert 1: 5 before 4",
            "reset"
        ]
    );
}

#[test]
fn test_text_change_commits_text_update() {
    let mut rec = recording();
    update(&mut rec, paragraph().text("old"));

    let ops = update(&mut rec, paragraph().text("new"));
    assert_eq!(ops, ["prepare", "text update #2: old -> new", "reset"]);

    let ops = update(&mut rec, paragraph().text("new"));
    assert_eq!(ops, ["prepare", "reset"]);
}

#[test]
fn test_props_change_commits_update() {
    let mut rec = recording();
    update(&mut rec, paragraph().prop("alignment", "left"));

    let ops = update(&mut rec, paragraph().prop("alignment", "right"));
    assert_eq!(
        ops,
        [
            "prepare",
            r#"update Paragraph #1 {"alignment":"right"}"#,
            "reset"
        ]
    );
}

#[test]
fn test_type_change_replaces_subtree() {
    let mut rec = recording();
    update(&mut rec, paragraph().text("x"));

    let ops = update(&mut rec, paragraph().child(text_run("x")));
    assert_eq!(
        ops,
        [
            "prepare",
            "detach #2",
            "create TextRun #3",
            "remove 1: 2",
            "append 1 <- 3",
            "reset",
        ]
    );
}

#[test]
fn test_fragments_are_flattened() {
    let mut rec = recording();
    let ops = update(
        &mut rec,
        paragraph()
            .child(Element::fragment([Element::text("a"), Element::text("b")]))
            .child(Element::Empty)
            .text("c"),
    );

    assert_eq!(
        ops,
        [
            "prepare",
            "clear",
            "create Paragraph #1",
            "text #2 a",
            "text #3 b",
            "text #4 c",
            "initial 1 <- 2",
            "initial 1 <- 3",
            "initial 1 <- 4",
            "container append 1",
            "reset",
        ]
    );
}

#[test]
fn test_components_rerender_in_place() {
    let mut rec = recording();
    let greeting = |text: &'static str| {
        component("Greeting", move || text_run(text).build())
    };

    update(&mut rec, paragraph().child(greeting("Hi")));
    let ops = update(&mut rec, paragraph().child(greeting("Bye")));

    assert_eq!(
        ops,
        [
            "prepare",
            r#"update TextRun #2 {"text":"Bye"}"#,
            "reset"
        ]
    );
}

#[test]
fn test_unmount_detaches_everything() {
    let mut rec = recording();
    update(&mut rec, section().child(paragraph().text("gone")));

    let mark = rec.host().ops.len();
    rec.unmount_container().unwrap();

    assert_eq!(
        rec.host().ops[mark..],
        [
            "prepare",
            "detach #1",
            "detach #2",
            "detach #3",
            "container remove 1",
            "reset"
        ]
    );
    assert!(rec.container().is_empty());
}

#[test]
fn test_suspending_instances_bracket_the_commit() {
    let mut rec = recording();
    let ops = update(
        &mut rec,
        paragraph().child(crate::components::image_run("aGk=")),
    );

    assert_eq!(
        ops,
        [
            "prepare",
            "clear",
            "create Paragraph #1",
            "create ImageRun #2",
            "suspend ImageRun",
            "initial 1 <- 2",
            "container append 1",
            "start suspending",
            "wait",
            "reset",
        ]
    );
    assert_eq!(rec.host().suspending, ["preload"]);
}

#[test]
fn test_creation_error_aborts_update() {
    let mut rec = recording();
    let err = rec
        .update_container(paragraph().child(Element::host("Fail", Props::new(), vec![])).build())
        .unwrap_err();

    assert_eq!(err, "cannot create Fail");
    assert_eq!(rec.host().ops.last().map(String::as_str), Some("reset"));
}

#[test]
fn test_build_tree_hello() {
    let tree = build_tree(
        document()
            .child(section().child(paragraph().child(text_run("Hello"))))
            .build(),
    )
    .unwrap();

    let expected = Node::new(NodeKind::Document).child(
        Node::new(NodeKind::Section)
            .child(Node::new(NodeKind::Paragraph).child(Node::text("Hello"))),
    );
    assert_eq!(tree, Some(expected));
}

#[test]
fn test_build_tree_without_document_root() {
    let tree = build_tree(paragraph().text("orphan").build()).unwrap();
    assert_eq!(tree, None);
}

#[test]
fn test_build_tree_unknown_kind() {
    let err = build_tree(Element::host("Marquee", Props::new(), vec![])).unwrap_err();
    assert_eq!(err, TreeError::UnknownElementKind("Marquee".into()));
}

fn docx_texts(rec: &Reconciler<DocxHost>) -> Vec<String> {
    let Some(root) = rec.container().root() else {
        return Vec::new();
    };
    let doc = rec.host().tree().materialize(root);
    doc.children[0].children[0]
        .children
        .iter()
        .filter_map(|run| run.text_content().map(str::to_owned))
        .collect()
}

fn docx_doc(keys: &[&str]) -> Element {
    document()
        .child(section().child(keyed_runs(keys)))
        .build()
}

#[test]
fn test_docx_host_rerender_preserves_order() {
    let mut rec = Reconciler::create_container(DocxHost::new(), Container::new());

    rec.update_container(docx_doc(&["A", "B", "C"])).unwrap();
    assert_eq!(docx_texts(&rec), ["A", "B", "C"]);

    rec.update_container(docx_doc(&["A", "C"])).unwrap();
    assert_eq!(docx_texts(&rec), ["A", "C"]);

    rec.update_container(docx_doc(&["A", "D", "C"])).unwrap();
    assert_eq!(docx_texts(&rec), ["A", "D", "C"]);

    rec.update_container(docx_doc(&["C", "A", "D"])).unwrap();
    assert_eq!(docx_texts(&rec), ["C", "A", "D"]);
}

#[test]
fn test_docx_host_text_update_keeps_other_props() {
    let mut rec = Reconciler::create_container(DocxHost::new(), Container::new());
    let doc = |text: &str| {
        document()
            .child(section().child(paragraph().prop("alignment", "center").text(text)))
            .build()
    };

    rec.update_container(doc("before")).unwrap();
    rec.update_container(doc("after")).unwrap();

    let root = rec.container().root().unwrap();
    let para = rec.host().tree().materialize(root).children[0].children[0].clone();
    assert_eq!(para.prop("alignment"), Some(&json!("center")));
    assert_eq!(para.children, [Node::text("after")]);
}

#[test]
fn test_docx_host_unmount_clears_root() {
    let mut rec = Reconciler::create_container(DocxHost::new(), Container::new());
    rec.update_container(docx_doc(&["A"])).unwrap();
    assert!(rec.container().root().is_some());

    rec.unmount_container().unwrap();
    assert_eq!(rec.container().root(), None);
}
