//! The reconciliation host backed by a [`TreeBuilder`].

use std::time::Duration;

use crate::builder::{Container, NodeId, TreeBuilder};
use crate::element::Element;
use crate::error::{TreeError, TreeResult};
use crate::node::{Node, Props};
use crate::reconciler::{DEFAULT_UPDATE_PRIORITY, HostConfig, Reconciler, TimeoutId};

/// A [`HostConfig`] that records the rendered document as a node tree.
///
/// Scheduling and suspense hooks are inert: the tree never waits for
/// resources and never schedules work.
#[derive(Debug, Default)]
pub struct DocxHost {
    tree: TreeBuilder,
}

impl DocxHost {
    /// Creates a host with an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// The tree built so far.
    pub fn tree(&self) -> &TreeBuilder {
        &self.tree
    }

    /// Consumes the host, returning its tree.
    pub fn into_tree(self) -> TreeBuilder {
        self.tree
    }
}

impl HostConfig for DocxHost {
    type Instance = NodeId;
    type Container = Container;
    type HostContext = ();
    type Error = TreeError;

    fn create_instance(&mut self, tag: &str, props: &Props, _ctx: &()) -> TreeResult<NodeId> {
        self.tree.instantiate(tag, props)
    }

    fn create_text_instance(&mut self, text: &str, _ctx: &()) -> TreeResult<NodeId> {
        Ok(self.tree.instantiate_text(text))
    }

    fn append_initial_child(&mut self, parent: &NodeId, child: &NodeId) {
        self.tree.append_child(*parent, *child);
    }

    fn finalize_initial_children(&mut self, _instance: &NodeId, _tag: &str, _props: &Props) -> bool {
        false
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        self.tree.append_child(*parent, *child);
    }

    fn insert_before(&mut self, parent: &NodeId, child: &NodeId, before: &NodeId) {
        self.tree.insert_before(*parent, *child, *before);
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) {
        self.tree.remove_child(*parent, *child);
    }

    fn append_child_to_container(&mut self, container: &mut Container, child: &NodeId) {
        self.tree.append_to_container(container, *child);
    }

    fn insert_in_container_before(
        &mut self,
        container: &mut Container,
        child: &NodeId,
        _before: &NodeId,
    ) {
        self.tree.append_to_container(container, *child);
    }

    fn remove_child_from_container(&mut self, container: &mut Container, child: &NodeId) {
        self.tree.remove_from_container(container, *child);
    }

    fn prepare_update(
        &mut self,
        _instance: &NodeId,
        _tag: &str,
        _old_props: &Props,
        _new_props: &Props,
    ) -> bool {
        true
    }

    fn commit_update(
        &mut self,
        instance: &NodeId,
        _tag: &str,
        _old_props: &Props,
        new_props: &Props,
    ) {
        self.tree.commit_properties_update(*instance, new_props);
    }

    fn commit_text_update(&mut self, instance: &NodeId, _old_text: &str, new_text: &str) {
        self.tree.commit_text_update(*instance, new_text);
    }

    fn should_set_text_content(&self, _tag: &str, _props: &Props) -> bool {
        false
    }

    fn get_root_host_context(&self, _container: &Container) {}

    fn get_child_host_context(&self, _parent: &(), _tag: &str) {}

    fn prepare_for_commit(&mut self, _container: &mut Container) {}

    fn reset_after_commit(&mut self, _container: &mut Container) {}

    fn clear_container(&mut self, container: &mut Container) {
        container.clear();
    }

    fn detach_deleted_instance(&mut self, _instance: &NodeId) {}

    fn schedule_timeout(&mut self, _delay: Duration) -> Option<TimeoutId> {
        None
    }

    fn cancel_timeout(&mut self, _id: TimeoutId) {}

    fn current_update_priority(&self) -> u32 {
        DEFAULT_UPDATE_PRIORITY
    }

    fn may_suspend_commit(&self, _tag: &str, _props: &Props) -> bool {
        false
    }

    fn preload_instance(&mut self, _tag: &str, _props: &Props) -> bool {
        true
    }

    fn start_suspending_commit(&mut self) {}

    fn suspend_instance(&mut self, _tag: &str, _props: &Props) {}

    fn wait_for_commit_to_be_ready(&mut self) -> bool {
        true
    }
}

/// Renders `element` once and returns the tree under the container root.
///
/// Returns `Ok(None)` when no `Document` node reached the container.
pub fn build_tree(element: Element) -> TreeResult<Option<Node>> {
    let mut reconciler = Reconciler::create_container(DocxHost::new(), Container::new());
    reconciler.update_container(element)?;
    let (host, container) = reconciler.into_parts();
    Ok(container.root().map(|root| host.tree().materialize(root)))
}
