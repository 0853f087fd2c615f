//! A retained-mode reconciliation engine.
//!
//! [`Reconciler`] keeps a fiber tree mirroring the last rendered [`Element`]
//! tree. Each [`Reconciler::update_container`] call diffs the new element tree
//! against it and drives a [`HostConfig`] through the resulting mutations.
//! Rendering and committing happen synchronously inside that call.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use ecow::EcoString;
use log::debug;

use crate::element::{Element, HostElement};
use crate::node::Props;

#[cfg(test)]
mod tests;

/// Priority reported for updates when the host has no event in flight.
pub const DEFAULT_UPDATE_PRIORITY: u32 = 16;

/// Identifies a timer created through [`HostConfig::schedule_timeout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeoutId(pub u64);

/// The host-backend contract driven by the [`Reconciler`].
///
/// A host owns the actual instances. The engine decides what changes; the host
/// decides what a change means.
pub trait HostConfig {
    /// A handle to a host instance.
    type Instance: Clone + PartialEq + fmt::Debug;
    /// The root holder instances are attached to.
    type Container;
    /// Context threaded from parents to children during instance creation.
    type HostContext: Clone;
    /// Error raised by instance creation.
    type Error;

    /// Creates an instance for a host element.
    fn create_instance(
        &mut self,
        tag: &str,
        props: &Props,
        ctx: &Self::HostContext,
    ) -> Result<Self::Instance, Self::Error>;
    /// Creates an instance for a bare text value.
    fn create_text_instance(
        &mut self,
        text: &str,
        ctx: &Self::HostContext,
    ) -> Result<Self::Instance, Self::Error>;
    /// Appends a child while its parent is still being built.
    fn append_initial_child(&mut self, parent: &Self::Instance, child: &Self::Instance);
    /// Called once the initial children of an instance are attached.
    ///
    /// Returns whether the instance needs work after mounting.
    fn finalize_initial_children(
        &mut self,
        instance: &Self::Instance,
        tag: &str,
        props: &Props,
    ) -> bool;
    /// Appends a child to a mounted parent.
    fn append_child(&mut self, parent: &Self::Instance, child: &Self::Instance);
    /// Inserts a child before an existing sibling.
    fn insert_before(
        &mut self,
        parent: &Self::Instance,
        child: &Self::Instance,
        before: &Self::Instance,
    );
    /// Removes a child from a mounted parent.
    fn remove_child(&mut self, parent: &Self::Instance, child: &Self::Instance);
    /// Attaches a top-level instance to the container.
    fn append_child_to_container(&mut self, container: &mut Self::Container, child: &Self::Instance);
    /// Attaches a top-level instance before another one.
    fn insert_in_container_before(
        &mut self,
        container: &mut Self::Container,
        child: &Self::Instance,
        before: &Self::Instance,
    );
    /// Detaches a top-level instance from the container.
    fn remove_child_from_container(
        &mut self,
        container: &mut Self::Container,
        child: &Self::Instance,
    );
    /// Decides whether a props change needs committing.
    fn prepare_update(
        &mut self,
        instance: &Self::Instance,
        tag: &str,
        old_props: &Props,
        new_props: &Props,
    ) -> bool;
    /// Applies a props change.
    fn commit_update(
        &mut self,
        instance: &Self::Instance,
        tag: &str,
        old_props: &Props,
        new_props: &Props,
    );
    /// Applies a text change.
    fn commit_text_update(&mut self, instance: &Self::Instance, old_text: &str, new_text: &str);
    /// Whether the host renders the children of this element itself.
    fn should_set_text_content(&self, tag: &str, props: &Props) -> bool;
    /// Context for top-level instances.
    fn get_root_host_context(&self, container: &Self::Container) -> Self::HostContext;
    /// Context for the children of an instance.
    fn get_child_host_context(&self, parent: &Self::HostContext, tag: &str) -> Self::HostContext;
    /// Called before a batch of mutations.
    fn prepare_for_commit(&mut self, container: &mut Self::Container);
    /// Called after a batch of mutations.
    fn reset_after_commit(&mut self, container: &mut Self::Container);
    /// Empties the container before its first mount.
    fn clear_container(&mut self, container: &mut Self::Container);
    /// Called for every instance of a deleted subtree.
    fn detach_deleted_instance(&mut self, instance: &Self::Instance);

    /// Schedules a timer.
    fn schedule_timeout(&mut self, delay: Duration) -> Option<TimeoutId>;
    /// Cancels a timer.
    fn cancel_timeout(&mut self, id: TimeoutId);
    /// The priority of the update being scheduled.
    fn current_update_priority(&self) -> u32;
    /// Whether committing this element may have to wait for resources.
    fn may_suspend_commit(&self, tag: &str, props: &Props) -> bool;
    /// Starts loading resources; returns whether they are already available.
    fn preload_instance(&mut self, tag: &str, props: &Props) -> bool;
    /// Opens a suspended commit.
    fn start_suspending_commit(&mut self);
    /// Registers an element the suspended commit waits for.
    fn suspend_instance(&mut self, tag: &str, props: &Props);
    /// Whether the suspended commit may proceed right away.
    fn wait_for_commit_to_be_ready(&mut self) -> bool;
}

#[derive(Debug)]
enum FiberKind {
    Empty,
    Text(EcoString),
    Fragment,
    Host { tag: EcoString, props: Props },
    Component(EcoString),
}

#[derive(Debug)]
struct Fiber<I> {
    kind: FiberKind,
    key: Option<EcoString>,
    index: usize,
    instance: Option<I>,
    children: Vec<Fiber<I>>,
}

impl<I: Clone> Fiber<I> {
    fn leaf(kind: FiberKind, key: Option<EcoString>, index: usize) -> Self {
        Self {
            kind,
            key,
            index,
            instance: None,
            children: Vec::new(),
        }
    }

    fn matches(&self, element: &Element) -> bool {
        match (&self.kind, element) {
            (FiberKind::Empty, Element::Empty)
            | (FiberKind::Text(_), Element::Text(_))
            | (FiberKind::Fragment, Element::Fragment(_)) => true,
            (FiberKind::Host { tag, .. }, Element::Host(host)) => *tag == host.tag,
            (FiberKind::Component(name), Element::Component(component)) => {
                *name == component.name
            }
            _ => false,
        }
    }

    /// Collects the outermost host instances of this subtree, in order.
    fn collect_host_instances(&self, out: &mut Vec<I>) {
        match &self.instance {
            Some(instance) => out.push(instance.clone()),
            None => self
                .children
                .iter()
                .for_each(|child| child.collect_host_instances(out)),
        }
    }

    fn collect_all_instances(&self, out: &mut Vec<I>) {
        if let Some(instance) = &self.instance {
            out.push(instance.clone());
        }
        self.children
            .iter()
            .for_each(|child| child.collect_all_instances(out));
    }
}

fn host_instances<I: Clone>(fibers: &[Fiber<I>]) -> Vec<I> {
    let mut out = Vec::new();
    fibers
        .iter()
        .for_each(|fiber| fiber.collect_host_instances(&mut out));
    out
}

#[derive(Debug, PartialEq, Eq, Hash)]
enum SlotKey {
    Explicit(EcoString),
    Implicit(usize),
}

impl SlotKey {
    fn new(key: Option<&EcoString>, index: usize) -> Self {
        match key {
            Some(key) => SlotKey::Explicit(key.clone()),
            None => SlotKey::Implicit(index),
        }
    }
}

/// Drives a [`HostConfig`] from successive element trees.
pub struct Reconciler<H: HostConfig> {
    host: H,
    container: H::Container,
    root: Option<Fiber<H::Instance>>,
    suspended: bool,
}

impl<H: HostConfig> Reconciler<H> {
    /// Creates a reconciler rendering into `container`.
    pub fn create_container(host: H, container: H::Container) -> Self {
        Self {
            host,
            container,
            root: None,
            suspended: false,
        }
    }

    /// The host backend.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The container.
    pub fn container(&self) -> &H::Container {
        &self.container
    }

    /// Splits the reconciler into its host and container.
    pub fn into_parts(self) -> (H, H::Container) {
        (self.host, self.container)
    }

    /// Renders `element` into the container and commits the result.
    ///
    /// Returning `Ok` means the commit is complete. On error the retained
    /// tree is discarded and the next update mounts from scratch.
    pub fn update_container(&mut self, element: Element) -> Result<(), H::Error> {
        let priority = self.host.current_update_priority();
        debug!("reconciler: updating container at priority {priority}");

        let ctx = self.host.get_root_host_context(&self.container);
        self.host.prepare_for_commit(&mut self.container);
        if self.root.is_none() {
            self.host.clear_container(&mut self.container);
        }

        let old: Vec<_> = self.root.take().into_iter().collect();
        let before = host_instances(&old);
        let fibers = match self.reconcile_children(old, vec![element], &ctx) {
            Ok(fibers) => fibers,
            Err(err) => {
                self.suspended = false;
                self.host.reset_after_commit(&mut self.container);
                return Err(err);
            }
        };
        let after = host_instances(&fibers);
        self.place_children(None, &before, &after);

        if std::mem::take(&mut self.suspended) {
            self.host.start_suspending_commit();
            if !self.host.wait_for_commit_to_be_ready() {
                debug!("reconciler: committing before suspended resources are ready");
            }
        }
        self.host.reset_after_commit(&mut self.container);
        self.root = fibers.into_iter().next();
        Ok(())
    }

    /// Unmounts everything rendered so far.
    pub fn unmount_container(&mut self) -> Result<(), H::Error> {
        self.update_container(Element::Empty)
    }

    fn reconcile_children(
        &mut self,
        old: Vec<Fiber<H::Instance>>,
        elements: Vec<Element>,
        ctx: &H::HostContext,
    ) -> Result<Vec<Fiber<H::Instance>>, H::Error> {
        let mut existing: HashMap<SlotKey, Fiber<H::Instance>> = old
            .into_iter()
            .map(|fiber| (SlotKey::new(fiber.key.as_ref(), fiber.index), fiber))
            .collect();

        let mut fibers = Vec::with_capacity(elements.len());
        for (index, element) in elements.into_iter().enumerate() {
            let slot = SlotKey::new(element.key(), index);
            let fiber = match existing.remove(&slot) {
                Some(fiber) if fiber.matches(&element) => {
                    self.update_fiber(fiber, element, index, ctx)?
                }
                Some(stale) => {
                    self.delete_fiber(stale);
                    self.mount_fiber(element, index, ctx)?
                }
                None => self.mount_fiber(element, index, ctx)?,
            };
            fibers.push(fiber);
        }

        let mut stale: Vec<_> = existing.into_values().collect();
        stale.sort_by_key(|fiber| fiber.index);
        stale.into_iter().for_each(|fiber| self.delete_fiber(fiber));

        Ok(fibers)
    }

    fn mount_fiber(
        &mut self,
        element: Element,
        index: usize,
        ctx: &H::HostContext,
    ) -> Result<Fiber<H::Instance>, H::Error> {
        let key = element.key().cloned();
        match element {
            Element::Empty => Ok(Fiber::leaf(FiberKind::Empty, key, index)),
            Element::Text(text) => {
                let instance = self.host.create_text_instance(&text, ctx)?;
                let mut fiber = Fiber::leaf(FiberKind::Text(text), key, index);
                fiber.instance = Some(instance);
                Ok(fiber)
            }
            Element::Fragment(children) => {
                let mut fiber = Fiber::leaf(FiberKind::Fragment, key, index);
                fiber.children = self.reconcile_children(Vec::new(), children, ctx)?;
                Ok(fiber)
            }
            Element::Component(component) => {
                let rendered = component.render();
                let mut fiber = Fiber::leaf(FiberKind::Component(component.name), key, index);
                fiber.children = self.reconcile_children(Vec::new(), vec![rendered], ctx)?;
                Ok(fiber)
            }
            Element::Host(HostElement {
                tag,
                props,
                children,
                ..
            }) => {
                let instance = self.host.create_instance(&tag, &props, ctx)?;
                let child_ctx = self.host.get_child_host_context(ctx, &tag);
                let child_fibers = if self.host.should_set_text_content(&tag, &props) {
                    Vec::new()
                } else {
                    self.reconcile_children(Vec::new(), children, &child_ctx)?
                };

                for child in host_instances(&child_fibers) {
                    self.host.append_initial_child(&instance, &child);
                }
                self.host.finalize_initial_children(&instance, &tag, &props);
                if self.host.may_suspend_commit(&tag, &props)
                    && !self.host.preload_instance(&tag, &props)
                {
                    self.host.suspend_instance(&tag, &props);
                    self.suspended = true;
                }

                let mut fiber = Fiber::leaf(FiberKind::Host { tag, props }, key, index);
                fiber.instance = Some(instance);
                fiber.children = child_fibers;
                Ok(fiber)
            }
        }
    }

    fn update_fiber(
        &mut self,
        mut fiber: Fiber<H::Instance>,
        element: Element,
        index: usize,
        ctx: &H::HostContext,
    ) -> Result<Fiber<H::Instance>, H::Error> {
        fiber.index = index;
        match element {
            Element::Empty => {}
            Element::Text(text) => {
                if let (FiberKind::Text(old), Some(instance)) = (&fiber.kind, &fiber.instance)
                    && *old != text
                {
                    self.host.commit_text_update(instance, old, &text);
                }
                fiber.kind = FiberKind::Text(text);
            }
            Element::Fragment(children) => {
                let old = std::mem::take(&mut fiber.children);
                fiber.children = self.reconcile_children(old, children, ctx)?;
            }
            Element::Component(component) => {
                let rendered = component.render();
                let old = std::mem::take(&mut fiber.children);
                fiber.children = self.reconcile_children(old, vec![rendered], ctx)?;
            }
            Element::Host(HostElement {
                tag,
                props,
                children,
                ..
            }) => {
                let Some(instance) = fiber.instance.clone() else {
                    return Ok(fiber);
                };
                if let FiberKind::Host {
                    props: old_props, ..
                } = &fiber.kind
                    && *old_props != props
                    && self.host.prepare_update(&instance, &tag, old_props, &props)
                {
                    self.host.commit_update(&instance, &tag, old_props, &props);
                }

                let child_ctx = self.host.get_child_host_context(ctx, &tag);
                let old = std::mem::take(&mut fiber.children);
                let before = host_instances(&old);
                let children = if self.host.should_set_text_content(&tag, &props) {
                    Vec::new()
                } else {
                    children
                };
                fiber.children = self.reconcile_children(old, children, &child_ctx)?;
                let after = host_instances(&fiber.children);
                self.place_children(Some(&instance), &before, &after);
                fiber.kind = FiberKind::Host { tag, props };
            }
        }
        Ok(fiber)
    }

    fn delete_fiber(&mut self, fiber: Fiber<H::Instance>) {
        let mut instances = Vec::new();
        fiber.collect_all_instances(&mut instances);
        for instance in &instances {
            self.host.detach_deleted_instance(instance);
        }
    }

    /// Brings the host children of `parent` (or the container) from `before`
    /// to `after`.
    ///
    /// Survivors that keep their relative order stay in place; new and moved
    /// instances are placed from last to first, anchored on their successor.
    fn place_children(
        &mut self,
        parent: Option<&H::Instance>,
        before: &[H::Instance],
        after: &[H::Instance],
    ) {
        for gone in before.iter().filter(|inst| !after.contains(inst)) {
            match parent {
                Some(parent) => self.host.remove_child(parent, gone),
                None => self
                    .host
                    .remove_child_from_container(&mut self.container, gone),
            }
        }

        let survivors: Vec<&H::Instance> =
            before.iter().filter(|inst| after.contains(inst)).collect();
        let mut last_placed = 0;
        let placements: Vec<bool> = after
            .iter()
            .map(|inst| match survivors.iter().position(|kept| *kept == inst) {
                Some(old_index) if old_index >= last_placed => {
                    last_placed = old_index;
                    false
                }
                _ => true,
            })
            .collect();

        let mut anchor: Option<&H::Instance> = None;
        for (inst, place) in after.iter().zip(placements).rev() {
            if place {
                match (parent, anchor) {
                    (Some(parent), Some(next)) => self.host.insert_before(parent, inst, next),
                    (Some(parent), None) => self.host.append_child(parent, inst),
                    (None, Some(next)) => {
                        self.host.insert_in_container_before(&mut self.container, inst, next)
                    }
                    (None, None) => self.host.append_child_to_container(&mut self.container, inst),
                }
            }
            anchor = Some(inst);
        }
    }
}

impl<H: HostConfig + fmt::Debug> fmt::Debug for Reconciler<H>
where
    H::Container: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("host", &self.host)
            .field("container", &self.container)
            .field("mounted", &self.root.is_some())
            .finish()
    }
}
