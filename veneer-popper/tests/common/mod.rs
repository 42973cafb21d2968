//! Test harness for overlay integration tests.
//!
//! Provides a scripted positioning adapter whose behaviour can be switched
//! mid-test, and a document wrapper that counts relocations into the body.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use veneer_popper::{
    Dom, GeometryNotifier, MemoryDom, NodeId, OverlayConfig, Overlay, Placement, PopperResult,
    PositionOptions, PositioningAdapter, PositioningInstance,
};

/// How the scripted adapter answers `create`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Report the requested placement as computed right away.
    Immediate,
    /// Create the instance but hold the first computation until
    /// [`ScriptedAdapter::complete`] is called.
    Deferred,
    /// Refuse to create an instance.
    Decline,
}

/// One successful `create` call.
#[derive(Debug, Clone)]
pub struct Created {
    pub reference: NodeId,
    pub floating: NodeId,
    pub options: PositionOptions<NodeId>,
}

/// Everything the adapter was asked to do.
#[derive(Debug, Default)]
pub struct Log {
    pub attempts: usize,
    pub created: Vec<Created>,
    pub updates: usize,
    pub destroyed: usize,
    pub notifiers: Vec<GeometryNotifier>,
}

/// Positioning adapter driven by the test.
///
/// Clones share the same log and mode, so a test keeps one clone while the
/// overlay owns the other.
#[derive(Debug, Clone)]
pub struct ScriptedAdapter {
    log: Rc<RefCell<Log>>,
    mode: Rc<Cell<Mode>>,
}

impl ScriptedAdapter {
    pub fn new(mode: Mode) -> Self {
        Self {
            log: Rc::default(),
            mode: Rc::new(Cell::new(mode)),
        }
    }

    pub fn set_mode(&self, mode: Mode) {
        self.mode.set(mode);
    }

    pub fn attempts(&self) -> usize {
        self.log.borrow().attempts
    }

    pub fn created(&self) -> Vec<Created> {
        self.log.borrow().created.clone()
    }

    pub fn last_options(&self) -> PositionOptions<NodeId> {
        self.log
            .borrow()
            .created
            .last()
            .expect("an instance was created")
            .options
            .clone()
    }

    pub fn updates(&self) -> usize {
        self.log.borrow().updates
    }

    pub fn destroyed(&self) -> usize {
        self.log.borrow().destroyed
    }

    /// Notifier handed to the `index`-th created instance.
    pub fn notifier(&self, index: usize) -> GeometryNotifier {
        self.log.borrow().notifiers[index].clone()
    }

    /// Finish the first computation of the newest instance.
    pub fn complete(&self, placement: Placement) {
        self.latest_notifier().first_computed(placement);
    }

    /// Report a later computation of the newest instance, e.g. a flip.
    pub fn recompute(&self, placement: Placement) {
        self.latest_notifier().recomputed(placement);
    }

    fn latest_notifier(&self) -> GeometryNotifier {
        self.log
            .borrow()
            .notifiers
            .last()
            .cloned()
            .expect("an instance was created")
    }
}

/// Instance produced by [`ScriptedAdapter`].
#[derive(Debug)]
pub struct ScriptedInstance {
    log: Rc<RefCell<Log>>,
}

impl PositioningInstance for ScriptedInstance {
    fn update(&mut self) {
        self.log.borrow_mut().updates += 1;
    }

    fn destroy(&mut self) {
        self.log.borrow_mut().destroyed += 1;
    }
}

impl PositioningAdapter<NodeId> for ScriptedAdapter {
    type Instance = ScriptedInstance;

    fn create(
        &mut self,
        reference: &NodeId,
        floating: &NodeId,
        options: PositionOptions<NodeId>,
        notifier: GeometryNotifier,
    ) -> Option<ScriptedInstance> {
        let mut log = self.log.borrow_mut();
        log.attempts += 1;

        let mode = self.mode.get();
        if mode == Mode::Decline {
            return None;
        }
        if mode == Mode::Immediate {
            notifier.first_computed(options.placement);
        }

        log.created.push(Created {
            reference: *reference,
            floating: *floating,
            options,
        });
        log.notifiers.push(notifier);
        Some(ScriptedInstance {
            log: Rc::clone(&self.log),
        })
    }
}

/// [`MemoryDom`] that counts appends into the body.
#[derive(Debug, Clone)]
pub struct CountingDom {
    inner: MemoryDom,
    body_appends: Rc<Cell<usize>>,
}

impl CountingDom {
    pub fn new(inner: MemoryDom) -> Self {
        Self {
            inner,
            body_appends: Rc::default(),
        }
    }

    pub fn body_appends(&self) -> usize {
        self.body_appends.get()
    }

    pub fn memory(&self) -> &MemoryDom {
        &self.inner
    }
}

impl Dom for CountingDom {
    type Node = NodeId;

    fn append_target(&self) -> Option<NodeId> {
        self.inner.append_target()
    }

    fn create_element(&self, tag: &str) -> PopperResult<NodeId> {
        self.inner.create_element(tag)
    }

    fn attribute_names(&self, node: &NodeId) -> Vec<String> {
        self.inner.attribute_names(node)
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) -> PopperResult<()> {
        self.inner.set_attribute(node, name, value)
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> PopperResult<()> {
        if *parent == self.inner.body() {
            self.body_appends.set(self.body_appends.get() + 1);
        }
        self.inner.append_child(parent, child)
    }

    fn remove_child(&self, parent: &NodeId, child: &NodeId) -> PopperResult<()> {
        self.inner.remove_child(parent, child)
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.inner.parent(node)
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) -> PopperResult<()> {
        self.inner.set_style(node, property, value)
    }

    fn guard_clicks(&self, node: &NodeId) -> PopperResult<()> {
        self.inner.guard_clicks(node)
    }

    fn release_clicks(&self, node: &NodeId) {
        self.inner.release_clicks(node);
    }
}

/// A component tree: `body > container > {reference, floating}`.
///
/// The floating element carries a scoped-style attribute and a class.
pub struct Fixture {
    pub dom: CountingDom,
    pub container: NodeId,
    pub reference: NodeId,
    pub floating: NodeId,
}

impl Fixture {
    pub fn new() -> Self {
        init_tracing();
        let memory = MemoryDom::new();
        let container = memory.create("div");
        let reference = memory.create("button");
        let floating = memory.create("div");

        memory
            .append_child(&memory.body(), &container)
            .expect("attach container");
        memory
            .append_child(&container, &reference)
            .expect("attach reference");
        memory
            .append_child(&container, &floating)
            .expect("attach floating");
        memory
            .set_attribute(&floating, "data-v-7ba5bd90", "")
            .expect("scope attribute");
        memory
            .set_attribute(&floating, "class", "popover")
            .expect("class");

        Self {
            dom: CountingDom::new(memory),
            container,
            reference,
            floating,
        }
    }

    pub fn memory(&self) -> &MemoryDom {
        self.dom.memory()
    }

    /// An overlay with both elements bound, still hidden.
    pub fn overlay(
        &self,
        adapter: &ScriptedAdapter,
        config: OverlayConfig,
    ) -> Overlay<CountingDom, ScriptedAdapter> {
        let mut overlay = Overlay::new(self.dom.clone(), adapter.clone(), config);
        overlay.bind_reference(Some(self.reference));
        overlay.bind_floating(Some(self.floating));
        overlay
    }
}

/// Route engine logs to the test output; filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Shorthand for parsing a canonical placement.
pub fn placement(value: &str) -> Placement {
    value.parse().expect("canonical placement")
}
