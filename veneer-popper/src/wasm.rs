//! WebAssembly bindings for the browser.
//!
//! [`WebDom`] implements [`Dom`] over the page document and [`PopperJs`]
//! adapts the global `Popper.createPopper` (Popper.js v2) to
//! [`PositioningAdapter`].

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Object, Reflect, JSON};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement};

use crate::{
    Dom, GeometryNotifier, ModifierOptions, Placement, PopperError, PopperResult,
    PositionOptions, PositioningAdapter, PositioningInstance,
};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();
}

fn js_error(value: &JsValue) -> PopperError {
    PopperError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

type Callback = Closure<dyn FnMut(JsValue)>;
type ClickGuard = Closure<dyn FnMut(Event)>;

/// The page document.
#[derive(Clone)]
pub struct WebDom {
    document: Document,
    guards: Rc<RefCell<Vec<(Element, ClickGuard)>>>,
}

impl WebDom {
    /// Handle to the current window's document, if there is one.
    #[must_use]
    pub fn new() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self {
            document,
            guards: Rc::default(),
        })
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn append_target(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn create_element(&self, tag: &str) -> PopperResult<Element> {
        self.document.create_element(tag).map_err(|e| js_error(&e))
    }

    fn attribute_names(&self, node: &Element) -> Vec<String> {
        node.get_attribute_names()
            .iter()
            .filter_map(|name| name.as_string())
            .collect()
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) -> PopperResult<()> {
        node.set_attribute(name, value).map_err(|e| js_error(&e))
    }

    fn append_child(&self, parent: &Element, child: &Element) -> PopperResult<()> {
        parent
            .append_child(child)
            .map(|_| ())
            .map_err(|e| js_error(&e))
    }

    fn remove_child(&self, parent: &Element, child: &Element) -> PopperResult<()> {
        parent
            .remove_child(child)
            .map(|_| ())
            .map_err(|e| js_error(&e))
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) -> PopperResult<()> {
        let element = node
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| PopperError::Dom("element has no inline style".to_string()))?;
        element
            .style()
            .set_property(property, value)
            .map_err(|e| js_error(&e))
    }

    fn guard_clicks(&self, node: &Element) -> PopperResult<()> {
        let guard = ClickGuard::new(|event: Event| event.stop_propagation());
        node.add_event_listener_with_callback("click", guard.as_ref().unchecked_ref())
            .map_err(|e| js_error(&e))?;
        self.guards.borrow_mut().push((node.clone(), guard));
        Ok(())
    }

    fn release_clicks(&self, node: &Element) {
        let mut guards = self.guards.borrow_mut();
        if let Some(index) = guards.iter().position(|(element, _)| element == node) {
            let (element, guard) = guards.remove(index);
            if let Err(e) =
                element.remove_event_listener_with_callback("click", guard.as_ref().unchecked_ref())
            {
                tracing::warn!("Failed to remove click guard: {:?}", e);
            }
        }
    }
}

#[wasm_bindgen]
extern "C" {
    type PopperHandle;

    #[wasm_bindgen(catch, js_namespace = Popper, js_name = createPopper)]
    fn create_popper(
        reference: &Element,
        popper: &Element,
        options: &JsValue,
    ) -> Result<PopperHandle, JsValue>;

    #[wasm_bindgen(method, js_name = update)]
    fn schedule_update(this: &PopperHandle) -> js_sys::Promise;

    #[wasm_bindgen(method, js_name = destroy)]
    fn release(this: &PopperHandle);
}

fn set(target: &JsValue, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(target, &JsValue::from_str(key), value).map(|_| ())
}

fn placement_of(state: &JsValue) -> Option<Placement> {
    Reflect::get(state, &JsValue::from_str("placement"))
        .ok()?
        .as_string()?
        .parse()
        .ok()
}

fn options_object(
    options: &PositionOptions<Element>,
    on_first_update: &Callback,
    on_write: &Callback,
) -> Result<JsValue, JsValue> {
    let object = Object::new();
    set(&object, "placement", &JsValue::from_str(options.placement.as_str()))?;
    set(&object, "strategy", &JsValue::from_str(options.strategy.as_str()))?;

    let modifiers = Array::new();
    for step in &options.modifiers {
        let modifier = JSON::parse(&step.to_json().to_string())?;
        if let ModifierOptions::Arrow { element, .. } = &step.options {
            let arrow_options = Reflect::get(&modifier, &JsValue::from_str("options"))?;
            set(&arrow_options, "element", element)?;
        }
        modifiers.push(&modifier);
    }

    // Popper.js has no per-update callback; an afterWrite modifier stands in.
    let recompute = Object::new();
    set(&recompute, "name", &JsValue::from_str("veneerRecompute"))?;
    set(&recompute, "enabled", &JsValue::TRUE)?;
    set(&recompute, "phase", &JsValue::from_str("afterWrite"))?;
    set(&recompute, "fn", on_write.as_ref())?;
    modifiers.push(&recompute);

    set(&object, "modifiers", &modifiers)?;
    set(&object, "onFirstUpdate", on_first_update.as_ref())?;
    Ok(object.into())
}

/// A live Popper.js instance.
pub struct PopperJsInstance {
    handle: PopperHandle,
    _on_first_update: Callback,
    _on_write: Callback,
}

impl PositioningInstance for PopperJsInstance {
    fn update(&mut self) {
        // The returned promise resolves with the new state; the afterWrite
        // modifier already reports it.
        let _ = self.handle.schedule_update();
    }

    fn destroy(&mut self) {
        self.handle.release();
    }
}

/// Adapter over the global `Popper.createPopper`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PopperJs;

impl PositioningAdapter<Element> for PopperJs {
    type Instance = PopperJsInstance;

    fn create(
        &mut self,
        reference: &Element,
        floating: &Element,
        options: PositionOptions<Element>,
        notifier: GeometryNotifier,
    ) -> Option<PopperJsInstance> {
        let first = notifier.clone();
        let on_first_update = Callback::new(move |state: JsValue| {
            if let Some(placement) = placement_of(&state) {
                first.first_computed(placement);
            }
        });

        let on_write = Callback::new(move |args: JsValue| {
            let state =
                Reflect::get(&args, &JsValue::from_str("state")).unwrap_or(JsValue::UNDEFINED);
            if let Some(placement) = placement_of(&state) {
                notifier.recomputed(placement);
            }
        });

        let js_options = match options_object(&options, &on_first_update, &on_write) {
            Ok(js_options) => js_options,
            Err(e) => {
                tracing::warn!("Failed to build Popper options: {:?}", e);
                return None;
            }
        };

        match create_popper(reference, floating, &js_options) {
            Ok(handle) => Some(PopperJsInstance {
                handle,
                _on_first_update: on_first_update,
                _on_write: on_write,
            }),
            Err(e) => {
                tracing::warn!("Popper.createPopper failed: {:?}", e);
                None
            }
        }
    }
}
