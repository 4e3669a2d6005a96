// spatial_focus: Rust/WASM spatial focus navigation engine for remote-control UIs.
// All navigation logic lives in plain Rust; the browser only supplies elements and key events.

mod config;
mod dom;
mod effects;
mod error;
mod focus;
mod input;
mod profile;
mod registry;
mod spatial;
mod types;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use web_sys::{Element, KeyboardEvent, Window};

pub use config::{EngineConfig, NavSettings};
pub use dom::{DomRegion, TOGGLE_PLAYBACK_EVENT};
pub use effects::{Effect, ScrollOptions};
pub use error::NavError;
pub use focus::{FocusEngine, FocusListener, FocusState, Outcome};
pub use input::{classify, is_action_key};
pub use profile::{
    build_key_table, detect_profile, resolve_profile, ActionKeys, KeyProfile, KeyTable,
    ProfileRequest,
};
pub use registry::{FocusRegistry, Region};
pub use spatial::{find_next, find_next_with};
pub use types::*;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Focus engine exposed to JavaScript.
/// One instance per application session; the visual layer registers elements
/// on mount, unregisters on unmount, and forwards `keydown` events.
///
/// Methods take `&self` and never hold the inner borrow while calling out to
/// JS, so subscribers and click handlers may call back into the engine.
#[wasm_bindgen]
pub struct NavEngine {
    engine: RefCell<FocusEngine<DomRegion>>,
    listeners: RefCell<Vec<js_sys::Function>>,
    key_table: KeyTable,
    window: Window,
}

#[wasm_bindgen]
impl NavEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<NavEngine, JsValue> {
        let config = EngineConfig::from_json(config_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window available"))?;

        let stored = dom::stored_preference(&window, &config.preference_key);
        let profile = config.resolve_profile(stored.as_deref(), &dom::device_signature(&window));

        Ok(NavEngine {
            engine: RefCell::new(FocusEngine::with_settings(config.navigation)),
            listeners: RefCell::new(Vec::new()),
            key_table: build_key_table(profile),
            window,
        })
    }

    /// Register (or replace) a focusable element.
    pub fn register(&self, id: &str, element: Element) -> Result<(), JsValue> {
        let effects = self.engine.borrow_mut().register(id, DomRegion::new(element));
        self.finish(&effects)
    }

    pub fn unregister(&self, id: &str) {
        self.engine.borrow_mut().unregister(id);
        self.notify();
    }

    /// Focus `id`, or clear focus with `null`.
    #[wasm_bindgen(js_name = setFocus)]
    pub fn set_focus(&self, id: Option<String>, prevent_scroll: Option<bool>) -> Result<(), JsValue> {
        let options = FocusOptions {
            prevent_scroll: prevent_scroll.unwrap_or(false),
        };
        let effects = self.engine.borrow_mut().set_focus(id.as_deref(), options);
        self.finish(&effects)
    }

    #[wasm_bindgen(js_name = focusedId)]
    pub fn focused_id(&self) -> Option<String> {
        self.engine.borrow().focused_id().map(|id| id.to_string())
    }

    /// Call `callback(id | null)` whenever focus changes.
    pub fn subscribe(&self, callback: js_sys::Function) {
        self.listeners.borrow_mut().push(callback);
    }

    /// Handle a `keydown` event. Returns `true` when the engine consumed it
    /// (its default action has been prevented).
    #[wasm_bindgen(js_name = handleKeyEvent)]
    pub fn handle_key_event(&self, event: &KeyboardEvent) -> Result<bool, JsValue> {
        let raw = dom::raw_event(event);
        let outcome = self.engine.borrow_mut().handle_event(&raw, &self.key_table);
        match outcome {
            Outcome::Handled(effects) => {
                event.prevent_default();
                self.finish(&effects)?;
                Ok(true)
            }
            Outcome::Ignored | Outcome::PassThrough => Ok(false),
        }
    }

    /// Does `event` map to the named action ("up", "select", "playPause", ...)?
    #[wasm_bindgen(js_name = isActionKey)]
    pub fn is_action_key(&self, event: &KeyboardEvent, action: &str) -> bool {
        Action::from_name(action)
            .is_some_and(|action| is_action_key(&dom::raw_event(event), action, &self.key_table))
    }

    /// Name of the resolved key profile.
    pub fn profile(&self) -> String {
        self.key_table.profile.name().to_string()
    }

    /// The resolved key table as JSON.
    #[wasm_bindgen(js_name = keyTableJson)]
    pub fn key_table_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.key_table)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}

impl NavEngine {
    /// Run the effects of an engine call, then tell subscribers about any focus change.
    fn finish(&self, effects: &[Effect]) -> Result<(), JsValue> {
        let result = effects.iter().try_for_each(|effect| self.apply(effect));
        self.notify();
        result
    }

    fn apply(&self, effect: &Effect) -> Result<(), JsValue> {
        let target = effect.target().and_then(|id| {
            self.engine
                .borrow()
                .registry()
                .get(id.as_str())
                .map(|region| region.element().clone())
        });
        dom::apply_effect(&self.window, effect, target.as_ref())
    }

    fn notify(&self) {
        let change = self.engine.borrow_mut().take_change();
        let Some(state) = change else {
            return;
        };

        let arg = state
            .focused_id()
            .map(|id| JsValue::from_str(id.as_str()))
            .unwrap_or(JsValue::NULL);
        // Snapshot so a listener may subscribe another one.
        let listeners = self.listeners.borrow().clone();
        for listener in &listeners {
            if let Err(err) = listener.call1(&JsValue::NULL, &arg) {
                web_sys::console::error_2(&JsValue::from_str("focus listener threw:"), &err);
            }
        }
    }
}
