// Browser adapters. DOM elements become regions, effects become DOM calls,
// keyboard events become raw key events. Only the wasm facade uses this module.

use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CustomEvent, Element, HtmlElement, KeyboardEvent, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition, Window,
};

use crate::effects::{Effect, ScrollOptions};
use crate::registry::Region;
use crate::types::*;

/// Event dispatched on `window` for the play/pause action.
pub const TOGGLE_PLAYBACK_EVENT: &str = "remote:toggle-playback";

/// `<input type>` values that take typed text.
const TEXT_INPUT_TYPES: &[&str] = &[
    "", "text", "search", "email", "password", "url", "tel", "number",
];

/// A region backed by a live DOM element.
pub struct DomRegion {
    element: Element,
}

impl DomRegion {
    pub fn new(element: Element) -> Self {
        DomRegion { element }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }
}

impl Region for DomRegion {
    fn rect(&self) -> Rect {
        let bounds = self.element.get_bounding_client_rect();
        Rect::new(bounds.x(), bounds.y(), bounds.width(), bounds.height())
    }
}

/// Translate a keyboard event for the classifier.
pub fn raw_event(event: &KeyboardEvent) -> RawKeyEvent {
    let key = event.key();
    let key_code = event.key_code();
    let in_text_field = event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
        .is_some_and(|element| is_text_entry(&element));

    RawKeyEvent {
        key: (!key.is_empty()).then_some(key),
        key_code: (key_code != 0).then_some(key_code),
        in_text_field,
    }
}

/// Text inputs, textareas and contenteditable elements own select/back.
pub fn is_text_entry(element: &Element) -> bool {
    match element.tag_name().to_ascii_uppercase().as_str() {
        "TEXTAREA" => true,
        "INPUT" => {
            let kind = element
                .get_attribute("type")
                .unwrap_or_default()
                .to_ascii_lowercase();
            TEXT_INPUT_TYPES.contains(&kind.as_str())
        }
        _ => element
            .dyn_ref::<HtmlElement>()
            .is_some_and(HtmlElement::is_content_editable),
    }
}

/// Carry out one effect. `target` is the element of the region the effect
/// names; effects whose region has since gone away are dropped.
pub fn apply_effect(window: &Window, effect: &Effect, target: Option<&Element>) -> Result<(), JsValue> {
    match effect {
        Effect::ScrollIntoView { options, .. } => {
            if let Some(element) = target {
                element.scroll_into_view_with_scroll_into_view_options(&scroll_options(options));
            }
        }
        Effect::Activate { id } => match target.and_then(|element| element.dyn_ref::<HtmlElement>()) {
            Some(element) => element.click(),
            None => warn!(id = id.as_str(), "no clickable element to activate"),
        },
        Effect::NavigateBack => window.history()?.back()?,
        Effect::TogglePlayback => {
            let event = CustomEvent::new(TOGGLE_PLAYBACK_EVENT)?;
            window.dispatch_event(&event)?;
        }
    }
    Ok(())
}

fn scroll_options(options: &ScrollOptions) -> ScrollIntoViewOptions {
    let position = |centered: bool| {
        if centered {
            ScrollLogicalPosition::Center
        } else {
            ScrollLogicalPosition::Nearest
        }
    };

    let scroll = ScrollIntoViewOptions::new();
    scroll.set_behavior(if options.smooth {
        ScrollBehavior::Smooth
    } else {
        ScrollBehavior::Auto
    });
    scroll.set_block(position(options.center_block));
    scroll.set_inline(position(options.center_inline));
    scroll
}

/// The user's persisted profile choice, if any.
pub fn stored_preference(window: &Window, key: &str) -> Option<String> {
    let storage = window.local_storage().ok().flatten()?;
    storage.get_item(key).ok().flatten()
}

/// Vendor/platform signature used for profile detection.
pub fn device_signature(window: &Window) -> String {
    window.navigator().user_agent().unwrap_or_default()
}
