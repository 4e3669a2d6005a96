// Focus state machine: one focused region at most, never a stale one.
// Owns the registry so registration and input resolution always see the same snapshot.
// See DESIGN.md: Focus State Machine

use tracing::debug;

use crate::config::NavSettings;
use crate::effects::Effect;
use crate::input::classify;
use crate::profile::KeyTable;
use crate::registry::{FocusRegistry, Region};
use crate::spatial::find_next_with;
use crate::types::*;

/// Called with the new focused id whenever it changes.
pub type FocusListener = Box<dyn FnMut(Option<&RegionId>)>;

/// Current focus.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FocusState {
    #[default]
    Unfocused,
    Focused(RegionId),
}

impl FocusState {
    pub fn focused_id(&self) -> Option<&RegionId> {
        match self {
            FocusState::Unfocused => None,
            FocusState::Focused(id) => Some(id),
        }
    }
}

/// Result of feeding one input action to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Not a navigation key; leave it to the platform.
    Ignored,
    /// Select/back inside a text field; the platform's default must run.
    PassThrough,
    /// Consumed. The host should suppress the platform default and run the effects.
    Handled(Vec<Effect>),
}

impl Outcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, Outcome::Handled(_))
    }

    pub fn effects(&self) -> &[Effect] {
        match self {
            Outcome::Handled(effects) => effects,
            Outcome::Ignored | Outcome::PassThrough => &[],
        }
    }
}

/// Spatial focus engine: registry + focus state + subscribers.
pub struct FocusEngine<R> {
    registry: FocusRegistry<R>,
    state: FocusState,
    settings: NavSettings,
    listeners: Vec<FocusListener>,
    /// Latest state not yet collected with [`FocusEngine::take_change`].
    pending_change: Option<FocusState>,
}

impl<R: Region> FocusEngine<R> {
    pub fn new() -> Self {
        Self::with_settings(NavSettings::default())
    }

    pub fn with_settings(settings: NavSettings) -> Self {
        FocusEngine {
            registry: FocusRegistry::new(),
            state: FocusState::Unfocused,
            settings,
            listeners: Vec::new(),
            pending_change: None,
        }
    }

    pub fn registry(&self) -> &FocusRegistry<R> {
        &self.registry
    }

    pub fn state(&self) -> &FocusState {
        &self.state
    }

    pub fn focused_id(&self) -> Option<&RegionId> {
        self.state.focused_id()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(Option<&RegionId>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// The focus state reached since the last call, if it changed.
    ///
    /// Hosts that must not run callbacks while the engine is borrowed collect
    /// the change here after each call and notify their own listeners then.
    pub fn take_change(&mut self) -> Option<FocusState> {
        self.pending_change.take()
    }

    /// Register (or replace) a region.
    ///
    /// The first region to appear while nothing is focused takes focus
    /// immediately, so the UI always has a focus target.
    pub fn register(&mut self, id: impl Into<RegionId>, region: R) -> Vec<Effect> {
        let id = id.into();
        self.registry.insert(id.clone(), region);

        if self.state == FocusState::Unfocused && self.registry.len() == 1 {
            debug!(id = id.as_str(), "bootstrap focus");
            return self.set_focus(Some(id.as_str()), FocusOptions::default());
        }
        Vec::new()
    }

    /// Remove a region, clearing focus in the same step if it held it.
    pub fn unregister(&mut self, id: &str) -> Option<R> {
        let removed = self.registry.remove(id)?;
        if self.state.focused_id().is_some_and(|focused| *focused == id) {
            self.set_focus(None, FocusOptions::default());
        }
        Some(removed)
    }

    /// Move focus to `id`, or clear it with `None`.
    ///
    /// Ids that aren't registered are ignored. Unless `prevent_scroll` is set,
    /// a successful focus asks for the region to be scrolled into view.
    pub fn set_focus(&mut self, id: Option<&str>, options: FocusOptions) -> Vec<Effect> {
        let next = match id {
            Some(id) => {
                if !self.registry.contains(id) {
                    debug!(id, "ignoring focus request for unregistered region");
                    return Vec::new();
                }
                FocusState::Focused(RegionId::from(id))
            }
            None => FocusState::Unfocused,
        };

        if next != self.state {
            debug!(from = ?self.state.focused_id(), to = ?next.focused_id(), "focus changed");
            self.state = next;
            self.pending_change = Some(self.state.clone());
            self.notify();
        }

        match self.state.focused_id() {
            Some(focused) if !options.prevent_scroll => vec![Effect::scroll_to(focused.clone())],
            _ => Vec::new(),
        }
    }

    /// Classify a raw event with `table` and run the resulting action.
    pub fn handle_event(&mut self, event: &RawKeyEvent, table: &KeyTable) -> Outcome {
        match classify(event, table) {
            Some(action) => self.handle_action(action, event.in_text_field),
            None => Outcome::Ignored,
        }
    }

    /// Run one logical action against the current focus.
    pub fn handle_action(&mut self, action: Action, in_text_field: bool) -> Outcome {
        if action == Action::PlayPause {
            return Outcome::Handled(vec![Effect::TogglePlayback]);
        }

        // Form semantics win over navigation while typing.
        if in_text_field && matches!(action, Action::Select | Action::Back) {
            return Outcome::PassThrough;
        }

        let current = match &self.state {
            FocusState::Focused(id) => id.clone(),
            FocusState::Unfocused => return self.recover(action),
        };

        match action {
            Action::Select => Outcome::Handled(vec![Effect::Activate { id: current }]),
            Action::Back => Outcome::Handled(vec![Effect::NavigateBack]),
            _ => {
                let Some(direction) = action.direction() else {
                    return Outcome::Ignored;
                };
                let next = find_next_with(current.as_str(), direction, &self.registry, &self.settings)
                    .cloned();
                match next {
                    Some(next) => {
                        Outcome::Handled(self.set_focus(Some(next.as_str()), FocusOptions::default()))
                    }
                    // Nothing admissible: stay put, still consume the key.
                    None => Outcome::Handled(Vec::new()),
                }
            }
        }
    }

    /// Input while unfocused: focus the first registered region and stop there.
    fn recover(&mut self, action: Action) -> Outcome {
        match self.registry.first_id().cloned() {
            Some(first) => {
                debug!(id = first.as_str(), ?action, "recovering focus");
                Outcome::Handled(self.set_focus(Some(first.as_str()), FocusOptions::default()))
            }
            None if action == Action::Back => Outcome::Handled(vec![Effect::NavigateBack]),
            None => Outcome::Ignored,
        }
    }

    fn notify(&mut self) {
        let focused = self.state.focused_id();
        for listener in &mut self.listeners {
            listener(focused);
        }
    }
}

impl<R: Region> Default for FocusEngine<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{build_key_table, KeyProfile};
    use std::cell::RefCell;
    use std::rc::Rc;

    type BoxedRegion = Box<dyn Fn() -> Rect>;

    fn at(x: f64, y: f64) -> BoxedRegion {
        let rect = Rect::centered_at(Point::new(x, y), 40.0, 40.0);
        Box::new(move || rect)
    }

    fn focused(engine: &FocusEngine<BoxedRegion>) -> Option<&str> {
        engine.focused_id().map(RegionId::as_str)
    }

    #[test]
    fn first_registration_takes_focus() {
        let mut engine = FocusEngine::new();
        let effects = engine.register("hero", at(100.0, 100.0));

        assert_eq!(focused(&engine), Some("hero"));
        assert_eq!(effects, vec![Effect::scroll_to("hero".into())]);
    }

    #[test]
    fn later_registrations_keep_focus() {
        let mut engine = FocusEngine::new();
        engine.register("a", at(100.0, 100.0));
        let effects = engine.register("b", at(300.0, 100.0));

        assert!(effects.is_empty());
        assert_eq!(focused(&engine), Some("a"));
    }

    #[test]
    fn down_prefers_column_over_drift() {
        let mut engine = FocusEngine::new();
        engine.register("a", at(100.0, 100.0));
        engine.register("b", at(100.0, 300.0));
        // c is 200px sideways for 10px down: outside the downward cone.
        engine.register("c", at(300.0, 110.0));

        let outcome = engine.handle_action(Action::Down, false);
        assert!(outcome.is_handled());
        assert_eq!(focused(&engine), Some("b"));
    }

    #[test]
    fn aligned_candidate_wins_at_equal_distance() {
        let mut engine = FocusEngine::new();
        engine.register("a", at(100.0, 100.0));
        // Both 100px away; registered first so ordering can't explain the result.
        engine.register("diag", at(160.0, 180.0));
        engine.register("row", at(200.0, 100.0));

        engine.handle_action(Action::Right, false);
        assert_eq!(focused(&engine), Some("row"));
    }

    #[test]
    fn blocked_direction_is_a_handled_no_op() {
        let mut engine = FocusEngine::new();
        engine.register("a", at(100.0, 100.0));
        engine.register("b", at(300.0, 100.0));

        let outcome = engine.handle_action(Action::Left, false);
        assert_eq!(outcome, Outcome::Handled(Vec::new()));
        assert_eq!(focused(&engine), Some("a"));
    }

    #[test]
    fn unregistering_focused_region_clears_focus() {
        let mut engine = FocusEngine::new();
        engine.register("a", at(100.0, 100.0));
        engine.register("b", at(300.0, 100.0));

        assert!(engine.unregister("b").is_some());
        assert_eq!(focused(&engine), Some("a"));

        assert!(engine.unregister("a").is_some());
        assert_eq!(focused(&engine), None);
        assert!(engine.unregister("a").is_none());
    }

    #[test]
    fn input_after_removal_recovers_focus() {
        let mut engine = FocusEngine::new();
        engine.register("a", at(100.0, 100.0));
        engine.register("b", at(300.0, 100.0));
        engine.register("c", at(500.0, 100.0));
        engine.unregister("a");
        assert_eq!(focused(&engine), None);

        // Recovery lands on the first remaining region and does not also move right.
        let outcome = engine.handle_action(Action::Right, false);
        assert_eq!(outcome.effects(), &[Effect::scroll_to("b".into())]);
        assert_eq!(focused(&engine), Some("b"));
    }

    #[test]
    fn registering_beside_others_does_not_bootstrap() {
        let mut engine = FocusEngine::new();
        engine.register("a", at(100.0, 100.0));
        engine.register("b", at(100.0, 300.0));
        engine.unregister("a");

        assert!(engine.register("c", at(300.0, 300.0)).is_empty());
        assert_eq!(focused(&engine), None);

        engine.handle_action(Action::Down, false);
        assert_eq!(focused(&engine), Some("b"));
    }

    #[test]
    fn select_and_back_also_recover() {
        for action in [Action::Select, Action::Back] {
            let mut engine = FocusEngine::new();
            engine.register("a", at(100.0, 100.0));
            engine.register("b", at(300.0, 100.0));
            engine.set_focus(None, FocusOptions::default());

            let outcome = engine.handle_action(action, false);
            assert!(outcome.is_handled());
            assert!(!outcome.effects().contains(&Effect::NavigateBack));
            assert_eq!(focused(&engine), Some("a"));
        }
    }

    #[test]
    fn select_activates_focused_region() {
        let mut engine = FocusEngine::new();
        engine.register("play", at(100.0, 100.0));

        let outcome = engine.handle_action(Action::Select, false);
        assert_eq!(
            outcome,
            Outcome::Handled(vec![Effect::Activate { id: "play".into() }])
        );
    }

    #[test]
    fn text_fields_keep_select_and_back() {
        let mut engine = FocusEngine::new();
        engine.register("search", at(100.0, 100.0));

        assert_eq!(engine.handle_action(Action::Select, true), Outcome::PassThrough);
        assert_eq!(engine.handle_action(Action::Back, true), Outcome::PassThrough);
        assert_eq!(
            engine.handle_action(Action::Back, false),
            Outcome::Handled(vec![Effect::NavigateBack])
        );
    }

    #[test]
    fn play_pause_ignores_focus_and_fields() {
        let mut engine: FocusEngine<BoxedRegion> = FocusEngine::new();
        let expected = Outcome::Handled(vec![Effect::TogglePlayback]);

        assert_eq!(engine.handle_action(Action::PlayPause, false), expected);
        engine.register("a", at(100.0, 100.0));
        assert_eq!(engine.handle_action(Action::PlayPause, true), expected);
        assert_eq!(focused(&engine), Some("a"));
    }

    #[test]
    fn empty_registry_ignores_navigation() {
        let mut engine: FocusEngine<BoxedRegion> = FocusEngine::new();
        assert_eq!(engine.handle_action(Action::Up, false), Outcome::Ignored);
        assert_eq!(engine.handle_action(Action::Select, false), Outcome::Ignored);
        assert_eq!(
            engine.handle_action(Action::Back, false),
            Outcome::Handled(vec![Effect::NavigateBack])
        );
    }

    #[test]
    fn prevent_scroll_suppresses_scroll_effect() {
        let mut engine = FocusEngine::new();
        engine.register("a", at(100.0, 100.0));
        engine.register("b", at(300.0, 100.0));

        assert!(engine
            .set_focus(Some("b"), FocusOptions::without_scroll())
            .is_empty());
        assert_eq!(focused(&engine), Some("b"));
        assert_eq!(
            engine.set_focus(Some("a"), FocusOptions::default()),
            vec![Effect::scroll_to("a".into())]
        );
    }

    #[test]
    fn unknown_focus_target_is_ignored() {
        let mut engine = FocusEngine::new();
        engine.register("a", at(100.0, 100.0));

        assert!(engine.set_focus(Some("ghost"), FocusOptions::default()).is_empty());
        assert_eq!(focused(&engine), Some("a"));
    }

    #[test]
    fn listeners_see_each_change_once() {
        let seen: Rc<RefCell<Vec<Option<String>>>> = Rc::default();
        let sink = Rc::clone(&seen);

        let mut engine: FocusEngine<BoxedRegion> = FocusEngine::new();
        engine.subscribe(move |id| sink.borrow_mut().push(id.map(|id| id.to_string())));

        engine.register("a", at(100.0, 100.0));
        engine.register("b", at(300.0, 100.0));
        engine.set_focus(Some("a"), FocusOptions::default());
        engine.handle_action(Action::Right, false);
        engine.unregister("b");

        assert_eq!(
            *seen.borrow(),
            vec![Some("a".to_string()), Some("b".to_string()), None]
        );
    }

    #[test]
    fn changes_are_reported_as_values() {
        let mut engine: FocusEngine<BoxedRegion> = FocusEngine::new();
        assert_eq!(engine.take_change(), None);

        engine.register("a", at(100.0, 100.0));
        assert_eq!(engine.take_change(), Some(FocusState::Focused("a".into())));
        assert_eq!(engine.take_change(), None);

        engine.register("b", at(300.0, 100.0));
        engine.set_focus(Some("a"), FocusOptions::default());
        assert_eq!(engine.take_change(), None);

        engine.handle_action(Action::Right, false);
        assert_eq!(engine.take_change(), Some(FocusState::Focused("b".into())));

        engine.unregister("b");
        assert_eq!(engine.take_change(), Some(FocusState::Unfocused));
    }

    #[test]
    fn handle_event_uses_profile_table() {
        let mut engine = FocusEngine::new();
        engine.register("a", at(100.0, 100.0));
        engine.register("b", at(100.0, 300.0));

        let fire_tv = build_key_table(KeyProfile::FireTv);
        let dpad_down = RawKeyEvent::from_code(20);
        assert!(engine.handle_event(&dpad_down, &fire_tv).is_handled());
        assert_eq!(focused(&engine), Some("b"));

        let base = build_key_table(KeyProfile::Base);
        assert_eq!(engine.handle_event(&dpad_down, &base), Outcome::Ignored);

        let enter_in_field = RawKeyEvent::from_key("Enter").in_text_field();
        assert_eq!(engine.handle_event(&enter_in_field, &base), Outcome::PassThrough);
    }

    #[test]
    fn zero_sized_regions_stay_registered() {
        let mut engine = FocusEngine::new();
        engine.register("a", at(100.0, 100.0));
        engine.register("collapsed", Box::new(|| Rect::new(300.0, 80.0, 0.0, 0.0)) as BoxedRegion);

        engine.handle_action(Action::Right, false);
        assert_eq!(focused(&engine), Some("a"));
        assert!(engine.registry().contains("collapsed"));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Register(usize, f64, f64),
            Unregister(usize),
            Focus(usize),
            Press(Action),
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0usize..6, 0.0f64..1920.0, 0.0f64..1080.0)
                    .prop_map(|(id, x, y)| Op::Register(id, x, y)),
                (0usize..6).prop_map(Op::Unregister),
                (0usize..6).prop_map(Op::Focus),
                prop::sample::select(Action::ALL.to_vec()).prop_map(Op::Press),
            ]
        }

        proptest! {
            /// Focus is always absent or a currently registered id.
            #[test]
            fn focus_never_goes_stale(ops in prop::collection::vec(op_strategy(), 1..60)) {
                let mut engine: FocusEngine<BoxedRegion> = FocusEngine::new();
                for op in ops {
                    match op {
                        Op::Register(id, x, y) => {
                            engine.register(format!("r{id}"), at(x, y));
                        }
                        Op::Unregister(id) => {
                            engine.unregister(&format!("r{id}"));
                        }
                        Op::Focus(id) => {
                            let id = format!("r{id}");
                            engine.set_focus(Some(id.as_str()), FocusOptions::default());
                        }
                        Op::Press(action) => {
                            engine.handle_action(action, false);
                        }
                    }

                    if let Some(id) = engine.focused_id() {
                        prop_assert!(engine.registry().contains(id.as_str()));
                    }
                    if !engine.registry().is_empty() && engine.focused_id().is_none() {
                        // Any navigation key brings focus back.
                        engine.handle_action(Action::Down, false);
                        prop_assert!(engine.focused_id().is_some());
                    }
                }
            }
        }
    }
}
