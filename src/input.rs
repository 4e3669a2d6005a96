// Input classifier: raw key event + key table -> logical action.
// Unknown keys classify as no action and are left to the platform.

use crate::profile::KeyTable;
use crate::types::*;

/// Does `event` correspond to `action` under `table`?
///
/// Matches when the logical key name (case-insensitive) or the raw key code is
/// accepted for the action.
pub fn is_action_key(event: &RawKeyEvent, action: Action, table: &KeyTable) -> bool {
    let Some(keys) = table.keys(action) else {
        return false;
    };

    let name_matches = event
        .key
        .as_deref()
        .is_some_and(|name| keys.matches_name(name));
    let code_matches = event.key_code.is_some_and(|code| keys.matches_code(code));

    name_matches || code_matches
}

/// First action (in [`Action::ALL`] order) that `event` maps to.
pub fn classify(event: &RawKeyEvent, table: &KeyTable) -> Option<Action> {
    Action::ALL
        .into_iter()
        .find(|action| is_action_key(event, *action, table))
}
