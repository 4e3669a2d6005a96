// Side effects requested by the focus engine. The engine only describes them;
// the host (see `dom`) carries them out, fire-and-forget.

use serde::{Deserialize, Serialize};

use crate::types::RegionId;

/// How a region is scrolled into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollOptions {
    pub smooth: bool,
    pub center_block: bool,
    pub center_inline: bool,
}

impl Default for ScrollOptions {
    /// Smooth, centered on both axes.
    fn default() -> Self {
        ScrollOptions {
            smooth: true,
            center_block: true,
            center_inline: true,
        }
    }
}

/// A side effect produced by a focus transition or input action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Effect {
    /// Bring the newly focused region on screen.
    ScrollIntoView {
        id: RegionId,
        options: ScrollOptions,
    },
    /// Activate ("click") the focused region's control.
    Activate { id: RegionId },
    /// Application-level back navigation (history pop).
    NavigateBack,
    /// Global play/pause broadcast. Never targets a region.
    TogglePlayback,
}

impl Effect {
    pub fn scroll_to(id: RegionId) -> Self {
        Effect::ScrollIntoView {
            id,
            options: ScrollOptions::default(),
        }
    }

    /// Region this effect targets, if any.
    pub fn target(&self) -> Option<&RegionId> {
        match self {
            Effect::ScrollIntoView { id, .. } | Effect::Activate { id } => Some(id),
            Effect::NavigateBack | Effect::TogglePlayback => None,
        }
    }
}
