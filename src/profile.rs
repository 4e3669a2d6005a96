// Key profiles: remote-control hardware signals as data, not branching code.
// Device profiles overlay the base table per action; they can add keys, never remove them.
// See DESIGN.md: KeyProfile Resolver

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::NavError;
use crate::types::Action;

/// Named key profile (device class).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyProfile {
    /// Desktop keyboards and browsers; the fallback for every other profile.
    Base,
    /// Amazon Fire TV sticks and cubes.
    FireTv,
    /// Android TV / Google TV devices.
    AndroidTv,
    /// Samsung Tizen TVs.
    Tizen,
    /// LG webOS TVs.
    #[serde(rename = "webos")]
    WebOs,
}

impl KeyProfile {
    pub const ALL: [KeyProfile; 5] = [
        KeyProfile::Base,
        KeyProfile::FireTv,
        KeyProfile::AndroidTv,
        KeyProfile::Tizen,
        KeyProfile::WebOs,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            KeyProfile::Base => "base",
            KeyProfile::FireTv => "fire-tv",
            KeyProfile::AndroidTv => "android-tv",
            KeyProfile::Tizen => "tizen",
            KeyProfile::WebOs => "webos",
        }
    }

    fn overlay(&self) -> &'static [Binding] {
        match self {
            KeyProfile::Base => &[],
            KeyProfile::FireTv | KeyProfile::AndroidTv => ANDROID_OVERLAY,
            KeyProfile::Tizen => TIZEN_OVERLAY,
            KeyProfile::WebOs => WEBOS_OVERLAY,
        }
    }
}

impl fmt::Display for KeyProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeyProfile {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        KeyProfile::ALL
            .into_iter()
            .find(|profile| profile.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| NavError::UnknownProfile(s.to_string()))
    }
}

/// What the host asked for: auto-detection or a fixed profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileRequest {
    Auto,
    Explicit(KeyProfile),
}

impl ProfileRequest {
    /// Lenient parse: anything that isn't a known profile name means auto.
    pub fn parse(value: &str) -> Self {
        value
            .parse::<KeyProfile>()
            .map(ProfileRequest::Explicit)
            .unwrap_or(ProfileRequest::Auto)
    }
}

/// Resolve a request to a concrete profile.
///
/// Auto consults the persisted user override first, then the device
/// signature, then falls back to [`KeyProfile::Base`].
pub fn resolve_profile(
    requested: ProfileRequest,
    stored_override: Option<&str>,
    device_signature: &str,
) -> KeyProfile {
    if let ProfileRequest::Explicit(profile) = requested {
        return profile;
    }

    if let Some(ProfileRequest::Explicit(profile)) = stored_override.map(ProfileRequest::parse) {
        info!(profile = profile.name(), "key profile from stored preference");
        return profile;
    }

    let profile = detect_profile(device_signature);
    info!(profile = profile.name(), "key profile from device signature");
    profile
}

/// Known platforms, checked in order. Fire TV comes before Android TV since
/// Fire OS user agents also advertise Android.
const SIGNATURES: &[(KeyProfile, &[&str])] = &[
    (KeyProfile::FireTv, &["aft", "amazon", "silk"]),
    (KeyProfile::Tizen, &["tizen"]),
    (KeyProfile::WebOs, &["web0s", "webos", "netcast"]),
    (
        KeyProfile::AndroidTv,
        &["android tv", "googletv", "bravia", "shield"],
    ),
];

/// Infer the profile from a vendor/platform signature (usually the user agent).
pub fn detect_profile(device_signature: &str) -> KeyProfile {
    let signature = device_signature.to_ascii_lowercase();
    SIGNATURES
        .iter()
        .find(|(_, needles)| needles.iter().any(|needle| signature.contains(needle)))
        .map(|(profile, _)| *profile)
        .unwrap_or(KeyProfile::Base)
}

struct Binding {
    action: Action,
    names: &'static [&'static str],
    codes: &'static [u32],
}

const BASE: &[Binding] = &[
    Binding {
        action: Action::Up,
        names: &["ArrowUp", "Up"],
        codes: &[38],
    },
    Binding {
        action: Action::Down,
        names: &["ArrowDown", "Down"],
        codes: &[40],
    },
    Binding {
        action: Action::Left,
        names: &["ArrowLeft", "Left"],
        codes: &[37],
    },
    Binding {
        action: Action::Right,
        names: &["ArrowRight", "Right"],
        codes: &[39],
    },
    Binding {
        action: Action::Select,
        names: &["Enter", "Select", "Accept"],
        codes: &[13],
    },
    Binding {
        action: Action::Back,
        names: &["Escape", "Backspace", "GoBack", "BrowserBack"],
        codes: &[27, 8, 166],
    },
    Binding {
        action: Action::PlayPause,
        names: &["MediaPlayPause", "MediaPlay", "MediaPause"],
        codes: &[179],
    },
];

// Android KEYCODE_* values as delivered by Fire OS and Android TV WebViews.
const ANDROID_OVERLAY: &[Binding] = &[
    Binding {
        action: Action::Up,
        names: &["DPadUp"],
        codes: &[19],
    },
    Binding {
        action: Action::Down,
        names: &["DPadDown"],
        codes: &[20],
    },
    Binding {
        action: Action::Left,
        names: &["DPadLeft"],
        codes: &[21],
    },
    Binding {
        action: Action::Right,
        names: &["DPadRight"],
        codes: &[22],
    },
    Binding {
        action: Action::Select,
        names: &["DPadCenter"],
        codes: &[23, 66],
    },
    Binding {
        action: Action::Back,
        names: &[],
        codes: &[4],
    },
    Binding {
        action: Action::PlayPause,
        names: &[],
        codes: &[85, 126, 127],
    },
];

const TIZEN_OVERLAY: &[Binding] = &[
    Binding {
        action: Action::Back,
        names: &["XF86Back"],
        codes: &[10009],
    },
    Binding {
        action: Action::PlayPause,
        names: &["XF86PlayBack"],
        codes: &[10252, 415, 19],
    },
];

const WEBOS_OVERLAY: &[Binding] = &[
    Binding {
        action: Action::Back,
        names: &[],
        codes: &[461],
    },
    Binding {
        action: Action::PlayPause,
        names: &[],
        codes: &[415, 19],
    },
];

/// Accepted signals for one action. Names are stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ActionKeys {
    pub names: BTreeSet<String>,
    pub codes: BTreeSet<u32>,
}

impl ActionKeys {
    fn extend(&mut self, binding: &Binding) {
        self.names
            .extend(binding.names.iter().map(|name| name.to_ascii_lowercase()));
        self.codes.extend(binding.codes.iter().copied());
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.names.contains(&name.to_ascii_lowercase())
    }

    pub fn matches_code(&self, code: u32) -> bool {
        self.codes.contains(&code)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.codes.is_empty()
    }
}

/// Concrete action → accepted keys table for one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTable {
    pub profile: KeyProfile,
    pub actions: BTreeMap<Action, ActionKeys>,
}

impl KeyTable {
    pub fn keys(&self, action: Action) -> Option<&ActionKeys> {
        self.actions.get(&action)
    }
}

impl Default for KeyTable {
    fn default() -> Self {
        build_key_table(KeyProfile::Base)
    }
}

/// Merge the base table with `profile`'s overlay (union per action).
pub fn build_key_table(profile: KeyProfile) -> KeyTable {
    let mut actions: BTreeMap<Action, ActionKeys> = BTreeMap::new();
    for binding in BASE.iter().chain(profile.overlay()) {
        actions.entry(binding.action).or_default().extend(binding);
    }
    KeyTable { profile, actions }
}
