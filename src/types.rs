// Strong typing over strings. Newtypes for region ids, screen geometry, and the action set.
// See DESIGN.md: Data Model

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, caller-assigned region identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RegionId {
    fn from(id: &str) -> Self {
        RegionId(id.to_string())
    }
}

impl From<String> for RegionId {
    fn from(id: String) -> Self {
        RegionId(id)
    }
}

impl PartialEq<str> for RegionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RegionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Screen-space point (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Screen-space rectangle (CSS pixels, top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Rect {
            left,
            top,
            width,
            height,
        }
    }

    /// Rectangle of the given size centered on `center`.
    pub fn centered_at(center: Point, width: f64, height: f64) -> Self {
        Rect::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            width,
            height,
        )
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Collapsed rectangles (hidden, detached, not yet laid out) can't be navigated to.
    /// Neither can ones with non-finite geometry.
    pub fn is_empty(&self) -> bool {
        let finite = [self.left, self.top, self.width, self.height]
            .iter()
            .all(|v| v.is_finite());
        !(finite && self.width > 0.0 && self.height > 0.0)
    }
}

/// Direction of a spatial move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Logical remote-control action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Select,
    Back,
    PlayPause,
}

impl Action {
    /// Every action, in classification priority order.
    pub const ALL: [Action; 7] = [
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::Select,
        Action::Back,
        Action::PlayPause,
    ];

    pub fn direction(&self) -> Option<Direction> {
        match self {
            Action::Up => Some(Direction::Up),
            Action::Down => Some(Direction::Down),
            Action::Left => Some(Direction::Left),
            Action::Right => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
            Action::Select => "select",
            Action::Back => "back",
            Action::PlayPause => "playPause",
        }
    }

    /// Parse an action name as used by the JS layer. Case-insensitive.
    pub fn from_name(name: &str) -> Option<Action> {
        Action::ALL
            .into_iter()
            .find(|action| action.name().eq_ignore_ascii_case(name))
    }
}

/// Options for a focus change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FocusOptions {
    #[serde(default)]
    pub prevent_scroll: bool,
}

impl FocusOptions {
    pub fn without_scroll() -> Self {
        FocusOptions {
            prevent_scroll: true,
        }
    }
}

/// One raw input event as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RawKeyEvent {
    /// Logical key name (`KeyboardEvent.key`), if the platform reports one.
    #[serde(default)]
    pub key: Option<String>,
    /// Raw numeric key code (`KeyboardEvent.keyCode`), if nonzero.
    #[serde(default)]
    pub key_code: Option<u32>,
    /// The current input target is a text-entry field.
    #[serde(default)]
    pub in_text_field: bool,
}

impl RawKeyEvent {
    pub fn from_key(key: &str) -> Self {
        RawKeyEvent {
            key: Some(key.to_string()),
            ..Default::default()
        }
    }

    pub fn from_code(key_code: u32) -> Self {
        RawKeyEvent {
            key_code: Some(key_code),
            ..Default::default()
        }
    }

    pub fn in_text_field(mut self) -> Self {
        self.in_text_field = true;
        self
    }
}
