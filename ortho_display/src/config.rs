// Copyright 2025 the Ortho Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Broadcast configuration from string-keyed properties.
//!
//! ## Recognized properties
//!
//! | Key | Effect | Default |
//! | --- | --- | --- |
//! | `alwaysReact` | react to events another listener already handled | `false` |
//! | `autoRepeat` | accept key auto-repeat | unchanged |
//! | `pixelPerSlice` | display units per scrolled slice | `4` |
//! | `scrollDirection` | `updown` or `leftright` | `updown` |
//! | `invertScrollDirection` | flip scroll sign | `false` |
//! | `zoomDirection` | `updown` or `leftright` | `updown` |
//! | `invertZoomDirection` | flip zoom sign | `false` |
//! | `invertMoveDirection` | flip pan direction | `false` |
//! | `levelWindowDirection` | `updown` or `leftright` | `leftright` |
//! | `invertLevelWindowDirection` | flip level/window sign | `false` |
//! | `coupled` | rotate all linked planes together | unchanged (initially `true`) |
//! | `zoomFactor` | zoom step in percent, stored as `1 + pct / 100` | `0.05` |
//!
//! Booleans are `true` only for the literal `"true"`. Malformed values are logged and
//! replaced by the default.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::warn;

/// Zoom factor used when `zoomFactor` is absent or not a positive percentage.
///
/// This is almost certainly meant to be `1.05`; it is kept as is so existing
/// configurations behave the same. Set `zoomFactor` explicitly.
pub const FALLBACK_ZOOM_FACTOR: f64 = 0.05;

/// Scroll granularity used when `pixelPerSlice` is absent or not positive.
pub const DEFAULT_PIXEL_PER_SLICE: i32 = 4;

/// String-keyed configuration lookup.
pub trait PropertySource {
    /// The value stored under `key`.
    fn property(&self, key: &str) -> Option<&str>;
}

impl<S: BuildHasher> PropertySource for HashMap<String, String, S> {
    fn property(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl PropertySource for BTreeMap<String, String> {
    fn property(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl PropertySource for [(&str, &str)] {
    fn property(&self, key: &str) -> Option<&str> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}

/// Screen axis a drag is measured along.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum DragAxis {
    /// Vertical motion.
    #[serde(rename = "updown")]
    UpDown,
    /// Horizontal motion.
    #[serde(rename = "leftright")]
    LeftRight,
}

impl FromStr for DragAxis {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "updown" => Ok(Self::UpDown),
            "leftright" => Ok(Self::LeftRight),
            _ => Err(ConfigError::InvalidAxis(s.to_owned())),
        }
    }
}

/// A property value that could not be interpreted.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Not an integer.
    #[error("expected an integer, found {0:?}")]
    InvalidInteger(String),
    /// Not `updown` or `leftright`.
    #[error("expected \"updown\" or \"leftright\", found {0:?}")]
    InvalidAxis(String),
    /// Not `true` or `false`.
    #[error("expected \"true\" or \"false\", found {0:?}")]
    InvalidBool(String),
}

/// Resolved broadcast configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DisplayActionConfig {
    /// React even when another listener handled the event.
    pub always_react: bool,
    /// Accept key auto-repeat.
    pub auto_repeat: bool,
    /// Display units per scrolled slice, always positive.
    #[serde(deserialize_with = "deserialize_pixel_per_slice")]
    pub pixel_per_slice: i32,
    /// Axis measured by scroll drags.
    pub scroll_direction: DragAxis,
    /// Flip the scroll sign.
    #[serde(rename = "invertScrollDirection")]
    pub invert_scroll: bool,
    /// Axis measured by zoom drags.
    pub zoom_direction: DragAxis,
    /// Flip the zoom direction.
    #[serde(rename = "invertZoomDirection")]
    pub invert_zoom: bool,
    /// Flip the pan direction.
    #[serde(rename = "invertMoveDirection")]
    pub invert_move: bool,
    /// Axis measured by level/window drags.
    pub level_window_direction: DragAxis,
    /// Flip the level/window sign.
    #[serde(rename = "invertLevelWindowDirection")]
    pub invert_level_window: bool,
    /// Rotate every linked plane together, not just the grabbed ones.
    #[serde(rename = "coupled")]
    pub link_planes: bool,
    /// Multiplicative zoom step. Structured configuration stores the resolved factor,
    /// not the percentage. Non-positive factors are replaced by
    /// [`FALLBACK_ZOOM_FACTOR`].
    #[serde(deserialize_with = "deserialize_zoom_factor")]
    pub zoom_factor: f64,
}

impl Default for DisplayActionConfig {
    fn default() -> Self {
        Self {
            always_react: false,
            auto_repeat: false,
            pixel_per_slice: DEFAULT_PIXEL_PER_SLICE,
            scroll_direction: DragAxis::UpDown,
            invert_scroll: false,
            zoom_direction: DragAxis::UpDown,
            invert_zoom: false,
            invert_move: false,
            level_window_direction: DragAxis::LeftRight,
            invert_level_window: false,
            link_planes: true,
            zoom_factor: FALLBACK_ZOOM_FACTOR,
        }
    }
}

impl DisplayActionConfig {
    /// Defaults overridden by `source`.
    pub fn from_properties<P: PropertySource + ?Sized>(source: &P) -> Self {
        let mut config = Self::default();
        config.apply(source);
        config
    }

    /// Re-read every recognized property from `source`.
    ///
    /// Absent keys reset to their defaults, except `autoRepeat` and `coupled`, which
    /// keep their current value.
    pub fn apply<P: PropertySource + ?Sized>(&mut self, source: &P) {
        self.always_react = flag(source, "alwaysReact").unwrap_or(false);
        if let Some(v) = flag(source, "autoRepeat") {
            self.auto_repeat = v;
        }

        self.pixel_per_slice = lookup(source, "pixelPerSlice")
            .map_or(DEFAULT_PIXEL_PER_SLICE, checked_pixel_per_slice);

        self.scroll_direction = lookup(source, "scrollDirection").unwrap_or(DragAxis::UpDown);
        self.invert_scroll = flag(source, "invertScrollDirection").unwrap_or(false);
        self.zoom_direction = lookup(source, "zoomDirection").unwrap_or(DragAxis::UpDown);
        self.invert_zoom = flag(source, "invertZoomDirection").unwrap_or(false);
        self.invert_move = flag(source, "invertMoveDirection").unwrap_or(false);
        self.level_window_direction =
            lookup(source, "levelWindowDirection").unwrap_or(DragAxis::LeftRight);
        self.invert_level_window = flag(source, "invertLevelWindowDirection").unwrap_or(false);

        if let Some(v) = flag(source, "coupled") {
            self.link_planes = v;
        }

        self.zoom_factor = match lookup::<i32>(source, "zoomFactor") {
            Some(pct) if pct > 0 => 1.0 + f64::from(pct) / 100.0,
            _ => FALLBACK_ZOOM_FACTOR,
        };
    }

    /// Replace a non-positive scroll granularity or zoom factor by its default.
    ///
    /// Configurations read through [`apply`](Self::apply) or deserialized are already
    /// sanitized; this covers values assigned directly.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.pixel_per_slice = checked_pixel_per_slice(self.pixel_per_slice);
        self.zoom_factor = checked_zoom_factor(self.zoom_factor);
        self
    }
}

fn checked_pixel_per_slice(n: i32) -> i32 {
    if n > 0 {
        n
    } else {
        warn!(value = n, "pixelPerSlice must be positive, using default");
        DEFAULT_PIXEL_PER_SLICE
    }
}

fn checked_zoom_factor(factor: f64) -> f64 {
    if factor > 0.0 && factor.is_finite() {
        factor
    } else {
        warn!(value = factor, "zoomFactor must be positive, using fallback");
        FALLBACK_ZOOM_FACTOR
    }
}

fn deserialize_pixel_per_slice<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
    i32::deserialize(d).map(checked_pixel_per_slice)
}

fn deserialize_zoom_factor<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    f64::deserialize(d).map(checked_zoom_factor)
}

/// Values that can be read from a property string.
trait PropertyValue: Sized {
    fn parse_value(raw: &str) -> Result<Self, ConfigError>;
}

impl PropertyValue for i32 {
    fn parse_value(raw: &str) -> Result<Self, ConfigError> {
        raw.trim()
            .parse()
            .map_err(|_| ConfigError::InvalidInteger(raw.to_owned()))
    }
}

impl PropertyValue for DragAxis {
    fn parse_value(raw: &str) -> Result<Self, ConfigError> {
        raw.trim().parse()
    }
}

/// Parse `key`, logging and discarding malformed values.
fn lookup<T: PropertyValue>(source: &(impl PropertySource + ?Sized), key: &str) -> Option<T> {
    let raw = source.property(key)?;
    match T::parse_value(raw) {
        Ok(v) => Some(v),
        Err(err) => {
            warn!(key, %err, "ignoring malformed property");
            None
        }
    }
}

fn flag(source: &(impl PropertySource + ?Sized), key: &str) -> Option<bool> {
    let raw = source.property(key)?;
    if raw != "true" && raw != "false" {
        warn!(key, err = %ConfigError::InvalidBool(raw.to_owned()), "treating as false");
    }
    Some(raw == "true")
}
