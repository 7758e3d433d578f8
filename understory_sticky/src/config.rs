// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinator configuration: class-name convention and z-index base.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::types::{Edge, Edges, ZTiers};

/// Class prefix used when none is configured.
pub const DEFAULT_CLASS_PREFIX: &str = "sticky";

/// Base z-index used when the document does not configure one.
pub const DEFAULT_BASE_Z_INDEX: i32 = 1000;

/// Document-root attribute carrying the base z-index.
pub const Z_INDEX_ATTRIBUTE: &str = "data-sticky-z-index";

/// Why a configured base z-index was rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The attribute is absent.
    #[error("base z-index attribute is missing")]
    Missing,
    /// The attribute does not start with an integer.
    #[error("base z-index {0:?} is not numeric")]
    NotNumeric(String),
    /// The attribute parses to zero, which falls back to the default.
    #[error("base z-index is zero")]
    Zero,
}

/// Parse a base z-index attribute value.
///
/// Accepts leading whitespace, an optional sign, and a run of decimal digits;
/// anything after the digits is ignored (`"2000px"` is `2000`). Values out of
/// `i32` range saturate.
pub fn parse_base_z_index(value: Option<&str>) -> Result<i32, ConfigError> {
    let raw = value.ok_or(ConfigError::Missing)?;
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return Err(ConfigError::NotNumeric(String::from(raw)));
    }
    let magnitude = rest[..digits].bytes().fold(0_i64, |acc, b| {
        acc.saturating_mul(10)
            .saturating_add(i64::from(b - b'0'))
    });
    let signed = if negative { -magnitude } else { magnitude };
    let value = i32::try_from(signed).unwrap_or(if negative { i32::MIN } else { i32::MAX });
    if value == 0 {
        return Err(ConfigError::Zero);
    }
    Ok(value)
}

/// Configuration shared by every phase of one coordinator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StickyConfig {
    /// Class prefix; an element is sticky to `edge` when it carries
    /// `<prefix>-<edge>`, and a scroll container is marked `<prefix>-container`.
    pub class_prefix: String,
    /// Origin of the three z-index tiers.
    pub base_z_index: i32,
}

impl Default for StickyConfig {
    fn default() -> Self {
        Self {
            class_prefix: String::from(DEFAULT_CLASS_PREFIX),
            base_z_index: DEFAULT_BASE_Z_INDEX,
        }
    }
}

impl StickyConfig {
    /// Build a configuration from the document root's z-index attribute.
    ///
    /// Missing or malformed values fall back to [`DEFAULT_BASE_Z_INDEX`].
    pub fn from_root_attribute(value: Option<&str>) -> Self {
        let base_z_index = parse_base_z_index(value).unwrap_or_else(|err| {
            tracing::debug!(%err, fallback = DEFAULT_BASE_Z_INDEX, "using default base z-index");
            DEFAULT_BASE_Z_INDEX
        });
        Self {
            base_z_index,
            ..Self::default()
        }
    }

    /// Replace the class prefix.
    #[must_use]
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    /// The z-index tiers derived from [`StickyConfig::base_z_index`].
    pub const fn tiers(&self) -> ZTiers {
        ZTiers::from_base(self.base_z_index)
    }

    /// The class declaring stickiness to `edge`.
    pub fn edge_class(&self, edge: Edge) -> String {
        format!("{}-{}", self.class_prefix, edge.suffix())
    }

    /// The class marking a scroll container.
    pub fn container_class(&self) -> String {
        format!("{}-container", self.class_prefix)
    }

    /// Map a class name to the edge it declares, if any.
    pub fn edge_of_class(&self, class: &str) -> Option<Edge> {
        let suffix = class
            .strip_prefix(self.class_prefix.as_str())?
            .strip_prefix('-')?;
        Edge::ALL.into_iter().find(|e| e.suffix() == suffix)
    }

    /// Collect the edges declared by a list of class names.
    pub fn edges_for<'a>(&self, classes: impl IntoIterator<Item = &'a str>) -> Edges {
        classes
            .into_iter()
            .filter_map(|c| self.edge_of_class(c))
            .fold(Edges::empty(), |acc, e| acc | e.flag())
    }

    /// Selector text matching every sticky class.
    pub fn sticky_selector(&self) -> String {
        let parts: Vec<String> = Edge::ALL
            .into_iter()
            .map(|e| format!(".{}", self.edge_class(e)))
            .collect();
        parts.join(", ")
    }

    /// The base rules a host injects once before the first refresh.
    pub fn base_rules(&self) -> [String; 2] {
        [
            format!("{} {{ position: sticky; }}", self.sticky_selector()),
            format!(
                ".{} {{ position: relative; overflow: auto; }}",
                self.container_class()
            ),
        ]
    }
}
