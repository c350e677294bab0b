//! Lane definitions.
//!
//! A lane binds one input key to one screen column and one colour. The
//! registry is built once per session and never mutated afterwards.

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::config::layout;
use crate::error::{Error, Result};

/// Display colour of a lane or overlay glyph.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Color {
    Green,
    Red,
    Yellow,
    Blue,
    Orange,
    Magenta,
    Cyan,
    #[default]
    White,
}

impl Color {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lane {
    /// Upper-case key label.
    pub key: char,
    pub column: u16,
    pub color: Color,
}

impl Lane {
    pub fn new(key: char, column: u16, color: Color) -> Self {
        Self {
            key: normalize_key(key),
            column,
            color,
        }
    }
}

/// Canonical form of a key label.
pub fn normalize_key(key: char) -> char {
    key.to_ascii_uppercase()
}

/// Fixed, ordered set of lanes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneRegistry {
    lanes: Vec<Lane>,
}

impl LaneRegistry {
    pub fn new(lanes: Vec<Lane>) -> Result<Self> {
        if lanes.is_empty() {
            return Err(Error::InvalidConfig("at least one lane is required".into()));
        }
        let lanes: Vec<Lane> = lanes
            .into_iter()
            .map(|lane| Lane::new(lane.key, lane.column, lane.color))
            .collect();
        for (i, lane) in lanes.iter().enumerate() {
            if lanes[..i].iter().any(|other| other.key == lane.key) {
                return Err(Error::DuplicateLane(lane.key));
            }
        }
        Ok(Self { lanes })
    }

    /// Look up a lane by key label, ignoring case.
    ///
    /// Linear scan: lane sets are a handful of entries.
    pub fn get(&self, key: char) -> Option<&Lane> {
        let key = normalize_key(key);
        self.lanes.iter().find(|lane| lane.key == key)
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Lane> {
        self.lanes.iter()
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Rightmost lane column.
    pub fn max_column(&self) -> u16 {
        self.lanes.iter().map(|lane| lane.column).max().unwrap_or(0)
    }

    /// Column where the score overlay starts.
    pub fn score_column(&self) -> u16 {
        self.max_column().saturating_add(layout::SCORE_MARGIN)
    }
}

impl Default for LaneRegistry {
    /// Five lanes on the home row: A S J K L.
    fn default() -> Self {
        let lanes = [
            ('A', Color::Green),
            ('S', Color::Red),
            ('J', Color::Yellow),
            ('K', Color::Blue),
            ('L', Color::Orange),
        ]
        .into_iter()
        .zip((0u16..).step_by(layout::LANE_SPACING as usize))
        .map(|((key, color), column)| Lane::new(key, column, color))
        .collect();
        Self { lanes }
    }
}

impl<'a> IntoIterator for &'a LaneRegistry {
    type Item = &'a Lane;
    type IntoIter = std::slice::Iter<'a, Lane>;

    fn into_iter(self) -> Self::IntoIter {
        self.lanes.iter()
    }
}
