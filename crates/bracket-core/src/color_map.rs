//! Document-wide color → ranges aggregation.

use crate::line_cache::LineCache;
use crate::pair::Color;
use crate::position::BracketRange;
use crate::settings::Settings;
use std::collections::{BTreeMap, HashMap};

/// Ranges to paint, grouped by color.
///
/// Every color the configuration can produce is present, possibly with an empty list, so a
/// renderer can clear decorations for colors that are no longer used. Range lists are in
/// document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorMap {
    ranges: BTreeMap<Color, Vec<BracketRange>>,
}

impl ColorMap {
    /// Every configured color mapped to an empty list.
    pub fn empty(settings: &Settings) -> Self {
        Self {
            ranges: settings
                .colors()
                .into_iter()
                .map(|color| (color, Vec::new()))
                .collect(),
        }
    }

    /// Merge every cached line into one map.
    ///
    /// Opens still on the stack after the last cached line never found their close: they are
    /// reported under their definition's orphan color instead of the palette color the line
    /// recorded. The cached lines themselves are left untouched, so a later pass that closes
    /// the bracket still sees the original color.
    pub fn aggregate(settings: &Settings, cache: &LineCache) -> Self {
        let swept: HashMap<BracketRange, &Color> = cache
            .last()
            .map(|last| {
                last.carried_out()
                    .entries()
                    .map(|entry| (entry.open, settings.pair(entry.pair).orphan()))
                    .collect()
            })
            .unwrap_or_default();

        let mut map = Self::empty(settings);
        for line in cache.iter() {
            for (color, ranges) in line.color_ranges() {
                for range in ranges {
                    let target = swept.get(range).copied().unwrap_or(color);
                    map.ranges.entry(target.clone()).or_default().push(*range);
                }
            }
        }
        for ranges in map.ranges.values_mut() {
            ranges.sort_unstable();
        }
        map
    }

    /// Ranges for `color`; empty if the color is unused or unknown.
    pub fn ranges(&self, color: &Color) -> &[BracketRange] {
        self.ranges.get(color).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ranges for `color`, or `None` if the color is not in the map at all.
    pub fn get(&self, color: &Color) -> Option<&[BracketRange]> {
        self.ranges.get(color).map(Vec::as_slice)
    }

    /// The color `range` was painted with, if any.
    pub fn color_of(&self, range: &BracketRange) -> Option<&Color> {
        self.ranges
            .iter()
            .find(|(_, ranges)| ranges.binary_search(range).is_ok())
            .map(|(color, _)| color)
    }

    /// `(color, ranges)` pairs ordered by color.
    pub fn iter(&self) -> impl Iterator<Item = (&Color, &[BracketRange])> {
        self.ranges
            .iter()
            .map(|(color, ranges)| (color, ranges.as_slice()))
    }

    /// Colors in the map, including unused ones.
    pub fn colors(&self) -> impl Iterator<Item = &Color> {
        self.ranges.keys()
    }

    /// Number of colors.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Returns `true` if the map holds no colors.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Total number of ranges across all colors.
    pub fn range_count(&self) -> usize {
        self.ranges.values().map(Vec::len).sum()
    }
}
