use std::collections::{BTreeMap, BTreeSet};

use plotters::prelude::{Color, RGBColor, ShapeStyle, BLACK, WHITE};

use crate::data::model::CellValue;

// ---------------------------------------------------------------------------
// Marker styles
// ---------------------------------------------------------------------------

/// How one group's points and histogram bars are painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupStyle {
    pub fill: RGBColor,
    pub edge: RGBColor,
    pub alpha: f64,
}

impl GroupStyle {
    pub fn fill_style(&self) -> ShapeStyle {
        self.fill.mix(self.alpha).filled()
    }

    pub fn edge_style(&self) -> ShapeStyle {
        self.edge.mix(self.alpha).stroke_width(1)
    }
}

/// Filled black circle, then white circle with a black edge. Groups beyond
/// the second reuse the palette cyclically.
pub const GROUP_PALETTE: [GroupStyle; 2] = [
    GroupStyle {
        fill: BLACK,
        edge: BLACK,
        alpha: 0.7,
    },
    GroupStyle {
        fill: WHITE,
        edge: BLACK,
        alpha: 0.7,
    },
];

/// Style for ungrouped plots.
pub const PLAIN_STYLE: GroupStyle = GroupStyle {
    fill: BLACK,
    edge: BLACK,
    alpha: 0.6,
};

// ---------------------------------------------------------------------------
// Style mapping: group value → GroupStyle
// ---------------------------------------------------------------------------

/// Maps the sorted unique values of the grouping column to palette entries.
#[derive(Debug, Clone)]
pub struct StyleMap {
    pub column: String,
    mapping: BTreeMap<CellValue, GroupStyle>,
}

impl StyleMap {
    pub fn new(column: &str, unique_values: &BTreeSet<CellValue>) -> Self {
        let mapping = unique_values
            .iter()
            .zip(GROUP_PALETTE.iter().cycle())
            .map(|(v, s)| (v.clone(), *s))
            .collect();

        StyleMap {
            column: column.to_string(),
            mapping,
        }
    }

    /// Look up the style for a given group value.
    pub fn style_for(&self, value: &CellValue) -> GroupStyle {
        self.mapping.get(value).copied().unwrap_or(PLAIN_STYLE)
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }
}
