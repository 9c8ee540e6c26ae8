//! Grid geometry: breakpoints, column tables and layout items.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::WidgetId;

/// A responsive viewport tier. Each tier has its own column count and
/// an independent layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Lg,
    Md,
    Sm,
    Xs,
    Xxs,
}

impl Breakpoint {
    /// All breakpoints, widest first.
    pub const ALL: [Breakpoint; 5] = [
        Breakpoint::Lg,
        Breakpoint::Md,
        Breakpoint::Sm,
        Breakpoint::Xs,
        Breakpoint::Xxs,
    ];

    /// Column count of this breakpoint in the given grid.
    pub fn columns(self, grid: GridKind) -> u32 {
        let top_level = match self {
            Breakpoint::Lg => 12,
            Breakpoint::Md => 10,
            Breakpoint::Sm => 6,
            Breakpoint::Xs => 2,
            Breakpoint::Xxs => 1,
        };
        match grid {
            GridKind::TopLevel => top_level,
            GridKind::Nested => top_level * 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Breakpoint::Lg => "lg",
            Breakpoint::Md => "md",
            Breakpoint::Sm => "sm",
            Breakpoint::Xs => "xs",
            Breakpoint::Xxs => "xxs",
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Breakpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Breakpoint::ALL
            .into_iter()
            .find(|bp| bp.as_str() == s)
            .ok_or_else(|| format!("unknown breakpoint: {s}"))
    }
}

/// Which column table a grid uses.
///
/// Folders host a nested grid with twice the columns of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridKind {
    TopLevel,
    Nested,
}

/// A rectangle binding a widget to a cell range within one breakpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutItem {
    /// Widget this item positions.
    pub i: WidgetId,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_h: Option<u32>,
}

impl LayoutItem {
    pub fn new(i: impl Into<WidgetId>, x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            i: i.into(),
            x,
            y,
            w,
            h,
            min_w: None,
            min_h: None,
        }
    }

    /// Row just below this item.
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    /// Axis-aligned overlap test. Touching edges do not overlap.
    pub fn overlaps(&self, other: &LayoutItem) -> bool {
        rects_overlap((self.x, self.y, self.w, self.h), (other.x, other.y, other.w, other.h))
    }
}

/// Overlap predicate on `(x, y, w, h)` tuples.
pub(crate) fn rects_overlap(a: (u32, u32, u32, u32), b: (u32, u32, u32, u32)) -> bool {
    let (x1, y1, w1, h1) = a;
    let (x2, y2, w2, h2) = b;
    x1 < x2.saturating_add(w2)
        && x1.saturating_add(w1) > x2
        && y1 < y2.saturating_add(h2)
        && y1.saturating_add(h1) > y2
}

/// Per-breakpoint layout collection.
pub type Layouts = BTreeMap<Breakpoint, Vec<LayoutItem>>;

/// Lowest free row of a layout: `max(y + h)`, or 0 when empty.
pub fn max_bottom(items: &[LayoutItem]) -> u32 {
    items.iter().map(LayoutItem::bottom).max().unwrap_or(0)
}
