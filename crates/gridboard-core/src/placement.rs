//! Placement of new widgets on a grid without overlapping existing ones.

use crate::model::{Breakpoint, GridKind, LayoutItem, Layouts, max_bottom, rects_overlap};
use crate::registry::WidgetDefaults;

/// Rows scanned before giving up and appending below all content.
pub const MAX_SCAN_ROWS: u32 = 200;

/// Size of the item being placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    pub w: u32,
    pub h: u32,
}

impl From<WidgetDefaults> for Footprint {
    fn from(defaults: WidgetDefaults) -> Self {
        Self { w: defaults.w, h: defaults.h }
    }
}

/// Where an item ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    /// Width after clamping to the grid.
    pub w: u32,
    /// True when the scan was exhausted and the item was appended below
    /// everything, ignoring collisions.
    pub appended: bool,
}

fn collides(x: u32, y: u32, footprint: Footprint, existing: &[LayoutItem]) -> bool {
    existing
        .iter()
        .any(|item| rects_overlap((x, y, footprint.w, footprint.h), (item.x, item.y, item.w, item.h)))
}

/// Find the first free origin for `footprint`, scanning rows top to bottom
/// and columns left to right.
///
/// Items wider than the grid are narrowed to `columns` first. If no free
/// origin exists in the first [`MAX_SCAN_ROWS`] rows the item goes to
/// `x = 0` just below the lowest existing item.
pub fn place(footprint: Footprint, existing: &[LayoutItem], columns: u32) -> Placement {
    let columns = columns.max(1);
    let footprint = Footprint {
        w: footprint.w.clamp(1, columns),
        h: footprint.h.max(1),
    };

    for y in 0..MAX_SCAN_ROWS {
        for x in 0..=(columns - footprint.w) {
            if !collides(x, y, footprint, existing) {
                return Placement { x, y, w: footprint.w, appended: false };
            }
        }
    }

    let y = max_bottom(existing);
    log::debug!("placement scan exhausted after {MAX_SCAN_ROWS} rows, appending at row {y}");
    Placement { x: 0, y, w: footprint.w, appended: true }
}

/// Place a new item in every breakpoint of `layouts`, each with its own
/// column count. Missing breakpoints are created.
///
/// Only `layouts` is touched; positions may differ per breakpoint.
pub fn place_everywhere(
    layouts: &mut Layouts,
    widget_id: &str,
    defaults: WidgetDefaults,
    grid: GridKind,
) {
    for breakpoint in Breakpoint::ALL {
        let layout = layouts.entry(breakpoint).or_default();
        let spot = place(defaults.into(), layout, breakpoint.columns(grid));
        layout.push(LayoutItem {
            i: widget_id.to_string(),
            x: spot.x,
            y: spot.y,
            w: spot.w,
            h: defaults.h,
            min_w: Some(defaults.min_w.min(spot.w)),
            min_h: Some(defaults.min_h),
        });
    }
}
