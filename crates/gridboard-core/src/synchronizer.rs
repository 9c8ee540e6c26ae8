//! Reconciles grid layout events with the workspace model.
//!
//! The grid UI owns positions after a drag or resize; these functions fold
//! its reports back into the workspace and keep folder heights in step with
//! their nested content.

use std::collections::{BTreeMap, HashSet};

use crate::model::{Layouts, LayoutItem, Widget, WidgetKind, Workspace, max_bottom};
use crate::registry;

/// Row height of the grid nested inside a folder, in pixels.
pub const NESTED_ROW_HEIGHT: u32 = 21;
/// Vertical gap between nested rows, in pixels.
pub const NESTED_ROW_MARGIN: u32 = 8;
/// Padding above and below the nested grid, in pixels.
pub const FOLDER_VERTICAL_PADDING: u32 = 24;
/// Folder title bar, in pixels.
pub const FOLDER_HEADER_HEIGHT: u32 = 68;
/// Row height of the dashboard grid, in pixels.
pub const PARENT_ROW_HEIGHT: u32 = 50;
/// Vertical gap between dashboard rows, in pixels.
pub const PARENT_ROW_MARGIN: u32 = 16;

/// Smallest height a folder may take, also its collapsed height.
pub fn folder_min_height(folder: &Widget) -> u32 {
    folder
        .min_h
        .unwrap_or_else(|| registry::defaults(WidgetKind::Folder).min_h)
}

/// Dashboard rows needed to show a folder whose nested grid holds `nested`.
pub fn folder_height_rows(nested: &[LayoutItem], min_h: u32) -> u32 {
    let max_rows = u64::from(max_bottom(nested));
    let content = max_rows * u64::from(NESTED_ROW_HEIGHT)
        + max_rows.saturating_sub(1) * u64::from(NESTED_ROW_MARGIN)
        + u64::from(FOLDER_VERTICAL_PADDING);
    let total = content + u64::from(FOLDER_HEADER_HEIGHT);
    let rows = (total + u64::from(PARENT_ROW_MARGIN)).div_ceil(u64::from(PARENT_ROW_HEIGHT + PARENT_ROW_MARGIN));
    u32::try_from(rows).unwrap_or(u32::MAX).max(min_h)
}

/// Store a layout reported by the grid after a drag or resize.
///
/// `all` replaces the stored layouts verbatim. Expanded folders remember
/// their height in `active` so it survives a collapse.
pub fn apply_layout_change(workspace: &mut Workspace, active: &[LayoutItem], all: Layouts) {
    for widget in &mut workspace.widgets {
        let id = widget.id.as_str();
        let Some(item) = active.iter().find(|item| item.i == id) else {
            continue;
        };
        if let Some(folder) = widget.folder_mut() {
            if !folder.is_collapsed {
                folder.expanded_h = item.h;
            }
        }
    }
    workspace.layouts = all;
}

/// Store the nested layouts of a folder and resize the folder to fit them.
///
/// Items that do not belong to a child of the folder are dropped. When the
/// folder grows, items below it move down by the same number of rows.
/// Returns `false` when `folder_id` is not a folder of this workspace.
pub fn apply_children_layout_change(workspace: &mut Workspace, folder_id: &str, mut nested: Layouts) -> bool {
    let children: HashSet<String> = workspace.children_of(folder_id).map(|w| w.id.clone()).collect();
    let Some(folder_widget) = workspace.widgets.iter().find(|w| w.id == folder_id && w.is_folder()) else {
        return false;
    };
    let min_h = folder_min_height(folder_widget);
    let collapsed = folder_widget.folder().is_some_and(|f| f.is_collapsed);
    let parent_id = folder_widget.parent_id.clone();

    for items in nested.values_mut() {
        items.retain(|item| children.contains(&item.i));
    }

    let mut expanded_h = None;
    if !collapsed {
        let host = host_layouts(workspace, parent_id.as_deref());
        for (breakpoint, layout) in host.into_iter().flat_map(|layouts| layouts.iter_mut()) {
            let content = nested.get(breakpoint).map(Vec::as_slice).unwrap_or(&[]);
            let new_h = folder_height_rows(content, min_h);
            if resize_item(layout, folder_id, new_h, ShiftPolicy::GrowOnly) {
                expanded_h.get_or_insert(new_h);
            }
        }
    }

    if let Some(folder) = workspace.widget_mut(folder_id).and_then(Widget::folder_mut) {
        folder.children_layouts = Some(nested);
        if let Some(h) = expanded_h {
            folder.expanded_h = h;
        }
    }
    true
}

/// Layouts holding the item of a widget whose parent is `parent_id`.
fn host_layouts<'a>(workspace: &'a mut Workspace, parent_id: Option<&str>) -> Option<&'a mut Layouts> {
    match parent_id {
        Some(parent_id) => workspace
            .widget_mut(parent_id)
            .and_then(Widget::folder_mut)
            .and_then(|parent| parent.children_layouts.as_mut()),
        None => Some(&mut workspace.layouts),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShiftPolicy {
    /// Items below follow the bottom edge both ways.
    Always,
    /// Items below only move when the item gets taller.
    GrowOnly,
}

/// Set the height of item `id` in `layout`, moving every item that starts
/// at or below its old bottom edge by the height difference.
///
/// Returns `false` when `id` has no item in this layout.
fn resize_item(layout: &mut [LayoutItem], id: &str, new_h: u32, policy: ShiftPolicy) -> bool {
    let Some(item) = layout.iter_mut().find(|item| item.i == id) else {
        return false;
    };
    let (top, old_h) = (item.y, item.h);
    item.h = new_h;

    let shrinking = new_h < old_h;
    if old_h == new_h || (shrinking && policy == ShiftPolicy::GrowOnly) {
        return true;
    }
    let delta = i64::from(new_h) - i64::from(old_h);
    let from_row = top.saturating_add(old_h);
    for item in layout.iter_mut().filter(|item| item.i != id && item.y >= from_row) {
        item.y = u32::try_from((i64::from(item.y) + delta).max(0)).unwrap_or(u32::MAX);
    }
    true
}

/// Collapse or expand a folder, moving the items below it so no gap or
/// overlap opens up. Returns `false` when `folder_id` is not a folder.
///
/// Collapsing remembers the folder's height in every breakpoint. Expanding
/// restores those heights; a breakpoint without one is refitted to its
/// nested content, then falls back to `expanded_h` or the current height.
///
/// A folder nested in another folder is resized within its parent's
/// nested layouts; a top-level folder within the workspace layouts.
pub fn toggle_folder(workspace: &mut Workspace, folder_id: &str) -> bool {
    let Some(widget) = workspace.widget_mut(folder_id) else {
        return false;
    };
    let collapsed_h = folder_min_height(widget);
    let parent_id = widget.parent_id.clone();
    let Some(folder) = widget.folder_mut() else {
        return false;
    };
    folder.is_collapsed = !folder.is_collapsed;
    let collapsing = folder.is_collapsed;
    let expanded_h = folder.expanded_h;
    let nested = folder.children_layouts.clone().unwrap_or_default();
    let mut saved = std::mem::take(&mut folder.expanded_heights);
    if collapsing {
        saved.clear();
    }

    if let Some(layouts) = host_layouts(workspace, parent_id.as_deref()) {
        for (breakpoint, layout) in layouts.iter_mut() {
            let Some(current_h) = layout.iter().find(|item| item.i == folder_id).map(|item| item.h) else {
                continue;
            };
            let new_h = if collapsing {
                saved.insert(*breakpoint, current_h);
                collapsed_h
            } else {
                saved
                    .get(breakpoint)
                    .copied()
                    .or_else(|| nested.get(breakpoint).map(|items| folder_height_rows(items, collapsed_h)))
                    .unwrap_or(if expanded_h == 0 { current_h } else { expanded_h })
            };
            resize_item(layout, folder_id, new_h, ShiftPolicy::Always);
        }
    }

    if let Some(folder) = workspace.widget_mut(folder_id).and_then(Widget::folder_mut) {
        folder.expanded_heights = if collapsing { saved } else { BTreeMap::new() };
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Breakpoint, FolderData, WidgetData};

    fn folder_widget(id: &str) -> Widget {
        Widget {
            id: id.to_string(),
            data: WidgetData::Folder(FolderData {
                title: "Folder".to_string(),
                is_collapsed: false,
                expanded_h: 6,
                expanded_heights: BTreeMap::new(),
                children_layouts: None,
                color: None,
            }),
            min_w: Some(4),
            min_h: Some(1),
            parent_id: None,
        }
    }

    fn child(id: &str, parent: &str) -> Widget {
        let mut widget = registry::create_widget(WidgetKind::Text, Some(parent.to_string()));
        widget.id = id.to_string();
        widget
    }

    /// Folder `f` at the top with `below` under it, in lg and md.
    fn workspace() -> Workspace {
        let mut ws = Workspace::new("Test", "a@x.com");
        ws.widgets.push(folder_widget("f"));
        ws.widgets.push(registry::create_widget(WidgetKind::Text, None));
        let below = ws.widgets[1].id.clone();
        for breakpoint in [Breakpoint::Lg, Breakpoint::Md] {
            ws.layouts.insert(
                breakpoint,
                vec![LayoutItem::new("f", 0, 0, 12, 6), LayoutItem::new(below.clone(), 0, 6, 3, 4)],
            );
        }
        ws
    }

    #[test]
    fn test_folder_height_example() {
        let nested = vec![LayoutItem::new("c", 0, 0, 8, 6)];
        // content 6*21 + 5*8 + 24 = 190, total 258, ceil(274 / 66) = 5
        assert_eq!(folder_height_rows(&nested, 1), 5);
    }

    #[test]
    fn test_folder_height_floor() {
        assert_eq!(folder_height_rows(&[], 1), 2);
        assert_eq!(folder_height_rows(&[], 4), 4);
        let runaway = vec![LayoutItem::new("c", 0, u32::MAX - 1, 8, u32::MAX)];
        assert!(folder_height_rows(&runaway, 1) > 1);
    }

    #[test]
    fn test_layout_change_records_expanded_height() {
        let mut ws = workspace();
        let mut all = ws.layouts.clone();
        all.get_mut(&Breakpoint::Lg).unwrap()[0].h = 9;
        let active = all[&Breakpoint::Lg].clone();

        apply_layout_change(&mut ws, &active, all.clone());

        assert_eq!(ws.layouts, all);
        assert_eq!(ws.widget("f").unwrap().folder().unwrap().expanded_h, 9);
    }

    #[test]
    fn test_layout_change_keeps_expanded_height_when_collapsed() {
        let mut ws = workspace();
        ws.widget_mut("f").unwrap().folder_mut().unwrap().is_collapsed = true;
        let mut all = ws.layouts.clone();
        all.get_mut(&Breakpoint::Lg).unwrap()[0].h = 1;
        let active = all[&Breakpoint::Lg].clone();

        apply_layout_change(&mut ws, &active, all);

        assert_eq!(ws.widget("f").unwrap().folder().unwrap().expanded_h, 6);
    }

    #[test]
    fn test_children_layout_change_resizes_folder() {
        let mut ws = workspace();
        ws.widgets.push(child("c", "f"));
        let mut nested = Layouts::new();
        nested.insert(Breakpoint::Lg, vec![LayoutItem::new("c", 0, 0, 8, 6)]);
        nested.insert(Breakpoint::Md, vec![LayoutItem::new("c", 0, 0, 8, 20)]);

        assert!(apply_children_layout_change(&mut ws, "f", nested.clone()));

        assert_eq!(ws.layout(Breakpoint::Lg)[0].h, 5);
        assert_eq!(ws.layout(Breakpoint::Md)[0].h, folder_height_rows(&nested[&Breakpoint::Md], 1));
        let folder = ws.widget("f").unwrap().folder().unwrap();
        assert_eq!(folder.children_layouts.as_ref(), Some(&nested));
    }

    #[test]
    fn test_children_layout_change_drops_foreign_items() {
        let mut ws = workspace();
        ws.widgets.push(child("c", "f"));
        let mut nested = Layouts::new();
        nested.insert(
            Breakpoint::Lg,
            vec![LayoutItem::new("c", 0, 0, 8, 6), LayoutItem::new("stranger", 8, 0, 8, 30)],
        );

        apply_children_layout_change(&mut ws, "f", nested);

        let stored = ws.widget("f").unwrap().folder().unwrap().children_layouts.clone().unwrap();
        assert_eq!(stored[&Breakpoint::Lg].len(), 1);
        assert_eq!(ws.layout(Breakpoint::Lg)[0].h, 5);
    }

    #[test]
    fn test_children_layout_change_on_collapsed_folder_keeps_height() {
        let mut ws = workspace();
        ws.widgets.push(child("c", "f"));
        ws.widget_mut("f").unwrap().folder_mut().unwrap().is_collapsed = true;
        let mut nested = Layouts::new();
        nested.insert(Breakpoint::Lg, vec![LayoutItem::new("c", 0, 0, 8, 30)]);

        apply_children_layout_change(&mut ws, "f", nested);

        assert_eq!(ws.layout(Breakpoint::Lg)[0].h, 6);
        assert!(ws.widget("f").unwrap().folder().unwrap().children_layouts.is_some());
    }

    #[test]
    fn test_children_layout_change_unknown_folder() {
        let mut ws = workspace();
        let below = ws.widgets[1].id.clone();
        assert!(!apply_children_layout_change(&mut ws, "missing", Layouts::new()));
        assert!(!apply_children_layout_change(&mut ws, &below, Layouts::new()));
    }

    #[test]
    fn test_toggle_collapse_shifts_items_up() {
        let mut ws = workspace();
        assert!(toggle_folder(&mut ws, "f"));

        let folder = ws.widget("f").unwrap().folder().unwrap();
        assert!(folder.is_collapsed);
        for breakpoint in [Breakpoint::Lg, Breakpoint::Md] {
            let layout = ws.layout(breakpoint);
            assert_eq!(layout[0].h, 1);
            assert_eq!(layout[1].y, 1);
        }
    }

    #[test]
    fn test_toggle_round_trip_restores_layout() {
        let mut ws = workspace();
        let before = ws.layouts.clone();

        toggle_folder(&mut ws, "f");
        toggle_folder(&mut ws, "f");

        assert_eq!(ws.layouts, before);
        assert!(!ws.widget("f").unwrap().folder().unwrap().is_collapsed);
    }

    #[test]
    fn test_toggle_round_trip_with_children_per_breakpoint() {
        let mut ws = workspace();
        for id in ["c1", "c2", "c3"] {
            ws.widgets.push(child(id, "f"));
        }
        let mut nested = Layouts::new();
        nested.insert(
            Breakpoint::Lg,
            vec![
                LayoutItem::new("c1", 0, 0, 8, 6),
                LayoutItem::new("c2", 8, 0, 8, 6),
                LayoutItem::new("c3", 16, 0, 8, 6),
            ],
        );
        nested.insert(
            Breakpoint::Md,
            vec![
                LayoutItem::new("c1", 0, 0, 8, 6),
                LayoutItem::new("c2", 0, 6, 8, 6),
                LayoutItem::new("c3", 0, 12, 8, 6),
            ],
        );
        apply_children_layout_change(&mut ws, "f", nested);
        let before = ws.layouts.clone();
        assert_ne!(before[&Breakpoint::Lg][0].h, before[&Breakpoint::Md][0].h);

        toggle_folder(&mut ws, "f");
        let folder = ws.widget("f").unwrap().folder().unwrap();
        assert_eq!(folder.expanded_heights[&Breakpoint::Md], before[&Breakpoint::Md][0].h);

        toggle_folder(&mut ws, "f");
        assert_eq!(ws.layouts, before);
        assert!(ws.widget("f").unwrap().folder().unwrap().expanded_heights.is_empty());
    }

    #[test]
    fn test_expand_without_saved_heights_refits_content() {
        let mut ws = workspace();
        ws.widgets.push(child("c", "f"));
        let mut nested = Layouts::new();
        nested.insert(Breakpoint::Lg, vec![LayoutItem::new("c", 0, 0, 8, 6)]);
        let folder = ws.widget_mut("f").unwrap().folder_mut().unwrap();
        folder.is_collapsed = true;
        folder.children_layouts = Some(nested);
        for layout in ws.layouts.values_mut() {
            layout[0].h = 1;
            layout[1].y = 1;
        }

        toggle_folder(&mut ws, "f");

        // lg refits to its content, md has none and uses expanded_h
        assert_eq!(ws.layout(Breakpoint::Lg)[0].h, 5);
        assert_eq!(ws.layout(Breakpoint::Lg)[1].y, 5);
        assert_eq!(ws.layout(Breakpoint::Md)[0].h, 6);
        assert_eq!(ws.layout(Breakpoint::Md)[1].y, 6);
    }

    #[test]
    fn test_toggle_items_beside_folder_stay() {
        let mut ws = workspace();
        ws.layouts.get_mut(&Breakpoint::Lg).unwrap()[0].w = 6;
        ws.layouts
            .get_mut(&Breakpoint::Lg)
            .unwrap()
            .push(LayoutItem::new("side", 6, 2, 6, 2));

        toggle_folder(&mut ws, "f");

        let side = ws.layout(Breakpoint::Lg).iter().find(|i| i.i == "side").unwrap();
        assert_eq!(side.y, 2);
    }

    #[test]
    fn test_children_layout_growth_pushes_items_down() {
        let mut ws = workspace();
        ws.widgets.push(child("c", "f"));
        let mut nested = Layouts::new();
        nested.insert(Breakpoint::Lg, vec![LayoutItem::new("c", 0, 0, 8, 20)]);

        apply_children_layout_change(&mut ws, "f", nested);

        let layout = ws.layout(Breakpoint::Lg);
        assert!(layout[0].h > 6);
        assert_eq!(layout[1].y, layout[0].bottom());
        assert!(!layout[0].overlaps(&layout[1]));
    }

    #[test]
    fn test_children_layout_shrink_leaves_items_below() {
        let mut ws = workspace();
        ws.widgets.push(child("c", "f"));
        let mut nested = Layouts::new();
        nested.insert(Breakpoint::Lg, vec![LayoutItem::new("c", 0, 0, 8, 2)]);

        apply_children_layout_change(&mut ws, "f", nested);

        let layout = ws.layout(Breakpoint::Lg);
        assert!(layout[0].h < 6);
        assert_eq!(layout[1].y, 6);
    }

    #[test]
    fn test_toggle_nested_folder_uses_parent_layouts() {
        let mut ws = workspace();
        let mut inner = folder_widget("inner");
        inner.parent_id = Some("f".to_string());
        ws.widgets.push(inner);
        ws.widgets.push(child("c", "f"));
        let mut nested = Layouts::new();
        nested.insert(
            Breakpoint::Lg,
            vec![LayoutItem::new("inner", 0, 0, 24, 6), LayoutItem::new("c", 0, 6, 6, 4)],
        );
        ws.widget_mut("f").unwrap().folder_mut().unwrap().children_layouts = Some(nested);
        let top_level = ws.layouts.clone();

        assert!(toggle_folder(&mut ws, "inner"));

        let stored = ws.widget("f").unwrap().folder().unwrap().children_layouts.clone().unwrap();
        assert_eq!(stored[&Breakpoint::Lg][0].h, 1);
        assert_eq!(stored[&Breakpoint::Lg][1].y, 1);
        assert_eq!(ws.layouts, top_level);
    }

    #[test]
    fn test_toggle_non_folder_is_rejected() {
        let mut ws = workspace();
        let below = ws.widgets[1].id.clone();
        let before = ws.clone();
        assert!(!toggle_folder(&mut ws, &below));
        assert!(!toggle_folder(&mut ws, "missing"));
        assert_eq!(ws, before);
    }
}
