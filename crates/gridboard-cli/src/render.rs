//! Plain-text rendering of a workspace.

use gridboard_core::{Breakpoint, LayoutItem, Widget, Workspace};
use std::fmt::Write;

/// One line per placed widget in reading order, folder content indented
/// below its folder. `widgets` is the (resolved) widget set to show.
pub fn render_workspace(workspace: &Workspace, widgets: &[Widget], breakpoint: Breakpoint) -> String {
    let mut out = format!("{} [{}] at {}\n", workspace.name, workspace.id, breakpoint);
    render_layout(&mut out, widgets, workspace.layout(breakpoint), breakpoint, 1);
    out
}

fn render_layout(out: &mut String, widgets: &[Widget], layout: &[LayoutItem], breakpoint: Breakpoint, depth: usize) {
    let mut items: Vec<&LayoutItem> = layout.iter().collect();
    items.sort_by_key(|item| (item.y, item.x));

    for item in items {
        let Some(widget) = widgets.iter().find(|w| w.id == item.i) else {
            continue;
        };
        let collapsed = widget.folder().is_some_and(|f| f.is_collapsed);
        let _ = writeln!(
            out,
            "{:indent$}{:>2},{:<3} {:>2}x{:<2} {:<9} {}{}  ({})",
            "",
            item.x,
            item.y,
            item.w,
            item.h,
            widget.kind(),
            widget.data.title(),
            if collapsed { " [collapsed]" } else { "" },
            widget.id,
            indent = depth * 2,
        );

        if let Some(nested) = widget.folder().filter(|f| !f.is_collapsed).and_then(|f| f.children_layouts.as_ref()) {
            let nested = nested.get(&breakpoint).map(Vec::as_slice).unwrap_or(&[]);
            render_layout(out, widgets, nested, breakpoint, depth + 1);
        }
    }
}
