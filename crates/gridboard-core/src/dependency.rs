//! Derives chart points that mirror numeric fields of other widgets.

use std::collections::HashMap;

use crate::model::{Dependency, DependencyKey, LineData, Widget, WidgetData};

/// Current value of the field a dependency points at, if the source
/// exists and exposes that field.
pub fn source_value(widgets_by_id: &HashMap<&str, &Widget>, dependency: &Dependency) -> Option<f64> {
    let source = widgets_by_id.get(dependency.widget_id.as_str())?;
    match (&source.data, dependency.data_key) {
        (WidgetData::Plan(plan), DependencyKey::Current) => Some(plan.current),
        (WidgetData::Plan(plan), DependencyKey::Target) => Some(plan.target),
        (WidgetData::Pie(pie), DependencyKey::Total) => Some(pie.total),
        (WidgetData::Pie(pie), DependencyKey::Part) => Some(pie.part),
        _ => None,
    }
}

fn resolve_line(line: &LineData, widgets_by_id: &HashMap<&str, &Widget>) -> LineData {
    let mut line = line.clone();
    for point in line.series.iter_mut().flat_map(|s| s.data.iter_mut()) {
        let Some(dependency) = &point.dependency else {
            continue;
        };
        // Unresolvable links keep their cached value.
        if let Some(value) = source_value(widgets_by_id, dependency) {
            if value != point.y {
                point.y = value;
            }
        }
    }
    line
}

/// Return a copy of `widgets` with every dependent chart point refreshed
/// from its source. The input is left untouched, so resolving twice yields
/// the same view.
pub fn resolve(widgets: &[Widget]) -> Vec<Widget> {
    let widgets_by_id: HashMap<&str, &Widget> = widgets.iter().map(|w| (w.id.as_str(), w)).collect();
    widgets
        .iter()
        .map(|widget| match &widget.data {
            WidgetData::Line(line) => Widget {
                data: WidgetData::Line(resolve_line(line, &widgets_by_id)),
                ..widget.clone()
            },
            _ => widget.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LineDataPoint, WidgetKind};
    use crate::registry::create_widget;

    fn linked_point(source: &str, key: DependencyKey, y: f64) -> LineDataPoint {
        LineDataPoint {
            id: format!("{source}-{key:?}"),
            x: "Jan".into(),
            y,
            dependency: Some(Dependency { widget_id: source.to_string(), data_key: key }),
        }
    }

    fn with_points(points: Vec<LineDataPoint>) -> Widget {
        let mut chart = create_widget(WidgetKind::Line, None);
        if let WidgetData::Line(line) = &mut chart.data {
            line.series[0].data = points;
        }
        chart
    }

    fn points(widget: &Widget) -> Vec<f64> {
        match &widget.data {
            WidgetData::Line(line) => line.series[0].data.iter().map(|p| p.y).collect(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn test_resolves_plan_and_pie_fields() {
        let plan = create_widget(WidgetKind::Plan, None);
        let pie = create_widget(WidgetKind::Pie, None);
        let chart = with_points(vec![
            linked_point(&plan.id, DependencyKey::Current, 0.0),
            linked_point(&plan.id, DependencyKey::Target, 0.0),
            linked_point(&pie.id, DependencyKey::Total, 0.0),
            linked_point(&pie.id, DependencyKey::Part, 0.0),
        ]);

        let resolved = resolve(&[plan, pie, chart]);
        assert_eq!(points(&resolved[2]), vec![7500.0, 10000.0, 100.0, 30.0]);
    }

    #[test]
    fn test_missing_or_incompatible_source_keeps_cached_value() {
        let plan = create_widget(WidgetKind::Plan, None);
        let text = create_widget(WidgetKind::Text, None);
        let chart = with_points(vec![
            linked_point("gone", DependencyKey::Current, 1.0),
            linked_point(&text.id, DependencyKey::Current, 2.0),
            // plans have no `total`
            linked_point(&plan.id, DependencyKey::Total, 3.0),
        ]);

        let resolved = resolve(&[plan, text, chart]);
        assert_eq!(points(&resolved[2]), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_resolution_is_idempotent_and_pure() {
        let plan = create_widget(WidgetKind::Plan, None);
        let chart = with_points(vec![linked_point(&plan.id, DependencyKey::Current, 0.0)]);
        let widgets = vec![plan, chart];

        let once = resolve(&widgets);
        let twice = resolve(&once);
        assert_eq!(once, twice);
        assert_eq!(resolve(&widgets), once);
        assert_eq!(points(&widgets[1]), vec![0.0]);
    }

    #[test]
    fn test_unlinked_points_untouched() {
        let chart = create_widget(WidgetKind::Line, None);
        let resolved = resolve(std::slice::from_ref(&chart));
        assert_eq!(resolved[0], chart);
    }
}
