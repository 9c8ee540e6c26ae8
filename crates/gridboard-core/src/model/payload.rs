//! Type-specific widget payloads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use super::{Breakpoint, Layouts, WidgetId};

/// Unit shown next to plan values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlanUnit {
    #[serde(rename = "%")]
    Percent,
    #[default]
    #[serde(rename = "₽")]
    Ruble,
    #[serde(rename = "custom")]
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanData {
    pub title: String,
    pub current: f64,
    pub target: f64,
    pub unit: PlanUnit,
    pub custom_unit: String,
    pub color: String,
    pub color2: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_set_colors: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieData {
    pub title: String,
    pub total: f64,
    pub part: f64,
    pub total_label: String,
    pub part_label: String,
    pub color1: String,
    pub color2: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_set_colors: Option<bool>,
}

/// Numeric fields a chart point may mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKey {
    /// `PlanData::current`
    Current,
    /// `PlanData::target`
    Target,
    /// `PieData::total`
    Total,
    /// `PieData::part`
    Part,
}

/// Live link from a chart point to a numeric field of another widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub widget_id: WidgetId,
    pub data_key: DependencyKey,
}

/// X-axis label of a chart point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointLabel {
    Number(f64),
    Text(String),
}

impl From<&str> for PointLabel {
    fn from(s: &str) -> Self {
        PointLabel::Text(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineDataPoint {
    pub id: String,
    pub x: PointLabel,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<Dependency>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    pub data: Vec<LineDataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineData {
    pub title: String,
    pub color: String,
    pub color2: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_set_colors: Option<bool>,
    pub series: Vec<LineSeries>,
}

/// Rejected edit of a chart point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointEditError {
    #[error("Series not found: {0}")]
    SeriesNotFound(String),
    #[error("Point not found: {0}")]
    PointNotFound(String),
    #[error("Point {0} mirrors another widget and cannot be edited directly")]
    DependencyAttached(String),
}

impl LineData {
    fn point_mut(&mut self, series: &str, point_id: &str) -> Result<&mut LineDataPoint, PointEditError> {
        let series = self
            .series
            .iter_mut()
            .find(|s| s.name == series)
            .ok_or_else(|| PointEditError::SeriesNotFound(series.to_string()))?;
        series
            .data
            .iter_mut()
            .find(|p| p.id == point_id)
            .ok_or_else(|| PointEditError::PointNotFound(point_id.to_string()))
    }

    /// Set the value of a point. Points with an attached dependency are
    /// read-only.
    pub fn set_point_value(&mut self, series: &str, point_id: &str, y: f64) -> Result<(), PointEditError> {
        let point = self.point_mut(series, point_id)?;
        if point.dependency.is_some() {
            return Err(PointEditError::DependencyAttached(point.id.clone()));
        }
        point.y = y;
        Ok(())
    }

    /// Attach or detach a dependency on a point.
    pub fn set_point_dependency(
        &mut self,
        series: &str,
        point_id: &str,
        dependency: Option<Dependency>,
    ) -> Result<(), PointEditError> {
        self.point_mut(series, point_id)?.dependency = dependency;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextData {
    pub title: String,
    pub content: String,
}

pub type ArticleData = TextData;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleData {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistData {
    pub title: String,
    pub items: Vec<ChecklistItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageData {
    pub title: String,
    pub src: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderData {
    pub title: String,
    pub is_collapsed: bool,
    /// Height restored when the folder expands again.
    pub expanded_h: u32,
    /// Heights per breakpoint at the moment of collapse; empty while expanded.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub expanded_heights: BTreeMap<Breakpoint, u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_layouts: Option<Layouts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    pub id: String,
    pub header: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    pub column_id: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub id: String,
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    pub title: String,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<TableRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> LineData {
        LineData {
            title: "Sales".to_string(),
            color: "#000".to_string(),
            color2: "#fff".to_string(),
            user_set_colors: None,
            series: vec![LineSeries {
                name: "2024".to_string(),
                data: vec![
                    LineDataPoint { id: "p1".to_string(), x: "Jan".into(), y: 1.0, dependency: None },
                    LineDataPoint {
                        id: "p2".to_string(),
                        x: PointLabel::Number(2.0),
                        y: 2.0,
                        dependency: Some(Dependency {
                            widget_id: "plan".to_string(),
                            data_key: DependencyKey::Current,
                        }),
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_set_point_value() {
        let mut data = line();
        data.set_point_value("2024", "p1", 42.0).unwrap();
        assert_eq!(data.series[0].data[0].y, 42.0);
    }

    #[test]
    fn test_dependent_point_is_read_only() {
        let mut data = line();
        let result = data.set_point_value("2024", "p2", 9.0);
        assert_eq!(result, Err(PointEditError::DependencyAttached("p2".to_string())));
        assert_eq!(data.series[0].data[1].y, 2.0);

        data.set_point_dependency("2024", "p2", None).unwrap();
        data.set_point_value("2024", "p2", 9.0).unwrap();
        assert_eq!(data.series[0].data[1].y, 9.0);
    }

    #[test]
    fn test_missing_series_or_point() {
        let mut data = line();
        assert!(matches!(data.set_point_value("nope", "p1", 0.0), Err(PointEditError::SeriesNotFound(_))));
        assert!(matches!(data.set_point_value("2024", "nope", 0.0), Err(PointEditError::PointNotFound(_))));
    }

    #[test]
    fn test_point_label_untagged() {
        let p: LineDataPoint = serde_json::from_str(r#"{"id":"a","x":3,"y":1.5}"#).unwrap();
        assert_eq!(p.x, PointLabel::Number(3.0));
        let p: LineDataPoint = serde_json::from_str(r#"{"id":"a","x":"Mar","y":1.5}"#).unwrap();
        assert_eq!(p.x, PointLabel::Text("Mar".to_string()));
    }
}
