//! Widget registry: default geometry and payload per widget type.

use uuid::Uuid;

use crate::model::{
    ChecklistData, ChecklistItem, FolderData, ImageData, LineData, LineDataPoint, LineSeries,
    PieData, PlanData, PlanUnit, TableCell, TableColumn, TableData, TableRow, TextData, TitleData,
    Widget, WidgetData, WidgetKind,
};
use crate::palette;

/// Default size of a widget type on the dashboard grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetDefaults {
    pub w: u32,
    pub h: u32,
    pub min_w: u32,
    pub min_h: u32,
}

impl WidgetDefaults {
    /// Footprint inside a folder, whose grid has twice the columns.
    pub fn nested(self) -> Self {
        Self {
            w: self.w * 2,
            h: self.h * 2,
            min_w: self.min_w * 2,
            min_h: self.min_h * 2,
        }
    }
}

/// Default geometry of a widget type.
pub fn defaults(kind: WidgetKind) -> WidgetDefaults {
    let (w, h, min_w, min_h) = match kind {
        WidgetKind::Plan => (4, 5, 3, 5),
        WidgetKind::Pie => (4, 5, 3, 4),
        WidgetKind::Line => (4, 6, 4, 4),
        WidgetKind::Text => (3, 4, 2, 2),
        WidgetKind::Title => (12, 2, 2, 2),
        WidgetKind::Checklist => (4, 5, 3, 5),
        WidgetKind::Image => (4, 5, 2, 2),
        WidgetKind::Article => (4, 8, 4, 4),
        WidgetKind::Table => (6, 6, 4, 4),
        WidgetKind::Folder => (12, 6, 4, 1),
    };
    WidgetDefaults { w, h, min_w, min_h }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Default payload of a widget type, before any palette is applied.
pub fn default_data(kind: WidgetKind) -> WidgetData {
    match kind {
        WidgetKind::Plan => WidgetData::Plan(PlanData {
            title: "Plan progress".to_string(),
            current: 7500.0,
            target: 10000.0,
            unit: PlanUnit::Ruble,
            custom_unit: "days".to_string(),
            color: "#8A2BE2".to_string(),
            color2: "#BA55D3".to_string(),
            user_set_colors: None,
        }),
        WidgetKind::Pie => WidgetData::Pie(PieData {
            title: "Ratio".to_string(),
            total: 100.0,
            part: 30.0,
            total_label: "Total".to_string(),
            part_label: "Part".to_string(),
            color1: "#8A2BE2".to_string(),
            color2: "#BA55D3".to_string(),
            user_set_colors: None,
        }),
        WidgetKind::Line => {
            let points = [("Jan", 30.0), ("Feb", 40.0), ("Mar", 45.0), ("Apr", 50.0), ("May", 49.0), ("Jun", 60.0)];
            WidgetData::Line(LineData {
                title: "Trend".to_string(),
                color: "#8A2BE2".to_string(),
                color2: "#4facfe".to_string(),
                user_set_colors: None,
                series: vec![LineSeries {
                    name: "Sales".to_string(),
                    data: points
                        .into_iter()
                        .map(|(x, y)| LineDataPoint { id: new_id(), x: x.into(), y, dependency: None })
                        .collect(),
                }],
            })
        }
        WidgetKind::Text => WidgetData::Text(TextData {
            title: "Note".to_string(),
            content: "This is a text widget. Write your thoughts here.".to_string(),
        }),
        WidgetKind::Title => WidgetData::Title(TitleData {
            title: "Section title".to_string(),
        }),
        WidgetKind::Checklist => WidgetData::Checklist(ChecklistData {
            title: "To do".to_string(),
            items: vec![
                ChecklistItem { id: "1".to_string(), text: "First task".to_string(), completed: false },
                ChecklistItem { id: "2".to_string(), text: "Second task".to_string(), completed: true },
            ],
        }),
        WidgetKind::Image => WidgetData::Image(ImageData {
            title: "Image".to_string(),
            src: None,
        }),
        WidgetKind::Article => WidgetData::Article(TextData {
            title: "Article".to_string(),
            content: "## Article title\n\nStart writing here...".to_string(),
        }),
        WidgetKind::Table => {
            let columns = vec![
                TableColumn { id: new_id(), header: "Column 1".to_string() },
                TableColumn { id: new_id(), header: "Column 2".to_string() },
            ];
            let cells = columns
                .iter()
                .zip(["Value A1", "Value B1"])
                .map(|(col, value)| TableCell { column_id: col.id.clone(), value: value.to_string() })
                .collect();
            WidgetData::Table(TableData {
                title: "New table".to_string(),
                columns,
                rows: vec![TableRow { id: new_id(), cells }],
            })
        }
        WidgetKind::Folder => WidgetData::Folder(FolderData {
            title: "New folder".to_string(),
            is_collapsed: false,
            expanded_h: defaults(WidgetKind::Folder).h,
            expanded_heights: Default::default(),
            children_layouts: None,
            color: None,
        }),
    }
}

/// Build a new widget with registry defaults and a random palette.
pub fn create_widget(kind: WidgetKind, parent_id: Option<String>) -> Widget {
    let mut data = default_data(kind);
    let gradient = palette::random_gradient();
    match &mut data {
        WidgetData::Plan(plan) => {
            plan.color = gradient.color.to_string();
            plan.color2 = gradient.color2.to_string();
            plan.user_set_colors = Some(false);
        }
        WidgetData::Pie(pie) => {
            pie.color1 = gradient.color.to_string();
            pie.color2 = gradient.color2.to_string();
            pie.user_set_colors = Some(false);
        }
        WidgetData::Line(line) => {
            line.color = gradient.color.to_string();
            line.color2 = gradient.color2.to_string();
            line.user_set_colors = Some(false);
        }
        WidgetData::Folder(folder) => {
            folder.color = Some(palette::random_folder_color().to_string());
        }
        _ => {}
    }

    let geometry = defaults(kind);
    Widget {
        id: new_id(),
        data,
        min_w: Some(geometry.min_w),
        min_h: Some(geometry.min_h),
        parent_id,
    }
}
