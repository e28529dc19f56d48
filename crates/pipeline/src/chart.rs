//! Chart archetype selection and spec construction.
//!
//! Classification is a decision list over the result table's column names,
//! its row count, and the originating SQL text — an ordered table of
//! (predicate, archetype) rules evaluated top-down, first match wins. The
//! order is part of the contract and auditable in [`RULES`].
//!
//! Construction turns a table and archetype into a declarative
//! [`ChartSpec`]; the consuming surface renders it. Build never fails: an
//! empty or unusable table yields no chart.

use crate::types::ResultTable;
use serde::{Deserialize, Serialize};

/// Plot template used by the consuming surface.
const TEMPLATE: &str = "plotly_dark";

/// Marker size for scatter timelines.
const SCATTER_MARKER_SIZE: u32 = 10;

/// Chart archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Timeline,
    Bar,
    Pie,
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartKind::Timeline => write!(f, "timeline"),
            ChartKind::Bar => write!(f, "bar"),
            ChartKind::Pie => write!(f, "pie"),
        }
    }
}

/// Concrete mark used to draw the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartMark {
    Line,
    Scatter,
    Bar,
    Pie,
}

/// Declarative chart specification.
///
/// Terminal: never mutated after construction, only rendered or omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSpec {
    /// Archetype this spec was built for
    pub kind: ChartKind,

    /// Mark used to draw it
    pub mark: ChartMark,

    /// Display title
    pub title: String,

    /// Column bound to the x axis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,

    /// Column bound to the y axis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,

    /// Column providing slice names (pie)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub names: Option<String>,

    /// Column providing slice values (pie)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<String>,

    /// Draw point markers on line charts
    #[serde(default)]
    pub markers: bool,

    /// Fixed marker size (scatter timelines)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_size: Option<u32>,

    /// Explicit chart height in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Plot template name
    pub template: String,
}

/// Inputs the classification rules look at.
struct RuleInput {
    /// Lowercased column names
    columns: Vec<String>,
    row_count: usize,
    /// Lowercased originating SQL text
    sql: String,
}

impl RuleInput {
    fn new(sql_text: &str, table: &ResultTable) -> Self {
        Self {
            columns: table.columns.iter().map(|c| c.to_lowercase()).collect(),
            row_count: table.row_count(),
            sql: sql_text.to_lowercase(),
        }
    }

    fn any_column_contains(&self, needles: &[&str]) -> bool {
        self.columns
            .iter()
            .any(|c| needles.iter().any(|n| c.contains(n)))
    }
}

fn has_date_column(input: &RuleInput) -> bool {
    input.any_column_contains(&["year", "publication_date", "date"])
}

fn is_small_categorical_count(input: &RuleInput) -> bool {
    input.any_column_contains(&["status", "type", "stage"])
        && input.any_column_contains(&["count"])
        && input.row_count < 10
}

fn mentions_trend(input: &RuleInput) -> bool {
    input.sql.contains("evolution") || input.sql.contains("trend")
}

fn has_count_column(input: &RuleInput) -> bool {
    input.any_column_contains(&["count", "total", "num", "nb"])
}

/// Classification rules in priority order; first match wins.
const RULES: &[(fn(&RuleInput) -> bool, ChartKind)] = &[
    (has_date_column, ChartKind::Timeline),
    (is_small_categorical_count, ChartKind::Pie),
    (mentions_trend, ChartKind::Timeline),
    (has_count_column, ChartKind::Bar),
];

/// Choose a chart archetype for a result table.
pub fn classify(sql_text: &str, table: &ResultTable) -> ChartKind {
    let input = RuleInput::new(sql_text, table);

    for (predicate, kind) in RULES {
        if predicate(&input) {
            return *kind;
        }
    }

    ChartKind::Bar
}

/// Build a chart spec for a table and archetype.
///
/// Returns `None` when the table is empty or the archetype cannot be
/// mapped onto its columns; construction never fails otherwise.
pub fn build(table: &ResultTable, kind: ChartKind, title: &str) -> Option<ChartSpec> {
    if table.is_empty() {
        return None;
    }

    match kind {
        ChartKind::Timeline => build_timeline(table, title),
        ChartKind::Bar => Some(build_bar(table, title)),
        ChartKind::Pie => Some(build_pie(table, title)),
    }
}

/// First column whose lowercased name contains any of the needles.
fn find_column(table: &ResultTable, needles: &[&str]) -> Option<String> {
    table
        .columns
        .iter()
        .find(|c| {
            let lower = c.to_lowercase();
            needles.iter().any(|n| lower.contains(n))
        })
        .cloned()
}

fn build_timeline(table: &ResultTable, title: &str) -> Option<ChartSpec> {
    let count_col = find_column(table, &["count"]);

    if let Some(count_col) = count_col {
        // Counts over time: line chart with markers
        let date_col =
            find_column(table, &["year", "date"]).unwrap_or_else(|| table.columns[0].clone());

        return Some(ChartSpec {
            kind: ChartKind::Timeline,
            mark: ChartMark::Line,
            title: pick_title(title, "Evolution Over Time"),
            x: Some(date_col),
            y: Some(count_col),
            names: None,
            values: None,
            markers: true,
            marker_size: None,
            height: None,
            template: TEMPLATE.to_string(),
        });
    }

    // A plain list of dated items: scatter, one row per item
    let date_col = find_column(table, &["year", "date"])?;
    let label_col = find_column(table, &["title", "id", "reference"])
        .unwrap_or_else(|| table.columns[0].clone());

    Some(ChartSpec {
        kind: ChartKind::Timeline,
        mark: ChartMark::Scatter,
        title: pick_title(title, "Standards Timeline"),
        x: Some(date_col),
        y: Some(label_col),
        names: None,
        values: None,
        markers: false,
        marker_size: Some(SCATTER_MARKER_SIZE),
        // Grows with the row count for legibility
        height: Some(400 + 20 * table.row_count() as u32),
        template: TEMPLATE.to_string(),
    })
}

fn build_bar(table: &ResultTable, title: &str) -> ChartSpec {
    let x = table.columns[0].clone();
    let y = table.columns.get(1).unwrap_or(&table.columns[0]).clone();

    ChartSpec {
        kind: ChartKind::Bar,
        mark: ChartMark::Bar,
        title: pick_title(title, "Data Distribution"),
        x: Some(x),
        y: Some(y),
        names: None,
        values: None,
        markers: false,
        marker_size: None,
        height: None,
        template: TEMPLATE.to_string(),
    }
}

fn build_pie(table: &ResultTable, title: &str) -> ChartSpec {
    let names = table.columns[0].clone();
    let values = table.columns.get(1).unwrap_or(&table.columns[0]).clone();

    ChartSpec {
        kind: ChartKind::Pie,
        mark: ChartMark::Pie,
        title: pick_title(title, "Composition"),
        x: None,
        y: None,
        names: Some(names),
        values: Some(values),
        markers: false,
        marker_size: None,
        height: None,
        template: TEMPLATE.to_string(),
    }
}

fn pick_title(title: &str, default: &str) -> String {
    if title.is_empty() {
        default.to_string()
    } else {
        title.to_string()
    }
}
