use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::stripped_text;

static TABLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());

/// Header cells a stage-wise expression table must contain, in any order.
pub const EXPECTED_HEADERS: [&str; 6] = ["Stage", "Samples", "Average", "Median", "Std", "ANOVA-pvalue"];

/// Output columns: the expression headers followed by the subtype label.
pub const COLUMNS: [&str; 7] = [
    "Stage",
    "Samples",
    "Average",
    "Median",
    "Std",
    "ANOVA-pvalue",
    "CustomSub",
];

/// One row of a stage-wise expression table, tagged with its subtype label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionRecord {
    pub stage: String,
    pub samples: String,
    pub average: String,
    pub median: String,
    pub std: String,
    pub anova_pvalue: String,
    pub custom_sub: String,
}

impl ExpressionRecord {
    /// Build a record from the cells of a data row. Cells are taken by
    /// position; missing ones become empty and extras past the sixth are dropped.
    pub fn from_cells(cells: Vec<String>, custom_sub: &str) -> Self {
        let mut it = cells.into_iter();
        let mut next = || it.next().unwrap_or_default();
        ExpressionRecord {
            stage: next(),
            samples: next(),
            average: next(),
            median: next(),
            std: next(),
            anova_pvalue: next(),
            custom_sub: custom_sub.to_string(),
        }
    }

    /// Field values in `COLUMNS` order.
    pub fn fields(&self) -> [&str; 7] {
        [
            self.stage.as_str(),
            self.samples.as_str(),
            self.average.as_str(),
            self.median.as_str(),
            self.std.as_str(),
            self.anova_pvalue.as_str(),
            self.custom_sub.as_str(),
        ]
    }
}

/// Extract the rows of the first table whose header row holds every name in
/// `EXPECTED_HEADERS`. Later tables are never looked at, even if they match.
/// Returns an empty vector when no table matches.
pub fn extract_expression_table(html: &str, custom_sub: &str) -> Vec<ExpressionRecord> {
    let doc = Html::parse_document(html);
    let mut saw_table = false;

    for table in doc.select(&TABLE) {
        saw_table = true;
        let rows: Vec<ElementRef> = table.select(&ROW).collect();
        let Some((header, body)) = rows.split_first() else {
            debug!("No rows found in the table");
            continue;
        };

        let headers = cell_texts(header);
        if !EXPECTED_HEADERS.iter().all(|h| headers.iter().any(|c| c.as_str() == *h)) {
            debug!(?headers, "Table does not contain all expression headers");
            continue;
        }

        // rows without td cells (spacers, th-only captions) carry no data
        return body
            .iter()
            .map(cell_texts)
            .filter(|cells| !cells.is_empty())
            .map(|cells| ExpressionRecord::from_cells(cells, custom_sub))
            .collect();
    }

    if !saw_table {
        debug!("No tables found on the page");
    }
    Vec::new()
}

fn cell_texts(row: &ElementRef) -> Vec<String> {
    row.select(&CELL).map(|cell| stripped_text(&cell)).collect()
}
