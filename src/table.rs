//! Small tables printed by the summary commands.
//!
//! The default rendering is Org-mode markup, ready to paste into a report and
//! realign with TAB. CSV and JSON renderings carry the same cells.

use std::fmt;

use serde_json::{json, Map, Value};

/// Errors from building or rendering tables
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Row does not have one cell per header column
    #[error("row has {found} cells but the header has {expected} columns")]
    ColumnCount {
        /// Header column count
        expected: usize,
        /// Cells in the offending row
        found: usize,
    },

    /// CSV writer error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// I/O error while flushing a writer
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Output format for tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableFormat {
    /// Org-mode table with caption and name keywords
    #[default]
    Org,
    /// Comma separated values with a header record
    Csv,
    /// JSON object with caption, name, columns and rows
    Json,
}

/// One table cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Literal text
    Text(String),
    /// Float printed with a fixed number of decimals
    Fixed(f64, usize),
    /// Float printed in shortest round-trip form (`0.0`, `-250.0`)
    Float(f64),
    /// Integer
    Int(i64),
}

impl Cell {
    /// Text cell
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    fn to_json(&self) -> Value {
        match self {
            Cell::Text(s) => Value::String(s.clone()),
            Cell::Fixed(v, _) | Cell::Float(v) => Value::from(*v),
            Cell::Int(v) => Value::from(*v),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Fixed(v, precision) => write!(f, "{:.*}", precision, v),
            Cell::Float(v) => write!(f, "{:?}", v),
            Cell::Int(v) => write!(f, "{}", v),
        }
    }
}

/// A captioned table with a fixed header
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    caption: Option<String>,
    name: Option<String>,
    header: Vec<String>,
    keys: Vec<String>,
    rows: Vec<Vec<Cell>>,
    rule: bool,
}

impl Table {
    /// Create an empty table; a rule line separates header and body by default
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let header: Vec<String> = header.into_iter().map(Into::into).collect();
        Self {
            caption: None,
            name: None,
            keys: header.clone(),
            header,
            rows: Vec::new(),
            rule: true,
        }
    }

    /// Set the `#+caption:`
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Set the `#+name:`
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Enable or disable the header rule line
    pub fn with_rule(mut self, rule: bool) -> Self {
        self.rule = rule;
        self
    }

    /// Name column `index` as `key` in CSV and JSON output; Org keeps the label
    pub fn with_column_key(mut self, index: usize, key: impl Into<String>) -> Self {
        if let Some(slot) = self.keys.get_mut(index) {
            *slot = key.into();
        }
        self
    }

    /// Append a row; it must have exactly one cell per header column
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<(), TableError> {
        if row.len() != self.header.len() {
            return Err(TableError::ColumnCount {
                expected: self.header.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Header labels
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Column keys used by the CSV and JSON renderings
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Body rows
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Render in the requested format
    pub fn render(&self, format: TableFormat) -> Result<String, TableError> {
        match format {
            TableFormat::Org => Ok(self.to_org()),
            TableFormat::Csv => self.to_csv(),
            TableFormat::Json => self.to_json(),
        }
    }

    fn to_org(&self) -> String {
        let body: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect();

        let mut widths: Vec<usize> = self.header.iter().map(|h| h.chars().count()).collect();
        for row in &body {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let format_line = |cells: &[String]| -> String {
            let padded: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(c, &w)| format!(" {:<w$} ", c, w = w))
                .collect();
            format!("|{}|", padded.join("|"))
        };

        let mut lines = Vec::new();
        if let Some(caption) = &self.caption {
            lines.push(format!("#+caption: {}", caption));
        }
        if let Some(name) = &self.name {
            lines.push(format!("#+name: {}", name));
        }
        lines.push(format_line(&self.header));
        if self.rule {
            let dashes: Vec<String> = widths.iter().map(|&w| "-".repeat(w + 2)).collect();
            lines.push(format!("|{}|", dashes.join("+")));
        }
        for row in &body {
            lines.push(format_line(row));
        }
        lines.join("\n")
    }

    fn to_csv(&self) -> Result<String, TableError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.keys)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(ToString::to_string))?;
        }
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8_lossy(&bytes).trim_end().to_string())
    }

    fn to_json(&self) -> Result<String, TableError> {
        let rows: Vec<Value> = self
            .rows
            .iter()
            .map(|row| {
                let object: Map<String, Value> = self
                    .keys
                    .iter()
                    .cloned()
                    .zip(row.iter().map(Cell::to_json))
                    .collect();
                Value::Object(object)
            })
            .collect();

        let doc = json!({
            "caption": self.caption,
            "name": self.name,
            "columns": self.keys,
            "rows": rows,
        });
        Ok(serde_json::to_string_pretty(&doc)?)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_org())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(["frame", "start", "n>0"])
            .with_caption("Frame times in microsecond.")
            .with_name("tab:frame times")
            .with_rule(false);
        table
            .push_row(vec![Cell::text("signal"), Cell::Float(-250.0), Cell::Int(12)])
            .unwrap();
        table
            .push_row(vec![Cell::text("splat"), Cell::Fixed(0.125, 1), Cell::Int(3)])
            .unwrap();
        table
    }

    #[test]
    fn test_org_rendering() {
        let text = sample().render(TableFormat::Org).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "#+caption: Frame times in microsecond.");
        assert_eq!(lines[1], "#+name: tab:frame times");
        assert_eq!(lines[2], "| frame  | start  | n>0 |");
        assert_eq!(lines[3], "| signal | -250.0 | 12  |");
        assert_eq!(lines[4], "| splat  | 0.1    | 3   |");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_rule_line() {
        let mut table = Table::new(["x (mm)", "y"]);
        table.push_row(vec![Cell::Float(1.5), Cell::Int(2)]).unwrap();
        let text = table.to_string();
        assert_eq!(text.lines().nth(1), Some("|--------+---|"));
    }

    #[test]
    fn test_column_count_enforced() {
        let mut table = Table::new(["a", "b"]);
        let err = table.push_row(vec![Cell::Int(1)]).unwrap_err();
        assert!(matches!(
            err,
            TableError::ColumnCount {
                expected: 2,
                found: 1
            }
        ));
        assert!(table.rows().is_empty());
    }

    #[test]
    fn test_csv_rendering() {
        let text = sample().render(TableFormat::Csv).unwrap();
        assert_eq!(text, "frame,start,n>0\nsignal,-250.0,12\nsplat,0.1,3");
    }

    #[test]
    fn test_json_keeps_numbers() {
        let text = sample().render(TableFormat::Json).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["name"], "tab:frame times");
        assert_eq!(value["rows"][0]["n>0"], 12);
        assert_eq!(value["rows"][1]["start"], 0.125);
        assert_eq!(value["columns"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_column_key_only_outside_org() {
        let mut table = Table::new(["", "min"]).with_column_key(0, "quantity");
        table.push_row(vec![Cell::text("depos t"), Cell::Fixed(1.0, 2)]).unwrap();

        assert_eq!(table.header(), &["".to_string(), "min".to_string()]);
        assert_eq!(table.keys(), &["quantity".to_string(), "min".to_string()]);
        assert_eq!(table.to_string().lines().next(), Some("|         | min  |"));
        assert_eq!(
            table.render(TableFormat::Csv).unwrap(),
            "quantity,min\ndepos t,1.00"
        );

        let value: Value = serde_json::from_str(&table.render(TableFormat::Json).unwrap()).unwrap();
        assert_eq!(value["rows"][0]["quantity"], "depos t");
        assert!(value["rows"][0].get("").is_none());

        // out of range indices leave the keys alone
        let table = Table::new(["a"]).with_column_key(3, "b");
        assert_eq!(table.keys(), &["a".to_string()]);
    }
}
