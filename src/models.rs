use std::collections::HashMap;

/// The three feature columns fed to the classifier, in fixed order.
pub const FEATURE_COLUMNS: [&str; 3] = ["Altitude_km", "Inclination_rad", "Eccentricity"];

/// Probability column appended to the augmented table (and recognized on
/// input for demo mode).
pub const PROB_COLUMN: &str = "PredictedRiskProb";

/// Boolean label column appended to the augmented table (1.0 / 0.0).
pub const LABEL_COLUMN: &str = "PredictedRisk";

/// Identifier columns tried in order when labelling rows for display.
pub const ID_COLUMNS: [&str; 3] = ["satellite_id", "OBJECT_NAME", "NORAD_CAT_ID"];

/// One cell of a raw input table.
///
/// `Number` always holds a finite float; non-finite parses (literal `NaN`,
/// `inf`, or a conversion blow-up) become `Missing` so no undefined value can
/// reach the classifier.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Missing,
}

impl Value {
    /// Parse a raw field: trimmed, empty → `Missing`, finite float →
    /// `Number`, non-finite float → `Missing`, anything else → `Text`.
    pub fn parse(raw: &str) -> Value {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Value::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            Ok(_) => Value::Missing,
            Err(_) => Value::Text(trimmed.to_string()),
        }
    }

    /// Numeric view with coercion: `Number` as-is, `Text` parsed if it holds
    /// a finite float, `Missing` → `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            Value::Missing => None,
        }
    }

    /// Strict numeric view: only the `Number` variant.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    /// JSON representation for the `--report json` output.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Missing => serde_json::Value::Null,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Missing => Ok(()),
        }
    }
}

/// A column-ordered table of [`Value`] cells.
///
/// Columns keep their insertion order (originals first, computed columns
/// appended), and every column holds exactly `len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    order: Vec<String>,
    cells: HashMap<String, Vec<Value>>,
    rows: usize,
}

impl Table {
    pub fn new() -> Table {
        Table::default()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.order
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.cells.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.cells.get(name).map(Vec::as_slice)
    }

    /// Insert or replace a column. A new column is appended to the order; a
    /// replaced column keeps its position. Short columns are padded with
    /// `Missing` to the current row count, and the row count grows if the
    /// column is longer.
    pub fn insert_column(&mut self, name: &str, mut values: Vec<Value>) {
        if values.len() > self.rows {
            self.grow(values.len());
        }
        while values.len() < self.rows {
            values.push(Value::Missing);
        }
        if !self.cells.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.cells.insert(name.to_string(), values);
    }

    /// Rename a column in place, keeping its position. No-op when the source
    /// is absent or the target already exists.
    pub fn rename_column(&mut self, from: &str, to: &str) {
        if !self.cells.contains_key(from) || self.cells.contains_key(to) {
            return;
        }
        if let Some(values) = self.cells.remove(from) {
            self.cells.insert(to.to_string(), values);
        }
        if let Some(slot) = self.order.iter_mut().find(|c| c.as_str() == from) {
            *slot = to.to_string();
        }
    }

    /// Rows as JSON objects, columns in table order.
    pub fn to_json_rows(&self) -> Vec<serde_json::Value> {
        (0..self.rows)
            .map(|i| {
                let mut row = serde_json::Map::new();
                for name in &self.order {
                    let cell = &self.cells[name][i];
                    row.insert(name.clone(), cell.to_json());
                }
                serde_json::Value::Object(row)
            })
            .collect()
    }

    fn grow(&mut self, rows: usize) {
        for values in self.cells.values_mut() {
            while values.len() < rows {
                values.push(Value::Missing);
            }
        }
        self.rows = rows;
    }
}

/// One classifier output: positive-class probability plus the thresholded
/// label (`true` = high collision risk).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub risk_probability: f64,
    pub risk_label: bool,
}
