//! Feature normalization: turn an arbitrary element-set table into the fixed
//! feature triple `[Altitude_km, Inclination_rad, Eccentricity]`.
//!
//! Resolution is column-presence driven and checked once per batch, not per
//! row: each target feature has an ordered list of source rules, and the
//! first rule whose column exists wins. Missing numeric cells are then filled
//! with the per-column mean of the batch, so the output matrix is always
//! fully populated with finite floats.
//!
//! Imputation is deliberately batch-relative: the same row normalized alone
//! and normalized inside a larger batch can receive different imputed values.

use std::f64::consts::PI;

use crate::models::{Table, Value, FEATURE_COLUMNS};

/// Standard gravitational parameter of Earth, km³/s².
const MU_EARTH_KM3_S2: f64 = 398600.4418;

/// Mean Earth radius, km.
const EARTH_RADIUS_KM: f64 = 6371.0;

const SECONDS_PER_DAY: f64 = 86400.0;

/// Result of normalizing one batch: the augmented table (original columns
/// plus any computed ones) and the feature matrix in input row order.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub table: Table,
    pub features: Vec<[f64; 3]>,
}

/// Convert mean motion (revolutions/day) to approximate altitude in km via
/// the circular-orbit closed form: `n = mm·2π/86400` rad/s,
/// `a = (μ/n²)^(1/3)`, altitude `= a − R⊕`.
///
/// A mean motion of zero divides out to infinity; the caller discards
/// non-finite results as missing.
pub fn mean_motion_to_altitude_km(rev_per_day: f64) -> f64 {
    let n = rev_per_day * 2.0 * PI / SECONDS_PER_DAY;
    let a = (MU_EARTH_KM3_S2 / (n * n)).cbrt();
    a - EARTH_RADIUS_KM
}

fn deg_to_rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

/// One way to derive a target feature: a source column plus an optional unit
/// conversion. `coerce_source` mirrors the original pipeline, which rewrote
/// some source columns as numeric in the augmented output and left others
/// untouched.
struct SourceRule {
    column: &'static str,
    convert: Option<fn(f64) -> f64>,
    coerce_source: bool,
}

/// Prioritized derivation rules for one target feature. A target column that
/// already exists always wins; otherwise the first present source is used;
/// otherwise the target is 0.0 for every row.
struct FeatureResolver {
    target: &'static str,
    sources: &'static [SourceRule],
}

const RESOLVERS: [FeatureResolver; 3] = [
    FeatureResolver {
        target: "Altitude_km",
        sources: &[
            SourceRule { column: "altitude", convert: None, coerce_source: false },
            SourceRule {
                column: "mean_motion",
                convert: Some(mean_motion_to_altitude_km),
                coerce_source: true,
            },
        ],
    },
    FeatureResolver {
        target: "Inclination_rad",
        sources: &[
            SourceRule { column: "Inclination", convert: Some(deg_to_rad), coerce_source: true },
            SourceRule { column: "inclination", convert: Some(deg_to_rad), coerce_source: true },
        ],
    },
    FeatureResolver {
        target: "Eccentricity",
        sources: &[
            SourceRule { column: "eccentricity", convert: None, coerce_source: false },
        ],
    },
];

/// Normalize one batch. Pure and total: recognized columns resolve through
/// the rule chain, unrecognized input is carried through untouched, and no
/// input shape is an error.
pub fn normalize(input: &Table) -> Normalized {
    let mut table = input.clone();

    for resolver in &RESOLVERS {
        resolve_feature(&mut table, resolver);
    }

    impute_numeric(&mut table);

    let features = project_features(&table);
    Normalized { table, features }
}

fn resolve_feature(table: &mut Table, resolver: &FeatureResolver) {
    if table.has_column(resolver.target) {
        // Present target columns are coerced so text cells become missing
        // (then imputed) instead of leaking into the feature matrix.
        coerce_numeric(table, resolver.target);
        return;
    }

    for rule in resolver.sources {
        let Some(source) = table.column(rule.column) else {
            continue;
        };

        let derived: Vec<Value> = source
            .iter()
            .map(|cell| match cell.as_f64() {
                Some(raw) => {
                    let value = rule.convert.map_or(raw, |f| f(raw));
                    if value.is_finite() {
                        Value::Number(value)
                    } else {
                        Value::Missing
                    }
                }
                None => Value::Missing,
            })
            .collect();

        if rule.coerce_source {
            coerce_numeric(table, rule.column);
        }
        table.insert_column(resolver.target, derived);
        return;
    }

    // No usable source column in this batch.
    table.insert_column(resolver.target, vec![Value::Number(0.0); table.len()]);
}

/// Rewrite a column so every cell is either `Number` or `Missing`.
fn coerce_numeric(table: &mut Table, name: &str) {
    let Some(column) = table.column(name) else {
        return;
    };
    let coerced: Vec<Value> = column
        .iter()
        .map(|cell| match cell.as_f64() {
            Some(n) => Value::Number(n),
            None => Value::Missing,
        })
        .collect();
    table.insert_column(name, coerced);
}

/// Fill missing cells of every numeric column with that column's batch mean.
///
/// A column is numeric when it holds no text cells — the analog of a numeric
/// dtype. Means are computed over the pre-fill state of the whole table; an
/// all-missing column falls back to 0.0 so no undefined value survives.
fn impute_numeric(table: &mut Table) {
    let numeric: Vec<String> = table
        .columns()
        .iter()
        .filter(|name| {
            table
                .column(name)
                .is_some_and(|col| !col.iter().any(Value::is_text))
        })
        .cloned()
        .collect();

    for name in numeric {
        let column = match table.column(&name) {
            Some(col) => col,
            None => continue,
        };
        if !column.iter().any(Value::is_missing) {
            continue;
        }

        let present: Vec<f64> = column.iter().filter_map(Value::as_number).collect();
        let mean = if present.is_empty() {
            0.0
        } else {
            present.iter().sum::<f64>() / present.len() as f64
        };

        let filled: Vec<Value> = column
            .iter()
            .map(|cell| match cell {
                Value::Missing => Value::Number(mean),
                other => other.clone(),
            })
            .collect();
        table.insert_column(&name, filled);
    }
}

/// Project the three feature columns, in fixed order, into a row-major
/// matrix. After imputation every cell is a finite number.
fn project_features(table: &Table) -> Vec<[f64; 3]> {
    let mut features = vec![[0.0f64; 3]; table.len()];
    for (slot, name) in FEATURE_COLUMNS.iter().enumerate() {
        if let Some(column) = table.column(name) {
            for (row, cell) in column.iter().enumerate() {
                features[row][slot] = cell.as_f64().unwrap_or(0.0);
            }
        }
    }
    features
}
