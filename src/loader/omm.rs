use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::models::{Table, Value};

/// Loader for CCSDS OMM (Orbit Mean-Elements Message) XML, as served by
/// CelesTrak with `FORMAT=xml`. One `<omm>` segment becomes one row.
///
/// Mean-element tags are mapped straight onto the source columns the
/// normalizer recognizes (`mean_motion`, `inclination`, `eccentricity`);
/// identification tags keep their OMM names.
pub struct OmmLoader;

/// XML tag → output column, also fixing the column order of the table.
const OMM_FIELDS: [(&str, &str); 10] = [
    ("OBJECT_NAME", "OBJECT_NAME"),
    ("OBJECT_ID", "OBJECT_ID"),
    ("NORAD_CAT_ID", "NORAD_CAT_ID"),
    ("EPOCH", "EPOCH"),
    ("MEAN_MOTION", "mean_motion"),
    ("ECCENTRICITY", "eccentricity"),
    ("INCLINATION", "inclination"),
    ("RA_OF_ASC_NODE", "RA_OF_ASC_NODE"),
    ("ARG_OF_PERICENTER", "ARG_OF_PERICENTER"),
    ("MEAN_ANOMALY", "MEAN_ANOMALY"),
];

impl OmmLoader {
    /// Create a new `OmmLoader`.
    pub fn new() -> Self {
        Self
    }
}

impl super::Loader for OmmLoader {
    fn load(&self, path: &Path) -> Result<Table> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        parse_omm(&content).with_context(|| format!("Failed to parse OMM XML {}", path.display()))
    }
}

/// Parse an OMM document using the quick-xml event API.
fn parse_omm(content: &str) -> Result<Table> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut current_tag = String::new();
    let mut row: HashMap<&'static str, Value> = HashMap::new();
    let mut rows: Vec<HashMap<&'static str, Value>> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                current_tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
            }
            Ok(Event::Text(t)) => {
                if let Some(column) = column_for_tag(&current_tag) {
                    let text = t.unescape().unwrap_or_default();
                    row.insert(column, Value::parse(&text));
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"omm" && !row.is_empty() {
                    rows.push(std::mem::take(&mut row));
                }
                current_tag.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    let mut table = Table::new();
    for (_, column) in OMM_FIELDS {
        let values: Vec<Value> = rows
            .iter()
            .map(|r| r.get(column).cloned().unwrap_or(Value::Missing))
            .collect();
        table.insert_column(column, values);
    }
    Ok(table)
}

fn column_for_tag(tag: &str) -> Option<&'static str> {
    OMM_FIELDS
        .iter()
        .find(|(xml_tag, _)| *xml_tag == tag)
        .map(|(_, column)| *column)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ndm>
  <omm id="CCSDS_OMM_VERS" version="2.0">
    <body><segment>
      <metadata>
        <OBJECT_NAME>ISS (ZARYA)</OBJECT_NAME>
        <OBJECT_ID>1998-067A</OBJECT_ID>
      </metadata>
      <data>
        <meanElements>
          <EPOCH>2026-08-24T12:00:00</EPOCH>
          <MEAN_MOTION>15.49309239</MEAN_MOTION>
          <ECCENTRICITY>.0004417</ECCENTRICITY>
          <INCLINATION>51.6416</INCLINATION>
          <RA_OF_ASC_NODE>247.4627</RA_OF_ASC_NODE>
          <ARG_OF_PERICENTER>130.5360</ARG_OF_PERICENTER>
          <MEAN_ANOMALY>325.0288</MEAN_ANOMALY>
        </meanElements>
        <tleParameters>
          <NORAD_CAT_ID>25544</NORAD_CAT_ID>
        </tleParameters>
      </data>
    </segment></body>
  </omm>
  <omm id="CCSDS_OMM_VERS" version="2.0">
    <body><segment>
      <data>
        <meanElements>
          <MEAN_MOTION>14.2</MEAN_MOTION>
          <INCLINATION>97.8</INCLINATION>
        </meanElements>
      </data>
    </segment></body>
  </omm>
</ndm>"#;

    #[test]
    fn test_parse_omm_rows_and_mapping() {
        let table = parse_omm(SAMPLE).unwrap();
        assert_eq!(table.len(), 2);

        assert_eq!(
            table.column("OBJECT_NAME").unwrap()[0],
            Value::Text("ISS (ZARYA)".to_string())
        );
        assert_eq!(
            table.column("mean_motion").unwrap()[0],
            Value::Number(15.49309239)
        );
        assert_eq!(
            table.column("eccentricity").unwrap()[0],
            Value::Number(0.0004417)
        );
        assert_eq!(
            table.column("inclination").unwrap()[0],
            Value::Number(51.6416)
        );
        assert_eq!(
            table.column("NORAD_CAT_ID").unwrap()[0],
            Value::Number(25544.0)
        );
    }

    #[test]
    fn test_parse_omm_missing_fields() {
        let table = parse_omm(SAMPLE).unwrap();
        assert_eq!(table.column("OBJECT_NAME").unwrap()[1], Value::Missing);
        assert_eq!(table.column("mean_motion").unwrap()[1], Value::Number(14.2));
    }

    #[test]
    fn test_parse_empty_document() {
        let table = parse_omm("<ndm></ndm>").unwrap();
        assert!(table.is_empty());
    }
}
