//! Observatory "monthly element" archive parsing.
//!
//! The archive is a text file embedding a list of elements; the rainfall
//! element carries `"code":"RF"` followed by a `"monthData"` array of rows
//! `[year, jan, ..., dec, (annual)]`. Only that array is decoded, so the rest
//! of the file may be any shape.

use serde_json::Value;

use super::{RainfallStore, MONTHS};

/// Archive parse failure
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to read rainfall archive: {0}")]
    Io(#[from] std::io::Error),

    #[error("rainfall element (code RF) not found")]
    MissingRainfall,

    #[error("monthData array not found after the rainfall element")]
    MissingMonthData,

    #[error("monthData array is not terminated")]
    Unterminated,

    #[error("malformed monthData: {0}")]
    Json(#[from] serde_json::Error),
}

/// Marker for trace rainfall (measurable but < 0.05 mm)
const TRACE: &str = "Trace";

/// Parse the archive text into a store
pub fn parse_archive(text: &str) -> Result<RainfallStore, DataError> {
    let element = find_key_value(text, "code", "RF").ok_or(DataError::MissingRainfall)?;
    let array = month_data_array(&text[element..])?;
    let rows: Vec<Vec<Value>> = serde_json::from_str(array)?;

    let store = RainfallStore::from_rows(rows.iter().filter_map(|row| parse_row(row)));
    Ok(store)
}

/// Decode one monthly cell.
///
/// - `"Trace"` -> 0.0
/// - numbers or numeric strings -> value, negatives clamped to 0
/// - blanks, `"***"` and anything else -> missing (`None`); rows store
///   missing months as 0.0 in place
pub fn parse_cell(value: &Value) -> Option<f32> {
    let mm = match value {
        Value::Number(n) => n.as_f64()? as f32,
        Value::String(s) => {
            let s = s.trim();
            if s == TRACE {
                return Some(0.0);
            }
            s.parse::<f32>().ok()?
        }
        _ => return None,
    };
    mm.is_finite().then(|| mm.max(0.0))
}

fn parse_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Month cells keep their slot: a missing month reads as 0.0 so index 0 is
/// always January. A row with no readable month at all is dropped.
fn parse_row(row: &[Value]) -> Option<(i32, Vec<f32>)> {
    let (year, cells) = row.split_first()?;
    let year = parse_year(year)?;
    let cells: Vec<Option<f32>> = cells.iter().take(MONTHS).map(parse_cell).collect();
    if cells.iter().all(Option::is_none) {
        return None;
    }
    Some((year, cells.into_iter().map(|v| v.unwrap_or(0.0)).collect()))
}

/// Byte offset just past `"key" : "value"`, tolerating whitespace.
fn find_key_value(text: &str, key: &str, value: &str) -> Option<usize> {
    let quoted_key = format!("\"{key}\"");
    let quoted_value = format!("\"{value}\"");
    let mut from = 0;
    while let Some(found) = text[from..].find(&quoted_key) {
        let after_key = from + found + quoted_key.len();
        let rest = text[after_key..].trim_start();
        if let Some(rest) = rest.strip_prefix(':') {
            let rest = rest.trim_start();
            if rest.starts_with(&quoted_value) {
                let consumed = text.len() - rest.len();
                return Some(consumed + quoted_value.len());
            }
        }
        from = after_key;
    }
    None
}

/// Slice of the `monthData` array (brackets included) that follows `text`'s start
fn month_data_array(text: &str) -> Result<&str, DataError> {
    const KEY: &str = "\"monthData\"";
    let key_at = text.find(KEY).ok_or(DataError::MissingMonthData)?;
    let after_key = &text[key_at + KEY.len()..];
    let rest = after_key
        .trim_start()
        .strip_prefix(':')
        .ok_or(DataError::MissingMonthData)?
        .trim_start();
    if !rest.starts_with('[') {
        return Err(DataError::MissingMonthData);
    }

    // Bracket matching, ignoring brackets inside string literals
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in rest.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&rest[..=i]);
                }
            }
            _ => {}
        }
    }
    Err(DataError::Unterminated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    const ARCHIVE: &str = r#"{"type":"monthly","data":[
        {"code":"MAX","monthData":[["1884","25.1"]]},
        {"code": "RF", "name":"Rainfall [mm]", "monthData": [
            ["1884","10.0","20.5","Trace","***","","5","6","7","8","9","10","11","1234.5"],
            ["1941","***","***","***","***","***","***","***","***","***","***","***","***"],
            [2023, 1.5, 2.5, 3.5, 4.5, 5.5, 6.5, 7.5, 8.5, 9.5, 10.5, 11.5, 12.5]
        ]}
    ]}"#;

    #[test]
    fn test_parse_cell_rules() {
        assert_eq!(parse_cell(&json!("Trace")), Some(0.0));
        assert_eq!(parse_cell(&json!(" 12.5 ")), Some(12.5));
        assert_eq!(parse_cell(&json!(7)), Some(7.0));
        assert_eq!(parse_cell(&json!("-3")), Some(0.0));
        assert_eq!(parse_cell(&json!("***")), None);
        assert_eq!(parse_cell(&json!("")), None);
        assert_eq!(parse_cell(&json!(null)), None);
    }

    #[test]
    fn test_parse_archive_picks_rainfall_element() {
        let store = parse_archive(ARCHIVE).unwrap();

        // 1884: missing April/May read as 0.0 in place, annual column ignored
        let y1884 = store.monthly(1884);
        assert_eq!(y1884.len(), MONTHS);
        assert_eq!(&y1884[..6], &[10.0, 20.5, 0.0, 0.0, 0.0, 5.0]);
        assert_eq!(y1884[11], 11.0);
        assert_eq!(store.extent(1884).unwrap().max, 20.5);

        // 1941: nothing usable -> no entry
        assert!(store.monthly(1941).is_empty());

        // 2023: numeric cells
        assert_eq!(store.monthly(2023).len(), MONTHS);
        assert_eq!(store.extent(2023).unwrap().min, 1.5);
    }

    #[test]
    fn test_missing_month_keeps_later_months_in_place() {
        let text = r#"{"code":"RF","monthData":[
            ["1947","1","2","***","400","5","6","7","8","9","10","11","12"]
        ]}"#;
        let store = parse_archive(text).unwrap();
        let values = store.monthly(1947);
        assert_eq!(values.len(), MONTHS);
        assert_eq!(values[2], 0.0);
        assert_eq!(values[3], 400.0);
        assert_eq!(values[11], 12.0);
    }

    #[test]
    fn test_brackets_inside_strings_are_ignored() {
        let text = r#"{"code":"RF","monthData":[["2000","1","2"]],"note":"]"}"#;
        let store = parse_archive(text).unwrap();
        assert_eq!(store.monthly(2000), &[1.0, 2.0]);
    }

    #[test]
    fn test_missing_rainfall_element() {
        let err = parse_archive(r#"{"code":"MAX","monthData":[]}"#).unwrap_err();
        assert!(matches!(err, DataError::MissingRainfall));
    }

    #[test]
    fn test_unterminated_month_data() {
        let err = parse_archive(r#"{"code":"RF","monthData":[["2000","1""#).unwrap_err();
        assert!(matches!(err, DataError::Unterminated));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ARCHIVE.as_bytes()).unwrap();

        let store = RainfallStore::load(file.path()).unwrap();
        assert_eq!(store.years().collect::<Vec<_>>(), vec![1884, 2023]);
    }
}
