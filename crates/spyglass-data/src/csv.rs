//! CSV table loading and serialization.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use spyglass_core::{Bar, Direction, Table};

use crate::error::DataError;
use crate::levels::{format_level_list, parse_level_list};
use crate::source::TableSource;

/// Loads the bar table from a CSV file.
pub struct CsvLoader {
    path: std::path::PathBuf,
}

impl CsvLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl TableSource for CsvLoader {
    fn load(&self) -> anyhow::Result<Table> {
        Ok(load_table_from_path(&self.path)?)
    }
}

/// Parse a timestamp cell to unix seconds.
///
/// Accepts a raw unix value (seconds, or milliseconds when 13+ digits),
/// `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`, or a bare `YYYY-MM-DD`
/// date (midnight UTC).
pub fn parse_timestamp(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(raw) = s.parse::<f64>() {
        if !raw.is_finite() {
            return None;
        }
        // Detect milliseconds (13+ digits) vs seconds
        return Some(if raw > 1e12 { raw / 1000.0 } else { raw });
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp() as f64);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let dt = date.and_hms_opt(0, 0, 0)?;
        return Some(dt.and_utc().timestamp() as f64);
    }

    None
}

/// Render unix seconds back to the canonical cell format.
pub fn format_timestamp(timestamp: f64) -> String {
    DateTime::from_timestamp(timestamp as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// Load the table from a CSV file path.
pub fn load_table_from_path<P: AsRef<Path>>(path: P) -> Result<Table, DataError> {
    let reader = csv::ReaderBuilder::new().delimiter(b',').from_path(path)?;
    load_table(reader)
}

/// Load the table from any reader carrying CSV text.
pub fn load_table_from_reader<R: Read>(rdr: R) -> Result<Table, DataError> {
    load_table(csv::ReaderBuilder::new().delimiter(b',').from_reader(rdr))
}

/// Load and sort the table.
///
/// Expected columns: `timestamp, open, high, low, close, volume,
/// direction, Support, Resistance`. Header lookup is case-insensitive
/// and positional-independent. The annotation columns are optional and
/// degrade (neutral direction, empty level lists); the price columns are
/// not.
fn load_table<R: Read>(mut reader: csv::Reader<R>) -> Result<Table, DataError> {
    let headers = reader.headers()?.clone();
    let headers_lower: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

    let find = |name: &'static str| headers_lower.iter().position(|h| h.as_str() == name);

    let ts_col = headers_lower
        .iter()
        .position(|h| h.contains("timestamp") || h.as_str() == "time" || h.as_str() == "date")
        .ok_or(DataError::MissingColumn("timestamp"))?;
    let open_col = find("open").ok_or(DataError::MissingColumn("open"))?;
    let high_col = find("high").ok_or(DataError::MissingColumn("high"))?;
    let low_col = find("low").ok_or(DataError::MissingColumn("low"))?;
    let close_col = find("close").ok_or(DataError::MissingColumn("close"))?;
    let volume_col = find("volume").ok_or(DataError::MissingColumn("volume"))?;
    let direction_col = find("direction");
    let support_col = find("support");
    let resistance_col = find("resistance");

    let mut bars = Vec::new();
    let mut suspect = 0usize;

    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        // 1-based data row, counting the header line
        let row = idx + 2;

        let raw_ts = record.get(ts_col).unwrap_or("");
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| DataError::Timestamp {
            row,
            value: raw_ts.to_string(),
        })?;

        let price = |col: usize, column: &'static str| -> Result<f32, DataError> {
            let value = record.get(col).unwrap_or("").trim();
            value.parse::<f32>().map_err(|_| DataError::Number {
                row,
                column,
                value: value.to_string(),
            })
        };

        let open = price(open_col, "open")?;
        let high = price(high_col, "high")?;
        let low = price(low_col, "low")?;
        let close = price(close_col, "close")?;

        let raw_volume = record.get(volume_col).unwrap_or("").trim();
        let volume = raw_volume
            .parse::<u64>()
            .or_else(|_| raw_volume.parse::<f64>().map(|v| v.max(0.0) as u64))
            .map_err(|_| DataError::Number {
                row,
                column: "volume",
                value: raw_volume.to_string(),
            })?;

        let direction = direction_col
            .and_then(|c| record.get(c))
            .map(Direction::from_label)
            .unwrap_or(Direction::Neutral);
        let support = support_col
            .and_then(|c| record.get(c))
            .map(parse_level_list)
            .unwrap_or_default();
        let resistance = resistance_col
            .and_then(|c| record.get(c))
            .map(parse_level_list)
            .unwrap_or_default();

        let bar = Bar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            direction,
            support,
            resistance,
        };
        if !bar.is_sane() {
            suspect += 1;
        }
        bars.push(bar);
    }

    if suspect > 0 {
        log::warn!(
            "{} of {} rows have inconsistent OHLC values",
            suspect,
            bars.len()
        );
    }

    Ok(Table::from_bars(bars))
}

/// Serialize the full table to CSV text.
///
/// The output matches the input column layout so the assistant can embed
/// the dataset verbatim in its prompt.
pub fn table_to_csv(table: &Table) -> Result<String, DataError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "timestamp",
        "open",
        "high",
        "low",
        "close",
        "volume",
        "direction",
        "Support",
        "Resistance",
    ])?;

    for bar in table.bars() {
        writer.write_record([
            format_timestamp(bar.timestamp),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
            bar.direction.label().to_string(),
            format_level_list(&bar.support),
            format_level_list(&bar.resistance),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DataError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
timestamp,open,high,low,close,volume,direction,Support,Resistance
2023-01-04,101,106,100,103,1200,LONG,\"[99.5, 100.5]\",[]
2023-01-03,100,105,99,102,1000,SHORT,[],\"[104, 106]\"
2023-01-05,103,107,101,104,900,,garbage,[105]
";

    #[test]
    fn test_load_sorts_and_parses() {
        let table = load_table_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);

        // Sorted ascending despite input order
        let first = &table.bars()[0];
        assert_eq!(first.close, 102.0);
        assert_eq!(first.direction, Direction::Short);
        assert!(first.support.is_empty());
        assert_eq!(first.resistance, vec![104.0, 106.0]);

        let second = &table.bars()[1];
        assert_eq!(second.direction, Direction::Long);
        assert_eq!(second.support, vec![99.5, 100.5]);
    }

    #[test]
    fn test_malformed_level_cell_degrades() {
        let table = load_table_from_reader(SAMPLE.as_bytes()).unwrap();
        let third = &table.bars()[2];
        assert_eq!(third.direction, Direction::Neutral);
        assert!(third.support.is_empty());
        assert_eq!(third.resistance, vec![105.0]);
    }

    #[test]
    fn test_bad_timestamp_is_fatal() {
        let data = "timestamp,open,high,low,close,volume\nnot-a-date,1,2,0.5,1.5,10\n";
        let err = load_table_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::Timestamp { row: 2, .. }));
    }

    #[test]
    fn test_missing_price_column_is_fatal() {
        let data = "timestamp,open,high,low,volume\n2023-01-03,1,2,0.5,10\n";
        let err = load_table_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn("close")));
    }

    #[test]
    fn test_missing_annotation_columns_degrade() {
        let data = "timestamp,open,high,low,close,volume\n2023-01-03,1,2,0.5,1.5,10\n";
        let table = load_table_from_reader(data.as_bytes()).unwrap();
        let bar = &table.bars()[0];
        assert_eq!(bar.direction, Direction::Neutral);
        assert!(bar.support.is_empty());
        assert!(bar.resistance.is_empty());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(parse_timestamp("2023-01-03 00:00:00"), parse_timestamp("2023-01-03"));
        assert_eq!(parse_timestamp("2023-01-03T04:00:00"), Some(1672718400.0));
        assert_eq!(parse_timestamp("1672718400"), Some(1672718400.0));
        // Milliseconds collapse to seconds
        assert_eq!(parse_timestamp("1672718400000"), Some(1672718400.0));
        assert_eq!(parse_timestamp("bogus"), None);
    }

    #[test]
    fn test_round_trip_preserves_rows() {
        let table = load_table_from_reader(SAMPLE.as_bytes()).unwrap();
        let dumped = table_to_csv(&table).unwrap();
        let reloaded = load_table_from_reader(dumped.as_bytes()).unwrap();

        assert_eq!(reloaded.len(), table.len());
        for (a, b) in table.bars().iter().zip(reloaded.bars()) {
            assert_eq!(a, b);
        }
    }
}
