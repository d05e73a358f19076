//! Display-oriented JSON rendering of progress snapshots.
//!
//! [`ProgressSnapshot::to_json`] produces one flat JSON object with a fixed
//! set of fields in a fixed order. Every value is rendered as a *quoted*
//! decimal string: display layers commonly parse numbers into a 64-bit
//! float, which silently loses precision above 2^53, so large counters are
//! shipped as strings and converted by the consumer at its own risk.
//!
//! Field names and their order are an external contract: consumers parse
//! this record positionally or by name, and neither may change without a
//! compatibility note. The set differs from the wire format's:
//! `result_rows`/`result_bytes` are rendered but never cross the wire,
//! `elapsed_ns` crosses the wire but is not rendered, and
//! `total_bytes_to_read` appears in neither. `JSON_FIELDS` is the single
//! source of truth for this module.
//!
//! # Examples
//!
//! ```rust
//! use progresso::snapshot::ProgressSnapshot;
//!
//! let values = ProgressSnapshot { read_rows: 100, ..Default::default() };
//! let json = values.to_json();
//! assert!(json.starts_with(r#"{"read_rows":"100","#));
//! ```

use std::fmt;
use std::io::{self, Write};

use crate::snapshot::ProgressSnapshot;

/// The rendered fields, in output order.
const JSON_FIELDS: [(&str, fn(&ProgressSnapshot) -> u64); 15] = [
    ("read_rows", |v| v.read_rows),
    ("read_compressed_bytes", |v| v.read_compressed_bytes),
    ("os_read_bytes", |v| v.os_read_bytes),
    ("read_decompressed_blocks", |v| v.read_decompressed_blocks),
    ("read_decompressed_bytes", |v| v.read_decompressed_bytes),
    ("selected_bytes", |v| v.selected_bytes),
    ("selected_marks", |v| v.selected_marks),
    ("selected_rows", |v| v.selected_rows),
    ("selected_parts", |v| v.selected_parts),
    ("read_bytes", |v| v.read_bytes),
    ("written_rows", |v| v.written_rows),
    ("written_bytes", |v| v.written_bytes),
    ("total_rows_to_read", |v| v.total_rows_to_read),
    ("result_rows", |v| v.result_rows),
    ("result_bytes", |v| v.result_bytes),
];

/// Formats the snapshot as the JSON text record.
///
/// `Display` and [`to_json`](ProgressSnapshot::to_json) produce the same
/// output; the field names never need escaping and the values are plain
/// decimals, so no JSON machinery is involved.
impl fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, get)) in JSON_FIELDS.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "\"{name}\":\"{}\"", get(self))?;
        }
        f.write_str("}")
    }
}

impl ProgressSnapshot {
    /// Renders the snapshot as a JSON object with quoted decimal values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use progresso::snapshot::ProgressSnapshot;
    ///
    /// let json = ProgressSnapshot { read_rows: 7, ..Default::default() }.to_json();
    /// assert!(json.contains(r#""read_rows":"7""#));
    /// ```
    pub fn to_json(&self) -> String {
        self.to_string()
    }

    /// Writes the JSON text record to `writer`.
    pub fn write_json<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write!(writer, "{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::Progress;
    use crate::snapshot::WriteProgress;

    #[test]
    fn test_exact_output() {
        let values = ProgressSnapshot {
            read_rows: 1,
            read_bytes: 2,
            read_compressed_bytes: 3,
            os_read_bytes: 4,
            read_decompressed_blocks: 5,
            read_decompressed_bytes: 6,
            selected_bytes: 7,
            selected_marks: 8,
            selected_rows: 9,
            selected_parts: 10,
            total_rows_to_read: 11,
            written_rows: 12,
            written_bytes: 13,
            result_rows: 14,
            result_bytes: 15,
            ..Default::default()
        };
        assert_eq!(
            values.to_json(),
            concat!(
                "{\"read_rows\":\"1\",\"read_compressed_bytes\":\"3\",",
                "\"os_read_bytes\":\"4\",\"read_decompressed_blocks\":\"5\",",
                "\"read_decompressed_bytes\":\"6\",\"selected_bytes\":\"7\",",
                "\"selected_marks\":\"8\",\"selected_rows\":\"9\",",
                "\"selected_parts\":\"10\",\"read_bytes\":\"2\",",
                "\"written_rows\":\"12\",\"written_bytes\":\"13\",",
                "\"total_rows_to_read\":\"11\",\"result_rows\":\"14\",",
                "\"result_bytes\":\"15\"}"
            )
        );
    }

    #[test]
    fn test_output_is_valid_json() {
        let json = ProgressSnapshot {
            read_rows: 100,
            written_bytes: 200,
            ..Default::default()
        }
        .to_json();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["read_rows"], "100");
        assert_eq!(parsed["written_bytes"], "200");
        assert_eq!(parsed.as_object().unwrap().len(), JSON_FIELDS.len());
    }

    #[test]
    fn test_large_values_keep_precision() {
        let json = ProgressSnapshot {
            read_rows: u64::MAX,
            ..Default::default()
        }
        .to_json();

        // Quoted, so a float-based consumer sees the exact digits.
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parsed["read_rows"].as_str(),
            Some("18446744073709551615")
        );
    }

    #[test]
    fn test_unrendered_fields_stay_out() {
        let json = ProgressSnapshot {
            total_bytes_to_read: 1,
            elapsed_ns: 2,
            ..Default::default()
        }
        .to_json();
        assert!(!json.contains("total_bytes_to_read"));
        assert!(!json.contains("elapsed_ns"));
    }

    #[test]
    fn test_write_json_matches_to_json() {
        let values = ProgressSnapshot {
            selected_marks: 42,
            ..Default::default()
        };
        let mut buf = Vec::new();
        values.write_json(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), values.to_json());
    }

    #[test]
    fn test_progress_write_json() {
        let progress = Progress::new();
        progress.increment(WriteProgress::new(3, 96));

        let mut buf = Vec::new();
        progress.write_json(&mut buf).unwrap();
        let json = String::from_utf8(buf).unwrap();
        assert!(json.contains(r#""written_rows":"3""#));
        assert!(json.contains(r#""written_bytes":"96""#));
    }
}
