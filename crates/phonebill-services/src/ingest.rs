//! Call file ingestion
//!
//! Reads the calls CSV. The first line is a header; every other line has the
//! fields `source,destination,duration_secs,timestamp`, e.g.
//!
//! ```text
//! numero origen,numero destino,duracion,fecha
//! +5491167950940,+191167980952,462,2020-11-10T04:02:45Z
//! ```
//!
//! Fields may be double-quoted as in RFC 4180. Records span a single line.

use phonebill_core::config::InvalidRecordPolicy;
use phonebill_core::models::{parse_timestamp, Call};
use phonebill_core::{InvoiceError, InvoiceResult};
use tracing::{debug, warn};

const FIELDS_PER_RECORD: usize = 4;

/// Parse the calls CSV content
///
/// Errors name the 1-based line of the offending record.
pub fn parse_calls(content: &str, policy: InvalidRecordPolicy) -> InvoiceResult<Vec<Call>> {
    let mut calls = Vec::new();

    // Skip the header
    for (index, line) in content.lines().enumerate().skip(1) {
        let line_number = index + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_record(line) {
            Ok(call) => calls.push(call),
            Err(RecordError::Phone(reason)) if policy == InvalidRecordPolicy::Skip => {
                warn!("Skipping record on line {}: {}", line_number, reason);
            }
            Err(RecordError::Phone(reason)) | Err(RecordError::Format(reason)) => {
                return Err(InvoiceError::InvalidRecord {
                    line: line_number,
                    reason,
                });
            }
        }
    }

    debug!("Read {} calls", calls.len());
    Ok(calls)
}

enum RecordError {
    /// Malformed phone number, subject to the record policy
    Phone(String),
    Format(String),
}

fn parse_record(line: &str) -> Result<Call, RecordError> {
    let fields = split_fields(line)?;
    if fields.len() != FIELDS_PER_RECORD {
        return Err(RecordError::Format(format!(
            "wrong number of fields, expected {} got {}",
            FIELDS_PER_RECORD,
            fields.len()
        )));
    }

    let (source, destination) = (fields[0].as_str(), fields[1].as_str());

    let duration_secs: u32 = fields[2]
        .parse()
        .map_err(|e| RecordError::Format(format!("parsing duration: {}", e)))?;

    let timestamp = parse_timestamp(&fields[3])
        .map_err(|e| RecordError::Format(format!("parsing date: {}", e)))?;

    Call::new(destination, source, duration_secs, timestamp)
        .map_err(|e| RecordError::Phone(e.to_string()))
}

/// Split a record into trimmed fields. Fields may be wrapped in double
/// quotes, with `""` standing for a literal quote inside them.
fn split_fields(line: &str) -> Result<Vec<String>, RecordError> {
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        let mut field = String::new();

        while chars.next_if(|c| *c == ' ' || *c == '\t').is_some() {}

        if chars.next_if_eq(&'"').is_some() {
            loop {
                match chars.next() {
                    Some('"') if chars.next_if_eq(&'"').is_some() => field.push('"'),
                    Some('"') => break,
                    Some(c) => field.push(c),
                    None => {
                        return Err(RecordError::Format(
                            "unterminated quoted field".to_string(),
                        ))
                    }
                }
            }

            while chars.next_if(|c| *c == ' ' || *c == '\t').is_some() {}
            match chars.next() {
                None => {
                    fields.push(field);
                    return Ok(fields);
                }
                Some(',') => fields.push(field),
                Some(c) => {
                    return Err(RecordError::Format(format!(
                        "unexpected {:?} after quoted field",
                        c
                    )))
                }
            }
        } else {
            loop {
                match chars.next() {
                    Some(',') => break,
                    Some('"') => {
                        return Err(RecordError::Format(
                            "bare quote in unquoted field".to_string(),
                        ))
                    }
                    Some(c) => field.push(c),
                    None => {
                        fields.push(field.trim().to_string());
                        return Ok(fields);
                    }
                }
            }
            fields.push(field.trim().to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "numero origen,numero destino,duracion,fecha";

    fn csv(rows: &[&str]) -> String {
        std::iter::once(HEADER)
            .chain(rows.iter().copied())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_parses_records() {
        let content = csv(&[
            "+5491167950940,+191167980952,462,2020-11-10T04:02:45Z",
            "+5491167950940,+541167980953,60,2020-05-10T04:45:25Z",
        ]);

        let calls = parse_calls(&content, InvalidRecordPolicy::Reject).unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].source().as_str(), "+5491167950940");
        assert_eq!(calls[0].destination().as_str(), "+191167980952");
        assert_eq!(calls[0].duration_secs(), 462);
        assert_eq!(calls[1].formatted_timestamp(), "2020-05-10T04:45:25Z");
    }

    #[test]
    fn test_header_only_and_blank_lines() {
        assert!(parse_calls(HEADER, InvalidRecordPolicy::Reject).unwrap().is_empty());

        let content = format!("{}\n\n+5491167950940,+191167980952,1,2020-11-10T04:02:45Z\r\n", HEADER);
        assert_eq!(parse_calls(&content, InvalidRecordPolicy::Reject).unwrap().len(), 1);
    }

    #[test]
    fn test_wrong_number_of_fields() {
        let content = csv(&[
            "+5491167980950,+191167980952,462,2020-11-10T04:02:45Z",
            "+5491167980950,+191167980952,2020-11-10T04:02:45Z",
        ]);

        let err = parse_calls(&content, InvalidRecordPolicy::Skip).unwrap_err();
        assert!(matches!(err, InvoiceError::InvalidRecord { line: 3, .. }));
    }

    #[test]
    fn test_quoted_fields() {
        let content = csv(&[
            r#""+5491167950940","+191167980952","462","2020-11-10T04:02:45Z""#,
            r#"+5491167950940, "+541167980953" ,60,2020-05-10T04:45:25Z"#,
        ]);

        let calls = parse_calls(&content, InvalidRecordPolicy::Reject).unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].source().as_str(), "+5491167950940");
        assert_eq!(calls[0].destination().as_str(), "+191167980952");
        assert_eq!(calls[0].duration_secs(), 462);
        assert_eq!(calls[1].destination().as_str(), "+541167980953");
    }

    #[test]
    fn test_quoted_comma_is_one_field() {
        let content = csv(&[r#""+5491167950940,+1","+191167980952","462","2020-11-10T04:02:45Z""#]);

        let err = parse_calls(&content, InvalidRecordPolicy::Reject).unwrap_err();
        assert!(err.to_string().starts_with("record on line 2: source phone"));
    }

    #[test]
    fn test_malformed_quotes() {
        let unterminated = csv(&[r#""+5491167950940,+191167980952,462,2020-11-10T04:02:45Z"#]);
        let err = parse_calls(&unterminated, InvalidRecordPolicy::Skip).unwrap_err();
        assert!(err.to_string().contains("unterminated quoted field"));

        let bare = csv(&[r#"+5491167950940,+1911"67980952,462,2020-11-10T04:02:45Z"#]);
        let err = parse_calls(&bare, InvalidRecordPolicy::Reject).unwrap_err();
        assert!(err.to_string().contains("bare quote"));
    }

    #[test]
    fn test_invalid_duration() {
        let content = csv(&["+5491167980950,+191167980952,esto-no-es-duracion,2020-11-10T04:02:45Z"]);

        let err = parse_calls(&content, InvalidRecordPolicy::Reject).unwrap_err();
        assert!(err.to_string().starts_with("record on line 2: parsing duration"));
    }

    #[test]
    fn test_invalid_date() {
        let content = csv(&["+5491167980950,+191167980952,400,2020-11-10T:02:45Z"]);

        let err = parse_calls(&content, InvalidRecordPolicy::Reject).unwrap_err();
        assert!(err.to_string().starts_with("record on line 2: parsing date"));
    }

    #[test]
    fn test_invalid_destination_rejected() {
        let content = csv(&[
            "+5491167980950,+191167980952,462,2020-11-10T04:02:45Z",
            "+5491167980950,+191167980,400,2020-11-10T04:02:45Z",
        ]);

        let err = parse_calls(&content, InvalidRecordPolicy::Reject).unwrap_err();
        assert!(err.to_string().starts_with("record on line 3: destination phone"));
    }

    #[test]
    fn test_invalid_source_rejected() {
        let content = csv(&["+5491167980,+5491167980950,400,2020-11-10T04:02:45Z"]);

        let err = parse_calls(&content, InvalidRecordPolicy::Reject).unwrap_err();
        assert!(err.to_string().starts_with("record on line 2: source phone"));
    }

    #[test]
    fn test_invalid_phone_skipped_with_skip_policy() {
        let content = csv(&[
            "+5491167980950,+191167980952,462,2020-11-10T04:02:45Z",
            "+5491167980950,+191167980,400,2020-11-10T04:02:45Z",
            "+5491167910920,+191167980952,392,2020-08-09T04:45:25Z",
        ]);

        let calls = parse_calls(&content, InvalidRecordPolicy::Skip).unwrap();
        let durations: Vec<u32> = calls.iter().map(|c| c.duration_secs()).collect();
        assert_eq!(durations, vec![462, 392]);
    }
}
