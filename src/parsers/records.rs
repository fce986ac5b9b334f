use anyhow::{Context, Result};
use memchr::memchr_iter;
use serde::Deserialize;

use crate::record::{ItineraryRecord, TripData};

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonDocument {
    Records(Vec<ItineraryRecord>),
    Trip(TripData),
}

/// Either a bare array of records or a `{metadata, itinerary}` object.
pub fn parse_json(input: &str) -> Result<TripData> {
    let doc: JsonDocument = serde_json::from_str(input).context("parsing itinerary JSON")?;
    Ok(match doc {
        JsonDocument::Records(itinerary) => TripData {
            itinerary,
            ..TripData::default()
        },
        JsonDocument::Trip(trip) => trip,
    })
}

/// One record per line. Blank lines are ignored; lines that do not parse
/// are skipped with a warning.
pub fn parse_jsonl(input: &str) -> Result<TripData> {
    let bytes = input.as_bytes();
    let mut itinerary = Vec::new();
    let mut start = 0usize;
    let mut line_no = 1usize;
    for nl in memchr_iter(b'\n', bytes) {
        push_line(&input[start..nl], line_no, &mut itinerary);
        start = nl + 1;
        line_no += 1;
    }
    if start < bytes.len() {
        push_line(&input[start..], line_no, &mut itinerary);
    }
    Ok(TripData {
        itinerary,
        ..TripData::default()
    })
}

fn push_line(line: &str, line_no: usize, out: &mut Vec<ItineraryRecord>) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    match serde_json::from_str::<ItineraryRecord>(line) {
        Ok(record) => out.push(record),
        Err(err) => tracing::warn!(line = line_no, %err, "skipping unreadable record"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Category;

    #[test]
    fn bare_array() {
        let data = parse_json(
            r#"[{"id": "a", "category": "hotel", "raw_date": "2026-01-02 15:00", "title": "Inn"}]"#,
        )
        .unwrap();
        assert_eq!(data.itinerary.len(), 1);
        assert_eq!(data.itinerary[0].category, Category::Hotel);
        assert_eq!(data.metadata.currency, "JPY");
    }

    #[test]
    fn full_trip_object() {
        let data = parse_json(
            r#"{"metadata": {"title": "Seoul", "city": "Seoul", "start_date": "2026-03-01",
                "end_date": "2026-03-04", "currency": "KRW", "timezone": "GMT+9"},
                "itinerary": [{"id": "x", "date": "2026-03-01"}]}"#,
        )
        .unwrap();
        assert_eq!(data.metadata.currency, "KRW");
        assert_eq!(data.itinerary[0].raw_date, "2026-03-01");
    }

    #[test]
    fn jsonl_skips_bad_lines() {
        let input = "{\"id\": \"a\", \"date\": \"2026-01-02\"}\n\nnot json\n{\"id\": \"b\"}";
        let data = parse_jsonl(input).unwrap();
        let ids: Vec<&str> = data.itinerary.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn invalid_json_is_error() {
        assert!(parse_json("{").is_err());
    }
}
