use serde::Serialize;

use crate::datetime::FloatingDateTime;
use crate::record::ItineraryRecord;

/// Records sharing one trip-local calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayBucket {
    pub date_key: String,
    pub items: Vec<ItineraryRecord>,
}

/// Stable sort by floating `(date_key, minutes_of_day)`.
///
/// Unparseable dates take the sentinel value and end up in front; they are
/// never dropped here.
pub fn sort_chronological(records: Vec<ItineraryRecord>) -> Vec<ItineraryRecord> {
    let mut keyed: Vec<(FloatingDateTime, ItineraryRecord)> =
        records.into_iter().map(|r| (r.when(), r)).collect();
    // `sort_by` is stable, so equal times keep source order.
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, r)| r).collect()
}

/// Split a chronologically sorted sequence into day buckets.
///
/// Opens a new bucket whenever the date key changes, so the input must
/// already be sorted; bucket order is then chronological by construction.
pub fn group_by_day<I>(sorted: I) -> Vec<DayBucket>
where
    I: IntoIterator<Item = ItineraryRecord>,
{
    let mut buckets: Vec<DayBucket> = Vec::new();
    for record in sorted {
        let key = record.when().date_key;
        match buckets.last_mut() {
            Some(last) if last.date_key == key => last.items.push(record),
            _ => buckets.push(DayBucket {
                date_key: key,
                items: vec![record],
            }),
        }
    }
    buckets
}

pub fn normalize(records: Vec<ItineraryRecord>) -> Vec<DayBucket> {
    let buckets = group_by_day(sort_chronological(records));
    tracing::debug!(buckets = buckets.len(), "normalized itinerary");
    buckets
}
