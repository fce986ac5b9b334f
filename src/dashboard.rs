//! Per-render projection of a trip into dashboard rows.
//!
//! One call reads one `now`; every "today" and "past" flag in the result is
//! computed against that single value.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::classify::{Classification, ExpansionState, classify, is_past};
use crate::datetime::SENTINEL_DATE_KEY;
use crate::normalizer::{DayBucket, sort_chronological};
use crate::record::{Category, ItineraryRecord, TripData, TripMetadata};
use crate::trip::format_trip_range;
use crate::view::{View, project};

pub const EMPTY_HOME: &str = "The itinerary is empty. Add journey rows to the trip database.";
pub const EMPTY_FILTERED: &str = "No plans in this category yet.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    pub title: String,
    pub subtitle: String,
    pub timezone: String,
    pub currency: String,
}

impl Header {
    fn from_metadata(m: &TripMetadata) -> Self {
        let title = if m.city.is_empty() {
            m.title.clone()
        } else {
            format!("{} - {}", m.title, m.city)
        };
        Self {
            title,
            subtitle: format_trip_range(&m.start_date, &m.end_date),
            timezone: m.timezone.clone(),
            currency: m.currency.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardItem {
    pub id: String,
    pub category: Category,
    pub date_key: String,
    pub time: String,
    pub title: String,
    pub maps_link: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub is_past: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardDay {
    /// 1-based position among the days shown in this tab.
    pub day_number: usize,
    pub date_key: String,
    pub is_today: bool,
    pub expanded: bool,
    pub items: Vec<DashboardItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// `None` for the info tab, which carries the header only.
    pub view: Option<View>,
    pub header: Header,
    pub classification: Classification,
    pub days: Vec<DashboardDay>,
    pub empty_message: Option<&'static str>,
}

impl Dashboard {
    pub fn item_count(&self) -> usize {
        self.days.iter().map(|d| d.items.len()).sum()
    }
}

fn item(record: &ItineraryRecord, now: NaiveDateTime) -> DashboardItem {
    let when = record.when();
    DashboardItem {
        id: record.id.clone(),
        category: record.category,
        date_key: when.date_key.clone(),
        time: when.time_label(),
        title: record.title.clone(),
        maps_link: record.maps_link.clone(),
        image_url: record.image_url.clone(),
        description: record.description.clone(),
        is_past: is_past(&when, now),
    }
}

/// Build the rows for `view` (see [`crate::view::Tab::view`]).
///
/// Undated records carry the sentinel date; they are dropped unless
/// `include_undated` is set. For the unfiltered view `expansion` is
/// initialized from the classification (once) and then consulted; filtered
/// views show every day open.
pub fn render(
    trip: &TripData,
    view: Option<View>,
    now: NaiveDateTime,
    expansion: &mut ExpansionState,
    include_undated: bool,
) -> Dashboard {
    let header = Header::from_metadata(&trip.metadata);

    let Some(view) = view else {
        return Dashboard {
            view: None,
            header,
            classification: Classification::default(),
            days: Vec::new(),
            empty_message: None,
        };
    };

    let mut sorted = sort_chronological(trip.itinerary.clone());
    if !include_undated {
        let before = sorted.len();
        sorted.retain(|r| !r.when().is_sentinel());
        if sorted.len() < before {
            tracing::debug!(dropped = before - sorted.len(), "hid undated records");
        }
    }

    let buckets: Vec<DayBucket> = project(&sorted, view);
    // The undated bucket is never today and never the default open day.
    let keys: Vec<String> = buckets
        .iter()
        .filter(|b| b.date_key != SENTINEL_DATE_KEY)
        .map(|b| b.date_key.clone())
        .collect();
    let classification = classify(&keys, now);
    let home = view == View::All;
    if home {
        expansion.initialize(&classification);
    }

    let days: Vec<DashboardDay> = buckets
        .iter()
        .enumerate()
        .map(|(i, bucket)| DashboardDay {
            day_number: i + 1,
            date_key: bucket.date_key.clone(),
            is_today: classification.today_key.as_deref() == Some(bucket.date_key.as_str()),
            expanded: !home || expansion.is_expanded(&bucket.date_key),
            items: bucket.items.iter().map(|r| item(r, now)).collect(),
        })
        .collect();

    let empty_message = days.is_empty().then_some(if home {
        EMPTY_HOME
    } else {
        EMPTY_FILTERED
    });

    Dashboard {
        view: Some(view),
        header,
        classification,
        days,
        empty_message,
    }
}
