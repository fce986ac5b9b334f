use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use crate::record::{
    Category, DEFAULT_CURRENCY, DEFAULT_TIMEZONE, DEFAULT_TRIP_TITLE, ItineraryRecord, TripData,
    TripMetadata,
};

// `type` select values used by the trip database
static ROW_JOURNEY: &str = "journey";
static ROW_COUNTRY: &str = "country";
static ROW_CITY: &str = "city";
static ROW_EXCHANGE: &str = "exchange";
static ROW_GMT: &str = "gmt";
static ROW_PASSWORD: &str = "password";

const UNTITLED: &str = "Untitled";

/// Parse a Notion database query response (`{"results": [...]}`).
///
/// Journey rows become itinerary records in source order; the `country`,
/// `city`, `exchange`, `gmt` and `password` rows fill trip metadata.
pub fn parse_notion(input: &str) -> Result<TripData> {
    let doc: Value = serde_json::from_str(input).context("parsing Notion query response")?;
    let results = doc
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("Notion response has no results array"))?;

    let find_row = |kind: &str| results.iter().find(|r| row_type(r) == Some(kind));
    let country = find_row(ROW_COUNTRY);
    let title_of = |kind: &str| find_row(kind).and_then(title_text);

    let metadata = TripMetadata {
        title: country
            .and_then(title_text)
            .unwrap_or_else(|| DEFAULT_TRIP_TITLE.to_string()),
        city: title_of(ROW_CITY).unwrap_or_default(),
        start_date: country.and_then(|r| date_field(r, "start")).unwrap_or_default(),
        end_date: country.and_then(|r| date_field(r, "end")).unwrap_or_default(),
        currency: title_of(ROW_EXCHANGE).unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        timezone: title_of(ROW_GMT).unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
    };

    let itinerary: Vec<ItineraryRecord> = results
        .iter()
        .filter(|r| row_type(r) == Some(ROW_JOURNEY))
        .map(journey_record)
        .collect();

    tracing::debug!(
        rows = results.len(),
        journeys = itinerary.len(),
        "parsed Notion response"
    );

    Ok(TripData {
        metadata,
        itinerary,
        password: title_of(ROW_PASSWORD),
    })
}

fn journey_record(page: &Value) -> ItineraryRecord {
    let props = &page["properties"];
    ItineraryRecord {
        id: page["id"].as_str().unwrap_or_default().to_string(),
        category: props["category"]["select"]["name"]
            .as_str()
            .map(Category::from_tag)
            .unwrap_or_default(),
        raw_date: date_field(page, "start")
            .map(|s| floating_from_notion(&s))
            .unwrap_or_default(),
        title: title_text(page).unwrap_or_else(|| UNTITLED.to_string()),
        maps_link: props["maps"]["url"].as_str().unwrap_or_default().to_string(),
        image_url: cover_url(page),
        description: rich_text(&props["description"]),
    }
}

fn row_type(page: &Value) -> Option<&str> {
    page["properties"]["type"]["select"]["name"].as_str()
}

fn title_text(page: &Value) -> Option<String> {
    page["properties"]["title"]["title"][0]["plain_text"]
        .as_str()
        .map(str::to_string)
}

fn date_field(page: &Value, which: &str) -> Option<String> {
    page["properties"]["date"]["date"][which]
        .as_str()
        .map(str::to_string)
}

fn cover_url(page: &Value) -> Option<String> {
    let cover = &page["cover"];
    match cover["type"].as_str()? {
        kind @ ("external" | "file") => cover[kind]["url"].as_str().map(str::to_string),
        _ => None,
    }
}

fn rich_text(prop: &Value) -> Option<String> {
    let text: String = prop["rich_text"]
        .as_array()?
        .iter()
        .filter_map(|t| t["plain_text"].as_str())
        .collect();
    (!text.is_empty()).then_some(text)
}

/// Reduce a Notion date (`2026-01-02T09:30:00.000+09:00`) to its floating
/// wall-clock form (`2026-01-02 09:30`). The offset is discarded, not
/// applied. Shapes it does not recognize are passed through untouched.
pub fn floating_from_notion(start: &str) -> String {
    let bytes = start.as_bytes();
    match (start.get(..10), bytes.get(10), start.get(11..16)) {
        (Some(date), Some(b'T'), Some(hm)) => format!("{} {}", date, hm),
        (Some(date), None, _) => date.to_string(),
        _ => start.to_string(),
    }
}
