use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::datetime::{FloatingDateTime, parse_or_sentinel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Transport,
    Hotel,
    Visit,
    Restaurant,
    Shopping,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Transport,
        Category::Hotel,
        Category::Visit,
        Category::Restaurant,
        Category::Shopping,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Transport => "transport",
            Category::Hotel => "hotel",
            Category::Visit => "visit",
            Category::Restaurant => "restaurant",
            Category::Shopping => "shopping",
            Category::Other => "other",
        }
    }

    /// Map a source tag onto the fixed set. Unknown tags become `Other`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "transport" => Category::Transport,
            "hotel" => Category::Hotel,
            "visit" => Category::Visit,
            "restaurant" => Category::Restaurant,
            "shopping" => Category::Shopping,
            "other" | "" => Category::Other,
            unknown => {
                tracing::warn!(tag = unknown, "unknown category, using other");
                Category::Other
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Category::from_tag(s))
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = Option::<String>::deserialize(deserializer)?;
        Ok(tag.as_deref().map(Category::from_tag).unwrap_or_default())
    }
}

/// One itinerary entry as delivered by the content source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryRecord {
    pub id: String,
    #[serde(default)]
    pub category: Category,
    /// Floating `YYYY-MM-DD` or `YYYY-MM-DD HH:mm`; may be empty or malformed.
    #[serde(default, alias = "date")]
    pub raw_date: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "maps")]
    pub maps_link: String,
    #[serde(default, alias = "img")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ItineraryRecord {
    /// Parsed date, or the sentinel when `raw_date` is unusable.
    pub fn when(&self) -> FloatingDateTime {
        parse_or_sentinel(&self.raw_date)
    }
}

/// Trip-level header data carried next to the itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripMetadata {
    pub title: String,
    pub city: String,
    pub start_date: String,
    pub end_date: String,
    /// Three-letter code of the trip's currency.
    pub currency: String,
    /// Declared trip timezone, e.g. `GMT+8`.
    pub timezone: String,
}

pub const DEFAULT_TRIP_TITLE: &str = "My Trip";
pub const DEFAULT_CURRENCY: &str = "JPY";
pub const DEFAULT_TIMEZONE: &str = "GMT+8";

impl Default for TripMetadata {
    fn default() -> Self {
        Self {
            title: DEFAULT_TRIP_TITLE.to_string(),
            city: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            currency: DEFAULT_CURRENCY.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

/// Everything a content source hands back for one render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripData {
    #[serde(default)]
    pub metadata: TripMetadata,
    #[serde(default)]
    pub itinerary: Vec<ItineraryRecord>,
    /// Shared secret for the access gate, when the source carries one.
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}
