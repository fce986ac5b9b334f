use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::Serialize;

use crate::normalizer::{DayBucket, group_by_day};
use crate::record::{Category, ItineraryRecord};

/// Category projection applied to the sorted itinerary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    All,
    Hotel,
    Transport,
    /// visit, shopping and restaurant together.
    VisitGroup,
    Only(Category),
}

impl View {
    pub fn admits(self, category: Category) -> bool {
        match self {
            View::All => true,
            View::Hotel => category == Category::Hotel,
            View::Transport => category == Category::Transport,
            View::VisitGroup => matches!(
                category,
                Category::Visit | Category::Shopping | Category::Restaurant
            ),
            View::Only(c) => category == c,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::All => f.write_str("all"),
            View::Hotel => f.write_str("hotel"),
            View::Transport => f.write_str("transport"),
            View::VisitGroup => f.write_str("visit-group"),
            View::Only(c) => write!(f, "only:{c}"),
        }
    }
}

impl FromStr for View {
    type Err = anyhow::Error;

    /// `all`, `hotel`, `transport`, `visit-group` (or `visitGroup`), or
    /// `only:<category>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(View::All),
            "hotel" => Ok(View::Hotel),
            "transport" => Ok(View::Transport),
            "visit-group" | "visitGroup" | "visit_group" => Ok(View::VisitGroup),
            other => match other.strip_prefix("only:") {
                Some(tag) => Category::ALL
                    .into_iter()
                    .find(|c| c.as_str() == tag)
                    .map(View::Only)
                    .ok_or_else(|| anyhow!("Unknown category: {}", tag)),
                None => Err(anyhow!("Unknown view: {}", other)),
            },
        }
    }
}

/// Dashboard tabs, in swipe order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Home,
    Visit,
    Hotel,
    Transport,
    Info,
}

impl Tab {
    /// The category projection behind a tab. `Info` shows no itinerary.
    pub fn view(self) -> Option<View> {
        match self {
            Tab::Home => Some(View::All),
            Tab::Visit => Some(View::VisitGroup),
            Tab::Hotel => Some(View::Hotel),
            Tab::Transport => Some(View::Transport),
            Tab::Info => None,
        }
    }
}

/// Stable selection over an already sorted sequence.
pub fn filter_by_view(sorted: &[ItineraryRecord], view: View) -> Vec<ItineraryRecord> {
    sorted
        .iter()
        .filter(|r| view.admits(r.category))
        .cloned()
        .collect()
}

/// Filter, then group the survivors into their own day buckets.
pub fn project(sorted: &[ItineraryRecord], view: View) -> Vec<DayBucket> {
    group_by_day(filter_by_view(sorted, view))
}
