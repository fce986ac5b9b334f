//! Itinerary normalization for a trip dashboard.
//!
//! Raw records from a content source are sorted by their floating
//! (timezone-less) date, grouped into trip-local days, filtered per tab and
//! classified as today/past against one caller-supplied "now".

pub mod access;
pub mod classify;
pub mod clock;
pub mod config;
pub mod currency;
pub mod dashboard;
pub mod datetime;
pub mod logging;
pub mod normalizer;
pub mod output;
pub mod parsers;
pub mod record;
pub mod source;
pub mod trip;
pub mod view;

pub use access::{AccessError, AccessGate, Session};
pub use classify::{Classification, ExpansionState, classify, is_past};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Settings;
pub use dashboard::{Dashboard, DashboardDay, DashboardItem, render};
pub use datetime::{FloatingDateTime, ParseError, parse_floating};
pub use normalizer::{DayBucket, group_by_day, normalize, sort_chronological};
pub use record::{Category, ItineraryRecord, TripData, TripMetadata};
pub use source::{ContentSource, FileSource, SourceError, StaticSource};
pub use view::{Tab, View, filter_by_view};
