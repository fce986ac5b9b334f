pub mod notion;
pub mod records;

use crate::record::TripData;
use anyhow::{Result, anyhow};

pub const PRESETS: &[&str] = &["notion", "json", "jsonl"];

pub fn parse(preset: &str, input: &str) -> Result<TripData> {
    match preset {
        "notion" => notion::parse_notion(input),
        "json" => records::parse_json(input),
        "jsonl" => records::parse_jsonl(input),
        _ => Err(anyhow!(
            "Unknown preset: {}. Use one of {}",
            preset,
            PRESETS.join(", ")
        )),
    }
}
