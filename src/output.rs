use crate::dashboard::{Dashboard, DashboardDay, DashboardItem};
use anyhow::{Result, anyhow};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

const COLUMNS: [&str; 9] = [
    "date", "day", "time", "category", "title", "past", "today", "maps", "id",
];

pub enum Writer {
    Text(Box<dyn Write>),
    Json(Box<dyn Write>),
    Jsonl(Box<dyn Write>),
    Csv(Box<dyn Write>, bool), // bool tracks if we've written headers
    Tsv(Box<dyn Write>, bool),
}

impl Writer {
    pub fn write_dashboard(&mut self, dash: &Dashboard) -> Result<()> {
        match self {
            Writer::Text(writer) => write_text(writer, dash)?,
            Writer::Json(writer) => {
                let serialized = serde_json::to_string_pretty(dash)?;
                writeln!(writer, "{}", serialized)?;
            }
            Writer::Jsonl(writer) => {
                for (_, item) in rows(&dash.days) {
                    writeln!(writer, "{}", serde_json::to_string(item)?)?;
                }
            }
            Writer::Csv(writer, headers_written) => {
                if !*headers_written {
                    writeln!(writer, "{}", COLUMNS.join(","))?;
                    *headers_written = true;
                }
                for (day, item) in rows(&dash.days) {
                    let fields: Vec<String> = row_fields(day, item)
                        .iter()
                        .map(|f| escape_csv_field(f))
                        .collect();
                    writeln!(writer, "{}", fields.join(","))?;
                }
            }
            Writer::Tsv(writer, headers_written) => {
                if !*headers_written {
                    writeln!(writer, "{}", COLUMNS.join("\t"))?;
                    *headers_written = true;
                }
                for (day, item) in rows(&dash.days) {
                    let fields: Vec<String> = row_fields(day, item)
                        .iter()
                        .map(|f| escape_tsv_field(f))
                        .collect();
                    writeln!(writer, "{}", fields.join("\t"))?;
                }
            }
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        match self {
            Writer::Text(ref mut writer)
            | Writer::Json(ref mut writer)
            | Writer::Jsonl(ref mut writer)
            | Writer::Csv(ref mut writer, _)
            | Writer::Tsv(ref mut writer, _) => writer.flush()?,
        }
        Ok(())
    }
}

fn rows(days: &[DashboardDay]) -> impl Iterator<Item = (&DashboardDay, &DashboardItem)> {
    days.iter()
        .flat_map(|day| day.items.iter().map(move |item| (day, item)))
}

fn row_fields(day: &DashboardDay, item: &DashboardItem) -> [String; 9] {
    [
        day.date_key.clone(),
        day.day_number.to_string(),
        item.time.clone(),
        item.category.to_string(),
        item.title.clone(),
        item.is_past.to_string(),
        day.is_today.to_string(),
        item.maps_link.clone(),
        item.id.clone(),
    ]
}

fn write_text(writer: &mut Box<dyn Write>, dash: &Dashboard) -> Result<()> {
    let header = &dash.header;
    writeln!(writer, "{}", header.title)?;
    if header.subtitle.is_empty() {
        writeln!(writer, "{}", header.timezone)?;
    } else {
        writeln!(writer, "{} • {}", header.subtitle, header.timezone)?;
    }
    writeln!(writer)?;

    if dash.view.is_none() {
        writeln!(writer, "Timezone: {}", header.timezone)?;
        writeln!(writer, "Currency: {}", header.currency)?;
        return Ok(());
    }
    if let Some(msg) = dash.empty_message {
        writeln!(writer, "{}", msg)?;
        return Ok(());
    }

    for day in &dash.days {
        let marker = if day.expanded { "▾" } else { "▸" };
        let today = if day.is_today { "  [today]" } else { "" };
        writeln!(
            writer,
            "{} Day {}  {}{}  ({} plans)",
            marker,
            day.day_number,
            day.date_key,
            today,
            day.items.len()
        )?;
        if !day.expanded {
            continue;
        }
        for item in &day.items {
            let past = if item.is_past { "  (done)" } else { "" };
            writeln!(
                writer,
                "    {}  {:<10} {}{}",
                item.time, item.category, item.title, past
            )?;
            if !item.maps_link.is_empty() {
                writeln!(writer, "           {}", item.maps_link)?;
            }
        }
    }
    Ok(())
}

pub fn create_writer(output_arg: &str) -> Result<Writer> {
    match output_arg {
        "stdout" => Ok(Writer::Text(Box::new(io::stdout()))),
        "json" => Ok(Writer::Json(Box::new(io::stdout()))), // JSON to stdout
        path if path.ends_with(".json") => Ok(Writer::Json(open(path)?)),
        path if path.ends_with(".jsonl") || path.ends_with(".ndjson") => {
            Ok(Writer::Jsonl(open(path)?))
        }
        path if path.ends_with(".csv") => Ok(Writer::Csv(open(path)?, false)),
        path if path.ends_with(".tsv") => Ok(Writer::Tsv(open(path)?, false)),
        path => {
            // Default to JSON file if it looks like a path
            if path.contains('/') || path.contains('\\') || path.contains('.') {
                Ok(Writer::Json(open(path)?))
            } else {
                Err(anyhow!(
                    "Unknown output format: {}. Use 'stdout', 'json', or a file path",
                    output_arg
                ))
            }
        }
    }
}

fn open(path: &str) -> Result<Box<dyn Write>> {
    create_parent_dirs(path)?;
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

fn create_parent_dirs(file_path: &str) -> Result<()> {
    if let Some(parent) = Path::new(file_path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn escape_tsv_field(field: &str) -> String {
    field
        .replace('\t', " ")
        .replace('\n', " ")
        .replace('\r', " ")
}
