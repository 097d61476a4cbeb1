// Export and console rendering helpers.
use crate::error::Result;
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Render up to `max_rows` rows as a Markdown table.
pub fn markdown_table<T>(rows: &[T], max_rows: usize) -> Option<String>
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return None;
    }
    Some(Table::new(slice).with(Style::markdown()).to_string())
}

pub fn preview_table<T>(title: &str, note: Option<&str>, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("\n{}", title);
    if let Some(n) = note {
        println!("({})", n);
    }
    println!();
    preview_table_rows(rows, max_rows);
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    match markdown_table(rows, max_rows) {
        Some(table) => println!("{}\n", table),
        None => println!("(no rows)\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DailyTraffic;

    fn rows() -> Vec<DailyTraffic> {
        vec![
            DailyTraffic { day: "月".into(), volume: 120 },
            DailyTraffic { day: "火".into(), volume: 98 },
        ]
    }

    #[test]
    fn markdown_preview_is_truncated() {
        let table = markdown_table(&rows(), 1).unwrap();
        assert!(table.contains("120"));
        assert!(!table.contains("98"));
        assert!(markdown_table::<DailyTraffic>(&[], 5).is_none());
    }

    #[test]
    fn csv_has_header_and_rows() {
        let path = std::env::temp_dir().join(format!("footfall-output-{}.csv", std::process::id()));
        write_csv(&path, &rows()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines, vec!["day,volume", "月,120", "火,98"]);
    }
}
