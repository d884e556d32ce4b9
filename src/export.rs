use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use csv::WriterBuilder;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::scoring::ScoredCombination;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExportRecord {
    pub city: String,
    pub group: String,
    pub subcategory: String,
    pub price_bucket: String,
    pub color: String,
    pub color_hex: String,
    pub score_norm: Option<f64>,
    pub velocity: i32,
    pub geo_score: i32,
    pub cat_score: i32,
    pub price_score: i32,
    pub color_score: i32,
}

impl From<&ScoredCombination> for ExportRecord {
    fn from(r: &ScoredCombination) -> Self {
        ExportRecord {
            city: r.city.clone(),
            group: r.group.clone(),
            subcategory: r.subcategory.clone(),
            price_bucket: r.price_bucket.clone(),
            color: r.color.clone(),
            color_hex: r.color_hex.clone(),
            score_norm: r.score_norm,
            velocity: r.velocity,
            geo_score: r.geo_score,
            cat_score: r.cat_score,
            price_score: r.price_score,
            color_score: r.color_score,
        }
    }
}

pub fn export_file_name(now: DateTime<Local>) -> String {
    format!("fashion_trends_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

pub fn default_export_path(dir: &Path) -> PathBuf {
    dir.join(export_file_name(Local::now()))
}

pub fn write_csv(path: &Path, records: &[ScoredCombination]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    file.lock_exclusive()?;
    file.set_len(0)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(&file);
    for record in records {
        writer.serialize(ExportRecord::from(record))?;
    }
    writer.flush()?;
    drop(writer);
    file.unlock()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use csv::ReaderBuilder;

    fn sample(city: &str, norm: f64) -> ScoredCombination {
        ScoredCombination {
            city: city.into(),
            subcategory: "Kurta".into(),
            group: "Ethnic Wear".into(),
            price_bucket: "₹500–₹1,000".into(),
            color: "Saffron".into(),
            color_hex: "#ff9933".into(),
            geo_score: 44,
            cat_score: 61,
            price_score: 52,
            color_score: 70,
            composite: 58.3,
            velocity: -4,
            score_norm: Some(norm),
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("trends.csv");
        write_csv(&path, &[sample("Jaipur", 100.0), sample("Lucknow", 0.0)]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "city,group,subcategory,price_bucket,color,color_hex,score_norm,velocity,geo_score,cat_score,price_score,color_score"
        );

        let mut reader = ReaderBuilder::new().from_path(&path).unwrap();
        let rows: Vec<ExportRecord> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ExportRecord::from(&sample("Jaipur", 100.0)));
        assert_eq!(rows[1].score_norm, Some(0.0));
    }

    #[test]
    fn rewrite_truncates_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trends.csv");
        write_csv(&path, &[sample("A", 1.0), sample("B", 2.0), sample("C", 3.0)]).unwrap();
        write_csv(&path, &[sample("D", 4.0)]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("D,"));
    }

    #[test]
    fn file_name_is_timestamped() {
        let at = Local.with_ymd_and_hms(2026, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(export_file_name(at), "fashion_trends_20260309_140507.csv");
    }
}
