//! Date × sentiment pivot of classified articles.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;

use crate::model::{Sentiment, SentimentRecord};

/// Counts per label, indexed by [`Sentiment::index`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentCounts([u64; 3]);

impl SentimentCounts {
    pub fn get(&self, label: Sentiment) -> u64 {
        self.0[label.index()]
    }

    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    /// Returns `None` when the cell would overflow.
    fn checked_add(&mut self, label: Sentiment, count: u64) -> Option<()> {
        let cell = &mut self.0[label.index()];
        *cell = cell.checked_add(count)?;
        Some(())
    }
}

/// Rows keyed by date in ascending order; absent combinations read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentimentTable {
    rows: BTreeMap<NaiveDate, SentimentCounts>,
}

pub fn aggregate<'a, I>(records: I) -> SentimentTable
where
    I: IntoIterator<Item = &'a SentimentRecord>,
{
    let mut rows: BTreeMap<NaiveDate, SentimentCounts> = BTreeMap::new();
    for record in records {
        let counts = rows.entry(record.date).or_default();
        // Record counts are bounded by memory, far below u64::MAX.
        let _ = counts.checked_add(record.label, 1);
    }
    SentimentTable { rows }
}

impl SentimentTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> impl Iterator<Item = (NaiveDate, SentimentCounts)> + '_ {
        self.rows.iter().map(|(date, counts)| (*date, *counts))
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.keys().copied()
    }

    pub fn count(&self, date: NaiveDate, label: Sentiment) -> u64 {
        self.rows.get(&date).map_or(0, |counts| counts.get(label))
    }

    pub fn column_total(&self, label: Sentiment) -> u64 {
        self.rows.values().map(|counts| counts.get(label)).sum()
    }

    pub fn total(&self) -> u64 {
        self.rows.values().map(SentimentCounts::total).sum()
    }

    /// Expands every cell back into that many records.
    pub fn records(&self) -> Vec<SentimentRecord> {
        let mut records = Vec::with_capacity(self.total() as usize);
        for (date, counts) in &self.rows {
            for label in Sentiment::ALL {
                for _ in 0..counts.get(label) {
                    records.push(SentimentRecord { date: *date, label });
                }
            }
        }
        records
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);

        let mut header = vec!["Date".to_string()];
        header.extend(Sentiment::ALL.iter().map(ToString::to_string));
        writer.write_record(&header)?;

        for (date, counts) in &self.rows {
            let mut row = vec![date.format("%Y-%m-%d").to_string()];
            row.extend(Sentiment::ALL.iter().map(|label| counts.get(*label).to_string()));
            writer.write_record(&row)?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(buffer)
    }

    /// Reads a table written by [`SentimentTable::write_csv`]. Label columns
    /// may appear in any order and missing ones count as zero.
    pub fn read_csv<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let headers = reader.headers().context("missing CSV header")?.clone();

        let Some(date_column) = headers.iter().position(|h| h.trim() == "Date") else {
            bail!("CSV header has no Date column");
        };
        let mut label_columns = Vec::new();
        for (idx, header) in headers.iter().enumerate() {
            if idx == date_column {
                continue;
            }
            let label: Sentiment = header
                .parse()
                .map_err(|err: String| anyhow::anyhow!(err))
                .with_context(|| format!("unexpected CSV column {header:?}"))?;
            label_columns.push((idx, label));
        }

        let mut rows: BTreeMap<NaiveDate, SentimentCounts> = BTreeMap::new();
        for (line, record) in reader.records().enumerate() {
            let record = record.with_context(|| format!("malformed CSV row {}", line + 1))?;
            let raw_date = record.get(date_column).unwrap_or_default().trim();
            // Timestamps written as "2025-01-21 00:00:00" keep their date part.
            let date = NaiveDate::parse_from_str(raw_date.get(..10).unwrap_or(raw_date), "%Y-%m-%d")
                .with_context(|| format!("invalid date {raw_date:?} on row {}", line + 1))?;

            let counts = rows.entry(date).or_default();
            for (idx, label) in &label_columns {
                let raw = record.get(*idx).unwrap_or_default().trim();
                let count = parse_count(raw).with_context(|| {
                    format!("invalid {label} count {raw:?} on row {}", line + 1)
                })?;
                if counts.checked_add(*label, count).is_none() {
                    bail!("{label} count for {date} overflows on row {}", line + 1);
                }
            }
        }

        Ok(Self { rows })
    }
}

// Accepts "2" as well as the float-formatted "2.0" some tools emit.
fn parse_count(raw: &str) -> Result<u64> {
    if raw.is_empty() {
        return Ok(0);
    }
    if let Ok(count) = raw.parse::<u64>() {
        return Ok(count);
    }
    let value: f64 = raw.parse()?;
    if value < 0.0 || value.fract() != 0.0 || !value.is_finite() {
        bail!("count must be a non-negative integer");
    }
    // u64::MAX rounds up to 2^64 as f64, so anything at or above it is too large.
    if value >= u64::MAX as f64 {
        bail!("count is out of range");
    }
    Ok(value as u64)
}
