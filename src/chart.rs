use std::fmt::Write as _;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use serde_json::json;
use textplots::{Chart, ColorPlot, Shape};

use crate::aggregate::SentimentTable;
use crate::logging;
use crate::model::Sentiment;

/// Stacking order from the baseline up.
const STACK_ORDER: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

#[derive(Debug, Args, Clone, Copy)]
pub struct ChartSize {
    /// Chart width in characters
    #[arg(long, default_value_t = 120)]
    pub width: u32,

    /// Chart height in characters
    #[arg(long, default_value_t = 30)]
    pub height: u32,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    /// CSV file written by a previous `analyze` run
    pub path: PathBuf,

    #[command(flatten)]
    pub size: ChartSize,
}

/// Re-renders a previously saved sentiment table.
pub fn run(args: RenderArgs) -> Result<()> {
    let file = File::open(&args.path)
        .with_context(|| format!("failed to open {}", args.path.display()))?;
    let table = SentimentTable::read_csv(file)
        .with_context(|| format!("failed to read sentiment table from {}", args.path.display()))?;

    if table.is_empty() {
        bail!("{} holds no sentiment rows", args.path.display());
    }

    present(&table, args.size);
    Ok(())
}

/// Chart, per-date breakdown and total, all on stdout.
pub fn present(table: &SentimentTable, size: ChartSize) {
    render_chart(table, size);
    print!("{}", breakdown(table));
    println!("Total articles analyzed: {}", table.total());
}

fn render_chart(table: &SentimentTable, size: ChartSize) {
    let Some(first) = table.dates().next() else {
        return;
    };
    let last = table.dates().last().unwrap_or(first);
    let span = (last - first).num_days() as f32 + 1.0;
    let peak = table.rows().map(|(_, c)| c.total()).max().unwrap_or(0).max(1) as f32;

    println!(
        "Sentiment by date: {first} → {last} ({} dates, x = days since {first})",
        table.len()
    );
    println!(
        "Legend: {} (bottom)",
        STACK_ORDER
            .iter()
            .map(|label| format!("{label}={}", color_name(*label)))
            .collect::<Vec<_>>()
            .join(", ")
    );

    let layers = stacked_layers(table);
    let shapes: Vec<Shape<'_>> = layers.iter().map(|(_, points)| Shape::Bars(points)).collect();
    let [top, middle, bottom] = [&layers[0].0, &layers[1].0, &layers[2].0];

    // Taller layers first so the lower segments paint over them.
    Chart::new_with_y_range(size.width.max(32), size.height.max(10), 0.0, span, 0.0, peak)
        .linecolorplot(&shapes[0], top.color())
        .linecolorplot(&shapes[1], middle.color())
        .linecolorplot(&shapes[2], bottom.color())
        .display();
    println!();
}

/// Cumulative bar outlines for each stack level, tallest first. Every day
/// from the first to the last date gets a point, so dates without articles
/// drop to zero instead of carrying the previous bar.
pub fn stacked_layers(table: &SentimentTable) -> Vec<(Sentiment, Vec<(f32, f32)>)> {
    let (Some(first), Some(last)) = (table.dates().next(), table.dates().last()) else {
        return Vec::new();
    };

    let mut layers = Vec::with_capacity(STACK_ORDER.len());
    for depth in (1..=STACK_ORDER.len()).rev() {
        let included = &STACK_ORDER[..depth];
        let mut points: Vec<(f32, f32)> = first
            .iter_days()
            .take_while(|date| *date <= last)
            .map(|date| {
                let x = (date - first).num_days() as f32;
                let height: u64 = included.iter().map(|label| table.count(date, *label)).sum();
                (x, height as f32)
            })
            .collect();
        // Closes the last bar.
        if let Some(&(x, y)) = points.last() {
            points.push((x + 1.0, y));
        }
        layers.push((STACK_ORDER[depth - 1], points));
    }
    layers
}

pub fn breakdown(table: &SentimentTable) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<12}", "Date");
    for label in Sentiment::ALL {
        let _ = write!(out, "{:>10}", label.to_string());
    }
    let _ = writeln!(out, "{:>8}", "Total");

    for (date, counts) in table.rows() {
        let _ = write!(out, "{:<12}", date.format("%Y-%m-%d").to_string());
        for label in Sentiment::ALL {
            let _ = write!(out, "{:>10}", counts.get(label));
        }
        let _ = writeln!(out, "{:>8}", counts.total());
    }

    let _ = write!(out, "{:<12}", "Total");
    for label in Sentiment::ALL {
        let _ = write!(out, "{:>10}", table.column_total(label));
    }
    let _ = writeln!(out, "{:>8}", table.total());
    out
}

/// Writes the table as the `text/csv` download.
pub fn save_csv(table: &SentimentTable, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    table
        .write_csv(file)
        .with_context(|| format!("failed to write {}", path.display()))?;

    logging::info(
        "chart.csv_saved",
        "Sentiment table exported",
        json!({ "path": path.display().to_string(), "rows": table.len(), "mime": "text/csv" }),
    );
    Ok(())
}

fn color_name(label: Sentiment) -> &'static str {
    match label {
        Sentiment::Positive => "green",
        Sentiment::Negative => "red",
        Sentiment::Neutral => "gray",
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::aggregate::aggregate;
    use crate::model::SentimentRecord;

    fn record(d: u32, label: Sentiment) -> SentimentRecord {
        SentimentRecord {
            date: NaiveDate::from_ymd_opt(2025, 1, d).unwrap(),
            label,
        }
    }

    fn table() -> SentimentTable {
        aggregate(&[
            record(20, Sentiment::Positive),
            record(20, Sentiment::Negative),
            record(20, Sentiment::Neutral),
            record(22, Sentiment::Positive),
            record(22, Sentiment::Positive),
        ])
    }

    #[test]
    fn layers_stack_cumulatively_tallest_first() {
        let layers = stacked_layers(&table());
        let labels: Vec<_> = layers.iter().map(|(label, _)| *label).collect();
        assert_eq!(
            labels,
            vec![Sentiment::Neutral, Sentiment::Negative, Sentiment::Positive]
        );

        assert_eq!(
            layers[0].1,
            vec![(0.0, 3.0), (1.0, 0.0), (2.0, 2.0), (3.0, 2.0)]
        );
        assert_eq!(
            layers[1].1,
            vec![(0.0, 2.0), (1.0, 0.0), (2.0, 2.0), (3.0, 2.0)]
        );
        assert_eq!(
            layers[2].1,
            vec![(0.0, 1.0), (1.0, 0.0), (2.0, 2.0), (3.0, 2.0)]
        );
    }

    #[test]
    fn dates_without_articles_render_at_zero() {
        let table = aggregate(&[
            record(1, Sentiment::Positive),
            record(1, Sentiment::Positive),
            record(1, Sentiment::Positive),
            record(10, Sentiment::Positive),
        ]);

        for (label, points) in stacked_layers(&table) {
            let height_at = |x: f32| points.iter().find(|(px, _)| *px == x).map(|(_, y)| *y);
            assert_eq!(height_at(0.0), Some(3.0), "{label} on Jan 1");
            assert_eq!(height_at(4.0), Some(0.0), "{label} on Jan 5");
            assert_eq!(height_at(9.0), Some(1.0), "{label} on Jan 10");
            assert_eq!(points.len(), 11, "{label} covers every day plus the closing edge");
        }
    }

    #[test]
    fn empty_table_has_no_layers() {
        assert!(stacked_layers(&SentimentTable::default()).is_empty());
    }

    #[test]
    fn breakdown_lists_rows_and_totals() {
        let text = breakdown(&table());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Date"));
        assert!(lines[1].starts_with("2025-01-20"));
        assert!(lines[1].ends_with('3'));
        assert!(lines[2].starts_with("2025-01-22"));
        assert!(lines[3].starts_with("Total"));
        assert!(lines[3].ends_with('5'));
    }

    #[test]
    fn fixed_color_mapping() {
        assert_eq!(color_name(Sentiment::Positive), "green");
        assert_eq!(color_name(Sentiment::Negative), "red");
        assert_eq!(color_name(Sentiment::Neutral), "gray");
        assert_eq!(Sentiment::Positive.color(), rgb::RGB8::new(0, 128, 0));
    }
}
