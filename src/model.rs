use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    /// Column order of the pivot table and its CSV export.
    pub const ALL: [Sentiment; 3] = [Sentiment::Negative, Sentiment::Neutral, Sentiment::Positive];

    pub fn index(self) -> usize {
        match self {
            Sentiment::Negative => 0,
            Sentiment::Neutral => 1,
            Sentiment::Positive => 2,
        }
    }

    pub fn color(self) -> rgb::RGB8 {
        match self {
            Sentiment::Positive => rgb::RGB8::new(0, 128, 0),
            Sentiment::Negative => rgb::RGB8::new(255, 0, 0),
            Sentiment::Neutral => rgb::RGB8::new(128, 128, 128),
        }
    }

    /// Maps a 1 to 5 star rating onto the three buckets.
    pub fn from_stars(stars: u8) -> Option<Self> {
        match stars {
            1 | 2 => Some(Sentiment::Negative),
            3 => Some(Sentiment::Neutral),
            4 | 5 => Some(Sentiment::Positive),
            _ => None,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
            Sentiment::Positive => "Positive",
        };
        f.write_str(label)
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "negative" => return Ok(Sentiment::Negative),
            "neutral" => return Ok(Sentiment::Neutral),
            "positive" => return Ok(Sentiment::Positive),
            _ => {}
        }

        // "1 star", "4 stars"
        trimmed
            .split_whitespace()
            .next()
            .and_then(|head| head.parse::<u8>().ok())
            .and_then(Sentiment::from_stars)
            .ok_or_else(|| format!("unrecognised sentiment label {trimmed:?}"))
    }
}

/// A news item reduced to what the pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub text: String,
    pub published_on: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SentimentRecord {
    pub date: NaiveDate,
    pub label: Sentiment,
}

/// Calendar date of a publish timestamp, as written by the publisher.
pub fn publish_date(published_at: &str) -> Option<NaiveDate> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(published_at) {
        return Some(timestamp.date_naive());
    }
    published_at
        .get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_labels_collapse_into_buckets() {
        assert_eq!("1 star".parse(), Ok(Sentiment::Negative));
        assert_eq!("2 stars".parse(), Ok(Sentiment::Negative));
        assert_eq!("3 stars".parse(), Ok(Sentiment::Neutral));
        assert_eq!("4 stars".parse(), Ok(Sentiment::Positive));
        assert_eq!("5 stars".parse(), Ok(Sentiment::Positive));
        assert!("6 stars".parse::<Sentiment>().is_err());
        assert!("0 stars".parse::<Sentiment>().is_err());
    }

    #[test]
    fn plain_labels_are_case_insensitive() {
        assert_eq!("POSITIVE".parse(), Ok(Sentiment::Positive));
        assert_eq!(" negative ".parse(), Ok(Sentiment::Negative));
        assert_eq!("Neutral".parse(), Ok(Sentiment::Neutral));
        assert!("bullish".parse::<Sentiment>().is_err());
    }

    #[test]
    fn publish_date_keeps_the_published_offset() {
        let day = |y, m, d| NaiveDate::from_ymd_opt(y, m, d);
        assert_eq!(publish_date("2025-01-21T23:30:00Z"), day(2025, 1, 21));
        assert_eq!(publish_date("2025-01-21T23:30:00-03:00"), day(2025, 1, 21));
        assert_eq!(publish_date("2025-01-21 08:00"), day(2025, 1, 21));
        assert_eq!(publish_date("yesterday"), None);
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for label in Sentiment::ALL {
            assert_eq!(label.to_string().parse(), Ok(label));
            assert_eq!(Sentiment::ALL[label.index()], label);
        }
    }
}
