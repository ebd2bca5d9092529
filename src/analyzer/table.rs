use std::fmt;

use chrono::{DateTime, Utc};

pub const COLUMNS: [&str; 8] = [
    "tweets",
    "id",
    "len",
    "date",
    "source",
    "likes",
    "retweets",
    "sentiment",
];

const TEXT_WIDTH: usize = 50;
const SOURCE_WIDTH: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct TweetRow {
    pub tweets: String,
    pub id: u64,
    pub len: usize,
    pub date: DateTime<Utc>,
    pub source: String,
    pub likes: u64,
    pub retweets: u64,
    pub sentiment: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Likes,
    Retweets,
}

/// One row per fetched tweet, in fetch order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TweetTable {
    rows: Vec<TweetRow>,
}

impl TweetTable {
    pub fn rows(&self) -> &[TweetRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> TweetTable {
        self.rows.iter().take(n).cloned().collect()
    }

    pub fn mean_len(&self) -> Option<f64> {
        if self.rows.is_empty() {
            return None;
        }

        let total: usize = self.rows.iter().map(|r| r.len).sum();

        Some(total as f64 / self.rows.len() as f64)
    }

    pub fn max_likes(&self) -> Option<u64> {
        self.rows.iter().map(|r| r.likes).max()
    }

    pub fn max_retweets(&self) -> Option<u64> {
        self.rows.iter().map(|r| r.retweets).max()
    }

    /// `metric` keyed by tweet date, in row order.
    pub fn time_series(&self, metric: Metric) -> Vec<(DateTime<Utc>, u64)> {
        self.rows
            .iter()
            .map(|r| {
                let value = match metric {
                    Metric::Likes => r.likes,
                    Metric::Retweets => r.retweets,
                };
                (r.date, value)
            })
            .collect()
    }
}

impl FromIterator<TweetRow> for TweetTable {
    fn from_iter<I: IntoIterator<Item = TweetRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

fn cell(value: &str, width: usize) -> String {
    let flat = value.replace(['\r', '\n', '\t'], " ");

    if flat.chars().count() <= width {
        return flat;
    }

    let mut cut: String = flat.chars().take(width - 3).collect();
    cut.push_str("...");
    cut
}

impl fmt::Display for TweetTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index_width = self.rows.len().saturating_sub(1).to_string().len();

        writeln!(
            f,
            "{:>iw$}  {:<tw$}  {:>19}  {:>4}  {:<19}  {:<sw$}  {:>6}  {:>8}  {:>9}",
            "",
            COLUMNS[0],
            COLUMNS[1],
            COLUMNS[2],
            COLUMNS[3],
            COLUMNS[4],
            COLUMNS[5],
            COLUMNS[6],
            COLUMNS[7],
            iw = index_width,
            tw = TEXT_WIDTH,
            sw = SOURCE_WIDTH,
        )?;

        for (index, row) in self.rows.iter().enumerate() {
            writeln!(
                f,
                "{:>iw$}  {:<tw$}  {:>19}  {:>4}  {:<19}  {:<sw$}  {:>6}  {:>8}  {:>9.6}",
                index,
                cell(&row.tweets, TEXT_WIDTH),
                row.id,
                row.len,
                row.date.format("%Y-%m-%d %H:%M:%S"),
                cell(&row.source, SOURCE_WIDTH),
                row.likes,
                row.retweets,
                row.sentiment,
                iw = index_width,
                tw = TEXT_WIDTH,
                sw = SOURCE_WIDTH,
            )?;
        }

        write!(f, "\n[{} rows x {} columns]", self.rows.len(), COLUMNS.len())
    }
}
