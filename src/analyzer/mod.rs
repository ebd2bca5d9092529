//! Turns fetched tweets into a table with derived columns.

pub mod lexicon;
pub mod table;

use anyhow::Result;
use regex::Regex;

use crate::twitter::types::Tweet;

use self::{
    lexicon::{Lexicon, PolarityModel},
    table::{TweetRow, TweetTable},
};

/// Mentions, any character that is not alphanumeric/space/tab, and URLs,
/// tried in that order at each position.
const NOISE_PATTERN: &str = r"(@[A-Za-z0-9]+)|([^0-9A-Za-z \t])|(\w+://\S+)";

pub struct TweetAnalyzer<M = Lexicon> {
    noise: Regex,
    model: M,
}

impl TweetAnalyzer {
    pub fn new() -> Result<Self> {
        Self::with_model(Lexicon::default())
    }
}

impl<M: PolarityModel> TweetAnalyzer<M> {
    pub fn with_model(model: M) -> Result<Self> {
        Ok(Self {
            noise: Regex::new(NOISE_PATTERN)?,
            model,
        })
    }

    /// Strip mentions, URLs and punctuation, then collapse whitespace.
    pub fn clean(&self, text: &str) -> String {
        self.noise
            .replace_all(text, " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Polarity of the cleaned text: > 0 positive, 0 neutral, < 0 negative.
    pub fn sentiment(&self, text: &str) -> f64 {
        self.model.polarity(&self.clean(text))
    }

    pub fn tabulate(&self, tweets: &[Tweet]) -> TweetTable {
        tweets
            .iter()
            .map(|tweet| TweetRow {
                tweets: tweet.text.clone(),
                id: tweet.id,
                len: tweet.text.chars().count(),
                date: tweet.created_at,
                source: tweet.source.clone(),
                likes: tweet.favorite_count,
                retweets: tweet.retweet_count,
                sentiment: self.sentiment(&tweet.text),
            })
            .collect()
    }
}
