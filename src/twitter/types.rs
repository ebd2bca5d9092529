use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A v1.1 status object, reduced to the fields the analyzer reads.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawTweet")]
pub struct Tweet {
    pub id: u64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// Client name, e.g. `Twitter for iPhone`.
    pub source: String,
    pub source_url: Option<String>,
    pub favorite_count: u64,
    pub retweet_count: u64,
}

#[derive(Deserialize)]
struct RawTweet {
    id: u64,
    text: String,
    #[serde(with = "twitter_date")]
    created_at: DateTime<Utc>,
    source: String,
    favorite_count: u64,
    retweet_count: u64,
}

impl From<RawTweet> for Tweet {
    fn from(raw: RawTweet) -> Self {
        let (source, source_url) = split_source_anchor(&raw.source);

        Self {
            id: raw.id,
            text: raw.text,
            created_at: raw.created_at,
            source,
            source_url,
            favorite_count: raw.favorite_count,
            retweet_count: raw.retweet_count,
        }
    }
}

/// `source` arrives as `<a href="url" rel="nofollow">name</a>`; plain text
/// is passed through.
fn split_source_anchor(source: &str) -> (String, Option<String>) {
    let trimmed = source.trim();

    if !trimmed.starts_with("<a") {
        return (trimmed.to_string(), None);
    }

    let url = trimmed
        .split_once("href=\"")
        .and_then(|(_, rest)| rest.split_once('"'))
        .map(|(url, _)| url.to_string());

    let name = match (trimmed.find('>'), trimmed.rfind("</a>")) {
        (Some(open), Some(close)) if open < close => &trimmed[open + 1..close],
        _ => trimmed,
    };

    (name.to_string(), url)
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: u64,
    pub screen_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub followers_count: u64,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub statuses: Vec<Tweet>,
}

#[derive(Debug, Deserialize)]
pub struct FriendsResponse {
    pub users: Vec<User>,
    #[serde(default)]
    pub next_cursor: i64,
}

/// `created_at` uses the legacy `Wed Oct 10 20:19:24 +0000 2018` layout.
mod twitter_date {
    use chrono::{DateTime, Utc};
    use serde::{de::Error, Deserialize, Deserializer};

    const FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;

        DateTime::parse_from_str(&raw, FORMAT)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}
