use anyhow::Result;
use tracing::info;
use tweetpulse::{analyzer::TweetAnalyzer, twitter::TwitterClient, HEAD_ROWS};

const HASHTAG: &str = "coronavirus";
const NUM_TWEETS: usize = 500;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tweetpulse::init_tracing();

    let twitter = TwitterClient::from_env(None)?;
    let analyzer = TweetAnalyzer::new()?;

    let tweets = twitter.hashtag_tweets(HASHTAG, NUM_TWEETS).await?;
    info!(hashtag = HASHTAG, count = tweets.len(), "Fetched tweets");

    let table = analyzer.tabulate(&tweets);

    println!("{}", table.head(HEAD_ROWS));

    info!(
        mean_len = table.mean_len().unwrap_or_default(),
        max_likes = table.max_likes().unwrap_or_default(),
        max_retweets = table.max_retweets().unwrap_or_default(),
        "Table metrics"
    );

    Ok(())
}
