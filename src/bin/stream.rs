use anyhow::Result;
use tracing::info;
use tweetpulse::twitter::{
    auth::Authenticator,
    config::{Credentials, TwitterConfig},
    stream::TwitterStreamer,
};

const FETCHED_TWEETS_FILENAME: &str = "tweets.json";
const HASHTAGS: &[&str] = &["#coronavirus", "#covid19"];

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tweetpulse::init_tracing();

    let auth = Authenticator::new(Credentials::from_env()?).authenticate();
    let streamer = TwitterStreamer::new(auth, TwitterConfig::from_env())?;

    let listener = streamer
        .stream_tweets(FETCHED_TWEETS_FILENAME, HASHTAGS)
        .await?;

    info!(
        state = ?listener.state(),
        path = %listener.path().display(),
        "Streaming finished"
    );

    Ok(())
}
