pub mod auth;
pub mod config;
pub mod cursor;
pub mod stream;
pub mod types;

use std::env::consts;

use anyhow::{anyhow, bail, Result};
use reqwest::header::HeaderMap;
use reqwest_oauth1::OAuthClientProvider;
use tracing::{debug, warn};

use self::{
    auth::{Authenticator, OAuthHandle},
    config::{Credentials, TwitterConfig},
    cursor::{collect_items, Page, PageRequest},
    types::{FriendsResponse, SearchResponse, Tweet, User},
};

const USER_TIMELINE_PATH: &str = "/1.1/statuses/user_timeline.json";
const HOME_TIMELINE_PATH: &str = "/1.1/statuses/home_timeline.json";
const SEARCH_PATH: &str = "/1.1/search/tweets.json";
const FRIENDS_PATH: &str = "/1.1/friends/list.json";
const VERIFY_CREDENTIALS_PATH: &str = "/1.1/account/verify_credentials.json";

const MAX_TIMELINE_PAGE: usize = 200;
const MAX_SEARCH_PAGE: usize = 100;
const MAX_FRIENDS_PAGE: usize = 200;

/// Default headers shared by the REST client and the streamer.
pub(crate) fn http_client() -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();

    headers.insert("accept", "application/json".parse()?);
    headers.insert(
        "user-agent",
        format!(
            "{}/{} on {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            consts::OS
        )
        .parse()?,
    );

    Ok(reqwest::Client::builder()
        .default_headers(headers)
        .build()?)
}

/// REST client for the v1.1 API.
///
/// When a target user is bound, the timeline and friend operations read that
/// user's data; otherwise they read the authenticated user's.
pub struct TwitterClient {
    client: reqwest::Client,
    auth: OAuthHandle,
    config: TwitterConfig,
    twitter_user: Option<String>,
}

impl TwitterClient {
    pub fn new(
        auth: OAuthHandle,
        config: TwitterConfig,
        twitter_user: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            auth,
            config,
            twitter_user,
        })
    }

    /// Credentials and endpoints from the environment.
    pub fn from_env(twitter_user: Option<&str>) -> Result<Self> {
        let auth = Authenticator::new(Credentials::from_env()?).authenticate();

        Self::new(
            auth,
            TwitterConfig::from_env(),
            twitter_user.map(str::to_string),
        )
    }

    async fn twitter_request<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = self.config.api_endpoint(path);

        debug!(%url, params = query.len(), "Twitter API request");

        let response = match self
            .client
            .clone()
            .oauth1(self.auth.secrets())
            .request(reqwest::Method::GET, url)
            .query(query)
            .send()
            .await?
        {
            response if response.status().is_success() => response,
            response => {
                let status = response.status();
                let error = response.text().await?;

                bail!("Twitter API error: {status} {error}");
            }
        };

        let bytes = response.bytes().await?;

        match serde_json::from_slice(&bytes) {
            Ok(body) => Ok(body),
            Err(err) => {
                let body = String::from_utf8_lossy(&bytes);

                Err(anyhow!("Failed to parse response ({err}): {body}"))
            }
        }
    }

    fn user_param(&self) -> Option<(&'static str, String)> {
        self.twitter_user
            .as_ref()
            .map(|user| ("screen_name", user.clone()))
    }

    async fn tweets_page<R>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
        request: PageRequest,
        extract: fn(R) -> Vec<Tweet>,
    ) -> Result<Page<Tweet>>
    where
        R: serde::de::DeserializeOwned,
    {
        let mut query = params.to_vec();
        query.push(("count", request.count.to_string()));
        query.extend(request.token_param());

        let tweets = self.twitter_request::<R>(path, &query).await.map(extract)?;

        Ok(Page::by_max_id(tweets))
    }

    /// Get the profile behind the configured credentials.
    pub async fn verify_credentials(&self) -> Result<User> {
        self.twitter_request(VERIFY_CREDENTIALS_PATH, &[]).await
    }

    /// Tweets from the bound user's timeline, or the authenticated user's.
    pub async fn user_timeline_tweets(&self, num_tweets: usize) -> Result<Vec<Tweet>> {
        let params: Vec<_> = self.user_param().into_iter().collect();
        let params = &params;

        collect_items(num_tweets, MAX_TIMELINE_PAGE, move |request| {
            self.tweets_page(USER_TIMELINE_PATH, params, request, |tweets: Vec<Tweet>| {
                tweets
            })
        })
        .await
    }

    /// The most recent tweets carrying `#hashtag`.
    pub async fn hashtag_tweets(&self, hashtag: &str, num_tweets: usize) -> Result<Vec<Tweet>> {
        let params = [("q", format!("#{hashtag}"))];
        let params = &params;

        collect_items(num_tweets, MAX_SEARCH_PAGE, move |request| {
            self.tweets_page(SEARCH_PATH, params, request, |r: SearchResponse| {
                r.statuses
            })
        })
        .await
    }

    /// Accounts the bound user (or the authenticated user) follows.
    pub async fn friend_list(&self, num_friends: usize) -> Result<Vec<User>> {
        let params: Vec<_> = self.user_param().into_iter().collect();
        let params = &params;

        collect_items(num_friends, MAX_FRIENDS_PAGE, move |request| async move {
            let mut query = params.clone();
            query.push(("count", request.count.to_string()));
            query.extend(request.token_param());

            self.twitter_request::<FriendsResponse>(FRIENDS_PATH, &query)
                .await
                .map(Page::from)
        })
        .await
    }

    /// Tweets from the authenticated user's home timeline.
    pub async fn home_timeline_tweets(&self, num_tweets: usize) -> Result<Vec<Tweet>> {
        if let Some(user) = &self.twitter_user {
            warn!(
                user = %user,
                "Home timeline is only served for the authenticated user, ignoring bound user"
            );
        }

        collect_items(num_tweets, MAX_TIMELINE_PAGE, move |request| {
            self.tweets_page(HOME_TIMELINE_PATH, &[], request, |tweets: Vec<Tweet>| {
                tweets
            })
        })
        .await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::{json, Value};
    use wiremock::{
        matchers::{header_exists, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    pub(crate) fn test_auth() -> OAuthHandle {
        Authenticator::new(Credentials {
            consumer_key: "test_consumer_key".into(),
            consumer_secret: "test_consumer_secret".into(),
            access_token: "test_access_token".into(),
            access_token_secret: "test_access_token_secret".into(),
        })
        .authenticate()
    }

    fn test_client(mock_server: &MockServer, user: Option<&str>) -> TwitterClient {
        let config = TwitterConfig {
            api_url: mock_server.uri(),
            ..Default::default()
        };

        TwitterClient::new(test_auth(), config, user.map(str::to_string)).unwrap()
    }

    fn status(id: u64, text: &str) -> Value {
        json!({
            "id": id,
            "text": text,
            "created_at": "Sat Mar 14 09:30:00 +0000 2020",
            "source": "<a href=\"https://mobile.twitter.com\">Twitter Web App</a>",
            "favorite_count": id % 7,
            "retweet_count": id % 3
        })
    }

    async fn sent_param(mock_server: &MockServer, name: &str) -> bool {
        mock_server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .any(|request| request.url.query_pairs().any(|(key, _)| key == name))
    }

    #[tokio::test]
    async fn hashtag_search_signs_and_prefixes_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .and(header_exists("Authorization"))
            .and(query_param("q", "#rustlang"))
            .and(query_param("count", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "statuses": [status(20, "first"), status(10, "second")],
                "search_metadata": { "count": 2 }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, None);
        let tweets = client.hashtag_tweets("rustlang", 2).await.unwrap();

        assert_eq!(tweets.len(), 2);
        assert_eq!(tweets[0].text, "first");
        assert_eq!(tweets[1].id, 10);
    }

    #[tokio::test]
    async fn user_timeline_pages_backwards_until_exhausted() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(USER_TIMELINE_PATH))
            .and(query_param("screen_name", "jack"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([status(30, "c"), status(20, "b")])),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path(USER_TIMELINE_PATH))
            .and(query_param("max_id", "19"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([status(10, "a")])))
            .with_priority(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path(USER_TIMELINE_PATH))
            .and(query_param("max_id", "9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .with_priority(1)
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, Some("jack"));
        let tweets = client.user_timeline_tweets(10).await.unwrap();

        let ids: Vec<_> = tweets.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![30, 20, 10]);
    }

    #[tokio::test]
    async fn own_timeline_omits_screen_name() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(USER_TIMELINE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([status(5, "mine")])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, None);
        let tweets = client.user_timeline_tweets(1).await.unwrap();

        assert_eq!(tweets[0].text, "mine");
        assert!(!sent_param(&mock_server, "screen_name").await);
    }

    #[tokio::test]
    async fn friend_list_follows_cursor() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(FRIENDS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "users": [{ "id": 1, "screen_name": "alice" }],
                "next_cursor": 1600
            })))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path(FRIENDS_PATH))
            .and(query_param("cursor", "1600"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "users": [{ "id": 2, "screen_name": "bob" }],
                "next_cursor": 0
            })))
            .with_priority(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, None);
        let friends = client.friend_list(50).await.unwrap();

        let names: Vec<_> = friends.iter().map(|u| u.screen_name.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob"]);
    }

    #[tokio::test]
    async fn home_timeline_ignores_bound_user() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(HOME_TIMELINE_PATH))
            .and(query_param("count", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([status(3, "home")])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, Some("jack"));
        let tweets = client.home_timeline_tweets(1).await.unwrap();

        assert_eq!(tweets.len(), 1);
        assert!(!sent_param(&mock_server, "screen_name").await);
    }

    #[tokio::test]
    async fn zero_count_sends_nothing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, None);

        assert!(client.home_timeline_tweets(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn api_errors_propagate() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(VERIFY_CREDENTIALS_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "errors": [{ "code": 32, "message": "Could not authenticate you." }]
            })))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, None);
        let err = client.verify_credentials().await.unwrap_err();

        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn rate_limited_search_is_not_retried() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(429).set_body_string("Rate limit exceeded"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, None);

        assert!(client.hashtag_tweets("busy", 5).await.is_err());
    }

    #[tokio::test]
    async fn malformed_body_reports_payload() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(VERIFY_CREDENTIALS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, None);
        let err = client.verify_credentials().await.unwrap_err();

        assert!(err.to_string().contains("maintenance"));
    }
}
