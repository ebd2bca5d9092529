//! Live filtered-stream ingestion.
//!
//! The streamer owns the connection and feeds every newline-terminated
//! message to a [`StreamListener`]. There is no reconnect logic: a session
//! ends when the connection closes, an error status arrives, or the
//! listener asks to stop.

use std::{
    fs::OpenOptions,
    io::{self, Stdout, Write},
    path::{Path, PathBuf},
};

use anyhow::Result;
use bytes::Bytes;
use futures_util::{pin_mut, Stream, StreamExt};
use reqwest_oauth1::OAuthClientProvider;
use tracing::{debug, error, info, warn};

use super::{auth::OAuthHandle, config::TwitterConfig, http_client};

const FILTER_PATH: &str = "/1.1/statuses/filter.json";

/// "Enhance Your Calm": the client is opening connections too quickly.
pub const RATE_LIMIT_STATUS: u16 = 420;

/// What the driver should do after a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Callbacks invoked by the streamer.
pub trait StreamListener {
    /// A raw message as received, delimiter included.
    fn on_data(&mut self, payload: &[u8]) -> Flow;

    /// A non-success HTTP status from the stream endpoint.
    fn on_error(&mut self, status: u16) -> Flow;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Listening,
    Stopped,
}

/// Echoes every message to `echo` (stdout by default) and appends it to a
/// file.
///
/// A failed echo or write is logged and otherwise ignored, so a closed pipe
/// or a full disk never tears down the connection. Only a 420 status stops
/// the listener.
#[derive(Debug)]
pub struct FileListener<W = Stdout> {
    path: PathBuf,
    state: ListenerState,
    echo: W,
}

impl FileListener {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_echo(path, io::stdout())
    }
}

impl<W: Write> FileListener<W> {
    pub fn with_echo(path: impl Into<PathBuf>, echo: W) -> Self {
        Self {
            path: path.into(),
            state: ListenerState::Listening,
            echo,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> ListenerState {
        self.state
    }

    fn write_echo(&mut self, payload: &[u8]) -> io::Result<()> {
        let line = String::from_utf8_lossy(payload);

        writeln!(self.echo, "{}", line.trim_end())?;
        self.echo.flush()
    }

    fn append(&self, payload: &[u8]) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.write_all(payload)
    }
}

impl<W: Write> StreamListener for FileListener<W> {
    fn on_data(&mut self, payload: &[u8]) -> Flow {
        if self.state == ListenerState::Stopped {
            return Flow::Stop;
        }

        if let Err(err) = self.write_echo(payload) {
            error!(error = %err, "Error echoing data");
        }

        if let Err(err) = self.append(payload) {
            error!(path = %self.path.display(), error = %err, "Error on data");
        }

        Flow::Continue
    }

    fn on_error(&mut self, status: u16) -> Flow {
        if self.state == ListenerState::Stopped {
            return Flow::Stop;
        }

        if status == RATE_LIMIT_STATUS {
            warn!(status, "Rate limited by the stream endpoint, disconnecting");
            self.state = ListenerState::Stopped;

            return Flow::Stop;
        }

        warn!(status, "Stream error");

        Flow::Continue
    }
}

/// Split a stream body into messages and hand them to `listener`.
///
/// Messages end at `\n` (the API sends `\r\n`). Blank keep-alive lines are
/// skipped. Reading stops as soon as the listener returns [`Flow::Stop`].
pub async fn drive<S, E, L>(body: S, listener: &mut L) -> Result<Flow>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::error::Error + Send + Sync + 'static,
    L: StreamListener + ?Sized,
{
    pin_mut!(body);

    let mut buffer = Vec::new();

    while let Some(chunk) = body.next().await {
        buffer.extend_from_slice(&chunk?);

        while let Some(newline) = buffer.iter().position(|&b| b == b'\n') {
            let message: Vec<u8> = buffer.drain(..=newline).collect();

            if dispatch(&message, listener) == Flow::Stop {
                return Ok(Flow::Stop);
            }
        }
    }

    if !buffer.is_empty() {
        return Ok(dispatch(&buffer, listener));
    }

    Ok(Flow::Continue)
}

fn dispatch<L: StreamListener + ?Sized>(message: &[u8], listener: &mut L) -> Flow {
    if message.iter().all(u8::is_ascii_whitespace) {
        debug!("Received keep-alive");
        return Flow::Continue;
    }

    listener.on_data(message)
}

/// Opens filtered-stream connections.
pub struct TwitterStreamer {
    client: reqwest::Client,
    auth: OAuthHandle,
    config: TwitterConfig,
}

impl TwitterStreamer {
    pub fn new(auth: OAuthHandle, config: TwitterConfig) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            auth,
            config,
        })
    }

    /// Stream tweets matching any of `track` into `fetched_tweets_filename`.
    ///
    /// Returns the listener once the session is over so its final state can
    /// be inspected.
    pub async fn stream_tweets(
        &self,
        fetched_tweets_filename: impl Into<PathBuf>,
        track: &[&str],
    ) -> Result<FileListener> {
        let mut listener = FileListener::new(fetched_tweets_filename);

        self.filter(track, &mut listener).await?;

        Ok(listener)
    }

    /// Connect to the filter endpoint and drive `listener` until the session ends.
    pub async fn filter<L>(&self, track: &[&str], listener: &mut L) -> Result<Flow>
    where
        L: StreamListener + ?Sized,
    {
        let url = self.config.stream_endpoint(FILTER_PATH);
        let track = track.join(",");

        info!(%url, %track, "Connecting to filtered stream");

        let response = self
            .client
            .clone()
            .oauth1(self.auth.secrets())
            .post(url)
            .form(&[("track", track.as_str())])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            return Ok(listener.on_error(status.as_u16()));
        }

        let flow = drive(response.bytes_stream(), listener).await?;

        info!(?flow, "Stream session ended");

        Ok(flow)
    }
}
