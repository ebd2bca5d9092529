use reqwest_oauth1::Secrets;

use super::config::Credentials;

/// Turns static credentials into a request-signing handle.
///
/// Nothing is sent here: a rejected key pair only shows up as an API
/// error on the first signed request.
pub struct Authenticator {
    credentials: Credentials,
}

impl Authenticator {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    pub fn authenticate(&self) -> OAuthHandle {
        let Credentials {
            consumer_key,
            consumer_secret,
            access_token,
            access_token_secret,
        } = self.credentials.clone();

        OAuthHandle {
            secrets: Secrets::new_with_token(
                consumer_key,
                consumer_secret,
                access_token,
                access_token_secret,
            ),
        }
    }
}

/// Signed-auth handle shared by the REST client and the streamer.
#[derive(Clone)]
pub struct OAuthHandle {
    secrets: Secrets<'static>,
}

impl OAuthHandle {
    pub(crate) fn secrets(&self) -> Secrets<'static> {
        self.secrets.clone()
    }
}
