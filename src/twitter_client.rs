//! Twitter API Client
//! It signs and calls the APIs, then interprets the responses
//! Define it as trait and implement it for the testability(using mock)
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use log::{debug, info};
use url::Url;

use crate::credential::Credentials;
use crate::error::XError;
use crate::http::{HttpRequest, HttpResponse, HttpTransport, RequestBody, UreqTransport};
use crate::oauth::OAuthSigner;
use crate::twitter_object::{
    CreatedTweet, DeleteOutcome, ResponseObject, TweetRequest, UploadedMedia,
};

const TWEETS_ENDPOINT: &str = "https://api.twitter.com/2/tweets";
const MEDIA_UPLOAD_ENDPOINT: &str = "https://upload.twitter.com/1.1/media/upload.json";

/// Endpoints used by the client
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub tweets: Url,
    pub media_upload: Url,
}

impl Endpoints {
    pub fn new(tweets: &str, media_upload: &str) -> Result<Self> {
        Ok(Endpoints {
            tweets: Url::parse(tweets)?,
            media_upload: Url::parse(media_upload)?,
        })
    }

    pub fn twitter() -> Result<Self> {
        Self::new(TWEETS_ENDPOINT, MEDIA_UPLOAD_ENDPOINT)
    }
}

/// Twitter Client
/// It needs to know the endpoints and all required credentials
pub struct TwitterClient<T: HttpTransport = UreqTransport> {
    transport: T,
    endpoints: Endpoints,
    credentials: Credentials,
}

#[cfg(test)]
use mockall::automock;
#[cfg_attr(test, automock)]
pub trait TwitterClientTrait {
    fn upload_media(&self, path: &Path) -> Result<String>;
    fn create_tweet(&self, request: &TweetRequest) -> Result<CreatedTweet>;
    fn delete_tweet(&self, tweet_id: &str) -> Result<DeleteOutcome>;
}

impl TwitterClient<UreqTransport> {
    /// Constructs new Twitter Client talking to the real API
    /// * credentials: resolved once at startup
    pub fn new(credentials: Credentials) -> Result<Self> {
        Ok(Self::with_transport(
            UreqTransport::new(),
            Endpoints::twitter()?,
            credentials,
        ))
    }
}

impl<T: HttpTransport> TwitterClient<T> {
    pub fn with_transport(transport: T, endpoints: Endpoints, credentials: Credentials) -> Self {
        TwitterClient {
            transport,
            endpoints,
            credentials,
        }
    }

    /// Sign with the given form parameters and send
    fn send_signed(
        &self,
        method: &'static str,
        url: Url,
        params: &[(&str, &str)],
        body: RequestBody,
    ) -> Result<HttpResponse> {
        let authorization = OAuthSigner::new(&self.credentials).sign(method, &url, params);
        let response = self.transport.send(HttpRequest {
            method,
            url,
            authorization,
            body,
        })?;
        if !response.is_success() {
            return Err(XError::Api {
                status: response.status,
                body: response.body,
            }
            .into());
        }
        Ok(response)
    }
}

impl<T: HttpTransport> TwitterClientTrait for TwitterClient<T> {
    /// Upload a media file and return its id
    /// The whole file is read in memory and sent base64 encoded in one request(no chunked upload)
    /// * path: relative paths are resolved from the current directory
    fn upload_media(&self, path: &Path) -> Result<String> {
        let path: PathBuf = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        let content = std::fs::read(&path).map_err(|source| XError::Filesystem {
            path: path.clone(),
            source,
        })?;
        info!("Uploading {} ({} bytes)", path.display(), content.len());

        let media_data = base64::encode(&content);
        let response = self.send_signed(
            "POST",
            self.endpoints.media_upload.clone(),
            &[("media_data", media_data.as_str())],
            RequestBody::Form(vec![("media_data".to_string(), media_data.clone())]),
        )?;

        let uploaded: UploadedMedia = serde_json::from_str(&response.body).map_err(|e| {
            XError::UnexpectedResponse(format!("no media_id_string in upload response: {}", e))
        })?;
        debug!("Uploaded media id: {}", uploaded.media_id_string);
        Ok(uploaded.media_id_string)
    }

    /// Create a tweet, quote or reply
    /// Only the method and url are signed, the JSON body is not a part of the signature
    fn create_tweet(&self, request: &TweetRequest) -> Result<CreatedTweet> {
        let body = serde_json::to_value(request.body())?;
        debug!("Tweet payload: {}", body);
        let response = self.send_signed(
            "POST",
            self.endpoints.tweets.clone(),
            &[],
            RequestBody::Json(body),
        )?;

        let created: ResponseObject<CreatedTweet> = serde_json::from_str(&response.body)
            .map_err(|e| XError::UnexpectedResponse(format!("no tweet id in response: {}", e)))?;
        Ok(created.data)
    }

    /// Delete your tweet
    /// * tweet_id: target tweet id
    fn delete_tweet(&self, tweet_id: &str) -> Result<DeleteOutcome> {
        let mut url = self.endpoints.tweets.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Tweets endpoint can't have path segments"))?
            .push(tweet_id);
        let response = self.send_signed("DELETE", url, &[], RequestBody::Empty)?;

        // 2xx でも確認できない場合は失敗ではなく Unconfirmed として返す
        match serde_json::from_str::<serde_json::Value>(&response.body) {
            Ok(body) => Ok(DeleteOutcome::from_body(body)),
            Err(e) => {
                debug!("Delete response is not JSON: {}", e);
                Ok(DeleteOutcome::Unconfirmed(serde_json::Value::String(
                    response.body,
                )))
            }
        }
    }
}
