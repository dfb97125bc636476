//! Twitter API request/response object definition
use serde::{Deserialize, Serialize};

/// Wrapper of the response
/// `T` is depending on the endpoints, but always it will be wrapped with `data`
#[derive(Deserialize, Serialize, Debug)]
pub struct ResponseObject<T> {
    pub data: T,
}

/// Created tweet, returned by `POST /2/tweets`
#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedTweet {
    pub id: String,
    #[serde(default)]
    pub text: String,
}

/// Returned by the media upload endpoint, only the string form of the id is used
#[derive(Deserialize, Debug, Serialize)]
pub struct UploadedMedia {
    pub media_id_string: String,
}

/// Result of the delete
/// The API may answer 2xx without confirming the deletion, which is kept apart from a failure
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted,
    Unconfirmed(serde_json::Value),
}

impl DeleteOutcome {
    /// Interpret a 2xx body of `DELETE /2/tweets/:id`
    pub fn from_body(body: serde_json::Value) -> DeleteOutcome {
        let deleted = body
            .pointer("/data/deleted")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);
        if deleted {
            DeleteOutcome::Deleted
        } else {
            DeleteOutcome::Unconfirmed(body)
        }
    }
}

/// One post-type action
/// Each variant carries only the target it needs, so quote and reply can't be mixed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TweetRequest {
    Post {
        text: String,
        media_ids: Vec<String>,
    },
    Quote {
        text: String,
        quote_tweet_id: String,
        media_ids: Vec<String>,
    },
    Reply {
        text: String,
        in_reply_to_tweet_id: String,
        media_ids: Vec<String>,
    },
}

impl TweetRequest {
    pub fn text(&self) -> &str {
        match self {
            TweetRequest::Post { text, .. }
            | TweetRequest::Quote { text, .. }
            | TweetRequest::Reply { text, .. } => text,
        }
    }

    pub fn media_ids(&self) -> &[String] {
        match self {
            TweetRequest::Post { media_ids, .. }
            | TweetRequest::Quote { media_ids, .. }
            | TweetRequest::Reply { media_ids, .. } => media_ids,
        }
    }

    /// JSON body for `POST /2/tweets`
    pub fn body(&self) -> CreateTweetBody<'_> {
        let media_ids = self.media_ids();
        let mut body = CreateTweetBody {
            text: self.text(),
            quote_tweet_id: None,
            reply: None,
            media: (!media_ids.is_empty()).then(|| MediaBody { media_ids }),
        };
        match self {
            TweetRequest::Post { .. } => {}
            TweetRequest::Quote { quote_tweet_id, .. } => {
                body.quote_tweet_id = Some(quote_tweet_id.as_str());
            }
            TweetRequest::Reply {
                in_reply_to_tweet_id,
                ..
            } => {
                body.reply = Some(ReplyBody {
                    in_reply_to_tweet_id: in_reply_to_tweet_id.as_str(),
                });
            }
        }
        body
    }
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct CreateTweetBody<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_tweet_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<ReplyBody<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaBody<'a>>,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct ReplyBody<'a> {
    pub in_reply_to_tweet_id: &'a str,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct MediaBody<'a> {
    pub media_ids: &'a [String],
}
