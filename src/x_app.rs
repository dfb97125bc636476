//! App module and interface between CLI and Twitter Client/APIs
//! pub methods are expected to call from [`#main`]
use std::path::PathBuf;

use anyhow::Result;
use log::{debug, info, warn};

use crate::error::XError;
use crate::tweet_ref::resolve_id;
use crate::twitter_client::TwitterClientTrait;
use crate::twitter_object::{CreatedTweet, DeleteOutcome, TweetRequest};

/// Maximum length of a tweet, counted in UTF-16 code units
pub const MAX_TWEET_LENGTH: usize = 280;

/// Reject empty text and text over [`MAX_TWEET_LENGTH`]
pub fn validate_text(text: &str) -> Result<(), XError> {
    if text.trim().is_empty() {
        return Err(XError::Validation("Tweet text is empty".to_string()));
    }
    let length = text.encode_utf16().count();
    if length > MAX_TWEET_LENGTH {
        return Err(XError::Validation(format!(
            "Tweet is {} chars (max {}), {} over the limit",
            length,
            MAX_TWEET_LENGTH,
            length - MAX_TWEET_LENGTH
        )));
    }
    Ok(())
}

/// Upload the media files one by one
///
/// The ids are in the same order as the paths, and the first failure stops the remaining uploads
pub fn upload_all(tw_client: &impl TwitterClientTrait, paths: &[PathBuf]) -> Result<Vec<String>> {
    let mut media_ids = Vec::with_capacity(paths.len());
    for (index, path) in paths.iter().enumerate() {
        debug!("Uploading media {} / {}", index + 1, paths.len());
        let media_id = tw_client.upload_media(path)?;
        info!("Uploaded {} as media {}", path.display(), media_id);
        media_ids.push(media_id);
    }
    Ok(media_ids)
}

/// Post a new tweet
/// * text: tweet text, validated before anything is uploaded
/// * media: files to attach
pub fn post(
    tw_client: &impl TwitterClientTrait,
    text: String,
    media: &[PathBuf],
) -> Result<CreatedTweet> {
    validate_text(&text)?;
    let media_ids = upload_all(tw_client, media)?;
    publish(tw_client, TweetRequest::Post { text, media_ids })
}

/// Quote the target tweet
/// * target: tweet id or permalink
pub fn quote(
    tw_client: &impl TwitterClientTrait,
    target: &str,
    text: String,
    media: &[PathBuf],
) -> Result<CreatedTweet> {
    validate_text(&text)?;
    let quote_tweet_id = resolve_id(target);
    let media_ids = upload_all(tw_client, media)?;
    publish(
        tw_client,
        TweetRequest::Quote {
            text,
            quote_tweet_id,
            media_ids,
        },
    )
}

/// Reply to the target tweet
/// * target: tweet id or permalink
pub fn reply(
    tw_client: &impl TwitterClientTrait,
    target: &str,
    text: String,
    media: &[PathBuf],
) -> Result<CreatedTweet> {
    validate_text(&text)?;
    let in_reply_to_tweet_id = resolve_id(target);
    let media_ids = upload_all(tw_client, media)?;
    publish(
        tw_client,
        TweetRequest::Reply {
            text,
            in_reply_to_tweet_id,
            media_ids,
        },
    )
}

/// Delete the target tweet
/// A 2xx response that doesn't confirm the deletion is returned as [`DeleteOutcome::Unconfirmed`]
pub fn delete(tw_client: &impl TwitterClientTrait, target: &str) -> Result<DeleteOutcome> {
    let tweet_id = resolve_id(target);
    info!("Deleting {}", tweet_id);
    let outcome = tw_client.delete_tweet(&tweet_id)?;
    if let DeleteOutcome::Unconfirmed(body) = &outcome {
        warn!("Delete of {} was accepted but not confirmed: {}", tweet_id, body);
    }
    Ok(outcome)
}

fn publish(tw_client: &impl TwitterClientTrait, request: TweetRequest) -> Result<CreatedTweet> {
    info!("Posting: \"{}\"", request.text());
    let created = tw_client.create_tweet(&request)?;
    debug!("Created tweet id: {}", created.id);
    Ok(created)
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::thread::sleep;
    use std::time::Duration;

    use anyhow::anyhow;
    use mockall::predicate::*;
    use mockall::Sequence;

    use super::*;
    use crate::twitter_client::MockTwitterClientTrait;

    fn created(id: &str) -> CreatedTweet {
        CreatedTweet {
            id: id.to_string(),
            text: String::new(),
        }
    }

    #[test]
    fn text_length_boundary() {
        assert!(validate_text(&"a".repeat(280)).is_ok());
        match validate_text(&"a".repeat(281)) {
            Err(XError::Validation(message)) => {
                assert!(message.contains("281"));
                assert!(message.contains("1 over the limit"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn text_length_counts_utf16_units() {
        // each emoji is a surrogate pair
        assert!(validate_text(&"🐦".repeat(140)).is_ok());
        assert!(validate_text(&"🐦".repeat(141)).is_err());
        assert!(validate_text(&"あ".repeat(280)).is_ok());
    }

    #[test]
    fn empty_text_is_rejected() {
        assert!(matches!(validate_text(""), Err(XError::Validation(_))));
        assert!(matches!(validate_text("  \n"), Err(XError::Validation(_))));
    }

    #[test]
    fn upload_all_keeps_input_order() {
        let mut tw_client = MockTwitterClientTrait::new();
        tw_client.expect_upload_media().returning(|path: &Path| {
            // the first file is slower than the second one
            if path.ends_with("a.png") {
                sleep(Duration::from_millis(50));
                Ok("id-a".to_string())
            } else {
                Ok("id-b".to_string())
            }
        });
        let ids = upload_all(
            &tw_client,
            &[PathBuf::from("a.png"), PathBuf::from("b.png")],
        )
        .unwrap();
        assert_eq!(ids, vec!["id-a", "id-b"]);
    }

    #[test]
    fn upload_all_stops_at_first_failure() {
        let mut tw_client = MockTwitterClientTrait::new();
        let mut seq = Sequence::new();
        tw_client
            .expect_upload_media()
            .with(eq(Path::new("a.png")))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(anyhow!("unreadable")));
        tw_client
            .expect_upload_media()
            .with(eq(Path::new("b.png")))
            .never();
        let result = upload_all(
            &tw_client,
            &[PathBuf::from("a.png"), PathBuf::from("b.png")],
        );
        assert!(result.is_err());
    }

    #[test]
    fn post_uploads_before_creating() {
        let mut tw_client = MockTwitterClientTrait::new();
        let mut seq = Sequence::new();
        tw_client
            .expect_upload_media()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("m1".to_string()));
        tw_client
            .expect_upload_media()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("m2".to_string()));
        tw_client
            .expect_create_tweet()
            .with(eq(TweetRequest::Post {
                text: "with pictures".to_string(),
                media_ids: vec!["m1".to_string(), "m2".to_string()],
            }))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(created("1")));

        let result = post(
            &tw_client,
            "with pictures".to_string(),
            &[PathBuf::from("one.png"), PathBuf::from("two.png")],
        )
        .unwrap();
        assert_eq!(result.id, "1");
    }

    #[test]
    fn invalid_text_makes_no_calls() {
        let mut tw_client = MockTwitterClientTrait::new();
        tw_client.expect_upload_media().never();
        tw_client.expect_create_tweet().never();
        let err = post(&tw_client, "a".repeat(281), &[PathBuf::from("one.png")]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<XError>(),
            Some(XError::Validation(_))
        ));
    }

    #[test]
    fn quote_resolves_permalink() {
        let mut tw_client = MockTwitterClientTrait::new();
        tw_client
            .expect_create_tweet()
            .withf(|request| {
                matches!(request, TweetRequest::Quote { quote_tweet_id, media_ids, .. }
                    if quote_tweet_id == "1234567890" && media_ids.is_empty())
            })
            .times(1)
            .returning(|_| Ok(created("2")));
        let result = quote(
            &tw_client,
            "https://x.com/user/status/1234567890",
            "so true".to_string(),
            &[],
        )
        .unwrap();
        assert_eq!(result.id, "2");
    }

    #[test]
    fn reply_never_carries_quote_target() {
        let mut tw_client = MockTwitterClientTrait::new();
        tw_client
            .expect_create_tweet()
            .withf(|request| {
                let body = serde_json::to_value(request.body()).unwrap();
                body.get("quote_tweet_id").is_none()
                    && body["reply"]["in_reply_to_tweet_id"] == "99"
            })
            .times(1)
            .returning(|_| Ok(created("3")));
        reply(&tw_client, "99", "thanks".to_string(), &[]).unwrap();
    }

    #[test]
    fn delete_resolves_permalink() {
        let mut tw_client = MockTwitterClientTrait::new();
        tw_client
            .expect_delete_tweet()
            .with(eq("555"))
            .times(1)
            .returning(|_| Ok(DeleteOutcome::Deleted));
        let outcome = delete(&tw_client, "https://twitter.com/me/status/555").unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
    }

    #[test]
    fn delete_unconfirmed_is_not_an_error() {
        let mut tw_client = MockTwitterClientTrait::new();
        tw_client.expect_delete_tweet().returning(|_| {
            Ok(DeleteOutcome::Unconfirmed(
                serde_json::json!({ "data": { "deleted": false } }),
            ))
        });
        let outcome = delete(&tw_client, "1").unwrap();
        assert!(matches!(outcome, DeleteOutcome::Unconfirmed(_)));
    }
}
