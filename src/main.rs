//! CLI tool for posting, quoting, replying to and deleting tweets on X(Twitter)
//! Requests are signed with OAuth 1.0a using pre-provisioned access tokens
use anyhow::Result;
use env_logger::Env;
use structopt::StructOpt;
use twitter_client::TwitterClient;
mod cli;
mod credential;
mod error;
mod http;
mod oauth;
mod tweet_ref;
mod twitter_client;
mod twitter_object;
mod x_app;

use cli::{join_text, Action::*, CommandLineArgs};
use credential::Credentials;
use error::XError;
use twitter_object::{CreatedTweet, DeleteOutcome};

/// Entrypoint Function
///
/// It will use the following environment variables
/// * `XPOST_LOG_LEVEL` Log level setting e.g. `XPOST_LOG_LEVEL=xpost=debug`
/// * `X_API_KEY` Consumer Key
/// * `X_API_KEY_SECRET` (or `X_API_SECRET`) Consumer Secret
/// * `X_ACCESS_TOKEN` Access Token
/// * `X_ACCESS_TOKEN_SECRET` (or `X_ACCESS_SECRET`) Access Token Secret
///
/// This is the only place which decides the exit code
fn main() {
    let env = Env::default().filter_or("XPOST_LOG_LEVEL", "info");
    env_logger::init_from_env(env);

    // 引数なしはヘルプ扱いで正常終了
    if std::env::args_os().len() < 2 {
        let mut app = CommandLineArgs::clap();
        if app.print_long_help().is_ok() {
            println!();
        }
        return;
    }

    // help / -h / 不明なコマンドは clap が終了コード(0 or 1)を決める
    let args = CommandLineArgs::from_args();

    if let Err(err) = run(args) {
        report(&err);
        std::process::exit(1);
    }
}

fn run(args: CommandLineArgs) -> Result<()> {
    let CommandLineArgs {
        action,
        config_file,
    } = args;

    // 認証情報より先にテキストを検証する
    if let Some(text) = action.text() {
        x_app::validate_text(&text)?;
    }

    let credential_file = match config_file {
        Some(path) => credential::load_credential_file(&path, true)?,
        None => match credential::find_default_config_file() {
            Some(path) => credential::load_credential_file(&path, false)?,
            None => None,
        },
    };
    let credentials = Credentials::resolve(credential_file)?;
    let tw_client = TwitterClient::new(credentials)?;

    match action {
        Post { media, text } => {
            print_created(&x_app::post(&tw_client, join_text(&text), &media)?)
        }
        Quote {
            target,
            media,
            text,
        } => print_created(&x_app::quote(
            &tw_client,
            &target,
            join_text(&text),
            &media,
        )?),
        Reply {
            target,
            media,
            text,
        } => print_created(&x_app::reply(
            &tw_client,
            &target,
            join_text(&text),
            &media,
        )?),
        Delete { target } => match x_app::delete(&tw_client, &target)? {
            DeleteOutcome::Deleted => println!("✓ Deleted {}", tweet_ref::resolve_id(&target)),
            DeleteOutcome::Unconfirmed(body) => println!(
                "⚠ Delete request was accepted but not confirmed:\n{}",
                serde_json::to_string_pretty(&body)?
            ),
        },
    }
    Ok(())
}

fn print_created(created: &CreatedTweet) {
    println!("✓ Posted!");
    println!("  https://x.com/i/status/{}", created.id);
}

/// Print the error in the way the user can act on it
fn report(err: &anyhow::Error) {
    match err.downcast_ref::<XError>() {
        Some(XError::Configuration { missing }) => {
            eprintln!("Missing required environment variables:");
            for name in missing {
                eprintln!("  - {}", name);
            }
            eprintln!("\nSet them in your shell or in ~/.xpost.json.");
        }
        Some(XError::Validation(message)) => {
            eprintln!("Error: {}", message);
            eprintln!("Usage: xpost post [--media <path>]... \"Your tweet here\"");
            eprintln!("Run `xpost help` for all commands.");
        }
        Some(api_error @ XError::Api { .. }) => {
            eprintln!("✗ Failed: {}", api_error);
            let detail = api_error.payload().and_then(|payload| {
                payload
                    .get("detail")
                    .and_then(|detail| detail.as_str())
                    .map(str::to_string)
            });
            if let Some(detail) = detail {
                eprintln!("  {}", detail);
            }
        }
        _ => eprintln!("✗ Failed: {:#}", err),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::cli::{Action, CommandLineArgs};
    use crate::error::XError;
    use crate::run;

    #[test]
    fn text_is_checked_before_credentials() {
        let args = CommandLineArgs {
            action: Action::Post {
                media: vec![],
                text: vec![],
            },
            config_file: Some(PathBuf::from("/nonexistent/xpost-credentials.json")),
        };
        let err = run(args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<XError>(),
            Some(XError::Validation(_))
        ));
    }

    #[test]
    fn too_long_reply_is_rejected_first() {
        let args = CommandLineArgs {
            action: Action::Reply {
                target: "1".to_string(),
                media: vec![PathBuf::from("/nonexistent/image.png")],
                text: vec!["a".repeat(281)],
            },
            config_file: Some(PathBuf::from("/nonexistent/xpost-credentials.json")),
        };
        let err = run(args).unwrap_err();
        match err.downcast_ref::<XError>() {
            Some(XError::Validation(message)) => assert!(message.contains("1 over the limit")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
