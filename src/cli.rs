//! Definition of CLI commands/sub commands + its option parameters
use std::path::PathBuf;
use structopt::clap::AppSettings;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "xpost", about = "Simple X (Twitter) posting CLI")]
pub struct CommandLineArgs {
    #[structopt(subcommand)]
    pub action: Action,

    /// Use a different credential file.
    #[structopt(parse(from_os_str), short, long)]
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, StructOpt)]
pub enum Action {
    #[structopt(
        about = "Post a tweet",
        settings = &[AppSettings::TrailingVarArg, AppSettings::AllowLeadingHyphen]
    )]
    Post {
        #[structopt(
            short,
            long,
            parse(from_os_str),
            number_of_values = 1,
            help = "Attach a media file, can be repeated"
        )]
        media: Vec<PathBuf>,

        #[structopt(
            allow_hyphen_values = true,
            help = "Tweet text, the words are joined with a space"
        )]
        text: Vec<String>,
    },
    #[structopt(
        about = "Quote a tweet",
        settings = &[AppSettings::TrailingVarArg, AppSettings::AllowLeadingHyphen]
    )]
    Quote {
        #[structopt(help = "Tweet id or URL e.g. https://x.com/user/status/1234567890")]
        target: String,

        #[structopt(
            short,
            long,
            parse(from_os_str),
            number_of_values = 1,
            help = "Attach a media file, can be repeated"
        )]
        media: Vec<PathBuf>,

        #[structopt(
            allow_hyphen_values = true,
            help = "Tweet text, the words are joined with a space"
        )]
        text: Vec<String>,
    },
    #[structopt(
        about = "Reply to a tweet",
        settings = &[AppSettings::TrailingVarArg, AppSettings::AllowLeadingHyphen]
    )]
    Reply {
        #[structopt(help = "Tweet id or URL e.g. https://x.com/user/status/1234567890")]
        target: String,

        #[structopt(
            short,
            long,
            parse(from_os_str),
            number_of_values = 1,
            help = "Attach a media file, can be repeated"
        )]
        media: Vec<PathBuf>,

        #[structopt(
            allow_hyphen_values = true,
            help = "Tweet text, the words are joined with a space"
        )]
        text: Vec<String>,
    },
    #[structopt(about = "Delete your tweet")]
    Delete {
        #[structopt(help = "Tweet id or URL e.g. https://x.com/user/status/1234567890")]
        target: String,
    },
}

impl Action {
    /// Joined tweet text of post/quote/reply, `None` for delete
    pub fn text(&self) -> Option<String> {
        match self {
            Action::Post { text, .. }
            | Action::Quote { text, .. }
            | Action::Reply { text, .. } => Some(join_text(text)),
            Action::Delete { .. } => None,
        }
    }
}

/// Join the words of the text arguments
pub fn join_text(words: &[String]) -> String {
    words.join(" ")
}
