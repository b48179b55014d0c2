//! Simple CLI that reads page HTML from stdin and prints the extraction
//! response as JSON to stdout.
//!
//! Usage: `extract_stdin [--url URL] [--selection TEXT] [--content-type VALUE] [--no-readability]`
//!
//! Logs go to stderr; set `RUST_LOG` to adjust the level.

use page_clip::{handle_extract_request, ExtractResponse, LogNotifier, Options, PageSnapshot};
use std::io::{self, Read};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Default)]
struct Args {
    url: String,
    selection: String,
    content_type: Option<String>,
    use_readability: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        use_readability: true,
        ..Args::default()
    };
    let mut iter = std::env::args().skip(1);

    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--url" => args.url = iter.next().ok_or("--url needs a value")?,
            "--selection" => args.selection = iter.next().ok_or("--selection needs a value")?,
            "--content-type" => {
                args.content_type = Some(iter.next().ok_or("--content-type needs a value")?);
            }
            "--no-readability" => args.use_readability = false,
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    Ok(args)
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "page_clip=info".into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            eprintln!(
                "usage: extract_stdin [--url URL] [--selection TEXT] [--content-type VALUE] [--no-readability]"
            );
            std::process::exit(2);
        }
    };

    let mut html = Vec::new();
    let response = if let Err(err) = io::stdin().read_to_end(&mut html) {
        ExtractResponse::failure(format!("failed to read stdin: {err}"))
    } else {
        let page = PageSnapshot::from_bytes(args.url, &html, args.content_type.as_deref())
            .with_selection(args.selection);
        let options = Options {
            use_readability: args.use_readability,
            ..Options::default()
        };
        handle_extract_request(&page, &options, &LogNotifier)
    };

    match serde_json::to_string(&response) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("failed to serialize response: {err}");
            std::process::exit(1);
        }
    }

    if !response.success {
        std::process::exit(1);
    }
}
