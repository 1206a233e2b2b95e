use std::fs::File;
use std::io;
use std::io::BufReader;

use clap::Parser;
use log::{debug, error, warn, LevelFilter};
use serde::Serialize;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use thiserror::Error;

use reqview::args::{Args, ArgsError};
use reqview::common::cookie::Cookie;
use reqview::common::session::MemorySessionManager;
use reqview::http::RequestView;
use reqview::parse::error::ParsingError;
use reqview::parse::request::read_request;
use reqview::util::multi_value::MultiValueMap;

/// Error for when a request can't be reported.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Args(#[from] ArgsError),
    #[error("Could not open request: {0}")]
    Io(#[from] io::Error),
    #[error("Could not read request: {0}")]
    Parsing(#[from] ParsingError),
    #[error("Could not write report: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct Parameter<'a> {
    name: &'a str,
    values: &'a [String],
}

/// Everything a handler would see of the request.
#[derive(Serialize)]
struct Report<'a> {
    method: String,
    method_allowed: bool,
    uri: String,
    path: &'a str,
    query: Vec<Parameter<'a>>,
    accepts: Vec<String>,
    accept_languages: Vec<String>,
    content_type: Option<String>,
    content_length: Option<u64>,
    cookies: Vec<Cookie>,
    session: Option<String>,
    parameters: Vec<Parameter<'a>>,
    body: Option<String>,
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    if let Err(err) = TermLogger::init(level, simplelog::Config::default(), TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("Could not start logging: {}", err);
    }

    if let Err(err) = run(&args) {
        error!("{}", err);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let config = args.config()?;

    let request = match &args.file {
        Some(path) => read_request(&mut BufReader::new(File::open(path)?))?,
        None => read_request(&mut io::stdin().lock())?,
    };
    debug!("Read {} request for {}", request.method, request.uri);

    let sessions = MemorySessionManager::default();
    let view = RequestView::new(&request, &sessions).with_config(config);

    let report = Report {
        method: view.method().to_string(),
        method_allowed: args.method_rule().matches(view.method()),
        uri: view.uri().to_string(),
        path: view.path(),
        query: parameters(view.query_map()),
        accepts: view.accepts().iter().map(ToString::to_string).collect(),
        accept_languages: view.accept_languages().iter().map(ToString::to_string).collect(),
        content_type: view.content_type().map(|content_type| content_type.to_string()),
        content_length: view.content_length(),
        cookies: view.cookies(),
        session: view.session().map(|session| session.id()),
        parameters: parameters(view.parameter_map()),
        body: body_text(&view),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn parameters(map: &MultiValueMap<String, String>) -> Vec<Parameter<'_>> {
    map.iter().map(|(name, values)| Parameter { name, values }).collect()
}

fn body_text(view: &RequestView<'_>) -> Option<String> {
    match view.body() {
        Ok(Some(body)) => match body.string() {
            Ok(text) => Some(text),
            Err(err) => {
                warn!("Body could not be read: {}", err);
                None
            }
        },
        Ok(None) => None,
        Err(err) => {
            debug!("{}", err);
            None
        }
    }
}
