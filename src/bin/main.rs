mod config;

use std::fs;
use std::process;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use failure::{bail, format_err, Error};
use fitbit::{Activities, FitbitAuth, FitbitClient, RefreshingTokenSource, Token, UserService};
use log::{debug, info};
use serde::Serialize;
use url::Url;

use config::Config;

const REDIRECT_ADDR: &str = "localhost:8080";

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("error: {}", e);
        for cause in e.iter_causes() {
            eprintln!("  caused by: {}", cause);
        }
        process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let matches = App::new("Fitbit Grabber")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("config")
                .long("config")
                .global(true)
                .takes_value(true)
                .help("path to a toml config file"),
        )
        .subcommand(SubCommand::with_name("token").about("request an access token"))
        .subcommand(SubCommand::with_name("refresh-token").about("refresh token"))
        .subcommand(SubCommand::with_name("user").about("get user profile"))
        .subcommand(
            SubCommand::with_name("daily-activity-summary")
                .about("get the activity summary for one day")
                .arg(
                    Arg::with_name("date")
                        .long("date")
                        .required(true)
                        .takes_value(true)
                        .help("date to fetch summary for, as YYYY-MM-DD"),
                ),
        )
        .get_matches();

    let conf = Config::load(matches.value_of("config"))?;
    let (client_id, client_secret) = conf.credentials()?;
    let auth = FitbitAuth::new(client_id, client_secret)?;
    let token_file = conf.token_file();

    match matches.subcommand() {
        ("token", Some(_)) => {
            let token = obtain_token(&auth)?;
            save_token(token_file, &token)?;
            info!("token saved to {}", token_file);
        }
        ("refresh-token", Some(_)) => {
            let token = load_token(token_file)?;
            let token = auth.exchange_refresh_token(&token)?;
            save_token(token_file, &token)?;
            info!("token saved to {}", token_file);
        }
        ("user", Some(_)) => {
            with_client(&auth, &conf, |client| print_json(&client.user_profile()?))?;
        }
        ("daily-activity-summary", Some(sub_m)) => {
            let date = parse_date_from(sub_m)?;
            with_client(&auth, &conf, |client| {
                print_json(&client.daily_activity_summary(date)?)
            })?;
        }
        (cmd, _) => bail!("unknown command: {}", cmd),
    }
    Ok(())
}

/// Runs `f` with a client built from the saved token, then writes the token
/// back if it was refreshed along the way.
fn with_client<F>(auth: &FitbitAuth, conf: &Config, f: F) -> Result<(), Error>
where
    F: FnOnce(&FitbitClient) -> Result<(), Error>,
{
    let token_file = conf.token_file();
    let token = load_token(token_file)?;
    let source = Arc::new(RefreshingTokenSource::new(auth.clone(), token.clone()));
    let client = match conf.base_url() {
        Some(base) => FitbitClient::with_base_url(source.clone(), Url::parse(base)?),
        None => FitbitClient::new(source.clone()),
    };

    let res = f(&client);

    let current = source.current();
    if current != token {
        save_token(token_file, &current)?;
        info!("refreshed token saved to {}", token_file);
    }
    res
}

fn parse_date_from(matches: &ArgMatches) -> Result<NaiveDate, Error> {
    let arg = matches
        .value_of("date")
        .ok_or_else(|| format_err!("please give a date"))?;
    Ok(NaiveDate::parse_from_str(arg, "%Y-%m-%d")?)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Walks the user through the authorization code flow: they open the
/// authorize URL, Fitbit redirects back to a one-shot local listener, and the
/// code from that redirect is exchanged for a token.
fn obtain_token(auth: &FitbitAuth) -> Result<Token, Error> {
    let (authorize_url, state) = auth.authorize_url();
    println!("Open this URL in your browser:\n{}\n", authorize_url);

    let server = tiny_http::Server::http(REDIRECT_ADDR)
        .map_err(|e| format_err!("unable to listen on {}: {}", REDIRECT_ADDR, e))?;
    let request = server.recv()?;
    let redirect = Url::parse(&format!("http://{}", REDIRECT_ADDR))?.join(request.url())?;
    debug!("redirected to {}", redirect.path());
    request.respond(tiny_http::Response::from_string("Go back to your terminal :)"))?;

    let param = |name: &str| {
        redirect
            .query_pairs()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.into_owned())
    };
    if param("state").as_ref().map(String::as_str) != Some(state.secret().as_str()) {
        bail!("state param does not match the authorization request");
    }
    let code = param("code").ok_or_else(|| format_err!("query param `code` not found"))?;

    Ok(auth.exchange_code(&code)?)
}

fn save_token(filename: &str, token: &Token) -> Result<(), Error> {
    let json = serde_json::to_string(token)?;
    fs::write(filename, json)?;
    Ok(())
}

fn load_token(filename: &str) -> Result<Token, Error> {
    let contents = fs::read_to_string(filename).map_err(|e| {
        format_err!("unable to read token from {} ({}); run `fitbit-grabber token` first", filename, e)
    })?;
    Ok(serde_json::from_str::<Token>(contents.trim())?)
}
