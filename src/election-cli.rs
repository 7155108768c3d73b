//! A command-line front end for the election backend.
//! Status and report evaluation work offline; everything else talks to the
//! backend configured in `Election.toml` or `ELECTION_*` variables.

use std::fs::File;
use std::io::BufReader;

use chrono::{DateTime, Utc};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{error, info};

use election_client::{
    filter::{search, ResultsFilter},
    lifecycle::resolve_status,
    logging::init_logging,
    model::{
        api::{Credentials, Election, ElectionResult},
        common::timestamp::{format_ist, parse_ist_local, parse_timestamp},
    },
    ApiClient, Config, Error, LifecycleEvaluator, Result, SessionStore,
};

const PROGRAM_NAME: &str = "election-cli";

const ABOUT_TEXT: &str = "Work with an election backend from the command line.

EXIT CODES:
     0: Success.
     1: Error.";

const LOG_CONFIG: &str = "log4rs.yaml";

// Argument ids.
const EMAIL: &str = "EMAIL";
const PASSWORD: &str = "PASSWORD";
const START: &str = "START";
const END: &str = "END";
const NOW: &str = "NOW";
const IST: &str = "IST";
const RESULTS_PATH: &str = "RESULTS_PATH";
const SEARCH: &str = "SEARCH";
const OPEN: &str = "OPEN";
const ELECTION_ID: &str = "ELECTION_ID";
const CANDIDATE_ID: &str = "CANDIDATE_ID";
const FILTER: &str = "FILTER";

const NOW_HELP: &str = "Evaluate at this instant instead of the current time.\n\
Zone-less values are UTC.";

const RESULTS_PATH_HELP: &str = "The path to a JSON dump of one election's results,\n\
as returned by `GET /admin/results/election/<election_id>`";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    let now = Arg::new(NOW)
        .long("now")
        .help(NOW_HELP)
        .action(ArgAction::Set);

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .subcommand_required(true)
        .subcommand(
            Command::new("login")
                .about("Sign in and remember the session")
                .arg(Arg::new(EMAIL).required(true))
                .arg(Arg::new(PASSWORD).required(true)),
        )
        .subcommand(Command::new("logout").about("Forget the stored session"))
        .subcommand(Command::new("whoami").about("Show who is signed in"))
        .subcommand(
            Command::new("dashboard")
                .about("Show election, candidate and user totals (admin) or your elections by status (voter)"),
        )
        .subcommand(
            Command::new("status")
                .about("Show the status of an election window")
                .arg(Arg::new(START).required(true))
                .arg(Arg::new(END).required(true))
                .arg(now.clone())
                .arg(
                    Arg::new(IST)
                        .long("ist")
                        .help("Read START and END as IST wall-clock times")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Evaluate a saved results dump")
                .arg(Arg::new(RESULTS_PATH).help(RESULTS_PATH_HELP).required(true))
                .arg(now),
        )
        .subcommand(
            Command::new("elections")
                .about("List elections")
                .arg(
                    Arg::new(SEARCH)
                        .long("search")
                        .help("Only elections whose title contains this")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new(OPEN)
                        .long("open")
                        .help("Only elections you can vote in right now")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("results")
                .about("Show one election's results")
                .arg(
                    Arg::new(ELECTION_ID)
                        .required(true)
                        .value_parser(value_parser!(u64)),
                ),
        )
        .subcommand(
            Command::new("results-all")
                .about("Show results of every election that has opened (admin)")
                .arg(
                    Arg::new(FILTER)
                        .long("filter")
                        .value_parser(["all", "ongoing", "completed"])
                        .default_value("all"),
                ),
        )
        .subcommand(
            Command::new("vote")
                .about("Cast a ballot (voter)")
                .arg(
                    Arg::new(ELECTION_ID)
                        .required(true)
                        .value_parser(value_parser!(u64)),
                )
                .arg(
                    Arg::new(CANDIDATE_ID)
                        .required(true)
                        .value_parser(value_parser!(u64)),
                ),
        )
        .subcommand(Command::new("participated").about("List elections you have voted in (voter)"))
}

/// A required argument, guaranteed present by clap.
fn required<'a, T: Clone + Send + Sync + 'static>(args: &'a ArgMatches, id: &str) -> &'a T {
    args.get_one::<T>(id).unwrap() // Required arguments are guaranteed to be present.
}

fn evaluator(args: &ArgMatches) -> Result<LifecycleEvaluator> {
    match args.get_one::<String>(NOW) {
        Some(now) => Ok(LifecycleEvaluator::at(parse_timestamp("now", now)?)),
        None => Ok(LifecycleEvaluator::now()),
    }
}

/// A client carrying the stored session, if there is one.
fn client(config: &Config) -> Result<ApiClient> {
    let client = ApiClient::new(config)?;
    Ok(match SessionStore::from_config(config).load()? {
        Some(session) => client.with_session(session),
        None => client,
    })
}

fn election_line(election: &Election, evaluator: &LifecycleEvaluator) -> String {
    format!(
        "{}: {} [{}] {} to {}",
        election.id,
        election.title,
        evaluator.status_of(election),
        format_ist(election.start_date),
        format_ist(election.end_date)
    )
}

/// Carry out a command, returning what to print.
async fn execute(args: &ArgMatches, config: &Config) -> Result<String> {
    let store = SessionStore::from_config(config);
    match args.subcommand() {
        Some(("login", args)) => {
            let credentials = Credentials {
                email: required::<String>(args, EMAIL).clone(),
                password: required::<String>(args, PASSWORD).clone(),
            };
            let mut client = ApiClient::new(config)?;
            let session = client.login(&credentials).await?;
            store.save(&session)?;
            Ok(format!(
                "Signed in as {} ({}).",
                session.username().unwrap_or(&credentials.email),
                session.role()
            ))
        }
        Some(("logout", _)) => Ok(if store.clear()? {
            "Signed out.".to_string()
        } else {
            "Not signed in.".to_string()
        }),
        Some(("whoami", _)) => {
            let session = store
                .load()?
                .ok_or_else(|| Error::Unauthorized("not signed in".into()))?;
            let mut line = format!(
                "{} <{}> ({})",
                session.username().unwrap_or("unknown"),
                session.email().unwrap_or("no email"),
                session.role()
            );
            if let Ok(voter_id) = session.voter_id() {
                line.push_str(&format!(", voter id {voter_id}"));
            }
            Ok(line)
        }
        Some(("dashboard", _)) => Ok(client(config)?.dashboard().await?.to_string()),
        Some(("status", args)) => {
            let parse: fn(&str, &str) -> Result<DateTime<Utc>> = if args.get_flag(IST) {
                parse_ist_local
            } else {
                parse_timestamp
            };
            let start = parse("startDate", required::<String>(args, START))?;
            let end = parse("endDate", required::<String>(args, END))?;
            let now = evaluator(args)?.instant();
            Ok(resolve_status(now, start, end).to_string())
        }
        Some(("report", args)) => {
            let path = required::<String>(args, RESULTS_PATH);
            let file = BufReader::new(File::open(path)?);
            let result: ElectionResult = serde_json::from_reader(file)?;
            Ok(evaluator(args)?.report(&result)?.to_string())
        }
        Some(("elections", args)) => {
            let client = client(config)?;
            let evaluator = LifecycleEvaluator::now();
            let elections = if args.get_flag(OPEN) {
                client.open_elections_at(&evaluator).await?
            } else {
                client.elections().await?
            };
            let query = args.get_one::<String>(SEARCH).map_or("", String::as_str);
            let lines: Vec<String> = search(&elections, query)
                .into_iter()
                .map(|election| election_line(election, &evaluator))
                .collect();
            Ok(if lines.is_empty() {
                "No elections found.".to_string()
            } else {
                lines.join("\n")
            })
        }
        Some(("results", args)) => {
            let id = *required::<u64>(args, ELECTION_ID);
            Ok(client(config)?.election_report(id).await?.to_string())
        }
        Some(("results-all", args)) => {
            let filter: ResultsFilter = required::<String>(args, FILTER).parse()?;
            let reports = client(config)?.results_overview(filter).await?;
            Ok(if reports.is_empty() {
                format!("No {filter} results.")
            } else {
                reports
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n\n")
            })
        }
        Some(("vote", args)) => {
            let election = *required::<u64>(args, ELECTION_ID);
            let candidate = *required::<u64>(args, CANDIDATE_ID);
            let receipt = client(config)?.cast_vote(election, candidate).await?;
            Ok(format!("Vote recorded (receipt {}).", receipt.id))
        }
        Some(("participated", _)) => {
            let evaluator = LifecycleEvaluator::now();
            let elections = client(config)?.participated_elections().await?;
            Ok(if elections.is_empty() {
                "You have not voted in any election.".to_string()
            } else {
                elections
                    .iter()
                    .map(|election| election_line(election, &evaluator))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        // `subcommand_required` guarantees one of the above.
        _ => unreachable!("unknown subcommand"),
    }
}

/// Run the command, report the outcome, and return the exit code.
async fn run(args: &ArgMatches, config: &Config) -> u8 {
    match execute(args, config).await {
        Ok(output) => {
            println!("{output}");
            0
        }
        Err(err) => {
            error!("{err}");
            eprintln!("Error: {err}");
            1
        }
    }
}

#[tokio::main]
async fn main() {
    // Set up logging.
    if let Err(err) = init_logging(LOG_CONFIG) {
        eprintln!("{err}");
    }

    let args = cli().get_matches();
    let exit_code = match Config::load() {
        Ok(config) => {
            info!("Loaded config, backend at {:?}", config.api_url().ok());
            run(&args, &config).await
        }
        Err(err) => {
            eprintln!("Error: {err}");
            1
        }
    };
    std::process::exit(exit_code.into())
}
