#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::env;
use std::io;
use std::io::IsTerminal;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use owo_colors::OwoColorize;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::configuration::PAGE_URL_ARG;
use crate::domain::models::ActionKind;
use crate::domain::services::ActionDispatcher;
use crate::domain::services::OutputReconciler;
use crate::infrastructure::backends::BackendManager;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

/// Directory the debug log is written to.
pub fn log_dir() -> path::PathBuf {
    if let Ok(dir) = env::var("JUDGEDESK_LOG_DIR") {
        return path::PathBuf::from(dir);
    }

    return dirs::cache_dir()
        .unwrap_or_else(env::temp_dir)
        .join("judgedesk");
}

/// Renders the visible result tabs of a reconciled output, in tab order.
pub fn format_output(output: &OutputReconciler, styled: bool) -> String {
    if !output.is_visible() {
        return "The judge returned no output.".to_string();
    }

    return output
        .visible_fields()
        .iter()
        .map(|field| {
            let mut header = format!("== {} ==", field.title());
            if styled {
                header = header.bold().underline().to_string();
            }

            return format!("{header}\n{}", output.text(*field).trim_end());
        })
        .collect::<Vec<String>>()
        .join("\n\n");
}

fn require_problem_id() -> Result<String> {
    let problem_id = Config::get(ConfigKey::ProblemId);
    if problem_id.is_empty() {
        bail!("No problem selected. Pass --problem-id, or --url with a problem page URL.");
    }

    return Ok(problem_id);
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

/// Custom input for a headless action. Empty when no input file is given,
/// matching what the editor sends with an empty input box.
async fn read_custom_input(matches: &ArgMatches) -> Result<String> {
    match matches.get_one::<String>("stdin-file") {
        Some(stdin_file) => return Ok(fs::read_to_string(stdin_file).await?),
        None => return Ok("".to_string()),
    }
}

async fn dispatch_headless(action: ActionKind, matches: &ArgMatches) -> Result<()> {
    let problem_id = require_problem_id()?;

    let Some(code_file) = matches.get_one::<String>("file") else {
        bail!("A code file is required, pass it with --file.");
    };
    let code = fs::read_to_string(code_file).await?;
    let stdin = read_custom_input(matches).await?;

    let dispatcher = ActionDispatcher::new(BackendManager::get()?, &problem_id);
    let outcome = dispatcher
        .dispatch(action, &code, &Config::get(ConfigKey::Language), &stdin)
        .await;

    let mut output = OutputReconciler::default();
    output.reconcile(&outcome.result);

    println!("{}", format_output(&output, io::stdout().is_terminal()));

    return Ok(());
}

async fn create_chatspace() -> Result<()> {
    require_problem_id()?;
    let mut page = Config::page_location()?;

    let session_id = BackendManager::get()?.create_chatspace().await?;
    page.replace_session(&session_id);

    println!("{}", page.as_str());
    return Ok(());
}

fn subcommand_action(action: ActionKind) -> Command {
    let about = match action {
        ActionKind::Run => "Runs code against the problem's sample input.",
        ActionKind::Submit => "Submits code for judging against every test case.",
        ActionKind::Testcase => "Runs code against custom input.",
    };

    return Command::new(action.to_string())
        .about(about)
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .help("Path to the source file to send.")
                .num_args(1)
                .required(true),
        )
        .arg(
            Arg::new("stdin-file")
                .short('i')
                .long("stdin-file")
                .help("Path to a file used as custom input.")
                .num_args(1),
        );
}

fn subcommand_chatspace() -> Command {
    return Command::new("chatspace")
        .about("Manage shared chat sessions.")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("create")
                .about("Creates a chat session for the problem and prints its shareable URL."),
        );
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for judgedesk")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running judgedesk with environment variable RUST_LOG=judgedesk")
        );
}

fn arg_config(key: ConfigKey, env_name: &'static str, help: &str) -> Arg {
    let default = Config::default(key);
    let mut help = help.to_string();
    if !default.is_empty() {
        help = format!("{help} [default: {default}]");
    }

    return Arg::new(key.to_string())
        .long(key.to_string())
        .env(env_name)
        .num_args(1)
        .help(help)
        .global(true);
}

pub fn build() -> Command {
    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    return Command::new("judgedesk")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .arg_required_else_help(false)
        .subcommand(subcommand_action(ActionKind::Run))
        .subcommand(subcommand_action(ActionKind::Submit))
        .subcommand(subcommand_action(ActionKind::Testcase))
        .subcommand(subcommand_chatspace())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .help("Path to a source file to open in the editor.")
                .num_args(1),
        )
        .arg(
            Arg::new(PAGE_URL_ARG)
                .long(PAGE_URL_ARG)
                .env("JUDGEDESK_URL")
                .num_args(1)
                .help("Full problem page URL, such as a shared chat link. Sets the base URL, problem ID and chat session at once.")
                .global(true),
        )
        .arg(
            arg_config(ConfigKey::BaseUrl, "JUDGEDESK_BASE_URL", "Root URL of the judge site."),
        )
        .arg(
            arg_config(ConfigKey::ProblemId, "JUDGEDESK_PROBLEM_ID", "ID of the problem to work on.")
                .short('p'),
        )
        .arg(
            arg_config(ConfigKey::Language, "JUDGEDESK_LANGUAGE", "Language the code is written in.")
                .short('l'),
        )
        .arg(arg_config(
            ConfigKey::Languages,
            "JUDGEDESK_LANGUAGES",
            "Comma separated languages to cycle through in the editor.",
        ))
        .arg(arg_config(
            ConfigKey::CsrfToken,
            "JUDGEDESK_CSRF_TOKEN",
            "Anti-forgery token sent with every request. Read from the cookie when not set.",
        ))
        .arg(arg_config(
            ConfigKey::CsrfCookieName,
            "JUDGEDESK_CSRF_COOKIE_NAME",
            "Name of the cookie holding the anti-forgery token.",
        ))
        .arg(arg_config(
            ConfigKey::Cookie,
            "JUDGEDESK_COOKIE",
            "Cookie header sent to the judge, as copied from a logged in browser.",
        ))
        .arg(arg_config(
            ConfigKey::Chatspace,
            "JUDGEDESK_CHATSPACE",
            "Chat session ID to join on start.",
        ))
        .arg(arg_config(
            ConfigKey::RequestTimeout,
            "JUDGEDESK_REQUEST_TIMEOUT",
            "Time to wait in milliseconds for the judge to answer a request.",
        ))
        .arg(arg_config(
            ConfigKey::ConnectTimeout,
            "JUDGEDESK_CONNECT_TIMEOUT",
            "Time to wait in milliseconds for the chat channel to connect.",
        ))
        .arg(
            arg_config(ConfigKey::ConfigFile, "JUDGEDESK_CONFIG_FILE", "Path to configuration file")
                .short('c'),
        );
}

/// Handles subcommands. Returns the code to open in the editor when the
/// terminal UI should start.
pub async fn parse() -> Result<Option<String>> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    let log_path = log_dir().join("debug.log");
                    println!("{}", log_path.to_string_lossy());
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(None);
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(None);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(None);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(None);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(None);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(None);
            }
        },
        Some(("chatspace", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            match subcmd_matches.subcommand() {
                Some(("create", _)) => create_chatspace().await?,
                _ => subcommand_chatspace().print_long_help()?,
            }
            return Ok(None);
        }
        Some((name, subcmd_matches)) => {
            let Some(action) = ActionKind::parse(name) else {
                bail!(format!("Unknown command {name}"));
            };
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            dispatch_headless(action, subcmd_matches).await?;
            return Ok(None);
        }
        None => {
            Config::load(build(), vec![&matches]).await?;
            require_problem_id()?;
        }
    }

    if let Some(code_file) = matches.get_one::<String>("file") {
        return Ok(Some(fs::read_to_string(code_file).await?));
    }

    return Ok(Some("".to_string()));
}
