#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

mod application;
mod configuration;
mod domain;
mod infrastructure;

use std::env;
use std::process;

use anyhow::Error;
use anyhow::Result;
use domain::models::Action;
use domain::models::Event;
use domain::services::clipboard::ClipboardService;
use infrastructure::backends::BackendManager;
use infrastructure::channel::ChannelClient;
use owo_colors::OwoColorize;
use tokio::sync::mpsc;
use tokio::task;

use crate::application::cli;
use crate::application::ui;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::services::actions::ActionsService;
use crate::domain::services::ActionDispatcher;
use crate::domain::services::AppState;
use crate::domain::services::ChatSessionManager;

fn handle_error(err: Error) {
    eprintln!(
        "{}",
        format!(
            "Oh no! judgedesk has failed with the following app version and error.\n\nVersion: {}\nCommit: {}\nError: {}",
            env!("CARGO_PKG_VERSION"),
            env!("VERGEN_GIT_DESCRIBE"),
            err
        )
        .red()
    );

    let backtrace = err.backtrace();
    if backtrace.to_string() == "disabled backtrace" {
        let args = env::args().collect::<Vec<String>>().join(" ");
        eprintln!("\nRunning the following can help explain further what the issue is:");
        eprintln!("\nRUST_BACKTRACE=1 RUST_LOG=judgedesk {args}");
        eprintln!("\nThe debug log is written to {}", cli::log_dir().join("debug.log").to_string_lossy());
    } else {
        eprintln!("\n{}", backtrace);
    }

    process::exit(1);
}

async fn run(code: &str) -> Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let problem_id = Config::get(ConfigKey::ProblemId);
    let backend = BackendManager::get()?;
    let dispatcher = ActionDispatcher::new(backend.clone(), &problem_id);

    let page = Config::page_location()?;
    let channel = ChannelClient::from_config(page.base_url(), event_tx.clone())?;
    let chat = ChatSessionManager::new(page, &problem_id, Box::new(channel));

    let mut app_state = AppState::new(
        dispatcher.clone(),
        chat,
        Config::languages(),
        &Config::get(ConfigKey::Language),
        action_tx,
    );
    if !code.is_empty() {
        app_state.set_code(code);
    }

    let mut background_futures = task::JoinSet::new();
    background_futures.spawn(async move {
        return ActionsService::start(backend, dispatcher, event_tx, &mut action_rx).await;
    });

    if let Err(clipboard_err) = ClipboardService::healthcheck() {
        tracing::warn!(err = ?clipboard_err, "Clipboard service is unable to start")
    } else {
        background_futures.spawn(async move {
            return ClipboardService::start().await;
        });
    }

    let ui_future = ui::start(app_state, event_rx);

    return tokio::select!(
        res = background_futures.join_next() => match res {
            Some(Ok(res)) => res,
            Some(Err(join_err)) => Err(join_err.into()),
            None => Ok(()),
        },
        res = ui_future => res,
    );
}

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        ui::destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let file_appender = tracing_appender::rolling::never(cli::log_dir(), "debug.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    if env::var("RUST_LOG")
        .unwrap_or_else(|_| return "".to_string())
        .contains("judgedesk")
    {
        tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(writer)
            .init();
    }

    let code = match cli::parse().await {
        Ok(Some(code)) => code,
        Ok(None) => process::exit(0),
        Err(err) => {
            handle_error(err);
            return;
        }
    };

    if let Err(err) = run(&code).await {
        ui::destruct_terminal_for_panic();
        handle_error(err);
    }

    process::exit(0);
}
