#![warn(clippy::pedantic)]

mod error;
mod format;
mod names;
mod notifier;
mod run;
mod source;
mod state;
mod surveys;
#[cfg(test)]
mod test_server;

use crate::error::MainError;
use crate::format::Formatter;
use crate::names::NameTables;
use crate::notifier::{ButtondownNotifier, Delivery};
use crate::source::DawumClient;
use chrono::Local;
use shared::error::InitializationError;
use shared::load_config;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), MainError> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber).map_err(InitializationError::from)?;

    let config = load_config().map_err(InitializationError::from)?;
    info!(config = ?config, "config loaded");

    let names = NameTables::default();
    let source = DawumClient::new(&config.dawum)?;
    let notifier = ButtondownNotifier::new(
        &config.buttondown,
        Formatter::new(names, &config.email),
    )?;

    let now = Local::now().naive_local();
    info!(at = %now, "starting poll watcher check");

    let res = run::run(
        &source,
        &notifier,
        &names,
        Path::new(&config.state.path),
        now,
    )
    .await;
    match res {
        Ok(ref report) => {
            if let Some(Delivery::Drafted { subject }) = &report.delivery {
                info!(subject = %subject, "newsletter draft awaits review");
            }
            info!(
                known = report.known,
                current = report.current,
                new = report.new_ids.len(),
                notified = report.delivery.as_ref().is_some_and(Delivery::is_sent),
                "poll watcher check finished"
            );
        }
        Err(ref e) => error!(error = ?e, "poll watcher check failed"),
    }

    res?;
    Ok(())
}
