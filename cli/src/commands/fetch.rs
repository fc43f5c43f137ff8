use anyhow::{Context, Result};

use pantry_core::service::Pantry;

use crate::config::Config;
use crate::paprika::PaprikaClient;

pub(crate) async fn cmd_fetch(
    pantry: &Pantry,
    config: &Config,
    username: Option<String>,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let username = username
        .or_else(|| config.paprika_username.clone())
        .context("No Paprika username. Pass --username or set paprika_username in the config file")?;
    let password = password
        .or_else(|| config.paprika_password.clone())
        .context("No Paprika password. Pass --password or set paprika_password in the config file")?;

    let client = PaprikaClient::new(&config.endpoint, &username, &password);
    let summary = pantry.fetch(&client, config.max_workers).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let total = summary.remote_total;
    if summary.fetched() == 0 {
        println!("All {total} recipes are up to date.");
    } else {
        let fetched = summary.fetched();
        let created = summary.created;
        let updated = summary.updated;
        println!("Fetched {fetched} of {total} recipes ({created} new, {updated} updated).");
    }

    Ok(())
}
