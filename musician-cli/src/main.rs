//! `musician`: command-line front-end for the orchestra control-panel API.
//!
//! Logs in (or restores a token), runs one client call and prints the result
//! as JSON on stdout. Logs go to stderr; set `RUST_LOG=debug` to see every
//! request.

mod cli;

use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::Parser;
use musician_client::{Orchestra, OrchestraConfig, PaginatedResponse, PaginationParams};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command, ListArgs};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let client = connect(config, &cli).await?;

    match cli.command {
        Command::Profile => print_json(&client.retrieve_profile().await?),
        Command::Verify => {
            let status = client.verify_credentials().await?;
            if status.is_valid() {
                tracing::info!("Credentials are valid");
                Ok(())
            } else {
                bail!("credentials are invalid or expired")
            }
        }
        Command::Domains(args) => print_page(client.retrieve_domain_list().await?, &args),
        Command::Domain { id } => print_json(&client.retrieve_domain(&id).await?),
        Command::Mails(args) => print_page(
            client
                .retrieve_mail_address_list(args.filter.as_deref())
                .await?,
            &args,
        ),
        Command::Mailboxes(args) => print_page(
            client.retrieve_mailbox_list(args.filter.as_deref()).await?,
            &args,
        ),
        Command::Lists(args) => print_page(
            client
                .retrieve_mailinglist_list(args.filter.as_deref())
                .await?,
            &args,
        ),
        Command::Databases(args) => print_page(client.retrieve_database_list().await?, &args),
        Command::Saas(args) => print_page(client.retrieve_saas_list().await?, &args),
        Command::Websites(args) => print_page(client.retrieve_website_list().await?, &args),
        Command::Bills(args) => print_page(client.retrieve_bill_list().await?, &args),
        Command::BillDocument { id, out } => {
            let document = client.retrieve_bill_document(&id).await?;
            std::fs::write(&out, &document.data)
                .with_context(|| format!("failed to write {}", out.display()))?;
            tracing::info!(
                "Saved bill {} ({} bytes) to {}",
                document.id,
                document.data.len(),
                out.display()
            );
            Ok(())
        }
        Command::PaymentSources(args) => {
            print_page(client.retrieve_payment_source_list().await?, &args)
        }
        Command::MailboxUsage => {
            let profile = client.retrieve_profile().await?;
            match client.retrieve_mailbox_usage(&profile).await? {
                Some(usage) => print_json(&usage),
                None => bail!(
                    "no mailbox allowance known for account type '{}'",
                    profile.account_type
                ),
            }
        }
        Command::SetMailboxPassword { id, new_password } => {
            client.set_mailbox_password(&id, &new_password).await?;
            tracing::info!("Password of mailbox {id} changed");
            Ok(())
        }
        Command::DeleteMail { id } => {
            client.delete_mail_address(&id).await?;
            tracing::info!("Mail address {id} deleted");
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<OrchestraConfig> {
    if let Some(path) = &cli.config {
        return OrchestraConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()));
    }
    let Some(base_url) = &cli.base_url else {
        bail!("no API base URL: pass --base-url, --config or set MUSICIAN_API_BASE_URL");
    };
    OrchestraConfig::new(base_url).context("invalid base URL")
}

async fn connect(config: OrchestraConfig, cli: &Cli) -> anyhow::Result<Orchestra> {
    if let Some(token) = &cli.token {
        tracing::debug!("Restoring session from token");
        return Ok(Orchestra::from_token(config, token.clone())?);
    }

    let (Some(username), Some(password)) = (&cli.username, &cli.password) else {
        bail!("no credentials: pass --token or --username and --password");
    };
    let client = Orchestra::login(config, username, password)
        .await
        .context("login request failed")?;
    if client.auth_token().is_none() {
        bail!("invalid username or password");
    }
    tracing::info!("Logged in as {username}");
    Ok(client)
}

fn print_page<T: Serialize>(items: Vec<T>, args: &ListArgs) -> anyhow::Result<()> {
    let params = PaginationParams::from_query(args.page.as_deref(), args.per_page.as_deref());
    print_json(&PaginatedResponse::from_items(items, params))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{text}");
    Ok(())
}
