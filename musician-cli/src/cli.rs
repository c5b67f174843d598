use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "musician")]
#[command(about = "Query and manage an orchestra hosting account from the command line")]
#[command(version)]
pub struct Cli {
    /// API root, e.g. https://panel.example.org/api/
    #[arg(long, env = "MUSICIAN_API_BASE_URL")]
    pub base_url: Option<String>,

    /// JSON configuration file (overrides --base-url)
    #[arg(long, env = "MUSICIAN_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(short, long, env = "MUSICIAN_USERNAME")]
    pub username: Option<String>,

    #[arg(short, long, env = "MUSICIAN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Previously issued token; skips the login call
    #[arg(long, env = "MUSICIAN_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the account profile
    Profile,
    /// Check whether the credentials are accepted
    Verify,
    /// List domains with their mail addresses, websites and usage
    Domains(ListArgs),
    /// Show one domain
    Domain { id: String },
    /// List mail addresses grouped by mailbox
    Mails(ListArgs),
    Mailboxes(ListArgs),
    /// List mailing lists
    Lists(ListArgs),
    Databases(ListArgs),
    Saas(ListArgs),
    Websites(ListArgs),
    Bills(ListArgs),
    /// Download the document of a bill
    BillDocument {
        id: String,
        /// Output file
        #[arg(short, long)]
        out: PathBuf,
    },
    PaymentSources(ListArgs),
    /// Mailboxes in use against the account allowance
    MailboxUsage,
    /// Change the password of a mailbox
    SetMailboxPassword {
        id: String,
        #[arg(long, env = "MUSICIAN_MAILBOX_PASSWORD", hide_env_values = true)]
        new_password: String,
    },
    /// Delete a mail address
    DeleteMail { id: String },
}

#[derive(Args, Clone, Default)]
pub struct ListArgs {
    /// Raw query string sent to the backend, e.g. "domain=3"
    #[arg(long)]
    pub filter: Option<String>,

    #[arg(long)]
    pub page: Option<String>,

    /// One of 5, 10, 20, 50
    #[arg(long)]
    pub per_page: Option<String>,
}
