//! # musician-client
//!
//! Async client for the orchestra hosting control-panel API. It logs in with
//! a username and password (or restores an issued token), resolves logical
//! route names to API paths and turns the JSON it gets back into typed
//! models: domains, mail addresses, mailboxes, mailing lists, databases, SaaS
//! instances, websites, bills and payment sources.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use musician_client::{Orchestra, OrchestraConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OrchestraConfig::new("https://panel.example.org/api/")?;
//!     let client = Orchestra::login(config, "ana", "secret").await?;
//!     if client.auth_token().is_none() {
//!         return Err("invalid username or password".into());
//!     }
//!
//!     for domain in client.retrieve_domain_list().await? {
//!         println!(
//!             "{} ({} mails, {}% disk)",
//!             domain.name,
//!             domain.mails.len(),
//!             domain.usage.percent
//!         );
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Raw requests
//!
//! Anything not covered by a typed call goes through [`ApiRequest`]:
//!
//! ```rust,no_run
//! # use musician_client::*;
//! # async fn example(client: &Orchestra) -> Result<()> {
//! let response = client
//!     .send(ApiRequest::get().resource("address-list").querystring("domain=3"))
//!     .await?;
//! if response.status == 404 {
//!     // handle it here instead of matching on an error
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every call returns [`Result<T, OrchestraError>`](OrchestraError).
//! [`Orchestra::request`] fails on any status >= 400 while
//! [`Orchestra::send`] hands the status back. Typed calls map the cases
//! callers branch on:
//!
//! - [`OrchestraError::PermissionDenied`]: profile requested without valid credentials
//! - [`OrchestraError::NotFound`]: domain or bill detail returned 404
//! - [`OrchestraError::UnknownService`]: no list route for the service
//! - [`OrchestraError::NoReverseMatch`]: unknown route name
//!
//! Nothing is retried.

mod client;
mod config;
mod error;
mod http_client;
mod pagination;
mod request;
pub mod routes;
mod types;
mod usage;
mod utils;

pub use client::{CredentialStatus, Orchestra};
pub use config::{AddressGrouping, OrchestraConfig, ResourceLimits, SchemaPolicy};
pub use error::{OrchestraError, Result};
pub use http_client::{
    HttpTransport, Method, RequestBody, Transport, TransportRequest, TransportResponse,
};
pub use pagination::{DEFAULT_PER_PAGE, PER_PAGE_VALUES, PaginatedResponse, PaginationParams};
pub use request::{ApiRequest, ApiResponse, Rendering, ResponseBody, Target};
pub use types::{
    AddressRecord, ApiModel, Bill, BillDocument, BillingContact, DatabaseService, DatabaseUser,
    Domain, DomainRecord, DomainRef, GroupKey, MailService, MailServiceType, MailTypeDetail,
    Mailbox, MailboxAddress, MailboxRef, MailinglistService, NewMailAddress, PaymentSource,
    SaasService, UserAccount, WebApp, WebSite, WebSiteContent, group_addresses, parse_list,
    parse_one,
};
pub use usage::{PERCENT_STEPS, UsageQuota, bucket};
pub use utils::{datetime, log_sanitizer};
