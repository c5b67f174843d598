//! Read-only calls.

use serde_json::Value;

use super::{CredentialStatus, Orchestra};
use crate::error::{OrchestraError, Result};
use crate::request::ApiRequest;
use crate::routes;
use crate::types::{
    AddressRecord, ApiModel, Bill, BillDocument, DatabaseService, Domain, MailService,
    MailinglistService, Mailbox, PaymentSource, SaasService, UserAccount, WebSite,
    group_addresses, parse_list, parse_one,
};
use crate::usage::UsageQuota;

impl Orchestra {
    /// Raw JSON of `<service>-list`, optionally filtered by a query string.
    pub async fn retrieve_service_list(
        &self,
        service: &str,
        querystring: Option<&str>,
    ) -> Result<Value> {
        let route = format!("{service}-list");
        if !routes::is_registered(&route) {
            return Err(OrchestraError::UnknownService {
                service: service.to_string(),
            });
        }
        let mut request = ApiRequest::get().resource(route);
        if let Some(qs) = querystring {
            request = request.querystring(qs);
        }
        self.request(request).await?.into_json()
    }

    /// Typed list of any model with a list route.
    pub async fn retrieve_list<T: ApiModel>(&self, querystring: Option<&str>) -> Result<Vec<T>> {
        let payload = self.retrieve_service_list(T::SERVICE, querystring).await?;
        parse_list(payload, self.config.schema_policy)
    }

    /// Check the token with a cheap authenticated call.
    pub async fn verify_credentials(&self) -> Result<CredentialStatus> {
        let response = self.send(ApiRequest::get().resource("my-account")).await?;
        if response.is_success() {
            Ok(CredentialStatus::Valid(response.into_json()?))
        } else {
            log::debug!("Credentials rejected with status {}", response.status);
            Ok(CredentialStatus::Invalid)
        }
    }

    /// The caller's own account.
    pub async fn retrieve_profile(&self) -> Result<UserAccount> {
        let response = self.send(ApiRequest::get().resource("my-account")).await?;
        if !response.is_success() {
            log::warn!("Profile request rejected with status {}", response.status);
            return Err(OrchestraError::PermissionDenied {
                detail: "Cannot retrieve profile of an anonymous user.".to_string(),
            });
        }

        let payload = match response.into_json()? {
            Value::Array(items) => items.into_iter().next(),
            object @ Value::Object(_) => Some(object),
            _ => None,
        }
        .ok_or_else(|| OrchestraError::ParseError {
            detail: "account list is empty".to_string(),
        })?;
        parse_one(payload, self.config.schema_policy)
    }

    /// One domain by id, without enrichment.
    pub async fn retrieve_domain(&self, pk: &str) -> Result<Domain> {
        let request = ApiRequest::get().detail("domain-detail", pk);
        let response = self.request_existing(request, "domain", pk).await?;
        parse_one(response.into_json()?, self.config.schema_policy)
    }

    /// All domains in backend order, each with its mail rows, the websites
    /// serving it and a disk usage figure.
    pub async fn retrieve_domain_list(&self) -> Result<Vec<Domain>> {
        let mut domains: Vec<Domain> = self.retrieve_list(None).await?;
        if domains.is_empty() {
            return Ok(domains);
        }

        // websites cannot be filtered by domain server-side
        let websites: Vec<WebSite> = self.retrieve_list(None).await?;

        for domain in &mut domains {
            let querystring = format!("domain={}", domain.id);
            let rows: Vec<AddressRecord> = self.retrieve_list(Some(&querystring)).await?;
            domain.mails = rows
                .into_iter()
                .filter(|row| row.domain.id == domain.id)
                .map(MailService::from)
                .collect();
            domain.websites = websites
                .iter()
                .filter(|site| site.serves_domain(domain.id))
                .cloned()
                .collect();
            domain.usage = UsageQuota::domain_disk_placeholder();
        }

        log::debug!("Retrieved {} domains", domains.len());
        Ok(domains)
    }

    /// Addresses folded into mail services according to the configured grouping.
    pub async fn retrieve_mail_address_list(
        &self,
        querystring: Option<&str>,
    ) -> Result<Vec<MailService>> {
        let rows: Vec<AddressRecord> = self.retrieve_list(querystring).await?;
        Ok(group_addresses(rows, self.config.address_grouping))
    }

    pub async fn retrieve_mailbox_list(&self, querystring: Option<&str>) -> Result<Vec<Mailbox>> {
        self.retrieve_list(querystring).await
    }

    pub async fn retrieve_mailinglist_list(
        &self,
        querystring: Option<&str>,
    ) -> Result<Vec<MailinglistService>> {
        self.retrieve_list(querystring).await
    }

    pub async fn retrieve_database_list(&self) -> Result<Vec<DatabaseService>> {
        self.retrieve_list(None).await
    }

    pub async fn retrieve_saas_list(&self) -> Result<Vec<SaasService>> {
        self.retrieve_list(None).await
    }

    pub async fn retrieve_website_list(&self) -> Result<Vec<WebSite>> {
        self.retrieve_list(None).await
    }

    pub async fn retrieve_bill_list(&self) -> Result<Vec<Bill>> {
        self.retrieve_list(None).await
    }

    pub async fn retrieve_payment_source_list(&self) -> Result<Vec<PaymentSource>> {
        self.retrieve_list(None).await
    }

    /// Download the rendered document of a bill.
    pub async fn retrieve_bill_document(&self, pk: &str) -> Result<BillDocument> {
        let request = ApiRequest::get().detail("bill-document", pk).raw();
        let response = self.request_existing(request, "bill", pk).await?;
        let content_type = response.content_type.clone();
        Ok(BillDocument {
            id: pk.to_string(),
            content_type,
            data: response.into_bytes(),
        })
    }

    /// Mailboxes in use against the number the account type allows.
    ///
    /// `None` when no mailbox limit is configured for the account type.
    pub async fn retrieve_mailbox_usage(
        &self,
        account: &UserAccount,
    ) -> Result<Option<UsageQuota>> {
        let Some(allowed) = self
            .config
            .limits_for(&account.account_type)
            .and_then(|limits| limits.mailbox)
        else {
            log::debug!("No mailbox limit for account type '{}'", account.account_type);
            return Ok(None);
        };

        let mailboxes = self.retrieve_mailbox_list(None).await?;
        #[allow(clippy::cast_precision_loss)]
        let used = mailboxes.len() as f64;
        Ok(Some(UsageQuota::new(used, f64::from(allowed), "mailboxes")))
    }
}
