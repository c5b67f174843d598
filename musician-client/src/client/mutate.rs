//! Write-back calls.

use serde_json::json;

use super::Orchestra;
use crate::error::{OrchestraError, Result};
use crate::http_client::Method;
use crate::request::ApiRequest;
use crate::types::{AddressRecord, NewMailAddress, parse_one};

impl Orchestra {
    pub async fn create_mail_address(&self, address: &NewMailAddress) -> Result<AddressRecord> {
        address.validate()?;
        self.require_token()?;
        let request = ApiRequest::new(Method::Post)
            .resource("address-list")
            .json_body(address.to_json());
        let response = self.request(request).await?;
        log::info!("Created mail address '{}'", address.name);
        parse_one(response.into_json()?, self.config.schema_policy)
    }

    pub async fn update_mail_address(
        &self,
        pk: &str,
        address: &NewMailAddress,
    ) -> Result<AddressRecord> {
        address.validate()?;
        self.require_token()?;
        let request = ApiRequest::new(Method::Put)
            .detail("address-detail", pk)
            .json_body(address.to_json());
        let response = self.request_existing(request, "address", pk).await?;
        log::info!("Updated mail address {pk}");
        parse_one(response.into_json()?, self.config.schema_policy)
    }

    pub async fn delete_mail_address(&self, pk: &str) -> Result<()> {
        self.delete_detail("address-detail", "address", pk).await
    }

    pub async fn delete_mailbox(&self, pk: &str) -> Result<()> {
        self.delete_detail("mailbox-detail", "mailbox", pk).await
    }

    pub async fn set_mailbox_password(&self, pk: &str, password: &str) -> Result<()> {
        if password.is_empty() {
            return Err(OrchestraError::InvalidParameter {
                param: "password".to_string(),
                detail: "must not be empty".to_string(),
            });
        }
        self.require_token()?;
        let request = ApiRequest::new(Method::Post)
            .detail("mailbox-password", pk)
            .json_body(json!({ "password": password }));
        self.request_existing(request, "mailbox", pk).await?;
        log::info!("Changed password of mailbox {pk}");
        Ok(())
    }

    async fn delete_detail(&self, route: &str, resource: &str, pk: &str) -> Result<()> {
        self.require_token()?;
        let request = ApiRequest::new(Method::Delete).detail(route, pk);
        self.request_existing(request, resource, pk).await?;
        log::info!("Deleted {resource} {pk}");
        Ok(())
    }
}
