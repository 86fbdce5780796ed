//! Vendor gateway implementation of [`FleetApi`].
//!
//! Every listing is one `Get` call: `{typeName, search, resultsLimit}` with
//! the session credentials at the top level of the envelope.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::services::fleet_api::FleetApi;
use fleet_reporter::fetch::{BasicClient, HttpClient, RpcError, rpc_call};
use fleet_reporter::model::{Device, ExceptionEvent, Rule, Trip};
use fleet_reporter::session::SessionContext;

pub struct TelematicsClient<C = BasicClient> {
    http: C,
    ctx: SessionContext,
}

impl TelematicsClient<BasicClient> {
    pub fn new(http: BasicClient, ctx: SessionContext) -> Self {
        Self { http, ctx }
    }
}

impl<C: HttpClient> TelematicsClient<C> {
    async fn get<T: DeserializeOwned>(
        &self,
        type_name: &str,
        search: Value,
        limit: u32,
    ) -> Result<Vec<T>, RpcError> {
        let params = json!({
            "typeName": type_name,
            "search": search,
            "resultsLimit": limit,
        });

        let result = rpc_call(
            &self.http,
            &self.ctx.base_url,
            "Get",
            params,
            Some(&self.ctx.credentials),
        )
        .await?;

        // An absent result means an empty listing, not a protocol violation.
        if result.is_null() {
            debug!(type_name, "Get returned no result, treating as empty");
            return Ok(Vec::new());
        }

        Ok(serde_json::from_value(result)?)
    }
}

fn date_search(from: DateTime<Utc>, to: DateTime<Utc>) -> Value {
    json!({
        "fromDate": from.to_rfc3339(),
        "toDate": to.to_rfc3339(),
    })
}

#[async_trait]
impl<C: HttpClient> FleetApi for TelematicsClient<C> {
    #[tracing::instrument(skip(self))]
    async fn list_devices(&self, limit: u32) -> Result<Vec<Device>> {
        Ok(self.get("Device", json!({}), limit).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn list_rules(&self, limit: u32) -> Result<Vec<Rule>> {
        Ok(self.get("Rule", json!({}), limit).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn list_exceptions(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<ExceptionEvent>> {
        Ok(self
            .get("ExceptionEvent", date_search(from, to), limit)
            .await?)
    }

    #[tracing::instrument(skip(self))]
    async fn list_trips(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<Trip>> {
        Ok(self.get("Trip", date_search(from, to), limit).await?)
    }
}
