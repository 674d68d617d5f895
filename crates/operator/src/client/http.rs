// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! reqwest-backed implementation of the gateway [`Api`].
//!
//! Token lifecycle is internal: every call first posts the credential form
//! to the token endpoint. The gateway validates a still-valid token without
//! reissuing it, so this doubles as renewal. The cached token sits behind an
//! async mutex, making one client instance safe to share between concurrent
//! sync calls.

use std::collections::BTreeSet;

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::Config;

use super::api::{
    Api, ApiError, ApiFuture, ApiResult, ApiStatus, ConnectionRequest, GroupRequest, GroupTree,
    PatchOp, PrincipalKind,
};

/// Request header carrying the session token.
const TOKEN_HEADER: &str = "Gateway-Token";

/// Response body of the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(rename = "authToken")]
    auth_token: String,
}

/// Response body of a create call.
#[derive(Debug, Deserialize)]
struct Created {
    identifier: String,
}

/// Permission document of a principal.
#[derive(Debug, Default, Deserialize)]
struct PermissionDoc {
    #[serde(default, rename = "connectionPermissions")]
    connection_permissions: serde_json::Map<String, serde_json::Value>,
}

/// Gateway API client over HTTP.
pub struct HttpApi {
    http: reqwest::Client,
    endpoint: String,
    source: String,
    username: String,
    password: String,
    token: Mutex<Option<String>>,
}

impl HttpApi {
    /// Builds a client from a credential bundle.
    pub fn new(config: &Config) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.insecure)
            .build()?;

        Ok(HttpApi {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            source: config.source.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            token: Mutex::new(None),
        })
    }

    /// Account the client authenticates as.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Creates or validates the session token.
    ///
    /// The current token is sent along with the credentials; the gateway
    /// keeps it when still valid and issues a fresh one otherwise.
    async fn token(&self) -> ApiResult<String> {
        let mut token = self.token.lock().await;

        let mut form = vec![
            ("username", self.username.clone()),
            ("password", self.password.clone()),
        ];
        if let Some(current) = token.as_ref() {
            form.push(("token", current.clone()));
        }

        let response = self
            .http
            .post(format!("{}/api/tokens", self.endpoint))
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Token);
        }

        let body: TokenResponse = response.json().await.map_err(|_| ApiError::Token)?;
        *token = Some(body.auth_token.clone());

        Ok(body.auth_token)
    }

    /// URL of a path under the configured data source.
    fn data_url(&self, rest: &str) -> String {
        format!("{}/api/session/data/{}/{rest}", self.endpoint, self.source)
    }

    fn principal_path(kind: PrincipalKind) -> &'static str {
        match kind {
            PrincipalKind::User => "users",
            PrincipalKind::Group => "userGroups",
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
        operation: &'static str,
    ) -> ApiResult<T> {
        let token = self.token().await?;
        let response = self
            .http
            .get(url)
            .header(TOKEN_HEADER, token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                operation,
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }

    async fn send_for_status(&self, request: reqwest::RequestBuilder) -> ApiResult<ApiStatus> {
        let token = self.token().await?;
        let response = request.header(TOKEN_HEADER, token).send().await?;

        Ok(match response.status().as_u16() {
            204 => ApiStatus::NoContent,
            404 => ApiStatus::NotFound,
            status => ApiStatus::Other(status),
        })
    }

    async fn post_created<B: serde::Serialize>(
        &self,
        url: String,
        body: &B,
        operation: &'static str,
    ) -> ApiResult<String> {
        let token = self.token().await?;
        let response = self
            .http
            .post(url)
            .header(TOKEN_HEADER, token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                operation,
                status: status.as_u16(),
            });
        }

        let created: Created = response
            .json()
            .await
            .map_err(|_| ApiError::MissingPayload { operation })?;

        debug!(operation, identifier = %created.identifier, "object created");
        Ok(created.identifier)
    }
}

impl Api for HttpApi {
    fn group_tree<'a>(&'a self, group_id: &'a str) -> ApiFuture<'a, GroupTree> {
        Box::pin(async move {
            self.get_json(
                self.data_url(&format!("connectionGroups/{group_id}/tree")),
                "group tree",
            )
            .await
        })
    }

    fn create_group<'a>(&'a self, request: &'a GroupRequest) -> ApiFuture<'a, String> {
        Box::pin(async move {
            self.post_created(self.data_url("connectionGroups"), request, "create group")
                .await
        })
    }

    fn create_connection<'a>(&'a self, request: &'a ConnectionRequest) -> ApiFuture<'a, String> {
        Box::pin(async move {
            self.post_created(self.data_url("connections"), request, "create connection")
                .await
        })
    }

    fn update_connection<'a>(
        &'a self,
        id: &'a str,
        request: &'a ConnectionRequest,
    ) -> ApiFuture<'a, ApiStatus> {
        Box::pin(async move {
            let url = self.data_url(&format!("connections/{id}"));
            self.send_for_status(self.http.put(url).json(request)).await
        })
    }

    fn delete_connection<'a>(&'a self, id: &'a str) -> ApiFuture<'a, ApiStatus> {
        Box::pin(async move {
            let url = self.data_url(&format!("connections/{id}"));
            self.send_for_status(self.http.delete(url)).await
        })
    }

    fn list_principals(&self, kind: PrincipalKind) -> ApiFuture<'_, Vec<String>> {
        Box::pin(async move {
            let listing: serde_json::Map<String, serde_json::Value> = self
                .get_json(
                    self.data_url(Self::principal_path(kind)),
                    "list principals",
                )
                .await?;

            Ok(listing.keys().cloned().collect())
        })
    }

    fn principal_permissions<'a>(
        &'a self,
        kind: PrincipalKind,
        id: &'a str,
    ) -> ApiFuture<'a, BTreeSet<String>> {
        Box::pin(async move {
            let doc: PermissionDoc = self
                .get_json(
                    self.data_url(&format!("{}/{id}/permissions", Self::principal_path(kind))),
                    "principal permissions",
                )
                .await?;

            Ok(doc.connection_permissions.keys().cloned().collect())
        })
    }

    fn modify_principal_permissions<'a>(
        &'a self,
        kind: PrincipalKind,
        id: &'a str,
        patch: Vec<PatchOp>,
    ) -> ApiFuture<'a, ApiStatus> {
        Box::pin(async move {
            let url = self.data_url(&format!("{}/{id}/permissions", Self::principal_path(kind)));
            self.send_for_status(self.http.patch(url).json(&patch)).await
        })
    }
}
