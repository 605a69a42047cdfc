//! Floating IP resource.
//!
//! Floating IPs are IP addresses that can be moved between servers.
//! Besides CRUD they support a set of actions: assign, unassign,
//! change reverse DNS, and change protection.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::clients::{
    ApiRequest, ApiResponse, Client, ErrorCode, HttpError, HttpMethod, InvalidRequestError,
    ListOpts,
};
use crate::resources::action::Action;
use crate::resources::Labels;

/// The address family of a Floating IP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatingIPType {
    /// A single IPv4 address.
    Ipv4,
    /// An IPv6 /64 network.
    Ipv6,
}

impl FloatingIPType {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Ipv4 => "ipv4",
            Self::Ipv6 => "ipv6",
        }
    }
}

impl fmt::Display for FloatingIPType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protection settings of a Floating IP.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct FloatingIPProtection {
    /// Whether the Floating IP is protected against deletion.
    pub delete: bool,
}

/// A reverse DNS entry for one address of a Floating IP.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DnsPtr {
    /// The address the entry belongs to.
    pub ip: String,
    /// The reverse DNS pointer.
    pub dns_ptr: String,
}

/// The location a Floating IP is homed in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HomeLocation {
    /// Unique identifier of the location.
    pub id: u64,
    /// Name of the location, e.g. `fsn1`.
    pub name: String,
}

/// A Floating IP.
///
/// For `ipv4` the `ip` field holds a single address; for `ipv6` it
/// holds a /64 network.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FloatingIP {
    /// Unique identifier of the Floating IP.
    pub id: u64,
    /// Name of the Floating IP.
    pub name: String,
    /// Description of the Floating IP.
    #[serde(default)]
    pub description: String,
    /// The address or network.
    pub ip: String,
    /// Address family.
    #[serde(rename = "type")]
    pub ip_type: FloatingIPType,
    /// ID of the server the IP is assigned to, if any.
    pub server: Option<u64>,
    /// Reverse DNS entries.
    #[serde(default)]
    pub dns_ptr: Vec<DnsPtr>,
    /// The location this IP is homed in.
    pub home_location: Option<HomeLocation>,
    /// Whether the IP is blocked.
    #[serde(default)]
    pub blocked: bool,
    /// Protection settings.
    #[serde(default)]
    pub protection: FloatingIPProtection,
    /// User-defined labels.
    #[serde(default)]
    pub labels: Labels,
    /// When the Floating IP was created.
    pub created: Option<DateTime<Utc>>,
}

impl FloatingIP {
    /// Returns the reverse DNS pointer for the given address, if one is
    /// set.
    #[must_use]
    pub fn dns_ptr_for_ip(&self, ip: &str) -> Option<&str> {
        self.dns_ptr
            .iter()
            .find(|entry| entry.ip == ip)
            .map(|entry| entry.dns_ptr.as_str())
    }
}

/// Options for listing Floating IPs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FloatingIPListOpts {
    /// Shared pagination options.
    pub list_opts: ListOpts,
    /// Filter by name. Skipped when empty.
    pub name: String,
    /// Sort specification, e.g. `id:asc`.
    pub sort: Vec<String>,
}

impl FloatingIPListOpts {
    fn query_params(&self) -> Vec<(String, String)> {
        let mut params = self.list_opts.query_params();
        if !self.name.is_empty() {
            params.push(("name".to_string(), self.name.clone()));
        }
        for sort in &self.sort {
            params.push(("sort".to_string(), sort.clone()));
        }
        params
    }
}

/// Options for creating a Floating IP.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FloatingIPCreateOpts {
    /// Address family. Required.
    pub ip_type: Option<FloatingIPType>,
    /// Name of the location to home the IP in. One of `home_location`
    /// or `server` is required.
    pub home_location: Option<String>,
    /// ID of a server to assign the new IP to.
    pub server: Option<u64>,
    /// Description.
    pub description: Option<String>,
    /// Name.
    pub name: Option<String>,
    /// User-defined labels.
    pub labels: Option<Labels>,
}

impl FloatingIPCreateOpts {
    /// Checks if the options are valid.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidRequestError`] when the type is missing or
    /// when neither home location nor server is set.
    pub fn validate(&self) -> Result<(), InvalidRequestError> {
        if self.ip_type.is_none() {
            return Err(InvalidRequestError::MissingField {
                field: "Type",
                opts: "FloatingIPCreateOpts",
            });
        }
        if self.home_location.is_none() && self.server.is_none() {
            return Err(InvalidRequestError::MissingOneOf {
                fields: "HomeLocation, Server",
                opts: "FloatingIPCreateOpts",
            });
        }
        Ok(())
    }
}

/// The result of creating a Floating IP.
#[derive(Debug, Clone)]
pub struct FloatingIPCreateResult {
    /// The created Floating IP.
    pub floating_ip: FloatingIP,
    /// The action tracking the assignment, when a server was given.
    pub action: Option<Action>,
}

/// Options for updating a Floating IP.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FloatingIPUpdateOpts {
    /// New description. Skipped when empty.
    pub description: String,
    /// New name. Skipped when empty.
    pub name: String,
    /// New labels. Skipped when `None`.
    pub labels: Option<Labels>,
}

#[derive(Deserialize)]
struct FloatingIPResponse {
    floating_ip: FloatingIP,
}

#[derive(Deserialize)]
struct FloatingIPListResponse {
    floating_ips: Vec<FloatingIP>,
}

#[derive(Deserialize)]
struct FloatingIPCreateResponse {
    floating_ip: FloatingIP,
    action: Option<Action>,
}

#[derive(Deserialize)]
struct ActionResponse {
    action: Action,
}

/// Client for the Floating IP resource.
#[derive(Debug, Clone, Copy)]
pub struct FloatingIPClient<'a> {
    pub(crate) client: &'a Client,
}

impl FloatingIPClient<'_> {
    /// Retrieves a Floating IP by its ID. Returns `Ok(None)` if it does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] other than a `not_found` API error.
    pub async fn get_by_id(&self, id: u64) -> Result<Option<FloatingIP>, HttpError> {
        let request =
            ApiRequest::builder(HttpMethod::Get, format!("/floating_ips/{id}")).build()?;
        match self.client.request(request).await {
            Ok(response) => {
                let body: FloatingIPResponse = response.json()?;
                Ok(Some(body.floating_ip))
            }
            Err(err) if err.is_code(&ErrorCode::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Retrieves a Floating IP by its name. Returns `Ok(None)` if it
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<FloatingIP>, HttpError> {
        let (ips, _) = self
            .list(FloatingIPListOpts {
                name: name.to_string(),
                ..FloatingIPListOpts::default()
            })
            .await?;
        Ok(ips.into_iter().next())
    }

    /// Retrieves a Floating IP by its ID if `id_or_name` parses as an
    /// integer, otherwise by its name.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn get(&self, id_or_name: &str) -> Result<Option<FloatingIP>, HttpError> {
        match id_or_name.parse::<u64>() {
            Ok(id) => self.get_by_id(id).await,
            Err(_) => self.get_by_name(id_or_name).await,
        }
    }

    /// Returns a single page of Floating IPs.
    ///
    /// Filters whose value is empty are not taken into account.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn list(
        &self,
        opts: FloatingIPListOpts,
    ) -> Result<(Vec<FloatingIP>, ApiResponse), HttpError> {
        let request = ApiRequest::builder(HttpMethod::Get, "/floating_ips")
            .query_params(opts.query_params())
            .build()?;
        let response = self.client.request(request).await?;
        let body: FloatingIPListResponse = response.json()?;
        Ok((body.floating_ips, response))
    }

    /// Returns all Floating IPs.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn all(&self) -> Result<Vec<FloatingIP>, HttpError> {
        self.all_with_opts(FloatingIPListOpts {
            list_opts: ListOpts {
                per_page: Some(50),
                ..ListOpts::default()
            },
            ..FloatingIPListOpts::default()
        })
        .await
    }

    /// Returns all Floating IPs matching the given options.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn all_with_opts(
        &self,
        opts: FloatingIPListOpts,
    ) -> Result<Vec<FloatingIP>, HttpError> {
        self.client
            .fetch_all(|page| {
                let mut opts = opts.clone();
                opts.list_opts.page = Some(page);
                async move { self.list(opts).await }
            })
            .await
    }

    /// Creates a Floating IP.
    ///
    /// # Errors
    ///
    /// [`HttpError::InvalidRequest`] when the options fail validation,
    /// otherwise any [`HttpError`] from the transport.
    pub async fn create(
        &self,
        opts: FloatingIPCreateOpts,
    ) -> Result<FloatingIPCreateResult, HttpError> {
        opts.validate()?;

        // validate() guarantees the type is present.
        let ip_type = opts.ip_type.ok_or(InvalidRequestError::MissingField {
            field: "Type",
            opts: "FloatingIPCreateOpts",
        })?;

        let mut body = json!({ "type": ip_type.as_str() });
        if let Some(home_location) = &opts.home_location {
            body["home_location"] = json!(home_location);
        }
        if let Some(server) = opts.server {
            body["server"] = json!(server);
        }
        if let Some(description) = &opts.description {
            body["description"] = json!(description);
        }
        if let Some(name) = &opts.name {
            body["name"] = json!(name);
        }
        if let Some(labels) = &opts.labels {
            body["labels"] = json!(labels);
        }

        let request = ApiRequest::builder(HttpMethod::Post, "/floating_ips")
            .body(body)
            .build()?;
        let response = self.client.request(request).await?;
        let body: FloatingIPCreateResponse = response.json()?;
        Ok(FloatingIPCreateResult {
            floating_ip: body.floating_ip,
            action: body.action,
        })
    }

    /// Updates a Floating IP.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn update(
        &self,
        floating_ip: &FloatingIP,
        opts: FloatingIPUpdateOpts,
    ) -> Result<FloatingIP, HttpError> {
        let mut body = json!({});
        if !opts.description.is_empty() {
            body["description"] = json!(opts.description);
        }
        if !opts.name.is_empty() {
            body["name"] = json!(opts.name);
        }
        if let Some(labels) = &opts.labels {
            body["labels"] = json!(labels);
        }

        let request = ApiRequest::builder(
            HttpMethod::Put,
            format!("/floating_ips/{}", floating_ip.id),
        )
        .body(body)
        .build()?;
        let response = self.client.request(request).await?;
        let body: FloatingIPResponse = response.json()?;
        Ok(body.floating_ip)
    }

    /// Deletes a Floating IP.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn delete(&self, floating_ip: &FloatingIP) -> Result<ApiResponse, HttpError> {
        let request = ApiRequest::builder(
            HttpMethod::Delete,
            format!("/floating_ips/{}", floating_ip.id),
        )
        .build()?;
        self.client.request(request).await
    }

    /// Assigns a Floating IP to a server.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn assign(
        &self,
        floating_ip: &FloatingIP,
        server_id: u64,
    ) -> Result<Action, HttpError> {
        self.action(floating_ip, "assign", json!({ "server": server_id }))
            .await
    }

    /// Unassigns a Floating IP from the currently assigned server.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn unassign(&self, floating_ip: &FloatingIP) -> Result<Action, HttpError> {
        self.action(floating_ip, "unassign", json!({})).await
    }

    /// Changes or resets the reverse DNS pointer for an address of the
    /// Floating IP. Pass `None` to reset the pointer to its default
    /// value.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn change_dns_ptr(
        &self,
        floating_ip: &FloatingIP,
        ip: &str,
        dns_ptr: Option<&str>,
    ) -> Result<Action, HttpError> {
        self.action(
            floating_ip,
            "change_dns_ptr",
            json!({ "ip": ip, "dns_ptr": dns_ptr }),
        )
        .await
    }

    /// Changes the deletion protection of a Floating IP.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn change_protection(
        &self,
        floating_ip: &FloatingIP,
        delete: bool,
    ) -> Result<Action, HttpError> {
        self.action(floating_ip, "change_protection", json!({ "delete": delete }))
            .await
    }

    async fn action(
        &self,
        floating_ip: &FloatingIP,
        command: &str,
        body: serde_json::Value,
    ) -> Result<Action, HttpError> {
        let request = ApiRequest::builder(
            HttpMethod::Post,
            format!("/floating_ips/{}/actions/{command}", floating_ip.id),
        )
        .body(body)
        .build()?;
        let response = self.client.request(request).await?;
        let body: ActionResponse = response.json()?;
        Ok(body.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_opts() -> FloatingIPCreateOpts {
        FloatingIPCreateOpts {
            ip_type: Some(FloatingIPType::Ipv4),
            home_location: Some("fsn1".to_string()),
            ..FloatingIPCreateOpts::default()
        }
    }

    #[test]
    fn test_create_opts_validate_missing_type() {
        let opts = FloatingIPCreateOpts {
            home_location: Some("fsn1".to_string()),
            ..FloatingIPCreateOpts::default()
        };
        assert_eq!(
            opts.validate().unwrap_err().to_string(),
            "missing field [Type] in [FloatingIPCreateOpts]"
        );
    }

    #[test]
    fn test_create_opts_validate_requires_location_or_server() {
        let opts = FloatingIPCreateOpts {
            ip_type: Some(FloatingIPType::Ipv6),
            ..FloatingIPCreateOpts::default()
        };
        assert_eq!(
            opts.validate().unwrap_err().to_string(),
            "missing one of fields [HomeLocation, Server] in [FloatingIPCreateOpts]"
        );
    }

    #[test]
    fn test_create_opts_validate_server_is_enough() {
        let opts = FloatingIPCreateOpts {
            ip_type: Some(FloatingIPType::Ipv4),
            server: Some(42),
            ..FloatingIPCreateOpts::default()
        };
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_create_opts_validate_ok() {
        assert!(valid_opts().validate().is_ok());
    }

    #[test]
    fn test_floating_ip_deserializes_from_wire_format() {
        let ip: FloatingIP = serde_json::from_str(
            r#"{
                "id": 4711,
                "name": "Web Frontend",
                "description": "Web Frontend",
                "ip": "131.232.99.1",
                "type": "ipv4",
                "server": 42,
                "dns_ptr": [{"ip": "131.232.99.1", "dns_ptr": "server.example.com"}],
                "home_location": {"id": 1, "name": "fsn1"},
                "blocked": false,
                "protection": {"delete": true},
                "labels": {"env": "prod"},
                "created": "2016-01-30T23:50:00+00:00"
            }"#,
        )
        .unwrap();

        assert_eq!(ip.id, 4711);
        assert_eq!(ip.ip_type, FloatingIPType::Ipv4);
        assert_eq!(ip.server, Some(42));
        assert!(ip.protection.delete);
        assert_eq!(ip.dns_ptr_for_ip("131.232.99.1"), Some("server.example.com"));
        assert_eq!(ip.dns_ptr_for_ip("10.0.0.1"), None);
        assert_eq!(ip.labels.get("env").map(String::as_str), Some("prod"));
    }

    #[test]
    fn test_list_opts_skip_empty_name() {
        assert!(FloatingIPListOpts::default().query_params().is_empty());

        let opts = FloatingIPListOpts {
            name: "web".to_string(),
            sort: vec!["id:desc".to_string()],
            ..FloatingIPListOpts::default()
        };
        assert_eq!(
            opts.query_params(),
            vec![
                ("name".to_string(), "web".to_string()),
                ("sort".to_string(), "id:desc".to_string()),
            ]
        );
    }
}
