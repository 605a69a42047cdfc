//! Server resource.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::clients::{
    ApiRequest, ApiResponse, Client, ErrorCode, HttpError, HttpMethod, InvalidRequestError,
    ListOpts,
};
use crate::resources::action::Action;
use crate::resources::Labels;

/// The status of a [`Server`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    /// The server is being initialized.
    Initializing,
    /// The server is offline.
    Off,
    /// The server is running.
    Running,
    /// The server is starting.
    Starting,
    /// The server is stopping.
    Stopping,
    /// The server is being migrated.
    Migrating,
    /// The server is being rebuilt.
    Rebuilding,
    /// The server is being deleted.
    Deleting,
    /// The status is unknown.
    Unknown,
}

/// A virtual machine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Server {
    /// Unique identifier of the server.
    pub id: u64,
    /// Name of the server.
    pub name: String,
    /// Current status.
    pub status: ServerStatus,
    /// When the server was created.
    pub created: Option<DateTime<Utc>>,
    /// User-defined labels.
    #[serde(default)]
    pub labels: Labels,
}

/// Options for listing servers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerListOpts {
    /// Shared pagination options.
    pub list_opts: ListOpts,
    /// Filter by name. Skipped when empty.
    pub name: String,
    /// Filter by status; each value adds a `status` query parameter.
    pub status: Vec<String>,
    /// Sort specification, e.g. `id:asc`.
    pub sort: Vec<String>,
}

impl ServerListOpts {
    fn query_params(&self) -> Vec<(String, String)> {
        let mut params = self.list_opts.query_params();
        if !self.name.is_empty() {
            params.push(("name".to_string(), self.name.clone()));
        }
        for status in &self.status {
            params.push(("status".to_string(), status.clone()));
        }
        for sort in &self.sort {
            params.push(("sort".to_string(), sort.clone()));
        }
        params
    }
}

/// Options for creating a server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerCreateOpts {
    /// Name of the server.
    pub name: String,
    /// Name or ID of the server type, e.g. `cx11`.
    pub server_type: String,
    /// Name or ID of the image to boot from.
    pub image: String,
    /// IDs of SSH keys to inject into the server.
    pub ssh_keys: Vec<u64>,
    /// Name of the location to create the server in.
    pub location: String,
    /// Whether to start the server after creation. Defaults to `true`
    /// on the API side.
    pub start_after_create: Option<bool>,
    /// User-defined labels.
    pub labels: Option<Labels>,
}

impl ServerCreateOpts {
    /// Checks if the options are valid.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRequestError::MissingField`] naming the first
    /// missing required field.
    pub fn validate(&self) -> Result<(), InvalidRequestError> {
        if self.name.is_empty() {
            return Err(Self::missing("Name"));
        }
        if self.server_type.is_empty() {
            return Err(Self::missing("ServerType"));
        }
        if self.image.is_empty() {
            return Err(Self::missing("Image"));
        }
        Ok(())
    }

    const fn missing(field: &'static str) -> InvalidRequestError {
        InvalidRequestError::MissingField {
            field,
            opts: "ServerCreateOpts",
        }
    }
}

/// The result of creating a server.
#[derive(Debug, Clone)]
pub struct ServerCreateResult {
    /// The created server.
    pub server: Server,
    /// The action tracking creation.
    pub action: Action,
    /// The root password, present only when no SSH keys were given.
    pub root_password: Option<String>,
}

/// Options for updating a server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerUpdateOpts {
    /// New name. Skipped when empty.
    pub name: String,
    /// New labels. Skipped when `None`.
    pub labels: Option<Labels>,
}

#[derive(Deserialize)]
struct ServerResponse {
    server: Server,
}

#[derive(Deserialize)]
struct ServerListResponse {
    servers: Vec<Server>,
}

#[derive(Deserialize)]
struct ServerCreateResponse {
    server: Server,
    action: Action,
    root_password: Option<String>,
}

#[derive(Deserialize)]
struct ActionResponse {
    action: Action,
}

/// Client for the Server resource.
#[derive(Debug, Clone, Copy)]
pub struct ServerClient<'a> {
    pub(crate) client: &'a Client,
}

impl ServerClient<'_> {
    /// Retrieves a server by its ID. Returns `Ok(None)` if the server
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] other than a `not_found` API error.
    pub async fn get_by_id(&self, id: u64) -> Result<Option<Server>, HttpError> {
        let request = ApiRequest::builder(HttpMethod::Get, format!("/servers/{id}")).build()?;
        match self.client.request(request).await {
            Ok(response) => {
                let body: ServerResponse = response.json()?;
                Ok(Some(body.server))
            }
            Err(err) if err.is_code(&ErrorCode::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Retrieves a server by its name. Returns `Ok(None)` if no server
    /// has that name.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Server>, HttpError> {
        let (servers, _) = self
            .list(ServerListOpts {
                name: name.to_string(),
                ..ServerListOpts::default()
            })
            .await?;
        Ok(servers.into_iter().next())
    }

    /// Retrieves a server by its ID if `id_or_name` parses as an
    /// integer, otherwise by its name.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn get(&self, id_or_name: &str) -> Result<Option<Server>, HttpError> {
        match id_or_name.parse::<u64>() {
            Ok(id) => self.get_by_id(id).await,
            Err(_) => self.get_by_name(id_or_name).await,
        }
    }

    /// Returns a single page of servers.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn list(
        &self,
        opts: ServerListOpts,
    ) -> Result<(Vec<Server>, ApiResponse), HttpError> {
        let request = ApiRequest::builder(HttpMethod::Get, "/servers")
            .query_params(opts.query_params())
            .build()?;
        let response = self.client.request(request).await?;
        let body: ServerListResponse = response.json()?;
        Ok((body.servers, response))
    }

    /// Returns all servers.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn all(&self) -> Result<Vec<Server>, HttpError> {
        self.all_with_opts(ServerListOpts {
            list_opts: ListOpts {
                per_page: Some(50),
                ..ListOpts::default()
            },
            ..ServerListOpts::default()
        })
        .await
    }

    /// Returns all servers matching the given options.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn all_with_opts(&self, opts: ServerListOpts) -> Result<Vec<Server>, HttpError> {
        self.client
            .fetch_all(|page| {
                let mut opts = opts.clone();
                opts.list_opts.page = Some(page);
                async move { self.list(opts).await }
            })
            .await
    }

    /// Creates a server.
    ///
    /// When no SSH keys are given, the result carries the generated
    /// root password.
    ///
    /// # Errors
    ///
    /// [`HttpError::InvalidRequest`] when the options fail validation,
    /// otherwise any [`HttpError`] from the transport.
    pub async fn create(&self, opts: ServerCreateOpts) -> Result<ServerCreateResult, HttpError> {
        opts.validate()?;

        let mut body = json!({
            "name": opts.name,
            "server_type": opts.server_type,
            "image": opts.image,
        });
        if !opts.ssh_keys.is_empty() {
            body["ssh_keys"] = json!(opts.ssh_keys);
        }
        if !opts.location.is_empty() {
            body["location"] = json!(opts.location);
        }
        if let Some(start) = opts.start_after_create {
            body["start_after_create"] = json!(start);
        }
        if let Some(labels) = &opts.labels {
            body["labels"] = json!(labels);
        }

        let request = ApiRequest::builder(HttpMethod::Post, "/servers")
            .body(body)
            .build()?;
        let response = self.client.request(request).await?;
        let body: ServerCreateResponse = response.json()?;
        Ok(ServerCreateResult {
            server: body.server,
            action: body.action,
            root_password: body.root_password,
        })
    }

    /// Updates a server.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn update(&self, server: &Server, opts: ServerUpdateOpts) -> Result<Server, HttpError> {
        let mut body = json!({});
        if !opts.name.is_empty() {
            body["name"] = json!(opts.name);
        }
        if let Some(labels) = &opts.labels {
            body["labels"] = json!(labels);
        }

        let request = ApiRequest::builder(HttpMethod::Put, format!("/servers/{}", server.id))
            .body(body)
            .build()?;
        let response = self.client.request(request).await?;
        let body: ServerResponse = response.json()?;
        Ok(body.server)
    }

    /// Deletes a server.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn delete(&self, server: &Server) -> Result<ApiResponse, HttpError> {
        let request =
            ApiRequest::builder(HttpMethod::Delete, format!("/servers/{}", server.id)).build()?;
        self.client.request(request).await
    }

    /// Starts a server.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn power_on(&self, server: &Server) -> Result<Action, HttpError> {
        self.action(server, "poweron").await
    }

    /// Cuts power to a server without shutting it down gracefully.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn power_off(&self, server: &Server) -> Result<Action, HttpError> {
        self.action(server, "poweroff").await
    }

    /// Reboots a server by sending an ACPI request.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn reboot(&self, server: &Server) -> Result<Action, HttpError> {
        self.action(server, "reboot").await
    }

    async fn action(&self, server: &Server, command: &str) -> Result<Action, HttpError> {
        let request = ApiRequest::builder(
            HttpMethod::Post,
            format!("/servers/{}/actions/{command}", server.id),
        )
        .body(json!({}))
        .build()?;
        let response = self.client.request(request).await?;
        let body: ActionResponse = response.json()?;
        Ok(body.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_opts_validate_matrix() {
        let opts = ServerCreateOpts::default();
        assert_eq!(
            opts.validate().unwrap_err().to_string(),
            "missing field [Name] in [ServerCreateOpts]"
        );

        let opts = ServerCreateOpts {
            name: "my server".to_string(),
            ..ServerCreateOpts::default()
        };
        assert_eq!(
            opts.validate().unwrap_err().to_string(),
            "missing field [ServerType] in [ServerCreateOpts]"
        );

        let opts = ServerCreateOpts {
            name: "my server".to_string(),
            server_type: "cx11".to_string(),
            ..ServerCreateOpts::default()
        };
        assert_eq!(
            opts.validate().unwrap_err().to_string(),
            "missing field [Image] in [ServerCreateOpts]"
        );

        let opts = ServerCreateOpts {
            name: "my server".to_string(),
            server_type: "cx11".to_string(),
            image: "ubuntu-22.04".to_string(),
            ..ServerCreateOpts::default()
        };
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_server_deserializes_from_wire_format() {
        let server: Server = serde_json::from_str(
            r#"{
                "id": 42,
                "name": "my-resource",
                "status": "running",
                "created": "2016-01-30T23:55:00+00:00",
                "labels": {"environment": "prod"}
            }"#,
        )
        .unwrap();

        assert_eq!(server.id, 42);
        assert_eq!(server.status, ServerStatus::Running);
        assert_eq!(server.labels.get("environment").map(String::as_str), Some("prod"));
    }

    #[test]
    fn test_list_opts_query_params() {
        let opts = ServerListOpts {
            name: "web".to_string(),
            status: vec!["running".to_string()],
            ..ServerListOpts::default()
        };
        assert_eq!(
            opts.query_params(),
            vec![
                ("name".to_string(), "web".to_string()),
                ("status".to_string(), "running".to_string()),
            ]
        );
    }
}
