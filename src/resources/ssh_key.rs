//! SSH key resource.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::clients::{
    ApiRequest, ApiResponse, Client, ErrorCode, HttpError, HttpMethod, InvalidRequestError,
    ListOpts,
};
use crate::resources::Labels;

/// An SSH key stored in the project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SshKey {
    /// Unique identifier of the SSH key.
    pub id: u64,
    /// Name of the SSH key.
    pub name: String,
    /// MD5 fingerprint of the public key.
    pub fingerprint: String,
    /// The public key in OpenSSH format.
    pub public_key: String,
    /// User-defined labels.
    #[serde(default)]
    pub labels: Labels,
    /// When the SSH key was created.
    pub created: Option<DateTime<Utc>>,
}

/// Options for listing SSH keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SshKeyListOpts {
    /// Shared pagination options.
    pub list_opts: ListOpts,
    /// Filter by name. Skipped when empty.
    pub name: String,
    /// Filter by fingerprint. Skipped when empty.
    pub fingerprint: String,
    /// Sort specification, e.g. `name:asc`.
    pub sort: Vec<String>,
}

impl SshKeyListOpts {
    fn query_params(&self) -> Vec<(String, String)> {
        let mut params = self.list_opts.query_params();
        if !self.name.is_empty() {
            params.push(("name".to_string(), self.name.clone()));
        }
        if !self.fingerprint.is_empty() {
            params.push(("fingerprint".to_string(), self.fingerprint.clone()));
        }
        for sort in &self.sort {
            params.push(("sort".to_string(), sort.clone()));
        }
        params
    }
}

/// Options for creating an SSH key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SshKeyCreateOpts {
    /// Name of the SSH key.
    pub name: String,
    /// The public key in OpenSSH format.
    pub public_key: String,
    /// User-defined labels.
    pub labels: Option<Labels>,
}

impl SshKeyCreateOpts {
    /// Checks if the options are valid.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRequestError::MissingField`] when name or
    /// public key is empty.
    pub fn validate(&self) -> Result<(), InvalidRequestError> {
        if self.name.is_empty() {
            return Err(InvalidRequestError::MissingField {
                field: "Name",
                opts: "SshKeyCreateOpts",
            });
        }
        if self.public_key.is_empty() {
            return Err(InvalidRequestError::MissingField {
                field: "PublicKey",
                opts: "SshKeyCreateOpts",
            });
        }
        Ok(())
    }
}

/// Options for updating an SSH key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SshKeyUpdateOpts {
    /// New name. Skipped when empty.
    pub name: String,
    /// New labels. Skipped when `None`.
    pub labels: Option<Labels>,
}

#[derive(Deserialize)]
struct SshKeyResponse {
    ssh_key: SshKey,
}

#[derive(Deserialize)]
struct SshKeyListResponse {
    ssh_keys: Vec<SshKey>,
}

/// Client for the SSH key resource.
#[derive(Debug, Clone, Copy)]
pub struct SshKeyClient<'a> {
    pub(crate) client: &'a Client,
}

impl SshKeyClient<'_> {
    /// Retrieves an SSH key by its ID. Returns `Ok(None)` if the key
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] other than a `not_found` API error.
    pub async fn get_by_id(&self, id: u64) -> Result<Option<SshKey>, HttpError> {
        let request = ApiRequest::builder(HttpMethod::Get, format!("/ssh_keys/{id}")).build()?;
        match self.client.request(request).await {
            Ok(response) => {
                let body: SshKeyResponse = response.json()?;
                Ok(Some(body.ssh_key))
            }
            Err(err) if err.is_code(&ErrorCode::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Retrieves an SSH key by its name. Returns `Ok(None)` if no key
    /// has that name.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<SshKey>, HttpError> {
        let (keys, _) = self
            .list(SshKeyListOpts {
                name: name.to_string(),
                ..SshKeyListOpts::default()
            })
            .await?;
        Ok(keys.into_iter().next())
    }

    /// Retrieves an SSH key by its fingerprint. Returns `Ok(None)` if
    /// no key has that fingerprint.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn get_by_fingerprint(&self, fingerprint: &str) -> Result<Option<SshKey>, HttpError> {
        let (keys, _) = self
            .list(SshKeyListOpts {
                fingerprint: fingerprint.to_string(),
                ..SshKeyListOpts::default()
            })
            .await?;
        Ok(keys.into_iter().next())
    }

    /// Retrieves an SSH key by its ID if `id_or_name` parses as an
    /// integer, otherwise by its name.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn get(&self, id_or_name: &str) -> Result<Option<SshKey>, HttpError> {
        match id_or_name.parse::<u64>() {
            Ok(id) => self.get_by_id(id).await,
            Err(_) => self.get_by_name(id_or_name).await,
        }
    }

    /// Returns a single page of SSH keys.
    ///
    /// Filters whose value is empty are not taken into account.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn list(
        &self,
        opts: SshKeyListOpts,
    ) -> Result<(Vec<SshKey>, ApiResponse), HttpError> {
        let request = ApiRequest::builder(HttpMethod::Get, "/ssh_keys")
            .query_params(opts.query_params())
            .build()?;
        let response = self.client.request(request).await?;
        let body: SshKeyListResponse = response.json()?;
        Ok((body.ssh_keys, response))
    }

    /// Returns all SSH keys.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn all(&self) -> Result<Vec<SshKey>, HttpError> {
        self.all_with_opts(SshKeyListOpts {
            list_opts: ListOpts {
                per_page: Some(50),
                ..ListOpts::default()
            },
            ..SshKeyListOpts::default()
        })
        .await
    }

    /// Returns all SSH keys matching the given options.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn all_with_opts(&self, opts: SshKeyListOpts) -> Result<Vec<SshKey>, HttpError> {
        self.client
            .fetch_all(|page| {
                let mut opts = opts.clone();
                opts.list_opts.page = Some(page);
                async move { self.list(opts).await }
            })
            .await
    }

    /// Creates an SSH key.
    ///
    /// # Errors
    ///
    /// [`HttpError::InvalidRequest`] when the options fail validation,
    /// otherwise any [`HttpError`] from the transport.
    pub async fn create(&self, opts: SshKeyCreateOpts) -> Result<SshKey, HttpError> {
        opts.validate()?;

        let mut body = json!({
            "name": opts.name,
            "public_key": opts.public_key,
        });
        if let Some(labels) = &opts.labels {
            body["labels"] = json!(labels);
        }

        let request = ApiRequest::builder(HttpMethod::Post, "/ssh_keys")
            .body(body)
            .build()?;
        let response = self.client.request(request).await?;
        let body: SshKeyResponse = response.json()?;
        Ok(body.ssh_key)
    }

    /// Updates an SSH key.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn update(
        &self,
        ssh_key: &SshKey,
        opts: SshKeyUpdateOpts,
    ) -> Result<SshKey, HttpError> {
        let mut body = json!({});
        if !opts.name.is_empty() {
            body["name"] = json!(opts.name);
        }
        if let Some(labels) = &opts.labels {
            body["labels"] = json!(labels);
        }

        let request = ApiRequest::builder(HttpMethod::Put, format!("/ssh_keys/{}", ssh_key.id))
            .body(body)
            .build()?;
        let response = self.client.request(request).await?;
        let body: SshKeyResponse = response.json()?;
        Ok(body.ssh_key)
    }

    /// Deletes an SSH key.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn delete(&self, ssh_key: &SshKey) -> Result<ApiResponse, HttpError> {
        let request =
            ApiRequest::builder(HttpMethod::Delete, format!("/ssh_keys/{}", ssh_key.id)).build()?;
        self.client.request(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_opts_validate_missing_name() {
        let opts = SshKeyCreateOpts {
            public_key: "ssh-rsa AAAA".to_string(),
            ..SshKeyCreateOpts::default()
        };
        assert_eq!(
            opts.validate().unwrap_err().to_string(),
            "missing field [Name] in [SshKeyCreateOpts]"
        );
    }

    #[test]
    fn test_create_opts_validate_missing_public_key() {
        let opts = SshKeyCreateOpts {
            name: "my key".to_string(),
            ..SshKeyCreateOpts::default()
        };
        assert_eq!(
            opts.validate().unwrap_err().to_string(),
            "missing field [PublicKey] in [SshKeyCreateOpts]"
        );
    }

    #[test]
    fn test_create_opts_validate_ok() {
        let opts = SshKeyCreateOpts {
            name: "my key".to_string(),
            public_key: "ssh-rsa AAAA".to_string(),
            labels: None,
        };
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_list_opts_skip_empty_filters() {
        let opts = SshKeyListOpts::default();
        assert!(opts.query_params().is_empty());

        let opts = SshKeyListOpts {
            fingerprint: "b7:2f:30".to_string(),
            ..SshKeyListOpts::default()
        };
        assert_eq!(
            opts.query_params(),
            vec![("fingerprint".to_string(), "b7:2f:30".to_string())]
        );
    }

    #[test]
    fn test_ssh_key_deserializes_without_labels() {
        let key: SshKey = serde_json::from_str(
            r#"{
                "id": 2323,
                "name": "My ssh key",
                "fingerprint": "b7:2f:30:a0:2f:6c:58:6c:21:04:58:61:ba:06:3b:2f",
                "public_key": "ssh-rsa AAAjjk76kgf...Xt",
                "created": "2016-01-30T23:50:00+00:00"
            }"#,
        )
        .unwrap();

        assert_eq!(key.id, 2323);
        assert!(key.labels.is_empty());
    }
}
