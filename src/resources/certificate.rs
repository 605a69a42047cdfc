//! Certificate resource.
//!
//! Certificates come in two flavors: `uploaded` certificates carry a
//! caller-supplied PEM certificate chain and private key; `managed`
//! certificates are issued by the provider for a set of domain names,
//! and creating one returns an [`Action`] tracking the issuance.

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

/// The type of a [`Certificate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificateType {
    /// A certificate uploaded by the caller.
    Uploaded,
    /// A certificate issued and renewed by the provider.
    Managed,
}

impl CertificateType {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Uploaded => "uploaded",
            Self::Managed => "managed",
        }
    }
}

impl fmt::Display for CertificateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A TLS certificate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Certificate {
    /// Unique identifier of the certificate.
    pub id: u64,
    /// Name of the certificate.
    pub name: String,
    /// The certificate type.
    #[serde(rename = "type")]
    pub cert_type: CertificateType,
    /// The PEM-encoded certificate chain.
    #[serde(default)]
    pub certificate: String,
    /// Domains and subdomains covered by the certificate.
    #[serde(default)]
    pub domain_names: Vec<String>,
    /// SHA256 fingerprint of the certificate.
    #[serde(default)]
    pub fingerprint: String,
    /// Start of validity.
    pub not_valid_before: Option<DateTime<Utc>>,
    /// End of validity.
    pub not_valid_after: Option<DateTime<Utc>>,
    /// User-defined labels.
    #[serde(default)]
    pub labels: Labels,
    /// When the certificate was created.
    pub created: Option<DateTime<Utc>>,
}

/// Options for listing certificates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateListOpts {
    /// Shared pagination options.
    pub list_opts: ListOpts,
    /// Filter by name. Skipped when empty.
    pub name: String,
    /// Sort specification, e.g. `name:asc`.
    pub sort: Vec<String>,
}

impl CertificateListOpts {
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

/// Options for creating a certificate.
///
/// Leaving `cert_type` unset creates an uploaded certificate; the API
/// treats a missing type the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateCreateOpts {
    /// Name of the certificate.
    pub name: String,
    /// The certificate type. Defaults to uploaded.
    pub cert_type: Option<CertificateType>,
    /// PEM-encoded certificate chain. Required for uploaded
    /// certificates.
    pub certificate: String,
    /// PEM-encoded private key. Required for uploaded certificates.
    pub private_key: String,
    /// Domains to issue the certificate for. Required for managed
    /// certificates.
    pub domain_names: Vec<String>,
    /// User-defined labels.
    pub labels: Option<Labels>,
}

impl CertificateCreateOpts {
    /// Checks if the options are valid for their certificate type.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRequestError::MissingField`] naming the first
    /// missing required field.
    pub fn validate(&self) -> Result<(), InvalidRequestError> {
        match self.cert_type {
            None | Some(CertificateType::Uploaded) => self.validate_uploaded(),
            Some(CertificateType::Managed) => self.validate_managed(),
        }
    }

    fn validate_uploaded(&self) -> Result<(), InvalidRequestError> {
        if self.name.is_empty() {
            return Err(Self::missing("Name"));
        }
        if self.certificate.is_empty() {
            return Err(Self::missing("Certificate"));
        }
        if self.private_key.is_empty() {
            return Err(Self::missing("PrivateKey"));
        }
        Ok(())
    }

    fn validate_managed(&self) -> Result<(), InvalidRequestError> {
        if self.name.is_empty() {
            return Err(Self::missing("Name"));
        }
        if self.domain_names.is_empty() {
            return Err(Self::missing("DomainNames"));
        }
        Ok(())
    }

    const fn missing(field: &'static str) -> InvalidRequestError {
        InvalidRequestError::MissingField {
            field,
            opts: "CertificateCreateOpts",
        }
    }
}

/// The result of creating a certificate.
#[derive(Debug, Clone)]
pub struct CertificateCreateResult {
    /// The created certificate.
    pub certificate: Certificate,
    /// The action tracking issuance, present for managed certificates.
    pub action: Option<Action>,
}

/// Options for updating a certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateUpdateOpts {
    /// New name. Skipped when empty.
    pub name: String,
    /// New labels. Skipped when `None`.
    pub labels: Option<Labels>,
}

#[derive(Deserialize)]
struct CertificateResponse {
    certificate: Certificate,
}

#[derive(Deserialize)]
struct CertificateListResponse {
    certificates: Vec<Certificate>,
}

#[derive(Deserialize)]
struct CertificateCreateResponse {
    certificate: Certificate,
    action: Option<Action>,
}

/// Client for the Certificate resource.
#[derive(Debug, Clone, Copy)]
pub struct CertificateClient<'a> {
    pub(crate) client: &'a Client,
}

impl CertificateClient<'_> {
    /// Retrieves a certificate by its ID. Returns `Ok(None)` if it does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] other than a `not_found` API error.
    pub async fn get_by_id(&self, id: u64) -> Result<Option<Certificate>, HttpError> {
        let request =
            ApiRequest::builder(HttpMethod::Get, format!("/certificates/{id}")).build()?;
        match self.client.request(request).await {
            Ok(response) => {
                let body: CertificateResponse = response.json()?;
                Ok(Some(body.certificate))
            }
            Err(err) if err.is_code(&ErrorCode::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Retrieves a certificate by its name. Returns `Ok(None)` if it
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Certificate>, HttpError> {
        let (certificates, _) = self
            .list(CertificateListOpts {
                name: name.to_string(),
                ..CertificateListOpts::default()
            })
            .await?;
        Ok(certificates.into_iter().next())
    }

    /// Retrieves a certificate by its ID if `id_or_name` parses as an
    /// integer, otherwise by its name.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn get(&self, id_or_name: &str) -> Result<Option<Certificate>, HttpError> {
        match id_or_name.parse::<u64>() {
            Ok(id) => self.get_by_id(id).await,
            Err(_) => self.get_by_name(id_or_name).await,
        }
    }

    /// Returns a single page of certificates.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn list(
        &self,
        opts: CertificateListOpts,
    ) -> Result<(Vec<Certificate>, ApiResponse), HttpError> {
        let request = ApiRequest::builder(HttpMethod::Get, "/certificates")
            .query_params(opts.query_params())
            .build()?;
        let response = self.client.request(request).await?;
        let body: CertificateListResponse = response.json()?;
        Ok((body.certificates, response))
    }

    /// Returns all certificates.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn all(&self) -> Result<Vec<Certificate>, HttpError> {
        self.all_with_opts(CertificateListOpts {
            list_opts: ListOpts {
                per_page: Some(50),
                ..ListOpts::default()
            },
            ..CertificateListOpts::default()
        })
        .await
    }

    /// Returns all certificates matching the given options.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn all_with_opts(
        &self,
        opts: CertificateListOpts,
    ) -> Result<Vec<Certificate>, HttpError> {
        self.client
            .fetch_all(|page| {
                let mut opts = opts.clone();
                opts.list_opts.page = Some(page);
                async move { self.list(opts).await }
            })
            .await
    }

    /// Creates a certificate.
    ///
    /// For managed certificates the returned result carries the action
    /// tracking issuance.
    ///
    /// # Errors
    ///
    /// [`HttpError::InvalidRequest`] when the options fail validation,
    /// otherwise any [`HttpError`] from the transport.
    pub async fn create(
        &self,
        opts: CertificateCreateOpts,
    ) -> Result<CertificateCreateResult, HttpError> {
        opts.validate()?;

        let mut body = json!({ "name": opts.name });
        if let Some(cert_type) = opts.cert_type {
            body["type"] = json!(cert_type.as_str());
        }
        match opts.cert_type {
            None | Some(CertificateType::Uploaded) => {
                body["certificate"] = json!(opts.certificate);
                body["private_key"] = json!(opts.private_key);
            }
            Some(CertificateType::Managed) => {
                body["domain_names"] = json!(opts.domain_names);
            }
        }
        if let Some(labels) = &opts.labels {
            body["labels"] = json!(labels);
        }

        let request = ApiRequest::builder(HttpMethod::Post, "/certificates")
            .body(body)
            .build()?;
        let response = self.client.request(request).await?;
        let body: CertificateCreateResponse = response.json()?;
        Ok(CertificateCreateResult {
            certificate: body.certificate,
            action: body.action,
        })
    }

    /// Updates a certificate.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn update(
        &self,
        certificate: &Certificate,
        opts: CertificateUpdateOpts,
    ) -> Result<Certificate, HttpError> {
        let mut body = json!({});
        if !opts.name.is_empty() {
            body["name"] = json!(opts.name);
        }
        if let Some(labels) = &opts.labels {
            body["labels"] = json!(labels);
        }

        let request = ApiRequest::builder(
            HttpMethod::Put,
            format!("/certificates/{}", certificate.id),
        )
        .body(body)
        .build()?;
        let response = self.client.request(request).await?;
        let body: CertificateResponse = response.json()?;
        Ok(body.certificate)
    }

    /// Deletes a certificate.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn delete(&self, certificate: &Certificate) -> Result<ApiResponse, HttpError> {
        let request = ApiRequest::builder(
            HttpMethod::Delete,
            format!("/certificates/{}", certificate.id),
        )
        .build()?;
        self.client.request(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_uploaded_matrix() {
        struct Case {
            name: &'static str,
            opts: CertificateCreateOpts,
            err_msg: &'static str,
        }

        let cases = vec![
            Case {
                name: "missing name",
                opts: CertificateCreateOpts {
                    certificate: "cert".to_string(),
                    private_key: "key".to_string(),
                    ..CertificateCreateOpts::default()
                },
                err_msg: "missing field [Name] in [CertificateCreateOpts]",
            },
            Case {
                name: "no certificate",
                opts: CertificateCreateOpts {
                    name: "name".to_string(),
                    private_key: "key".to_string(),
                    ..CertificateCreateOpts::default()
                },
                err_msg: "missing field [Certificate] in [CertificateCreateOpts]",
            },
            Case {
                name: "no private key",
                opts: CertificateCreateOpts {
                    name: "name".to_string(),
                    certificate: "cert".to_string(),
                    ..CertificateCreateOpts::default()
                },
                err_msg: "missing field [PrivateKey] in [CertificateCreateOpts]",
            },
            Case {
                name: "valid without type",
                opts: CertificateCreateOpts {
                    name: "name".to_string(),
                    certificate: "cert".to_string(),
                    private_key: "key".to_string(),
                    ..CertificateCreateOpts::default()
                },
                err_msg: "",
            },
            Case {
                name: "valid with type",
                opts: CertificateCreateOpts {
                    name: "name".to_string(),
                    cert_type: Some(CertificateType::Uploaded),
                    certificate: "cert".to_string(),
                    private_key: "key".to_string(),
                    ..CertificateCreateOpts::default()
                },
                err_msg: "",
            },
        ];

        for case in cases {
            let result = case.opts.validate();
            if case.err_msg.is_empty() {
                assert!(result.is_ok(), "case '{}' should be valid", case.name);
            } else {
                assert_eq!(
                    result.unwrap_err().to_string(),
                    case.err_msg,
                    "case '{}'",
                    case.name
                );
            }
        }
    }

    #[test]
    fn test_validate_managed_matrix() {
        let opts = CertificateCreateOpts {
            cert_type: Some(CertificateType::Managed),
            domain_names: vec!["*.example.com".to_string(), "example.com".to_string()],
            ..CertificateCreateOpts::default()
        };
        assert_eq!(
            opts.validate().unwrap_err().to_string(),
            "missing field [Name] in [CertificateCreateOpts]"
        );

        let opts = CertificateCreateOpts {
            name: "I have no domains".to_string(),
            cert_type: Some(CertificateType::Managed),
            ..CertificateCreateOpts::default()
        };
        assert_eq!(
            opts.validate().unwrap_err().to_string(),
            "missing field [DomainNames] in [CertificateCreateOpts]"
        );

        let opts = CertificateCreateOpts {
            name: "valid".to_string(),
            cert_type: Some(CertificateType::Managed),
            domain_names: vec!["*.example.com".to_string(), "example.com".to_string()],
            ..CertificateCreateOpts::default()
        };
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_certificate_deserializes_from_wire_format() {
        let certificate: Certificate = serde_json::from_str(
            r#"{
                "id": 897,
                "name": "my website cert",
                "type": "uploaded",
                "certificate": "-----BEGIN CERTIFICATE-----...",
                "domain_names": ["example.com", "webmail.example.com"],
                "fingerprint": "03:c7:55:9b:2a:d1",
                "not_valid_before": "2019-01-08T12:10:05+00:00",
                "not_valid_after": "2019-07-08T09:59:59+00:00",
                "labels": {},
                "created": "2019-01-08T12:10:05+00:00"
            }"#,
        )
        .unwrap();

        assert_eq!(certificate.id, 897);
        assert_eq!(certificate.cert_type, CertificateType::Uploaded);
        assert_eq!(certificate.domain_names.len(), 2);
    }
}
