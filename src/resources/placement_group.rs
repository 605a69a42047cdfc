//! Placement group resource.

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

/// The type of a [`PlacementGroup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementGroupType {
    /// Spread servers across different physical hosts.
    Spread,
}

impl PlacementGroupType {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Spread => "spread",
        }
    }
}

impl fmt::Display for PlacementGroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A placement group controls how its servers are distributed across
/// physical hosts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlacementGroup {
    /// Unique identifier of the placement group.
    pub id: u64,
    /// Name of the placement group.
    pub name: String,
    /// User-defined labels.
    #[serde(default)]
    pub labels: Labels,
    /// IDs of the servers in the group.
    #[serde(default)]
    pub servers: Vec<u64>,
    /// The placement group type.
    #[serde(rename = "type")]
    pub group_type: PlacementGroupType,
    /// When the placement group was created.
    pub created: Option<DateTime<Utc>>,
}

/// Options for listing placement groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementGroupListOpts {
    /// Shared pagination options.
    pub list_opts: ListOpts,
    /// Filter by name. Skipped when empty.
    pub name: String,
    /// Filter by type. Skipped when `None`.
    pub group_type: Option<PlacementGroupType>,
    /// Sort specification, e.g. `id:asc`.
    pub sort: Vec<String>,
}

impl PlacementGroupListOpts {
    fn query_params(&self) -> Vec<(String, String)> {
        let mut params = self.list_opts.query_params();
        if !self.name.is_empty() {
            params.push(("name".to_string(), self.name.clone()));
        }
        if let Some(group_type) = self.group_type {
            params.push(("type".to_string(), group_type.as_str().to_string()));
        }
        for sort in &self.sort {
            params.push(("sort".to_string(), sort.clone()));
        }
        params
    }
}

/// Options for creating a placement group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementGroupCreateOpts {
    /// Name of the placement group.
    pub name: String,
    /// User-defined labels.
    pub labels: Option<Labels>,
    /// The placement group type.
    pub group_type: PlacementGroupType,
}

impl PlacementGroupCreateOpts {
    /// Checks if the options are valid.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRequestError::MissingField`] when the name is
    /// empty.
    pub fn validate(&self) -> Result<(), InvalidRequestError> {
        if self.name.is_empty() {
            return Err(InvalidRequestError::MissingField {
                field: "Name",
                opts: "PlacementGroupCreateOpts",
            });
        }
        Ok(())
    }
}

/// The result of creating a placement group.
#[derive(Debug, Clone)]
pub struct PlacementGroupCreateResult {
    /// The created placement group.
    pub placement_group: PlacementGroup,
    /// The action tracking creation, when the API reports one.
    pub action: Option<Action>,
}

/// Options for updating a placement group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementGroupUpdateOpts {
    /// New name. Skipped when empty.
    pub name: String,
    /// New labels. Skipped when `None`.
    pub labels: Option<Labels>,
}

#[derive(Deserialize)]
struct PlacementGroupResponse {
    placement_group: PlacementGroup,
}

#[derive(Deserialize)]
struct PlacementGroupListResponse {
    placement_groups: Vec<PlacementGroup>,
}

#[derive(Deserialize)]
struct PlacementGroupCreateResponse {
    placement_group: PlacementGroup,
    action: Option<Action>,
}

/// Client for the Placement group resource.
#[derive(Debug, Clone, Copy)]
pub struct PlacementGroupClient<'a> {
    pub(crate) client: &'a Client,
}

impl PlacementGroupClient<'_> {
    /// Retrieves a placement group by its ID. Returns `Ok(None)` if it
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] other than a `not_found` API error.
    pub async fn get_by_id(&self, id: u64) -> Result<Option<PlacementGroup>, HttpError> {
        let request =
            ApiRequest::builder(HttpMethod::Get, format!("/placement_groups/{id}")).build()?;
        match self.client.request(request).await {
            Ok(response) => {
                let body: PlacementGroupResponse = response.json()?;
                Ok(Some(body.placement_group))
            }
            Err(err) if err.is_code(&ErrorCode::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Retrieves a placement group by its name. Returns `Ok(None)` if
    /// no group has that name.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<PlacementGroup>, HttpError> {
        let (groups, _) = self
            .list(PlacementGroupListOpts {
                name: name.to_string(),
                ..PlacementGroupListOpts::default()
            })
            .await?;
        Ok(groups.into_iter().next())
    }

    /// Retrieves a placement group by its ID if `id_or_name` parses as
    /// an integer, otherwise by its name.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn get(&self, id_or_name: &str) -> Result<Option<PlacementGroup>, HttpError> {
        match id_or_name.parse::<u64>() {
            Ok(id) => self.get_by_id(id).await,
            Err(_) => self.get_by_name(id_or_name).await,
        }
    }

    /// Returns a single page of placement groups.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn list(
        &self,
        opts: PlacementGroupListOpts,
    ) -> Result<(Vec<PlacementGroup>, ApiResponse), HttpError> {
        let request = ApiRequest::builder(HttpMethod::Get, "/placement_groups")
            .query_params(opts.query_params())
            .build()?;
        let response = self.client.request(request).await?;
        let body: PlacementGroupListResponse = response.json()?;
        Ok((body.placement_groups, response))
    }

    /// Returns all placement groups.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn all(&self) -> Result<Vec<PlacementGroup>, HttpError> {
        self.all_with_opts(PlacementGroupListOpts {
            list_opts: ListOpts {
                per_page: Some(50),
                ..ListOpts::default()
            },
            ..PlacementGroupListOpts::default()
        })
        .await
    }

    /// Returns all placement groups matching the given options.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn all_with_opts(
        &self,
        opts: PlacementGroupListOpts,
    ) -> Result<Vec<PlacementGroup>, HttpError> {
        self.client
            .fetch_all(|page| {
                let mut opts = opts.clone();
                opts.list_opts.page = Some(page);
                async move { self.list(opts).await }
            })
            .await
    }

    /// Creates a placement group.
    ///
    /// # Errors
    ///
    /// [`HttpError::InvalidRequest`] when the options fail validation,
    /// otherwise any [`HttpError`] from the transport.
    pub async fn create(
        &self,
        opts: PlacementGroupCreateOpts,
    ) -> Result<PlacementGroupCreateResult, HttpError> {
        opts.validate()?;

        let mut body = json!({
            "name": opts.name,
            "type": opts.group_type.as_str(),
        });
        if let Some(labels) = &opts.labels {
            body["labels"] = json!(labels);
        }

        let request = ApiRequest::builder(HttpMethod::Post, "/placement_groups")
            .body(body)
            .build()?;
        let response = self.client.request(request).await?;
        let body: PlacementGroupCreateResponse = response.json()?;
        Ok(PlacementGroupCreateResult {
            placement_group: body.placement_group,
            action: body.action,
        })
    }

    /// Updates a placement group.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn update(
        &self,
        placement_group: &PlacementGroup,
        opts: PlacementGroupUpdateOpts,
    ) -> Result<PlacementGroup, HttpError> {
        let mut body = json!({});
        if !opts.name.is_empty() {
            body["name"] = json!(opts.name);
        }
        if let Some(labels) = &opts.labels {
            body["labels"] = json!(labels);
        }

        let request = ApiRequest::builder(
            HttpMethod::Put,
            format!("/placement_groups/{}", placement_group.id),
        )
        .body(body)
        .build()?;
        let response = self.client.request(request).await?;
        let body: PlacementGroupResponse = response.json()?;
        Ok(body.placement_group)
    }

    /// Deletes a placement group.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn delete(
        &self,
        placement_group: &PlacementGroup,
    ) -> Result<ApiResponse, HttpError> {
        let request = ApiRequest::builder(
            HttpMethod::Delete,
            format!("/placement_groups/{}", placement_group.id),
        )
        .build()?;
        self.client.request(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_opts_validate_missing_name() {
        let opts = PlacementGroupCreateOpts {
            name: String::new(),
            labels: None,
            group_type: PlacementGroupType::Spread,
        };
        assert_eq!(
            opts.validate().unwrap_err().to_string(),
            "missing field [Name] in [PlacementGroupCreateOpts]"
        );
    }

    #[test]
    fn test_placement_group_deserializes_from_wire_format() {
        let group: PlacementGroup = serde_json::from_str(
            r#"{
                "id": 897,
                "name": "my Placement Group",
                "labels": {},
                "servers": [4711, 4712],
                "type": "spread",
                "created": "2019-01-08T12:10:00+00:00"
            }"#,
        )
        .unwrap();

        assert_eq!(group.id, 897);
        assert_eq!(group.group_type, PlacementGroupType::Spread);
        assert_eq!(group.servers, vec![4711, 4712]);
    }

    #[test]
    fn test_list_opts_include_type_filter() {
        let opts = PlacementGroupListOpts {
            group_type: Some(PlacementGroupType::Spread),
            ..PlacementGroupListOpts::default()
        };
        assert_eq!(
            opts.query_params(),
            vec![("type".to_string(), "spread".to_string())]
        );
    }
}
