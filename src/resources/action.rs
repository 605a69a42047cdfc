//! Action resource.
//!
//! Actions record the progress of asynchronous server-side operations
//! (creating a server, assigning a Floating IP, ...). Mutating
//! operations on other resources return the Action tracking them.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::clients::{
    ApiRequest, ApiResponse, Client, ErrorCode, HttpError, HttpMethod, ListOpts,
};

/// The status of an [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    /// The action is still in progress.
    Running,
    /// The action finished successfully.
    Success,
    /// The action failed.
    Error,
}

/// The error reported by a failed [`Action`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActionError {
    /// Machine-readable failure code.
    pub code: String,
    /// Human-readable failure message.
    pub message: String,
}

/// An action tracks an asynchronous operation on a resource.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Action {
    /// Unique identifier of the action.
    pub id: u64,
    /// The command this action performs, e.g. `create_server`.
    pub command: String,
    /// Current status.
    pub status: ActionStatus,
    /// Progress in percent.
    pub progress: u8,
    /// When the action was started.
    pub started: Option<DateTime<Utc>>,
    /// When the action finished; `None` while still running.
    pub finished: Option<DateTime<Utc>>,
    /// Failure details, present when `status` is `Error`.
    pub error: Option<ActionError>,
}

/// Options for listing actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionListOpts {
    /// Shared pagination options.
    pub list_opts: ListOpts,
    /// Filter by status; each value adds a `status` query parameter.
    pub status: Vec<ActionStatus>,
    /// Sort specification, e.g. `id:asc`.
    pub sort: Vec<String>,
}

impl ActionListOpts {
    fn query_params(&self) -> Vec<(String, String)> {
        let mut params = self.list_opts.query_params();
        for status in &self.status {
            let value = match status {
                ActionStatus::Running => "running",
                ActionStatus::Success => "success",
                ActionStatus::Error => "error",
            };
            params.push(("status".to_string(), value.to_string()));
        }
        for sort in &self.sort {
            params.push(("sort".to_string(), sort.clone()));
        }
        params
    }
}

#[derive(Deserialize)]
struct ActionResponse {
    action: Action,
}

#[derive(Deserialize)]
struct ActionListResponse {
    actions: Vec<Action>,
}

/// Client for the Action resource.
#[derive(Debug, Clone, Copy)]
pub struct ActionClient<'a> {
    pub(crate) client: &'a Client,
}

impl ActionClient<'_> {
    /// Retrieves an action by its ID. Returns `Ok(None)` if the action
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] other than a `not_found` API error.
    pub async fn get_by_id(&self, id: u64) -> Result<Option<Action>, HttpError> {
        let request = ApiRequest::builder(HttpMethod::Get, format!("/actions/{id}")).build()?;
        match self.client.request(request).await {
            Ok(response) => {
                let body: ActionResponse = response.json()?;
                Ok(Some(body.action))
            }
            Err(err) if err.is_code(&ErrorCode::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Returns a single page of actions.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn list(
        &self,
        opts: ActionListOpts,
    ) -> Result<(Vec<Action>, ApiResponse), HttpError> {
        let request = ApiRequest::builder(HttpMethod::Get, "/actions")
            .query_params(opts.query_params())
            .build()?;
        let response = self.client.request(request).await?;
        let body: ActionListResponse = response.json()?;
        Ok((body.actions, response))
    }

    /// Returns all actions.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn all(&self) -> Result<Vec<Action>, HttpError> {
        self.all_with_opts(ActionListOpts {
            list_opts: ListOpts {
                per_page: Some(50),
                ..ListOpts::default()
            },
            ..ActionListOpts::default()
        })
        .await
    }

    /// Returns all actions matching the given options.
    ///
    /// # Errors
    ///
    /// Any [`HttpError`] from the transport.
    pub async fn all_with_opts(&self, opts: ActionListOpts) -> Result<Vec<Action>, HttpError> {
        self.client
            .fetch_all(|page| {
                let mut opts = opts.clone();
                opts.list_opts.page = Some(page);
                async move { self.list(opts).await }
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_deserializes_from_wire_format() {
        let action: Action = serde_json::from_str(
            r#"{
                "id": 13,
                "command": "create_server",
                "status": "running",
                "progress": 50,
                "started": "2016-01-30T23:50:00+00:00",
                "finished": null,
                "error": null
            }"#,
        )
        .unwrap();

        assert_eq!(action.id, 13);
        assert_eq!(action.command, "create_server");
        assert_eq!(action.status, ActionStatus::Running);
        assert_eq!(action.progress, 50);
        assert!(action.started.is_some());
        assert!(action.finished.is_none());
        assert!(action.error.is_none());
    }

    #[test]
    fn test_failed_action_carries_error_details() {
        let action: Action = serde_json::from_str(
            r#"{
                "id": 14,
                "command": "attach_volume",
                "status": "error",
                "progress": 100,
                "started": "2016-01-30T23:50:00+00:00",
                "finished": "2016-01-30T23:50:05+00:00",
                "error": {"code": "server_does_not_exist", "message": "Server does not exist"}
            }"#,
        )
        .unwrap();

        assert_eq!(action.status, ActionStatus::Error);
        let error = action.error.unwrap();
        assert_eq!(error.code, "server_does_not_exist");
    }

    #[test]
    fn test_list_opts_query_params() {
        let opts = ActionListOpts {
            list_opts: ListOpts {
                page: Some(2),
                per_page: Some(25),
            },
            status: vec![ActionStatus::Running, ActionStatus::Error],
            sort: vec!["id:asc".to_string()],
        };

        assert_eq!(
            opts.query_params(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("per_page".to_string(), "25".to_string()),
                ("status".to_string(), "running".to_string()),
                ("status".to_string(), "error".to_string()),
                ("sort".to_string(), "id:asc".to_string()),
            ]
        );
    }
}
