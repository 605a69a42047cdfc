//! Typed resource clients.
//!
//! Each submodule provides a thin client for one API resource. Resource
//! clients borrow the [`Client`] and translate typed operations into
//! transport requests; they hold no state of their own.
//!
//! Single-resource getters (`get_by_id`, `get_by_name`, `get`)
//! translate the API's `not_found` error into `Ok(None)` rather than
//! surfacing it as an error.

mod action;
mod certificate;
mod floating_ip;
mod placement_group;
mod server;
mod ssh_key;

use std::collections::HashMap;

use crate::clients::Client;

pub use action::{Action, ActionClient, ActionError, ActionListOpts, ActionStatus};
pub use certificate::{
    Certificate, CertificateClient, CertificateCreateOpts, CertificateCreateResult,
    CertificateListOpts, CertificateType, CertificateUpdateOpts,
};
pub use floating_ip::{
    DnsPtr, FloatingIP, FloatingIPClient, FloatingIPCreateOpts, FloatingIPCreateResult,
    FloatingIPListOpts, FloatingIPProtection, FloatingIPType, FloatingIPUpdateOpts, HomeLocation,
};
pub use placement_group::{
    PlacementGroup, PlacementGroupClient, PlacementGroupCreateOpts, PlacementGroupCreateResult,
    PlacementGroupListOpts, PlacementGroupType, PlacementGroupUpdateOpts,
};
pub use server::{
    Server, ServerClient, ServerCreateOpts, ServerCreateResult, ServerListOpts, ServerStatus,
    ServerUpdateOpts,
};
pub use ssh_key::{SshKey, SshKeyClient, SshKeyCreateOpts, SshKeyListOpts, SshKeyUpdateOpts};

/// User-defined labels attached to a resource.
pub type Labels = HashMap<String, String>;

impl Client {
    /// Returns a client for the Action resource.
    #[must_use]
    pub const fn actions(&self) -> ActionClient<'_> {
        ActionClient { client: self }
    }

    /// Returns a client for the Server resource.
    #[must_use]
    pub const fn servers(&self) -> ServerClient<'_> {
        ServerClient { client: self }
    }

    /// Returns a client for the SSH key resource.
    #[must_use]
    pub const fn ssh_keys(&self) -> SshKeyClient<'_> {
        SshKeyClient { client: self }
    }

    /// Returns a client for the Floating IP resource.
    #[must_use]
    pub const fn floating_ips(&self) -> FloatingIPClient<'_> {
        FloatingIPClient { client: self }
    }

    /// Returns a client for the Certificate resource.
    #[must_use]
    pub const fn certificates(&self) -> CertificateClient<'_> {
        CertificateClient { client: self }
    }

    /// Returns a client for the Placement group resource.
    #[must_use]
    pub const fn placement_groups(&self) -> PlacementGroupClient<'_> {
        PlacementGroupClient { client: self }
    }
}
