//! Resource Manager transport and the typed clients built on it.

mod billing;
mod client;
mod error;
mod model;
mod pager;
mod poller;
mod subscription;

pub use billing::{
    BillingAccountsClient, EnrollmentAccountsClient, RoleAssignmentsClient, RoleDefinitionsClient,
};
pub use client::{ArmClient, RawResponse};
pub use error::{ArmError, ArmResult};
pub use model::*;
pub use poller::PollOptions;
pub use subscription::{AliasClient, SubscriptionClient, management_group_path};
