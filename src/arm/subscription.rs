use super::client::{ArmClient, RawResponse};
use super::error::ArmResult;
use super::model::{
    AcceptOwnershipRequest, AcceptOwnershipRequestProperties, AliasResponse, PutAliasRequest,
};
use super::pager::Pager;
use super::poller::{PollOptions, poll_put};

const SUBSCRIPTION_API_VERSION: &str = "2021-10-01";
const MANAGEMENT_GROUP_PREFIX: &str = "/providers/Microsoft.Management/managementGroups/";

/// Expands a bare management group name into its resource id. Blank input
/// means "no management group"; ids already in resource form are kept.
pub fn management_group_path(id: Option<&str>) -> Option<String> {
    let id = id.map(str::trim).filter(|id| !id.is_empty())?;

    if id.starts_with(MANAGEMENT_GROUP_PREFIX) {
        return Some(id.to_string());
    }

    Some(format!("{MANAGEMENT_GROUP_PREFIX}{id}"))
}

pub struct AliasClient<'a> {
    arm: &'a ArmClient,
}

impl<'a> AliasClient<'a> {
    pub fn new(arm: &'a ArmClient) -> Self {
        Self { arm }
    }

    fn alias_url(&self, name: &str) -> String {
        let path = format!(
            "/providers/Microsoft.Subscription/aliases/{}",
            urlencoding::encode(name)
        );
        self.arm.url(&path, SUBSCRIPTION_API_VERSION)
    }

    pub fn list(&self) -> Pager<'a, AliasResponse> {
        let url = self.arm.url(
            "/providers/Microsoft.Subscription/aliases",
            SUBSCRIPTION_API_VERSION,
        );
        Pager::new(self.arm, url)
    }

    /// Submits the alias and blocks until provisioning reaches a terminal
    /// state.
    pub async fn create<F>(
        &self,
        name: &str,
        request: &PutAliasRequest,
        options: PollOptions,
        on_state: F,
    ) -> ArmResult<AliasResponse>
    where
        F: FnMut(&str),
    {
        let url = self.alias_url(name);

        tracing::info!(alias = name, "creating subscription alias");
        let initial = self.arm.put(&url, request).await?;
        poll_put(self.arm, &url, initial, options, on_state).await
    }
}

pub struct SubscriptionClient<'a> {
    arm: &'a ArmClient,
}

impl<'a> SubscriptionClient<'a> {
    pub fn new(arm: &'a ArmClient) -> Self {
        Self { arm }
    }

    pub fn accept_ownership_request(
        display_name: &str,
        management_group_id: Option<&str>,
    ) -> AcceptOwnershipRequest {
        AcceptOwnershipRequest {
            properties: AcceptOwnershipRequestProperties {
                display_name: display_name.to_string(),
                management_group_id: management_group_path(management_group_id),
            },
        }
    }

    pub async fn accept_ownership(
        &self,
        subscription_id: &str,
        request: &AcceptOwnershipRequest,
    ) -> ArmResult<RawResponse> {
        let path = format!(
            "/providers/Microsoft.Subscription/subscriptions/{}/acceptOwnership",
            urlencoding::encode(subscription_id)
        );
        let url = self.arm.url(&path, SUBSCRIPTION_API_VERSION);

        tracing::info!(subscription_id, "accepting subscription ownership");
        self.arm.post_raw(&url, request).await
    }
}
