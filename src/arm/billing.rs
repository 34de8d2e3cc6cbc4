use super::client::{ArmClient, RawResponse};
use super::error::ArmResult;
use super::model::{
    BillingAccount, EnrollmentAccountSummary, RoleAssignment, RoleAssignmentProperties,
    RoleDefinition,
};
use super::pager::Pager;

const BILLING_API_VERSION: &str = "2020-05-01";
const ENROLLMENT_ACCOUNTS_API_VERSION: &str = "2018-03-01-preview";
const ROLE_ASSIGNMENT_API_VERSION: &str = "2019-10-01-preview";

/// Billing role that lets a principal create subscriptions under an
/// enrollment account. The GUID is the same in every tenant.
pub const SUBSCRIPTION_CREATOR: &str = "cfff8e42-45ec-463a-9ae9-276083fcf6a9";

pub fn subscription_creator_role_id(billing_account: &str, enrollment_account: &str) -> String {
    format!(
        "billingAccounts/{billing_account}/enrollmentAccounts/{enrollment_account}/billingRoleAssignments/{SUBSCRIPTION_CREATOR}"
    )
}

pub struct BillingAccountsClient<'a> {
    arm: &'a ArmClient,
}

impl<'a> BillingAccountsClient<'a> {
    pub fn new(arm: &'a ArmClient) -> Self {
        Self { arm }
    }

    pub fn list(&self) -> Pager<'a, BillingAccount> {
        let url = self.arm.url(
            "/providers/Microsoft.Billing/billingAccounts",
            BILLING_API_VERSION,
        );
        Pager::new(self.arm, url)
    }
}

pub struct EnrollmentAccountsClient<'a> {
    arm: &'a ArmClient,
}

impl<'a> EnrollmentAccountsClient<'a> {
    pub fn new(arm: &'a ArmClient) -> Self {
        Self { arm }
    }

    pub fn list(&self) -> Pager<'a, EnrollmentAccountSummary> {
        let url = self.arm.url(
            "/providers/Microsoft.Billing/enrollmentAccounts",
            ENROLLMENT_ACCOUNTS_API_VERSION,
        );
        Pager::new(self.arm, url)
    }
}

pub struct RoleDefinitionsClient<'a> {
    arm: &'a ArmClient,
}

impl<'a> RoleDefinitionsClient<'a> {
    pub fn new(arm: &'a ArmClient) -> Self {
        Self { arm }
    }

    pub fn list_by_billing_account(&self, billing_account: &str) -> Pager<'a, RoleDefinition> {
        let path = format!(
            "/providers/Microsoft.Billing/billingAccounts/{}/billingRoleDefinitions",
            urlencoding::encode(billing_account)
        );
        Pager::new(self.arm, self.arm.url(&path, BILLING_API_VERSION))
    }
}

pub struct RoleAssignmentsClient<'a> {
    arm: &'a ArmClient,
}

impl<'a> RoleAssignmentsClient<'a> {
    pub fn new(arm: &'a ArmClient) -> Self {
        Self { arm }
    }

    /// Grants the subscription creator role on an enrollment account.
    ///
    /// The call has no typed counterpart, so the raw response is returned
    /// and the caller decides what counts as failure.
    pub async fn grant_subscription_creator(
        &self,
        billing_account: &str,
        enrollment_account: &str,
        principal_id: &str,
        principal_tenant_id: &str,
    ) -> ArmResult<(String, RawResponse)> {
        let role_definition_id = subscription_creator_role_id(billing_account, enrollment_account);
        let url = self.arm.url(
            &format!("/providers/Microsoft.Billing/{role_definition_id}"),
            ROLE_ASSIGNMENT_API_VERSION,
        );

        let body = RoleAssignment {
            properties: RoleAssignmentProperties {
                principal_id: principal_id.to_string(),
                principal_tenant_id: principal_tenant_id.to_string(),
                role_definition_id: role_definition_id.clone(),
            },
        };

        tracing::info!(%role_definition_id, principal_id, "granting subscription creator role");
        let response = self.arm.post_raw(&url, &body).await?;
        Ok((role_definition_id, response))
    }
}
