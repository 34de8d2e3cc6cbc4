use super::error::{CommandError, CommandResult};
use super::{AcceptArgs, CreateArgs, Session, SubCommand};
use crate::arm::{
    AliasClient, AliasResponse, PutAliasRequest, PutAliasRequestAdditionalProperties,
    PutAliasRequestProperties, SubscriptionClient, management_group_path,
};
use crate::output::{self, cell};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;
use tabled::Tabled;

#[derive(Tabled)]
struct AliasRow {
    name: String,
    subscription_id: String,
    display_name: String,
    state: String,
}

impl From<&AliasResponse> for AliasRow {
    fn from(alias: &AliasResponse) -> Self {
        let props = alias.properties.as_ref();
        Self {
            name: cell(alias.name.as_deref()),
            subscription_id: cell(props.and_then(|p| p.subscription_id.as_deref())),
            display_name: cell(props.and_then(|p| p.display_name.as_deref())),
            state: cell(props.and_then(|p| p.provisioning_state.as_deref())),
        }
    }
}

pub async fn handle<W: Write>(action: SubCommand, session: &Session, out: &mut W) -> CommandResult<()> {
    match action {
        SubCommand::AliasList => alias_list(session, out).await,
        SubCommand::Create(args) => create(args, session, out).await,
        SubCommand::Accept(args) => accept(args, session, out).await,
    }
}

async fn alias_list<W: Write>(session: &Session, out: &mut W) -> CommandResult<()> {
    let aliases = AliasClient::new(&session.arm).list().collect_all().await?;

    output::render(out, session.output, &aliases, || {
        aliases.iter().map(AliasRow::from).collect()
    })
}

fn alias_request(args: &CreateArgs) -> PutAliasRequest {
    PutAliasRequest {
        properties: PutAliasRequestProperties {
            display_name: args.display_name.clone(),
            workload: args.workload,
            billing_scope: args.enrollment_account.clone(),
            additional_properties: PutAliasRequestAdditionalProperties {
                management_group_id: management_group_path(args.management_group_id.as_deref()),
                subscription_tenant_id: args.sub_tenant.clone(),
                subscription_owner_id: args.subscription_owner.clone(),
            },
        },
    }
}

fn spinner(alias: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(format!("Creating subscription alias '{alias}'"));
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

async fn create<W: Write>(args: CreateArgs, session: &Session, out: &mut W) -> CommandResult<()> {
    let request = alias_request(&args);
    let bar = spinner(&args.name);

    let result = AliasClient::new(&session.arm)
        .create(&args.name, &request, session.poll, |state| {
            bar.set_message(format!("Creating subscription alias '{}': {state}", args.name));
        })
        .await;
    bar.finish_and_clear();

    let alias = result?;
    output::render(out, session.output, &alias, || vec![AliasRow::from(&alias)])
}

async fn accept<W: Write>(args: AcceptArgs, session: &Session, out: &mut W) -> CommandResult<()> {
    let request =
        SubscriptionClient::accept_ownership_request(&args.display_name, args.management_group_id.as_deref());
    output::write_json(out, &request)?;

    let response = SubscriptionClient::new(&session.arm)
        .accept_ownership(&args.subscription, &request)
        .await?;
    output::write_raw(out, &response)?;

    if !response.is_success() {
        return Err(CommandError::RequestFailed {
            action: "accept ownership of subscription",
            target: args.subscription,
            status: response.status,
        });
    }

    output::status_line(out, "Subscription ownership accepted", response.status, session.color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arm::Workload;
    use crate::cmd::testing::session;
    use crate::config::OutputFormat;
    use mockito::Matcher;
    use serde_json::json;

    const ALIAS_PATH: &str = "/providers/Microsoft.Subscription/aliases/sandbox";

    fn create_args() -> CreateArgs {
        CreateArgs {
            name: "sandbox".into(),
            display_name: "Sandbox".into(),
            sub_tenant: "tenant-1".into(),
            workload: Workload::DevTest,
            subscription_owner: "owner-1".into(),
            enrollment_account: "/providers/Microsoft.Billing/billingAccounts/1/enrollmentAccounts/2"
                .into(),
            management_group_id: Some("platform".into()),
        }
    }

    fn accept_args(management_group_id: Option<&str>) -> AcceptArgs {
        AcceptArgs {
            subscription: "sub-42".into(),
            display_name: "Payments".into(),
            management_group_id: management_group_id.map(str::to_string),
        }
    }

    #[test]
    fn alias_request_carries_every_flag() {
        let request = alias_request(&create_args());
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "properties": {
                    "displayName": "Sandbox",
                    "workload": "DevTest",
                    "billingScope": "/providers/Microsoft.Billing/billingAccounts/1/enrollmentAccounts/2",
                    "additionalProperties": {
                        "managementGroupId": "/providers/Microsoft.Management/managementGroups/platform",
                        "subscriptionTenantId": "tenant-1",
                        "subscriptionOwnerId": "owner-1"
                    }
                }
            })
        );
    }

    #[tokio::test]
    async fn alias_list_renders_table_rows() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/providers/Microsoft.Subscription/aliases")
            .match_query(Matcher::UrlEncoded("api-version".into(), "2021-10-01".into()))
            .with_status(200)
            .with_body(r#"{"value":[{"name":"sandbox","properties":{"subscriptionId":"sub-1","provisioningState":"Succeeded"}}]}"#)
            .create_async()
            .await;

        let session = session(&server, OutputFormat::Table);
        let mut out = Vec::new();
        handle(SubCommand::AliasList, &session, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("sandbox"));
        assert!(text.contains("sub-1"));
        assert!(text.contains("Succeeded"));
    }

    #[tokio::test]
    async fn create_waits_for_provisioning_and_prints_alias() {
        let mut server = mockito::Server::new_async().await;
        let op = format!("{}/operations/create-sandbox", server.url());
        server
            .mock("PUT", ALIAS_PATH)
            .match_query(Matcher::Any)
            .match_body(Matcher::PartialJson(json!({"properties": {"workload": "DevTest"}})))
            .with_status(201)
            .with_header("azure-asyncoperation", &op)
            .with_body(r#"{"name":"sandbox","properties":{"provisioningState":"Accepted"}}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/operations/create-sandbox")
            .with_status(200)
            .with_body(r#"{"status":"Succeeded"}"#)
            .create_async()
            .await;
        server
            .mock("GET", ALIAS_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"name":"sandbox","properties":{"subscriptionId":"sub-7","provisioningState":"Succeeded"}}"#)
            .create_async()
            .await;

        let session = session(&server, OutputFormat::Json);
        let mut out = Vec::new();
        handle(SubCommand::Create(create_args()), &session, &mut out)
            .await
            .unwrap();

        let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed["properties"]["subscriptionId"], "sub-7");
    }

    #[tokio::test]
    async fn create_surfaces_failed_provisioning() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", ALIAS_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"name":"sandbox","properties":{"provisioningState":"Failed"},"error":{"message":"billing scope not found"}}"#)
            .create_async()
            .await;

        let session = session(&server, OutputFormat::Json);
        let mut out = Vec::new();
        let err = handle(SubCommand::Create(create_args()), &session, &mut out)
            .await
            .unwrap_err();

        assert!(out.is_empty());
        assert!(err.to_string().contains("billing scope not found"));
    }

    #[tokio::test]
    async fn accept_prints_request_then_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "POST",
                "/providers/Microsoft.Subscription/subscriptions/sub-42/acceptOwnership",
            )
            .match_query(Matcher::UrlEncoded("api-version".into(), "2021-10-01".into()))
            .match_body(Matcher::Json(json!({
                "properties": {
                    "displayName": "Payments",
                    "managementGroupId": "/providers/Microsoft.Management/managementGroups/finance"
                }
            })))
            .with_status(202)
            .create_async()
            .await;

        let session = session(&server, OutputFormat::Json);
        let mut out = Vec::new();
        handle(SubCommand::Accept(accept_args(Some("finance"))), &session, &mut out)
            .await
            .unwrap();

        mock.assert_async().await;
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("{\n\t\"properties\": {"));
        assert!(text.ends_with("Subscription ownership accepted 202\n"));
    }

    #[tokio::test]
    async fn accept_not_found_names_subscription_and_code() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock(
                "POST",
                "/providers/Microsoft.Subscription/subscriptions/sub-42/acceptOwnership",
            )
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"error":{"code":"SubscriptionNotFound","message":"missing"}}"#)
            .create_async()
            .await;

        let session = session(&server, OutputFormat::Json);
        let mut out = Vec::new();
        let err = handle(SubCommand::Accept(accept_args(None)), &session, &mut out)
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("sub-42"));
        assert!(message.contains("404"));
        assert!(!message.contains("SubscriptionNotFound"));
        assert!(String::from_utf8(out).unwrap().contains("SubscriptionNotFound"));
    }
}
