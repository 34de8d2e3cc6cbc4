use super::error::CommandResult;
use super::{RoleCommand, Session};
use crate::arm::{ArmClient, ArmResult, BillingAccountsClient, RoleDefinition, RoleDefinitionsClient};
use crate::output::{self, cell};
use std::io::Write;
use tabled::Tabled;

#[derive(Tabled)]
struct RoleDefinitionRow {
    name: String,
    role: String,
    description: String,
}

impl From<&RoleDefinition> for RoleDefinitionRow {
    fn from(role: &RoleDefinition) -> Self {
        let props = role.properties.as_ref();
        Self {
            name: cell(role.name.as_deref()),
            role: cell(props.and_then(|p| p.role_name.as_deref())),
            description: cell(props.and_then(|p| p.description.as_deref())),
        }
    }
}

/// Role definitions of every billing account, in account order then role
/// order. Accounts are visited one at a time.
pub async fn list_all(arm: &ArmClient) -> ArmResult<Vec<RoleDefinition>> {
    let roles_client = RoleDefinitionsClient::new(arm);
    let mut accounts = BillingAccountsClient::new(arm).list();
    let mut roles = Vec::new();

    while accounts.more() {
        let Some(page) = accounts.next_page().await else {
            break;
        };

        for account in page? {
            let Some(name) = account.name.as_deref() else {
                tracing::warn!(id = ?account.id, "billing account without a name, skipping");
                continue;
            };

            let scoped = roles_client.list_by_billing_account(name).collect_all().await?;
            tracing::debug!(account = name, count = scoped.len(), "listed role definitions");
            roles.extend(scoped);
        }
    }

    Ok(roles)
}

pub async fn handle<W: Write>(action: RoleCommand, session: &Session, out: &mut W) -> CommandResult<()> {
    match action {
        RoleCommand::List => {
            let roles = list_all(&session.arm).await?;

            output::render(out, session.output, &roles, || {
                roles.iter().map(RoleDefinitionRow::from).collect()
            })
        }
    }
}
