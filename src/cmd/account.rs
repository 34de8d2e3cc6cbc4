use super::error::{CommandError, CommandResult};
use super::{AccountCommand, GivePermissionArgs, Session};
use crate::arm::{EnrollmentAccountSummary, EnrollmentAccountsClient, RoleAssignmentsClient};
use crate::output::{self, cell};
use std::io::Write;
use tabled::Tabled;

#[derive(Tabled)]
struct EnrollmentAccountRow {
    name: String,
    principal: String,
}

impl From<&EnrollmentAccountSummary> for EnrollmentAccountRow {
    fn from(account: &EnrollmentAccountSummary) -> Self {
        Self {
            name: cell(account.name.as_deref()),
            principal: cell(
                account
                    .properties
                    .as_ref()
                    .and_then(|p| p.principal_name.as_deref()),
            ),
        }
    }
}

pub async fn handle<W: Write>(action: AccountCommand, session: &Session, out: &mut W) -> CommandResult<()> {
    match action {
        AccountCommand::List => list(session, out).await,
        AccountCommand::GivePermission(args) => give_permission(args, session, out).await,
    }
}

async fn list<W: Write>(session: &Session, out: &mut W) -> CommandResult<()> {
    let accounts = EnrollmentAccountsClient::new(&session.arm)
        .list()
        .collect_all()
        .await?;

    tracing::info!(count = accounts.len(), "listed enrollment accounts");
    output::render(out, session.output, &accounts, || {
        accounts.iter().map(EnrollmentAccountRow::from).collect()
    })
}

async fn give_permission<W: Write>(
    args: GivePermissionArgs,
    session: &Session,
    out: &mut W,
) -> CommandResult<()> {
    let (role_definition_id, response) = RoleAssignmentsClient::new(&session.arm)
        .grant_subscription_creator(
            &args.billing_account_number,
            &args.enrollment_account_number,
            &args.principal_id,
            &args.principal_tenant_id,
        )
        .await?;

    output::write_raw(out, &response)?;

    if !response.is_success() {
        return Err(CommandError::RequestFailed {
            action: "assign role",
            target: role_definition_id,
            status: response.status,
        });
    }

    output::status_line(out, "Role applied", response.status, session.color)
}
