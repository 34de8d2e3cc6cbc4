use super::error::CommandResult;
use super::{BillingCommand, Session};
use crate::arm::{BillingAccount, BillingAccountsClient};
use crate::output::{self, cell};
use std::io::Write;
use tabled::Tabled;

#[derive(Tabled)]
struct BillingAccountRow {
    name: String,
    display_name: String,
    agreement: String,
    status: String,
}

impl From<&BillingAccount> for BillingAccountRow {
    fn from(account: &BillingAccount) -> Self {
        let props = account.properties.as_ref();
        Self {
            name: cell(account.name.as_deref()),
            display_name: cell(props.and_then(|p| p.display_name.as_deref())),
            agreement: cell(props.and_then(|p| p.agreement_type.as_deref())),
            status: cell(props.and_then(|p| p.account_status.as_deref())),
        }
    }
}

pub async fn handle<W: Write>(action: BillingCommand, session: &Session, out: &mut W) -> CommandResult<()> {
    match action {
        BillingCommand::List => {
            let accounts = BillingAccountsClient::new(&session.arm)
                .list()
                .collect_all()
                .await?;

            tracing::info!(count = accounts.len(), "listed billing accounts");
            output::render(out, session.output, &accounts, || {
                accounts.iter().map(BillingAccountRow::from).collect()
            })
        }
    }
}
