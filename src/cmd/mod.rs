pub mod account;
pub mod billing;
pub mod error;
pub mod role;
pub mod sub;

use crate::arm::{ArmClient, PollOptions, Workload};
use crate::auth::Credential;
use crate::config::{Config, OutputFormat};
use crate::prompt;
use clap::{ArgAction, Args, Parser, Subcommand};
use error::CommandResult;
use std::io::{IsTerminal, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ea-cli",
    version,
    about = "A CLI to help you create subscriptions",
    long_about = "Creating subscriptions under an Enterprise Agreement can sometimes be a confusing process. This CLI helps you create subscriptions on Azure."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Use service principal to authenticate
    #[arg(long, global = true)]
    pub service_principal: bool,
    /// Username (client id) to authenticate
    #[arg(short = 'u', long, global = true, env = "EA_CLI_USERNAME")]
    pub username: Option<String>,
    /// Password (client secret) to authenticate
    #[arg(
        short = 'p',
        long,
        global = true,
        env = "EA_CLI_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,
    /// Tenant ID to authenticate
    #[arg(long, visible_alias = "login-tenant", global = true, env = "EA_CLI_TENANT")]
    pub tenant: Option<String>,
    /// Output format
    #[arg(long, global = true, value_enum, env = "EA_CLI_OUTPUT")]
    pub output: Option<OutputFormat>,
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    /// Path to a config file
    #[arg(long, global = true, env = "EA_CLI_CONFIG")]
    pub config: Option<PathBuf>,
    /// Resource Manager endpoint
    #[arg(long, global = true, env = "EA_CLI_ENDPOINT", hide = true)]
    pub endpoint: Option<String>,
    /// Identity platform authority
    #[arg(long, global = true, env = "EA_CLI_AUTHORITY", hide = true)]
    pub authority: Option<String>,
    /// HTTP request timeout in seconds
    #[arg(long, global = true, env = "EA_CLI_TIMEOUT_SECS", hide = true)]
    pub timeout_secs: Option<u64>,
    /// Seconds between polls of a long-running operation
    #[arg(long, global = true, env = "EA_CLI_POLL_INTERVAL_SECS", hide = true)]
    pub poll_interval_secs: Option<u64>,
    /// Seconds to wait for a long-running operation
    #[arg(long, global = true, env = "EA_CLI_POLL_TIMEOUT_SECS", hide = true)]
    pub poll_timeout_secs: Option<u64>,
}

impl GlobalArgs {
    /// Layers command line values over the config file.
    pub fn apply(&self, config: Config) -> Config {
        Config {
            tenant: self.tenant.clone().or(config.tenant),
            endpoint: self.endpoint.clone().unwrap_or(config.endpoint),
            authority: self.authority.clone().unwrap_or(config.authority),
            output: self.output.unwrap_or(config.output),
            timeout_secs: self.timeout_secs.unwrap_or(config.timeout_secs),
            poll_interval_secs: self.poll_interval_secs.unwrap_or(config.poll_interval_secs),
            poll_timeout_secs: self.poll_timeout_secs.unwrap_or(config.poll_timeout_secs),
        }
    }

    /// Builds the credential, asking for the client secret on a terminal
    /// when it was not supplied.
    pub fn credential(&self, config: &Config) -> CommandResult<Credential> {
        let password = match (&self.password, &self.username) {
            (Some(password), _) => Some(password.clone()),
            (None, Some(client_id)) if self.service_principal && std::io::stdin().is_terminal() => {
                Some(prompt::client_secret(client_id).map_err(crate::auth::AuthError::from)?)
            }
            _ => None,
        };

        Ok(Credential::from_flags(
            self.service_principal,
            self.username.clone(),
            password,
            config.tenant.clone(),
        )?)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage EA accounts
    #[command(subcommand)]
    Account(AccountCommand),
    /// Manage EA billing
    #[command(subcommand)]
    Billing(BillingCommand),
    /// Manage EA roles
    #[command(subcommand)]
    Role(RoleCommand),
    /// Manage subscriptions
    #[command(subcommand)]
    Sub(SubCommand),
}

#[derive(Subcommand, Debug)]
pub enum AccountCommand {
    /// List enrollment accounts
    List,
    /// Grant the subscription creator role on an enrollment account
    GivePermission(GivePermissionArgs),
}

#[derive(Args, Debug)]
pub struct GivePermissionArgs {
    /// Object ID to assign the permission to
    #[arg(long)]
    pub principal_id: String,
    /// Tenant ID of the principal
    #[arg(long)]
    pub principal_tenant_id: String,
    /// Billing account number to assign the permission to
    #[arg(long)]
    pub billing_account_number: String,
    /// Enrollment account number to assign the permission to
    #[arg(long)]
    pub enrollment_account_number: String,
}

#[derive(Subcommand, Debug)]
pub enum BillingCommand {
    /// List billing accounts
    List,
}

#[derive(Subcommand, Debug)]
pub enum RoleCommand {
    /// List billing role definitions across every billing account
    List,
}

#[derive(Subcommand, Debug)]
pub enum SubCommand {
    /// List alias subscriptions created by the user
    AliasList,
    /// Create a subscription
    Create(CreateArgs),
    /// Accepts a subscription ownership
    Accept(AcceptArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Name of the subscription alias
    #[arg(short = 'n', long)]
    pub name: String,
    /// Display name of the subscription
    #[arg(short = 'd', long)]
    pub display_name: String,
    /// Tenant ID of the subscription
    #[arg(short = 't', long)]
    pub sub_tenant: String,
    /// Workload of the subscription
    #[arg(short = 'w', long, value_enum, default_value_t = Workload::Production)]
    pub workload: Workload,
    /// Subscription owner object ID
    #[arg(short = 'o', long)]
    pub subscription_owner: String,
    /// Enrollment account billing scope
    #[arg(short = 'e', long)]
    pub enrollment_account: String,
    /// Management group ID
    #[arg(short = 'g', long)]
    pub management_group_id: Option<String>,
}

#[derive(Args, Debug)]
pub struct AcceptArgs {
    /// Id of the subscription that you are accepting ownership for
    #[arg(short = 's', long)]
    pub subscription: String,
    /// Display name of the subscription
    #[arg(short = 'd', long)]
    pub display_name: String,
    /// Management group ID of the subscription
    #[arg(short = 'm', long)]
    pub management_group_id: Option<String>,
}

/// What a handler needs for one invocation.
pub struct Session {
    pub arm: ArmClient,
    pub output: OutputFormat,
    pub poll: PollOptions,
    pub color: bool,
}

impl Session {
    pub fn new(arm: ArmClient, config: &Config) -> Self {
        Self {
            arm,
            output: config.output,
            poll: PollOptions {
                interval: config.poll_interval(),
                timeout: config.poll_timeout(),
            },
            color: std::io::stdout().is_terminal(),
        }
    }
}

pub async fn dispatch<W: Write>(command: Command, session: &Session, out: &mut W) -> CommandResult<()> {
    match command {
        Command::Account(action) => account::handle(action, session, out).await,
        Command::Billing(action) => billing::handle(action, session, out).await,
        Command::Role(action) => role::handle(action, session, out).await,
        Command::Sub(action) => sub::handle(action, session, out).await,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, error::ErrorKind};

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("ea-cli").chain(args.iter().copied()))
    }

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn give_permission_requires_every_flag() {
        let full = [
            "--principal-id",
            "p",
            "--principal-tenant-id",
            "t",
            "--billing-account-number",
            "b",
            "--enrollment-account-number",
            "e",
        ];
        assert!(parse(&[&["account", "give-permission"][..], &full[..]].concat()).is_ok());

        for skip in (0..full.len()).step_by(2) {
            let mut args = vec!["account", "give-permission"];
            for (i, pair) in full.chunks(2).enumerate() {
                if i * 2 != skip {
                    args.extend_from_slice(pair);
                }
            }
            let err = parse(&args).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument, "missing {}", full[skip]);
        }
    }

    #[test]
    fn create_requires_identity_flags_but_not_optional_ones() {
        let cli = parse(&[
            "sub", "create", "-n", "alias", "-d", "Alias", "-t", "tenant", "-o", "owner", "-e",
            "/providers/Microsoft.Billing/billingAccounts/1/enrollmentAccounts/2",
        ])
        .unwrap();

        match cli.command {
            Command::Sub(SubCommand::Create(args)) => {
                assert_eq!(args.workload, Workload::Production);
                assert_eq!(args.subscription_owner, "owner");
                assert!(args.management_group_id.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let err = parse(&["sub", "create", "-n", "alias", "-d", "Alias", "-t", "tenant", "-e", "x"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn workload_accepts_dev_test() {
        let cli = parse(&[
            "sub", "create", "-n", "a", "-d", "A", "-t", "t", "-o", "o", "-e", "e", "-w", "DevTest",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Sub(SubCommand::Create(CreateArgs { workload: Workload::DevTest, .. }))
        ));
    }

    #[test]
    fn accept_requires_subscription_and_display_name() {
        assert!(parse(&["sub", "accept", "-s", "sub", "-d", "Name"]).is_ok());
        assert_eq!(
            parse(&["sub", "accept", "-d", "Name"]).unwrap_err().kind(),
            ErrorKind::MissingRequiredArgument
        );
        assert_eq!(
            parse(&["sub", "accept", "-s", "sub"]).unwrap_err().kind(),
            ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn auth_flags_are_global_and_login_tenant_is_an_alias() {
        let cli = parse(&[
            "billing",
            "list",
            "--service-principal",
            "-u",
            "app",
            "-p",
            "secret",
            "--login-tenant",
            "contoso",
        ])
        .unwrap();

        assert!(cli.global.service_principal);
        assert_eq!(cli.global.username.as_deref(), Some("app"));
        assert_eq!(cli.global.tenant.as_deref(), Some("contoso"));
    }

    #[test]
    fn flags_override_config_values() {
        let cli = parse(&["--tenant", "flag", "--output", "yaml", "role", "list"]).unwrap();
        let config = Config {
            tenant: Some("file".into()),
            output: OutputFormat::Table,
            timeout_secs: 7,
            ..Config::default()
        };

        let merged = cli.global.apply(config);
        assert_eq!(merged.tenant.as_deref(), Some("flag"));
        assert_eq!(merged.output, OutputFormat::Yaml);
        assert_eq!(merged.timeout_secs, 7);
    }

    #[test]
    fn durations_can_be_overridden_per_invocation() {
        let cli = parse(&[
            "--timeout-secs",
            "15",
            "--poll-interval-secs",
            "2",
            "--poll-timeout-secs",
            "120",
            "billing",
            "list",
        ])
        .unwrap();

        let merged = cli.global.apply(Config::default());
        assert_eq!(merged.timeout_secs, 15);
        assert_eq!(merged.poll_interval_secs, 2);
        assert_eq!(merged.poll_timeout_secs, 120);
        assert_eq!(merged.endpoint, Config::default().endpoint);
    }
}
