//! SimpleWallet client controller.
//!
//! Sequences account discovery, balance and permission reads, and the
//! wallet contract's write calls, and maps every outcome onto display
//! slots through a [`Presenter`].

mod controller;
pub mod messages;
pub mod presenter;
pub mod session;

use sw_api_types::{AmountError, ETHER_UNIT_LABEL};
use thiserror::Error;

pub use controller::WalletController;
pub use presenter::{InMemoryPresenter, Presenter};
pub use session::{Session, SessionState};

/// Gas ceiling for `sendFunds`, which forwards value from inside the contract.
pub const DEFAULT_WITHDRAW_GAS: u64 = 1_000_000;

/// How a positive permission check is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PermissionDisplay {
    /// Only a negative result writes `allowedToSend`.
    #[default]
    NegativeOnly,
    /// Both outcomes write `allowedToSend`.
    Always,
}

/// Admission of concurrent writes of the same kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitPolicy {
    #[default]
    Unrestricted,
    /// Reject a write while another of the same kind is still in flight.
    SingleFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteKind {
    AllowSender,
    Deposit,
    Withdraw,
}

impl std::fmt::Display for WriteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            WriteKind::AllowSender => "allow-sender",
            WriteKind::Deposit => "deposit",
            WriteKind::Withdraw => "withdraw",
        })
    }
}

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub withdraw_gas: u64,
    pub unit_label: String,
    pub permission_display: PermissionDisplay,
    pub submit_policy: SubmitPolicy,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            withdraw_gas: DEFAULT_WITHDRAW_GAS,
            unit_label: ETHER_UNIT_LABEL.to_owned(),
            permission_display: PermissionDisplay::default(),
            submit_policy: SubmitPolicy::default(),
        }
    }
}

/// Outcome of an operation after it has already updated the display.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("account discovery failed: {0:#}")]
    AccountDiscovery(anyhow::Error),
    #[error("provider returned no accounts")]
    NoAccounts,
    #[error("no active session; bootstrap has not completed")]
    NotBootstrapped,
    #[error("a {0} transaction is already in flight")]
    Busy(WriteKind),
    #[error("read query failed: {0:#}")]
    Read(anyhow::Error),
    #[error("write call failed: {0:#}")]
    Write(anyhow::Error),
    #[error(transparent)]
    InvalidAmount(#[from] AmountError),
}
