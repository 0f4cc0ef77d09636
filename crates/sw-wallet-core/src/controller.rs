use std::cell::RefCell;
use std::collections::HashSet;

use anyhow::Result;
use sw_api_types::{AccountAddress, DisplaySlot, InputField, TxReceipt, Wei};
use sw_chain_client::{TxOptions, WalletProvider};
use tracing::{debug, error, info, warn};

use crate::messages;
use crate::presenter::Presenter;
use crate::session::{Session, SessionState};
use crate::{ControllerConfig, PermissionDisplay, SubmitPolicy, WalletError, WriteKind};

/// Drives every user-facing operation against one provider and one presenter.
///
/// All state lives behind `RefCell`s on a single cooperative thread; no
/// borrow is held across an `.await`, so any number of operations may be
/// in flight at once.
pub struct WalletController<P, V> {
    provider: P,
    presenter: V,
    config: ControllerConfig,
    session: RefCell<SessionState>,
    in_flight: RefCell<HashSet<WriteKind>>,
}

/// Releases a single-flight slot when the write settles.
struct InFlightGuard<'a> {
    in_flight: &'a RefCell<HashSet<WriteKind>>,
    kind: WriteKind,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.borrow_mut().remove(&self.kind);
    }
}

impl<P, V> WalletController<P, V>
where
    P: WalletProvider,
    V: Presenter,
{
    pub fn new(provider: P, presenter: V, config: ControllerConfig) -> Self {
        Self {
            provider,
            presenter,
            config,
            session: RefCell::new(SessionState::Uninitialized),
            in_flight: RefCell::new(HashSet::new()),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn presenter(&self) -> &V {
        &self.presenter
    }

    pub fn session(&self) -> SessionState {
        self.session.borrow().clone()
    }

    pub fn active_account(&self) -> Option<AccountAddress> {
        self.session.borrow().active_account().cloned()
    }

    /// Discover accounts, establish the session, then run both readers.
    pub async fn bootstrap(&self) -> Result<(), WalletError> {
        let accounts = match self.provider.accounts().await {
            Ok(accounts) => accounts,
            Err(err) => {
                error!("account discovery failed: {err:#}");
                self.presenter.alert(messages::ALERT_ACCOUNTS_ERROR);
                return Err(WalletError::AccountDiscovery(err));
            }
        };

        let Some(session) = Session::from_accounts(accounts) else {
            warn!("provider returned an empty account list");
            self.presenter.alert(messages::ALERT_NO_ACCOUNTS);
            return Err(WalletError::NoAccounts);
        };

        info!(
            account = %session.active_account,
            known = session.known_accounts.len(),
            "session established"
        );
        self.presenter
            .render(DisplaySlot::CurrentAccount, session.active_account.as_str());
        *self.session.borrow_mut() = SessionState::Active(session);

        self.refresh_reads().await;
        Ok(())
    }

    /// Render the contract's on-chain balance in the display unit.
    pub async fn refresh_balance(&self) -> Result<(), WalletError> {
        match self.read_balance().await {
            Ok(balance) => {
                let text = format!("{} {}", balance.to_ether_string(), self.config.unit_label);
                self.presenter.render(DisplaySlot::WalletBalance, &text);
                Ok(())
            }
            Err(err) => {
                error!("balance query failed: {err:#}");
                self.presenter
                    .render(DisplaySlot::Status, messages::BALANCE_ERROR);
                Err(WalletError::Read(err))
            }
        }
    }

    /// Check whether the active account may move funds.
    pub async fn update_allowed_to_send(&self) -> Result<(), WalletError> {
        let account = self.require_account("update_allowed_to_send")?;

        match self.read_permission(&account).await {
            Ok(allowed) => {
                self.render_permission(allowed);
                Ok(())
            }
            Err(err) => {
                error!("permission query failed: {err:#}");
                self.presenter
                    .render(DisplaySlot::Status, messages::PERMISSION_READ_ERROR);
                Err(WalletError::Read(err))
            }
        }
    }

    /// Authorize the address in `addressAllowSender` to send funds.
    pub async fn allow_sender(&self) -> Result<(), WalletError> {
        let account = self.require_account("allow_sender")?;
        let guard = self.begin_write(WriteKind::AllowSender)?;

        let receiver = AccountAddress(self.presenter.input(InputField::AddressAllowSender));
        self.presenter.render(DisplaySlot::Status, messages::IN_PROGRESS);

        let opts = TxOptions::sender(&account);
        let result = async {
            let contract = self.provider.deployed().await?;
            self.provider
                .allow_address_to_send(&contract, &receiver, &opts)
                .await
        }
        .await;
        drop(guard);

        match result {
            Ok(receipt) => {
                log_receipt(WriteKind::AllowSender, &receipt);
                self.presenter
                    .render(DisplaySlot::Status, messages::ALLOW_SUCCESS);
                self.refresh_reads().await;
                Ok(())
            }
            Err(err) => Err(self.write_failed(WriteKind::AllowSender, err)),
        }
    }

    /// Transfer `amountDeposit` ether from the active account to the contract.
    pub async fn deposit(&self) -> Result<(), WalletError> {
        let account = self.require_account("deposit")?;
        let guard = self.begin_write(WriteKind::Deposit)?;

        let amount = self.read_amount(InputField::AmountDeposit, WriteKind::Deposit)?;
        let opts = TxOptions::sender(&account).with_value(amount);
        let result = async {
            let contract = self.provider.deployed().await?;
            self.provider.deposit(&contract, &opts).await
        }
        .await;
        drop(guard);

        match result {
            Ok(receipt) => {
                log_receipt(WriteKind::Deposit, &receipt);
                self.presenter
                    .render(DisplaySlot::Status, messages::DEPOSIT_SUCCESS);
                self.presenter.clear_input(InputField::AmountDeposit);
                let _ = self.refresh_balance().await;
                Ok(())
            }
            Err(err) => Err(self.write_failed(WriteKind::Deposit, err)),
        }
    }

    /// Have the contract send `amountWithdrawal` ether to `addressWithdrawal`.
    pub async fn withdraw(&self) -> Result<(), WalletError> {
        let account = self.require_account("withdraw")?;
        let guard = self.begin_write(WriteKind::Withdraw)?;

        let amount = self.read_amount(InputField::AmountWithdrawal, WriteKind::Withdraw)?;
        let destination = AccountAddress(self.presenter.input(InputField::AddressWithdrawal));
        let opts = TxOptions::sender(&account).with_gas(self.config.withdraw_gas);
        let result = async {
            let contract = self.provider.deployed().await?;
            self.provider
                .send_funds(&contract, amount, &destination, &opts)
                .await
        }
        .await;
        drop(guard);

        match result {
            Ok(receipt) => {
                log_receipt(WriteKind::Withdraw, &receipt);
                self.presenter
                    .render(DisplaySlot::Status, messages::WITHDRAW_SUCCESS);
                self.presenter.clear_input(InputField::AmountWithdrawal);
                self.presenter.clear_input(InputField::AddressWithdrawal);
                let _ = self.refresh_balance().await;
                Ok(())
            }
            Err(err) => Err(self.write_failed(WriteKind::Withdraw, err)),
        }
    }

    async fn refresh_reads(&self) {
        let _ = futures::join!(self.refresh_balance(), self.update_allowed_to_send());
    }

    async fn read_balance(&self) -> Result<Wei> {
        let contract = self.provider.deployed().await?;
        self.provider.balance_of(&contract.address).await
    }

    async fn read_permission(&self, account: &AccountAddress) -> Result<bool> {
        let contract = self.provider.deployed().await?;
        self.provider
            .is_allowed_to_send(&contract, account, account)
            .await
    }

    fn render_permission(&self, allowed: bool) {
        match (allowed, self.config.permission_display) {
            (false, _) => self
                .presenter
                .render(DisplaySlot::AllowedToSend, messages::NOT_ALLOWED_FRAGMENT),
            (true, PermissionDisplay::Always) => {
                self.presenter.render(DisplaySlot::AllowedToSend, "")
            }
            (true, PermissionDisplay::NegativeOnly) => {
                debug!("active account is allowed to send; allowedToSend left as is")
            }
        }
    }

    fn require_account(&self, operation: &str) -> Result<AccountAddress, WalletError> {
        self.active_account().ok_or_else(|| {
            warn!(operation, "triggered before bootstrap completed");
            WalletError::NotBootstrapped
        })
    }

    fn begin_write(&self, kind: WriteKind) -> Result<Option<InFlightGuard<'_>>, WalletError> {
        if self.config.submit_policy == SubmitPolicy::Unrestricted {
            return Ok(None);
        }

        if !self.in_flight.borrow_mut().insert(kind) {
            warn!(%kind, "write rejected; one is already in flight");
            self.presenter.render(DisplaySlot::Status, messages::BUSY);
            return Err(WalletError::Busy(kind));
        }

        Ok(Some(InFlightGuard {
            in_flight: &self.in_flight,
            kind,
        }))
    }

    fn read_amount(&self, field: InputField, kind: WriteKind) -> Result<Wei, WalletError> {
        let raw = self.presenter.input(field);
        Wei::from_ether_str(&raw).map_err(|err| {
            error!(%kind, "rejected amount: {err}");
            self.presenter.render(DisplaySlot::Status, messages::WRITE_ERROR);
            WalletError::InvalidAmount(err)
        })
    }

    fn write_failed(&self, kind: WriteKind, err: anyhow::Error) -> WalletError {
        error!(%kind, "write failed: {err:#}");
        self.presenter.render(DisplaySlot::Status, messages::WRITE_ERROR);
        WalletError::Write(err)
    }
}

fn log_receipt(kind: WriteKind, receipt: &TxReceipt) {
    info!(
        %kind,
        tx_hash = %receipt.tx_hash,
        block = ?receipt.block_number,
        "transaction confirmed"
    );
}
