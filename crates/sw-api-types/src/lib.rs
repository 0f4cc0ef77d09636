pub use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest units per display unit (wei per ether).
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Number of fractional digits in the display unit.
pub const ETHER_DECIMALS: usize = 18;

pub const ETHER_UNIT_LABEL: &str = "Ether";

/// Address text exactly as supplied by the user or the provider.
///
/// No format validation happens here; the provider rejects malformed
/// addresses when it encodes a call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct AccountAddress(pub String);

impl AccountAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("amount '{0}' is not a decimal number")]
    NotNumeric(String),
    #[error("amount '{0}' has more than 18 fractional digits")]
    TooPrecise(String),
    #[error("amount '{0}' does not fit in 256 bits of wei")]
    Overflow(String),
    #[error("'{0}' is not a hex quantity")]
    InvalidQuantity(String),
}

/// Native-currency amount in its smallest unit.
///
/// Backed by a 256-bit integer so any on-chain balance or `uint256`
/// argument is representable.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct Wei(pub U256);

impl From<u128> for Wei {
    fn from(value: u128) -> Self {
        Wei(U256::from(value))
    }
}

impl Wei {
    pub const ZERO: Wei = Wei(U256::ZERO);

    /// Convert a display-unit decimal string (`"1.5"`) into wei.
    pub fn from_ether_str(input: &str) -> Result<Wei, AmountError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }

        let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
            return Err(AmountError::NotNumeric(trimmed.to_owned()));
        }
        if fraction.len() > ETHER_DECIMALS {
            return Err(AmountError::TooPrecise(trimmed.to_owned()));
        }

        let overflow = || AmountError::Overflow(trimmed.to_owned());
        let whole_wei = if whole.is_empty() {
            U256::ZERO
        } else {
            U256::from_str_radix(whole, 10).map_err(|_| overflow())?
        };
        // 18 digits always fit in a u64.
        let fraction_wei = if fraction.is_empty() {
            0
        } else {
            format!("{fraction:0<width$}", width = ETHER_DECIMALS)
                .parse::<u64>()
                .map_err(|_| overflow())?
        };

        whole_wei
            .checked_mul(U256::from(WEI_PER_ETHER))
            .and_then(|w| w.checked_add(U256::from(fraction_wei)))
            .map(Wei)
            .ok_or_else(overflow)
    }

    /// Exact `raw / 10^18` rendering with trailing fractional zeros removed.
    pub fn to_ether_string(&self) -> String {
        let per_ether = U256::from(WEI_PER_ETHER);
        let whole = self.0 / per_ether;
        // Below 10^18, so the low limb holds the whole value.
        let fraction = (self.0 % per_ether).as_limbs()[0];
        if fraction == 0 {
            return whole.to_string();
        }
        let digits = format!("{fraction:0width$}", width = ETHER_DECIMALS);
        format!("{whole}.{}", digits.trim_end_matches('0'))
    }

    /// Decode a JSON-RPC `QUANTITY` (`0x`-prefixed hex).
    pub fn from_hex_quantity(input: &str) -> Result<Wei, AmountError> {
        let digits = input
            .strip_prefix("0x")
            .or_else(|| input.strip_prefix("0X"))
            .filter(|d| !d.is_empty())
            .ok_or_else(|| AmountError::InvalidQuantity(input.to_owned()))?;
        U256::from_str_radix(digits, 16)
            .map(Wei)
            .map_err(|_| AmountError::InvalidQuantity(input.to_owned()))
    }

    /// Encode as a JSON-RPC `QUANTITY`: no leading zeros, `0x0` for zero.
    pub fn to_hex_quantity(&self) -> String {
        let digits = hex::encode(self.to_be_bytes());
        match digits.trim_start_matches('0') {
            "" => "0x0".to_owned(),
            significant => format!("0x{significant}"),
        }
    }

    /// Big-endian 32-byte word, as used by ABI `uint256` arguments.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        self.0.to_be_bytes::<32>()
    }
}

/// Named output slots the controller writes to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DisplaySlot {
    CurrentAccount,
    WalletBalance,
    AllowedToSend,
    Status,
}

impl DisplaySlot {
    pub const ALL: [DisplaySlot; 4] = [
        DisplaySlot::CurrentAccount,
        DisplaySlot::WalletBalance,
        DisplaySlot::AllowedToSend,
        DisplaySlot::Status,
    ];

    pub fn element_id(&self) -> &'static str {
        match self {
            DisplaySlot::CurrentAccount => "currentAccount",
            DisplaySlot::WalletBalance => "walletBalance",
            DisplaySlot::AllowedToSend => "allowedToSend",
            DisplaySlot::Status => "status",
        }
    }
}

/// Named user inputs the controller reads (and clears after a transfer).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum InputField {
    AddressAllowSender,
    AmountDeposit,
    AmountWithdrawal,
    AddressWithdrawal,
}

impl InputField {
    pub fn element_id(&self) -> &'static str {
        match self {
            InputField::AddressAllowSender => "addressAllowSender",
            InputField::AmountDeposit => "amountDeposit",
            InputField::AmountWithdrawal => "amountWithdrawal",
            InputField::AddressWithdrawal => "addressWithdrawal",
        }
    }
}

/// Resolved reference to the single deployed wallet contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContractHandle {
    pub address: AccountAddress,
    pub network_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: String,
    pub block_number: Option<u64>,
    pub gas_used: Option<u64>,
}
