//! User-visible texts written to the `status` slot and alert dialogs.

pub const ALERT_ACCOUNTS_ERROR: &str = "There was an error fetching your accounts.";
pub const ALERT_NO_ACCOUNTS: &str = "Couldn't get any accounts! Make sure your wallet provider is unlocked or your Ethereum node contains accounts.";

pub const BALANCE_ERROR: &str = "Error getting balance; see log.";
pub const PERMISSION_READ_ERROR: &str = "Error allowing Account; see log.";

pub const IN_PROGRESS: &str = "Initiating transaction... (please wait)";
pub const ALLOW_SUCCESS: &str = "Sender allowed successfully!";
pub const DEPOSIT_SUCCESS: &str = "Ether deposited successfully";
pub const WITHDRAW_SUCCESS: &str = "Ether sent successfully";

/// Shared by every write failure regardless of cause.
pub const WRITE_ERROR: &str = "Error allowing sender; see log.";

pub const BUSY: &str = "Transaction already in progress; please wait.";

pub const NOT_ALLOWED_FRAGMENT: &str = "<strong>not</strong>";
