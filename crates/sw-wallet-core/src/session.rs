use sw_api_types::AccountAddress;

/// Accounts discovered at bootstrap. The first one signs every write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub active_account: AccountAddress,
    pub known_accounts: Vec<AccountAddress>,
}

impl Session {
    /// `None` when the provider reported no accounts.
    pub fn from_accounts(accounts: Vec<AccountAddress>) -> Option<Self> {
        let active_account = accounts.first()?.clone();
        Some(Self {
            active_account,
            known_accounts: accounts,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Uninitialized,
    Active(Session),
}

impl SessionState {
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Active(_))
    }

    pub fn active_account(&self) -> Option<&AccountAddress> {
        match self {
            SessionState::Active(session) => Some(&session.active_account),
            SessionState::Uninitialized => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> AccountAddress {
        AccountAddress(s.to_owned())
    }

    #[test]
    fn first_account_becomes_active() {
        let session = Session::from_accounts(vec![addr("0xaa"), addr("0xbb")]).unwrap();
        assert_eq!(session.active_account, addr("0xaa"));
        assert_eq!(session.known_accounts.len(), 2);
    }

    #[test]
    fn empty_account_list_yields_no_session() {
        assert_eq!(Session::from_accounts(Vec::new()), None);
    }

    #[test]
    fn default_state_is_uninitialized() {
        let state = SessionState::default();
        assert!(!state.is_active());
        assert_eq!(state.active_account(), None);
    }
}
