//! Account discovery for a headless deployment.

use alloy_primitives::Address;

use crate::collaborators::Wallet;

/// The account the relayer signs for, fixed at startup.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticWallet {
    account: Option<Address>,
}

impl StaticWallet {
    pub fn new(account: Option<Address>) -> Self {
        Self { account }
    }
}

impl Wallet for StaticWallet {
    fn current_account(&self) -> Option<Address> {
        self.account
    }
}
