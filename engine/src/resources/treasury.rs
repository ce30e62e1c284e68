//! Vault balances, payouts to external accounts and governance-minted currencies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use decree_types::CapabilityKind;

use super::capability::CapabilityLoan;
use crate::error::ResourceError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub supply: u64,
    #[serde(default)]
    pub max_supply: Option<u64>,
    #[serde(default)]
    pub holders: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Treasury {
    vaults: BTreeMap<String, u64>,
    accounts: BTreeMap<String, u64>,
    currencies: BTreeMap<String, Currency>,
}

impl Treasury {
    pub fn open_vault(&mut self, name: &str, balance: u64) -> Result<(), ResourceError> {
        if self.vaults.contains_key(name) {
            return Err(ResourceError::VaultExists(name.to_owned()));
        }
        self.vaults.insert(name.to_owned(), balance);
        Ok(())
    }

    #[must_use]
    pub fn vault_balance(&self, name: &str) -> Option<u64> {
        self.vaults.get(name).copied()
    }

    /// Balance paid out to an external account; zero if never paid.
    #[must_use]
    pub fn account_balance(&self, name: &str) -> u64 {
        self.accounts.get(name).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn currency(&self, symbol: &str) -> Option<&Currency> {
        self.currencies.get(symbol)
    }

    pub fn deposit(&mut self, vault: &str, amount: u64) -> Result<(), ResourceError> {
        let balance = self.vault_mut(vault)?;
        *balance = balance
            .checked_add(amount)
            .ok_or(ResourceError::Overflow("vault deposit"))?;
        Ok(())
    }

    /// Move `amount` out of `vault` to the external account `recipient`.
    pub fn withdraw(
        &mut self,
        vault: &str,
        recipient: &str,
        amount: u64,
    ) -> Result<(), ResourceError> {
        self.take(vault, amount)?;
        let account = self.accounts.entry(recipient.to_owned()).or_default();
        *account = account
            .checked_add(amount)
            .ok_or(ResourceError::Overflow("account credit"))?;
        Ok(())
    }

    /// Debit a vault without crediting anyone; used to escrow stream funds.
    pub(crate) fn take(&mut self, vault: &str, amount: u64) -> Result<(), ResourceError> {
        let balance = self.vault_mut(vault)?;
        if *balance < amount {
            return Err(ResourceError::InsufficientBalance {
                vault: vault.to_owned(),
                available: *balance,
                requested: amount,
            });
        }
        *balance -= amount;
        Ok(())
    }

    pub fn register_currency(
        &mut self,
        symbol: &str,
        max_supply: Option<u64>,
    ) -> Result<(), ResourceError> {
        if self.currencies.contains_key(symbol) {
            return Err(ResourceError::CurrencyExists(symbol.to_owned()));
        }
        self.currencies.insert(
            symbol.to_owned(),
            Currency {
                max_supply,
                ..Currency::default()
            },
        );
        Ok(())
    }

    /// Mint new units of `currency` to `recipient`. Requires a borrowed
    /// mint authority.
    pub fn mint(
        &mut self,
        loan: &CapabilityLoan,
        currency: &str,
        recipient: &str,
        amount: u64,
    ) -> Result<(), ResourceError> {
        loan.require(CapabilityKind::MintAuthority)?;
        let entry = self
            .currencies
            .get_mut(currency)
            .ok_or_else(|| ResourceError::UnknownCurrency(currency.to_owned()))?;
        let supply = entry
            .supply
            .checked_add(amount)
            .ok_or(ResourceError::Overflow("currency supply"))?;
        if let Some(max_supply) = entry.max_supply
            && supply > max_supply
        {
            return Err(ResourceError::SupplyCapExceeded {
                currency: currency.to_owned(),
                requested: amount,
                max_supply,
            });
        }
        entry.supply = supply;
        *entry.holders.entry(recipient.to_owned()).or_default() += amount;
        Ok(())
    }

    fn vault_mut(&mut self, vault: &str) -> Result<&mut u64, ResourceError> {
        self.vaults
            .get_mut(vault)
            .ok_or_else(|| ResourceError::UnknownVault(vault.to_owned()))
    }
}
