//! The organization's capability locker and the loans taken from it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use decree_types::CapabilityKind;

use crate::error::ResourceError;

/// Capabilities currently held by the organization.
///
/// A borrowed capability is absent from the locker until its
/// [`CapabilityLoan`] is given back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityLocker {
    available: BTreeSet<CapabilityKind>,
}

impl CapabilityLocker {
    /// Place a capability in the locker for the first time.
    pub fn deposit(&mut self, kind: CapabilityKind) -> Result<(), ResourceError> {
        if !self.available.insert(kind) {
            return Err(ResourceError::CapabilityAlreadyLocked(kind));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_available(&self, kind: CapabilityKind) -> bool {
        self.available.contains(&kind)
    }

    pub fn borrow(&mut self, kind: CapabilityKind) -> Result<CapabilityLoan, ResourceError> {
        if !self.available.remove(&kind) {
            return Err(ResourceError::CapabilityUnavailable(kind));
        }
        tracing::debug!(capability = %kind, "Capability borrowed");
        Ok(CapabilityLoan { kind })
    }

    pub fn give_back(&mut self, loan: CapabilityLoan) -> Result<(), ResourceError> {
        let CapabilityLoan { kind } = loan;
        if !self.available.insert(kind) {
            return Err(ResourceError::CapabilityAlreadyLocked(kind));
        }
        tracing::debug!(capability = %kind, "Capability returned");
        Ok(())
    }
}

/// Proof that a capability is out of the locker.
///
/// Not `Clone`: the only way to end a loan is [`CapabilityLocker::give_back`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a borrowed capability must be given back to the locker"]
pub struct CapabilityLoan {
    kind: CapabilityKind,
}

impl CapabilityLoan {
    #[must_use]
    pub fn kind(&self) -> CapabilityKind {
        self.kind
    }

    pub(crate) fn require(&self, kind: CapabilityKind) -> Result<(), ResourceError> {
        if self.kind == kind {
            Ok(())
        } else {
            Err(ResourceError::CapabilityNotBorrowed(kind))
        }
    }
}
