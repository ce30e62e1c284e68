//! Published packages and their two-step upgrade flow.
//!
//! `authorize_upgrade` needs a borrowed `PackageUpgrade` capability and
//! leaves a pending ticket; `commit_upgrade` consumes the ticket.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use decree_types::CapabilityKind;

use super::capability::CapabilityLoan;
use crate::error::ResourceError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub version: u64,
    pub digest: [u8; 32],
    #[serde(default)]
    pub pending: Option<[u8; 32]>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageRegistry {
    packages: BTreeMap<String, Package>,
}

impl PackageRegistry {
    pub fn publish(&mut self, name: &str, digest: [u8; 32]) -> Result<(), ResourceError> {
        if self.packages.contains_key(name) {
            return Err(ResourceError::PackageExists(name.to_owned()));
        }
        self.packages.insert(
            name.to_owned(),
            Package {
                version: 1,
                digest,
                pending: None,
            },
        );
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    pub fn authorize_upgrade(
        &mut self,
        loan: &CapabilityLoan,
        name: &str,
        digest: [u8; 32],
    ) -> Result<(), ResourceError> {
        loan.require(CapabilityKind::PackageUpgrade)?;
        self.get_mut(name)?.pending = Some(digest);
        Ok(())
    }

    pub fn commit_upgrade(&mut self, name: &str, version: u64) -> Result<(), ResourceError> {
        let package = self.get_mut(name)?;
        let digest = package
            .pending
            .ok_or_else(|| ResourceError::UpgradeNotAuthorized(name.to_owned()))?;
        if version <= package.version {
            return Err(ResourceError::VersionNotIncreasing {
                package: name.to_owned(),
                current: package.version,
                requested: version,
            });
        }
        package.version = version;
        package.digest = digest;
        package.pending = None;
        Ok(())
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Package, ResourceError> {
        self.packages
            .get_mut(name)
            .ok_or_else(|| ResourceError::UnknownPackage(name.to_owned()))
    }
}
