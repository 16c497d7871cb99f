// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Witness path resolution
//!
//! Witnesses are requested for each distinct path in first-occurrence order,
//! drawn from inputs, then certificates, then withdrawals.

use std::collections::HashSet;

use cardano_hw_proto::prelude::CardanoCertificateType;

use crate::{
    params::{Certificate, Input, Withdrawal},
    path::DerivationPath,
};

/// Ordered set of witness paths
#[derive(Clone, PartialEq, Debug, Default)]
pub struct WitnessPaths {
    paths: Vec<DerivationPath>,
    seen: HashSet<DerivationPath>,
}

impl WitnessPaths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a path, returning false if already present
    pub fn insert(&mut self, p: DerivationPath) -> bool {
        if !self.seen.insert(p.clone()) {
            return false;
        }
        self.paths.push(p);
        true
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DerivationPath> {
        self.paths.iter()
    }

    /// Resolve witness paths for a transaction
    pub fn resolve(
        inputs: &[Input],
        certificates: &[Certificate],
        withdrawals: &[Withdrawal],
    ) -> Self {
        let mut w = Self::new();

        for p in inputs.iter().filter_map(|i| i.path.clone()) {
            w.insert(p);
        }

        for c in certificates {
            if matches!(
                c.certificate.kind,
                CardanoCertificateType::StakeDelegation
                    | CardanoCertificateType::StakeDeregistration
            ) {
                if let Some(p) = c.path() {
                    w.insert(p);
                }
            }

            for p in c.owner_paths() {
                w.insert(p);
            }
        }

        for wd in withdrawals {
            w.insert(wd.path.clone());
        }

        w
    }
}

impl<'a> IntoIterator for &'a WitnessPaths {
    type Item = &'a DerivationPath;
    type IntoIter = std::slice::Iter<'a, DerivationPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}
