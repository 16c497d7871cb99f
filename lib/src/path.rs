// Copyright (c) 2022-2023 The MobileCoin Foundation

//! BIP32 style derivation paths
//!
//! Paths are accepted from callers either as text (`m/1852'/1815'/0'/2/0`,
//! with `'` or `h` marking hardened components) or as integer arrays with
//! hardening already applied. Only structural checks are performed here.

use std::{fmt::Display, str::FromStr};

use serde::Deserialize;

/// Hardened derivation flag
pub const HARDENED: u32 = 0x8000_0000;

/// Minimum depth for input, withdrawal, certificate and pool owner paths
pub const MIN_DEPTH_SIGNING: usize = 5;

/// Minimum depth for Catalyst voting staking paths
pub const MIN_DEPTH_CATALYST_STAKING: usize = 3;

/// Minimum depth for address parameter paths
pub const MIN_DEPTH_ADDRESS: usize = 1;

/// Derivation path, compared and hashed by its integer components
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct DerivationPath(Vec<u32>);

/// Path parsing and validation errors
#[derive(Clone, PartialEq, Debug, thiserror::Error)]
pub enum PathError {
    #[error("empty path")]
    Empty,

    #[error("invalid path component '{0}'")]
    InvalidComponent(String),

    #[error("path component {0} out of range")]
    OutOfRange(u64),

    #[error("path depth {depth} below minimum {min}")]
    TooShort { depth: usize, min: usize },
}

impl DerivationPath {
    /// Path components with hardening applied
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check the path carries at least `min` components
    pub fn check_depth(&self, min: usize) -> Result<(), PathError> {
        match self.0.len() {
            0 => Err(PathError::Empty),
            n if n < min => Err(PathError::TooShort { depth: n, min }),
            _ => Ok(()),
        }
    }
}

impl From<Vec<u32>> for DerivationPath {
    fn from(v: Vec<u32>) -> Self {
        Self(v)
    }
}

impl From<&[u32]> for DerivationPath {
    fn from(v: &[u32]) -> Self {
        Self(v.to_vec())
    }
}

impl From<DerivationPath> for Vec<u32> {
    fn from(p: DerivationPath) -> Self {
        p.0
    }
}

impl FromStr for DerivationPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut components = vec![];

        for c in s.trim().split('/') {
            if c.eq_ignore_ascii_case("m") {
                continue;
            }

            let (index, hardened) = match c.strip_suffix(['\'', 'h', 'H']) {
                Some(v) => (v, true),
                None => (c, false),
            };

            let index = index
                .parse::<u32>()
                .map_err(|_| PathError::InvalidComponent(c.to_string()))?;

            if hardened && index >= HARDENED {
                return Err(PathError::OutOfRange(index as u64));
            }

            components.push(if hardened { index | HARDENED } else { index });
        }

        if components.is_empty() {
            return Err(PathError::Empty);
        }

        Ok(Self(components))
    }
}

impl Display for DerivationPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "m")?;
        for c in &self.0 {
            match c & HARDENED != 0 {
                true => write!(f, "/{}'", c & !HARDENED)?,
                false => write!(f, "/{c}")?,
            }
        }
        Ok(())
    }
}

/// Caller supplied derivation path, text or integer array
#[derive(Clone, PartialEq, Debug, Deserialize)]
#[serde(untagged)]
pub enum PathInput {
    Text(String),
    Indices(Vec<u64>),
}

impl PathInput {
    /// Parse and check the path against a minimum depth
    pub fn resolve(&self, min_depth: usize) -> Result<DerivationPath, PathError> {
        let p = match self {
            PathInput::Text(s) => DerivationPath::from_str(s)?,
            PathInput::Indices(v) => {
                let c = v
                    .iter()
                    .map(|i| u32::try_from(*i).map_err(|_| PathError::OutOfRange(*i)))
                    .collect::<Result<Vec<_>, _>>()?;
                DerivationPath(c)
            }
        };

        p.check_depth(min_depth)?;

        Ok(p)
    }
}
