// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Staking certificates, pool owners and pool relays

use std::net::{Ipv4Addr, Ipv6Addr};

use serde::Deserialize;

use cardano_hw_proto::prelude::{
    CardanoCertificateType, CardanoPoolMetadataType, CardanoPoolOwner,
    CardanoPoolParametersType, CardanoPoolRelayParameters, CardanoPoolRelayType,
    CardanoTxCertificate,
};

use super::{decode_hex, required, resolve_path, Amount};
use crate::{
    path::{DerivationPath, PathInput, MIN_DEPTH_SIGNING},
    Error,
};

/// Caller certificate
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRequest {
    #[serde(rename = "type")]
    pub kind: Option<CardanoCertificateType>,
    pub path: Option<PathInput>,
    pub pool: Option<String>,
    pub pool_parameters: Option<PoolParametersRequest>,
}

/// Caller stake pool registration parameters
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolParametersRequest {
    pub pool_id: Option<String>,
    pub vrf_key_hash: Option<String>,
    pub pledge: Option<Amount>,
    pub cost: Option<Amount>,
    pub margin: Option<MarginRequest>,
    pub reward_account: Option<String>,
    pub owners: Option<Vec<PoolOwnerRequest>>,
    pub relays: Option<Vec<PoolRelayRequest>>,
    pub metadata: Option<PoolMetadataRequest>,
}

/// Caller pool margin fraction
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MarginRequest {
    pub numerator: Option<Amount>,
    pub denominator: Option<Amount>,
}

/// Caller pool owner
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolOwnerRequest {
    pub staking_key_path: Option<PathInput>,
    pub staking_key_hash: Option<String>,
}

/// Caller pool relay
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolRelayRequest {
    #[serde(rename = "type")]
    pub kind: Option<CardanoPoolRelayType>,
    pub ipv4_address: Option<String>,
    pub ipv6_address: Option<String>,
    pub host_name: Option<String>,
    pub port: Option<u32>,
}

/// Caller pool metadata reference
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PoolMetadataRequest {
    pub url: Option<String>,
    pub hash: Option<String>,
}

/// Normalised certificate
///
/// For pool registrations the owners and relays are held alongside the
/// certificate, with only their counts set on the certificate message.
#[derive(Clone, PartialEq, Debug)]
pub struct Certificate {
    pub certificate: CardanoTxCertificate,
    pub pool_owners: Vec<CardanoPoolOwner>,
    pub pool_relays: Vec<CardanoPoolRelayParameters>,
}

impl Certificate {
    /// Certificate path, if one was supplied
    pub fn path(&self) -> Option<DerivationPath> {
        match self.certificate.path.is_empty() {
            true => None,
            false => Some(DerivationPath::from(self.certificate.path.as_slice())),
        }
    }

    /// Pool owner staking paths, in request order
    pub fn owner_paths(&self) -> impl Iterator<Item = DerivationPath> + '_ {
        self.pool_owners
            .iter()
            .filter(|o| !o.staking_key_path.is_empty())
            .map(|o| DerivationPath::from(o.staking_key_path.as_slice()))
    }

    /// Certificate with owners and relays inlined, for the legacy protocol
    pub fn inline(&self) -> CardanoTxCertificate {
        let mut c = self.certificate.clone();
        if let Some(p) = c.pool_parameters.as_mut() {
            p.owners = self.pool_owners.clone();
            p.relays = self.pool_relays.clone();
        }
        c
    }

    pub(crate) fn validate(field: &str, r: &CertificateRequest) -> Result<Self, Error> {
        use CardanoCertificateType::*;

        let kind = required(&format!("{field}.type"), r.kind)?;

        let path = match (&r.path, kind) {
            (Some(p), _) => resolve_path(&format!("{field}.path"), p, MIN_DEPTH_SIGNING)?.into(),
            (None, StakePoolRegistration) => vec![],
            (None, _) => return Err(Error::invalid(format!("{field}.path"), "missing required field")),
        };

        let pool = match (&r.pool, kind) {
            (Some(p), StakeDelegation) => Some(decode_hex(&format!("{field}.pool"), p, Some(28))?),
            (None, StakeDelegation) => {
                return Err(Error::invalid(format!("{field}.pool"), "missing required field"))
            }
            _ => None,
        };

        let (pool_parameters, pool_owners, pool_relays) = match (&r.pool_parameters, kind) {
            (Some(p), StakePoolRegistration) => {
                let (params, owners, relays) =
                    pool_parameters(&format!("{field}.poolParameters"), p)?;
                (Some(params), owners, relays)
            }
            (None, StakePoolRegistration) => {
                return Err(Error::invalid(
                    format!("{field}.poolParameters"),
                    "missing required field",
                ))
            }
            _ => (None, vec![], vec![]),
        };

        Ok(Self {
            certificate: CardanoTxCertificate {
                kind,
                path,
                pool,
                pool_parameters,
            },
            pool_owners,
            pool_relays,
        })
    }
}

fn pool_parameters(
    field: &str,
    r: &PoolParametersRequest,
) -> Result<
    (
        CardanoPoolParametersType,
        Vec<CardanoPoolOwner>,
        Vec<CardanoPoolRelayParameters>,
    ),
    Error,
> {
    let f = |name: &str| format!("{field}.{name}");

    let pool_id = decode_hex(&f("poolId"), required(&f("poolId"), r.pool_id.as_deref())?, Some(28))?;
    let vrf_key_hash = decode_hex(
        &f("vrfKeyHash"),
        required(&f("vrfKeyHash"), r.vrf_key_hash.as_deref())?,
        Some(32),
    )?;
    let pledge = required(&f("pledge"), r.pledge.as_ref())?.value(&f("pledge"))?;
    let cost = required(&f("cost"), r.cost.as_ref())?.value(&f("cost"))?;

    let margin = required(&f("margin"), r.margin.as_ref())?;
    let margin_numerator = required(&f("margin.numerator"), margin.numerator.as_ref())?
        .value(&f("margin.numerator"))?;
    let margin_denominator = required(&f("margin.denominator"), margin.denominator.as_ref())?
        .value(&f("margin.denominator"))?;

    let reward_account = required(&f("rewardAccount"), r.reward_account.clone())?;

    let owners = required(&f("owners"), r.owners.as_ref())?
        .iter()
        .enumerate()
        .map(|(i, o)| pool_owner(&f(&format!("owners[{i}]")), o))
        .collect::<Result<Vec<_>, _>>()?;

    let relays = required(&f("relays"), r.relays.as_ref())?
        .iter()
        .enumerate()
        .map(|(i, o)| pool_relay(&f(&format!("relays[{i}]")), o))
        .collect::<Result<Vec<_>, _>>()?;

    let metadata = match &r.metadata {
        Some(m) => Some(CardanoPoolMetadataType {
            url: required(&f("metadata.url"), m.url.clone())?,
            hash: decode_hex(
                &f("metadata.hash"),
                required(&f("metadata.hash"), m.hash.as_deref())?,
                Some(32),
            )?,
        }),
        None => None,
    };

    let params = CardanoPoolParametersType {
        pool_id,
        vrf_key_hash,
        pledge,
        cost,
        margin_numerator,
        margin_denominator,
        reward_account,
        owners: vec![],
        relays: vec![],
        metadata,
        owners_count: owners.len() as u32,
        relays_count: relays.len() as u32,
    };

    Ok((params, owners, relays))
}

fn pool_owner(field: &str, r: &PoolOwnerRequest) -> Result<CardanoPoolOwner, Error> {
    match (&r.staking_key_path, &r.staking_key_hash) {
        (Some(p), None) => Ok(CardanoPoolOwner {
            staking_key_path: resolve_path(
                &format!("{field}.stakingKeyPath"),
                p,
                MIN_DEPTH_SIGNING,
            )?
            .into(),
            staking_key_hash: None,
        }),
        (None, Some(h)) => Ok(CardanoPoolOwner {
            staking_key_path: vec![],
            staking_key_hash: Some(decode_hex(&format!("{field}.stakingKeyHash"), h, Some(28))?),
        }),
        _ => Err(Error::invalid(
            field,
            "exactly one of stakingKeyPath or stakingKeyHash is required",
        )),
    }
}

fn pool_relay(field: &str, r: &PoolRelayRequest) -> Result<CardanoPoolRelayParameters, Error> {
    use CardanoPoolRelayType::*;

    let kind = required(&format!("{field}.type"), r.kind)?;

    let ipv4_address = r
        .ipv4_address
        .as_deref()
        .map(|a| {
            a.parse::<Ipv4Addr>()
                .map(|a| a.octets().to_vec())
                .map_err(|e| Error::invalid(format!("{field}.ipv4Address"), e))
        })
        .transpose()?;

    let ipv6_address = r
        .ipv6_address
        .as_deref()
        .map(|a| {
            a.parse::<Ipv6Addr>()
                .map(|a| a.octets().to_vec())
                .map_err(|e| Error::invalid(format!("{field}.ipv6Address"), e))
        })
        .transpose()?;

    match kind {
        SingleHostIp => {
            if ipv4_address.is_none() && ipv6_address.is_none() {
                return Err(Error::invalid(
                    field,
                    "at least one of ipv4Address or ipv6Address is required",
                ));
            }
            required(&format!("{field}.port"), r.port)?;
        }
        SingleHostName => {
            required(&format!("{field}.hostName"), r.host_name.as_ref())?;
            required(&format!("{field}.port"), r.port)?;
        }
        MultipleHostName => {
            required(&format!("{field}.hostName"), r.host_name.as_ref())?;
        }
    }

    Ok(CardanoPoolRelayParameters {
        kind,
        ipv4_address,
        ipv6_address,
        host_name: r.host_name.clone(),
        port: r.port,
    })
}
