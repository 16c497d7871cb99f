// Copyright (c) 2022-2023 The MobileCoin Foundation

use serde_json::json;

use cardano_hw_signer::{
    proto::prelude::*, DerivationPath, Error, Feature, Model, Outcome, SignTxParams,
};

mod helpers;
use helpers::*;

#[tokio::test]
async fn sign_byron_mainnet() -> anyhow::Result<()> {
    let (h, log) = setup(SimDevice::new(Model::T, "2.4.2"));

    let p = SignTxParams::from_json(&byron_request())?;
    let tx = h.sign_transaction(&p).await?;

    assert_eq!(tx.hash, TX_HASH);
    assert_eq!(tx.witnesses.len(), 1);
    assert_eq!(tx.witnesses[0].kind, CardanoTxWitnessType::ByronWitness);
    assert_eq!(tx.witnesses[0].chain_code.as_ref().map(|c| c.len()), Some(32));
    assert!(tx.auxiliary_data_supplement.is_none());

    assert_eq!(
        log.types(),
        &[
            MessageType::CardanoSignTxInit,
            MessageType::CardanoTxInput,
            MessageType::CardanoTxOutput,
            MessageType::CardanoTxWitnessRequest,
            MessageType::CardanoTxHostAck,
            MessageType::CardanoTxHostAck,
        ]
    );

    match &log.requests()[0] {
        Request::SignTxInit(i) => {
            assert_eq!(i.signing_mode, CardanoTxSigningMode::OrdinaryTransaction);
            assert_eq!(i.protocol_magic, MAINNET_MAGIC);
            assert_eq!(i.fee, 42);
            assert_eq!(i.ttl, Some(10));
            assert_eq!(i.inputs_count, 1);
            assert_eq!(i.outputs_count, 1);
            assert_eq!(i.witness_requests_count, 1);
            assert!(!i.has_auxiliary_data);
        }
        r => panic!("unexpected request {r:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn witness_order_follows_paths() -> anyhow::Result<()> {
    let (h, log) = setup(SimDevice::new(Model::T, "2.4.2"));

    let mut r = shelley_request();
    r["inputs"] = json!([
        { "path": "m/1852'/1815'/0'/0/3", "prev_hash": hex::encode([1u8; 32]), "prev_index": 0 },
        { "path": "m/44'/1815'/0'/0/1", "prev_hash": hex::encode([2u8; 32]), "prev_index": 1 },
        { "path": "m/1852'/1815'/0'/0/3", "prev_hash": hex::encode([3u8; 32]), "prev_index": 2 },
    ]);
    r["withdrawals"] = json!([{ "path": "m/1852'/1815'/0'/2/0", "amount": "1000" }]);

    let p = SignTxParams::from_json(&r)?;
    let tx = h.sign_transaction(&p).await?;

    let paths: Vec<DerivationPath> = ["m/1852'/1815'/0'/0/3", "m/44'/1815'/0'/0/1", "m/1852'/1815'/0'/2/0"]
        .iter()
        .map(|p| p.parse().unwrap())
        .collect();

    assert_eq!(log.count(MessageType::CardanoTxWitnessRequest), paths.len());
    assert_eq!(tx.witnesses.len(), paths.len());

    for (w, p) in tx.witnesses.iter().zip(paths.iter()) {
        assert_eq!(w.pub_key, sim_pub_key(p.as_slice()));
    }

    Ok(())
}

#[tokio::test]
async fn certificate_and_input_paths_deduplicated() -> anyhow::Result<()> {
    let (h, log) = setup(SimDevice::new(Model::T, "2.4.2"));

    let mut r = shelley_request();
    r["inputs"][0]["path"] = json!("m/1852'/1815'/0'/2/0");
    r["certificates"] = json!([
        {
            "type": 2,
            "path": "m/1852'/1815'/0'/2/0",
            "pool": "f61c42cbf7c8c53af3f520508212ad3e72f674f957fe23ff0acb4973",
        },
        { "type": 0, "path": "m/1852'/1815'/0'/2/0" },
    ]);

    let p = SignTxParams::from_json(&r)?;
    assert_eq!(p.witness_paths.len(), 1);

    let tx = h.sign_transaction(&p).await?;
    assert_eq!(tx.witnesses.len(), 1);
    assert_eq!(log.count(MessageType::CardanoTxWitnessRequest), 1);
    assert_eq!(log.count(MessageType::CardanoTxCertificate), 2);

    Ok(())
}

#[tokio::test]
async fn token_bundle_message_order() -> anyhow::Result<()> {
    let (h, log) = setup(SimDevice::new(Model::T, "2.4.2"));

    let mut r = shelley_request();
    r["outputs"][0]["tokenBundle"] = json!([
        {
            "policyId": "95a292ffee938be03e9bae5657982a74e9014eb4960108c9e23a5b39",
            "tokenAmounts": [
                { "assetNameBytes": "74652474436f696e", "amount": "7878754" },
                { "assetNameBytes": "", "amount": "47" },
            ],
        },
        {
            "policyId": "75a292ffee938be03e9bae5657982a74e9014eb4960108c9e23a5b39",
            "tokenAmounts": [{ "assetNameBytes": "7564247542686911", "amount": "1" }],
        },
    ]);

    let p = SignTxParams::from_json(&r)?;
    h.sign_transaction(&p).await?;

    use MessageType::*;
    assert_eq!(
        &log.types()[..9],
        &[
            CardanoSignTxInit,
            CardanoTxInput,
            CardanoTxOutput,
            CardanoAssetGroup,
            CardanoToken,
            CardanoToken,
            CardanoAssetGroup,
            CardanoToken,
            CardanoTxOutput,
        ]
    );

    match &log.requests()[2] {
        Request::TxOutput(o) => assert_eq!(o.asset_groups_count, 2),
        r => panic!("unexpected request {r:?}"),
    }
    match &log.requests()[3] {
        Request::AssetGroup(g) => assert_eq!(g.tokens_count, 2),
        r => panic!("unexpected request {r:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn multiasset_unsupported_on_old_firmware() -> anyhow::Result<()> {
    let (h, log) = setup(SimDevice::new(Model::T, "2.3.4"));

    let mut r = shelley_request();
    r["outputs"][0]["tokenBundle"] = json!([{
        "policyId": "95a292ffee938be03e9bae5657982a74e9014eb4960108c9e23a5b39",
        "tokenAmounts": [{ "assetNameBytes": "74652474436f696e", "amount": "1" }],
    }]);

    let p = SignTxParams::from_json(&r)?;
    let e = h.sign_transaction(&p).await.unwrap_err();

    assert!(matches!(e, Error::UnsupportedFeature(Feature::MultiassetOutputs)));
    assert_eq!(log.len(), 0);

    Ok(())
}

#[tokio::test]
async fn pool_registration_as_owner() -> anyhow::Result<()> {
    let (h, log) = setup(SimDevice::new(Model::T, "2.4.2"));

    let mut r = shelley_request();
    r["signingMode"] = json!(1);
    r["inputs"][0].as_object_mut().unwrap().remove("path");
    r["certificates"] = json!([pool_registration()]);

    let p = SignTxParams::from_json(&r)?;
    let tx = h.sign_transaction(&p).await?;

    // Only the owner path requires a witness
    assert_eq!(tx.witnesses.len(), 1);
    assert_eq!(
        tx.witnesses[0].pub_key,
        sim_pub_key("m/1852'/1815'/0'/2/0".parse::<DerivationPath>()?.as_slice())
    );

    use MessageType::*;
    let types = log.types();
    let i = types.iter().position(|t| *t == CardanoTxCertificate).unwrap();
    assert_eq!(
        &types[i..i + 5],
        &[
            CardanoTxCertificate,
            CardanoPoolOwner,
            CardanoPoolOwner,
            CardanoPoolRelayParameters,
            CardanoPoolRelayParameters,
        ]
    );

    match &log.requests()[i] {
        Request::TxCertificate(c) => {
            let p = c.pool_parameters.as_ref().unwrap();
            assert_eq!(p.owners_count, 2);
            assert_eq!(p.relays_count, 2);
            assert!(p.owners.is_empty() && p.relays.is_empty());
        }
        r => panic!("unexpected request {r:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn catalyst_registration_supplement() -> anyhow::Result<()> {
    let (h, log) = setup(SimDevice::new(Model::T, "2.4.2"));

    let mut r = shelley_request();
    r["auxiliaryData"] = catalyst_auxiliary_data();

    let p = SignTxParams::from_json(&r)?;
    let tx = h.sign_transaction(&p).await?;

    let s = tx.auxiliary_data_supplement.as_ref().unwrap();
    assert_eq!(
        s.kind,
        CardanoTxAuxiliaryDataSupplementType::CatalystRegistrationSignature
    );
    assert_eq!(s.auxiliary_data_hash, CATALYST_AUX_HASH.to_vec());
    assert_eq!(s.catalyst_signature, Some(CATALYST_SIGNATURE.to_vec()));

    let aux = log
        .requests()
        .into_iter()
        .find_map(|r| match r {
            Request::TxAuxiliaryData(a) => Some(a),
            _ => None,
        })
        .unwrap();
    assert!(aux.hash.is_none());
    assert_eq!(
        aux.metadata.map(|m| m.kind),
        Some(CardanoTxMetadataType::CatalystRegistration)
    );

    // Rendered result carries the supplement
    let v = serde_json::to_value(Outcome::from(Ok(tx)))?;
    assert_eq!(v["auxiliaryDataSupplement"]["type"], json!(1));
    assert_eq!(
        v["auxiliaryDataSupplement"]["catalystSignature"],
        json!(hex::encode(CATALYST_SIGNATURE))
    );

    Ok(())
}

#[tokio::test]
async fn auxiliary_data_hash_without_supplement() -> anyhow::Result<()> {
    let (h, _log) = setup(SimDevice::new(Model::T, "2.4.2"));

    let mut r = shelley_request();
    r["auxiliaryData"] = json!({ "hash": hex::encode([0xea; 32]) });

    let p = SignTxParams::from_json(&r)?;
    let tx = h.sign_transaction(&p).await?;

    assert!(tx.auxiliary_data_supplement.is_none());

    Ok(())
}

#[tokio::test]
async fn auxiliary_data_hash_unsupported() -> anyhow::Result<()> {
    let (h, log) = setup(SimDevice::new(Model::T, "2.4.1"));

    let mut r = shelley_request();
    r["auxiliaryData"] = json!({ "hash": hex::encode([0xea; 32]) });

    let p = SignTxParams::from_json(&r)?;
    let e = h.sign_transaction(&p).await.unwrap_err();

    assert!(matches!(e, Error::UnsupportedFeature(Feature::AuxiliaryDataHash)));
    assert_eq!(log.len(), 0);

    Ok(())
}

#[tokio::test]
async fn unexpected_response_aborts() -> anyhow::Result<()> {
    let (h, log) = setup(SimDevice::new(Model::T, "2.4.2").with_fault(Fault::WrongResponseAt(2)));

    let p = SignTxParams::from_json(&shelley_request())?;
    let e = h.sign_transaction(&p).await.unwrap_err();

    assert!(matches!(
        e,
        Error::UnexpectedResponse {
            request: MessageType::CardanoTxOutput,
            response: MessageType::CardanoSignTxFinished,
        }
    ));

    // Nothing is sent after the unexpected response
    assert_eq!(log.len(), 3);

    Ok(())
}

#[tokio::test]
async fn cancellation_discards_witnesses() -> anyhow::Result<()> {
    // Cancel on the second witness request
    let (h, log) = setup(SimDevice::new(Model::T, "2.4.2").with_fault(Fault::CancelAt(6)));

    let mut r = shelley_request();
    r["withdrawals"] = json!([{ "path": "m/1852'/1815'/0'/2/0", "amount": "1000" }]);

    let p = SignTxParams::from_json(&r)?;
    let o = h.sign_json(&r).await;

    assert!(matches!(&o, Outcome::Failure { error } if error == "Device error: Operation cancelled by user"));
    assert_eq!(p.witness_paths.len(), 2);
    assert_eq!(log.count(MessageType::CardanoTxWitnessRequest), 2);
    assert_eq!(log.count(MessageType::CardanoTxHostAck), 0);

    Ok(())
}

#[tokio::test]
async fn retired_metadata_rejected_before_exchange() -> anyhow::Result<()> {
    let (h, log) = setup(SimDevice::new(Model::T, "2.4.2"));

    let mut r = shelley_request();
    r["metadata"] = json!("a200a16e4c615f46616d696c69615f526f736173");

    let v = serde_json::to_value(h.sign_json(&r).await)?;
    assert_eq!(
        v,
        json!({ "error": "Invalid parameter `metadata`: Metadata field has been replaced by auxiliaryData." })
    );
    assert_eq!(log.len(), 0);

    Ok(())
}
