// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Prelude to simplify downstream use of message objects
//!

pub use crate::{
    expect::{AuxiliaryDataAck, Expect, SignedTxReply},
    legacy::{
        CardanoAssetGroupType, CardanoSignTx, CardanoSignedTx, CardanoSignedTxChunk,
        CardanoSignedTxChunkAck, CardanoTokenType, CardanoTxInputType, CardanoTxOutputType,
    },
    message::{MessageType, Request, Response},
    tx::{
        CardanoAddressParametersType, CardanoAssetGroup, CardanoBlockchainPointerType,
        CardanoCatalystRegistrationParametersType, CardanoPoolMetadataType,
        CardanoPoolOwner, CardanoPoolParametersType, CardanoPoolRelayParameters,
        CardanoSignTxFinished, CardanoSignTxInit, CardanoToken, CardanoTxAuxiliaryData,
        CardanoTxAuxiliaryDataSupplement, CardanoTxBodyHash, CardanoTxCertificate,
        CardanoTxHostAck, CardanoTxInput, CardanoTxItemAck, CardanoTxMetadata,
        CardanoTxOutput, CardanoTxWithdrawal, CardanoTxWitnessRequest,
        CardanoTxWitnessResponse,
    },
    types::{
        CardanoAddressType, CardanoCertificateType, CardanoPoolRelayType,
        CardanoTxAuxiliaryDataSupplementType, CardanoTxMetadataType, CardanoTxSigningMode,
        CardanoTxWitnessType,
    },
    AddressN,
};
