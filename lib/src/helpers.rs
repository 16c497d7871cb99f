// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Serde helpers for rendering byte fields as hex

/// Serialise bytes as a hex string
pub(crate) mod hex_bytes {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(v: impl AsRef<[u8]>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(v))
    }
}

/// Serialise optional bytes as a hex string
pub(crate) mod hex_bytes_opt {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(v: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(b) => s.serialize_str(&hex::encode(b)),
            None => s.serialize_none(),
        }
    }
}
