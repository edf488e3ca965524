//! Signing and verification on top of the signed portions computed by the
//! wire format. Keys live behind [`PrivateKeyStorage`].

use std::collections::HashMap;

use log::{debug, warn};
use rsa::pkcs1v15::{SigningKey, VerifyingKey};
use rsa::signature::{RandomizedSigner, SignatureEncoding, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

use crate::blob::{Blob, SignedBlob};
use crate::data::Data;
use crate::error::{Error, Result};
use crate::interest::Interest;
use crate::key_locator::KeyLocator;
use crate::name::Name;
use crate::signature::{Signature, SignatureType};
use crate::wire_format::{default_wire_format, WireFormat};

/// Resolves key names to key material and signs with it.
pub trait PrivateKeyStorage {
    fn does_key_exist(&self, key_name: &Name) -> bool;

    fn public_key(&self, key_name: &Name) -> Result<RsaPublicKey>;

    /// Sign `data` with the named key.
    fn sign(&self, data: &[u8], key_name: &Name, signature_type: SignatureType) -> Result<Blob>;
}

/// RSA keys held in memory.
#[derive(Debug, Default)]
pub struct MemoryPrivateKeyStorage {
    keys: HashMap<Name, RsaPrivateKey>,
}

impl MemoryPrivateKeyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key(&mut self, key_name: Name, private_key: RsaPrivateKey) {
        debug!("Storing private key {}", key_name);
        self.keys.insert(key_name, private_key);
    }

    /// Generate an RSA key of `bits` bits and store it under `key_name`.
    pub fn generate_key(&mut self, key_name: Name, bits: usize) -> Result<()> {
        let mut rng = rand::thread_rng();
        let private_key = RsaPrivateKey::new(&mut rng, bits)?;
        self.set_key(key_name, private_key);
        Ok(())
    }

    fn private_key(&self, key_name: &Name) -> Result<&RsaPrivateKey> {
        self.keys
            .get(key_name)
            .ok_or_else(|| Error::MissingKey(key_name.clone()))
    }
}

impl PrivateKeyStorage for MemoryPrivateKeyStorage {
    fn does_key_exist(&self, key_name: &Name) -> bool {
        self.keys.contains_key(key_name)
    }

    fn public_key(&self, key_name: &Name) -> Result<RsaPublicKey> {
        Ok(RsaPublicKey::from(self.private_key(key_name)?))
    }

    fn sign(&self, data: &[u8], key_name: &Name, signature_type: SignatureType) -> Result<Blob> {
        if signature_type != SignatureType::Sha256WithRsa {
            return Err(Error::UnsupportedAlgorithm(signature_type));
        }
        let signing_key = SigningKey::<Sha256>::new(self.private_key(key_name)?.clone());
        let signature = signing_key.sign_with_rng(&mut rand::thread_rng(), data);
        debug!("Signed {} bytes with {}", data.len(), key_name);
        Ok(Blob::from(signature.to_bytes().to_vec()))
    }
}

/// Signs packets with keys from a [`PrivateKeyStorage`].
#[derive(Debug)]
pub struct Signer<S> {
    key_storage: S,
}

impl<S: PrivateKeyStorage> Signer<S> {
    pub fn new(key_storage: S) -> Self {
        Self { key_storage }
    }

    pub fn key_storage(&self) -> &S {
        &self.key_storage
    }

    pub fn sign_data(&self, data: &mut Data, key_name: &Name) -> Result<SignedBlob> {
        self.sign_data_with(data, key_name, default_wire_format())
    }

    /// Fill in an RSA SignatureInfo naming `key_name`, sign the signed
    /// portion of the encoding and return the final encoding.
    pub fn sign_data_with(
        &self,
        data: &mut Data,
        key_name: &Name,
        wire_format: &dyn WireFormat,
    ) -> Result<SignedBlob> {
        if !self.key_storage.does_key_exist(key_name) {
            return Err(Error::MissingKey(key_name.clone()));
        }
        data.signature_mut()
            .set_signature_type(SignatureType::Sha256WithRsa)
            .set_key_locator(KeyLocator::from_key_name(key_name.clone()))
            .set_signature(None);

        let encoding = data.wire_encode_with(wire_format)?;
        let bits = self.key_storage.sign(
            encoding.signed_bytes(),
            key_name,
            SignatureType::Sha256WithRsa,
        )?;
        data.signature_mut().set_signature(Some(bits));
        data.wire_encode_with(wire_format)
    }

    pub fn sign_interest(&self, interest: &mut Interest, key_name: &Name) -> Result<SignedBlob> {
        self.sign_interest_with(interest, key_name, default_wire_format())
    }

    /// Append SignatureInfo and SignatureValue components to the Interest
    /// name. The signature covers the name up to and including the
    /// SignatureInfo component. Editing the name clears any nonce.
    pub fn sign_interest_with(
        &self,
        interest: &mut Interest,
        key_name: &Name,
        wire_format: &dyn WireFormat,
    ) -> Result<SignedBlob> {
        if !self.key_storage.does_key_exist(key_name) {
            return Err(Error::MissingKey(key_name.clone()));
        }
        let mut signature = Signature::new(SignatureType::Sha256WithRsa);
        signature.set_key_locator(KeyLocator::from_key_name(key_name.clone()));

        let info = signature.wire_encode_info_with(wire_format)?;
        interest.name_mut().append(info).append(Blob::default());
        let encoding = interest.wire_encode_with(wire_format)?;
        let bits = self.key_storage.sign(
            encoding.signed_bytes(),
            key_name,
            SignatureType::Sha256WithRsa,
        )?;

        signature.set_signature(Some(bits));
        let value = signature.wire_encode_value_with(wire_format)?;
        interest.name_mut().pop();
        interest.name_mut().append(value);
        interest.wire_encode_with(wire_format)
    }
}

/// Sign `data` with a DigestSha256 signature: the SHA-256 of its signed
/// portion.
pub fn sign_with_sha256(data: &mut Data) -> Result<SignedBlob> {
    data.signature_mut()
        .set_signature_type(SignatureType::DigestSha256)
        .set_signature(None)
        .key_locator_mut()
        .clear();
    let encoding = data.wire_encode()?;
    let digest = Sha256::digest(encoding.signed_bytes());
    data.signature_mut().set_signature(Some(Blob::from(digest.to_vec())));
    data.wire_encode()
}

pub fn verify_sha256_signature(data: &Data) -> Result<bool> {
    let signature = data.signature();
    if signature.signature_type() != SignatureType::DigestSha256 {
        return Err(Error::UnsupportedAlgorithm(signature.signature_type()));
    }
    let bits = signature
        .signature()
        .ok_or(Error::Verification("no signature value"))?;
    let encoding = data.wire_encode()?;
    let digest = Sha256::digest(encoding.signed_bytes());
    let verified = digest.as_slice() == bits.as_slice();
    if !verified {
        warn!("Digest mismatch for {}", data.name());
    }
    Ok(verified)
}

/// Check an RSA signature over `signed_bytes`.
pub fn verify_rsa_signature(signed_bytes: &[u8], bits: &[u8], public_key: &RsaPublicKey) -> Result<bool> {
    let verifying_key = VerifyingKey::<Sha256>::new(public_key.clone());
    let signature = rsa::pkcs1v15::Signature::try_from(bits)
        .map_err(|_| Error::Verification("malformed RSA signature"))?;
    match verifying_key.verify(signed_bytes, &signature) {
        Ok(()) => Ok(true),
        Err(_) => {
            warn!("RSA signature does not verify");
            Ok(false)
        }
    }
}

pub fn verify_data_signature(data: &Data, public_key: &RsaPublicKey) -> Result<bool> {
    let signature = data.signature();
    if signature.signature_type() != SignatureType::Sha256WithRsa {
        return Err(Error::UnsupportedAlgorithm(signature.signature_type()));
    }
    let bits = signature
        .signature()
        .ok_or(Error::Verification("no signature value"))?;
    let encoding = data.wire_encode()?;
    verify_rsa_signature(encoding.signed_bytes(), bits, public_key)
}

/// Verify an Interest signed by [`Signer::sign_interest`].
pub fn verify_interest_signature(interest: &Interest, public_key: &RsaPublicKey) -> Result<bool> {
    let name = interest.name();
    let (info, value) = match name.len().checked_sub(2) {
        Some(index) => (&name.components()[index], &name.components()[index + 1]),
        None => return Err(Error::Verification("name has no signature components")),
    };
    let mut signature = Signature::default();
    signature.wire_decode(info.value(), Some(value.value().as_slice()))?;
    if signature.signature_type() != SignatureType::Sha256WithRsa {
        return Err(Error::UnsupportedAlgorithm(signature.signature_type()));
    }
    let bits = signature
        .signature()
        .ok_or(Error::Verification("no signature value"))?;
    let encoding = interest.wire_encode()?;
    verify_rsa_signature(encoding.signed_bytes(), bits, public_key)
}
