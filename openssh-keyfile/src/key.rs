// Copyright 2016 Pierre-Étienne Meunier
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
use data_encoding::BASE64;
use ssh_encoding::Decode;
pub use ssh_key::public::KeyData;
pub use ssh_key::{Fingerprint, HashAlg};

use crate::protocol::{
    DsaPrivateKey, EcdsaPrivateKey, Ed25519PrivateKey, RsaPrivateKey, SkEcdsaPrivateKey,
    SkEd25519PrivateKey,
};
use crate::Error;

pub const SSH_RSA: &[u8] = b"ssh-rsa";
pub const SSH_DSS: &[u8] = b"ssh-dss";
pub const SSH_ED25519: &[u8] = b"ssh-ed25519";
pub const ECDSA_SHA2_NISTP256: &[u8] = b"ecdsa-sha2-nistp256";
pub const ECDSA_SHA2_NISTP384: &[u8] = b"ecdsa-sha2-nistp384";
pub const ECDSA_SHA2_NISTP521: &[u8] = b"ecdsa-sha2-nistp521";
pub const SK_ECDSA_SHA2_NISTP256: &[u8] = b"sk-ecdsa-sha2-nistp256@openssh.com";
pub const SK_SSH_ED25519: &[u8] = b"sk-ssh-ed25519@openssh.com";

/// The private half of a key, one variant per supported key type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrivateKeyRecord {
    Rsa(RsaPrivateKey),
    Dsa(DsaPrivateKey),
    Ed25519(Ed25519PrivateKey),
    Ecdsa(EcdsaPrivateKey),
    /// FIDO/U2F security key, ECDSA on NIST P-256.
    SkEcdsa(SkEcdsaPrivateKey),
    /// FIDO/U2F security key, Ed25519.
    SkEd25519(SkEd25519PrivateKey),
}

/// One key of an OpenSSH private key file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyRecord {
    public_key: Vec<u8>,
    key_format: Vec<u8>,
    private_key: PrivateKeyRecord,
    comment: Vec<u8>,
}

impl KeyRecord {
    pub(crate) fn new(
        public_key: Vec<u8>,
        key_format: Vec<u8>,
        private_key: PrivateKeyRecord,
        comment: Vec<u8>,
    ) -> Self {
        KeyRecord {
            public_key,
            key_format,
            private_key,
            comment,
        }
    }

    /// The public key blob, in SSH wire format.
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// The key type, such as `ssh-ed25519`.
    pub fn key_format(&self) -> &[u8] {
        &self.key_format
    }

    pub fn private_key(&self) -> &PrivateKeyRecord {
        &self.private_key
    }

    /// The comment, exactly as stored in the file.
    pub fn comment(&self) -> &[u8] {
        &self.comment
    }

    pub fn into_private_key(self) -> PrivateKeyRecord {
        self.private_key
    }

    /// The public key as an `authorized_keys` line:
    /// `<key type> <base64 blob> <comment>`.
    pub fn public_key_string(&self) -> String {
        let mut s = format!(
            "{} {}",
            String::from_utf8_lossy(&self.key_format),
            BASE64.encode(&self.public_key)
        );
        if !self.comment.is_empty() {
            s.push(' ');
            s.push_str(&String::from_utf8_lossy(&self.comment));
        }
        s
    }

    /// Decode the public key blob.
    pub fn public_key_data(&self) -> Result<KeyData, Error> {
        Ok(KeyData::decode(&mut self.public_key.as_slice())?)
    }

    /// SHA-256 fingerprint of the public key, as printed by `ssh-keygen -l`.
    pub fn fingerprint(&self) -> Result<Fingerprint, Error> {
        Ok(self.public_key_data()?.fingerprint(HashAlg::Sha256))
    }
}
