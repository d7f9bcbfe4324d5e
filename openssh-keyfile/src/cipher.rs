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

//!
//! Decryption of the private section is delegated to [Decryptor]s,
//! registered by cipher name in a [Decryptors] table. This crate ships
//! no cipher of its own.
use std::collections::HashMap;
use std::fmt::Debug;

use zeroize::Zeroizing;

use crate::Error;

/// `none`: the private section is stored in the clear.
pub const NONE: &[u8] = b"none";
/// `aes256-ctr`, the default of `ssh-keygen` before OpenSSH 9.
pub const AES_256_CTR: &[u8] = b"aes256-ctr";
/// `aes256-cbc`
pub const AES_256_CBC: &[u8] = b"aes256-cbc";
/// `aes256-gcm@openssh.com`
pub const AES_256_GCM: &[u8] = b"aes256-gcm@openssh.com";
/// `chacha20-poly1305@openssh.com`
pub const CHACHA20_POLY1305: &[u8] = b"chacha20-poly1305@openssh.com";

/// What a [Decryptor] gets to see of the file.
#[derive(Debug, Clone, Copy)]
pub struct DecryptParams<'a> {
    pub cipher_name: &'a [u8],
    /// Usually `bcrypt`.
    pub kdf_name: &'a [u8],
    /// Encoded KDF parameters (salt and rounds for `bcrypt`).
    pub kdf_options: &'a [u8],
    pub encrypted: &'a [u8],
}

/// Turns the encrypted private section into plaintext.
pub trait Decryptor: Send + Sync {
    fn decrypt(
        &self,
        params: &DecryptParams<'_>,
        passphrase: Option<&[u8]>,
    ) -> Result<Zeroizing<Vec<u8>>, Error>;
}

impl<F> Decryptor for F
where
    F: Fn(&DecryptParams<'_>, Option<&[u8]>) -> Result<Zeroizing<Vec<u8>>, Error> + Send + Sync,
{
    fn decrypt(
        &self,
        params: &DecryptParams<'_>,
        passphrase: Option<&[u8]>,
    ) -> Result<Zeroizing<Vec<u8>>, Error> {
        self(params, passphrase)
    }
}

/// Decryptors, by cipher name.
#[derive(Default)]
pub struct Decryptors {
    by_name: HashMap<Vec<u8>, Box<dyn Decryptor>>,
}

impl Decryptors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `decryptor` for `cipher_name`, replacing any previous one.
    pub fn with<D: Decryptor + 'static>(mut self, cipher_name: &[u8], decryptor: D) -> Self {
        self.insert(cipher_name, decryptor);
        self
    }

    pub fn insert<D: Decryptor + 'static>(&mut self, cipher_name: &[u8], decryptor: D) {
        self.by_name.insert(cipher_name.to_vec(), Box::new(decryptor));
    }

    pub fn get(&self, cipher_name: &[u8]) -> Option<&dyn Decryptor> {
        self.by_name.get(cipher_name).map(|d| &**d)
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl Debug for Decryptors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.by_name.keys().map(|k| String::from_utf8_lossy(k)))
            .finish()
    }
}
