//! Wire layout of the private key records stored in the private section of
//! an OpenSSH key file, as described in OpenSSH's `PROTOCOL.key` and
//! `sshkey.c`.

use std::fmt;

use log::trace;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::encoding::Position;
use crate::key::{self, PrivateKeyRecord};
use crate::Error;

type Result<T> = std::result::Result<T, Error>;

pub(crate) trait SshRead: Sized {
    fn read_ssh(pos: &mut Position<'_>) -> Result<Self>;
}

/// SSH RSA private key.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct RsaPrivateKey {
    /// `n`: RSA modulus.
    pub modulus: Vec<u8>,
    /// `e`: RSA public exponent.
    pub public_exponent: Vec<u8>,
    /// `d`: RSA private exponent.
    pub private_exponent: Vec<u8>,
    /// CRT coefficient: `(inverse of q) mod p`.
    pub coefficient: Vec<u8>,
    /// `p`: first prime factor of `n`.
    pub prime1: Vec<u8>,
    /// `q`: Second prime factor of `n`.
    pub prime2: Vec<u8>,
}

impl SshRead for RsaPrivateKey {
    fn read_ssh(pos: &mut Position<'_>) -> Result<Self> {
        Ok(Self {
            // Note the field order.
            modulus: pos.read_mpint()?.to_vec(),
            public_exponent: pos.read_mpint()?.to_vec(),
            private_exponent: pos.read_mpint()?.to_vec(),
            coefficient: pos.read_mpint()?.to_vec(),
            prime1: pos.read_mpint()?.to_vec(),
            prime2: pos.read_mpint()?.to_vec(),
        })
    }
}

impl fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("modulus_len", &self.modulus.len())
            .field("public_exponent", &self.public_exponent)
            .finish_non_exhaustive()
    }
}

/// SSH DSA private key.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DsaPrivateKey {
    pub p: Vec<u8>,
    pub q: Vec<u8>,
    pub g: Vec<u8>,
    /// Public key `y = g^x mod p`.
    pub y: Vec<u8>,
    /// Private key `x`.
    pub x: Vec<u8>,
}

impl SshRead for DsaPrivateKey {
    fn read_ssh(pos: &mut Position<'_>) -> Result<Self> {
        Ok(Self {
            p: pos.read_mpint()?.to_vec(),
            q: pos.read_mpint()?.to_vec(),
            g: pos.read_mpint()?.to_vec(),
            y: pos.read_mpint()?.to_vec(),
            x: pos.read_mpint()?.to_vec(),
        })
    }
}

impl fmt::Debug for DsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DsaPrivateKey")
            .field("p_len", &self.p.len())
            .finish_non_exhaustive()
    }
}

/// Ed25519 private key. The secret is the 32-byte seed followed by the
/// 32-byte public key.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Ed25519PrivateKey {
    pub public: [u8; 32],
    pub secret: [u8; 64],
}

impl SshRead for Ed25519PrivateKey {
    fn read_ssh(pos: &mut Position<'_>) -> Result<Self> {
        Ok(Self {
            public: fixed(pos.read_string()?)?,
            secret: fixed(pos.read_string()?)?,
        })
    }
}

impl fmt::Debug for Ed25519PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519PrivateKey")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

/// ECDSA private key on one of the NIST curves.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct EcdsaPrivateKey {
    /// Curve identifier, such as `nistp256`.
    pub curve: Vec<u8>,
    /// SEC1-encoded public point `Q`.
    pub public_point: Vec<u8>,
    /// Private scalar `d`.
    pub private_scalar: Vec<u8>,
}

impl SshRead for EcdsaPrivateKey {
    fn read_ssh(pos: &mut Position<'_>) -> Result<Self> {
        Ok(Self {
            curve: pos.read_string()?.to_vec(),
            public_point: pos.read_string()?.to_vec(),
            private_scalar: pos.read_mpint()?.to_vec(),
        })
    }
}

impl fmt::Debug for EcdsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcdsaPrivateKey")
            .field("curve", &String::from_utf8_lossy(&self.curve))
            .field("public_point", &self.public_point)
            .finish_non_exhaustive()
    }
}

/// Security key (FIDO) holding an ECDSA P-256 key. Only a handle to the
/// key lives in the file; the key itself stays on the authenticator.
#[derive(Clone, Debug, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SkEcdsaPrivateKey {
    pub curve: Vec<u8>,
    pub public_point: Vec<u8>,
    /// Relying party, usually `ssh:`.
    pub application: Vec<u8>,
    pub flags: u8,
    pub key_handle: Vec<u8>,
    pub reserved: Vec<u8>,
}

impl SshRead for SkEcdsaPrivateKey {
    fn read_ssh(pos: &mut Position<'_>) -> Result<Self> {
        Ok(Self {
            curve: pos.read_string()?.to_vec(),
            public_point: pos.read_string()?.to_vec(),
            application: pos.read_string()?.to_vec(),
            flags: pos.read_byte()?,
            key_handle: pos.read_string()?.to_vec(),
            reserved: pos.read_string()?.to_vec(),
        })
    }
}

/// Security key (FIDO) holding an Ed25519 key.
#[derive(Clone, Debug, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SkEd25519PrivateKey {
    pub public: [u8; 32],
    pub application: Vec<u8>,
    pub flags: u8,
    pub key_handle: Vec<u8>,
    pub reserved: Vec<u8>,
}

impl SshRead for SkEd25519PrivateKey {
    fn read_ssh(pos: &mut Position<'_>) -> Result<Self> {
        Ok(Self {
            public: fixed(pos.read_string()?)?,
            application: pos.read_string()?.to_vec(),
            flags: pos.read_byte()?,
            key_handle: pos.read_string()?.to_vec(),
            reserved: pos.read_string()?.to_vec(),
        })
    }
}

fn fixed<const N: usize>(s: &[u8]) -> Result<[u8; N]> {
    s.try_into().map_err(|_| Error::KeyIsCorrupt)
}

/// The curve an `ecdsa-sha2-*` key type must carry.
fn expected_curve(key_format: &[u8]) -> &[u8] {
    key_format
        .strip_prefix(b"ecdsa-sha2-")
        .or_else(|| {
            key_format
                .strip_prefix(b"sk-ecdsa-sha2-")
                .and_then(|c| c.strip_suffix(b"@openssh.com"))
        })
        .unwrap_or_default()
}

/// Decode one private key record: its type tag, then the fields that
/// type defines. The comment that follows the record is left unread.
pub fn decode_private_record(pos: &mut Position<'_>) -> Result<(Vec<u8>, PrivateKeyRecord)> {
    let key_format = pos.read_string()?;
    trace!(
        "decoding private record {:?}",
        String::from_utf8_lossy(key_format)
    );
    let record = match key_format {
        key::SSH_RSA => PrivateKeyRecord::Rsa(RsaPrivateKey::read_ssh(pos)?),
        key::SSH_DSS => PrivateKeyRecord::Dsa(DsaPrivateKey::read_ssh(pos)?),
        key::SSH_ED25519 => PrivateKeyRecord::Ed25519(Ed25519PrivateKey::read_ssh(pos)?),
        key::ECDSA_SHA2_NISTP256 | key::ECDSA_SHA2_NISTP384 | key::ECDSA_SHA2_NISTP521 => {
            let k = EcdsaPrivateKey::read_ssh(pos)?;
            if k.curve != expected_curve(key_format) {
                return Err(Error::KeyIsCorrupt);
            }
            PrivateKeyRecord::Ecdsa(k)
        }
        key::SK_ECDSA_SHA2_NISTP256 => {
            let k = SkEcdsaPrivateKey::read_ssh(pos)?;
            if k.curve != expected_curve(key_format) {
                return Err(Error::KeyIsCorrupt);
            }
            PrivateKeyRecord::SkEcdsa(k)
        }
        key::SK_SSH_ED25519 => PrivateKeyRecord::SkEd25519(SkEd25519PrivateKey::read_ssh(pos)?),
        other => {
            return Err(Error::UnsupportedKeyType {
                key_type_string: String::from_utf8_lossy(other).into_owned(),
                key_type_raw: other.to_vec(),
            })
        }
    };
    Ok((key_format.to_vec(), record))
}
