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

use byteorder::{BigEndian, ByteOrder};
use log::trace;

use crate::Error;

/// A cursor from which we can read SSH wire values.
pub trait Reader {
    /// Create a new reader starting at `starting_at`.
    fn reader(&self, starting_at: usize) -> Position<'_>;
}

impl Reader for [u8] {
    fn reader(&self, starting_at: usize) -> Position<'_> {
        Position {
            s: self,
            position: starting_at,
        }
    }
}

impl Reader for Vec<u8> {
    fn reader(&self, starting_at: usize) -> Position<'_> {
        self.as_slice().reader(starting_at)
    }
}

/// A position in a buffer, advanced by each successful read.
///
/// A read that fails leaves the position where it was.
#[derive(Debug, Clone)]
pub struct Position<'a> {
    s: &'a [u8],
    position: usize,
}

impl<'a> Position<'a> {
    /// Offset of the next byte to be read.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes left in the buffer.
    pub fn remaining_len(&self) -> usize {
        self.s.len().saturating_sub(self.position)
    }

    /// Whether the whole buffer has been consumed.
    pub fn is_finished(&self) -> bool {
        self.remaining_len() == 0
    }

    /// The unread part of the buffer, without consuming it.
    pub fn remaining(&self) -> &'a [u8] {
        self.s.get(self.position..).unwrap_or_default()
    }

    /// Read exactly `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], Error> {
        let available = self.remaining_len();
        let bytes = self
            .position
            .checked_add(n)
            .and_then(|end| self.s.get(self.position..end))
            .ok_or(Error::Truncated {
                wanted: n,
                available,
            })?;
        self.position += n;
        Ok(bytes)
    }

    /// Read one byte.
    pub fn read_byte(&mut self) -> Result<u8, Error> {
        let b = self.read_bytes(1)?;
        Ok(b.first().copied().unwrap_or_default())
    }

    /// Read a big-endian `uint32`.
    pub fn read_u32(&mut self) -> Result<u32, Error> {
        Ok(BigEndian::read_u32(self.read_bytes(4)?))
    }

    /// Read a length-prefixed string: a big-endian `uint32` length `n`
    /// followed by `n` bytes.
    ///
    /// An absurd `n` against a short buffer is reported as truncation.
    pub fn read_string(&mut self) -> Result<&'a [u8], Error> {
        let start = self.position;
        let len = self.read_u32()? as usize;
        match self.read_bytes(len) {
            Ok(s) => {
                trace!("read_string: {} bytes at offset {}", len, start);
                Ok(s)
            }
            Err(e) => {
                self.position = start;
                Err(e)
            }
        }
    }

    /// Read a multiple-precision integer. The bytes are returned as they
    /// appear on the wire, including any leading zero used for sign.
    pub fn read_mpint(&mut self) -> Result<&'a [u8], Error> {
        self.read_string()
    }
}
