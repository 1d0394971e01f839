//! Conversion between application keys and the byte strings stored in the tree.
//!
//! A tree key is the application key followed by a terminator byte (`0x00`). So that a
//! terminator can never be mistaken for key content, `0x00` and `0x01` inside the application key
//! are written as `0x01 0x01` and `0x01 0x02`. After that `0x00` only ever appears as the final
//! byte, which makes the encoding prefix-free (no tree key is a strict prefix of another one, and
//! node splitting relies on that). Escaped bytes sort below every unescaped byte, in their
//! original order, so tree keys sort exactly like the application keys they came from.

use crate::error::KeyError;

pub const TERMINATOR: u8 = 0x00;
pub const ESCAPE: u8 = 0x01;

/// Application key to tree key.
pub fn encode(key: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(key.len() + 1);
    for &b in key {
        if b <= ESCAPE {
            out.push(ESCAPE);
            out.push(b + 1);
        } else {
            out.push(b);
        }
    }
    out.push(TERMINATOR);
    out
}

/// Tree key to application key, rejecting anything [`encode`] could not have produced.
pub fn decode(tree_key: &[u8]) -> Result<Vec<u8>, KeyError> {
    let mut out = Vec::with_capacity(tree_key.len().saturating_sub(1));
    let mut i = 0;
    while i < tree_key.len() {
        match tree_key[i] {
            TERMINATOR => {
                let trailing = tree_key.len() - i - 1;
                if trailing > 0 {
                    return Err(KeyError::TrailingBytes(trailing));
                }
                return Ok(out);
            }
            ESCAPE => match tree_key.get(i + 1) {
                Some(&escaped @ (0x01 | 0x02)) => {
                    out.push(escaped - 1);
                    i += 2;
                }
                _ => return Err(KeyError::InvalidEscape(i)),
            },
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    Err(KeyError::MissingTerminator)
}

/// Decoding for keys that came out of the tree, which are well formed by construction.
pub(crate) fn restore(tree_key: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(tree_key.len().saturating_sub(1));
    let mut bytes = tree_key.iter().copied();
    while let Some(b) = bytes.next() {
        match b {
            TERMINATOR => break,
            ESCAPE => out.push(bytes.next().unwrap_or(1).saturating_sub(1)),
            b => out.push(b),
        }
    }
    out
}
