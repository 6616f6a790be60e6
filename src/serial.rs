//! Binary serialization of the packed automaton.
//!
//! The payload is gzip-framed. Inside the frame, all integers are
//! little-endian: a four-byte magic `LHYP`, a version byte, the
//! transition array (length, raw `u32` words), the base table (length,
//! `i32` entries), the character map as (count, `(char, index)` pairs),
//! the alphabet size, and the per-state priority vectors (outer length,
//! then a length byte per state where 0 means absent, followed by the
//! bytes).

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::alphabet::{CHAR_MAP_LEN, NOT_IN_ALPHABET};
use crate::automaton::Automaton;
use crate::Error;

/// Header magic, `L` `H` `Y` `P`.
pub const MAGIC: [u8; 4] = [0x4C, 0x48, 0x59, 0x50];

/// Current payload format version.
pub const FORMAT_VERSION: u8 = 1;

// Decode-side plausibility caps. A valid header followed by an absurd
// section length means truncation or corruption, not a bigger automaton.
const MAX_DATA_WORDS: usize = 1 << 28;
const MAX_STATES_ON_DISK: usize = 1 << 16;

/// Serialize `automaton` into `writer` with gzip framing.
pub fn write<W: Write>(automaton: &Automaton, writer: W) -> Result<(), Error> {
    let mut w = GzEncoder::new(writer, Compression::best());

    w.write_all(&MAGIC)?;
    w.write_all(&[FORMAT_VERSION])?;

    let data = automaton.data();
    write_u32(&mut w, data.len() as u32)?;
    for &entry in data {
        write_u32(&mut w, entry)?;
    }

    let bases = automaton.bases();
    write_u32(&mut w, bases.len() as u32)?;
    for &base in bases {
        write_i32(&mut w, base as i32)?;
    }

    let assigned: Vec<(u16, u16)> = automaton
        .char_map()
        .iter()
        .enumerate()
        .filter(|&(_, &index)| index != NOT_IN_ALPHABET)
        .map(|(unit, &index)| (unit as u16, index))
        .collect();
    write_u32(&mut w, assigned.len() as u32)?;
    for &(unit, index) in &assigned {
        write_u16(&mut w, unit)?;
        write_u16(&mut w, index)?;
    }
    write_u32(&mut w, automaton.alphabet_len() as u32)?;

    let priorities = automaton.priorities();
    write_u32(&mut w, priorities.len() as u32)?;
    for vector in priorities {
        match vector {
            None => w.write_all(&[0])?,
            Some(v) => {
                w.write_all(&[v.len() as u8])?;
                w.write_all(v)?;
            }
        }
    }

    w.finish()?;
    Ok(())
}

/// Serialize to an in-memory buffer.
pub fn to_bytes(automaton: &Automaton) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    write(automaton, &mut out)?;
    Ok(out)
}

/// Decode an automaton from a gzip-framed payload.
pub fn read<R: Read>(reader: R) -> Result<Automaton, Error> {
    let mut r = GzDecoder::new(reader);

    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(Error::BadMagic { found: magic });
    }
    let version = read_u8(&mut r)?;
    if version != FORMAT_VERSION {
        return Err(Error::BadVersion(version));
    }

    let data_len = read_u32(&mut r)? as usize;
    if data_len > MAX_DATA_WORDS {
        return Err(Error::InvalidData(format!(
            "transition array of {data_len} words is implausibly large"
        )));
    }
    let mut data = Vec::with_capacity(data_len);
    for _ in 0..data_len {
        data.push(read_u32(&mut r)?);
    }

    let base_len = read_u32(&mut r)? as usize;
    if base_len > MAX_STATES_ON_DISK {
        return Err(Error::InvalidData(format!(
            "base table of {base_len} states exceeds the format's state limit"
        )));
    }
    let mut bases = Vec::with_capacity(base_len);
    for _ in 0..base_len {
        let base = read_i32(&mut r)?;
        if base < 0 {
            return Err(Error::InvalidData(format!("negative base offset {base}")));
        }
        bases.push(base as u32);
    }

    let assigned = read_u32(&mut r)? as usize;
    if assigned > CHAR_MAP_LEN {
        return Err(Error::InvalidData(format!(
            "{assigned} character map entries for a {CHAR_MAP_LEN}-unit plane"
        )));
    }
    let mut char_map = vec![NOT_IN_ALPHABET; CHAR_MAP_LEN];
    for _ in 0..assigned {
        let unit = read_u16(&mut r)?;
        let index = read_u16(&mut r)?;
        char_map[unit as usize] = index;
    }
    let alphabet_len = read_u32(&mut r)?;

    let vector_count = read_u32(&mut r)? as usize;
    if vector_count != base_len {
        return Err(Error::InvalidData(format!(
            "priority table covers {vector_count} states, base table {base_len}"
        )));
    }
    let mut priorities = Vec::with_capacity(vector_count);
    for _ in 0..vector_count {
        let len = read_u8(&mut r)? as usize;
        if len == 0 {
            priorities.push(None);
        } else {
            let mut vector = vec![0u8; len];
            r.read_exact(&mut vector)?;
            priorities.push(Some(vector.into_boxed_slice()));
        }
    }

    log::debug!(
        "loaded automaton: {base_len} states, {data_len} transition words, alphabet {alphabet_len}"
    );

    Ok(Automaton::new(data, bases, char_map, alphabet_len, priorities))
}

fn write_u16<W: Write>(w: &mut W, value: u16) -> Result<(), Error> {
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

fn write_u32<W: Write>(w: &mut W, value: u32) -> Result<(), Error> {
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

fn write_i32<W: Write>(w: &mut W, value: i32) -> Result<(), Error> {
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

fn read_u8<R: Read>(r: &mut R) -> Result<u8, Error> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u16<R: Read>(r: &mut R) -> Result<u16, Error> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

fn read_u32<R: Read>(r: &mut R) -> Result<u32, Error> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_i32<R: Read>(r: &mut R) -> Result<i32, Error> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Gzip an arbitrary interior payload, bypassing `write`.
    fn frame(interior: &[u8]) -> Vec<u8> {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(interior).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn rejects_wrong_magic() {
        let bytes = frame(b"NOPE\x01");
        match read(bytes.as_slice()) {
            Err(Error::BadMagic { found }) => assert_eq!(&found, b"NOPE"),
            other => panic!("expected BadMagic, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_version() {
        let mut interior = MAGIC.to_vec();
        interior.push(9);
        let bytes = frame(&interior);
        match read(bytes.as_slice()) {
            Err(Error::BadVersion(9)) => {}
            other => panic!("expected BadVersion, got {other:?}"),
        }
    }

    #[test]
    fn rejects_truncated_payload() {
        let mut interior = MAGIC.to_vec();
        interior.push(FORMAT_VERSION);
        interior.extend_from_slice(&100u32.to_le_bytes());
        // ...but no transition words follow.
        let bytes = frame(&interior);
        assert!(matches!(read(bytes.as_slice()), Err(Error::Io(_))));
    }

    #[test]
    fn rejects_non_gzip_input() {
        assert!(read(&b"not a gzip stream at all"[..]).is_err());
    }

    #[test]
    fn rejects_implausible_section_lengths() {
        let mut interior = MAGIC.to_vec();
        interior.push(FORMAT_VERSION);
        interior.extend_from_slice(&u32::MAX.to_le_bytes());
        let bytes = frame(&interior);
        assert!(matches!(
            read(bytes.as_slice()),
            Err(Error::InvalidData(_))
        ));
    }
}
