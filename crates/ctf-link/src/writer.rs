//! Serializing the link result: a single container if no per-CU split
//! occurred, otherwise an archive of the shared output plus every per-CU
//! child.
//!
//! This crate defines its own small archive container format; it does not
//! reproduce the real CTF archive or `ar` binary layouts, both of which are
//! out of scope here (see the crate's module docs).

use std::io::{Read, Seek, SeekFrom, Write};

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::container::ContainerSnapshot;
use crate::error::{LinkError, Result};
use crate::ids::CTF_DEFAULT_MEMBER;
use crate::linker::Linker;

const MAGIC: &[u8; 4] = b"CTFA";
const COMPRESSED_FLAG: u8 = 1;
const RAW_FLAG: u8 = 0;

/// Serialize one container's contents, compressing if the encoded form
/// exceeds `compress_above` bytes.
pub(crate) fn write_container(snapshot: &ContainerSnapshot, compress_above: usize) -> Result<Vec<u8>> {
    let raw = bincode::serialize(snapshot)?;
    if raw.len() > compress_above {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&raw)?;
        let compressed = encoder.finish()?;
        let mut out = Vec::with_capacity(compressed.len() + 1);
        out.push(COMPRESSED_FLAG);
        out.extend_from_slice(&compressed);
        Ok(out)
    } else {
        let mut out = Vec::with_capacity(raw.len() + 1);
        out.push(RAW_FLAG);
        out.extend_from_slice(&raw);
        Ok(out)
    }
}

/// Decode a blob produced by [`write_container`] back into a snapshot.
///
/// Provided for round-trip testing and introspection of this crate's own
/// archive format; it is not a general CTF archive reader.
pub fn read_container(blob: &[u8]) -> Result<ContainerSnapshot> {
    let (flag, body) = blob.split_first().ok_or_else(|| LinkError::Format("empty container blob".into()))?;
    let raw = match *flag {
        RAW_FLAG => body.to_vec(),
        COMPRESSED_FLAG => {
            let mut decoder = flate2::read::ZlibDecoder::new(body);
            let mut out = Vec::new();
            decoder.read_to_end(&mut out)?;
            out
        }
        other => return Err(LinkError::Format(format!("unknown container blob flag {other}"))),
    };
    Ok(bincode::deserialize(&raw)?)
}

pub(crate) fn write(linker: &mut Linker, compress_above: usize) -> Result<Vec<u8>> {
    let out = linker.out();
    linker.container_mut(out).update();

    if linker.cu_outputs().is_empty() {
        return write_container(&linker.container(out).to_snapshot(), compress_above);
    }

    let mut members: Vec<(String, Vec<u8>)> = Vec::with_capacity(linker.cu_output_count() + 1);
    members.push((CTF_DEFAULT_MEMBER.to_string(), write_container(&linker.container(out).to_snapshot(), compress_above)?));

    let cu_names: Vec<String> = linker.cu_outputs().iter().map(|(n, _)| n.to_string()).collect();
    for name in cu_names {
        let id = linker.cu_outputs().get(&name).expect("name came from cu_outputs iteration");
        linker.container_mut(id).update();
        let blob = write_container(&linker.container(id).to_snapshot(), compress_above)?;
        members.push((name, blob));
    }

    encode_archive(&members)
}

/// Decode the top-level archive TOC produced by [`write`] back into its
/// `(name, blob)` members, each still in [`write_container`]'s format.
pub fn read_archive_toc(bytes: &[u8]) -> Result<Vec<(String, Vec<u8>)>> {
    let mut cursor = bytes;
    let magic = take(&mut cursor, 4)?;
    if magic != MAGIC {
        return Err(LinkError::Format("bad archive magic".into()));
    }
    let count = u32::from_le_bytes(take(&mut cursor, 4)?.try_into().unwrap());

    let mut members = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let name_len = u32::from_le_bytes(take(&mut cursor, 4)?.try_into().unwrap()) as usize;
        let name = String::from_utf8(take(&mut cursor, name_len)?.to_vec())
            .map_err(|e| LinkError::Format(e.to_string()))?;
        let blob_len = u32::from_le_bytes(take(&mut cursor, 4)?.try_into().unwrap()) as usize;
        let blob = take(&mut cursor, blob_len)?.to_vec();
        members.push((name, blob));
    }
    Ok(members)
}

fn take<'a>(cursor: &mut &'a [u8], n: usize) -> Result<&'a [u8]> {
    if cursor.len() < n {
        return Err(LinkError::Format("truncated archive".into()));
    }
    let (head, tail) = cursor.split_at(n);
    *cursor = tail;
    Ok(head)
}

fn encode_archive(members: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut scratch = tempfile::tempfile()?;
    scratch.write_all(MAGIC)?;
    scratch.write_all(&(members.len() as u32).to_le_bytes())?;
    for (name, blob) in members {
        let name_bytes = name.as_bytes();
        scratch.write_all(&(name_bytes.len() as u32).to_le_bytes())?;
        scratch.write_all(name_bytes)?;
        scratch.write_all(&(blob.len() as u32).to_le_bytes())?;
        scratch.write_all(blob)?;
    }

    let len = scratch.stream_position()?;
    scratch.seek(SeekFrom::Start(0))?;
    let mut buf = Vec::with_capacity(len as usize);
    scratch.read_to_end(&mut buf)?;
    Ok(buf)
}
