//! Tag-set block codec.
//!
//! ```text
//! [count: varint] then count times:
//!   [kind: u8]              0x80 | code  -> well-known key
//!                           0x00         -> custom key, followed by
//!   [name: varint + UTF-8]                 (custom keys only)
//!   [value: varint + UTF-8]
//! ```

use crate::codec::{put_str, put_varint, str_len, varint_len, WireReader};
use crate::error::{FrameError, Result};
use broker_common::{Key, Tag, Tags, WellKnownKey};
use bytes::{BufMut, BytesMut};

const WELL_KNOWN_FLAG: u8 = 0x80;
const CUSTOM_KIND: u8 = 0x00;

/// Smallest possible encoded tag: kind byte plus an empty value
const MIN_TAG_LEN: usize = 2;

/// Append the tag-set block for `tags`
pub fn encode_tags(buf: &mut BytesMut, tags: &Tags) {
    put_varint(buf, tags.len() as u64);
    for tag in tags {
        match tag.key() {
            Key::WellKnown(key) => buf.put_u8(WELL_KNOWN_FLAG | key.code()),
            Key::Custom(name) => {
                buf.put_u8(CUSTOM_KIND);
                put_str(buf, name);
            }
        }
        put_str(buf, tag.value());
    }
}

/// Encoded size of the tag-set block for `tags`
pub fn encoded_len(tags: &Tags) -> usize {
    let entries: usize = tags
        .iter()
        .map(|tag| {
            let key = match tag.key() {
                Key::WellKnown(_) => 1,
                Key::Custom(name) => 1 + str_len(name),
            };
            key + str_len(tag.value())
        })
        .sum();
    varint_len(tags.len() as u64) + entries
}

/// Decode a tag-set block, re-applying sort and dedup
pub fn decode_tags(reader: &mut WireReader<'_>) -> Result<Tags> {
    let count = read_count(reader)?;
    let mut tags = Vec::with_capacity(count);
    for idx in 0..count {
        let key = match read_key(reader, idx)? {
            Some(key) => Key::WellKnown(key),
            None => Key::custom(reader.read_str().map_err(|e| entry_error(idx, e))?),
        };
        let value = reader.read_str().map_err(|e| entry_error(idx, e))?;
        tags.push(Tag::new(key, value));
    }
    Ok(Tags::of(tags))
}

/// Advance past a tag-set block without materializing it
pub fn skip_tags(reader: &mut WireReader<'_>) -> Result<()> {
    let count = read_count(reader)?;
    for idx in 0..count {
        if read_key(reader, idx)?.is_none() {
            reader.skip_str().map_err(|e| entry_error(idx, e))?;
        }
        reader.skip_str().map_err(|e| entry_error(idx, e))?;
    }
    Ok(())
}

fn read_count(reader: &mut WireReader<'_>) -> Result<usize> {
    let count = reader
        .read_varint()
        .map_err(|e| FrameError::malformed_tags(format!("bad tag count: {e}")))?;
    let max = reader.remaining() / MIN_TAG_LEN;
    match usize::try_from(count) {
        Ok(count) if count <= max => Ok(count),
        _ => Err(FrameError::malformed_tags(format!(
            "count {count} cannot fit in {} remaining bytes",
            reader.remaining()
        ))),
    }
}

/// Returns the registry key, or `None` when a custom name follows.
fn read_key(reader: &mut WireReader<'_>, idx: usize) -> Result<Option<WellKnownKey>> {
    let kind = reader.read_u8().map_err(|e| entry_error(idx, e))?;
    if kind & WELL_KNOWN_FLAG != 0 {
        let code = kind & !WELL_KNOWN_FLAG;
        return WellKnownKey::from_code(code).map(Some).ok_or_else(|| {
            FrameError::malformed_tags(format!("tag {idx}: unknown well-known key {code:#04x}"))
        });
    }
    if kind != CUSTOM_KIND {
        return Err(FrameError::malformed_tags(format!(
            "tag {idx}: invalid key kind {kind:#04x}"
        )));
    }
    Ok(None)
}

fn entry_error(idx: usize, cause: FrameError) -> FrameError {
    match cause {
        FrameError::InvalidEncoding(_) => cause,
        other => FrameError::malformed_tags(format!("tag {idx}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Tags {
        Tags::builder()
            .with(WellKnownKey::MajorVersion, "1")
            .with(WellKnownKey::MinorVersion, "0")
            .with("mycustomtag", "mycustomtagvalue")
            .build()
    }

    fn encode(tags: &Tags) -> BytesMut {
        let mut buf = BytesMut::new();
        encode_tags(&mut buf, tags);
        buf
    }

    #[test]
    fn test_encode_decode() {
        let tags = sample();
        let buf = encode(&tags);
        assert_eq!(buf.len(), encoded_len(&tags));

        let mut reader = WireReader::new(&buf);
        assert_eq!(decode_tags(&mut reader).unwrap(), tags);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_empty_block_is_one_byte() {
        let buf = encode(Tags::empty());
        assert_eq!(&buf[..], &[0x00]);
        assert_eq!(
            decode_tags(&mut WireReader::new(&buf)).unwrap(),
            *Tags::empty()
        );
    }

    #[test]
    fn test_wire_layout() {
        let tags = Tags::builder()
            .with(WellKnownKey::ServiceName, "s")
            .with("k", "")
            .build();
        let buf = encode(&tags);
        assert_eq!(&buf[..], &[0x02, 0x81, 0x01, b's', 0x00, 0x01, b'k', 0x00]);
    }

    #[test]
    fn test_skip_lands_after_block() {
        let mut buf = encode(&sample());
        buf.put_u8(0xAB);

        let mut reader = WireReader::new(&buf);
        skip_tags(&mut reader).unwrap();
        assert_eq!(reader.read_u8().unwrap(), 0xAB);
    }

    #[test]
    fn test_decode_canonicalizes_unsorted_input() {
        let mut buf = BytesMut::new();
        put_varint(&mut buf, 3);
        for (key, value) in [("b", "1"), ("a", "2"), ("b", "3")] {
            buf.put_u8(CUSTOM_KIND);
            put_str(&mut buf, key);
            put_str(&mut buf, value);
        }

        let tags = decode_tags(&mut WireReader::new(&buf)).unwrap();
        assert_eq!(tags.to_string(), "[a:2,b:3]");
    }

    #[test]
    fn test_unknown_well_known_code() {
        let buf = [0x01, 0x80 | 0x7F, 0x00];
        assert!(matches!(
            decode_tags(&mut WireReader::new(&buf)),
            Err(FrameError::MalformedTagSet(_))
        ));
    }

    #[test]
    fn test_invalid_kind_byte() {
        let buf = [0x01, 0x05, 0x00];
        assert!(matches!(
            skip_tags(&mut WireReader::new(&buf)),
            Err(FrameError::MalformedTagSet(_))
        ));
    }

    #[test]
    fn test_count_exceeds_remaining() {
        let buf = [0x09, 0x81, 0x00];
        assert!(matches!(
            decode_tags(&mut WireReader::new(&buf)),
            Err(FrameError::MalformedTagSet(_))
        ));
    }

    #[test]
    fn test_truncated_entry() {
        let buf = encode(&sample());
        for len in 1..buf.len() {
            let result = decode_tags(&mut WireReader::new(&buf[..len]));
            assert!(
                matches!(
                    result,
                    Err(FrameError::MalformedTagSet(_)) | Err(FrameError::InvalidEncoding(_))
                ),
                "prefix of {len} bytes decoded to {result:?}"
            );
        }
    }

    #[test]
    fn test_empty_input_is_malformed() {
        assert!(matches!(
            decode_tags(&mut WireReader::new(&[])),
            Err(FrameError::MalformedTagSet(_))
        ));
    }
}
