//! FLAC metadata block fixups applied before `lofty` writes a stream

use crate::error::Result;

use std::path::Path;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

const STREAM_MARKER: &[u8; 4] = b"fLaC";

const BLOCK_ID_STREAMINFO: u8 = 0;
const BLOCK_ID_PADDING: u8 = 1;
const LAST_BLOCK_FLAG: u8 = 0x80;

const BLOCK_HEADER_LEN: usize = 4;
const PADDING_LEN: u32 = 1024;

// ID3v2 header flag for a trailing footer
const ID3V2_FOOTER_FLAG: u8 = 0x10;

/// Inserts a PADDING block after STREAMINFO, if STREAMINFO is the last metadata block
///
/// Anything that is not a FLAC stream is left alone. Returns `true` if the file was modified.
///
/// # Errors
///
/// `path` could not be read or written
pub(crate) fn pad_stream_info(path: &Path) -> Result<bool> {
	let mut bytes = std::fs::read(path)?;

	let Some(block_header) = stream_marker_offset(&bytes).map(|pos| pos + STREAM_MARKER.len())
	else {
		return Ok(false);
	};

	let Some(end) = last_stream_info_end(&bytes, block_header) else {
		return Ok(false);
	};

	log::debug!(
		"FLAC: STREAMINFO is the last metadata block, inserting {PADDING_LEN} bytes of padding"
	);

	let mut padding = Vec::with_capacity(BLOCK_HEADER_LEN + PADDING_LEN as usize);
	padding.write_u8(LAST_BLOCK_FLAG | BLOCK_ID_PADDING)?;
	padding.write_u24::<BigEndian>(PADDING_LEN)?;
	padding.resize(BLOCK_HEADER_LEN + PADDING_LEN as usize, 0);

	bytes[block_header] &= !LAST_BLOCK_FLAG;
	bytes.splice(end..end, padding);

	std::fs::write(path, bytes)?;
	Ok(true)
}

// The end of the STREAMINFO block starting at `block_header`, if it is flagged as the last block
fn last_stream_info_end(bytes: &[u8], block_header: usize) -> Option<usize> {
	let mut header = bytes.get(block_header..block_header + BLOCK_HEADER_LEN)?;

	let flags = header.read_u8().ok()?;
	if flags & !LAST_BLOCK_FLAG != BLOCK_ID_STREAMINFO || flags & LAST_BLOCK_FLAG == 0 {
		return None;
	}

	let size = header.read_u24::<BigEndian>().ok()? as usize;
	let end = block_header + BLOCK_HEADER_LEN + size;

	// A truncated block is left for `lofty` to report
	(end <= bytes.len()).then_some(end)
}

// Position of the "fLaC" marker, after a leading ID3v2 tag if present
fn stream_marker_offset(bytes: &[u8]) -> Option<usize> {
	let offset = match bytes {
		[b'I', b'D', b'3', _, _, flags, size @ ..] if size.len() >= 4 => {
			let size = size[..4]
				.iter()
				.fold(0_usize, |acc, byte| (acc << 7) | usize::from(byte & 0x7F));

			let footer = if flags & ID3V2_FOOTER_FLAG == 0 { 0 } else { 10 };
			10 + size + footer
		},
		_ => 0,
	};

	let marker = bytes.get(offset..offset + STREAM_MARKER.len())?;
	(marker == STREAM_MARKER).then_some(offset)
}
