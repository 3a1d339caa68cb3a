use songmeta::container::{Container, NativeTag};
use songmeta::cover::FetchError;
use songmeta::error::Result;
use songmeta::format::AudioFormat;
use songmeta::song::Song;

use std::path::{Path, PathBuf};
use std::time::Duration;

pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

/// A [`Container`] that "persists" to memory
///
/// `reload` restores the tag from the last `save`, or an empty tag if it was never saved.
pub struct MemoryContainer {
	format: AudioFormat,
	tag: NativeTag,
	saved: Option<NativeTag>,
	pub saves: usize,
	pub reloads: usize,
}

impl MemoryContainer {
	pub fn new(format: AudioFormat) -> Self {
		Self {
			format,
			tag: NativeTag::new(format.family()),
			saved: None,
			saves: 0,
			reloads: 0,
		}
	}

	/// The tag as of the last save
	pub fn saved(&self) -> Option<&NativeTag> {
		self.saved.as_ref()
	}
}

impl Container for MemoryContainer {
	fn format(&self) -> AudioFormat {
		self.format
	}

	fn tag(&self) -> &NativeTag {
		&self.tag
	}

	fn tag_mut(&mut self) -> &mut NativeTag {
		&mut self.tag
	}

	fn save(&mut self) -> Result<()> {
		self.saves += 1;
		self.saved = Some(self.tag.clone());
		Ok(())
	}

	fn reload(&mut self) -> Result<()> {
		self.reloads += 1;
		self.tag = self
			.saved
			.clone()
			.unwrap_or_else(|| NativeTag::new(self.format.family()));
		Ok(())
	}
}

/// A fully populated song
pub fn song() -> Song {
	Song {
		name: String::from("Foo title"),
		artists: vec![String::from("Bar artist"), String::from("Baz artist")],
		artist: String::from("Bar artist"),
		album_name: Some(String::from("Qux album")),
		album_artist: Some(String::from("Bar artist")),
		genres: vec![String::from("Pop"), String::from("Rock")],
		disc_number: 1,
		disc_count: 2,
		track_number: 3,
		tracks_count: 12,
		year: Some(2021),
		date: String::from("2021-05-01"),
		publisher: String::from("Quux records"),
		url: String::from("https://example.com/track/foo"),
		copyright_text: Some(String::from("2021 Quux records")),
		lyrics: Some(String::from("Foo bar\nBaz qux")),
		download_url: Some(String::from("https://example.com/watch?v=foo")),
		cover_url: Some(String::from("https://example.com/cover.jpg")),
		explicit: true,
	}
}

pub fn fetch_jpeg(_: &str, _: Duration) -> std::result::Result<Vec<u8>, FetchError> {
	Ok(JPEG.to_vec())
}

pub fn fetch_fail(url: &str, _: Duration) -> std::result::Result<Vec<u8>, FetchError> {
	Err(format!("{url}: connection refused").into())
}

/// Four silent MPEG-1 Layer III frames (128 kbps, 44.1 kHz, no padding)
pub fn mp3_bytes() -> Vec<u8> {
	const FRAME_LEN: usize = 417;

	let mut bytes = Vec::with_capacity(FRAME_LEN * 4);
	for _ in 0..4 {
		let mut frame = vec![0; FRAME_LEN];
		frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
		bytes.extend(frame);
	}

	bytes
}

/// A FLAC stream with only a STREAMINFO block (44.1 kHz, stereo, 16 bit)
pub fn flac_bytes() -> Vec<u8> {
	let mut bytes = b"fLaC".to_vec();

	// Last block, STREAMINFO, 34 bytes
	bytes.extend([0x80, 0x00, 0x00, 34]);

	// Min/max block size
	bytes.extend([0x10, 0x00, 0x10, 0x00]);
	// Min/max frame size, unknown
	bytes.extend([0; 6]);
	// Sample rate, channels, bits per sample, total samples
	bytes.extend([0x0A, 0xC4, 0x42, 0xF0, 0x00, 0x00, 0x00, 0x00]);
	// MD5
	bytes.extend([0; 16]);

	bytes
}

/// Writes `content` to `name` in `dir`
pub fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
	let path = dir.join(name);
	std::fs::write(&path, content).unwrap();
	path
}

/// [`flac_bytes`] followed by a run of (fake) audio frames
pub fn flac_bytes_with_audio() -> Vec<u8> {
	let mut bytes = flac_bytes();
	bytes.extend(FLAC_AUDIO);
	bytes
}

pub const FLAC_AUDIO: &[u8] = &[0xAA; 200];

fn atom(ident: &[u8; 4], content: &[u8]) -> Vec<u8> {
	let mut bytes = Vec::with_capacity(8 + content.len());
	bytes.extend((8 + content.len() as u32).to_be_bytes());
	bytes.extend(ident);
	bytes.extend(content);
	bytes
}

/// An MP4 file with an `ftyp`, a `moov` holding only `mvhd`, and an empty `mdat`
pub fn m4a_bytes() -> Vec<u8> {
	let mut ftyp = b"M4A ".to_vec();
	ftyp.extend(0_u32.to_be_bytes());
	ftyp.extend(b"M4A isom");

	// Version 0, no flags
	let mut mvhd = vec![0; 100];
	// Timescale
	mvhd[12..16].copy_from_slice(&1000_u32.to_be_bytes());
	// Rate 1.0, volume 1.0
	mvhd[20..24].copy_from_slice(&0x0001_0000_u32.to_be_bytes());
	mvhd[24..26].copy_from_slice(&0x0100_u16.to_be_bytes());
	// Next track ID
	mvhd[96..100].copy_from_slice(&1_u32.to_be_bytes());

	let mut bytes = atom(b"ftyp", &ftyp);
	bytes.extend(atom(b"moov", &atom(b"mvhd", &mvhd)));
	bytes.extend(atom(b"mdat", &[0; 16]));
	bytes
}

// CRC-32, polynomial 0x04C11DB7, no reflection, zero init and xorout
fn ogg_crc(data: &[u8]) -> u32 {
	let mut crc = 0_u32;
	for byte in data {
		crc ^= u32::from(*byte) << 24;
		for _ in 0..8 {
			crc = if crc & 0x8000_0000 == 0 { crc << 1 } else { (crc << 1) ^ 0x04C1_1DB7 };
		}
	}

	crc
}

// A single-packet page, `packet` must be shorter than 255 bytes
fn ogg_page(header_type: u8, granule: u64, sequence: u32, packet: &[u8]) -> Vec<u8> {
	assert!(packet.len() < 255);

	let mut page = b"OggS".to_vec();
	page.push(0);
	page.push(header_type);
	page.extend(granule.to_le_bytes());
	// Serial
	page.extend(0x1234_5678_u32.to_le_bytes());
	page.extend(sequence.to_le_bytes());
	// CRC, filled in below
	page.extend([0; 4]);
	page.push(1);
	page.push(packet.len() as u8);
	page.extend(packet);

	let crc = ogg_crc(&page);
	page[22..26].copy_from_slice(&crc.to_le_bytes());
	page
}

/// An Opus stream with an identification header, an empty comment header and a single audio packet
pub fn opus_bytes() -> Vec<u8> {
	const BEGINNING_OF_STREAM: u8 = 0x02;
	const END_OF_STREAM: u8 = 0x04;

	let mut head = b"OpusHead".to_vec();
	// Version, channels
	head.extend([1, 2]);
	// Pre-skip
	head.extend(312_u16.to_le_bytes());
	// Input sample rate
	head.extend(48000_u32.to_le_bytes());
	// Output gain, channel mapping family
	head.extend([0, 0, 0]);

	let mut tags = b"OpusTags".to_vec();
	tags.extend(8_u32.to_le_bytes());
	tags.extend(b"songmeta");
	// No comments
	tags.extend(0_u32.to_le_bytes());

	let mut bytes = ogg_page(BEGINNING_OF_STREAM, 0, 0, &head);
	bytes.extend(ogg_page(0, 0, 1, &tags));
	// A 20ms silence frame
	bytes.extend(ogg_page(END_OF_STREAM, 960, 2, &[0xF8, 0xFF, 0xFE]));
	bytes
}
