//! Cover art embedding
//!
//! Covers are fetched through a [`CoverFetcher`], and stored as a front cover in every format:
//!
//! * MP3: an `APIC` frame
//! * M4A: a JPEG `covr` atom
//! * FLAC: a `METADATA_BLOCK_PICTURE` block
//! * OGG/Opus: a base64 encoded `METADATA_BLOCK_PICTURE` under the `metadata_block_picture` comment
//!
//! Embedding is best-effort. A missing URL or a failed fetch leaves the container untouched.

use crate::container::{Container, NativeTag};
use crate::error::Result;
use crate::format::AudioFormat;
use crate::macros::decode_err;

use std::io::{Cursor, Read};
use std::time::Duration;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use data_encoding::BASE64;
use lofty::config::ParsingMode;
use lofty::ogg::OggPictureStorage;
use lofty::picture::{Picture, PictureInformation, PictureType};

/// The Vorbis comment key holding base64 encoded pictures
pub const VORBIS_PICTURE_KEY: &str = "metadata_block_picture";

/// The error type returned by a [`CoverFetcher`]
pub type FetchError = Box<dyn std::error::Error + Send + Sync>;

/// Downloads cover art
pub trait CoverFetcher {
	/// Fetches the image at `url`, giving up after `timeout`
	///
	/// # Errors
	///
	/// Implementation specific. Every error is treated as "no cover".
	fn fetch(&self, url: &str, timeout: Duration) -> std::result::Result<Vec<u8>, FetchError>;
}

impl<F> CoverFetcher for F
where
	F: Fn(&str, Duration) -> std::result::Result<Vec<u8>, FetchError>,
{
	fn fetch(&self, url: &str, timeout: Duration) -> std::result::Result<Vec<u8>, FetchError> {
		self(url, timeout)
	}
}

/// A [`CoverFetcher`] over HTTP(S)
///
/// Responses with a non-success status are rejected.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpCoverFetcher {
	client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl HttpCoverFetcher {
	/// Creates a new `HttpCoverFetcher`
	///
	/// # Errors
	///
	/// The HTTP client could not be initialized (Ex. no TLS backend)
	pub fn new() -> std::result::Result<Self, reqwest::Error> {
		let client = reqwest::blocking::Client::builder()
			.user_agent(concat!("songmeta/", env!("CARGO_PKG_VERSION")))
			.build()?;

		Ok(Self { client })
	}
}

#[cfg(feature = "http")]
impl CoverFetcher for HttpCoverFetcher {
	fn fetch(&self, url: &str, timeout: Duration) -> std::result::Result<Vec<u8>, FetchError> {
		let response = self
			.client
			.get(url)
			.timeout(timeout)
			.send()?
			.error_for_status()?;

		Ok(response.bytes()?.to_vec())
	}
}

/// A FLAC `METADATA_BLOCK_PICTURE`
///
/// This is the common representation of a cover before it is stored in a format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PictureBlock {
	/// The APIC picture type, `3` is a front cover
	pub picture_type: u32,
	/// The MIME type of the image
	pub mime_type: String,
	/// A description of the image
	pub description: String,
	/// Width in pixels, `0` if unknown
	pub width: u32,
	/// Height in pixels, `0` if unknown
	pub height: u32,
	/// Color depth in bits per pixel, `0` if unknown
	pub color_depth: u32,
	/// Number of colors for indexed images, `0` otherwise
	pub num_colors: u32,
	/// The image data
	pub data: Vec<u8>,
}

impl PictureBlock {
	/// The APIC picture type of a front cover
	pub const FRONT_COVER: u32 = 3;

	/// Creates a front cover block for JPEG data
	///
	/// The dimensions are left unknown.
	///
	/// # Examples
	///
	/// ```rust
	/// use songmeta::cover::PictureBlock;
	///
	/// let block = PictureBlock::front_cover(vec![0xFF, 0xD8, 0xFF]);
	/// assert_eq!(block.picture_type, 3);
	/// assert_eq!(block.mime_type, "image/jpeg");
	/// assert_eq!(block.description, "Cover");
	/// ```
	pub fn front_cover(data: Vec<u8>) -> Self {
		Self {
			picture_type: Self::FRONT_COVER,
			mime_type: String::from("image/jpeg"),
			description: String::from("Cover"),
			width: 0,
			height: 0,
			color_depth: 0,
			num_colors: 0,
			data,
		}
	}

	/// Serializes the block, without a `METADATA_BLOCK_HEADER`
	///
	/// # Errors
	///
	/// A length does not fit in 32 bits
	pub fn as_bytes(&self) -> Result<Vec<u8>> {
		let mut bytes = Vec::with_capacity(32 + self.mime_type.len() + self.data.len());

		bytes.write_u32::<BigEndian>(self.picture_type)?;
		write_sized(&mut bytes, self.mime_type.as_bytes())?;
		write_sized(&mut bytes, self.description.as_bytes())?;
		bytes.write_u32::<BigEndian>(self.width)?;
		bytes.write_u32::<BigEndian>(self.height)?;
		bytes.write_u32::<BigEndian>(self.color_depth)?;
		bytes.write_u32::<BigEndian>(self.num_colors)?;
		write_sized(&mut bytes, &self.data)?;

		Ok(bytes)
	}

	/// Serializes the block and encodes it as base64, the form stored in Vorbis comments
	///
	/// # Errors
	///
	/// See [`PictureBlock::as_bytes`]
	pub fn to_base64(&self) -> Result<String> {
		Ok(BASE64.encode(&self.as_bytes()?))
	}

	/// Parses a block, without a `METADATA_BLOCK_HEADER`
	///
	/// # Errors
	///
	/// The block is truncated, or its strings are not valid UTF-8
	pub fn parse(bytes: &[u8]) -> Result<Self> {
		let mut reader = Cursor::new(bytes);

		let picture_type = reader.read_u32::<BigEndian>()?;
		let Ok(mime_type) = String::from_utf8(read_sized(&mut reader)?) else {
			decode_err!(@BAIL "Picture MIME type is not valid UTF-8");
		};
		let Ok(description) = String::from_utf8(read_sized(&mut reader)?) else {
			decode_err!(@BAIL "Picture description is not valid UTF-8");
		};

		Ok(Self {
			picture_type,
			mime_type,
			description,
			width: reader.read_u32::<BigEndian>()?,
			height: reader.read_u32::<BigEndian>()?,
			color_depth: reader.read_u32::<BigEndian>()?,
			num_colors: reader.read_u32::<BigEndian>()?,
			data: read_sized(&mut reader)?,
		})
	}

	/// Decodes and parses the base64 form stored in Vorbis comments
	///
	/// # Errors
	///
	/// * `encoded` is not valid base64
	/// * See [`PictureBlock::parse`]
	pub fn from_base64(encoded: &str) -> Result<Self> {
		let Ok(bytes) = BASE64.decode(encoded.as_bytes()) else {
			decode_err!(@BAIL "Picture is not valid base64");
		};

		Self::parse(&bytes)
	}

	fn information(&self) -> PictureInformation {
		PictureInformation {
			width: self.width,
			height: self.height,
			color_depth: self.color_depth,
			num_colors: self.num_colors,
		}
	}

	fn to_picture(&self) -> Result<Picture> {
		let (picture, _) =
			Picture::from_flac_bytes(&self.as_bytes()?, false, ParsingMode::Relaxed)?;
		Ok(picture)
	}
}

fn write_sized(bytes: &mut Vec<u8>, content: &[u8]) -> Result<()> {
	let Ok(len) = u32::try_from(content.len()) else {
		decode_err!(@BAIL "Picture field is too large");
	};

	bytes.write_u32::<BigEndian>(len)?;
	bytes.extend_from_slice(content);
	Ok(())
}

fn read_sized(reader: &mut Cursor<&[u8]>) -> Result<Vec<u8>> {
	let len = reader.read_u32::<BigEndian>()? as usize;

	let remaining = reader.get_ref().len() - reader.position() as usize;
	if len > remaining {
		decode_err!(@BAIL "Picture field length exceeds the block");
	}

	let mut content = vec![0; len];
	reader.read_exact(&mut content)?;
	Ok(content)
}

/// Fetches a song's cover and stores it in a container, replacing any existing front cover
///
/// This never fails. Returns `true` if a cover was embedded.
///
/// # Examples
///
/// ```rust
/// use songmeta::container::{Container, NativeTag};
/// use songmeta::cover::{FetchError, embed_cover};
/// use songmeta::format::AudioFormat;
/// use std::time::Duration;
///
/// # struct Handle(NativeTag);
/// # impl Container for Handle {
/// # 	fn format(&self) -> AudioFormat { AudioFormat::Mp3 }
/// # 	fn tag(&self) -> &NativeTag { &self.0 }
/// # 	fn tag_mut(&mut self) -> &mut NativeTag { &mut self.0 }
/// # 	fn save(&mut self) -> songmeta::error::Result<()> { Ok(()) }
/// # 	fn reload(&mut self) -> songmeta::error::Result<()> { Ok(()) }
/// # }
/// # let mut container = Handle(NativeTag::new(AudioFormat::Mp3.family()));
/// let unreachable = |_: &str, _: Duration| -> Result<Vec<u8>, FetchError> {
/// 	Err("connection refused".into())
/// };
///
/// let embedded = embed_cover(
/// 	&mut container,
/// 	Some("https://example.com/cover.jpg"),
/// 	&unreachable,
/// 	Duration::from_secs(10),
/// );
///
/// assert!(!embedded);
/// assert!(container.tag().is_empty());
/// ```
pub fn embed_cover<C, F>(
	container: &mut C,
	cover_url: Option<&str>,
	fetcher: &F,
	timeout: Duration,
) -> bool
where
	C: Container + ?Sized,
	F: CoverFetcher + ?Sized,
{
	let Some(cover_url) = cover_url.filter(|url| !url.is_empty()) else {
		log::debug!("No cover URL, skipping cover");
		return false;
	};

	let data = match fetcher.fetch(cover_url, timeout) {
		Ok(data) => data,
		Err(e) => {
			log::warn!("Unable to fetch cover from {cover_url}: {e}");
			return false;
		},
	};

	log::debug!("Fetched cover ({} bytes) from {cover_url}", data.len());

	let format = container.format();
	match insert_front_cover(container.tag_mut(), format, &PictureBlock::front_cover(data)) {
		Ok(()) => true,
		Err(e) => {
			log::warn!("Unable to embed cover: {e}");
			false
		},
	}
}

/// Stores a picture block as the front cover of a tag, replacing any existing front cover
///
/// # Errors
///
/// * The tag does not belong to `format`
/// * The block cannot be converted into a `lofty` picture
pub fn insert_front_cover(
	tag: &mut NativeTag,
	format: AudioFormat,
	block: &PictureBlock,
) -> Result<()> {
	if tag.family() != format.family() {
		decode_err!(@BAIL "The tag does not belong to the container format");
	}

	match (tag, format) {
		(NativeTag::Id3v2(id3v2), _) => {
			id3v2.remove_picture_type(PictureType::CoverFront);
			id3v2.insert_picture(block.to_picture()?);
		},
		(NativeTag::Ilst(ilst), _) => {
			ilst.remove_pictures();
			ilst.insert_picture(block.to_picture()?);
		},
		(NativeTag::Vorbis(comments), AudioFormat::Flac) => {
			comments.remove_picture_type(PictureType::CoverFront);
			comments.insert_picture(block.to_picture()?, Some(block.information()))?;
		},
		(NativeTag::Vorbis(comments), _) => {
			comments.remove_picture_type(PictureType::CoverFront);
			comments.insert(String::from(VORBIS_PICTURE_KEY), block.to_base64()?);
		},
	}

	Ok(())
}
