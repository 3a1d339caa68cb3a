//! Container handles
//!
//! A container handle owns the tag block of a single audio file. The writer and reader only ever
//! see a handle through the [`Container`] trait, and address its contents by native key
//! (see [`native_key`](crate::mapping::native_key)).
//!
//! [`AudioContainer`] is the file-backed handle, loading and saving with `lofty`.

use crate::error::{ErrorKind, MetadataError, Result};
use crate::format::{AudioFormat, TagFamily};
use crate::macros::decode_err;
use crate::value::TagValue;

use std::borrow::Cow;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use lofty::TextEncoding;
use lofty::config::{ParseOptions, WriteOptions};
use lofty::error::ErrorKind as LoftyErrorKind;
use lofty::file::AudioFile;
use lofty::flac::FlacFile;
use lofty::id3::v2::{
	CommentFrame, Frame, FrameId, Id3v2Tag, TextInformationFrame, TimestampFrame,
	UnsynchronizedTextFrame, UrlLinkFrame,
};
use lofty::mp4::{Atom, AtomData, AtomIdent, DataType, Ilst, Mp4File};
use lofty::mpeg::MpegFile;
use lofty::ogg::{OggPictureStorage, OpusFile, VorbisComments, VorbisFile};
use lofty::tag::TagExt;
use lofty::tag::items::Timestamp;

// ID3v2 frames that lofty reads as timestamps
const ID3V2_TIMESTAMP_FRAMES: [&str; 5] = ["TDEN", "TDOR", "TDRC", "TDRL", "TDTG"];

/// The tag block of a container, in its native representation
#[derive(Clone, Debug, PartialEq)]
pub enum NativeTag {
	/// An ID3v2 tag (MP3)
	Id3v2(Id3v2Tag),
	/// An MP4 `ilst` atom (M4A)
	Ilst(Ilst),
	/// Vorbis comments (FLAC, OGG, Opus)
	///
	/// For FLAC, the file's picture blocks are carried by the tag.
	Vorbis(VorbisComments),
}

impl NativeTag {
	/// Creates an empty tag for a family
	pub fn new(family: TagFamily) -> Self {
		match family {
			TagFamily::Id3v2 => NativeTag::Id3v2(Id3v2Tag::default()),
			TagFamily::Mp4 => NativeTag::Ilst(Ilst::default()),
			TagFamily::Vorbis => NativeTag::Vorbis(VorbisComments::default()),
		}
	}

	/// Reads the tag of a container, creating an empty one if the container has none
	///
	/// Audio properties are never read.
	///
	/// # Errors
	///
	/// `lofty` is unable to parse `reader` as `format`
	pub fn read_from<R>(reader: &mut R, format: AudioFormat) -> lofty::error::Result<Self>
	where
		R: Read + Seek,
	{
		let parse_options = ParseOptions::new().read_properties(false);

		let tag = match format {
			AudioFormat::Mp3 => {
				let mut file = MpegFile::read_from(reader, parse_options)?;
				NativeTag::Id3v2(file.remove_id3v2().unwrap_or_default())
			},
			AudioFormat::M4a => {
				let mut file = Mp4File::read_from(reader, parse_options)?;
				NativeTag::Ilst(file.remove_ilst().unwrap_or_default())
			},
			AudioFormat::Flac => {
				let mut file = FlacFile::read_from(reader, parse_options)?;
				let mut comments = file.remove_vorbis_comments().unwrap_or_default();

				// Pictures are stored as separate blocks, they get moved into the tag so they
				// are written back on save.
				for (picture, information) in file.pictures() {
					comments.insert_picture(picture.clone(), Some(*information))?;
				}

				NativeTag::Vorbis(comments)
			},
			AudioFormat::Ogg => {
				let mut file = VorbisFile::read_from(reader, parse_options)?;
				NativeTag::Vorbis(file.remove_vorbis_comments())
			},
			AudioFormat::Opus => {
				let mut file = OpusFile::read_from(reader, parse_options)?;
				NativeTag::Vorbis(file.remove_vorbis_comments())
			},
		};

		Ok(tag)
	}

	/// The family of the tag
	pub fn family(&self) -> TagFamily {
		match self {
			NativeTag::Id3v2(_) => TagFamily::Id3v2,
			NativeTag::Ilst(_) => TagFamily::Mp4,
			NativeTag::Vorbis(_) => TagFamily::Vorbis,
		}
	}

	/// Whether the tag holds nothing at all
	pub fn is_empty(&self) -> bool {
		match self {
			NativeTag::Id3v2(tag) => tag.is_empty(),
			NativeTag::Ilst(tag) => tag.is_empty(),
			NativeTag::Vorbis(tag) => tag.is_empty(),
		}
	}

	/// Gets the value stored under a native key
	///
	/// Keys are the ones returned by [`native_key`](crate::mapping::native_key). This returns
	/// `None` if nothing is stored under the key, or the key is not valid for the family.
	///
	/// # Examples
	///
	/// ```rust
	/// use songmeta::container::NativeTag;
	/// use songmeta::format::TagFamily;
	/// use songmeta::value::TagValue;
	///
	/// # fn main() -> songmeta::error::Result<()> {
	/// let mut tag = NativeTag::new(TagFamily::Mp4);
	/// tag.set("©nam", TagValue::text("Foo title"))?;
	///
	/// assert_eq!(tag.get("©nam"), Some(TagValue::text("Foo title")));
	/// assert_eq!(tag.get("©alb"), None);
	/// # Ok(()) }
	/// ```
	pub fn get(&self, key: &str) -> Option<TagValue> {
		match self {
			NativeTag::Id3v2(tag) => id3v2_get(tag, key),
			NativeTag::Ilst(tag) => ilst_get(tag, key),
			NativeTag::Vorbis(tag) => vorbis_get(tag, key),
		}
	}

	/// Stores a value under a native key, replacing anything already there
	///
	/// The value is converted to the shape the key expects, see [`TagValue`].
	///
	/// # Errors
	///
	/// * The key is not a valid identifier for the family
	/// * A binary value is given for a family that can only store text under the key
	pub fn set(&mut self, key: &str, value: TagValue) -> Result<()> {
		log::trace!("Setting `{key}` to {value}");

		match self {
			NativeTag::Id3v2(tag) => id3v2_set(tag, key, value),
			NativeTag::Ilst(tag) => ilst_set(tag, key, value),
			NativeTag::Vorbis(tag) => vorbis_set(tag, key, value),
		}
	}

	/// Writes the tag to the file at `path`
	///
	/// A FLAC stream whose only metadata block is STREAMINFO gets a PADDING block inserted after
	/// it first, `lofty` is unable to write to such a stream.
	///
	/// # Errors
	///
	/// * See [`TagExt::save_to_path`]
	/// * The FLAC stream could not be padded ([`ErrorKind::Io`])
	pub fn save_to_path(&self, path: &Path, write_options: WriteOptions) -> Result<()> {
		let ret = match self {
			NativeTag::Id3v2(tag) => tag.save_to_path(path, write_options).map_err(Into::into),
			NativeTag::Ilst(tag) => tag.save_to_path(path, write_options).map_err(Into::into),
			NativeTag::Vorbis(tag) => crate::flac::pad_stream_info(path).and_then(|_| {
				tag.save_to_path(path, write_options)
					.map_err(MetadataError::from)
			}),
		};

		ret.map_err(|e| e.with_path(path))
	}
}

/// A handle over the tag block of one audio file
///
/// The writer and reader borrow a handle, and never own its lifecycle. Implementors decide what
/// "saving" means, see [`AudioContainer`] for the file-backed implementation.
pub trait Container {
	/// The format of the underlying file
	fn format(&self) -> AudioFormat;

	/// The native tag
	fn tag(&self) -> &NativeTag;

	/// The native tag, mutably
	fn tag_mut(&mut self) -> &mut NativeTag;

	/// Persists the tag
	///
	/// This must be idempotent, saving twice in a row leaves the same state as saving once.
	///
	/// # Errors
	///
	/// Implementation specific
	fn save(&mut self) -> Result<()>;

	/// Discards the in-memory tag and loads the persisted one
	///
	/// # Errors
	///
	/// Implementation specific
	fn reload(&mut self) -> Result<()>;

	/// Shorthand for `self.tag().get(key)`
	fn get(&self, key: &str) -> Option<TagValue> {
		self.tag().get(key)
	}

	/// Shorthand for `self.tag_mut().set(key, value)`
	///
	/// # Errors
	///
	/// See [`NativeTag::set`]
	fn set(&mut self, key: &str, value: TagValue) -> Result<()> {
		self.tag_mut().set(key, value)
	}
}

/// A [`Container`] backed by a file on disk
///
/// # Examples
///
/// ```rust,no_run
/// use songmeta::container::{AudioContainer, Container};
/// use songmeta::value::TagValue;
///
/// # fn main() -> songmeta::error::Result<()> {
/// let mut container = AudioContainer::open("Artist - Title.flac")?;
/// container.set("title", TagValue::text("Title"))?;
/// container.save()?;
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct AudioContainer {
	path: PathBuf,
	format: AudioFormat,
	tag: NativeTag,
	write_options: WriteOptions,
}

impl AudioContainer {
	/// Loads the tag of the file at `path`, resolving its format from the extension
	///
	/// # Errors
	///
	/// * The extension does not belong to a supported format
	/// * The file cannot be opened or read ([`ErrorKind::Io`], [`ErrorKind::Lofty`])
	/// * `lofty` cannot parse it ([`ErrorKind::Unrecognized`])
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let format = AudioFormat::from_path(path)?;

		Self::open_as(path, format)
	}

	/// Loads the tag of the file at `path` as `format`
	///
	/// # Errors
	///
	/// * The file cannot be opened or read ([`ErrorKind::Io`], [`ErrorKind::Lofty`])
	/// * `lofty` cannot parse it ([`ErrorKind::Unrecognized`])
	pub fn open_as(path: impl AsRef<Path>, format: AudioFormat) -> Result<Self> {
		let path = path.as_ref();
		let tag = load_tag(path, format)?;

		log::debug!("Loaded {format} container: {}", path.display());

		Ok(Self {
			path: path.to_path_buf(),
			format,
			tag,
			write_options: WriteOptions::default(),
		})
	}

	/// Sets the [`WriteOptions`] used by [`Container::save`]
	#[must_use]
	pub fn with_write_options(mut self, write_options: WriteOptions) -> Self {
		self.write_options = write_options;
		self
	}

	/// The path of the underlying file
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Consumes the container, returning the native tag
	pub fn into_tag(self) -> NativeTag {
		self.tag
	}
}

impl Container for AudioContainer {
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
		log::debug!("Saving {} container: {}", self.format, self.path.display());
		self.tag.save_to_path(&self.path, self.write_options)
	}

	fn reload(&mut self) -> Result<()> {
		self.tag = load_tag(&self.path, self.format)?;
		Ok(())
	}
}

fn load_tag(path: &Path, format: AudioFormat) -> Result<NativeTag> {
	let mut file = File::open(path).map_err(|e| MetadataError::from(e).with_path(path))?;

	NativeTag::read_from(&mut file, format).map_err(|e| {
		// Truncated containers surface as EOF, and are treated like any other parse failure
		let is_io = matches!(
			e.kind(),
			LoftyErrorKind::Io(io) if io.kind() != std::io::ErrorKind::UnexpectedEof
		);

		if is_io {
			return MetadataError::from(e).with_path(path);
		}

		MetadataError::new(ErrorKind::Unrecognized(e))
			.with_path(path)
			.with_context("Unable to load file")
	})
}

// ID3v2

// Splits keys of the form `COMM::XXX` into the frame ID and language
fn split_language_key(key: &str) -> Option<(&str, [u8; 3])> {
	let (id, language) = key.split_once("::")?;
	let language = <[u8; 3]>::try_from(language.as_bytes()).ok()?;

	Some((id, language))
}

fn is_language_frame(frame: &Frame<'_>, id: &str, language: [u8; 3]) -> bool {
	match frame {
		Frame::Comment(comment) if id == "COMM" => {
			comment.language == language && comment.description.is_empty()
		},
		Frame::UnsynchronizedText(lyrics) if id == "USLT" => {
			lyrics.language == language && lyrics.description.is_empty()
		},
		_ => false,
	}
}

fn id3v2_get(tag: &Id3v2Tag, key: &str) -> Option<TagValue> {
	if let Some((id, language)) = split_language_key(key) {
		let values = tag
			.into_iter()
			.filter(|frame| is_language_frame(frame, id, language))
			.filter_map(|frame| match frame {
				Frame::Comment(comment) => Some(comment.content.to_string()),
				Frame::UnsynchronizedText(lyrics) => Some(lyrics.content.to_string()),
				_ => None,
			})
			.collect::<Vec<_>>();

		return (!values.is_empty()).then_some(TagValue::Text(values));
	}

	let id = FrameId::new(key).ok()?;

	if key == "APIC" {
		let pictures = tag
			.into_iter()
			.filter_map(|frame| match frame {
				Frame::Picture(picture_frame) => Some(picture_frame.picture.data().to_vec()),
				_ => None,
			})
			.collect::<Vec<_>>();

		return (!pictures.is_empty()).then_some(TagValue::Binary(pictures));
	}

	match tag.get(&id)? {
		Frame::Text(frame) => Some(TagValue::Text(
			frame.value.split('\0').map(str::to_owned).collect(),
		)),
		Frame::Timestamp(frame) => Some(TagValue::text(frame.timestamp.to_string())),
		Frame::Url(frame) => Some(TagValue::Url(frame.url().to_owned())),
		other => {
			log::warn!("Unable to represent frame `{key}` ({:?})", other.id());
			None
		},
	}
}

fn id3v2_set(tag: &mut Id3v2Tag, key: &str, value: TagValue) -> Result<()> {
	if let Some((id, language)) = split_language_key(key) {
		tag.retain(|frame| !is_language_frame(frame, id, language));

		let content = value.to_strings().join("\n");
		let frame = match id {
			"COMM" => Frame::Comment(CommentFrame::new(
				TextEncoding::UTF8,
				language,
				String::new(),
				content,
			)),
			"USLT" => Frame::UnsynchronizedText(UnsynchronizedTextFrame::new(
				TextEncoding::UTF8,
				language,
				String::new(),
				content,
			)),
			_ => return Err(decode_err!("Only COMM and USLT frames carry a language")),
		};

		tag.insert(frame);
		return Ok(());
	}

	let id = FrameId::new(key.to_owned())?;

	if let TagValue::Binary(_) = value {
		log::warn!("Refusing to store binary data in frame `{key}`");
		return Err(decode_err!("ID3v2 frames can only be set to text"));
	}

	let _ = tag.remove(&id);

	if key.starts_with('W') {
		let url = value.first_string().unwrap_or_default();
		tag.insert(Frame::Url(UrlLinkFrame::new(id, url)));
		return Ok(());
	}

	let values = value.to_strings();
	if ID3V2_TIMESTAMP_FRAMES.contains(&key) {
		if let [single] = values.as_slice() {
			if let Ok(timestamp) = Timestamp::from_str(single) {
				tag.insert(Frame::Timestamp(TimestampFrame::new(
					id,
					TextEncoding::UTF8,
					timestamp,
				)));
				return Ok(());
			}
		}
	}

	tag.insert(Frame::Text(TextInformationFrame::new(
		id,
		TextEncoding::UTF8,
		values.join("\0"),
	)));

	Ok(())
}

// MP4

fn atom_ident(key: &str) -> Option<AtomIdent<'static>> {
	if let Some(freeform) = key.strip_prefix("----:") {
		let (mean, name) = freeform.split_once(':')?;
		return Some(AtomIdent::Freeform {
			mean: Cow::Owned(mean.to_owned()),
			name: Cow::Owned(name.to_owned()),
		});
	}

	// FOURCCs are Latin-1, `©` is 0xA9
	let mut fourcc = [0; 4];
	let mut chars = key.chars();
	for byte in &mut fourcc {
		*byte = u8::try_from(u32::from(chars.next()?)).ok()?;
	}

	if chars.next().is_some() {
		return None;
	}

	Some(AtomIdent::Fourcc(fourcc))
}

fn is_number_pair_atom(ident: &AtomIdent<'_>) -> bool {
	matches!(ident, AtomIdent::Fourcc(fourcc) if fourcc == b"trkn" || fourcc == b"disk")
}

fn ilst_get(tag: &Ilst, key: &str) -> Option<TagValue> {
	let ident = atom_ident(key)?;
	let atom = tag.get(&ident)?;

	if is_number_pair_atom(&ident) {
		let pairs = atom
			.data()
			.filter_map(|data| match data {
				AtomData::Unknown { data, .. } if data.len() >= 6 => Some((
					u32::from(u16::from_be_bytes([data[2], data[3]])),
					u32::from(u16::from_be_bytes([data[4], data[5]])),
				)),
				_ => None,
			})
			.collect::<Vec<_>>();

		return (!pairs.is_empty()).then_some(TagValue::NumberPair(pairs));
	}

	// Freeform atoms are treated as raw bytes, regardless of their type
	if let AtomIdent::Freeform { .. } = ident {
		let values = atom
			.data()
			.filter_map(|data| match data {
				AtomData::UTF8(text) | AtomData::UTF16(text) => Some(text.clone().into_bytes()),
				AtomData::Unknown { data, .. } => Some(data.clone()),
				_ => None,
			})
			.collect::<Vec<_>>();

		return (!values.is_empty()).then_some(TagValue::Binary(values));
	}

	let value = match atom.data().next()? {
		AtomData::UTF8(_) | AtomData::UTF16(_) => TagValue::Text(
			atom.data()
				.filter_map(|data| match data {
					AtomData::UTF8(text) | AtomData::UTF16(text) => Some(text.clone()),
					_ => None,
				})
				.collect(),
		),
		AtomData::SignedInteger(_) | AtomData::UnsignedInteger(_) | AtomData::Bool(_) => {
			TagValue::Integer(
				atom.data()
					.filter_map(|data| match data {
						AtomData::SignedInteger(int) => Some(*int),
						AtomData::UnsignedInteger(int) => i32::try_from(*int).ok(),
						AtomData::Bool(flag) => Some(i32::from(*flag)),
						_ => None,
					})
					.collect(),
			)
		},
		_ => TagValue::Binary(
			atom.data()
				.filter_map(|data| match data {
					AtomData::Picture(picture) => Some(picture.data().to_vec()),
					AtomData::Unknown { data, .. } => Some(data.clone()),
					_ => None,
				})
				.collect(),
		),
	};

	Some(value)
}

fn ilst_set(tag: &mut Ilst, key: &str, value: TagValue) -> Result<()> {
	let Some(ident) = atom_ident(key) else {
		return Err(decode_err!("Invalid MP4 atom identifier"));
	};

	let data = match value {
		TagValue::NumberPair(pairs) => {
			let trailing_padding = matches!(ident, AtomIdent::Fourcc(ref fourcc) if fourcc == b"trkn");

			pairs
				.into_iter()
				.map(|(number, total)| {
					let mut data = vec![0, 0];
					data.extend(clamp_u16(number).to_be_bytes());
					data.extend(clamp_u16(total).to_be_bytes());
					if trailing_padding {
						data.extend([0, 0]);
					}

					AtomData::Unknown {
						code: DataType::Reserved,
						data,
					}
				})
				.collect::<Vec<_>>()
		},
		TagValue::Integer(ints) => ints.into_iter().map(AtomData::SignedInteger).collect(),
		TagValue::Binary(values) => values
			.into_iter()
			.map(|bytes| match String::from_utf8(bytes) {
				Ok(text) => AtomData::UTF8(text),
				Err(e) => AtomData::Unknown {
					code: DataType::Reserved,
					data: e.into_bytes(),
				},
			})
			.collect(),
		text => text.to_strings().into_iter().map(AtomData::UTF8).collect(),
	};

	let _ = tag.remove(&ident);
	if let Some(atom) = Atom::from_collection(ident, data) {
		tag.insert(atom);
	}

	Ok(())
}

fn clamp_u16(value: u32) -> u16 {
	u16::try_from(value).unwrap_or_else(|_| {
		log::warn!("{value} does not fit in an MP4 number pair, clamping");
		u16::MAX
	})
}

// Vorbis comments

fn vorbis_get(tag: &VorbisComments, key: &str) -> Option<TagValue> {
	let values = tag.get_all(key).map(str::to_owned).collect::<Vec<_>>();
	(!values.is_empty()).then_some(TagValue::Text(values))
}

fn vorbis_set(tag: &mut VorbisComments, key: &str, value: TagValue) -> Result<()> {
	if let TagValue::Binary(_) = value {
		log::warn!("Refusing to store binary data in comment `{key}`");
		return Err(decode_err!("Vorbis comments can only be set to text"));
	}

	let _ = tag.remove(key);
	for value in value.to_strings() {
		tag.push(key.to_owned(), value);
	}

	Ok(())
}
