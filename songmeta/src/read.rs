//! Reading song metadata out of a container
//!
//! Every canonical field is looked up under its native key. Fields that are missing, but have a
//! [`Song`] counterpart, are recorded as [`MetadataValue::Absent`] rather than omitted, so a
//! caller can tell "never tagged" apart from "not read".
//!
//! Present values are decoded per format:
//!
//! * MP3: the year is the first four characters of the date, and the track and disc numbers are
//!   split on `/` into a number and a total
//! * M4A: the source URL is UTF-8 decoded from raw bytes, the explicit flag is `true` only for
//!   `rtng == [4]`, and the track and disc numbers are unpacked from their pairs
//! * FLAC, OGG, Opus: the year comes from the original date, the track number is parsed as an
//!   integer, and the disc number is stored as the *disc count*
//!
//! Any other value is unwrapped if it holds a single string, and kept as a list otherwise.

use crate::container::{AudioContainer, Container, NativeTag};
use crate::error::{ErrorKind, MetadataError, Result};
use crate::field::{CanonicalField, SongField};
use crate::format::{AudioFormat, TagFamily};
use crate::macros::{decode_err, err};
use crate::mapping::{native_key, song_field};
use crate::song::Song;
use crate::value::TagValue;

use std::collections::BTreeMap;
use std::path::Path;

// `rtng` value of an explicit track
const EXPLICIT_RATING: i32 = 4;

/// A decoded value
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MetadataValue {
	/// The field was never tagged
	Absent,
	/// A single string
	Text(String),
	/// Multiple strings
	TextList(Vec<String>),
	/// An integer
	Number(u32),
	/// A flag
	Flag(bool),
}

impl MetadataValue {
	/// The value as a single string
	///
	/// This returns the first string of a [`MetadataValue::TextList`].
	pub fn as_text(&self) -> Option<&str> {
		match self {
			MetadataValue::Text(text) => Some(text),
			MetadataValue::TextList(list) => list.first().map(String::as_str),
			_ => None,
		}
	}

	/// The value as a list of strings
	pub fn as_list(&self) -> Option<&[String]> {
		match self {
			MetadataValue::Text(text) => Some(std::slice::from_ref(text)),
			MetadataValue::TextList(list) => Some(list),
			_ => None,
		}
	}

	/// The value as an integer
	///
	/// Text is parsed if possible.
	pub fn as_number(&self) -> Option<u32> {
		match self {
			MetadataValue::Number(number) => Some(*number),
			MetadataValue::Text(text) => text.trim().parse().ok(),
			_ => None,
		}
	}

	/// The value as a flag
	pub fn as_flag(&self) -> Option<bool> {
		match self {
			MetadataValue::Flag(flag) => Some(*flag),
			_ => None,
		}
	}

	/// Whether the field was never tagged
	pub fn is_absent(&self) -> bool {
		matches!(self, MetadataValue::Absent)
	}
}

/// The metadata read from a file, keyed by [`SongField`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SongMetadata {
	values: BTreeMap<SongField, MetadataValue>,
}

// Generates typed getters for `SongMetadata`
//
// Usage:
//
// getters! {
//     kind [field name] => SongFieldVariant
// }
//
// where `kind` is one of `text`, `list`, `number` or `flag`. The name segments are joined with
// underscores to form the method name.
macro_rules! getters {
	($($kind:ident [$($name:tt)+] => $field:ident),+ $(,)?) => {
		impl SongMetadata {
			$(
				getters!(@$kind [$($name)+] $field);
			)+
		}
	};
	(@text [$name:tt $($other:tt)*] $field:ident) => {
		paste::paste! {
			#[doc = "Returns the " $name $(" " $other)* ", if it was tagged"]
			///
			/// For multi-valued fields, this is the first value.
			pub fn [<$name $(_ $other)*>](&self) -> Option<&str> {
				self.get(SongField::$field).and_then(MetadataValue::as_text)
			}
		}
	};
	(@list [$name:tt $($other:tt)*] $field:ident) => {
		paste::paste! {
			#[doc = "Returns the " $name $(" " $other)* ", if they were tagged"]
			pub fn [<$name $(_ $other)*>](&self) -> Option<&[String]> {
				self.get(SongField::$field).and_then(MetadataValue::as_list)
			}
		}
	};
	(@number [$name:tt $($other:tt)*] $field:ident) => {
		paste::paste! {
			#[doc = "Returns the " $name $(" " $other)* ", if it was tagged and is numeric"]
			pub fn [<$name $(_ $other)*>](&self) -> Option<u32> {
				self.get(SongField::$field).and_then(MetadataValue::as_number)
			}
		}
	};
	(@flag [$name:tt $($other:tt)*] $field:ident) => {
		paste::paste! {
			#[doc = "Returns the " $name $(" " $other)* " flag, if it was tagged"]
			pub fn [<$name $(_ $other)*>](&self) -> Option<bool> {
				self.get(SongField::$field).and_then(MetadataValue::as_flag)
			}
		}
	};
}

getters! {
	text [name]               => Name,
	list [artists]            => Artists,
	text [artist]             => Artist,
	text [album name]         => AlbumName,
	text [album artist]       => AlbumArtist,
	list [genres]             => Genres,
	number [disc number]      => DiscNumber,
	number [disc count]       => DiscCount,
	number [year]             => Year,
	text [date]               => Date,
	number [track number]     => TrackNumber,
	number [tracks count]     => TracksCount,
	text [publisher]          => Publisher,
	text [url]                => Url,
	text [copyright text]     => CopyrightText,
	text [lyrics]             => Lyrics,
	flag [explicit]           => Explicit,
}

impl SongMetadata {
	/// Gets the value of a field
	///
	/// This returns `None` if the field was not read at all, and `Some(MetadataValue::Absent)`
	/// if it was read but never tagged.
	pub fn get(&self, field: SongField) -> Option<&MetadataValue> {
		self.values.get(&field)
	}

	/// Whether a value, possibly [`MetadataValue::Absent`], was recorded for a field
	pub fn contains(&self, field: SongField) -> bool {
		self.values.contains_key(&field)
	}

	/// The number of recorded fields
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Whether no fields were recorded
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// An iterator over the recorded fields, in [`SongField`] order
	pub fn iter(&self) -> impl Iterator<Item = (SongField, &MetadataValue)> {
		self.values.iter().map(|(field, value)| (*field, value))
	}

	pub(crate) fn insert(&mut self, field: SongField, value: MetadataValue) {
		self.values.insert(field, value);
	}

	/// Copies every tagged value onto a [`Song`]
	///
	/// Absent values leave the song untouched. Lists are taken as-is where the song holds a list
	/// (artists, genres), and reduced to their first value otherwise.
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use songmeta::read_metadata;
	/// use songmeta::song::Song;
	///
	/// # fn main() -> songmeta::error::Result<()> {
	/// let mut song = Song::default();
	///
	/// if let Some(metadata) = read_metadata("Artist - Title.flac")? {
	/// 	metadata.apply_to(&mut song);
	/// }
	/// # Ok(()) }
	/// ```
	pub fn apply_to(&self, song: &mut Song) {
		for (field, value) in self.iter() {
			if value.is_absent() {
				continue;
			}

			let text = || value.as_text().map(str::to_owned);
			let list = || value.as_list().map(<[String]>::to_vec);

			match field {
				SongField::Name => set_if_some(&mut song.name, text()),
				SongField::Artists => set_if_some(&mut song.artists, list()),
				SongField::Artist => set_if_some(&mut song.artist, text()),
				SongField::AlbumName => song.album_name = text(),
				SongField::AlbumArtist => song.album_artist = text(),
				SongField::Genres => set_if_some(&mut song.genres, list()),
				SongField::DiscNumber => set_if_some(&mut song.disc_number, value.as_number()),
				SongField::DiscCount => set_if_some(&mut song.disc_count, value.as_number()),
				SongField::Year => song.year = value.as_number(),
				SongField::Date => set_if_some(&mut song.date, text()),
				SongField::TrackNumber => set_if_some(&mut song.track_number, value.as_number()),
				SongField::TracksCount => set_if_some(&mut song.tracks_count, value.as_number()),
				SongField::Publisher => set_if_some(&mut song.publisher, text()),
				SongField::Url => set_if_some(&mut song.url, text()),
				SongField::CopyrightText => song.copyright_text = text(),
				SongField::Lyrics => song.lyrics = text(),
				SongField::Explicit => set_if_some(&mut song.explicit, value.as_flag()),
			}
		}
	}
}

impl<'a> IntoIterator for &'a SongMetadata {
	type Item = (&'a SongField, &'a MetadataValue);
	type IntoIter = std::collections::btree_map::Iter<'a, SongField, MetadataValue>;

	fn into_iter(self) -> Self::IntoIter {
		self.values.iter()
	}
}

fn set_if_some<T>(target: &mut T, value: Option<T>) {
	if let Some(value) = value {
		*target = value;
	}
}

/// Reads the song metadata out of a native tag
///
/// This returns `None` if the tag is empty.
///
/// # Errors
///
/// * A value could not be decoded (Ex. a non-numeric track number)
/// * No artist was tagged ([`ErrorKind::MissingArtist`])
///
/// # Examples
///
/// ```rust
/// use songmeta::container::NativeTag;
/// use songmeta::format::AudioFormat;
/// use songmeta::read::read_tags;
/// use songmeta::value::TagValue;
///
/// # fn main() -> songmeta::error::Result<()> {
/// let mut tag = NativeTag::new(AudioFormat::Mp3.family());
/// assert!(read_tags(&tag, AudioFormat::Mp3)?.is_none());
///
/// tag.set("TPE1", TagValue::text("Artist"))?;
/// tag.set("TRCK", TagValue::text("3/12"))?;
///
/// let metadata = read_tags(&tag, AudioFormat::Mp3)?.unwrap();
/// assert_eq!(metadata.artist(), Some("Artist"));
/// assert_eq!(metadata.track_number(), Some(3));
/// assert_eq!(metadata.tracks_count(), Some(12));
/// # Ok(()) }
/// ```
pub fn read_tags(tag: &NativeTag, format: AudioFormat) -> Result<Option<SongMetadata>> {
	if tag.is_empty() {
		log::debug!("{format} tag is empty");
		return Ok(None);
	}

	let family = format.family();
	let mut metadata = SongMetadata::default();

	for field in CanonicalField::ALL.iter().copied() {
		let Some(value) = native_key(family, field).and_then(|key| tag.get(key)) else {
			if let Some(song_field) = song_field(field) {
				metadata.insert(song_field, MetadataValue::Absent);
			}

			continue;
		};

		match family {
			TagFamily::Id3v2 => decode_id3v2(&mut metadata, field, &value)?,
			TagFamily::Mp4 => decode_mp4(&mut metadata, field, &value)?,
			TagFamily::Vorbis => decode_vorbis(&mut metadata, field, &value)?,
		}
	}

	let artist = match metadata.get(SongField::Artists) {
		Some(MetadataValue::Text(artist)) => artist.clone(),
		Some(MetadataValue::TextList(artists)) if !artists.is_empty() => artists[0].clone(),
		_ => err!(MissingArtist),
	};

	metadata.insert(SongField::Artist, MetadataValue::Text(artist));

	Ok(Some(metadata))
}

/// Reads the song metadata out of the file at `path`
///
/// The format is resolved from the file extension. This returns `None` if the file holds no tags,
/// or is not recognized as its format.
///
/// # Errors
///
/// * `path` does not exist ([`ErrorKind::FileNotFound`])
/// * The extension does not belong to a supported format
/// * `path` could not be read ([`ErrorKind::Io`], [`ErrorKind::Lofty`])
/// * See [`read_tags`]
///
/// # Examples
///
/// ```rust,no_run
/// use songmeta::read_metadata;
///
/// # fn main() -> songmeta::error::Result<()> {
/// if let Some(metadata) = read_metadata("Artist - Title.m4a")? {
/// 	println!("Artists: {:?}", metadata.artists());
/// 	println!("Explicit: {:?}", metadata.explicit());
/// }
/// # Ok(()) }
/// ```
pub fn read_metadata(path: impl AsRef<Path>) -> Result<Option<SongMetadata>> {
	let path = path.as_ref();
	if !path.exists() {
		return Err(MetadataError::new(ErrorKind::FileNotFound).with_path(path));
	}

	let format = AudioFormat::from_path(path)?;
	let container = match AudioContainer::open_as(path, format) {
		Ok(container) => container,
		Err(e) if matches!(e.kind(), ErrorKind::Unrecognized(_)) => {
			log::debug!("{e}");
			return Ok(None);
		},
		Err(e) => return Err(e),
	};

	read_tags(container.tag(), format).map_err(|e| e.with_path(path))
}

// Decoding

fn decode_id3v2(metadata: &mut SongMetadata, field: CanonicalField, value: &TagValue) -> Result<()> {
	match field {
		CanonicalField::Woas => {
			let url = match value {
				TagValue::Url(url) => url.clone(),
				other => other.first_string().unwrap_or_default(),
			};

			metadata.insert(SongField::Url, MetadataValue::Text(url));
		},
		CanonicalField::Year => {
			metadata.insert(SongField::Year, decode_year(value)?);
		},
		CanonicalField::Date => {
			let date = value.first_string().unwrap_or_default();
			metadata.insert(SongField::Date, MetadataValue::Text(date));
		},
		CanonicalField::TrackNumber => {
			decode_split_number(metadata, value, SongField::TrackNumber, SongField::TracksCount)?;
		},
		CanonicalField::DiscNumber => {
			decode_split_number(metadata, value, SongField::DiscNumber, SongField::DiscCount)?;
		},
		_ => unwrap_values(metadata, field, value),
	}

	Ok(())
}

fn decode_mp4(metadata: &mut SongMetadata, field: CanonicalField, value: &TagValue) -> Result<()> {
	match field {
		CanonicalField::Woas => {
			let Some(bytes) = value.to_bytes().into_iter().next() else {
				metadata.insert(SongField::Url, MetadataValue::Absent);
				return Ok(());
			};

			let Ok(url) = String::from_utf8(bytes) else {
				decode_err!(@BAIL "MP4 source URL is not valid UTF-8");
			};

			metadata.insert(SongField::Url, MetadataValue::Text(url));
		},
		CanonicalField::Explicit => {
			let explicit = match value {
				TagValue::Integer(values) if values.is_empty() => MetadataValue::Absent,
				TagValue::Integer(values) => MetadataValue::Flag(values == &[EXPLICIT_RATING]),
				_ => MetadataValue::Flag(false),
			};

			metadata.insert(SongField::Explicit, explicit);
		},
		CanonicalField::Year => {
			metadata.insert(SongField::Year, decode_year(value)?);
		},
		CanonicalField::DiscNumber => {
			decode_pair(metadata, value, SongField::DiscNumber, SongField::DiscCount);
		},
		CanonicalField::TrackNumber => {
			decode_pair(metadata, value, SongField::TrackNumber, SongField::TracksCount);
		},
		_ => unwrap_values(metadata, field, value),
	}

	Ok(())
}

fn decode_vorbis(metadata: &mut SongMetadata, field: CanonicalField, value: &TagValue) -> Result<()> {
	match field {
		CanonicalField::OriginalDate => {
			metadata.insert(SongField::Year, decode_year(value)?);
		},
		CanonicalField::TrackNumber => {
			let number = parse_number(&value.first_string().unwrap_or_default())?;
			metadata.insert(SongField::TrackNumber, MetadataValue::Number(number));
		},
		// The disc number lands in the disc *count*, `disc_number` is left unset
		CanonicalField::DiscNumber => {
			let number = parse_number(&value.first_string().unwrap_or_default())?;
			metadata.insert(SongField::DiscCount, MetadataValue::Number(number));
		},
		_ => unwrap_values(metadata, field, value),
	}

	Ok(())
}

// The year is the first four characters of a date. An empty date is treated as untagged.
fn decode_year(value: &TagValue) -> Result<MetadataValue> {
	let date = value.first_string().unwrap_or_default();
	if date.trim().is_empty() {
		return Ok(MetadataValue::Absent);
	}

	let year = date.chars().take(4).collect::<String>();
	Ok(MetadataValue::Number(parse_number(&year)?))
}

// "3/12" -> (3, 12), "5" -> 5 with no total
fn decode_split_number(
	metadata: &mut SongMetadata,
	value: &TagValue,
	number_field: SongField,
	total_field: SongField,
) -> Result<()> {
	let text = value.first_string().unwrap_or_default();

	let parts = text.split('/').collect::<Vec<_>>();
	if let [number, total] = parts[..] {
		metadata.insert(number_field, MetadataValue::Number(parse_number(number)?));
		metadata.insert(total_field, MetadataValue::Number(parse_number(total)?));
		return Ok(());
	}

	let number = match text.trim().parse() {
		Ok(number) => MetadataValue::Number(number),
		Err(_) => MetadataValue::Text(text),
	};

	metadata.insert(number_field, number);
	Ok(())
}

fn decode_pair(
	metadata: &mut SongMetadata,
	value: &TagValue,
	number_field: SongField,
	total_field: SongField,
) {
	let (number, total) = match value {
		TagValue::NumberPair(pairs) if !pairs.is_empty() => {
			let (number, total) = pairs[0];
			(MetadataValue::Number(number), MetadataValue::Number(total))
		},
		_ => (MetadataValue::Absent, MetadataValue::Absent),
	};

	metadata.insert(number_field, number);
	metadata.insert(total_field, total);
}

fn unwrap_values(metadata: &mut SongMetadata, field: CanonicalField, value: &TagValue) {
	let Some(song_field) = song_field(field) else {
		return;
	};

	let mut values = value.to_strings();
	let value = match values.len() {
		0 => MetadataValue::Absent,
		1 => MetadataValue::Text(values.remove(0)),
		_ => MetadataValue::TextList(values),
	};

	metadata.insert(song_field, value);
}

fn parse_number(text: &str) -> Result<u32> {
	match text.trim().parse() {
		Ok(number) => Ok(number),
		Err(_) => Err(decode_err!("Expected an integer")),
	}
}
