//! Static mappings between canonical fields and native tag keys
//!
//! Every tag family stores a [`CanonicalField`] under its own key:
//!
//! | Field         | ID3v2       | MP4                | Vorbis        |
//! |---------------|-------------|--------------------|---------------|
//! | `title`       | `TIT2`      | `©nam`             | `title`       |
//! | `artist`      | `TPE1`      | `©ART`             | `artist`      |
//! | `tracknumber` | `TRCK`      | `trkn`             | `tracknumber` |
//! | `lyrics`      | `USLT::XXX` | `©lyr`             | `lyrics`      |
//! | `woas`        | `WOAS`      | `----:spotdl:WOAS` | `woas`        |
//!
//! ID3v2 keys of the form `FRAME::LNG` address a language-bound frame (`COMM`/`USLT`) with an
//! empty description. MP4 keys are four characters, where `©` is the byte `0xA9`, or a freeform
//! `----:mean:name` identifier.

use crate::field::{CanonicalField, SongField};
use crate::format::TagFamily;

use std::collections::HashMap;
use std::sync::OnceLock;

// This is used to create the canonical field -> native key maps
//
// First comes the name of the map.
// Ex:
//
// ID3V2_MAP;
//
// This is followed by the key value pairs separated by `=>`, with the key being the
// format-specific key and the value being the CanonicalField variant(s) stored under it.
// Ex. "TDRC" => Date | Year
macro_rules! gen_map {
	(
		$(#[$meta:meta])?
		$NAME:ident;

		$(
			$key:literal => $($field:ident)|+
		),+ $(,)?
	) => {
		$(#[$meta])?
		#[allow(non_camel_case_types)]
		struct $NAME;

		impl $NAME {
			fn get_key(&self, field: CanonicalField) -> Option<&'static str> {
				static INSTANCE: OnceLock<HashMap<CanonicalField, &'static str>> = OnceLock::new();
				INSTANCE.get_or_init(|| {
					let mut map = HashMap::new();
					$(
						$(
							map.insert(CanonicalField::$field, $key);
						)+
					)+
					map
				}).get(&field).copied()
			}
		}
	}
}

gen_map!(
	ID3V2_MAP;

	"TALB"      => Album,
	"TPE1"      => Artist,
	"TDRC"      => Date | Year,
	"TIT2"      => Title,
	"TDOR"      => OriginalDate,
	"COMM::XXX" => Comment,
	"TIT1"      => Group,
	"TEXT"      => Writer,
	"TCON"      => Genre,
	"TRCK"      => TrackNumber,
	"TPE2"      => AlbumArtist,
	"TPOS"      => DiscNumber,
	"TCMP"      => Compilation,
	"APIC"      => AlbumArt,
	"TENC"      => EncodedBy,
	"TCOP"      => Copyright,
	"TBPM"      => Tempo,
	"USLT::XXX" => Lyrics,
	"WOAS"      => Woas,
	// Placeholder, ID3v2 has no explicit flag. No frame is ever stored under this ID.
	"NULL"      => Explicit,
);

gen_map!(
	ILST_MAP;

	"©alb"             => Album,
	"©ART"             => Artist,
	"©day"             => Date | Year,
	"©nam"             => Title,
	"purd"             => OriginalDate,
	"©cmt"             => Comment,
	"©grp"             => Group,
	"©wrt"             => Writer,
	"©gen"             => Genre,
	"trkn"             => TrackNumber,
	"aART"             => AlbumArtist,
	"disk"             => DiscNumber,
	"cpil"             => Compilation,
	"covr"             => AlbumArt,
	"©too"             => EncodedBy,
	"cprt"             => Copyright,
	"tmpo"             => Tempo,
	"©lyr"             => Lyrics,
	"rtng"             => Explicit,
	"----:spotdl:WOAS" => Woas,
);

gen_map!(
	VORBIS_MAP;

	"album"        => Album,
	"artist"       => Artist,
	"date"         => Date,
	"title"        => Title,
	"year"         => Year,
	"originaldate" => OriginalDate,
	"comment"      => Comment,
	"group"        => Group,
	"writer"       => Writer,
	"genre"        => Genre,
	"tracknumber"  => TrackNumber,
	"albumartist"  => AlbumArtist,
	"discnumber"   => DiscNumber,
	"cpil"         => Compilation,
	"albumart"     => AlbumArt,
	"encodedby"    => EncodedBy,
	"copyright"    => Copyright,
	"tempo"        => Tempo,
	"lyrics"       => Lyrics,
	"woas"         => Woas,
);

/// Maps a canonical field to the key it is stored under in a tag family
///
/// This will return `None` if the family has no slot for the field.
///
/// # Examples
///
/// ```rust
/// use songmeta::field::CanonicalField;
/// use songmeta::format::TagFamily;
/// use songmeta::mapping::native_key;
///
/// assert_eq!(native_key(TagFamily::Id3v2, CanonicalField::Title), Some("TIT2"));
/// assert_eq!(native_key(TagFamily::Mp4, CanonicalField::Title), Some("©nam"));
/// assert_eq!(native_key(TagFamily::Vorbis, CanonicalField::Title), Some("title"));
///
/// // Vorbis comments have no explicit flag
/// assert_eq!(native_key(TagFamily::Vorbis, CanonicalField::Explicit), None);
/// ```
pub fn native_key(family: TagFamily, field: CanonicalField) -> Option<&'static str> {
	match family {
		TagFamily::Id3v2 => ID3V2_MAP.get_key(field),
		TagFamily::Mp4 => ILST_MAP.get_key(field),
		TagFamily::Vorbis => VORBIS_MAP.get_key(field),
	}
}

/// Maps a canonical field to the [`Song`](crate::song::Song) field it populates
///
/// Fields such as `cpil`, `albumart` and `tempo` have no counterpart, and will return `None`.
///
/// # Examples
///
/// ```rust
/// use songmeta::field::{CanonicalField, SongField};
/// use songmeta::mapping::song_field;
///
/// assert_eq!(song_field(CanonicalField::Title), Some(SongField::Name));
/// assert_eq!(song_field(CanonicalField::Tempo), None);
/// ```
pub fn song_field(field: CanonicalField) -> Option<SongField> {
	match field {
		CanonicalField::Title => Some(SongField::Name),
		CanonicalField::Artist => Some(SongField::Artists),
		CanonicalField::Album => Some(SongField::AlbumName),
		CanonicalField::AlbumArtist => Some(SongField::AlbumArtist),
		CanonicalField::Genre => Some(SongField::Genres),
		CanonicalField::DiscNumber => Some(SongField::DiscNumber),
		CanonicalField::Year => Some(SongField::Year),
		CanonicalField::Date => Some(SongField::Date),
		CanonicalField::TrackNumber => Some(SongField::TrackNumber),
		CanonicalField::EncodedBy => Some(SongField::Publisher),
		CanonicalField::Woas => Some(SongField::Url),
		CanonicalField::Copyright => Some(SongField::CopyrightText),
		CanonicalField::Lyrics => Some(SongField::Lyrics),
		_ => None,
	}
}
