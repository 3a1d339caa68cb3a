//! Format-independent field identifiers

use std::fmt::{Display, Formatter};
use std::str::FromStr;

// Generates a field enum along with its string names
//
// The order of the variants is the iteration order of `ALL`. The reader walks
// canonical fields in this order, so later fields may overwrite values decoded
// by earlier ones (Ex. "originaldate" overwriting "year" in Vorbis comments).
macro_rules! gen_fields {
	(
		$(#[$meta:meta])*
		pub enum $NAME:ident {
			$(
				$(#[$variant_meta:meta])*
				$variant:ident => $name:literal
			),+ $(,)?
		}
	) => {
		$(#[$meta])*
		#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
		pub enum $NAME {
			$(
				$(#[$variant_meta])*
				$variant,
			)+
		}

		impl $NAME {
			/// Every variant, in declaration order
			pub const ALL: &'static [$NAME] = &[$($NAME::$variant,)+];

			/// The field's name
			pub fn as_str(self) -> &'static str {
				match self {
					$($NAME::$variant => $name,)+
				}
			}
		}

		impl FromStr for $NAME {
			type Err = ();

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				match s {
					$($name => Ok($NAME::$variant),)+
					_ => Err(()),
				}
			}
		}

		impl Display for $NAME {
			fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
				f.write_str(self.as_str())
			}
		}
	};
}

gen_fields! {
	/// A canonical metadata field
	///
	/// The set of fields is shared by every tag family, although not every field
	/// is meaningful in every family. The name of a field doubles as its Vorbis comment key.
	pub enum CanonicalField {
		/// Album title
		Album => "album",
		/// Track artist(s)
		Artist => "artist",
		/// Release date
		Date => "date",
		/// Track title
		Title => "title",
		/// Release year, shares storage with [`CanonicalField::Date`] where the format has no year slot
		Year => "year",
		/// Original release date
		OriginalDate => "originaldate",
		/// Comment, used for the download source
		Comment => "comment",
		/// Content group
		Group => "group",
		/// Composer
		Writer => "writer",
		/// Genre(s)
		Genre => "genre",
		/// Track number
		TrackNumber => "tracknumber",
		/// Album artist
		AlbumArtist => "albumartist",
		/// Disc number
		DiscNumber => "discnumber",
		/// Compilation flag
		Compilation => "cpil",
		/// Cover art
		AlbumArt => "albumart",
		/// Encoded by, used for the publisher
		EncodedBy => "encodedby",
		/// Copyright message
		Copyright => "copyright",
		/// Beats per minute
		Tempo => "tempo",
		/// Unsynchronized lyrics
		Lyrics => "lyrics",
		/// Explicit content flag
		Explicit => "explicit",
		/// Official audio source URL
		Woas => "woas",
	}
}

gen_fields! {
	/// A field of a [`Song`](crate::song::Song) record
	///
	/// These are the keys of a [`SongMetadata`](crate::read::SongMetadata).
	pub enum SongField {
		/// Track title
		Name => "name",
		/// All track artists
		Artists => "artists",
		/// The main artist
		Artist => "artist",
		/// Album title
		AlbumName => "album_name",
		/// Album artist
		AlbumArtist => "album_artist",
		/// Genres
		Genres => "genres",
		/// Disc number
		DiscNumber => "disc_number",
		/// Number of discs in the release
		DiscCount => "disc_count",
		/// Release year
		Year => "year",
		/// Release date
		Date => "date",
		/// Track number
		TrackNumber => "track_number",
		/// Number of tracks on the disc
		TracksCount => "tracks_count",
		/// Publisher
		Publisher => "publisher",
		/// Song URL
		Url => "url",
		/// Copyright message
		CopyrightText => "copyright_text",
		/// Lyrics
		Lyrics => "lyrics",
		/// Explicit content flag
		Explicit => "explicit",
	}
}
