//! The song record supplied by callers

/// The known metadata of a song
///
/// This is a plain record. The writer takes every field as-is, so callers are expected to fill
/// in defaults for fields that are always written (artists, album artist, name, date, publisher).
///
/// # Examples
///
/// ```rust
/// use songmeta::song::Song;
///
/// let song = Song {
/// 	name: String::from("Song"),
/// 	artists: vec![String::from("Artist"), String::from("Featured")],
/// 	artist: String::from("Artist"),
/// 	track_number: 3,
/// 	tracks_count: 12,
/// 	..Song::default()
/// };
///
/// assert_eq!(song.display_name(), "Artist, Featured - Song");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Song {
	/// Track title
	pub name: String,
	/// All track artists, the main artist first
	pub artists: Vec<String>,
	/// The main artist, written as the album artist
	pub artist: String,
	/// Album title
	pub album_name: Option<String>,
	/// Album artist
	pub album_artist: Option<String>,
	/// Genres
	pub genres: Vec<String>,
	/// Disc number
	pub disc_number: u32,
	/// Number of discs in the release
	pub disc_count: u32,
	/// Track number
	pub track_number: u32,
	/// Number of tracks on the disc
	pub tracks_count: u32,
	/// Release year
	pub year: Option<u32>,
	/// Release date, `YYYY`, `YYYY-MM` or `YYYY-MM-DD`
	pub date: String,
	/// Publisher, written as "encoded by"
	pub publisher: String,
	/// Song URL
	pub url: String,
	/// Copyright message
	pub copyright_text: Option<String>,
	/// Lyrics
	pub lyrics: Option<String>,
	/// Where the audio was downloaded from, written as a comment
	pub download_url: Option<String>,
	/// Cover art URL
	pub cover_url: Option<String>,
	/// Whether the song has explicit content
	pub explicit: bool,
}

impl Song {
	/// `"{artists} - {name}"`, with the artists comma separated
	pub fn display_name(&self) -> String {
		format!("{} - {}", self.artists.join(", "), self.name)
	}
}
