//! Writing song metadata into a container
//!
//! Every format receives the same base set of fields, followed by a few format specific
//! encodings:
//!
//! * FLAC, OGG, Opus: the track and disc numbers are zero padded to the width of their totals,
//!   so disc 2 of 10 is stored as `"02"`
//! * M4A: the track and disc numbers are `(number, total)` pairs, and the explicit flag is stored
//!   in `rtng` as `4` (explicit) or `2` (clean)
//! * MP3: the track and disc numbers are `"number/total"` strings. The source URL, lyrics and
//!   download source comment are added in a second phase, after the container has been saved
//!   and reloaded once.

use crate::config::EmbedOptions;
use crate::container::{AudioContainer, Container};
use crate::cover::{CoverFetcher, embed_cover};
use crate::error::Result;
use crate::field::CanonicalField;
use crate::format::{AudioFormat, TagFamily};
use crate::mapping::native_key;
use crate::song::Song;
use crate::value::TagValue;

use std::path::Path;

// `rtng` values
const EXPLICIT_RATING: i32 = 4;
const CLEAN_RATING: i32 = 2;

/// Writes a song's metadata into a container, and saves it
///
/// This is [`write_metadata_with`] using the default [`EmbedOptions`], which never embeds a cover.
///
/// # Errors
///
/// * Setting a field failed, see [`NativeTag::set`](crate::container::NativeTag::set)
/// * Saving or reloading the container failed
pub fn write_metadata<C>(container: &mut C, song: &Song) -> Result<()>
where
	C: Container + ?Sized,
{
	write_metadata_with(container, song, EmbedOptions::default(), None)
}

/// Writes a song's metadata into a container, and saves it
///
/// The following fields are always written, even if they are empty:
///
/// * artists
/// * album artist (from [`Song::artist`])
/// * title
/// * date, and original date (both from [`Song::date`])
/// * encoded by (from [`Song::publisher`])
///
/// The album, genres, copyright, lyrics and download source are only written if present.
///
/// If [`EmbedOptions::embed_cover`] is set and a `fetcher` is provided, the cover is embedded
/// right before the final save. Cover failures are never propagated.
///
/// MP3 containers are saved twice, see the [module docs](self).
///
/// # Errors
///
/// * Setting a field failed, see [`NativeTag::set`](crate::container::NativeTag::set)
/// * Saving or reloading the container failed
///
/// # Examples
///
/// ```rust,no_run
/// use songmeta::config::EmbedOptions;
/// use songmeta::container::AudioContainer;
/// use songmeta::cover::HttpCoverFetcher;
/// use songmeta::song::Song;
/// use songmeta::write::write_metadata_with;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let song = Song {
/// 	name: String::from("Title"),
/// 	artists: vec![String::from("Artist")],
/// 	artist: String::from("Artist"),
/// 	cover_url: Some(String::from("https://example.com/cover.jpg")),
/// 	..Song::default()
/// };
///
/// let mut container = AudioContainer::open("Artist - Title.opus")?;
/// let fetcher = HttpCoverFetcher::new()?;
///
/// write_metadata_with(
/// 	&mut container,
/// 	&song,
/// 	EmbedOptions::new().embed_cover(true),
/// 	Some(&fetcher),
/// )?;
/// # Ok(()) }
/// ```
pub fn write_metadata_with<C>(
	container: &mut C,
	song: &Song,
	options: EmbedOptions,
	fetcher: Option<&dyn CoverFetcher>,
) -> Result<()>
where
	C: Container + ?Sized,
{
	let format = container.format();
	log::debug!("Writing {format} metadata for \"{}\"", song.display_name());

	// Always present
	set_field(container, CanonicalField::Artist, TagValue::Text(song.artists.clone()))?;
	set_field(container, CanonicalField::AlbumArtist, TagValue::text(&*song.artist))?;
	set_field(container, CanonicalField::Title, TagValue::text(&*song.name))?;
	set_field(container, CanonicalField::Date, TagValue::text(&*song.date))?;
	set_field(container, CanonicalField::OriginalDate, TagValue::text(&*song.date))?;
	set_field(container, CanonicalField::EncodedBy, TagValue::text(&*song.publisher))?;

	// Only present sometimes
	if let Some(album_name) = non_empty(song.album_name.as_deref()) {
		set_field(container, CanonicalField::Album, TagValue::text(album_name))?;
	}

	if !song.genres.is_empty() {
		set_field(container, CanonicalField::Genre, TagValue::Text(song.genres.clone()))?;
	}

	if let Some(copyright) = non_empty(song.copyright_text.as_deref()) {
		set_field(container, CanonicalField::Copyright, TagValue::text(copyright))?;
	}

	// MP3 gets these in the second phase
	if format != AudioFormat::Mp3 {
		if let Some(lyrics) = non_empty(song.lyrics.as_deref()) {
			set_field(container, CanonicalField::Lyrics, TagValue::text(lyrics))?;
		}

		if let Some(download_url) = non_empty(song.download_url.as_deref()) {
			set_field(container, CanonicalField::Comment, TagValue::text(download_url))?;
		}
	}

	match format.family() {
		TagFamily::Vorbis => {
			let disc_number = zero_pad(song.disc_number, song.disc_count);
			let track_number = zero_pad(song.track_number, song.tracks_count);

			set_field(container, CanonicalField::DiscNumber, TagValue::from(disc_number))?;
			set_field(container, CanonicalField::TrackNumber, TagValue::from(track_number))?;
			set_field(container, CanonicalField::Woas, TagValue::text(&*song.url))?;
		},
		TagFamily::Mp4 => {
			let rating = if song.explicit { EXPLICIT_RATING } else { CLEAN_RATING };

			set_field(
				container,
				CanonicalField::DiscNumber,
				TagValue::NumberPair(vec![(song.disc_number, song.disc_count)]),
			)?;
			set_field(
				container,
				CanonicalField::TrackNumber,
				TagValue::NumberPair(vec![(song.track_number, song.tracks_count)]),
			)?;
			set_field(container, CanonicalField::Explicit, TagValue::Integer(vec![rating]))?;
			set_field(
				container,
				CanonicalField::Woas,
				TagValue::Binary(vec![song.url.clone().into_bytes()]),
			)?;
		},
		TagFamily::Id3v2 => {
			// TRCK/TPOS, the frames the "tracknumber"/"discnumber" easy keys resolve to
			let track_number = format!("{}/{}", song.track_number, song.tracks_count);
			let disc_number = format!("{}/{}", song.disc_number, song.disc_count);

			set_field(container, CanonicalField::TrackNumber, TagValue::from(track_number))?;
			set_field(container, CanonicalField::DiscNumber, TagValue::from(disc_number))?;
		},
	}

	if format == AudioFormat::Mp3 {
		write_mp3_frames(container, song)?;
	}

	if options.embed_cover {
		match fetcher {
			Some(fetcher) => {
				embed_cover(
					container,
					song.cover_url.as_deref(),
					fetcher,
					options.cover_timeout,
				);
			},
			None => log::warn!("Cover embedding requested without a fetcher, skipping cover"),
		}
	}

	container.save()
}

/// Writes a song's metadata into the file at `path`
///
/// The format is resolved from the file extension. Covers are fetched over HTTP when
/// [`EmbedOptions::embed_cover`] is set and the `http` feature is enabled.
///
/// # Errors
///
/// * The extension does not belong to a supported format
/// * The file could not be loaded ([`ErrorKind::Unrecognized`](crate::error::ErrorKind::Unrecognized)),
///   in which case nothing has been written
/// * See [`write_metadata_with`]
///
/// # Examples
///
/// ```rust,no_run
/// use songmeta::config::EmbedOptions;
/// use songmeta::embed_metadata;
/// use songmeta::song::Song;
///
/// # fn main() -> songmeta::error::Result<()> {
/// let song = Song {
/// 	name: String::from("Title"),
/// 	artists: vec![String::from("Artist")],
/// 	artist: String::from("Artist"),
/// 	date: String::from("2021-05-01"),
/// 	track_number: 3,
/// 	tracks_count: 12,
/// 	..Song::default()
/// };
///
/// embed_metadata("Artist - Title.mp3", &song, EmbedOptions::default())?;
/// # Ok(()) }
/// ```
pub fn embed_metadata(path: impl AsRef<Path>, song: &Song, options: EmbedOptions) -> Result<()> {
	let path = path.as_ref();
	let format = AudioFormat::from_path(path)?;

	let mut container = AudioContainer::open_as(path, format)
		.map_err(|e| match song.url.as_str() {
			"" => e,
			url => e.with_context(format!("Unable to load file from {url}")),
		})?
		.with_write_options(options.write_options);

	let fetcher = options.embed_cover.then(default_fetcher).flatten();
	write_metadata_with(&mut container, song, options, fetcher.as_deref())
}

#[cfg(feature = "http")]
fn default_fetcher() -> Option<Box<dyn CoverFetcher>> {
	match crate::cover::HttpCoverFetcher::new() {
		Ok(fetcher) => Some(Box::new(fetcher)),
		Err(e) => {
			log::warn!("Unable to create an HTTP client, skipping cover: {e}");
			None
		},
	}
}

#[cfg(not(feature = "http"))]
fn default_fetcher() -> Option<Box<dyn CoverFetcher>> {
	log::warn!("Built without the `http` feature, skipping cover");
	None
}

// The second phase of an MP3 write
//
// The container is persisted and reloaded before the source URL, lyrics and comment frames are
// added.
fn write_mp3_frames<C>(container: &mut C, song: &Song) -> Result<()>
where
	C: Container + ?Sized,
{
	log::debug!("MP3: Saving base frames");
	container.save()?;
	container.reload()?;

	log::debug!("MP3: Adding link, lyrics and comment frames");
	set_field(container, CanonicalField::Woas, TagValue::Url(song.url.clone()))?;

	if let Some(lyrics) = non_empty(song.lyrics.as_deref()) {
		set_field(container, CanonicalField::Lyrics, TagValue::text(lyrics))?;
	}

	if let Some(download_url) = non_empty(song.download_url.as_deref()) {
		set_field(container, CanonicalField::Comment, TagValue::text(download_url))?;
	}

	Ok(())
}

fn set_field<C>(container: &mut C, field: CanonicalField, value: TagValue) -> Result<()>
where
	C: Container + ?Sized,
{
	let family = container.format().family();
	let Some(key) = native_key(family, field) else {
		log::warn!("No {family:?} key for `{field}`, dropping value");
		return Ok(());
	};

	container.set(key, value)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
	value.filter(|value| !value.is_empty())
}

/// Zero pads `number` to the number of digits in `total`
///
/// # Examples
///
/// ```rust
/// use songmeta::write::zero_pad;
///
/// assert_eq!(zero_pad(3, 12), "03");
/// assert_eq!(zero_pad(3, 120), "003");
/// assert_eq!(zero_pad(12, 9), "12");
/// ```
pub fn zero_pad(number: u32, total: u32) -> String {
	let width = total.to_string().len();
	format!("{number:0width$}")
}
