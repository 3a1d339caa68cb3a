use crate::util::{MemoryContainer, song};

use songmeta::container::Container;
use songmeta::error::ErrorKind;
use songmeta::field::SongField;
use songmeta::format::AudioFormat;
use songmeta::read::{MetadataValue, read_tags};
use songmeta::song::Song;
use songmeta::value::TagValue;
use songmeta::write::write_metadata;

fn written(format: AudioFormat, song: &Song) -> MemoryContainer {
	let mut container = MemoryContainer::new(format);
	write_metadata(&mut container, song).unwrap();
	container
}

#[test_log::test]
fn mp3_round_trip() {
	let container = written(AudioFormat::Mp3, &song());
	let metadata = read_tags(container.tag(), AudioFormat::Mp3).unwrap().unwrap();

	assert_eq!(metadata.name(), Some("Foo title"));
	assert_eq!(
		metadata.artists(),
		Some(&[String::from("Bar artist"), String::from("Baz artist")][..])
	);
	assert_eq!(metadata.artist(), Some("Bar artist"));
	assert_eq!(metadata.album_name(), Some("Qux album"));
	assert_eq!(metadata.album_artist(), Some("Bar artist"));
	assert_eq!(metadata.year(), Some(2021));
	assert_eq!(metadata.date(), Some("2021-05-01"));
	assert_eq!(metadata.track_number(), Some(3));
	assert_eq!(metadata.tracks_count(), Some(12));
	assert_eq!(metadata.disc_number(), Some(1));
	assert_eq!(metadata.disc_count(), Some(2));
	assert_eq!(metadata.publisher(), Some("Quux records"));
	assert_eq!(metadata.url(), Some("https://example.com/track/foo"));
	assert_eq!(metadata.copyright_text(), Some("2021 Quux records"));
	assert_eq!(metadata.lyrics(), Some("Foo bar\nBaz qux"));

	// ID3v2 has no explicit flag
	assert_eq!(metadata.explicit(), None);
}

#[test_log::test]
fn mp4_round_trip() {
	let container = written(AudioFormat::M4a, &song());
	let metadata = read_tags(container.tag(), AudioFormat::M4a).unwrap().unwrap();

	assert_eq!(metadata.name(), Some("Foo title"));
	assert_eq!(metadata.artist(), Some("Bar artist"));
	assert_eq!(metadata.genres().map(<[String]>::len), Some(2));
	assert_eq!(metadata.year(), Some(2021));
	assert_eq!(metadata.track_number(), Some(3));
	assert_eq!(metadata.tracks_count(), Some(12));
	assert_eq!(metadata.disc_number(), Some(1));
	assert_eq!(metadata.disc_count(), Some(2));
	assert_eq!(metadata.url(), Some("https://example.com/track/foo"));
	assert_eq!(metadata.explicit(), Some(true));

	let mut clean = song();
	clean.explicit = false;

	let container = written(AudioFormat::M4a, &clean);
	let metadata = read_tags(container.tag(), AudioFormat::M4a).unwrap().unwrap();
	assert_eq!(metadata.explicit(), Some(false));
}

#[test_log::test]
fn vorbis_round_trip() {
	for format in [AudioFormat::Flac, AudioFormat::Ogg, AudioFormat::Opus] {
		let container = written(format, &song());
		let metadata = read_tags(container.tag(), format).unwrap().unwrap();

		assert_eq!(metadata.name(), Some("Foo title"));
		assert_eq!(metadata.artist(), Some("Bar artist"));
		assert_eq!(metadata.year(), Some(2021));
		assert_eq!(metadata.date(), Some("2021-05-01"));
		assert_eq!(metadata.track_number(), Some(3));
		assert_eq!(metadata.url(), Some("https://example.com/track/foo"));
		assert_eq!(metadata.lyrics(), Some("Foo bar\nBaz qux"));

		// The disc number is read back as the disc count
		assert_eq!(metadata.disc_count(), Some(1));
		assert_eq!(metadata.disc_number(), None);
		assert!(!metadata.contains(SongField::DiscNumber));

		assert_eq!(metadata.tracks_count(), None);
		assert_eq!(metadata.explicit(), None);
	}
}

#[test_log::test]
fn absent_optional_fields() {
	let song = Song {
		name: String::from("Foo title"),
		artists: vec![String::from("Bar artist")],
		artist: String::from("Bar artist"),
		date: String::from("2021"),
		..Song::default()
	};

	let container = written(AudioFormat::Flac, &song);
	let metadata = read_tags(container.tag(), AudioFormat::Flac).unwrap().unwrap();

	assert_eq!(metadata.get(SongField::AlbumName), Some(&MetadataValue::Absent));
	assert_eq!(metadata.get(SongField::Genres), Some(&MetadataValue::Absent));
	assert_eq!(metadata.get(SongField::Lyrics), Some(&MetadataValue::Absent));
	assert_eq!(metadata.get(SongField::CopyrightText), Some(&MetadataValue::Absent));
	assert_eq!(metadata.year(), Some(2021));
}

#[test_log::test]
fn apply_round_trip() {
	let original = song();
	let container = written(AudioFormat::Mp3, &original);
	let metadata = read_tags(container.tag(), AudioFormat::Mp3).unwrap().unwrap();

	let mut song = Song::default();
	metadata.apply_to(&mut song);

	assert_eq!(song.name, original.name);
	assert_eq!(song.artists, original.artists);
	assert_eq!(song.artist, original.artist);
	assert_eq!(song.album_name, original.album_name);
	assert_eq!(song.genres, original.genres);
	assert_eq!(song.track_number, original.track_number);
	assert_eq!(song.tracks_count, original.tracks_count);
	assert_eq!(song.disc_number, original.disc_number);
	assert_eq!(song.disc_count, original.disc_count);
	assert_eq!(song.year, original.year);
	assert_eq!(song.date, original.date);
	assert_eq!(song.url, original.url);
	assert_eq!(song.lyrics, original.lyrics);

	// Never read back
	assert_eq!(song.download_url, None);
	assert_eq!(song.cover_url, None);
}

#[test_log::test]
fn empty_tags() {
	for format in AudioFormat::ALL {
		let container = MemoryContainer::new(format);
		assert_eq!(read_tags(container.tag(), format).unwrap(), None);
	}
}

#[test_log::test]
fn no_artist() {
	let mut container = MemoryContainer::new(AudioFormat::M4a);
	container.set("\u{a9}nam", TagValue::text("Foo title")).unwrap();

	let err = read_tags(container.tag(), AudioFormat::M4a).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::MissingArtist));
}

#[test_log::test]
fn vorbis_original_date_wins() {
	let mut container = MemoryContainer::new(AudioFormat::Ogg);
	container.set("artist", TagValue::text("Bar artist")).unwrap();
	container.set("year", TagValue::text("1999")).unwrap();
	container.set("originaldate", TagValue::text("2021-05-01")).unwrap();

	let metadata = read_tags(container.tag(), AudioFormat::Ogg).unwrap().unwrap();
	assert_eq!(metadata.year(), Some(2021));
}
