use crate::util::{
	FLAC_AUDIO, JPEG, fetch_jpeg, flac_bytes, flac_bytes_with_audio, m4a_bytes, mp3_bytes, opus_bytes,
	song, write_file,
};

use songmeta::config::EmbedOptions;
use songmeta::container::{AudioContainer, Container, NativeTag};
use songmeta::error::ErrorKind;
use songmeta::format::AudioFormat;
use songmeta::value::TagValue;
use songmeta::write::write_metadata_with;
use songmeta::{embed_metadata, read_metadata};

use lofty::ogg::OggPictureStorage;

#[test_log::test]
fn mp3_file() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_file(dir.path(), "Bar artist - Foo title.mp3", &mp3_bytes());

	assert_eq!(read_metadata(&path).unwrap(), None);

	embed_metadata(&path, &song(), EmbedOptions::default()).unwrap();

	let metadata = read_metadata(&path).unwrap().unwrap();
	assert_eq!(metadata.name(), Some("Foo title"));
	assert_eq!(metadata.artist(), Some("Bar artist"));
	assert_eq!(metadata.year(), Some(2021));
	assert_eq!(metadata.track_number(), Some(3));
	assert_eq!(metadata.tracks_count(), Some(12));
	assert_eq!(metadata.url(), Some("https://example.com/track/foo"));
	assert_eq!(metadata.lyrics(), Some("Foo bar\nBaz qux"));

	let container = AudioContainer::open(&path).unwrap();
	assert_eq!(
		container.get("COMM::XXX"),
		Some(TagValue::text("https://example.com/watch?v=foo"))
	);
}

#[test_log::test]
fn mp3_file_rewrite() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_file(dir.path(), "Bar artist - Foo title.mp3", &mp3_bytes());

	embed_metadata(&path, &song(), EmbedOptions::default()).unwrap();

	let mut song = song();
	song.name = String::from("Foo title (Remix)");
	song.lyrics = Some(String::from("Qux"));
	embed_metadata(&path, &song, EmbedOptions::default()).unwrap();

	let container = AudioContainer::open(&path).unwrap();
	assert_eq!(container.get("TIT2"), Some(TagValue::text("Foo title (Remix)")));
	// Replaced, not appended
	assert_eq!(container.get("USLT::XXX"), Some(TagValue::text("Qux")));
}

#[test_log::test]
fn flac_file() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_file(dir.path(), "Bar artist - Foo title.flac", &flac_bytes());

	assert_eq!(read_metadata(&path).unwrap(), None);

	let mut container = AudioContainer::open(&path).unwrap();
	write_metadata_with(
		&mut container,
		&song(),
		EmbedOptions::new().embed_cover(true),
		Some(&fetch_jpeg),
	)
	.unwrap();

	let metadata = read_metadata(&path).unwrap().unwrap();
	assert_eq!(metadata.name(), Some("Foo title"));
	assert_eq!(metadata.genres().map(<[String]>::len), Some(2));
	assert_eq!(metadata.track_number(), Some(3));
	assert_eq!(metadata.disc_count(), Some(1));
	assert_eq!(metadata.year(), Some(2021));

	let container = AudioContainer::open(&path).unwrap();
	assert_eq!(container.get("tracknumber"), Some(TagValue::text("03")));

	let NativeTag::Vorbis(comments) = container.into_tag() else {
		panic!("Expected Vorbis comments");
	};
	assert_eq!(comments.pictures().len(), 1);
	assert_eq!(comments.pictures()[0].0.data(), JPEG);
}

#[test_log::test]
fn flac_file_with_audio() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_file(
		dir.path(),
		"Bar artist - Foo title.flac",
		&flac_bytes_with_audio(),
	);

	embed_metadata(&path, &song(), EmbedOptions::default()).unwrap();

	let content = std::fs::read(&path).unwrap();
	assert!(content.starts_with(b"fLaC"));
	assert!(content.ends_with(FLAC_AUDIO));
	// STREAMINFO is untouched
	assert_eq!(&content[8..42], &flac_bytes()[8..42]);

	let metadata = read_metadata(&path).unwrap().unwrap();
	assert_eq!(metadata.name(), Some("Foo title"));
	assert_eq!(metadata.artist(), Some("Bar artist"));

	// Writing again reuses the existing blocks
	embed_metadata(&path, &song(), EmbedOptions::default()).unwrap();
	assert!(std::fs::read(&path).unwrap().ends_with(FLAC_AUDIO));
	assert_eq!(read_metadata(&path).unwrap().unwrap().name(), Some("Foo title"));
}

#[test_log::test]
fn m4a_file() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_file(dir.path(), "Bar artist - Foo title.m4a", &m4a_bytes());

	assert_eq!(read_metadata(&path).unwrap(), None);

	embed_metadata(&path, &song(), EmbedOptions::default()).unwrap();

	let metadata = read_metadata(&path).unwrap().unwrap();
	assert_eq!(metadata.name(), Some("Foo title"));
	assert_eq!(metadata.artist(), Some("Bar artist"));
	assert_eq!(metadata.year(), Some(2021));
	assert_eq!(metadata.track_number(), Some(3));
	assert_eq!(metadata.tracks_count(), Some(12));
	assert_eq!(metadata.disc_number(), Some(1));
	assert_eq!(metadata.disc_count(), Some(2));
	assert_eq!(metadata.url(), Some("https://example.com/track/foo"));
	assert_eq!(metadata.explicit(), Some(true));
}

#[test_log::test]
fn opus_file() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_file(dir.path(), "Bar artist - Foo title.opus", &opus_bytes());

	assert_eq!(read_metadata(&path).unwrap(), None);

	let mut container = AudioContainer::open(&path).unwrap();
	assert_eq!(container.format(), AudioFormat::Opus);
	write_metadata_with(
		&mut container,
		&song(),
		EmbedOptions::new().embed_cover(true),
		Some(&fetch_jpeg),
	)
	.unwrap();

	let metadata = read_metadata(&path).unwrap().unwrap();
	assert_eq!(metadata.name(), Some("Foo title"));
	assert_eq!(metadata.artist(), Some("Bar artist"));
	assert_eq!(metadata.year(), Some(2021));
	assert_eq!(metadata.track_number(), Some(3));
	assert_eq!(metadata.disc_count(), Some(1));
	assert_eq!(metadata.url(), Some("https://example.com/track/foo"));

	// The picture comment is decoded into a picture on load
	let NativeTag::Vorbis(comments) = AudioContainer::open(&path).unwrap().into_tag() else {
		panic!("Expected Vorbis comments");
	};
	assert_eq!(comments.pictures().len(), 1);
	assert_eq!(comments.pictures()[0].0.data(), JPEG);
}

#[test_log::test]
fn unreadable_file() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("Bar artist - Foo title.flac");
	std::fs::create_dir(&path).unwrap();

	let err = read_metadata(&path).unwrap_err();
	assert!(!matches!(err.kind(), ErrorKind::Unrecognized(_)));
	assert!(matches!(err.kind(), ErrorKind::Io(_) | ErrorKind::Lofty(_)));
	assert_eq!(err.path(), Some(path.as_path()));
}

#[test_log::test]
fn missing_file() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("missing.flac");

	let err = read_metadata(&path).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::FileNotFound));
	assert_eq!(err.path(), Some(path.as_path()));
}

#[test_log::test]
fn unsupported_extension() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_file(dir.path(), "Bar artist - Foo title.wav", b"RIFF");

	let err = read_metadata(&path).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::UnsupportedFormat(ext) if ext == "wav"));

	let err = embed_metadata(&path, &song(), EmbedOptions::default()).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::UnsupportedFormat(_)));
}

#[test_log::test]
fn unrecognized_file() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_file(dir.path(), "Bar artist - Foo title.flac", b"not a flac file");

	assert_eq!(read_metadata(&path).unwrap(), None);

	let err = embed_metadata(&path, &song(), EmbedOptions::default()).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::Unrecognized(_)));
	assert_eq!(
		err.context(),
		Some("Unable to load file from https://example.com/track/foo")
	);

	// Nothing was written
	assert_eq!(std::fs::read(&path).unwrap(), b"not a flac file");
}

#[test_log::test]
fn format_from_extension() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_file(dir.path(), "Bar artist - Foo title.FLAC", &flac_bytes());

	let container = AudioContainer::open(&path).unwrap();
	assert_eq!(container.format(), AudioFormat::Flac);
	assert!(container.tag().is_empty());
}
