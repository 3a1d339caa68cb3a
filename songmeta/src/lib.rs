//! Embed and extract song metadata in MP3, M4A, FLAC, OGG and Opus files.
//!
//! A [`Song`](song::Song) record is mapped onto the native tag of each format, and back:
//!
//! | Format           | Tag              |
//! |------------------|------------------|
//! | MP3              | ID3v2            |
//! | M4A              | MP4 `ilst` atoms |
//! | FLAC, OGG, Opus  | Vorbis comments  |
//!
//! The mapping between canonical fields and native keys lives in [`mapping`], and the
//! format-specific encodings in [`write`] and [`read`].
//!
//! # Examples
//!
//! ## Writing
//!
//! ```rust,no_run
//! # fn main() -> songmeta::error::Result<()> {
//! use songmeta::config::EmbedOptions;
//! use songmeta::embed_metadata;
//! use songmeta::song::Song;
//!
//! let song = Song {
//! 	name: String::from("Title"),
//! 	artists: vec![String::from("Artist"), String::from("Featured")],
//! 	artist: String::from("Artist"),
//! 	date: String::from("2021-05-01"),
//! 	track_number: 3,
//! 	tracks_count: 12,
//! 	disc_number: 1,
//! 	disc_count: 1,
//! 	url: String::from("https://example.com/track/1"),
//! 	cover_url: Some(String::from("https://example.com/cover.jpg")),
//! 	..Song::default()
//! };
//!
//! // The cover is fetched over HTTP, a failed fetch leaves the file without one
//! embed_metadata("Artist - Title.flac", &song, EmbedOptions::new().embed_cover(true))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Reading
//!
//! ```rust,no_run
//! # fn main() -> songmeta::error::Result<()> {
//! use songmeta::read_metadata;
//!
//! match read_metadata("Artist - Title.mp3")? {
//! 	Some(metadata) => {
//! 		println!("Artist: {:?}", metadata.artist());
//! 		println!("Track: {:?}/{:?}", metadata.track_number(), metadata.tracks_count());
//! 	},
//! 	None => println!("No tags"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Using a custom container
//!
//! The writer and reader only see a [`Container`](container::Container), so tags can be built up
//! without touching the filesystem:
//!
//! ```rust
//! # fn main() -> songmeta::error::Result<()> {
//! use songmeta::container::{Container, NativeTag};
//! use songmeta::format::AudioFormat;
//! use songmeta::read::read_tags;
//! use songmeta::song::Song;
//! use songmeta::write::write_metadata;
//!
//! struct InMemory {
//! 	saved: NativeTag,
//! 	tag: NativeTag,
//! }
//!
//! impl Container for InMemory {
//! 	fn format(&self) -> AudioFormat {
//! 		AudioFormat::Opus
//! 	}
//!
//! 	fn tag(&self) -> &NativeTag {
//! 		&self.tag
//! 	}
//!
//! 	fn tag_mut(&mut self) -> &mut NativeTag {
//! 		&mut self.tag
//! 	}
//!
//! 	fn save(&mut self) -> songmeta::error::Result<()> {
//! 		self.saved = self.tag.clone();
//! 		Ok(())
//! 	}
//!
//! 	fn reload(&mut self) -> songmeta::error::Result<()> {
//! 		self.tag = self.saved.clone();
//! 		Ok(())
//! 	}
//! }
//!
//! let family = AudioFormat::Opus.family();
//! let mut container = InMemory {
//! 	saved: NativeTag::new(family),
//! 	tag: NativeTag::new(family),
//! };
//!
//! let song = Song {
//! 	name: String::from("Title"),
//! 	artists: vec![String::from("Artist")],
//! 	artist: String::from("Artist"),
//! 	track_number: 3,
//! 	tracks_count: 12,
//! 	..Song::default()
//! };
//!
//! write_metadata(&mut container, &song)?;
//!
//! let metadata = read_tags(container.tag(), AudioFormat::Opus)?.unwrap();
//! assert_eq!(metadata.name(), Some("Title"));
//! assert_eq!(metadata.track_number(), Some(3));
//! # Ok(())
//! # }
//! ```
//!
//! # Format-specific notes
//!
//! * MP3 files are saved twice per write. The source URL, lyrics and comment frames are only added
//!   after the first save.
//! * Vorbis comments (FLAC, OGG, Opus) have no explicit flag, and their disc number is read back
//!   as the *disc count*.
//! * Only M4A files carry the explicit flag.
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod config;
pub mod container;
pub mod cover;
pub mod error;
pub mod field;
pub(crate) mod flac;
pub mod format;
pub(crate) mod macros;
pub mod mapping;
pub mod read;
pub mod song;
pub mod value;
pub mod write;

pub use crate::read::read_metadata;
pub use crate::write::embed_metadata;
