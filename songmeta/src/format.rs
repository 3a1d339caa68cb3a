//! Audio formats and the tag families that store their metadata

use crate::error::{ErrorKind, MetadataError, Result};

use std::ffi::OsStr;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// The audio formats songmeta can embed metadata into
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AudioFormat {
	/// MPEG Layer III, tagged with ID3v2
	Mp3,
	/// MPEG-4 audio, tagged with an `ilst` atom
	M4a,
	/// FLAC, tagged with Vorbis comments and picture blocks
	Flac,
	/// OGG Vorbis, tagged with Vorbis comments
	Ogg,
	/// OGG Opus, tagged with Vorbis comments
	Opus,
}

impl AudioFormat {
	/// All supported formats
	pub const ALL: [AudioFormat; 5] = [
		AudioFormat::Mp3,
		AudioFormat::M4a,
		AudioFormat::Flac,
		AudioFormat::Ogg,
		AudioFormat::Opus,
	];

	/// Attempts to match an extension to an `AudioFormat`
	///
	/// The extension is matched case-insensitively and must not include the leading dot.
	///
	/// # Examples
	///
	/// ```rust
	/// use songmeta::format::AudioFormat;
	///
	/// assert_eq!(AudioFormat::from_ext("opus"), Some(AudioFormat::Opus));
	/// assert_eq!(AudioFormat::from_ext("M4A"), Some(AudioFormat::M4a));
	/// assert_eq!(AudioFormat::from_ext("wav"), None);
	/// ```
	pub fn from_ext<E>(ext: E) -> Option<Self>
	where
		E: AsRef<OsStr>,
	{
		let ext = ext.as_ref().to_str()?.to_ascii_lowercase();

		match ext.as_str() {
			"mp3" => Some(Self::Mp3),
			"m4a" => Some(Self::M4a),
			"flac" => Some(Self::Flac),
			"ogg" => Some(Self::Ogg),
			"opus" => Some(Self::Opus),
			_ => None,
		}
	}

	/// Resolves the format of a file from its path
	///
	/// # Errors
	///
	/// The path has no extension, or the extension is not one of the supported formats
	///
	/// # Examples
	///
	/// ```rust
	/// use songmeta::format::AudioFormat;
	///
	/// # fn main() -> songmeta::error::Result<()> {
	/// let format = AudioFormat::from_path("Artist - Title.flac")?;
	/// assert_eq!(format, AudioFormat::Flac);
	///
	/// assert!(AudioFormat::from_path("Artist - Title.wav").is_err());
	/// # Ok(()) }
	/// ```
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let ext = path.extension().unwrap_or_default();

		Self::from_ext(ext).ok_or_else(|| {
			MetadataError::new(ErrorKind::UnsupportedFormat(
				ext.to_string_lossy().into_owned(),
			))
			.with_path(path)
		})
	}

	/// The tag family used to store metadata in this format
	pub fn family(self) -> TagFamily {
		match self {
			AudioFormat::Mp3 => TagFamily::Id3v2,
			AudioFormat::M4a => TagFamily::Mp4,
			AudioFormat::Flac | AudioFormat::Ogg | AudioFormat::Opus => TagFamily::Vorbis,
		}
	}

	/// The canonical file extension, without a leading dot
	pub fn ext(self) -> &'static str {
		match self {
			AudioFormat::Mp3 => "mp3",
			AudioFormat::M4a => "m4a",
			AudioFormat::Flac => "flac",
			AudioFormat::Ogg => "ogg",
			AudioFormat::Opus => "opus",
		}
	}
}

impl Display for AudioFormat {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.ext())
	}
}

/// The tag representations backing the supported formats
///
/// Each family has its own key table, see [`native_key`](crate::mapping::native_key).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TagFamily {
	/// ID3v2 frames (MP3)
	Id3v2,
	/// MP4 `ilst` atoms (M4A)
	Mp4,
	/// Vorbis comments (FLAC, OGG, Opus)
	Vorbis,
}
