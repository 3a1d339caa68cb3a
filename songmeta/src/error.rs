//! Contains the errors that can arise within songmeta
//!
//! The primary error is [`MetadataError`]. The type of error is determined by [`ErrorKind`].

use std::fmt::{Debug, Display, Formatter};
use std::path::{Path, PathBuf};

use lofty::error::LoftyError;

/// Alias for `Result<T, MetadataError>`
pub type Result<T> = std::result::Result<T, MetadataError>;

/// The types of errors that can occur
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
	/// The file extension does not belong to any supported format
	UnsupportedFormat(String),
	/// A read was requested on a path that does not exist
	FileNotFound,
	/// The tag library was unable to load the container
	///
	/// Nothing has been written when this is returned.
	Unrecognized(LoftyError),
	/// A readable file must carry at least one artist entry
	MissingArtist,
	/// A stored value could not be decoded into its canonical form
	Decode(&'static str),

	// Conversions for external errors
	/// Errors that arise from the tag library while reading or writing tags
	Lofty(LoftyError),
	/// Represents all cases of [`std::io::Error`].
	Io(std::io::Error),
}

/// Errors that could occur within songmeta
pub struct MetadataError {
	pub(crate) kind: ErrorKind,
	pub(crate) path: Option<PathBuf>,
	pub(crate) context: Option<String>,
}

impl MetadataError {
	/// Create a `MetadataError` from an [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use songmeta::error::{ErrorKind, MetadataError};
	///
	/// let missing_artist = MetadataError::new(ErrorKind::MissingArtist);
	/// ```
	#[must_use]
	pub const fn new(kind: ErrorKind) -> Self {
		Self {
			kind,
			path: None,
			context: None,
		}
	}

	/// Attach the path of the file the error relates to
	#[must_use]
	pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
		self.path = Some(path.as_ref().to_path_buf());
		self
	}

	/// Attach a short description of what was being attempted
	#[must_use]
	pub fn with_context(mut self, context: impl Into<String>) -> Self {
		self.context = Some(context.into());
		self
	}

	/// Returns the [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use songmeta::error::{ErrorKind, MetadataError};
	///
	/// let not_found = MetadataError::new(ErrorKind::FileNotFound);
	/// if let ErrorKind::FileNotFound = not_found.kind() {
	/// 	println!("Where did the file go?");
	/// }
	/// ```
	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}

	/// Returns the path of the offending file, if known
	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}

	/// Returns the context string, if one was attached
	pub fn context(&self) -> Option<&str> {
		self.context.as_deref()
	}
}

impl std::error::Error for MetadataError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self.kind {
			ErrorKind::Unrecognized(ref err) | ErrorKind::Lofty(ref err) => Some(err),
			ErrorKind::Io(ref err) => Some(err),
			_ => None,
		}
	}
}

impl Debug for MetadataError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.path {
			Some(ref path) => write!(f, "{:?} ({})", self.kind, path.display()),
			None => write!(f, "{:?}", self.kind),
		}
	}
}

impl From<LoftyError> for MetadataError {
	fn from(input: LoftyError) -> Self {
		Self::new(ErrorKind::Lofty(input))
	}
}

impl From<std::io::Error> for MetadataError {
	fn from(input: std::io::Error) -> Self {
		Self::new(ErrorKind::Io(input))
	}
}

impl Display for MetadataError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		if let Some(ref context) = self.context {
			write!(f, "{context}: ")?;
		}

		match self.kind {
			// Conversions
			ErrorKind::Lofty(ref err) => write!(f, "{err}")?,
			ErrorKind::Io(ref err) => write!(f, "{err}")?,

			ErrorKind::UnsupportedFormat(ref extension) if extension.is_empty() => {
				write!(f, "File has no extension to determine a format from")?
			},
			ErrorKind::UnsupportedFormat(ref extension) => {
				write!(f, "Unsupported file format \"{extension}\"")?
			},
			ErrorKind::FileNotFound => write!(f, "File not found")?,
			ErrorKind::Unrecognized(ref err) => write!(f, "Unrecognized file format ({err})")?,
			ErrorKind::MissingArtist => write!(f, "File does not contain an artist")?,
			ErrorKind::Decode(message) => write!(f, "Unable to decode value: {message}")?,
		}

		if let Some(ref path) = self.path {
			write!(f, " [{}]", path.display())?;
		}

		Ok(())
	}
}
