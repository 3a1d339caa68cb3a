//! Options for embedding metadata

use std::time::Duration;

use lofty::config::WriteOptions;

/// Options to control how metadata is embedded into a file
///
/// # Examples
///
/// ```rust
/// use songmeta::config::EmbedOptions;
/// use std::time::Duration;
///
/// let options = EmbedOptions::new()
/// 	.embed_cover(true)
/// 	.cover_timeout(Duration::from_secs(5));
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct EmbedOptions {
	pub(crate) embed_cover: bool,
	pub(crate) cover_timeout: Duration,
	pub(crate) write_options: WriteOptions,
}

impl EmbedOptions {
	/// Default cover fetch timeout
	pub const DEFAULT_COVER_TIMEOUT: Duration = Duration::from_secs(10);

	/// Creates a new `EmbedOptions`, alias for `Default` implementation
	///
	/// See also: [`EmbedOptions::default`]
	pub const fn new() -> Self {
		Self {
			embed_cover: false,
			cover_timeout: Self::DEFAULT_COVER_TIMEOUT,
			write_options: WriteOptions::new(),
		}
	}

	/// Whether to fetch and embed the song's cover art
	///
	/// The cover is embedded after every other field, right before the final save. A missing
	/// cover URL, or a failed fetch, is never an error.
	///
	/// # Examples
	///
	/// ```rust
	/// use songmeta::config::EmbedOptions;
	///
	/// let options = EmbedOptions::new().embed_cover(true);
	/// ```
	pub fn embed_cover(mut self, embed_cover: bool) -> Self {
		self.embed_cover = embed_cover;
		self
	}

	/// The upper bound on a single cover fetch
	pub fn cover_timeout(mut self, cover_timeout: Duration) -> Self {
		self.cover_timeout = cover_timeout;
		self
	}

	/// The [`WriteOptions`] used for every save
	///
	/// # Examples
	///
	/// ```rust
	/// use lofty::config::WriteOptions;
	/// use songmeta::config::EmbedOptions;
	///
	/// // No padding under any circumstances
	/// let options = EmbedOptions::new().write_options(WriteOptions::new().preferred_padding(0));
	/// ```
	pub fn write_options(mut self, write_options: WriteOptions) -> Self {
		self.write_options = write_options;
		self
	}
}

impl Default for EmbedOptions {
	/// The default implementation for `EmbedOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// EmbedOptions {
	/// 	embed_cover: false,
	/// 	cover_timeout: Duration::from_secs(10),
	/// 	write_options: WriteOptions::default(),
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}
