//! Values as they are exchanged with a native tag
//!
//! A [`NativeTag`](crate::container::NativeTag) speaks in [`TagValue`]s, which mirror the
//! shapes the tag families actually store. Conversion between shapes is lenient, so for example
//! an integer written to an ID3v2 text frame is stored as its decimal string.

use std::fmt::{Display, Formatter};

/// A value stored under a native tag key
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TagValue {
	/// One or more strings
	Text(Vec<String>),
	/// A URL, stored in a dedicated link slot where the family has one (`W***` frames)
	Url(String),
	/// One or more integers (Ex. the MP4 `rtng` atom)
	Integer(Vec<i32>),
	/// One or more `(number, total)` pairs (Ex. the MP4 `trkn` and `disk` atoms)
	NumberPair(Vec<(u32, u32)>),
	/// One or more opaque byte strings (Ex. freeform MP4 atoms, pictures)
	Binary(Vec<Vec<u8>>),
}

impl TagValue {
	/// Creates a [`TagValue::Text`] holding a single string
	///
	/// # Examples
	///
	/// ```rust
	/// use songmeta::value::TagValue;
	///
	/// let value = TagValue::text("Foo");
	/// assert_eq!(value, TagValue::Text(vec![String::from("Foo")]));
	/// ```
	pub fn text(value: impl Into<String>) -> Self {
		Self::Text(vec![value.into()])
	}

	/// The number of values held
	pub fn len(&self) -> usize {
		match self {
			TagValue::Text(values) => values.len(),
			TagValue::Url(_) => 1,
			TagValue::Integer(values) => values.len(),
			TagValue::NumberPair(values) => values.len(),
			TagValue::Binary(values) => values.len(),
		}
	}

	/// Whether no values are held
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// The first value, rendered as a string
	///
	/// Binary values are only rendered if they are valid UTF-8.
	///
	/// # Examples
	///
	/// ```rust
	/// use songmeta::value::TagValue;
	///
	/// assert_eq!(TagValue::Integer(vec![4]).first_string().as_deref(), Some("4"));
	/// assert_eq!(TagValue::NumberPair(vec![(3, 12)]).first_string().as_deref(), Some("3/12"));
	/// assert_eq!(TagValue::Binary(vec![vec![0xFF]]).first_string(), None);
	/// ```
	pub fn first_string(&self) -> Option<String> {
		self.to_strings().into_iter().next()
	}

	/// Every value, rendered as a string
	///
	/// Binary values that are not valid UTF-8 are skipped.
	pub fn to_strings(&self) -> Vec<String> {
		match self {
			TagValue::Text(values) => values.clone(),
			TagValue::Url(url) => vec![url.clone()],
			TagValue::Integer(values) => values.iter().map(i32::to_string).collect(),
			TagValue::NumberPair(values) => values
				.iter()
				.map(|(number, total)| format!("{number}/{total}"))
				.collect(),
			TagValue::Binary(values) => values
				.iter()
				.filter_map(|value| String::from_utf8(value.clone()).ok())
				.collect(),
		}
	}

	/// Every value, as raw bytes
	///
	/// Strings are returned as their UTF-8 encoding.
	pub fn to_bytes(&self) -> Vec<Vec<u8>> {
		match self {
			TagValue::Binary(values) => values.clone(),
			_ => self
				.to_strings()
				.into_iter()
				.map(String::into_bytes)
				.collect(),
		}
	}
}

impl From<String> for TagValue {
	fn from(input: String) -> Self {
		Self::Text(vec![input])
	}
}

impl From<&str> for TagValue {
	fn from(input: &str) -> Self {
		Self::text(input)
	}
}

impl From<Vec<String>> for TagValue {
	fn from(input: Vec<String>) -> Self {
		Self::Text(input)
	}
}

impl Display for TagValue {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			TagValue::Binary(values) => {
				let total = values.iter().map(Vec::len).sum::<usize>();
				write!(f, "<{} binary value(s), {total} bytes>", values.len())
			},
			_ => f.write_str(&self.to_strings().join("; ")),
		}
	}
}
