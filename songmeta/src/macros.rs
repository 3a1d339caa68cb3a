// Shorthand for return Err(MetadataError::new(ErrorKind::Foo))
//
// Usage:
// - err!(Variant)          -> return Err(MetadataError::new(ErrorKind::Variant))
// - err!(Variant(Message)) -> return Err(MetadataError::new(ErrorKind::Variant(Message)))
macro_rules! err {
	($variant:ident) => {
		return Err(crate::error::MetadataError::new(
			crate::error::ErrorKind::$variant,
		))
	};
	($variant:ident($reason:expr)) => {
		return Err(crate::error::MetadataError::new(
			crate::error::ErrorKind::$variant($reason),
		))
	};
}

// Shorthand for MetadataError::new(ErrorKind::Decode("Message"))
//
// Usage:
//
// - decode_err!(Message)
//
// or bail:
//
// - decode_err!(@BAIL Message)
macro_rules! decode_err {
	($reason:literal) => {
		crate::error::MetadataError::new(crate::error::ErrorKind::Decode($reason))
	};
	(@BAIL $reason:literal) => {
		return Err(decode_err!($reason))
	};
}

pub(crate) use {decode_err, err};
