#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use songmeta::container::NativeTag;
use songmeta::format::AudioFormat;
use songmeta::read::read_tags;

fuzz_target!(|data: &[u8]| {
	for format in AudioFormat::ALL {
		if let Ok(tag) = NativeTag::read_from(&mut Cursor::new(data), format) {
			let _ = read_tags(&tag, format);
		}
	}
});
