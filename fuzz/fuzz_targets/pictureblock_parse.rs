#![no_main]

use libfuzzer_sys::fuzz_target;
use songmeta::cover::PictureBlock;

fuzz_target!(|data: &[u8]| {
	if let Ok(block) = PictureBlock::parse(data) {
		let _ = block.to_base64();
	}
});
