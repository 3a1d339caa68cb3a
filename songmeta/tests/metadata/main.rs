#![allow(missing_docs)]

mod files;
mod read;
pub(crate) mod util;
