pub mod unpacker;

pub use unpacker::{is_zip_archive, ArchiveUnpacker};
