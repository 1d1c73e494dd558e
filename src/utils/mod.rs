pub mod hash;
pub mod path;

pub use hash::{digest_md5, digest_sha1};
pub use path::{check_static_path, format_path};
