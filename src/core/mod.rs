/*!
# Core Module

Core functionality shared by every stage of a recommendation run:
error taxonomy and file system helpers.
*/

pub mod errors;
pub mod fs_utils;

pub use errors::{ResysError, ResysResult};
pub use fs_utils::{generate_uid, read_text_file, unique_file_name};
