pub mod decode;
pub mod file;
pub mod permission;
pub mod picker;
pub mod source;
