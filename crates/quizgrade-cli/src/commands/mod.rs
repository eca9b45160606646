pub mod grade;
pub mod init;
pub mod render;
pub mod types;
pub mod validate;
