pub mod options;
pub mod reply;
pub mod template;
pub mod transcript;
