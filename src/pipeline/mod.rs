pub mod command;
pub mod frames;
pub mod particles;
