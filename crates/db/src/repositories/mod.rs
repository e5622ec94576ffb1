pub mod assignment;
pub mod entry;
pub mod profile;
pub mod scheme;
pub mod school;
pub mod student;
