pub mod conflict;
pub mod school;
pub mod student;
pub mod timetable;
