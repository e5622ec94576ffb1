mod admin_test;
mod middleware_test;
mod teacher_test;
mod timetable_test;
