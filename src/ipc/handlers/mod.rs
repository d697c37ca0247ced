pub mod attendance;
pub mod backup;
pub mod birthdays;
pub mod calendar;
pub mod circulars;
pub mod core;
pub mod exams;
pub mod feedback;
pub mod homework;
pub mod lost_found;
pub mod masters;
pub mod queries;
pub mod reports;
pub mod results;
pub mod settings;
pub mod shell;
pub mod timetable;
pub mod transport;
pub mod users;
