//! Navigation and role capabilities for the client shell.
//!
//! Capabilities only tell a client which controls to show. Handlers never check them.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub id: &'static str,
    pub label: &'static str,
}

const fn item(id: &'static str, label: &'static str) -> NavItem {
    NavItem { id, label }
}

pub const NAV_ITEMS: [NavItem; 23] = [
    item("dashboard", "Dashboard"),
    item("attendance", "Attendance"),
    item("homework", "Homework"),
    item("students", "Students"),
    item("add-student", "Add Student"),
    item("fees", "Fees"),
    item("messages", "Messages"),
    item("school-calendar", "School Calendar"),
    item("settings", "Settings"),
    item("roles", "User & Role Admin"),
    item("results", "Results"),
    item("timetable", "Timetable"),
    item("exam-schedule", "Exam Schedule"),
    item("birthdays", "Birthdays"),
    item("queries", "Queries"),
    item("lost-found", "Lost & Found"),
    item("feedback", "Feedback"),
    item("my-teachers", "My Teachers"),
    item("subjects-admin", "Subjects"),
    item("circulars", "Circulars"),
    item("transport", "Transport"),
    item("classes", "Classes"),
    item("teachers-master", "Teachers Master"),
];

pub const BOTTOM_NAV_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    ManageTransport,
    MarkAttendance,
    ManageHomework,
    ManageExams,
    EditTimetable,
    UploadCirculars,
    ManageQueries,
    EditCalendar,
    ManageLostFound,
    BrowseBirthdaysByClass,
    ManageFeedback,
    RaiseQueries,
}

const STAFF: &[&str] = &["Teacher", "Principal", "Owner"];
const CLASS_STAFF: &[&str] = &["Teacher", "Class Teacher", "Principal", "Owner"];

impl Capability {
    pub const ALL: [Capability; 12] = [
        Self::ManageTransport,
        Self::MarkAttendance,
        Self::ManageHomework,
        Self::ManageExams,
        Self::EditTimetable,
        Self::UploadCirculars,
        Self::ManageQueries,
        Self::EditCalendar,
        Self::ManageLostFound,
        Self::BrowseBirthdaysByClass,
        Self::ManageFeedback,
        Self::RaiseQueries,
    ];

    fn roles(self) -> &'static [&'static str] {
        match self {
            Self::ManageTransport => &["Transport Manager", "Principal", "Owner"],
            Self::MarkAttendance
            | Self::EditCalendar
            | Self::ManageLostFound
            | Self::BrowseBirthdaysByClass => CLASS_STAFF,
            Self::ManageHomework
            | Self::ManageExams
            | Self::EditTimetable
            | Self::UploadCirculars
            | Self::ManageQueries => STAFF,
            Self::ManageFeedback => &["Principal", "Owner"],
            Self::RaiseQueries => &["Student"],
        }
    }

    pub fn granted_to(self, role: &str) -> bool {
        self.roles().contains(&role.trim())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellNav {
    pub role: String,
    pub nav_items: Vec<NavItem>,
    pub bottom_nav: Vec<NavItem>,
    pub capabilities: Vec<Capability>,
}

pub fn nav(role: &str) -> ShellNav {
    ShellNav {
        role: role.trim().to_string(),
        nav_items: NAV_ITEMS.to_vec(),
        bottom_nav: NAV_ITEMS[..BOTTOM_NAV_LEN].to_vec(),
        capabilities: Capability::ALL
            .into_iter()
            .filter(|c| c.granted_to(role))
            .collect(),
    }
}
