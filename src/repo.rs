//! Typed read/write pairs, one per stored entity kind.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::model::{
    AttendanceBook, CalendarEvent, Circular, ClassRecord, ClassSubjectTeacher, Driver,
    ExamSchedule, FeedbackItem, Homework, LostFoundItem, Query, ResultsBook, Route, Settings,
    Subject, Teacher, Timetables, TransportMappings, User,
};
use crate::store::{KvStore, StoreError};

pub mod keys {
    pub const ROLES: &str = "school_roles";
    pub const USERS: &str = "users";
    pub const ASSIGNMENTS: &str = "school_assignments";
    pub const ATTENDANCE: &str = "school_attendance";
    pub const SETTINGS: &str = "school_settings";
    pub const CALENDAR: &str = "school_calendar_events";
    pub const EXAM_SCHEDULES: &str = "exam_schedules_v1";
    pub const CIRCULARS: &str = "school_circulars";
    pub const DRIVERS: &str = "school_transport_drivers";
    pub const ROUTES: &str = "school_transport_routes";
    pub const TRANSPORT_MAPPINGS: &str = "school_transport_mappings";
    pub const TIMETABLES: &str = "timetables";
    pub const SUBJECTS: &str = "iq_subjects_v1";
    pub const CLASSES: &str = "iq_classes_v1";
    pub const TEACHERS: &str = "iq_teachers_v1";
    pub const CLASS_SUBJECT_TEACHER: &str = "iq_class_subject_teacher_v1";
    pub const LOST_FOUND: &str = "iq_lost_found_v1";
    pub const FEEDBACK: &str = "iq_feedback_v1";
    pub const QUERIES: &str = "school_queries";
    pub const RESULTS: &str = "school_results_v1";
}

pub fn default_roles() -> Vec<String> {
    [
        "Student",
        "Teacher",
        "Class Teacher",
        "Principal",
        "Trustee",
        "Owner",
    ]
    .iter()
    .map(|r| r.to_string())
    .collect()
}

#[derive(Clone, Copy)]
pub struct Repos<'a> {
    store: &'a KvStore,
}

impl<'a> Repos<'a> {
    pub fn new(store: &'a KvStore) -> Self {
        Self { store }
    }

    /// Writes `value` unless the key currently holds something that does not decode as
    /// `T`, which the matching `read_x` would have replaced with its fallback.
    fn put<T, V>(&self, key: &str, value: &V) -> Result<(), StoreError>
    where
        T: DeserializeOwned,
        V: Serialize + ?Sized,
    {
        self.store.check_decodes::<T>(key)?;
        self.store.write(key, value)
    }

    pub fn read_roles(&self) -> Vec<String> {
        self.store.read(keys::ROLES, default_roles())
    }

    pub fn write_roles(&self, roles: &[String]) -> Result<(), StoreError> {
        self.put::<Vec<String>, _>(keys::ROLES, roles)
    }

    pub fn read_users(&self) -> Vec<User> {
        self.store.read_or_default(keys::USERS)
    }

    pub fn write_users(&self, users: &[User]) -> Result<(), StoreError> {
        self.put::<Vec<User>, _>(keys::USERS, users)
    }

    pub fn read_students(&self) -> Vec<User> {
        self.read_users()
            .into_iter()
            .filter(User::is_student)
            .collect()
    }

    pub fn read_assignments(&self) -> Vec<Homework> {
        self.store.read_or_default(keys::ASSIGNMENTS)
    }

    pub fn write_assignments(&self, list: &[Homework]) -> Result<(), StoreError> {
        self.put::<Vec<Homework>, _>(keys::ASSIGNMENTS, list)
    }

    pub fn read_attendance(&self) -> AttendanceBook {
        self.store.read_or_default(keys::ATTENDANCE)
    }

    pub fn write_attendance(&self, book: &AttendanceBook) -> Result<(), StoreError> {
        self.put::<AttendanceBook, _>(keys::ATTENDANCE, book)
    }

    pub fn read_settings(&self) -> Settings {
        self.store.read_or_default(keys::SETTINGS)
    }

    pub fn write_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        self.put::<Settings, _>(keys::SETTINGS, settings)
    }

    pub fn read_calendar_events(&self) -> Vec<CalendarEvent> {
        self.store.read_or_default(keys::CALENDAR)
    }

    pub fn write_calendar_events(&self, events: &[CalendarEvent]) -> Result<(), StoreError> {
        self.put::<Vec<CalendarEvent>, _>(keys::CALENDAR, events)
    }

    pub fn read_exam_schedules(&self) -> Vec<ExamSchedule> {
        self.store.read_or_default(keys::EXAM_SCHEDULES)
    }

    pub fn write_exam_schedules(&self, list: &[ExamSchedule]) -> Result<(), StoreError> {
        self.put::<Vec<ExamSchedule>, _>(keys::EXAM_SCHEDULES, list)
    }

    pub fn read_circulars(&self) -> Vec<Circular> {
        self.store.read_or_default(keys::CIRCULARS)
    }

    pub fn write_circulars(&self, list: &[Circular]) -> Result<(), StoreError> {
        self.put::<Vec<Circular>, _>(keys::CIRCULARS, list)
    }

    pub fn read_drivers(&self) -> Vec<Driver> {
        self.store.read_or_default(keys::DRIVERS)
    }

    pub fn write_drivers(&self, drivers: &[Driver]) -> Result<(), StoreError> {
        self.put::<Vec<Driver>, _>(keys::DRIVERS, drivers)
    }

    pub fn read_routes(&self) -> Vec<Route> {
        self.store.read_or_default(keys::ROUTES)
    }

    pub fn write_routes(&self, routes: &[Route]) -> Result<(), StoreError> {
        self.put::<Vec<Route>, _>(keys::ROUTES, routes)
    }

    pub fn read_transport_mappings(&self) -> TransportMappings {
        self.store.read_or_default(keys::TRANSPORT_MAPPINGS)
    }

    pub fn write_transport_mappings(&self, m: &TransportMappings) -> Result<(), StoreError> {
        self.put::<TransportMappings, _>(keys::TRANSPORT_MAPPINGS, m)
    }

    pub fn read_timetables(&self) -> Timetables {
        self.store.read_or_default(keys::TIMETABLES)
    }

    pub fn write_timetables(&self, t: &Timetables) -> Result<(), StoreError> {
        self.put::<Timetables, _>(keys::TIMETABLES, t)
    }

    pub fn read_subjects(&self) -> Vec<Subject> {
        self.store.read_or_default(keys::SUBJECTS)
    }

    pub fn write_subjects(&self, list: &[Subject]) -> Result<(), StoreError> {
        self.put::<Vec<Subject>, _>(keys::SUBJECTS, list)
    }

    pub fn read_classes(&self) -> Vec<ClassRecord> {
        self.store.read_or_default(keys::CLASSES)
    }

    pub fn write_classes(&self, list: &[ClassRecord]) -> Result<(), StoreError> {
        self.put::<Vec<ClassRecord>, _>(keys::CLASSES, list)
    }

    pub fn read_teachers(&self) -> Vec<Teacher> {
        self.store.read_or_default(keys::TEACHERS)
    }

    pub fn write_teachers(&self, list: &[Teacher]) -> Result<(), StoreError> {
        self.put::<Vec<Teacher>, _>(keys::TEACHERS, list)
    }

    pub fn read_class_subject_teacher(&self) -> Vec<ClassSubjectTeacher> {
        self.store.read_or_default(keys::CLASS_SUBJECT_TEACHER)
    }

    pub fn write_class_subject_teacher(
        &self,
        list: &[ClassSubjectTeacher],
    ) -> Result<(), StoreError> {
        self.put::<Vec<ClassSubjectTeacher>, _>(keys::CLASS_SUBJECT_TEACHER, list)
    }

    pub fn read_lost_found(&self) -> Vec<LostFoundItem> {
        self.store.read_or_default(keys::LOST_FOUND)
    }

    pub fn write_lost_found(&self, items: &[LostFoundItem]) -> Result<(), StoreError> {
        self.put::<Vec<LostFoundItem>, _>(keys::LOST_FOUND, items)
    }

    pub fn read_feedback(&self) -> Vec<FeedbackItem> {
        self.store.read_or_default(keys::FEEDBACK)
    }

    pub fn write_feedback(&self, items: &[FeedbackItem]) -> Result<(), StoreError> {
        self.put::<Vec<FeedbackItem>, _>(keys::FEEDBACK, items)
    }

    pub fn read_queries(&self) -> Vec<Query> {
        self.store.read_or_default(keys::QUERIES)
    }

    pub fn write_queries(&self, items: &[Query]) -> Result<(), StoreError> {
        self.put::<Vec<Query>, _>(keys::QUERIES, items)
    }

    pub fn read_results(&self) -> ResultsBook {
        self.store.read_or_default(keys::RESULTS)
    }

    pub fn write_results(&self, book: &ResultsBook) -> Result<(), StoreError> {
        self.put::<ResultsBook, _>(keys::RESULTS, book)
    }
}
