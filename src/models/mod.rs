pub mod application;
pub mod attendance;
pub mod course;
pub mod curriculum;
pub mod enrollment;
pub mod filter;
pub mod gallery;
pub mod instructor;
pub mod payment;
pub mod profile;
pub mod program;
pub mod report;
pub mod session;
pub mod setting;
pub mod student;

pub use application::{Application, ApplicationStats, NewApplicationRequest, UpdateApplicationStatusRequest};
pub use attendance::{AttendanceDetail, AttendanceRecord, AttendanceStats, RecordAttendanceRequest};
pub use course::{Course, CourseListItem, CourseStats, NewCourseRequest, UpdateCourseRequest};
pub use curriculum::{CurriculumModule, ModuleWithTopics, NewModuleRequest, UpdateModuleRequest};
pub use enrollment::{CourseEnrollment, NewCourseEnrollmentRequest, ProgramEnrollment, UpdateEnrollmentRequest};
pub use filter::ListFilter;
pub use gallery::{GalleryItem, NewGalleryItemRequest, UpdateGalleryItemRequest};
pub use instructor::{Instructor, InstructorListItem, InstructorStats, NewInstructorRequest, UpdateInstructorRequest};
pub use payment::{NewPaymentRequest, Payment, PaymentListItem, PaymentStats, UpdatePaymentRequest};
pub use profile::{NewProfile, Profile, Role};
pub use program::{NewProgramRequest, Program, ProgramDetail, ProgramRef, UpdateProgramRequest};
pub use report::{GenerateReportRequest, Report, ReportTable, ReportType};
pub use session::{NewSessionRequest, Session, SessionListItem, SessionStats, UpdateSessionRequest};
pub use setting::{ContactInfo, Setting, SettingEntry, SettingsMap, UpsertSettingRequest};
pub use student::{NewStudentRequest, StudentListItem, StudentStats, UpdateStudentRequest};

use crate::error::AppError;

/// The same loose check the sign-up form applies: an `@` and a `.`.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') || !email.contains('.') {
        return Err(AppError::BadRequest("Please enter a valid email address".to_string()));
    }
    Ok(())
}
