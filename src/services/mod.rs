pub mod accounts;
pub mod contact;
pub mod dashboard;
pub mod export;
pub mod reports;
pub mod schedule;

pub use accounts::{AccountService, LoginOutcome, LoginRequest, SignUpRequest};
pub use schedule::{NextSessionView, WeekdayGroup};
