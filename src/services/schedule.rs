use chrono::{Datelike, Timelike, Weekday};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db;
use crate::models::SessionListItem;
use crate::models::session::parse_time_of_day;

const DAY_NAMES: [&str; 7] = ["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];
const PLACEHOLDER: &str = "TBD";

/// What the student dashboard shows for one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextSessionView {
    pub session_id: String,
    pub course_id: String,
    pub day_of_week: i64,
    pub day: String,
    pub time: String,
    pub start_time: String,
    pub end_time: String,
    pub room: String,
    pub course: String,
    pub level: String,
    pub instructor: String,
}

impl From<&SessionListItem> for NextSessionView {
    fn from(item: &SessionListItem) -> Self {
        let session = &item.session;
        let start_time = format_time_12h(&session.start_time);
        let end_time = format_time_12h(&session.end_time);

        Self {
            session_id: session.id.clone(),
            course_id: session.course_id.clone(),
            day_of_week: session.day_of_week,
            day: day_name(session.day_of_week).to_string(),
            time: format!("{} - {}", start_time, end_time),
            start_time,
            end_time,
            room: non_blank(session.room.as_deref()).unwrap_or(PLACEHOLDER).to_string(),
            course: non_blank(item.course_name.as_deref()).unwrap_or("No course").to_string(),
            level: non_blank(item.course_level.as_deref()).unwrap_or_default().to_string(),
            instructor: non_blank(item.instructor_name.as_deref()).unwrap_or(PLACEHOLDER).to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekdayGroup<T> {
    pub day_of_week: i64,
    pub day: String,
    pub sessions: Vec<T>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Raw 0..=6 index, 0 = Sunday.
pub fn day_name(day_of_week: i64) -> &'static str {
    usize::try_from(day_of_week)
        .ok()
        .and_then(|i| DAY_NAMES.get(i))
        .copied()
        .unwrap_or("Unknown")
}

/// `14:00` -> `2:00 PM`. Unparseable input comes back unchanged.
pub fn format_time_12h(raw: &str) -> String {
    match parse_time_of_day(raw) {
        Some(time) => {
            let (pm, hour) = time.hour12();
            format!("{}:{:02} {}", hour, time.minute(), if pm { "PM" } else { "AM" })
        }
        None => raw.to_string(),
    }
}

/// Monday = 1 .. Sunday = 7.
fn week_position(day_of_week: i64) -> i64 {
    if day_of_week == 0 { 7 } else { day_of_week }
}

/// Picks the session to surface as "next".
///
/// Sessions are ordered Monday first with Sunday last, then by start time.
/// The first one falling on today or later in the week wins; when the whole
/// week has passed the earliest session of next week is returned. Only the
/// weekday is compared, so a session earlier today still counts as next.
///
/// Today is numbered the same way, Sunday = 7. On a Sunday only Sunday
/// sessions qualify before the wrap. Comparing against a Sunday = 0 day
/// index would instead let every session match and always return the
/// head of the week.
pub fn resolve_next_session<'a>(sessions: &'a [SessionListItem], today: Weekday) -> Option<&'a SessionListItem> {
    let today = i64::from(today.number_from_monday());

    let mut ordered: Vec<&SessionListItem> = sessions.iter().collect();
    ordered.sort_by_cached_key(|item| {
        let session = &item.session;
        (
            week_position(session.day_of_week),
            parse_time_of_day(&session.start_time),
            session.start_time.clone(),
            session.id.clone(),
        )
    });

    ordered
        .iter()
        .find(|item| week_position(item.session.day_of_week) >= today)
        .or_else(|| ordered.first())
        .copied()
}

/// Buckets sessions by weekday, Sunday first, preserving input order inside
/// each day. Days without sessions are left out.
pub fn group_by_weekday<T, F>(items: Vec<T>, day_of: F) -> Vec<WeekdayGroup<T>>
where
    F: Fn(&T) -> i64,
{
    let mut groups: Vec<WeekdayGroup<T>> = (0..7)
        .map(|day| WeekdayGroup { day_of_week: day, day: day_name(day).to_string(), sessions: Vec::new() })
        .collect();

    for item in items {
        let day = day_of(&item);
        if let Some(group) = usize::try_from(day).ok().and_then(|i| groups.get_mut(i)) {
            group.sessions.push(item);
        }
    }

    groups.retain(|g| !g.sessions.is_empty());
    groups
}

/// Resolves the student's next session from the database. A student without
/// active enrollments has none.
pub async fn next_session_for_student(
    db: &SqlitePool,
    student_id: &str,
    today: Weekday,
) -> Result<Option<NextSessionView>, sqlx::Error> {
    let sessions = db::sessions::recurring_sessions_for_student(db, student_id).await?;
    Ok(resolve_next_session(&sessions, today).map(NextSessionView::from))
}

/// The student's recurring week, display-formatted and grouped by day.
pub async fn weekly_schedule_for_student(
    db: &SqlitePool,
    student_id: &str,
) -> Result<Vec<WeekdayGroup<NextSessionView>>, sqlx::Error> {
    let sessions = db::sessions::recurring_sessions_for_student(db, student_id).await?;
    let views = sessions.iter().map(NextSessionView::from).collect();
    Ok(group_by_weekday(views, |v: &NextSessionView| v.day_of_week))
}

/// Today's weekday in the server's local time zone.
pub fn local_today() -> Weekday {
    chrono::Local::now().weekday()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Session;

    fn item(id: &str, day: i64, start: &str, end: &str) -> SessionListItem {
        SessionListItem {
            session: Session {
                id: id.to_string(),
                course_id: "course-1".to_string(),
                instructor_id: None,
                day_of_week: day,
                start_time: start.to_string(),
                end_time: end.to_string(),
                room: Some("Lab 2".to_string()),
                max_capacity: 20,
                current_attendance: 0,
                is_recurring: true,
                start_date: None,
                end_date: None,
                created_at: "2025-01-01T00:00:00Z".to_string(),
            },
            course_name: Some("Robotics".to_string()),
            course_level: Some("Beginner".to_string()),
            instructor_name: Some("Sara".to_string()),
        }
    }

    fn pick<'a>(sessions: &'a [SessionListItem], today: Weekday) -> Option<&'a str> {
        resolve_next_session(sessions, today).map(|s| s.session.id.as_str())
    }

    #[test]
    fn no_sessions_means_no_next_session() {
        assert_eq!(pick(&[], Weekday::Wed), None);
    }

    #[test]
    fn single_session_later_this_week_is_chosen() {
        let sessions = vec![item("thu", 4, "14:00", "15:00")];
        assert_eq!(pick(&sessions, Weekday::Tue), Some("thu"));
    }

    #[test]
    fn passed_session_wraps_to_next_week() {
        let sessions = vec![item("mon", 1, "10:00", "11:00")];
        assert_eq!(pick(&sessions, Weekday::Fri), Some("mon"));
    }

    #[test]
    fn wednesday_picks_thursday_over_monday() {
        let sessions = vec![item("mon", 1, "10:00", "11:00"), item("thu", 4, "14:00", "15:00")];
        assert_eq!(pick(&sessions, Weekday::Wed), Some("thu"));
    }

    #[test]
    fn wednesday_wraps_when_monday_and_tuesday_have_passed() {
        let sessions = vec![item("tue", 2, "10:00", "11:00"), item("mon", 1, "10:00", "11:00")];
        assert_eq!(pick(&sessions, Weekday::Wed), Some("mon"));
    }

    #[test]
    fn earlier_start_wins_on_the_same_day() {
        let sessions = vec![item("late", 4, "16:00", "17:00"), item("early", 4, "09:30", "10:30")];
        assert_eq!(pick(&sessions, Weekday::Thu), Some("early"));
    }

    #[test]
    fn start_times_compare_as_times_not_strings() {
        let sessions = vec![item("ten", 3, "10:00", "11:00"), item("nine", 3, "9:00", "9:45")];
        assert_eq!(pick(&sessions, Weekday::Wed), Some("nine"));
    }

    #[test]
    fn sunday_counts_as_the_end_of_the_week() {
        let sessions = vec![item("sun", 0, "10:00", "11:00"), item("wed", 3, "10:00", "11:00")];
        assert_eq!(pick(&sessions, Weekday::Mon), Some("wed"));
        assert_eq!(pick(&sessions, Weekday::Sat), Some("sun"));
        assert_eq!(pick(&sessions, Weekday::Sun), Some("sun"));
    }

    #[test]
    fn on_sunday_without_sunday_sessions_wraps_to_monday() {
        let sessions = vec![item("fri", 5, "10:00", "11:00"), item("mon", 1, "10:00", "11:00")];
        assert_eq!(pick(&sessions, Weekday::Sun), Some("mon"));
    }

    #[test]
    fn exactly_one_session_is_selected_for_every_day() {
        let sessions = vec![
            item("a", 0, "10:00", "11:00"),
            item("b", 2, "10:00", "11:00"),
            item("c", 2, "08:00", "09:00"),
            item("d", 6, "12:00", "13:00"),
        ];
        for today in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ] {
            assert!(pick(&sessions, today).is_some());
        }
    }

    #[test]
    fn missing_room_and_instructor_render_as_tbd() {
        let mut session = item("x", 2, "14:00", "15:30");
        session.session.room = None;
        session.instructor_name = Some("  ".to_string());
        session.course_name = None;
        session.course_level = None;

        let view = NextSessionView::from(&session);
        assert_eq!(view.room, "TBD");
        assert_eq!(view.instructor, "TBD");
        assert_eq!(view.course, "No course");
        assert_eq!(view.level, "");
        assert_eq!(view.day, "Tuesday");
        assert_eq!(view.time, "2:00 PM - 3:30 PM");
    }

    #[test]
    fn twelve_hour_formatting() {
        assert_eq!(format_time_12h("00:05"), "12:05 AM");
        assert_eq!(format_time_12h("12:00:00"), "12:00 PM");
        assert_eq!(format_time_12h("09:30"), "9:30 AM");
        assert_eq!(format_time_12h("soon"), "soon");
    }

    #[test]
    fn day_names_use_the_raw_index() {
        assert_eq!(day_name(0), "Sunday");
        assert_eq!(day_name(6), "Saturday");
        assert_eq!(day_name(7), "Unknown");
        assert_eq!(day_name(-1), "Unknown");
    }

    #[test]
    fn grouping_keeps_order_and_skips_empty_days() {
        let groups = group_by_weekday(vec![(3, "b"), (1, "a"), (3, "c")], |(day, _)| *day);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].day, "Monday");
        assert_eq!(groups[1].day, "Wednesday");
        assert_eq!(groups[1].sessions, vec![(3, "b"), (3, "c")]);
    }
}
