mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use academy::models::Role;
use common::{TestApp, course_body, spawn_app};

struct Enrolled {
    admin: String,
    student: String,
    student_id: String,
    course_id: String,
}

async fn enrolled_student(app: &TestApp) -> Enrolled {
    let admin = app.admin_token().await;
    let student_id = app.seed_user("laila@example.com", "laila-pass", "Laila", Role::Student).await;
    let student = app.login("laila@example.com", "laila-pass").await;

    let (_, course) = app
        .send("POST", "/api/admin/courses", Some(&admin), Some(course_body("Robotics 101")))
        .await;
    let course_id = course["id"].as_str().unwrap().to_string();
    app.send(
        "POST",
        &format!("/api/admin/courses/{}/enrollments", course_id),
        Some(&admin),
        Some(json!({ "student_id": student_id })),
    )
    .await;

    Enrolled { admin, student, student_id, course_id }
}

async fn add_session(app: &TestApp, admin: &str, course_id: &str, day: i64, start: &str, end: &str) -> Value {
    let (status, session) = app
        .send(
            "POST",
            "/api/admin/sessions",
            Some(admin),
            Some(json!({
                "course_id": course_id,
                "day_of_week": day,
                "start_time": start,
                "end_time": end,
                "room": "Lab 1"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    session
}

#[tokio::test]
async fn next_session_is_empty_without_sessions() {
    let app = spawn_app().await;
    let ctx = enrolled_student(&app).await;

    let (status, next) = app.send("GET", "/api/portal/next-session", Some(&ctx.student), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(next.is_null());
}

#[tokio::test]
async fn a_single_weekly_session_is_always_next() {
    let app = spawn_app().await;
    let ctx = enrolled_student(&app).await;
    add_session(&app, &ctx.admin, &ctx.course_id, 3, "14:00", "15:30").await;

    let (status, next) = app.send("GET", "/api/portal/next-session", Some(&ctx.student), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(next["day"], "Wednesday");
    assert_eq!(next["time"], "2:00 PM - 3:30 PM");
    assert_eq!(next["course"], "Robotics 101");
    assert_eq!(next["room"], "Lab 1");
    assert_eq!(next["instructor"], "TBD");
}

#[tokio::test]
async fn sessions_of_other_courses_are_ignored() {
    let app = spawn_app().await;
    let ctx = enrolled_student(&app).await;
    let (_, other) = app
        .send("POST", "/api/admin/courses", Some(&ctx.admin), Some(course_body("Painting")))
        .await;
    add_session(&app, &ctx.admin, other["id"].as_str().unwrap(), 2, "10:00", "11:00").await;

    let (_, next) = app.send("GET", "/api/portal/next-session", Some(&ctx.student), None).await;
    assert!(next.is_null());
}

#[tokio::test]
async fn finished_or_dropped_enrollments_have_no_schedule() {
    for status in ["completed", "dropped"] {
        let app = spawn_app().await;
        let ctx = enrolled_student(&app).await;
        add_session(&app, &ctx.admin, &ctx.course_id, 2, "10:00", "11:00").await;

        let (_, enrollments) = app
            .send("GET", &format!("/api/admin/courses/{}/enrollments", ctx.course_id), Some(&ctx.admin), None)
            .await;
        let enrollment_id = enrollments[0]["id"].as_str().unwrap().to_string();
        let (code, _) = app
            .send(
                "PATCH",
                &format!("/api/admin/enrollments/{}", enrollment_id),
                Some(&ctx.admin),
                Some(json!({ "status": status })),
            )
            .await;
        assert_eq!(code, StatusCode::OK);

        let (_, next) = app.send("GET", "/api/portal/next-session", Some(&ctx.student), None).await;
        assert!(next.is_null(), "{} enrollment still yields {}", status, next);
        let (_, week) = app.send("GET", "/api/portal/schedule", Some(&ctx.student), None).await;
        assert_eq!(week, json!([]));
    }
}

#[tokio::test]
async fn one_off_sessions_are_left_out_of_the_week() {
    let app = spawn_app().await;
    let ctx = enrolled_student(&app).await;
    let (status, _) = app
        .send(
            "POST",
            "/api/admin/sessions",
            Some(&ctx.admin),
            Some(json!({
                "course_id": ctx.course_id,
                "day_of_week": 4,
                "start_time": "12:00",
                "end_time": "13:00",
                "is_recurring": false
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, next) = app.send("GET", "/api/portal/next-session", Some(&ctx.student), None).await;
    assert!(next.is_null());
    let (_, week) = app.send("GET", "/api/portal/schedule", Some(&ctx.student), None).await;
    assert_eq!(week, json!([]));

    add_session(&app, &ctx.admin, &ctx.course_id, 6, "09:00", "10:00").await;
    let (_, next) = app.send("GET", "/api/portal/next-session", Some(&ctx.student), None).await;
    assert_eq!(next["day"], "Saturday");
}

#[tokio::test]
async fn weekly_schedule_groups_sessions_sunday_first() {
    let app = spawn_app().await;
    let ctx = enrolled_student(&app).await;
    add_session(&app, &ctx.admin, &ctx.course_id, 5, "16:00", "17:00").await;
    add_session(&app, &ctx.admin, &ctx.course_id, 0, "10:00", "11:00").await;
    add_session(&app, &ctx.admin, &ctx.course_id, 5, "09:00", "10:00").await;

    let (status, week) = app.send("GET", "/api/portal/schedule", Some(&ctx.student), None).await;
    assert_eq!(status, StatusCode::OK);
    let days: Vec<&str> = week
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["day"].as_str().unwrap())
        .collect();
    assert_eq!(days, vec!["Sunday", "Friday"]);
    assert_eq!(week[1]["sessions"][0]["start_time"], "9:00 AM");
    assert_eq!(week[1]["sessions"][1]["start_time"], "4:00 PM");
}

#[tokio::test]
async fn attendance_feeds_the_portal_stats() {
    let app = spawn_app().await;
    let ctx = enrolled_student(&app).await;
    let session = add_session(&app, &ctx.admin, &ctx.course_id, 1, "10:00", "11:00").await;
    let session_id = session["id"].as_str().unwrap();

    for (date, status) in [("2025-03-03", "present"), ("2025-03-10", "absent"), ("2025-03-17", "present")] {
        let (code, _) = app
            .send(
                "POST",
                &format!("/api/admin/sessions/{}/attendance", session_id),
                Some(&ctx.admin),
                Some(json!({ "student_id": ctx.student_id, "date": date, "status": status })),
            )
            .await;
        assert_eq!(code, StatusCode::OK);
    }

    // Re-marking a day replaces the earlier mark.
    app.send(
        "POST",
        &format!("/api/admin/sessions/{}/attendance", session_id),
        Some(&ctx.admin),
        Some(json!({ "student_id": ctx.student_id, "date": "2025-03-10", "status": "late" })),
    )
    .await;

    let (status, overview) = app
        .send("GET", "/api/portal/attendance?limit=2", Some(&ctx.student), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overview["stats"]["total"], 3);
    assert_eq!(overview["stats"]["present"], 2);
    assert_eq!(overview["stats"]["late"], 1);
    assert_eq!(overview["stats"]["attendance_rate"], 67);
    assert_eq!(overview["recent"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn completed_courses_show_up_as_certificates() {
    let app = spawn_app().await;
    let ctx = enrolled_student(&app).await;

    let (_, enrollments) = app
        .send("GET", &format!("/api/admin/courses/{}/enrollments", ctx.course_id), Some(&ctx.admin), None)
        .await;
    let enrollment_id = enrollments[0]["id"].as_str().unwrap().to_string();
    app.send(
        "PATCH",
        &format!("/api/admin/enrollments/{}", enrollment_id),
        Some(&ctx.admin),
        Some(json!({ "status": "completed" })),
    )
    .await;

    let (status, certs) = app.send("GET", "/api/portal/certificates", Some(&ctx.student), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(certs[0]["status"], "earned");
    let expected = format!("NB-{}", enrollment_id[..8].to_uppercase());
    assert_eq!(certs[0]["credential_id"], expected.as_str());
}

#[tokio::test]
async fn dashboard_bundles_profile_and_enrollments() {
    let app = spawn_app().await;
    let ctx = enrolled_student(&app).await;

    let (status, dashboard) = app.send("GET", "/api/portal/dashboard", Some(&ctx.student), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["profile"]["full_name"], "Laila");
    assert_eq!(dashboard["enrollments"][0]["course_name"], "Robotics 101");
    assert!(dashboard["next_session"].is_null());
    assert_eq!(dashboard["attendance"]["total"], 0);
}

#[tokio::test]
async fn students_cannot_read_each_other() {
    let app = spawn_app().await;
    let ctx = enrolled_student(&app).await;
    app.seed_user("omar@example.com", "omar-pass", "Omar", Role::Student).await;
    let omar = app.login("omar@example.com", "omar-pass").await;

    let uri = format!("/api/portal/courses?student_id={}", ctx.student_id);
    let (status, _) = app.send("GET", &uri, Some(&omar), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, courses) = app.send("GET", &uri, Some(&ctx.admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(courses.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn assignments_are_an_empty_list() {
    let app = spawn_app().await;
    let ctx = enrolled_student(&app).await;

    let (status, assignments) = app.send("GET", "/api/portal/assignments", Some(&ctx.student), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(assignments, json!([]));
}
