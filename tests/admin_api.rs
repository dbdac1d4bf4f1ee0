mod common;

use axum::http::StatusCode;
use serde_json::json;

use academy::auth::MemoryAuthProvider;
use academy::models::Role;
use common::{course_body, spawn_app, spawn_with};

#[tokio::test]
async fn admin_routes_require_a_session() {
    let app = spawn_app().await;

    let (status, body) = app.send("GET", "/api/admin/courses", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Please sign in to continue");
}

#[tokio::test]
async fn admin_routes_turn_away_students() {
    let app = spawn_app().await;
    app.seed_user("omar@example.com", "student-pass", "Omar", Role::Student).await;
    let token = app.login("omar@example.com", "student-pass").await;

    let (status, _) = app.send("GET", "/api/admin/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn course_enrollments_keep_the_student_count_in_step() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let student_id = app.seed_user("omar@example.com", "student-pass", "Omar", Role::Student).await;

    let (status, course) = app
        .send("POST", "/api/admin/courses", Some(&admin), Some(course_body("Scratch Basics")))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(course["max_students"], 20);
    let course_id = course["id"].as_str().unwrap().to_string();

    let (status, enrollment) = app
        .send(
            "POST",
            &format!("/api/admin/courses/{}/enrollments", course_id),
            Some(&admin),
            Some(json!({ "student_id": student_id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(enrollment["course_name"], "Scratch Basics");
    let enrollment_id = enrollment["id"].as_str().unwrap().to_string();

    let (_, listed) = app
        .send("GET", &format!("/api/admin/courses/{}", course_id), Some(&admin), None)
        .await;
    assert_eq!(listed["current_students"], 1);

    let (status, _) = app
        .send(
            "PATCH",
            &format!("/api/admin/enrollments/{}", enrollment_id),
            Some(&admin),
            Some(json!({ "status": "completed" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = app
        .send("GET", &format!("/api/admin/courses/{}", course_id), Some(&admin), None)
        .await;
    assert_eq!(listed["current_students"], 0);

    let (status, _) = app
        .send("DELETE", &format!("/api/admin/enrollments/{}", enrollment_id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .send("DELETE", &format!("/api/admin/enrollments/{}", enrollment_id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_course_status_is_rejected() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let mut body = course_body("Robotics");
    body["status"] = json!("paused");
    let (status, _) = app.send("POST", "/api/admin/courses", Some(&admin), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_program_ids_conflict() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let program = json!({
        "id": "robotics-juniors",
        "title": "Robotics Juniors",
        "ages": "8-12",
        "duration": "6 months",
        "class_size": "8",
        "description": "Build and code robots",
        "color": "#0a0a5c",
        "highlights": ["LEGO kits", "Competitions"]
    });

    let (status, created) = app
        .send("POST", "/api/admin/programs", Some(&admin), Some(program.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["highlights"], json!(["LEGO kits", "Competitions"]));

    let (status, _) = app.send("POST", "/api/admin/programs", Some(&admin), Some(program)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn students_are_created_with_program_enrollments_and_deleted_with_their_auth_user() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.send(
        "POST",
        "/api/admin/programs",
        Some(&admin),
        Some(json!({
            "id": "coding",
            "title": "Coding",
            "ages": "10-14",
            "duration": "1 year",
            "class_size": "10",
            "description": "Python and web",
            "color": "#ff9900"
        })),
    )
    .await;

    let (status, student) = app
        .send(
            "POST",
            "/api/admin/students",
            Some(&admin),
            Some(json!({
                "email": "laila@example.com",
                "full_name": "Laila Hassan",
                "age": 11,
                "program_ids": ["coding"],
                "password": "laila-pass"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(student["programs"], json!(["Coding"]));
    assert_eq!(student["status"], "active");
    let student_id = student["id"].as_str().unwrap().to_string();
    assert_eq!(app.auth.user_count().await, 2);

    let (_, stats) = app.send("GET", "/api/admin/students/stats", Some(&admin), None).await;
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["active"], 1);

    let (status, _) = app
        .send("DELETE", &format!("/api/admin/students/{}", student_id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.auth.user_count().await, 1);

    let (status, _) = app
        .send("GET", &format!("/api/admin/students/{}", student_id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn account_management_needs_the_privileged_key() {
    let app = spawn_with(MemoryAuthProvider::without_privileged_access()).await;
    let admin = app.admin_token().await;

    let (status, body) = app
        .send(
            "POST",
            "/api/admin/students",
            Some(&admin),
            Some(json!({ "email": "laila@example.com", "full_name": "Laila Hassan" })),
        )
        .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["message"].as_str().unwrap().contains("AUTH_SERVICE_ROLE_KEY"));
}

#[tokio::test]
async fn instructors_get_program_assignments() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, instructor) = app
        .send(
            "POST",
            "/api/admin/instructors",
            Some(&admin),
            Some(json!({
                "email": "karim@example.com",
                "full_name": "Karim Nabil",
                "title": "Robotics Lead",
                "specializations": ["Arduino", " ", "Python"]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(instructor["specializations"], json!(["Arduino", "Python"]));

    let (_, stats) = app.send("GET", "/api/admin/instructors/stats", Some(&admin), None).await;
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["active"], 1);
}

#[tokio::test]
async fn applications_can_be_reviewed() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, application) = app
        .send(
            "POST",
            "/api/public/applications",
            None,
            Some(json!({
                "parent_name": "Sara Ali",
                "parent_email": "sara@example.com",
                "parent_phone": "+20 100 000 0000",
                "student_name": "Youssef",
                "student_age": 9
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(application["status"], "pending");
    assert_eq!(application["application_type"], "trial");
    let id = application["id"].as_str().unwrap().to_string();

    let (status, reviewed) = app
        .send(
            "PATCH",
            &format!("/api/admin/applications/{}", id),
            Some(&admin),
            Some(json!({ "status": "approved", "review_notes": "Welcome aboard" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviewed["status"], "approved");
    assert!(reviewed["reviewed_at"].is_string());

    let (_, stats) = app.send("GET", "/api/admin/applications/stats", Some(&admin), None).await;
    assert_eq!(stats, json!({ "pending": 0, "approved": 1, "rejected": 0 }));
}

#[tokio::test]
async fn payments_export_as_quoted_csv() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let student_id = app.seed_user("omar@example.com", "student-pass", "Omar \"O\" Said", Role::Student).await;

    let (status, payment) = app
        .send(
            "POST",
            "/api/admin/payments",
            Some(&admin),
            Some(json!({
                "student_id": student_id,
                "amount": 1200.5,
                "payment_method": "cash",
                "payment_date": "2025-03-01"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(payment["currency"], "EGP");
    assert_eq!(payment["status"], "pending");
    assert!(payment["invoice_id"].as_str().unwrap().starts_with("INV-"));

    let (status, bytes) = app.send_raw("GET", "/api/admin/payments/export", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let csv = String::from_utf8(bytes).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("\"Invoice ID\",\"Date\",\"Student\""));
    assert!(lines[1].contains("\"Omar \"\"O\"\" Said\""));
    assert!(lines[1].contains("\"1200.50\""));
}

#[tokio::test]
async fn payments_for_unknown_students_are_rejected() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, _) = app
        .send(
            "POST",
            "/api/admin/payments",
            Some(&admin),
            Some(json!({
                "student_id": "nobody",
                "amount": 100.0,
                "payment_method": "card",
                "payment_date": "2025-03-01"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_report_types_are_bad_requests() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, _) = app.send("GET", "/api/admin/reports/data/weather", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, table) = app.send("GET", "/api/admin/reports/data/enrollment", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(table["columns"].as_array().is_some_and(|c| !c.is_empty()));
}

#[tokio::test]
async fn list_screens_filter_by_search_and_status() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let alice = app.seed_user("alice@example.com", "alice-pass", "Alice Nour", Role::Student).await;
    app.seed_user("bassem@example.com", "bassem-pass", "Bassem Ali", Role::Student).await;
    app.seed_user("carla@alice.test", "carla-pass", "Carla", Role::Student).await;
    app.send(
        "PATCH",
        &format!("/api/admin/students/{}", alice),
        Some(&admin),
        Some(json!({ "status": "inactive" })),
    )
    .await;

    let (status, found) = app.send("GET", "/api/admin/students?search=ALICE", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().unwrap().len(), 2);

    let (_, found) = app
        .send("GET", "/api/admin/students?search=alice&status=inactive", Some(&admin), None)
        .await;
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["full_name"], "Alice Nour");

    let (_, found) = app.send("GET", "/api/admin/students?status=all", Some(&admin), None).await;
    assert_eq!(found.as_array().unwrap().len(), 3);

    let (_, found) = app.send("GET", "/api/admin/students?search=%25", Some(&admin), None).await;
    assert_eq!(found, json!([]));

    app.send("POST", "/api/admin/courses", Some(&admin), Some(course_body("Scratch Basics")))
        .await;
    let mut draft = course_body("Python Starter");
    draft["status"] = json!("draft");
    app.send("POST", "/api/admin/courses", Some(&admin), Some(draft)).await;

    let (_, found) = app.send("GET", "/api/admin/courses?search=python", Some(&admin), None).await;
    assert_eq!(found.as_array().unwrap().len(), 1);
    let (_, found) = app.send("GET", "/api/admin/courses?status=active", Some(&admin), None).await;
    assert_eq!(found[0]["name"], "Scratch Basics");
}

#[tokio::test]
async fn paid_payments_count_towards_this_months_revenue_and_can_be_deleted() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let student_id = app.seed_user("omar@example.com", "student-pass", "Omar", Role::Student).await;
    let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();

    let (_, payment) = app
        .send(
            "POST",
            "/api/admin/payments",
            Some(&admin),
            Some(json!({
                "student_id": student_id,
                "amount": 300.0,
                "payment_method": "card",
                "payment_date": today
            })),
        )
        .await;
    let payment_id = payment["id"].as_str().unwrap().to_string();
    let (status, _) = app
        .send(
            "PATCH",
            &format!("/api/admin/payments/{}", payment_id),
            Some(&admin),
            Some(json!({ "status": "paid" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, stats) = app.send("GET", "/api/admin/payments/stats", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["monthly_revenue"], "300.00");
    assert_eq!(stats["pending"], 0);

    let (_, dashboard) = app.send("GET", "/api/admin/dashboard", Some(&admin), None).await;
    assert_eq!(dashboard["payments"]["monthly_revenue"], "300.00");

    let (_, found) = app.send("GET", "/api/admin/payments?status=pending", Some(&admin), None).await;
    assert_eq!(found, json!([]));

    let uri = format!("/api/admin/payments/{}", payment_id);
    let (status, _) = app.send("DELETE", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.send("DELETE", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, stats) = app.send("GET", "/api/admin/payments/stats", Some(&admin), None).await;
    assert_eq!(stats["monthly_revenue"], "0.00");
}

#[tokio::test]
async fn deleting_a_student_recounts_course_and_session_totals() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let student_id = app.seed_user("omar@example.com", "student-pass", "Omar", Role::Student).await;

    let (_, course) = app
        .send("POST", "/api/admin/courses", Some(&admin), Some(course_body("Scratch Basics")))
        .await;
    let course_id = course["id"].as_str().unwrap().to_string();
    app.send(
        "POST",
        &format!("/api/admin/courses/{}/enrollments", course_id),
        Some(&admin),
        Some(json!({ "student_id": student_id })),
    )
    .await;

    let (_, session) = app
        .send(
            "POST",
            "/api/admin/sessions",
            Some(&admin),
            Some(json!({
                "course_id": course_id,
                "day_of_week": 2,
                "start_time": "10:00",
                "end_time": "11:00"
            })),
        )
        .await;
    let session_uri = format!("/api/admin/sessions/{}", session["id"].as_str().unwrap());
    app.send(
        "POST",
        &format!("{}/attendance", session_uri),
        Some(&admin),
        Some(json!({ "student_id": student_id, "date": "2025-03-04", "status": "present" })),
    )
    .await;

    let course_uri = format!("/api/admin/courses/{}", course_id);
    let (_, listed) = app.send("GET", &course_uri, Some(&admin), None).await;
    assert_eq!(listed["current_students"], 1);
    let (_, listed) = app.send("GET", &session_uri, Some(&admin), None).await;
    assert_eq!(listed["current_attendance"], 1);

    let (status, _) = app
        .send("DELETE", &format!("/api/admin/students/{}", student_id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, listed) = app.send("GET", &course_uri, Some(&admin), None).await;
    assert_eq!(listed["current_students"], 0);
    let (_, listed) = app.send("GET", &session_uri, Some(&admin), None).await;
    assert_eq!(listed["current_attendance"], 0);
}
