mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::spawn_app;

#[tokio::test]
async fn contact_info_falls_back_to_defaults() {
    let app = spawn_app().await;

    let (status, contact) = app.send("GET", "/api/public/contact", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(contact["phone"], "+20 100 165 6594");
    assert_eq!(contact["working_hours"], json!(["Saturday - Friday", "10:00 AM - 8:00 PM"]));
}

#[tokio::test]
async fn saved_settings_drive_the_contact_page() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, saved) = app
        .send(
            "PUT",
            "/api/admin/settings",
            Some(&admin),
            Some(json!({
                "phone": { "value": "+20 122 000 1111", "category": "contact" },
                "business_hours": {
                    "value": {
                        "sunday": { "open": "09:00", "close": "17:00" },
                        "saturday": { "open": "10:00", "close": "14:30" },
                        "friday": { "open": null, "close": null }
                    }
                }
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["phone"]["category"], "contact");

    let (_, contact) = app.send("GET", "/api/public/contact", None, None).await;
    assert_eq!(contact["phone"], "+20 122 000 1111");
    assert_eq!(
        contact["working_hours"],
        json!(["Saturday: 10:00 AM - 2:30 PM", "Sunday: 9:00 AM - 5:00 PM"])
    );
}

#[tokio::test]
async fn single_setting_round_trips_through_its_key() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, setting) = app
        .send(
            "PUT",
            "/api/admin/settings/email",
            Some(&admin),
            Some(json!({ "value": "hello@academy.test" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(setting["value"], "hello@academy.test");

    let (status, _) = app.send("GET", "/api/admin/settings/missing", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn only_active_programs_are_published() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    for (id, order) in [("robotics", 2), ("coding", 1)] {
        app.send(
            "POST",
            "/api/admin/programs",
            Some(&admin),
            Some(json!({
                "id": id,
                "title": id.to_uppercase(),
                "ages": "8-14",
                "duration": "6 months",
                "class_size": "8",
                "description": "…",
                "color": "#000",
                "display_order": order
            })),
        )
        .await;
    }
    app.send(
        "PATCH",
        "/api/admin/programs/robotics",
        Some(&admin),
        Some(json!({ "is_active": false })),
    )
    .await;

    let (_, programs) = app.send("GET", "/api/public/programs", None, None).await;
    let ids: Vec<&str> = programs.as_array().unwrap().iter().map(|p| p["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["coding"]);

    let (status, _) = app.send("GET", "/api/public/programs/robotics", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn gallery_filters_by_category() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    for (category, title) in [("robotics", "Line follower"), ("events", "Open day")] {
        let (status, _) = app
            .send(
                "POST",
                "/api/admin/gallery",
                Some(&admin),
                Some(json!({ "category": category, "title": title, "image_url": "/img.png" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, all) = app.send("GET", "/api/public/gallery?category=all", None, None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, events) = app.send("GET", "/api/public/gallery?category=events", None, None).await;
    assert_eq!(events.as_array().unwrap().len(), 1);
    assert_eq!(events[0]["title"], "Open day");
    assert_eq!(events[0]["type"], "image");
}

#[tokio::test]
async fn incomplete_applications_are_rejected() {
    let app = spawn_app().await;

    let (status, body) = app
        .send(
            "POST",
            "/api/public/applications",
            None,
            Some(json!({
                "parent_name": " ",
                "parent_email": "sara@example.com",
                "parent_phone": "0100",
                "student_name": "Youssef",
                "student_age": 9
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "parent_name is required");
}
