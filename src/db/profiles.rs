use sqlx::{SqliteConnection, SqlitePool};

use crate::models::{NewProfile, Profile, Role};

const PROFILE_COLUMNS: &str = "id, email, full_name, role, phone, age, parent_email, parent_phone, \
     status, join_date, notes, created_at, updated_at";

pub async fn find_by_id(db: &SqlitePool, id: &str) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(&format!("SELECT {} FROM profiles WHERE id = ?", PROFILE_COLUMNS))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_by_email(db: &SqlitePool, email: &str) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(&format!(
        "SELECT {} FROM profiles WHERE lower(email) = lower(?)",
        PROFILE_COLUMNS
    ))
    .bind(email.trim())
    .fetch_optional(db)
    .await
}

/// Inserts the profile, or overwrites the row a previous attempt left behind
/// under the same auth user id.
pub async fn upsert(conn: &mut SqliteConnection, profile: &NewProfile) -> Result<Profile, sqlx::Error> {
    let now = super::now();

    sqlx::query(
        r#"
        INSERT INTO profiles
            (id, email, full_name, role, phone, age, parent_email, parent_phone,
            status, join_date, notes, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)
        ON CONFLICT(id) DO UPDATE SET
            email = excluded.email,
            full_name = excluded.full_name,
            role = excluded.role,
            phone = excluded.phone,
            age = excluded.age,
            parent_email = excluded.parent_email,
            parent_phone = excluded.parent_phone,
            status = excluded.status,
            join_date = excluded.join_date,
            notes = excluded.notes,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(&profile.id)
    .bind(&profile.email)
    .bind(&profile.full_name)
    .bind(profile.role.as_str())
    .bind(&profile.phone)
    .bind(profile.age)
    .bind(&profile.parent_email)
    .bind(&profile.parent_phone)
    .bind(&profile.status)
    .bind(&profile.join_date)
    .bind(&profile.notes)
    .bind(&now)
    .execute(&mut *conn)
    .await?;

    sqlx::query_as::<_, Profile>(&format!("SELECT {} FROM profiles WHERE id = ?", PROFILE_COLUMNS))
        .bind(&profile.id)
        .fetch_one(&mut *conn)
        .await
}

pub async fn update(conn: &mut SqliteConnection, profile: &Profile) -> Result<(), sqlx::Error> {
    let now = super::now();

    sqlx::query(
        r#"
        UPDATE profiles
        SET full_name = ?1,
            phone = ?2,
            age = ?3,
            parent_email = ?4,
            parent_phone = ?5,
            status = ?6,
            notes = ?7,
            updated_at = ?8
        WHERE id = ?9
        "#,
    )
    .bind(&profile.full_name)
    .bind(&profile.phone)
    .bind(profile.age)
    .bind(&profile.parent_email)
    .bind(&profile.parent_phone)
    .bind(&profile.status)
    .bind(&profile.notes)
    .bind(&now)
    .bind(&profile.id)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn set_role(db: &SqlitePool, id: &str, role: Role) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE profiles SET role = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(role.as_str())
        .bind(super::now())
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn delete(conn: &mut SqliteConnection, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM profiles WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?
        .rows_affected();

    Ok(result > 0)
}
