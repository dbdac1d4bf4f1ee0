use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};
use sqlx::types::Json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{AuthProvider, AuthSession, AuthUser, privileged_key_missing};
use crate::db;
use crate::error::AppError;
use crate::models::{
    Instructor, InstructorListItem, NewInstructorRequest, NewProfile, NewStudentRequest, Profile, Role,
    StudentListItem, UpdateInstructorRequest, UpdateStudentRequest,
};
use crate::models::instructor::validate_status as validate_instructor_status;

const WEAK_PASSWORDS: &[&str] = &["password", "123456"];
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub full_name: String,
}

impl SignUpRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        crate::models::validate_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::BadRequest("Password must be at least 6 characters long".to_string()));
        }
        if self.password != self.confirm_password {
            return Err(AppError::BadRequest("Passwords do not match".to_string()));
        }
        if WEAK_PASSWORDS.contains(&self.password.to_lowercase().as_str()) {
            return Err(AppError::BadRequest("Please choose a stronger password".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub session: AuthSession,
    pub profile: Profile,
    pub role: Role,
    pub redirect: String,
}

/// A throwaway password for accounts created from the back-office. The
/// user is expected to reset it.
fn generate_password() -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("{}A1!", &random[..12])
}

fn chosen_password(requested: Option<&str>) -> Result<String, AppError> {
    match requested.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) if p.chars().count() < MIN_PASSWORD_LEN => {
            Err(AppError::BadRequest("Password must be at least 6 characters long".to_string()))
        }
        Some(p) => Ok(p.to_string()),
        None => Ok(generate_password()),
    }
}

/// Account lifecycle spanning the auth service and the local store.
pub struct AccountService {
    db: SqlitePool,
    auth: Arc<dyn AuthProvider>,
}

impl AccountService {
    pub fn new(db: SqlitePool, auth: Arc<dyn AuthProvider>) -> Self {
        Self { db, auth }
    }

    pub async fn sign_up(&self, req: SignUpRequest) -> Result<Profile, AppError> {
        req.validate()?;
        let email = req.email.trim();

        let user = self.auth.sign_up(email, &req.password).await?;
        let new_profile = NewProfile::basic(&user.id, email, req.full_name.trim(), Role::Student);
        let profile = match self.write_profile(&new_profile).await {
            Ok(profile) => profile,
            Err(e) => {
                if self.auth.has_privileged_access() {
                    self.discard_auth_user(&user.id).await;
                } else {
                    warn!("profile write failed, auth user {} is orphaned: {}", user.id, e);
                }
                return Err(e);
            }
        };

        info!("registered student account {}", profile.id);
        Ok(profile)
    }

    pub async fn login(&self, req: LoginRequest) -> Result<LoginOutcome, AppError> {
        let session = self.auth.sign_in(req.email.trim(), &req.password).await?;
        let profile = self.ensure_profile(&session.user, req.email.trim()).await?;
        let role = profile.role();

        Ok(LoginOutcome {
            session,
            redirect: role.landing_path().to_string(),
            role,
            profile,
        })
    }

    /// Like [`login`](Self::login) but only admins get a session back.
    pub async fn admin_login(&self, req: LoginRequest) -> Result<LoginOutcome, AppError> {
        let outcome = self.login(req).await?;
        if outcome.role == Role::Admin {
            return Ok(outcome);
        }

        if let Err(e) = self.auth.sign_out(&outcome.session.access_token).await {
            warn!("could not revoke non-admin session: {}", e);
        }
        Err(AppError::Forbidden(format!(
            "Access denied. Your account role is \"{}\". Admin privileges required.",
            outcome.profile.role
        )))
    }

    pub async fn logout(&self, access_token: &str) -> Result<(), AppError> {
        self.auth.sign_out(access_token).await
    }

    /// Returns the user's profile, creating a student profile for accounts
    /// that have none yet.
    pub async fn ensure_profile(&self, user: &AuthUser, fallback_email: &str) -> Result<Profile, AppError> {
        if let Some(profile) = db::profiles::find_by_id(&self.db, &user.id).await? {
            return Ok(profile);
        }

        let email = user.email.as_deref().unwrap_or(fallback_email);
        let mut conn = self.db.acquire().await?;
        let profile = db::profiles::upsert(&mut conn, &NewProfile::basic(&user.id, email, "", Role::Student)).await?;
        info!("created missing profile for {}", user.id);
        Ok(profile)
    }

    pub async fn create_student(&self, req: NewStudentRequest) -> Result<StudentListItem, AppError> {
        req.validate()?;
        if !self.auth.has_privileged_access() {
            return Err(privileged_key_missing());
        }

        let password = chosen_password(req.password.as_deref())?;
        let email = req.email.trim().to_string();
        let user = self.auth.admin_create_user(&email, &password).await?;

        let profile = NewProfile {
            id: user.id.clone(),
            email,
            full_name: req.full_name.trim().to_string(),
            role: Role::Student,
            phone: req.phone,
            age: req.age,
            parent_email: req.parent_email,
            parent_phone: req.parent_phone,
            status: req.status.unwrap_or_else(|| "active".to_string()),
            join_date: req.join_date.filter(|d| !d.is_empty()).or_else(|| Some(db::today())),
            notes: req.notes,
        };

        if let Err(e) = self.write_student(&profile, &req.program_ids).await {
            self.discard_auth_user(&user.id).await;
            return Err(e);
        }

        info!("created student {} with {} program(s)", user.id, req.program_ids.len());
        db::students::find_student(&self.db, &user.id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn write_student(&self, profile: &NewProfile, program_ids: &[String]) -> Result<(), AppError> {
        let mut tx = self.db.begin().await?;
        db::profiles::upsert(&mut tx, profile).await?;
        db::students::replace_program_enrollments(&mut tx, &profile.id, program_ids).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn update_student(&self, id: &str, req: UpdateStudentRequest) -> Result<StudentListItem, AppError> {
        let mut profile = db::profiles::find_by_id(&self.db, id)
            .await?
            .filter(|p| p.role() == Role::Student)
            .ok_or(AppError::NotFound)?;
        req.apply(&mut profile)?;

        let mut tx = self.db.begin().await?;
        db::profiles::update(&mut tx, &profile).await?;
        if let Some(program_ids) = &req.program_ids {
            db::students::replace_program_enrollments(&mut tx, id, program_ids).await?;
        }
        tx.commit().await?;

        db::students::find_student(&self.db, id)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Removes the profile (enrollments and attendance follow it) and then,
    /// best effort, the auth user.
    pub async fn delete_student(&self, id: &str) -> Result<(), AppError> {
        let profile = db::profiles::find_by_id(&self.db, id)
            .await?
            .filter(|p| p.role() == Role::Student)
            .ok_or(AppError::NotFound)?;

        let mut tx = self.db.begin().await?;
        delete_profile(&mut tx, &profile.id).await?;
        tx.commit().await?;
        self.discard_auth_user(&profile.id).await;

        info!("deleted student {}", profile.id);
        Ok(())
    }

    pub async fn create_instructor(&self, req: NewInstructorRequest) -> Result<InstructorListItem, AppError> {
        req.validate()?;
        if !self.auth.has_privileged_access() {
            return Err(privileged_key_missing());
        }

        let password = chosen_password(req.password.as_deref())?;
        let email = req.email.trim().to_string();
        let user = self.auth.admin_create_user(&email, &password).await?;

        let profile = NewProfile::basic(&user.id, &email, req.full_name.trim(), Role::Instructor);
        let instructor = Instructor {
            id: db::new_id(),
            profile_id: user.id.clone(),
            title: req.title.trim().to_string(),
            phone: req.phone.filter(|p| !p.is_empty()),
            specializations: Json(clean_list(req.specializations)),
            status: req.status.unwrap_or_else(|| "active".to_string()),
            join_date: req.join_date.filter(|d| !d.is_empty()).or_else(|| Some(db::today())),
            created_at: db::now(),
        };

        if let Err(e) = self.write_instructor(&profile, &instructor, &req.program_ids).await {
            self.discard_auth_user(&user.id).await;
            return Err(e);
        }

        info!("created instructor {} for profile {}", instructor.id, user.id);
        db::instructors::find_item(&self.db, &instructor.id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn write_instructor(
        &self,
        profile: &NewProfile,
        instructor: &Instructor,
        program_ids: &[String],
    ) -> Result<(), AppError> {
        let mut tx = self.db.begin().await?;
        db::profiles::upsert(&mut tx, profile).await?;
        db::instructors::insert(&mut tx, instructor).await?;
        db::instructors::replace_assignments(&mut tx, &instructor.id, program_ids).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn update_instructor(
        &self,
        id: &str,
        req: UpdateInstructorRequest,
    ) -> Result<InstructorListItem, AppError> {
        let mut instructor = db::instructors::find_by_id(&self.db, id)
            .await?
            .ok_or(AppError::NotFound)?;

        if let Some(title) = req.title {
            instructor.title = title;
        }
        if let Some(phone) = req.phone {
            instructor.phone = Some(phone).filter(|p| !p.is_empty());
        }
        if let Some(specializations) = req.specializations {
            instructor.specializations = Json(clean_list(specializations));
        }
        if let Some(status) = req.status {
            validate_instructor_status(&status)?;
            instructor.status = status;
        }

        let mut tx = self.db.begin().await?;
        db::instructors::update(&mut tx, &instructor).await?;
        if let Some(program_ids) = &req.program_ids {
            db::instructors::replace_assignments(&mut tx, id, program_ids).await?;
        }
        tx.commit().await?;

        db::instructors::find_item(&self.db, id)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Deletes assignments, the instructor row and its profile together,
    /// then the auth user best effort.
    pub async fn delete_instructor(&self, id: &str) -> Result<(), AppError> {
        let instructor = db::instructors::find_by_id(&self.db, id)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut tx = self.db.begin().await?;
        db::instructors::delete(&mut tx, &instructor.id).await?;
        delete_profile(&mut tx, &instructor.profile_id).await?;
        tx.commit().await?;

        self.discard_auth_user(&instructor.profile_id).await;
        info!("deleted instructor {}", instructor.id);
        Ok(())
    }

    async fn write_profile(&self, profile: &NewProfile) -> Result<Profile, AppError> {
        let mut conn = self.db.acquire().await?;
        Ok(db::profiles::upsert(&mut conn, profile).await?)
    }

    async fn discard_auth_user(&self, user_id: &str) {
        if let Err(e) = self.auth.admin_delete_user(user_id).await {
            warn!("could not delete auth user {}: {}", user_id, e);
        }
    }
}

/// Deletes a profile and recounts the course and session totals that its
/// cascaded enrollments and attendance marks were part of.
async fn delete_profile(conn: &mut SqliteConnection, profile_id: &str) -> Result<(), sqlx::Error> {
    let course_ids = db::enrollments::active_course_ids(&mut *conn, profile_id).await?;
    let session_ids = db::attendance::session_ids_for_student(&mut *conn, profile_id).await?;

    db::profiles::delete(&mut *conn, profile_id).await?;

    for course_id in &course_ids {
        db::courses::refresh_current_students(&mut *conn, course_id).await?;
    }
    for session_id in &session_ids {
        db::sessions::refresh_current_attendance(&mut *conn, session_id).await?;
    }
    Ok(())
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
