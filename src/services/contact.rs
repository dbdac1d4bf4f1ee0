use std::collections::HashMap;

use serde_json::Value;
use sqlx::SqlitePool;

use crate::db;
use crate::models::ContactInfo;
use crate::models::setting::DayHours;
use crate::services::schedule::format_time_12h;

const DEFAULT_PHONE: &str = "+20 100 165 6594";
const DEFAULT_EMAIL: &str = "info@newbeginning.com";
const DEFAULT_ADDRESS: &str = "Cairo - Maadi";
const WEEK_FROM_SATURDAY: [&str; 7] = ["saturday", "sunday", "monday", "tuesday", "wednesday", "thursday", "friday"];

fn string_setting(settings: &HashMap<String, Value>, key: &str, default: &str) -> String {
    settings
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn capitalize(day: &str) -> String {
    let mut chars = day.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lines like `Saturday: 9:00 AM - 5:00 PM`, skipping days without both an
/// opening and a closing time.
fn working_hours(business_hours: Option<&Value>) -> Vec<String> {
    let Some(hours) = business_hours.and_then(|v| serde_json::from_value::<HashMap<String, DayHours>>(v.clone()).ok())
    else {
        return vec!["Saturday - Friday".to_string(), "10:00 AM - 8:00 PM".to_string()];
    };

    WEEK_FROM_SATURDAY
        .iter()
        .filter_map(|day| {
            let day_hours = hours.get(*day)?;
            let open = day_hours.open.as_deref().filter(|v| !v.is_empty())?;
            let close = day_hours.close.as_deref().filter(|v| !v.is_empty())?;
            Some(format!("{}: {} - {}", capitalize(day), format_time_12h(open), format_time_12h(close)))
        })
        .collect()
}

pub fn contact_info(settings: &HashMap<String, Value>) -> ContactInfo {
    ContactInfo {
        phone: string_setting(settings, "phone", DEFAULT_PHONE),
        email: string_setting(settings, "email", DEFAULT_EMAIL),
        address: string_setting(settings, "address", DEFAULT_ADDRESS),
        working_hours: working_hours(settings.get("business_hours")),
    }
}

pub async fn load_contact_info(db: &SqlitePool) -> Result<ContactInfo, sqlx::Error> {
    let settings = db::settings::fetch_all(db)
        .await?
        .into_iter()
        .map(|s| (s.key, s.value.0))
        .collect();
    Ok(contact_info(&settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_settings_fall_back_to_defaults() {
        let info = contact_info(&HashMap::new());
        assert_eq!(info.phone, "+20 100 165 6594");
        assert_eq!(info.email, "info@newbeginning.com");
        assert_eq!(info.address, "Cairo - Maadi");
        assert_eq!(info.working_hours, vec!["Saturday - Friday", "10:00 AM - 8:00 PM"]);
    }

    #[test]
    fn business_hours_start_on_saturday_and_skip_closed_days() {
        let mut settings = HashMap::new();
        settings.insert("phone".to_string(), json!("+20 2 1234 5678"));
        settings.insert(
            "business_hours".to_string(),
            json!({
                "monday": { "open": "10:00", "close": "18:00" },
                "saturday": { "open": "09:00", "close": "17:00" },
                "friday": { "open": "10:00" }
            }),
        );

        let info = contact_info(&settings);
        assert_eq!(info.phone, "+20 2 1234 5678");
        assert_eq!(
            info.working_hours,
            vec!["Saturday: 9:00 AM - 5:00 PM", "Monday: 10:00 AM - 6:00 PM"]
        );
    }
}
