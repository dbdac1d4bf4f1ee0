//! Grants the admin role to an existing profile.
//!
//! Usage: `promote_admin <email> [--apply]`. Without `--apply` it only
//! reports what would change.

use std::env;

use dotenvy::dotenv;

use academy::db;
use academy::models::Role;

fn is_dry_run() -> bool {
    !env::args().any(|a| a == "--apply")
}

fn target_email() -> Option<String> {
    env::args()
        .skip(1)
        .find(|a| !a.starts_with("--"))
        .map(|a| a.trim().to_lowercase())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let email = match target_email() {
        Some(email) => email,
        None => {
            eprintln!("usage: promote_admin <email> [--apply]");
            std::process::exit(2);
        }
    };

    let database_url = env::var("DATABASE_URL")?;
    let pool = db::connect(&database_url, 1).await?;

    let profile = match db::profiles::find_by_email(&pool, &email).await? {
        Some(p) => p,
        None => {
            eprintln!("No profile found for {}", email);
            std::process::exit(1);
        }
    };

    if profile.role() == Role::Admin {
        println!("{} is already an admin", email);
        return Ok(());
    }

    if is_dry_run() {
        println!(
            "[DRY RUN] Would promote {} ({}) from {} to admin",
            email,
            profile.id,
            profile.role().as_str()
        );
    } else {
        db::profiles::set_role(&pool, &profile.id, Role::Admin).await?;
        println!("Promoted {} ({}) to admin", email, profile.id);
    }

    Ok(())
}
