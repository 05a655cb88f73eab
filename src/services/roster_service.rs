//! Signup and unregister rules for an activity's roster.
//!
//! Every call re-reads the activity before mutating it. The append itself is a
//! conditional insert (see `activities_repo::append_participant`), so a roster
//! never exceeds its capacity even when requests race for the last slot.

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::database::activities_repo;
use crate::models::Activity;

// After this many lost races the signup gives up with ActivityFull, even if a
// slot has been freed again in the meantime.
const MAX_SIGNUP_ATTEMPTS: usize = 3;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Activity not found")]
    NotFound,

    #[error("Already signed up for this activity")]
    AlreadyRegistered,

    #[error("Activity is full")]
    ActivityFull,

    #[error("Participant not found in this activity")]
    NotRegistered,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

fn check_can_join(activity: &Activity, email: &str) -> Result<(), RosterError> {
    if activity.has_participant(email) {
        return Err(RosterError::AlreadyRegistered);
    }
    if activity.is_full() {
        return Err(RosterError::ActivityFull);
    }
    Ok(())
}

// Error for a signup whose conditional inserts all lost: the roster's current
// state decides, and a roster that still looks open reports ActivityFull.
fn lost_race_error(activity: &Activity, email: &str) -> RosterError {
    match check_can_join(activity, email) {
        Err(e) => e,
        Ok(()) => RosterError::ActivityFull,
    }
}

async fn load(pool: &SqlitePool, activity_name: &str) -> Result<Activity, RosterError> {
    activities_repo::get_activity(pool, activity_name)
        .await?
        .ok_or(RosterError::NotFound)
}

pub async fn sign_up(
    pool: &SqlitePool,
    activity_name: &str,
    email: &str,
) -> Result<String, RosterError> {
    for attempt in 1..=MAX_SIGNUP_ATTEMPTS {
        let activity = load(pool, activity_name).await?;
        check_can_join(&activity, email)?;

        if activities_repo::append_participant(pool, activity_name, email).await? == 1 {
            info!(activity = %activity_name, email = %email, "participant signed up");
            return Ok(format!("Signed up {} for {}", email, activity_name));
        }

        // Another request changed the roster between our read and the insert.
        debug!(activity = %activity_name, attempt, "conditional append rejected, re-checking");
    }

    // Report what the roster looks like now: a concurrent signup of the same
    // email or a vanished activity wins over "full".
    let activity = load(pool, activity_name).await?;
    warn!(activity = %activity_name, email = %email, "signup gave up after repeated rejected inserts");
    Err(lost_race_error(&activity, email))
}

pub async fn unregister(
    pool: &SqlitePool,
    activity_name: &str,
    email: &str,
) -> Result<String, RosterError> {
    let activity = load(pool, activity_name).await?;
    if !activity.has_participant(email) {
        return Err(RosterError::NotRegistered);
    }

    if activities_repo::remove_participant(pool, activity_name, email).await? == 0 {
        return Err(RosterError::NotRegistered);
    }

    info!(activity = %activity_name, email = %email, "participant unregistered");
    Ok(format!("Unregistered {} from {}", email, activity_name))
}
