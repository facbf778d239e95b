// holiflow-service/src/services/vacation_service.rs
use crate::models::{
    AbsenceSummary, DashboardStats, DaysRequest, NewNotification, NotificationMetadata,
    NotificationType, ServiceError, Team, User, VacationDraft, VacationPeriod, VacationStatus,
};
use crate::services::{notification_service, team_service, vacation_rules};
use crate::utils::DocumentStore;
use chrono::{NaiveDate, Utc};
use log::{error, info};
use uuid::Uuid;

const DATE_FORMAT: &str = "%d/%m/%Y";

fn describe_range(period: &VacationPeriod) -> String {
    format!(
        "{} to {}",
        period.start_date.format(DATE_FORMAT),
        period.end_date.format(DATE_FORMAT)
    )
}

pub fn find_vacation(store: &DocumentStore, vacation_id: &str) -> Result<VacationPeriod, ServiceError> {
    store.find::<VacationPeriod>(vacation_id)?.ok_or_else(|| {
        error!("❌ Vacation not found: {}", vacation_id);
        ServiceError::NotFound
    })
}

fn periods_of(store: &DocumentStore, user_id: &str) -> Result<Vec<VacationPeriod>, ServiceError> {
    store.find_where::<VacationPeriod, _>(|period| period.user_id == user_id)
}

// The team whose leader approves this user's absences
fn approving_team(store: &DocumentStore, user: &User) -> Result<Team, ServiceError> {
    let member = team_service::membership(store, &user.id)?.ok_or_else(|| {
        error!("❌ User: {} is not a member of any team", user.id);
        ServiceError::BadRequest("Team member not found".to_string())
    })?;

    team_service::find_team(store, &member.team_id)
}

fn notify_leader(store: &DocumentStore, period: &VacationPeriod) -> Result<(), ServiceError> {
    notification_service::add_notification(
        store,
        NewNotification {
            user_id: Some(period.team_leader_id.clone()),
            email: None,
            title: "New absence request".to_string(),
            message: format!("{} requested an absence from {}", period.user_name, describe_range(period)),
            notification_type: NotificationType::VacationRequest,
            metadata: NotificationMetadata {
                vacation_id: Some(period.id.clone()),
                ..Default::default()
            },
        },
    )?;
    Ok(())
}

fn create_period(store: &DocumentStore, user: &User, team: &Team, draft: &VacationDraft) -> Result<VacationPeriod, ServiceError> {
    let now = Utc::now();
    let period = VacationPeriod {
        id: Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        user_name: user.display_name(),
        team_leader_id: team.leader_id.clone(),
        start_date: draft.start_date,
        end_date: draft.end_date,
        absence_type: draft.absence_type,
        status: VacationStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    store.save(&period)?;
    notify_leader(store, &period)?;

    info!("✅ Absence {} created for user: {} ({})", period.id, user.id, describe_range(&period));
    Ok(period)
}

/// Request a single absence period.
pub fn add_vacation(store: &DocumentStore, user: &User, draft: &VacationDraft) -> Result<VacationPeriod, ServiceError> {
    info!("📝 Absence request from user: {} ({:?})", user.id, draft.absence_type);

    let team = approving_team(store, user)?;

    // Quota check and insert happen under one transaction
    store.transaction(|store| {
        let existing = periods_of(store, &user.id)?;
        vacation_rules::validate_absence(&user.id, draft, &existing, None)?;
        create_period(store, user, &team, draft)
    })
}

/// Request individually picked days; consecutive working days become one period each.
pub fn submit_days(store: &DocumentStore, user: &User, request: &DaysRequest) -> Result<Vec<VacationPeriod>, ServiceError> {
    let ranges = vacation_rules::group_consecutive_days(&request.days);
    info!("📝 {} days grouped into {} periods for user: {}", request.days.len(), ranges.len(), user.id);

    let team = approving_team(store, user)?;

    store.transaction(|store| {
        let existing = periods_of(store, &user.id)?;
        vacation_rules::validate_batch(&user.id, &ranges, request.absence_type, &existing)?;

        ranges
            .iter()
            .map(|range| {
                let draft = VacationDraft {
                    start_date: range.start,
                    end_date: range.end,
                    absence_type: request.absence_type,
                };
                create_period(store, user, &team, &draft)
            })
            .collect()
    })
}

/// Change the dates or type of one of the caller's pending absences.
pub fn update_vacation(
    store: &DocumentStore,
    user: &User,
    vacation_id: &str,
    draft: &VacationDraft,
) -> Result<VacationPeriod, ServiceError> {
    store.transaction(|store| edit_period(store, user, vacation_id, draft))
}

fn edit_period(store: &DocumentStore, user: &User, vacation_id: &str, draft: &VacationDraft) -> Result<VacationPeriod, ServiceError> {
    let mut period = find_vacation(store, vacation_id)?;

    if period.user_id != user.id {
        error!("❌ User: {} cannot edit absence: {}", user.id, vacation_id);
        return Err(ServiceError::Forbidden);
    }
    if !period.is_pending() {
        return Err(ServiceError::Conflict("Only pending absences can be changed".to_string()));
    }

    let existing = periods_of(store, &user.id)?;
    vacation_rules::validate_absence(&user.id, draft, &existing, Some(vacation_id))?;

    period.start_date = draft.start_date;
    period.end_date = draft.end_date;
    period.absence_type = draft.absence_type;
    period.updated_at = Utc::now();
    store.save(&period)?;

    // Keep the leader's request in line with the new dates
    notification_service::delete_for_vacation(store, &period.id, Some(NotificationType::VacationRequest))?;
    notify_leader(store, &period)?;

    info!("✅ Absence updated: {}", vacation_id);
    Ok(period)
}

pub fn delete_vacation(store: &DocumentStore, user: &User, vacation_id: &str) -> Result<(), ServiceError> {
    let period = find_vacation(store, vacation_id)?;

    if period.user_id != user.id && !user.is_admin() {
        error!("❌ User: {} cannot delete absence: {}", user.id, vacation_id);
        return Err(ServiceError::Forbidden);
    }

    store.delete::<VacationPeriod>(vacation_id)?;
    let removed = notification_service::delete_for_vacation(store, vacation_id, None)?;

    info!("🗑️ Absence {} deleted with {} notifications", vacation_id, removed);
    Ok(())
}

// The pending check and the status change share a transaction, so a period is decided once
fn decide(store: &DocumentStore, leader: &User, vacation_id: &str, status: VacationStatus) -> Result<VacationPeriod, ServiceError> {
    store.transaction(|store| record_decision(store, leader, vacation_id, status))
}

fn record_decision(store: &DocumentStore, leader: &User, vacation_id: &str, status: VacationStatus) -> Result<VacationPeriod, ServiceError> {
    let mut period = find_vacation(store, vacation_id)?;

    if period.team_leader_id != leader.id && !leader.is_admin() {
        error!("❌ User: {} is not the approver of absence: {}", leader.id, vacation_id);
        return Err(ServiceError::Forbidden);
    }
    if !period.is_pending() {
        return Err(ServiceError::Conflict(format!(
            "Absence was already {}",
            match period.status {
                VacationStatus::Approved => "approved",
                _ => "rejected",
            }
        )));
    }

    period.status = status;
    period.updated_at = Utc::now();
    store.save(&period)?;

    notification_service::delete_for_vacation(store, vacation_id, Some(NotificationType::VacationRequest))?;

    let (title, verb, notification_type) = match status {
        VacationStatus::Approved => ("Absence approved", "approved", NotificationType::VacationApproved),
        _ => ("Absence rejected", "rejected", NotificationType::VacationRejected),
    };
    notification_service::add_notification(
        store,
        NewNotification {
            user_id: Some(period.user_id.clone()),
            email: None,
            title: title.to_string(),
            message: format!("Your absence from {} was {}", describe_range(&period), verb),
            notification_type,
            metadata: NotificationMetadata {
                vacation_id: Some(period.id.clone()),
                ..Default::default()
            },
        },
    )?;

    info!("✅ Absence {} {} by {}", vacation_id, verb, leader.id);
    Ok(period)
}

pub fn approve_vacation(store: &DocumentStore, leader: &User, vacation_id: &str) -> Result<VacationPeriod, ServiceError> {
    decide(store, leader, vacation_id, VacationStatus::Approved)
}

pub fn reject_vacation(store: &DocumentStore, leader: &User, vacation_id: &str) -> Result<VacationPeriod, ServiceError> {
    decide(store, leader, vacation_id, VacationStatus::Rejected)
}

// Owner, approver, and admins may look at a period
pub fn visible_vacation(store: &DocumentStore, caller: &User, vacation_id: &str) -> Result<VacationPeriod, ServiceError> {
    let period = find_vacation(store, vacation_id)?;
    if period.user_id == caller.id || period.team_leader_id == caller.id || caller.is_admin() {
        Ok(period)
    } else {
        Err(ServiceError::Forbidden)
    }
}

pub fn user_vacations(store: &DocumentStore, user_id: &str, today: NaiveDate) -> Result<Vec<VacationPeriod>, ServiceError> {
    let mut periods = periods_of(store, user_id)?;
    vacation_rules::sort_for_history(&mut periods, today);
    Ok(periods)
}

pub fn team_vacations(store: &DocumentStore, team_id: &str) -> Result<Vec<VacationPeriod>, ServiceError> {
    let members = team_service::member_ids(store, team_id)?;
    let mut periods = store.find_where::<VacationPeriod, _>(|period| members.contains(&period.user_id))?;
    periods.sort_by(|a, b| a.start_date.cmp(&b.start_date).then_with(|| a.user_name.cmp(&b.user_name)));
    Ok(periods)
}

pub fn pending_for_leader(store: &DocumentStore, leader_id: &str) -> Result<Vec<VacationPeriod>, ServiceError> {
    let mut periods = store.find_where::<VacationPeriod, _>(|period| {
        period.team_leader_id == leader_id && period.is_pending()
    })?;
    periods.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Ok(periods)
}

// Team absences covering `today`, rejected requests excluded
pub fn current_absences(store: &DocumentStore, team_id: &str, today: NaiveDate) -> Result<Vec<VacationPeriod>, ServiceError> {
    Ok(team_vacations(store, team_id)?
        .into_iter()
        .filter(|period| period.status != VacationStatus::Rejected && period.covers(today))
        .collect())
}

pub fn dashboard(store: &DocumentStore, team_id: &str, today: NaiveDate) -> Result<DashboardStats, ServiceError> {
    let periods = team_vacations(store, team_id)?;

    let mut absent: Vec<&str> = periods
        .iter()
        .filter(|period| period.status != VacationStatus::Rejected && period.covers(today))
        .map(|period| period.user_id.as_str())
        .collect();
    absent.sort_unstable();
    absent.dedup();

    Ok(DashboardStats {
        team_id: team_id.to_string(),
        total_members: team_service::member_ids(store, team_id)?.len(),
        currently_absent: absent.len(),
        pending_requests: periods.iter().filter(|period| period.is_pending()).count(),
    })
}

pub fn summary(store: &DocumentStore, user_id: &str, year: i32) -> Result<AbsenceSummary, ServiceError> {
    let periods = periods_of(store, user_id)?;
    Ok(vacation_rules::yearly_summary(&periods, user_id, year))
}
