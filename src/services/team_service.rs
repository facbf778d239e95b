// holiflow-service/src/services/team_service.rs
use crate::models::{Invitation, Role, ServiceError, Team, TeamMember, User, UserProfile};
use crate::services::invitation_service;
use crate::utils::DocumentStore;
use chrono::Utc;
use log::{error, info, warn};
use uuid::Uuid;

pub fn find_team(store: &DocumentStore, team_id: &str) -> Result<Team, ServiceError> {
    store.find::<Team>(team_id)?.ok_or_else(|| {
        error!("❌ Team not found: {}", team_id);
        ServiceError::NotFound
    })
}

// The team leader and admins manage a team
pub fn can_manage(user: &User, team: &Team) -> bool {
    user.id == team.leader_id || user.is_admin()
}

fn ensure_can_manage(user: &User, team: &Team) -> Result<(), ServiceError> {
    if !can_manage(user, team) {
        error!("❌ User: {} cannot manage team: {}", user.id, team.id);
        return Err(ServiceError::Forbidden);
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<String, ServiceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::BadRequest("Team name is required".to_string()));
    }
    Ok(name.to_string())
}

pub fn membership(store: &DocumentStore, user_id: &str) -> Result<Option<TeamMember>, ServiceError> {
    store.find_one::<TeamMember, _>(|member| member.user_id == user_id)
}

pub fn is_member(store: &DocumentStore, user_id: &str, team_id: &str) -> Result<bool, ServiceError> {
    Ok(store
        .find_one::<TeamMember, _>(|member| member.user_id == user_id && member.team_id == team_id)?
        .is_some())
}

// Add a user to a team and point the user record at it
pub fn add_member(store: &DocumentStore, team: &Team, user: &User, role: Role) -> Result<TeamMember, ServiceError> {
    store.transaction(|store| join_team(store, team, &user.id, role))
}

// Membership check and writes for `add_member`; the caller holds the store transaction
pub(crate) fn join_team(store: &DocumentStore, team: &Team, user_id: &str, role: Role) -> Result<TeamMember, ServiceError> {
    if membership(store, user_id)?.is_some() {
        return Err(ServiceError::Conflict("User already belongs to a team".to_string()));
    }

    let mut user = store.find::<User>(user_id)?.ok_or_else(|| {
        error!("❌ User not found: {}", user_id);
        ServiceError::NotFound
    })?;

    let member = TeamMember {
        id: Uuid::new_v4().to_string(),
        team_id: team.id.clone(),
        user_id: user.id.clone(),
        role,
        joined_at: Utc::now(),
    };
    store.save(&member)?;

    user.team_id = Some(team.id.clone());
    user.updated_at = Utc::now();
    store.save(&user)?;

    info!("✅ User: {} added to team: {} with role: {:?}", user.id, team.id, role);
    Ok(member)
}

pub fn create_team(store: &DocumentStore, leader: &User, name: &str) -> Result<Team, ServiceError> {
    let name = validate_name(name)?;

    if leader.role < Role::TeamLeader {
        error!("❌ User: {} is not allowed to create teams", leader.id);
        return Err(ServiceError::Forbidden);
    }

    info!("📝 Creating new team: {} for user: {}", name, leader.id);

    let now = Utc::now();
    let team = Team {
        id: Uuid::new_v4().to_string(),
        name,
        leader_id: leader.id.clone(),
        created_at: now,
        updated_at: now,
    };

    store.transaction(|store| {
        if membership(store, &leader.id)?.is_some() {
            return Err(ServiceError::Conflict("You already belong to a team".to_string()));
        }

        store.save(&team)?;
        join_team(store, &team, &leader.id, Role::TeamLeader)
    })?;

    info!("✅ Team created successfully: {}", team.id);
    Ok(team)
}

pub fn update_team(store: &DocumentStore, caller: &User, team_id: &str, name: &str) -> Result<Team, ServiceError> {
    let mut team = find_team(store, team_id)?;
    ensure_can_manage(caller, &team)?;

    team.name = validate_name(name)?;
    team.updated_at = Utc::now();
    store.save(&team)?;

    // Pending invitations show the team name
    for mut invitation in store.find_where::<Invitation, _>(|inv| inv.team_id == team.id)? {
        invitation.team_name = team.name.clone();
        store.save(&invitation)?;
    }

    info!("✅ Team renamed: {}", team.id);
    Ok(team)
}

fn detach_user(store: &DocumentStore, user_id: &str) -> Result<(), ServiceError> {
    match store.find::<User>(user_id)? {
        Some(mut user) => {
            user.team_id = None;
            user.updated_at = Utc::now();
            store.save(&user)
        }
        None => {
            warn!("Team member without user record: {}", user_id);
            Ok(())
        }
    }
}

// Delete a team with its members and invitations; returns the number of members removed
pub fn delete_team(store: &DocumentStore, caller: &User, team_id: &str) -> Result<usize, ServiceError> {
    let team = find_team(store, team_id)?;
    ensure_can_manage(caller, &team)?;

    info!("🗑️ Deleting team: {}", team_id);

    let (members, invitations) = store.transaction(|store| {
        let members = store.find_where::<TeamMember, _>(|member| member.team_id == team_id)?;
        for member in &members {
            store.delete::<TeamMember>(&member.id)?;
            detach_user(store, &member.user_id)?;
        }

        // Invitations go with their team_invite notifications
        let invitations = store.find_where::<Invitation, _>(|inv| inv.team_id == team_id)?;
        for invitation in &invitations {
            invitation_service::remove_invitation(store, invitation)?;
        }

        store.delete::<Team>(team_id)?;
        Ok((members.len(), invitations.len()))
    })?;

    info!("✅ Team {} deleted with {} members and {} invitations", team_id, members, invitations);
    Ok(members)
}

pub fn team_for_user(store: &DocumentStore, user: &User) -> Result<Option<Team>, ServiceError> {
    match membership(store, &user.id)? {
        Some(member) => store.find::<Team>(&member.team_id),
        None => Ok(None),
    }
}

pub fn member_ids(store: &DocumentStore, team_id: &str) -> Result<Vec<String>, ServiceError> {
    Ok(store
        .find_where::<TeamMember, _>(|member| member.team_id == team_id)?
        .into_iter()
        .map(|member| member.user_id)
        .collect())
}

// Profiles of the team's members; members whose user record is gone are skipped
pub fn team_members(store: &DocumentStore, team_id: &str) -> Result<Vec<UserProfile>, ServiceError> {
    let mut profiles = Vec::new();
    for user_id in member_ids(store, team_id)? {
        if let Some(user) = store.find::<User>(&user_id)? {
            profiles.push(UserProfile::from(&user));
        }
    }
    profiles.sort_by(|a, b| a.display_name.to_lowercase().cmp(&b.display_name.to_lowercase()));
    Ok(profiles)
}

pub fn remove_member(store: &DocumentStore, caller: &User, team_id: &str, user_id: &str) -> Result<(), ServiceError> {
    let team = find_team(store, team_id)?;
    ensure_can_manage(caller, &team)?;

    if user_id == team.leader_id {
        return Err(ServiceError::BadRequest(
            "Cannot remove the team leader from the team".to_string(),
        ));
    }

    let removed = store.delete_where::<TeamMember, _>(|member| member.team_id == team_id && member.user_id == user_id)?;
    if removed == 0 {
        return Err(ServiceError::NotFound);
    }
    detach_user(store, user_id)?;

    info!("✅ User: {} removed from team: {}", user_id, team_id);
    Ok(())
}
