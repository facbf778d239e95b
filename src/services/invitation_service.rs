// holiflow-service/src/services/invitation_service.rs
use crate::models::{
    normalize_email, Invitation, InvitationStatus, NewNotification, Notification,
    NotificationMetadata, NotificationType, Role, ServiceError, TeamMember, User,
};
use crate::services::email_service::{EmailClient, InvitationKind};
use crate::services::{notification_service, team_service};
use crate::utils::DocumentStore;
use lazy_static::lazy_static;
use log::{error, info, warn};
use regex::Regex;

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email.trim())
}

// Flip stale pending invitations to expired as they are read
fn refresh_expiry(store: &DocumentStore, invitations: Vec<Invitation>) -> Result<Vec<Invitation>, ServiceError> {
    let mut refreshed = Vec::with_capacity(invitations.len());
    for mut invitation in invitations {
        if invitation.status == InvitationStatus::Pending && invitation.is_expired() {
            invitation.status = InvitationStatus::Expired;
            store.save(&invitation)?;
        }
        refreshed.push(invitation);
    }
    refreshed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(refreshed)
}

fn find_invitation(store: &DocumentStore, invitation_id: &str) -> Result<Invitation, ServiceError> {
    store.find::<Invitation>(invitation_id)?.ok_or_else(|| {
        error!("❌ Invitation not found: {}", invitation_id);
        ServiceError::NotFound
    })
}

// Delete an invitation with its team_invite notifications
pub(crate) fn remove_invitation(store: &DocumentStore, invitation: &Invitation) -> Result<(), ServiceError> {
    store.delete::<Invitation>(&invitation.id)?;
    store.delete_where::<Notification, _>(|n| {
        n.notification_type == NotificationType::TeamInvite
            && n.metadata.invitation_id.as_deref() == Some(invitation.id.as_str())
    })?;
    Ok(())
}

pub async fn invite(
    store: &DocumentStore,
    mailer: &EmailClient,
    caller: &User,
    team_id: &str,
    email: &str,
    role: Role,
) -> Result<Invitation, ServiceError> {
    let team = team_service::find_team(store, team_id)?;
    if !team_service::can_manage(caller, &team) {
        error!("❌ User does not have permission to invite to team: {}", team_id);
        return Err(ServiceError::Forbidden);
    }

    if !is_valid_email(email) {
        return Err(ServiceError::BadRequest(format!("Invalid email address: {}", email)));
    }
    let email = normalize_email(email);

    info!("📧 Creating invitation to team: {} for email: {}", team_id, email);

    let (invitation, invited_user) = store.transaction(|store| {
        let invited_user = store.find_one::<User, _>(|user| normalize_email(&user.email) == email)?;
        if let Some(user) = &invited_user {
            if team_service::is_member(store, &user.id, team_id)? {
                return Err(ServiceError::Conflict("User is already a member of the team".to_string()));
            }
        }

        let pending = store.find_one::<Invitation, _>(|inv| {
            inv.team_id == team_id && inv.is_for(&email) && inv.status == InvitationStatus::Pending && !inv.is_expired()
        })?;
        if pending.is_some() {
            return Err(ServiceError::Conflict(
                "An invitation for this user to this team already exists".to_string(),
            ));
        }

        let invitation = Invitation::new(team.id.clone(), team.name.clone(), email.clone(), caller.id.clone(), role);
        store.save(&invitation)?;

        notification_service::add_notification(
            store,
            NewNotification {
                user_id: None,
                email: Some(email.clone()),
                title: "New team invitation".to_string(),
                message: format!("You have been invited to join the team: {}", team.name),
                notification_type: NotificationType::TeamInvite,
                metadata: NotificationMetadata {
                    team_id: Some(team.id.clone()),
                    invitation_id: Some(invitation.id.clone()),
                    ..Default::default()
                },
            },
        )?;

        Ok((invitation, invited_user))
    })?;

    let kind = match invited_user {
        Some(_) => InvitationKind::SignIn,
        None => InvitationKind::SignUp,
    };
    if let Err(e) = mailer.send_invitation(&email, &team.name, role, kind).await {
        // The invitation stands even when the email does not go out
        warn!("✉️ Invitation {} stored but email failed: {}", invitation.id, e);
    }

    info!("✅ Invitation created: {}", invitation.id);
    Ok(invitation)
}

pub fn team_invitations(store: &DocumentStore, caller: &User, team_id: &str) -> Result<Vec<Invitation>, ServiceError> {
    let team = team_service::find_team(store, team_id)?;
    if !team_service::can_manage(caller, &team) {
        return Err(ServiceError::Forbidden);
    }

    let invitations = store.find_where::<Invitation, _>(|inv| inv.team_id == team_id)?;
    refresh_expiry(store, invitations)
}

pub fn my_invitations(store: &DocumentStore, user: &User) -> Result<Vec<Invitation>, ServiceError> {
    let invitations = store.find_where::<Invitation, _>(|inv| inv.is_for(&user.email))?;
    refresh_expiry(store, invitations)
}

pub fn accept(store: &DocumentStore, user: &User, invitation_id: &str) -> Result<TeamMember, ServiceError> {
    let (team, member) = store.transaction(|store| {
        let mut invitation = find_invitation(store, invitation_id)?;

        if !invitation.is_for(&user.email) {
            error!("❌ Invitation is not for this user");
            return Err(ServiceError::Forbidden);
        }
        if invitation.status != InvitationStatus::Pending {
            return Err(ServiceError::BadRequest(format!(
                "Invitation is already {}",
                invitation.status.as_str()
            )));
        }
        if invitation.is_expired() {
            invitation.status = InvitationStatus::Expired;
            store.save(&invitation)?;
            return Err(ServiceError::BadRequest("Invitation has expired".to_string()));
        }

        let team = team_service::find_team(store, &invitation.team_id)?;
        if team_service::membership(store, &user.id)?.is_some() {
            return Err(ServiceError::Conflict("User already belongs to a team".to_string()));
        }

        // Invitation is removed before the membership is written
        remove_invitation(store, &invitation)?;
        let member = team_service::join_team(store, &team, &user.id, invitation.role)?;
        Ok((team, member))
    })?;

    notification_service::add_notification(
        store,
        NewNotification {
            user_id: Some(team.leader_id.clone()),
            email: None,
            title: "New team member".to_string(),
            message: format!("{} joined the team {}", user.display_name(), team.name),
            notification_type: NotificationType::TeamJoined,
            metadata: NotificationMetadata {
                team_id: Some(team.id.clone()),
                ..Default::default()
            },
        },
    )?;

    info!("✅ Invitation {} accepted by {}", invitation_id, user.id);
    Ok(member)
}

pub fn refuse(store: &DocumentStore, user: &User, invitation_id: &str) -> Result<(), ServiceError> {
    let invitation = find_invitation(store, invitation_id)?;
    if !invitation.is_for(&user.email) {
        return Err(ServiceError::Forbidden);
    }

    remove_invitation(store, &invitation)?;
    info!("🚫 Invitation {} refused by {}", invitation_id, user.id);
    Ok(())
}

// Withdrawn by the team leader or an admin
pub fn cancel(store: &DocumentStore, caller: &User, invitation_id: &str) -> Result<(), ServiceError> {
    let invitation = find_invitation(store, invitation_id)?;
    let team = team_service::find_team(store, &invitation.team_id)?;
    if !team_service::can_manage(caller, &team) && invitation.invited_by != caller.id {
        error!("❌ User does not have permission to delete this invitation");
        return Err(ServiceError::Forbidden);
    }

    remove_invitation(store, &invitation)?;
    info!("🗑️ Invitation {} cancelled", invitation_id);
    Ok(())
}
