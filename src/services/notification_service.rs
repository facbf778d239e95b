// holiflow-service/src/services/notification_service.rs
use crate::models::{
    normalize_email, NewNotification, Notification, NotificationFeed, NotificationType,
    ServiceError, User,
};
use crate::utils::DocumentStore;
use chrono::Utc;
use log::{error, info};
use uuid::Uuid;

pub fn add_notification(store: &DocumentStore, new: NewNotification) -> Result<Notification, ServiceError> {
    let notification = Notification {
        id: Uuid::new_v4().to_string(),
        user_id: new.user_id,
        email: new.email.map(|email| normalize_email(&email)),
        title: new.title,
        message: new.message,
        notification_type: new.notification_type,
        read: false,
        created_at: Utc::now(),
        metadata: new.metadata,
    };

    store.save(&notification)?;
    info!("🔔 Notification {:?} created: {}", notification.notification_type, notification.id);
    Ok(notification)
}

fn addressed_to(notification: &Notification, user: &User) -> bool {
    notification.user_id.as_deref() == Some(user.id.as_str())
        || notification.email.as_deref() == Some(normalize_email(&user.email).as_str())
}

// Both feeds for a user, newest first
pub fn notifications_for(store: &DocumentStore, user: &User) -> Result<NotificationFeed, ServiceError> {
    let email = normalize_email(&user.email);
    let mut by_id = Vec::new();
    let mut by_email = Vec::new();

    for notification in store.list::<Notification>()? {
        if notification.user_id.as_deref() == Some(user.id.as_str()) {
            by_id.push(notification);
        } else if notification.email.as_deref() == Some(email.as_str()) {
            by_email.push(notification);
        }
    }

    by_id.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    by_email.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(NotificationFeed {
        unread_by_id: by_id.iter().filter(|n| !n.read).count(),
        unread_by_email: by_email.iter().filter(|n| !n.read).count(),
        by_id,
        by_email,
    })
}

fn find_owned(store: &DocumentStore, user: &User, notification_id: &str) -> Result<Notification, ServiceError> {
    let notification = store.find::<Notification>(notification_id)?.ok_or(ServiceError::NotFound)?;

    if !addressed_to(&notification, user) {
        error!("❌ Notification {} is not addressed to user {}", notification_id, user.id);
        return Err(ServiceError::Forbidden);
    }

    Ok(notification)
}

pub fn mark_as_read(store: &DocumentStore, user: &User, notification_id: &str) -> Result<Notification, ServiceError> {
    let mut notification = find_owned(store, user, notification_id)?;
    if !notification.read {
        notification.read = true;
        store.save(&notification)?;
    }
    Ok(notification)
}

// Returns how many notifications changed
pub fn mark_all_as_read(store: &DocumentStore, user: &User) -> Result<usize, ServiceError> {
    let unread = store.find_where::<Notification, _>(|n| !n.read && addressed_to(n, user))?;
    for mut notification in unread.iter().cloned() {
        notification.read = true;
        store.save(&notification)?;
    }

    info!("✅ Marked {} notifications as read for user: {}", unread.len(), user.id);
    Ok(unread.len())
}

pub fn delete_notification(store: &DocumentStore, user: &User, notification_id: &str) -> Result<(), ServiceError> {
    find_owned(store, user, notification_id)?;
    store.delete::<Notification>(notification_id)?;
    Ok(())
}

// Remove notifications linked to a vacation, optionally only of one type
pub fn delete_for_vacation(
    store: &DocumentStore,
    vacation_id: &str,
    notification_type: Option<NotificationType>,
) -> Result<usize, ServiceError> {
    store.delete_where::<Notification, _>(|n| {
        n.metadata.vacation_id.as_deref() == Some(vacation_id)
            && notification_type.map_or(true, |kind| n.notification_type == kind)
    })
}
