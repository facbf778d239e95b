use super::{bearer, seed_user, test_state};
use crate::models::{
    Invitation, InvitationStatus, Notification, NotificationType, Role, Team, TeamMember, User,
};
use actix_web::http::StatusCode;
use actix_web::test;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::sync::{Arc, Barrier};
use std::thread;

#[actix_rt::test]
async fn test_only_leaders_create_teams() {
    let state = test_state();
    let app = test_app!(state);
    let (_, member_token) = seed_user(&state.store, "sofia@example.com", "Sofia", Role::Collaborator);
    let (leader, leader_token) = seed_user(&state.store, "pedro@example.com", "Pedro", Role::TeamLeader);

    let request = test::TestRequest::post()
        .uri("/teams")
        .insert_header(bearer(&member_token))
        .set_json(&json!({ "name": "Design" }))
        .to_request();
    assert_eq!(test::call_service(&app, request).await.status(), StatusCode::FORBIDDEN);

    let request = test::TestRequest::post()
        .uri("/teams")
        .insert_header(bearer(&leader_token))
        .set_json(&json!({ "name": "  Design  " }))
        .to_request();
    let team: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(team["name"], "Design");
    assert_eq!(team["leader_id"], leader.id.as_str());

    // A leader runs a single team
    let request = test::TestRequest::post()
        .uri("/teams")
        .insert_header(bearer(&leader_token))
        .set_json(&json!({ "name": "Second" }))
        .to_request();
    assert_eq!(test::call_service(&app, request).await.status(), StatusCode::CONFLICT);

    let request = test::TestRequest::get()
        .uri("/teams/mine")
        .insert_header(bearer(&leader_token))
        .to_request();
    let mine: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(mine["id"], team["id"]);

    let stored = state.store.find::<User>(&leader.id).unwrap().unwrap();
    assert_eq!(stored.team_id.as_deref(), team["id"].as_str());
}

#[actix_rt::test]
async fn test_invitation_accept_flow() {
    let state = test_state();
    let app = test_app!(state);
    let (leader, leader_token) = seed_user(&state.store, "pedro@example.com", "Pedro", Role::TeamLeader);
    let (joana, joana_token) = seed_user(&state.store, "joana@example.com", "Joana", Role::Collaborator);
    let team = crate::services::team_service::create_team(&state.store, &leader, "Design").unwrap();

    let request = test::TestRequest::post()
        .uri(&format!("/teams/{}/invitations", team.id))
        .insert_header(bearer(&leader_token))
        .set_json(&json!({ "email": "Joana@Example.com" }))
        .to_request();
    let invitation: Invitation = test::call_and_read_body_json(&app, request).await;
    assert_eq!(invitation.email, "joana@example.com");
    assert_eq!(invitation.status, InvitationStatus::Pending);
    assert_eq!(invitation.team_name, "Design");

    // Same address again while the first one is pending
    let request = test::TestRequest::post()
        .uri(&format!("/teams/{}/invitations", team.id))
        .insert_header(bearer(&leader_token))
        .set_json(&json!({ "email": "joana@example.com" }))
        .to_request();
    assert_eq!(test::call_service(&app, request).await.status(), StatusCode::CONFLICT);

    let request = test::TestRequest::get()
        .uri("/notifications")
        .insert_header(bearer(&joana_token))
        .to_request();
    let feed: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(feed["unread_by_email"], 1);
    assert_eq!(feed["by_email"][0]["notification_type"], "team_invite");

    let request = test::TestRequest::get()
        .uri("/invitations")
        .insert_header(bearer(&joana_token))
        .to_request();
    let mine: Vec<Invitation> = test::call_and_read_body_json(&app, request).await;
    assert_eq!(mine.len(), 1);

    let request = test::TestRequest::post()
        .uri(&format!("/invitations/{}/accept", invitation.id))
        .insert_header(bearer(&joana_token))
        .to_request();
    let accepted: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(accepted["invitation"]["status"], "accepted");
    assert_eq!(accepted["member"]["team_id"], team.id.as_str());

    // The invitation and its notification are gone; the leader hears about it
    assert!(state.store.find::<Invitation>(&invitation.id).unwrap().is_none());
    let leftovers = state
        .store
        .find_where::<Notification, _>(|n| n.email.as_deref() == Some("joana@example.com"))
        .unwrap();
    assert!(leftovers.is_empty());

    let request = test::TestRequest::get()
        .uri("/notifications")
        .insert_header(bearer(&leader_token))
        .to_request();
    let feed: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(feed["by_id"][0]["notification_type"], "team_joined");

    let request = test::TestRequest::get()
        .uri(&format!("/teams/{}/members", team.id))
        .insert_header(bearer(&joana_token))
        .to_request();
    let members: Vec<Value> = test::call_and_read_body_json(&app, request).await;
    assert_eq!(members.len(), 2);

    let stored = state.store.find::<User>(&joana.id).unwrap().unwrap();
    assert_eq!(stored.team_id.as_deref(), Some(team.id.as_str()));
}

#[actix_rt::test]
async fn test_invitation_permissions_and_refusal() {
    let state = test_state();
    let app = test_app!(state);
    let (leader, _) = seed_user(&state.store, "pedro@example.com", "Pedro", Role::TeamLeader);
    let (_, outsider_token) = seed_user(&state.store, "tiago@example.com", "Tiago", Role::TeamLeader);
    let (_, rita_token) = seed_user(&state.store, "rita@example.com", "Rita", Role::Collaborator);
    let team = crate::services::team_service::create_team(&state.store, &leader, "Ops").unwrap();

    let request = test::TestRequest::post()
        .uri(&format!("/teams/{}/invitations", team.id))
        .insert_header(bearer(&outsider_token))
        .set_json(&json!({ "email": "rita@example.com" }))
        .to_request();
    assert_eq!(test::call_service(&app, request).await.status(), StatusCode::FORBIDDEN);

    let invitation = Invitation::new(
        team.id.clone(),
        team.name.clone(),
        "rita@example.com".to_string(),
        leader.id.clone(),
        Role::Collaborator,
    );
    state.store.save(&invitation).unwrap();

    // Only the invited address may answer
    let request = test::TestRequest::post()
        .uri(&format!("/invitations/{}/accept", invitation.id))
        .insert_header(bearer(&outsider_token))
        .to_request();
    assert_eq!(test::call_service(&app, request).await.status(), StatusCode::FORBIDDEN);

    let request = test::TestRequest::post()
        .uri(&format!("/invitations/{}/refuse", invitation.id))
        .insert_header(bearer(&rita_token))
        .to_request();
    let refused: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(refused["status"], "rejected");
    assert!(state.store.find::<Invitation>(&invitation.id).unwrap().is_none());
    assert!(state.store.find_one::<TeamMember, _>(|m| m.team_id == team.id && m.user_id != leader.id).unwrap().is_none());
}

#[actix_rt::test]
async fn test_expired_invitation_cannot_be_accepted() {
    let state = test_state();
    let app = test_app!(state);
    let (leader, _) = seed_user(&state.store, "pedro@example.com", "Pedro", Role::TeamLeader);
    let (_, rita_token) = seed_user(&state.store, "rita@example.com", "Rita", Role::Collaborator);
    let team = crate::services::team_service::create_team(&state.store, &leader, "Ops").unwrap();

    let mut invitation = Invitation::new(
        team.id.clone(),
        team.name.clone(),
        "rita@example.com".to_string(),
        leader.id.clone(),
        Role::Collaborator,
    );
    invitation.created_at = Utc::now() - Duration::days(10);
    invitation.expires_at = Utc::now() - Duration::days(3);
    state.store.save(&invitation).unwrap();

    let request = test::TestRequest::get()
        .uri("/invitations")
        .insert_header(bearer(&rita_token))
        .to_request();
    let mine: Vec<Invitation> = test::call_and_read_body_json(&app, request).await;
    assert_eq!(mine[0].status, InvitationStatus::Expired);

    let request = test::TestRequest::post()
        .uri(&format!("/invitations/{}/accept", invitation.id))
        .insert_header(bearer(&rita_token))
        .to_request();
    assert_eq!(test::call_service(&app, request).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_team_management() {
    let state = test_state();
    let app = test_app!(state);
    let (leader, leader_token) = seed_user(&state.store, "pedro@example.com", "Pedro", Role::TeamLeader);
    let (member, member_token) = seed_user(&state.store, "luis@example.com", "Luis", Role::Collaborator);
    let store = &state.store;
    let team = crate::services::team_service::create_team(store, &leader, "Ops").unwrap();
    crate::services::team_service::add_member(store, &team, &member, Role::Collaborator).unwrap();

    let request = test::TestRequest::put()
        .uri(&format!("/teams/{}", team.id))
        .insert_header(bearer(&member_token))
        .set_json(&json!({ "name": "Hijacked" }))
        .to_request();
    assert_eq!(test::call_service(&app, request).await.status(), StatusCode::FORBIDDEN);

    let request = test::TestRequest::delete()
        .uri(&format!("/teams/{}/members/{}", team.id, leader.id))
        .insert_header(bearer(&leader_token))
        .to_request();
    assert_eq!(test::call_service(&app, request).await.status(), StatusCode::BAD_REQUEST);

    let request = test::TestRequest::get()
        .uri("/dashboard")
        .insert_header(bearer(&member_token))
        .to_request();
    let stats: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(stats["total_members"], 2);
    assert_eq!(stats["pending_requests"], 0);

    crate::services::invitation_service::invite(
        store,
        &state.mailer,
        &leader,
        &team.id,
        "zeca@example.com",
        Role::Collaborator,
    )
    .await
    .unwrap();

    let request = test::TestRequest::delete()
        .uri(&format!("/teams/{}", team.id))
        .insert_header(bearer(&leader_token))
        .to_request();
    let deleted: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(deleted["members_removed"], 2);

    let stored = store.find::<User>(&member.id).unwrap().unwrap();
    assert_eq!(stored.team_id, None);
    assert!(store.list::<TeamMember>().unwrap().is_empty());

    // No invitation, and no invite notification pointing at the deleted team
    assert!(store.list::<Invitation>().unwrap().is_empty());
    let invites = store
        .find_where::<Notification, _>(|n| n.notification_type == NotificationType::TeamInvite)
        .unwrap();
    assert!(invites.is_empty());
}

#[::core::prelude::v1::test]
fn test_concurrent_team_creation_keeps_one_team_per_leader() {
    let state = test_state();
    let (leader, _) = seed_user(&state.store, "pedro@example.com", "Pedro", Role::TeamLeader);

    let barrier = Arc::new(Barrier::new(2));
    let workers: Vec<_> = ["North", "South"]
        .into_iter()
        .map(|name| {
            let store = state.store.clone();
            let leader = leader.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                crate::services::team_service::create_team(&store, &leader, name)
            })
        })
        .collect();

    let outcomes: Vec<_> = workers.into_iter().map(|worker| worker.join().unwrap()).collect();
    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
    assert_eq!(state.store.list::<Team>().unwrap().len(), 1);
    assert_eq!(state.store.list::<TeamMember>().unwrap().len(), 1);
}

#[actix_rt::test]
async fn test_accept_after_joining_elsewhere_keeps_the_invitation() {
    let state = test_state();
    let app = test_app!(state);
    let store = &state.store;
    let (north_leader, _) = seed_user(store, "ana@example.com", "Ana", Role::TeamLeader);
    let (south_leader, _) = seed_user(store, "rui@example.com", "Rui", Role::TeamLeader);
    let (rita, rita_token) = seed_user(store, "rita@example.com", "Rita", Role::Collaborator);
    let north = crate::services::team_service::create_team(store, &north_leader, "North").unwrap();
    let south = crate::services::team_service::create_team(store, &south_leader, "South").unwrap();

    let invitation = Invitation::new(
        south.id.clone(),
        south.name.clone(),
        "rita@example.com".to_string(),
        south_leader.id.clone(),
        Role::Collaborator,
    );
    store.save(&invitation).unwrap();
    crate::services::team_service::add_member(store, &north, &rita, Role::Collaborator).unwrap();

    let request = test::TestRequest::post()
        .uri(&format!("/invitations/{}/accept", invitation.id))
        .insert_header(bearer(&rita_token))
        .to_request();
    assert_eq!(test::call_service(&app, request).await.status(), StatusCode::CONFLICT);

    // Nothing was half-applied
    assert!(store.find::<Invitation>(&invitation.id).unwrap().is_some());
    let stored = store.find::<User>(&rita.id).unwrap().unwrap();
    assert_eq!(stored.team_id.as_deref(), Some(north.id.as_str()));
    assert_eq!(
        store.find_where::<TeamMember, _>(|m| m.user_id == rita.id).unwrap().len(),
        1
    );
}
