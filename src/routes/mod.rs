// src/routes/mod.rs
pub mod access_log_routes;
pub mod auth_routes;
pub mod index_routes;
pub mod invitation_routes;
pub mod notification_routes;
pub mod team_routes;
pub mod vacation_routes;
