pub mod access_log_service;
pub mod email_service;
pub mod holiday_service;
pub mod invitation_service;
pub mod notification_service;
pub mod team_service;
pub mod vacation_rules;
pub mod vacation_service;
