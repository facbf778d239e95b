use chrono::{DateTime, NaiveDate, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceType {
    Vacation,
    LocalHoliday,
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VacationStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VacationPeriod {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub team_leader_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub absence_type: AbsenceType,
    pub status: VacationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VacationPeriod {
    pub fn is_pending(&self) -> bool {
        self.status == VacationStatus::Pending
    }

    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }
}

// Inclusive date range
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

// Body of a create/update request for a single period
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VacationDraft {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub absence_type: AbsenceType,
}

// Individually picked days, grouped server side into periods
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DaysRequest {
    pub days: Vec<NaiveDate>,
    pub absence_type: AbsenceType,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AbsenceSummary {
    pub year: i32,
    pub vacation_days_used: u32,
    pub vacation_days_remaining: u32,
    pub local_holidays_used: usize,
    pub leave_days: u32,
}

// Broken business rules, worded for the person filling the form
#[derive(Debug, Display, Clone, PartialEq)]
pub enum RuleViolation {
    #[display(fmt = "Select at least one day")]
    NoDaysSelected,
    #[display(fmt = "The start date must not be after the end date")]
    InvalidRange,
    #[display(fmt = "Absences cannot start or end on a weekend")]
    WeekendBoundary,
    #[display(fmt = "You can only have {} working days of vacation per year ({} requested, {} already used in {})", max, requested, used, year)]
    VacationQuotaExceeded { year: i32, used: u32, requested: u32, max: u32 },
    #[display(fmt = "Local holidays must be a single day")]
    LocalHolidayTooLong,
    #[display(fmt = "You can only have 1 local holiday per year ({})", _0)]
    LocalHolidayAlreadyTaken(i32),
}
