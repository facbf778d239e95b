// holiflow-service/src/services/vacation_rules.rs
//
// Pure absence rules: working-day arithmetic, yearly quotas, day grouping.
use crate::models::{
    AbsenceSummary, AbsenceType, DateRange, RuleViolation, VacationDraft, VacationPeriod,
    VacationStatus,
};
use chrono::{Datelike, NaiveDate, Utc, Weekday};
use std::cmp::Ordering;

/// Working days of vacation each person gets per calendar year.
pub const MAX_VACATION_DAYS: u32 = 22;

/// Local holidays each person may take per calendar year.
pub const MAX_LOCAL_HOLIDAYS_PER_YEAR: usize = 1;

pub fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Monday-to-Friday dates in the inclusive range. Empty when `start > end`.
pub fn working_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = start;

    while day <= end {
        if !is_weekend(day) {
            days.push(day);
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    days
}

pub fn working_days_in_year(start: NaiveDate, end: NaiveDate, year: i32) -> u32 {
    working_days(start, end)
        .into_iter()
        .filter(|day| day.year() == year)
        .count() as u32
}

pub fn next_working_day(day: NaiveDate) -> Option<NaiveDate> {
    let mut next = day.succ_opt()?;
    while is_weekend(next) {
        next = next.succ_opt()?;
    }
    Some(next)
}

// Rejected periods never count; the period being edited is left out
fn counts_for(period: &VacationPeriod, user_id: &str, exclude_id: Option<&str>) -> bool {
    period.user_id == user_id
        && period.status != VacationStatus::Rejected
        && exclude_id.map_or(true, |id| period.id != id)
}

/// Vacation working days the user has booked (pending or approved) in `year`.
pub fn used_vacation_days(
    periods: &[VacationPeriod],
    user_id: &str,
    year: i32,
    exclude_id: Option<&str>,
) -> u32 {
    periods
        .iter()
        .filter(|p| p.absence_type == AbsenceType::Vacation && counts_for(p, user_id, exclude_id))
        .map(|p| working_days_in_year(p.start_date, p.end_date, year))
        .sum()
}

pub fn local_holiday_count(
    periods: &[VacationPeriod],
    user_id: &str,
    year: i32,
    exclude_id: Option<&str>,
) -> usize {
    periods
        .iter()
        .filter(|p| p.absence_type == AbsenceType::LocalHoliday && counts_for(p, user_id, exclude_id))
        .filter(|p| p.start_date.year() == year)
        .count()
}

fn leave_days(periods: &[VacationPeriod], user_id: &str, year: i32) -> u32 {
    periods
        .iter()
        .filter(|p| p.absence_type == AbsenceType::Leave && counts_for(p, user_id, None))
        .map(|p| working_days_in_year(p.start_date, p.end_date, year))
        .sum()
}

/// Turn individually picked days into periods.
///
/// Weekend days are dropped, the rest sorted and deduplicated. A day extends
/// the current period when it is the next working day after the period end,
/// so a Friday followed by the next Monday stays one period.
pub fn group_consecutive_days(days: &[NaiveDate]) -> Vec<DateRange> {
    let mut sorted: Vec<NaiveDate> = days.iter().copied().filter(|day| !is_weekend(*day)).collect();
    sorted.sort();
    sorted.dedup();

    let mut periods: Vec<DateRange> = Vec::new();
    for day in sorted {
        match periods.last_mut() {
            Some(current) if next_working_day(current.end) == Some(day) => current.end = day,
            _ => periods.push(DateRange { start: day, end: day }),
        }
    }

    periods
}

/// Check one requested absence against what the user already has booked.
pub fn validate_absence(
    user_id: &str,
    draft: &VacationDraft,
    existing: &[VacationPeriod],
    exclude_id: Option<&str>,
) -> Result<(), RuleViolation> {
    let (start, end) = (draft.start_date, draft.end_date);

    if start > end {
        return Err(RuleViolation::InvalidRange);
    }
    if is_weekend(start) || is_weekend(end) {
        return Err(RuleViolation::WeekendBoundary);
    }

    match draft.absence_type {
        AbsenceType::Vacation => {
            for year in start.year()..=end.year() {
                let used = used_vacation_days(existing, user_id, year, exclude_id);
                let requested = working_days_in_year(start, end, year);
                if used + requested > MAX_VACATION_DAYS {
                    return Err(RuleViolation::VacationQuotaExceeded {
                        year,
                        used,
                        requested,
                        max: MAX_VACATION_DAYS,
                    });
                }
            }
            Ok(())
        }
        AbsenceType::LocalHoliday => {
            if working_days(start, end).len() != 1 {
                return Err(RuleViolation::LocalHolidayTooLong);
            }
            let year = start.year();
            if local_holiday_count(existing, user_id, year, exclude_id) >= MAX_LOCAL_HOLIDAYS_PER_YEAR {
                return Err(RuleViolation::LocalHolidayAlreadyTaken(year));
            }
            Ok(())
        }
        AbsenceType::Leave => Ok(()),
    }
}

/// Validate several new periods together, each one counting against the next.
pub fn validate_batch(
    user_id: &str,
    ranges: &[DateRange],
    absence_type: AbsenceType,
    existing: &[VacationPeriod],
) -> Result<(), RuleViolation> {
    if ranges.is_empty() {
        return Err(RuleViolation::NoDaysSelected);
    }

    let mut considered = existing.to_vec();
    for range in ranges {
        let draft = VacationDraft {
            start_date: range.start,
            end_date: range.end,
            absence_type,
        };
        validate_absence(user_id, &draft, &considered, None)?;
        considered.push(provisional_period(user_id, &draft));
    }

    Ok(())
}

// Stand-in for a period that is about to be created
fn provisional_period(user_id: &str, draft: &VacationDraft) -> VacationPeriod {
    let now = Utc::now();
    VacationPeriod {
        id: String::new(),
        user_id: user_id.to_string(),
        user_name: String::new(),
        team_leader_id: String::new(),
        start_date: draft.start_date,
        end_date: draft.end_date,
        absence_type: draft.absence_type,
        status: VacationStatus::Pending,
        created_at: now,
        updated_at: now,
    }
}

/// Ongoing and upcoming periods first (soonest first), then past ones (latest first).
pub fn sort_for_history(periods: &mut [VacationPeriod], today: NaiveDate) {
    periods.sort_by(|a, b| {
        let a_upcoming = a.end_date >= today;
        let b_upcoming = b.end_date >= today;
        match (a_upcoming, b_upcoming) {
            (true, true) => a.start_date.cmp(&b.start_date),
            (false, false) => b.start_date.cmp(&a.start_date),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
        }
    });
}

pub fn yearly_summary(periods: &[VacationPeriod], user_id: &str, year: i32) -> AbsenceSummary {
    let used = used_vacation_days(periods, user_id, year, None);
    AbsenceSummary {
        year,
        vacation_days_used: used,
        vacation_days_remaining: MAX_VACATION_DAYS.saturating_sub(used),
        local_holidays_used: local_holiday_count(periods, user_id, year, None),
        leave_days: leave_days(periods, user_id, year),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn period(
        id: &str,
        start: NaiveDate,
        end: NaiveDate,
        absence_type: AbsenceType,
        status: VacationStatus,
    ) -> VacationPeriod {
        VacationPeriod {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            user_name: "ana".to_string(),
            team_leader_id: "leader-1".to_string(),
            start_date: start,
            end_date: end,
            absence_type,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn draft(start: NaiveDate, end: NaiveDate, absence_type: AbsenceType) -> VacationDraft {
        VacationDraft {
            start_date: start,
            end_date: end,
            absence_type,
        }
    }

    #[test]
    fn weekends_are_not_working_days() {
        // Monday 3 March 2025 to Sunday 16 March 2025
        assert_eq!(working_days(date(2025, 3, 3), date(2025, 3, 16)).len(), 10);
        assert!(is_weekend(date(2025, 3, 1)));
        assert!(working_days(date(2025, 3, 5), date(2025, 3, 4)).is_empty());
    }

    #[test]
    fn next_working_day_skips_the_weekend() {
        assert_eq!(next_working_day(date(2025, 3, 7)), Some(date(2025, 3, 10)));
        assert_eq!(next_working_day(date(2025, 3, 4)), Some(date(2025, 3, 5)));
    }

    #[test]
    fn picked_days_group_into_periods() {
        let days = vec![
            date(2025, 3, 12),
            date(2025, 3, 4),
            date(2025, 3, 3),
            date(2025, 3, 7),
            date(2025, 3, 8), // Saturday, dropped
            date(2025, 3, 10),
            date(2025, 3, 4), // duplicate
        ];

        let periods = group_consecutive_days(&days);
        assert_eq!(
            periods,
            vec![
                DateRange { start: date(2025, 3, 3), end: date(2025, 3, 4) },
                DateRange { start: date(2025, 3, 7), end: date(2025, 3, 10) },
                DateRange { start: date(2025, 3, 12), end: date(2025, 3, 12) },
            ]
        );
        assert!(group_consecutive_days(&[]).is_empty());
    }

    #[test]
    fn vacation_quota_caps_at_twenty_two_working_days() {
        // Four full working weeks: 20 days
        let existing = vec![period(
            "v1",
            date(2025, 3, 3),
            date(2025, 3, 28),
            AbsenceType::Vacation,
            VacationStatus::Approved,
        )];

        let too_many = draft(date(2025, 4, 1), date(2025, 4, 3), AbsenceType::Vacation);
        assert_eq!(
            validate_absence("user-1", &too_many, &existing, None),
            Err(RuleViolation::VacationQuotaExceeded { year: 2025, used: 20, requested: 3, max: 22 })
        );

        let fits = draft(date(2025, 4, 1), date(2025, 4, 2), AbsenceType::Vacation);
        assert!(validate_absence("user-1", &fits, &existing, None).is_ok());

        // Another person's quota is unaffected
        assert!(validate_absence("user-2", &too_many, &existing, None).is_ok());
    }

    #[test]
    fn rejected_periods_do_not_use_quota() {
        let existing = vec![period(
            "v1",
            date(2025, 3, 3),
            date(2025, 3, 28),
            AbsenceType::Vacation,
            VacationStatus::Rejected,
        )];

        assert_eq!(used_vacation_days(&existing, "user-1", 2025, None), 0);
        let request = draft(date(2025, 4, 1), date(2025, 4, 30), AbsenceType::Vacation);
        assert!(validate_absence("user-1", &request, &existing, None).is_ok());
    }

    #[test]
    fn edited_period_is_not_counted_twice() {
        let existing = vec![period(
            "v1",
            date(2025, 3, 3),
            date(2025, 3, 28),
            AbsenceType::Vacation,
            VacationStatus::Pending,
        )];

        // Stretch the same period to 22 days
        let edit = draft(date(2025, 3, 3), date(2025, 4, 1), AbsenceType::Vacation);
        assert!(validate_absence("user-1", &edit, &existing, Some("v1")).is_ok());
        assert!(validate_absence("user-1", &edit, &existing, None).is_err());
    }

    #[test]
    fn periods_spanning_new_year_count_per_year() {
        // Monday 29 Dec 2025 to Friday 2 Jan 2026
        assert_eq!(working_days_in_year(date(2025, 12, 29), date(2026, 1, 2), 2025), 3);
        assert_eq!(working_days_in_year(date(2025, 12, 29), date(2026, 1, 2), 2026), 2);

        let mut existing = vec![period(
            "v1",
            date(2026, 1, 5),
            date(2026, 1, 30),
            AbsenceType::Vacation,
            VacationStatus::Approved,
        )];
        let request = draft(date(2025, 12, 29), date(2026, 1, 2), AbsenceType::Vacation);
        assert!(validate_absence("user-1", &request, &existing, None).is_ok());

        existing.push(period(
            "v2",
            date(2026, 2, 2),
            date(2026, 2, 2),
            AbsenceType::Vacation,
            VacationStatus::Pending,
        ));
        assert_eq!(
            validate_absence("user-1", &request, &existing, None),
            Err(RuleViolation::VacationQuotaExceeded { year: 2026, used: 21, requested: 2, max: 22 })
        );
    }

    #[test]
    fn local_holiday_is_one_day_once_a_year() {
        let two_days = draft(date(2025, 6, 12), date(2025, 6, 13), AbsenceType::LocalHoliday);
        assert_eq!(
            validate_absence("user-1", &two_days, &[], None),
            Err(RuleViolation::LocalHolidayTooLong)
        );

        let one_day = draft(date(2025, 6, 13), date(2025, 6, 13), AbsenceType::LocalHoliday);
        assert!(validate_absence("user-1", &one_day, &[], None).is_ok());

        let existing = vec![period(
            "h1",
            date(2025, 2, 3),
            date(2025, 2, 3),
            AbsenceType::LocalHoliday,
            VacationStatus::Pending,
        )];
        assert_eq!(
            validate_absence("user-1", &one_day, &existing, None),
            Err(RuleViolation::LocalHolidayAlreadyTaken(2025))
        );

        // Next year is a fresh allowance
        let next_year = draft(date(2026, 6, 12), date(2026, 6, 12), AbsenceType::LocalHoliday);
        assert!(validate_absence("user-1", &next_year, &existing, None).is_ok());
    }

    #[test]
    fn invalid_ranges_are_refused() {
        let backwards = draft(date(2025, 3, 10), date(2025, 3, 3), AbsenceType::Leave);
        assert_eq!(validate_absence("user-1", &backwards, &[], None), Err(RuleViolation::InvalidRange));

        let saturday_start = draft(date(2025, 3, 1), date(2025, 3, 4), AbsenceType::Leave);
        assert_eq!(
            validate_absence("user-1", &saturday_start, &[], None),
            Err(RuleViolation::WeekendBoundary)
        );

        let long_leave = draft(date(2025, 1, 6), date(2025, 6, 27), AbsenceType::Leave);
        assert!(validate_absence("user-1", &long_leave, &[], None).is_ok());
    }

    #[test]
    fn batches_count_their_own_periods() {
        let existing = vec![period(
            "v1",
            date(2025, 3, 3),
            date(2025, 3, 28),
            AbsenceType::Vacation,
            VacationStatus::Approved,
        )];
        let ranges = vec![
            DateRange { start: date(2025, 4, 1), end: date(2025, 4, 1) },
            DateRange { start: date(2025, 4, 3), end: date(2025, 4, 4) },
        ];

        assert!(matches!(
            validate_batch("user-1", &ranges, AbsenceType::Vacation, &existing),
            Err(RuleViolation::VacationQuotaExceeded { used: 21, requested: 2, .. })
        ));
        assert!(validate_batch("user-1", &ranges[..1], AbsenceType::Vacation, &existing).is_ok());
        assert_eq!(
            validate_batch("user-1", &[], AbsenceType::Vacation, &existing),
            Err(RuleViolation::NoDaysSelected)
        );
    }

    #[test]
    fn history_lists_upcoming_before_past() {
        let today = date(2025, 5, 15);
        let mut periods = vec![
            period("past-old", date(2025, 1, 6), date(2025, 1, 7), AbsenceType::Vacation, VacationStatus::Approved),
            period("future-far", date(2025, 8, 4), date(2025, 8, 8), AbsenceType::Vacation, VacationStatus::Pending),
            period("past-recent", date(2025, 4, 7), date(2025, 4, 8), AbsenceType::Leave, VacationStatus::Approved),
            period("ongoing", date(2025, 5, 12), date(2025, 5, 16), AbsenceType::Vacation, VacationStatus::Approved),
            period("future-near", date(2025, 6, 2), date(2025, 6, 2), AbsenceType::LocalHoliday, VacationStatus::Pending),
        ];

        sort_for_history(&mut periods, today);
        let order: Vec<&str> = periods.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["ongoing", "future-near", "future-far", "past-recent", "past-old"]);
    }

    #[test]
    fn summary_reports_remaining_days() {
        let periods = vec![
            period("v1", date(2025, 3, 3), date(2025, 3, 7), AbsenceType::Vacation, VacationStatus::Approved),
            period("v2", date(2025, 3, 10), date(2025, 3, 11), AbsenceType::Vacation, VacationStatus::Pending),
            period("v3", date(2025, 3, 12), date(2025, 3, 14), AbsenceType::Vacation, VacationStatus::Rejected),
            period("h1", date(2025, 6, 13), date(2025, 6, 13), AbsenceType::LocalHoliday, VacationStatus::Approved),
            period("l1", date(2025, 9, 1), date(2025, 9, 3), AbsenceType::Leave, VacationStatus::Approved),
        ];

        let summary = yearly_summary(&periods, "user-1", 2025);
        assert_eq!(
            summary,
            AbsenceSummary {
                year: 2025,
                vacation_days_used: 7,
                vacation_days_remaining: 15,
                local_holidays_used: 1,
                leave_days: 3,
            }
        );
    }
}
