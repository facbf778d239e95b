// holiflow-service/src/services/holiday_service.rs
//
// Portuguese national holidays, computed rather than fetched.
use crate::models::{Holiday, HolidayType};
use chrono::{Datelike, Duration, NaiveDate};

const FIXED_HOLIDAYS: [(u32, u32, &str); 10] = [
    (1, 1, "Ano Novo"),
    (4, 25, "Dia da Liberdade"),
    (5, 1, "Dia do Trabalhador"),
    (6, 10, "Dia de Portugal"),
    (8, 15, "Assunção de Nossa Senhora"),
    (10, 5, "Implantação da República"),
    (11, 1, "Dia de Todos os Santos"),
    (12, 1, "Restauração da Independência"),
    (12, 8, "Imaculada Conceição"),
    (12, 25, "Natal"),
];

/// Easter Sunday of the Gregorian calendar (anonymous computus).
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;

    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

// All national holidays of a year, in date order
pub fn holidays_for_year(year: i32) -> Vec<Holiday> {
    let mut holidays: Vec<Holiday> = FIXED_HOLIDAYS
        .iter()
        .filter_map(|(month, day, name)| {
            NaiveDate::from_ymd_opt(year, *month, *day).map(|date| Holiday {
                date,
                name: name.to_string(),
                holiday_type: HolidayType::National,
            })
        })
        .collect();

    if let Some(easter) = easter_sunday(year) {
        let moveable = [
            (easter - Duration::days(2), "Sexta-feira Santa"),
            (easter, "Páscoa"),
            (easter + Duration::days(60), "Corpo de Deus"),
        ];
        holidays.extend(moveable.into_iter().map(|(date, name)| Holiday {
            date,
            name: name.to_string(),
            holiday_type: HolidayType::National,
        }));
    }

    holidays.sort_by_key(|holiday| holiday.date);
    holidays
}

pub fn holiday_name(date: NaiveDate) -> Option<String> {
    holidays_for_year(date.year())
        .into_iter()
        .find(|holiday| holiday.date == date)
        .map(|holiday| holiday.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn easter_dates_match_known_years() {
        assert_eq!(easter_sunday(2024), Some(date(2024, 3, 31)));
        assert_eq!(easter_sunday(2025), Some(date(2025, 4, 20)));
        assert_eq!(easter_sunday(2026), Some(date(2026, 4, 5)));
    }

    #[test]
    fn moveable_feasts_follow_easter() {
        assert_eq!(holiday_name(date(2025, 4, 18)).as_deref(), Some("Sexta-feira Santa"));
        assert_eq!(holiday_name(date(2025, 6, 19)).as_deref(), Some("Corpo de Deus"));
        assert_eq!(holiday_name(date(2025, 12, 25)).as_deref(), Some("Natal"));
        assert_eq!(holiday_name(date(2025, 12, 26)), None);
    }

    #[test]
    fn a_year_has_thirteen_sorted_holidays() {
        let holidays = holidays_for_year(2025);
        assert_eq!(holidays.len(), 13);
        assert!(holidays.windows(2).all(|pair| pair[0].date <= pair[1].date));
        assert!(holidays.iter().all(|h| h.holiday_type == HolidayType::National));
    }
}
