// src/common/recurrence.rs

use chrono::{DateTime, Duration, Utc};

/// Quantas ocorrências um orçamento recorrente gera. Regra fixa de negócio.
pub const RECURRING_OCCURRENCES: u32 = 4;

/// Intervalo entre ocorrências de um orçamento recorrente.
pub const RECURRENCE_INTERVAL_DAYS: i64 = 7;

/// Orçamento avulso vira 1 agendamento; recorrente vira 4.
pub fn calculate_recurrence_count(is_recurring: bool) -> u32 {
    if is_recurring { RECURRING_OCCURRENCES } else { 1 }
}

/// Datas de cada ocorrência, começando em `first` e espaçadas semanalmente.
pub fn occurrence_dates(first: DateTime<Utc>, is_recurring: bool) -> Vec<DateTime<Utc>> {
    (0..calculate_recurrence_count(is_recurring))
        .map(|i| first + Duration::days(RECURRENCE_INTERVAL_DAYS * i64::from(i)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn non_recurring_is_one_occurrence() {
        assert_eq!(calculate_recurrence_count(false), 1);
    }

    #[test]
    fn recurring_is_four_occurrences() {
        assert_eq!(calculate_recurrence_count(true), 4);
    }

    #[test]
    fn only_one_or_four_are_possible() {
        for flag in [false, true] {
            assert!(matches!(calculate_recurrence_count(flag), 1 | 4));
        }
    }

    #[test]
    fn occurrences_are_weekly() {
        let first = Utc.with_ymd_and_hms(2025, 3, 3, 14, 0, 0).unwrap();
        let dates = occurrence_dates(first, true);

        assert_eq!(dates.len(), 4);
        assert_eq!(dates[0], first);
        assert_eq!(dates[3], Utc.with_ymd_and_hms(2025, 3, 24, 14, 0, 0).unwrap());
        assert_eq!(occurrence_dates(first, false), vec![first]);
    }
}
