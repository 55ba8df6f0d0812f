// src/catalog.rs

//! Раскладка меню студии: идентификаторы строк таблицы `menu`.

pub const ABOUT: i64 = 1;
pub const EVENTS: i64 = 2;
pub const SERVICES: i64 = 3;
pub const PERSONAL: i64 = 4;
pub const GROUP: i64 = 5;
pub const SCHEDULE: i64 = 6;
pub const PRICING: i64 = 7;
pub const MENTORS: i64 = 8;
pub const RETREATS: i64 = 9;
pub const REVIEWS: i64 = 10;
pub const FAQ: i64 = 11;
pub const CONTACTS: i64 = 12;
pub const LOCATION: i64 = 13;
pub const GENERAL: i64 = 14;
pub const PREGNANCY: i64 = 15;
pub const WEIGHT: i64 = 16;
pub const KIDS: i64 = 17;
pub const REHABILITATION: i64 = 18;
pub const ALL_COMPANY: i64 = 19;
pub const TOP_MASTER: i64 = 20;
pub const STANDARD: i64 = 21;
pub const EXTENDED: i64 = 22;
pub const ALL_PROGRAMS: i64 = 23;

/// Главный экран
pub const MAIN_MENU_ITEMS: [i64; 6] = [GENERAL, PREGNANCY, WEIGHT, KIDS, REHABILITATION, ALL_COMPANY];

/// Форматы занятий внутри "Общих программ"
pub const FORMAT_ITEMS: [i64; 3] = [PERSONAL, GROUP, TOP_MASTER];

/// Групповые занятия по длительности
pub const DURATION_ITEMS: [i64; 2] = [STANDARD, EXTENDED];

/// Разделы подменю "Контакты и расписание"
pub const INFO_ITEMS: [i64; 11] = [
    ABOUT, EVENTS, SERVICES, SCHEDULE, MENTORS, RETREATS, REVIEWS, FAQ, CONTACTS, LOCATION,
    ALL_PROGRAMS,
];

/// Тематические разделы главного меню, чьи программы ищутся и по multiple_menu_ids
pub const LINKED_PROGRAM_SECTIONS: [i64; 4] = [PREGNANCY, WEIGHT, KIDS, REHABILITATION];

/// Фильтр групповых программ по длительности
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationFilter {
    Standard,
    Extended,
}

impl DurationFilter {
    pub fn from_menu_id(menu_id: i64) -> Option<Self> {
        match menu_id {
            STANDARD => Some(Self::Standard),
            EXTENDED => Some(Self::Extended),
            _ => None,
        }
    }

    pub fn matches(self, duration: &str) -> bool {
        match self {
            Self::Standard => duration == "60 мин",
            Self::Extended => matches!(duration, "90 мин" | "120 мин"),
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            Self::Standard => "Выберите программу (60 минут):",
            Self::Extended => "Выберите программу (90-120 минут):",
        }
    }
}

/// Разбирает поле multiple_menu_ids ("15, 16")
pub fn linked_menu_ids(raw: Option<&str>) -> Vec<i64> {
    raw.map(|s| {
        s.split(',')
            .filter_map(|part| part.trim().parse::<i64>().ok())
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_filter() {
        assert_eq!(DurationFilter::from_menu_id(STANDARD), Some(DurationFilter::Standard));
        assert_eq!(DurationFilter::from_menu_id(GROUP), None);
        assert!(DurationFilter::Standard.matches("60 мин"));
        assert!(!DurationFilter::Standard.matches("90 мин"));
        assert!(DurationFilter::Extended.matches("120 мин"));
    }

    #[test]
    fn multiple_menu_ids() {
        assert_eq!(linked_menu_ids(Some("15, 16,x, 18 ")), vec![15, 16, 18]);
        assert!(linked_menu_ids(None).is_empty());
    }
}
