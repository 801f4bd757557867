use chrono::{Datelike, NaiveDate};

/// Rule deciding which processed-call rows count toward "this month".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthWindow {
    /// Rows match on month number alone, pooling the same month across years.
    #[default]
    MonthOfYear,
    /// Rows match on (year, month).
    CalendarMonth,
}

impl MonthWindow {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "month_of_year" | "month" => Some(Self::MonthOfYear),
            "calendar_month" | "calendar" | "year_month" => Some(Self::CalendarMonth),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            MonthWindow::MonthOfYear => "month_of_year",
            MonthWindow::CalendarMonth => "calendar_month",
        }
    }

    /// Whether `date` falls in the same window as the `anchor` event date.
    pub fn contains(self, anchor: NaiveDate, date: NaiveDate) -> bool {
        match self {
            MonthWindow::MonthOfYear => anchor.month() == date.month(),
            MonthWindow::CalendarMonth => {
                anchor.year() == date.year() && anchor.month() == date.month()
            }
        }
    }
}
