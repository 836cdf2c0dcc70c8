use crate::domain::model::Election;
use crate::domain::ports::CurrentElectionPolicy;
use chrono::{Duration, NaiveDate, Utc};

/// 投票日過後仍視為 current 的天數
pub const CURRENT_PAST_DAYS: i64 = 20;

/// 預設的 current 判斷：手動覆寫優先，否則投票日不早於 `today - past_days`
#[derive(Debug, Clone, Copy)]
pub struct PollDateWindow {
    today: NaiveDate,
    past_days: i64,
}

impl PollDateWindow {
    pub fn new(today: NaiveDate, past_days: i64) -> Self {
        Self { today, past_days }
    }

    pub fn today() -> Self {
        Self::new(Utc::now().date_naive(), CURRENT_PAST_DAYS)
    }

    pub fn with_past_days(mut self, past_days: i64) -> Self {
        self.past_days = past_days;
        self
    }
}

impl CurrentElectionPolicy for PollDateWindow {
    fn is_current(&self, election: &Election) -> bool {
        if let Some(current) = election.current {
            return current;
        }
        let recent_past = self.today - Duration::days(self.past_days);
        election.poll_open_date >= recent_past
    }
}
