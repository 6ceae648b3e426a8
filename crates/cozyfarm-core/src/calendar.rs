//! Calendar-day arithmetic.
//!
//! Every game rule works at day granularity: time-of-day is discarded before
//! comparing two instants. An operation captures "now" once through
//! [`Calendar::today`] and asks all of its questions against that single
//! [`Today`], so a transaction straddling midnight still sees one date.

use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Utc};
use tracing::debug;

use crate::error::ValidationError;

/// Source of the current instant.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Used by tests and simulations.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = at;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }

    pub fn advance_days(&self, days: i64) {
        self.advance(Duration::days(days));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Whole calendar days since an event, or `Never` when it has not happened.
///
/// `Never` orders above every finite count, so `elapsed <= DaysElapsed::Days(3)`
/// is false for an animal that was never checked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DaysElapsed {
    Days(u32),
    Never,
}

impl DaysElapsed {
    /// True when the event happened at most `limit` days ago.
    pub fn within(self, limit: u32) -> bool {
        matches!(self, DaysElapsed::Days(d) if d <= limit)
    }

    pub fn days(self) -> Option<u32> {
        match self {
            DaysElapsed::Days(d) => Some(d),
            DaysElapsed::Never => None,
        }
    }
}

impl fmt::Display for DaysElapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaysElapsed::Days(d) => write!(f, "{d}d"),
            DaysElapsed::Never => f.write_str("never"),
        }
    }
}

/// Day boundaries for game rules, anchored at a fixed UTC offset.
#[derive(Debug, Clone)]
pub struct Calendar {
    clock: Arc<dyn Clock>,
    offset: FixedOffset,
}

impl Calendar {
    /// Calendar with UTC day boundaries.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            offset: utc(),
        }
    }

    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    /// Move the day boundary to local midnight at `hours` east of UTC.
    ///
    /// # Errors
    /// Returns an error if the offset is outside `-12..=14`.
    pub fn with_utc_offset_hours(mut self, hours: i32) -> Result<Self, ValidationError> {
        if !(-12..=14).contains(&hours) {
            return Err(ValidationError::InvalidValue {
                field: "calendar.utc_offset_hours".to_string(),
                message: format!("{hours} is outside -12..=14"),
            });
        }
        self.offset = FixedOffset::east_opt(hours * 3600).ok_or_else(|| {
            ValidationError::InvalidValue {
                field: "calendar.utc_offset_hours".to_string(),
                message: format!("{hours} is not a valid offset"),
            }
        })?;
        Ok(self)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Capture the current instant and its calendar date.
    pub fn today(&self) -> Today {
        Today::at(self.clock.now(), self.offset)
    }

    pub fn is_today(&self, at: Option<DateTime<Utc>>) -> bool {
        self.today().contains(at)
    }

    pub fn days_since(&self, at: Option<DateTime<Utc>>) -> DaysElapsed {
        self.today().days_since(at)
    }
}

/// One captured "now" and the calendar date it falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Today {
    now: DateTime<Utc>,
    date: NaiveDate,
    offset: FixedOffset,
}

impl Today {
    /// Today in UTC for an explicit instant.
    pub fn at_utc(now: DateTime<Utc>) -> Self {
        Self::at(now, utc())
    }

    fn at(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self {
            now,
            date: now.with_timezone(&offset).date_naive(),
            offset,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    fn day_of(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    /// Whether `at` falls on this calendar date. `None` is never today.
    pub fn contains(&self, at: Option<DateTime<Utc>>) -> bool {
        at.is_some_and(|at| self.day_of(at) == self.date)
    }

    /// Whole calendar days between `at` and today.
    ///
    /// Instants later than today (clock skew) count as zero days.
    pub fn days_since(&self, at: Option<DateTime<Utc>>) -> DaysElapsed {
        let Some(at) = at else {
            return DaysElapsed::Never;
        };
        let delta = (self.date - self.day_of(at)).num_days();
        if delta < 0 {
            debug!(%at, today = %self.date, "timestamp lies in the future, treating as today");
            return DaysElapsed::Days(0);
        }
        DaysElapsed::Days(u32::try_from(delta).unwrap_or(u32::MAX))
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}
