// libs/scheduling-cell/src/models.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use std::fmt;

// ==============================================================================
// TIME INTERVALS
// ==============================================================================

/// Half-open interval [start, end) over UTC instants.
///
/// Constructed only through [`TimeSlot::new`], so every value in circulation
/// has end > start and lies within a single calendar day. Adjacent slots
/// (end of one == start of the next) do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeSlot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, SchedulingError> {
        if end <= start {
            return Err(SchedulingError::InvalidInterval(format!(
                "end {} is not after start {}",
                end, start
            )));
        }
        // Availability is defined per calendar day; a span touching the next
        // day (even exactly at midnight) cannot be checked against it.
        if start.date_naive() != end.date_naive() {
            return Err(SchedulingError::InvalidInterval(
                "appointment spans more than one calendar day".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn time_of_day(&self) -> (NaiveTime, NaiveTime) {
        (self.start.time(), self.end.time())
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Time-of-day window within one day, half-open like [`TimeSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDayRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeOfDayRange {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, SchedulingError> {
        if start >= end {
            return Err(SchedulingError::InvalidInterval(format!(
                "availability window {} - {} is empty or inverted",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, start: NaiveTime, end: NaiveTime) -> bool {
        start >= self.start && end <= self.end
    }
}

// ==============================================================================
// DIRECTORY ENTITIES
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub full_name: String,
    pub specialties: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clinic {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub clinic_id: Uuid,
    /// Unique within the owning clinic.
    pub code: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ==============================================================================
// AVAILABILITY RULES
// ==============================================================================

/// A doctor's statement of when they can be booked. Rules are purely
/// additive: overlapping or touching rules widen the bookable window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityRule {
    pub id: Uuid,
    pub doctor_id: Uuid,
    /// None means the rule applies at any clinic.
    pub clinic_id: Option<Uuid>,
    pub schedule: Schedule,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Schedule {
    Recurring {
        day_of_week: Weekday,
        hours: TimeOfDayRange,
        valid_from: Option<NaiveDate>,
        valid_to: Option<NaiveDate>,
    },
    OneOff {
        date: NaiveDate,
        hours: TimeOfDayRange,
    },
}

impl AvailabilityRule {
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        match &self.schedule {
            Schedule::Recurring {
                day_of_week,
                valid_from,
                valid_to,
                ..
            } => {
                date.weekday() == *day_of_week
                    && valid_from.map_or(true, |from| date >= from)
                    && valid_to.map_or(true, |to| date <= to)
            }
            Schedule::OneOff { date: rule_date, .. } => *rule_date == date,
        }
    }

    pub fn hours(&self) -> TimeOfDayRange {
        match &self.schedule {
            Schedule::Recurring { hours, .. } | Schedule::OneOff { hours, .. } => *hours,
        }
    }
}

// ==============================================================================
// APPOINTMENTS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub clinic_id: Uuid,
    pub room_id: Option<Uuid>,
    pub scheduled_start: DateTime<Utc>,
    pub scheduled_end: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn slot(&self) -> TimeSlot {
        TimeSlot {
            start: self.scheduled_start,
            end: self.scheduled_end,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    CheckedIn,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    /// Terminal statuses permit no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled | AppointmentStatus::NoShow
        )
    }

    /// Whether the appointment still holds its doctor/room time slot.
    pub fn blocks_slot(&self) -> bool {
        !matches!(
            self,
            AppointmentStatus::Cancelled | AppointmentStatus::NoShow
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::CheckedIn => write!(f, "checked_in"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::NoShow => write!(f, "no_show"),
        }
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub clinic_id: Uuid,
    pub room_id: Option<Uuid>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleAppointmentRequest {
    pub new_start: DateTime<Utc>,
    pub new_end: DateTime<Utc>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulingError {
    #[error("invalid interval: {0}")]
    InvalidInterval(String),

    #[error("requested time is outside the doctor's availability")]
    OutsideAvailability,

    #[error("requested time conflicts with {} existing appointment(s)", .conflicting.len())]
    SchedulingConflict { conflicting: Vec<Uuid> },

    #[error("invalid status transition: {from} -> {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("scheduling lock not acquired within the configured wait")]
    ContentionTimeout,

    #[error("{0} not found")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(String),
}
