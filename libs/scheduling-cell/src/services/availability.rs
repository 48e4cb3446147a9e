// libs/scheduling-cell/src/services/availability.rs
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::models::{SchedulingError, TimeOfDayRange, TimeSlot};
use crate::store::AvailabilityStore;

/// Resolves a doctor's recurring and one-off availability rules against a
/// requested time slot.
pub struct AvailabilityService {
    store: Arc<dyn AvailabilityStore>,
}

impl AvailabilityService {
    pub fn new(store: Arc<dyn AvailabilityStore>) -> Self {
        Self { store }
    }

    /// True iff the slot's entire span lies within the doctor's bookable
    /// time on that date. A doctor with no applicable rules is closed.
    pub async fn is_within_availability(
        &self,
        doctor_id: Uuid,
        clinic_id: Option<Uuid>,
        slot: &TimeSlot,
    ) -> Result<bool, SchedulingError> {
        let rules = self.store.rules_for_doctor(doctor_id, clinic_id).await?;

        let date = slot.date();
        let windows: Vec<TimeOfDayRange> = rules
            .iter()
            .filter(|rule| rule.applies_on(date))
            .map(|rule| rule.hours())
            .collect();

        if windows.is_empty() {
            debug!("No availability rules apply for doctor {} on {}", doctor_id, date);
            return Ok(false);
        }

        let (requested_start, requested_end) = slot.time_of_day();
        let covered = merge_windows(windows)
            .iter()
            .any(|window| window.contains(requested_start, requested_end));

        if !covered {
            debug!(
                "Requested span {} - {} outside availability for doctor {} on {}",
                requested_start, requested_end, doctor_id, date
            );
        }

        Ok(covered)
    }
}

/// Rules are additive: overlapping or touching windows merge into one, so a
/// span bridging two adjacent rules still counts as covered.
fn merge_windows(mut windows: Vec<TimeOfDayRange>) -> Vec<TimeOfDayRange> {
    windows.sort_by_key(|window| window.start);

    let mut merged: Vec<TimeOfDayRange> = Vec::with_capacity(windows.len());
    for window in windows {
        match merged.last_mut() {
            Some(last) if window.start <= last.end => {
                if window.end > last.end {
                    last.end = window.end;
                }
            }
            _ => merged.push(window),
        }
    }
    merged
}
