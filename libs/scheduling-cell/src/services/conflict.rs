// libs/scheduling-cell/src/services/conflict.rs
use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{SchedulingError, TimeSlot};
use crate::store::AppointmentStore;

/// Checks a candidate slot against existing appointments for the same
/// doctor and, when a room is requested, the same room.
pub struct ConflictService {
    appointments: Arc<dyn AppointmentStore>,
}

impl ConflictService {
    pub fn new(appointments: Arc<dyn AppointmentStore>) -> Self {
        Self { appointments }
    }

    /// Ids of appointments whose [start, end) overlaps the candidate slot.
    /// Any overlap is a hard conflict; an empty result means bookable.
    /// `exclude_appointment_id` keeps a rescheduled appointment from
    /// conflicting with itself.
    pub async fn find_conflicts(
        &self,
        doctor_id: Uuid,
        room_id: Option<Uuid>,
        slot: &TimeSlot,
        exclude_appointment_id: Option<Uuid>,
    ) -> Result<Vec<Uuid>, SchedulingError> {
        debug!(
            "Checking conflicts for doctor {} from {} to {}",
            doctor_id,
            slot.start(),
            slot.end()
        );

        let candidates = self
            .appointments
            .appointments_in_range(doctor_id, room_id, *slot)
            .await?;

        let conflicting: Vec<Uuid> = candidates
            .into_iter()
            .filter(|apt| Some(apt.id) != exclude_appointment_id)
            .filter(|apt| apt.status.blocks_slot())
            .filter(|apt| apt.slot().overlaps(slot))
            .map(|apt| apt.id)
            .collect();

        if !conflicting.is_empty() {
            warn!(
                "Conflict detected for doctor {} - {} overlapping appointment(s)",
                doctor_id,
                conflicting.len()
            );
        }

        Ok(conflicting)
    }
}
