// libs/scheduling-cell/src/services/booking.rs
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::SchedulerConfig;

use crate::clock::{Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::lock::SlotLockManager;
use crate::models::{
    Appointment, AppointmentStatus, BookAppointmentRequest, RescheduleAppointmentRequest,
    SchedulingError, TimeSlot,
};
use crate::services::availability::AvailabilityService;
use crate::services::conflict::ConflictService;
use crate::services::lifecycle::LifecycleService;
use crate::store::{AppointmentStore, AvailabilityStore, DirectoryStore};

/// Coordinates availability check, conflict check and insert as one atomic
/// unit under the per-doctor/per-room exclusion scope, so at most one
/// booking wins any overlapping doctor/time or room/time combination.
pub struct BookingService {
    directory: Arc<dyn DirectoryStore>,
    appointments: Arc<dyn AppointmentStore>,
    availability: AvailabilityService,
    conflicts: ConflictService,
    lifecycle: LifecycleService,
    locks: SlotLockManager,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    max_appointment_minutes: i64,
}

impl BookingService {
    pub fn new(
        config: &SchedulerConfig,
        directory: Arc<dyn DirectoryStore>,
        availability_store: Arc<dyn AvailabilityStore>,
        appointments: Arc<dyn AppointmentStore>,
    ) -> Self {
        Self::with_clock_and_ids(
            config,
            directory,
            availability_store,
            appointments,
            Arc::new(SystemClock),
            Arc::new(UuidGenerator),
        )
    }

    pub fn with_clock_and_ids(
        config: &SchedulerConfig,
        directory: Arc<dyn DirectoryStore>,
        availability_store: Arc<dyn AvailabilityStore>,
        appointments: Arc<dyn AppointmentStore>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            directory,
            availability: AvailabilityService::new(availability_store),
            conflicts: ConflictService::new(Arc::clone(&appointments)),
            lifecycle: LifecycleService::new(),
            locks: SlotLockManager::new(config.lock_wait()),
            appointments,
            clock,
            ids,
            max_appointment_minutes: config.max_appointment_minutes,
        }
    }

    /// Book a new appointment. Steps, each a precondition for the next:
    /// interval validation, reference checks, exclusion-scope acquisition,
    /// availability check, conflict check, insert with status Scheduled.
    /// A rejection at any step leaves the store untouched.
    pub async fn book_appointment(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        info!(
            "Booking appointment for patient {} with doctor {}",
            request.patient_id, request.doctor_id
        );

        let slot = self.validated_slot(request.start, request.end)?;
        self.verify_references(&request).await?;

        let _scope = self.locks.acquire(request.doctor_id, request.room_id).await?;

        self.check_slot(
            request.doctor_id,
            request.clinic_id,
            request.room_id,
            &slot,
            None,
        )
        .await?;

        let now = self.clock.now();
        let appointment = Appointment {
            id: self.ids.next_id(),
            patient_id: request.patient_id,
            doctor_id: request.doctor_id,
            clinic_id: request.clinic_id,
            room_id: request.room_id,
            scheduled_start: slot.start(),
            scheduled_end: slot.end(),
            status: AppointmentStatus::Scheduled,
            created_by: request.created_by,
            created_at: now,
            updated_at: now,
        };
        self.appointments.insert(&appointment).await?;

        info!(
            "Appointment {} booked for doctor {} from {} to {}",
            appointment.id,
            appointment.doctor_id,
            appointment.scheduled_start,
            appointment.scheduled_end
        );
        Ok(appointment)
    }

    /// Move an existing appointment to a new span through the same
    /// validated pipeline, excluding the appointment from its own conflict
    /// check. The old span is only released by committing the new one, so
    /// a failed reschedule never loses the original slot.
    pub async fn reschedule_appointment(
        &self,
        appointment_id: Uuid,
        request: RescheduleAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        debug!("Rescheduling appointment {}", appointment_id);

        let slot = self.validated_slot(request.new_start, request.new_end)?;
        let current = self.get_appointment(appointment_id).await?;

        if current.status != AppointmentStatus::Scheduled {
            warn!(
                "Reschedule rejected for appointment {} in status {}",
                appointment_id, current.status
            );
            return Err(SchedulingError::InvalidStatusTransition {
                from: current.status,
                to: AppointmentStatus::Scheduled,
            });
        }

        let _scope = self.locks.acquire(current.doctor_id, current.room_id).await?;

        self.check_slot(
            current.doctor_id,
            current.clinic_id,
            current.room_id,
            &slot,
            Some(appointment_id),
        )
        .await?;

        let updated = self
            .appointments
            .update_slot(appointment_id, slot, self.clock.now())
            .await?;

        info!(
            "Appointment {} rescheduled to {} - {}",
            appointment_id,
            updated.scheduled_start,
            updated.scheduled_end
        );
        Ok(updated)
    }

    /// Apply a status transition, validated against the lifecycle rules.
    /// Moving to Cancelled or NoShow releases the slot for future bookings.
    pub async fn transition_status(
        &self,
        appointment_id: Uuid,
        next: AppointmentStatus,
    ) -> Result<Appointment, SchedulingError> {
        let current = self.get_appointment(appointment_id).await?;
        self.lifecycle
            .validate_status_transition(current.status, next)?;

        let updated = self
            .appointments
            .update_status(appointment_id, next, self.clock.now())
            .await?;

        info!(
            "Appointment {} transitioned {} -> {}",
            appointment_id, current.status, next
        );
        Ok(updated)
    }

    /// Cancellation is a status change, never a delete.
    pub async fn cancel_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<Appointment, SchedulingError> {
        self.transition_status(appointment_id, AppointmentStatus::Cancelled)
            .await
    }

    pub async fn get_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<Appointment, SchedulingError> {
        self.appointments
            .get(appointment_id)
            .await?
            .ok_or_else(|| SchedulingError::NotFound("appointment".to_string()))
    }

    /// Conflict probe without booking, for callers that want to inspect a
    /// slot before committing to it.
    pub async fn check_conflicts(
        &self,
        doctor_id: Uuid,
        room_id: Option<Uuid>,
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
        exclude_appointment_id: Option<Uuid>,
    ) -> Result<Vec<Uuid>, SchedulingError> {
        let slot = TimeSlot::new(start, end)?;
        self.conflicts
            .find_conflicts(doctor_id, room_id, &slot, exclude_appointment_id)
            .await
    }

    // ==============================================================================
    // PRIVATE HELPER METHODS
    // ==============================================================================

    fn validated_slot(
        &self,
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    ) -> Result<TimeSlot, SchedulingError> {
        let slot = TimeSlot::new(start, end)?;
        if slot.duration_minutes() > self.max_appointment_minutes {
            return Err(SchedulingError::InvalidInterval(format!(
                "appointment exceeds the maximum of {} minutes",
                self.max_appointment_minutes
            )));
        }
        Ok(slot)
    }

    async fn verify_references(
        &self,
        request: &BookAppointmentRequest,
    ) -> Result<(), SchedulingError> {
        if self.directory.doctor(request.doctor_id).await?.is_none() {
            return Err(SchedulingError::NotFound("doctor".to_string()));
        }
        if self.directory.clinic(request.clinic_id).await?.is_none() {
            return Err(SchedulingError::NotFound("clinic".to_string()));
        }
        if let Some(room_id) = request.room_id {
            let room = self
                .directory
                .room(room_id)
                .await?
                .ok_or_else(|| SchedulingError::NotFound("room".to_string()))?;
            if room.clinic_id != request.clinic_id {
                return Err(SchedulingError::NotFound("room in clinic".to_string()));
            }
        }
        Ok(())
    }

    /// Availability then conflicts, under the already-held exclusion scope.
    async fn check_slot(
        &self,
        doctor_id: Uuid,
        clinic_id: Uuid,
        room_id: Option<Uuid>,
        slot: &TimeSlot,
        exclude_appointment_id: Option<Uuid>,
    ) -> Result<(), SchedulingError> {
        let available = self
            .availability
            .is_within_availability(doctor_id, Some(clinic_id), slot)
            .await?;
        if !available {
            return Err(SchedulingError::OutsideAvailability);
        }

        let conflicting = self
            .conflicts
            .find_conflicts(doctor_id, room_id, slot, exclude_appointment_id)
            .await?;
        if !conflicting.is_empty() {
            return Err(SchedulingError::SchedulingConflict { conflicting });
        }

        Ok(())
    }
}
