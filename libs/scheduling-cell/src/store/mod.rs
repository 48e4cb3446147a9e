// libs/scheduling-cell/src/store/mod.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    Appointment, AppointmentStatus, AvailabilityRule, Clinic, Doctor, Room, SchedulingError,
    TimeSlot,
};

pub mod memory;

pub use memory::MemoryStore;

/// Read interface over a doctor's availability rules.
#[async_trait]
pub trait AvailabilityStore: Send + Sync {
    /// All rules for the doctor. With a clinic filter, returns rules scoped
    /// to that clinic plus unscoped rules (clinic_id = None).
    async fn rules_for_doctor(
        &self,
        doctor_id: Uuid,
        clinic_id: Option<Uuid>,
    ) -> Result<Vec<AvailabilityRule>, SchedulingError>;
}

/// Read/write interface over persisted appointments. Both updates are
/// atomic single-row operations returning the updated record.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Candidate conflicting appointments: doctor match or (when a room is
    /// given) room match, overlapping the window, restricted to statuses
    /// that still hold their slot.
    async fn appointments_in_range(
        &self,
        doctor_id: Uuid,
        room_id: Option<Uuid>,
        window: TimeSlot,
    ) -> Result<Vec<Appointment>, SchedulingError>;

    async fn get(&self, appointment_id: Uuid) -> Result<Option<Appointment>, SchedulingError>;

    async fn insert(&self, appointment: &Appointment) -> Result<(), SchedulingError>;

    async fn update_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Appointment, SchedulingError>;

    async fn update_slot(
        &self,
        appointment_id: Uuid,
        slot: TimeSlot,
        updated_at: DateTime<Utc>,
    ) -> Result<Appointment, SchedulingError>;
}

/// Lookup interface for the entities a booking request references.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn doctor(&self, doctor_id: Uuid) -> Result<Option<Doctor>, SchedulingError>;

    async fn clinic(&self, clinic_id: Uuid) -> Result<Option<Clinic>, SchedulingError>;

    async fn room(&self, room_id: Uuid) -> Result<Option<Room>, SchedulingError>;
}
