// libs/scheduling-cell/src/store/memory.rs
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::models::{
    Appointment, AppointmentStatus, AvailabilityRule, Clinic, Doctor, Room, SchedulingError,
    TimeSlot,
};
use crate::store::{AppointmentStore, AvailabilityStore, DirectoryStore};

#[derive(Default)]
struct Inner {
    doctors: HashMap<Uuid, Doctor>,
    clinics: HashMap<Uuid, Clinic>,
    rooms: HashMap<Uuid, Room>,
    rules: Vec<AvailabilityRule>,
    appointments: HashMap<Uuid, Appointment>,
}

/// In-memory implementation of the three storage interfaces, sufficient for
/// embedding the scheduler in a single process and for tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_doctor(&self, doctor: Doctor) {
        self.inner.write().await.doctors.insert(doctor.id, doctor);
    }

    pub async fn insert_clinic(&self, clinic: Clinic) {
        self.inner.write().await.clinics.insert(clinic.id, clinic);
    }

    /// Room codes are unique within their clinic.
    pub async fn insert_room(&self, room: Room) -> Result<(), SchedulingError> {
        let mut inner = self.inner.write().await;
        let duplicate = inner
            .rooms
            .values()
            .any(|existing| existing.clinic_id == room.clinic_id && existing.code == room.code);
        if duplicate {
            return Err(SchedulingError::Storage(format!(
                "room code {} already exists in clinic {}",
                room.code, room.clinic_id
            )));
        }
        inner.rooms.insert(room.id, room);
        Ok(())
    }

    pub async fn insert_rule(&self, rule: AvailabilityRule) {
        self.inner.write().await.rules.push(rule);
    }
}

#[async_trait]
impl AvailabilityStore for MemoryStore {
    async fn rules_for_doctor(
        &self,
        doctor_id: Uuid,
        clinic_id: Option<Uuid>,
    ) -> Result<Vec<AvailabilityRule>, SchedulingError> {
        let inner = self.inner.read().await;
        let rules: Vec<AvailabilityRule> = inner
            .rules
            .iter()
            .filter(|rule| rule.doctor_id == doctor_id)
            .filter(|rule| match (clinic_id, rule.clinic_id) {
                (Some(requested), Some(scoped)) => requested == scoped,
                _ => true,
            })
            .cloned()
            .collect();
        debug!("Fetched {} availability rules for doctor {}", rules.len(), doctor_id);
        Ok(rules)
    }
}

#[async_trait]
impl AppointmentStore for MemoryStore {
    async fn appointments_in_range(
        &self,
        doctor_id: Uuid,
        room_id: Option<Uuid>,
        window: TimeSlot,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        let inner = self.inner.read().await;
        let candidates = inner
            .appointments
            .values()
            .filter(|apt| {
                apt.doctor_id == doctor_id
                    || (room_id.is_some() && apt.room_id == room_id)
            })
            .filter(|apt| apt.status.blocks_slot())
            .filter(|apt| apt.slot().overlaps(&window))
            .cloned()
            .collect();
        Ok(candidates)
    }

    async fn get(&self, appointment_id: Uuid) -> Result<Option<Appointment>, SchedulingError> {
        Ok(self.inner.read().await.appointments.get(&appointment_id).cloned())
    }

    async fn insert(&self, appointment: &Appointment) -> Result<(), SchedulingError> {
        let mut inner = self.inner.write().await;
        if inner.appointments.contains_key(&appointment.id) {
            return Err(SchedulingError::Storage(format!(
                "appointment {} already exists",
                appointment.id
            )));
        }
        inner.appointments.insert(appointment.id, appointment.clone());
        Ok(())
    }

    async fn update_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Appointment, SchedulingError> {
        let mut inner = self.inner.write().await;
        let appointment = inner
            .appointments
            .get_mut(&appointment_id)
            .ok_or_else(|| SchedulingError::NotFound("appointment".to_string()))?;
        appointment.status = status;
        appointment.updated_at = updated_at;
        Ok(appointment.clone())
    }

    async fn update_slot(
        &self,
        appointment_id: Uuid,
        slot: TimeSlot,
        updated_at: DateTime<Utc>,
    ) -> Result<Appointment, SchedulingError> {
        let mut inner = self.inner.write().await;
        let appointment = inner
            .appointments
            .get_mut(&appointment_id)
            .ok_or_else(|| SchedulingError::NotFound("appointment".to_string()))?;
        appointment.scheduled_start = slot.start();
        appointment.scheduled_end = slot.end();
        appointment.updated_at = updated_at;
        Ok(appointment.clone())
    }
}

#[async_trait]
impl DirectoryStore for MemoryStore {
    async fn doctor(&self, doctor_id: Uuid) -> Result<Option<Doctor>, SchedulingError> {
        Ok(self.inner.read().await.doctors.get(&doctor_id).cloned())
    }

    async fn clinic(&self, clinic_id: Uuid) -> Result<Option<Clinic>, SchedulingError> {
        Ok(self.inner.read().await.clinics.get(&clinic_id).cloned())
    }

    async fn room(&self, room_id: Uuid) -> Result<Option<Room>, SchedulingError> {
        Ok(self.inner.read().await.rooms.get(&room_id).cloned())
    }
}
