use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use uuid::Uuid;

use scheduling_cell::clock::{Clock, UuidGenerator};
use scheduling_cell::models::{
    Appointment, AppointmentStatus, AvailabilityRule, BookAppointmentRequest, Clinic, Doctor,
    Room, Schedule, TimeOfDayRange,
};
use scheduling_cell::services::BookingService;
use scheduling_cell::store::MemoryStore;
use shared_config::SchedulerConfig;

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn hours(start_h: u32, start_m: u32, end_h: u32, end_m: u32) -> TimeOfDayRange {
    TimeOfDayRange::new(
        NaiveTime::from_hms_opt(start_h, start_m, 0).unwrap(),
        NaiveTime::from_hms_opt(end_h, end_m, 0).unwrap(),
    )
    .unwrap()
}

pub fn recurring_rule(doctor_id: Uuid, day: Weekday, window: TimeOfDayRange) -> AvailabilityRule {
    AvailabilityRule {
        id: Uuid::new_v4(),
        doctor_id,
        clinic_id: None,
        schedule: Schedule::Recurring {
            day_of_week: day,
            hours: window,
            valid_from: None,
            valid_to: None,
        },
    }
}

pub fn appointment(
    doctor_id: Uuid,
    room_id: Option<Uuid>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    status: AppointmentStatus,
) -> Appointment {
    let patient_id = Uuid::new_v4();
    Appointment {
        id: Uuid::new_v4(),
        patient_id,
        doctor_id,
        clinic_id: Uuid::new_v4(),
        room_id,
        scheduled_start: start,
        scheduled_end: end,
        status,
        created_by: patient_id,
        created_at: start,
        updated_at: start,
    }
}

/// One clinic with one room and a doctor available Mondays 09:00-12:00.
/// 2025-01-06 is the Monday the tests book against.
pub struct TestClinic {
    pub store: Arc<MemoryStore>,
    pub booking: BookingService,
    pub doctor_id: Uuid,
    pub clinic_id: Uuid,
    pub room_id: Uuid,
    pub patient_id: Uuid,
}

impl TestClinic {
    pub async fn new() -> Self {
        Self::with_config(SchedulerConfig::default()).await
    }

    pub async fn with_config(config: SchedulerConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let created_at = utc(2025, 1, 1, 0, 0);
        let doctor_id = Uuid::new_v4();
        let clinic_id = Uuid::new_v4();
        let room_id = Uuid::new_v4();

        store
            .insert_doctor(Doctor {
                id: doctor_id,
                full_name: "Dana Okafor".to_string(),
                specialties: vec!["general_practice".to_string()],
                created_at,
            })
            .await;
        store
            .insert_clinic(Clinic {
                id: clinic_id,
                name: "Northside Clinic".to_string(),
                created_at,
            })
            .await;
        store
            .insert_room(Room {
                id: room_id,
                clinic_id,
                code: "R1".to_string(),
                name: None,
                created_at,
            })
            .await
            .expect("room seed");
        store
            .insert_rule(recurring_rule(doctor_id, Weekday::Mon, hours(9, 0, 12, 0)))
            .await;

        let booking = BookingService::with_clock_and_ids(
            &config,
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(FixedClock(utc(2025, 1, 1, 8, 0))),
            Arc::new(UuidGenerator),
        );

        Self {
            store,
            booking,
            doctor_id,
            clinic_id,
            room_id,
            patient_id: Uuid::new_v4(),
        }
    }

    /// Seed another doctor with the same Monday morning hours.
    pub async fn add_doctor(&self, full_name: &str) -> Uuid {
        let doctor_id = Uuid::new_v4();
        self.store
            .insert_doctor(Doctor {
                id: doctor_id,
                full_name: full_name.to_string(),
                specialties: vec![],
                created_at: utc(2025, 1, 1, 0, 0),
            })
            .await;
        self.store
            .insert_rule(recurring_rule(doctor_id, Weekday::Mon, hours(9, 0, 12, 0)))
            .await;
        doctor_id
    }

    pub fn request(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> BookAppointmentRequest {
        BookAppointmentRequest {
            patient_id: self.patient_id,
            doctor_id: self.doctor_id,
            clinic_id: self.clinic_id,
            room_id: Some(self.room_id),
            start,
            end,
            created_by: self.patient_id,
        }
    }
}
