use std::sync::{Arc, RwLock, RwLockReadGuard};

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use civic_db::{KeyValueStore, keys};
use civic_types::api::{ComplaintStats, ComplaintUpdate, NewComplaint, NewResponse};
use civic_types::models::{Complaint, Response, StatusType};

use crate::catalog;
use crate::error::{Result, StoreError};
use crate::filter::{ComplaintFilter, same_email};

/// In-memory complaint list mirrored to a key-value store.
///
/// Mutations build the next list, write it under [`keys::COMPLAINTS`] and
/// only then swap it in, so a failed write leaves both sides unchanged.
pub struct ComplaintStore {
    complaints: RwLock<Vec<Complaint>>,
    storage: Arc<dyn KeyValueStore>,
}

impl ComplaintStore {
    /// Load complaints from storage, seeding the sample set when the key is
    /// absent.
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Result<Self> {
        let complaints = match storage.get(keys::COMPLAINTS)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                key: keys::COMPLAINTS.to_string(),
                source,
            })?,
            None => {
                let seeded = catalog::initial_complaints(Utc::now());
                persist(storage.as_ref(), &seeded)?;
                info!("Seeded {} initial complaints", seeded.len());
                seeded
            }
        };

        Ok(Self::from_parts(storage, complaints))
    }

    /// Start from an explicit list without touching storage until the first
    /// mutation.
    pub fn with_complaints(storage: Arc<dyn KeyValueStore>, complaints: Vec<Complaint>) -> Self {
        Self::from_parts(storage, complaints)
    }

    fn from_parts(storage: Arc<dyn KeyValueStore>, complaints: Vec<Complaint>) -> Self {
        Self {
            complaints: RwLock::new(complaints),
            storage,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Complaint>>> {
        self.complaints
            .read()
            .map_err(|_| StoreError::Poisoned("complaint store"))
    }

    /// Apply `f` to a copy of the list, persist the copy, then commit it.
    fn mutate<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Complaint>) -> Result<T>,
    {
        let mut guard = self
            .complaints
            .write()
            .map_err(|_| StoreError::Poisoned("complaint store"))?;

        let mut next = guard.clone();
        let out = f(&mut next)?;
        persist(self.storage.as_ref(), &next)?;
        *guard = next;
        Ok(out)
    }

    pub fn add(&self, data: NewComplaint) -> Result<Complaint> {
        let now = Utc::now();
        let complaint = Complaint {
            id: Uuid::new_v4().to_string(),
            title: data.title,
            description: data.description,
            category: data.category,
            location: data.location,
            citizen_name: data.citizen_name,
            citizen_email: data.citizen_email,
            citizen_phone: data.citizen_phone.filter(|p| !p.trim().is_empty()),
            status: StatusType::New,
            department_assigned: None,
            assigned_to: None,
            created_at: now,
            updated_at: now,
            responses: Vec::new(),
        };

        let created = complaint.clone();
        self.mutate(move |list| {
            list.push(complaint);
            Ok(())
        })?;

        info!("Complaint {} registered ({})", created.id, created.category);
        Ok(created)
    }

    /// Merge `changes` into the complaint and restamp `updated_at`.
    /// Returns `None` when no complaint has this id.
    pub fn update(&self, id: &str, changes: ComplaintUpdate) -> Result<Option<Complaint>> {
        let result = self.mutate(|list| {
            let complaint = find_mut(list, id)?;
            apply_update(complaint, changes);
            complaint.updated_at = Utc::now();
            Ok(complaint.clone())
        });

        match result {
            Ok(updated) => {
                debug!("Complaint {} updated, status {}", updated.id, updated.status);
                Ok(Some(updated))
            }
            Err(StoreError::ComplaintNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Append a response. An admin response moves a `new` complaint to
    /// `in-progress`; nothing else changes the status.
    pub fn add_response(&self, id: &str, data: NewResponse) -> Result<Response> {
        let now = Utc::now();
        let response = Response {
            id: Uuid::new_v4().to_string(),
            text: data.text,
            created_at: now,
            is_admin: data.is_admin,
            user_name: data.user_name,
        };

        let appended = response.clone();
        self.mutate(move |list| {
            let complaint = find_mut(list, id)?;
            if response.is_admin && complaint.status == StatusType::New {
                complaint.status = StatusType::InProgress;
            }
            complaint.responses.push(response);
            complaint.updated_at = now;
            Ok(())
        })?;

        debug!("Response {} added to complaint {}", appended.id, id);
        Ok(appended)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<Complaint>> {
        Ok(self.read()?.iter().find(|c| c.id == id).cloned())
    }

    /// Complaints filed under `email`, compared case-insensitively.
    pub fn get_by_email(&self, email: &str) -> Result<Vec<Complaint>> {
        Ok(self
            .read()?
            .iter()
            .filter(|c| same_email(&c.citizen_email, email))
            .cloned()
            .collect())
    }

    /// Everything, in insertion order.
    pub fn all(&self) -> Result<Vec<Complaint>> {
        Ok(self.read()?.clone())
    }

    /// Filtered view, newest first.
    pub fn query(&self, filter: &ComplaintFilter) -> Result<Vec<Complaint>> {
        Ok(filter.apply(self.read()?.iter()))
    }

    pub fn stats(&self) -> Result<ComplaintStats> {
        let mut stats = ComplaintStats::default();
        for complaint in self.read()?.iter() {
            stats.record(complaint.status);
        }
        Ok(stats)
    }
}

fn find_mut<'a>(list: &'a mut [Complaint], id: &str) -> Result<&'a mut Complaint> {
    list.iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| StoreError::ComplaintNotFound(id.to_string()))
}

fn apply_update(complaint: &mut Complaint, changes: ComplaintUpdate) {
    let ComplaintUpdate {
        title,
        description,
        category,
        location,
        citizen_name,
        citizen_email,
        citizen_phone,
        status,
        department_assigned,
        assigned_to,
    } = changes;

    if let Some(v) = title {
        complaint.title = v;
    }
    if let Some(v) = description {
        complaint.description = v;
    }
    if let Some(v) = category {
        complaint.category = v;
    }
    if let Some(v) = location {
        complaint.location = v;
    }
    if let Some(v) = citizen_name {
        complaint.citizen_name = v;
    }
    if let Some(v) = citizen_email {
        complaint.citizen_email = v;
    }
    if let Some(v) = citizen_phone {
        complaint.citizen_phone = Some(v);
    }
    if let Some(v) = status {
        complaint.status = v;
    }
    if let Some(v) = department_assigned {
        complaint.department_assigned = Some(v);
    }
    if let Some(v) = assigned_to {
        complaint.assigned_to = Some(v);
    }
}

fn persist(storage: &dyn KeyValueStore, complaints: &[Complaint]) -> Result<()> {
    let raw = serde_json::to_string(complaints)?;
    storage.set(keys::COMPLAINTS, &raw)?;
    Ok(())
}
