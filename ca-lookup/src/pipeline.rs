//! Two-step lookup pipeline
//!
//! Step 1 turns a [`LookupRequest`] into a [`LookupOutcome`]; step 2, only
//! for found people with a photo, turns a [`PhotoRequest`] into a
//! [`PhotoOutcome`]. Running a step never touches the form: the controller
//! applies the completed step afterwards, which is where stale results are
//! discarded.

use ca_common::{LookupResult, PersonLookupResult, PersonRecord};
use std::sync::Arc;

use crate::client::{LookupClient, Photo};
use crate::error::LookupError;

/// Person lookup for one trimmed DNI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub dni: String,
    /// Controller generation this request belongs to
    pub generation: u64,
}

/// Result of step 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(PersonRecord),
    NotFound,
    Failed(LookupError),
}

impl LookupOutcome {
    /// Decode a wire record; inconsistent records count as failures
    pub fn from_wire(raw: PersonLookupResult) -> Self {
        match LookupResult::try_from(raw) {
            Ok(LookupResult::Found(person)) => LookupOutcome::Found(person),
            Ok(LookupResult::NotFound) => LookupOutcome::NotFound,
            Err(e) => LookupOutcome::Failed(e.into()),
        }
    }
}

/// Step 1, ready to run
pub struct PendingLookup<C> {
    client: Arc<C>,
    request: LookupRequest,
}

impl<C: LookupClient> PendingLookup<C> {
    pub fn new(client: Arc<C>, request: LookupRequest) -> Self {
        Self { client, request }
    }

    pub fn request(&self) -> &LookupRequest {
        &self.request
    }

    pub async fn run(self) -> CompletedLookup {
        let outcome = match self.client.search_person(&self.request.dni).await {
            Ok(raw) => LookupOutcome::from_wire(raw),
            Err(e) => LookupOutcome::Failed(e),
        };

        CompletedLookup {
            request: self.request,
            outcome,
        }
    }
}

/// Step 1, finished and waiting to be applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedLookup {
    pub request: LookupRequest,
    pub outcome: LookupOutcome,
}

/// Photo fetch for a found person
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoRequest {
    pub person_id: i64,
    pub generation: u64,
}

/// Result of step 2
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoOutcome {
    Loaded(Photo),
    Failed(LookupError),
}

/// Step 2, ready to run
pub struct PendingPhoto<C> {
    client: Arc<C>,
    request: PhotoRequest,
}

impl<C: LookupClient> PendingPhoto<C> {
    pub fn new(client: Arc<C>, request: PhotoRequest) -> Self {
        Self { client, request }
    }

    pub fn request(&self) -> PhotoRequest {
        self.request
    }

    pub async fn run(self) -> CompletedPhoto {
        let outcome = match self.client.fetch_photo(self.request.person_id).await {
            Ok(photo) => PhotoOutcome::Loaded(photo),
            Err(e) => PhotoOutcome::Failed(e),
        };

        CompletedPhoto {
            request: self.request,
            outcome,
        }
    }
}

/// Step 2, finished and waiting to be applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedPhoto {
    pub request: PhotoRequest,
    pub outcome: PhotoOutcome,
}
