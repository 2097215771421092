use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use super::builder::RequestBuilder;
use super::catalog::{self, DocumentDefinition};
use super::client::{IssuanceClient, IssuanceError, IssuanceResult, Transport};
use super::kind::DocumentKind;
use super::payload::{DocumentPayload, DocumentRequest};
use super::tracker::{IssuancePanel, IssuanceStatus, IssuanceTracker, ResolutionPolicy};

/// Uniform entry point: issues any document kind and keeps the status table
/// in step with each attempt.
///
/// The tracker lock is never held across the network call, so attempts for
/// different kinds run concurrently.
#[derive(Debug)]
pub struct IssuanceService<T> {
    client: IssuanceClient<T>,
    tracker: RwLock<IssuanceTracker>,
}

impl<T: Transport> IssuanceService<T> {
    pub fn new(builder: RequestBuilder, transport: T) -> Self {
        Self::with_policy(builder, transport, ResolutionPolicy::default())
    }

    pub fn with_policy(builder: RequestBuilder, transport: T, policy: ResolutionPolicy) -> Self {
        Self {
            client: IssuanceClient::new(builder, transport),
            tracker: RwLock::new(IssuanceTracker::new(policy)),
        }
    }

    pub async fn issue(&self, request: DocumentRequest) -> Result<IssuanceResult, IssuanceError> {
        let kind = request.kind();
        let ticket = self.write_tracker().begin(kind);

        let outcome = self.client.issue(request).await;

        let (applied, policy) = {
            let mut tracker = self.write_tracker();
            (tracker.resolve(ticket, &outcome), tracker.policy())
        };
        if !applied {
            debug!(kind = %ticket.kind(), ?policy, "stale resolution discarded");
        }
        match &outcome {
            Ok(result) => {
                info!(%kind, issued_at = %result.issued_at, applied, "document issued")
            }
            Err(err) => warn!(%kind, error = %err, applied, "document issuance failed"),
        }

        outcome
    }

    pub async fn issue_payload<P: DocumentPayload>(
        &self,
        payload: P,
    ) -> Result<IssuanceResult, IssuanceError> {
        self.issue(payload.into()).await
    }

    pub fn status(&self, kind: DocumentKind) -> IssuanceStatus {
        self.read_tracker().status(kind).clone()
    }

    pub fn last_result(&self) -> Option<IssuanceResult> {
        self.read_tracker().last_result().cloned()
    }

    pub fn last_error(&self) -> Option<String> {
        self.read_tracker().last_error().map(str::to_string)
    }

    pub fn policy(&self) -> ResolutionPolicy {
        self.read_tracker().policy()
    }

    pub fn panel(&self) -> IssuancePanel {
        self.read_tracker().panel()
    }

    pub fn known_kinds(&self) -> Vec<DocumentDefinition> {
        catalog::known_kinds()
    }

    pub fn request_builder(&self) -> &RequestBuilder {
        self.client.builder()
    }

    pub fn transport(&self) -> &T {
        self.client.transport()
    }

    // Tracker updates are plain assignments, so a poisoned lock still holds a
    // usable table.
    fn read_tracker(&self) -> RwLockReadGuard<'_, IssuanceTracker> {
        self.tracker.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_tracker(&self) -> RwLockWriteGuard<'_, IssuanceTracker> {
        self.tracker.write().unwrap_or_else(PoisonError::into_inner)
    }
}
