use serde::Serialize;

use super::client::{IssuanceError, IssuanceResult};
use super::kind::DocumentKind;

const FALLBACK_ERROR_MESSAGE: &str = "API 요청 중 문제가 발생했습니다.";

/// Visible state of one document kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum IssuanceStatus {
    #[default]
    Idle,
    Loading,
    /// Carries the RFC 3339 issuance timestamp.
    Success(String),
    Error(String),
}

impl IssuanceStatus {
    pub const fn state(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success(_) => "success",
            Self::Error(_) => "error",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "발급 대기",
            Self::Loading => "발급 중...",
            Self::Success(_) => "발급 완료",
            Self::Error(_) => "발급 실패",
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success(message) | Self::Error(message) => Some(message),
            Self::Idle | Self::Loading => None,
        }
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Which resolution is kept when attempts for the same kind overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolutionPolicy {
    /// Whichever attempt resolves last overwrites the slot, regardless of start order.
    #[default]
    LastResolvedWins,
    /// Resolutions from attempts superseded by a newer `begin` are discarded.
    LatestStartedWins,
}

/// Handed out by [`IssuanceTracker::begin`] and returned on resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssuanceTicket {
    kind: DocumentKind,
    sequence: u64,
}

impl IssuanceTicket {
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }
}

#[derive(Debug, Clone, Default)]
struct KindSlot {
    status: IssuanceStatus,
    latest_sequence: u64,
}

/// Per-kind status table plus the shared last-result and last-error slots.
///
/// Only [`begin`](Self::begin) and [`resolve`](Self::resolve) mutate it.
#[derive(Debug, Clone)]
pub struct IssuanceTracker {
    policy: ResolutionPolicy,
    slots: [KindSlot; DocumentKind::COUNT],
    last_result: Option<IssuanceResult>,
    last_error: Option<String>,
}

impl Default for IssuanceTracker {
    fn default() -> Self {
        Self::new(ResolutionPolicy::default())
    }
}

impl IssuanceTracker {
    pub fn new(policy: ResolutionPolicy) -> Self {
        Self {
            policy,
            slots: std::array::from_fn(|_| KindSlot::default()),
            last_result: None,
            last_error: None,
        }
    }

    pub fn policy(&self) -> ResolutionPolicy {
        self.policy
    }

    /// Marks `kind` as loading and clears the shared error detail.
    pub fn begin(&mut self, kind: DocumentKind) -> IssuanceTicket {
        let slot = &mut self.slots[kind.index()];
        slot.latest_sequence += 1;
        slot.status = IssuanceStatus::Loading;
        self.last_error = None;

        IssuanceTicket {
            kind,
            sequence: slot.latest_sequence,
        }
    }

    /// Records the outcome of the attempt behind `ticket`. Returns `false` when
    /// the policy discarded it as stale.
    pub fn resolve(
        &mut self,
        ticket: IssuanceTicket,
        outcome: &Result<IssuanceResult, IssuanceError>,
    ) -> bool {
        let slot = &mut self.slots[ticket.kind.index()];
        if self.policy == ResolutionPolicy::LatestStartedWins
            && ticket.sequence != slot.latest_sequence
        {
            return false;
        }

        match outcome {
            Ok(result) => {
                slot.status = IssuanceStatus::Success(result.issued_at.to_rfc3339());
                self.last_result = Some(result.clone());
            }
            Err(err) => {
                let mut message = err.to_string();
                if message.trim().is_empty() {
                    message = FALLBACK_ERROR_MESSAGE.to_string();
                }
                slot.status = IssuanceStatus::Error(message.clone());
                self.last_error = Some(message);
            }
        }

        true
    }

    pub fn status(&self, kind: DocumentKind) -> &IssuanceStatus {
        &self.slots[kind.index()].status
    }

    pub fn last_result(&self) -> Option<&IssuanceResult> {
        self.last_result.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn panel(&self) -> IssuancePanel {
        IssuancePanel {
            statuses: DocumentKind::ordered()
                .into_iter()
                .map(|kind| KindStatusView {
                    kind,
                    name: kind.label(),
                    label: self.status(kind).label(),
                    status: self.status(kind).clone(),
                })
                .collect(),
            last_result: self.last_result.clone(),
            last_error: self.last_error.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KindStatusView {
    pub kind: DocumentKind,
    pub name: &'static str,
    pub label: &'static str,
    pub status: IssuanceStatus,
}

/// Snapshot rendered by the status panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuancePanel {
    pub statuses: Vec<KindStatusView>,
    pub last_result: Option<IssuanceResult>,
    pub last_error: Option<String>,
}
