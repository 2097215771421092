//! Typed document issuance: the catalog of document kinds, their transport
//! registry, the request builder, the issuance client, and the per-kind
//! status tracker the presentation layer renders.

pub mod builder;
pub mod catalog;
pub mod client;
pub mod kind;
pub mod payload;
pub mod registry;
pub mod router;
pub mod service;
pub mod tracker;

#[cfg(test)]
mod tests;

pub use builder::{BuildError, CallDescriptor, CallPayload, RequestBuilder};
pub use catalog::{known_kinds, sample_request, DocumentDefinition};
pub use client::{
    HttpTransport, IssuanceClient, IssuanceError, IssuanceResult, Transport, TransportError,
};
pub use kind::{DocumentKind, ServiceType, UnknownDocumentKind};
pub use payload::{
    BuildingLedgerRequest, DocumentPayload, DocumentRequest, FamilyRelationRequest, HalfYear,
    LandLedgerRequest, LocalTaxRequest, LocalTaxType, PassportReissueRequest, PayloadError,
    ResidentRegistrationRequest, TargetRelation, TaxPaymentRequest, VehicleRegisterRequest, YesNo,
};
pub use registry::{lookup, Params, TransportDescriptor, TransportMethod};
pub use router::document_router;
pub use service::IssuanceService;
pub use tracker::{
    IssuancePanel, IssuanceStatus, IssuanceTicket, IssuanceTracker, KindStatusView,
    ResolutionPolicy,
};
