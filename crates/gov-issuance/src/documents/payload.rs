//! Request payloads, one struct per document kind.
//!
//! Fields are structurally typed only: formats such as resident registration
//! numbers or plate numbers are passed through untouched.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::kind::DocumentKind;
use super::registry::Params;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LandLedgerRequest {
    pub parcel_number: String,
    pub si_gun_gu_code: String,
    pub eup_myeon_dong_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResidentRegistrationRequest {
    pub resident_registration_number: String,
    pub issue_reason: String,
    pub include_address_history: YesNo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VehicleRegisterRequest {
    pub plate_number: String,
    pub owner_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BuildingLedgerRequest {
    pub building_id: String,
    pub si_gun_gu_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FamilyRelationRequest {
    pub applicant_rrn: String,
    pub target_relation: TargetRelation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PassportReissueRequest {
    pub passport_number: String,
    pub applicant_name: String,
    pub contact_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LocalTaxRequest {
    pub taxpayer_id: String,
    pub tax_type: LocalTaxType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaxPaymentRequest {
    pub business_id: String,
    pub year: String,
    pub half: HalfYear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    #[serde(rename = "Y")]
    Yes,
    #[serde(rename = "N")]
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetRelation {
    #[serde(rename = "SELF")]
    Applicant,
    Spouse,
    Parent,
    Child,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocalTaxType {
    Property,
    Acquisition,
    Resident,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HalfYear {
    First,
    Second,
}

/// Ties a payload struct to the one document kind it belongs to.
pub trait DocumentPayload: Serialize + Into<DocumentRequest> {
    const KIND: DocumentKind;
}

/// A document kind together with its payload. The variant is the kind, so a
/// request can never pair a kind with another kind's fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "documentKind", content = "payload", rename_all = "camelCase")]
pub enum DocumentRequest {
    LandLedger(LandLedgerRequest),
    ResidentRegistration(ResidentRegistrationRequest),
    VehicleRegister(VehicleRegisterRequest),
    BuildingLedger(BuildingLedgerRequest),
    FamilyRelation(FamilyRelationRequest),
    PassportReissue(PassportReissueRequest),
    LocalTax(LocalTaxRequest),
    TaxPayment(TaxPaymentRequest),
}

macro_rules! document_payload {
    ($($payload:ident => $kind:ident),+ $(,)?) => {
        $(
            impl DocumentPayload for $payload {
                const KIND: DocumentKind = DocumentKind::$kind;
            }

            impl From<$payload> for DocumentRequest {
                fn from(payload: $payload) -> Self {
                    DocumentRequest::$kind(payload)
                }
            }
        )+
    };
}

document_payload! {
    LandLedgerRequest => LandLedger,
    ResidentRegistrationRequest => ResidentRegistration,
    VehicleRegisterRequest => VehicleRegister,
    BuildingLedgerRequest => BuildingLedger,
    FamilyRelationRequest => FamilyRelation,
    PassportReissueRequest => PassportReissue,
    LocalTaxRequest => LocalTax,
    TaxPaymentRequest => TaxPayment,
}

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("invalid {kind} payload: {source}")]
    Invalid {
        kind: DocumentKind,
        #[source]
        source: serde_json::Error,
    },
    #[error("{kind} payload does not serialize to a field map")]
    NotAnObject { kind: DocumentKind },
}

impl DocumentRequest {
    pub const fn kind(&self) -> DocumentKind {
        match self {
            Self::LandLedger(_) => DocumentKind::LandLedger,
            Self::ResidentRegistration(_) => DocumentKind::ResidentRegistration,
            Self::VehicleRegister(_) => DocumentKind::VehicleRegister,
            Self::BuildingLedger(_) => DocumentKind::BuildingLedger,
            Self::FamilyRelation(_) => DocumentKind::FamilyRelation,
            Self::PassportReissue(_) => DocumentKind::PassportReissue,
            Self::LocalTax(_) => DocumentKind::LocalTax,
            Self::TaxPayment(_) => DocumentKind::TaxPayment,
        }
    }

    /// Decode an untyped JSON payload into the shape `kind` requires.
    pub fn from_json(kind: DocumentKind, value: Value) -> Result<Self, PayloadError> {
        let invalid = |source| PayloadError::Invalid { kind, source };

        let request = match kind {
            DocumentKind::LandLedger => {
                Self::LandLedger(serde_json::from_value(value).map_err(invalid)?)
            }
            DocumentKind::ResidentRegistration => {
                Self::ResidentRegistration(serde_json::from_value(value).map_err(invalid)?)
            }
            DocumentKind::VehicleRegister => {
                Self::VehicleRegister(serde_json::from_value(value).map_err(invalid)?)
            }
            DocumentKind::BuildingLedger => {
                Self::BuildingLedger(serde_json::from_value(value).map_err(invalid)?)
            }
            DocumentKind::FamilyRelation => {
                Self::FamilyRelation(serde_json::from_value(value).map_err(invalid)?)
            }
            DocumentKind::PassportReissue => {
                Self::PassportReissue(serde_json::from_value(value).map_err(invalid)?)
            }
            DocumentKind::LocalTax => {
                Self::LocalTax(serde_json::from_value(value).map_err(invalid)?)
            }
            DocumentKind::TaxPayment => {
                Self::TaxPayment(serde_json::from_value(value).map_err(invalid)?)
            }
        };

        Ok(request)
    }

    /// The payload's fields keyed by their wire names.
    pub fn params(&self) -> Result<Params, PayloadError> {
        let kind = self.kind();
        let value = self
            .serialize_payload(serde_json::value::Serializer)
            .map_err(|source| PayloadError::Invalid { kind, source })?;

        match value {
            Value::Object(map) => Ok(map),
            _ => Err(PayloadError::NotAnObject { kind }),
        }
    }

    /// Serialize only the payload fields, without the kind tag.
    pub fn serialize_payload<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::LandLedger(payload) => payload.serialize(serializer),
            Self::ResidentRegistration(payload) => payload.serialize(serializer),
            Self::VehicleRegister(payload) => payload.serialize(serializer),
            Self::BuildingLedger(payload) => payload.serialize(serializer),
            Self::FamilyRelation(payload) => payload.serialize(serializer),
            Self::PassportReissue(payload) => payload.serialize(serializer),
            Self::LocalTax(payload) => payload.serialize(serializer),
            Self::TaxPayment(payload) => payload.serialize(serializer),
        }
    }
}
