use serde::Serialize;

use super::kind::{DocumentKind, ServiceType};
use super::payload::{
    BuildingLedgerRequest, DocumentRequest, FamilyRelationRequest, HalfYear, LandLedgerRequest,
    LocalTaxRequest, LocalTaxType, PassportReissueRequest, ResidentRegistrationRequest,
    TargetRelation, TaxPaymentRequest, VehicleRegisterRequest, YesNo,
};
use super::registry::{lookup, TransportMethod};

/// One entry of the selection UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDefinition {
    pub kind: DocumentKind,
    pub name: &'static str,
    pub description: &'static str,
    pub service_type: ServiceType,
    pub method: TransportMethod,
    pub path: &'static str,
}

impl DocumentDefinition {
    pub fn for_kind(kind: DocumentKind) -> Self {
        let descriptor = lookup(kind);
        Self {
            kind,
            name: kind.label(),
            description: kind.description(),
            service_type: kind.service_type(),
            method: descriptor.method,
            path: descriptor.path,
        }
    }
}

pub fn known_kinds() -> Vec<DocumentDefinition> {
    DocumentKind::ordered()
        .into_iter()
        .map(DocumentDefinition::for_kind)
        .collect()
}

/// Demo payload shown on each tile of the issuance screen.
pub fn sample_request(kind: DocumentKind) -> DocumentRequest {
    match kind {
        DocumentKind::LandLedger => LandLedgerRequest {
            parcel_number: "123-45".to_string(),
            si_gun_gu_code: "41190".to_string(),
            eup_myeon_dong_code: "10300".to_string(),
        }
        .into(),
        DocumentKind::ResidentRegistration => ResidentRegistrationRequest {
            resident_registration_number: "900101-1234567".to_string(),
            issue_reason: "전입신고".to_string(),
            include_address_history: YesNo::Yes,
        }
        .into(),
        DocumentKind::VehicleRegister => VehicleRegisterRequest {
            plate_number: "12가3456".to_string(),
            owner_name: "홍길동".to_string(),
        }
        .into(),
        DocumentKind::BuildingLedger => BuildingLedgerRequest {
            building_id: "116801330010123".to_string(),
            si_gun_gu_code: "11680".to_string(),
        }
        .into(),
        DocumentKind::FamilyRelation => FamilyRelationRequest {
            applicant_rrn: "900101-1234567".to_string(),
            target_relation: TargetRelation::Applicant,
        }
        .into(),
        DocumentKind::PassportReissue => PassportReissueRequest {
            passport_number: "M12345678".to_string(),
            applicant_name: "HONG GILDONG".to_string(),
            contact_number: "010-1234-5678".to_string(),
        }
        .into(),
        DocumentKind::LocalTax => LocalTaxRequest {
            taxpayer_id: "111101-1234567".to_string(),
            tax_type: LocalTaxType::Property,
        }
        .into(),
        DocumentKind::TaxPayment => TaxPaymentRequest {
            business_id: "123-45-67890".to_string(),
            year: "2024".to_string(),
            half: HalfYear::Second,
        }
        .into(),
    }
}
