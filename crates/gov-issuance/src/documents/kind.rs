use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed catalog of documents the Gov24 gateway can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    LandLedger,
    ResidentRegistration,
    VehicleRegister,
    BuildingLedger,
    FamilyRelation,
    PassportReissue,
    LocalTax,
    TaxPayment,
}

impl DocumentKind {
    pub const COUNT: usize = 8;

    pub const fn ordered() -> [Self; Self::COUNT] {
        [
            Self::LandLedger,
            Self::ResidentRegistration,
            Self::VehicleRegister,
            Self::BuildingLedger,
            Self::FamilyRelation,
            Self::PassportReissue,
            Self::LocalTax,
            Self::TaxPayment,
        ]
    }

    /// Position in [`DocumentKind::ordered`]; used to key fixed-size per-kind tables.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Wire identifier, matching the serde representation.
    pub const fn id(self) -> &'static str {
        match self {
            Self::LandLedger => "landLedger",
            Self::ResidentRegistration => "residentRegistration",
            Self::VehicleRegister => "vehicleRegister",
            Self::BuildingLedger => "buildingLedger",
            Self::FamilyRelation => "familyRelation",
            Self::PassportReissue => "passportReissue",
            Self::LocalTax => "localTax",
            Self::TaxPayment => "taxPayment",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::LandLedger => "토지(임야)대장",
            Self::ResidentRegistration => "주민등록등본(초본)",
            Self::VehicleRegister => "자동차등록원부",
            Self::BuildingLedger => "건축물대장",
            Self::FamilyRelation => "가족관계증명서",
            Self::PassportReissue => "여권 재발급",
            Self::LocalTax => "지방세 납세증명",
            Self::TaxPayment => "납세증명",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::LandLedger => "지번 기반 토지현황",
            Self::ResidentRegistration => "세대 정보/주소 포함",
            Self::VehicleRegister => "차량 소유/저당 정보",
            Self::BuildingLedger => "건축물 개요 및 면적",
            Self::FamilyRelation => "본인 및 직계가족",
            Self::PassportReissue => "기존 여권 재발급",
            Self::LocalTax => "지방세 완납 증명",
            Self::TaxPayment => "국세 완납 증명",
        }
    }

    pub const fn service_type(self) -> ServiceType {
        match self {
            Self::FamilyRelation => ServiceType::Link,
            Self::PassportReissue => ServiceType::Edit,
            Self::LandLedger
            | Self::ResidentRegistration
            | Self::VehicleRegister
            | Self::BuildingLedger
            | Self::LocalTax
            | Self::TaxPayment => ServiceType::Pdf,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown document kind '{0}'")]
pub struct UnknownDocumentKind(pub String);

impl FromStr for DocumentKind {
    type Err = UnknownDocumentKind;

    /// Accepts the camelCase id (`landLedger`) or its kebab-case or snake_case
    /// spelling (`land-ledger`, `land_ledger`), ignoring ASCII case.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();

        Self::ordered()
            .into_iter()
            .find(|kind| {
                wanted.eq_ignore_ascii_case(kind.id())
                    || wanted.eq_ignore_ascii_case(&kind.spelled_with('-'))
                    || wanted.eq_ignore_ascii_case(&kind.spelled_with('_'))
            })
            .ok_or_else(|| UnknownDocumentKind(wanted.to_string()))
    }
}

impl DocumentKind {
    /// The id with its word boundaries joined by `separator`, lowercased.
    fn spelled_with(self, separator: char) -> String {
        let mut spelled = String::with_capacity(self.id().len() + 2);
        for c in self.id().chars() {
            if c.is_ascii_uppercase() {
                spelled.push(separator);
            }
            spelled.push(c.to_ascii_lowercase());
        }
        spelled
    }
}

/// How the presentation layer renders a document tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Pdf,
    Link,
    Edit,
}

impl ServiceType {
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Link => "↗",
            Self::Edit => "✎",
        }
    }
}
