use serde::Serialize;
use serde_json::Value;
use std::fmt;

use super::kind::DocumentKind;

/// Request parameters keyed by wire name.
pub type Params = serde_json::Map<String, Value>;

/// Rewrites the merged parameter set before it is placed on the wire.
pub type PayloadTransform = fn(Params) -> Params;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransportMethod {
    Get,
    Post,
}

impl TransportMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for TransportMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How one document kind is sent to the Gov24 gateway.
#[derive(Debug, Clone, Copy)]
pub struct TransportDescriptor {
    pub path: &'static str,
    pub method: TransportMethod,
    /// Values sent on every request; they may not share a key with the payload.
    pub fixed_params: &'static [(&'static str, &'static str)],
    pub transform: Option<PayloadTransform>,
}

impl TransportDescriptor {
    pub const fn get(path: &'static str) -> Self {
        Self {
            path,
            method: TransportMethod::Get,
            fixed_params: &[],
            transform: None,
        }
    }

    pub const fn post(path: &'static str) -> Self {
        Self {
            path,
            method: TransportMethod::Post,
            fixed_params: &[],
            transform: None,
        }
    }

    pub const fn with_fixed_params(
        mut self,
        fixed_params: &'static [(&'static str, &'static str)],
    ) -> Self {
        self.fixed_params = fixed_params;
        self
    }

    pub const fn with_transform(mut self, transform: PayloadTransform) -> Self {
        self.transform = Some(transform);
        self
    }
}

pub const fn lookup(kind: DocumentKind) -> TransportDescriptor {
    match kind {
        DocumentKind::LandLedger => TransportDescriptor::get("/documents/land-ledger"),
        DocumentKind::ResidentRegistration => {
            TransportDescriptor::post("/documents/resident-registration")
        }
        DocumentKind::VehicleRegister => TransportDescriptor::get("/documents/vehicle-register"),
        DocumentKind::BuildingLedger => TransportDescriptor::get("/documents/building-ledger"),
        DocumentKind::FamilyRelation => TransportDescriptor::post("/documents/family-relation"),
        DocumentKind::PassportReissue => TransportDescriptor::post("/documents/passport-reissue"),
        DocumentKind::LocalTax => TransportDescriptor::get("/documents/local-tax-certificate"),
        DocumentKind::TaxPayment => TransportDescriptor::get("/documents/tax-payment"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::catalog::sample_request;
    use std::collections::HashSet;

    #[test]
    fn every_kind_has_a_distinct_endpoint() {
        let paths: HashSet<&str> = DocumentKind::ordered()
            .into_iter()
            .map(|kind| lookup(kind).path)
            .collect();
        assert_eq!(paths.len(), DocumentKind::COUNT);
        assert!(paths.iter().all(|path| path.starts_with("/documents/")));
    }

    #[test]
    fn methods_follow_catalog() {
        let posts: Vec<DocumentKind> = DocumentKind::ordered()
            .into_iter()
            .filter(|kind| lookup(*kind).method == TransportMethod::Post)
            .collect();
        assert_eq!(
            posts,
            vec![
                DocumentKind::ResidentRegistration,
                DocumentKind::FamilyRelation,
                DocumentKind::PassportReissue,
            ]
        );
    }

    #[test]
    fn fixed_params_never_shadow_payload_fields() {
        for kind in DocumentKind::ordered() {
            let params = sample_request(kind).params().expect("sample params");
            for (key, _) in lookup(kind).fixed_params {
                assert!(
                    !params.contains_key(*key),
                    "{kind} fixed parameter {key} collides with payload"
                );
            }
        }
    }
}
