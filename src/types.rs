//! Typed data model for the Porkbun API surface.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::PorkbunError;

// ============ DNS Record Types ============

/// DNS record types accepted by the upstream API.
///
/// Serialized as uppercase strings (`"A"`, `"AAAA"`, `"ALIAS"`, etc.).
/// Anything outside this set is rejected locally with a validation error
/// before any network I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsRecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Mail exchange record.
    Mx,
    /// Canonical name (alias) record.
    Cname,
    /// Porkbun's apex-capable alias record.
    Alias,
    /// Text record.
    Txt,
    /// Name server record.
    Ns,
    /// Service locator record.
    Srv,
    /// TLS association record.
    Tlsa,
    /// Certificate Authority Authorization record.
    Caa,
}

impl DnsRecordType {
    /// Uppercase wire representation, as used in URL path templates.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Mx => "MX",
            Self::Cname => "CNAME",
            Self::Alias => "ALIAS",
            Self::Txt => "TXT",
            Self::Ns => "NS",
            Self::Srv => "SRV",
            Self::Tlsa => "TLSA",
            Self::Caa => "CAA",
        }
    }
}

impl std::fmt::Display for DnsRecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DnsRecordType {
    type Err = PorkbunError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "AAAA" => Ok(Self::Aaaa),
            "MX" => Ok(Self::Mx),
            "CNAME" => Ok(Self::Cname),
            "ALIAS" => Ok(Self::Alias),
            "TXT" => Ok(Self::Txt),
            "NS" => Ok(Self::Ns),
            "SRV" => Ok(Self::Srv),
            "TLSA" => Ok(Self::Tlsa),
            "CAA" => Ok(Self::Caa),
            other => Err(PorkbunError::Validation {
                param: "record_type".to_string(),
                detail: format!("unsupported DNS record type: {other}"),
            }),
        }
    }
}

/// One DNS resource record, as a point-in-time snapshot.
///
/// The name is always zone-relative; the empty string denotes the zone apex.
/// A snapshot goes stale the moment the record is edited or deleted —
/// re-fetch when authoritative state matters. Field values stay strings per
/// the wire contract; the response normalizer guarantees `prio` and `notes`
/// are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Server-assigned record identifier.
    pub id: String,
    /// Zone-relative name (`""` = apex).
    pub name: String,
    /// Record type.
    #[serde(rename = "type")]
    pub record_type: DnsRecordType,
    /// Record content (address, target hostname, text, ...).
    pub content: String,
    /// Time to live in seconds.
    pub ttl: String,
    /// Priority; `"0"` when the type does not use it.
    pub prio: String,
    /// Free-text notes; `""` when absent upstream.
    pub notes: String,
}

// ============ Record Addressing ============

/// Identifies which record(s) an operation targets.
///
/// Exactly one addressing mode applies, by precedence: server-assigned id,
/// else type + name, else type alone, else every record in the zone.
/// Retrieval accepts all four; delete and edit require id or type + name.
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    /// Server-assigned record identifier.
    pub id: Option<String>,
    /// Record type filter.
    pub record_type: Option<DnsRecordType>,
    /// Zone-relative name filter (requires `record_type`).
    pub name: Option<String>,
}

impl RecordQuery {
    /// Every record in the zone.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Target one record by its server-assigned id.
    #[must_use]
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// All records of one type.
    #[must_use]
    pub fn by_type(record_type: DnsRecordType) -> Self {
        Self {
            record_type: Some(record_type),
            ..Self::default()
        }
    }

    /// Records matching a type and zone-relative name.
    #[must_use]
    pub fn by_name_type(record_type: DnsRecordType, name: impl Into<String>) -> Self {
        Self {
            record_type: Some(record_type),
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

// ============ Mutation Requests ============

/// Payload for creating a DNS record.
///
/// Serializes directly as the create request body; unset fields are omitted
/// so the upstream applies its own defaults.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRecordRequest {
    /// Record type.
    #[serde(rename = "type")]
    pub record_type: DnsRecordType,
    /// Record content.
    pub content: String,
    /// Zone-relative name; omit for the apex.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Time to live in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,
    /// Priority, for types that use it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prio: Option<String>,
    /// Free-text notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CreateRecordRequest {
    /// A minimal create request; optional fields via the `with_*` methods.
    #[must_use]
    pub fn new(record_type: DnsRecordType, content: impl Into<String>) -> Self {
        Self {
            record_type,
            content: content.into(),
            name: None,
            ttl: None,
            prio: None,
            notes: None,
        }
    }

    /// Set the zone-relative name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the TTL in seconds.
    #[must_use]
    pub fn with_ttl(mut self, ttl: impl Into<String>) -> Self {
        self.ttl = Some(ttl.into());
        self
    }

    /// Set the priority.
    #[must_use]
    pub fn with_prio(mut self, prio: impl Into<String>) -> Self {
        self.prio = Some(prio.into());
        self
    }

    /// Set free-text notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// The change set for an edit operation.
///
/// Records are snapshots, not live handles: mutation happens by submitting
/// one of these, never by assigning to a [`DnsRecord`] field. Only the fields
/// set here are sent; `ttl` and `prio` are independent throughout. An edit
/// with no fields set fails validation before any network I/O.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DnsRecordEdit {
    /// New zone-relative name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New record type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub record_type: Option<DnsRecordType>,
    /// New record content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New time to live in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,
    /// New priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prio: Option<String>,
    /// New free-text notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DnsRecordEdit {
    /// An empty change set; populate via the `with_*` methods.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no field would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.record_type.is_none()
            && self.content.is_none()
            && self.ttl.is_none()
            && self.prio.is_none()
            && self.notes.is_none()
    }

    /// Change the zone-relative name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Change the record type.
    #[must_use]
    pub fn with_record_type(mut self, record_type: DnsRecordType) -> Self {
        self.record_type = Some(record_type);
        self
    }

    /// Change the record content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Change the TTL in seconds.
    #[must_use]
    pub fn with_ttl(mut self, ttl: impl Into<String>) -> Self {
        self.ttl = Some(ttl.into());
        self
    }

    /// Change the priority.
    #[must_use]
    pub fn with_prio(mut self, prio: impl Into<String>) -> Self {
        self.prio = Some(prio.into());
        self
    }

    /// Change the free-text notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

// ============ SSL ============

/// SSL certificate bundle for a domain. Read-only snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SslCertificateBundle {
    /// Intermediate certificate, PEM.
    #[serde(rename = "intermediatecertificate")]
    pub intermediate_certificate: String,
    /// Full certificate chain, PEM.
    #[serde(rename = "certificatechain")]
    pub certificate_chain: String,
    /// Private key, PEM.
    #[serde(rename = "privatekey")]
    pub private_key: String,
    /// Public key, PEM.
    #[serde(rename = "publickey")]
    pub public_key: String,
}

// ============ Pricing ============

/// A promotional coupon attached to a TLD's pricing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    /// Coupon code.
    pub code: String,
    /// Maximum redemptions per user.
    pub max_per_user: i64,
    /// Whether the coupon applies to the first year only (`"yes"`/`"no"`).
    pub first_year_only: String,
    /// Discount type (e.g. `"amount"`).
    #[serde(rename = "type")]
    pub coupon_type: String,
    /// Discount amount.
    pub amount: i64,
}

/// Pricing for one TLD.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TldPricing {
    /// Registration price.
    pub registration: String,
    /// Renewal price.
    pub renewal: String,
    /// Transfer price.
    pub transfer: String,
    /// Active coupons, empty when none. The upstream drifts between a list,
    /// a keyed object, and omitting the field entirely.
    #[serde(default, deserialize_with = "coupon_list")]
    pub coupons: Vec<Coupon>,
}

/// Default pricing for every supported TLD. Read-only snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingTable {
    /// Pricing keyed by TLD (without the leading dot).
    pub tlds: BTreeMap<String, TldPricing>,
}

/// Accept the coupon field as a list, a keyed object, or null.
fn coupon_list<'de, D>(deserializer: D) -> Result<Vec<Coupon>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(serde::de::Error::custom))
            .collect(),
        Value::Object(map) => map
            .into_iter()
            .map(|(_, item)| serde_json::from_value(item).map_err(serde::de::Error::custom))
            .collect(),
        other => Err(serde::de::Error::custom(format!(
            "coupons must be a list or object, got {other}"
        ))),
    }
}
