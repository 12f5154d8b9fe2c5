//! DNS record operations: retrieve, create, delete, edit.
//!
//! All operations address records through [`RecordQuery`]: by server-assigned
//! id, by type + name, by type alone, or the whole zone. Invalid addressing
//! combinations are rejected locally before any network I/O. Every record
//! returned to the caller has passed the response normalizer, so names are
//! zone-relative and `prio`/`notes` are always present.

use serde::Serialize;
use serde_json::Value;

use crate::client::{CallOptions, Client, JsonObject};
use crate::error::{PorkbunError, Result};
use crate::normalize::{normalize_name, normalize_record_fields};
use crate::types::{CreateRecordRequest, DnsRecord, DnsRecordEdit, RecordQuery};

const DNS_PATH: &str = "/dns";

/// TTL the upstream applies when a create request leaves it unset.
const DEFAULT_TTL: &str = "600";

/// DNS record operations on a [`Client`].
pub struct Dns<'a> {
    client: &'a Client,
}

impl<'a> Dns<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Retrieve the records matching `query`, normalized.
    ///
    /// # Errors
    ///
    /// [`PorkbunError::Validation`] when the query names a record without a
    /// type filter; [`PorkbunError::ApiFailure`] when a 200 response carries
    /// no usable records array.
    pub async fn get_records(&self, domain: &str, query: &RecordQuery) -> Result<Vec<DnsRecord>> {
        let path = Self::retrieve_path(domain, query)?;
        let response = self
            .client
            .api_post(&path, None, &CallOptions::default())
            .await?;
        Self::records_from_response(domain, &response)
    }

    /// Create a record and return its normalized post-create state.
    ///
    /// The returned snapshot combines the server-assigned id with the
    /// submitted fields, with upstream defaults filled in for anything the
    /// request left unset.
    pub async fn create_record(
        &self,
        domain: &str,
        request: &CreateRecordRequest,
    ) -> Result<DnsRecord> {
        let mut payload = to_object(request)?;
        let path = format!("{DNS_PATH}/create/{domain}");
        let response = self
            .client
            .api_post(&path, Some(&mut payload), &CallOptions::default())
            .await?;

        let id = match response.get("id") {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.clone(),
            _ => {
                return Err(PorkbunError::ApiFailure {
                    http_status: 200,
                    body: "create response missing record id".to_string(),
                });
            }
        };

        Ok(DnsRecord {
            id,
            name: request
                .name
                .as_deref()
                .map(|name| normalize_name(name, domain))
                .unwrap_or_default(),
            record_type: request.record_type,
            content: request.content.clone(),
            ttl: request.ttl.clone().unwrap_or_else(|| DEFAULT_TTL.to_string()),
            prio: request.prio.clone().unwrap_or_else(|| "0".to_string()),
            notes: request.notes.clone().unwrap_or_default(),
        })
    }

    /// Delete the record(s) addressed by `target`.
    ///
    /// # Errors
    ///
    /// [`PorkbunError::Validation`] unless the target carries an id or both
    /// a record type and a name.
    pub async fn delete_record(&self, domain: &str, target: &RecordQuery) -> Result<()> {
        let path = Self::target_path(domain, target, "delete", "deleteByNameType")?;
        self.client
            .api_post(&path, None, &CallOptions::default())
            .await?;
        Ok(())
    }

    /// Apply a change set to the record(s) addressed by `target` and return
    /// the record's post-edit state, re-fetched from the server.
    ///
    /// # Errors
    ///
    /// [`PorkbunError::Validation`] when the change set is empty or the
    /// target is under-specified; [`PorkbunError::ApiFailure`] when the
    /// edited record cannot be found again afterwards.
    pub async fn edit_record(
        &self,
        domain: &str,
        target: &RecordQuery,
        edit: &DnsRecordEdit,
    ) -> Result<DnsRecord> {
        if edit.is_empty() {
            return Err(PorkbunError::Validation {
                param: "edit".to_string(),
                detail: "edit would change no fields".to_string(),
            });
        }
        let path = Self::target_path(domain, target, "edit", "editByNameType")?;
        let mut payload = to_object(edit)?;
        self.client
            .api_post(&path, Some(&mut payload), &CallOptions::default())
            .await?;

        // Re-fetch under the post-edit identity: an edit can rename or
        // retype the record, so the selector's values only apply where the
        // change set left them alone.
        let refetch = if let Some(id) = &target.id {
            RecordQuery::by_id(id.clone())
        } else {
            RecordQuery {
                id: None,
                record_type: edit.record_type.or(target.record_type),
                name: edit.name.clone().or_else(|| target.name.clone()),
            }
        };
        let records = self.get_records(domain, &refetch).await?;
        records
            .into_iter()
            .next()
            .ok_or_else(|| PorkbunError::ApiFailure {
                http_status: 200,
                body: "edited record could not be re-fetched".to_string(),
            })
    }

    /// Endpoint path for a retrieval, by addressing-mode precedence.
    fn retrieve_path(domain: &str, query: &RecordQuery) -> Result<String> {
        if let Some(id) = &query.id {
            return Ok(format!("{DNS_PATH}/retrieve/{domain}/{id}"));
        }
        match (&query.record_type, &query.name) {
            (Some(record_type), Some(name)) => Ok(format!(
                "{DNS_PATH}/retrieveByNameType/{domain}/{record_type}/{name}"
            )),
            (Some(record_type), None) => Ok(format!(
                "{DNS_PATH}/retrieveByNameType/{domain}/{record_type}"
            )),
            (None, None) => Ok(format!("{DNS_PATH}/retrieve/{domain}")),
            (None, Some(_)) => Err(PorkbunError::Validation {
                param: "name".to_string(),
                detail: "a name filter requires a record type".to_string(),
            }),
        }
    }

    /// Endpoint path for a mutation, which needs an exact target.
    fn target_path(
        domain: &str,
        target: &RecordQuery,
        by_id: &str,
        by_name_type: &str,
    ) -> Result<String> {
        if let Some(id) = &target.id {
            return Ok(format!("{DNS_PATH}/{by_id}/{domain}/{id}"));
        }
        if let (Some(record_type), Some(name)) = (&target.record_type, &target.name) {
            return Ok(format!(
                "{DNS_PATH}/{by_name_type}/{domain}/{record_type}/{name}"
            ));
        }
        Err(PorkbunError::Validation {
            param: "target".to_string(),
            detail: "requires a record id or both record type and name".to_string(),
        })
    }

    fn records_from_response(domain: &str, response: &JsonObject) -> Result<Vec<DnsRecord>> {
        let Some(Value::Array(items)) = response.get("records") else {
            return Err(PorkbunError::ApiFailure {
                http_status: 200,
                body: "retrieve response missing records array".to_string(),
            });
        };
        items
            .iter()
            .map(|item| Self::record_from_value(domain, item))
            .collect()
    }

    fn record_from_value(domain: &str, value: &Value) -> Result<DnsRecord> {
        let Value::Object(raw) = value else {
            return Err(PorkbunError::ApiFailure {
                http_status: 200,
                body: "malformed record object".to_string(),
            });
        };
        let mut raw = raw.clone();
        normalize_record_fields(&mut raw);
        let mut record: DnsRecord =
            serde_json::from_value(Value::Object(raw)).map_err(|e| PorkbunError::ApiFailure {
                http_status: 200,
                body: format!("malformed record object: {e}"),
            })?;
        record.name = normalize_name(&record.name, domain);
        Ok(record)
    }
}

fn to_object<T: Serialize>(value: &T) -> Result<JsonObject> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(PorkbunError::Validation {
            param: "payload".to_string(),
            detail: "request payload must serialize to a JSON object".to_string(),
        }),
    }
}
