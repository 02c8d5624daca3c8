//! Completion map model plus merge, import, and export helpers.
//!
//! # Design
//! - Keys are sparse: only ids that were ever toggled are present.
//! - Parsing is lenient for stored blobs (non-boolean values are dropped) and strict
//!   about the top-level shape for user imports.

use crate::core::catalog::CatalogItem;
use crate::core::error::{ImportError, StoreError, StoreResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Mapping of catalog id to "done" status.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionMap(BTreeMap<String, bool>);

impl CompletionMap {
    /// Empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is marked done. Absent ids count as not done.
    #[must_use]
    pub fn is_done(&self, id: &str) -> bool {
        self.0.get(id).copied().unwrap_or(false)
    }

    /// Record the status for one id.
    pub fn set(&mut self, id: impl Into<String>, done: bool) {
        self.0.insert(id.into(), done);
    }

    /// Number of stored keys (done or not).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no key was ever stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge `remote` over `self`: overlapping keys take the remote value,
    /// keys only present locally are kept.
    #[must_use]
    pub fn merged_with_remote(&self, remote: &Self) -> Self {
        let mut merged = self.0.clone();
        merged.extend(remote.0.iter().map(|(id, done)| (id.clone(), *done)));
        Self(merged)
    }

    /// Build a map from an arbitrary JSON value, keeping only boolean entries.
    /// Returns `None` when the value is not an object.
    #[must_use]
    pub fn from_json_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut map = BTreeMap::new();
        let mut dropped = 0usize;
        for (id, done) in object {
            if let Some(done) = done.as_bool() {
                map.insert(id.clone(), done);
            } else {
                dropped += 1;
            }
        }
        if dropped > 0 {
            tracing::warn!(dropped, "ignored non-boolean completion entries");
        }
        Some(Self(map))
    }

    /// Parse a stored blob, falling back to an empty map when unreadable.
    #[must_use]
    pub fn from_stored(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::new();
        };
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_json_value(&value).unwrap_or_default(),
            Err(err) => {
                tracing::warn!(error = %err, "stored completion blob is unparsable");
                Self::new()
            }
        }
    }

    /// Pretty-printed JSON used for the export download.
    ///
    /// # Errors
    /// Returns the JSON error if serialization fails.
    pub fn to_export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl FromIterator<(String, bool)> for CompletionMap {
    fn from_iter<T: IntoIterator<Item = (String, bool)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Number of catalog items not marked done.
#[must_use]
pub fn incomplete_count(items: &[CatalogItem], completion: &CompletionMap) -> usize {
    items.iter().filter(|item| !completion.is_done(&item.id)).count()
}

/// Parse a user-supplied import file.
///
/// Arrays and `null` are rejected along with scalars; only a JSON object is
/// accepted as a completion snapshot.
///
/// # Errors
/// Returns [`ImportError::Parse`] for invalid JSON and [`ImportError::NotAnObject`]
/// when the top-level value is not an object.
pub fn parse_import(raw: &str) -> Result<CompletionMap, ImportError> {
    let value: Value = serde_json::from_str(raw).map_err(|source| ImportError::Parse { source })?;
    CompletionMap::from_json_value(&value).ok_or(ImportError::NotAnObject {
        found: json_type_name(&value),
    })
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Where an accepted import ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Written to the signed-in user's remote record.
    Synced,
    /// Written to local storage.
    SavedLocally,
    /// Remote upload failed with the backend message.
    UploadFailed(String),
    /// Local write failed.
    SaveFailed(String),
}

impl ImportOutcome {
    /// Classify the result of writing an imported map to the active medium.
    #[must_use]
    pub fn from_write(signed_in: bool, result: &StoreResult<()>) -> Self {
        match result {
            Ok(()) if signed_in => Self::Synced,
            Ok(()) => Self::SavedLocally,
            Err(StoreError::Remote { source, .. }) => Self::UploadFailed(source.message.clone()),
            Err(StoreError::Local { detail, .. }) => Self::SaveFailed(detail.clone()),
            Err(err @ StoreError::Serialize { .. }) => Self::SaveFailed(err.to_string()),
        }
    }
}

/// Alert text for an import outcome.
#[must_use]
pub fn import_alert(outcome: &ImportOutcome) -> String {
    match outcome {
        ImportOutcome::Synced => "数据导入成功并已同步到云端！页面将刷新以显示最新数据。".to_string(),
        ImportOutcome::SavedLocally => "数据导入成功！页面将刷新以显示最新数据。".to_string(),
        ImportOutcome::UploadFailed(message) => format!("数据上传到云端失败: {message}"),
        ImportOutcome::SaveFailed(detail) => format!("数据保存到本地失败: {detail}"),
    }
}

/// Alert shown when the import file was rejected before touching any data.
#[must_use]
pub const fn import_rejected_alert(err: &ImportError) -> &'static str {
    match err {
        ImportError::Parse { .. } => "数据解析错误！请确保导入的是有效的JSON文件。",
        ImportError::NotAnObject { .. } => "无效的数据格式！请确保导入的是正确的JSON文件。",
    }
}

/// Download file name for an export taken on `date`.
#[must_use]
pub fn export_file_name(date: NaiveDate) -> String {
    format!("geshin-anecdote-data-{}.json", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(entries: &[(&str, bool)]) -> CompletionMap {
        entries.iter().map(|(id, done)| ((*id).to_string(), *done)).collect()
    }

    #[test]
    fn merge_prefers_remote_and_keeps_local_only_keys() {
        let local = map(&[("1", true), ("2", true), ("3", false)]);
        let remote = map(&[("2", false), ("4", true)]);
        let merged = local.merged_with_remote(&remote);
        assert_eq!(merged, map(&[("1", true), ("2", false), ("3", false), ("4", true)]));
    }

    #[test]
    fn stored_blob_falls_back_to_empty() {
        assert!(CompletionMap::from_stored(None).is_empty());
        assert!(CompletionMap::from_stored(Some("{oops")).is_empty());
        assert!(CompletionMap::from_stored(Some("[1,2]")).is_empty());
        let parsed = CompletionMap::from_stored(Some(r#"{"1":true,"2":"yes"}"#));
        assert_eq!(parsed, map(&[("1", true)]));
    }

    #[test]
    fn import_rejects_non_objects() {
        for raw in [r#""just text""#, "42", "null", "[true]"] {
            assert!(
                matches!(parse_import(raw), Err(ImportError::NotAnObject { .. })),
                "{raw} should be rejected"
            );
        }
        assert!(matches!(parse_import("{"), Err(ImportError::Parse { .. })));
    }

    #[test]
    fn import_accepts_objects() {
        let raw = json!({"10": true, "11": false}).to_string();
        let imported = parse_import(&raw).unwrap();
        assert!(imported.is_done("10"));
        assert!(!imported.is_done("11"));
        assert!(!imported.is_done("12"));
    }

    #[test]
    fn import_alerts_name_the_destination() {
        assert!(import_alert(&ImportOutcome::Synced).contains("云端"));
        assert!(!import_alert(&ImportOutcome::SavedLocally).contains("云端"));
        assert_eq!(
            import_alert(&ImportOutcome::UploadFailed("permission denied".into())),
            "数据上传到云端失败: permission denied"
        );
        let remote = StoreError::Remote {
            operation: "upsert",
            source: crate::core::error::BackendError::message("permission denied"),
        };
        assert_eq!(
            ImportOutcome::from_write(true, &Err(remote)),
            ImportOutcome::UploadFailed("permission denied".into())
        );
        assert_eq!(ImportOutcome::from_write(false, &Ok(())), ImportOutcome::SavedLocally);
        let rejected = parse_import("[]").unwrap_err();
        assert!(import_rejected_alert(&rejected).starts_with("无效的数据格式"));
        let broken = parse_import("{").unwrap_err();
        assert!(import_rejected_alert(&broken).starts_with("数据解析错误"));
    }

    #[test]
    fn export_name_and_body() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_file_name(date), "geshin-anecdote-data-2024-03-09.json");
        let body = map(&[("1", true)]).to_export_json().unwrap();
        assert_eq!(body, "{\n  \"1\": true\n}");
    }
}
