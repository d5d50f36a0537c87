//! Global catalogs and cross-cutting reads that don't belong to one
//! entity kind: flow search and the bulletin board (spec §4.A "Unique
//! operations").

use serde_json::Value;

use crate::bulletins::sanitize_bulletin_json;
use crate::client::NiFiClient;
use crate::error::NiFiClientError;

impl NiFiClient {
    pub async fn search_flow(&self, query: &str) -> Result<Value, NiFiClientError> {
        self.get(&format!("/flow/search-results?q={}", urlencode(query))).await
    }

    /// Fetches the bulletin board, optionally scoped to a group and/or
    /// source component id, with a result-count limit. Retrieved as raw
    /// text and sanitized before parsing (spec §4.A "Bulletins").
    pub async fn get_bulletin_board(
        &self,
        group_id: Option<&str>,
        source_id: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Value, NiFiClientError> {
        let mut params = Vec::new();
        if let Some(group_id) = group_id {
            params.push(format!("groupId={}", urlencode(group_id)));
        }
        if let Some(source_id) = source_id {
            params.push(format!("sourceId={}", urlencode(source_id)));
        }
        if let Some(limit) = limit {
            params.push(format!("limit={limit}"));
        }
        let path = if params.is_empty() {
            "/flow/bulletin-board".to_string()
        } else {
            format!("/flow/bulletin-board?{}", params.join("&"))
        };

        let raw_text = self.get_raw(&path).await?;
        let sanitized = sanitize_bulletin_json(&raw_text);
        let parsed: Value = serde_json::from_str(&sanitized)?;
        Ok(parsed
            .pointer("/bulletinBoard/bulletins")
            .cloned()
            .unwrap_or(Value::Null))
    }
}

fn urlencode(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~') {
                c.to_string()
            } else {
                format!("%{:02X}", c as u32)
            }
        })
        .collect()
}
