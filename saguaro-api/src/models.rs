use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// One player's stats as returned by the upstream API. Every field is
/// optional: the upstream omits whole sections freely and is not consistent
/// about scalar types, so fields with an unstable wire type stay [`Value`]
/// and are coerced at formatting time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerRecord {
    /// Account ID. Its presence is what distinguishes "found" from
    /// "not found" payloads.
    pub id: Option<Value>,
    pub nickname: Option<String>,
    pub account_id: Option<Value>,
    /// Opaque statistics blob. Only its presence matters for shape checks.
    pub statistics: Option<Value>,
    pub server: Option<ServerRef>,
    pub phone_number: Option<Value>,
    pub hours_played: Option<Value>,
    /// Either a bare number/string or a `{level, current_exp, next_exp}` object.
    pub level: Option<Value>,
    pub health: Option<Value>,
    pub hunger: Option<Value>,
    pub drug_addiction: Option<Value>,
    pub vip_info: Option<VipInfo>,
    pub money: Option<MoneyInfo>,
    pub job: Option<Value>,
    pub organization: Option<OrgInfo>,
    pub law_abiding: Option<Value>,
    pub wanted_level: Option<Value>,
    pub warnings: Option<Value>,
    pub family: Option<FamilyInfo>,
    pub status: Option<OnlineStatus>,
}

impl PlayerRecord {
    /// Minimal shape check: the payload must carry at least one identifying
    /// field to be treated as a player record at all.
    pub fn has_identity(&self) -> bool {
        (self.id.is_some() && self.level.is_some())
            || self.statistics.is_some()
            || self.account_id.is_some()
            || self.nickname.is_some()
    }
}

/// Server reference embedded in a player record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerRef {
    pub id: Option<Value>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VipInfo {
    pub level: Option<Value>,
    pub add_vip: Option<String>,
}

/// Player balances. Amounts arrive as numbers or strings depending on the
/// server, so they stay raw until formatting.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoneyInfo {
    pub total: Option<Value>,
    pub hand: Option<Value>,
    pub bank: Option<Value>,
    pub deposit: Option<Value>,
    pub donate_currency: Option<Value>,
    pub phone_balance: Option<Value>,
    pub charity: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrgInfo {
    pub name: Option<String>,
    pub rank: Option<Value>,
    pub uniform: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FamilyInfo {
    pub name: Option<String>,
    pub leader: Option<String>,
    pub member_info: Option<FamilyMember>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FamilyMember {
    pub rank: Option<Value>,
    pub is_leader: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OnlineStatus {
    pub online: Option<bool>,
    pub player_id: Option<Value>,
}

/// Live status of one game server, as held in the status cache.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerStatusEntry {
    /// Canonical display name.
    pub name: String,
    /// Current player count (0 when offline or errored).
    pub online: u32,
    pub is_online: bool,
    /// Set when the per-server status request failed; such entries never
    /// abort a batch refresh.
    pub error: Option<String>,
}

impl ServerStatusEntry {
    pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            online: 0,
            is_online: false,
            error: Some(message.into()),
        }
    }
}

/// Full status map keyed by server ID.
pub type StatusMap = HashMap<u16, ServerStatusEntry>;

/// Wire format of the per-server `/server/info` endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ServerInfoResponse {
    pub status: Option<String>,
    pub error: Option<Value>,
    pub server: Option<ServerInfoBody>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ServerInfoBody {
    pub online: Option<i64>,
    pub status: Option<String>,
}

/// One row of the aggregate `/status` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerRow {
    #[serde(default)]
    pub number: u16,
    pub name: Option<String>,
    #[serde(default)]
    pub online: i64,
    pub maxplayers: Option<i64>,
    pub status: Option<String>,
}

impl ServerRow {
    pub fn is_online(&self) -> bool {
        self.status.as_deref() == Some("online")
    }
}

/// Body of the aggregate `/status` endpoint.
#[derive(Debug, Deserialize)]
pub struct AggregateStatus {
    #[serde(default)]
    pub arizona: Vec<ServerRow>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_record_deserializes() {
        let record: PlayerRecord = serde_json::from_value(json!({
            "id": 123456,
            "server": {"id": 18, "name": "Casa Grande"},
            "phone_number": "555-0199",
            "hours_played": 420,
            "level": {"level": 12, "current_exp": 40, "next_exp": 100},
            "health": 87,
            "hunger": "64",
            "money": {"total": 1234567, "hand": 100, "bank": "900000"},
            "job": "Lawyer",
            "organization": {"name": "LSPD", "rank": 3, "uniform": true},
            "status": {"online": true, "player_id": 42}
        }))
        .unwrap();

        assert!(record.has_identity());
        assert_eq!(record.server.as_ref().unwrap().name.as_deref(), Some("Casa Grande"));
        assert_eq!(record.organization.as_ref().unwrap().uniform, Some(true));
    }

    #[test]
    fn test_identity_requires_known_field() {
        let empty: PlayerRecord = serde_json::from_value(json!({})).unwrap();
        assert!(!empty.has_identity());

        // id alone is not enough, it must be paired with a level field
        let id_only: PlayerRecord = serde_json::from_value(json!({"id": 5})).unwrap();
        assert!(!id_only.has_identity());

        let id_and_level: PlayerRecord =
            serde_json::from_value(json!({"id": 5, "level": 3})).unwrap();
        assert!(id_and_level.has_identity());

        let nickname_only: PlayerRecord =
            serde_json::from_value(json!({"nickname": "Vlad_Mensem"})).unwrap();
        assert!(nickname_only.has_identity());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let record: PlayerRecord =
            serde_json::from_value(json!({"id": 1, "level": 2, "brand_new_field": {"x": 1}}))
                .unwrap();
        assert!(record.has_identity());
    }

    #[test]
    fn test_server_row_online_flag() {
        let row: ServerRow = serde_json::from_value(json!({
            "number": 7, "name": "Mesa", "online": 512, "maxplayers": 1000, "status": "online"
        }))
        .unwrap();
        assert!(row.is_online());

        let down: ServerRow =
            serde_json::from_value(json!({"number": 8, "status": "offline"})).unwrap();
        assert!(!down.is_online());
        assert_eq!(down.online, 0);
    }
}
