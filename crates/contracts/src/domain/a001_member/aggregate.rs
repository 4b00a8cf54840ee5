use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{AggregateId, EntityMetadata};

// ============================================================================
// ID Type
// ============================================================================

/// Unique identifier of a team member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(pub Uuid);

impl MemberId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for MemberId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(MemberId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Role
// ============================================================================

/// Team role. Exactly one leader configures targets and allocations;
/// everyone else files daily reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Leader,
    Regular,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Leader => "leader",
            MemberRole::Regular => "regular",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "leader" => Ok(MemberRole::Leader),
            "regular" => Ok(MemberRole::Regular),
            other => Err(format!("Unknown member role: {}", other)),
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Sales team member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub role: MemberRole,
    /// Display color (hex, e.g. "#3b82f6")
    pub color: String,
    /// Secret 4-digit login PIN. Never serialized into list/info payloads.
    pub pin: String,
    pub metadata: EntityMetadata,
}

impl Member {
    pub fn new_for_insert(name: String, role: MemberRole, color: String, pin: String) -> Self {
        Self {
            id: MemberId::new_v4(),
            name,
            role,
            color,
            pin,
            metadata: EntityMetadata::new(),
        }
    }

    pub fn to_string_id(&self) -> String {
        self.id.as_string()
    }

    /// Public projection without the PIN
    pub fn info(&self) -> MemberInfo {
        MemberInfo {
            id: self.id.as_string(),
            name: self.name.clone(),
            role: self.role,
            color: self.color.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Member name cannot be empty".into());
        }
        if self.color.trim().is_empty() {
            return Err("Member color cannot be empty".into());
        }
        validate_pin(&self.pin)?;
        Ok(())
    }
}

/// PIN must be exactly 4 ASCII digits
pub fn validate_pin(pin: &str) -> Result<(), String> {
    if pin.len() != 4 || !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err("PIN must be 4 digits".into());
    }
    Ok(())
}

// ============================================================================
// DTOs
// ============================================================================

/// Member payload exposed to clients: identity and display fields only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberInfo {
    pub id: String,
    pub name: String,
    pub role: MemberRole,
    pub color: String,
}

/// Create/update payload for a member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDto {
    pub id: Option<String>,
    pub name: String,
    pub role: Option<String>,
    pub color: String,
    pub pin: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_format_is_enforced() {
        assert!(validate_pin("1234").is_ok());
        assert!(validate_pin("0000").is_ok());
        assert!(validate_pin("123").is_err());
        assert!(validate_pin("12345").is_err());
        assert!(validate_pin("12a4").is_err());
        assert!(validate_pin("").is_err());
    }

    #[test]
    fn info_omits_pin() {
        let member = Member::new_for_insert(
            "Vũ".to_string(),
            MemberRole::Regular,
            "#3b82f6".to_string(),
            "1111".to_string(),
        );
        let json = serde_json::to_value(member.info()).unwrap();
        assert!(json.get("pin").is_none());
        assert_eq!(json["name"], "Vũ");
        assert_eq!(json["role"], "regular");
    }

    #[test]
    fn role_round_trip() {
        assert_eq!(MemberRole::from_str("leader").unwrap(), MemberRole::Leader);
        assert_eq!(MemberRole::Leader.as_str(), "leader");
        assert!(MemberRole::from_str("admin").is_err());
    }
}
