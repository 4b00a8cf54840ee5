use contracts::domain::a001_member::{
    validate_pin, Member, MemberDto, MemberId, MemberInfo, MemberRole,
};
use contracts::domain::common::AggregateId;
use contracts::system::auth::SessionClaims;
use uuid::Uuid;

use super::repository;

/// All active members
pub async fn list_all() -> anyhow::Result<Vec<Member>> {
    let db = crate::shared::data::db::get_connection();
    let members = repository::list_all(db).await?;
    Ok(members)
}

/// Public member list without PINs
pub async fn list_info() -> anyhow::Result<Vec<MemberInfo>> {
    Ok(list_all().await?.iter().map(|m| m.info()).collect())
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<Member>> {
    let member_id = MemberId::from_string(id).map_err(|e| anyhow::anyhow!(e))?;

    let db = crate::shared::data::db::get_connection();
    let member = repository::find_by_id(db, &member_id).await?;
    Ok(member)
}

/// Create a new member (leader action)
pub async fn create(dto: MemberDto) -> anyhow::Result<Uuid> {
    let role = match &dto.role {
        Some(s) => MemberRole::from_str(s).map_err(|e| anyhow::anyhow!(e))?,
        None => MemberRole::Regular,
    };
    let pin = dto.pin.clone().unwrap_or_else(|| "0000".to_string());

    let member = Member::new_for_insert(dto.name, role, dto.color, pin);
    member
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    let id = member.id.0;

    let db = crate::shared::data::db::get_connection();
    repository::insert(db, &member).await?;

    Ok(id)
}

/// Verified-old-PIN exchange. Members change their own PIN; the leader may
/// change anyone's, but the old PIN is always required.
pub async fn change_pin(
    session: &SessionClaims,
    member_id: &str,
    old_pin: &str,
    new_pin: &str,
) -> anyhow::Result<()> {
    if session.sub != member_id && !session.is_leader() {
        return Err(anyhow::anyhow!("Permission denied"));
    }

    validate_pin(new_pin).map_err(|e| anyhow::anyhow!(e))?;

    let member = get_by_id(member_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Member not found: {}", member_id))?;

    if member.pin != old_pin {
        return Err(anyhow::anyhow!("Old PIN incorrect"));
    }

    let db = crate::shared::data::db::get_connection();
    repository::update_pin(db, &member.id, new_pin).await?;

    Ok(())
}

/// PIN-equality login check. Returns the member on success, None on a bad
/// id/PIN pair so the handler can answer 401 without detail.
pub async fn verify_credentials(member_id: &str, pin: &str) -> anyhow::Result<Option<Member>> {
    let member = match get_by_id(member_id).await? {
        Some(m) => m,
        None => return Ok(None),
    };

    if member.metadata.is_deleted || member.pin != pin {
        return Ok(None);
    }

    Ok(Some(member))
}
