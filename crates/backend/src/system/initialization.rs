use anyhow::Result;
use chrono::NaiveDate;

use contracts::domain::a001_member::{Member, MemberRole};
use contracts::domain::a002_report::{Report, ReportId};
use contracts::domain::a003_team_target::TeamTarget;
use contracts::domain::common::EntityMetadata;

use crate::domain::{a001_member, a002_report, a003_team_target};
use crate::shared::data::db::get_connection;

/// Seed the four-person team, the campaign month targets and a handful of
/// sample reports into an empty database.
pub async fn ensure_seed_data() -> Result<()> {
    ensure_seed_members().await?;
    ensure_seed_targets().await?;
    ensure_sample_reports().await?;
    Ok(())
}

async fn ensure_seed_members() -> Result<()> {
    let db = get_connection();

    if a001_member::repository::count(db).await? > 0 {
        return Ok(());
    }

    tracing::info!("Seeding members");

    let members = [
        ("Mỹ Anh", MemberRole::Leader, "#fbbf24", "1234"),
        ("Vũ", MemberRole::Regular, "#3b82f6", "1111"),
        ("Quỳnh", MemberRole::Regular, "#10b981", "2222"),
        ("Ngân", MemberRole::Regular, "#ef4444", "3333"),
    ];

    for (name, role, color, pin) in members {
        let member = Member::new_for_insert(
            name.to_string(),
            role,
            color.to_string(),
            pin.to_string(),
        );
        a001_member::repository::insert(db, &member).await?;
    }

    Ok(())
}

async fn ensure_seed_targets() -> Result<()> {
    let db = get_connection();

    if a003_team_target::repository::count(db).await? > 0 {
        return Ok(());
    }

    tracing::info!("Seeding month targets");

    let targets = [
        ("2025-10", "2025-10-14", "2025-10-31", 1_000_666_667i64),
        ("2025-11", "2025-11-01", "2025-11-30", 4_000_000_000),
        ("2025-12", "2025-12-01", "2025-12-31", 8_000_000_000),
        ("2026-01", "2026-01-01", "2026-01-19", 12_000_000_000),
    ];

    for (month, start, end, target) in targets {
        let row = TeamTarget::new_for_insert(
            month.to_string(),
            target,
            date(start),
            date(end),
        );
        a003_team_target::repository::insert(db, &row).await?;
    }

    Ok(())
}

async fn ensure_sample_reports() -> Result<()> {
    let db = get_connection();

    if a002_report::repository::count(db).await? >= 6 {
        return Ok(());
    }

    let members = a001_member::repository::list_all(db).await?;
    if members.len() < 3 {
        return Ok(());
    }

    tracing::info!("Seeding sample reports");

    // (member index, date, reach, responses, deals, revenue, product, warehouse, channel)
    let samples: [(usize, &str, i64, i64, i64, i64, &str, &str, &str); 6] = [
        (0, "2025-10-14", 10, 3, 1, 30_000_000, "Long Mã", "SG", "Facebook"),
        (1, "2025-10-14", 12, 4, 1, 35_000_000, "Mã Thượng Vân", "HN", "Cá nhân"),
        (2, "2025-10-14", 8, 2, 1, 20_000_000, "Vó Ngựa Nước Nam", "SG", "BNI"),
        (0, "2025-10-15", 15, 5, 2, 50_000_000, "Long Mã", "SG", "Facebook"),
        (1, "2025-10-15", 9, 3, 1, 25_000_000, "Mã Đáo Thành Công", "HN", "Shopee"),
        (2, "2025-10-16", 11, 3, 1, 27_000_000, "Mã Thượng Vân", "Xưởng", "Website"),
    ];

    for (idx, day, reach, responses, deals, revenue, product, warehouse, channel) in samples {
        let report = Report {
            id: ReportId::new_v4(),
            member_id: members[idx].id,
            report_date: date(day),
            reach,
            responses,
            deals,
            revenue,
            product: Some(product.to_string()),
            channel: Some(channel.to_string()),
            warehouse: Some(warehouse.to_string()),
            order_code: None,
            order_date: None,
            customer_name: None,
            phone: None,
            address: None,
            note: None,
            status: None,
            metadata: EntityMetadata::new(),
        };
        a002_report::repository::insert(db, &report).await?;
    }

    Ok(())
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_default()
}
