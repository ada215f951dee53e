//! Rendering of API payloads into chat-ready plain text.
//!
//! Everything here is total: missing or malformed upstream values degrade to
//! a neutral rendering instead of an error, because these strings go straight
//! back to a chat user.

use serde_json::Value;

use crate::models::{PlayerRecord, ServerRow, StatusMap};
use crate::servers;

/// Coerce an upstream scalar to an integer. The API mixes numbers, numeric
/// strings and the occasional float for the same field.
fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        Value::Bool(b) => Some(*b as i64),
        _ => None,
    }
}

/// Render a scalar for display, without JSON string quoting.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Currency rendering with thousands separators. `None`/null become `$0`,
/// anything non-numeric falls back to its raw form. Never fails.
pub fn format_money(amount: Option<&Value>) -> String {
    let Some(amount) = amount else {
        return "$0".to_string();
    };
    if amount.is_null() {
        return "$0".to_string();
    }
    match as_i64(amount) {
        Some(n) => format!("${}", group_thousands(n)),
        None => format!("${}", display_value(amount)),
    }
}

/// Text progress bar: `[████░░░░░░] 40%`. The filled segment count is
/// clamped to `[0, length]`; the suffix shows the raw value. Missing or
/// non-numeric values render as zero.
pub fn progress_bar(value: Option<&Value>, max: i64, length: usize) -> String {
    let value = value.and_then(as_i64).unwrap_or(0);
    let filled = if max > 0 {
        (value * length as i64 / max).clamp(0, length as i64) as usize
    } else {
        0
    };
    format!(
        "[{}{}] {}%",
        "█".repeat(filled),
        "░".repeat(length - filled),
        value
    )
}

/// Assemble the multi-section player report. Sections whose source data is
/// absent are omitted; a record without the identifying `id` field renders
/// as a "not found" message.
pub fn format_stats(record: &PlayerRecord, nickname: &str, server_id: u16) -> String {
    let Some(player_id) = record.id.as_ref() else {
        return format!("❌ Player '{nickname}' was not found on server {server_id}.");
    };

    let server_name = record
        .server
        .as_ref()
        .and_then(|s| s.name.clone())
        .unwrap_or_else(|| format!("Server {server_id}"));
    let server_ref_id = record
        .server
        .as_ref()
        .and_then(|s| s.id.as_ref())
        .map(display_value)
        .unwrap_or_else(|| server_id.to_string());

    let mut msg = format!("👤 Player info for {nickname}\n\n");
    msg.push_str(&format!("🌐 Server: {server_name} (ID: {server_ref_id})\n\n"));
    msg.push_str(&format!("🆔 Player ID: {}\n", display_value(player_id)));
    msg.push_str(&format!(
        "📱 Phone: {}\n",
        record
            .phone_number
            .as_ref()
            .map(display_value)
            .unwrap_or_else(|| "Unknown".to_string())
    ));
    msg.push_str(&format!(
        "⏱ Hours played: {}\n\n",
        record.hours_played.as_ref().and_then(as_i64).unwrap_or(0)
    ));

    match record.level.as_ref() {
        Some(Value::Object(level)) => {
            let current = level.get("level").map(display_value);
            let current_exp = level.get("current_exp").map(display_value);
            let next_exp = level.get("next_exp").map(display_value);
            msg.push_str(&format!(
                "🌟 Level: {}\n",
                current.unwrap_or_else(|| "0".to_string())
            ));
            msg.push_str(&format!(
                "📊 Experience: {}/{}\n\n",
                current_exp.unwrap_or_else(|| "0".to_string()),
                next_exp.unwrap_or_else(|| "100".to_string())
            ));
        }
        Some(level) => {
            msg.push_str(&format!("🌟 Level: {}\n\n", display_value(level)));
        }
        None => {}
    }

    msg.push_str(&format!(
        "❤️ Health: {}\n",
        progress_bar(record.health.as_ref(), 100, 10)
    ));
    msg.push_str(&format!(
        "🍗 Hunger: {}\n",
        progress_bar(record.hunger.as_ref(), 100, 10)
    ));
    msg.push_str(&format!(
        "💉 Drug addiction: {}%\n\n",
        record
            .drug_addiction
            .as_ref()
            .and_then(as_i64)
            .unwrap_or(0)
    ));

    if let Some(vip) = &record.vip_info {
        msg.push_str(&format!(
            "👑 VIP: {}\n",
            vip.level
                .as_ref()
                .map(display_value)
                .unwrap_or_else(|| "None".to_string())
        ));
        if let Some(add_vip) = vip.add_vip.as_deref().filter(|v| !v.is_empty() && *v != "None") {
            msg.push_str(&format!("➕ Extra VIP: {add_vip}\n"));
        }
        msg.push('\n');
    }

    if let Some(money) = &record.money {
        msg.push_str("💰 Finances:\n");
        msg.push_str(&format!("  💵 Total: {}\n", format_money(money.total.as_ref())));
        msg.push_str(&format!("  💴 Cash: {}\n", format_money(money.hand.as_ref())));
        msg.push_str(&format!("  🏦 Bank: {}\n", format_money(money.bank.as_ref())));
        msg.push_str(&format!(
            "  💼 Deposit: {}\n",
            format_money(money.deposit.as_ref())
        ));
        msg.push_str(&format!(
            "  💎 Donate currency: {}\n",
            money
                .donate_currency
                .as_ref()
                .map(display_value)
                .unwrap_or_else(|| "0".to_string())
        ));
        msg.push_str(&format!(
            "  📱 Phone balance: {}\n",
            format_money(money.phone_balance.as_ref())
        ));
        msg.push_str(&format!(
            "  ❤️ Charity: {}\n\n",
            format_money(money.charity.as_ref())
        ));
    }

    msg.push_str(&format!(
        "💼 Job: {}\n",
        record
            .job
            .as_ref()
            .map(display_value)
            .unwrap_or_else(|| "Unemployed".to_string())
    ));

    if let Some(org) = &record.organization {
        msg.push_str(&format!(
            "🏢 Organization: {}\n",
            org.name.as_deref().unwrap_or("None")
        ));
        msg.push_str(&format!(
            "  🏅 Rank: {}\n",
            org.rank
                .as_ref()
                .map(display_value)
                .unwrap_or_else(|| "None".to_string())
        ));
        msg.push_str(if org.uniform.unwrap_or(false) {
            "  👔 In uniform\n\n"
        } else {
            "  👕 Not in uniform\n\n"
        });
    } else {
        msg.push_str("🏢 Organization: None\n\n");
    }

    msg.push_str(&format!(
        "⚖️ Law abiding: {}\n",
        progress_bar(record.law_abiding.as_ref(), 100, 10)
    ));
    msg.push_str(&format!(
        "🚨 Wanted level: {}\n",
        record.wanted_level.as_ref().and_then(as_i64).unwrap_or(0)
    ));
    msg.push_str(&format!(
        "⚠️ Warnings: {}\n\n",
        record.warnings.as_ref().and_then(as_i64).unwrap_or(0)
    ));

    if let Some(family) = &record.family {
        msg.push_str(&format!(
            "👥 Family: {}\n",
            family.name.as_deref().unwrap_or("Unknown")
        ));
        msg.push_str(&format!(
            "  👑 Leader: {}\n",
            family.leader.as_deref().unwrap_or("Unknown")
        ));
        let member = family.member_info.as_ref();
        msg.push_str(&format!(
            "  🏆 Am I the leader: {}\n",
            if member.and_then(|m| m.is_leader).unwrap_or(false) {
                "Yes"
            } else {
                "No"
            }
        ));
        msg.push_str(&format!(
            "  🎖️ Family rank: {}\n\n",
            member
                .and_then(|m| m.rank.as_ref())
                .map(display_value)
                .unwrap_or_else(|| "0".to_string())
        ));
    }

    if let Some(status) = &record.status {
        let online = status.online.unwrap_or(false);
        msg.push_str(&format!(
            "Status: {}\n",
            if online { "🟢 Online" } else { "🔴 Offline" }
        ));
        if online {
            msg.push_str(&format!(
                "🎮 In-game ID: {}\n",
                status
                    .player_id
                    .as_ref()
                    .map(display_value)
                    .unwrap_or_else(|| "Unknown".to_string())
            ));
        }
    }

    msg
}

/// Static server listing with a usage footer. Used as the fallback when the
/// aggregate status endpoint is unavailable.
pub fn server_list_text() -> String {
    let mut msg = String::from("🌐 Arizona RP servers:\n\n💻 PC servers (1-31):\n");
    for (id, name) in servers::SERVERS.iter().filter(|(id, _)| *id <= 31) {
        msg.push_str(&format!("{id:>2}: {name}\n"));
    }
    msg.push_str("\n📱 Mobile servers:\n");
    for (id, name) in servers::SERVERS.iter().filter(|(id, _)| *id > 31) {
        msg.push_str(&format!("{id}: {name}\n"));
    }
    msg.push_str("\nUsage: /stats <nickname> <server id>\nExample: /stats PlayerName 1");
    msg
}

fn push_server_row(
    msg: &mut String,
    row: &ServerRow,
    total_online: &mut i64,
    online_servers: &mut usize,
) {
    let name = row
        .name
        .clone()
        .unwrap_or_else(|| format!("Server {}", row.number));
    if row.is_online() {
        let max_players = row.maxplayers.unwrap_or(1000);
        msg.push_str(&format!(
            "✅ {}. {} | Online: {} / {}\n",
            row.number,
            name,
            group_thousands(row.online),
            group_thousands(max_players)
        ));
        *total_online += row.online;
        *online_servers += 1;
    } else {
        msg.push_str(&format!("❌ {}. {} | Server offline\n", row.number, name));
    }
}

/// Render the aggregate status rows: PC and mobile sections plus totals.
pub fn format_server_rows(rows: &[ServerRow]) -> String {
    let mut sorted: Vec<ServerRow> = rows.to_vec();
    sorted.sort_by_key(|row| row.number);

    let mut msg = String::from("🌐 Arizona RP servers (live)\n\n📊 Current server status:\n\n");
    let mut total_online: i64 = 0;
    let mut online_servers = 0usize;

    for row in sorted.iter().filter(|r| (1..=31).contains(&r.number)) {
        push_server_row(&mut msg, row, &mut total_online, &mut online_servers);
    }

    msg.push_str("\n📱 Mobile servers:\n");
    for row in sorted.iter().filter(|r| (101..=103).contains(&r.number)) {
        push_server_row(&mut msg, row, &mut total_online, &mut online_servers);
    }

    msg.push_str("\n📊 Summary:\n");
    msg.push_str(&format!(
        "🎮 Players online: {}\n",
        group_thousands(total_online)
    ));
    msg.push_str(&format!(
        "⚡ Servers online: {}/{}\n",
        online_servers,
        rows.len()
    ));
    msg.push_str("\n📝 Player stats: /stats <nickname> <server id>\n💡 Example: /stats PlayerName 1");
    msg
}

/// Render a cached per-server status map, one line per server in ID order.
pub fn format_status_map(statuses: &StatusMap) -> String {
    let mut ids: Vec<u16> = statuses.keys().copied().collect();
    ids.sort_unstable();

    let mut msg = String::from("📊 Server online summary\n\n");
    for id in ids {
        let entry = &statuses[&id];
        if entry.is_online {
            msg.push_str(&format!(
                "🟢 [{id}] {} — {} online\n",
                entry.name,
                group_thousands(entry.online as i64)
            ));
        } else {
            msg.push_str(&format!("🔴 [{id}] {} — offline\n", entry.name));
        }
    }
    msg
}
