/// Usage hint shown when `/stats` arguments don't parse.
pub const STATS_USAGE: &str =
    "⚠️ Usage: /stats <nickname> <server id>\nExample: /stats Vlad_Mensem 18";

/// Split a chat message into pieces no longer than `limit` bytes, preferring
/// line boundaries. A single line longer than the limit is split hard, on
/// char boundaries.
pub fn chunk_message(text: &str, limit: usize) -> Vec<String> {
    if text.len() <= limit {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    for line in text.split_inclusive('\n') {
        if !current.is_empty() && current.len() + line.len() > limit {
            chunks.push(std::mem::take(&mut current));
        }
        if line.len() > limit {
            for c in line.chars() {
                if current.len() + c.len_utf8() > limit {
                    chunks.push(std::mem::take(&mut current));
                }
                current.push(c);
            }
        } else {
            current.push_str(line);
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Parse `/stats` arguments out of free-form message text.
pub fn parse_stats_args(args: &str) -> Result<(String, u16), String> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(STATS_USAGE.to_string());
    }
    let server_id = parts[1]
        .parse()
        .map_err(|_| "❌ Server ID must be a number.".to_string())?;
    Ok((parts[0].to_string(), server_id))
}

/// Split a message into a command name and its argument tail. Returns `None`
/// for non-command messages. A `@BotName` suffix on the command is dropped.
pub fn split_command(text: &str) -> Option<(&str, &str)> {
    let rest = text.trim().strip_prefix('/')?;
    let (command, args) = match rest.split_once(char::is_whitespace) {
        Some((command, args)) => (command, args.trim()),
        None => (rest, ""),
    };
    let command = command.split('@').next().unwrap_or(command);
    if command.is_empty() {
        None
    } else {
        Some((command, args))
    }
}
