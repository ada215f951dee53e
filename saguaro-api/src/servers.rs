/// Input validation and the static server table
use thiserror::Error;

/// Canonical table of known game servers: PC shards 1-31 plus the
/// mobile variants 101-103. Fixed at build time.
pub const SERVERS: &[(u16, &str)] = &[
    (1, "Phoenix"),
    (2, "Tucson"),
    (3, "Scottdale"),
    (4, "Chandler"),
    (5, "Brainburg"),
    (6, "Saint Rose"),
    (7, "Mesa"),
    (8, "Red Rock"),
    (9, "Yuma"),
    (10, "Surprise"),
    (11, "Prescott"),
    (12, "Glendale"),
    (13, "Kingman"),
    (14, "Winslow"),
    (15, "Payson"),
    (16, "Gilbert"),
    (17, "Show Low"),
    (18, "Casa Grande"),
    (19, "Page"),
    (20, "Sun City"),
    (21, "Queen Creek"),
    (22, "Sedona"),
    (23, "Holiday"),
    (24, "Wednesday"),
    (25, "Yava"),
    (26, "Faraway"),
    (27, "Bumble Bee"),
    (28, "Christmas"),
    (29, "Mirage"),
    (30, "Love"),
    (31, "Drake"),
    (101, "Mobile I"),
    (102, "Mobile II"),
    (103, "Mobile III"),
];

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Player nickname cannot be empty")]
    NicknameEmpty,

    #[error("Player nickname too short (min 3 characters, got {0})")]
    NicknameTooShort(usize),

    #[error("Player nickname too long (max 24 characters, got {0})")]
    NicknameTooLong(usize),

    #[error("Player nickname contains invalid characters (only letters, digits and underscore allowed)")]
    NicknameInvalidChars,

    #[error("Unknown server ID {0}. Available servers: PC 1-31, Mobile 101-103")]
    UnknownServer(u16),
}

/// Validates a player nickname
///
/// Rules:
/// - Cannot be empty
/// - 3 to 24 characters
/// - Only ASCII letters, digits and underscores
pub fn validate_nickname(nickname: &str) -> Result<(), ValidationError> {
    if nickname.is_empty() {
        return Err(ValidationError::NicknameEmpty);
    }

    if nickname.len() < 3 {
        return Err(ValidationError::NicknameTooShort(nickname.len()));
    }

    if nickname.len() > 24 {
        return Err(ValidationError::NicknameTooLong(nickname.len()));
    }

    if !nickname
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ValidationError::NicknameInvalidChars);
    }

    Ok(())
}

/// Validates a server ID against the static table, returning the canonical
/// display name so callers don't have to look it up again.
pub fn validate_server_id(server_id: u16) -> Result<&'static str, ValidationError> {
    server_name(server_id).ok_or(ValidationError::UnknownServer(server_id))
}

/// Display name for a known server ID.
pub fn server_name(server_id: u16) -> Option<&'static str> {
    SERVERS
        .iter()
        .find(|(id, _)| *id == server_id)
        .map(|(_, name)| *name)
}

/// All known server IDs, in table order.
pub fn known_server_ids() -> impl Iterator<Item = u16> {
    SERVERS.iter().map(|(id, _)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Nickname validation tests
    #[test]
    fn test_valid_nicknames() {
        assert!(validate_nickname("Vlad_Mensem").is_ok());
        assert!(validate_nickname("abc").is_ok()); // exactly 3 chars
        assert!(validate_nickname("Player_123").is_ok());
        assert!(validate_nickname("123456789012345678901234").is_ok()); // exactly 24 chars
        assert!(validate_nickname("___").is_ok());
    }

    #[test]
    fn test_empty_nickname() {
        assert_eq!(validate_nickname(""), Err(ValidationError::NicknameEmpty));
    }

    #[test]
    fn test_nickname_too_short() {
        assert_eq!(
            validate_nickname("ab"),
            Err(ValidationError::NicknameTooShort(2))
        );
        assert_eq!(
            validate_nickname("a"),
            Err(ValidationError::NicknameTooShort(1))
        );
    }

    #[test]
    fn test_nickname_too_long() {
        let long_name = "1234567890123456789012345"; // 25 characters
        assert_eq!(
            validate_nickname(long_name),
            Err(ValidationError::NicknameTooLong(25))
        );
    }

    #[test]
    fn test_nickname_invalid_chars() {
        assert_eq!(
            validate_nickname("Player-123"),
            Err(ValidationError::NicknameInvalidChars)
        );
        assert_eq!(
            validate_nickname("Player 123"),
            Err(ValidationError::NicknameInvalidChars)
        );
        assert_eq!(
            validate_nickname("Игрок123"),
            Err(ValidationError::NicknameInvalidChars)
        );
    }

    // Server ID validation tests
    #[test]
    fn test_every_known_server_validates() {
        for (id, name) in SERVERS {
            assert_eq!(validate_server_id(*id), Ok(*name));
        }
    }

    #[test]
    fn test_known_server_names() {
        assert_eq!(validate_server_id(1), Ok("Phoenix"));
        assert_eq!(validate_server_id(18), Ok("Casa Grande"));
        assert_eq!(validate_server_id(31), Ok("Drake"));
        assert_eq!(validate_server_id(103), Ok("Mobile III"));
    }

    #[test]
    fn test_unknown_server_ids() {
        assert_eq!(validate_server_id(0), Err(ValidationError::UnknownServer(0)));
        assert_eq!(
            validate_server_id(32),
            Err(ValidationError::UnknownServer(32))
        );
        assert_eq!(
            validate_server_id(100),
            Err(ValidationError::UnknownServer(100))
        );
        assert_eq!(
            validate_server_id(104),
            Err(ValidationError::UnknownServer(104))
        );
    }

    #[test]
    fn test_unknown_server_message_lists_ranges() {
        let msg = validate_server_id(200).unwrap_err().to_string();
        assert!(msg.contains("PC 1-31"));
        assert!(msg.contains("Mobile 101-103"));
    }

    #[test]
    fn test_known_server_ids_cover_table() {
        let ids: Vec<u16> = known_server_ids().collect();
        assert_eq!(ids.len(), 34);
        assert!(ids.contains(&1));
        assert!(ids.contains(&31));
        assert!(ids.contains(&101));
        assert!(!ids.contains(&32));
    }
}
