/**
 * Room Names
 *
 * Rooms are named broadcast channels identified by plain strings. Two shapes
 * are accepted on subscribe:
 *
 * ```text
 * room = "group:" 1*DIGIT
 *      / "dm:" 1*DIGIT ":" 1*DIGIT
 * ```
 *
 * Anything else is malformed. A third shape, `user:<id>`, exists only as the
 * per-identity private room every connection joins automatically; it is not
 * subscribable and therefore not part of the grammar.
 *
 * # Canonical DM naming
 *
 * Both participants of a direct conversation must compute the identical room
 * key without coordination, so the canonical constructor always writes the
 * two ids in ascending order: `dm_room(9, 3) == dm_room(3, 9) == "dm:3:9"`.
 *
 * The server never renormalizes incoming room strings. A subscribe to
 * `dm:9:3` parses and authorizes against {9, 3} like any other dm room, but
 * it is a different key from `dm:3:9` and will not receive publishes
 * addressed to the canonical form. Using the canonical form is caller
 * responsibility.
 */

/// A parsed, well-formed room name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomKind {
    /// `group:<group-id>` — authorized by group membership
    Group(i64),
    /// `dm:<a>:<b>` — authorized iff the caller is one of the two ids,
    /// exactly as written in the string
    Dm(i64, i64),
}

/// Parse a room name against the grammar
///
/// Returns `None` for any string that is not `group:<int>` or
/// `dm:<int>:<int>`.
pub fn parse_room(room: &str) -> Option<RoomKind> {
    if let Some(rest) = room.strip_prefix("group:") {
        return parse_id(rest).map(RoomKind::Group);
    }

    if let Some(rest) = room.strip_prefix("dm:") {
        let mut parts = rest.splitn(2, ':');
        let a = parse_id(parts.next()?)?;
        let b = parse_id(parts.next()?)?;
        return Some(RoomKind::Dm(a, b));
    }

    None
}

/// Parse a non-empty all-digit id component
fn parse_id(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Canonical room name for a direct conversation between two users
///
/// Both sides compute the identical key regardless of argument order.
pub fn dm_room(a: i64, b: i64) -> String {
    let (low, high) = if a < b { (a, b) } else { (b, a) };
    format!("dm:{}:{}", low, high)
}

/// Room name for a group channel
pub fn group_room(group_id: i64) -> String {
    format!("group:{}", group_id)
}

/// Per-identity private room, joined automatically on connect
pub fn user_room(user_id: i64) -> String {
    format!("user:{}", user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_group_room() {
        assert_eq!(parse_room("group:7"), Some(RoomKind::Group(7)));
        assert_eq!(parse_room("group:123456"), Some(RoomKind::Group(123456)));
    }

    #[test]
    fn test_parse_dm_room() {
        assert_eq!(parse_room("dm:3:9"), Some(RoomKind::Dm(3, 9)));
    }

    #[test]
    fn test_parse_dm_room_keeps_order_as_written() {
        // Out-of-canonical-order ids still parse; the string is simply a
        // different room key from the canonical one.
        assert_eq!(parse_room("dm:9:3"), Some(RoomKind::Dm(9, 3)));
    }

    #[test]
    fn test_parse_malformed_rooms() {
        for room in [
            "", "xyz", "group:", "group:abc", "group:1:2", "dm:", "dm:1", "dm:1:", "dm::2",
            "dm:a:b", "dm:1:2:3", "user:5", "group:-1", "dm:-1:2", "group: 1", "GROUP:1",
        ] {
            assert_eq!(parse_room(room), None, "expected {:?} to be malformed", room);
        }
    }

    #[test]
    fn test_dm_room_is_symmetric() {
        assert_eq!(dm_room(3, 9), "dm:3:9");
        assert_eq!(dm_room(9, 3), "dm:3:9");
    }

    #[test]
    fn test_room_constructors() {
        assert_eq!(group_room(7), "group:7");
        assert_eq!(user_room(42), "user:42");
    }

    #[test]
    fn test_canonical_dm_room_parses() {
        let room = dm_room(10, 2);
        assert_eq!(parse_room(&room), Some(RoomKind::Dm(2, 10)));
    }
}
