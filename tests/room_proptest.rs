//! Property-based tests for room names
//!
//! Uses proptest to verify the canonical dm naming convention and the room
//! grammar over arbitrary ids.

use proptest::prelude::*;
use wirechat::realtime::room::{dm_room, group_room, parse_room, RoomKind};

proptest! {
    #[test]
    fn test_dm_room_symmetric(a in 0i64..1_000_000, b in 0i64..1_000_000) {
        prop_assert_eq!(dm_room(a, b), dm_room(b, a));
    }

    #[test]
    fn test_dm_room_canonical_form(a in 0i64..1_000_000, b in 0i64..1_000_000) {
        let low = a.min(b);
        let high = a.max(b);
        prop_assert_eq!(dm_room(a, b), format!("dm:{}:{}", low, high));
    }

    #[test]
    fn test_canonical_dm_room_parses(a in 0i64..1_000_000, b in 0i64..1_000_000) {
        let room = dm_room(a, b);
        match parse_room(&room) {
            Some(RoomKind::Dm(x, y)) => {
                prop_assert_eq!(x, a.min(b));
                prop_assert_eq!(y, a.max(b));
            }
            other => prop_assert!(false, "expected dm room, got {:?}", other),
        }
    }

    #[test]
    fn test_group_room_parses(id in 0i64..1_000_000) {
        prop_assert_eq!(parse_room(&group_room(id)), Some(RoomKind::Group(id)));
    }

    #[test]
    fn test_arbitrary_strings_never_panic(room in ".*") {
        // Parsing must reject garbage without crashing.
        let _ = parse_room(&room);
    }

    #[test]
    fn test_non_prefixed_strings_malformed(room in "[a-z]{1,8}") {
        prop_assert_eq!(parse_room(&room), None);
    }
}
