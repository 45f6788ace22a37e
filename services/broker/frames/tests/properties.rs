//! Property tests for the tag model and the frame codecs.

use broker_frames::{
    Address, BrokerInfo, Frame, FrameFlags, Id, Key, RouteJoin, RouteRemove, RouteSetup, Tag,
    Tags, WellKnownKey,
};
use proptest::prelude::*;
use std::collections::HashMap;

fn key_strategy() -> impl Strategy<Value = Key> {
    prop_oneof![
        prop::sample::select(WellKnownKey::ALL).prop_map(Key::WellKnown),
        "[a-z]{0,6}".prop_map(Key::Custom),
        // Custom keys spelled like registry names
        prop::sample::select(WellKnownKey::ALL).prop_map(|k| Key::custom(k.name())),
    ]
}

fn tag_list() -> impl Strategy<Value = Vec<Tag>> {
    prop::collection::vec(
        (key_strategy(), "[a-z0-9]{0,6}").prop_map(|(key, value)| Tag::new(key, value)),
        0..12,
    )
}

fn tags_strategy() -> impl Strategy<Value = Tags> {
    tag_list().prop_map(Tags::of)
}

fn id_strategy() -> impl Strategy<Value = Id> {
    (any::<u64>(), any::<u64>()).prop_map(|(high, low)| Id::from_parts(high, low))
}

fn flags_strategy() -> impl Strategy<Value = FrameFlags> {
    (0u16..1024).prop_map(FrameFlags::from_raw)
}

fn frame_strategy() -> impl Strategy<Value = Frame> {
    prop_oneof![
        (id_strategy(), ".*", tags_strategy(), flags_strategy())
            .prop_map(|(route, name, tags, flags)| {
                RouteSetup::new(route, name, tags, flags).into()
            }),
        (
            id_strategy(),
            id_strategy(),
            any::<i64>(),
            ".*",
            tags_strategy(),
            flags_strategy()
        )
            .prop_map(|(broker, route, ts, name, tags, flags)| {
                RouteJoin::new(broker, route, ts, name, tags, flags).into()
            }),
        (id_strategy(), id_strategy(), any::<i64>(), flags_strategy())
            .prop_map(|(broker, route, ts, flags)| {
                RouteRemove::new(broker, route, ts, flags).into()
            }),
        (id_strategy(), any::<i64>(), tags_strategy(), flags_strategy())
            .prop_map(|(broker, ts, tags, flags)| BrokerInfo::new(broker, ts, tags, flags).into()),
        (id_strategy(), tags_strategy(), tags_strategy(), flags_strategy())
            .prop_map(|(route, metadata, tags, flags)| {
                Address::new(route, metadata, tags, flags).into()
            }),
    ]
}

proptest! {
    #[test]
    fn prop_tags_sorted_unique_last_wins(input in tag_list()) {
        let tags = Tags::of(input.clone());

        let ordered: Vec<&Tag> = tags.iter().collect();
        for pair in ordered.windows(2) {
            prop_assert!(pair[0].key() < pair[1].key());
        }

        let mut expected: HashMap<&Key, &str> = HashMap::new();
        for tag in &input {
            expected.insert(tag.key(), tag.value());
        }
        prop_assert_eq!(tags.len(), expected.len());
        for (key, value) in expected {
            prop_assert_eq!(tags.get(key), Some(value));
        }
    }

    #[test]
    fn prop_empty_is_identity(input in tag_list()) {
        let x = Tags::of(input.clone());
        prop_assert_eq!(Tags::empty().and(&x), Tags::of(input));
        prop_assert_eq!(x.and(Tags::empty()), x);
    }

    #[test]
    fn prop_merge_is_associative(a in tags_strategy(), b in tags_strategy(), c in tags_strategy()) {
        prop_assert_eq!(a.and(&b).and(&c), a.and(&b.and(&c)));
    }

    #[test]
    fn prop_merge_matches_concatenated_input(a in tag_list(), b in tag_list()) {
        let merged = Tags::of(a.clone()).and(&Tags::of(b.clone()));
        prop_assert_eq!(merged, Tags::concat(a, b));
    }

    #[test]
    fn prop_frame_round_trip(frame in frame_strategy()) {
        let encoded = frame.encode();
        prop_assert_eq!(Frame::decode(&encoded).unwrap(), frame);
    }

    #[test]
    fn prop_strict_prefix_never_decodes(
        frame in frame_strategy(),
        cut in any::<prop::sample::Index>()
    ) {
        let encoded = frame.encode();
        let len = cut.index(encoded.len());
        prop_assert!(Frame::decode(&encoded[..len]).is_err());
    }

    #[test]
    fn prop_arbitrary_bytes_do_not_panic(bytes in prop::collection::vec(any::<u8>(), 0..96)) {
        let _ = Frame::decode(&bytes);
    }
}
