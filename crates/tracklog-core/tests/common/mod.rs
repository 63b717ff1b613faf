use proptest::prelude::*;
use tracklog_core::{Field, Track};

/// Track with the fields most tests group by
#[allow(dead_code)]
pub fn track(id: &str, artist: &str, title: &str, plays: i64) -> Track {
    Track::new(id)
        .with(Field::Artist, artist)
        .with(Field::Title, title)
        .with(Field::PlayCount, plays)
}

/// Small alphabets so generated libraries overlap with generated snapshots
#[allow(dead_code)]
pub fn arb_track() -> impl Strategy<Value = Track> {
    (
        "[a-e]",
        proptest::option::of("[xyz]{0,2}"),
        proptest::option::of("[xy]"),
        proptest::option::of(1950i64..2025),
        proptest::option::of(0i64..5),
        proptest::option::of(0i64..100),
        proptest::option::of(60_000i64..400_000),
    )
        .prop_map(|(id, title, artist, year, plays, rating, total)| {
            let mut t = Track::new(id);
            t.title = title;
            t.artist = artist;
            t.year = year;
            t.play_count = plays;
            t.rating = rating;
            t.total_time = total;
            t
        })
}

/// A library listing without duplicate persistent IDs
#[allow(dead_code)]
pub fn arb_library() -> impl Strategy<Value = Vec<Track>> {
    proptest::collection::vec(arb_track(), 0..6).prop_map(|tracks| {
        let mut seen = std::collections::BTreeSet::new();
        tracks
            .into_iter()
            .filter(|t| seen.insert(t.persistent_id.clone()))
            .collect()
    })
}
