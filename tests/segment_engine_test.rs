mod common;

use approx::assert_relative_eq;
use common::{assert_position_close, constant_records, identity_records, linear_record};
use numeph::{
    ephemeris::{
        ephemeris_set::EphemerisSet,
        segment_id::SegmentId,
        segment_store::{SegmentStore, WindowEnd},
        topology::{SignedSegment, Topology},
    },
    kernel::{kernel_slicer::KernelSlicer, memory_kernel::MemoryKernel},
    numeph_errors::NumephError,
    persistence::{self, json_codec::JsonCodec, text_codec::TextCodec, PersistenceAdapter},
    time::TimeWindow,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn earth_moon_kernel() -> MemoryKernel {
    MemoryKernel::new()
        .with_segment(SegmentId::new(0, 3), &constant_records(4, 25.0, [100.0, 0.0, 0.0]))
        .unwrap()
        .with_segment(SegmentId::new(3, 399), &constant_records(4, 25.0, [1.0, 0.0, 0.0]))
        .unwrap()
        .with_segment(SegmentId::new(3, 301), &constant_records(4, 25.0, [5.0, 0.0, 0.0]))
        .unwrap()
}

#[test]
fn sliced_store_is_a_partition() {
    let mut kernel = MemoryKernel::new()
        .with_segment(SegmentId::new(0, 3), &identity_records(6, 10.0))
        .unwrap();
    let set = KernelSlicer::new()
        .slice(&mut kernel, None, Some(TimeWindow::new(5.0, 45.0).unwrap()))
        .unwrap();
    let store = set.segment(SegmentId::new(0, 3)).unwrap();

    assert_eq!(store.len(), 4);
    for pair in store.records().windows(2) {
        assert!(pair[0].domain_start() < pair[1].domain_start());
        assert_eq!(pair[0].domain_end(), pair[1].domain_start());
    }
    assert_eq!(store.coverage(), Some((0.0, 40.0)));
}

#[test]
fn find_record_is_deterministic() {
    let store = SegmentStore::new(SegmentId::new(0, 3), identity_records(50, 86400.0)).unwrap();
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..500 {
        let t = rng.random_range(0.0..50.0 * 86400.0);
        let index = store.find_record(t).unwrap();
        assert_eq!(store.find_record(t).unwrap(), index);

        let record = &store.records()[index];
        assert!(record.domain_start() <= t && t < record.domain_end());
    }
}

#[test]
fn shared_boundary_belongs_to_the_next_record() {
    let store = SegmentStore::new(SegmentId::new(0, 3), identity_records(2, 10.0)).unwrap();

    assert_eq!(store.find_record(0.0), Ok(0));
    assert_eq!(store.find_record(10.0), Ok(1));
    assert_eq!(store.find_record(19.999), Ok(1));

    for t in [-1.0, 20.0, f64::NAN] {
        assert!(matches!(
            store.find_record(t),
            Err(NumephError::TimeOutOfRange { .. })
        ));
    }
}

#[test]
fn gaps_are_not_covered() {
    let store = SegmentStore::new(
        SegmentId::new(0, 3),
        vec![
            linear_record(0.0, 10.0, [1.0, 0.0], [0.0, 0.0], [0.0, 0.0]),
            linear_record(12.0, 20.0, [2.0, 0.0], [0.0, 0.0], [0.0, 0.0]),
        ],
    )
    .unwrap();
    assert_eq!(
        store.find_record(11.0),
        Err(NumephError::TimeOutOfRange {
            segment: SegmentId::new(0, 3),
            time: 11.0
        })
    );
    assert_eq!(store.find_record(12.0), Ok(1));
}

#[test]
fn restrict_is_idempotent() {
    let store = SegmentStore::new(SegmentId::new(0, 3), identity_records(10, 10.0)).unwrap();
    let once = store.restrict(15.0, 62.0).unwrap();
    let twice = once.restrict(15.0, 62.0).unwrap();

    assert_eq!(once, twice);
    assert_eq!(once.coverage(), Some((10.0, 70.0)));
    assert_eq!(
        store.window(15.0, 62.0, WindowEnd::Inclusive).unwrap(),
        once
    );
}

#[test]
fn evaluation_is_continuous_across_boundaries() {
    let store = SegmentStore::new(SegmentId::new(0, 3), identity_records(2, 10.0)).unwrap();
    let set = EphemerisSet::from_stores([store]);

    let before = set.position(SegmentId::new(0, 3), 10.0 - 1e-9).unwrap();
    let at = set.position(SegmentId::new(0, 3), 10.0).unwrap();
    assert_relative_eq!(before.x, at.x, epsilon = 1e-6);
    assert_relative_eq!(at.x, 10.0, epsilon = 1e-12);
}

#[test]
fn linear_segment_end_to_end() {
    let mut kernel = MemoryKernel::new()
        .with_segment(
            SegmentId::new(0, 3),
            &[linear_record(0.0, 100.0, [50.0, 50.0], [0.0, 0.0], [0.0, 0.0])],
        )
        .unwrap();
    let set = KernelSlicer::new().slice(&mut kernel, None, None).unwrap();

    let position = set.position(SegmentId::new(0, 3), 50.0).unwrap();
    assert_position_close(&position, [50.0, 0.0, 0.0], 1e-12);
    assert_eq!(
        set.position(SegmentId::new(0, 3), 100.0),
        Err(NumephError::TimeOutOfRange {
            segment: SegmentId::new(0, 3),
            time: 100.0
        })
    );
}

#[test]
fn composition_sums_signed_segments() {
    let set = KernelSlicer::new()
        .slice(&mut earth_moon_kernel(), None, None)
        .unwrap();
    let topology = Topology::new()
        .with_body(
            "earth",
            vec![SignedSegment::plus(0, 3), SignedSegment::plus(3, 399)],
        )
        .with_body(
            "moon",
            vec![SignedSegment::plus(3, 301), SignedSegment::minus(3, 399)],
        );

    assert_position_close(
        &set.body_position("earth", 30.0, &topology).unwrap(),
        [101.0, 0.0, 0.0],
        1e-12,
    );
    assert_position_close(
        &set.body_position("Moon", 30.0, &topology).unwrap(),
        [4.0, 0.0, 0.0],
        1e-12,
    );
    assert_eq!(
        set.body_position("pluto", 30.0, &topology),
        Err(NumephError::UnknownBody("pluto".to_string()))
    );
}

#[test]
fn geocentric_topology_needs_all_its_segments() {
    let set = KernelSlicer::new()
        .slice(&mut earth_moon_kernel(), None, None)
        .unwrap();
    let topology = Topology::geocentric();

    assert_position_close(
        &set.body_position("moon", 10.0, &topology).unwrap(),
        [4.0, 0.0, 0.0],
        1e-12,
    );
    assert_eq!(
        set.body_position("sun", 10.0, &topology),
        Err(NumephError::UnknownSegment(SegmentId::new(0, 10)))
    );
}

#[test]
fn persistence_round_trip_is_bit_exact() {
    let mut rng = StdRng::seed_from_u64(7);
    let records = (0..20)
        .map(|i| {
            let start = i as f64 * 1382400.0 - 14200747200.0;
            let mut axis = || -> Vec<f64> { (0..13).map(|_| rng.random_range(-1e8..1e8)).collect() };
            let (x, y, z) = (axis(), axis(), axis());
            numeph::ephemeris::chebyshev_record::ChebyshevRecord::new(
                start,
                start + 1382400.0,
                x,
                y,
                z,
            )
            .unwrap()
        })
        .collect();
    let set = EphemerisSet::from_stores([
        SegmentStore::new(SegmentId::new(0, 3), records).unwrap(),
        SegmentStore::new(SegmentId::new(3, 301), identity_records(3, 0.1)).unwrap(),
    ]);

    let dir = tempfile::tempdir().unwrap();
    for name in ["set.json", "set.txt", "set.JSON", "set"] {
        let path = camino::Utf8PathBuf::from_path_buf(dir.path().join(name)).unwrap();
        persistence::save(&set, &path).unwrap();
        let loaded = persistence::load(&path).unwrap();
        assert_eq!(loaded, set, "round trip through {name}");

        for (original, restored) in set.iter().zip(loaded.iter()) {
            for (a, b) in original.records().iter().zip(restored.records()) {
                assert_eq!(a.domain_start().to_bits(), b.domain_start().to_bits());
                assert_eq!(a.domain_end().to_bits(), b.domain_end().to_bits());
                for (ca, cb) in a.x().iter().zip(b.x()) {
                    assert_eq!(ca.to_bits(), cb.to_bits());
                }
            }
        }
    }

    // the extension picks the format
    let json_path = camino::Utf8PathBuf::from_path_buf(dir.path().join("set.json")).unwrap();
    assert_eq!(JsonCodec::default().load(&json_path).unwrap(), set);
    assert!(TextCodec.load(&json_path).is_err());
}
