use crate::{
    prelude::{
        Config, ConfigError, EpochTag, Error, HatchOpts, LosCorrection, RawObservation,
        RejectionCause, SatCorrection, Session, Usability, Vector3,
    },
    tests::{
        init_logger, los_correction, sat_correction, test_config, test_receiver, SatelliteTrack,
        TEST_DOY,
    },
};

const T0: u32 = 7200;

fn tag(sod: u32) -> EpochTag {
    EpochTag::new(TEST_DOY, sod)
}

/// Short time constant, so filters converge within a minute
fn fast_config() -> Config {
    test_config().with_hatch(HatchOpts {
        time_s: 10.0,
        ..Default::default()
    })
}

fn tracks() -> [SatelliteTrack; 3] {
    [
        SatelliteTrack::new(2, 25.0),
        SatelliteTrack::new(9, 50.0).with_range_rate(-300.0),
        SatelliteTrack::new(17, 75.0).with_iono(4.0, 0.001),
    ]
}

fn observations(tag: EpochTag) -> Vec<RawObservation> {
    tracks().iter().map(|sat| sat.observation(tag)).collect()
}

fn corrections() -> (Vec<SatCorrection>, Vec<LosCorrection>) {
    let dirs = [
        Vector3::new(1.0, 0.2, 0.4),
        Vector3::new(0.5, 0.5, 1.0),
        Vector3::new(0.6, -0.1, 0.9),
    ];

    let sats = tracks()
        .iter()
        .zip(dirs)
        .map(|(track, dir)| sat_correction(track.sv.prn, 3, dir, track.range_m))
        .collect::<Vec<_>>();

    let los = tracks()
        .iter()
        .map(|track| los_correction(track.sv.prn))
        .collect::<Vec<_>>();

    (sats, los)
}

#[test]
fn invalid_configuration() {
    let cfg = test_config().with_mask_angle(-1.0);

    match Session::new(cfg, test_receiver(), TEST_DOY) {
        Err(Error::Config(ConfigError::ParameterOutOfRange { name, .. })) => {
            assert_eq!(name, "mask_angle_deg");
        },
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn epochs_must_be_chronological() {
    init_logger();

    let mut session = Session::new(test_config(), test_receiver(), TEST_DOY).unwrap();

    session
        .process_epoch(tag(T0), &observations(tag(T0)), &[], &[])
        .unwrap();

    assert_eq!(
        session.process_epoch(tag(T0), &observations(tag(T0)), &[], &[]),
        Err(Error::NonChronologicalEpoch(tag(T0), tag(T0)))
    );

    assert_eq!(
        session.process_epoch(tag(T0 - 1), &[], &[], &[]),
        Err(Error::NonChronologicalEpoch(tag(T0 - 1), tag(T0)))
    );

    // a rejected epoch does not alter the session
    assert_eq!(session.summary().epochs, 1);

    session
        .process_epoch(tag(T0 + 1), &observations(tag(T0 + 1)), &[], &[])
        .unwrap();

    assert_eq!(session.summary().epochs, 2);
}

#[test]
fn single_day_session() {
    let mut session = Session::new(test_config(), test_receiver(), TEST_DOY).unwrap();
    let other_day = EpochTag::new(TEST_DOY + 1, 0);

    assert_eq!(
        session.process_epoch(other_day, &[], &[], &[]),
        Err(Error::DayMismatch(other_day, TEST_DOY))
    );
}

#[test]
fn foreign_observations_are_dropped() {
    let mut session = Session::new(test_config(), test_receiver(), TEST_DOY).unwrap();

    let mut obs = observations(tag(T0));
    obs[1].tag = tag(T0 + 30);

    let solution = session.process_epoch(tag(T0), &obs, &[], &[]).unwrap();

    assert_eq!(solution.measurements.len(), 2);
    assert!(solution
        .measurements
        .iter()
        .all(|meas| meas.sv != obs[1].sv));
}

#[test]
fn corrections_on_sampled_epochs_only() {
    init_logger();

    let cfg = fast_config().with_sampling_rate(5.0);
    let mut session = Session::new(cfg, test_receiver(), TEST_DOY).unwrap();

    let (sats, los) = corrections();

    for sod in T0..T0 + 60 {
        let solution = session
            .process_epoch(tag(sod), &observations(tag(sod)), &sats, &los)
            .unwrap();

        assert_eq!(solution.measurements.len(), 3);

        if sod % 5 == 0 {
            assert!(solution.corrections.is_some(), "{} not corrected", sod);
        } else {
            assert!(solution.corrections.is_none(), "{} corrected", sod);
            assert!(solution.corrected().is_empty());
            assert!(solution.clock_estimate().is_none());
        }
    }

    let summary = session.summary();
    assert_eq!(summary.epochs, 60);
    assert_eq!(summary.corrected_epochs, 12);
}

#[test]
fn no_corrections_available() {
    let mut session = Session::new(fast_config(), test_receiver(), TEST_DOY).unwrap();
    let (sats, _) = corrections();

    for sod in T0..T0 + 60 {
        let solution = session
            .process_epoch(tag(sod), &observations(tag(sod)), &sats, &[])
            .unwrap();
        assert!(solution.corrections.is_none());
    }

    assert_eq!(session.summary().corrected_epochs, 0);
    assert_eq!(session.summary().converged, 3 * (60 - 40));
}

#[test]
fn end_to_end() {
    init_logger();

    let cfg = fast_config();
    let receiver = test_receiver();
    let mut session = Session::new(cfg, receiver, TEST_DOY).unwrap();

    assert_eq!(session.receiver().name, "TEST");
    assert_eq!(session.config().hatch.time_s, 10.0);

    let (sats, los) = corrections();

    for sod in T0..T0 + 120 {
        let solution = session
            .process_epoch(tag(sod), &observations(tag(sod)), &sats, &los)
            .unwrap();

        let elapsed = sod - T0 + 1;

        for meas in solution.measurements.iter() {
            assert!(meas.valid);
            assert_eq!(meas.ksmooth_s, elapsed as f64);
            assert_eq!(meas.converged, elapsed > 40);
        }

        let corrected = solution.corrected();
        let estimate = solution.clock_estimate().unwrap();

        if elapsed > 40 {
            assert_eq!(corrected.len(), 3);
            assert!(corrected.iter().all(|record| record.is_precision_approach()));
            assert_eq!(estimate.nb_sv, 3);
            assert!(estimate.receiver_clock_m.is_some());
            assert!(estimate.ent_gps_m.is_some());

            let clock = estimate.receiver_clock_m.unwrap();
            for record in corrected.iter() {
                assert!(
                    (record.clock_free_residual_m - (record.residual_m - clock)).abs() < 1.0E-6
                );
            }
        } else {
            assert!(corrected.is_empty());
            assert_eq!(estimate.nb_sv, 0);
            assert!(estimate.receiver_clock_m.is_none());
        }
    }

    let summary = session.summary();
    assert_eq!(summary.epochs, 120);
    assert_eq!(summary.corrected_epochs, 120);
    assert_eq!(summary.measurements, 3 * 120);
    assert_eq!(summary.converged, 3 * 80);
    assert_eq!(summary.usability(Usability::PrecisionApproach), 3 * 80);
    assert_eq!(summary.usability(Usability::NotUsed), 0);
    assert!(summary.rejections.is_empty());
}

#[test]
fn rejections_are_counted() {
    let cfg = fast_config().with_mask_angle(30.0);
    let mut session = Session::new(cfg, test_receiver(), TEST_DOY).unwrap();

    for sod in T0..T0 + 10 {
        session
            .process_epoch(tag(sod), &observations(tag(sod)), &[], &[])
            .unwrap();
    }

    let summary = session.summary();
    assert_eq!(summary.rejections(RejectionCause::MaskAngle), 10);
    assert_eq!(summary.rejections(RejectionCause::CycleSlip), 0);
    assert_eq!(summary.converged, 0);
}
