use crate::{
    bias::{iono_mapping_function, tropo_sigma_m, IgpVertex},
    prelude::{
        Config, CorrectedMeasurement, Corrector, EpochTag, LosCorrection, Modeling,
        PreprocessedMeasurement, Receiver, SatCorrection, Usability, Vector3,
    },
    tests::{init_logger, los_correction, sat_correction, test_config, test_receiver, TEST_DOY},
};

const RANGE_M: f64 = 21_500_000.0;

fn tag() -> EpochTag {
    EpochTag::new(TEST_DOY, 43_200)
}

fn no_modeling() -> Config {
    test_config().with_modeling(Modeling {
        iono_delay: false,
        tropo_delay: false,
    })
}

/// Converged measurement, consistent with the SBAS corrected geometry,
/// affected by this receiver clock offset [m].
fn converged(
    receiver: &Receiver,
    sat: &SatCorrection,
    elevation_deg: f64,
    receiver_clock_m: f64,
) -> PreprocessedMeasurement {
    let range = (sat.corrected_position() - receiver.position_ecef_m).norm();
    let smoothed = range - sat.corrected_clock_m() + receiver_clock_m;

    let mut meas =
        PreprocessedMeasurement::new(tag(), sat.sv, elevation_deg, 90.0, smoothed, 0.0, 45.0);

    meas.smoothed_c1_m = Some(smoothed);
    meas.ksmooth_s = 500.0;
    meas.converged = true;
    meas
}

fn directions() -> [Vector3<f64>; 4] {
    [
        Vector3::new(1.0, 0.0, 0.5),
        Vector3::new(0.3, 1.0, 0.8),
        Vector3::new(0.5, -0.2, 1.0),
        Vector3::new(-0.2, 0.4, 1.0),
    ]
}

fn find(records: &[CorrectedMeasurement], prn: u8) -> &CorrectedMeasurement {
    records
        .iter()
        .find(|record| record.sv.prn == prn)
        .unwrap_or_else(|| panic!("missing record for G{:02}", prn))
}

#[test]
fn receiver_clock_and_ent_gps() {
    init_logger();

    let cfg = no_modeling();
    let receiver = test_receiver();
    let clock_offset = 12.5;

    let sats = directions()
        .iter()
        .take(3)
        .enumerate()
        .map(|(i, dir)| sat_correction(i as u8 + 1, 4, *dir, RANGE_M))
        .collect::<Vec<_>>();

    let los = sats
        .iter()
        .map(|sat| los_correction(sat.sv.prn))
        .collect::<Vec<_>>();

    let measurements = sats
        .iter()
        .zip([20.0, 45.0, 70.0])
        .map(|(sat, elev)| converged(&receiver, sat, elev, clock_offset))
        .collect::<Vec<_>>();

    let corrector = Corrector::new(&cfg, &receiver);
    let (records, estimate) = corrector.correct_epoch(&measurements, &sats, &los);

    assert_eq!(records.len(), 3);
    assert_eq!(estimate.nb_sv, 3);

    let clock = estimate.receiver_clock_m.unwrap();
    assert!((clock - clock_offset).abs() < 1.0E-6, "clock={}", clock);

    let mut expected_ent_gps = 0.0;

    for (record, sat) in records.iter().zip(sats.iter()) {
        assert_eq!(record.usability, Usability::PrecisionApproach);
        assert!((record.residual_m - clock_offset).abs() < 1.0E-6);
        assert!(record.clock_free_residual_m.abs() < 1.0E-6);
        assert_eq!(record.ipp_lat_deg, 42.0);
        assert_eq!(record.ipp_lon_deg, 2.0);

        let los = (record.sat_position_ecef_m - receiver.position_ecef_m).normalize();
        expected_ent_gps +=
            sat.ltc_position_m.dot(&los) - (sat.fast_correction_m + sat.ltc_clock_m);
    }

    expected_ent_gps /= 3.0;

    let ent_gps = estimate.ent_gps_m.unwrap();
    assert!((ent_gps - expected_ent_gps).abs() < 1.0E-9);
}

#[test]
fn weighted_receiver_clock() {
    let cfg = no_modeling();
    let receiver = test_receiver();
    let dirs = directions();

    let sats = [
        sat_correction(5, 2, dirs[0], RANGE_M),
        sat_correction(6, 10, dirs[1], RANGE_M),
    ];

    let los = [los_correction(5), los_correction(6)];

    // low elevation satellite is noisier: it weighs less
    let measurements = [
        converged(&receiver, &sats[0], 80.0, 10.0),
        converged(&receiver, &sats[1], 8.0, 20.0),
    ];

    let (records, estimate) =
        Corrector::new(&cfg, &receiver).correct_epoch(&measurements, &sats, &los);

    let w = records
        .iter()
        .map(|record| 1.0 / record.sigma_uere_m.powi(2))
        .collect::<Vec<_>>();

    let expected = (w[0] * 10.0 + w[1] * 20.0) / (w[0] + w[1]);
    let clock = estimate.receiver_clock_m.unwrap();

    assert!((clock - expected).abs() < 1.0E-6);
    assert!(clock < 15.0, "clock={}", clock);

    for record in records.iter() {
        assert!((record.clock_free_residual_m - (record.residual_m - clock)).abs() < 1.0E-9);
    }
}

#[test]
fn sigma_composition() {
    let cfg = test_config();
    let receiver = test_receiver();

    let sats = directions()
        .iter()
        .enumerate()
        .map(|(i, dir)| sat_correction(i as u8 + 10, i as u8, *dir, RANGE_M))
        .collect::<Vec<_>>();

    let los = sats
        .iter()
        .map(|sat| los_correction(sat.sv.prn))
        .collect::<Vec<_>>();

    let measurements = sats
        .iter()
        .zip([5.5, 15.0, 35.0, 85.0])
        .map(|(sat, elev)| converged(&receiver, sat, elev, 0.0))
        .collect::<Vec<_>>();

    let (records, _) = Corrector::new(&cfg, &receiver).correct_epoch(&measurements, &sats, &los);

    assert_eq!(records.len(), 4);

    for record in records.iter() {
        assert!(record.is_precision_approach());

        let uere2 = record.sigma_flt_m.powi(2)
            + record.sigma_uire_m.powi(2)
            + record.sigma_tropo_m.powi(2)
            + record.sigma_airborne_m.powi(2);

        assert!((record.sigma_uere_m.powi(2) - uere2).abs() < 1.0E-9);

        let airborne2 = record.sigma_multipath_m.powi(2) + record.sigma_noise_div_m.powi(2);
        assert!((record.sigma_airborne_m.powi(2) - airborne2).abs() < 1.0E-12);

        assert!((record.sigma_tropo_m - tropo_sigma_m(record.elevation_deg)).abs() < 1.0E-12);

        let expected_noise = if record.elevation_deg < cfg.elev_noise_threshold_deg {
            0.36
        } else {
            0.15
        };
        assert_eq!(record.sigma_noise_div_m, expected_noise);
    }
}

#[test]
fn delays_removed_from_pseudo_range() {
    init_logger();

    let cfg = test_config();
    assert!(cfg.modeling.iono_delay && cfg.modeling.tropo_delay);

    let receiver = test_receiver();
    let sat = sat_correction(20, 3, directions()[2], RANGE_M);
    let los = los_correction(20);
    let meas = converged(&receiver, &sat, 30.0, 0.0);

    let (records, _) = Corrector::new(&cfg, &receiver).correct_epoch(&[meas], &[sat], &[los]);
    let record = records[0];

    let fpp = iono_mapping_function(30.0);
    let iono = los
        .grid
        .interpolate(sat.sv, los.ipp_lat_deg, los.ipp_lon_deg)
        .unwrap();

    assert!((iono.delay_m - 3.8).abs() < 1.0E-9);
    assert!((record.uisd_m - fpp * iono.delay_m).abs() < 1.0E-9);
    assert!((record.sigma_uire_m - fpp * iono.sigma_m).abs() < 1.0E-9);

    // 2.4m zenith delay, mapped at 30°
    assert!(record.std_m > 4.0 && record.std_m < 5.5, "std={}", record.std_m);

    let smoothed = meas.smoothed_c1_m.unwrap();
    let expected = record.sat_clock_m + smoothed - record.std_m - record.uisd_m;
    assert!((record.corrected_psr_m - expected).abs() < 1.0E-6);
    assert!((record.residual_m + record.std_m + record.uisd_m).abs() < 1.0E-6);
}

#[test]
fn non_precision_approach_satellite() {
    let cfg = test_config();
    let receiver = test_receiver();

    let dirs = directions();
    let sats = [
        sat_correction(1, 13, dirs[0], RANGE_M),
        sat_correction(2, 5, dirs[1], RANGE_M),
    ];
    let los = [los_correction(1), los_correction(2)];

    let measurements = [
        converged(&receiver, &sats[0], 45.0, 0.0),
        converged(&receiver, &sats[1], 45.0, 0.0),
    ];

    let (records, estimate) =
        Corrector::new(&cfg, &receiver).correct_epoch(&measurements, &sats, &los);

    let npa = find(&records, 1);
    assert_eq!(npa.usability, Usability::NonPrecisionApproach);
    assert_eq!(npa.usability.flag(), 2);
    assert_eq!(npa.sat_position_ecef_m, Vector3::zeros());
    assert_eq!(npa.sat_clock_m, 0.0);
    assert_eq!(npa.sigma_uere_m, 0.0);
    assert_eq!(npa.sigma_flt_m, 0.0);
    assert_eq!(npa.residual_m, 0.0);
    assert_eq!(npa.clock_free_residual_m, 0.0);

    assert_eq!(find(&records, 2).usability, Usability::PrecisionApproach);

    // only PA satellites contribute
    assert_eq!(estimate.nb_sv, 1);
}

#[test]
fn unusable_satellites() {
    let cfg = test_config();
    let receiver = test_receiver();
    let dirs = directions();

    let sats = [
        sat_correction(1, 14, dirs[0], RANGE_M),
        sat_correction(2, 4, dirs[1], RANGE_M),
        // G03 has no LOS record
        sat_correction(3, 4, dirs[2], RANGE_M),
    ];

    let los = [los_correction(1), los_correction(2)];

    let mut not_converged = converged(&receiver, &sats[1], 45.0, 0.0);
    not_converged.converged = false;

    let measurements = [
        converged(&receiver, &sats[0], 45.0, 0.0),
        not_converged,
        converged(&receiver, &sats[2], 45.0, 0.0),
    ];

    let (records, estimate) =
        Corrector::new(&cfg, &receiver).correct_epoch(&measurements, &sats, &los);

    // non converged measurements are not corrected
    assert_eq!(records.len(), 2);

    assert_eq!(find(&records, 1).usability, Usability::NotUsed);
    assert_eq!(find(&records, 3).usability, Usability::NotUsed);
    assert_eq!(find(&records, 3).sat_position_ecef_m, Vector3::zeros());

    assert_eq!(estimate.nb_sv, 0);
    assert!(estimate.receiver_clock_m.is_none());
    assert!(estimate.ent_gps_m.is_none());
}

#[test]
fn degenerate_igp_cell() {
    let cfg = test_config();
    let receiver = test_receiver();

    let sat = sat_correction(7, 4, directions()[0], RANGE_M);

    let mut los: LosCorrection = los_correction(7);
    los.grid.vertices = [IgpVertex {
        lat_deg: 40.0,
        lon_deg: 0.0,
        givd_m: 1.0,
        give_m: 1.0,
    }; 4];

    let meas = converged(&receiver, &sat, 45.0, 0.0);
    let (records, _) = Corrector::new(&cfg, &receiver).correct_epoch(&[meas], &[sat], &[los]);

    assert_eq!(records[0].usability, Usability::NotUsed);
}

#[test]
fn linear_sigma_flt() {
    let cfg = test_config();
    let receiver = test_receiver();

    let mut sat = sat_correction(8, 4, directions()[1], RANGE_M);
    sat.rss_udre = false;

    let meas = converged(&receiver, &sat, 45.0, 0.0);
    let (records, _) =
        Corrector::new(&cfg, &receiver).correct_epoch(&[meas], &[sat], &[los_correction(8)]);

    let expected = sat.sigma_udre_m * sat.delta_udre
        + sat.eps_fc_m
        + sat.eps_rrc_m
        + sat.eps_ltc_m
        + sat.eps_er_m;

    assert!((records[0].sigma_flt_m - expected).abs() < 1.0E-12);
}
