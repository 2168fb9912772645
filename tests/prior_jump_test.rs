//! End-to-end checks of the jump proposals and groupings over a two-pulsar
//! style model: per-pulsar red-noise and white-noise parameters, a common
//! stochastic background, a burst signal, and a vector-valued ephemeris
//! correction shared by both pulsars.

use std::sync::Arc;

use approx::assert_abs_diff_eq;
use ndarray::Array1;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use pta_jumps::groups::{global_parameters, parameter_groups};
use pta_jumps::index::ParamIndex;
use pta_jumps::model::{Parameter, Signal, SignalCollection, SignalModel};
use pta_jumps::priors::{LogUniformPrior, NormalPrior, UniformPrior};
use pta_jumps::proposal::{JumpProposal, ProposalError, StepContext};

/// Flat list ordering (first appearance over psr1 then psr2):
///
/// | ordinal | name               | offsets |
/// |---------|--------------------|---------|
/// | 0       | psr1_rn_log10_A    | 0       |
/// | 1       | psr1_rn_gamma      | 1       |
/// | 2       | gw_log10_A         | 2       |
/// | 3       | gw_gamma           | 3       |
/// | 4       | psr1_efac          | 4       |
/// | 5       | bwm_log10_h        | 5       |
/// | 6       | bwm_t0             | 6       |
/// | 7       | ephem_frame_drift  | 7..11   |
/// | 8       | psr2_rn_log10_A    | 11      |
/// | 9       | psr2_rn_gamma      | 12      |
/// | 10      | psr2_efac          | 13      |
fn two_pulsar_model() -> SignalModel {
    let gw_log10_a: Arc<dyn Parameter> = Arc::new(UniformPrior::new("gw_log10_A", -18.0, -11.0));
    let gw_gamma: Arc<dyn Parameter> = Arc::new(UniformPrior::new("gw_gamma", 0.0, 7.0));
    let bwm_log10_h: Arc<dyn Parameter> = Arc::new(UniformPrior::new("bwm_log10_h", -18.0, -11.0));
    let bwm_t0: Arc<dyn Parameter> = Arc::new(UniformPrior::new("bwm_t0", 53000.0, 57000.0));
    let ephem: Arc<dyn Parameter> =
        Arc::new(NormalPrior::vector("ephem_frame_drift", 0.0, 1e-9, 4));

    let pulsar = |tag: &str| {
        SignalCollection::new(vec![
            Signal::new(
                "red noise",
                vec![
                    Arc::new(UniformPrior::new(format!("{tag}_rn_log10_A"), -20.0, -11.0))
                        as Arc<dyn Parameter>,
                    Arc::new(UniformPrior::new(format!("{tag}_rn_gamma"), 0.0, 7.0)),
                    Arc::clone(&gw_log10_a),
                    Arc::clone(&gw_gamma),
                ],
            ),
            Signal::new(
                "white noise",
                vec![Arc::new(LogUniformPrior::new(format!("{tag}_efac"), 0.1, 10.0))
                    as Arc<dyn Parameter>],
            ),
            Signal::new(
                "bwm",
                vec![Arc::clone(&bwm_log10_h), Arc::clone(&bwm_t0)],
            ),
            Signal::new("phys_ephem", vec![Arc::clone(&ephem)]),
        ])
    };

    SignalModel::new(vec![pulsar("psr1"), pulsar("psr2")])
}

/// Draws a starting state by sampling every parameter from its prior.
fn initial_state(index: &ParamIndex, rng: &mut SmallRng) -> Vec<f64> {
    let mut x = vec![0.0; index.ndim()];
    for ordinal in 0..index.npar() {
        let slice = index.slice(ordinal);
        let value = index.param(ordinal).sample(rng);
        x[slice].copy_from_slice(&value);
    }
    x
}

#[test]
fn index_tiles_the_flat_vector() {
    let model = two_pulsar_model();
    let index = ParamIndex::new(&model).unwrap();

    assert_eq!(index.npar(), 11);
    assert_eq!(index.ndim(), 14);

    let mut covered = 0;
    for ordinal in 0..index.npar() {
        let slice = index.slice(ordinal);
        assert_eq!(slice.start, covered, "slices must be contiguous");
        covered = slice.end;
    }
    assert_eq!(covered, index.ndim(), "slices must cover every coordinate");
    assert_eq!(index.slice(7), 7..11);
    assert_eq!(index.ordinal("gw_gamma"), Some(3));
}

#[test]
fn unrestricted_draws_change_at_most_one_coordinate() {
    let model = two_pulsar_model();
    let jump = JumpProposal::new(&model).unwrap();
    let mut rng = SmallRng::seed_from_u64(42);
    let x = initial_state(jump.index(), &mut rng);
    let before = x.clone();

    for _ in 0..500 {
        let (q, lqxy) = jump
            .draw_from_prior(&x, StepContext::default(), &mut rng)
            .unwrap();
        assert_eq!(x, before, "the input vector must never be mutated");
        assert_eq!(q.len(), x.len());
        let changed = (0..x.len()).filter(|&i| q[i] != x[i]).count();
        assert!(changed <= 1, "expected at most one changed coordinate");
        assert!(lqxy.is_finite());
    }
}

#[test]
fn restricted_draws_stay_inside_their_category() {
    let model = two_pulsar_model();
    let jump = JumpProposal::new(&model).unwrap();
    let mut rng = SmallRng::seed_from_u64(42);
    let x = initial_state(jump.index(), &mut rng);

    // union of flat offsets of the red-noise pool members
    let red_noise_offsets = [0, 1, 2, 3, 11, 12];
    for _ in 0..1000 {
        let (q, _) = jump
            .draw_from_gwb_prior(&x, StepContext::default(), &mut rng)
            .unwrap();
        for i in (0..x.len()).filter(|&i| q[i] != x[i]) {
            assert!(
                red_noise_offsets.contains(&i),
                "offset {i} is outside the red-noise pool"
            );
        }
    }

    for _ in 0..1000 {
        let (q, _) = jump
            .draw_from_bwm_prior(&x, StepContext::default(), &mut rng)
            .unwrap();
        for i in (0..x.len()).filter(|&i| q[i] != x[i]) {
            assert!((5..=6).contains(&i), "offset {i} is outside the bwm pool");
        }
    }
}

#[test]
fn ephem_draws_touch_one_component_of_the_vector_parameter() {
    let model = two_pulsar_model();
    let jump = JumpProposal::new(&model).unwrap();
    let mut rng = SmallRng::seed_from_u64(42);
    let x = initial_state(jump.index(), &mut rng);

    for _ in 0..500 {
        let (q, _) = jump
            .draw_from_ephem_prior(&x, StepContext::default(), &mut rng)
            .unwrap();
        let changed: Vec<usize> = (0..x.len()).filter(|&i| q[i] != x[i]).collect();
        assert!(changed.len() <= 1);
        for i in changed {
            assert!((7..11).contains(&i), "offset {i} is outside the ephem slice");
        }
    }
}

#[test]
fn unknown_category_fails_fast() {
    let model = two_pulsar_model();
    let jump = JumpProposal::new(&model).unwrap();
    let mut rng = SmallRng::seed_from_u64(42);
    let x = initial_state(jump.index(), &mut rng);

    let err = jump
        .draw_from_signal_prior("cw", &x, StepContext::default(), &mut rng)
        .unwrap_err();
    assert!(matches!(err, ProposalError::EmptyCategory(ref name) if name == "cw"));
}

#[test]
fn proposed_values_follow_the_prior() {
    let model = two_pulsar_model();
    let jump = JumpProposal::new(&model).unwrap();
    let mut rng = SmallRng::seed_from_u64(42);
    let x = initial_state(jump.index(), &mut rng);

    // collect proposed values for bwm_t0 ~ Uniform(53000, 57000) at offset 6
    let mut proposed = Vec::new();
    for _ in 0..4000 {
        let (q, _) = jump
            .draw_from_bwm_prior(&x, StepContext::default(), &mut rng)
            .unwrap();
        if q[6] != x[6] {
            proposed.push(q[6]);
        }
    }
    assert!(proposed.len() > 1000, "both pool members should get drawn");

    let values = Array1::from(proposed);
    let mean = values.mean().unwrap();
    assert_abs_diff_eq!(mean, 55000.0, epsilon = 200.0);
}

#[test]
fn hastings_term_matches_the_prior_densities() {
    let model = two_pulsar_model();
    let jump = JumpProposal::new(&model).unwrap();
    let index = jump.index();
    let mut rng = SmallRng::seed_from_u64(42);
    let x = initial_state(index, &mut rng);

    for _ in 0..200 {
        let (q, lqxy) = jump
            .draw_from_prior(&x, StepContext::default(), &mut rng)
            .unwrap();
        let changed: Vec<usize> = (0..x.len()).filter(|&i| q[i] != x[i]).collect();
        if changed.is_empty() {
            continue;
        }
        let ordinal = (0..index.npar())
            .find(|&ordinal| index.slice(ordinal).contains(&changed[0]))
            .unwrap();
        let slice = index.slice(ordinal);
        let param = index.param(ordinal);
        let expected = param.log_pdf(&x[slice.clone()]) - param.log_pdf(&q[slice]);
        assert_abs_diff_eq!(lqxy, expected);
    }
}

#[test]
fn groups_cover_all_global_and_per_signal_parameters() {
    let model = two_pulsar_model();
    let groups = parameter_groups(&model);

    let (global, individual) = global_parameters(&model);
    let mut expected_global = vec![
        "bwm_log10_h",
        "bwm_t0",
        "ephem_frame_drift",
        "gw_gamma",
        "gw_log10_A",
    ];
    expected_global.sort();
    assert_eq!(global, expected_global);
    assert_eq!(
        individual,
        vec![
            "psr1_rn_log10_A",
            "psr1_rn_gamma",
            "psr1_efac",
            "psr2_rn_log10_A",
            "psr2_rn_gamma",
            "psr2_efac",
        ]
    );

    // all ordinals, the joint global group, then one group per signal with
    // non-global parameters (the bwm and ephem signals collapse away)
    assert_eq!(groups.len(), 6);
    assert_eq!(groups[0], (0..11).collect::<Vec<_>>());
    let mut joint = groups[1].clone();
    joint.sort();
    assert_eq!(joint, vec![2, 3, 5, 6, 7]);
    assert_eq!(&groups[2..], &[vec![0, 1], vec![4], vec![8, 9], vec![10]]);
}

#[test]
fn seeded_runs_are_identical() {
    let model = two_pulsar_model();
    let jump = JumpProposal::new(&model).unwrap();

    let mut rng_a = SmallRng::seed_from_u64(7);
    let mut rng_b = SmallRng::seed_from_u64(7);
    let x_a = initial_state(jump.index(), &mut rng_a);
    let x_b = initial_state(jump.index(), &mut rng_b);
    assert_eq!(x_a, x_b);

    for _ in 0..50 {
        let a = jump
            .draw_from_prior(&x_a, StepContext::default(), &mut rng_a)
            .unwrap();
        let b = jump
            .draw_from_prior(&x_b, StepContext::default(), &mut rng_b)
            .unwrap();
        assert_eq!(a, b);
    }
}
