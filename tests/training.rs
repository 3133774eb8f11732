use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sgdnnet::algebra::Field;
use sgdnnet::feedforward::{Evaluation, Network, Sample, Trainer};

fn toy_samples() -> Vec<Sample<f64>> {
    vec![
        Sample::from((vec![1.0, 0.0], vec![1.0, 0.0])),
        Sample::from((vec![0.0, 1.0], vec![0.0, 1.0])),
        Sample::from((vec![0.9, 0.2], vec![1.0, 0.0])),
        Sample::from((vec![0.1, 0.8], vec![0.0, 1.0])),
    ]
}

fn total_cost(net: &Network<f64>, samples: &[Sample<f64>]) -> f64 {
    samples
        .iter()
        .map(|s| {
            let outputs = net.feed_forward(&s.inputs).unwrap();
            Network::calc_cost(&outputs, &s.desired_outputs).unwrap()
        })
        .sum()
}

#[test]
fn sgd_learns_separable_samples() {
    let mut rng = ChaCha8Rng::seed_from_u64(2020);
    let net = Network::with_generator(&[2, 3, 2], || f64::sample(&mut rng)).unwrap();
    let samples = toy_samples();
    let before = total_cost(&net, &samples);

    let trainer = Trainer::new(300, 2, 3.0).unwrap();
    let training = trainer
        .train_with_rng(net, &samples, Some(&samples[..]), &mut rng)
        .unwrap();

    assert_eq!(training.reports.len(), 300);
    assert!(training.reports.iter().all(|r| r.batches == 2));
    assert_eq!(
        training.reports[299].evaluation,
        Some(Evaluation {
            correct: 4,
            total: 4
        })
    );
    let after = total_cost(&training.network, &samples);
    assert!(after < before);
    assert!(after < 0.05, "cost after training: {}", after);
}

#[test]
fn intermediate_networks_stay_usable() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let start = Network::with_generator(&[2, 3, 2], || rng.gen_range(-1.0..1.0)).unwrap();
    let samples = toy_samples();

    let first = start.update_mini_batch(&samples[..2], 1.0).unwrap();
    let second = first.update_mini_batch(&samples[2..], 1.0).unwrap();

    // Every snapshot is an independent value.
    assert_ne!(start, first);
    assert_ne!(first, second);
    assert_eq!(start.geometry(), second.geometry());
    assert!(start.evaluate(&samples).is_ok());
    assert!(first.evaluate(&samples).is_ok());
}

#[test]
fn f32_networks_train_too() {
    let samples: Vec<Sample<f32>> = vec![
        Sample::from((vec![1.0f32, 0.0], vec![1.0f32, 0.0])),
        Sample::from((vec![0.0f32, 1.0], vec![0.0f32, 1.0])),
    ];
    let net = Network::<f32>::with_generator(&[2, 2], || 0.5).unwrap();
    let trainer = Trainer::new(5, 1, 1.0f32).unwrap();
    let training = trainer
        .train_with_rng(net, &samples, None, &mut ChaCha8Rng::seed_from_u64(0))
        .unwrap();
    assert_eq!(training.reports.len(), 5);
    assert_eq!(training.network.weights()[0].shape(), (2, 2));
}
