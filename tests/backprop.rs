use approx::assert_relative_eq;
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sgdnnet::algebra::{Matrix, Vector};
use sgdnnet::feedforward::Network;

fn cost(net: &Network<f64>, inputs: &Vector<f64>, desired: &Vector<f64>) -> f64 {
    let outputs = net.feed_forward(inputs).unwrap();
    Network::calc_cost(&outputs, desired).unwrap()
}

fn nudge_weight(net: &Network<f64>, layer: usize, i: usize, j: usize, h: f64) -> Network<f64> {
    let mut weights = net.weights().to_vec();
    let mut rows = weights[layer].to_rows();
    rows[i][j] += h;
    weights[layer] = Matrix::from_rows(rows).unwrap();
    Network::from_parts(net.geometry(), net.biases().to_vec(), weights).unwrap()
}

fn nudge_bias(net: &Network<f64>, layer: usize, i: usize, h: f64) -> Network<f64> {
    let mut biases = net.biases().to_vec();
    let mut values = biases[layer].as_slice().to_vec();
    values[i] += h;
    biases[layer] = Vector::new(values);
    Network::from_parts(net.geometry(), biases, net.weights().to_vec()).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    // Deep networks catch any misalignment between layers, activations and gradients.
    #[test]
    fn gradients_match_finite_differences_in_deep_networks(
        geometry in prop::collection::vec(1usize..4, 4..7),
        seed in any::<u64>(),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let net = Network::with_generator(&geometry, || rng.gen_range(-1.0..1.0)).unwrap();
        let inputs = Vector::new((0..geometry[0]).map(|_| rng.gen_range(-1.0..1.0)).collect());
        let desired = Vector::new(
            (0..geometry[geometry.len() - 1]).map(|_| rng.gen_range(0.0..1.0)).collect(),
        );
        let gradient = net.backprop(&inputs, &desired).unwrap();
        let h = 1e-6;

        prop_assert_eq!(gradient.biases.len(), geometry.len() - 1);
        prop_assert_eq!(gradient.weights.len(), geometry.len() - 1);

        for layer in 0..geometry.len() - 1 {
            prop_assert_eq!(gradient.weights[layer].shape(), (geometry[layer + 1], geometry[layer]));
            for i in 0..geometry[layer + 1] {
                let numeric = (cost(&nudge_bias(&net, layer, i, h), &inputs, &desired)
                    - cost(&nudge_bias(&net, layer, i, -h), &inputs, &desired))
                    / (2.0 * h);
                assert_relative_eq!(gradient.biases[layer][i], numeric, epsilon = 1e-7);

                for j in 0..geometry[layer] {
                    let numeric = (cost(&nudge_weight(&net, layer, i, j, h), &inputs, &desired)
                        - cost(&nudge_weight(&net, layer, i, j, -h), &inputs, &desired))
                        / (2.0 * h);
                    assert_relative_eq!(gradient.weights[layer].row(i)[j], numeric, epsilon = 1e-7);
                }
            }
        }
    }
}
