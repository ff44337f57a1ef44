//! Integration tests for the feedforward network

use feedforward_nn::data::{read_csv, CsvOptions, MinMaxNormalizer, Normalizer};
use feedforward_nn::nn::cost;
use feedforward_nn::{
    ActivationType, EpochStats, Error, NetworkConfig, NeuralNetwork, TrainingConfig, Vector,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

fn xor_data() -> (Vec<Vector>, Vec<Vector>) {
    let inputs = vec![
        Vector::from_vec(vec![0.0, 0.0]),
        Vector::from_vec(vec![0.0, 1.0]),
        Vector::from_vec(vec![1.0, 0.0]),
        Vector::from_vec(vec![1.0, 1.0]),
    ];
    let targets = vec![
        Vector::from_vec(vec![0.0]),
        Vector::from_vec(vec![1.0]),
        Vector::from_vec(vec![1.0]),
        Vector::from_vec(vec![0.0]),
    ];
    (inputs, targets)
}

fn xor_network(seed: u64) -> NeuralNetwork {
    let config = NetworkConfig::new(2)
        .add_layer(4, ActivationType::Sigmoid)
        .output_layer(1, ActivationType::Sigmoid);
    let mut rng = StdRng::seed_from_u64(seed);
    NeuralNetwork::from_config_with_rng(&config, &mut rng).unwrap()
}

fn summed_cost(network: &mut NeuralNetwork, inputs: &[Vector], targets: &[Vector]) -> f64 {
    inputs
        .iter()
        .zip(targets.iter())
        .map(|(x, y)| cost(y, &network.predict(x).unwrap()).unwrap())
        .sum()
}

#[test]
fn test_xor_converges() {
    let (inputs, targets) = xor_data();
    let config = TrainingConfig::new(0.5, 5000);

    let mut network = xor_network(42);
    let report = network.train(&inputs, &targets, &config, &mut ()).unwrap();
    assert_eq!(report.epochs_run(), 5000);

    let total = summed_cost(&mut network, &inputs, &targets);
    assert!(total < 0.01, "XOR did not converge, summed cost {}", total);
}

#[test]
fn test_training_reports_every_epoch() {
    let (inputs, targets) = xor_data();
    let mut network = xor_network(3);
    let config = TrainingConfig::new(0.5, 50);

    let mut seen: Vec<EpochStats> = Vec::new();
    let mut observer = |stats: &EpochStats| seen.push(*stats);
    let report = network
        .train(&inputs, &targets, &config, &mut observer)
        .unwrap();

    assert_eq!(seen.len(), 50);
    assert_eq!(seen, report.history);
    assert!(seen.iter().enumerate().all(|(i, s)| s.epoch == i));
    assert!(!report.stopped_early);
}

#[test]
fn test_save_load_round_trip() {
    let (inputs, targets) = xor_data();
    let mut network = xor_network(11);
    network
        .train(&inputs, &targets, &TrainingConfig::new(0.5, 200), &mut ())
        .unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("xor_model.txt");
    network.save(&path).unwrap();
    let mut restored = NeuralNetwork::load(&path).unwrap();

    assert_eq!(restored.topology(), vec![2, 4, 1]);
    for x in &inputs {
        let a = network.predict(x).unwrap();
        let b = restored.predict(x).unwrap();
        for (p, q) in a.iter().zip(b.iter()) {
            assert!((p - q).abs() < 1e-6);
        }
    }
}

#[test]
fn test_malformed_weight_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.txt");
    // First weight row holds one value, the layer takes two inputs
    std::fs::write(
        &path,
        "2\n2 2 1\n0.1\n0.3 0.4\n0.0 0.0\nsigmoid\n0.5 0.5\n0.0\nsigmoid\n",
    )
    .unwrap();

    match NeuralNetwork::load(&path) {
        Err(Error::CorruptModelFile { line, .. }) => assert_eq!(line, 3),
        Err(other) => panic!("expected CorruptModelFile, got {}", other),
        Ok(_) => panic!("malformed model loaded"),
    }
}

#[test]
fn test_dimension_mismatch_keeps_caches() {
    let mut network = xor_network(5);
    network.forward(&Vector::from_vec(vec![0.25, 0.75])).unwrap();
    let before: Vec<Vector> = network
        .layers()
        .iter()
        .map(|l| l.last_input().clone())
        .collect();

    let err = network
        .forward(&Vector::from_vec(vec![1.0, 2.0, 3.0]))
        .unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }));

    let after: Vec<Vector> = network
        .layers()
        .iter()
        .map(|l| l.last_input().clone())
        .collect();
    assert_eq!(before, after);
}

#[test]
fn test_single_learn_step_decreases_cost() {
    let config = NetworkConfig::new(3).output_layer(2, ActivationType::Sigmoid);
    let mut rng = StdRng::seed_from_u64(21);
    let mut network = NeuralNetwork::from_config_with_rng(&config, &mut rng).unwrap();

    let input = Vector::from_vec(vec![0.3, -0.2, 0.8]);
    let target = Vector::from_vec(vec![1.0, 0.0]);

    let before = cost(&target, &network.predict(&input).unwrap()).unwrap();
    network.learn(&input, &target, 0.01).unwrap();
    let after = cost(&target, &network.predict(&input).unwrap()).unwrap();
    assert!(after < before);
}

#[test]
fn test_csv_to_trained_model() {
    let text = "\
x,y,label
0,0,low
0,10,high
10,0,high
10,10,low
";
    let options = CsvOptions::new(vec![2])
        .with_label("low", 0.0)
        .with_label("high", 1.0);
    let mut data = read_csv(text.as_bytes(), &options).unwrap();

    let mut normalizer = MinMaxNormalizer::new();
    data.inputs = normalizer.fit_transform(&data.inputs).unwrap();
    assert_eq!(data.inputs[1].as_slice(), &[0.0, 1.0]);

    let mut network = xor_network(1);
    let report = network
        .train(
            &data.inputs,
            &data.targets,
            &TrainingConfig::new(0.5, 100),
            &mut (),
        )
        .unwrap();
    assert_eq!(report.epochs_run(), 100);
}
