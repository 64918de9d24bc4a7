use neurogen::{
    breeding::MixedStrategy,
    data::{Dataset, Sample},
    error::{GeneticError, Result},
    evolution::{
        report::describe_progress, CancellationToken, DefaultLauncher, EvolutionLauncher,
        EvolutionOptions, EvolutionStatus, LogLevel,
    },
    fitness::StructuralChallenge,
    network::{
        LayerState, NetworkOptions, NetworkState, Trainable, TrainingOptions, TrainingProgress,
        TrainingSummary,
    },
    rng::RandomNumberGenerator,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn xor() -> Dataset {
    Dataset::new(vec![
        Sample::new(vec![0.0, 0.0], vec![0.0]),
        Sample::new(vec![0.0, 1.0], vec![1.0]),
        Sample::new(vec![1.0, 0.0], vec![1.0]),
        Sample::new(vec![1.0, 1.0], vec![0.0]),
    ])
    .unwrap()
}

/// Network whose training error is one hundredth of its hidden neuron count.
///
/// With `FLAKY` set, single-neuron networks panic while training and
/// two-neuron networks return an error.
#[derive(Debug, Clone)]
struct SizedNetwork<const FLAKY: bool> {
    state: NetworkState,
}

impl<const FLAKY: bool> Trainable for SizedNetwork<FLAKY> {
    fn new(options: &NetworkOptions) -> Result<Self> {
        let mut fan_in = options.input_size;
        let hidden = options
            .genome
            .hidden_layers
            .iter()
            .map(|&neurons| {
                let layer = LayerState::zeroed(neurons, fan_in);
                fan_in = neurons;
                layer
            })
            .collect();
        Ok(Self {
            state: NetworkState {
                input_size: options.input_size,
                output_size: options.output_size,
                genome: options.genome.clone(),
                hidden,
                output: LayerState::zeroed(options.output_size, fan_in),
            },
        })
    }

    fn initialize(&mut self, _rng: &mut RandomNumberGenerator) {}

    fn from_state(state: &NetworkState) -> Result<Self> {
        Ok(Self {
            state: state.clone(),
        })
    }

    fn to_state(&self) -> NetworkState {
        self.state.clone()
    }

    fn train(
        &mut self,
        _data: &Dataset,
        _options: &TrainingOptions,
        callback: &mut dyn FnMut(&TrainingProgress),
    ) -> Result<TrainingSummary> {
        let neurons = self.state.genome.hidden_neurons();
        if FLAKY && neurons == 1 {
            panic!("single neuron network");
        }
        if FLAKY && neurons == 2 {
            return Err(GeneticError::TrainingFailure(
                "two neuron network".to_string(),
            ));
        }
        let error = neurons as f64 / 100.0;
        callback(&TrainingProgress {
            iterations: 1,
            error,
        });
        Ok(TrainingSummary {
            iterations: 1,
            error,
        })
    }

    fn run(&self, _input: &[f64]) -> Result<Vec<f64>> {
        Ok(vec![0.0; self.state.output_size])
    }
}

type SizedLauncher<const FLAKY: bool> =
    EvolutionLauncher<SizedNetwork<FLAKY>, MixedStrategy, StructuralChallenge>;

fn sized_launcher<const FLAKY: bool>() -> SizedLauncher<FLAKY> {
    EvolutionLauncher::new(MixedStrategy::new(), StructuralChallenge)
}

#[test]
fn test_evolve_xor() {
    init_tracing();
    let mut rng = RandomNumberGenerator::from_seed(42);
    let options = EvolutionOptions::builder()
        .max_generations(5)
        .population_size(8)
        .max_layers(2)
        .max_neurons(4)
        .log_level(LogLevel::Verbose)
        .training(TrainingOptions::builder().iterations(200).build())
        .build();

    let result = DefaultLauncher::default()
        .evolve(&xor(), &options, &mut rng)
        .unwrap();

    assert!(result.error.is_finite());
    assert!(result.error >= 0.0);
    assert!(result.generations >= 1 && result.generations <= 5);
    assert!(result.best.genome().fits(2, 4));
    assert!(result.best.state.validate().is_ok());
    assert_eq!(result.usage.networks_trained, 8 * result.generations);
    assert_eq!(result.usage.training_failures, 0);
}

#[test]
fn test_evolve_two_sample_inverter() {
    let data = Dataset::new(vec![
        Sample::new(vec![0.0], vec![1.0]),
        Sample::new(vec![1.0], vec![0.0]),
    ])
    .unwrap();
    let mut rng = RandomNumberGenerator::from_seed(43);
    let options = EvolutionOptions::builder()
        .max_generations(5)
        .population_size(8)
        .max_layers(2)
        .max_neurons(4)
        .training(TrainingOptions::builder().iterations(500).build())
        .build();

    let result = DefaultLauncher::default()
        .evolve(&data, &options, &mut rng)
        .unwrap();

    assert!(result.generations <= 5);
    assert!(result.error.is_finite());
    assert!(result.error >= 0.0);
    assert_ne!(result.status, EvolutionStatus::Cancelled);
    assert_eq!(result.best.state.input_size, 1);
    assert_eq!(result.best.state.output_size, 1);
}

#[test]
fn test_cancel_from_progress_callback() {
    init_tracing();
    let mut rng = RandomNumberGenerator::from_seed(1);
    let options = EvolutionOptions::builder()
        .max_generations(100)
        .population_size(6)
        .max_layers(2)
        .max_neurons(8)
        .callback_period(1)
        .build();
    let cancel = CancellationToken::new();
    let handle = cancel.clone();

    let result = sized_launcher::<false>()
        .evolve_with(&xor(), &options, &mut rng, &cancel, |progress| {
            if progress.generation == 2 {
                handle.cancel();
            }
        })
        .unwrap();

    assert_eq!(result.status, EvolutionStatus::Cancelled);
    assert_eq!(result.generations, 2);
}

#[test]
fn test_cancelled_before_start_runs_one_generation() {
    let mut rng = RandomNumberGenerator::from_seed(2);
    let options = EvolutionOptions::builder()
        .population_size(4)
        .max_layers(1)
        .max_neurons(8)
        .build();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = sized_launcher::<false>()
        .evolve_with(&xor(), &options, &mut rng, &cancel, |_| {})
        .unwrap();

    assert_eq!(result.status, EvolutionStatus::Cancelled);
    assert_eq!(result.generations, 1);
    assert_eq!(result.usage.networks_trained, 4);
}

#[test]
fn test_progress_cadence() {
    let mut rng = RandomNumberGenerator::from_seed(3);
    let options = EvolutionOptions::builder()
        .max_generations(5)
        .population_size(6)
        .max_layers(2)
        .max_neurons(8)
        .callback_period(2)
        .build();
    let mut seen = Vec::new();

    let result = sized_launcher::<false>()
        .evolve_with(
            &xor(),
            &options,
            &mut rng,
            &CancellationToken::new(),
            |progress| {
                assert_eq!(progress.error, progress.best.error);
                assert!(describe_progress(progress).contains("bestError"));
                seen.push(progress.generation);
            },
        )
        .unwrap();

    assert_eq!(result.status, EvolutionStatus::Exhausted);
    assert_eq!(result.generations, 5);
    assert_eq!(seen, vec![2, 4]);
}

#[test]
fn test_zero_callback_period_disables_progress() {
    let mut rng = RandomNumberGenerator::from_seed(4);
    let options = EvolutionOptions::builder()
        .max_generations(3)
        .population_size(4)
        .max_layers(1)
        .max_neurons(8)
        .callback_period(0)
        .build();
    let mut calls = 0;

    sized_launcher::<false>()
        .evolve_with(&xor(), &options, &mut rng, &CancellationToken::new(), |_| {
            calls += 1
        })
        .unwrap();

    assert_eq!(calls, 0);
}

#[test]
fn test_converges_below_error_threshold() {
    let mut rng = RandomNumberGenerator::from_seed(5);
    let options = EvolutionOptions::builder()
        .population_size(10)
        .max_layers(1)
        .max_neurons(10)
        .training(TrainingOptions::builder().error_thresh(0.1).build())
        .build();

    let result = sized_launcher::<false>()
        .evolve(&xor(), &options, &mut rng)
        .unwrap();

    assert_eq!(result.status, EvolutionStatus::Converged);
    assert_eq!(result.generations, 1);
    assert!(result.error <= 0.1);
}

#[test]
fn test_sorting_prefers_lower_error() {
    let mut rng = RandomNumberGenerator::from_seed(6);
    let options = EvolutionOptions::builder()
        .max_generations(2)
        .population_size(40)
        .max_layers(1)
        .max_neurons(20)
        .build();

    let result = sized_launcher::<false>()
        .evolve(&xor(), &options, &mut rng)
        .unwrap();

    let neurons = result.best.genome().hidden_neurons();
    assert!((result.error - neurons as f64 / 100.0).abs() < 1e-12);
    assert!(neurons <= 5);
}

#[test]
fn test_training_failures_are_isolated() {
    init_tracing();
    let mut rng = RandomNumberGenerator::from_seed(7);
    let options = EvolutionOptions::builder()
        .max_generations(3)
        .population_size(30)
        .max_layers(1)
        .max_neurons(3)
        .build();

    let result = sized_launcher::<true>()
        .evolve(&xor(), &options, &mut rng)
        .unwrap();

    assert_eq!(result.status, EvolutionStatus::Exhausted);
    assert!(!result.best.is_disqualified());
    assert_eq!(result.best.hidden_layers(), &[3]);
    assert!((result.error - 0.03).abs() < 1e-12);
    assert!(result.usage.training_failures > 0);
    assert_eq!(result.usage.networks_trained, 90);
}

#[test]
fn test_zero_population_uses_minimum() {
    init_tracing();
    let mut rng = RandomNumberGenerator::from_seed(8);
    let options = EvolutionOptions::builder()
        .max_generations(2)
        .population_size(0)
        .max_layers(1)
        .max_neurons(8)
        .build();

    let result = sized_launcher::<false>()
        .evolve(&xor(), &options, &mut rng)
        .unwrap();

    assert_eq!(result.generations, 2);
    assert_eq!(result.usage.networks_trained, 4);
}

#[test]
fn test_invalid_configuration() {
    let mut rng = RandomNumberGenerator::from_seed(9);
    let invalid = [
        EvolutionOptions::builder().elitism(0.0).build(),
        EvolutionOptions::builder().max_generations(0).build(),
        EvolutionOptions::builder().mutation_rate(1.5).build(),
    ];
    for options in invalid {
        let result = sized_launcher::<false>().evolve(&xor(), &options, &mut rng);
        assert!(matches!(result, Err(GeneticError::Configuration(_))));
    }
}

#[test]
fn test_invalid_dataset() {
    assert!(matches!(
        Dataset::new(Vec::new()),
        Err(GeneticError::InvalidDataset(_))
    ));
    assert!(matches!(
        Dataset::new(vec![
            Sample::new(vec![0.0], vec![1.0]),
            Sample::new(vec![0.0, 1.0], vec![1.0]),
        ]),
        Err(GeneticError::InvalidDataset(_))
    ));
    assert!(matches!(
        Dataset::new(vec![Sample::new(vec![f64::NAN], vec![1.0])]),
        Err(GeneticError::InvalidDataset(_))
    ));
}
