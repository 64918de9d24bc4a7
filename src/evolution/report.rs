//! Plain-text descriptions of a run for progress sinks.
//!
//! Every function renders one `name : value` pair per line.

use std::fmt::Write;

use super::{options::EvolutionOptions, state::ResourceUsage, Progress};
use crate::individual::Individual;

/// Lists every evolution and training option.
pub fn describe_options(options: &EvolutionOptions) -> String {
    let training = options.training();
    let timeout = training
        .timeout
        .map_or_else(|| "none".to_string(), |timeout| format!("{:?}", timeout));

    let mut text = String::new();
    line(&mut text, "maxGenerations", options.max_generations());
    line(&mut text, "populationSize", options.population_size());
    line(&mut text, "elitism", options.elitism());
    line(&mut text, "mutationRate", options.mutation_rate());
    line(&mut text, "mixRands", options.mix_rands());
    line(&mut text, "maxLayers", options.max_layers());
    line(&mut text, "maxNeurons", options.max_neurons());
    line(&mut text, "callbackPeriod", options.callback_period());
    line(&mut text, "parallelThreshold", options.parallel_threshold());
    line(&mut text, "logLevel", format!("{:?}", options.log_level()));
    line(&mut text, "iterations", training.iterations);
    line(&mut text, "errorThresh", training.error_thresh);
    line(&mut text, "learningRate", training.learning_rate);
    line(&mut text, "momentum", training.momentum);
    line(&mut text, "trainingCallbackPeriod", training.callback_period);
    line(&mut text, "timeout", timeout);
    text
}

/// Error, fitness and genome of one individual.
pub fn describe_individual(individual: &Individual) -> String {
    let genome = individual.genome();
    let mut text = String::new();
    line(&mut text, "error", individual.error);
    line(&mut text, "fitness", individual.fitness);
    line(&mut text, "activation", genome.activation);
    line(&mut text, "binaryThresh", genome.binary_thresh);
    line(&mut text, "leakyReluAlpha", genome.leaky_relu_alpha);
    line(
        &mut text,
        "hiddenLayers",
        format!("[{}]", join(&genome.hidden_layers)),
    );
    text
}

/// Generation counter and error followed by the best individual.
pub fn describe_progress(progress: &Progress<'_>) -> String {
    let mut text = String::new();
    line(&mut text, "generation", progress.generation);
    line(&mut text, "bestError", progress.error);
    text.push_str(&describe_individual(progress.best));
    text
}

pub fn describe_usage(usage: &ResourceUsage) -> String {
    let mut text = String::new();
    line(&mut text, "elapsed", format!("{:?}", usage.elapsed));
    line(&mut text, "networksTrained", usage.networks_trained);
    line(&mut text, "trainingFailures", usage.training_failures);
    line(&mut text, "bestParameters", usage.best_parameters);
    text
}

fn line(text: &mut String, name: &str, value: impl std::fmt::Display) {
    // Writing to a String cannot fail.
    let _ = writeln!(text, "{} : {}", name, value);
}

fn join(values: &[usize]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
