use clap::Parser;
use feedforward_layer::config::load_config;
use feedforward_layer::{Layer, LayerError, Matrix};
use std::process;
use tracing_subscriber::EnvFilter;

// Forward pass of the XOR batch through a configured layer stack.
const NUM_INPUTS: usize = 2;
const XOR_INPUTS: [f64; 8] = [0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0];

#[derive(Parser, Debug)]
#[command(name = "layer_demo")]
#[command(about = "Propagate the XOR batch through a layer stack and dump every layer")]
struct Args {
    /// Path to the JSON network description
    #[arg(short, long, default_value = "config/xor_network.json")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

// Assign `inputs` to the first layer and feed each output into the next layer.
fn forward(layers: &mut [Layer], inputs: &[f64]) -> Result<Matrix, LayerError> {
    let Some((first, _)) = layers.split_first_mut() else {
        return Ok(Matrix::zeros(0, 0));
    };
    first.set_activation(inputs)?;

    for i in 1..layers.len() {
        let output = layers[i - 1].propagate()?;
        layers[i].set_activation(output.as_slice())?;
    }

    match layers.last() {
        Some(last) => last.propagate(),
        None => Ok(Matrix::zeros(0, 0)),
    }
}

fn main() {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load {}: {}", args.config, err);
            process::exit(1);
        }
    };
    if config.layers[0].size != NUM_INPUTS {
        eprintln!("The XOR batch needs an input layer of size {}", NUM_INPUTS);
        process::exit(1);
    }

    let mut rng = config.seed_rng();
    let mut layers = match config.build_layers(&mut rng) {
        Ok(layers) => layers,
        Err(err) => {
            eprintln!("Failed to build layers: {}", err);
            process::exit(1);
        }
    };

    match forward(&mut layers, &XOR_INPUTS) {
        Ok(output) => {
            for layer in &layers {
                println!("{}", layer);
            }
            println!("Network output:\n{}", output);
        }
        Err(err) => {
            eprintln!("Forward pass failed: {}", err);
            process::exit(1);
        }
    }
}
