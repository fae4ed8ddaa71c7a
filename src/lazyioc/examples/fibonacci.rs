//! Times the construction of a small object graph.
//!
//! Run with:
//!
//! ```no_rust
//! RUST_LOG=info LAZYIOC_ROUNDS=1000 cargo run -p lazyioc --example fibonacci
//! ```

use std::env::{self, VarError};
use std::error::Error;
use std::num::ParseIntError;
use std::sync::Arc;
use std::time::Instant;

use lazyioc::prelude::*;
use snafu::prelude::*;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const ROUNDS_VAR: &str = "LAZYIOC_ROUNDS";
const DEFAULT_ROUNDS: usize = 100;

#[derive(Debug, Snafu)]
enum ConfigError {
    #[snafu(display("LAZYIOC_ROUNDS is not valid unicode"))]
    NotUnicode { source: VarError },
    #[snafu(display("LAZYIOC_ROUNDS should be a positive number"))]
    InvalidRounds { source: ParseIntError },
    #[snafu(display("LAZYIOC_ROUNDS should not be zero"))]
    ZeroRounds,
}

#[derive(Debug, Clone)]
struct BenchConfig {
    rounds: usize,
}

impl BenchConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let rounds = match env::var(ROUNDS_VAR) {
            Ok(value) => value.trim().parse().context(InvalidRoundsSnafu)?,
            Err(VarError::NotPresent) => DEFAULT_ROUNDS,
            Err(err) => return Err(err).context(NotUnicodeSnafu),
        };
        ensure!(rounds > 0, ZeroRoundsSnafu);
        Ok(Self { rounds })
    }
}

pub struct Fib1;

#[component]
impl Fib1 {
    #[inject]
    fn new() -> Self {
        Self
    }
}

pub struct Fib2;

#[component]
impl Fib2 {
    #[inject]
    fn new() -> Self {
        Self
    }
}

macro_rules! fib {
    ($name:ident, $prev:ident, $prev2:ident) => {
        #[allow(dead_code)]
        pub struct $name {
            prev: Arc<$prev>,
            prev2: Arc<$prev2>,
        }

        #[component]
        impl $name {
            #[inject]
            fn new(prev: Arc<$prev>, prev2: Arc<$prev2>) -> Self {
                Self { prev, prev2 }
            }
        }
    };
}

fib!(Fib3, Fib2, Fib1);
fib!(Fib4, Fib3, Fib2);
fib!(Fib5, Fib4, Fib3);
fib!(Fib6, Fib5, Fib4);
fib!(Fib7, Fib6, Fib5);
fib!(Fib8, Fib7, Fib6);

fn fibonacci_module() -> Module {
    let mut module = Module::new();
    bind::<Fib1>().set_on(&mut module);
    bind::<Fib2>().set_on(&mut module);
    bind::<Fib3>().set_on(&mut module);
    bind::<Fib4>().set_on(&mut module);
    bind::<Fib5>().set_on(&mut module);
    bind::<Fib6>().set_on(&mut module);
    bind::<Fib7>().set_on(&mut module);
    bind::<Fib8>().set_on(&mut module);
    module
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = BenchConfig::from_env()?;
    let container = Container::new();

    let start = Instant::now();
    container.load_module(fibonacci_module());
    let startup = elapsed_ms(start);

    let mut durations = Vec::with_capacity(config.rounds);
    for _ in 0..config.rounds {
        let start = Instant::now();
        container.get::<Fib8>()?;
        durations.push(elapsed_ms(start));
    }

    let min = durations.iter().copied().fold(f64::INFINITY, f64::min);
    let max = durations.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let average = durations.iter().sum::<f64>() / durations.len() as f64;

    tracing::info!(rounds = config.rounds, "test: lazyioc");
    tracing::info!("startup: {startup:.2} ms");
    tracing::info!("min-max: {min:.2}-{max:.2} ms");
    tracing::info!("average: {average:.2} ms");
    Ok(())
}
