// src/main.rs

use std::process::ExitCode;
use std::sync::Arc;

use env_logger::Env;
use log::error;
use num::BigInt;

use nfsieve::config::GnfsConfig;
use nfsieve::core::cancellation_token::CancellationToken;
use nfsieve::core::gnfs::Gnfs;
use nfsieve::core::progress::{LogObserver, RunContext};
use nfsieve::integer_math::prime_factory::PrimeFactory;

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() != 2 {
        eprintln!("Usage: nfsieve [N] [primes]");
        return ExitCode::from(1);
    }

    let n: BigInt = match args[0].parse() {
        Ok(n) => n,
        Err(_) => {
            eprintln!("not a decimal integer: {:?}", args[0]);
            return ExitCode::from(1);
        }
    };

    let config = match GnfsConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(1);
        }
    };

    let primes = match PrimeFactory::from_file(&args[1]) {
        Ok(primes) => primes,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(1);
        }
    };

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        if let Err(e) = ctrlc::set_handler(move || cancel.cancel()) {
            error!("could not install interrupt handler: {}", e);
        }
    }
    let ctx = RunContext::with_cancellation(Arc::new(LogObserver), cancel);

    let result = Gnfs::new(&n, primes, config, &ctx).and_then(|mut gnfs| gnfs.factor(&ctx));
    match result {
        Ok(solution) => {
            println!("factor: {}", solution.p);
            println!("factor: {}", solution.q);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::from(1)
        }
    }
}
