//! Local-run demo: classify one image file and print the ranked predictions.
//!
//! Configuration comes from `PERCEPT_*` environment variables (model path,
//! label path, top-k, ...). Exactly one argument is accepted: the path to
//! the image.

use percept::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;

fn image_path_from_args() -> Result<PathBuf, String> {
    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .ok_or_else(|| "please provide a path to your image".to_string())?;
    if args.next().is_some() {
        return Err("only one argument accepted, the image path".to_string());
    }
    Ok(PathBuf::from(path))
}

fn run() -> Result<(), String> {
    let path = image_path_from_args()?;

    let config = ClassifierConfig::from_env().map_err(|e| e.to_string())?;
    let classifier = ImageClassifier::from_config(&config).map_err(|e| e.to_string())?;

    let result = classifier
        .classify_path(&path, None)
        .map_err(|e| e.to_string())?;

    for p in &result.predictions {
        println!("{:<40} {:.4}", p.label, p.confidence);
    }
    println!("inference time: {:.2} ms", result.inference_time_ms);

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}
