use std::path::Path;

use anyhow::Context;
use mlproject::{evaluate_models, Config, DataTransformation, Logger, ModelRegistry, TransformationOutput};
use tracing::{debug, info};

const DEFAULT_CONFIG: &str = "config.toml";

fn load_config(path: Option<String>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load(&path).with_context(|| format!("loading config from {path}")),
        None if Path::new(DEFAULT_CONFIG).exists() => {
            Config::load(DEFAULT_CONFIG).context("loading config.toml")
        }
        None => Ok(Config::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let config = load_config(std::env::args().nth(1))?;

    let log_path = Logger::from_config(&config.logging)?
        .install()
        .context("installing file logger")?;
    info!(log_file = %log_path.display(), "Starting pipeline");
    debug!(?config, "Config loaded successfully");

    let transformation = DataTransformation::new(config.transformation.clone());
    let output = transformation
        .run(&config.data.train_path, &config.data.test_path)
        .context("data transformation failed")?;
    info!(
        train_shape = ?output.train.dim(),
        test_shape = ?output.test.dim(),
        preprocessor = %output.preprocessor_path.display(),
        "Data transformation complete"
    );

    let (x_train, y_train) = TransformationOutput::split_xy(&output.train)?;
    let (x_test, y_test) = TransformationOutput::split_xy(&output.test)?;

    let mut models = ModelRegistry::from_params(&config.model_params)?;
    let report = evaluate_models(&x_train, &y_train, &x_test, &y_test, &mut models)
        .context("model evaluation failed")?;

    for (name, score) in report.iter() {
        info!(model = name, r2 = score, "Test score");
    }
    if let Some((name, score)) = report.best() {
        info!(model = name, r2 = score, "Best model");
    }
    print!("{report}");

    Ok(())
}
