use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Parser;

use declmap::cli::{Cli, Commands};
use declmap::config::{loader, resolve_files};
use declmap::pipeline::{self, PipelineFailure, PipelineOptions};
use declmap::GeneratorConfig;

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Generate {
            api,
            config,
            output,
            fail_on_drift,
        } => run_generate(api, config, output, fail_on_drift),
        Commands::Init { force } => run_init(force),
    };

    match outcome {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}

fn run_generate(
    api: String,
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
    fail_on_drift: bool,
) -> Result<i32> {
    let (config, base_dir) = match &config_path {
        Some(path) => {
            let base = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            (loader::load_config_from(path)?, base)
        }
        None => (loader::load_config(), PathBuf::from(".")),
    };

    let Some(api_config) = config.apis.get(&api) else {
        bail!("API `{api}` is not declared in the configuration");
    };

    let files = resolve_files(&base_dir, &api_config.include)?;
    if files.is_empty() {
        log::warn!("no source files matched the include patterns for `{api}`");
    }

    let rules = declmap::adapters::resolve(&api).rules(api_config);

    let output_dir = output
        .or_else(|| config.output_dir.as_ref().map(|dir| base_dir.join(dir)))
        .unwrap_or_else(|| base_dir.join("generated"));
    let mut generator = GeneratorConfig::new(output_dir);
    generator.split = api_config.split;
    generator.fail_on_drift = api_config.fail_on_drift || fail_on_drift;
    if let Some(pattern) = &api_config.file_pattern {
        generator.file_pattern = pattern.clone();
    }
    if let Some(pattern) = &api_config.contracts_pattern {
        generator.contracts_pattern = pattern.clone();
    }
    if let Some(module) = &api_config.module {
        generator.module_pattern = module.clone();
    }

    let options = PipelineOptions::new(generator);
    match pipeline::run(files, rules, &options) {
        Ok(outcome) => {
            for error in &outcome.context.errors {
                eprintln!("warning: {}", format_diagnostic(error));
            }
            for path in &outcome.report.written {
                println!("wrote {}", path.display());
            }
            println!("wrote {}", outcome.manifest_path.display());
            Ok(0)
        }
        Err(failure) => {
            report_failure(&failure);
            Ok(if failure.error.is_drift() { 2 } else { 1 })
        }
    }
}

fn report_failure(failure: &PipelineFailure) {
    for error in &failure.context.errors {
        eprintln!("error: {}", format_diagnostic(error));
    }
    let metrics = &failure.context.metrics;
    eprintln!(
        "aborted after parsing {} file(s), extracting {} type(s): {}",
        metrics.files_parsed, metrics.types_extracted, failure.error
    );
}

fn format_diagnostic(error: &declmap::ExtractionError) -> String {
    let location = match (error.line, error.column) {
        (Some(line), Some(column)) => format!("{}:{line}:{column}", error.file.display()),
        (Some(line), None) => format!("{}:{line}", error.file.display()),
        _ => error.file.display().to_string(),
    };
    match &error.type_name {
        Some(name) => format!("{location}: [{name}] {}", error.message),
        None => format!("{location}: {}", error.message),
    }
}

fn run_init(force: bool) -> Result<i32> {
    const STARTER: &str = r#"# declmap configuration.
# Each [apis.<id>] section describes one extraction target.

output_dir = "generated"

[apis.example]
version = "1.0.0"
include = ["src/**/*.ts"]
# exclude_types = ["InternalState"]
# prefix = "Api"
# classes = ["Client", "Service"]
# require_response_envelope = true
# split = false
# fail_on_drift = true

# [apis.example.transforms.Payment]
# rename = "Charge"
"#;

    let path = PathBuf::from(loader::CONFIG_FILE_NAME);
    if path.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite",
            path.display()
        );
    }
    std::fs::write(&path, STARTER)?;
    println!("wrote {}", path.display());
    Ok(0)
}
