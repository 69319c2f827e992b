// crates/seekercli/src/main.rs

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use seekercore::ExecutionEvent;
use seekerflows::export::{export_file_name, export_queries, ExportFormat};
use seekerflows::{presentation, ActionError, GeminiConfig, GeminiModel, SeekerActions};
use seekerruntime::{FlowRegistry, SeekerRuntime};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "seeker")]
#[command(about = "Seeker Lens OSINT query assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Show debug logging and execution events
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse free text and generate optimised Google/Yandex queries
    Analyze {
        /// Query, URL or data to analyse
        input: String,

        /// Write the generated queries to files (txt or csv)
        #[arg(long)]
        export: Option<ExportFormat>,

        /// Directory for exported files
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Suggest related search terms and alternative strategies
    Related {
        /// Initial search term
        term: String,
    },

    /// Generate a query set for an OSINT objective
    Strategic {
        #[arg(short, long)]
        objective: String,

        #[arg(short, long)]
        context: String,

        #[arg(long)]
        export: Option<ExportFormat>,

        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// List registered flows
    Flows,

    /// List the suggested OSINT objectives
    Objectives,

    /// Print the prompt a flow would send, without calling the model
    Render {
        /// Flow name, e.g. suggest-related-terms
        flow: String,

        /// Input field as key=value, repeatable
        #[arg(long = "var", value_parser = parse_var)]
        vars: Vec<(String, String)>,
    },
}

fn parse_var(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn build_runtime() -> Result<SeekerRuntime> {
    let model = Arc::new(GeminiModel::new(GeminiConfig::from_env())?);
    let mut registry = FlowRegistry::new();
    seekerflows::register_all_flows(&mut registry)?;
    Ok(SeekerRuntime::new(registry, model))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let runtime = build_runtime()?;
    let event_task = cli.verbose.then(|| spawn_event_printer(&runtime));
    let actions = SeekerActions::new(runtime.executor().clone());

    let result = match cli.command {
        Commands::Analyze {
            input,
            export,
            out_dir,
        } => {
            let result = actions.analyze_and_generate(&input).await.map_err(report)?;
            match cli.format {
                OutputFormat::Json => print_json(&result)?,
                OutputFormat::Text => {
                    println!("🔎 Analysis");
                    print_list("Entities", &result.analysis.entities);
                    print_list("Concepts", &result.analysis.concepts);
                    println!("  Information needs: {}", result.analysis.information_needs);
                    print_list("Suggested queries", &result.analysis.query_suggestions);
                    println!();
                    println!("🎯 Optimised for: {}", result.seed_query);
                    print_list("Google", &result.optimized_queries.google_queries);
                    print_list("Yandex", &result.optimized_queries.yandex_queries);
                }
            }
            if let Some(format) = export {
                write_export(&out_dir, "Google", &result.optimized_queries.google_queries, format)?;
                write_export(&out_dir, "Yandex", &result.optimized_queries.yandex_queries, format)?;
            }
            Ok(())
        }

        Commands::Related { term } => {
            let result = actions.suggest_related_terms(&term).await.map_err(report)?;
            match cli.format {
                OutputFormat::Json => print_json(&result)?,
                OutputFormat::Text => {
                    print_list("Related terms", &result.related_terms);
                    print_list("Alternative strategies", &result.alternative_strategies);
                }
            }
            Ok(())
        }

        Commands::Strategic {
            objective,
            context,
            export,
            out_dir,
        } => {
            let result = actions
                .generate_strategic_queries(&objective, &context)
                .await
                .map_err(report)?;
            match cli.format {
                OutputFormat::Json => print_json(&result)?,
                OutputFormat::Text => print_list(&objective, &result.queries),
            }
            if let Some(format) = export {
                write_export(&out_dir, "Strategic", &result.queries, format)?;
            }
            Ok(())
        }

        Commands::Flows => {
            list_flows(&runtime, cli.format)?;
            Ok(())
        }

        Commands::Objectives => {
            for objective in seekerflows::OSINT_OBJECTIVES {
                println!("  • {}", objective);
            }
            Ok(())
        }

        Commands::Render { flow, vars } => {
            let input: Map<String, Value> = vars
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect();
            let prompt = runtime.executor().render(&flow, Value::Object(input))?;
            println!("{}", prompt);
            Ok(())
        }
    };

    if let Some(task) = event_task {
        // let the printer drain what is already queued
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        task.abort();
    }

    result
}

fn report(err: ActionError) -> anyhow::Error {
    eprintln!("❌ {}: {}", presentation::title(err.capability), presentation::friendly_message(&err));
    anyhow!(err)
}

fn spawn_event_printer(runtime: &SeekerRuntime) -> tokio::task::JoinHandle<()> {
    let mut events = runtime.subscribe_events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                ExecutionEvent::FlowStarted { flow, .. } => {
                    eprintln!("  ⚡ Starting flow: {}", flow);
                }
                ExecutionEvent::ModelInvoked {
                    flow,
                    model,
                    prompt_chars,
                    ..
                } => {
                    eprintln!("  🤖 {} → {} ({} chars)", flow, model, prompt_chars);
                }
                ExecutionEvent::FlowCompleted {
                    flow, duration_ms, ..
                } => {
                    eprintln!("  ✅ Flow {} completed in {}ms", flow, duration_ms);
                }
                ExecutionEvent::FlowFailed {
                    flow, kind, error, ..
                } => {
                    eprintln!("  ❌ Flow {} failed ({}): {}", flow, kind, error);
                }
            }
        }
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_list(title: &str, items: &[String]) {
    println!("  {}:", title);
    if items.is_empty() {
        println!("    (none)");
    }
    for item in items {
        println!("    • {}", item);
    }
}

fn write_export(dir: &Path, platform: &str, queries: &[String], format: ExportFormat) -> Result<()> {
    let path = dir.join(export_file_name(platform, format));
    std::fs::write(&path, export_queries(queries, format))?;
    println!("📁 Exported {} {} queries to {}", queries.len(), platform, path.display());
    Ok(())
}

fn list_flows(runtime: &SeekerRuntime, format: OutputFormat) -> Result<()> {
    let registry = runtime.registry();
    match format {
        OutputFormat::Json => {
            let flows: Vec<_> = registry
                .definitions()
                .map(|flow| {
                    serde_json::json!({
                        "name": flow.name,
                        "description": flow.description,
                        "input": flow.input_schema.field_names(),
                        "output": flow.output_schema.field_names(),
                    })
                })
                .collect();
            print_json(&flows)?;
        }
        OutputFormat::Text => {
            println!("📦 Available flows:");
            println!();
            for flow in registry.definitions() {
                println!("  • {}", flow.name);
                if let Some(description) = &flow.description {
                    println!("    {}", description);
                }
                println!(
                    "    in: {}  out: {}",
                    flow.input_schema.field_names().join(", "),
                    flow.output_schema.field_names().join(", ")
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_var_splits_on_first_equals() {
        assert_eq!(
            parse_var("context=a=b"),
            Ok(("context".to_string(), "a=b".to_string()))
        );
        assert!(parse_var("novalue").is_err());
        assert!(parse_var("=x").is_err());
    }

    #[test]
    fn cli_parses_strategic_command() {
        let cli = Cli::try_parse_from([
            "seeker",
            "strategic",
            "--objective",
            "Metadata Discovery",
            "--context",
            "acme.com",
            "--export",
            "csv",
        ])
        .unwrap();
        match cli.command {
            Commands::Strategic { export, .. } => assert_eq!(export, Some(ExportFormat::Csv)),
            _ => panic!("expected strategic command"),
        }
    }
}
