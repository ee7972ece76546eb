use std::process::ExitCode;

use anyhow::{bail, Context as _, Result};

use topo_validate::config::{Config, OutputFormat};
use topo_validate::graph::{Coverage, Graph, GraphDocument};
use topo_validate::operations::{invoke_fix, FixOutcome, GraphOperations};
use topo_validate::tags::TagTable;
use topo_validate::validation::{Context, ValidationResult, Validator};

/// Exit code when issues remain
const EXIT_ISSUES: u8 = 2;

fn main() -> Result<ExitCode> {
    // Parse configuration from command line and environment
    let config = Config::from_args_and_env()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    let tags = TagTable::resolve(config.tags.as_deref(), &config.tag_dirs)?;
    let loaded = GraphDocument::load(&config.input)?;

    let mut validator = Validator::with_default_rules();
    config.apply_rules(&mut validator)?;

    let mut result = validate(&validator, &config, &loaded.graph, &tags, &loaded.coverage);

    if let Some(n) = config.fix {
        if let Some(graph) = apply_fix(&result, n, &loaded.graph)? {
            result = validate(&validator, &config, &graph, &tags, &loaded.coverage);
        }
    }

    print_result(&result, config.format)?;

    Ok(if result.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_ISSUES)
    })
}

fn validate(
    validator: &Validator,
    config: &Config,
    graph: &Graph,
    tags: &TagTable,
    coverage: &Coverage,
) -> ValidationResult {
    let ctx = Context::new(graph, tags).with_data(coverage);
    if config.entities.is_empty() {
        validator.validate_graph(&ctx)
    } else {
        validator.validate_entities(&config.entities, &ctx)
    }
}

/// Apply the first fix of issue `n` (1-based) that is enabled.
///
/// Returns the edited graph, or `None` when the fix needs an editor.
fn apply_fix(result: &ValidationResult, n: usize, graph: &Graph) -> Result<Option<Graph>> {
    let Some(issue) = n.checked_sub(1).and_then(|i| result.issues.get(i)) else {
        bail!("No issue {} (found {})", n, result.len());
    };

    for fix in &issue.fixes {
        let outcome = invoke_fix(fix, graph, &GraphOperations)
            .with_context(|| format!("Failed to apply '{}'", fix.title))?;
        match outcome {
            FixOutcome::Applied(next) => {
                eprintln!("Applied: {}", fix.title);
                return Ok(Some(next));
            }
            FixOutcome::Deferred(action) => {
                log::info!("'{}' needs an editor ({:?})", fix.title, action);
            }
            FixOutcome::Skipped(reason) => {
                log::info!("'{}' is not available: {}", fix.title, reason);
            }
        }
    }

    eprintln!("No fix of issue {} can be applied here", n);
    Ok(None)
}

fn print_result(result: &ValidationResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&result.issues)
                .context("Failed to serialize issues")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            for (i, issue) in result.issues.iter().enumerate() {
                let ids: Vec<String> = issue.entity_ids.iter().map(ToString::to_string).collect();
                println!(
                    "{}. [{}] {}: {} ({})",
                    i + 1,
                    issue.severity,
                    issue.kind,
                    issue.message,
                    ids.join(", ")
                );
                for fix in &issue.fixes {
                    println!("     - {}", fix.title);
                }
            }
            println!("{} issue(s)", result.len());
        }
    }
    Ok(())
}
