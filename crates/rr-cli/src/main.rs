//! Rerouter CLI
//!
//! CLI tool for evaluating URLs against rule sets and validating rule lists.

mod check;
mod logging;
mod rules;

use std::fs;

use clap::{Parser, Subcommand};

use rr_compiler::{builtin_rules, to_rule_list_json};
use rr_core::{Dispatcher, Request, RequestType};

use crate::check::{parse_cases, run_cases};
use crate::rules::load_registry;

#[derive(Parser)]
#[command(name = "rr-cli")]
#[command(about = "Rerouter rule evaluation and validation tools")]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one request
    Eval {
        /// Request URL
        #[arg(short, long)]
        url: String,

        /// Request type (main_frame, xmlhttprequest, image, ...)
        #[arg(short = 't', long = "type", default_value = "main_frame")]
        request_type: String,

        /// JSON rule list (defaults to the built-in rules)
        #[arg(short, long)]
        rules: Option<String>,
    },

    /// List the rules in registration order
    Rules {
        /// JSON rule list (defaults to the built-in rules)
        #[arg(short, long)]
        rules: Option<String>,
    },

    /// Validate a JSON rule list
    Validate {
        /// Rule list to validate
        #[arg(short, long)]
        rules: String,
    },

    /// Evaluate a JSON array of requests and compare against expectations
    Check {
        /// Check file: [{"url", "type"?, "expect"?}]
        #[arg(short, long)]
        input: String,

        /// JSON rule list (defaults to the built-in rules)
        #[arg(short, long)]
        rules: Option<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the built-in rules as a JSON rule list
    DumpBuiltin,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Eval {
            url,
            request_type,
            rules,
        } => cmd_eval(&url, &request_type, rules.as_deref()),
        Commands::Rules { rules } => cmd_rules(rules.as_deref()),
        Commands::Validate { rules } => cmd_validate(&rules),
        Commands::Check { input, rules, json } => cmd_check(&input, rules.as_deref(), json),
        Commands::DumpBuiltin => cmd_dump_builtin(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn cmd_eval(url: &str, request_type: &str, rules: Option<&str>) -> Result<(), String> {
    let request_type = RequestType::parse(request_type)
        .ok_or_else(|| format!("Unknown request type '{}'", request_type))?;
    let dispatcher = Dispatcher::new(load_registry(rules)?);

    let result = dispatcher.evaluate_detailed(&Request::new(url, request_type));
    let rule_name = dispatcher.registry().get(result.rule_id).map(|rule| rule.name());

    match (result.decision.redirect_url(), rule_name) {
        (Some(target), Some(name)) => println!("redirect {} (rule: {})", target, name),
        (None, Some(name)) => println!("no action (rule {} matched, no rewrite)", name),
        _ => println!("no action"),
    }

    Ok(())
}

fn cmd_rules(rules: Option<&str>) -> Result<(), String> {
    let registry = load_registry(rules)?;

    println!("Rules: {}", registry.len());
    for (idx, rule) in registry.rules().iter().enumerate() {
        println!();
        println!("  [{}] {} ({})", idx, rule.name(), rule.transform().kind());
        println!("      types:    {}", rule.types().names().join(", "));
        for pattern in rule.patterns() {
            println!("      pattern:  {}", pattern);
        }
    }

    Ok(())
}

fn cmd_validate(rules: &str) -> Result<(), String> {
    let registry = load_registry(Some(rules))?;

    let pattern_count: usize = registry.rules().iter().map(|rule| rule.patterns().len()).sum();
    println!("Rule list '{}' is valid", rules);
    println!("  Rules:       {}", registry.len());
    println!("  Patterns:    {}", pattern_count);

    Ok(())
}

fn cmd_check(input: &str, rules: Option<&str>, json: bool) -> Result<(), String> {
    let content = fs::read_to_string(input)
        .map_err(|e| format!("Failed to read '{}': {}", input, e))?;
    let cases = parse_cases(&content)?;
    let dispatcher = Dispatcher::new(load_registry(rules)?);

    let outcomes = run_cases(&dispatcher, &cases);
    let failed = outcomes.iter().filter(|outcome| !outcome.passed).count();

    if json {
        let text = serde_json::to_string_pretty(&outcomes)
            .map_err(|e| format!("Failed to serialize results: {}", e))?;
        println!("{}", text);
    } else {
        for outcome in &outcomes {
            let status = if outcome.passed { "ok  " } else { "FAIL" };
            let decision = outcome.redirect.as_deref().unwrap_or("no action");
            let rule = outcome.rule.as_deref().unwrap_or("-");
            println!("{} {} [{}] -> {} (rule: {})", status, outcome.url, outcome.request_type, decision, rule);
        }
        println!();
        println!("{} checked, {} failed", outcomes.len(), failed);
    }

    if failed > 0 {
        return Err(format!("{} of {} checks failed", failed, outcomes.len()));
    }

    Ok(())
}

fn cmd_dump_builtin() -> Result<(), String> {
    let text = to_rule_list_json(&builtin_rules())
        .map_err(|e| format!("Failed to serialize built-in rules: {}", e))?;
    println!("{}", text);
    Ok(())
}
