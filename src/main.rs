use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use config::Config;
use llm::{LLMClient, LLMConfig};
use react::{AgentEvent, AgentRun, FinishPolicy, Outcome, ReactAgent, ReactOptions};
use std::io::{self, BufRead, Write};
use toolkit::ToolRegistry;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SEPARATOR: &str = "========================================";

#[derive(Debug, Parser)]
#[command(name = "compass", about = "Compass - ReAct travel assistant")]
struct Cli {
    #[command(flatten)]
    run: RunArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Maximum ReAct steps per query (overrides config)
    #[arg(long, global = true)]
    max_steps: Option<usize>,

    /// Abort when `finish(...)` has no readable answer instead of finishing empty
    #[arg(long, global = true)]
    strict_finish: bool,

    /// Print the full prompt sent to the model at every step
    #[arg(long, global = true)]
    show_prompt: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive loop: enter a city, get weather and an attraction (default)
    Chat,

    /// Run a single query for a city
    Ask {
        /// City to ask about
        city: Vec<String>,
    },

    /// List the available tools
    Tools,
}

fn main() -> Result<()> {
    // secrets live in .env rather than in the config file
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let mut cfg = Config::load_with_env()?;
    if let Some(max_steps) = cli.run.max_steps {
        cfg.agent.max_steps = max_steps;
    }
    if cli.run.strict_finish {
        cfg.agent.strict_finish = true;
    }
    cfg.validate()?;

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => cmd_chat(&cfg, cli.run.show_prompt),
        Command::Ask { city } => cmd_ask(&cfg, city, cli.run.show_prompt),
        Command::Tools => cmd_tools(&cfg),
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn build_agent(cfg: &Config) -> Result<ReactAgent<LLMClient>> {
    let api_key = cfg
        .llm
        .api_key
        .clone()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| anyhow::anyhow!("missing LLM API key: set API_KEY (or llm.api_key)"))?;

    let llm_cfg = LLMConfig {
        api_base: cfg.llm.api_base.clone(),
        api_key,
        model: cfg.llm.model.clone(),
        temperature: cfg.llm.temperature,
        timeout_secs: cfg.llm.timeout_secs,
        ..Default::default()
    };
    let client = LLMClient::new(llm_cfg)?;
    let registry = ToolRegistry::with_defaults(&cfg.tools)?;

    let options = ReactOptions {
        max_steps: cfg.agent.max_steps,
        finish_policy: if cfg.agent.strict_finish {
            FinishPolicy::Strict
        } else {
            FinishPolicy::Lenient
        },
    };

    Ok(ReactAgent::new(client, registry, options))
}

fn cmd_chat(cfg: &Config, show_prompt: bool) -> Result<()> {
    let agent = build_agent(cfg)?;
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("Enter a city to look up (type exit to quit): ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }

        let city = line.trim();
        if city.is_empty() {
            continue;
        }
        if city.eq_ignore_ascii_case("exit") || city.eq_ignore_ascii_case("quit") {
            println!("Bye.");
            break;
        }

        // a failed run ends that query only; the user may retry
        if let Err(e) = run_and_print(&agent, city, show_prompt) {
            println!("Run failed: {e:#}");
        }
    }

    Ok(())
}

fn cmd_ask(cfg: &Config, city: Vec<String>, show_prompt: bool) -> Result<()> {
    let city = city.join(" ");
    if city.trim().is_empty() {
        anyhow::bail!("city cannot be empty");
    }

    let agent = build_agent(cfg)?;
    let run = run_and_print(&agent, &city, show_prompt)?;
    if !matches!(run.outcome, Outcome::Finish { .. }) {
        std::process::exit(2);
    }
    Ok(())
}

fn cmd_tools(cfg: &Config) -> Result<()> {
    let registry = ToolRegistry::with_defaults(&cfg.tools)?;
    println!("Tools: {}", registry.len());
    for schema in registry.schemas() {
        println!("  {}  {}", schema.signature(), schema.description);
    }
    Ok(())
}

fn run_and_print(agent: &ReactAgent<LLMClient>, city: &str, show_prompt: bool) -> Result<AgentRun> {
    let mut sink = |event: AgentEvent| print_event(event, show_prompt);
    Ok(agent.run_agent(city, &mut sink)?)
}

fn print_event(event: AgentEvent, show_prompt: bool) {
    match event {
        AgentEvent::Request { request } => {
            println!("\nUser input: {request}\n{SEPARATOR}");
        }
        AgentEvent::StepStarted { step, max_steps } => {
            println!("--- Step {step}/{max_steps} ---\n");
        }
        AgentEvent::Prompt { prompt } => {
            if show_prompt {
                println!("Prompt:\n{prompt}\n");
            }
        }
        AgentEvent::ModelOutput { text, truncated } => {
            if truncated {
                println!("Truncated extra Thought/Action blocks.");
            }
            println!("Model output:\n{text}\n");
        }
        AgentEvent::Observation { text } => {
            println!("{text}\n{SEPARATOR}");
        }
        AgentEvent::Finished { answer } => {
            println!("Task complete, final answer: {answer}");
        }
        AgentEvent::Aborted { reason } => {
            println!("Parse error: {reason}");
        }
        AgentEvent::BudgetExhausted { steps } => {
            println!("Stopped after {steps} steps without a final answer.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::try_parse_from(["compass", "ask", "New", "York", "--max-steps", "3"]).unwrap();
        assert_eq!(cli.run.max_steps, Some(3));
        match cli.command {
            Some(Command::Ask { city }) => assert_eq!(city.join(" "), "New York"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_defaults_to_chat() {
        let cli = Cli::try_parse_from(["compass", "--strict-finish"]).unwrap();
        assert!(cli.run.strict_finish);
        assert!(cli.command.is_none());
    }

    #[test]
    fn build_agent_requires_api_key() {
        let cfg = Config::default();
        assert!(build_agent(&cfg).is_err());
    }
}
