//! VRM Studio - Entry Point
//!
//! Runs the HTTP endpoint for the editor UI, an interactive terminal session,
//! or a single command. Without `LLM_API_KEY` only manual editing works.

use clap::{Parser, Subcommand};
use vrm_studio::core::config::AppConfig;
use vrm_studio::core::error::Result;
use vrm_studio::core::types::Category;
use vrm_studio::render::sink::{RendererSink, TracingRenderer};
use vrm_studio::session::{Role, Session};

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "vrm-studio")]
#[command(about = "Drive a VRM avatar's pose, expression and material with natural language")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API
    Serve {
        /// Overrides `[server] bind`
        #[arg(long)]
        bind: Option<String>,
    },
    /// Interactive session (default)
    Repl,
    /// Run one command and print the result as JSON
    Once { command: Vec<String> },
    /// Print the parameter table
    Schema,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vrm_studio=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    let rt = Runtime::new()?;
    let session = Arc::new(Session::from_config(&config)?);

    match cli.command.unwrap_or(Command::Repl) {
        Command::Serve { bind } => {
            let addr = bind.unwrap_or_else(|| config.server.bind.clone());
            rt.block_on(vrm_studio::server::serve(session, &addr))
        }
        Command::Repl => run_repl(&rt, &session),
        Command::Once { command } => {
            let result = rt.block_on(session.submit_detached(&command.join(" ")))?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Command::Schema => {
            print!("{}", session.schema().describe());
            Ok(())
        }
    }
}

fn run_repl(rt: &Runtime, session: &Arc<Session>) -> Result<()> {
    let mut renderer = TracingRenderer::new();
    apply_defaults(session, &mut renderer);

    println!("\n=== VRM STUDIO ===");
    println!();
    println!("Commands:");
    println!("  set <category> <name> <value>  - Edit one parameter");
    println!("  show / s                       - Show current parameters");
    println!("  reset                          - Clear all parameters");
    println!("  log                            - Show the chat log");
    println!("  quit / q                       - Exit");
    if session.natural_language_enabled() {
        println!("  <any text>                     - Natural language command");
    } else {
        println!("  (natural language disabled: LLM_API_KEY not set)");
    }
    println!();
    print_last_message(session);

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input == "quit" || input == "q" {
            break;
        }

        if input == "show" || input == "s" {
            display_parameters(session);
            continue;
        }

        if input == "log" {
            for message in session.chat() {
                let who = match message.role {
                    Role::User => "you",
                    Role::System => "studio",
                };
                println!("  [{}] {}", who, message.text);
            }
            continue;
        }

        if input == "reset" {
            session.reset();
            apply_defaults(session, &mut renderer);
            print_last_message(session);
            continue;
        }

        if let Some(args) = input.strip_prefix("set ") {
            match parse_set(args) {
                Some((category, name, value)) => {
                    match session.set_parameter(category, name, value) {
                        Ok(parameter) => {
                            renderer.apply(parameter.category, &parameter.name, parameter.value);
                            println!("Set {}", parameter);
                        }
                        Err(e) => println!("Could not set parameter: {}", e),
                    }
                }
                None => println!("Usage: set <pose|face|material> <name> <value>"),
            }
            continue;
        }

        match rt.block_on(session.submit_detached(input)) {
            Ok(result) => {
                if result.success {
                    renderer.apply_set(&session.parameters());
                }
                print_last_message(session);
                if result.rejected > 0 {
                    println!("  ({} suggested value(s) were outside the schema)", result.rejected);
                }
            }
            Err(e) => println!("{}", e),
        }
    }

    println!(
        "\nGoodbye! {} parameter(s) set, {} render operation(s) applied.",
        session.parameters().len(),
        renderer.applied().len()
    );
    Ok(())
}

fn parse_set(args: &str) -> Option<(Category, &str, f64)> {
    let mut parts = args.split_whitespace();
    let category = parts.next()?.parse().ok()?;
    let name = parts.next()?;
    let value = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((category, name, value))
}

/// Put the avatar back into its neutral state
fn apply_defaults(session: &Session, renderer: &mut impl RendererSink) {
    for (category, name, range) in session.schema().iter() {
        renderer.apply(category, name, range.default);
    }
}

fn print_last_message(session: &Session) {
    if let Some(message) = session.chat().last() {
        println!("{}", message.text);
    }
}

fn display_parameters(session: &Session) {
    let params = session.parameters();
    if params.is_empty() {
        println!("No parameters set.");
        return;
    }
    for parameter in params.to_sorted_vec() {
        println!("  {}", parameter);
    }
}
