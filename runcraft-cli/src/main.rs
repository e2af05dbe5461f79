//! # runcraft CLI
//!
//! Command-line walkthroughs for running agents against Gemini's
//! OpenAI-compatible endpoint.
//!
//! Usage:
//!   runcraft setup
//!   runcraft hello
//!   runcraft task <TASK_TYPE> [--context <TEXT>] <INPUT>...
//!   runcraft batch [--deadline-secs <N>] <PROMPT>...
//!
//! Examples:
//!   runcraft setup
//!   runcraft -t 0.9 personas "How do I improve my coding skills?"
//!   runcraft task creative -c "Focus on sustainability." Describe a futuristic city
//!   runcraft batch -d 5 "What is Rust?" "What is a monad?"
//!
//! The credential is read from `GEMINI_API_KEY`; a `.env` file in the working
//! directory is loaded first.

use clap::{Parser, Subcommand};
use runcraft_agent::{Agent, BatchJob, BatchOutcome, DynamicAgent, Persona, Runner};
use runcraft_model::{
    ConfigFactory, Configuration, ModelId, OpenAIProvider, Result, RunConfig, UsageTracker,
    DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE,
};
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "runcraft")]
#[command(author, version, about = "runcraft - agent walkthroughs against a hosted model")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Sampling temperature, 0.0 (focused) to 1.0 (creative)
    #[arg(short, long, global = true, default_value_t = DEFAULT_TEMPERATURE, allow_negative_numbers = true)]
    temperature: f32,

    /// Maximum number of tokens in a response
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_OUTPUT_TOKENS, allow_negative_numbers = true)]
    max_tokens: i64,

    /// Model to run
    #[arg(short, long, global = true, default_value = "gemini-2.0-flash", value_parser = parse_model)]
    model: ModelId,

    /// Show debug logs and token usage
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode - only print model output
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the credential and configurations are usable
    Setup,
    /// Run the simplest possible agent
    Hello {
        #[arg(default_value = "Hello! What can you help me with?")]
        input: String,
    },
    /// Ask the same question to three personalities
    Personas {
        #[arg(trailing_var_arg = true)]
        question: Vec<String>,
    },
    /// Compare a focused (0.1) and a creative (0.9) writer
    Temperature,
    /// Ask the same question several times at low temperature
    Consistency {
        /// Number of runs
        #[arg(short, long, default_value_t = 3)]
        runs: usize,

        #[arg(trailing_var_arg = true)]
        question: Vec<String>,
    },
    /// Run one task-specific agent (email, code, creative, tutor, analyst)
    Task {
        task_type: String,

        /// Extra context appended to the instructions
        #[arg(short, long, default_value = "")]
        context: String,

        #[arg(trailing_var_arg = true, required = true)]
        input: Vec<String>,
    },
    /// Run the dynamic agent across several task types
    Demo,
    /// Show how extra context changes a tutor's answer
    Evolve,
    /// Run prompts concurrently under one overall deadline
    Batch {
        /// Seconds before unfinished calls are cancelled
        #[arg(short, long, default_value_t = 10)]
        deadline_secs: u64,

        /// Instructions shared by every prompt
        #[arg(short, long, default_value = "Answer this question briefly and clearly.")]
        instructions: String,

        #[arg(required = true)]
        prompts: Vec<String>,
    },
}

fn parse_model(s: &str) -> std::result::Result<ModelId, String> {
    s.parse::<ModelId>().map_err(|e| e.message().to_string())
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "runcraft_agent=debug,runcraft_model=debug,runcraft=debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn joined_or(words: &[String], default: &str) -> String {
    if words.is_empty() {
        default.to_string()
    } else {
        words.join(" ")
    }
}

struct App {
    factory: ConfigFactory,
    model: ModelId,
    temperature: f32,
    max_tokens: i64,
    quiet: bool,
    usage: UsageTracker,
}

impl App {
    fn new(cli: &Cli) -> Self {
        Self {
            factory: ConfigFactory::from_env(),
            model: cli.model,
            temperature: cli.temperature,
            max_tokens: cli.max_tokens,
            quiet: cli.quiet,
            usage: UsageTracker::new(),
        }
    }

    fn configuration(&self, temperature: f32, max_tokens: i64) -> Result<Configuration> {
        Ok(self.factory.build(temperature, max_tokens)?.with_model(self.model))
    }

    fn default_configuration(&self) -> Result<Configuration> {
        self.configuration(self.temperature, self.max_tokens)
    }

    fn heading(&self, title: &str) {
        if !self.quiet {
            println!("{}", title);
            println!("{}", "-".repeat(50));
        }
    }

    fn separator(&self) {
        if !self.quiet {
            println!("\n{}\n", "=".repeat(50));
        }
    }

    async fn run_agent(
        &mut self,
        provider: &OpenAIProvider,
        agent: &Agent,
        input: &str,
        config: &RunConfig,
    ) -> Result<String> {
        let result = Runner::run(provider, agent, input, config).await?;
        self.usage.track(&result.model, &result.usage);
        Ok(result.output_text)
    }

    fn setup(&self) -> Result<()> {
        let config = self.default_configuration()?;
        config.connect()?;
        println!(
            "Setup successful! {} configured at {}",
            config.model_id(),
            config.endpoint()
        );

        let presets = self.factory.build_presets()?;
        println!("Created {} different configurations:", presets.len());
        for (preset, config) in &presets {
            println!(
                "  - {} (temperature {}, max tokens {})",
                preset.name(),
                config.temperature(),
                config.max_output_tokens()
            );
        }
        Ok(())
    }

    async fn hello(&mut self, input: &str) -> Result<()> {
        let config = self.default_configuration()?;
        let provider = config.connect()?;

        let agent = Agent::new(
            "HelloBot",
            "You are a friendly assistant. Always greet users warmly and be helpful.",
        );

        if !self.quiet {
            println!("Creating your first AI agent...");
        }
        let output = self.run_agent(&provider, &agent, input, &config.run_config()).await?;
        println!("Agent Response: {}", output);
        Ok(())
    }

    async fn personas(&mut self, question: &str) -> Result<()> {
        let config = self.default_configuration()?;
        let provider = config.connect()?;
        let run_config = config.run_config();

        if !self.quiet {
            println!("Testing different agent personalities...\n");
        }
        for persona in Persona::ALL {
            self.heading(&persona.agent_name().to_uppercase());
            let output = self
                .run_agent(&provider, &persona.agent(), question, &run_config)
                .await?;
            println!("{}", output);
            self.separator();
        }
        Ok(())
    }

    async fn temperature(&mut self) -> Result<()> {
        let low = self.configuration(0.1, self.max_tokens)?;
        let high = self.configuration(0.9, self.max_tokens)?;
        let provider = low.connect()?;

        let instructions = "You are a creative writing assistant.\n\
                            Write a short story opening about a mysterious door.";
        let prompt = "Write the opening paragraph of a story about finding a glowing door in an old library.";

        let focused = Agent::new("Focused Writer", instructions);
        let creative = Agent::new("Creative Writer", instructions);

        self.heading("LOW TEMPERATURE (0.1) - Focused & Consistent:");
        let output = self.run_agent(&provider, &focused, prompt, &low.run_config()).await?;
        println!("{}\n", output);

        self.heading("HIGH TEMPERATURE (0.9) - Creative & Varied:");
        let output = self.run_agent(&provider, &creative, prompt, &high.run_config()).await?;
        println!("{}", output);
        Ok(())
    }

    async fn consistency(&mut self, runs: usize, question: &str) -> Result<()> {
        let config = self.configuration(0.1, self.max_tokens)?;
        let provider = config.connect()?;
        let run_config = config.run_config();
        let agent = Agent::new("Test Agent", "Answer this question briefly and clearly.");

        if !self.quiet {
            println!("Running the same question {} times with LOW temperature:", runs);
        }
        for i in 1..=runs {
            let output = self.run_agent(&provider, &agent, question, &run_config).await?;
            println!("Run {}: {}", i, output);
        }
        Ok(())
    }

    async fn task(&mut self, task_type: &str, input: &str, context: &str) -> Result<()> {
        let config = self.default_configuration()?;
        let provider = config.connect()?;
        let system = DynamicAgent::new("Versatile Assistant", config.run_config());

        let result = system.handle_request(&provider, task_type, input, context).await?;
        self.usage.track(&result.model, &result.usage);
        println!("{}", result.output_text);
        Ok(())
    }

    async fn demo(&mut self) -> Result<()> {
        let config = self.default_configuration()?;
        let provider = config.connect()?;
        let system = DynamicAgent::new("Versatile Assistant", config.run_config());

        let cases = [
            (
                "email",
                "Write a follow-up email to a client about a delayed project",
                "The delay is due to unexpected technical challenges.",
            ),
            (
                "code",
                "Write a Python function to calculate fibonacci numbers",
                "Make it efficient and handle edge cases.",
            ),
            (
                "creative",
                "Describe a futuristic city",
                "Focus on environmental sustainability.",
            ),
            (
                "tutor",
                "Explain what loops are in programming",
                "Explain to a beginner with no programming experience.",
            ),
        ];

        for (i, (task_type, input, context)) in cases.iter().enumerate() {
            self.heading(&format!("Test {}: {} task", i + 1, task_type));
            if !self.quiet {
                println!("Input: {}", input);
                println!("Context: {}\n", context);
            }

            // One failing case should not hide the others.
            match system.handle_request(&provider, task_type, input, context).await {
                Ok(result) => {
                    self.usage.track(&result.model, &result.usage);
                    println!("Response: {}", result.output_text);
                }
                Err(e) => eprintln!("Error: {}", e),
            }
            self.separator();
        }
        Ok(())
    }

    async fn evolve(&mut self) -> Result<()> {
        let config = self.default_configuration()?;
        let provider = config.connect()?;
        let system = DynamicAgent::new("Learning Assistant", config.run_config());
        let question = "What is machine learning?";

        let steps = [
            ("1. Basic explanation:", ""),
            (
                "2. With student level context:",
                "The student is a college computer science major with programming experience.",
            ),
            (
                "3. With specific learning goals:",
                "The student is a college CS major preparing for a job interview at a tech company.\n\
                 Focus on practical applications and common interview topics.",
            ),
        ];

        for (title, context) in steps {
            self.heading(title);
            let result = system.handle_request(&provider, "tutor", question, context).await?;
            self.usage.track(&result.model, &result.usage);
            println!("Response: {}\n", result.output_text);
        }
        Ok(())
    }

    async fn batch(&mut self, prompts: &[String], instructions: &str, deadline: Duration) -> Result<()> {
        let config = self.default_configuration()?;
        let provider = config.connect()?;
        let agent = Agent::new("Batch Agent", instructions);

        let jobs: Vec<BatchJob> = prompts
            .iter()
            .map(|prompt| BatchJob::new(agent.clone(), prompt.as_str()))
            .collect();

        debug!(jobs = jobs.len(), deadline_secs = deadline.as_secs(), "starting batch");
        let outcomes =
            Runner::run_batch_with_deadline(&provider, &jobs, &config.run_config(), deadline).await;

        let (mut finished, mut cancelled) = (0, 0);
        for (i, (job, outcome)) in jobs.iter().zip(outcomes).enumerate() {
            println!("[{}] {}", i + 1, job.input);
            match outcome {
                BatchOutcome::Finished(Ok(result)) => {
                    finished += 1;
                    self.usage.track(&result.model, &result.usage);
                    println!("    {}", result.output_text);
                }
                BatchOutcome::Finished(Err(e)) => {
                    finished += 1;
                    eprintln!("    failed: {}", e);
                }
                BatchOutcome::Cancelled => {
                    cancelled += 1;
                    println!("    some task not complete in time, cancelled");
                }
            }
        }

        if !self.quiet {
            println!(
                "\nFinished: {}/{}, cancelled: {}",
                finished,
                jobs.len(),
                cancelled
            );
        }
        Ok(())
    }

    fn print_usage(&self) {
        if self.usage.total_calls == 0 {
            return;
        }
        println!(
            "\n--- Usage: {} calls, {} prompt + {} completion tokens ---",
            self.usage.total_calls, self.usage.total_prompt_tokens, self.usage.total_completion_tokens
        );
        for (model, usage) in &self.usage.by_model {
            println!("  {}: {} tokens", model, usage.total_tokens);
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut app = App::new(&cli);

    let result = match &cli.command {
        Commands::Setup => app.setup(),
        Commands::Hello { input } => app.hello(input).await,
        Commands::Personas { question } => {
            app.personas(&joined_or(question, "How do I improve my coding skills?")).await
        }
        Commands::Temperature => app.temperature().await,
        Commands::Consistency { runs, question } => {
            app.consistency(*runs, &joined_or(question, "What is the capital of France?"))
                .await
        }
        Commands::Task {
            task_type,
            context,
            input,
        } => app.task(task_type, &input.join(" "), context).await,
        Commands::Demo => app.demo().await,
        Commands::Evolve => app.evolve().await,
        Commands::Batch {
            deadline_secs,
            instructions,
            prompts,
        } => {
            app.batch(prompts, instructions, Duration::from_secs(*deadline_secs))
                .await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if cli.verbose {
            eprintln!("\n{:?}", e);
        }
        std::process::exit(1);
    }

    if cli.verbose {
        app.print_usage();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_task_command() {
        let cli = Cli::parse_from([
            "runcraft", "-t", "0.2", "task", "creative", "-c", "Focus on sustainability.",
            "Describe", "a", "city",
        ]);
        assert_eq!(cli.temperature, 0.2);
        match cli.command {
            Commands::Task { task_type, context, input } => {
                assert_eq!(task_type, "creative");
                assert_eq!(context, "Focus on sustainability.");
                assert_eq!(input.join(" "), "Describe a city");
            }
            _ => panic!("expected task command"),
        }
    }

    #[test]
    fn test_negative_values_reach_validation() {
        let cli = Cli::parse_from(["runcraft", "--max-tokens", "-5", "setup"]);
        assert_eq!(cli.max_tokens, -5);
    }

    #[test]
    fn test_unknown_model_rejected() {
        assert!(Cli::try_parse_from(["runcraft", "-m", "gpt-5", "setup"]).is_err());
    }

    #[test]
    fn test_joined_or() {
        assert_eq!(joined_or(&[], "default"), "default");
        assert_eq!(joined_or(&["a".into(), "b".into()], "default"), "a b");
    }
}
