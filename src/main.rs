use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cadence::api::ApiServerBuilder;
use cadence::assistant::{CannedResponder, ChatSession};
use cadence::input::stdin_lines;
use cadence::speech::{Emotion, clean_for_speech};
use cadence::timing::{TokioPacer, Typist, deliver_segments, plan_segments};
use cadence::training::{DEMO_INTRO, TrainingSession, find_customer};
use cadence::voice::{Voice, VoiceProvider, catalog};
use cadence::{CadencePlan, Config, Pace};

/// Cadence - natural conversational timing for demos and training
#[derive(Parser)]
#[command(name = "cadence", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Chat with the coding assistant demo
    Chat {
        /// Conversation pace (slow, normal, fast)
        pace: Option<Pace>,
        /// Speak replies through the configured voice
        #[arg(long)]
        voice: bool,
    },
    /// Practice a call with a simulated bank customer
    Train {
        /// Customer to start with (e.g. frustrated_sarah_1234)
        #[arg(short, long)]
        customer: Option<String>,
        /// Scripted call to start with (e.g. fraud_detection)
        #[arg(short, long)]
        scenario: Option<String>,
        /// Do not speak customer replies
        #[arg(long)]
        no_voice: bool,
    },
    /// Walk through the training features, then start a session
    Demo,
    /// Serve the training GUI and its API
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
        /// Directory holding the GUI files
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
    /// Type text with an emotional cadence and speak it
    Say {
        text: String,
        #[arg(short, long, default_value = "neutral")]
        emotion: Emotion,
    },
    /// Print the delivery plan for some text as JSON
    Plan {
        text: String,
        #[arg(short, long)]
        pace: Option<Pace>,
        #[arg(short, long, default_value = "neutral")]
        emotion: Emotion,
    },
    /// List built-in voices
    Voices {
        /// Only this provider
        #[arg(long)]
        provider: Option<VoiceProvider>,
    },
    /// Talk NDJSON to an editor extension over stdin/stdout
    Bridge,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info,cadence=info",
        1 => "info,cadence=debug",
        2 => "debug",
        _ => "trace",
    };

    // stdout carries the conversation (or NDJSON for the bridge)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load()?;
    tracing::debug!(?config, "loaded configuration");

    match cli.command {
        Command::Chat { pace, voice } => {
            chat(&config, pace.unwrap_or(config.timing.pace), voice).await
        }
        Command::Train {
            customer,
            scenario,
            no_voice,
        } => train(&config, customer.as_deref(), scenario.as_deref(), !no_voice).await,
        Command::Demo => {
            print!("{DEMO_INTRO}");
            train(&config, None, None, true).await
        }
        Command::Serve { port, static_dir } => serve(&config, port, static_dir).await,
        Command::Say { text, emotion } => say(&config, &text, emotion).await,
        Command::Plan { text, pace, emotion } => {
            let plan = CadencePlan::new(&text, pace.unwrap_or(config.timing.pace), emotion);
            println!("{}", serde_json::to_string_pretty(&plan)?);
            Ok(())
        }
        Command::Voices { provider } => {
            list_voices(provider);
            Ok(())
        }
        Command::Bridge => bridge(&config).await,
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

fn stdout_typist(config: &Config) -> Typist<std::io::Stdout, TokioPacer> {
    Typist::new(std::io::stdout(), TokioPacer).with_jitter(config.timing.jitter)
}

/// Configured voice, or the console if the provider cannot be set up
fn voice_or_console(config: &Config) -> Voice {
    Voice::from_config(config).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "voice provider unavailable, using console");
        Voice::console()
    })
}

async fn chat(config: &Config, pace: Pace, voice: bool) -> anyhow::Result<()> {
    tracing::info!(%pace, voice, "starting chat");
    let mut session = ChatSession::new(stdout_typist(config), pace);
    if voice {
        session = session.with_voice(config.clone());
    }
    session.run(stdin_lines()?, shutdown_signal()).await?;
    Ok(())
}

async fn train(
    config: &Config,
    customer: Option<&str>,
    scenario: Option<&str>,
    voice: bool,
) -> anyhow::Result<()> {
    let mut session = TrainingSession::new(stdout_typist(config));
    if voice && config.voice.enabled {
        session = session.with_voice(voice_or_console(config));
    }
    if let Some(id) = customer {
        session = session.with_customer(find_customer(id)?);
    }
    if let Some(id) = scenario {
        session = session.with_scenario(id)?;
    }

    session.run(stdin_lines()?, shutdown_signal()).await?;
    Ok(())
}

async fn serve(config: &Config, port: Option<u16>, static_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let mut builder = ApiServerBuilder::new()
        .server_config(&config.server)
        .voice(voice_or_console(config));
    if let Some(port) = port {
        builder = builder.port(port);
    }
    if let Some(dir) = static_dir {
        builder = builder.static_dir(dir);
    }

    let server = builder.build();
    println!("🌐 Training GUI running at http://localhost:{}", server.port());
    server.run(shutdown_signal()).await?;
    Ok(())
}

async fn say(config: &Config, text: &str, emotion: Emotion) -> anyhow::Result<()> {
    let mut typist = stdout_typist(config);
    typist.write_now(&format!("{} ", emotion.icon()))?;
    deliver_segments(&mut typist, &plan_segments(text, emotion)).await?;
    typist.write_now("\n")?;

    let voice = voice_or_console(config);
    let clip = voice
        .speak(&clean_for_speech(text), emotion.voice_settings())
        .await;
    println!("{clip}");
    Ok(())
}

fn list_voices(provider: Option<VoiceProvider>) {
    let providers = provider.map_or_else(
        || vec![VoiceProvider::OpenAi, VoiceProvider::ElevenLabs, VoiceProvider::Azure],
        |p| vec![p],
    );

    for provider in providers {
        println!("{provider}:");
        let voices = catalog(provider);
        if voices.is_empty() {
            println!("  (text only, no voices)");
        }
        for v in voices {
            println!("  {:<10} {:<32} {}", v.name, v.id, v.style);
        }
    }
}

async fn bridge(config: &Config) -> anyhow::Result<()> {
    tracing::info!(pace = %config.timing.pace, "bridge ready");
    let mut stdout = cadence::bridge::serve(
        stdin_lines()?,
        tokio::io::stdout(),
        config.timing.pace.timing(),
        TokioPacer,
        CannedResponder::from_entropy(),
    )
    .await
    .context("bridge failed")?;
    tokio::io::AsyncWriteExt::flush(&mut stdout).await?;
    std::io::stdout().flush()?;
    Ok(())
}
