//! wolfies-whatsapp - Fast Rust CLI for WhatsApp
//!
//! Resolves spoken or typed contact references and sends through whichever
//! channel works: direct link, desktop search, then the web client.
//!
//! CHANGELOG:
//! - 10/17/2026 - Rebuilt around contact resolution and the fallback dispatcher
//! - 01/10/2026 - Initial scaffold with CLI skeleton

use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;
use std::time::Duration;
use wolfies_whatsapp::commands::{self, messaging::SendSettings};
use wolfies_whatsapp::config::{expand_path, Config};
use wolfies_whatsapp::contacts::ContactStore;
use wolfies_whatsapp::dispatch::Dispatcher;
use wolfies_whatsapp::output::{format_error, OutputControls};

/// Send WhatsApp messages with contact resolution and channel fallback.
#[derive(Parser, Debug)]
#[command(name = "wolfies-whatsapp")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Compact JSON output (no whitespace)
    #[arg(long, global = true)]
    compact: bool,

    /// Contacts file (default: $WHATSAPP_CONTACTS_PATH or the config dir)
    #[arg(long, global = true)]
    contacts: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Knobs shared by every command that sends.
#[derive(Args, Debug)]
struct SendOptions {
    /// How many times to send the message
    #[arg(long, default_value_t = 1)]
    repeat: u32,

    /// Seconds between repeated messages
    #[arg(long, default_value_t = 1.0)]
    delay: f64,

    /// Directory holding the browser profile (keeps the web client logged in)
    #[arg(long)]
    profile_dir: Option<String>,

    /// Browser executable for the web fallback
    #[arg(long)]
    browser_exe: Option<String>,

    /// WebDriver endpoint for the web fallback
    #[arg(long)]
    webdriver_url: Option<String>,

    /// Open the chat and type the message but do not send it
    #[arg(long)]
    dry_run: bool,
}

impl SendOptions {
    fn settings(&self) -> Result<SendSettings, String> {
        let delay = Duration::try_from_secs_f64(self.delay)
            .map_err(|_| format!("--delay must be a non-negative number, got {}", self.delay))?;
        Ok(SendSettings {
            repeats: self.repeat.max(1),
            delay,
            dry_run: self.dry_run,
        })
    }

    fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.profile_dir {
            config.profile_dir = expand_path(dir);
        }
        if let Some(exe) = &self.browser_exe {
            config.browser_exe = Some(expand_path(exe));
        }
        if let Some(url) = &self.webdriver_url {
            config.webdriver_url = url.clone();
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send a message by phone or contact name
    Send {
        /// Recipient: phone number (6+ digits) or contact name
        recipient: Option<String>,

        /// Phone number in international format, e.g. 15551234567
        #[arg(long)]
        phone: Option<String>,

        /// Contact name (resolved against the contacts file)
        #[arg(long)]
        name: Option<String>,

        /// Message text
        #[arg(short, long)]
        message: String,

        #[command(flatten)]
        options: SendOptions,
    },

    /// Run a spoken/typed command such as "send a message to alice"
    Command {
        /// The utterance
        utterance: Vec<String>,

        /// Message body (asked for when missing)
        #[arg(short, long)]
        message: Option<String>,

        /// Reply to the confirmation question ("yes", "send", "okay" approve)
        #[arg(long)]
        confirm: Option<String>,

        #[command(flatten)]
        options: SendOptions,
    },

    /// Resolve a name against the contacts file
    Resolve {
        /// Name, nickname or misspelling
        name: Vec<String>,
    },

    /// Show how an utterance is interpreted, without sending
    Interpret {
        /// The utterance
        utterance: Vec<String>,
    },

    /// List contacts
    Contacts,
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

fn fail(message: &str, output: &OutputControls) -> ExitCode {
    if output.json {
        println!("{}", format_error(message));
    } else {
        eprintln!("Error: {}", message);
    }
    ExitCode::from(commands::EXIT_FAILURE)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output_controls = OutputControls {
        json: cli.json,
        compact: cli.compact,
    };

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => return fail(&e.to_string(), &output_controls),
    };
    if let Some(path) = &cli.contacts {
        config.contacts_path = expand_path(path);
    }

    let store = ContactStore::load_or_empty(&config.contacts_path);

    let result = match cli.command {
        Command::Send {
            recipient,
            phone,
            name,
            message,
            options,
        } => {
            let settings = match options.settings() {
                Ok(settings) => settings,
                Err(e) => return fail(&e, &output_controls),
            };
            options.apply(&mut config);

            let (positional_phone, positional_name) = recipient
                .as_deref()
                .map(commands::messaging::classify_recipient)
                .unwrap_or_default();
            let phone = phone.or(positional_phone);
            let name = name.or(positional_name);

            let dispatcher = Dispatcher::from_config(&config);
            commands::messaging::send(
                &store,
                &dispatcher,
                phone.as_deref(),
                name.as_deref(),
                &message,
                settings,
                &output_controls,
            )
        }
        Command::Command {
            utterance,
            message,
            confirm,
            options,
        } => {
            let settings = match options.settings() {
                Ok(settings) => settings,
                Err(e) => return fail(&e, &output_controls),
            };
            options.apply(&mut config);

            let dispatcher = Dispatcher::from_config(&config);
            commands::messaging::command(
                &store,
                &dispatcher,
                &utterance.join(" "),
                message.as_deref(),
                confirm.as_deref(),
                settings,
                &output_controls,
            )
        }
        Command::Resolve { name } => {
            commands::contacts::resolve(&store, &name.join(" "), &output_controls)
        }
        Command::Interpret { utterance } => {
            commands::interpret::interpret(&store, &utterance.join(" "), &output_controls)
        }
        Command::Contacts => commands::contacts::list(&store, &config.contacts_path, &output_controls),
    };

    match result {
        Ok(code) => code,
        Err(e) => fail(&format!("{:#}", e), &output_controls),
    }
}
