use std::path::{Path, PathBuf};

mod catalogue;
mod offering;
mod register;
mod status;
mod student;
mod terminal;

use anyhow::Context;
use clap::ArgAction;
use registrar::{Config, JsonDirectory, Registry};
use status::Status;
use terminal::Colorize;
use tracing::instrument;

/// Name of the configuration file inside the data directory.
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The data directory holding the stored collections
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Status(Status::default()))
            .run(&self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show collection counts and the latest registrations (default)
    Status(Status),

    /// Create a data directory with a default configuration
    Init,

    /// Manage course types
    CourseType(catalogue::Command),

    /// Manage courses
    Course(catalogue::Command),

    /// Manage course offerings
    ///
    /// An offering pairs a course with a course type.
    Offering(offering::Command),

    /// Manage students
    Student(student::Command),

    /// Register a student for a course offering
    ///
    /// Either refer to an existing student with --student, or describe a new
    /// one with --name, --email and --phone.
    Register(register::Register),

    /// List registrations
    Registrations(register::Registrations),

    /// Remove a registration
    Unregister(register::Unregister),

    /// Report references to rows that have since been removed
    Check(Check),
}

impl Command {
    fn run(self, root: &Path) -> anyhow::Result<()> {
        match self {
            Self::Status(command) => command.run(root)?,
            Self::Init => Init::run(root)?,
            Self::CourseType(command) => command.run(root, catalogue::Catalogue::CourseTypes)?,
            Self::Course(command) => command.run(root, catalogue::Catalogue::Courses)?,
            Self::Offering(command) => command.run(root)?,
            Self::Student(command) => command.run(root)?,
            Self::Register(command) => command.run(root)?,
            Self::Registrations(command) => command.run(root)?,
            Self::Unregister(command) => command.run(root)?,
            Self::Check(command) => command.run(root)?,
        }
        Ok(())
    }
}

/// Opens the registry stored in `root`, reading `config.toml` if present.
fn open(root: &Path) -> anyhow::Result<Registry<JsonDirectory>> {
    let config = Config::load_or_default(&root.join(CONFIG_FILE));
    Registry::open(JsonDirectory::new(root.to_path_buf()), &config)
        .with_context(|| format!("Failed to open data directory {}", root.display()))
}

/// Prints every violation of a rejected mutation, one per line, and turns
/// the error into a summary.
fn rejected(error: registrar::Error) -> anyhow::Error {
    let Some(violations) = error.violations() else {
        return error.into();
    };

    eprintln!("{}", "❌ Rejected:".warning());
    for violation in violations.iter() {
        eprintln!("  • {}: {violation}", violation.field().to_string().info());
    }
    anyhow::anyhow!("{} problem(s) found, nothing was changed", violations.len())
}

/// Asks before a removal unless `yes` is set. Exits if the user declines.
fn confirm(prompt: &str, yes: bool) -> anyhow::Result<()> {
    if yes {
        return Ok(());
    }

    let proceed = dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    if !proceed {
        println!("Cancelled");
        std::process::exit(130);
    }
    Ok(())
}

#[derive(Debug, clap::Parser)]
pub struct Init {}

impl Init {
    #[instrument]
    fn run(root: &Path) -> anyhow::Result<()> {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            anyhow::bail!(
                "Data directory already initialized (found {})",
                config_path.display()
            );
        }

        std::fs::create_dir_all(root)
            .with_context(|| format!("Failed to create {}", root.display()))?;
        Config::default()
            .save(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create {CONFIG_FILE}: {e}"))?;

        // Opening seeds the default course types and courses.
        let registry = open(root)?;
        let stats = registry.stats();

        println!("Initialized data directory in {}", root.display());
        println!("  Created: {CONFIG_FILE}");
        println!(
            "  Seeded: {} course types, {} courses",
            stats.course_types, stats.courses
        );
        println!();
        println!("Next steps:");
        println!("  registrar course list");
        println!("  registrar offering add --course <ID> --course-type <ID>");
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Check {
    /// Only print the number of orphaned references
    #[arg(short, long)]
    quiet: bool,
}

impl Check {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let registry = open(root)?;
        let orphans = registry.orphans();

        if self.quiet {
            println!("orphans={}", orphans.len());
        } else if orphans.is_empty() {
            println!("{}", "✅ Every reference resolves".success());
        } else {
            println!(
                "{}",
                format!("⚠️  {} orphaned reference(s):", orphans.len()).warning()
            );
            for orphan in &orphans {
                println!("  • {orphan}");
            }
            println!(
                "{}",
                "Orphaned rows keep the names they were created with.".dim()
            );
        }

        if !orphans.is_empty() {
            std::process::exit(2);
        }
        Ok(())
    }
}
