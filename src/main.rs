//! `registrar`: manage course types, courses, offerings, students and
//! registrations stored as JSON files in a data directory.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
