use std::path::Path;

use clap::Parser;
use registrar::Stats;
use tracing::instrument;

use super::{
    open,
    register::print_registration,
    terminal::{Colorize, is_narrow},
};

/// Registrations shown by default.
const RECENT: usize = 5;

#[derive(Debug, Parser)]
#[command(about = "Show collection counts and the latest registrations")]
pub struct Status {
    /// How many recent registrations to show
    #[arg(long, default_value_t = RECENT)]
    recent: usize,

    /// Only print the counts on one line
    #[arg(short, long)]
    quiet: bool,
}

impl Default for Status {
    fn default() -> Self {
        Self {
            recent: RECENT,
            quiet: false,
        }
    }
}

impl Status {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let registry = open(root)?;
        let stats = registry.stats();

        if self.quiet {
            Self::output_quiet(stats);
            return Ok(());
        }

        Self::output_table(stats);
        println!();

        println!("Recent registrations");
        println!("{}", "────────────────────".dim());
        let mut recent = registry.recent_registrations(self.recent).peekable();
        if recent.peek().is_none() {
            println!(
                "{}",
                "No registrations yet. Create one with 'registrar register'.".dim()
            );
        }
        for registration in recent {
            print_registration(registration);
        }

        let orphans = registry.orphans().len();
        if orphans > 0 {
            println!();
            println!(
                "Orphaned references: {} ⚠️",
                orphans.to_string().warning()
            );
            println!("{}", "Run 'registrar check' to list them.".dim());
        }
        Ok(())
    }

    fn output_quiet(stats: Stats) {
        println!(
            "course_types={} courses={} offerings={} students={} registrations={}",
            stats.course_types,
            stats.courses,
            stats.course_offerings,
            stats.students,
            stats.registrations
        );
    }

    fn output_table(stats: Stats) {
        let rows = [
            ("Course types", stats.course_types),
            ("Courses", stats.courses),
            ("Offerings", stats.course_offerings),
            ("Students", stats.students),
            ("Registrations", stats.registrations),
        ];

        println!("Counts");
        println!("{}", "──────".dim());
        if is_narrow() {
            for (label, count) in rows {
                println!("{label}: {count}");
            }
        } else {
            for (label, count) in rows {
                println!("{label:<14} {}", count.to_string().info());
            }
        }
    }
}
