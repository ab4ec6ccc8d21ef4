use std::path::Path;

use registrar::{Entity, Id, Student, StudentDraft, StudentPatch};
use tracing::instrument;

use super::{confirm, open, rejected, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Command {
    #[command(subcommand)]
    command: StudentCommand,
}

#[derive(Debug, clap::Parser)]
enum StudentCommand {
    /// Add a student
    Add {
        /// Full name
        #[arg(long)]
        name: String,
        /// Email address
        #[arg(long)]
        email: String,
        /// Phone number
        #[arg(long)]
        phone: String,
    },

    /// List every student
    List,

    /// Change some of a student's details
    ///
    /// Existing registrations keep the details the student had when they
    /// registered.
    Edit {
        /// The student to edit
        id: Id,
        /// New full name
        #[arg(long)]
        name: Option<String>,
        /// New email address
        #[arg(long)]
        email: Option<String>,
        /// New phone number
        #[arg(long)]
        phone: Option<String>,
    },

    /// Remove a student
    ///
    /// Their registrations are kept.
    Remove {
        /// The student to remove
        id: Id,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

impl Command {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut registry = open(root)?;

        match self.command {
            StudentCommand::Add { name, email, phone } => {
                let student = registry
                    .add_student(&StudentDraft::new(name, email, phone))
                    .map_err(rejected)?;
                println!(
                    "{}",
                    format!("✅ Added student {}: {student}", student.id()).success()
                );
            }
            StudentCommand::List => {
                if registry.students().is_empty() {
                    println!("No students yet.");
                }
                for student in registry.students() {
                    println!(
                        "{:<38} {:<40} {}",
                        student.id().as_str().info(),
                        student.label(),
                        student.phone().as_str().dim()
                    );
                }
            }
            StudentCommand::Edit {
                id,
                name,
                email,
                phone,
            } => {
                let student = registry
                    .update_student(&id, &StudentPatch { name, email, phone })
                    .map_err(rejected)?;
                println!("{}", format!("✅ Updated student {id}: {student}").success());
            }
            StudentCommand::Remove { id, yes } => {
                let registrations = registry
                    .registrations()
                    .iter()
                    .filter(|r| r.student_id() == &id)
                    .count();
                let prompt = if registrations == 0 {
                    format!("Remove student {id}?")
                } else {
                    format!("Student {id} has {registrations} registration(s). Remove anyway?")
                };
                confirm(&prompt, yes)?;

                if registry.remove::<Student>(&id) {
                    println!("{}", format!("✅ Removed student {id}").success());
                } else {
                    println!("{}", format!("ℹ️  No student {id}").dim());
                }
            }
        }
        Ok(())
    }
}
