use std::path::Path;

use registrar::{Entity, Id, Registration, RegistrationDraft, StudentDraft, StudentRef};
use tracing::instrument;

use super::{confirm, open, rejected, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Register {
    /// The course offering to register for
    #[arg(long)]
    offering: Id,

    /// An existing student
    #[arg(long, conflicts_with_all = ["name", "email", "phone"])]
    student: Option<Id>,

    /// Full name of a new student
    #[arg(long, required_unless_present = "student")]
    name: Option<String>,

    /// Email address of a new student
    #[arg(long)]
    email: Option<String>,

    /// Phone number of a new student
    #[arg(long)]
    phone: Option<String>,
}

impl Register {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut registry = open(root)?;

        // Missing details of a new student are reported alongside any other
        // problem.
        let student = self.student.map_or_else(
            || {
                StudentRef::New(StudentDraft::new(
                    self.name.unwrap_or_default(),
                    self.email.unwrap_or_default(),
                    self.phone.unwrap_or_default(),
                ))
            },
            StudentRef::Existing,
        );

        let registration = registry
            .register(RegistrationDraft {
                student,
                course_offering_id: self.offering,
            })
            .map_err(rejected)?;

        println!(
            "{}",
            format!(
                "✅ Registered {} for {} ({})",
                registration.student(),
                registration.course_offering(),
                registration.id()
            )
            .success()
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Registrations {
    /// Only list registrations for this offering
    #[arg(long)]
    offering: Option<Id>,
}

impl Registrations {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let registry = open(root)?;

        let registrations: Vec<&Registration> = self.offering.as_ref().map_or_else(
            || registry.registrations().iter().collect(),
            |offering| registry.registrations_for(offering).collect(),
        );
        if registrations.is_empty() {
            println!("No registrations found.");
        }
        for registration in registrations {
            print_registration(registration);
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Unregister {
    /// The registration to remove
    id: Id,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

impl Unregister {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut registry = open(root)?;

        let prompt = registry.find::<Registration>(&self.id).map_or_else(
            || format!("Remove registration {}?", self.id),
            |registration| {
                format!(
                    "Remove the registration of {} for {}?",
                    registration.student(),
                    registration.course_offering()
                )
            },
        );
        confirm(&prompt, self.yes)?;

        if registry.remove::<Registration>(&self.id) {
            println!("{}", format!("✅ Removed registration {}", self.id).success());
        } else {
            println!("{}", format!("ℹ️  No registration {}", self.id).dim());
        }
        Ok(())
    }
}

/// Prints one registration on a single line.
pub fn print_registration(registration: &Registration) {
    println!(
        "{:<38} {:<40} {:<32} {}",
        registration.id().as_str().info(),
        registration.student().label(),
        registration.course_offering().label(),
        registration
            .registration_date()
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .dim()
    );
}
