use std::path::Path;

use registrar::{CourseOffering, Entity, Id, OfferingDraft, OfferingPatch};
use tracing::instrument;

use super::{confirm, open, rejected, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Command {
    #[command(subcommand)]
    command: OfferingCommand,
}

#[derive(Debug, clap::Parser)]
enum OfferingCommand {
    /// Offer a course as a given course type
    Add {
        /// The course to offer
        #[arg(long)]
        course: Id,
        /// The course type to offer it as
        #[arg(long)]
        course_type: Id,
    },

    /// List offerings
    List {
        /// Only list offerings of this course type
        #[arg(long)]
        course_type: Option<Id>,
    },

    /// Change the course or course type of an offering
    ///
    /// The offering's names are refreshed from the current catalogue.
    Edit {
        /// The offering to edit
        id: Id,
        /// The new course
        #[arg(long)]
        course: Option<Id>,
        /// The new course type
        #[arg(long)]
        course_type: Option<Id>,
    },

    /// Remove an offering
    ///
    /// Registrations for it are kept.
    Remove {
        /// The offering to remove
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
            OfferingCommand::Add {
                course,
                course_type,
            } => {
                let offering = registry
                    .add_course_offering(OfferingDraft::new(course, course_type))
                    .map_err(rejected)?;
                println!(
                    "{}",
                    format!("✅ Added offering {}: {offering}", offering.id()).success()
                );
            }
            OfferingCommand::List { course_type } => {
                let offerings: Vec<&CourseOffering> = course_type.as_ref().map_or_else(
                    || registry.course_offerings().iter().collect(),
                    |course_type| registry.offerings_of_type(course_type).collect(),
                );
                if offerings.is_empty() {
                    println!("No offerings found.");
                }
                for offering in offerings {
                    let registrations = registry.registrations_for(offering.id()).count();
                    println!(
                        "{:<38} {:<32} {}",
                        offering.id().as_str().info(),
                        offering.label(),
                        format!("{registrations} registered").dim()
                    );
                }
            }
            OfferingCommand::Edit {
                id,
                course,
                course_type,
            } => {
                let offering = registry
                    .update_course_offering(
                        &id,
                        OfferingPatch {
                            course_id: course,
                            course_type_id: course_type,
                        },
                    )
                    .map_err(rejected)?;
                println!(
                    "{}",
                    format!("✅ Updated offering {id}: {offering}").success()
                );
            }
            OfferingCommand::Remove { id, yes } => {
                let registrations = registry.registrations_for(&id).count();
                let prompt = if registrations == 0 {
                    format!("Remove offering {id}?")
                } else {
                    format!(
                        "{registrations} registration(s) refer to offering {id}. Remove it anyway?"
                    )
                };
                confirm(&prompt, yes)?;

                if registry.remove::<CourseOffering>(&id) {
                    println!("{}", format!("✅ Removed offering {id}").success());
                } else {
                    println!("{}", format!("ℹ️  No offering {id}").dim());
                }
            }
        }
        Ok(())
    }
}
