use std::path::Path;

use registrar::{Course, CourseType, Entity, Id, JsonDirectory, Registry};
use tracing::instrument;

use super::{confirm, open, rejected, terminal::Colorize};

/// Which catalogue a [`Command`] operates on.
#[derive(Debug, Clone, Copy)]
pub enum Catalogue {
    CourseTypes,
    Courses,
}

impl Catalogue {
    const fn noun(self) -> &'static str {
        match self {
            Self::CourseTypes => "course type",
            Self::Courses => "course",
        }
    }
}

#[derive(Debug, clap::Parser)]
pub struct Command {
    #[command(subcommand)]
    command: CatalogueCommand,
}

#[derive(Debug, clap::Parser)]
enum CatalogueCommand {
    /// Add an entry
    Add {
        /// The name (at least two characters)
        name: String,
    },

    /// List every entry
    List,

    /// Rename an entry
    ///
    /// Offerings created earlier keep the old name.
    Rename {
        /// The entry to rename
        id: Id,
        /// The new name
        name: String,
    },

    /// Remove an entry
    ///
    /// Offerings that refer to it are kept.
    Remove {
        /// The entry to remove
        id: Id,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

impl Command {
    #[instrument]
    pub fn run(self, root: &Path, catalogue: Catalogue) -> anyhow::Result<()> {
        let mut registry = open(root)?;
        let noun = catalogue.noun();

        match self.command {
            CatalogueCommand::Add { name } => {
                let (id, name) = match catalogue {
                    Catalogue::CourseTypes => {
                        let row = registry.add_course_type(&name).map_err(rejected)?;
                        (row.id().clone(), row.name().to_string())
                    }
                    Catalogue::Courses => {
                        let row = registry.add_course(&name).map_err(rejected)?;
                        (row.id().clone(), row.name().to_string())
                    }
                };
                println!("{}", format!("✅ Added {noun} {id}: {name}").success());
            }
            CatalogueCommand::List => {
                let rows: Vec<_> = match catalogue {
                    Catalogue::CourseTypes => registry
                        .course_types()
                        .iter()
                        .map(|row| (row.id(), row.name().as_str(), row.created_at()))
                        .collect(),
                    Catalogue::Courses => registry
                        .courses()
                        .iter()
                        .map(|row| (row.id(), row.name().as_str(), row.created_at()))
                        .collect(),
                };
                if rows.is_empty() {
                    println!("No {noun}s yet.");
                }
                for (id, name, created_at) in rows {
                    println!(
                        "{:<38} {name:<24} {}",
                        id.as_str().info(),
                        created_at.format("%Y-%m-%d").to_string().dim()
                    );
                }
            }
            CatalogueCommand::Rename { id, name } => {
                let name = match catalogue {
                    Catalogue::CourseTypes => registry
                        .update_course_type(&id, &name)
                        .map_err(rejected)?
                        .name()
                        .to_string(),
                    Catalogue::Courses => registry
                        .update_course(&id, &name)
                        .map_err(rejected)?
                        .name()
                        .to_string(),
                };
                println!("{}", format!("✅ Renamed {noun} {id} to {name}").success());
            }
            CatalogueCommand::Remove { id, yes } => {
                let referring = referring_offerings(&registry, catalogue, &id);
                let prompt = if referring == 0 {
                    format!("Remove {noun} {id}?")
                } else {
                    format!("{referring} offering(s) refer to {noun} {id}. Remove it anyway?")
                };
                confirm(&prompt, yes)?;

                let removed = match catalogue {
                    Catalogue::CourseTypes => registry.remove::<CourseType>(&id),
                    Catalogue::Courses => registry.remove::<Course>(&id),
                };
                if removed {
                    println!("{}", format!("✅ Removed {noun} {id}").success());
                } else {
                    println!("{}", format!("ℹ️  No {noun} {id}").dim());
                }
            }
        }
        Ok(())
    }
}

fn referring_offerings(
    registry: &Registry<JsonDirectory>,
    catalogue: Catalogue,
    id: &Id,
) -> usize {
    registry
        .course_offerings()
        .iter()
        .filter(|offering| match catalogue {
            Catalogue::CourseTypes => offering.course_type_id() == id,
            Catalogue::Courses => offering.course_id() == id,
        })
        .count()
}
