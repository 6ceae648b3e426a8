//! Animal adoption and inspection commands for CLI.

use clap::Subcommand;
use cozyfarm_core::AnimalType;
use serde_json::json;

use super::{open_farm, print_json};

#[derive(Subcommand)]
pub enum AnimalAction {
    /// Adopt a new animal together with its habit
    Create {
        /// Species: cat, bunny, bear, fox, duck or hamster
        #[arg(long = "type")]
        animal_type: AnimalType,
        /// Animal name
        #[arg(long)]
        name: String,
        /// Habit the animal stands for
        #[arg(long)]
        habit: String,
    },
    /// List animals, oldest first
    List,
    /// Show an animal with its habit, level progress and mood
    Show {
        /// Animal ID
        id: String,
    },
    /// List the adoptable species
    Species,
}

pub fn run(action: AnimalAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AnimalAction::Create {
            animal_type,
            name,
            habit,
        } => {
            let (mut farm, _) = open_farm()?;
            let id = farm.create_animal_and_habit(animal_type, &name, &habit)?;
            eprintln!("Animal adopted: {id}");
            print_json(&farm.animal_by_id(&id))?;
        }
        AnimalAction::List => {
            let (farm, _) = open_farm()?;
            print_json(&farm.animals())?;
        }
        AnimalAction::Show { id } => {
            let (farm, _) = open_farm()?;
            let Some(animal) = farm.animal_by_id(&id) else {
                return Err(format!("animal not found: {id}").into());
            };
            print_json(&json!({
                "animal": animal,
                "habit": farm.habit_by_animal_id(&id),
                "species": animal.animal_type.info(),
                "progress": farm.level_progress(&id),
                "mood": animal.state.mood_line(&animal.name),
                "canCheckIn": farm.can_check_in(&id),
            }))?;
        }
        AnimalAction::Species => {
            let catalog: Vec<_> = AnimalType::ALL.iter().map(AnimalType::info).collect();
            print_json(&catalog)?;
        }
    }
    Ok(())
}
