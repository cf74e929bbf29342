use clap::{Parser, Subcommand};

use crate::models::{ActivityLevel, Sex};

/// MenuPlanner: plans a week of menus that meets nutrition targets with as few
/// distinct ingredients as possible.
#[derive(Parser, Debug)]
#[command(name = "menu_planner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the recipe/ingredient/target dataset JSON file.
    #[arg(short, long, default_value = "menu_data.json")]
    pub data: String,

    /// Path to an engine configuration JSON file.
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log planner stages to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Plan a week of menus. Missing profile fields are prompted for.
    Plan {
        /// Age bracket as it appears in the targets (e.g. 30-49).
        #[arg(long)]
        age: Option<String>,

        /// male or female.
        #[arg(long)]
        sex: Option<Sex>,

        /// low, moderate or high.
        #[arg(long)]
        activity: Option<ActivityLevel>,

        /// Use the menstruation-specific iron bound.
        #[arg(long)]
        menstruating: bool,

        /// JSON file of on-hand ingredients (name to grams).
        #[arg(long)]
        on_hand: Option<String>,

        /// On-hand ingredient as name=grams. Repeatable.
        #[arg(long = "have", value_name = "NAME=GRAMS")]
        have: Vec<String>,

        /// Write the plan as JSON.
        #[arg(long)]
        json: Option<String>,

        /// Write the plan as CSV.
        #[arg(long)]
        csv: Option<String>,

        /// Write the built model in LP format and stop.
        #[arg(long)]
        dump_lp: Option<String>,
    },

    /// Show the shopping list for a saved plan.
    Shopping {
        /// Plan JSON written by `plan --json`.
        #[arg(long)]
        plan: String,

        /// Write the list as CSV.
        #[arg(long)]
        csv: Option<String>,
    },

    /// List ingredient equivalence classes.
    Classes,
}

impl Default for Command {
    fn default() -> Self {
        Command::Plan {
            age: None,
            sex: None,
            activity: None,
            menstruating: false,
            on_hand: None,
            have: Vec::new(),
            json: None,
            csv: None,
            dump_lp: None,
        }
    }
}
