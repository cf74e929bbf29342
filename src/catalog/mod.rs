mod manager;
mod persistence;

pub use manager::RecipeCatalog;
pub use persistence::{
    Dataset, load_dataset, load_on_hand, load_plan, save_dataset, save_plan, write_plan_csv,
    write_shopping_csv,
};
