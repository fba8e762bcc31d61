mod catalog;
mod persistence;
mod session;

pub use catalog::Catalog;
pub use persistence::{
    load_catalog, load_config, load_menu, load_population, load_recipes, load_requirements,
    save_menu, save_recipes, write_menu_csv,
};
pub use session::{MenuBuildSession, UsedIngredientSet};
