pub mod prompts;
pub mod render;

pub use prompts::{
    closest_categories, prompt_course, prompt_diet_type, prompt_path, prompt_population,
    prompt_protein_category, prompt_session_action, prompt_yes_no, SessionAction,
};
pub use render::{
    display_fit_outcome, display_menu, display_rejected_courses, display_totals, display_warnings,
};
