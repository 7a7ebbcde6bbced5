pub mod list;
pub mod results;

pub use list::render_list;
pub use results::render_results;
