pub mod config;
pub mod grain;
pub mod lookup;
pub mod state;

pub use config::*;
pub use grain::*;
pub use lookup::*;
pub use state::*;
