//! Embassy tasks

pub mod chime;
pub mod cli;
pub mod clock;
pub mod scan;

pub use chime::chime_task;
pub use cli::cli_task;
pub use clock::clock_task;
pub use scan::scan_task;
