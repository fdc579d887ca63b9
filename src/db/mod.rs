pub mod init;
pub mod migrations;
pub mod store;

pub use init::init_db;
pub use store::{get_db_stats, has_tables, load_tables, save_tables, DbStats};
