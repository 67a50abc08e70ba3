pub mod ids;
pub mod time;

pub use ids::new_record_id;
pub use time::now_timestamp;
