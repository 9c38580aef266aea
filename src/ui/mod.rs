pub mod listing;

pub use listing::{format_channel, format_count, format_video_list};
