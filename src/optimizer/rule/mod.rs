mod annotate_join;
mod cleanup;
mod harvest_hints;
mod merge_filter;
mod push_across_boundary;
mod push_down_filter;

pub use annotate_join::annotate_join;
pub use cleanup::cleanup;
pub use harvest_hints::{harvest_hints, strip_hints};
pub use merge_filter::merge_filter;
pub use push_across_boundary::push_across_boundary;
pub use push_down_filter::push_down_filter;
