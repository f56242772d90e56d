pub mod latest_frame_slot;
pub mod stepped_frame_source;
