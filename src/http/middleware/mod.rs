pub mod latency;

pub use latency::{instrument, track_latency, RequestTimer};
