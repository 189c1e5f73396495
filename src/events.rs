pub mod keyboard;
pub mod pointer;
pub mod timers;

pub use keyboard::wire_global_keydown;
pub use pointer::wire_pointer_handlers;
pub use timers::{wire_clock_timer, wire_idle_timer, wire_resize};
