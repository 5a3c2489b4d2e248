//! Background tasks module
//! 
//! This module contains the tasks that run alongside the countdown controller.

pub mod ticker;
pub mod finish_notifier;

// Re-export main functions
pub use ticker::tick_task;
pub use finish_notifier::finish_notifier_task;
