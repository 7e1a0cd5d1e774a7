//! Simulated parts of the controller: stations and the controller-wide sensors.
//!
//! Each part keeps its mutable state behind a [`Mutex`] so the controller
//! can be shared between the cards and the simulation loop.

mod station;
mod system;

pub use station::{Run, VirtualStation};
pub use system::VirtualSystem;

use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// `"Front Lawn"` becomes `"front_lawn"`.
pub(crate) fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    slug
}
