//! Shared objects and cycles with reference tracking.
//!
//! Run with: RUST_LOG=refjson=trace cargo run --example shared_references

use refjson::{from_str, impl_object, share, to_string_with_options, JsonOptions, Shared};
use std::error::Error;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

#[derive(Default)]
struct Note {
    number: i32,
    text: String,
    pinned: bool,
    linked: Option<Shared<Note>>,
}

impl_object!(Note {
    number: i32,
    text: String,
    #[ignore]
    pinned: bool,
    linked: Option<Shared<Note>>,
});

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let note = share(Note {
        number: 24,
        text: "Hello World!".to_string(),
        pinned: true,
        linked: None,
    });

    // The note now refers to itself.
    note.borrow_mut().linked = Some(note.clone());

    let untracked = to_string_with_options(&note, &JsonOptions::new().with_max_depth(8));
    println!("Without tracking: {}", untracked.unwrap_err());

    let json = to_string_with_options(&note, &JsonOptions::tracked())?;
    println!("With tracking:    {}", json);

    let back: Shared<Note> = from_str(&json)?;
    let linked = back.borrow().linked.clone().ok_or("missing link")?;
    println!("Decoded note refers to itself: {}", Rc::ptr_eq(&back, &linked));
    println!("Ignored member after decoding: {}", back.borrow().pinned);

    note.borrow_mut().linked = None;
    back.borrow_mut().linked = None;
    Ok(())
}
