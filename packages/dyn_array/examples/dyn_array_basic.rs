//! Example that walks through the basic `DynArray` operations and shows how capacity evolves.

use dyn_array::{DynArray, Error};

fn main() {
    println!("=== DynArray Basic Example ===");

    let mut array = DynArray::new();
    println!("Empty: len={} capacity={}", array.len(), array.capacity());

    for value in 1..=5 {
        array.push(value);
        println!(
            "Pushed {value}: len={} capacity={}",
            array.len(),
            array.capacity()
        );
    }

    array.insert(1, 10);
    println!("After insert(1, 10): {array:?}");

    array.erase(0);
    println!("After erase(0): {array:?}");

    array.resize(8);
    println!(
        "After resize(8): {array:?} (capacity={})",
        array.capacity()
    );

    // Elements can be constructed directly in their final slot.
    let mut names = DynArray::new();
    names
        .emplace_last_with(|| String::from("Alice"))
        .push_str(" Smith");
    names.emplace_with(0, || String::from("Bob"));
    println!("Names: {names:?}");

    // Copy assignment reuses storage when the source fits.
    let mut copy = DynArray::with_capacity(16);
    copy.clone_from(&array);
    println!(
        "Copy: {copy:?} (capacity={}, storage reused)",
        copy.capacity()
    );

    // Reservation can report failure instead of panicking.
    match array.try_reserve(usize::MAX) {
        Ok(()) => println!("Unexpectedly reserved everything"),
        Err(Error::CapacityOverflow) => println!("try_reserve(usize::MAX) reported overflow"),
        Err(error) => println!("try_reserve(usize::MAX) failed: {error}"),
    }

    let total: i32 = array.into_iter().sum();
    println!("Sum of elements: {total}");

    println!("Example completed successfully!");
}
