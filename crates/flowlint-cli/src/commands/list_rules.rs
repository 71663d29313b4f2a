//! List-rules command implementation.

use flowlint_rules::registry;

/// Runs the list-rules command.
pub fn run() {
    println!("Available considerations:\n");
    println!("{:<12} Name", "Applies to");
    println!("{}", "-".repeat(50));

    for entry in registry() {
        println!("{:<12} {}", entry.kind, entry.name);
    }

    println!("\nThe release header's active-consideration lists decide which");
    println!("entries run, and may force a result or scale a score per entry.");
}
