/// Quickstart example - the simplest possible usage
use flatiron::Table;
use serde_json::json;

fn main() -> anyhow::Result<()> {
    println!("=== Flatiron Quick Start ===\n");

    // Step 1: Your JSON data - an array of (possibly nested) objects
    let my_data = json!([
        {
            "id": 1,
            "username": "alice",
            "profile": {
                "email": "alice@example.com",
                "admin": true
            },
            "tags": ["intro", "welcome"]
        },
        {
            "id": 2,
            "username": "bob",
            "profile": {
                "email": "bob@example.com"
            }
        }
    ]);

    println!("Original JSON:");
    println!("{}\n", serde_json::to_string_pretty(&my_data)?);

    // Step 2: Load it as a table
    let mut table = Table::from_value(my_data)?;

    // Step 3: Look at the columns it found
    println!("Columns:");
    for column in table.columns() {
        println!("  {:<15} {}", column.key, column.column_type);
    }
    println!();

    // Step 4: Edit some cells - text is coerced using each column's type
    table.set_cell(1, "profile.admin", "false")?;
    table.set_cell(0, "username", "alice2")?;

    println!("Row 0 username is now: {}", table.formatted_cell(0, "username")?);
    println!("Row 1 profile.admin is now: {}\n", table.formatted_cell(1, "profile.admin")?);

    // Step 5: Save - nesting comes back, nulls are dropped
    println!("Saved JSON:");
    println!("{}", table.to_pretty_json()?);

    Ok(())
}
