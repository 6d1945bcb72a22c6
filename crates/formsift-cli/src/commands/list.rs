//! List commands for the available catalogs.

use formsift::default_catalogs;

/// Prints the rule constraints of the default catalogs.
pub fn rules() {
    println!("Available rule constraints:\n");
    for catalog in default_catalogs().rule_catalogs() {
        for name in catalog.names() {
            println!("  {name}  ({})", catalog.name());
        }
    }
    println!("\nReference them from profile definitions, e.g.:");
    println!("  {{ \"attribs\": {{ \"name\": \"LenRange:3:20\" }} }}");
    println!("  arguments follow the constraint name, separated by `:`");
}

/// Prints the filters of the default catalogs.
pub fn filters() {
    println!("Available filters:\n");
    for catalog in default_catalogs().filter_catalogs() {
        for name in catalog.names() {
            println!("  {name}  ({})", catalog.name());
        }
    }
    println!("\nAttach them as preFilters or postFilters, e.g.:");
    println!("  {{ \"attribs\": {{ \"name\": {{ \"preFilters\": [\"Trim\"] }} }} }}");
}
