//! Split command handler.

use pathscout_core::naming::{split_name, split_name_to_var};

/// Print the tokens and variable form of each identifier.
pub fn execute(idents: &[String]) {
    for ident in idents {
        println!("{}", describe(ident));
    }
}

pub fn describe(ident: &str) -> String {
    format!(
        "{ident}: [{}] -> {}",
        split_name(ident).join(", "),
        split_name_to_var(ident)
    )
}
