//! CLI command implementations

mod post;
pub mod style;
mod validate;

pub use post::run_post;
pub use validate::run_validate;

use anstream::println;
use cred_check::report::{Level, Line};
use style::Stylize;

/// Print one report line with colors matching its level
pub fn print_line(line: &Line) {
    let text = &line.text;
    match line.level {
        Level::Rule => println!("{}", text.muted()),
        Level::Title => println!("{}", text.emphasis()),
        Level::Phase => println!("\n{}", text.emphasis()),
        Level::Ok => println!("   {} {text}", "[OK]".success()),
        Level::Warning => println!("   {} {text}", "[WARNING]".warning()),
        Level::Error => println!("   {} {text}", "[ERROR]".failure()),
        Level::Advice => println!("\n   {text}"),
        Level::Step => println!("   {}", text.muted()),
        Level::Success => println!("{} {}", "[SUCCESS]".success(), text.emphasis()),
        Level::Failure => println!("{} {}", "[FAILED]".failure(), text.emphasis()),
    }
}
