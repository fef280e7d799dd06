pub mod character;
mod help;
pub mod storyteller;

use crate::{Data, Error};

pub fn all() -> Vec<poise::Command<Data, Error>> {
    vec![
        help::help(),
        character::character(),
        storyteller::roster(),
        storyteller::stinit(),
    ]
}
