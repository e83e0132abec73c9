#[macro_use]
extern crate rust_i18n;

i18n!("locales");

pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod fetch;
pub mod git;
pub mod interactive;
pub mod path_utils;
pub mod report;
pub mod store;
pub mod sync;

#[cfg(test)]
pub mod test_utils;

pub fn init_locale() {
    rust_i18n::set_locale("en");
}
