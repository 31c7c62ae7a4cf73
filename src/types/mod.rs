mod builder;
mod env;
mod error;
mod report;
mod spec;
mod token;

pub use builder::{
    CallSpec, IdentifierSpec, InitListSpec, NumberSpec, PatternSpec, SameAsSpec, StringSpec,
    any_of, array, call, identifier, number, one_of, pattern, same_as, string,
};
pub use env::Bindings;
pub use error::SpecError;
pub use report::CheckReport;
pub use spec::{AnswerSpec, ElementOrder, PatternPart, SimpleRule, SpecRegex};
pub use token::{Token, TokenKind};
