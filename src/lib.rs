mod derive;
mod evaluate;
mod policy;
mod tokenize;
mod types;

pub use derive::pattern_from_reference;
pub use evaluate::{check_batch, check_batch_detailed};
pub use policy::{CheckPolicy, Normalized};
pub use tokenize::tokenize;
pub use types::{
    AnswerSpec, Bindings, CallSpec, CheckReport, ElementOrder, IdentifierSpec, InitListSpec,
    NumberSpec, PatternPart, PatternSpec, SameAsSpec, SimpleRule, SpecError, SpecRegex, StringSpec,
    Token, TokenKind, any_of, array, call, identifier, number, one_of, pattern, same_as, string,
};
