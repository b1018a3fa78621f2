//! `email` — the value must look like an email address.
//!
//! The preprocessing gate refuses non-strings outright, so a number in an
//! email field reports a structural problem instead of "is not a valid
//! email".

use crate::checker::Checker;
use crate::typerule::TypeRule;
use crate::value::TypeTag;

pub(crate) fn checker() -> Checker {
    Checker::new(|value, ctx| {
        value
            .as_str()
            .is_some_and(|s| ctx.config.email_re.is_match(s))
    })
    .preprocess(|value, _| value.is_string())
    .preprocess_message("^values checked for email must be of type string, given: %{value}")
    .types(TypeRule::tag(TypeTag::Boolean))
}
