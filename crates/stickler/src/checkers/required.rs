//! `required` — the value must not be empty.

use crate::checker::Checker;
use crate::typerule::TypeRule;
use crate::value::TypeTag;

pub(crate) fn checker() -> Checker {
    Checker::new(|value, ctx| !ctx.config.is_empty(value)).types(TypeRule::tag(TypeTag::Boolean))
}
