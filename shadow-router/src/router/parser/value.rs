//! Value extracted from a query.

use std::fmt::Display;

use pg_query::{
    protobuf::{a_const::Val, *},
    NodeEnum,
};

/// A value extracted from a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    String(&'a str),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
    Placeholder(i32),
}

impl Display for Value<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) => write!(f, "'{}'", s.replace("'", "''")),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(s) => write!(f, "{}", s),
            Self::Null => write!(f, "NULL"),
            Self::Boolean(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            Self::Placeholder(p) => write!(f, "${}", p),
        }
    }
}

impl<'a> From<&'a AConst> for Value<'a> {
    fn from(value: &'a AConst) -> Self {
        if value.isnull {
            return Value::Null;
        }

        match value.val.as_ref() {
            Some(Val::Sval(s)) => match s.sval.parse::<i64>() {
                Ok(i) => Value::Integer(i),
                Err(_) => Value::String(s.sval.as_str()),
            },
            Some(Val::Boolval(b)) => Value::Boolean(b.boolval),
            Some(Val::Ival(i)) => Value::Integer(i.ival as i64),
            Some(Val::Fval(Float { fval })) => {
                if fval.contains(".") {
                    if let Ok(float) = fval.parse() {
                        Value::Float(float)
                    } else {
                        Value::String(fval.as_str())
                    }
                } else {
                    match fval.parse::<i64>() {
                        Ok(i) => Value::Integer(i), // Integers over 2.2B and under -2.2B are sent as "floats"
                        Err(_) => Value::String(fval.as_str()),
                    }
                }
            }
            Some(Val::Bsval(bsval)) => Value::String(bsval.bsval.as_str()),
            None => Value::Null,
        }
    }
}

impl<'a> TryFrom<&'a Node> for Value<'a> {
    type Error = ();

    fn try_from(value: &'a Node) -> Result<Self, Self::Error> {
        Value::try_from(&value.node)
    }
}

impl<'a> TryFrom<&'a Option<NodeEnum>> for Value<'a> {
    type Error = ();

    fn try_from(value: &'a Option<NodeEnum>) -> Result<Self, Self::Error> {
        Ok(match value {
            Some(NodeEnum::AConst(a_const)) => a_const.into(),
            Some(NodeEnum::ParamRef(param_ref)) => Value::Placeholder(param_ref.number),
            Some(NodeEnum::TypeCast(cast)) => {
                if let Some(ref arg) = cast.arg {
                    Value::try_from(&arg.node)?
                } else {
                    Value::Null
                }
            }

            _ => return Err(()),
        })
    }
}
